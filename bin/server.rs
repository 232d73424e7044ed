// Course Reviews - Web Server
// REST API with Axum over the SQLite document store

use anyhow::{Context, Result};
use clap::Parser;
use course_reviews::api::{router, AppState};
use course_reviews::{init_logging, Config, CourseAggregator, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Serve the course reviews API
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to configuration file (defaults to ./course-reviews.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, value_name = "FILE", env = "COURSE_REVIEWS_DB")]
    db: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, value_name = "ADDR", env = "COURSE_REVIEWS_BIND")]
    bind: Option<String>,

    /// Log filter (e.g. info, debug, tower_http=debug)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    config.apply_overrides(args.db, args.bind, args.log_level);
    init_logging(&config.logging)?;

    println!("🌐 Course Reviews - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Open database
    let db_path = &config.database.path;
    if !db_path.exists() {
        warn!("Database {} does not exist yet; it will be created empty", db_path.display());
        println!("   Run: course-reviews seed --sample");
        println!("   to load sample data.");
    }

    let store = SqliteStore::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    println!("✓ Database opened: {}", db_path.display());

    let aggregator = CourseAggregator::new(Arc::new(store)).with_timeout(config.request_timeout());
    let app = router(AppState::new(aggregator));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;

    info!(
        bind = %config.server.bind,
        timeout_seconds = config.server.request_timeout_seconds,
        "server listening"
    );
    println!("\n🚀 Server running on http://{}", config.server.bind);
    println!("   API: http://{}/api/courses?courseNumber=KIEI-451", config.server.bind);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
