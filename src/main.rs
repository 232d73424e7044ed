//! Course Reviews CLI
//!
//! Seeds the SQLite database and answers course lookups from the shell.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, store failure, data-integrity fault)
//!   2 - No course with the requested number

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use course_reviews::store::sqlite::count_documents;
use course_reviews::{init_logging, seed, Collection, Config, CourseAggregator, SeedData, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

/// Course reviews: courses, who teaches them, and what students thought
///
/// Examples:
///   course-reviews seed --sample
///   course-reviews seed --csv-dir ./fixtures
///   course-reviews course KIEI-451 --pretty
///   course-reviews count
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Path to configuration file (defaults to ./course-reviews.toml if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, value_name = "FILE", env = "COURSE_REVIEWS_DB", global = true)]
    db: Option<PathBuf>,

    /// Log filter (e.g. info, debug, course_reviews=trace)
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load seed data into the database (safe to re-run)
    #[command(group(ArgGroup::new("source").required(true).args(["sample", "csv_dir"])))]
    Seed {
        /// Use the built-in KIEI sample dataset
        #[arg(long)]
        sample: bool,

        /// Directory holding courses.csv, lecturers.csv, sections.csv, reviews.csv
        #[arg(long, value_name = "DIR")]
        csv_dir: Option<PathBuf>,
    },

    /// Print one course with its sections, reviews and ratings as JSON
    Course {
        /// Course number, e.g. KIEI-451
        course_number: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show how many documents each collection holds
    Count,

    /// Write a default course-reviews.toml
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle init-config early (no config or logging needed)
    if let Command::InitConfig = args.command {
        if let Err(e) = handle_init_config() {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut config = Config::resolve(args.config.as_deref())?;
    config.apply_overrides(args.db.clone(), None, args.log_level.clone());
    init_logging(&config.logging)?;

    debug!("Arguments: {:?}", args);

    match run(args.command, &config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<i32> {
    match command {
        Command::Seed { sample, csv_dir } => run_seed(config, sample, csv_dir.as_deref()),
        Command::Course {
            course_number,
            pretty,
        } => run_course(config, &course_number, pretty).await,
        Command::Count => run_count(config),
        Command::InitConfig => handle_init_config().map(|_| 0),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database: {}", config.database.path.display()))
}

fn run_seed(config: &Config, sample: bool, csv_dir: Option<&Path>) -> Result<i32> {
    println!("🌱 Seeding {}", config.database.path.display());

    let data = match csv_dir {
        Some(dir) if !sample => {
            println!("📂 Loading CSV files from {}", dir.display());
            SeedData::from_csv_dir(dir)?
        }
        _ => {
            println!("📦 Using built-in sample data");
            SeedData::sample()?
        }
    };

    let store = open_store(config)?;
    let report = seed(&*store.lock()?, &data)?;

    println!("✓ {}", report.summary());
    Ok(0)
}

async fn run_course(config: &Config, course_number: &str, pretty: bool) -> Result<i32> {
    let store = open_store(config)?;
    let aggregator = CourseAggregator::new(Arc::new(store)).with_timeout(config.request_timeout());

    match aggregator.get_course_detail(course_number).await {
        Ok(detail) => {
            let json = if pretty {
                serde_json::to_string_pretty(&detail)?
            } else {
                serde_json::to_string(&detail)?
            };
            println!("{}", json);
            Ok(0)
        }
        Err(e) if e.is_client_error() => {
            eprintln!("⚠️  {}", e);
            Ok(2)
        }
        Err(e) => Err(e.into()),
    }
}

fn run_count(config: &Config) -> Result<i32> {
    let store = open_store(config)?;
    let conn = store.lock()?;

    println!("🔍 {}", config.database.path.display());
    for collection in Collection::ALL {
        let count = count_documents(&conn, collection)?;
        println!("   {:<10} {}", collection.as_str(), count);
    }

    Ok(0)
}

fn handle_init_config() -> Result<()> {
    write_default_config(Path::new(course_reviews::config::DEFAULT_CONFIG_FILE))
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists. Remove it first or edit it manually.", path.display());
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    Ok(())
}
