// Course Reviews - Core Library
// Exposes all modules for use in the CLI, the API server and tests

pub mod aggregator;
pub mod config;
pub mod entities;
pub mod error;
pub mod seed;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use aggregator::{
    CourseAggregator, CourseDetail, ReviewDetail, ReviewTally, SectionDetail, DEFAULT_TIMEOUT,
};
pub use config::{init_logging, Config};
pub use entities::{Course, Lecturer, Review, Section};
pub use error::{AggregateError, StoreError, StoreResult};
pub use seed::{seed, SeedData, SeedReport};
pub use store::{Collection, DataStore, Document, MemoryStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
