// Error taxonomy for the store and the course aggregator
//
// StoreError      - what a Data Store can report (infrastructure or bad documents)
// AggregateError  - what a single course query can end with
//
// Every variant is terminal for the request. Nothing here is retried.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// STORE ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or failed mid-query
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document exists but a required field is missing or has the wrong type
    #[error("malformed document {collection}/{id}: field `{field}` missing or invalid")]
    Malformed {
        collection: String,
        id: String,
        field: String,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(format!("sqlite: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unavailable(format!("stored document is not valid JSON: {}", err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Unavailable(format!("store task failed: {}", err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// AGGREGATE ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum AggregateError {
    /// No course carries the requested number (user-correctable)
    #[error("no course found with number {0}")]
    NotFound(String),

    /// A section points at a lecturer that does not exist
    #[error("section {section_id} references missing lecturer {lecturer_id}")]
    DanglingReference {
        section_id: String,
        lecturer_id: String,
    },

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("malformed document {collection}/{id}: field `{field}` missing or invalid")]
    MalformedDocument {
        collection: String,
        id: String,
        field: String,
    },

    /// The whole aggregation ran past its deadline
    #[error("course lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl From<StoreError> for AggregateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AggregateError::StoreUnavailable(msg),
            StoreError::Malformed {
                collection,
                id,
                field,
            } => AggregateError::MalformedDocument {
                collection,
                id,
                field,
            },
        }
    }
}

impl AggregateError {
    /// True only for faults the caller can fix by sending a different request
    pub fn is_client_error(&self) -> bool {
        matches!(self, AggregateError::NotFound(_))
    }
}
