// Data Store - document collections with field lookups
//
// Four collections (courses, lecturers, sections, reviews) hold schemaless
// documents: a store-assigned id plus a JSON field map. References between
// entities are plain id strings inside the field map.
//
// Backends:
// - MemoryStore  (append-only Vec behind a RwLock, used by tests and demos)
// - SqliteStore  (single `documents` table, JSON fields, WAL mode)

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// COLLECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Courses,
    Lecturers,
    Sections,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Courses,
        Collection::Lecturers,
        Collection::Sections,
        Collection::Reviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Courses => "courses",
            Collection::Lecturers => "lecturers",
            Collection::Sections => "sections",
            Collection::Reviews => "reviews",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// One stored record: opaque id + field map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub collection: Collection,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// New document with a fresh UUID
    pub fn new(collection: Collection, fields: Map<String, Value>) -> Self {
        Document {
            id: uuid::Uuid::new_v4().to_string(),
            collection,
            fields,
            created_at: Utc::now(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True when `field` holds exactly the string `value`
    pub fn field_equals(&self, field: &str, value: &str) -> bool {
        self.get(field).and_then(Value::as_str) == Some(value)
    }

    /// Required string field
    pub fn str_field(&self, field: &str) -> StoreResult<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed(field))
    }

    /// Required integer field
    pub fn int_field(&self, field: &str) -> StoreResult<i64> {
        self.get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.malformed(field))
    }

    fn malformed(&self, field: &str) -> StoreError {
        StoreError::Malformed {
            collection: self.collection.to_string(),
            id: self.id.clone(),
            field: field.to_string(),
        }
    }
}

// ============================================================================
// DATA STORE TRAIT
// ============================================================================

/// Read side of a document store.
///
/// All lookups return documents in retrieval order, which for both bundled
/// backends is insertion order.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// First document whose `field` equals `value`
    async fn find_one_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .find_all_by_field(collection, field, value)
            .await?
            .into_iter()
            .next())
    }

    /// Document by its store-assigned id
    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Every document whose `field` equals `value`
    async fn find_all_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>>;
}
