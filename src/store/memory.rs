// In-memory document store
//
// Append-only: documents are pushed in insertion order and never removed,
// so every lookup returns documents in the order they were inserted.

use super::{Collection, DataStore, Document};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new document built from a JSON object, returning its id
    ///
    /// Non-object values are stored as an empty field map.
    pub fn insert(&self, collection: Collection, fields: Value) -> StoreResult<String> {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let doc = Document::new(collection, fields);
        let id = doc.id.clone();

        self.documents
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?
            .push(doc);

        Ok(id)
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .find(|d| d.collection == collection && d.id == id)
            .cloned())
    }

    async fn find_all_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .filter(|d| d.collection == collection && d.field_equals(field, value))
            .cloned()
            .collect())
    }
}
