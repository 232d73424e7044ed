// SQLite document store
//
// One `documents` table holds every collection. Fields are stored as JSON
// text and queried with json_extract. `seq` is the insertion counter and
// defines retrieval order. `idempotency_hash` lets importers re-run without
// duplicating rows (same idea as a CSV import that skips rows it has seen).

use super::{Collection, DataStore, Document};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "SELECT id, fields, created_at FROM documents";

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> StoreResult<()> {
    // WAL for crash recovery and concurrent readers
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            collection TEXT NOT NULL,
            fields TEXT NOT NULL,
            created_at TEXT NOT NULL,
            idempotency_hash TEXT UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection_id ON documents(collection, id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// WRITES (seeding only - the API never writes)
// ============================================================================

/// Insert a document. Returns `false` when `idempotency_hash` was already
/// present, in which case nothing is written.
pub fn insert_document(
    conn: &Connection,
    doc: &Document,
    idempotency_hash: Option<&str>,
) -> StoreResult<bool> {
    let fields_json = serde_json::to_string(&doc.fields)?;

    let result = conn.execute(
        "INSERT INTO documents (id, collection, fields, created_at, idempotency_hash)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            doc.id,
            doc.collection.as_str(),
            fields_json,
            doc.created_at.to_rfc3339(),
            idempotency_hash,
        ],
    );

    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation && idempotency_hash.is_some() =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Id of the document previously inserted under `idempotency_hash`
pub fn find_id_by_hash(conn: &Connection, idempotency_hash: &str) -> StoreResult<Option<String>> {
    let id = conn
        .query_row(
            "SELECT id FROM documents WHERE idempotency_hash = ?1",
            [idempotency_hash],
            |row| row.get(0),
        )
        .optional()?;

    Ok(id)
}

pub fn count_documents(conn: &Connection, collection: Collection) -> StoreResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        [collection.as_str()],
        |row| row.get(0),
    )?;

    Ok(count)
}

// ============================================================================
// READS
// ============================================================================

pub fn get_document(
    conn: &Connection,
    collection: Collection,
    id: &str,
) -> StoreResult<Option<Document>> {
    let sql = format!("{} WHERE collection = ?1 AND id = ?2", SELECT_COLUMNS);
    let doc = conn
        .query_row(&sql, params![collection.as_str(), id], |row| {
            row_to_document(row, collection)
        })
        .optional()?;

    Ok(doc)
}

pub fn find_documents(
    conn: &Connection,
    collection: Collection,
    field: &str,
    value: &str,
    limit: Option<usize>,
) -> StoreResult<Vec<Document>> {
    let mut sql = format!(
        "{} WHERE collection = ?1 AND json_extract(fields, ?2) = ?3 ORDER BY seq",
        SELECT_COLUMNS
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let documents = stmt
        .query_map(params![collection.as_str(), json_path(field), value], |row| {
            row_to_document(row, collection)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(documents)
}

/// JSON path for a top-level key, quoted so odd key names stay literal
fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

fn row_to_document(row: &Row<'_>, collection: Collection) -> rusqlite::Result<Document> {
    let fields_json: String = row.get(1)?;
    let created_at_str: String = row.get(2)?;

    let fields = serde_json::from_str(&fields_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Document {
        id: row.get(0)?,
        collection,
        fields,
        created_at,
    })
}

// ============================================================================
// ASYNC STORE
// ============================================================================

/// Shared connection; queries run on the blocking pool
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Direct access for synchronous callers (seeding, counting)
    pub fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }

    async fn run<T, F>(&self, query: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))?;
            query(&guard)
        })
        .await?
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn find_one_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Document>> {
        let field = field.to_string();
        let value = value.to_string();

        let found = self
            .run(move |conn| find_documents(conn, collection, &field, &value, Some(1)))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let id = id.to_string();
        self.run(move |conn| get_document(conn, collection, &id)).await
    }

    async fn find_all_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        let field = field.to_string();
        let value = value.to_string();
        self.run(move |conn| find_documents(conn, collection, &field, &value, None))
            .await
    }
}
