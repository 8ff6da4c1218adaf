//! Document store for photo records
//!
//! Records are kept as JSON documents grouped by collection, which is all the
//! upload path needs: append one document per upload, never update it.

use crate::models::PhotoRecord;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

/// Metadata operation errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Append-only metadata backend
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Append one record to `collection` and return its document id
    async fn append(&self, collection: &str, record: &PhotoRecord) -> MetadataResult<String>;
}

/// Initialize the document store schema
pub fn init_metadata_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS metadata_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM metadata_schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_metadata_schema_v1(conn)?;
        conn.execute("INSERT INTO metadata_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

fn create_metadata_schema_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            owner_id TEXT,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection_owner
         ON documents(collection, owner_id, created_at)",
        [],
    )?;

    Ok(())
}

/// SQLite-backed document store
pub struct SqliteMetadataStore {
    conn: Mutex<Connection>,
}

impl SqliteMetadataStore {
    /// Wrap an open connection, creating the schema if needed
    pub fn new(conn: Connection) -> MetadataResult<Self> {
        init_metadata_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> MetadataResult<Self> {
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> MetadataResult<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn lock(&self) -> MetadataResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| MetadataError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Records of one owner, newest first
    pub fn list(&self, collection: &str, owner_id: &str) -> MetadataResult<Vec<PhotoRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT body FROM documents
             WHERE collection = ?1 AND owner_id = ?2
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let bodies = stmt
            .query_map(params![collection, owner_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(MetadataError::from))
            .collect()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> MetadataResult<usize> {
        let conn = self.lock()?;
        let count: usize = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[async_trait]
impl MetadataClient for SqliteMetadataStore {
    async fn append(&self, collection: &str, record: &PhotoRecord) -> MetadataResult<String> {
        let id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(record)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (id, collection, owner_id, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, collection, record.owner_id, body, record.created_at],
        )?;

        log::debug!("Appended document {} to '{}'", id, collection);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, title: &str, created_at: &str) -> PhotoRecord {
        PhotoRecord {
            owner_id: owner.to_string(),
            url: format!("https://example.com/{}", title),
            title: title.to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_metadata_schema(&conn).unwrap();
        init_metadata_schema(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM metadata_schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let store = SqliteMetadataStore::open_in_memory().unwrap();

        let first = store
            .append("photos", &record("u1", "cat.jpg", "2025-01-01T10:00:00.000Z"))
            .await
            .unwrap();
        let second = store
            .append("photos", &record("u1", "dog.png", "2025-01-02T10:00:00.000Z"))
            .await
            .unwrap();
        assert_ne!(first, second);

        let listed = store.list("photos", "u1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "dog.png");
        assert_eq!(listed[1].title, "cat.jpg");
    }

    #[tokio::test]
    async fn test_list_is_scoped_by_owner_and_collection() {
        let store = SqliteMetadataStore::open_in_memory().unwrap();

        store
            .append("photos", &record("u1", "a.jpg", "2025-01-01T10:00:00.000Z"))
            .await
            .unwrap();
        store
            .append("photos", &record("u2", "b.jpg", "2025-01-01T11:00:00.000Z"))
            .await
            .unwrap();
        store
            .append("archive", &record("u1", "c.jpg", "2025-01-01T12:00:00.000Z"))
            .await
            .unwrap();

        let u1 = store.list("photos", "u1").unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].title, "a.jpg");
        assert_eq!(store.count("photos").unwrap(), 2);
        assert_eq!(store.count("archive").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_appended_body_round_trips() {
        let store = SqliteMetadataStore::open_in_memory().unwrap();
        let original = record("u1", "cat.jpg", "2025-01-01T10:00:00.000Z");

        store.append("photos", &original).await.unwrap();

        assert_eq!(store.list("photos", "u1").unwrap(), vec![original]);
    }
}
