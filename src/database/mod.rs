pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;

/// Opens the app database, creating its directory and schema if needed
pub fn init_database(db_path: &Path) -> Result<Connection, AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;
    schema::init_schema(&conn)?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_database_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("photodrop.db");

        let conn = init_database(&db_path).unwrap();
        assert!(db_path.exists());

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
