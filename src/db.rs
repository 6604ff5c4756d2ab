use rusqlite::Connection;
use std::path::Path;

use crate::error::{Error, Result};

pub fn open_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path).map_err(|source| Error::DatabaseOpen {
        path: db_path.to_path_buf(),
        source,
    })?;
    init_schema(&conn)?;
    tracing::debug!(path = %db_path.display(), "opened student database");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            st_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            class TEXT NOT NULL,
            marks REAL NOT NULL,
            gender TEXT NOT NULL,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_class ON students(class)",
        [],
    )?;
    Ok(())
}
