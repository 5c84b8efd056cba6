use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Open (creating if needed) the SQLite file at `db_path` and make sure the
/// `articles` table exists. Calling this repeatedly against the same file is
/// harmless; existing rows are left untouched.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_tables(&conn)?;
    info!(path = %db_path.display(), "article store ready");

    Ok(conn)
}

/// Run the schema DDL against an already open connection.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            tags TEXT,
            image_path TEXT
        )",
        [],
    )
    .context("failed to create articles table")?;

    Ok(())
}
