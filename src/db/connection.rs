use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreResult;

/// Open the credential database at `path`, creating its directory and the
/// `users` table when missing.
pub fn open_user_db(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Create the `users` table if it does not exist yet. Safe to run repeatedly.
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
