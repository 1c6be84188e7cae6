use log::{info, warn};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::error::{StoreError, StoreResult};

/// Insert a new credential. The row is committed before this returns, so a
/// crash right after registration keeps the account.
pub fn register(conn: &Connection, username: &str, password: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![username, password],
    )
    .map_err(|err| map_unique_constraint(err, username))?;

    info!("registered user {username}");
    Ok(())
}

/// True when a credential with exactly this username and password exists.
/// SQLite's default BINARY collation keeps the comparison case-sensitive.
pub fn verify(conn: &Connection, username: &str, password: &str) -> StoreResult<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 AND password = ?2)",
        params![username, password],
        |row| row.get(0),
    )?;

    if found {
        info!("user {username} signed in");
    } else {
        warn!("rejected sign-in for {username}");
    }
    Ok(found)
}

/// The only constraint on `users` besides NOT NULL is the unique username.
fn map_unique_constraint(err: SqlError, username: &str) -> StoreError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        StoreError::AlreadyExists(username.to_string())
    } else {
        err.into()
    }
}
