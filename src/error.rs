//! Error taxonomy shared by the credential and record stores. The UI layer
//! wraps these in `anyhow` and surfaces the message in the footer, so every
//! variant carries enough context to stand on its own.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was left empty.
    #[error("{field} is required.")]
    Validation { field: &'static str },

    /// Carries the rejected username for logging; the message stays generic.
    #[error("Username already exists.")]
    AlreadyExists(String),

    /// Position does not address a record in the current sequence.
    #[error("No student at position {position} (table holds {len}).")]
    OutOfRange { position: usize, len: usize },

    #[error("students file line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("file error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
