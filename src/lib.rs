//! Core library surface for the Student Records TUI application.
//!
//! Two stores sit behind the UI: an SQLite credential table that gates entry
//! and a CSV-backed student table that is rewritten on every change.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod records;
pub mod session;
pub mod ui;

pub use config::AppPaths;
pub use db::open_user_db;
pub use error::{StoreError, StoreResult};
pub use models::{Credential, StudentRecord};
pub use records::RecordStore;
pub use session::Session;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
