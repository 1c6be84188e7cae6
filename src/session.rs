use std::path::PathBuf;

use log::info;

use crate::error::StoreResult;
use crate::records::RecordStore;

/// State owned by an authenticated user for the current run. Dropping it is
/// the logout; the students file keeps whatever the last save wrote.
#[derive(Debug)]
pub struct Session {
    username: String,
    pub store: RecordStore,
}

impl Session {
    /// Start a session for an already-verified `username`, loading the shared
    /// student table.
    pub fn begin(
        username: impl Into<String>,
        students_csv: impl Into<PathBuf>,
    ) -> StoreResult<Self> {
        let username = username.into();
        let store = RecordStore::open(students_csv)?;
        info!("session started for {username}");
        Ok(Self { username, store })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Consume the session, handing back the username for the status line.
    pub fn end(self) -> String {
        info!("session ended for {}", self.username);
        self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentRecord;

    #[test]
    fn logout_leaves_saved_table_for_the_next_session() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("students.csv");

        let mut first = Session::begin("alice", &csv).unwrap();
        first
            .store
            .add(StudentRecord::new("Bob", "b@x.com", "pw").unwrap())
            .unwrap();
        assert_eq!(first.end(), "alice");

        // Records are not scoped per user.
        let second = Session::begin("carol", &csv).unwrap();
        assert_eq!(second.username(), "carol");
        assert_eq!(second.store.len(), 1);
        assert_eq!(second.store.list()[0].name, "Bob");
    }

    #[test]
    fn malformed_table_blocks_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("students.csv");
        std::fs::write(&csv, "name,email,password\nBob,b@x.com\n").unwrap();

        assert!(Session::begin("alice", &csv).is_err());
    }
}
