//! On-disk layout of the application data. Everything lives in one directory
//! so a user can back up or wipe the whole state in one go.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "STUDENT_RECORDS_HOME";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records";
/// SQLite file holding the credential table.
const USER_DB_FILE_NAME: &str = "users.db";
/// CSV file holding the student table.
const STUDENTS_FILE_NAME: &str = "students.csv";
/// Log output; the terminal itself is owned by the TUI.
const LOG_FILE_NAME: &str = "student-records.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub user_db: PathBuf,
    pub students_csv: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    /// Pick the data directory from `STUDENT_RECORDS_HOME`, falling back to
    /// `~/.student-records`.
    pub fn resolve() -> Result<Self> {
        match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::in_dir(PathBuf::from(dir))),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
            }
        }
    }

    /// Lay out the fixed file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Self {
            user_db: data_dir.join(USER_DB_FILE_NAME),
            students_csv: data_dir.join(STUDENTS_FILE_NAME),
            log_file: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "failed to create data directory {}",
                self.data_dir.display()
            )
        })
    }
}
