//! Domain models passed between the stores and the TUI. Both types stay plain
//! data holders; the constructors are the caller-side validation step, so the
//! stores can trust whatever they are handed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A login pair as typed on the login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    /// Reject empty fields. Both values are kept exactly as typed, so a
    /// stray space is part of the password.
    pub fn new(username: &str, password: &str) -> StoreResult<Self> {
        Ok(Self {
            username: non_empty("Username", username)?,
            password: non_empty("Password", password)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the student table. The position inside the record store is the
/// only identity a record has.
pub struct StudentRecord {
    pub name: String,
    pub email: String,
    /// Stored and displayed in plain text.
    pub password: String,
}

impl StudentRecord {
    /// Trim every field and reject the record if any of them ends up empty.
    pub fn new(name: &str, email: &str, password: &str) -> StoreResult<Self> {
        Ok(Self {
            name: required("Name", name)?,
            email: required("Email", email)?,
            password: required("Password", password)?,
        })
    }

    /// Name of the first blank column, used when vetting rows read from disk.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else if self.password.trim().is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

fn non_empty(field: &'static str, value: &str) -> StoreResult<String> {
    if value.is_empty() {
        Err(StoreError::Validation { field })
    } else {
        Ok(value.to_string())
    }
}

fn required(field: &'static str, value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StoreError::Validation { field })
    } else {
        Ok(trimmed.to_string())
    }
}
