use anyhow::{anyhow, Result};
use ratatui::text::Line;

use crate::error::StoreResult;
use crate::models::{Credential, StudentRecord};

use super::helpers::field_line;

/// Internal representation of the sign-in form.
#[derive(Default, Clone)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) active: LoginField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginForm {
    /// Swap focus between the username and password fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            LoginField::Username => self.username.push(ch),
            LoginField::Password => self.password.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Both fields are required; the sign-in screen reports them together.
    pub(crate) fn parse_inputs(&self) -> Result<Credential> {
        Credential::new(&self.username, &self.password)
            .map_err(|_| anyhow!("All fields are required."))
    }

    pub(crate) fn build_line(&self, field_name: &str, field: LoginField) -> Line<'static> {
        match field {
            LoginField::Username => field_line(
                field_name,
                &self.username,
                self.active == LoginField::Username,
                false,
            ),
            LoginField::Password => field_line(
                field_name,
                &self.password,
                self.active == LoginField::Password,
                true,
            ),
        }
    }

    pub(crate) fn value_len(&self, field: LoginField) -> usize {
        match field {
            LoginField::Username => self.username.chars().count(),
            LoginField::Password => self.password.chars().count(),
        }
    }
}

/// Form state for adding or editing a student.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Email,
    Password,
}

impl StudentForm {
    /// Populate the form from the record being edited.
    pub(crate) fn from_record(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            password: record.password.clone(),
            active: StudentField::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Email,
            StudentField::Email => StudentField::Password,
            StudentField::Password => StudentField::Name,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Password,
            StudentField::Email => StudentField::Name,
            StudentField::Password => StudentField::Email,
        };
    }

    /// Wipe every field and return focus to the name.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.active_value_mut().push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.active_value_mut().pop();
    }

    /// Validate and trim the inputs before they reach the record store.
    pub(crate) fn parse_inputs(&self) -> StoreResult<StudentRecord> {
        StudentRecord::new(&self.name, &self.email, &self.password)
    }

    pub(crate) fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let masked = field == StudentField::Password;
        field_line(field_name, self.value(field), self.active == field, masked)
    }

    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::Password => &self.password,
        }
    }

    fn active_value_mut(&mut self) -> &mut String {
        match self.active {
            StudentField::Name => &mut self.name,
            StudentField::Email => &mut self.email,
            StudentField::Password => &mut self.password,
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmStudentDelete {
    pub(crate) position: usize,
    pub(crate) student: StudentRecord,
}
