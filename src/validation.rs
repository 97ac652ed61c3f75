//! Client-side checks run before a create or update is submitted.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::model::{ApplicationStatus, JobApplicationUpdate, NewJobApplication};

pub const MIN_TEXT_LEN: usize = 2;
pub const MAX_TEXT_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    CompanyName,
    Position,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::CompanyName => "Company name",
            Field::Position => "Position",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::CompanyName => f.write_str("companyName"),
            Field::Position => f.write_str("position"),
        }
    }
}

/// Per-field messages. Non-empty whenever returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid job application: {}", summary(.0))]
pub struct FieldErrors(pub BTreeMap<Field, String>);

fn summary(errors: &BTreeMap<Field, String>) -> String {
    errors.values().cloned().collect::<Vec<_>>().join("; ")
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &String)> {
        self.0.iter()
    }
}

pub fn validate_text(field: Field, value: &str) -> Option<String> {
    let len = value.trim().chars().count();
    if len == 0 {
        Some(format!("{} is required", field.label()))
    } else if len < MIN_TEXT_LEN {
        Some(format!(
            "{} must be at least {MIN_TEXT_LEN} characters",
            field.label()
        ))
    } else if len > MAX_TEXT_LEN {
        Some(format!(
            "{} must be at most {MAX_TEXT_LEN} characters",
            field.label()
        ))
    } else {
        None
    }
}

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationForm {
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
}

/// Form data that passed validation, with text fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
}

impl JobApplicationForm {
    pub fn validate(&self) -> Result<ValidForm, FieldErrors> {
        let mut errors = BTreeMap::new();
        if let Some(msg) = validate_text(Field::CompanyName, &self.company_name) {
            errors.insert(Field::CompanyName, msg);
        }
        if let Some(msg) = validate_text(Field::Position, &self.position) {
            errors.insert(Field::Position, msg);
        }
        if !errors.is_empty() {
            return Err(FieldErrors(errors));
        }
        Ok(ValidForm {
            company_name: self.company_name.trim().to_string(),
            position: self.position.trim().to_string(),
            status: self.status,
        })
    }
}

impl From<ValidForm> for NewJobApplication {
    fn from(form: ValidForm) -> Self {
        Self {
            company_name: form.company_name,
            position: form.position,
            status: form.status,
        }
    }
}

impl From<ValidForm> for JobApplicationUpdate {
    fn from(form: ValidForm) -> Self {
        Self {
            company_name: form.company_name,
            position: form.position,
            status: form.status,
        }
    }
}
