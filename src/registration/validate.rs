//! Per-field synchronous validation rules

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;
pub const USERNAME_MIN: usize = 4;
pub const PASSWORD_MIN: usize = 6;

/// Loose host/URL shape: optional scheme, dotted host, optional path
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(https?://)?[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+(:\d+)?(/\S*)?$")
        .expect("website pattern is valid")
});

/// A single field-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All failures found in one commit attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for one field, for inline display under that input
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn required(field: &'static str, value: &str, message: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, message))
    } else {
        Ok(())
    }
}

pub fn min_len(
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) -> Result<(), ValidationError> {
    if char_len(value) < min {
        Err(ValidationError::new(field, message))
    } else {
        Ok(())
    }
}

pub fn max_len(
    field: &'static str,
    value: &str,
    max: usize,
    message: &str,
) -> Result<(), ValidationError> {
    if char_len(value) > max {
        Err(ValidationError::new(field, message))
    } else {
        Ok(())
    }
}

pub fn company_name(value: &str) -> Result<(), ValidationError> {
    required("companyName", value, "Company name is required")
}

/// 10..=500 characters inclusive
pub fn description(value: &str) -> Result<(), ValidationError> {
    min_len(
        "description",
        value,
        DESCRIPTION_MIN,
        "Please provide at least 10 characters",
    )?;
    max_len(
        "description",
        value,
        DESCRIPTION_MAX,
        "Description too long",
    )
}

/// Characters left before the description limit (negative when over)
pub fn description_remaining(value: &str) -> i64 {
    DESCRIPTION_MAX as i64 - char_len(value) as i64
}

/// Empty is fine; anything else has to look roughly like a web address
pub fn website(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || WEBSITE_RE.is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "website",
            "Please enter a valid website (e.g., www.acme.com)",
        ))
    }
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    min_len(
        "username",
        value,
        USERNAME_MIN,
        "Username must be at least 4 characters",
    )
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    min_len(
        "password",
        value,
        PASSWORD_MIN,
        "Password must be at least 6 characters",
    )
}
