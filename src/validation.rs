use std::fmt;

use serde::Serialize;

/// A single rejected input field, shaped for display next to the form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input that was well-formed enough to read but violated a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn field(message: impl Into<String>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: vec![FieldError::new(field, reason)],
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }

    #[cfg(test)]
    pub(crate) fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for (i, err) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{} {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_fields() {
        let err = ValidationError::with_errors(
            "Validation error",
            vec![
                FieldError::new("name", "is required"),
                FieldError::new("email", "is invalid"),
            ],
        );
        assert_eq!(err.to_string(), "Validation error: name is required, email is invalid");
        assert_eq!(err.fields().collect::<Vec<_>>(), ["name", "email"]);
    }

    #[test]
    fn display_without_fields() {
        assert_eq!(ValidationError::new("Invalid apartment ID").to_string(), "Invalid apartment ID");
    }
}
