use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MercantilError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MercantilError>;

/// Field name → messages. Keys are the wire (camelCase) field names so the same
/// map can hold errors reported by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(MercantilError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        errors.add("unitPrice", "must be a number");
        errors.add("productName", "is required");
        errors.add("unitPrice", "must not be negative");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "productName: is required; unitPrice: must be a number, must not be negative"
        );
    }

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
