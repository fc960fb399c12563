//! Parsing error types for listing and detail page extraction
//!
//! Every variant aborts the run; there is no recovery path for markup
//! that does not match the configured selectors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in {context}")]
    RequiredFieldMissing { field: String, context: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Field '{field}' has non-numeric value '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },

    #[error("No specification table found on {url}")]
    TableNotFound { url: String },

    #[error("Specification table on {url} has no rows")]
    EmptyTable { url: String },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_number(field: &str, value: &str) -> Self {
        Self::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
