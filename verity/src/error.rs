//! Error types

use thiserror::Error;

use crate::raw::Message;

/// Errors surfaced by the validation engine itself.
///
/// Validator outcomes (invalid attributes) are not errors; they are part of
/// the result state. These variants cover engine misuse and fatal validator
/// failures only.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A dynamically decoded raw result had a shape no validator is allowed
    /// to produce. Surfaced immediately instead of coercing, so validator
    /// bugs show up at the call site.
    #[error("unrecognized raw validation result shape: {found}")]
    UnrecognizedShape {
        /// Description of the offending shape.
        found: String,
    },

    /// An async validator rejected instead of resolving. Fatal and
    /// propagated to the caller of `validate()`, never retried.
    #[error("validator for '{attribute}' rejected: {message}")]
    Rejected {
        /// Attribute whose validator rejected.
        attribute: String,
        /// Failure description.
        message: String,
    },

    /// The model behind a validation handle was dropped before the
    /// requested operation could run.
    #[error("model was dropped before validation could run")]
    ModelDropped,
}

impl ValidationError {
    /// Creates a `Rejected` error for the given attribute.
    pub fn rejected(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Error information for a single invalid attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    /// The attribute that failed validation.
    pub attribute: String,
    /// Validation message, if the validator supplied one.
    pub message: Option<Message>,
}

impl AttributeError {
    /// Creates a new attribute error.
    pub fn new(attribute: impl Into<String>, message: Option<Message>) -> Self {
        Self {
            attribute: attribute.into(),
            message,
        }
    }
}

impl std::fmt::Display for AttributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.attribute, message),
            None => write!(f, "{} is invalid", self.attribute),
        }
    }
}
