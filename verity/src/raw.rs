//! Raw validator results and their normalization vocabulary.

use std::future::Future;

use futures::FutureExt;
pub use futures::future::BoxFuture;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ValidationError;
use crate::validations::ModelValidations;

/// A validation message: a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// One message.
    Single(String),
    /// Several messages, in order.
    Many(Vec<String>),
}

impl Message {
    /// First message, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Message::Single(s) => Some(s),
            Message::Many(v) => v.first().map(String::as_str),
        }
    }

    /// All messages as an owned sequence.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Message::Single(s) => vec![s.clone()],
            Message::Many(v) => v.clone(),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Single(s) => f.write_str(s),
            Message::Many(v) => f.write_str(&v.join("; ")),
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Single(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Single(s)
    }
}

impl From<Vec<String>> for Message {
    fn from(v: Vec<String>) -> Self {
        Message::Many(v)
    }
}

/// A structured raw result: a shallow patch of validation unit fields.
///
/// `isValid` and `message` are merged onto the unit when present; any other
/// keys are kept as attached metadata. A patch that carries nothing is
/// treated as the null-equivalent result, not as a no-op merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    /// Validity to set, if any.
    pub is_valid: Option<bool>,
    /// Message to set, if any.
    pub message: Option<Message>,
    /// Any additional validator-defined fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FieldPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.is_valid.is_none() && self.message.is_none() && self.extra.is_empty()
    }

    /// Sets the validity field.
    pub fn valid(mut self, is_valid: bool) -> Self {
        self.is_valid = Some(is_valid);
        self
    }

    /// Sets the message field.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The value a validator returns (or resolves to), as a closed set of
/// recognized shapes. Anything a validator could produce outside this set is
/// rejected by [`RawResult::from_json`] instead of being coerced.
#[derive(Debug, Clone)]
pub enum RawResult {
    /// No result; equivalent to `Flag(false)`.
    Absent,
    /// Plain validity flag. Leaves any prior message untouched.
    Flag(bool),
    /// Failure message; implies invalidity.
    Message(String),
    /// Shallow field patch.
    Fields(FieldPatch),
    /// Full validation result of a single related model (belongs-to).
    Nested(ModelValidations),
    /// Full validation results of a model collection (has-many).
    NestedMany(Vec<ModelValidations>),
}

impl RawResult {
    /// Decodes a dynamic JSON value into a raw result.
    ///
    /// Null, booleans, strings, and objects map onto their tagged
    /// counterparts; every other shape is a validator bug and fails fast
    /// with [`ValidationError::UnrecognizedShape`].
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        match value {
            serde_json::Value::Null => Ok(RawResult::Absent),
            serde_json::Value::Bool(b) => Ok(RawResult::Flag(b)),
            serde_json::Value::String(s) => Ok(RawResult::Message(s)),
            serde_json::Value::Object(_) => {
                let patch = serde_json::from_value(value).map_err(|err| {
                    ValidationError::UnrecognizedShape {
                        found: format!("mapping ({err})"),
                    }
                })?;
                Ok(RawResult::Fields(patch))
            }
            serde_json::Value::Number(n) => Err(ValidationError::UnrecognizedShape {
                found: format!("number {n}"),
            }),
            serde_json::Value::Array(_) => Err(ValidationError::UnrecognizedShape {
                found: "array".to_string(),
            }),
        }
    }
}

impl From<bool> for RawResult {
    fn from(b: bool) -> Self {
        RawResult::Flag(b)
    }
}

impl From<&str> for RawResult {
    fn from(s: &str) -> Self {
        RawResult::Message(s.to_string())
    }
}

impl From<String> for RawResult {
    fn from(s: String) -> Self {
        RawResult::Message(s)
    }
}

impl From<FieldPatch> for RawResult {
    fn from(patch: FieldPatch) -> Self {
        RawResult::Fields(patch)
    }
}

impl From<ModelValidations> for RawResult {
    fn from(validations: ModelValidations) -> Self {
        RawResult::Nested(validations)
    }
}

impl From<Vec<ModelValidations>> for RawResult {
    fn from(validations: Vec<ModelValidations>) -> Self {
        RawResult::NestedMany(validations)
    }
}

/// What a single validator invocation produced: an immediate raw result or
/// a future that resolves to one.
pub enum ValidatorOutput {
    /// Result available now.
    Ready(RawResult),
    /// Result still being computed. Rejection is fatal and propagates to
    /// the caller of `validate()`.
    Pending(BoxFuture<'static, Result<RawResult, ValidationError>>),
}

impl ValidatorOutput {
    /// Wraps an immediate result.
    pub fn ready(raw: impl Into<RawResult>) -> Self {
        Self::Ready(raw.into())
    }

    /// Wraps a pending result.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<RawResult, ValidationError>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }
}

impl std::fmt::Debug for ValidatorOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(raw) => f.debug_tuple("Ready").field(raw).finish(),
            Self::Pending(_) => f.debug_tuple("Pending").finish_non_exhaustive(),
        }
    }
}
