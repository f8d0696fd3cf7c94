//! Value enum for dynamic attribute values

use chrono::DateTime;
use chrono::Utc;

use crate::model::ModelHandle;

/// A dynamic value read from a model attribute.
///
/// The engine never interprets attribute values itself; it hands them to
/// validators and uses them for dirty checks. Relationship attributes carry
/// model handles so belongs-to and has-many validators can reach the related
/// models' own validation state.
///
/// # Example
///
/// ```
/// use verity::value::AttrValue;
///
/// let name = AttrValue::from("Contoso");
/// assert_eq!(name.as_str(), Some("Contoso"));
///
/// let empty = AttrValue::Null;
/// assert!(empty.is_null());
/// ```
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// Single related model (belongs-to).
    Model(ModelHandle),
    /// Collection of related models (has-many).
    Models(Vec<ModelHandle>),
    /// Fallback for structured values.
    Json(serde_json::Value),
}

impl AttrValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Returns `true` if this value counts as present for dirty checks.
    pub fn is_present(&self) -> bool {
        !self.is_null()
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::String(_) => "string",
            AttrValue::DateTime(_) => "datetime",
            AttrValue::Model(_) => "model",
            AttrValue::Models(_) => "models",
            AttrValue::Json(_) => "json",
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the related model handle, if this is a belongs-to value.
    pub fn as_model(&self) -> Option<&ModelHandle> {
        match self {
            AttrValue::Model(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the related model handles, if this is a has-many value.
    pub fn as_models(&self) -> Option<&[ModelHandle]> {
        match self {
            AttrValue::Models(m) => Some(m),
            _ => None,
        }
    }
}

// Model handles compare by identity, everything else by value.
impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Null, AttrValue::Null) => true,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Int(a), AttrValue::Int(b)) => a == b,
            (AttrValue::Float(a), AttrValue::Float(b)) => a == b,
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::DateTime(a), AttrValue::DateTime(b)) => a == b,
            (AttrValue::Model(a), AttrValue::Model(b)) => a.model_id() == b.model_id(),
            (AttrValue::Models(a), AttrValue::Models(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.model_id() == y.model_id())
            }
            (AttrValue::Json(a), AttrValue::Json(b)) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(v: DateTime<Utc>) -> Self {
        AttrValue::DateTime(v)
    }
}

impl From<ModelHandle> for AttrValue {
    fn from(v: ModelHandle) -> Self {
        AttrValue::Model(v)
    }
}

impl From<Vec<ModelHandle>> for AttrValue {
    fn from(v: Vec<ModelHandle>) -> Self {
        AttrValue::Models(v)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(v: serde_json::Value) -> Self {
        AttrValue::Json(v)
    }
}
