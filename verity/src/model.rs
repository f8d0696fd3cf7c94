//! Validatable trait for models that carry validation state.

use std::sync::Arc;
use std::sync::Weak;

use uuid::Uuid;

use crate::validations::ModelValidations;
use crate::value::AttrValue;

/// Shared handle to a validatable model.
pub type ModelHandle = Arc<dyn Validatable>;

/// Weak handle to a validatable model. The engine never owns models; every
/// back-reference from validation state to a model is weak.
pub type WeakModel = Weak<dyn Validatable>;

/// Stable identity of a model instance.
///
/// Cycle detection during aggregate traversal works on model identities, not
/// on positions in any collection, since models are externally owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(Uuid);

impl ModelId {
    /// Creates a fresh model identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Trait for objects the engine can validate.
///
/// This is the boundary to the host object system: the engine only ever
/// reads attributes through it and never mutates the model.
pub trait Validatable: std::fmt::Debug + Send + Sync {
    /// Stable identity of this model instance.
    fn model_id(&self) -> ModelId;

    /// Current value of the named attribute, if set.
    fn attribute(&self, name: &str) -> Option<AttrValue>;

    /// Declared default value for the named attribute, used by dirty
    /// checks. Models without discoverable defaults keep the blanket
    /// implementation.
    fn default_value(&self, _name: &str) -> Option<AttrValue> {
        None
    }

    /// The model-level validation aggregate for this model.
    fn validations(&self) -> ModelValidations;
}
