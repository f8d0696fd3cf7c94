//! Validation unit: the outcome of exactly one attribute evaluation.

use std::sync::Arc;
use std::sync::RwLock;

use crate::error::AttributeError;
use crate::model::WeakModel;
use crate::raw::FieldPatch;
use crate::raw::Message;
use crate::value::AttrValue;

/// State holder for one attribute evaluation.
///
/// Cheap to clone; all clones share the same state (the same pattern as the
/// engine's other shared handles). Stored fields are written only by the
/// result normalizer; every derived reading is computed fresh from current
/// stored fields, so reads never go stale.
#[derive(Debug)]
pub struct ValidationUnit {
    state: Arc<RwLock<UnitState>>,
}

#[derive(Debug)]
struct UnitState {
    model: WeakModel,
    attribute: String,
    is_valid: bool,
    is_validating: bool,
    message: Option<Message>,
    meta: serde_json::Map<String, serde_json::Value>,
}

impl ValidationUnit {
    pub(crate) fn new(model: WeakModel, attribute: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(UnitState {
                model,
                attribute: attribute.into(),
                is_valid: true,
                is_validating: false,
                message: None,
                meta: serde_json::Map::new(),
            })),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&UnitState) -> T) -> T {
        match self.state.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write(&self, f: impl FnOnce(&mut UnitState)) {
        if let Ok(mut guard) = self.state.write() {
            f(&mut guard);
        }
    }

    /// The attribute this unit evaluated.
    pub fn attribute(&self) -> String {
        self.read(|s| s.attribute.clone())
    }

    /// Stored validity.
    pub fn is_valid(&self) -> bool {
        self.read(|s| s.is_valid)
    }

    /// Negation of [`is_valid`](Self::is_valid).
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Whether an async evaluation for this unit is still pending.
    pub fn is_validating(&self) -> bool {
        self.read(|s| s.is_validating)
    }

    /// Negation of [`is_validating`](Self::is_validating).
    pub fn is_not_validating(&self) -> bool {
        !self.is_validating()
    }

    /// Valid and not pending async settlement.
    pub fn is_truly_valid(&self) -> bool {
        self.read(|s| !s.is_validating && s.is_valid)
    }

    /// Stored message, if any.
    pub fn message(&self) -> Option<Message> {
        self.read(|s| s.message.clone())
    }

    /// Stored message coerced to a sequence.
    pub fn messages(&self) -> Vec<String> {
        self.read(|s| s.message.as_ref().map(Message::to_vec).unwrap_or_default())
    }

    /// Validator-attached metadata merged in from field patches.
    pub fn meta(&self) -> serde_json::Map<String, serde_json::Value> {
        self.read(|s| s.meta.clone())
    }

    /// Live read of the attribute value on the model.
    pub fn attr_value(&self) -> Option<AttrValue> {
        let (model, attribute) = self.read(|s| (s.model.clone(), s.attribute.clone()));
        model.upgrade().and_then(|m| m.attribute(&attribute))
    }

    /// Whether the attribute value is present and, when a default value is
    /// discoverable for the attribute, differs from that default.
    pub fn is_dirty(&self) -> bool {
        let (model, attribute) = self.read(|s| (s.model.clone(), s.attribute.clone()));
        let Some(model) = model.upgrade() else {
            return false;
        };
        let Some(value) = model.attribute(&attribute) else {
            return false;
        };
        if !value.is_present() {
            return false;
        }
        match model.default_value(&attribute) {
            Some(default) => value != default,
            None => true,
        }
    }

    /// Error value for this unit: `None` while valid.
    pub fn error(&self) -> Option<AttributeError> {
        self.read(|s| {
            if s.is_valid {
                None
            } else {
                Some(AttributeError::new(s.attribute.clone(), s.message.clone()))
            }
        })
    }

    /// Error value coerced to a sequence.
    pub fn errors(&self) -> Vec<AttributeError> {
        self.error().into_iter().collect()
    }

    /// Sets validity only, leaving the message untouched.
    pub(crate) fn set_valid(&self, is_valid: bool) {
        self.write(|s| s.is_valid = is_valid);
    }

    /// Sets message and invalidity as one atomic pair.
    pub(crate) fn set_invalid(&self, message: Message) {
        self.write(|s| {
            s.message = Some(message);
            s.is_valid = false;
        });
    }

    /// Shallow-merges a field patch onto the stored fields.
    pub(crate) fn merge(&self, patch: FieldPatch) {
        self.write(|s| {
            if let Some(is_valid) = patch.is_valid {
                s.is_valid = is_valid;
            }
            if let Some(message) = patch.message {
                s.message = Some(message);
            }
            s.meta.extend(patch.extra);
        });
    }

    pub(crate) fn set_validating(&self, is_validating: bool) {
        self.write(|s| s.is_validating = is_validating);
    }
}

impl Clone for ValidationUnit {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}
