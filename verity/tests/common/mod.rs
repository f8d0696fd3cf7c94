//! Shared test model and validators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::Weak;

use verity::prelude::*;

/// Minimal validatable model: a bag of dynamic attributes with optional
/// declared defaults.
pub struct TestUser {
    id: ModelId,
    attrs: RwLock<HashMap<String, AttrValue>>,
    defaults: RwLock<HashMap<String, AttrValue>>,
    validations: ModelValidations,
}

impl TestUser {
    pub fn set(&self, name: &str, value: impl Into<AttrValue>) {
        self.attrs
            .write()
            .expect("attrs lock")
            .insert(name.to_string(), value.into());
    }

    pub fn set_default(&self, name: &str, value: impl Into<AttrValue>) {
        self.defaults
            .write()
            .expect("defaults lock")
            .insert(name.to_string(), value.into());
    }
}

impl std::fmt::Debug for TestUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestUser")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Validatable for TestUser {
    fn model_id(&self) -> ModelId {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.attrs.read().expect("attrs lock").get(name).cloned()
    }

    fn default_value(&self, name: &str) -> Option<AttrValue> {
        self.defaults
            .read()
            .expect("defaults lock")
            .get(name)
            .cloned()
    }

    fn validations(&self) -> ModelValidations {
        self.validations.clone()
    }
}

/// Builds a user whose validations are wired to the given rules.
pub fn build_user(rules: ValidationRules) -> Arc<TestUser> {
    Arc::new_cyclic(|weak: &Weak<TestUser>| {
        let id = ModelId::new();
        let model: WeakModel = weak.clone();
        TestUser {
            id,
            attrs: RwLock::new(HashMap::new()),
            defaults: RwLock::new(HashMap::new()),
            validations: ModelValidations::new(model, id, &rules),
        }
    })
}

/// Upcasts a concrete test model to the engine's model handle.
pub fn handle(user: &Arc<TestUser>) -> ModelHandle {
    user.clone()
}

/// Presence validator matching the engine's raw-result contract: a message
/// when the value is missing, `true` otherwise.
pub fn presence(
    value: Option<AttrValue>,
    _options: &Options,
    _model: &ModelHandle,
    attribute: &str,
) -> ValidatorOutput {
    if value.as_ref().is_some_and(AttrValue::is_present) {
        ValidatorOutput::ready(true)
    } else {
        ValidatorOutput::ready(format!("{attribute} should be present"))
    }
}

/// Belongs-to validator: validates the related model and hands back its
/// full validation result.
pub fn belongs_to(
    value: Option<AttrValue>,
    _options: &Options,
    _model: &ModelHandle,
    _attribute: &str,
) -> ValidatorOutput {
    match value {
        Some(AttrValue::Model(friend)) => {
            let validations = friend.validations();
            let _ = validations.validate_sync();
            ValidatorOutput::ready(validations)
        }
        _ => ValidatorOutput::ready(RawResult::Absent),
    }
}

/// Has-many validator: validates every related model and hands back the
/// sequence of their full validation results.
pub fn has_many(
    value: Option<AttrValue>,
    _options: &Options,
    _model: &ModelHandle,
    _attribute: &str,
) -> ValidatorOutput {
    match value {
        Some(AttrValue::Models(friends)) => {
            let results: Vec<ModelValidations> = friends
                .iter()
                .map(|friend| {
                    let validations = friend.validations();
                    let _ = validations.validate_sync();
                    validations
                })
                .collect();
            ValidatorOutput::ready(results)
        }
        _ => ValidatorOutput::ready(RawResult::Absent),
    }
}

/// Rules used by most relationship tests: first and last name presence.
pub fn name_rules() -> ValidationRules {
    ValidationRules::new()
        .attr("firstName", presence)
        .attr("lastName", presence)
}
