//! Rule declarations: the boundary to the rule-definition layer.
//!
//! The rule DSL itself lives outside this crate. What crosses the boundary
//! is one callable per declared (attribute, validator) pair, accepting
//! `(value, options, model, attribute)` and producing a
//! [`ValidatorOutput`](crate::raw::ValidatorOutput).

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ModelHandle;
use crate::raw::ValidatorOutput;
use crate::value::AttrValue;

/// Type alias for boxed validator callables.
pub type ValidateFn =
    Box<dyn Fn(Option<AttrValue>, &Options, &ModelHandle, &str) -> ValidatorOutput + Send + Sync>;

/// Options bag passed through to a validator untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options(serde_json::Map<String, serde_json::Value>);

impl Options {
    /// Creates an empty options bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Reads an option.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Reads a boolean option.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(serde_json::Value::as_bool)
    }

    /// Reads a string option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(serde_json::Value::as_str)
    }

    /// Reads an integer option.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(serde_json::Value::as_i64)
    }
}

/// One declared (attribute, validator) pair.
pub struct Rule {
    attribute: String,
    options: Options,
    validate: ValidateFn,
}

impl Rule {
    /// Creates a rule with empty options.
    pub fn new<F>(attribute: impl Into<String>, validate: F) -> Self
    where
        F: Fn(Option<AttrValue>, &Options, &ModelHandle, &str) -> ValidatorOutput
            + Send
            + Sync
            + 'static,
    {
        Self::with_options(attribute, Options::new(), validate)
    }

    /// Creates a rule with the given options.
    pub fn with_options<F>(attribute: impl Into<String>, options: Options, validate: F) -> Self
    where
        F: Fn(Option<AttrValue>, &Options, &ModelHandle, &str) -> ValidatorOutput
            + Send
            + Sync
            + 'static,
    {
        Self {
            attribute: attribute.into(),
            options,
            validate: Box::new(validate),
        }
    }

    /// The attribute this rule validates.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Declared options for this rule.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Runs the validator against the current attribute value.
    pub(crate) fn run(&self, value: Option<AttrValue>, model: &ModelHandle) -> ValidatorOutput {
        (self.validate)(value, &self.options, model, &self.attribute)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("attribute", &self.attribute)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Ordered set of rules for one model, in declaration order.
///
/// # Example
///
/// ```ignore
/// let rules = ValidationRules::new()
///     .attr("firstName", presence)
///     .attr("lastName", presence)
///     .attr_with("dob", Options::new().set("before", "now"), date);
/// ```
#[derive(Debug, Default)]
pub struct ValidationRules {
    rules: Vec<Arc<Rule>>,
}

impl ValidationRules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a rule for an attribute. Attributes may be declared more
    /// than once; each declaration gets its own result facade.
    pub fn attr<F>(mut self, attribute: impl Into<String>, validate: F) -> Self
    where
        F: Fn(Option<AttrValue>, &Options, &ModelHandle, &str) -> ValidatorOutput
            + Send
            + Sync
            + 'static,
    {
        self.rules.push(Arc::new(Rule::new(attribute, validate)));
        self
    }

    /// Declares a rule with options.
    pub fn attr_with<F>(
        mut self,
        attribute: impl Into<String>,
        options: Options,
        validate: F,
    ) -> Self
    where
        F: Fn(Option<AttrValue>, &Options, &ModelHandle, &str) -> ValidatorOutput
            + Send
            + Sync
            + 'static,
    {
        self.rules
            .push(Arc::new(Rule::with_options(attribute, options, validate)));
        self
    }

    /// Number of declared rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }
}
