//! Result collection: ordered roll-up of validation results.

use std::sync::Arc;

use crate::error::AttributeError;
use crate::result::AttributeValidation;
use crate::result::ValidationUnit;
use crate::result::VisitPath;
use crate::validations::ModelValidations;

/// One member of a result collection.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A single attribute evaluation.
    Unit(ValidationUnit),
    /// A per-rule result facade.
    Facade(AttributeValidation),
    /// A nested collection.
    Collection(ResultCollection),
    /// A related model's full validation result.
    Nested(ModelValidations),
}

impl Entry {
    pub(crate) fn is_valid_with(&self, path: &mut VisitPath) -> bool {
        match self {
            Entry::Unit(unit) => unit.is_valid(),
            Entry::Facade(facade) => facade.is_valid_with(path),
            Entry::Collection(collection) => collection.is_valid_with(path),
            Entry::Nested(validations) => validations.is_valid_with(path),
        }
    }

    pub(crate) fn is_validating_with(&self, path: &mut VisitPath) -> bool {
        match self {
            Entry::Unit(unit) => unit.is_validating(),
            Entry::Facade(facade) => facade.is_validating_with(path),
            Entry::Collection(collection) => collection.is_validating_with(path),
            Entry::Nested(validations) => validations.is_validating_with(path),
        }
    }

    pub(crate) fn is_async_with(&self, path: &mut VisitPath) -> bool {
        match self {
            Entry::Unit(_) => false,
            Entry::Facade(facade) => facade.is_async_with(path),
            Entry::Collection(collection) => collection.is_async_with(path),
            Entry::Nested(validations) => validations.is_async_with(path),
        }
    }

    pub(crate) fn is_dirty_with(&self, path: &mut VisitPath) -> bool {
        match self {
            Entry::Unit(unit) => unit.is_dirty(),
            Entry::Facade(facade) => facade.is_dirty_with(path),
            Entry::Collection(collection) => collection.is_dirty_with(path),
            Entry::Nested(validations) => validations.is_dirty_with(path),
        }
    }

    pub(crate) fn messages_with(&self, path: &mut VisitPath) -> Vec<String> {
        match self {
            Entry::Unit(unit) => unit.messages(),
            Entry::Facade(facade) => facade.messages_with(path),
            Entry::Collection(collection) => collection.messages_with(path),
            Entry::Nested(validations) => validations.messages_with(path),
        }
    }

    pub(crate) fn errors_with(&self, path: &mut VisitPath) -> Vec<AttributeError> {
        match self {
            Entry::Unit(unit) => unit.errors(),
            Entry::Facade(facade) => facade.errors_with(path),
            Entry::Collection(collection) => collection.errors_with(path),
            Entry::Nested(validations) => validations.errors_with(path),
        }
    }
}

/// Ordered aggregation of validation results under one attribute.
///
/// Construction stores the entries and nothing else; every aggregate is
/// computed on read from current entry state. Entries of relationship
/// fan-out (has-many) all share the owning attribute.
#[derive(Debug, Clone)]
pub struct ResultCollection {
    attribute: String,
    content: Arc<Vec<Entry>>,
}

impl ResultCollection {
    pub(crate) fn new(attribute: impl Into<String>, content: Vec<Entry>) -> Self {
        Self {
            attribute: attribute.into(),
            content: Arc::new(content),
        }
    }

    /// The owning attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The ordered entries.
    pub fn content(&self) -> &[Entry] {
        &self.content
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// True iff every entry reports valid, recursively.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(&mut VisitPath::default())
    }

    /// Negation of [`is_valid`](Self::is_valid).
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// True iff any entry reports validating.
    pub fn is_validating(&self) -> bool {
        self.is_validating_with(&mut VisitPath::default())
    }

    /// Valid and not validating.
    pub fn is_truly_valid(&self) -> bool {
        let mut path = VisitPath::default();
        self.is_valid_with(&mut path) && !self.is_validating_with(&mut path)
    }

    /// True iff any entry tracks an in-flight async result.
    pub fn is_async(&self) -> bool {
        self.is_async_with(&mut VisitPath::default())
    }

    /// True iff any entry is dirty.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty_with(&mut VisitPath::default())
    }

    /// First aggregate message, if any.
    pub fn message(&self) -> Option<String> {
        self.messages().into_iter().next()
    }

    /// Ordered concatenation of messages across invalid entries.
    pub fn messages(&self) -> Vec<String> {
        self.messages_with(&mut VisitPath::default())
    }

    /// First aggregate error, if any.
    pub fn error(&self) -> Option<AttributeError> {
        self.errors().into_iter().next()
    }

    /// Ordered concatenation of errors across invalid entries.
    pub fn errors(&self) -> Vec<AttributeError> {
        self.errors_with(&mut VisitPath::default())
    }

    pub(crate) fn is_valid_with(&self, path: &mut VisitPath) -> bool {
        self.content.iter().all(|entry| entry.is_valid_with(path))
    }

    pub(crate) fn is_validating_with(&self, path: &mut VisitPath) -> bool {
        self.content
            .iter()
            .any(|entry| entry.is_validating_with(path))
    }

    pub(crate) fn is_async_with(&self, path: &mut VisitPath) -> bool {
        self.content.iter().any(|entry| entry.is_async_with(path))
    }

    pub(crate) fn is_dirty_with(&self, path: &mut VisitPath) -> bool {
        self.content.iter().any(|entry| entry.is_dirty_with(path))
    }

    pub(crate) fn messages_with(&self, path: &mut VisitPath) -> Vec<String> {
        let mut messages = Vec::new();
        for entry in self.content.iter() {
            if !entry.is_valid_with(path) {
                messages.extend(entry.messages_with(path));
            }
        }
        messages
    }

    pub(crate) fn errors_with(&self, path: &mut VisitPath) -> Vec<AttributeError> {
        let mut errors = Vec::new();
        for entry in self.content.iter() {
            if !entry.is_valid_with(path) {
                errors.extend(entry.errors_with(path));
            }
        }
        errors
    }
}
