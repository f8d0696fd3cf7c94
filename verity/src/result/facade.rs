//! Result facade: the per-rule object consumers read validity state from,
//! plus the normalizer that folds raw validator results into it.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::error::AttributeError;
use crate::error::ValidationError;
use crate::model::ModelHandle;
use crate::model::WeakModel;
use crate::raw::BoxFuture;
use crate::raw::RawResult;
use crate::raw::ValidatorOutput;
use crate::result::Entry;
use crate::result::ResultCollection;
use crate::result::ValidationUnit;
use crate::result::VisitPath;
use crate::rules::Rule;
use crate::validations::ModelValidations;

/// The current normalized state behind a facade: always exactly one of a
/// unit, a collection, or a related model's full validation result.
#[derive(Debug, Clone)]
enum Inner {
    Unit(ValidationUnit),
    Collection(ResultCollection),
    Validations(ModelValidations),
}

/// Read-only validation result for one declared rule.
///
/// Cheap to clone; all clones share state. [`update`](Self::update) swaps
/// the inner state rather than the facade itself, so every holder of the
/// facade observes the latest result.
#[derive(Debug)]
pub struct AttributeValidation {
    shared: Arc<FacadeState>,
}

#[derive(Debug)]
struct FacadeState {
    model: WeakModel,
    attribute: String,
    rule: Arc<Rule>,
    inner: RwLock<Inner>,
    // In-flight async tracking. `generation` is the supersession token: a
    // settlement only applies while it still carries the current value.
    pending: AtomicBool,
    generation: AtomicU64,
}

/// A not-yet-settled validator invocation, driven by the future returned
/// from `validate()`.
pub(crate) struct PendingValidation {
    pub(crate) facade: AttributeValidation,
    pub(crate) generation: u64,
    pub(crate) future: BoxFuture<'static, Result<RawResult, ValidationError>>,
}

impl AttributeValidation {
    pub(crate) fn new(model: WeakModel, rule: Arc<Rule>) -> Self {
        let attribute = rule.attribute().to_string();
        let unit = ValidationUnit::new(model.clone(), attribute.clone());
        Self {
            shared: Arc::new(FacadeState {
                model,
                attribute,
                rule,
                inner: RwLock::new(Inner::Unit(unit)),
                pending: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The attribute this facade validates.
    pub fn attribute(&self) -> &str {
        &self.shared.attribute
    }

    /// Updates this result with a raw validator return value.
    ///
    /// Dispatch, first match wins: absent recurses as a `false` flag; a
    /// nested validation result replaces the inner state (belongs-to); a
    /// sequence of nested results installs a collection (has-many); a string
    /// marks the unit invalid with that message; a boolean sets validity
    /// only; a field patch shallow-merges, except that an empty patch falls
    /// through to the null-equivalent branch.
    pub fn update(&self, raw: RawResult) {
        match raw {
            RawResult::Absent => self.update(RawResult::Flag(false)),
            RawResult::Nested(validations) => {
                self.set_inner(Inner::Validations(validations));
            }
            RawResult::NestedMany(validations) => {
                let entries = validations.into_iter().map(Entry::Nested).collect();
                let collection = ResultCollection::new(self.shared.attribute.clone(), entries);
                self.set_inner(Inner::Collection(collection));
            }
            RawResult::Message(message) => self.current_unit().set_invalid(message.into()),
            RawResult::Flag(is_valid) => self.current_unit().set_valid(is_valid),
            RawResult::Fields(patch) if patch.is_empty() => self.update(RawResult::Flag(false)),
            RawResult::Fields(patch) => self.current_unit().merge(patch),
        }
    }

    /// Runs this facade's rule against the model, normalizing a ready
    /// result immediately and returning a pending handle otherwise.
    pub(crate) fn evaluate(&self, model: &ModelHandle) -> Option<PendingValidation> {
        let value = model.attribute(&self.shared.attribute);
        match self.shared.rule.run(value, model) {
            ValidatorOutput::Ready(raw) => {
                // A sync re-run supersedes any promise still in flight.
                self.shared.generation.fetch_add(1, Ordering::SeqCst);
                self.shared.pending.store(false, Ordering::SeqCst);
                self.update(raw);
                if let Inner::Unit(unit) = self.inner() {
                    unit.set_validating(false);
                }
                None
            }
            ValidatorOutput::Pending(future) => {
                let generation = self.begin_async();
                Some(PendingValidation {
                    facade: self.clone(),
                    generation,
                    future,
                })
            }
        }
    }

    /// Starts tracking a new in-flight result, superseding any prior one,
    /// and returns the supersession token for its settlement.
    pub(crate) fn begin_async(&self) -> u64 {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.pending.store(true, Ordering::SeqCst);
        self.current_unit().set_validating(true);
        log::debug!(
            "'{}' validation pending (generation {generation})",
            self.shared.attribute
        );
        generation
    }

    /// Applies a settled raw result, unless a newer evaluation superseded
    /// the one that produced it.
    pub(crate) fn settle(&self, generation: u64, raw: RawResult) {
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            log::debug!(
                "discarding superseded validation result for '{}'",
                self.shared.attribute
            );
            return;
        }
        self.update(raw);
        self.shared.pending.store(false, Ordering::SeqCst);
        if let Inner::Unit(unit) = self.inner() {
            unit.set_validating(false);
        }
    }

    /// Clears in-flight state after a fatal rejection. The rejection itself
    /// propagates from `validate()`.
    pub(crate) fn abort(&self, generation: u64) {
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        self.shared.pending.store(false, Ordering::SeqCst);
        if let Inner::Unit(unit) = self.inner() {
            unit.set_validating(false);
        }
    }

    /// Aggregate validity of the current inner state.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(&mut VisitPath::default())
    }

    /// Negation of [`is_valid`](Self::is_valid).
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Whether any underlying evaluation is still pending.
    pub fn is_validating(&self) -> bool {
        self.is_validating_with(&mut VisitPath::default())
    }

    /// Valid and not pending async settlement.
    pub fn is_truly_valid(&self) -> bool {
        let mut path = VisitPath::default();
        self.is_valid_with(&mut path) && !self.is_validating_with(&mut path)
    }

    /// Whether this facade currently tracks an in-flight async result.
    pub fn is_async(&self) -> bool {
        self.is_async_with(&mut VisitPath::default())
    }

    /// Whether the underlying attribute value is dirty.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty_with(&mut VisitPath::default())
    }

    /// First message, if any.
    pub fn message(&self) -> Option<String> {
        self.messages().into_iter().next()
    }

    /// Messages of the current inner state.
    pub fn messages(&self) -> Vec<String> {
        self.messages_with(&mut VisitPath::default())
    }

    /// First error, if any.
    pub fn error(&self) -> Option<AttributeError> {
        self.errors().into_iter().next()
    }

    /// Errors of the current inner state.
    pub fn errors(&self) -> Vec<AttributeError> {
        self.errors_with(&mut VisitPath::default())
    }

    /// Validator-attached metadata, when the inner state is a unit.
    pub fn meta(&self) -> serde_json::Map<String, serde_json::Value> {
        match self.inner() {
            Inner::Unit(unit) => unit.meta(),
            _ => serde_json::Map::new(),
        }
    }

    pub(crate) fn is_valid_with(&self, path: &mut VisitPath) -> bool {
        match self.inner() {
            Inner::Unit(unit) => unit.is_valid(),
            Inner::Collection(collection) => collection.is_valid_with(path),
            Inner::Validations(validations) => validations.is_valid_with(path),
        }
    }

    pub(crate) fn is_validating_with(&self, path: &mut VisitPath) -> bool {
        match self.inner() {
            Inner::Unit(unit) => unit.is_validating(),
            Inner::Collection(collection) => collection.is_validating_with(path),
            Inner::Validations(validations) => validations.is_validating_with(path),
        }
    }

    pub(crate) fn is_async_with(&self, path: &mut VisitPath) -> bool {
        if self.shared.pending.load(Ordering::SeqCst) {
            return true;
        }
        match self.inner() {
            Inner::Unit(_) => false,
            Inner::Collection(collection) => collection.is_async_with(path),
            Inner::Validations(validations) => validations.is_async_with(path),
        }
    }

    pub(crate) fn is_dirty_with(&self, path: &mut VisitPath) -> bool {
        match self.inner() {
            Inner::Unit(unit) => unit.is_dirty(),
            Inner::Collection(collection) => collection.is_dirty_with(path),
            Inner::Validations(validations) => validations.is_dirty_with(path),
        }
    }

    pub(crate) fn messages_with(&self, path: &mut VisitPath) -> Vec<String> {
        match self.inner() {
            Inner::Unit(unit) => unit.messages(),
            Inner::Collection(collection) => collection.messages_with(path),
            Inner::Validations(validations) => validations.messages_with(path),
        }
    }

    pub(crate) fn errors_with(&self, path: &mut VisitPath) -> Vec<AttributeError> {
        match self.inner() {
            Inner::Unit(unit) => unit.errors(),
            Inner::Collection(collection) => collection.errors_with(path),
            Inner::Validations(validations) => validations.errors_with(path),
        }
    }

    // Snapshot of the inner state; cloning keeps lock scopes flat so
    // recursive aggregation never re-enters a held lock.
    fn inner(&self) -> Inner {
        match self.shared.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_inner(&self, inner: Inner) {
        if let Ok(mut guard) = self.shared.inner.write() {
            *guard = inner;
        }
    }

    // The unit the normalizer writes through, recreated if the inner state
    // is currently a collection or nested result.
    fn current_unit(&self) -> ValidationUnit {
        if let Ok(mut guard) = self.shared.inner.write() {
            if let Inner::Unit(unit) = &*guard {
                return unit.clone();
            }
            let unit = ValidationUnit::new(
                self.shared.model.clone(),
                self.shared.attribute.clone(),
            );
            *guard = Inner::Unit(unit.clone());
            return unit;
        }
        // Write lock poisoned; hand back a detached unit rather than panic.
        ValidationUnit::new(self.shared.model.clone(), self.shared.attribute.clone())
    }
}

impl Clone for AttributeValidation {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
