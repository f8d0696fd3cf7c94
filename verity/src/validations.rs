//! Model-level validation aggregate and the two entry points.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use futures::future;

use crate::error::AttributeError;
use crate::error::ValidationError;
use crate::model::ModelHandle;
use crate::model::ModelId;
use crate::model::WeakModel;
use crate::raw::BoxFuture;
use crate::result::AttributeValidation;
use crate::result::Entry;
use crate::result::PendingValidation;
use crate::result::ResultCollection;
use crate::result::VisitPath;
use crate::rules::ValidationRules;

/// What `validate()` and `validate_sync()` hand back to the caller.
#[derive(Clone)]
pub struct Outcome {
    /// The model the validation ran against.
    pub model: ModelHandle,
    /// The model-level validation aggregate, reflecting current state.
    pub validations: ModelValidations,
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outcome")
            .field("model", &self.model.model_id())
            .field("validations", &self.validations)
            .finish()
    }
}

/// Validation state for a whole model: one facade per declared rule, in
/// declaration order, aggregated like a result collection.
///
/// Cheap to clone; all clones share state. Created once when the model's
/// rules are constructed and living as long as the model. The handle back
/// to the model is weak; the engine never keeps a model alive.
#[derive(Debug)]
pub struct ModelValidations {
    shared: Arc<ValidationsState>,
}

#[derive(Debug)]
struct ValidationsState {
    model: WeakModel,
    model_id: ModelId,
    content: Vec<AttributeValidation>,
    // Re-entrancy guard: a validator that triggers validation of a model
    // already mid-evaluation gets current state back instead of recursing.
    evaluating: AtomicBool,
}

impl ModelValidations {
    /// Builds the aggregate for a model from its declared rules.
    pub fn new(model: WeakModel, model_id: ModelId, rules: &ValidationRules) -> Self {
        let content = rules
            .iter()
            .map(|rule| AttributeValidation::new(model.clone(), Arc::clone(rule)))
            .collect();
        Self {
            shared: Arc::new(ValidationsState {
                model,
                model_id,
                content,
                evaluating: AtomicBool::new(false),
            }),
        }
    }

    /// Identity of the validated model.
    pub fn model_id(&self) -> ModelId {
        self.shared.model_id
    }

    /// All rule facades, in declaration order.
    pub fn content(&self) -> &[AttributeValidation] {
        &self.shared.content
    }

    /// The aggregated result for one attribute: a collection over that
    /// attribute's rule facades.
    pub fn attr(&self, name: &str) -> ResultCollection {
        let entries = self
            .shared
            .content
            .iter()
            .filter(|facade| facade.attribute() == name)
            .cloned()
            .map(Entry::Facade)
            .collect();
        ResultCollection::new(name, entries)
    }

    /// Triggers evaluation of every declared rule and returns immediately.
    ///
    /// Sync validator results are normalized before this returns, so
    /// `is_validating()` already reflects any rules that went async. The
    /// returned future drives those pending results to settlement and
    /// resolves to the outcome; a validator rejection propagates as an
    /// error and is never retried.
    pub fn validate(&self) -> BoxFuture<'static, Result<Outcome, ValidationError>> {
        let Some(model) = self.shared.model.upgrade() else {
            return future::ready(Err(ValidationError::ModelDropped)).boxed();
        };
        if self.shared.evaluating.swap(true, Ordering::SeqCst) {
            return future::ready(Ok(self.outcome_with(model))).boxed();
        }
        let pending = self.run_rules(&model);
        self.shared.evaluating.store(false, Ordering::SeqCst);

        let this = self.clone();
        async move {
            let mut pending = pending.into_iter();
            while let Some(p) = pending.next() {
                match p.future.await {
                    Ok(raw) => p.facade.settle(p.generation, raw),
                    Err(err) => {
                        // A rejection is fatal for the whole run; every
                        // still-pending facade must leave the validating
                        // state, not just the rejecting one.
                        p.facade.abort(p.generation);
                        for abandoned in pending {
                            abandoned.facade.abort(abandoned.generation);
                        }
                        return Err(err);
                    }
                }
            }
            Ok(this.outcome_with(model))
        }
        .boxed()
    }

    /// Triggers evaluation and returns the outcome from current state,
    /// without waiting on pending async validators. Rules that went async
    /// are reported as validating until a later `validate()` supersedes
    /// them.
    pub fn validate_sync(&self) -> Result<Outcome, ValidationError> {
        let model = self
            .shared
            .model
            .upgrade()
            .ok_or(ValidationError::ModelDropped)?;
        if self.shared.evaluating.swap(true, Ordering::SeqCst) {
            return Ok(self.outcome_with(model));
        }
        let pending = self.run_rules(&model);
        self.shared.evaluating.store(false, Ordering::SeqCst);

        for p in pending {
            log::debug!(
                "abandoning pending validator for '{}' (sync validation)",
                p.facade.attribute()
            );
        }
        Ok(self.outcome_with(model))
    }

    /// Aggregate validity: AND over all rule facades, cycle-safe.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(&mut VisitPath::default())
    }

    /// Negation of [`is_valid`](Self::is_valid).
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Aggregate pending state: OR over all rule facades.
    pub fn is_validating(&self) -> bool {
        self.is_validating_with(&mut VisitPath::default())
    }

    /// Valid and not pending async settlement.
    pub fn is_truly_valid(&self) -> bool {
        self.is_valid() && !self.is_validating()
    }

    /// True iff any rule facade tracks an in-flight async result.
    pub fn is_async(&self) -> bool {
        self.is_async_with(&mut VisitPath::default())
    }

    /// True iff any validated attribute is dirty.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty_with(&mut VisitPath::default())
    }

    /// First aggregate message, if any.
    pub fn message(&self) -> Option<String> {
        self.messages().into_iter().next()
    }

    /// Ordered messages across invalid rule facades.
    pub fn messages(&self) -> Vec<String> {
        self.messages_with(&mut VisitPath::default())
    }

    /// First aggregate error, if any.
    pub fn error(&self) -> Option<AttributeError> {
        self.errors().into_iter().next()
    }

    /// Ordered errors across invalid rule facades.
    pub fn errors(&self) -> Vec<AttributeError> {
        self.errors_with(&mut VisitPath::default())
    }

    pub(crate) fn is_valid_with(&self, path: &mut VisitPath) -> bool {
        if !path.enter(self.shared.model_id) {
            log::trace!(
                "cycle at model {}; contributing vacuous validity",
                self.shared.model_id
            );
            return true;
        }
        let valid = self
            .shared
            .content
            .iter()
            .all(|facade| facade.is_valid_with(path));
        path.exit(self.shared.model_id);
        valid
    }

    pub(crate) fn is_validating_with(&self, path: &mut VisitPath) -> bool {
        if !path.enter(self.shared.model_id) {
            return false;
        }
        let validating = self
            .shared
            .content
            .iter()
            .any(|facade| facade.is_validating_with(path));
        path.exit(self.shared.model_id);
        validating
    }

    pub(crate) fn is_async_with(&self, path: &mut VisitPath) -> bool {
        if !path.enter(self.shared.model_id) {
            return false;
        }
        let is_async = self
            .shared
            .content
            .iter()
            .any(|facade| facade.is_async_with(path));
        path.exit(self.shared.model_id);
        is_async
    }

    pub(crate) fn is_dirty_with(&self, path: &mut VisitPath) -> bool {
        if !path.enter(self.shared.model_id) {
            return false;
        }
        let dirty = self
            .shared
            .content
            .iter()
            .any(|facade| facade.is_dirty_with(path));
        path.exit(self.shared.model_id);
        dirty
    }

    pub(crate) fn messages_with(&self, path: &mut VisitPath) -> Vec<String> {
        if !path.enter(self.shared.model_id) {
            return Vec::new();
        }
        let mut messages = Vec::new();
        for facade in &self.shared.content {
            if !facade.is_valid_with(path) {
                messages.extend(facade.messages_with(path));
            }
        }
        path.exit(self.shared.model_id);
        messages
    }

    pub(crate) fn errors_with(&self, path: &mut VisitPath) -> Vec<AttributeError> {
        if !path.enter(self.shared.model_id) {
            return Vec::new();
        }
        let mut errors = Vec::new();
        for facade in &self.shared.content {
            if !facade.is_valid_with(path) {
                errors.extend(facade.errors_with(path));
            }
        }
        path.exit(self.shared.model_id);
        errors
    }

    fn run_rules(&self, model: &ModelHandle) -> Vec<PendingValidation> {
        let mut pending = Vec::new();
        for facade in &self.shared.content {
            if let Some(p) = facade.evaluate(model) {
                pending.push(p);
            }
        }
        pending
    }

    fn outcome_with(&self, model: ModelHandle) -> Outcome {
        Outcome {
            model,
            validations: self.clone(),
        }
    }
}

impl Clone for ModelValidations {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
