//! Reactive validation result engine.
//!
//! Consumers declare per-attribute validation rules on a model; the engine
//! runs them, normalizes whatever each validator returns into a uniform
//! result shape, and aggregates per-attribute results into a whole-model
//! result with correct async and cycle semantics.

pub mod error;
pub mod model;
pub mod raw;
pub mod result;
pub mod rules;
pub mod validations;
pub mod value;

pub mod prelude {
    pub use crate::error::{AttributeError, ValidationError};
    pub use crate::model::{ModelHandle, ModelId, Validatable, WeakModel};
    pub use crate::raw::{BoxFuture, FieldPatch, Message, RawResult, ValidatorOutput};
    pub use crate::result::{AttributeValidation, Entry, ResultCollection, ValidationUnit};
    pub use crate::rules::{Options, Rule, ValidationRules};
    pub use crate::validations::{ModelValidations, Outcome};
    pub use crate::value::AttrValue;
}
