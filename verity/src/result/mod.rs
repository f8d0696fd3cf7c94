//! Validation result composition: units, collections, and facades.

mod collection;
mod facade;
mod unit;
mod visit;

pub use collection::{Entry, ResultCollection};
pub use facade::AttributeValidation;
pub(crate) use facade::PendingValidation;
pub use unit::ValidationUnit;
pub(crate) use visit::VisitPath;
