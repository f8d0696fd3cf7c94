use std::collections::HashSet;

use crate::model::ModelId;

/// Models on the current aggregate-traversal path.
///
/// Scoped to a single read; never persisted. Re-entering a model already on
/// the path short-circuits instead of recursing, which guarantees
/// termination on cyclic model graphs.
#[derive(Debug, Default)]
pub(crate) struct VisitPath(HashSet<ModelId>);

impl VisitPath {
    /// Marks a model as being visited. Returns `false` if it is already on
    /// the path.
    pub(crate) fn enter(&mut self, id: ModelId) -> bool {
        self.0.insert(id)
    }

    /// Unmarks a model on the way back out.
    pub(crate) fn exit(&mut self, id: ModelId) {
        self.0.remove(&id);
    }
}
