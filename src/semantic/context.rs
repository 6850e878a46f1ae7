//! The ephemeral per-activation resolution state.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::events::AnalysisEvent;

use super::symbol_table::SymbolTable;
use super::QualifiedName;

/// Everything one function activation carries through resolution: where the
/// function lives, what its imports bind, its scoped symbol table, and the
/// activation-local resolution cache.
///
/// A context is created at function entry and discarded at function exit;
/// nothing here is ever shared across activations.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    pub module: String,
    pub class_fqn: Option<QualifiedName>,
    pub function_fqn: Option<QualifiedName>,
    /// The method's actual receiver parameter name, when inside one.
    pub receiver: Option<SmolStr>,
    /// Local import bindings: bound name → FQN or namespace path.
    pub import_aliases: FxHashMap<SmolStr, QualifiedName>,
    pub symbols: SymbolTable,
    /// Resolution cache keyed by the name-part tuple.
    cache: FxHashMap<Vec<SmolStr>, Option<QualifiedName>>,
    /// Diagnostics raised during resolution, drained by the orchestrator.
    pending_events: Vec<AnalysisEvent>,
}

impl ResolutionContext {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, fqn: impl Into<QualifiedName>) -> Self {
        self.class_fqn = Some(fqn.into());
        self
    }

    pub fn with_function(mut self, fqn: impl Into<QualifiedName>) -> Self {
        self.function_fqn = Some(fqn.into());
        self
    }

    pub fn with_receiver(mut self, name: impl Into<SmolStr>) -> Self {
        self.receiver = Some(name.into());
        self
    }

    pub fn bind_import(&mut self, alias: impl Into<SmolStr>, fqn: impl Into<QualifiedName>) {
        self.import_aliases.insert(alias.into(), fqn.into());
    }

    pub(super) fn cache_get(&self, parts: &[SmolStr]) -> Option<Option<QualifiedName>> {
        self.cache.get(parts).cloned()
    }

    pub(super) fn cache_put(&mut self, parts: Vec<SmolStr>, result: Option<QualifiedName>) {
        self.cache.insert(parts, result);
    }

    #[cfg(test)]
    pub(super) fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub(super) fn push_event(&mut self, event: AnalysisEvent) {
        self.pending_events.push(event);
    }

    /// Drain diagnostics raised since the last call.
    pub fn take_events(&mut self) -> Vec<AnalysisEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
