use indexmap::IndexMap;
use tracing::trace;

use super::entries::{ClassEntry, ExternalEntry, FunctionEntry, StateEntry};
use super::QualifiedName;

/// The immutable, whole-program index built by pass 1.
///
/// FQNs are unique by construction, so the deterministic merge of per-file
/// fragments is a plain FQN-keyed map union. All maps preserve insertion
/// order for deterministic downstream output.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    pub(crate) classes: IndexMap<QualifiedName, ClassEntry>,
    pub(crate) functions: IndexMap<QualifiedName, FunctionEntry>,
    pub(crate) state: IndexMap<QualifiedName, StateEntry>,
    pub(crate) external_classes: IndexMap<QualifiedName, ExternalEntry>,
    pub(crate) external_functions: IndexMap<QualifiedName, ExternalEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Lookups
    // ============================================================

    pub fn class(&self, fqn: &str) -> Option<&ClassEntry> {
        self.classes.get(fqn)
    }

    pub fn function(&self, fqn: &str) -> Option<&FunctionEntry> {
        self.functions.get(fqn)
    }

    pub fn state_entry(&self, fqn: &str) -> Option<&StateEntry> {
        self.state.get(fqn)
    }

    pub fn external_class(&self, fqn: &str) -> Option<&ExternalEntry> {
        self.external_classes.get(fqn)
    }

    pub fn external_function(&self, fqn: &str) -> Option<&ExternalEntry> {
        self.external_functions.get(fqn)
    }

    /// True if `fqn` names any cataloged class, internal or external.
    pub fn is_class(&self, fqn: &str) -> bool {
        self.classes.contains_key(fqn) || self.external_classes.contains_key(fqn)
    }

    /// True if `fqn` names any cataloged function, internal or external.
    pub fn is_function(&self, fqn: &str) -> bool {
        self.functions.contains_key(fqn) || self.external_functions.contains_key(fqn)
    }

    /// Find an external entry by the local alias it was imported under.
    ///
    /// Per-module import maps are consulted first by the resolver; this is
    /// the whole-program fallback, checked in insertion order.
    pub fn external_by_alias(&self, alias: &str) -> Option<&ExternalEntry> {
        self.external_classes
            .values()
            .chain(self.external_functions.values())
            .find(|entry| entry.local_alias == alias)
    }

    /// First class, in insertion order, whose FQN ends with `.{suffix}`
    /// (or equals `suffix`). Used for cross-module parent linking.
    pub fn find_class_by_suffix(&self, suffix: &str) -> Option<&ClassEntry> {
        if let Some(entry) = self.classes.get(suffix) {
            return Some(entry);
        }
        let dotted = format!(".{suffix}");
        self.classes.values().find(|entry| entry.fqn.ends_with(&dotted))
    }

    // ============================================================
    // Iteration
    // ============================================================

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.functions.values()
    }

    pub fn state(&self) -> impl Iterator<Item = &StateEntry> {
        self.state.values()
    }

    pub fn external_classes(&self) -> impl Iterator<Item = &ExternalEntry> {
        self.external_classes.values()
    }

    pub fn external_functions(&self) -> impl Iterator<Item = &ExternalEntry> {
        self.external_functions.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
            + self.functions.len()
            + self.state.len()
            + self.external_classes.len()
            + self.external_functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ============================================================
    // Merge (pass-1 fragment union)
    // ============================================================

    /// Union another fragment into this one. FQNs are unique by
    /// construction, so last-writer-wins is safe.
    pub(crate) fn merge(&mut self, fragment: Catalog) {
        trace!(
            classes = fragment.classes.len(),
            functions = fragment.functions.len(),
            state = fragment.state.len(),
            "merging catalog fragment"
        );
        self.classes.extend(fragment.classes);
        self.functions.extend(fragment.functions);
        self.state.extend(fragment.state);
        self.external_classes.extend(fragment.external_classes);
        self.external_functions.extend(fragment.external_functions);
    }
}
