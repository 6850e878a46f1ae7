//! The per-module analysis report: the stable output contract consumed by
//! downstream serializers.

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::catalog::QualifiedName;

/// Cross-references for one analyzed function or method.
///
/// The sets are insertion-ordered and deduplicated: a target referenced
/// twice is recorded once, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionReport {
    pub name: SmolStr,
    pub args: Vec<SmolStr>,
    pub calls: IndexSet<QualifiedName>,
    pub instantiations: IndexSet<QualifiedName>,
    pub accessed_state: IndexSet<QualifiedName>,
}

impl FunctionReport {
    pub fn new(name: impl Into<SmolStr>, args: Vec<SmolStr>) -> Self {
        Self {
            name: name.into(),
            args,
            ..Self::default()
        }
    }
}

/// A class and its per-method reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassReport {
    pub name: SmolStr,
    pub methods: Vec<FunctionReport>,
}

/// One module-level state variable with its rendered initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateSlot {
    pub name: SmolStr,
    pub value: Option<String>,
}

/// Everything pass 2 produced for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleReport {
    pub module: String,
    /// Import bindings in declaration order: bound name → FQN.
    pub imports: IndexMap<SmolStr, QualifiedName>,
    pub classes: Vec<ClassReport>,
    pub functions: Vec<FunctionReport>,
    pub module_state: Vec<StateSlot>,
}

impl ModuleReport {
    /// The degraded form a failed module falls back to.
    pub fn empty(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }
}
