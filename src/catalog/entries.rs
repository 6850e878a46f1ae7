use indexmap::IndexMap;

use super::types::TypeDescriptor;
use super::{QualifiedName, SimpleName};

/// A cataloged class: inheritance edges plus attribute types extracted from
/// constructor-body assignments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassEntry {
    pub fqn: QualifiedName,
    /// Parent references after linking. Entries that resolved keep their
    /// class FQN; a cross-module lookup that failed keeps the literal name
    /// as written, which degrades resolution locally instead of failing.
    pub parents: Vec<String>,
    pub attributes: IndexMap<SimpleName, TypeDescriptor>,
}

/// A cataloged function or method: declared signature only, no body
/// inference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionEntry {
    pub fqn: QualifiedName,
    pub param_types: IndexMap<SimpleName, TypeDescriptor>,
    pub return_type: Option<TypeDescriptor>,
}

/// A module-level state variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateEntry {
    pub fqn: QualifiedName,
    pub ty: Option<TypeDescriptor>,
    /// True when `ty` came from the initializer value rather than an
    /// annotation.
    pub inferred_from_value: bool,
}

/// A name imported from an allow-listed external namespace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalEntry {
    /// Full external name, e.g. `sqlkit.Connection`.
    pub fqn: QualifiedName,
    /// The external module it was imported from.
    pub module: String,
    /// The name it is bound to in the importing module.
    pub local_alias: SimpleName,
}
