//! Pass 1: the whole-program catalog.
//!
//! The catalog is built once over every module, then frozen; pass 2 only
//! reads it. It indexes classes (with inheritance edges and attribute
//! types), functions (declared signatures), module state, and allow-listed
//! external imports.

mod builder;
mod entries;
mod index;
mod types;

pub use builder::CatalogBuilder;
pub use entries::{ClassEntry, ExternalEntry, FunctionEntry, StateEntry};
pub use index::Catalog;
pub use types::{PrimitiveType, TypeDescriptor, normalize_annotation};

/// A fully qualified dotted name identifying one declaration.
pub type QualifiedName = String;

/// An unqualified identifier.
pub type SimpleName = smol_str::SmolStr;

#[cfg(test)]
mod tests;
