//! # refgraph-base
//!
//! Core library for whole-program cross-reference analysis of dynamic
//! object-oriented languages: given already-parsed module trees, it builds a
//! per-function map of called, instantiated, and state-reading
//! fully-qualified names.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis  → pass 2: per-function traversal, classification, reports
//!   ↓
//! semantic  → symbol table, type inference, layered name resolver
//!   ↓
//! catalog   → pass 1: whole-program index of classes/functions/state
//!   ↓
//! config    → analyzer configuration, external-namespace allowlists
//!   ↓
//! syntax    → the input syntax-tree contract (parsing is external)
//!   ↓
//! events    → discrete diagnostic events and sinks
//!   ↓
//! error     → shared error types
//! ```

// ============================================================================
// MODULES (dependency order: error → events → syntax → config → catalog →
// semantic → analysis)
// ============================================================================

/// Shared error types
pub mod error;

/// Diagnostic events and sink implementations
pub mod events;

/// Input contract: already-parsed module trees
pub mod syntax;

/// Analyzer configuration: allowlists, classification heuristics
pub mod config;

/// Pass 1: whole-program catalog of declarations
pub mod catalog;

/// Pass 2 machinery: symbol table, type inference, name resolution
pub mod semantic;

/// Pass 2 driver: traversal, classification, report accumulation
pub mod analysis;

// Re-export the stable contract types
pub use analysis::{
    Analyzer, CallClassifier, ClassReport, FunctionReport, ModuleReport, ReferenceBucket,
    StateSlot,
};
pub use catalog::{Catalog, CatalogBuilder, TypeDescriptor};
pub use config::AnalyzerConfig;
pub use error::{ConfigError, ModuleAnalysisError};
pub use events::{AnalysisEvent, CollectingSink, EventSink, NullSink, TracingSink};
pub use syntax::ModuleTree;
