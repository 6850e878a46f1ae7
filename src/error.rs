//! Error types shared across the analysis pipeline.

use thiserror::Error;

/// Errors raised while validating an [`AnalyzerConfig`](crate::config::AnalyzerConfig).
///
/// Configuration errors are fatal: an analyzer is never constructed from an
/// invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Member lists were supplied but the namespace allowlist is empty.
    #[error("external member lists require a non-empty namespace allowlist")]
    EmptyAllowlist,

    /// A namespace prefix is not a valid dotted identifier path.
    #[error("invalid external namespace prefix: {0}")]
    InvalidNamespace(String),

    /// A member list names a namespace absent from the allowlist.
    #[error("member list for unknown namespace: {0}")]
    UnknownNamespace(String),
}

/// A per-module analysis failure.
///
/// These degrade the affected module to an empty report; they never abort
/// the run. Unresolved names are not errors (the resolver returns `None`).
#[derive(Debug, Error)]
pub enum ModuleAnalysisError {
    /// The module tree carries no usable module name.
    #[error("module has an empty or invalid name: {0:?}")]
    InvalidModuleName(String),
}
