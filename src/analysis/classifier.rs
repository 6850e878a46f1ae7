//! Reference classification buckets and the pluggable classifier seam.

use crate::semantic::ResolutionContext;

/// The bucket a resolved reference files under. Every reference lands in
/// exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceBucket {
    /// Target is a cataloged or external class.
    Instantiation,
    /// Target is a cataloged or external function, or lives under an
    /// allow-listed external namespace.
    Call,
    /// Target is a module state entry whose base name is not shadowed by a
    /// local binding.
    StateAccess,
    /// Unresolved, or resolved to something in no catalog.
    Rejected,
}

/// Intercepts a resolved call target before default classification.
///
/// Returning `Some` files the target under that bucket instead; `None`
/// defers to the default rules. Domain-specific call detectors (an
/// event-emission classifier, for instance) plug in here without touching
/// the engine.
pub trait CallClassifier {
    fn classify(&self, target: &str, ctx: &ResolutionContext) -> Option<ReferenceBucket>;
}
