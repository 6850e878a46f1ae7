//! Discrete diagnostic events emitted during catalog construction and
//! analysis.
//!
//! Diagnostics collaborators consume these events; they never read engine
//! internals. The engine emits into an [`EventSink`] supplied at
//! construction, so hosts decide whether events are logged, collected, or
//! dropped.

use tracing::{debug, warn};

use crate::catalog::QualifiedName;

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    /// A class names a parent that resolved to no cataloged class.
    /// The literal name is kept in the entry's parent list.
    UnresolvedParent {
        class: QualifiedName,
        parent: String,
    },

    /// A declared annotation token names no catalog or external entry.
    UnresolvedAnnotation {
        owner: QualifiedName,
        token: String,
    },

    /// A module state slot has neither an annotation nor an inferable
    /// initializer value.
    UntypedState { fqn: QualifiedName },

    /// More than one ancestor branch supplies the requested member; the
    /// most-derived, first-declared branch won.
    AmbiguousInheritance {
        class: QualifiedName,
        member: String,
        chosen: QualifiedName,
    },

    /// A module failed analysis and degraded to an empty report.
    ModuleSkipped { module: String, reason: String },
}

/// Receives diagnostic events from the engine.
pub trait EventSink {
    fn emit(&mut self, event: AnalysisEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: AnalysisEvent) {}
}

/// Forwards events to the `tracing` subscriber: skipped modules at `warn`,
/// everything else at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: AnalysisEvent) {
        match &event {
            AnalysisEvent::ModuleSkipped { module, reason } => {
                warn!("module '{}' skipped: {}", module, reason);
            }
            other => debug!(?other, "analysis event"),
        }
    }
}

/// Collects events in order; used by tests and batch diagnostics.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<AnalysisEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AnalysisEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AnalysisEvent> {
        self.events
    }
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: AnalysisEvent) {
        self.events.push(event);
    }
}
