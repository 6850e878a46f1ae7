//! Attribute-chain walking: one attribute at a time over the running FQN,
//! substituting state and attribute types, falling back through the
//! inheritance graph, and rejecting unknown members of external classes.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use crate::catalog::ClassEntry;
use crate::events::AnalysisEvent;

use super::super::context::ResolutionContext;
use super::super::QualifiedName;
use super::name_resolver::NameResolver;

impl<'a> NameResolver<'a> {
    /// Walk the remaining chain parts from a resolved head. Any failed step
    /// aborts the entire chain with no partial result.
    pub(super) fn walk_chain(
        &self,
        head: QualifiedName,
        rest: &[SmolStr],
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        let mut current = head;
        for part in rest {
            current = self.step(&current, part, ctx)?;
        }
        Some(current)
    }

    /// Resolve a single member against a known base FQN. Used by callers
    /// that already typed a computed receiver (a call result, for
    /// instance) and need the same step rules the chain walker applies.
    pub fn resolve_member(
        &self,
        base: &str,
        attr: &str,
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        self.step(base, attr, ctx)
    }

    /// Resolve one `.attr` step against the running FQN.
    fn step(
        &self,
        current: &str,
        attr: &str,
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        // A state entry stands for its value: substitute the stored type
        // and retry the step on that. Guarded against state-to-state loops.
        let mut fqn = current.to_string();
        let mut seen_state = FxHashSet::default();
        while let Some(state) = self.catalog.state_entry(&fqn) {
            if !seen_state.insert(fqn.clone()) {
                trace!(%fqn, "state substitution cycle");
                return None;
            }
            let ty = state.ty.as_ref()?;
            fqn = self.infer.reresolve(ty, &ctx.module).fqn()?.to_string();
        }

        if let Some(class) = self.catalog.class(&fqn) {
            return self.class_member(class, attr, ctx);
        }

        if self.catalog.external_class(&fqn).is_some() {
            // Unknown attributes on external classes are rejected, never
            // guessed.
            if self.config.is_known_external_member(&fqn, attr) {
                return Some(format!("{fqn}.{attr}"));
            }
            trace!(class = %fqn, attr, "unknown external member rejected");
            return None;
        }

        // Stepping through an external namespace path itself (`ns.func`,
        // `ns.sub.Class`) concatenates until the path leaves the
        // allow-listed prefix.
        if self.is_external_namespace_path(&fqn) {
            return Some(format!("{fqn}.{attr}"));
        }

        trace!(%fqn, attr, "chain step failed");
        None
    }

    /// True when `fqn` is an allow-listed namespace or a dotted prefix of
    /// one — never a name past the namespace boundary.
    fn is_external_namespace_path(&self, fqn: &str) -> bool {
        self.config.external_namespaces().iter().any(|ns| {
            ns == fqn
                || (ns.starts_with(fqn) && ns.as_bytes().get(fqn.len()) == Some(&b'.'))
        })
    }

    // ============================================================
    // Class member lookup (inheritance-aware)
    // ============================================================

    /// Direct method first, then a declared attribute (substituting its
    /// type), then the parent list depth-first, most-derived-first.
    fn class_member(
        &self,
        class: &ClassEntry,
        attr: &str,
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        if let Some(found) = self.own_member(class, attr, ctx) {
            return Some(found);
        }

        let mut visited = FxHashSet::default();
        visited.insert(class.fqn.clone());
        let found = self.inherited_member(class, attr, ctx, &mut visited)?;

        // A second ancestor branch also supplying the member means the
        // most-derived, first-declared branch silently won; surface that.
        let mut providers = 0usize;
        for parent in &class.parents {
            if let Some(entry) = self.catalog.class(parent) {
                if self.provides_member(entry, attr) {
                    providers += 1;
                }
            }
        }
        if providers > 1 {
            ctx.push_event(AnalysisEvent::AmbiguousInheritance {
                class: class.fqn.clone(),
                member: attr.to_string(),
                chosen: found.clone(),
            });
        }

        Some(found)
    }

    /// A member declared on the class itself: a cataloged method, or an
    /// attribute whose type the chain continues through.
    fn own_member(
        &self,
        class: &ClassEntry,
        attr: &str,
        ctx: &ResolutionContext,
    ) -> Option<QualifiedName> {
        let method = format!("{}.{}", class.fqn, attr);
        if self.catalog.function(&method).is_some() {
            return Some(method);
        }
        if let Some(ty) = class.attributes.get(attr) {
            return self.infer.reresolve(ty, &ctx.module).fqn().map(str::to_string);
        }
        None
    }

    /// Depth-first, most-derived-first ancestor walk with a visited-set
    /// cycle guard. Parents that never resolved to a cataloged class are
    /// skipped; that degrades this lookup locally instead of failing it.
    fn inherited_member(
        &self,
        class: &ClassEntry,
        attr: &str,
        ctx: &ResolutionContext,
        visited: &mut FxHashSet<QualifiedName>,
    ) -> Option<QualifiedName> {
        for parent in &class.parents {
            let Some(entry) = self.catalog.class(parent) else {
                continue;
            };
            if !visited.insert(entry.fqn.clone()) {
                continue;
            }
            if let Some(found) = self.own_member(entry, attr, ctx) {
                return Some(found);
            }
            if let Some(found) = self.inherited_member(entry, attr, ctx, visited) {
                return Some(found);
            }
        }
        None
    }

    /// Shallow check: does this ancestor branch supply the member at all?
    fn provides_member(&self, class: &ClassEntry, attr: &str) -> bool {
        let method = format!("{}.{}", class.fqn, attr);
        if self.catalog.function(&method).is_some() || class.attributes.contains_key(attr) {
            return true;
        }
        let mut visited = FxHashSet::default();
        visited.insert(class.fqn.clone());
        self.provides_member_deep(class, attr, &mut visited)
    }

    fn provides_member_deep(
        &self,
        class: &ClassEntry,
        attr: &str,
        visited: &mut FxHashSet<QualifiedName>,
    ) -> bool {
        for parent in &class.parents {
            let Some(entry) = self.catalog.class(parent) else {
                continue;
            };
            if !visited.insert(entry.fqn.clone()) {
                continue;
            }
            let method = format!("{}.{}", entry.fqn, attr);
            if self.catalog.function(&method).is_some()
                || entry.attributes.contains_key(attr)
                || self.provides_member_deep(entry, attr, visited)
            {
                return true;
            }
        }
        false
    }
}
