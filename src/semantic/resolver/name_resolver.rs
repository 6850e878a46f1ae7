use smol_str::SmolStr;
use tracing::trace;

use crate::catalog::Catalog;
use crate::config::AnalyzerConfig;

use super::super::context::ResolutionContext;
use super::super::infer::TypeInference;
use super::super::QualifiedName;

/// Resolves dotted name references to stable FQNs.
///
/// All resolution logic lives here; the symbol table and catalog stay pure
/// data structures. Resolution is deterministic for a given
/// `(name parts, context)` pair, and a per-activation cache short-circuits
/// repeats.
pub struct NameResolver<'a> {
    pub(super) catalog: &'a Catalog,
    pub(super) config: &'a AnalyzerConfig,
    pub(super) infer: TypeInference<'a>,
}

impl<'a> NameResolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a AnalyzerConfig) -> Self {
        Self {
            catalog,
            config,
            infer: TypeInference::new(catalog, config),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// The inference engine backing this resolver, shared with callers that
    /// type assignment values.
    pub fn type_inference(&self) -> &TypeInference<'a> {
        &self.infer
    }

    // ============================================================
    // Primary Resolution API
    // ============================================================

    /// Resolve a name-part chain to an FQN, or `None`.
    ///
    /// Single parts go through the fixed priority ladder; longer chains
    /// resolve their head the same way, then walk one attribute at a time.
    /// Any failed step aborts the whole chain with no partial result.
    pub fn resolve(
        &self,
        parts: &[SmolStr],
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        if parts.is_empty() {
            return None;
        }
        if let Some(hit) = ctx.cache_get(parts) {
            trace!(?parts, "resolution cache hit");
            return hit;
        }
        let result = self.resolve_uncached(parts, ctx);
        trace!(?parts, ?result, "resolved");
        ctx.cache_put(parts.to_vec(), result.clone());
        result
    }

    fn resolve_uncached(
        &self,
        parts: &[SmolStr],
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedName> {
        let head = self.resolve_single(&parts[0], ctx)?;
        if parts.len() == 1 {
            return Some(head);
        }
        self.walk_chain(head, &parts[1..], ctx)
    }

    // ============================================================
    // Single-part resolution (fixed priority)
    // ============================================================

    /// Priority ladder: local binding → receiver reference → import alias /
    /// external alias → module fallback. The fallback always succeeds and
    /// its result is not validated against the catalog, preserving
    /// forward-reference tolerance, so it must stay last.
    fn resolve_single(&self, name: &str, ctx: &ResolutionContext) -> Option<QualifiedName> {
        // 1. A local binding always wins, including over a same-named
        //    import alias. A binding with no FQN ends resolution here.
        if let Some(ty) = ctx.symbols.lookup(name) {
            return ty.fqn().map(str::to_string);
        }

        // 2. Receiver reference: the current class, or nothing outside one.
        let is_receiver = ctx.receiver.as_deref() == Some(name)
            || name == self.config.receiver_name();
        if is_receiver {
            return ctx.class_fqn.clone();
        }

        // 3. Exact alias match in the import map, then in the external
        //    catalog.
        if let Some(fqn) = ctx.import_aliases.get(name) {
            return Some(fqn.clone());
        }
        if let Some(entry) = self.catalog.external_by_alias(name) {
            return Some(entry.fqn.clone());
        }

        // 4. Module fallback, unvalidated.
        Some(format!("{}.{}", ctx.module, name))
    }
}
