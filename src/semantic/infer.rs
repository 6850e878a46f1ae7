//! Lightweight type inference.
//!
//! Best-effort typing of expressions and call results against the frozen
//! catalog. Total by contract: malformed or unrecognized input degrades to
//! [`TypeDescriptor::Unknown`], never an error.

use tracing::trace;

use crate::catalog::{
    Catalog, PrimitiveType, TypeDescriptor, normalize_annotation,
};
use crate::config::AnalyzerConfig;
use crate::syntax::{Expr, Literal};

use super::symbol_table::SymbolTable;

/// Read access to the current activation's bindings, the seam through which
/// bare-name propagation sees the symbol table without the engine owning it.
pub trait Bindings {
    fn binding(&self, name: &str) -> Option<&TypeDescriptor>;
}

impl Bindings for SymbolTable {
    fn binding(&self, name: &str) -> Option<&TypeDescriptor> {
        self.lookup(name)
    }
}

/// The inference engine: reads the catalog, never writes anything.
pub struct TypeInference<'a> {
    catalog: &'a Catalog,
    config: &'a AnalyzerConfig,
}

impl<'a> TypeInference<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a AnalyzerConfig) -> Self {
        Self { catalog, config }
    }

    /// Type an assignment right-hand side.
    ///
    /// Literals and container displays get their tag; a bare name
    /// propagates its current binding. Call results are typed separately
    /// via [`infer_call_result`](Self::infer_call_result) once the caller
    /// has resolved the callee.
    pub fn infer_expr(&self, expr: &Expr, bindings: &dyn Bindings) -> TypeDescriptor {
        match expr {
            Expr::Literal(Literal::Str(_)) => TypeDescriptor::Primitive(PrimitiveType::Str),
            Expr::Literal(Literal::Int(_)) => TypeDescriptor::Primitive(PrimitiveType::Int),
            Expr::Literal(Literal::Float(_)) => TypeDescriptor::Primitive(PrimitiveType::Float),
            Expr::Literal(Literal::Bool(_)) => TypeDescriptor::Primitive(PrimitiveType::Bool),
            Expr::Literal(Literal::None) => TypeDescriptor::Unknown,
            Expr::List(_) => TypeDescriptor::Primitive(PrimitiveType::List),
            Expr::Dict(_) => TypeDescriptor::Primitive(PrimitiveType::Dict),
            Expr::Set(_) => TypeDescriptor::Primitive(PrimitiveType::Set),
            Expr::Tuple(_) => TypeDescriptor::Primitive(PrimitiveType::Tuple),
            Expr::Name(name) => bindings
                .binding(name)
                .cloned()
                .unwrap_or(TypeDescriptor::Unknown),
            _ => TypeDescriptor::Unknown,
        }
    }

    /// The result type of calling `callee_fqn`: a class yields itself (an
    /// instantiation), a function yields its declared return type,
    /// normalized and re-resolved.
    pub fn infer_call_result(&self, callee_fqn: &str, module: &str) -> TypeDescriptor {
        if self.catalog.class(callee_fqn).is_some() {
            return TypeDescriptor::Internal(callee_fqn.to_string());
        }
        if self.catalog.external_class(callee_fqn).is_some() {
            return TypeDescriptor::External(callee_fqn.to_string());
        }
        if let Some(function) = self.catalog.function(callee_fqn) {
            return match &function.return_type {
                Some(ty) => self.reresolve(ty, module),
                None => TypeDescriptor::Unknown,
            };
        }
        trace!(callee = callee_fqn, "no inference available for call result");
        TypeDescriptor::Unknown
    }

    /// Re-resolve a stored descriptor against the catalog, the current
    /// module, and the external catalog. Descriptors that already carry a
    /// primitive or external name pass through; internal names that match
    /// nothing are kept as the literal token.
    pub fn reresolve(&self, ty: &TypeDescriptor, module: &str) -> TypeDescriptor {
        match ty {
            TypeDescriptor::Internal(name) => self.resolve_type_name(name, module),
            other => other.clone(),
        }
    }

    /// Resolve a (possibly raw) annotation token to the best descriptor
    /// available.
    pub fn resolve_type_name(&self, token: &str, module: &str) -> TypeDescriptor {
        let Some(base) = normalize_annotation(token) else {
            return TypeDescriptor::Unknown;
        };
        if let Some(primitive) = PrimitiveType::from_token(&base) {
            return TypeDescriptor::Primitive(primitive);
        }
        if self.catalog.class(&base).is_some() {
            return TypeDescriptor::Internal(base.to_string());
        }
        let qualified = format!("{module}.{base}");
        if self.catalog.class(&qualified).is_some() {
            return TypeDescriptor::Internal(qualified);
        }
        if self.config.is_external(&base) {
            return TypeDescriptor::External(base.to_string());
        }
        if let Some(entry) = self.catalog.external_by_alias(&base) {
            return TypeDescriptor::External(entry.fqn.clone());
        }
        // Kept as the literal token; chains through it degrade instead of
        // failing catalog-wide.
        TypeDescriptor::Internal(base.to_string())
    }
}
