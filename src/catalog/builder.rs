//! Catalog construction: one reconnaissance pass over every module.
//!
//! Per-module fragments have no cross-file dependency, so they are built in
//! parallel and merged deterministically in input order. Parent linking and
//! the diagnostic sweep run sequentially over the merged whole-program set,
//! because both need every module's classes in view.

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::config::{AnalyzerConfig, NameKind};
use crate::events::{AnalysisEvent, EventSink};
use crate::syntax::{ClassDef, Expr, FunctionDef, Literal, ModuleTree, Stmt};

use super::entries::{ClassEntry, ExternalEntry, FunctionEntry, StateEntry};
use super::index::Catalog;
use super::types::{PrimitiveType, TypeDescriptor, normalize_annotation};
use super::QualifiedName;

/// Builds the whole-program [`Catalog`] (pass 1).
pub struct CatalogBuilder<'a> {
    config: &'a AnalyzerConfig,
}

/// Per-module naming context while a fragment is built: the module name and
/// the import bindings seen so far, in statement order.
struct ModuleScope<'m> {
    module: &'m str,
    aliases: FxHashMap<SmolStr, String>,
}

impl<'m> ModuleScope<'m> {
    fn new(module: &'m str) -> Self {
        Self {
            module,
            aliases: FxHashMap::default(),
        }
    }

    fn bind(&mut self, name: SmolStr, target: String) {
        self.aliases.insert(name, target);
    }

    /// Expand a name as written through the import bindings: an exact alias
    /// match wins; for dotted names the first segment is expanded; anything
    /// else is kept as written.
    fn expand(&self, written: &str) -> String {
        if let Some(target) = self.aliases.get(written) {
            return target.clone();
        }
        if let Some((head, rest)) = written.split_once('.') {
            if let Some(target) = self.aliases.get(head) {
                return format!("{target}.{rest}");
            }
        }
        written.to_string()
    }

    /// Resolve a callee chain with pass-1 knowledge only: import bindings
    /// plus the module-fallback for single names.
    fn resolve_callee(&self, parts: &[SmolStr]) -> Option<QualifiedName> {
        match parts {
            [] => None,
            [single] => Some(
                self.aliases
                    .get(single)
                    .cloned()
                    .unwrap_or_else(|| format!("{}.{}", self.module, single)),
            ),
            [head, rest @ ..] => {
                let mut fqn = self
                    .aliases
                    .get(head)
                    .cloned()
                    .unwrap_or_else(|| head.to_string());
                for part in rest {
                    fqn.push('.');
                    fqn.push_str(part);
                }
                Some(fqn)
            }
        }
    }
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Run pass 1 over every module and freeze the result.
    pub fn build(&self, modules: &[ModuleTree], events: &mut dyn EventSink) -> Catalog {
        debug!(modules = modules.len(), "building catalog");

        let fragments: Vec<Catalog> = modules
            .par_iter()
            .map(|module| self.build_fragment(module))
            .collect();

        let mut catalog = Catalog::new();
        for fragment in fragments {
            catalog.merge(fragment);
        }

        self.link_parents(&mut catalog, events);
        self.sweep_diagnostics(&catalog, events);

        debug!(
            classes = catalog.classes.len(),
            functions = catalog.functions.len(),
            state = catalog.state.len(),
            "catalog frozen"
        );
        catalog
    }

    // ============================================================
    // Per-module fragments
    // ============================================================

    fn build_fragment(&self, module: &ModuleTree) -> Catalog {
        trace!(module = %module.name, "building catalog fragment");
        let mut scope = ModuleScope::new(&module.name);
        let mut fragment = Catalog::new();

        for stmt in &module.body {
            match stmt {
                Stmt::Import { target, alias } => {
                    let bound = alias.clone().unwrap_or_else(|| {
                        SmolStr::new(target.rsplit('.').next().unwrap_or(target.as_str()))
                    });
                    scope.bind(bound, target.to_string());
                }
                Stmt::FromImport { module: source, names } => {
                    for imported in names {
                        let bound = imported.bound_name().clone();
                        let fqn = format!("{}.{}", source, imported.name);
                        scope.bind(bound.clone(), fqn.clone());
                        if self.config.is_external(source) {
                            self.register_external(&mut fragment, fqn, source, bound, &imported.name);
                        }
                    }
                }
                Stmt::ClassDef(class) => self.catalog_class(&mut fragment, class, &scope),
                Stmt::FunctionDef(func) => {
                    let fqn = format!("{}.{}", scope.module, func.name);
                    let entry = self.function_entry(fqn.clone(), func, &scope);
                    fragment.functions.insert(fqn, entry);
                }
                Stmt::Assign {
                    target: Expr::Name(name),
                    annotation,
                    value,
                } => {
                    let entry = self.state_entry(name, annotation.as_deref(), value.as_ref(), &scope);
                    fragment.state.insert(entry.fqn.clone(), entry);
                }
                _ => {}
            }
        }

        fragment
    }

    fn register_external(
        &self,
        fragment: &mut Catalog,
        fqn: QualifiedName,
        source: &str,
        local_alias: SmolStr,
        name: &str,
    ) {
        let entry = ExternalEntry {
            fqn: fqn.clone(),
            module: source.to_string(),
            local_alias,
        };
        match self.config.classify_name(name) {
            NameKind::Class => {
                fragment.external_classes.insert(fqn, entry);
            }
            NameKind::Function => {
                fragment.external_functions.insert(fqn, entry);
            }
        }
    }

    fn catalog_class(&self, fragment: &mut Catalog, class: &ClassDef, scope: &ModuleScope<'_>) {
        let fqn = format!("{}.{}", scope.module, class.name);
        let parents: Vec<String> = class.bases.iter().map(|b| scope.expand(b)).collect();
        let mut entry = ClassEntry {
            fqn: fqn.clone(),
            parents,
            attributes: IndexMap::new(),
        };

        for stmt in &class.body {
            if let Stmt::FunctionDef(method) = stmt {
                let method_fqn = format!("{}.{}", fqn, method.name);
                let method_entry = self.function_entry(method_fqn.clone(), method, scope);
                fragment.functions.insert(method_fqn, method_entry);

                if method.name == self.config.constructor_name() {
                    self.extract_attributes(&mut entry, method, scope);
                }
            }
        }

        fragment.classes.insert(fqn, entry);
    }

    fn function_entry(
        &self,
        fqn: QualifiedName,
        func: &FunctionDef,
        scope: &ModuleScope<'_>,
    ) -> FunctionEntry {
        let mut param_types = IndexMap::new();
        for param in &func.params {
            let ty = param
                .annotation
                .as_deref()
                .map(|token| self.annotation_descriptor(token, scope))
                .unwrap_or(TypeDescriptor::Unknown);
            param_types.insert(param.name.clone(), ty);
        }
        let return_type = func.returns.as_deref().and_then(|token| {
            let ty = self.annotation_descriptor(token, scope);
            (!ty.is_unknown()).then_some(ty)
        });
        FunctionEntry {
            fqn,
            param_types,
            return_type,
        }
    }

    fn state_entry(
        &self,
        name: &SmolStr,
        annotation: Option<&str>,
        value: Option<&Expr>,
        scope: &ModuleScope<'_>,
    ) -> StateEntry {
        let fqn = format!("{}.{}", scope.module, name);
        if let Some(token) = annotation {
            let ty = self.annotation_descriptor(token, scope);
            return StateEntry {
                fqn,
                ty: (!ty.is_unknown()).then_some(ty),
                inferred_from_value: false,
            };
        }
        let inferred = value
            .map(|v| self.infer_value(v, &IndexMap::new(), scope))
            .filter(|ty| !ty.is_unknown());
        StateEntry {
            fqn,
            inferred_from_value: inferred.is_some(),
            ty: inferred,
        }
    }

    // ============================================================
    // Constructor-body attribute extraction
    // ============================================================

    /// Collect `receiver.attr = ...` assignments from the constructor body,
    /// including inside control flow, typing each one from its annotation,
    /// literal shape, callee, or a propagated parameter type.
    fn extract_attributes(
        &self,
        entry: &mut ClassEntry,
        ctor: &FunctionDef,
        scope: &ModuleScope<'_>,
    ) {
        let Some(receiver) = ctor.receiver_name().cloned() else {
            return;
        };
        let mut params = IndexMap::new();
        for param in &ctor.params {
            if let Some(token) = param.annotation.as_deref() {
                params.insert(param.name.clone(), self.annotation_descriptor(token, scope));
            }
        }
        self.extract_from_body(entry, &ctor.body, &receiver, &params, scope);
    }

    fn extract_from_body(
        &self,
        entry: &mut ClassEntry,
        body: &[Stmt],
        receiver: &SmolStr,
        params: &IndexMap<SmolStr, TypeDescriptor>,
        scope: &ModuleScope<'_>,
    ) {
        for stmt in body {
            match stmt {
                Stmt::Assign {
                    target,
                    annotation,
                    value,
                } => {
                    let Expr::Attribute { value: base, attr } = target else {
                        continue;
                    };
                    if !matches!(base.as_ref(), Expr::Name(name) if name == receiver) {
                        continue;
                    }
                    let ty = match (annotation.as_deref(), value.as_ref()) {
                        (Some(token), _) => self.annotation_descriptor(token, scope),
                        (None, Some(v)) => self.infer_value(v, params, scope),
                        (None, None) => TypeDescriptor::Unknown,
                    };
                    entry.attributes.insert(attr.clone(), ty);
                }
                Stmt::If { body, orelse, .. } => {
                    self.extract_from_body(entry, body, receiver, params, scope);
                    self.extract_from_body(entry, orelse, receiver, params, scope);
                }
                Stmt::While { body, .. } | Stmt::For { body, .. } => {
                    self.extract_from_body(entry, body, receiver, params, scope);
                }
                _ => {}
            }
        }
    }

    /// Pass-1 value typing: literals and container displays get their tag, a
    /// call gets its locally-resolved callee FQN, a bare name propagates the
    /// referenced parameter's declared type. Anything else is Unknown.
    fn infer_value(
        &self,
        expr: &Expr,
        params: &IndexMap<SmolStr, TypeDescriptor>,
        scope: &ModuleScope<'_>,
    ) -> TypeDescriptor {
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
            Expr::Call { func, .. } => func
                .dotted_parts()
                .and_then(|parts| scope.resolve_callee(&parts))
                .map(|fqn| self.descriptor_for(fqn))
                .unwrap_or(TypeDescriptor::Unknown),
            Expr::Name(name) => params.get(name).cloned().unwrap_or(TypeDescriptor::Unknown),
            _ => TypeDescriptor::Unknown,
        }
    }

    /// Turn a declared annotation token into a descriptor with pass-1
    /// knowledge: primitives tag directly, import bindings expand, and
    /// everything else is kept as the literal (possibly unqualified) name
    /// for pass-2 re-resolution.
    fn annotation_descriptor(&self, token: &str, scope: &ModuleScope<'_>) -> TypeDescriptor {
        let Some(base) = normalize_annotation(token) else {
            return TypeDescriptor::Unknown;
        };
        if let Some(primitive) = PrimitiveType::from_token(&base) {
            return TypeDescriptor::Primitive(primitive);
        }
        self.descriptor_for(scope.expand(&base))
    }

    fn descriptor_for(&self, fqn: QualifiedName) -> TypeDescriptor {
        if self.config.is_external(&fqn) {
            TypeDescriptor::External(fqn)
        } else {
            TypeDescriptor::Internal(fqn)
        }
    }

    // ============================================================
    // Parent linking (whole-program, sequential)
    // ============================================================

    /// Resolve parent references: exact FQN, then same-module, then
    /// first-match-by-suffix across all modules. A parent that resolves
    /// nowhere keeps its literal name and is reported, never raised.
    fn link_parents(&self, catalog: &mut Catalog, events: &mut dyn EventSink) {
        let keys: Vec<QualifiedName> = catalog.classes.keys().cloned().collect();
        for key in keys {
            let Some(entry) = catalog.classes.get(&key) else {
                continue;
            };
            let module = module_prefix(&key);
            let raw_parents = entry.parents.clone();
            let mut linked = Vec::with_capacity(raw_parents.len());

            for parent in raw_parents {
                if catalog.classes.contains_key(&parent) {
                    linked.push(parent);
                    continue;
                }
                let same_module = format!("{module}.{parent}");
                if catalog.classes.contains_key(&same_module) {
                    linked.push(same_module);
                    continue;
                }
                if let Some(found) = catalog.find_class_by_suffix(&parent) {
                    linked.push(found.fqn.clone());
                    continue;
                }
                trace!(class = %key, parent = %parent, "parent unresolved, keeping literal");
                events.emit(AnalysisEvent::UnresolvedParent {
                    class: key.clone(),
                    parent: parent.clone(),
                });
                linked.push(parent);
            }

            if let Some(entry) = catalog.classes.get_mut(&key) {
                entry.parents = linked;
            }
        }
    }

    // ============================================================
    // Post-merge diagnostic sweep
    // ============================================================

    /// Report declared signature types that name no known declaration, and
    /// state slots with no usable type. Diagnostics only; entries are left
    /// as built.
    fn sweep_diagnostics(&self, catalog: &Catalog, events: &mut dyn EventSink) {
        for func in catalog.functions() {
            let module = enclosing_module(catalog, &func.fqn);
            for ty in func.param_types.values().chain(func.return_type.iter()) {
                if let TypeDescriptor::Internal(name) = ty {
                    if !self.names_known_entry(catalog, name, &module) {
                        events.emit(AnalysisEvent::UnresolvedAnnotation {
                            owner: func.fqn.clone(),
                            token: name.clone(),
                        });
                    }
                }
            }
        }
        for state in catalog.state() {
            if state.ty.is_none() {
                events.emit(AnalysisEvent::UntypedState {
                    fqn: state.fqn.clone(),
                });
            }
        }
    }

    fn names_known_entry(&self, catalog: &Catalog, name: &str, module: &str) -> bool {
        if catalog.is_class(name) || catalog.is_function(name) {
            return true;
        }
        let qualified = format!("{module}.{name}");
        catalog.is_class(&qualified)
            || catalog.is_function(&qualified)
            || self.config.is_external(name)
    }
}

/// The dotted prefix of an FQN (its defining namespace).
fn module_prefix(fqn: &str) -> &str {
    fqn.rsplit_once('.').map_or("", |(prefix, _)| prefix)
}

/// The module a function belongs to, stepping over an owning class.
fn enclosing_module(catalog: &Catalog, fqn: &str) -> String {
    let prefix = module_prefix(fqn);
    if catalog.classes.contains_key(prefix) {
        module_prefix(prefix).to_string()
    } else {
        prefix.to_string()
    }
}
