//! The pass-2 driver.
//!
//! Walks every module's functions and methods, maintaining one
//! [`ResolutionContext`] per function activation, resolving each call and
//! name reference, and classifying every resolved target into exactly one
//! report bucket. Nested functions are traversed in place; their effects
//! are attributed to the enclosing named function.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::catalog::{Catalog, CatalogBuilder, TypeDescriptor};
use crate::config::AnalyzerConfig;
use crate::error::ModuleAnalysisError;
use crate::events::{AnalysisEvent, EventSink};
use crate::semantic::{NameResolver, ResolutionContext};
use crate::syntax::{ClassDef, Expr, FunctionDef, ModuleTree, Stmt, is_dotted_path};

use super::classifier::{CallClassifier, ReferenceBucket};
use super::report::{ClassReport, FunctionReport, ModuleReport, StateSlot};

/// Drives both passes and owns the pluggable call classifier.
pub struct Analyzer<'a> {
    config: &'a AnalyzerConfig,
    classifier: Option<&'a dyn CallClassifier>,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    /// Install a call classifier consulted before default classification.
    pub fn with_classifier(mut self, classifier: &'a dyn CallClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// The full two-pass run: build and freeze the catalog, then analyze
    /// every module against it. The passes are strictly sequential so that
    /// forward references to declarations in later files resolve.
    pub fn run(
        &self,
        modules: &[ModuleTree],
        events: &mut dyn EventSink,
    ) -> (Catalog, Vec<ModuleReport>) {
        let catalog = CatalogBuilder::new(self.config).build(modules, events);
        let reports = self.analyze(&catalog, modules, events);
        (catalog, reports)
    }

    /// Pass 2 against an already-frozen catalog.
    ///
    /// A module that fails analysis degrades to an empty report; the run
    /// continues.
    pub fn analyze(
        &self,
        catalog: &Catalog,
        modules: &[ModuleTree],
        events: &mut dyn EventSink,
    ) -> Vec<ModuleReport> {
        debug!(modules = modules.len(), "analyzing module set");
        modules
            .iter()
            .map(|module| match self.analyze_module(catalog, module, events) {
                Ok(report) => report,
                Err(err) => {
                    warn!(module = %module.name, error = %err, "module degraded to empty report");
                    events.emit(AnalysisEvent::ModuleSkipped {
                        module: module.name.to_string(),
                        reason: err.to_string(),
                    });
                    ModuleReport::empty(module.name.as_str())
                }
            })
            .collect()
    }

    fn analyze_module(
        &self,
        catalog: &Catalog,
        module: &ModuleTree,
        events: &mut dyn EventSink,
    ) -> Result<ModuleReport, ModuleAnalysisError> {
        if !is_dotted_path(&module.name) {
            return Err(ModuleAnalysisError::InvalidModuleName(
                module.name.to_string(),
            ));
        }
        trace!(module = %module.name, "analyzing module");

        let resolver = NameResolver::new(catalog, self.config);
        let imports = collect_imports(&module.body);
        let mut report = ModuleReport::empty(module.name.as_str());
        report.imports = imports.clone();

        for stmt in &module.body {
            match stmt {
                Stmt::FunctionDef(func) => {
                    let fqn = format!("{}.{}", module.name, func.name);
                    report.functions.push(self.analyze_function(
                        &resolver, module, func, fqn, None, &imports, events,
                    ));
                }
                Stmt::ClassDef(class) => {
                    report
                        .classes
                        .push(self.analyze_class(&resolver, module, class, &imports, events));
                }
                Stmt::Assign {
                    target: Expr::Name(name),
                    value,
                    ..
                } => {
                    report.module_state.push(StateSlot {
                        name: name.clone(),
                        value: value.as_ref().map(Expr::render),
                    });
                }
                _ => {}
            }
        }

        Ok(report)
    }

    fn analyze_class(
        &self,
        resolver: &NameResolver<'_>,
        module: &ModuleTree,
        class: &ClassDef,
        imports: &IndexMap<SmolStr, String>,
        events: &mut dyn EventSink,
    ) -> ClassReport {
        let class_fqn = format!("{}.{}", module.name, class.name);
        let mut report = ClassReport {
            name: class.name.clone(),
            methods: Vec::new(),
        };
        for stmt in &class.body {
            if let Stmt::FunctionDef(method) = stmt {
                let fqn = format!("{}.{}", class_fqn, method.name);
                report.methods.push(self.analyze_function(
                    resolver,
                    module,
                    method,
                    fqn,
                    Some(&class_fqn),
                    imports,
                    events,
                ));
            }
        }
        report
    }

    // ============================================================
    // One function activation
    // ============================================================

    #[allow(clippy::too_many_arguments)]
    fn analyze_function(
        &self,
        resolver: &NameResolver<'_>,
        module: &ModuleTree,
        func: &FunctionDef,
        function_fqn: String,
        class_fqn: Option<&str>,
        imports: &IndexMap<SmolStr, String>,
        events: &mut dyn EventSink,
    ) -> FunctionReport {
        trace!(function = %function_fqn, "function activation");

        let mut ctx = ResolutionContext::new(module.name.as_str());
        for (alias, fqn) in imports {
            ctx.bind_import(alias.clone(), fqn.clone());
        }
        if let Some(class) = class_fqn {
            ctx.class_fqn = Some(class.to_string());
            if let Some(receiver) = func.receiver_name() {
                ctx.receiver = Some(receiver.clone());
            }
        }
        ctx.function_fqn = Some(function_fqn.clone());
        ctx.symbols.enter_function();
        self.seed_parameters(resolver, &mut ctx, func, &function_fqn, class_fqn.is_some());

        let args = func.params.iter().map(|p| p.name.clone()).collect();
        let mut report = FunctionReport::new(func.name.clone(), args);

        self.walk_body(&func.body, resolver, &mut ctx, &mut report);

        for event in ctx.take_events() {
            events.emit(event);
        }
        report
    }

    /// Bind declared parameter types from the cataloged signature. The
    /// receiver parameter stays unbound so receiver references resolve
    /// through the context's class instead.
    fn seed_parameters(
        &self,
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
        func: &FunctionDef,
        function_fqn: &str,
        is_method: bool,
    ) {
        let entry = resolver.catalog().function(function_fqn);
        for (index, param) in func.params.iter().enumerate() {
            if is_method && index == 0 {
                continue;
            }
            let declared = entry
                .and_then(|e| e.param_types.get(&param.name))
                .map(|ty| resolver.type_inference().reresolve(ty, &ctx.module))
                .or_else(|| {
                    param
                        .annotation
                        .as_deref()
                        .map(|token| resolver.type_inference().resolve_type_name(token, &ctx.module))
                })
                .unwrap_or(TypeDescriptor::Unknown);
            ctx.symbols.bind(param.name.clone(), declared);
        }
    }

    // ============================================================
    // Statement traversal
    // ============================================================

    fn walk_body(
        &self,
        body: &[Stmt],
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
        report: &mut FunctionReport,
    ) {
        for stmt in body {
            match stmt {
                Stmt::Assign {
                    target,
                    annotation,
                    value,
                } => {
                    if let Some(value) = value {
                        self.walk_expr(value, resolver, ctx, report);
                    }
                    if let Expr::Name(name) = target {
                        let ty = self.assigned_type(
                            annotation.as_deref(),
                            value.as_ref(),
                            resolver,
                            ctx,
                        );
                        ctx.symbols.bind(name.clone(), ty);
                    }
                }
                Stmt::Expr(expr) => self.walk_expr(expr, resolver, ctx, report),
                Stmt::Return(Some(expr)) => self.walk_expr(expr, resolver, ctx, report),
                Stmt::Return(None) => {}
                Stmt::If { test, body, orelse } => {
                    self.walk_expr(test, resolver, ctx, report);
                    self.walk_body(body, resolver, ctx, report);
                    self.walk_body(orelse, resolver, ctx, report);
                }
                Stmt::While { test, body } => {
                    self.walk_expr(test, resolver, ctx, report);
                    self.walk_body(body, resolver, ctx, report);
                }
                Stmt::For { target, iter, body } => {
                    self.walk_expr(iter, resolver, ctx, report);
                    ctx.symbols.bind(target.clone(), TypeDescriptor::Unknown);
                    self.walk_body(body, resolver, ctx, report);
                }
                // Nested functions are traversed in place; their effects
                // belong to the enclosing named function. The definition
                // itself binds its name like any other local.
                Stmt::FunctionDef(nested) => {
                    ctx.symbols.bind(nested.name.clone(), TypeDescriptor::Unknown);
                    ctx.symbols.enter_nested();
                    for param in &nested.params {
                        let ty = param
                            .annotation
                            .as_deref()
                            .map(|token| {
                                resolver.type_inference().resolve_type_name(token, &ctx.module)
                            })
                            .unwrap_or(TypeDescriptor::Unknown);
                        ctx.symbols.bind(param.name.clone(), ty);
                    }
                    self.walk_body(&nested.body, resolver, ctx, report);
                    ctx.symbols.exit_nested();
                }
                // Function-local imports only extend the alias map.
                Stmt::Import { target, alias } => {
                    let bound = alias.clone().unwrap_or_else(|| {
                        SmolStr::new(target.rsplit('.').next().unwrap_or(target.as_str()))
                    });
                    ctx.bind_import(bound, target.to_string());
                }
                Stmt::FromImport { module, names } => {
                    for imported in names {
                        ctx.bind_import(
                            imported.bound_name().clone(),
                            format!("{}.{}", module, imported.name),
                        );
                    }
                }
                Stmt::ClassDef(_) | Stmt::Pass => {}
            }
        }
    }

    /// The type bound by an assignment: the annotation when present, the
    /// resolved call result for call values, otherwise expression
    /// inference.
    fn assigned_type(
        &self,
        annotation: Option<&str>,
        value: Option<&Expr>,
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
    ) -> TypeDescriptor {
        if let Some(token) = annotation {
            return resolver.type_inference().resolve_type_name(token, &ctx.module);
        }
        let Some(value) = value else {
            return TypeDescriptor::Unknown;
        };
        if let Expr::Call { func, .. } = value {
            if let Some(parts) = func.dotted_parts() {
                if let Some(callee) = resolver.resolve(&parts, ctx) {
                    let module = ctx.module.clone();
                    return resolver.type_inference().infer_call_result(&callee, &module);
                }
            }
            return TypeDescriptor::Unknown;
        }
        resolver.type_inference().infer_expr(value, &ctx.symbols)
    }

    // ============================================================
    // Expression traversal
    // ============================================================

    fn walk_expr(
        &self,
        expr: &Expr,
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
        report: &mut FunctionReport,
    ) {
        match expr {
            Expr::Call { func, args } => {
                match func.dotted_parts() {
                    Some(parts) => self.record_reference(&parts, true, resolver, ctx, report),
                    None => self.record_computed_call(func, resolver, ctx, report),
                }
                for arg in args {
                    self.walk_expr(arg, resolver, ctx, report);
                }
            }
            Expr::Name(_) | Expr::Attribute { .. } => match expr.dotted_parts() {
                Some(parts) => self.record_reference(&parts, false, resolver, ctx, report),
                None => {
                    if let Expr::Attribute { value, .. } = expr {
                        self.walk_expr(value, resolver, ctx, report);
                    }
                }
            },
            Expr::Literal(_) => {}
            Expr::List(items) | Expr::Set(items) | Expr::Tuple(items) => {
                for item in items {
                    self.walk_expr(item, resolver, ctx, report);
                }
            }
            Expr::Dict(pairs) => {
                for (key, value) in pairs {
                    self.walk_expr(key, resolver, ctx, report);
                    self.walk_expr(value, resolver, ctx, report);
                }
            }
            Expr::Binary { left, right } => {
                self.walk_expr(left, resolver, ctx, report);
                self.walk_expr(right, resolver, ctx, report);
            }
            Expr::Unary(inner) => self.walk_expr(inner, resolver, ctx, report),
            Expr::Subscript { value, index } => {
                self.walk_expr(value, resolver, ctx, report);
                self.walk_expr(index, resolver, ctx, report);
            }
        }
    }

    /// A call whose callee is not a pure name chain: a method on a
    /// computed receiver (`make().run()`, `Widget().render()`). The
    /// receiver expression is traversed normally, then its inferred type
    /// carries one member step.
    fn record_computed_call(
        &self,
        func: &Expr,
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
        report: &mut FunctionReport,
    ) {
        let Expr::Attribute { value, attr } = func else {
            self.walk_expr(func, resolver, ctx, report);
            return;
        };
        self.walk_expr(value, resolver, ctx, report);

        let receiver_ty = self.assigned_type(None, Some(value.as_ref()), resolver, ctx);
        let Some(base_fqn) = receiver_ty.fqn().map(str::to_string) else {
            return;
        };
        let Some(target) = resolver.resolve_member(&base_fqn, attr, ctx) else {
            return;
        };
        if let Some(classifier) = self.classifier {
            if let Some(bucket) = classifier.classify(&target, ctx) {
                self.file(bucket, target, report);
                return;
            }
        }
        let bucket = self.default_bucket(&target, attr, resolver.catalog(), ctx);
        self.file(bucket, target, report);
    }

    // ============================================================
    // Classification
    // ============================================================

    /// Resolve one reference and file it under exactly one bucket.
    /// Unresolved targets are rejected silently; that is a normal result,
    /// not an error.
    fn record_reference(
        &self,
        parts: &[SmolStr],
        is_call: bool,
        resolver: &NameResolver<'_>,
        ctx: &mut ResolutionContext,
        report: &mut FunctionReport,
    ) {
        let Some(target) = resolver.resolve(parts, ctx) else {
            return;
        };

        // The plugin sees calls only, before the default rules.
        if is_call {
            if let Some(classifier) = self.classifier {
                if let Some(bucket) = classifier.classify(&target, ctx) {
                    self.file(bucket, target, report);
                    return;
                }
            }
        }

        let bucket = self.default_bucket(&target, &parts[0], resolver.catalog(), ctx);
        self.file(bucket, target, report);
    }

    /// Default classification order: class → function / external prefix →
    /// unshadowed state → rejected.
    fn default_bucket(
        &self,
        target: &str,
        base_name: &str,
        catalog: &Catalog,
        ctx: &ResolutionContext,
    ) -> ReferenceBucket {
        if catalog.is_class(target) {
            return ReferenceBucket::Instantiation;
        }
        if catalog.is_function(target) || self.config.is_external(target) {
            return ReferenceBucket::Call;
        }
        // A bound local name shadows module state.
        if catalog.state_entry(target).is_some() && !ctx.symbols.is_bound(base_name) {
            return ReferenceBucket::StateAccess;
        }
        ReferenceBucket::Rejected
    }

    fn file(&self, bucket: ReferenceBucket, target: String, report: &mut FunctionReport) {
        match bucket {
            ReferenceBucket::Call => {
                report.calls.insert(target);
            }
            ReferenceBucket::Instantiation => {
                report.instantiations.insert(target);
            }
            ReferenceBucket::StateAccess => {
                report.accessed_state.insert(target);
            }
            ReferenceBucket::Rejected => {}
        }
    }
}

/// Import bindings declared at module top level, in order.
fn collect_imports(body: &[Stmt]) -> IndexMap<SmolStr, String> {
    let mut imports = IndexMap::new();
    for stmt in body {
        match stmt {
            Stmt::Import { target, alias } => {
                let bound = alias.clone().unwrap_or_else(|| {
                    SmolStr::new(target.rsplit('.').next().unwrap_or(target.as_str()))
                });
                imports.insert(bound, target.to_string());
            }
            Stmt::FromImport { module, names } => {
                for imported in names {
                    imports.insert(
                        imported.bound_name().clone(),
                        format!("{}.{}", module, imported.name),
                    );
                }
            }
            _ => {}
        }
    }
    imports
}
