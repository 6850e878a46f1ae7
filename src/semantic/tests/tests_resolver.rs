#![allow(clippy::unwrap_used)]
use smol_str::SmolStr;

use crate::catalog::{Catalog, CatalogBuilder, PrimitiveType, TypeDescriptor};
use crate::config::AnalyzerConfig;
use crate::events::CollectingSink;
use crate::semantic::{NameResolver, ResolutionContext};
use crate::syntax::{
    ClassDef, Expr, FunctionDef, ImportedName, Literal, ModuleTree, Param, Stmt,
};

fn parts(names: &[&str]) -> Vec<SmolStr> {
    names.iter().map(|n| SmolStr::new(n)).collect()
}

fn method(name: &str) -> Stmt {
    Stmt::FunctionDef(FunctionDef {
        name: name.into(),
        params: vec![Param::new("self")],
        returns: None,
        body: vec![Stmt::Pass],
    })
}

fn fixture() -> (Catalog, AnalyzerConfig) {
    // lib:
    //   class Parent:
    //       def greet(self): pass
    //   class Child(Parent): pass
    //   class Holder:
    //       def init(self):
    //           self.child = Child()
    //           self.label = "x"
    //   current = Child()
    // app:
    //   from sqlkit import Connection
    //   def helper(): pass
    let lib = ModuleTree::new(
        "lib",
        vec![
            Stmt::ClassDef(ClassDef {
                name: "Parent".into(),
                bases: vec![],
                body: vec![method("greet")],
            }),
            Stmt::ClassDef(ClassDef {
                name: "Child".into(),
                bases: vec!["Parent".into()],
                body: vec![],
            }),
            Stmt::ClassDef(ClassDef {
                name: "Holder".into(),
                bases: vec![],
                body: vec![Stmt::FunctionDef(FunctionDef {
                    name: "init".into(),
                    params: vec![Param::new("self")],
                    returns: None,
                    body: vec![
                        Stmt::Assign {
                            target: Expr::dotted(&["self", "child"]),
                            annotation: None,
                            value: Some(Expr::call(Expr::name("Child"), vec![])),
                        },
                        Stmt::Assign {
                            target: Expr::dotted(&["self", "label"]),
                            annotation: None,
                            value: Some(Expr::Literal(Literal::Str("x".into()))),
                        },
                    ],
                })],
            }),
            Stmt::Assign {
                target: Expr::name("current"),
                annotation: None,
                value: Some(Expr::call(Expr::name("Child"), vec![])),
            },
        ],
    );
    let app = ModuleTree::new(
        "app",
        vec![
            Stmt::FromImport {
                module: "sqlkit".into(),
                names: vec![ImportedName::plain("Connection")],
            },
            Stmt::FunctionDef(FunctionDef {
                name: "helper".into(),
                params: vec![],
                returns: None,
                body: vec![Stmt::Pass],
            }),
        ],
    );
    let config = AnalyzerConfig::new(["sqlkit"])
        .unwrap()
        .with_members("sqlkit", ["execute", "close"])
        .unwrap();
    let catalog = CatalogBuilder::new(&config).build(&[lib, app], &mut CollectingSink::new());
    (catalog, config)
}

#[test]
fn local_binding_wins_over_import_alias() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.bind_import("helper", "other.helper");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("helper", TypeDescriptor::Internal("lib.Child".into()));

    assert_eq!(
        resolver.resolve(&parts(&["helper"]), &mut ctx),
        Some("lib.Child".to_string())
    );
}

#[test]
fn local_binding_without_fqn_blocks_resolution() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.bind_import("helper", "other.helper");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("helper", TypeDescriptor::Primitive(PrimitiveType::Int));

    // The local still wins; its type has no FQN, so resolution yields None
    // rather than falling through to the alias.
    assert_eq!(resolver.resolve(&parts(&["helper"]), &mut ctx), None);
}

#[test]
fn receiver_resolves_to_current_class() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib")
        .with_class("lib.Holder")
        .with_receiver("self");
    ctx.symbols.enter_function();

    assert_eq!(
        resolver.resolve(&parts(&["self"]), &mut ctx),
        Some("lib.Holder".to_string())
    );
}

#[test]
fn receiver_outside_any_class_resolves_to_none() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib");
    ctx.symbols.enter_function();

    assert_eq!(resolver.resolve(&parts(&["self"]), &mut ctx), None);
}

#[test]
fn import_alias_resolves_before_module_fallback() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.bind_import("Connection", "sqlkit.Connection");
    ctx.symbols.enter_function();

    assert_eq!(
        resolver.resolve(&parts(&["Connection"]), &mut ctx),
        Some("sqlkit.Connection".to_string())
    );
}

#[test]
fn module_fallback_always_succeeds_unvalidated() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.symbols.enter_function();

    // Nothing named `missing` exists anywhere; forward-reference tolerance
    // still produces a module-qualified name.
    assert_eq!(
        resolver.resolve(&parts(&["missing"]), &mut ctx),
        Some("app.missing".to_string())
    );
}

#[test]
fn chain_failure_yields_no_partial_result() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("p", TypeDescriptor::Internal("lib.Parent".into()));

    assert_eq!(resolver.resolve(&parts(&["p", "nope"]), &mut ctx), None);
    assert_eq!(
        resolver.resolve(&parts(&["p", "nope", "deeper"]), &mut ctx),
        None
    );
}

#[test]
fn inherited_method_resolves_through_parent() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("instance", TypeDescriptor::Internal("lib.Child".into()));

    assert_eq!(
        resolver.resolve(&parts(&["instance", "greet"]), &mut ctx),
        Some("lib.Parent.greet".to_string())
    );
}

#[test]
fn attribute_step_substitutes_the_attribute_type() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib")
        .with_class("lib.Holder")
        .with_receiver("self");
    ctx.symbols.enter_function();

    // self.child: Child; greet comes from Parent.
    assert_eq!(
        resolver.resolve(&parts(&["self", "child", "greet"]), &mut ctx),
        Some("lib.Parent.greet".to_string())
    );
    // self.label is a primitive; the chain cannot continue through it.
    assert_eq!(
        resolver.resolve(&parts(&["self", "label", "upper"]), &mut ctx),
        None
    );
}

#[test]
fn state_entry_substitutes_its_type() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib");
    ctx.symbols.enter_function();

    // `current` is module state typed lib.Child; the module fallback names
    // the state entry, whose type carries the rest of the chain.
    assert_eq!(
        resolver.resolve(&parts(&["current", "greet"]), &mut ctx),
        Some("lib.Parent.greet".to_string())
    );
}

#[test]
fn external_members_follow_the_allowlist() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.bind_import("Connection", "sqlkit.Connection");
    ctx.symbols.enter_function();

    assert_eq!(
        resolver.resolve(&parts(&["Connection", "execute"]), &mut ctx),
        Some("sqlkit.Connection.execute".to_string())
    );
    // Unknown members are rejected, never guessed.
    assert_eq!(
        resolver.resolve(&parts(&["Connection", "drop_all"]), &mut ctx),
        None
    );
}

#[test]
fn external_namespace_paths_concatenate() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("app");
    ctx.bind_import("sqlkit", "sqlkit");
    ctx.symbols.enter_function();

    assert_eq!(
        resolver.resolve(&parts(&["sqlkit", "connect"]), &mut ctx),
        Some("sqlkit.connect".to_string())
    );
}

#[test]
fn ambiguous_inheritance_picks_first_branch_and_reports() {
    use crate::events::AnalysisEvent;

    // d:
    //   class Left:  def act(self): pass
    //   class Right: def act(self): pass
    //   class Both(Left, Right): pass
    let module = ModuleTree::new(
        "d",
        vec![
            Stmt::ClassDef(ClassDef {
                name: "Left".into(),
                bases: vec![],
                body: vec![method("act")],
            }),
            Stmt::ClassDef(ClassDef {
                name: "Right".into(),
                bases: vec![],
                body: vec![method("act")],
            }),
            Stmt::ClassDef(ClassDef {
                name: "Both".into(),
                bases: vec!["Left".into(), "Right".into()],
                body: vec![],
            }),
        ],
    );
    let config = AnalyzerConfig::default();
    let catalog = CatalogBuilder::new(&config).build(&[module], &mut CollectingSink::new());
    let resolver = NameResolver::new(&catalog, &config);

    let mut ctx = ResolutionContext::new("d");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("b", TypeDescriptor::Internal("d.Both".into()));

    // Most-derived, first-declared branch wins.
    assert_eq!(
        resolver.resolve(&parts(&["b", "act"]), &mut ctx),
        Some("d.Left.act".to_string())
    );
    assert!(ctx.take_events().iter().any(|e| matches!(
        e,
        AnalysisEvent::AmbiguousInheritance { class, member, chosen }
            if class == "d.Both" && member == "act" && chosen == "d.Left.act"
    )));
}

#[test]
fn repeated_resolution_is_deterministic_and_cached() {
    let (catalog, config) = fixture();
    let resolver = NameResolver::new(&catalog, &config);
    let mut ctx = ResolutionContext::new("lib");
    ctx.symbols.enter_function();
    ctx.symbols
        .bind("instance", TypeDescriptor::Internal("lib.Child".into()));

    let chain = parts(&["instance", "greet"]);
    let first = resolver.resolve(&chain, &mut ctx);
    let cached_entries = ctx.cached_len();
    let second = resolver.resolve(&chain, &mut ctx);

    assert_eq!(first, second);
    assert_eq!(ctx.cached_len(), cached_entries);
}
