#![allow(clippy::unwrap_used)]
use crate::catalog::{Catalog, CatalogBuilder, PrimitiveType, TypeDescriptor};
use crate::config::AnalyzerConfig;
use crate::events::CollectingSink;
use crate::semantic::{SymbolTable, TypeInference};
use crate::syntax::{
    ClassDef, Expr, FunctionDef, ImportedName, Literal, ModuleTree, Param, Stmt,
};

fn fixture() -> (Catalog, AnalyzerConfig) {
    // m:
    //   from sqlkit import Connection
    //   class Widget: ...
    //   def make() -> 'Widget': pass
    //   def open_conn() -> Connection: pass
    //   def untyped(): pass
    let module = ModuleTree::new(
        "m",
        vec![
            Stmt::FromImport {
                module: "sqlkit".into(),
                names: vec![ImportedName::plain("Connection")],
            },
            Stmt::ClassDef(ClassDef {
                name: "Widget".into(),
                bases: vec![],
                body: vec![],
            }),
            Stmt::FunctionDef(FunctionDef {
                name: "make".into(),
                params: vec![],
                returns: Some("'Widget'".into()),
                body: vec![Stmt::Pass],
            }),
            Stmt::FunctionDef(FunctionDef {
                name: "open_conn".into(),
                params: vec![Param::new("dsn")],
                returns: Some("Connection".into()),
                body: vec![Stmt::Pass],
            }),
            Stmt::FunctionDef(FunctionDef {
                name: "untyped".into(),
                params: vec![],
                returns: None,
                body: vec![Stmt::Pass],
            }),
        ],
    );
    let config = AnalyzerConfig::new(["sqlkit"]).unwrap();
    let catalog = CatalogBuilder::new(&config).build(&[module], &mut CollectingSink::new());
    (catalog, config)
}

#[test]
fn literals_and_containers_get_their_tags() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);
    let table = SymbolTable::new();

    let cases = [
        (
            Expr::Literal(Literal::Str("a".into())),
            TypeDescriptor::Primitive(PrimitiveType::Str),
        ),
        (
            Expr::Literal(Literal::Int(1)),
            TypeDescriptor::Primitive(PrimitiveType::Int),
        ),
        (
            Expr::Literal(Literal::Float(1.5)),
            TypeDescriptor::Primitive(PrimitiveType::Float),
        ),
        (
            Expr::Literal(Literal::Bool(true)),
            TypeDescriptor::Primitive(PrimitiveType::Bool),
        ),
        (Expr::List(vec![]), TypeDescriptor::Primitive(PrimitiveType::List)),
        (Expr::Dict(vec![]), TypeDescriptor::Primitive(PrimitiveType::Dict)),
        (Expr::Set(vec![]), TypeDescriptor::Primitive(PrimitiveType::Set)),
        (
            Expr::Tuple(vec![]),
            TypeDescriptor::Primitive(PrimitiveType::Tuple),
        ),
    ];
    for (expr, expected) in cases {
        assert_eq!(infer.infer_expr(&expr, &table), expected);
    }
}

#[test]
fn bare_name_propagates_its_binding() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);
    let mut table = SymbolTable::new();
    table.enter_function();
    table.bind("w", TypeDescriptor::Internal("m.Widget".into()));

    assert_eq!(
        infer.infer_expr(&Expr::name("w"), &table),
        TypeDescriptor::Internal("m.Widget".into())
    );
    assert_eq!(
        infer.infer_expr(&Expr::name("unbound"), &table),
        TypeDescriptor::Unknown
    );
}

#[test]
fn calling_a_class_yields_the_class() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);
    assert_eq!(
        infer.infer_call_result("m.Widget", "m"),
        TypeDescriptor::Internal("m.Widget".into())
    );
    assert_eq!(
        infer.infer_call_result("sqlkit.Connection", "m"),
        TypeDescriptor::External("sqlkit.Connection".into())
    );
}

#[test]
fn calling_a_function_resolves_its_declared_return() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);

    // Quoted forward reference, re-resolved against the current module.
    assert_eq!(
        infer.infer_call_result("m.make", "m"),
        TypeDescriptor::Internal("m.Widget".into())
    );
    // Alias-expanded external return type.
    assert_eq!(
        infer.infer_call_result("m.open_conn", "m"),
        TypeDescriptor::External("sqlkit.Connection".into())
    );
    // No declared return type.
    assert_eq!(
        infer.infer_call_result("m.untyped", "m"),
        TypeDescriptor::Unknown
    );
}

#[test]
fn unknown_callee_never_raises() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);
    assert_eq!(
        infer.infer_call_result("nowhere.nothing", "m"),
        TypeDescriptor::Unknown
    );
}

#[test]
fn unresolvable_tokens_are_kept_literal() {
    let (catalog, config) = fixture();
    let infer = TypeInference::new(&catalog, &config);
    assert_eq!(
        infer.resolve_type_name("Mystery", "m"),
        TypeDescriptor::Internal("Mystery".into())
    );
    assert_eq!(
        infer.resolve_type_name("Optional[int]", "m"),
        TypeDescriptor::Primitive(PrimitiveType::Int)
    );
}
