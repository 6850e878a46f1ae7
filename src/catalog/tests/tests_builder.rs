#![allow(clippy::unwrap_used)]
use crate::catalog::{CatalogBuilder, PrimitiveType, TypeDescriptor};
use crate::config::AnalyzerConfig;
use crate::events::{AnalysisEvent, CollectingSink};
use crate::syntax::{
    ClassDef, Expr, FunctionDef, ImportedName, Literal, ModuleTree, Param, Stmt,
};

fn fixture_module() -> ModuleTree {
    // from sqlkit import Connection, connect
    // class Service(Base):
    //     def init(self, size: int, conn):
    //         self.size = size
    //         self.conn = Connection()
    //         self.name = "svc"
    //     def run(self) -> 'Service': pass
    // def make(count: int) -> Service: pass
    // LIMIT = 10
    // registry: dict
    ModuleTree::new(
        "app",
        vec![
            Stmt::FromImport {
                module: "sqlkit".into(),
                names: vec![
                    ImportedName::plain("Connection"),
                    ImportedName::plain("connect"),
                ],
            },
            Stmt::ClassDef(ClassDef {
                name: "Service".into(),
                bases: vec!["Base".into()],
                body: vec![
                    Stmt::FunctionDef(FunctionDef {
                        name: "init".into(),
                        params: vec![
                            Param::new("self"),
                            Param::annotated("size", "int"),
                            Param::new("conn"),
                        ],
                        returns: None,
                        body: vec![
                            Stmt::Assign {
                                target: Expr::dotted(&["self", "size"]),
                                annotation: None,
                                value: Some(Expr::name("size")),
                            },
                            Stmt::Assign {
                                target: Expr::dotted(&["self", "conn"]),
                                annotation: None,
                                value: Some(Expr::call(Expr::name("Connection"), vec![])),
                            },
                            Stmt::Assign {
                                target: Expr::dotted(&["self", "name"]),
                                annotation: None,
                                value: Some(Expr::Literal(Literal::Str("svc".into()))),
                            },
                        ],
                    }),
                    Stmt::FunctionDef(FunctionDef {
                        name: "run".into(),
                        params: vec![Param::new("self")],
                        returns: Some("'Service'".into()),
                        body: vec![Stmt::Pass],
                    }),
                ],
            }),
            Stmt::FunctionDef(FunctionDef {
                name: "make".into(),
                params: vec![Param::annotated("count", "int")],
                returns: Some("Service".into()),
                body: vec![Stmt::Pass],
            }),
            Stmt::Assign {
                target: Expr::name("LIMIT"),
                annotation: None,
                value: Some(Expr::Literal(Literal::Int(10))),
            },
            Stmt::Assign {
                target: Expr::name("registry"),
                annotation: Some("dict".into()),
                value: None,
            },
        ],
    )
}

fn config() -> AnalyzerConfig {
    AnalyzerConfig::new(["sqlkit"]).unwrap()
}

#[test]
fn classes_functions_and_state_are_cataloged() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    assert!(catalog.class("app.Service").is_some());
    assert!(catalog.function("app.Service.init").is_some());
    assert!(catalog.function("app.Service.run").is_some());
    assert!(catalog.function("app.make").is_some());
    assert!(catalog.state_entry("app.LIMIT").is_some());
    assert!(catalog.state_entry("app.registry").is_some());
}

#[test]
fn constructor_attributes_are_typed() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    let service = catalog.class("app.Service").unwrap();
    assert_eq!(
        service.attributes.get("size"),
        Some(&TypeDescriptor::Primitive(PrimitiveType::Int))
    );
    assert_eq!(
        service.attributes.get("conn"),
        Some(&TypeDescriptor::External("sqlkit.Connection".into()))
    );
    assert_eq!(
        service.attributes.get("name"),
        Some(&TypeDescriptor::Primitive(PrimitiveType::Str))
    );
}

#[test]
fn declared_signatures_keep_literal_tokens_for_pass_two() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    let make = catalog.function("app.make").unwrap();
    assert_eq!(
        make.param_types.get("count"),
        Some(&TypeDescriptor::Primitive(PrimitiveType::Int))
    );
    // Unqualified class tokens stay literal until pass-2 re-resolution.
    assert_eq!(
        make.return_type,
        Some(TypeDescriptor::Internal("Service".into()))
    );

    // Quoted forward reference normalizes the same way.
    let run = catalog.function("app.Service.run").unwrap();
    assert_eq!(
        run.return_type,
        Some(TypeDescriptor::Internal("Service".into()))
    );
}

#[test]
fn state_typing_tracks_inference_source() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    let limit = catalog.state_entry("app.LIMIT").unwrap();
    assert_eq!(limit.ty, Some(TypeDescriptor::Primitive(PrimitiveType::Int)));
    assert!(limit.inferred_from_value);

    let registry = catalog.state_entry("app.registry").unwrap();
    assert_eq!(
        registry.ty,
        Some(TypeDescriptor::Primitive(PrimitiveType::Dict))
    );
    assert!(!registry.inferred_from_value);
}

#[test]
fn allowlisted_imports_are_registered_by_kind() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    assert!(catalog.external_class("sqlkit.Connection").is_some());
    assert!(catalog.external_function("sqlkit.connect").is_some());
    assert_eq!(
        catalog.external_by_alias("Connection").unwrap().fqn,
        "sqlkit.Connection"
    );
}

#[test]
fn non_allowlisted_imports_are_not_registered() {
    let config = AnalyzerConfig::new(["webkit"]).unwrap();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    assert!(catalog.external_class("sqlkit.Connection").is_none());
    assert!(catalog.external_function("sqlkit.connect").is_none());
}

#[test]
fn unresolved_parent_keeps_literal_and_reports() {
    let config = config();
    let mut sink = CollectingSink::new();
    let catalog = CatalogBuilder::new(&config).build(&[fixture_module()], &mut sink);

    let service = catalog.class("app.Service").unwrap();
    assert_eq!(service.parents, vec!["Base".to_string()]);
    assert!(sink.events().iter().any(|e| matches!(
        e,
        AnalysisEvent::UnresolvedParent { class, parent }
            if class == "app.Service" && parent == "Base"
    )));
}

#[test]
fn merge_order_is_deterministic() {
    let config = config();
    let modules = vec![
        fixture_module(),
        ModuleTree::new(
            "zoo",
            vec![Stmt::ClassDef(ClassDef {
                name: "Keeper".into(),
                bases: vec![],
                body: vec![],
            })],
        ),
    ];

    let first = CatalogBuilder::new(&config).build(&modules, &mut CollectingSink::new());
    let second = CatalogBuilder::new(&config).build(&modules, &mut CollectingSink::new());

    let order = |catalog: &crate::catalog::Catalog| {
        catalog.classes().map(|c| c.fqn.clone()).collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
    assert_eq!(first, second);
}
