use smol_str::SmolStr;

use super::expr::Expr;

/// One parsed source file: the module's dotted name plus its body.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleTree {
    /// Dotted module name, e.g. `app.services.billing`.
    pub name: SmolStr,
    pub body: Vec<Stmt>,
}

impl ModuleTree {
    pub fn new(name: impl Into<SmolStr>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

/// A statement in a module, class, or function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `import a.b` or `import a.b as c`. Without an alias the last path
    /// segment is bound; with one, the alias is bound to the full path.
    Import {
        target: SmolStr,
        alias: Option<SmolStr>,
    },

    /// `from p.m import X as Y, Z`.
    FromImport {
        module: SmolStr,
        names: Vec<ImportedName>,
    },

    ClassDef(ClassDef),

    FunctionDef(FunctionDef),

    /// Assignment, optionally annotated, optionally without a value
    /// (a bare declaration). The target may be a simple name or an
    /// attribute chain such as `self.attr`.
    Assign {
        target: Expr,
        annotation: Option<SmolStr>,
        value: Option<Expr>,
    },

    Return(Option<Expr>),

    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },

    While {
        test: Expr,
        body: Vec<Stmt>,
    },

    For {
        target: SmolStr,
        iter: Expr,
        body: Vec<Stmt>,
    },

    /// A bare expression statement.
    Expr(Expr),

    Pass,
}

/// One name brought in by a `from` import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedName {
    pub name: SmolStr,
    pub alias: Option<SmolStr>,
}

impl ImportedName {
    pub fn plain(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<SmolStr>, alias: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// The name this import binds locally.
    pub fn bound_name(&self) -> &SmolStr {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

/// A class definition with its base-class references.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: SmolStr,
    /// Base references as written: simple names or dotted paths.
    pub bases: Vec<SmolStr>,
    pub body: Vec<Stmt>,
}

/// A function or method definition.
///
/// Annotations are raw source tokens (`Optional[Foo]`, `'Foo'`, `list`);
/// the engine normalizes them.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: SmolStr,
    pub params: Vec<Param>,
    pub returns: Option<SmolStr>,
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    /// The receiver parameter name, when this definition is used as an
    /// instance method: the first declared parameter.
    pub fn receiver_name(&self) -> Option<&SmolStr> {
        self.params.first().map(|p| &p.name)
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: SmolStr,
    pub annotation: Option<SmolStr>,
}

impl Param {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }

    pub fn annotated(name: impl Into<SmolStr>, annotation: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
        }
    }
}
