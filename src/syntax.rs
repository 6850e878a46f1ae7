//! The input contract: already-parsed syntax trees.
//!
//! Source discovery and parsing are external collaborators. The engine
//! consumes one [`ModuleTree`] per source file, carrying the module's dotted
//! name and its statement body. The shapes here model the analyzed
//! language: module-level namespacing, classes with multiple inheritance,
//! functions and methods (the receiver is the first declared parameter of an
//! instance method), nested functions, aliasable imports, and annotated
//! assignments.

mod expr;
mod tree;

pub use expr::{Expr, Literal};
pub use tree::{ClassDef, FunctionDef, ImportedName, ModuleTree, Param, Stmt};

/// True if `text` is a single valid identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if unicode_ident::is_xid_start(c) || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| unicode_ident::is_xid_continue(c))
}

/// True if `text` is a dotted path of valid identifiers (`a`, `a.b.c`).
pub fn is_dotted_path(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}
