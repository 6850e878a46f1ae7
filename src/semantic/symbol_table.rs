//! Per-activation scoped bindings.
//!
//! Two tiers: the function scope and one nested scope shared by every
//! nested function the traversal is currently inside. Entering a nested
//! scope never erases the function tier; exiting clears only the nested
//! tier, once the outermost nested scope is left.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::catalog::TypeDescriptor;

#[derive(Debug, Default)]
pub struct SymbolTable {
    function_scope: FxHashMap<SmolStr, TypeDescriptor>,
    nested_scope: FxHashMap<SmolStr, TypeDescriptor>,
    nested_depth: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh function activation: both tiers are cleared.
    pub fn enter_function(&mut self) {
        self.function_scope.clear();
        self.nested_scope.clear();
        self.nested_depth = 0;
    }

    /// Bind `name` in the active tier.
    pub fn bind(&mut self, name: impl Into<SmolStr>, ty: TypeDescriptor) {
        if self.nested_depth > 0 {
            self.nested_scope.insert(name.into(), ty);
        } else {
            self.function_scope.insert(name.into(), ty);
        }
    }

    /// Look `name` up through the visible tiers: the nested tier first when
    /// inside a nested function, then the function tier.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        if self.nested_depth > 0 {
            if let Some(ty) = self.nested_scope.get(name) {
                return Some(ty);
            }
        }
        self.function_scope.get(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn in_nested(&self) -> bool {
        self.nested_depth > 0
    }

    /// Enter a nested function scope. Must be paired with
    /// [`exit_nested`](Self::exit_nested).
    pub fn enter_nested(&mut self) {
        self.nested_depth += 1;
    }

    /// Leave a nested function scope. The nested tier is dropped when the
    /// outermost nested scope is left.
    ///
    /// # Panics
    ///
    /// Panics when no nested scope is active: an unpaired exit is a
    /// traversal bug in the caller, not a property of analyzed code.
    pub fn exit_nested(&mut self) {
        assert!(
            self.nested_depth > 0,
            "exit_nested without a matching enter_nested"
        );
        self.nested_depth -= 1;
        if self.nested_depth == 0 {
            self.nested_scope.clear();
        }
    }
}
