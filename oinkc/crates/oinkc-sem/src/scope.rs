//! Lexical scope stack.

use indexmap::IndexMap;
use oinkc_par::types::DataType;

/// What the analyzer knows about a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub ty: DataType,
    pub mutable: bool,
}

/// A stack of scopes, innermost last.
///
/// The stack starts with one global scope, grows on code-block entry and
/// shrinks on exit. Bindings are insertion-ordered so everything derived
/// from them is deterministic.
pub struct ScopeStack {
    scopes: Vec<IndexMap<String, Binding>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares a name in the innermost scope.
    ///
    /// Returns false when the name is already live in any enclosing scope;
    /// re-using a name is only possible after the scope holding it closed.
    pub fn declare(&mut self, name: &str, ty: DataType, mutable: bool) -> bool {
        if self.lookup(name).is_some() {
            return false;
        }
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.to_string(), Binding { ty, mutable });
        true
    }

    /// Finds a live binding for the name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
