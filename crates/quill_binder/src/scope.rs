//! Lexical scopes for the binder.

use quill_core::collections::OrderedMap;
use quill_core::intern::InternedString;
use quill_ir::symbols::{FunctionSymbol, Symbol, VariableSymbol};
use std::rc::Rc;

/// A scope in the binding phase. Scopes form a chain from inner to outer.
///
/// A scope borrows its parent, so a nested scope is a local value of the
/// binder call that opened it and is gone when that call returns.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    /// The symbols declared in this scope, in declaration order.
    symbols: OrderedMap<InternedString, Symbol>,
    /// The enclosing scope (None for the root scope).
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    pub fn new(parent: Option<&'p Scope<'p>>) -> Self {
        Self {
            symbols: OrderedMap::new(),
            parent,
        }
    }

    pub fn parent(&self) -> Option<&'p Scope<'p>> {
        self.parent
    }

    /// Declare a symbol in this scope. Returns false, leaving the scope
    /// unchanged, if this scope already has a symbol with the same name.
    /// Outer scopes are not consulted, so shadowing is allowed.
    pub fn declare(&mut self, name: InternedString, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, symbol);
        true
    }

    /// Declare a symbol, replacing any existing one with the same name.
    pub fn declare_or_replace(&mut self, name: InternedString, symbol: Symbol) {
        self.symbols.insert(name, symbol);
    }

    /// Resolve a name, innermost scope first.
    pub fn lookup(&self, name: InternedString) -> Option<&Symbol> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(symbol) = current.symbols.get(&name) {
                return Some(symbol);
            }
            scope = current.parent;
        }
        None
    }

    pub fn lookup_local(&self, name: InternedString) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    /// Symbols declared directly in this scope, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Rc<VariableSymbol>> {
        self.symbols().filter_map(Symbol::as_variable)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Rc<FunctionSymbol>> {
        self.symbols().filter_map(Symbol::as_function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::intern::StringInterner;
    use quill_ir::{TypeSymbol, VariableKind};

    fn var(name: &str) -> Symbol {
        Symbol::Variable(VariableSymbol::new(name, false, TypeSymbol::Int, VariableKind::Local, None))
    }

    #[test]
    fn test_declare_rejects_duplicate_in_same_scope() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut scope = Scope::new(None);
        assert!(scope.declare(x, var("x")));
        assert!(!scope.declare(x, var("x")));
        assert_eq!(scope.symbols().count(), 1);
    }

    #[test]
    fn test_shadowing_and_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut outer = Scope::new(None);
        outer.declare(x, var("x"));
        let outer_id = outer.lookup(x).map(Symbol::id);

        let mut inner = Scope::new(Some(&outer));
        assert!(inner.lookup_local(x).is_none());
        assert_eq!(inner.lookup(x).map(Symbol::id), outer_id);
        assert!(inner.declare(x, var("x")));
        assert_ne!(inner.lookup(x).map(Symbol::id), outer_id);
        assert!(inner.lookup(interner.intern("y")).is_none());
    }
}
