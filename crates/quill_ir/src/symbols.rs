//! Symbols: variables, parameters, functions and labels.
//!
//! Every symbol gets a process-unique [`SymbolId`] when it is created.
//! Identity is the id, never the name, so two loops that both mint a
//! `break` label or two functions that both declare `i` never collide.

use crate::builtins::Builtin;
use crate::types::TypeSymbol;
use crate::value::Value;
use quill_syntax::NodeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(1);

impl SymbolId {
    pub fn fresh() -> SymbolId {
        SymbolId(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    /// A function parameter; `ordinal` is its position in the argument list.
    Parameter { ordinal: usize },
}

#[derive(Debug)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub is_read_only: bool,
    pub ty: TypeSymbol,
    pub kind: VariableKind,
    /// Folded initializer of a read-only variable, if it was constant.
    pub constant: Option<Value>,
}

impl VariableSymbol {
    pub fn new(
        name: impl Into<String>,
        is_read_only: bool,
        ty: TypeSymbol,
        kind: VariableKind,
        constant: Option<Value>,
    ) -> Rc<VariableSymbol> {
        Rc::new(VariableSymbol {
            id: SymbolId::fresh(),
            name: name.into(),
            is_read_only,
            ty,
            kind,
            constant: if is_read_only { constant } else { None },
        })
    }

    pub fn parameter(name: impl Into<String>, ty: TypeSymbol, ordinal: usize) -> Rc<VariableSymbol> {
        Self::new(name, true, ty, VariableKind::Parameter { ordinal }, None)
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.kind == VariableKind::Global
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariableSymbol {}

impl Hash for VariableSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub parameters: Vec<Rc<VariableSymbol>>,
    pub return_type: TypeSymbol,
    /// The declaration whose body is bound for this function.
    pub declaration: Option<NodeId>,
    /// Set for functions whose behaviour the host supplies.
    pub builtin: Option<Builtin>,
}

impl FunctionSymbol {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Rc<VariableSymbol>>,
        return_type: TypeSymbol,
        declaration: Option<NodeId>,
    ) -> Rc<FunctionSymbol> {
        Rc::new(FunctionSymbol {
            id: SymbolId::fresh(),
            name: name.into(),
            parameters,
            return_type,
            declaration,
            builtin: None,
        })
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionSymbol {}

impl Hash for FunctionSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A jump target.
#[derive(Debug, Clone)]
pub struct LabelSymbol {
    pub id: SymbolId,
    pub name: String,
}

impl LabelSymbol {
    /// Mint a label. The printed name is `prefix` followed by the id.
    pub fn fresh(prefix: &str) -> LabelSymbol {
        let id = SymbolId::fresh();
        LabelSymbol {
            id,
            name: format!("{}{}", prefix, id.0),
        }
    }
}

impl PartialEq for LabelSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LabelSymbol {}

impl Hash for LabelSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for LabelSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Anything a scope can hold.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(Rc<VariableSymbol>),
    Function(Rc<FunctionSymbol>),
}

impl Symbol {
    pub fn id(&self) -> SymbolId {
        match self {
            Symbol::Variable(v) => v.id,
            Symbol::Function(f) => f.id,
        }
    }

    pub fn as_variable(&self) -> Option<&Rc<VariableSymbol>> {
        match self {
            Symbol::Variable(v) => Some(v),
            Symbol::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<FunctionSymbol>> {
        match self {
            Symbol::Function(f) => Some(f),
            Symbol::Variable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_compare_by_id() {
        let a = LabelSymbol::fresh("break");
        let b = LabelSymbol::fresh("break");
        assert_ne!(a, b);
        assert_ne!(a.name, b.name);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_mutable_variable_drops_constant() {
        let v = VariableSymbol::new("x", false, TypeSymbol::Int, VariableKind::Local, Some(Value::Int(1)));
        assert!(v.constant.is_none());
        let c = VariableSymbol::new("y", true, TypeSymbol::Int, VariableKind::Global, Some(Value::Int(1)));
        assert_eq!(c.constant, Some(Value::Int(1)));
        assert!(c.is_global());
    }
}
