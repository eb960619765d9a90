//! The builtin function registry.

use crate::symbols::{FunctionSymbol, SymbolId, VariableSymbol};
use crate::types::TypeSymbol;
use std::rc::Rc;

/// Functions whose behaviour the host supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `print(text: any): void`
    Print,
    /// `input(): string`
    Input,
    /// `rnd(max: int): int`, uniform in `0..max`.
    Rnd,
}

impl Builtin {
    pub const ALL: [Builtin; 3] = [Builtin::Print, Builtin::Input, Builtin::Rnd];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::Rnd => "rnd",
        }
    }

    fn signature(self) -> (&'static [(&'static str, TypeSymbol)], TypeSymbol) {
        const PRINT: &[(&str, TypeSymbol)] = &[("text", TypeSymbol::Any)];
        const INPUT: &[(&str, TypeSymbol)] = &[];
        const RND: &[(&str, TypeSymbol)] = &[("max", TypeSymbol::Int)];
        match self {
            Builtin::Print => (PRINT, TypeSymbol::Void),
            Builtin::Input => (INPUT, TypeSymbol::String),
            Builtin::Rnd => (RND, TypeSymbol::Int),
        }
    }

    /// A fresh function symbol for this builtin.
    pub fn symbol(self) -> Rc<FunctionSymbol> {
        let (params, return_type) = self.signature();
        let parameters = params
            .iter()
            .enumerate()
            .map(|(ordinal, (name, ty))| VariableSymbol::parameter(*name, *ty, ordinal))
            .collect();
        Rc::new(FunctionSymbol {
            id: SymbolId::fresh(),
            name: self.name().to_string(),
            parameters,
            return_type,
            declaration: None,
            builtin: Some(self),
        })
    }
}

/// Symbols for every builtin, in registry order.
pub fn builtin_functions() -> Vec<Rc<FunctionSymbol>> {
    Builtin::ALL.into_iter().map(Builtin::symbol).collect()
}
