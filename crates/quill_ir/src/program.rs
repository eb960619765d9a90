//! A fully bound, lowered and checked generation.

use crate::node::BoundBlockStatement;
use crate::printer;
use crate::symbols::FunctionSymbol;
use indexmap::IndexMap;
use quill_diagnostics::DiagnosticCollection;
use std::fmt::{self, Write};
use std::rc::Rc;

#[derive(Debug)]
pub struct BoundProgram {
    /// The program of the previous generation, if any.
    pub previous: Option<Rc<BoundProgram>>,
    pub diagnostics: DiagnosticCollection,
    /// `main`, the implicit main, or `$eval` in script mode.
    pub entry: Option<Rc<FunctionSymbol>>,
    /// Lowered bodies of the functions declared in this generation.
    pub functions: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
}

impl BoundProgram {
    /// Find a function body here or in an earlier generation.
    pub fn lookup_body(&self, function: &FunctionSymbol) -> Option<&BoundBlockStatement> {
        let mut program = Some(self);
        while let Some(current) = program {
            if let Some(body) = current.functions.get(function) {
                return Some(body);
            }
            program = current.previous.as_deref();
        }
        None
    }

    /// Every lowered body in this generation satisfies the flat-IR contract.
    pub fn is_lowered(&self) -> bool {
        self.functions.values().all(BoundBlockStatement::is_lowered)
    }

    /// Render every function of this generation, in declaration order.
    pub fn write_tree<W: Write>(&self, out: &mut W) -> fmt::Result {
        for (function, body) in &self.functions {
            write_signature(out, function)?;
            out.write_str(" {\n")?;
            printer::write_body(out, body)?;
            out.write_str("}\n")?;
        }
        Ok(())
    }
}

pub fn write_signature<W: Write>(out: &mut W, function: &FunctionSymbol) -> fmt::Result {
    write!(out, "function {}(", function.name)?;
    for (i, parameter) in function.parameters.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{}: {}", parameter.name, parameter.ty)?;
    }
    write!(out, "): {}", function.return_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BoundExpression, BoundStatement};
    use crate::symbols::VariableSymbol;
    use crate::types::TypeSymbol;

    fn program_with(function: &Rc<FunctionSymbol>, previous: Option<Rc<BoundProgram>>) -> BoundProgram {
        let mut functions = IndexMap::new();
        functions.insert(
            function.clone(),
            BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::literal(1i64)))]),
        );
        BoundProgram {
            previous,
            diagnostics: DiagnosticCollection::new(),
            entry: None,
            functions,
        }
    }

    #[test]
    fn test_lookup_walks_previous_generations() {
        let old = FunctionSymbol::new("one", vec![], TypeSymbol::Int, None);
        let new = FunctionSymbol::new("two", vec![], TypeSymbol::Int, None);
        let first = Rc::new(program_with(&old, None));
        let second = program_with(&new, Some(first));
        assert!(second.lookup_body(&old).is_some());
        assert!(second.lookup_body(&new).is_some());
        let missing = FunctionSymbol::new("three", vec![], TypeSymbol::Int, None);
        assert!(second.lookup_body(&missing).is_none());
    }

    #[test]
    fn test_write_tree() {
        let x = VariableSymbol::parameter("x", TypeSymbol::Int, 0);
        let f = FunctionSymbol::new("f", vec![x], TypeSymbol::Int, None);
        let program = program_with(&f, None);
        let mut out = String::new();
        program.write_tree(&mut out).unwrap();
        assert_eq!(out, "function f(x: int): int {\n    return 1\n}\n");
    }
}
