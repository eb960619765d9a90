//! What binding one generation leaves behind.

use indexmap::IndexMap;
use quill_diagnostics::DiagnosticCollection;
use quill_ir::{BoundBlockStatement, FunctionSymbol, VariableSymbol};
use std::rc::Rc;

/// The declarations of one generation, kept so the next generation can
/// see them.
#[derive(Debug)]
pub struct BoundGlobalScope {
    pub previous: Option<Rc<BoundGlobalScope>>,
    pub diagnostics: DiagnosticCollection,
    /// The entry function, if this generation has one.
    pub entry: Option<Rc<FunctionSymbol>>,
    /// Functions declared in this generation, in declaration order.
    pub functions: Vec<Rc<FunctionSymbol>>,
    /// Global variables declared in this generation, in declaration order.
    pub variables: Vec<Rc<VariableSymbol>>,
}

/// The result of binding a compilation unit.
#[derive(Debug)]
pub struct BoundUnit {
    pub global_scope: Rc<BoundGlobalScope>,
    /// Bound (not yet lowered) bodies, declared functions first and the
    /// entry function last.
    pub bodies: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
}

impl BoundUnit {
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.global_scope.diagnostics
    }
}
