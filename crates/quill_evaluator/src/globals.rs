//! Global variable storage that outlives a single evaluation.

use quill_core::collections::FxMap;
use quill_ir::{SymbolId, Value, VariableSymbol};

/// Values of global variables, keyed by symbol.
///
/// Owned by the caller and handed to each evaluation, so a later generation
/// sees the globals an earlier one assigned.
#[derive(Debug, Default)]
pub struct GlobalValues {
    values: FxMap<SymbolId, Value>,
}

impl GlobalValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &VariableSymbol) -> Option<&Value> {
        self.values.get(&variable.id)
    }

    pub fn set(&mut self, variable: &VariableSymbol, value: Value) {
        self.values.insert(variable.id, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
