//! quill_ir: The typed intermediate representation.
//!
//! The binder produces these nodes, the lowerer rewrites them into flat
//! label/goto form, and the evaluator executes the result. Types, values,
//! symbols and operator semantics live here too, since every later stage
//! shares them.

pub mod builtins;
pub mod node;
pub mod operators;
pub mod printer;
pub mod program;
pub mod symbols;
pub mod types;
pub mod value;
pub mod visitor;

pub use builtins::{builtin_functions, Builtin};
pub use node::{BoundBlockStatement, BoundExpression, BoundExpressionKind, BoundStatement};
pub use operators::{BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator, BoundUnaryOperatorKind};
pub use program::BoundProgram;
pub use symbols::{FunctionSymbol, LabelSymbol, Symbol, SymbolId, VariableKind, VariableSymbol};
pub use types::TypeSymbol;
pub use value::{OperatorError, Value};
pub use visitor::BoundNode;
