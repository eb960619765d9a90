//! quill_lowerer: rewrites structured control flow into labels and gotos.
//!
//! The output of [`lower`] is one flat statement list per function
//! holding only `Label`, `Goto`, `ConditionalGoto`, `VariableDeclaration`,
//! `Expression` and `Return`.

mod lowerer;

pub use lowerer::{lower, Lowerer};
