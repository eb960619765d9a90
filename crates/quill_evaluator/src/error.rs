//! Runtime faults.

use quill_ir::{OperatorError, TypeSymbol};
use thiserror::Error;

/// A fault that stops evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot convert '{value}' to '{target}'")]
    Conversion { value: String, target: TypeSymbol },

    #[error("host I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("call depth exceeded the limit of {0}")]
    MaxCallDepth(usize),

    #[error("the program has {0} error(s) and cannot be evaluated")]
    HasDiagnostics(usize),

    /// The program contains a node the binder should have rejected.
    #[error("invalid program: {0}")]
    InvalidNode(String),
}

impl From<OperatorError> for EvalError {
    fn from(error: OperatorError) -> Self {
        match error {
            OperatorError::DivisionByZero => EvalError::DivisionByZero,
            OperatorError::InvalidConversion { value, target } => EvalError::Conversion { value, target },
            mismatch @ OperatorError::OperandMismatch { .. } => EvalError::InvalidNode(mismatch.to_string()),
        }
    }
}
