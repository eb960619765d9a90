//! Runtime values and the conversions between them.
//!
//! Conversions live here rather than in the evaluator so constant folding
//! and execution produce identical results.

use crate::types::TypeSymbol;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A fault raised while applying an operator or conversion to values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperatorError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot convert '{value}' to '{target}'")]
    InvalidConversion { value: String, target: TypeSymbol },
    #[error("operator '{operator}' cannot be applied to {operands}")]
    OperandMismatch {
        operator: &'static str,
        operands: String,
    },
}

impl Value {
    /// The static type of a literal with this value.
    pub fn type_symbol(&self) -> TypeSymbol {
        match self {
            Value::Bool(_) => TypeSymbol::Bool,
            Value::Int(_) => TypeSymbol::Int,
            Value::Float(_) => TypeSymbol::Float,
            Value::String(_) => TypeSymbol::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to `target`. `Any` keeps the value as it is.
    pub fn convert(&self, target: TypeSymbol) -> Result<Value, OperatorError> {
        let converted = match (target, self) {
            (TypeSymbol::Any, v) => Some(v.clone()),
            (TypeSymbol::String, v) => Some(Value::String(v.to_string())),

            (TypeSymbol::Bool, Value::Bool(b)) => Some(Value::Bool(*b)),
            (TypeSymbol::Bool, Value::Int(i)) => Some(Value::Bool(*i != 0)),
            (TypeSymbol::Bool, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            (TypeSymbol::Int, Value::Int(i)) => Some(Value::Int(*i)),
            (TypeSymbol::Int, Value::Bool(b)) => Some(Value::Int(*b as i64)),
            // Saturates at the i64 bounds; NaN becomes 0.
            (TypeSymbol::Int, Value::Float(f)) => Some(Value::Int(*f as i64)),
            (TypeSymbol::Int, Value::String(s)) => s.trim().parse().ok().map(Value::Int),

            (TypeSymbol::Float, Value::Float(f)) => Some(Value::Float(*f)),
            (TypeSymbol::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (TypeSymbol::Float, Value::Bool(b)) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
            (TypeSymbol::Float, Value::String(s)) => s.trim().parse().ok().map(Value::Float),

            _ => None,
        };
        converted.ok_or_else(|| OperatorError::InvalidConversion {
            value: self.to_string(),
            target,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
