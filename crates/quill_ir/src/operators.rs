//! Operator resolution tables and operator semantics.
//!
//! An operator binds by (syntax token, operand types) to one table entry
//! carrying the result type. [`BoundUnaryOperatorKind::apply`] and
//! [`BoundBinaryOperatorKind::apply`] are the only implementation of each
//! operator; constant folding and the evaluator both call them.

use crate::types::TypeSymbol;
use crate::value::{OperatorError, Value};
use quill_syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

const fn unary(
    syntax_kind: SyntaxKind,
    kind: BoundUnaryOperatorKind,
    ty: TypeSymbol,
) -> BoundUnaryOperator {
    BoundUnaryOperator {
        syntax_kind,
        kind,
        operand_type: ty,
        result_type: ty,
    }
}

const fn binary(
    syntax_kind: SyntaxKind,
    kind: BoundBinaryOperatorKind,
    operand: TypeSymbol,
    result: TypeSymbol,
) -> BoundBinaryOperator {
    BoundBinaryOperator {
        syntax_kind,
        kind,
        left_type: operand,
        right_type: operand,
        result_type: result,
    }
}

use BoundBinaryOperatorKind as B;
use BoundUnaryOperatorKind as U;
use SyntaxKind as K;
use TypeSymbol as T;

static UNARY_OPERATORS: &[BoundUnaryOperator] = &[
    unary(K::BangToken, U::LogicalNegation, T::Bool),
    unary(K::PlusToken, U::Identity, T::Int),
    unary(K::MinusToken, U::Negation, T::Int),
    unary(K::TildeToken, U::OnesComplement, T::Int),
    unary(K::PlusToken, U::Identity, T::Float),
    unary(K::MinusToken, U::Negation, T::Float),
];

static BINARY_OPERATORS: &[BoundBinaryOperator] = &[
    // int
    BoundBinaryOperator::INT_ADDITION,
    binary(K::MinusToken, B::Subtraction, T::Int, T::Int),
    binary(K::StarToken, B::Multiplication, T::Int, T::Int),
    binary(K::SlashToken, B::Division, T::Int, T::Int),
    binary(K::PercentToken, B::Modulo, T::Int, T::Int),
    binary(K::AmpersandToken, B::BitwiseAnd, T::Int, T::Int),
    binary(K::PipeToken, B::BitwiseOr, T::Int, T::Int),
    binary(K::HatToken, B::BitwiseXor, T::Int, T::Int),
    binary(K::LessLessToken, B::ShiftLeft, T::Int, T::Int),
    binary(K::GreaterGreaterToken, B::ShiftRight, T::Int, T::Int),
    BoundBinaryOperator::INT_EQUALS,
    binary(K::BangEqualsToken, B::NotEquals, T::Int, T::Bool),
    binary(K::LessToken, B::Less, T::Int, T::Bool),
    BoundBinaryOperator::INT_LESS_OR_EQUALS,
    binary(K::GreaterToken, B::Greater, T::Int, T::Bool),
    binary(K::GreaterEqualsToken, B::GreaterOrEquals, T::Int, T::Bool),
    // float
    binary(K::PlusToken, B::Addition, T::Float, T::Float),
    binary(K::MinusToken, B::Subtraction, T::Float, T::Float),
    binary(K::StarToken, B::Multiplication, T::Float, T::Float),
    binary(K::SlashToken, B::Division, T::Float, T::Float),
    binary(K::PercentToken, B::Modulo, T::Float, T::Float),
    binary(K::EqualsEqualsToken, B::Equals, T::Float, T::Bool),
    binary(K::BangEqualsToken, B::NotEquals, T::Float, T::Bool),
    binary(K::LessToken, B::Less, T::Float, T::Bool),
    binary(K::LessEqualsToken, B::LessOrEquals, T::Float, T::Bool),
    binary(K::GreaterToken, B::Greater, T::Float, T::Bool),
    binary(K::GreaterEqualsToken, B::GreaterOrEquals, T::Float, T::Bool),
    // bool
    binary(K::AmpersandAmpersandToken, B::LogicalAnd, T::Bool, T::Bool),
    binary(K::PipePipeToken, B::LogicalOr, T::Bool, T::Bool),
    binary(K::AmpersandToken, B::BitwiseAnd, T::Bool, T::Bool),
    binary(K::PipeToken, B::BitwiseOr, T::Bool, T::Bool),
    binary(K::HatToken, B::BitwiseXor, T::Bool, T::Bool),
    binary(K::EqualsEqualsToken, B::Equals, T::Bool, T::Bool),
    binary(K::BangEqualsToken, B::NotEquals, T::Bool, T::Bool),
    // string
    binary(K::PlusToken, B::Addition, T::String, T::String),
    binary(K::EqualsEqualsToken, B::Equals, T::String, T::Bool),
    binary(K::BangEqualsToken, B::NotEquals, T::String, T::Bool),
];

impl BoundUnaryOperator {
    pub fn bind(syntax_kind: SyntaxKind, operand_type: TypeSymbol) -> Option<&'static BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
    }

    pub fn text(&self) -> &'static str {
        self.syntax_kind.text().unwrap_or("?")
    }
}

impl BoundBinaryOperator {
    /// `int + int`; the lowerer's loop increment.
    pub const INT_ADDITION: BoundBinaryOperator = binary(K::PlusToken, B::Addition, T::Int, T::Int);
    /// `int == int`; the lowerer's `for` exit at the upper bound.
    pub const INT_EQUALS: BoundBinaryOperator =
        binary(K::EqualsEqualsToken, B::Equals, T::Int, T::Bool);
    /// `int <= int`; the lowerer's `for` condition.
    pub const INT_LESS_OR_EQUALS: BoundBinaryOperator =
        binary(K::LessEqualsToken, B::LessOrEquals, T::Int, T::Bool);

    pub fn bind(
        syntax_kind: SyntaxKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
    ) -> Option<&'static BoundBinaryOperator> {
        BINARY_OPERATORS.iter().find(|op| {
            op.syntax_kind == syntax_kind && op.left_type == left_type && op.right_type == right_type
        })
    }

    pub fn text(&self) -> &'static str {
        self.syntax_kind.text().unwrap_or("?")
    }
}

fn mismatch(operator: &'static str, operands: &[&Value]) -> OperatorError {
    let operands = operands
        .iter()
        .map(|v| v.type_symbol().name())
        .collect::<Vec<_>>()
        .join(" and ");
    OperatorError::OperandMismatch { operator, operands }
}

impl BoundUnaryOperatorKind {
    pub fn apply(self, operand: &Value) -> Result<Value, OperatorError> {
        let result = match (self, operand) {
            (U::Identity, Value::Int(i)) => Value::Int(*i),
            (U::Identity, Value::Float(x)) => Value::Float(*x),
            (U::Negation, Value::Int(i)) => Value::Int(i.wrapping_neg()),
            (U::Negation, Value::Float(x)) => Value::Float(-x),
            (U::LogicalNegation, Value::Bool(b)) => Value::Bool(!b),
            (U::OnesComplement, Value::Int(i)) => Value::Int(!i),
            _ => return Err(mismatch(self.name(), &[operand])),
        };
        Ok(result)
    }

    fn name(self) -> &'static str {
        match self {
            U::Identity => "+",
            U::Negation => "-",
            U::LogicalNegation => "!",
            U::OnesComplement => "~",
        }
    }
}

impl BoundBinaryOperatorKind {
    pub fn apply(self, left: &Value, right: &Value) -> Result<Value, OperatorError> {
        let result = match (left, right) {
            (Value::Int(l), Value::Int(r)) => Self::apply_int(self, *l, *r)?,
            (Value::Float(l), Value::Float(r)) => match self {
                B::Addition => Value::Float(l + r),
                B::Subtraction => Value::Float(l - r),
                B::Multiplication => Value::Float(l * r),
                B::Division => Value::Float(l / r),
                B::Modulo => Value::Float(l % r),
                B::Equals => Value::Bool(l == r),
                B::NotEquals => Value::Bool(l != r),
                B::Less => Value::Bool(l < r),
                B::LessOrEquals => Value::Bool(l <= r),
                B::Greater => Value::Bool(l > r),
                B::GreaterOrEquals => Value::Bool(l >= r),
                _ => return Err(mismatch(self.name(), &[left, right])),
            },
            (Value::Bool(l), Value::Bool(r)) => match self {
                B::LogicalAnd | B::BitwiseAnd => Value::Bool(*l && *r),
                B::LogicalOr | B::BitwiseOr => Value::Bool(*l || *r),
                B::BitwiseXor => Value::Bool(l ^ r),
                B::Equals => Value::Bool(l == r),
                B::NotEquals => Value::Bool(l != r),
                _ => return Err(mismatch(self.name(), &[left, right])),
            },
            (Value::String(l), Value::String(r)) => match self {
                B::Addition => Value::String(format!("{}{}", l, r)),
                B::Equals => Value::Bool(l == r),
                B::NotEquals => Value::Bool(l != r),
                _ => return Err(mismatch(self.name(), &[left, right])),
            },
            _ => return Err(mismatch(self.name(), &[left, right])),
        };
        Ok(result)
    }

    fn apply_int(self, l: i64, r: i64) -> Result<Value, OperatorError> {
        let result = match self {
            B::Addition => Value::Int(l.wrapping_add(r)),
            B::Subtraction => Value::Int(l.wrapping_sub(r)),
            B::Multiplication => Value::Int(l.wrapping_mul(r)),
            B::Division | B::Modulo if r == 0 => return Err(OperatorError::DivisionByZero),
            B::Division => Value::Int(l.wrapping_div(r)),
            B::Modulo => Value::Int(l.wrapping_rem(r)),
            B::BitwiseAnd => Value::Int(l & r),
            B::BitwiseOr => Value::Int(l | r),
            B::BitwiseXor => Value::Int(l ^ r),
            // The shift count is masked to its low six bits; `>>` is arithmetic.
            B::ShiftLeft => Value::Int(l << (r & 63)),
            B::ShiftRight => Value::Int(l >> (r & 63)),
            B::Equals => Value::Bool(l == r),
            B::NotEquals => Value::Bool(l != r),
            B::Less => Value::Bool(l < r),
            B::LessOrEquals => Value::Bool(l <= r),
            B::Greater => Value::Bool(l > r),
            B::GreaterOrEquals => Value::Bool(l >= r),
            B::LogicalAnd | B::LogicalOr => {
                return Err(mismatch(self.name(), &[&Value::Int(l), &Value::Int(r)]))
            }
        };
        Ok(result)
    }

    fn name(self) -> &'static str {
        match self {
            B::Addition => "+",
            B::Subtraction => "-",
            B::Multiplication => "*",
            B::Division => "/",
            B::Modulo => "%",
            B::LogicalAnd => "&&",
            B::LogicalOr => "||",
            B::BitwiseAnd => "&",
            B::BitwiseOr => "|",
            B::BitwiseXor => "^",
            B::ShiftLeft => "<<",
            B::ShiftRight => ">>",
            B::Equals => "==",
            B::NotEquals => "!=",
            B::Less => "<",
            B::LessOrEquals => "<=",
            B::Greater => ">",
            B::GreaterOrEquals => ">=",
        }
    }
}
