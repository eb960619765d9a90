//! Bound (typed) IR nodes.
//!
//! Nodes are immutable once built. Expression constructors resolve the
//! node's type and fold its constant value up front, so every later pass
//! can read `constant` without re-evaluating anything.

use crate::operators::{BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator};
use crate::symbols::{FunctionSymbol, LabelSymbol, VariableSymbol};
use crate::types::TypeSymbol;
use crate::value::Value;
use std::rc::Rc;

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone)]
pub struct BoundExpression {
    pub kind: BoundExpressionKind,
    pub ty: TypeSymbol,
    /// The compile-time value, when the expression folds to one.
    pub constant: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum BoundExpressionKind {
    Error,
    Literal(Value),
    Variable(Rc<VariableSymbol>),
    Assignment {
        variable: Rc<VariableSymbol>,
        expression: Box<BoundExpression>,
    },
    Unary {
        op: &'static BoundUnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        left: Box<BoundExpression>,
        op: &'static BoundBinaryOperator,
        right: Box<BoundExpression>,
    },
    /// `lower..upper`; only valid as the bounds of a `for` loop.
    Range {
        lower: Box<BoundExpression>,
        upper: Box<BoundExpression>,
    },
    Call {
        function: Rc<FunctionSymbol>,
        arguments: Vec<BoundExpression>,
    },
    /// Conversion of `expression` to this node's `ty`.
    Conversion { expression: Box<BoundExpression> },
}

impl BoundExpression {
    pub fn error() -> Self {
        Self {
            kind: BoundExpressionKind::Error,
            ty: TypeSymbol::Error,
            constant: None,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            ty: value.type_symbol(),
            constant: Some(value.clone()),
            kind: BoundExpressionKind::Literal(value),
        }
    }

    pub fn variable(variable: Rc<VariableSymbol>) -> Self {
        Self {
            ty: variable.ty,
            constant: variable.constant.clone(),
            kind: BoundExpressionKind::Variable(variable),
        }
    }

    pub fn assignment(variable: Rc<VariableSymbol>, expression: BoundExpression) -> Self {
        Self {
            ty: expression.ty,
            constant: None,
            kind: BoundExpressionKind::Assignment {
                variable,
                expression: Box::new(expression),
            },
        }
    }

    pub fn unary(op: &'static BoundUnaryOperator, operand: BoundExpression) -> Self {
        let constant = operand
            .constant
            .as_ref()
            .and_then(|value| op.kind.apply(value).ok());
        Self {
            ty: op.result_type,
            constant,
            kind: BoundExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
        }
    }

    pub fn binary(left: BoundExpression, op: &'static BoundBinaryOperator, right: BoundExpression) -> Self {
        let constant = fold_binary(&left, op, &right);
        Self {
            ty: op.result_type,
            constant,
            kind: BoundExpressionKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        }
    }

    pub fn range(lower: BoundExpression, upper: BoundExpression) -> Self {
        Self {
            ty: TypeSymbol::Int,
            constant: None,
            kind: BoundExpressionKind::Range {
                lower: Box::new(lower),
                upper: Box::new(upper),
            },
        }
    }

    pub fn call(function: Rc<FunctionSymbol>, arguments: Vec<BoundExpression>) -> Self {
        Self {
            ty: function.return_type,
            constant: None,
            kind: BoundExpressionKind::Call { function, arguments },
        }
    }

    pub fn conversion(ty: TypeSymbol, expression: BoundExpression) -> Self {
        let constant = expression
            .constant
            .as_ref()
            .and_then(|value| value.convert(ty).ok());
        Self {
            ty,
            constant,
            kind: BoundExpressionKind::Conversion {
                expression: Box::new(expression),
            },
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.ty.is_error()
    }

    /// The folded boolean value, for conditions.
    pub fn constant_bool(&self) -> Option<bool> {
        self.constant.as_ref().and_then(Value::as_bool)
    }

    /// Whether evaluating this expression can change program state.
    pub fn has_side_effects(&self) -> bool {
        match &self.kind {
            BoundExpressionKind::Assignment { .. } | BoundExpressionKind::Call { .. } => true,
            BoundExpressionKind::Error
            | BoundExpressionKind::Literal(_)
            | BoundExpressionKind::Variable(_) => false,
            BoundExpressionKind::Unary { operand, .. } => operand.has_side_effects(),
            BoundExpressionKind::Binary { left, right, .. }
            | BoundExpressionKind::Range {
                lower: left,
                upper: right,
            } => left.has_side_effects() || right.has_side_effects(),
            BoundExpressionKind::Conversion { expression } => expression.has_side_effects(),
        }
    }
}

fn fold_binary(left: &BoundExpression, op: &BoundBinaryOperator, right: &BoundExpression) -> Option<Value> {
    let l = left.constant_bool();
    let r = right.constant_bool();
    match op.kind {
        BoundBinaryOperatorKind::LogicalAnd => {
            if l == Some(false) || (r == Some(false) && !left.has_side_effects()) {
                return Some(Value::Bool(false));
            }
        }
        BoundBinaryOperatorKind::LogicalOr => {
            if l == Some(true) || (r == Some(true) && !left.has_side_effects()) {
                return Some(Value::Bool(true));
            }
        }
        _ => {}
    }
    let (l, r) = (left.constant.as_ref()?, right.constant.as_ref()?);
    op.kind.apply(l, r).ok()
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BoundBlockStatement {
    pub statements: Vec<BoundStatement>,
}

impl BoundBlockStatement {
    pub fn new(statements: Vec<BoundStatement>) -> Self {
        Self { statements }
    }

    /// True when only the six flat statement kinds remain.
    pub fn is_lowered(&self) -> bool {
        self.statements.iter().all(BoundStatement::is_lowered_kind)
    }
}

#[derive(Debug, Clone)]
pub enum BoundStatement {
    Block(BoundBlockStatement),
    VariableDeclaration {
        variable: Rc<VariableSymbol>,
        initializer: BoundExpression,
    },
    If {
        condition: BoundExpression,
        then_statement: Box<BoundStatement>,
        else_statement: Option<Box<BoundStatement>>,
    },
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
        break_label: LabelSymbol,
        continue_label: LabelSymbol,
    },
    DoWhile {
        body: Box<BoundStatement>,
        condition: BoundExpression,
        break_label: LabelSymbol,
        continue_label: LabelSymbol,
    },
    For {
        variable: Rc<VariableSymbol>,
        /// A `Range` expression, or `Error` after a diagnosed bound.
        range: BoundExpression,
        body: Box<BoundStatement>,
        break_label: LabelSymbol,
        continue_label: LabelSymbol,
    },
    Label(LabelSymbol),
    Goto(LabelSymbol),
    ConditionalGoto {
        label: LabelSymbol,
        condition: BoundExpression,
        jump_if_true: bool,
    },
    Return(Option<BoundExpression>),
    Expression(BoundExpression),
}

impl BoundStatement {
    #[inline]
    pub fn is_lowered_kind(&self) -> bool {
        matches!(
            self,
            BoundStatement::Label(_)
                | BoundStatement::Goto(_)
                | BoundStatement::ConditionalGoto { .. }
                | BoundStatement::VariableDeclaration { .. }
                | BoundStatement::Expression(_)
                | BoundStatement::Return(_)
        )
    }

    /// Whether control cannot fall through to the next statement.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(self, BoundStatement::Goto(_) | BoundStatement::Return(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::SyntaxKind;

    fn op(kind: SyntaxKind, ty: TypeSymbol) -> &'static BoundBinaryOperator {
        BoundBinaryOperator::bind(kind, ty, ty).unwrap()
    }

    fn mutable_bool() -> BoundExpression {
        let v = VariableSymbol::new("b", false, TypeSymbol::Bool, crate::VariableKind::Local, None);
        BoundExpression::variable(v)
    }

    #[test]
    fn test_arithmetic_folds() {
        let mul = BoundExpression::binary(
            BoundExpression::literal(2i64),
            op(SyntaxKind::StarToken, TypeSymbol::Int),
            BoundExpression::literal(3i64),
        );
        let sum = BoundExpression::binary(BoundExpression::literal(1i64), op(SyntaxKind::PlusToken, TypeSymbol::Int), mul);
        assert_eq!(sum.constant, Some(Value::Int(7)));
        assert_eq!(sum.ty, TypeSymbol::Int);
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        let div = BoundExpression::binary(
            BoundExpression::literal(1i64),
            op(SyntaxKind::SlashToken, TypeSymbol::Int),
            BoundExpression::literal(0i64),
        );
        assert!(div.constant.is_none());
    }

    #[test]
    fn test_and_folds_on_constant_left() {
        let and = BoundExpression::binary(
            BoundExpression::literal(false),
            op(SyntaxKind::AmpersandAmpersandToken, TypeSymbol::Bool),
            mutable_bool(),
        );
        assert_eq!(and.constant, Some(Value::Bool(false)));
    }

    #[test]
    fn test_or_folds_on_constant_right_without_side_effects() {
        let or = BoundExpression::binary(
            mutable_bool(),
            op(SyntaxKind::PipePipeToken, TypeSymbol::Bool),
            BoundExpression::literal(true),
        );
        assert_eq!(or.constant, Some(Value::Bool(true)));
    }

    #[test]
    fn test_and_keeps_left_side_effects() {
        let v = VariableSymbol::new("b", false, TypeSymbol::Bool, crate::VariableKind::Local, None);
        let assign = BoundExpression::assignment(v, BoundExpression::literal(true));
        let and = BoundExpression::binary(
            assign,
            op(SyntaxKind::AmpersandAmpersandToken, TypeSymbol::Bool),
            BoundExpression::literal(false),
        );
        assert!(and.constant.is_none());
    }

    #[test]
    fn test_read_only_variable_propagates_constant() {
        let v = VariableSymbol::new("x", true, TypeSymbol::Int, crate::VariableKind::Global, Some(Value::Int(7)));
        let e = BoundExpression::variable(v);
        assert_eq!(e.constant, Some(Value::Int(7)));
    }

    #[test]
    fn test_conversion_folds() {
        let e = BoundExpression::conversion(TypeSymbol::String, BoundExpression::literal(12i64));
        assert_eq!(e.constant, Some(Value::from("12")));
        let bad = BoundExpression::conversion(TypeSymbol::Int, BoundExpression::literal("abc"));
        assert!(bad.constant.is_none());
    }

    #[test]
    fn test_is_lowered() {
        let label = LabelSymbol::fresh("end");
        let flat = BoundBlockStatement::new(vec![
            BoundStatement::Goto(label.clone()),
            BoundStatement::Label(label),
            BoundStatement::Return(None),
        ]);
        assert!(flat.is_lowered());
        let nested = BoundBlockStatement::new(vec![BoundStatement::Block(flat)]);
        assert!(!nested.is_lowered());
    }
}
