//! Generic traversal over bound nodes.
//!
//! [`BoundNode`] borrows either an expression or a statement and lists its
//! direct children in source order, so passes that only need to look at
//! every node (tests, the printer, invariant checks) do not have to spell
//! out each variant.

use crate::node::{BoundExpression, BoundExpressionKind, BoundStatement};

#[derive(Debug, Clone, Copy)]
pub enum BoundNode<'n> {
    Expression(&'n BoundExpression),
    Statement(&'n BoundStatement),
}

impl<'n> BoundNode<'n> {
    /// Direct children, in evaluation order.
    pub fn children(self) -> Vec<BoundNode<'n>> {
        let mut out = Vec::new();
        match self {
            BoundNode::Expression(expr) => match &expr.kind {
                BoundExpressionKind::Error
                | BoundExpressionKind::Literal(_)
                | BoundExpressionKind::Variable(_) => {}
                BoundExpressionKind::Assignment { expression, .. }
                | BoundExpressionKind::Conversion { expression } => out.push(BoundNode::Expression(expression)),
                BoundExpressionKind::Unary { operand, .. } => out.push(BoundNode::Expression(operand)),
                BoundExpressionKind::Binary { left, right, .. }
                | BoundExpressionKind::Range {
                    lower: left,
                    upper: right,
                } => {
                    out.push(BoundNode::Expression(left));
                    out.push(BoundNode::Expression(right));
                }
                BoundExpressionKind::Call { arguments, .. } => {
                    out.extend(arguments.iter().map(BoundNode::Expression));
                }
            },
            BoundNode::Statement(stmt) => match stmt {
                BoundStatement::Block(block) => {
                    out.extend(block.statements.iter().map(BoundNode::Statement));
                }
                BoundStatement::VariableDeclaration { initializer, .. } => {
                    out.push(BoundNode::Expression(initializer));
                }
                BoundStatement::If {
                    condition,
                    then_statement,
                    else_statement,
                } => {
                    out.push(BoundNode::Expression(condition));
                    out.push(BoundNode::Statement(then_statement));
                    if let Some(else_statement) = else_statement {
                        out.push(BoundNode::Statement(else_statement));
                    }
                }
                BoundStatement::While { condition, body, .. } => {
                    out.push(BoundNode::Expression(condition));
                    out.push(BoundNode::Statement(body));
                }
                BoundStatement::DoWhile { body, condition, .. } => {
                    out.push(BoundNode::Statement(body));
                    out.push(BoundNode::Expression(condition));
                }
                BoundStatement::For { range, body, .. } => {
                    out.push(BoundNode::Expression(range));
                    out.push(BoundNode::Statement(body));
                }
                BoundStatement::Label(_) | BoundStatement::Goto(_) => {}
                BoundStatement::ConditionalGoto { condition, .. } => {
                    out.push(BoundNode::Expression(condition));
                }
                BoundStatement::Return(expression) => {
                    out.extend(expression.iter().map(BoundNode::Expression));
                }
                BoundStatement::Expression(expression) => out.push(BoundNode::Expression(expression)),
            },
        }
        out
    }

    /// This node followed by all of its descendants, pre-order.
    pub fn descendants(self) -> Vec<BoundNode<'n>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    pub fn as_statement(self) -> Option<&'n BoundStatement> {
        match self {
            BoundNode::Statement(stmt) => Some(stmt),
            BoundNode::Expression(_) => None,
        }
    }

    pub fn as_expression(self) -> Option<&'n BoundExpression> {
        match self {
            BoundNode::Expression(expr) => Some(expr),
            BoundNode::Statement(_) => None,
        }
    }
}

impl<'n> From<&'n BoundStatement> for BoundNode<'n> {
    fn from(stmt: &'n BoundStatement) -> Self {
        BoundNode::Statement(stmt)
    }
}

impl<'n> From<&'n BoundExpression> for BoundNode<'n> {
    fn from(expr: &'n BoundExpression) -> Self {
        BoundNode::Expression(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BoundBlockStatement;
    use crate::symbols::LabelSymbol;

    #[test]
    fn test_descendants_preorder() {
        let body = BoundStatement::Block(BoundBlockStatement::new(vec![BoundStatement::Expression(
            BoundExpression::literal(1i64),
        )]));
        let stmt = BoundStatement::While {
            condition: BoundExpression::literal(true),
            body: Box::new(body),
            break_label: LabelSymbol::fresh("break"),
            continue_label: LabelSymbol::fresh("continue"),
        };
        let nodes = BoundNode::from(&stmt).descendants();
        assert_eq!(nodes.len(), 5);
        assert!(matches!(nodes[0], BoundNode::Statement(BoundStatement::While { .. })));
        assert!(matches!(nodes[1], BoundNode::Expression(_)));
        assert!(matches!(nodes[2], BoundNode::Statement(BoundStatement::Block(_))));
        assert!(matches!(nodes[3], BoundNode::Statement(BoundStatement::Expression(_))));
    }
}
