//! Dead-statement removal and return completeness.

use crate::graph::ControlFlowGraph;
use quill_ir::BoundBlockStatement;

/// Drop the statements of blocks that cannot be reached from the start.
///
/// The surviving statements keep their order. Nothing is reported: code
/// after a `return` or behind a constant-false branch is simply gone.
pub fn remove_unreachable(body: &BoundBlockStatement) -> BoundBlockStatement {
    let graph = ControlFlowGraph::build(body);
    let live = graph.reachable();

    let mut statements = Vec::with_capacity(body.statements.len());
    for block in graph.body_blocks() {
        if live.contains(&block.id) {
            statements.extend(block.statements.iter().cloned());
        }
    }

    let removed = body.statements.len() - statements.len();
    if removed > 0 {
        log::debug!("removed {} unreachable statements", removed);
    }
    BoundBlockStatement::new(statements)
}

/// Whether every path from entry to exit passes a `return`.
pub fn all_paths_return(body: &BoundBlockStatement) -> bool {
    ControlFlowGraph::build(body).all_paths_return()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::{BoundExpression, BoundStatement, LabelSymbol, TypeSymbol, VariableKind, VariableSymbol};

    fn ret(n: i64) -> BoundStatement {
        BoundStatement::Return(Some(BoundExpression::literal(n)))
    }

    fn flag() -> BoundExpression {
        let b = VariableSymbol::new("b", false, TypeSymbol::Bool, VariableKind::Local, None);
        BoundExpression::variable(b)
    }

    #[test]
    fn test_code_after_return_is_removed() {
        let end = LabelSymbol::fresh("end");
        let body = BoundBlockStatement::new(vec![ret(1), ret(2), BoundStatement::Label(end)]);
        let cleaned = remove_unreachable(&body);
        assert_eq!(cleaned.statements.len(), 1);
    }

    #[test]
    fn test_reachable_label_survives() {
        let end = LabelSymbol::fresh("end");
        let body = BoundBlockStatement::new(vec![
            BoundStatement::ConditionalGoto {
                label: end.clone(),
                condition: flag(),
                jump_if_true: true,
            },
            ret(1),
            BoundStatement::Label(end),
            ret(2),
        ]);
        assert_eq!(remove_unreachable(&body).statements.len(), 4);
        assert!(all_paths_return(&body));
    }

    #[test]
    fn test_empty_body_falls_through() {
        assert!(!all_paths_return(&BoundBlockStatement::default()));
    }
}
