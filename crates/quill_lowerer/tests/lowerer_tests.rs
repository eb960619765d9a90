//! Tests for the lowerer.

use quill_ir::{
    BoundBlockStatement, BoundExpression, BoundExpressionKind, BoundStatement, FunctionSymbol,
    LabelSymbol, SymbolId, TypeSymbol, Value, VariableKind, VariableSymbol,
};
use quill_lowerer::lower;
use std::collections::HashSet;
use std::rc::Rc;

// ============================================================================
// Helpers
// ============================================================================

fn void_function() -> Rc<FunctionSymbol> {
    FunctionSymbol::new("f", vec![], TypeSymbol::Void, None)
}

fn flag() -> BoundExpression {
    let b = VariableSymbol::new("b", false, TypeSymbol::Bool, VariableKind::Local, None);
    BoundExpression::variable(b)
}

fn work(n: i64) -> BoundStatement {
    let x = VariableSymbol::new("x", false, TypeSymbol::Int, VariableKind::Local, None);
    BoundStatement::Expression(BoundExpression::assignment(x, BoundExpression::literal(n)))
}

fn block(statements: Vec<BoundStatement>) -> BoundStatement {
    BoundStatement::Block(BoundBlockStatement::new(statements))
}

fn shape(body: &BoundBlockStatement) -> Vec<&'static str> {
    body.statements
        .iter()
        .map(|s| match s {
            BoundStatement::Label(_) => "label",
            BoundStatement::Goto(_) => "goto",
            BoundStatement::ConditionalGoto { jump_if_true: true, .. } => "goto_if_true",
            BoundStatement::ConditionalGoto { jump_if_true: false, .. } => "goto_if_false",
            BoundStatement::VariableDeclaration { .. } => "decl",
            BoundStatement::Expression(_) => "expr",
            BoundStatement::Return(_) => "return",
            _ => "structured",
        })
        .collect()
}

fn label_ids(body: &BoundBlockStatement) -> Vec<SymbolId> {
    body.statements
        .iter()
        .filter_map(|s| match s {
            BoundStatement::Label(label) => Some(label.id),
            _ => None,
        })
        .collect()
}

fn jump_target(statement: &BoundStatement) -> &LabelSymbol {
    match statement {
        BoundStatement::Goto(label) | BoundStatement::ConditionalGoto { label, .. } => label,
        other => panic!("not a jump: {:?}", other),
    }
}

fn while_loop(condition: BoundExpression, body: BoundStatement) -> BoundStatement {
    BoundStatement::While {
        condition,
        body: Box::new(body),
        break_label: LabelSymbol::fresh("break"),
        continue_label: LabelSymbol::fresh("continue"),
    }
}

// ============================================================================
// Expansions
// ============================================================================

#[test]
fn test_if_without_else() {
    let body = BoundBlockStatement::new(vec![BoundStatement::If {
        condition: flag(),
        then_statement: Box::new(block(vec![work(1)])),
        else_statement: None,
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(shape(&lowered), ["goto_if_false", "expr", "label", "return"]);
    let end = jump_target(&lowered.statements[0]);
    assert!(matches!(&lowered.statements[2], BoundStatement::Label(l) if l == end));
}

#[test]
fn test_if_with_else() {
    let body = BoundBlockStatement::new(vec![BoundStatement::If {
        condition: flag(),
        then_statement: Box::new(work(1)),
        else_statement: Some(Box::new(work(2))),
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(
        shape(&lowered),
        ["goto_if_false", "expr", "goto", "label", "expr", "label", "return"]
    );
    let else_label = jump_target(&lowered.statements[0]);
    let end_label = jump_target(&lowered.statements[2]);
    assert!(matches!(&lowered.statements[3], BoundStatement::Label(l) if l == else_label));
    assert!(matches!(&lowered.statements[5], BoundStatement::Label(l) if l == end_label));
}

#[test]
fn test_constant_false_condition_jumps_to_else() {
    let body = BoundBlockStatement::new(vec![BoundStatement::If {
        condition: BoundExpression::literal(false),
        then_statement: Box::new(work(1)),
        else_statement: Some(Box::new(work(2))),
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(shape(&lowered), ["goto", "expr", "goto", "label", "expr", "label", "return"]);
    assert_eq!(jump_target(&lowered.statements[0]).id, label_ids(&lowered)[0]);
}

#[test]
fn test_constant_true_condition_drops_the_jump() {
    let body = BoundBlockStatement::new(vec![BoundStatement::If {
        condition: BoundExpression::literal(true),
        then_statement: Box::new(work(1)),
        else_statement: None,
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(shape(&lowered), ["expr", "label", "return"]);
}

#[test]
fn test_while() {
    let lowered = lower(
        &void_function(),
        &BoundBlockStatement::new(vec![while_loop(flag(), work(1))]),
    );
    assert_eq!(
        shape(&lowered),
        ["goto", "label", "expr", "label", "goto_if_true", "label", "return"]
    );
    // goto CONTINUE; BODY: ...; CONTINUE: goto BODY if c; BREAK:
    let continue_label = jump_target(&lowered.statements[0]);
    assert!(matches!(&lowered.statements[3], BoundStatement::Label(l) if l == continue_label));
    let body_label = jump_target(&lowered.statements[4]);
    assert!(matches!(&lowered.statements[1], BoundStatement::Label(l) if l == body_label));
}

#[test]
fn test_do_while() {
    let break_label = LabelSymbol::fresh("break");
    let body = BoundBlockStatement::new(vec![BoundStatement::DoWhile {
        body: Box::new(block(vec![work(1), BoundStatement::Goto(break_label.clone())])),
        condition: flag(),
        break_label: break_label.clone(),
        continue_label: LabelSymbol::fresh("continue"),
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(
        shape(&lowered),
        ["label", "expr", "goto", "label", "goto_if_true", "label", "return"]
    );
    assert!(matches!(&lowered.statements[5], BoundStatement::Label(l) if *l == break_label));
}

#[test]
fn test_for_declares_bounds_and_increments_after_continue() {
    let i = VariableSymbol::new("i", true, TypeSymbol::Int, VariableKind::Local, None);
    let break_label = LabelSymbol::fresh("break");
    let continue_label = LabelSymbol::fresh("continue");
    let body = BoundBlockStatement::new(vec![BoundStatement::For {
        variable: i.clone(),
        range: BoundExpression::range(BoundExpression::literal(1i64), BoundExpression::literal(3i64)),
        body: Box::new(block(vec![BoundStatement::Goto(continue_label.clone())])),
        break_label: break_label.clone(),
        continue_label: continue_label.clone(),
    }]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(
        shape(&lowered),
        [
            "decl",
            "decl",
            "goto",
            "label",
            "goto",
            "label",
            "goto_if_true",
            "expr",
            "label",
            "goto_if_true",
            "label",
            "return"
        ]
    );

    let BoundStatement::VariableDeclaration { variable, initializer } = &lowered.statements[1] else {
        panic!("expected the upper bound declaration");
    };
    assert_eq!(variable.name, "upperBound");
    assert!(variable.is_read_only);
    assert_eq!(variable.kind, VariableKind::Local);
    assert_eq!(initializer.constant, Some(Value::Int(3)));

    // `continue` lands on the bound check, which leaves the loop before
    // the increment once `i` reaches the upper bound.
    assert!(matches!(&lowered.statements[5], BoundStatement::Label(l) if *l == continue_label));
    assert_eq!(jump_target(&lowered.statements[6]), &break_label);
    assert!(matches!(&lowered.statements[10], BoundStatement::Label(l) if *l == break_label));
    let BoundStatement::Expression(increment) = &lowered.statements[7] else {
        panic!("expected the increment");
    };
    assert!(matches!(&increment.kind, BoundExpressionKind::Assignment { variable, .. } if *variable == i));
}

#[test]
fn test_for_at_global_scope_uses_global_bound() {
    let i = VariableSymbol::new("i", true, TypeSymbol::Int, VariableKind::Global, None);
    let body = BoundBlockStatement::new(vec![BoundStatement::For {
        variable: i,
        range: BoundExpression::range(BoundExpression::literal(0i64), BoundExpression::literal(1i64)),
        body: Box::new(block(vec![])),
        break_label: LabelSymbol::fresh("break"),
        continue_label: LabelSymbol::fresh("continue"),
    }]);
    let lowered = lower(&void_function(), &body);
    let BoundStatement::VariableDeclaration { variable, .. } = &lowered.statements[1] else {
        panic!("expected the upper bound declaration");
    };
    assert!(variable.is_global());
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_nested_blocks_flatten() {
    let body = BoundBlockStatement::new(vec![block(vec![block(vec![work(1)]), work(2)]), work(3)]);
    let lowered = lower(&void_function(), &body);
    assert!(lowered.is_lowered());
    assert_eq!(shape(&lowered), ["expr", "expr", "expr", "return"]);
}

#[test]
fn test_nested_loops_have_unique_labels() {
    let inner = while_loop(flag(), work(1));
    let outer = while_loop(flag(), block(vec![inner, while_loop(flag(), work(2))]));
    let lowered = lower(&void_function(), &BoundBlockStatement::new(vec![outer]));
    assert!(lowered.is_lowered());

    let ids = label_ids(&lowered);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), 9);
    assert_eq!(unique.len(), ids.len());

    // Every jump targets a label defined in the same body.
    for statement in &lowered.statements {
        if let BoundStatement::Goto(_) | BoundStatement::ConditionalGoto { .. } = statement {
            assert!(unique.contains(&jump_target(statement).id));
        }
    }
}

#[test]
fn test_void_body_ending_in_return_is_untouched() {
    let body = BoundBlockStatement::new(vec![work(1), BoundStatement::Return(None)]);
    let lowered = lower(&void_function(), &body);
    assert_eq!(shape(&lowered), ["expr", "return"]);
}

#[test]
fn test_empty_void_body_gets_return() {
    let lowered = lower(&void_function(), &BoundBlockStatement::default());
    assert_eq!(shape(&lowered), ["return"]);
}

#[test]
fn test_non_void_body_gets_no_implicit_return() {
    let f = FunctionSymbol::new("g", vec![], TypeSymbol::Int, None);
    let body = BoundBlockStatement::new(vec![BoundStatement::If {
        condition: flag(),
        then_statement: Box::new(BoundStatement::Return(Some(BoundExpression::literal(1i64)))),
        else_statement: None,
    }]);
    let lowered = lower(&f, &body);
    assert_eq!(shape(&lowered), ["goto_if_false", "return", "label"]);
}
