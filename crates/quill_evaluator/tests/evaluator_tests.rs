//! Tests for the evaluator, on hand-built lowered programs.

use indexmap::IndexMap;
use quill_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use quill_evaluator::{BufferedHost, EvalError, Evaluator, GlobalValues};
use quill_ir::{
    Builtin, BoundBinaryOperator, BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement,
    FunctionSymbol, LabelSymbol, TypeSymbol, Value, VariableKind, VariableSymbol,
};
use quill_syntax::SyntaxKind;
use std::rc::Rc;

// ============================================================================
// Helpers
// ============================================================================

fn op(kind: SyntaxKind, ty: TypeSymbol) -> &'static BoundBinaryOperator {
    BoundBinaryOperator::bind(kind, ty, ty).unwrap()
}

fn binary(left: BoundExpression, kind: SyntaxKind, right: BoundExpression) -> BoundExpression {
    let ty = left.ty;
    BoundExpression::binary(left, op(kind, ty), right)
}

fn var(variable: &Rc<VariableSymbol>) -> BoundExpression {
    BoundExpression::variable(variable.clone())
}

fn print(expression: BoundExpression) -> BoundStatement {
    let argument = BoundExpression::conversion(TypeSymbol::Any, expression);
    BoundStatement::Expression(BoundExpression::call(Builtin::Print.symbol(), vec![argument]))
}

fn main_function() -> Rc<FunctionSymbol> {
    FunctionSymbol::new("main", vec![], TypeSymbol::Void, None)
}

fn program(
    entry: &Rc<FunctionSymbol>,
    functions: Vec<(Rc<FunctionSymbol>, Vec<BoundStatement>)>,
) -> BoundProgram {
    let functions: IndexMap<_, _> = functions
        .into_iter()
        .map(|(f, statements)| (f, BoundBlockStatement::new(statements)))
        .collect();
    BoundProgram {
        previous: None,
        diagnostics: DiagnosticCollection::new(),
        entry: Some(entry.clone()),
        functions,
    }
}

fn run(program: &BoundProgram) -> (Result<Option<Value>, EvalError>, Vec<String>) {
    let mut globals = GlobalValues::new();
    let mut host = BufferedHost::new();
    let result = Evaluator::new(program, &mut globals, &mut host).evaluate();
    (result, host.output)
}

/// `function fact(n: int): int` computing `fact(n - 1) * n`.
fn factorial() -> (Rc<FunctionSymbol>, Vec<BoundStatement>) {
    let n = VariableSymbol::parameter("n", TypeSymbol::Int, 0);
    let fact = FunctionSymbol::new("fact", vec![n.clone()], TypeSymbol::Int, None);
    let recurse = LabelSymbol::fresh("else");
    let call = BoundExpression::call(
        fact.clone(),
        vec![binary(var(&n), SyntaxKind::MinusToken, BoundExpression::literal(1i64))],
    );
    let body = vec![
        BoundStatement::ConditionalGoto {
            label: recurse.clone(),
            condition: binary(var(&n), SyntaxKind::LessEqualsToken, BoundExpression::literal(1i64)),
            jump_if_true: false,
        },
        BoundStatement::Return(Some(BoundExpression::literal(1i64))),
        BoundStatement::Label(recurse),
        // The call runs before `n` is read again, so the frames must stay apart.
        BoundStatement::Return(Some(binary(call, SyntaxKind::StarToken, var(&n)))),
    ];
    (fact, body)
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_recursive_factorial() {
    let (fact, fact_body) = factorial();
    let main = main_function();
    let call = BoundExpression::call(fact.clone(), vec![BoundExpression::literal(5i64)]);
    let program = program(&main, vec![(fact, fact_body), (main.clone(), vec![print(call), BoundStatement::Return(None)])]);
    let (result, output) = run(&program);
    assert!(result.is_ok());
    assert_eq!(output, ["120"]);
}

#[test]
fn test_last_expression_value_is_the_result() {
    let (fact, fact_body) = factorial();
    let main = main_function();
    let call = BoundExpression::call(fact.clone(), vec![BoundExpression::literal(4i64)]);
    let program = program(
        &main,
        vec![(fact, fact_body), (main.clone(), vec![BoundStatement::Expression(call), BoundStatement::Return(None)])],
    );
    assert_eq!(run(&program).0.unwrap(), Some(Value::Int(24)));
}

#[test]
fn test_loop_and_globals() {
    // var i = 1; body: print(i); i = i + 1; goto body if i <= 3
    let i = VariableSymbol::new("i", false, TypeSymbol::Int, VariableKind::Global, None);
    let body = LabelSymbol::fresh("body");
    let main = main_function();
    let statements = vec![
        BoundStatement::VariableDeclaration {
            variable: i.clone(),
            initializer: BoundExpression::literal(1i64),
        },
        BoundStatement::Label(body.clone()),
        print(var(&i)),
        BoundStatement::Expression(BoundExpression::assignment(
            i.clone(),
            binary(var(&i), SyntaxKind::PlusToken, BoundExpression::literal(1i64)),
        )),
        BoundStatement::ConditionalGoto {
            label: body,
            condition: binary(var(&i), SyntaxKind::LessEqualsToken, BoundExpression::literal(3i64)),
            jump_if_true: true,
        },
        BoundStatement::Return(None),
    ];
    let program = program(&main, vec![(main.clone(), statements)]);

    let mut globals = GlobalValues::new();
    let mut host = BufferedHost::new();
    Evaluator::new(&program, &mut globals, &mut host).evaluate().unwrap();
    assert_eq!(host.output, ["1", "2", "3"]);
    assert_eq!(globals.get(&i), Some(&Value::Int(4)));
}

#[test]
fn test_short_circuit_skips_right_operand() {
    // function side(): bool { print("side"); return true }
    let side = FunctionSymbol::new("side", vec![], TypeSymbol::Bool, None);
    let side_body = vec![
        print(BoundExpression::literal("side")),
        BoundStatement::Return(Some(BoundExpression::literal(true))),
    ];
    let b = VariableSymbol::new("b", false, TypeSymbol::Bool, VariableKind::Local, None);
    let main = main_function();
    let and = binary(var(&b), SyntaxKind::AmpersandAmpersandToken, BoundExpression::call(side.clone(), vec![]));
    let statements = vec![
        BoundStatement::VariableDeclaration {
            variable: b.clone(),
            initializer: BoundExpression::literal(false),
        },
        BoundStatement::Expression(and),
        BoundStatement::Return(None),
    ];
    let program = program(&main, vec![(side, side_body), (main.clone(), statements)]);
    let (result, output) = run(&program);
    assert_eq!(result.unwrap(), Some(Value::Bool(false)));
    assert!(output.is_empty());
}

#[test]
fn test_input_builtin() {
    let main = main_function();
    let read = BoundExpression::call(Builtin::Input.symbol(), vec![]);
    let program = program(&main, vec![(main.clone(), vec![print(read), BoundStatement::Return(None)])]);
    let mut globals = GlobalValues::new();
    let mut host = BufferedHost::with_input(["hello"]);
    Evaluator::new(&program, &mut globals, &mut host).evaluate().unwrap();
    assert_eq!(host.output, ["hello"]);
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_division_by_zero() {
    let zero = VariableSymbol::new("zero", false, TypeSymbol::Int, VariableKind::Local, None);
    let main = main_function();
    let statements = vec![
        BoundStatement::VariableDeclaration {
            variable: zero.clone(),
            initializer: BoundExpression::literal(0i64),
        },
        print(binary(BoundExpression::literal(1i64), SyntaxKind::SlashToken, var(&zero))),
        BoundStatement::Return(None),
    ];
    let program = program(&main, vec![(main.clone(), statements)]);
    assert!(matches!(run(&program).0, Err(EvalError::DivisionByZero)));
}

#[test]
fn test_failed_conversion() {
    let s = VariableSymbol::new("s", false, TypeSymbol::String, VariableKind::Local, None);
    let main = main_function();
    let statements = vec![
        BoundStatement::VariableDeclaration {
            variable: s.clone(),
            initializer: BoundExpression::literal("abc"),
        },
        print(BoundExpression::conversion(TypeSymbol::Int, var(&s))),
        BoundStatement::Return(None),
    ];
    let program = program(&main, vec![(main.clone(), statements)]);
    let err = run(&program).0.unwrap_err();
    assert_eq!(err.to_string(), "cannot convert 'abc' to 'int'");
}

#[test]
fn test_max_call_depth() {
    let forever = FunctionSymbol::new("forever", vec![], TypeSymbol::Void, None);
    let body = vec![
        BoundStatement::Expression(BoundExpression::call(forever.clone(), vec![])),
        BoundStatement::Return(None),
    ];
    let program = program(&forever, vec![(forever.clone(), body)]);
    let mut globals = GlobalValues::new();
    let mut host = BufferedHost::new();
    let result = Evaluator::new(&program, &mut globals, &mut host)
        .with_max_call_depth(Some(50))
        .evaluate();
    assert!(matches!(result, Err(EvalError::MaxCallDepth(50))));
}

#[test]
fn test_refuses_program_with_errors() {
    let main = main_function();
    let mut program = program(&main, vec![(main.clone(), vec![print(BoundExpression::literal("x"))])]);
    program
        .diagnostics
        .add(Diagnostic::new(&messages::ALL_PATHS_MUST_RETURN, &[]));
    let (result, output) = run(&program);
    assert!(matches!(result, Err(EvalError::HasDiagnostics(1))));
    assert!(output.is_empty());
}

#[test]
fn test_program_without_entry_does_nothing() {
    let program = BoundProgram {
        previous: None,
        diagnostics: DiagnosticCollection::new(),
        entry: None,
        functions: IndexMap::new(),
    };
    assert_eq!(run(&program).0.unwrap(), None);
}
