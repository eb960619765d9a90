//! quill_tests: shared program fixtures for end-to-end tests.
//!
//! Each fixture builds one compilation unit with [`SyntaxFactory`]; the
//! comment above it gives the source the tree stands for.

use quill_compiler::Compilation;
use quill_evaluator::{BufferedHost, EvalError, GlobalValues};
use quill_ir::Value;
use quill_options::CompilerOptions;
use quill_syntax::{CompilationUnit, SyntaxFactory, SyntaxKind};
use std::rc::Rc;

/// What compiling and running one unit produced.
#[derive(Debug)]
pub struct Outcome {
    pub compilation: Rc<Compilation>,
    pub result: Result<Option<Value>, EvalError>,
    pub output: Vec<String>,
}

/// Compile `unit` and evaluate it against a buffered host.
pub fn run(unit: &CompilationUnit<'_>, options: CompilerOptions) -> Outcome {
    let compilation = Compilation::compile(unit, options);
    let mut globals = GlobalValues::new();
    let mut host = BufferedHost::new();
    let result = compilation.evaluate(&mut globals, &mut host);
    Outcome {
        compilation,
        result,
        output: host.output,
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// ```text
/// function fact(n: int): int {
///     if n <= 1 { return 1 }
///     return n * fact(n - 1)
/// }
/// print(fact(5))
/// ```
pub fn factorial<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let fact = f.function(
        "fact",
        vec![("n", "int")],
        Some("int"),
        vec![
            f.if_(
                f.binary(f.name("n"), SyntaxKind::LessEqualsToken, f.int(1)),
                f.block(vec![f.ret(Some(f.int(1)))]),
                None,
            ),
            f.ret(Some(f.binary(
                f.name("n"),
                SyntaxKind::StarToken,
                f.call("fact", vec![f.binary(f.name("n"), SyntaxKind::MinusToken, f.int(1))]),
            ))),
        ],
    );
    let main = f.global(f.expr_stmt(f.call("print", vec![f.call("fact", vec![f.int(5)])])));
    f.compilation_unit(vec![fact, main])
}

/// ```text
/// function depth(n: int): int {
///     var local = n * 10
///     if n > 0 { depth(n - 1) }
///     return local
/// }
/// print(depth(3))
/// ```
pub fn frame_isolation<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let depth = f.function(
        "depth",
        vec![("n", "int")],
        Some("int"),
        vec![
            f.var_decl("local", f.binary(f.name("n"), SyntaxKind::StarToken, f.int(10))),
            f.if_(
                f.binary(f.name("n"), SyntaxKind::GreaterToken, f.int(0)),
                f.block(vec![f.expr_stmt(f.call(
                    "depth",
                    vec![f.binary(f.name("n"), SyntaxKind::MinusToken, f.int(1))],
                ))]),
                None,
            ),
            f.ret(Some(f.name("local"))),
        ],
    );
    let main = f.global(f.expr_stmt(f.call("print", vec![f.call("depth", vec![f.int(3)])])));
    f.compilation_unit(vec![depth, main])
}

/// `if false { print("a") } else { print("b") }`
pub fn constant_if_else<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let statement = f.if_(
        f.bool(false),
        f.block(vec![f.expr_stmt(f.call("print", vec![f.string("a")]))]),
        Some(f.block(vec![f.expr_stmt(f.call("print", vec![f.string("b")]))])),
    );
    f.compilation_unit(vec![f.global(statement)])
}

/// `for i in 1..3 { print(i) }`
pub fn counting_loop<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let statement = f.for_(
        "i",
        f.range(f.int(1), f.int(3)),
        f.block(vec![f.expr_stmt(f.call("print", vec![f.name("i")]))]),
    );
    f.compilation_unit(vec![f.global(statement)])
}

/// `function f(): int { if true { return 1 } }`
pub fn constant_if_return<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let function = f.function(
        "f",
        vec![],
        Some("int"),
        vec![f.if_(f.bool(true), f.block(vec![f.ret(Some(f.int(1)))]), None)],
    );
    f.compilation_unit(vec![function])
}

/// `function g(x: int): int { if x > 0 { return 1 } }`
pub fn missing_return<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let function = f.function(
        "g",
        vec![("x", "int")],
        Some("int"),
        vec![f.if_(
            f.binary(f.name("x"), SyntaxKind::GreaterToken, f.int(0)),
            f.block(vec![f.ret(Some(f.int(1)))]),
            None,
        )],
    );
    f.compilation_unit(vec![function])
}

/// ```text
/// function sign(x: int): int {
///     if x < 0 { return -1 } else if x == 0 { return 0 } else { return 1 }
/// }
/// ```
pub fn all_paths_return<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let inner = f.if_(
        f.binary(f.name("x"), SyntaxKind::EqualsEqualsToken, f.int(0)),
        f.block(vec![f.ret(Some(f.int(0)))]),
        Some(f.block(vec![f.ret(Some(f.int(1)))])),
    );
    let function = f.function(
        "sign",
        vec![("x", "int")],
        Some("int"),
        vec![f.if_(
            f.binary(f.name("x"), SyntaxKind::LessToken, f.int(0)),
            f.block(vec![f.ret(Some(f.unary(SyntaxKind::MinusToken, f.int(1))))]),
            Some(inner),
        )],
    );
    f.compilation_unit(vec![function])
}

/// ```text
/// function add(a: int, b: int): int { return a + b }
/// print(add(1))
/// ```
pub fn wrong_arity<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let add = f.function(
        "add",
        vec![("a", "int"), ("b", "int")],
        Some("int"),
        vec![f.ret(Some(f.binary(f.name("a"), SyntaxKind::PlusToken, f.name("b"))))],
    );
    let main = f.global(f.expr_stmt(f.call("print", vec![f.call("add", vec![f.int(1)])])));
    f.compilation_unit(vec![add, main])
}

/// ```text
/// var n = 0
/// for i in 9223372036854775806..9223372036854775807 {
///     n += 1
///     if n > 5 { break }
/// }
/// print(n)
/// ```
pub fn loop_to_int_max<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let statements = vec![
        f.var_decl("n", f.int(0)),
        f.for_(
            "i",
            f.range(f.int(i64::MAX - 1), f.int(i64::MAX)),
            f.block(vec![
                f.expr_stmt(f.compound_assign("n", SyntaxKind::PlusEqualsToken, f.int(1))),
                f.if_(
                    f.binary(f.name("n"), SyntaxKind::GreaterToken, f.int(5)),
                    f.block(vec![f.break_()]),
                    None,
                ),
            ]),
        ),
        f.expr_stmt(f.call("print", vec![f.name("n")])),
    ];
    f.compilation_unit(statements.into_iter().map(|s| f.global(s)).collect())
}

/// `let x = 1 + 2 * 3`
pub fn folded_declaration<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let value = f.binary(
        f.int(1),
        SyntaxKind::PlusToken,
        f.binary(f.int(2), SyntaxKind::StarToken, f.int(3)),
    );
    f.compilation_unit(vec![f.global(f.let_decl("x", value))])
}

/// Two identical loop nests, each
///
/// ```text
/// var i = 0
/// while i < 3 {
///     var j = 0
///     do { j += 1 if j == 2 { break } } while j < 5
///     for k in 0..i { if k == 1 { continue } print(k) }
///     i += 1
/// }
/// ```
///
/// once inside `function nest()` and once at global scope.
pub fn nested_loops<'a>(f: &SyntaxFactory<'a>) -> &'a CompilationUnit<'a> {
    let nest = || {
        vec![
            f.var_decl("i", f.int(0)),
            f.while_(
                f.binary(f.name("i"), SyntaxKind::LessToken, f.int(3)),
                f.block(vec![
                    f.var_decl("j", f.int(0)),
                    f.do_while(
                        f.block(vec![
                            f.expr_stmt(f.compound_assign("j", SyntaxKind::PlusEqualsToken, f.int(1))),
                            f.if_(
                                f.binary(f.name("j"), SyntaxKind::EqualsEqualsToken, f.int(2)),
                                f.block(vec![f.break_()]),
                                None,
                            ),
                        ]),
                        f.binary(f.name("j"), SyntaxKind::LessToken, f.int(5)),
                    ),
                    f.for_(
                        "k",
                        f.range(f.int(0), f.name("i")),
                        f.block(vec![
                            f.if_(
                                f.binary(f.name("k"), SyntaxKind::EqualsEqualsToken, f.int(1)),
                                f.block(vec![f.continue_()]),
                                None,
                            ),
                            f.expr_stmt(f.call("print", vec![f.name("k")])),
                        ]),
                    ),
                    f.expr_stmt(f.compound_assign("i", SyntaxKind::PlusEqualsToken, f.int(1))),
                ]),
            ),
        ]
    };
    let function = f.function("nest", vec![], None, nest());
    let mut members = vec![function];
    members.extend(nest().into_iter().map(|s| f.global(s)));
    f.compilation_unit(members)
}
