//! Benchmark harness for the quill pipeline.
//!
//! Uses criterion for reliable benchmarking.
//! Run with: cargo bench -p quill_compiler

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quill_compiler::Compilation;
use quill_core::SyntaxArena;
use quill_evaluator::{BufferedHost, GlobalValues};
use quill_options::CompilerOptions;
use quill_syntax::{CompilationUnit, SyntaxFactory, SyntaxKind};

/// `function fact(n: int): int` plus `count` copies of a summing loop.
fn build_unit<'a>(f: &SyntaxFactory<'a>, count: usize) -> &'a CompilationUnit<'a> {
    let mut members = vec![f.function(
        "fact",
        vec![("n", "int")],
        Some("int"),
        vec![
            f.if_(
                f.binary(f.name("n"), SyntaxKind::LessEqualsToken, f.int(1)),
                f.ret(Some(f.int(1))),
                None,
            ),
            f.ret(Some(f.binary(
                f.name("n"),
                SyntaxKind::StarToken,
                f.call("fact", vec![f.binary(f.name("n"), SyntaxKind::MinusToken, f.int(1))]),
            ))),
        ],
    )];

    for i in 0..count {
        let total = format!("total{}", i);
        members.push(f.function(
            &format!("sum{}", i),
            vec![("limit", "int")],
            Some("int"),
            vec![
                f.var_decl(&total, f.int(0)),
                f.for_(
                    "k",
                    f.range(f.int(1), f.name("limit")),
                    f.block(vec![
                        f.if_(
                            f.binary(
                                f.binary(f.name("k"), SyntaxKind::PercentToken, f.int(2)),
                                SyntaxKind::EqualsEqualsToken,
                                f.int(0),
                            ),
                            f.continue_(),
                            None,
                        ),
                        f.expr_stmt(f.compound_assign(&total, SyntaxKind::PlusEqualsToken, f.name("k"))),
                    ]),
                ),
                f.ret(Some(f.name(&total))),
            ],
        ));
    }

    members.push(f.global(f.expr_stmt(f.call("print", vec![f.call("fact", vec![f.int(10)])]))));
    f.compilation_unit(members)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for count in [1usize, 10, 100] {
        let arena = SyntaxArena::new();
        let factory = SyntaxFactory::new(&arena);
        let unit = build_unit(&factory, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), unit, |b, unit| {
            b.iter(|| Compilation::compile(black_box(unit), CompilerOptions::default()))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let arena = SyntaxArena::new();
    let factory = SyntaxFactory::new(&arena);
    let unit = build_unit(&factory, 1);
    let compilation = Compilation::compile(unit, CompilerOptions::default());

    c.bench_function("evaluate_fact_10", |b| {
        b.iter(|| {
            let mut globals = GlobalValues::new();
            let mut host = BufferedHost::new();
            compilation.evaluate(&mut globals, &mut host).unwrap();
            black_box(host.output)
        })
    });
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
