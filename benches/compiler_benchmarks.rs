//! Performance benchmarks for the Motif compile pipeline.
//!
//! Measures whole-program compilation (inference plus emission) over
//! synthetic workloads: a small arithmetic main, a call-heavy program that
//! re-infers one function from many call sites, and a loop/list workload
//! that exercises the emitter's boxing paths.

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use motif::Compiler;
use motif_ast::{
    AssignOp, AssignStmt, BinaryExpr, BinaryOp, CallExpr, Expr, ExprStmt, FunctionDecl, Ident,
    IntLit, ListLit, MainDecl, Param, Program, PutStmt, ReturnStmt, Span, Stmt,
};
use std::hint::black_box;

fn int<'a>(arena: &'a Bump, value: i64) -> &'a Expr<'a> {
    arena.alloc(Expr::Int(IntLit {
        value,
        span: Span::default(),
    }))
}

fn ident<'a>(arena: &'a Bump, name: &'a str) -> &'a Expr<'a> {
    arena.alloc(Expr::Ident(Ident::new(name, Span::default())))
}

fn assign<'a>(arena: &'a Bump, name: &'a str, value: &'a Expr<'a>) -> Stmt<'a> {
    Stmt::Assign(arena.alloc(AssignStmt {
        target: Ident::new(name, Span::default()),
        index: None,
        op: AssignOp::Assign,
        value,
        span: Span::default(),
    }))
}

/// main with `count` chained arithmetic assignments.
fn arithmetic_program<'a>(arena: &'a Bump, count: usize) -> Program<'a> {
    let mut body = Vec::with_capacity(count + 1);
    body.push(assign(arena, "x", int(arena, 1)));
    for _ in 0..count {
        let sum = arena.alloc(BinaryExpr {
            left: ident(arena, "x"),
            op: BinaryOp::Add,
            right: int(arena, 1),
            span: Span::default(),
        });
        body.push(assign(arena, "x", arena.alloc(Expr::Binary(sum))));
    }
    body.push(Stmt::Put(arena.alloc(PutStmt {
        value: ident(arena, "x"),
        span: Span::default(),
    })));
    Program {
        functions: &[],
        patterns: &[],
        main: MainDecl {
            body: arena.alloc_slice_copy(&body),
            span: Span::default(),
        },
        span: Span::default(),
    }
}

/// One function re-inferred from `count` call sites.
fn call_heavy_program<'a>(arena: &'a Bump, count: usize) -> Program<'a> {
    let ret = Stmt::Return(arena.alloc(ReturnStmt {
        value: Some(arena.alloc(Expr::Binary(arena.alloc(BinaryExpr {
            left: ident(arena, "x"),
            op: BinaryOp::Add,
            right: ident(arena, "x"),
            span: Span::default(),
        })))),
        span: Span::default(),
    }));
    let params = arena.alloc_slice_copy(&[Param {
        name: Ident::new("x", Span::default()),
        default: None,
    }]);
    let double = FunctionDecl {
        name: Ident::new("double", Span::default()),
        params,
        body: arena.alloc_slice_copy(&[ret]),
        span: Span::default(),
    };

    let mut body = Vec::with_capacity(count);
    for i in 0..count {
        let args = arena.alloc_slice_copy(&[*int(arena, i as i64)]);
        let call = arena.alloc(CallExpr {
            callee: ident(arena, "double"),
            args,
            span: Span::default(),
        });
        body.push(Stmt::Expr(arena.alloc(ExprStmt {
            expr: arena.alloc(Expr::Call(call)),
            span: Span::default(),
        })));
    }
    Program {
        functions: arena.alloc_slice_copy(&[double]),
        patterns: &[],
        main: MainDecl {
            body: arena.alloc_slice_copy(&body),
            span: Span::default(),
        },
        span: Span::default(),
    }
}

/// A list literal of `count` elements, printed element by element.
fn list_program<'a>(arena: &'a Bump, count: usize) -> Program<'a> {
    let elements =
        arena.alloc_slice_fill_iter((0..count).map(|i| *int(arena, i as i64)));
    let list = arena.alloc(Expr::List(ListLit {
        elements,
        span: Span::default(),
    }));
    let body = [
        assign(arena, "xs", list),
        Stmt::For(arena.alloc(motif_ast::ForStmt {
            iterator: Ident::new("i", Span::default()),
            range: motif_ast::Range::Ident(Ident::new("xs", Span::default())),
            body: arena.alloc_slice_copy(&[Stmt::Put(arena.alloc(PutStmt {
                value: ident(arena, "i"),
                span: Span::default(),
            }))]),
            span: Span::default(),
        })),
    ];
    Program {
        functions: &[],
        patterns: &[],
        main: MainDecl {
            body: arena.alloc_slice_copy(&body),
            span: Span::default(),
        },
        span: Span::default(),
    }
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for size in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::new("arithmetic", size), |b| {
            let arena = Bump::new();
            let program = arithmetic_program(&arena, size);
            b.iter(|| black_box(Compiler::compile(black_box(&program))));
        });
    }

    group.bench_function("call_heavy_200", |b| {
        let arena = Bump::new();
        let program = call_heavy_program(&arena, 200);
        b.iter(|| black_box(Compiler::compile(black_box(&program))));
    });

    group.bench_function("list_500", |b| {
        let arena = Bump::new();
        let program = list_program(&arena, 500);
        b.iter(|| black_box(Compiler::compile(black_box(&program))));
    });

    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
