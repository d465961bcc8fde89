//! Arena-backed AST builders shared by the integration tests.

#![allow(dead_code)]

use bumpalo::Bump;
use motif_ast::{
    AppendExpr, AssignOp, AssignStmt, BinaryExpr, BinaryOp, BoolLit, BoundedRange, BreakStmt,
    CallExpr, ChompExpr, ChopExpr, Expr, ExprStmt, FloatLit, FnPtrExpr, ForStmt, FunctionDecl,
    Ident, IfStmt, IndexExpr, IntLit, LambdaExpr, LenExpr, ListLit, LoopStmt, MainDecl, MatchExpr,
    NextStmt, Param, PatternArm, PatternDecl, Program, PushStmt, PutStmt, Range, ReturnStmt, Span,
    Stmt, UnaryExpr, UnaryOp,
};

pub fn exprs<'a>(arena: &'a Bump, items: &[&'a Expr<'a>]) -> &'a [Expr<'a>] {
    arena.alloc_slice_fill_iter(items.iter().map(|e| **e))
}

pub fn int<'a>(arena: &'a Bump, value: i64) -> &'a Expr<'a> {
    arena.alloc(Expr::Int(IntLit {
        value,
        span: Span::default(),
    }))
}

pub fn float<'a>(arena: &'a Bump, value: f64) -> &'a Expr<'a> {
    arena.alloc(Expr::Float(FloatLit {
        value,
        span: Span::default(),
    }))
}

pub fn boolean<'a>(arena: &'a Bump, value: bool) -> &'a Expr<'a> {
    arena.alloc(Expr::Bool(BoolLit {
        value,
        span: Span::default(),
    }))
}

pub fn string<'a>(arena: &'a Bump, value: &'a str) -> &'a Expr<'a> {
    arena.alloc(Expr::Str(motif_ast::StrLit {
        value,
        span: Span::default(),
    }))
}

pub fn ident<'a>(arena: &'a Bump, name: &'a str) -> &'a Expr<'a> {
    arena.alloc(Expr::Ident(Ident::new(name, Span::default())))
}

pub fn fnptr<'a>(arena: &'a Bump, target: &'a str) -> &'a Expr<'a> {
    arena.alloc(Expr::FnPtr(FnPtrExpr {
        target: Ident::new(target, Span::default()),
        span: Span::default(),
    }))
}

pub fn list<'a>(arena: &'a Bump, elements: &[&'a Expr<'a>]) -> &'a Expr<'a> {
    let elements = exprs(arena, elements);
    arena.alloc(Expr::List(ListLit {
        elements,
        span: Span::default(),
    }))
}

pub fn binary<'a>(
    arena: &'a Bump,
    left: &'a Expr<'a>,
    op: BinaryOp,
    right: &'a Expr<'a>,
) -> &'a Expr<'a> {
    let node = arena.alloc(BinaryExpr {
        left,
        op,
        right,
        span: Span::default(),
    });
    arena.alloc(Expr::Binary(node))
}

pub fn unary<'a>(arena: &'a Bump, op: UnaryOp, operand: &'a Expr<'a>) -> &'a Expr<'a> {
    let node = arena.alloc(UnaryExpr {
        op,
        operand,
        span: Span::default(),
    });
    arena.alloc(Expr::Unary(node))
}

pub fn call<'a>(arena: &'a Bump, callee: &'a Expr<'a>, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
    let args = exprs(arena, args);
    let node = arena.alloc(CallExpr {
        callee,
        args,
        span: Span::default(),
    });
    arena.alloc(Expr::Call(node))
}

pub fn call_named<'a>(arena: &'a Bump, name: &'a str, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
    call(arena, ident(arena, name), args)
}

pub fn index<'a>(arena: &'a Bump, target: &'a Expr<'a>, indices: &[&'a Expr<'a>]) -> &'a Expr<'a> {
    let indices = exprs(arena, indices);
    let node = arena.alloc(IndexExpr {
        target,
        indices,
        span: Span::default(),
    });
    arena.alloc(Expr::Index(node))
}

pub fn append<'a>(arena: &'a Bump, target: &'a Expr<'a>, values: &[&'a Expr<'a>]) -> &'a Expr<'a> {
    let values = exprs(arena, values);
    let node = arena.alloc(AppendExpr {
        target,
        values,
        span: Span::default(),
    });
    arena.alloc(Expr::Append(node))
}

pub fn lambda<'a>(arena: &'a Bump, params: &[Param<'a>], body: &[Stmt<'a>]) -> &'a Expr<'a> {
    let node = arena.alloc(LambdaExpr {
        params: arena.alloc_slice_copy(params),
        body: arena.alloc_slice_copy(body),
        span: Span::default(),
    });
    arena.alloc(Expr::Lambda(node))
}

pub fn match_expr<'a>(arena: &'a Bump, pattern: &'a str, argument: &'a Expr<'a>) -> &'a Expr<'a> {
    let node = arena.alloc(MatchExpr {
        pattern: Ident::new(pattern, Span::default()),
        argument,
        span: Span::default(),
    });
    arena.alloc(Expr::Match(node))
}

pub fn len<'a>(arena: &'a Bump, value: &'a Expr<'a>) -> &'a Expr<'a> {
    let node = arena.alloc(LenExpr {
        value,
        span: Span::default(),
    });
    arena.alloc(Expr::Len(node))
}

pub fn chop<'a>(arena: &'a Bump, value: &'a Expr<'a>) -> &'a Expr<'a> {
    let node = arena.alloc(ChopExpr {
        value,
        span: Span::default(),
    });
    arena.alloc(Expr::Chop(node))
}

pub fn chomp<'a>(arena: &'a Bump, value: &'a Expr<'a>) -> &'a Expr<'a> {
    let node = arena.alloc(ChompExpr {
        value,
        span: Span::default(),
    });
    arena.alloc(Expr::Chomp(node))
}

pub fn assign<'a>(arena: &'a Bump, name: &'a str, value: &'a Expr<'a>) -> Stmt<'a> {
    let node = arena.alloc(AssignStmt {
        target: Ident::new(name, Span::default()),
        index: None,
        op: AssignOp::Assign,
        value,
        span: Span::default(),
    });
    Stmt::Assign(node)
}

pub fn assign_op<'a>(
    arena: &'a Bump,
    name: &'a str,
    op: AssignOp,
    value: &'a Expr<'a>,
) -> Stmt<'a> {
    let node = arena.alloc(AssignStmt {
        target: Ident::new(name, Span::default()),
        index: None,
        op,
        value,
        span: Span::default(),
    });
    Stmt::Assign(node)
}

pub fn assign_element<'a>(
    arena: &'a Bump,
    name: &'a str,
    index: &'a Expr<'a>,
    value: &'a Expr<'a>,
) -> Stmt<'a> {
    let node = arena.alloc(AssignStmt {
        target: Ident::new(name, Span::default()),
        index: Some(index),
        op: AssignOp::Assign,
        value,
        span: Span::default(),
    });
    Stmt::Assign(node)
}

pub fn ret<'a>(arena: &'a Bump, value: Option<&'a Expr<'a>>) -> Stmt<'a> {
    let node = arena.alloc(ReturnStmt {
        value,
        span: Span::default(),
    });
    Stmt::Return(node)
}

pub fn put<'a>(arena: &'a Bump, value: &'a Expr<'a>) -> Stmt<'a> {
    let node = arena.alloc(PutStmt {
        value,
        span: Span::default(),
    });
    Stmt::Put(node)
}

pub fn push_stmt<'a>(arena: &'a Bump, target: &'a Expr<'a>, value: &'a Expr<'a>) -> Stmt<'a> {
    let node = arena.alloc(PushStmt {
        target,
        value,
        span: Span::default(),
    });
    Stmt::Push(node)
}

pub fn expr_stmt<'a>(arena: &'a Bump, expr: &'a Expr<'a>) -> Stmt<'a> {
    let node = arena.alloc(ExprStmt {
        expr,
        span: Span::default(),
    });
    Stmt::Expr(node)
}

pub fn if_stmt<'a>(
    arena: &'a Bump,
    conditions: &[&'a Expr<'a>],
    then_body: &[Stmt<'a>],
    else_body: &[Stmt<'a>],
) -> Stmt<'a> {
    let node = arena.alloc(IfStmt {
        conditions: exprs(arena, conditions),
        then_body: arena.alloc_slice_copy(then_body),
        else_body: arena.alloc_slice_copy(else_body),
        span: Span::default(),
    });
    Stmt::If(node)
}

pub fn loop_stmt<'a>(arena: &'a Bump, body: &[Stmt<'a>]) -> Stmt<'a> {
    let node = arena.alloc(LoopStmt {
        body: arena.alloc_slice_copy(body),
        span: Span::default(),
    });
    Stmt::Loop(node)
}

pub fn break_stmt<'a>(arena: &'a Bump, conditions: &[&'a Expr<'a>]) -> Stmt<'a> {
    let node = arena.alloc(BreakStmt {
        conditions: exprs(arena, conditions),
        span: Span::default(),
    });
    Stmt::Break(node)
}

pub fn next_stmt<'a>(arena: &'a Bump, conditions: &[&'a Expr<'a>]) -> Stmt<'a> {
    let node = arena.alloc(NextStmt {
        conditions: exprs(arena, conditions),
        span: Span::default(),
    });
    Stmt::Next(node)
}

pub fn for_over_ident<'a>(
    arena: &'a Bump,
    iterator: &'a str,
    range: &'a str,
    body: &[Stmt<'a>],
) -> Stmt<'a> {
    let node = arena.alloc(ForStmt {
        iterator: Ident::new(iterator, Span::default()),
        range: Range::Ident(Ident::new(range, Span::default())),
        body: arena.alloc_slice_copy(body),
        span: Span::default(),
    });
    Stmt::For(node)
}

pub fn for_bounded<'a>(
    arena: &'a Bump,
    iterator: &'a str,
    start: &'a Expr<'a>,
    end: &'a Expr<'a>,
    body: &[Stmt<'a>],
) -> Stmt<'a> {
    let bounded = arena.alloc(BoundedRange {
        start,
        end,
        span: Span::default(),
    });
    let node = arena.alloc(ForStmt {
        iterator: Ident::new(iterator, Span::default()),
        range: Range::Bounded(bounded),
        body: arena.alloc_slice_copy(body),
        span: Span::default(),
    });
    Stmt::For(node)
}

pub fn param<'a>(name: &'a str) -> Param<'a> {
    Param {
        name: Ident::new(name, Span::default()),
        default: None,
    }
}

pub fn param_default<'a>(name: &'a str, default: &'a Expr<'a>) -> Param<'a> {
    Param {
        name: Ident::new(name, Span::default()),
        default: Some(default),
    }
}

pub fn function<'a>(
    arena: &'a Bump,
    name: &'a str,
    params: &[Param<'a>],
    body: &[Stmt<'a>],
) -> FunctionDecl<'a> {
    FunctionDecl {
        name: Ident::new(name, Span::default()),
        params: arena.alloc_slice_copy(params),
        body: arena.alloc_slice_copy(body),
        span: Span::default(),
    }
}

pub fn pattern<'a>(
    arena: &'a Bump,
    name: &'a str,
    target: &'a str,
    arms: &[(&'a Expr<'a>, &'a Expr<'a>)],
) -> PatternDecl<'a> {
    let arms = arena.alloc_slice_fill_iter(arms.iter().map(|(guard, value)| PatternArm {
        guard: *guard,
        value: *value,
    }));
    PatternDecl {
        name: Ident::new(name, Span::default()),
        target: Ident::new(target, Span::default()),
        arms,
        span: Span::default(),
    }
}

pub fn program<'a>(
    arena: &'a Bump,
    functions: &[FunctionDecl<'a>],
    patterns: &[PatternDecl<'a>],
    main_body: &[Stmt<'a>],
) -> Program<'a> {
    Program {
        functions: arena.alloc_slice_copy(functions),
        patterns: arena.alloc_slice_copy(patterns),
        main: MainDecl {
            body: arena.alloc_slice_copy(main_body),
            span: Span::default(),
        },
        span: Span::default(),
    }
}
