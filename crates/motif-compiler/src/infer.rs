//! Call-site-driven type inference.
//!
//! The engine walks an un-typed AST starting from `main` and derives every
//! function's and pattern's signature on demand: inferring a call first
//! types the arguments at the call site, writes them into the callee's
//! current instantiation, then re-walks the callee's whole body under those
//! bindings to produce its return type. Every call site repeats this, so a
//! declaration's recorded signature always reflects the call inferred most
//! recently (last-call-wins). Termination relies on the upstream dependency
//! analysis proving the call graph acyclic; an in-progress marker per
//! declaration turns a violation of that contract into a diagnostic instead
//! of unbounded recursion.
//!
//! Errors are recorded into a diagnostic list and inference continues with a
//! substituted [`Type::NoType`]; nothing here aborts a traversal.

use motif_ast::{
    AssignOp, CallExpr, Expr, FunctionDecl, LambdaExpr, MatchExpr, PatternDecl, Program, Range,
    Span, Stmt, UnaryOp,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::env::TypeEnv;
use crate::error::CompileError;
use crate::types::Type;

// ============================================================================
// Registry entries
// ============================================================================

/// A registered function and its current instantiation.
///
/// `arg_types` and `return_type` are overwritten by every inferred call
/// site; they are only meaningful after the body has been walked at least
/// once.
#[derive(Debug)]
pub struct FunctionEntry<'ast> {
    /// The declaration (immutable).
    pub decl: &'ast FunctionDecl<'ast>,
    /// Argument types from the most recently inferred call site.
    pub arg_types: Vec<Type>,
    /// Return type derived from the most recent body walk.
    pub return_type: Option<Type>,
    /// Set while the body is being walked; guards against re-entry.
    in_progress: bool,
}

/// The signature one call site was inferred with.
///
/// Analysis records one of these per call and match node; emission reads
/// them back immutably, so every emitted invocation gets argument and
/// return descriptors from the same instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    /// Full argument-type vector (supplied plus resolved trailing defaults);
    /// for a pattern dispatch, the single target type.
    pub arg_types: Vec<Type>,
    /// Return type derived for this site.
    pub return_type: Type,
}

/// A registered pattern and its current instantiation.
#[derive(Debug)]
pub struct PatternEntry<'ast> {
    /// The declaration (immutable).
    pub decl: &'ast PatternDecl<'ast>,
    /// Target-variable type from the most recently inferred match.
    pub target_type: Type,
    /// Return type derived from the most recent body walk.
    pub return_type: Option<Type>,
    /// Set while the body is being walked; guards against re-entry.
    in_progress: bool,
}

// ============================================================================
// TypeInference
// ============================================================================

/// The type inference engine.
///
/// Owns the variable environment, the function/pattern registries with their
/// mutable instantiations, the reachability record, the per-call-site
/// signatures, and the diagnostic list. The same instance serves both passes
/// of a compilation: analysis mutates it, emission reads it back through
/// [`TypeInference::call_signature`], [`TypeInference::match_signature`],
/// and [`TypeInference::type_of`] without touching the recorded state.
pub struct TypeInference<'ast> {
    functions: FxHashMap<String, FunctionEntry<'ast>>,
    patterns: FxHashMap<String, PatternEntry<'ast>>,

    /// Functions reached from `main`, in first-visit order.
    reachable_functions: Vec<String>,
    reached_functions: FxHashSet<String>,
    /// Patterns reached from `main`, in first-visit order.
    reachable_patterns: Vec<String>,
    reached_patterns: FxHashSet<String>,

    diagnostics: Vec<CompileError>,
    env: TypeEnv,

    /// Per-site signatures keyed by call-node identity (arena addresses are
    /// stable for the whole compilation). A node walked more than once keeps
    /// the most recent derivation, which is the one the enclosing body's
    /// final instantiation produced.
    call_signatures: FxHashMap<usize, CallSignature>,
    /// Per-site signatures for pattern dispatch, keyed like `call_signatures`.
    match_signatures: FxHashMap<usize, CallSignature>,

    /// One set per function/pattern/lambda body currently being walked;
    /// `return <expr>` statements insert into the innermost set.
    return_sets: Vec<FxHashSet<Type>>,
}

fn call_key(call: &CallExpr<'_>) -> usize {
    call as *const CallExpr<'_> as usize
}

fn match_key(match_expr: &MatchExpr<'_>) -> usize {
    match_expr as *const MatchExpr<'_> as usize
}

impl<'ast> TypeInference<'ast> {
    /// Create an engine with every declaration of `program` registered.
    ///
    /// On duplicate names the first declaration wins, mirroring the upstream
    /// registration order (duplicates are already a name-resolution error).
    pub fn new(program: &Program<'ast>) -> Self {
        let mut functions = FxHashMap::default();
        for decl in program.functions {
            functions
                .entry(decl.name.name.to_string())
                .or_insert_with(|| FunctionEntry {
                    decl,
                    arg_types: Vec::new(),
                    return_type: None,
                    in_progress: false,
                });
        }
        let mut patterns = FxHashMap::default();
        for decl in program.patterns {
            patterns
                .entry(decl.name.name.to_string())
                .or_insert_with(|| PatternEntry {
                    decl,
                    target_type: Type::NoType,
                    return_type: None,
                    in_progress: false,
                });
        }
        Self {
            functions,
            patterns,
            reachable_functions: Vec::new(),
            reached_functions: FxHashSet::default(),
            reachable_patterns: Vec::new(),
            reached_patterns: FxHashSet::default(),
            diagnostics: Vec::new(),
            env: TypeEnv::new(),
            call_signatures: FxHashMap::default(),
            match_signatures: FxHashMap::default(),
            return_sets: Vec::new(),
        }
    }

    /// Type-check the whole program, walking `main` and everything it
    /// reaches.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check_program(&mut self, program: &Program<'ast>) {
        self.return_sets.push(FxHashSet::default());
        for stmt in program.main.body {
            self.infer_stmt(stmt);
        }
        self.return_sets.pop();
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Diagnostics recorded so far, in detection order.
    pub fn diagnostics(&self) -> &[CompileError] {
        &self.diagnostics
    }

    /// Whether any diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Take the diagnostic list, leaving it empty.
    pub fn take_diagnostics(&mut self) -> Vec<CompileError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// The variable environment (shared with the emission pass).
    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    /// Mutable access to the variable environment.
    pub fn env_mut(&mut self) -> &mut TypeEnv {
        &mut self.env
    }

    /// The registered function entry for `name`.
    pub fn function(&self, name: &str) -> Option<&FunctionEntry<'ast>> {
        self.functions.get(name)
    }

    /// The registered pattern entry for `name`.
    pub fn pattern(&self, name: &str) -> Option<&PatternEntry<'ast>> {
        self.patterns.get(name)
    }

    /// Functions reached from `main`, in first-visit order.
    pub fn reachable_functions(&self) -> &[String] {
        &self.reachable_functions
    }

    /// Patterns reached from `main`, in first-visit order.
    pub fn reachable_patterns(&self) -> &[String] {
        &self.reachable_patterns
    }

    /// The signature a call node was inferred with, if analysis reached it.
    pub fn call_signature(&self, call: &CallExpr<'_>) -> Option<&CallSignature> {
        self.call_signatures.get(&call_key(call))
    }

    /// The signature a match node was inferred with, if analysis reached it.
    pub fn match_signature(&self, match_expr: &MatchExpr<'_>) -> Option<&CallSignature> {
        self.match_signatures.get(&match_key(match_expr))
    }

    /// The static type of an expression, computed without inferring;
    /// no diagnostics, no signature overwrites, no reachability changes.
    ///
    /// Call and match nodes read the signatures recorded by analysis, so
    /// this is only meaningful on expressions the analysis pass walked.
    /// Emission uses it where it must know a type before (or without)
    /// emitting the expression.
    pub fn type_of(&self, expr: &Expr<'_>) -> Type {
        match *expr {
            Expr::Int(_) => Type::Int,
            Expr::Float(_) => Type::Float,
            Expr::Bool(_) => Type::Bool,
            Expr::Str(_) => Type::String,
            Expr::List(list) => match list.elements.first() {
                Some(first) => Type::list(self.type_of(first)),
                None => Type::list(Type::NoType),
            },
            Expr::Ident(ident) => self.env.get(ident.name).cloned().unwrap_or(Type::NoType),
            Expr::FnPtr(fptr) => Type::Fptr(fptr.target.name.to_string()),
            Expr::Binary(binary) => {
                if binary.op.is_arithmetic() {
                    self.type_of(binary.left)
                } else {
                    Type::Bool
                }
            }
            Expr::Unary(unary) => self.type_of(unary.operand),
            Expr::Call(call) => self
                .call_signature(call)
                .map(|signature| signature.return_type.clone())
                .unwrap_or(Type::NoType),
            Expr::Index(index) => {
                let mut ty = self.type_of(index.target);
                for _ in index.indices {
                    ty = match ty {
                        Type::String => Type::String,
                        Type::List(elem) => *elem,
                        _ => Type::NoType,
                    };
                }
                ty
            }
            Expr::Append(append) => self.type_of(append.target),
            Expr::Lambda(_) => Type::NoType,
            Expr::Match(match_expr) => self
                .match_signature(match_expr)
                .map(|signature| signature.return_type.clone())
                .unwrap_or(Type::NoType),
            Expr::Len(_) => Type::Int,
            Expr::Chop(_) | Expr::Chomp(_) => Type::String,
        }
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// Infer a statement for its effects on the environment, the return
    /// sets, and the diagnostic list.
    pub fn infer_stmt(&mut self, stmt: &'ast Stmt<'ast>) {
        match *stmt {
            Stmt::Assign(assign) => {
                if let Some(index) = assign.index {
                    let index_ty = self.infer_expr(index);
                    if !index_ty.matches(&Type::Int) {
                        self.error(CompileError::IndexNotInt { span: assign.span });
                        return;
                    }
                    self.infer_expr(assign.value);
                } else {
                    let value_ty = self.infer_expr(assign.value);
                    if assign.op == AssignOp::Assign {
                        self.env.assign(assign.target.name, value_ty);
                    }
                }
            }
            Stmt::If(if_stmt) => {
                self.env.push_snapshot();
                for cond in if_stmt.conditions {
                    self.check_condition(cond);
                }
                for s in if_stmt.then_body {
                    self.infer_stmt(s);
                }
                for s in if_stmt.else_body {
                    self.infer_stmt(s);
                }
                self.env.pop();
            }
            Stmt::Loop(loop_stmt) => {
                self.env.push_snapshot();
                for s in loop_stmt.body {
                    self.infer_stmt(s);
                }
                self.env.pop();
            }
            Stmt::For(for_stmt) => {
                let range_ty = self.infer_range(for_stmt.range);
                let elem = match range_ty {
                    Type::List(elem) => *elem,
                    _ => return,
                };
                self.env.push_snapshot();
                self.env.assign(for_stmt.iterator.name, elem);
                for s in for_stmt.body {
                    self.infer_stmt(s);
                }
                self.env.pop();
            }
            Stmt::Return(ret) => {
                if let Some(value) = ret.value {
                    let ty = self.infer_expr(value);
                    if let Some(set) = self.return_sets.last_mut() {
                        set.insert(ty);
                    }
                }
            }
            Stmt::Put(put) => {
                self.infer_expr(put.value);
            }
            Stmt::Push(push) => self.infer_push(push.target, push.value, push.span),
            Stmt::Break(brk) => {
                for cond in brk.conditions {
                    self.check_condition(cond);
                }
            }
            Stmt::Next(next) => {
                for cond in next.conditions {
                    self.check_condition(cond);
                }
            }
            Stmt::Expr(expr_stmt) => {
                self.infer_expr(expr_stmt.expr);
            }
        }
    }

    fn check_condition(&mut self, cond: &'ast Expr<'ast>) {
        if !self.infer_expr(cond).matches(&Type::Bool) {
            self.error(CompileError::ConditionNotBool { span: cond.span() });
        }
    }

    fn infer_push(&mut self, target: &'ast Expr<'ast>, value: &'ast Expr<'ast>, span: Span) {
        let target_ty = self.infer_expr(target);
        let value_ty = self.infer_expr(value);
        match target_ty {
            Type::String => {
                if !value_ty.matches(&Type::String) {
                    self.error(CompileError::PushArgumentTypeMismatch { span });
                }
            }
            Type::List(elem) => {
                if *elem == Type::NoType {
                    // First push into an empty list resolves the variable's
                    // element type retroactively.
                    if let Expr::Ident(ident) = *target {
                        self.env.assign(ident.name, Type::list(value_ty));
                    }
                } else if !elem.matches(&value_ty) {
                    self.error(CompileError::PushArgumentTypeMismatch { span });
                }
            }
            Type::NoType => {}
            _ => self.error(CompileError::NotPushable { span }),
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Infer an expression's type, recording diagnostics as a side effect.
    ///
    /// Never fails: error positions yield [`Type::NoType`].
    pub fn infer_expr(&mut self, expr: &'ast Expr<'ast>) -> Type {
        match *expr {
            Expr::Int(_) => Type::Int,
            Expr::Float(_) => Type::Float,
            Expr::Bool(_) => Type::Bool,
            Expr::Str(_) => Type::String,
            Expr::List(list) => {
                if list.elements.is_empty() {
                    return Type::list(Type::NoType);
                }
                self.infer_list_elements(list.elements, list.span)
            }
            Expr::Ident(ident) => self.env.get(ident.name).cloned().unwrap_or(Type::NoType),
            Expr::FnPtr(fptr) => Type::Fptr(fptr.target.name.to_string()),
            Expr::Binary(binary) => {
                let lhs = self.infer_expr(binary.left);
                let rhs = self.infer_expr(binary.right);
                if !lhs.matches(&rhs) {
                    self.error(CompileError::NonSameOperands {
                        op: binary.op.to_string(),
                        span: binary.span,
                    });
                    return Type::NoType;
                }
                if binary.op.is_arithmetic() {
                    for ty in [&lhs, &rhs] {
                        if !ty.matches(&Type::Int) && !ty.matches(&Type::Float) {
                            self.error(CompileError::UnsupportedOperandType {
                                op: binary.op.to_string(),
                                span: binary.span,
                            });
                            return Type::NoType;
                        }
                    }
                    lhs
                } else {
                    Type::Bool
                }
            }
            Expr::Unary(unary) => {
                let operand = self.infer_expr(unary.operand);
                let supported = match unary.op {
                    UnaryOp::Not => operand.matches(&Type::Bool),
                    _ => operand.matches(&Type::Int) || operand.matches(&Type::Float),
                };
                if !supported {
                    self.error(CompileError::UnsupportedOperandType {
                        op: unary.op.to_string(),
                        span: unary.span,
                    });
                    return Type::NoType;
                }
                operand
            }
            Expr::Call(call) => self.infer_call(call),
            Expr::Index(index) => {
                let mut ty = self.infer_expr(index.target);
                if !matches!(ty, Type::String | Type::List(_)) {
                    if !matches!(ty, Type::NoType) {
                        self.error(CompileError::NotIndexable { span: index.span });
                    }
                    return Type::NoType;
                }
                for idx in index.indices {
                    if !self.infer_expr(idx).matches(&Type::Int) {
                        self.error(CompileError::IndexNotInt { span: index.span });
                    }
                }
                for _ in index.indices {
                    ty = match ty {
                        Type::String => Type::String,
                        Type::List(elem) => *elem,
                        _ => Type::NoType,
                    };
                }
                ty
            }
            Expr::Append(append) => {
                let target_ty = self.infer_expr(append.target);
                match target_ty {
                    Type::String | Type::List(_) => target_ty,
                    Type::NoType => Type::NoType,
                    _ => {
                        self.error(CompileError::NotAppendable { span: append.span });
                        Type::NoType
                    }
                }
            }
            // A lambda only has a type at a direct call site; as a value it
            // stays untyped.
            Expr::Lambda(_) => Type::NoType,
            Expr::Match(match_expr) => self.infer_match(match_expr),
            Expr::Len(len) => {
                let ty = self.infer_expr(len.value);
                if !matches!(ty, Type::String | Type::List(_) | Type::NoType) {
                    self.error(CompileError::LenArgumentTypeMismatch { span: len.span });
                }
                Type::Int
            }
            Expr::Chop(chop) => {
                self.infer_expr(chop.value);
                Type::String
            }
            Expr::Chomp(chomp) => {
                let ty = self.infer_expr(chomp.value);
                if !ty.matches(&Type::String) {
                    self.error(CompileError::ChompArgumentTypeMismatch { span: chomp.span });
                    return Type::NoType;
                }
                Type::String
            }
        }
    }

    fn infer_list_elements(&mut self, elements: &'ast [Expr<'ast>], span: Span) -> Type {
        let base = match elements.first() {
            Some(first) => self.infer_expr(first),
            None => return Type::list(Type::NoType),
        };
        for elem in elements {
            let ty = self.infer_expr(elem);
            if !base.matches(&ty) {
                self.error(CompileError::ListElementTypeMismatch { span });
                return Type::NoType;
            }
        }
        Type::list(base)
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn infer_call(&mut self, call: &'ast CallExpr<'ast>) -> Type {
        match *call.callee {
            Expr::Ident(ident) => {
                if self.functions.contains_key(ident.name) {
                    return self.infer_named_call(ident.name, call);
                }
                // Not a function name: a variable holding a function pointer
                // dispatches to its carried target.
                match self.env.get(ident.name).cloned() {
                    Some(Type::Fptr(target)) => self.infer_named_call(&target, call),
                    Some(other) => other,
                    None => Type::NoType,
                }
            }
            Expr::Lambda(lambda) => self.infer_lambda_call(lambda, call),
            _ => Type::NoType,
        }
    }

    /// Infer a call to a named function: type the arguments, overwrite the
    /// callee's current instantiation, and re-walk its body.
    fn infer_named_call(&mut self, name: &str, call: &'ast CallExpr<'ast>) -> Type {
        let mut arg_types = Vec::with_capacity(call.args.len());
        for arg in call.args {
            arg_types.push(self.infer_expr(arg));
        }

        let (decl, in_progress) = match self.functions.get(name) {
            Some(entry) => (entry.decl, entry.in_progress),
            None => return Type::NoType,
        };
        if in_progress {
            self.error(CompileError::CircularDependency {
                name: name.to_string(),
                span: call.span,
            });
            return Type::NoType;
        }

        let declared = decl.params.len();
        let defaults = decl.default_count();
        if call.args.len() > declared || call.args.len() + defaults < declared {
            self.error(CompileError::ArgumentCountMismatch {
                name: name.to_string(),
                span: call.span,
            });
            return Type::NoType;
        }

        if let Some(entry) = self.functions.get_mut(name) {
            entry.arg_types = arg_types.clone();
            entry.in_progress = true;
        }
        if self.reached_functions.insert(name.to_string()) {
            self.reachable_functions.push(name.to_string());
        }

        let (return_type, bound_types) = self.infer_function_body(decl, &arg_types);

        self.call_signatures.insert(
            call_key(call),
            CallSignature {
                arg_types: bound_types.clone(),
                return_type: return_type.clone(),
            },
        );
        if let Some(entry) = self.functions.get_mut(name) {
            // The recorded instantiation covers every parameter, with
            // trailing defaults resolved, so emission can sign the method
            // and fill missing arguments at call sites.
            entry.arg_types = bound_types;
            entry.return_type = Some(return_type.clone());
            entry.in_progress = false;
        }
        return_type
    }

    /// Walk a function body under the given argument types and unify its
    /// return statements into one return type.
    ///
    /// Returns the derived return type and the full parameter-type vector
    /// (supplied arguments plus resolved trailing defaults).
    fn infer_function_body(
        &mut self,
        decl: &'ast FunctionDecl<'ast>,
        arg_types: &[Type],
    ) -> (Type, Vec<Type>) {
        self.env.push_fresh();
        let mut bound_types = Vec::with_capacity(decl.params.len());
        for (i, param) in decl.params.iter().enumerate() {
            let ty = if let Some(arg_ty) = arg_types.get(i) {
                arg_ty.clone()
            } else if let Some(default) = param.default {
                self.infer_expr(default)
            } else {
                Type::NoType
            };
            self.env.assign(param.name.name, ty.clone());
            bound_types.push(ty);
        }

        self.return_sets.push(FxHashSet::default());
        for stmt in decl.body {
            self.infer_stmt(stmt);
        }
        let returns = self.return_sets.pop().unwrap_or_default();
        self.env.pop();

        if returns.len() > 1 {
            self.error(CompileError::FunctionIncompatibleReturnTypes {
                name: decl.name.name.to_string(),
                span: decl.span,
            });
            return (Type::NoType, bound_types);
        }
        let return_type = returns.into_iter().next().unwrap_or(Type::NoType);
        (return_type, bound_types)
    }

    /// Infer a directly invoked lambda like a call to an anonymous function.
    ///
    /// Unlike named functions the body sees the enclosing scope, so the
    /// parameters are bound in a snapshot of it.
    fn infer_lambda_call(&mut self, lambda: &'ast LambdaExpr<'ast>, call: &'ast CallExpr<'ast>) -> Type {
        let mut arg_types = Vec::with_capacity(call.args.len());
        for arg in call.args {
            arg_types.push(self.infer_expr(arg));
        }

        let declared = lambda.params.len();
        let defaults = lambda
            .params
            .iter()
            .filter(|p| p.default.is_some())
            .count();
        if call.args.len() > declared || call.args.len() + defaults < declared {
            self.error(CompileError::ArgumentCountMismatch {
                name: "lambda".to_string(),
                span: call.span,
            });
            return Type::NoType;
        }

        self.env.push_snapshot();
        let mut bound_types = Vec::with_capacity(lambda.params.len());
        for (i, param) in lambda.params.iter().enumerate() {
            let ty = if let Some(arg_ty) = arg_types.get(i) {
                arg_ty.clone()
            } else if let Some(default) = param.default {
                self.infer_expr(default)
            } else {
                Type::NoType
            };
            self.env.assign(param.name.name, ty.clone());
            bound_types.push(ty);
        }

        self.return_sets.push(FxHashSet::default());
        for stmt in lambda.body {
            self.infer_stmt(stmt);
        }
        let returns = self.return_sets.pop().unwrap_or_default();
        self.env.pop();

        let return_type = if returns.len() > 1 {
            self.error(CompileError::FunctionIncompatibleReturnTypes {
                name: "lambda".to_string(),
                span: lambda.span,
            });
            Type::NoType
        } else {
            returns.into_iter().next().unwrap_or(Type::NoType)
        };
        self.call_signatures.insert(
            call_key(call),
            CallSignature {
                arg_types: bound_types,
                return_type: return_type.clone(),
            },
        );
        return_type
    }

    // ==========================================================================
    // Patterns
    // ==========================================================================

    /// Infer a pattern dispatch: bind the target variable to the argument's
    /// type and re-walk the pattern's arms, like a single-parameter call.
    fn infer_match(&mut self, match_expr: &'ast MatchExpr<'ast>) -> Type {
        let arg_ty = self.infer_expr(match_expr.argument);

        let name = match_expr.pattern.name;
        let (decl, in_progress) = match self.patterns.get(name) {
            Some(entry) => (entry.decl, entry.in_progress),
            None => return Type::NoType,
        };
        if in_progress {
            self.error(CompileError::CircularDependency {
                name: name.to_string(),
                span: match_expr.span,
            });
            return Type::NoType;
        }

        if let Some(entry) = self.patterns.get_mut(name) {
            entry.target_type = arg_ty.clone();
            entry.in_progress = true;
        }
        if self.reached_patterns.insert(name.to_string()) {
            self.reachable_patterns.push(name.to_string());
        }

        let return_type = self.infer_pattern_body(decl, arg_ty.clone());

        self.match_signatures.insert(
            match_key(match_expr),
            CallSignature {
                arg_types: vec![arg_ty],
                return_type: return_type.clone(),
            },
        );
        if let Some(entry) = self.patterns.get_mut(name) {
            entry.return_type = Some(return_type.clone());
            entry.in_progress = false;
        }
        return_type
    }

    fn infer_pattern_body(&mut self, decl: &'ast PatternDecl<'ast>, target_ty: Type) -> Type {
        self.env.push_fresh();
        self.env.assign(decl.target.name, target_ty);

        // All guards are checked before any arm value; a non-boolean guard
        // abandons the walk.
        for arm in decl.arms {
            if !self.infer_expr(arm.guard).matches(&Type::Bool) {
                self.error(CompileError::ConditionNotBool {
                    span: arm.guard.span(),
                });
                self.env.pop();
                return Type::NoType;
            }
        }

        let mut returns: FxHashSet<Type> = FxHashSet::default();
        for arm in decl.arms {
            let ty = self.infer_expr(arm.value);
            returns.insert(ty);
        }
        self.env.pop();

        if returns.len() > 1 {
            self.error(CompileError::PatternIncompatibleReturnTypes {
                name: decl.name.name.to_string(),
                span: decl.span,
            });
            return Type::NoType;
        }
        returns.into_iter().next().unwrap_or(Type::NoType)
    }

    // ==========================================================================
    // Ranges
    // ==========================================================================

    /// Infer a for-loop range. Always yields a `List` type or `NoType`.
    fn infer_range(&mut self, range: Range<'ast>) -> Type {
        match range {
            Range::List(list) => {
                if list.elements.is_empty() {
                    return Type::NoType;
                }
                self.infer_list_elements(list.elements, list.span)
            }
            Range::Ident(ident) => match self.env.get(ident.name).cloned() {
                Some(ty @ Type::List(_)) => ty,
                Some(Type::NoType) | None => Type::NoType,
                Some(_) => {
                    self.error(CompileError::NotIterable { span: ident.span });
                    Type::NoType
                }
            },
            Range::Bounded(bounded) => {
                let start = self.infer_expr(bounded.start);
                let end = self.infer_expr(bounded.end);
                if !start.matches(&Type::Int) || !end.matches(&Type::Int) {
                    return Type::NoType;
                }
                Type::list(Type::Int)
            }
        }
    }

    fn error(&mut self, error: CompileError) {
        self.diagnostics.push(error);
    }
}
