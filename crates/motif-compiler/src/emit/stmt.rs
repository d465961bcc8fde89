//! Statement emission.

use motif_ast::{AssignOp, AssignStmt, BoundedRange, Expr, ForStmt, IfStmt, Range, Stmt};

use super::{CodeGenerator, box_instruction, class_name, store_instruction, unbox_instruction};
use crate::types::Type;

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    /// Emit one statement.
    pub(crate) fn emit_stmt(&mut self, stmt: &'ast Stmt<'ast>) {
        match *stmt {
            Stmt::Assign(assign) => self.emit_assign(assign),
            Stmt::If(if_stmt) => self.emit_if(if_stmt),
            Stmt::Loop(loop_stmt) => {
                let start = self.labels.fresh();
                let end = self.labels.fresh();
                self.loop_starts.push(start.clone());
                self.loop_ends.push(end.clone());

                self.push_label(&start);
                self.types.env_mut().push_snapshot();
                for s in loop_stmt.body {
                    self.emit_stmt(s);
                }
                self.types.env_mut().pop();
                self.push(format!("goto {start}"));
                self.push_label(&end);

                self.loop_starts.pop();
                self.loop_ends.pop();
            }
            Stmt::For(for_stmt) => self.emit_for(for_stmt),
            Stmt::Return(ret) => {
                // Inside an inlined lambda body a return jumps to the
                // lambda's exit label instead of leaving the method.
                if let Some(exit) = self.lambda_exits.last().cloned() {
                    if let Some(value) = ret.value {
                        if self.types.type_of(value) != Type::NoType {
                            self.emit_expr(value);
                        }
                    }
                    self.push(format!("goto {exit}"));
                    return;
                }
                match ret.value {
                    None => self.push("return"),
                    Some(value) => {
                        let ty = self.types.type_of(value);
                        if ty == Type::NoType {
                            self.push("return");
                        } else {
                            self.emit_expr(value);
                            self.push(super::return_instruction(&ty));
                        }
                    }
                }
            }
            Stmt::Put(put) => {
                self.push("getstatic java/lang/System/out Ljava/io/PrintStream;");
                let ty = self.emit_expr(put.value);
                let call = match ty {
                    Type::Int | Type::Bool => "invokevirtual java/io/PrintStream/println(I)V",
                    Type::Float => "invokevirtual java/io/PrintStream/println(F)V",
                    Type::String => {
                        "invokevirtual java/io/PrintStream/println(Ljava/lang/String;)V"
                    }
                    _ => "invokevirtual java/io/PrintStream/println(Ljava/lang/Object;)V",
                };
                self.push(call);
            }
            Stmt::Push(push) => {
                let target_ty = self.emit_expr(push.target);
                let value_ty = self.emit_expr(push.value);
                match target_ty {
                    Type::List(ref elem) => {
                        if let Some(boxing) = box_instruction(&value_ty) {
                            self.push(boxing);
                        }
                        self.push("invokevirtual java/util/ArrayList/add(Ljava/lang/Object;)Z");
                        self.push("pop");
                        // First push into an empty list resolves the
                        // variable's element type, as during analysis.
                        if **elem == Type::NoType {
                            if let Expr::Ident(ident) = *push.target {
                                self.types
                                    .env_mut()
                                    .assign(ident.name, Type::list(value_ty));
                            }
                        }
                    }
                    _ => {
                        self.push(
                            "invokevirtual java/lang/String/concat(Ljava/lang/String;)Ljava/lang/String;",
                        );
                        if let Expr::Ident(ident) = *push.target {
                            let slot = self.slots.slot_of(ident.name);
                            self.push(format!("astore {slot}"));
                        } else {
                            self.push("pop");
                        }
                    }
                }
            }
            Stmt::Break(brk) => {
                let Some(end) = self.loop_ends.last().cloned() else {
                    return;
                };
                if brk.conditions.is_empty() {
                    self.push(format!("goto {end}"));
                } else {
                    let skip = self.labels.fresh();
                    for cond in brk.conditions {
                        self.emit_expr(cond);
                        self.push(format!("ifeq {skip}"));
                    }
                    self.push(format!("goto {end}"));
                    self.push_label(&skip);
                }
            }
            Stmt::Next(next) => {
                let Some(start) = self.loop_starts.last().cloned() else {
                    return;
                };
                if next.conditions.is_empty() {
                    self.push(format!("goto {start}"));
                } else {
                    let skip = self.labels.fresh();
                    for cond in next.conditions {
                        self.emit_expr(cond);
                        self.push(format!("ifeq {skip}"));
                    }
                    self.push(format!("goto {start}"));
                    self.push_label(&skip);
                }
            }
            Stmt::Expr(expr_stmt) => {
                let ty = self.emit_expr(expr_stmt.expr);
                if ty != Type::NoType {
                    self.push("pop");
                }
            }
        }
    }

    // ==========================================================================
    // Assignment
    // ==========================================================================

    fn emit_assign(&mut self, assign: &'ast AssignStmt<'ast>) {
        if let Some(index) = assign.index {
            self.emit_element_assign(assign, index);
            return;
        }

        let value_ty = self.emit_expr(assign.value);
        if assign.op == AssignOp::Assign {
            self.types
                .env_mut()
                .assign(assign.target.name, value_ty.clone());
            let slot = self.slots.slot_of(assign.target.name);
            self.push(format!("{} {}", store_instruction(&value_ty), slot));
            return;
        }

        // Compound assignment reads the variable's current binding.
        let ty = self
            .types
            .env()
            .get(assign.target.name)
            .cloned()
            .unwrap_or(value_ty);
        let is_float = ty == Type::Float;
        let slot = self.slots.slot_of(assign.target.name);
        let load = super::load_instruction(&ty);
        let store = store_instruction(&ty);
        match assign.op {
            AssignOp::AddAssign => {
                self.push(format!("{load} {slot}"));
                self.push(if is_float { "fadd" } else { "iadd" });
            }
            AssignOp::SubAssign => {
                self.push(if is_float { "fneg" } else { "ineg" });
                self.push(format!("{load} {slot}"));
                self.push(if is_float { "fadd" } else { "iadd" });
            }
            AssignOp::MulAssign => {
                self.push(format!("{load} {slot}"));
                self.push(if is_float { "fmul" } else { "imul" });
            }
            AssignOp::DivAssign => {
                self.push(format!("{load} {slot}"));
                self.push("swap");
                self.push(if is_float { "fdiv" } else { "idiv" });
            }
            AssignOp::ModAssign => {
                self.push(format!("{load} {slot}"));
                self.push("swap");
                self.push(if is_float { "frem" } else { "irem" });
            }
            AssignOp::Assign => {}
        }
        self.push(format!("{store} {slot}"));
    }

    /// Emit `xs[i] = v` and its compound forms through `ArrayList.set`.
    fn emit_element_assign(&mut self, assign: &'ast AssignStmt<'ast>, index: &'ast Expr<'ast>) {
        self.emit_ident_load(assign.target);
        self.emit_expr(index);
        if assign.op == AssignOp::Assign {
            let value_ty = self.emit_expr(assign.value);
            if let Some(boxing) = box_instruction(&value_ty) {
                self.push(boxing);
            }
        } else {
            // Read the current element, apply the integer operation, rebox.
            self.emit_ident_load(assign.target);
            self.emit_expr(index);
            self.push("invokevirtual java/util/ArrayList/get(I)Ljava/lang/Object;");
            self.push(format!("checkcast {}", class_name(&Type::Int)));
            if let Some(unboxing) = unbox_instruction(&Type::Int) {
                self.push(unboxing);
            }
            self.emit_expr(assign.value);
            match assign.op {
                AssignOp::AddAssign => self.push("iadd"),
                AssignOp::SubAssign => {
                    self.push("ineg");
                    self.push("iadd");
                }
                AssignOp::MulAssign => self.push("imul"),
                AssignOp::DivAssign => self.push("idiv"),
                AssignOp::ModAssign => self.push("irem"),
                AssignOp::Assign => {}
            }
            if let Some(boxing) = box_instruction(&Type::Int) {
                self.push(boxing);
            }
        }
        self.push(format!("checkcast {}", class_name(&Type::NoType)));
        self.push("invokevirtual java/util/ArrayList/set(ILjava/lang/Object;)Ljava/lang/Object;");
        self.push("pop");
    }

    // ==========================================================================
    // Control flow
    // ==========================================================================

    fn emit_if(&mut self, if_stmt: &'ast IfStmt<'ast>) {
        let then_label = self.labels.fresh();
        let else_label = self.labels.fresh();
        let exit_label = self.labels.fresh();

        // The condition list is a conjunction: any false condition falls
        // through to the else branch.
        for cond in if_stmt.conditions {
            self.emit_expr(cond);
            self.push(format!("ifeq {else_label}"));
        }

        self.push_label(&then_label);
        self.types.env_mut().push_snapshot();
        for s in if_stmt.then_body {
            self.emit_stmt(s);
        }
        self.types.env_mut().pop();
        self.push(format!("goto {exit_label}"));

        self.push_label(&else_label);
        if !if_stmt.else_body.is_empty() {
            self.types.env_mut().push_snapshot();
            for s in if_stmt.else_body {
                self.emit_stmt(s);
            }
            self.types.env_mut().pop();
        }
        self.push_label(&exit_label);
    }

    // ==========================================================================
    // For loops
    // ==========================================================================

    fn emit_for(&mut self, for_stmt: &'ast ForStmt<'ast>) {
        match for_stmt.range {
            Range::Bounded(bounded) => self.emit_for_bounded(for_stmt, bounded),
            Range::List(list) => {
                let elem = match self.emit_list_literal(list) {
                    Type::List(elem) => *elem,
                    _ => Type::NoType,
                };
                self.emit_for_over_list(for_stmt, elem);
            }
            Range::Ident(ident) => {
                let elem = match self.emit_ident_load(ident) {
                    Type::List(elem) => *elem,
                    _ => Type::NoType,
                };
                self.emit_for_over_list(for_stmt, elem);
            }
        }
    }

    /// Emit iteration over a list already on the stack: an index counter
    /// runs against `size()`, each element is loaded with `get`, cast, and
    /// unboxed to the element's static type.
    fn emit_for_over_list(&mut self, for_stmt: &'ast ForStmt<'ast>, elem: Type) {
        let depth = self.loop_starts.len();
        let range_slot = self.slots.slot_of(&format!("$range{depth}"));
        let index_slot = self.slots.slot_of(&format!("$index{depth}"));

        self.push(format!("astore {range_slot}"));
        self.push("ldc 0");
        self.push(format!("istore {index_slot}"));

        let cond = self.labels.fresh();
        let step = self.labels.fresh();
        let end = self.labels.fresh();
        self.loop_starts.push(step.clone());
        self.loop_ends.push(end.clone());

        self.push_label(&cond);
        self.push(format!("iload {index_slot}"));
        self.push(format!("aload {range_slot}"));
        self.push("invokevirtual java/util/ArrayList/size()I");
        self.push(format!("if_icmpge {end}"));

        self.push(format!("aload {range_slot}"));
        self.push(format!("iload {index_slot}"));
        self.push("invokevirtual java/util/ArrayList/get(I)Ljava/lang/Object;");
        self.push(format!("checkcast {}", class_name(&elem)));
        if let Some(unboxing) = unbox_instruction(&elem) {
            self.push(unboxing);
        }

        self.types.env_mut().push_snapshot();
        self.types.env_mut().assign(for_stmt.iterator.name, elem.clone());
        let iterator_slot = self.slots.slot_of(for_stmt.iterator.name);
        self.push(format!("{} {}", store_instruction(&elem), iterator_slot));

        for s in for_stmt.body {
            self.emit_stmt(s);
        }
        self.types.env_mut().pop();

        self.push_label(&step);
        self.push(format!("iload {index_slot}"));
        self.push("ldc 1");
        self.push("iadd");
        self.push(format!("istore {index_slot}"));
        self.push(format!("goto {cond}"));
        self.push_label(&end);

        self.loop_starts.pop();
        self.loop_ends.pop();
    }

    /// Emit an inclusive `start..end` loop over an unboxed `int` counter,
    /// without materializing a list.
    fn emit_for_bounded(&mut self, for_stmt: &'ast ForStmt<'ast>, bounded: &'ast BoundedRange<'ast>) {
        let depth = self.loop_starts.len();
        let end_slot = self.slots.slot_of(&format!("$end{depth}"));

        self.types.env_mut().push_snapshot();
        self.types
            .env_mut()
            .assign(for_stmt.iterator.name, Type::Int);
        let iterator_slot = self.slots.slot_of(for_stmt.iterator.name);

        self.emit_expr(bounded.start);
        self.push(format!("istore {iterator_slot}"));
        self.emit_expr(bounded.end);
        self.push(format!("istore {end_slot}"));

        let cond = self.labels.fresh();
        let step = self.labels.fresh();
        let end = self.labels.fresh();
        self.loop_starts.push(step.clone());
        self.loop_ends.push(end.clone());

        self.push_label(&cond);
        self.push(format!("iload {iterator_slot}"));
        self.push(format!("iload {end_slot}"));
        self.push(format!("if_icmpgt {end}"));

        for s in for_stmt.body {
            self.emit_stmt(s);
        }

        self.push_label(&step);
        self.push(format!("iload {iterator_slot}"));
        self.push("ldc 1");
        self.push("iadd");
        self.push(format!("istore {iterator_slot}"));
        self.push(format!("goto {cond}"));
        self.push_label(&end);

        self.loop_starts.pop();
        self.loop_ends.pop();
        self.types.env_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::TypeInference;
    use bumpalo::Bump;
    use motif_ast::{
        BoolLit, BreakStmt, IntLit, LoopStmt, MainDecl, Program, PutStmt, Span,
    };

    fn empty_program<'a>(_arena: &'a Bump) -> Program<'a> {
        Program {
            functions: &[],
            patterns: &[],
            main: MainDecl {
                body: &[],
                span: Span::default(),
            },
            span: Span::default(),
        }
    }

    #[test]
    fn loop_brackets_body_with_start_and_end_labels() {
        let arena = Bump::new();
        let program = empty_program(&arena);
        let mut types = TypeInference::new(&program);
        let mut generator = CodeGenerator::new(&mut types);

        let brk = arena.alloc(BreakStmt {
            conditions: &[],
            span: Span::default(),
        });
        let body = arena.alloc_slice_copy(&[Stmt::Break(brk)]);
        let loop_stmt = arena.alloc(LoopStmt {
            body,
            span: Span::default(),
        });
        generator.emit_stmt(arena.alloc(Stmt::Loop(loop_stmt)));

        let code = generator.code.clone();
        assert_eq!(code[0], "Label_0:");
        assert!(code.contains(&"goto Label_1".to_string())); // break
        assert!(code.contains(&"goto Label_0".to_string())); // loop back
        assert_eq!(code.last().unwrap(), "Label_1:");
    }

    #[test]
    fn break_outside_loop_emits_nothing() {
        let arena = Bump::new();
        let program = empty_program(&arena);
        let mut types = TypeInference::new(&program);
        let mut generator = CodeGenerator::new(&mut types);

        let brk = arena.alloc(BreakStmt {
            conditions: &[],
            span: Span::default(),
        });
        generator.emit_stmt(arena.alloc(Stmt::Break(brk)));
        assert!(generator.code.is_empty());
    }

    #[test]
    fn conditional_break_guards_the_jump() {
        let arena = Bump::new();
        let program = empty_program(&arena);
        let mut types = TypeInference::new(&program);
        let mut generator = CodeGenerator::new(&mut types);

        let cond = Expr::Bool(BoolLit {
            value: true,
            span: Span::default(),
        });
        let conditions = arena.alloc_slice_copy(&[cond]);
        let brk = arena.alloc(BreakStmt {
            conditions,
            span: Span::default(),
        });
        let body = arena.alloc_slice_copy(&[Stmt::Break(brk)]);
        let loop_stmt = arena.alloc(LoopStmt {
            body,
            span: Span::default(),
        });
        generator.emit_stmt(arena.alloc(Stmt::Loop(loop_stmt)));

        let code = generator.code.join("\n");
        assert!(code.contains("ldc 1\nifeq Label_2\ngoto Label_1\nLabel_2:"));
    }

    #[test]
    fn put_of_int_uses_integer_println() {
        let arena = Bump::new();
        let program = empty_program(&arena);
        let mut types = TypeInference::new(&program);
        let mut generator = CodeGenerator::new(&mut types);

        let value = arena.alloc(Expr::Int(IntLit {
            value: 7,
            span: Span::default(),
        }));
        let put = arena.alloc(PutStmt {
            value,
            span: Span::default(),
        });
        generator.emit_stmt(arena.alloc(Stmt::Put(put)));

        let code = generator.code.join("\n");
        assert!(code.contains("getstatic java/lang/System/out Ljava/io/PrintStream;"));
        assert!(code.contains("ldc 7"));
        assert!(code.contains("invokevirtual java/io/PrintStream/println(I)V"));
    }
}
