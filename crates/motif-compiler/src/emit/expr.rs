//! Expression emission.
//!
//! Every `emit_*` method returns the static type of the value it left on
//! the stack, so callers can pick instruction variants without querying the
//! inference engine mutably. Call and match sites read the per-site
//! signatures the analysis pass recorded.

use motif_ast::{
    AppendExpr, BinaryExpr, BinaryOp, CallExpr, Expr, Ident, IndexExpr, LambdaExpr, ListLit,
    MatchExpr, UnaryExpr, UnaryOp,
};

use super::{
    CodeGenerator, box_instruction, class_name, escape_string_constant, load_instruction,
    signature_descriptor, store_instruction, unbox_instruction,
};
use crate::infer::CallSignature;
use crate::types::Type;

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    /// Emit one expression, leaving its value on the stack (nothing for
    /// untyped positions such as a lambda outside a call) and returning its
    /// static type.
    pub(crate) fn emit_expr(&mut self, expr: &'ast Expr<'ast>) -> Type {
        match *expr {
            Expr::Int(lit) => {
                self.push(format!("ldc {}", lit.value));
                Type::Int
            }
            Expr::Float(lit) => {
                self.push(format!("ldc {:?}", lit.value));
                Type::Float
            }
            Expr::Bool(lit) => {
                self.push(format!("ldc {}", if lit.value { 1 } else { 0 }));
                Type::Bool
            }
            Expr::Str(lit) => {
                self.push(format!("ldc \"{}\"", escape_string_constant(lit.value)));
                Type::String
            }
            Expr::List(list) => self.emit_list_literal(list),
            Expr::Ident(ident) => self.emit_ident_load(ident),
            Expr::FnPtr(fptr) => {
                self.emit_fptr_construction(fptr.target.name);
                Type::Fptr(fptr.target.name.to_string())
            }
            Expr::Binary(binary) => self.emit_binary(binary),
            Expr::Unary(unary) => self.emit_unary(unary),
            Expr::Call(call) => self.emit_call(call),
            Expr::Index(index) => self.emit_index(index),
            Expr::Append(append) => self.emit_append(append),
            Expr::Lambda(_) => Type::NoType,
            Expr::Match(match_expr) => self.emit_match(match_expr),
            Expr::Len(len) => {
                let ty = self.emit_expr(len.value);
                let call = match ty {
                    Type::List(_) => "invokevirtual java/util/ArrayList/size()I",
                    _ => "invokevirtual java/lang/String/length()I",
                };
                self.push(call);
                Type::Int
            }
            Expr::Chop(chop) => {
                self.emit_expr(chop.value);
                self.emit_drop_last_char();
                Type::String
            }
            Expr::Chomp(chomp) => {
                // Strip the last character only when it is a newline.
                self.emit_expr(chomp.value);
                let done = self.labels.fresh();
                self.push("dup");
                self.push("ldc \"\\n\"");
                self.push("invokevirtual java/lang/String/endsWith(Ljava/lang/String;)Z");
                self.push(format!("ifeq {done}"));
                self.emit_drop_last_char();
                self.push_label(&done);
                Type::String
            }
        }
    }

    /// Emit the substring idiom replacing the string on the stack with the
    /// same string minus its final character.
    fn emit_drop_last_char(&mut self) {
        self.push("dup");
        self.push("invokevirtual java/lang/String/length()I");
        self.push("ldc -1");
        self.push("iadd");
        self.push("ldc 0");
        self.push("swap");
        self.push("invokevirtual java/lang/String/substring(II)Ljava/lang/String;");
    }

    // ==========================================================================
    // Variables and function pointers
    // ==========================================================================

    /// Load a variable. Function-pointer bindings construct a fresh pointer
    /// object instead of reading a slot.
    pub(crate) fn emit_ident_load(&mut self, ident: Ident<'ast>) -> Type {
        let ty = self
            .types
            .env()
            .get(ident.name)
            .cloned()
            .unwrap_or(Type::NoType);
        if let Type::Fptr(ref target) = ty {
            let target = target.clone();
            self.emit_fptr_construction(&target);
            return ty;
        }
        let slot = self.slots.slot_of(ident.name);
        self.push(format!("{} {}", load_instruction(&ty), slot));
        ty
    }

    /// Construct a function-pointer object carrying its target's name.
    ///
    /// The receiver is the current instance inside the constructor body and
    /// null inside static methods.
    pub(crate) fn emit_fptr_construction(&mut self, target: &str) {
        self.push("new Fptr");
        self.push("dup");
        self.push(if self.in_static_method {
            "aconst_null"
        } else {
            "aload_0"
        });
        self.push(format!("ldc \"{target}\""));
        self.push("invokespecial Fptr/<init>(Ljava/lang/Object;Ljava/lang/String;)V");
    }

    // ==========================================================================
    // Operators
    // ==========================================================================

    fn emit_binary(&mut self, binary: &'ast BinaryExpr<'ast>) -> Type {
        let operand_ty = self.emit_expr(binary.left);
        self.emit_expr(binary.right);

        if binary.op.is_arithmetic() {
            let is_float = operand_ty == Type::Float;
            let instr = match binary.op {
                BinaryOp::Add => {
                    if is_float {
                        "fadd"
                    } else {
                        "iadd"
                    }
                }
                BinaryOp::Sub => {
                    if is_float {
                        "fsub"
                    } else {
                        "isub"
                    }
                }
                BinaryOp::Mul => {
                    if is_float {
                        "fmul"
                    } else {
                        "imul"
                    }
                }
                BinaryOp::Div => {
                    if is_float {
                        "fdiv"
                    } else {
                        "idiv"
                    }
                }
                _ => return operand_ty,
            };
            self.push(instr);
            return operand_ty;
        }

        // Comparisons branch on the typed compare and materialize 0/1.
        let enter = self.labels.fresh();
        let exit = self.labels.fresh();
        let branch = match operand_ty {
            Type::Float => {
                self.push("fcmpl");
                match binary.op {
                    BinaryOp::Eq => "ifeq",
                    BinaryOp::NotEq => "ifne",
                    BinaryOp::Greater => "ifgt",
                    BinaryOp::GreaterEq => "ifge",
                    BinaryOp::Less => "iflt",
                    BinaryOp::LessEq => "ifle",
                    _ => return Type::Bool,
                }
            }
            Type::Int | Type::Bool => match binary.op {
                BinaryOp::Eq => "if_icmpeq",
                BinaryOp::NotEq => "if_icmpne",
                BinaryOp::Greater => "if_icmpgt",
                BinaryOp::GreaterEq => "if_icmpge",
                BinaryOp::Less => "if_icmplt",
                BinaryOp::LessEq => "if_icmple",
                _ => return Type::Bool,
            },
            _ => match binary.op {
                BinaryOp::Eq => "if_acmpeq",
                BinaryOp::NotEq => "if_acmpne",
                BinaryOp::Greater => "if_icmpgt",
                BinaryOp::GreaterEq => "if_icmpge",
                BinaryOp::Less => "if_icmplt",
                BinaryOp::LessEq => "if_icmple",
                _ => return Type::Bool,
            },
        };
        self.push(format!("{branch} {enter}"));
        self.push("ldc 0");
        self.push(format!("goto {exit}"));
        self.push_label(&enter);
        self.push("ldc 1");
        self.push_label(&exit);
        Type::Bool
    }

    fn emit_unary(&mut self, unary: &'ast UnaryExpr<'ast>) -> Type {
        let ty = self.emit_expr(unary.operand);
        let is_float = ty == Type::Float;
        match unary.op {
            UnaryOp::Neg => self.push(if is_float { "fneg" } else { "ineg" }),
            UnaryOp::Not => {
                self.push("ldc 1");
                self.push("ixor");
            }
            UnaryOp::Inc | UnaryOp::Dec => {
                let delta = if unary.op == UnaryOp::Inc { "1" } else { "-1" };
                if is_float {
                    self.push(format!("ldc {delta}.0"));
                    self.push("fadd");
                } else {
                    self.push(format!("ldc {delta}"));
                    self.push("iadd");
                }
                // Write back through identifier operands, leaving the
                // updated value on the stack.
                if let Expr::Ident(ident) = *unary.operand {
                    self.push("dup");
                    let slot = self.slots.slot_of(ident.name);
                    self.push(format!("{} {}", store_instruction(&ty), slot));
                }
            }
        }
        ty
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Emit a call. The callee resolves directly by name or, for a variable
    /// of function-pointer type, by the pointer's carried target; missing
    /// trailing arguments emit the callee's default expressions at the call
    /// site.
    ///
    /// The whole `invokestatic` descriptor comes from the signature the
    /// analysis pass recorded for this site, so argument and return
    /// descriptors always agree even when other sites instantiated the
    /// callee differently.
    fn emit_call(&mut self, call: &'ast CallExpr<'ast>) -> Type {
        match *call.callee {
            Expr::Ident(ident) => {
                let name = match self.types.env().get(ident.name) {
                    Some(Type::Fptr(target)) => target.clone(),
                    _ => ident.name.to_string(),
                };
                let Some(decl) = self.types.function(&name).map(|entry| entry.decl) else {
                    return Type::NoType;
                };
                let signature = match self.types.call_signature(call) {
                    Some(signature) => signature.clone(),
                    None => self.entry_signature(&name),
                };

                let mut descriptor = String::from("(");
                for ty in &signature.arg_types {
                    descriptor.push_str(signature_descriptor(ty));
                }
                descriptor.push(')');

                for arg in call.args {
                    self.emit_expr(arg);
                }
                for i in call.args.len()..signature.arg_types.len() {
                    if let Some(default) = decl.params.get(i).and_then(|p| p.default) {
                        self.emit_expr(default);
                    }
                }

                self.push(format!(
                    "invokestatic {}/{}{}{}",
                    crate::assemble::MODULE_CLASS,
                    name,
                    descriptor,
                    signature_descriptor(&signature.return_type)
                ));
                signature.return_type
            }
            Expr::Lambda(lambda) => self.emit_lambda_call(lambda, call),
            _ => Type::NoType,
        }
    }

    /// Fallback signature from the callee's current instantiation, for call
    /// nodes the analysis pass did not record.
    fn entry_signature(&self, name: &str) -> CallSignature {
        let entry = self.types.function(name);
        CallSignature {
            arg_types: entry.map(|e| e.arg_types.clone()).unwrap_or_default(),
            return_type: entry
                .and_then(|e| e.return_type.clone())
                .unwrap_or(Type::NoType),
        }
    }

    /// Inline a directly invoked lambda: arguments (and trailing defaults)
    /// are stored into parameter slots, then the body runs in a snapshot of
    /// the enclosing scope with returns jumping to a per-call exit label.
    fn emit_lambda_call(&mut self, lambda: &'ast LambdaExpr<'ast>, call: &'ast CallExpr<'ast>) -> Type {
        let return_type = self
            .types
            .call_signature(call)
            .map(|signature| signature.return_type.clone())
            .unwrap_or(Type::NoType);

        let exit = self.labels.fresh();
        self.types.env_mut().push_snapshot();

        for (i, param) in lambda.params.iter().enumerate() {
            let ty = if let Some(arg) = call.args.get(i) {
                self.emit_expr(arg)
            } else if let Some(default) = param.default {
                self.emit_expr(default)
            } else {
                Type::NoType
            };
            if ty != Type::NoType {
                self.types.env_mut().assign(param.name.name, ty.clone());
                let slot = self.slots.slot_of(param.name.name);
                self.push(format!("{} {}", store_instruction(&ty), slot));
            }
        }

        self.lambda_exits.push(exit.clone());
        for stmt in lambda.body {
            self.emit_stmt(stmt);
        }
        self.lambda_exits.pop();
        self.push_label(&exit);

        self.types.env_mut().pop();
        return_type
    }

    // ==========================================================================
    // Containers
    // ==========================================================================

    /// Build a list literal: construct, then append each element, boxing
    /// scalars, leaving the list on the stack.
    pub(crate) fn emit_list_literal(&mut self, list: ListLit<'ast>) -> Type {
        self.push("new java/util/ArrayList");
        self.push("dup");
        self.push("invokespecial java/util/ArrayList/<init>()V");
        let mut elem_ty = Type::NoType;
        for (i, elem) in list.elements.iter().enumerate() {
            self.push("dup");
            let ty = self.emit_expr(elem);
            if let Some(boxing) = box_instruction(&ty) {
                self.push(boxing);
            }
            self.push("invokevirtual java/util/ArrayList/add(Ljava/lang/Object;)Z");
            self.push("pop");
            if i == 0 {
                elem_ty = ty;
            }
        }
        Type::list(elem_ty)
    }

    /// Emit indexing, peeling one container level per index: list elements
    /// load boxed and unbox to their static type, string indexing takes the
    /// one-character substring.
    fn emit_index(&mut self, index: &'ast IndexExpr<'ast>) -> Type {
        let mut ty = self.emit_expr(index.target);
        for idx in index.indices {
            match ty {
                Type::String => {
                    self.emit_expr(idx);
                    self.push("dup");
                    self.push("ldc 1");
                    self.push("iadd");
                    self.push("invokevirtual java/lang/String/substring(II)Ljava/lang/String;");
                    ty = Type::String;
                }
                Type::List(elem) => {
                    self.emit_expr(idx);
                    self.push("invokevirtual java/util/ArrayList/get(I)Ljava/lang/Object;");
                    self.push(format!("checkcast {}", class_name(&elem)));
                    if let Some(unboxing) = unbox_instruction(&elem) {
                        self.push(unboxing);
                    }
                    ty = *elem;
                }
                _ => break,
            }
        }
        ty
    }

    /// Emit append: list receivers add each value (boxed), string receivers
    /// concatenate (stringifying scalars); the receiver stays on the stack.
    fn emit_append(&mut self, append: &'ast AppendExpr<'ast>) -> Type {
        let target_ty = self.emit_expr(append.target);
        match target_ty {
            Type::List(_) => {
                for value in append.values {
                    self.push("dup");
                    let ty = self.emit_expr(value);
                    if let Some(boxing) = box_instruction(&ty) {
                        self.push(boxing);
                    }
                    self.push("invokevirtual java/util/ArrayList/add(Ljava/lang/Object;)Z");
                    self.push("pop");
                }
            }
            _ => {
                for value in append.values {
                    let ty = self.emit_expr(value);
                    let conversion = match ty {
                        Type::String => None,
                        Type::Int => {
                            Some("invokestatic java/lang/String/valueOf(I)Ljava/lang/String;")
                        }
                        Type::Bool => {
                            Some("invokestatic java/lang/String/valueOf(Z)Ljava/lang/String;")
                        }
                        Type::Float => {
                            Some("invokestatic java/lang/String/valueOf(F)Ljava/lang/String;")
                        }
                        _ => Some(
                            "invokestatic java/lang/String/valueOf(Ljava/lang/Object;)Ljava/lang/String;",
                        ),
                    };
                    if let Some(conversion) = conversion {
                        self.push(conversion);
                    }
                    self.push(
                        "invokevirtual java/lang/String/concat(Ljava/lang/String;)Ljava/lang/String;",
                    );
                }
            }
        }
        target_ty
    }

    // ==========================================================================
    // Pattern dispatch
    // ==========================================================================

    /// Emit a pattern dispatch as a static call to the pattern's method,
    /// with the descriptor taken from this site's recorded signature.
    fn emit_match(&mut self, match_expr: &'ast MatchExpr<'ast>) -> Type {
        let signature = match self.types.match_signature(match_expr) {
            Some(signature) => signature.clone(),
            None => match self.types.pattern(match_expr.pattern.name) {
                Some(entry) => CallSignature {
                    arg_types: vec![entry.target_type.clone()],
                    return_type: entry.return_type.clone().unwrap_or(Type::NoType),
                },
                None => return Type::NoType,
            },
        };
        self.emit_expr(match_expr.argument);
        let target_descriptor = signature
            .arg_types
            .first()
            .map(signature_descriptor)
            .unwrap_or("V");
        self.push(format!(
            "invokestatic {}/{}({}){}",
            crate::assemble::MODULE_CLASS,
            match_expr.pattern.name,
            target_descriptor,
            signature_descriptor(&signature.return_type)
        ));
        signature.return_type
    }
}
