//! Bytecode emission.
//!
//! The [`CodeGenerator`] walks the same AST the inference pass walked and
//! translates it to stack-machine instruction text. The static types that
//! drive instruction selection come from the analysis pass without
//! re-running it: every `emit_*` call returns the type of the value it left
//! on the stack, call and match sites read the per-site signatures the
//! analysis recorded, and pre-emission decisions use the read-only
//! [`TypeInference::type_of`] query. `int`/`bool` locals use the unboxed
//! integer instructions, `float` the float ones, and strings, lists, and
//! function pointers the reference ones, with boxing applied only at the
//! edges of reference-typed containers.
//!
//! Emission must only run once inference finished with no diagnostics; it
//! performs no type checking and never mutates the engine's recorded
//! signatures or reachability.

mod expr;
mod stmt;

use motif_ast::{Program, Stmt};

use crate::assemble::ModuleWriter;
use crate::infer::TypeInference;
use crate::labels::{LabelAllocator, SlotAllocator};
use crate::types::Type;

/// Emits a whole module from a type-checked program.
///
/// Holds the label allocator (monotonic across the module), the per-method
/// slot table, and the loop/lambda label stacks that `break`, `next`, and
/// lambda-body `return` statements resolve against.
pub struct CodeGenerator<'a, 'ast> {
    pub(crate) types: &'a mut TypeInference<'ast>,
    pub(crate) labels: LabelAllocator,
    pub(crate) slots: SlotAllocator,
    /// Innermost-last step/continue targets for `next`.
    pub(crate) loop_starts: Vec<String>,
    /// Innermost-last exit targets for `break`.
    pub(crate) loop_ends: Vec<String>,
    /// Exit labels of lambda bodies currently being inlined.
    pub(crate) lambda_exits: Vec<String>,
    /// Instruction lines of the method being emitted.
    pub(crate) code: Vec<String>,
    /// Whether the current method is static (affects the receiver pushed
    /// when constructing function-pointer objects).
    pub(crate) in_static_method: bool,
}

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    /// Create a generator over an inference engine already populated by the
    /// analysis pass.
    pub fn new(types: &'a mut TypeInference<'ast>) -> Self {
        Self {
            types,
            labels: LabelAllocator::new(),
            slots: SlotAllocator::new(),
            loop_starts: Vec::new(),
            loop_ends: Vec::new(),
            lambda_exits: Vec::new(),
            code: Vec::new(),
            in_static_method: false,
        }
    }

    /// Emit the whole module: class scaffolding, entry trampoline, every
    /// reachable function and pattern in first-visit order, then the main
    /// body as the class constructor.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(&mut self, program: &Program<'ast>) -> String {
        let mut writer = ModuleWriter::new();
        writer.begin_class();
        writer.trampoline();

        for name in self.types.reachable_functions().to_vec() {
            self.emit_function(&name, &mut writer);
        }
        for name in self.types.reachable_patterns().to_vec() {
            self.emit_pattern(&name, &mut writer);
        }
        self.emit_main(program, &mut writer);

        writer.finish()
    }

    // ==========================================================================
    // Methods
    // ==========================================================================

    /// Emit one reachable function as a static method.
    ///
    /// The signature comes from the function's current instantiation: the
    /// argument and return types recorded by the most recently inferred
    /// call site.
    fn emit_function(&mut self, name: &str, writer: &mut ModuleWriter) {
        let (decl, arg_types, return_type) = match self.types.function(name) {
            Some(entry) => (
                entry.decl,
                entry.arg_types.clone(),
                entry.return_type.clone().unwrap_or(Type::NoType),
            ),
            None => return,
        };

        self.slots.reset();
        self.code.clear();
        self.in_static_method = true;
        self.types.env_mut().push_fresh();

        let mut signature = String::from("(");
        for (i, param) in decl.params.iter().enumerate() {
            let ty = arg_types.get(i).cloned().unwrap_or(Type::NoType);
            signature.push_str(signature_descriptor(&ty));
            self.slots.slot_of(param.name.name);
            self.types.env_mut().assign(param.name.name, ty);
        }
        signature.push(')');

        let directive = format!(
            ".method public static {}{}{}",
            decl.name.name,
            signature,
            signature_descriptor(&return_type)
        );

        let mut has_return = false;
        for stmt in decl.body {
            self.emit_stmt(stmt);
            if matches!(stmt, Stmt::Return(_)) {
                has_return = true;
            }
        }
        if !has_return {
            self.push("return");
        }

        writer.method(&directive, &self.code);
        self.types.env_mut().pop();
    }

    /// Emit one reachable pattern as a static method over its target type.
    ///
    /// Arms compile to guard/value chains; a guard that fails falls through
    /// to the next arm, and a type-directed default return follows the last
    /// arm so every path leaves the method.
    fn emit_pattern(&mut self, name: &str, writer: &mut ModuleWriter) {
        let (decl, target_type, return_type) = match self.types.pattern(name) {
            Some(entry) => (
                entry.decl,
                entry.target_type.clone(),
                entry.return_type.clone().unwrap_or(Type::NoType),
            ),
            None => return,
        };

        self.slots.reset();
        self.code.clear();
        self.in_static_method = true;
        self.types.env_mut().push_fresh();
        self.slots.slot_of(decl.target.name);
        self.types
            .env_mut()
            .assign(decl.target.name, target_type.clone());

        let directive = format!(
            ".method public static {}({}){}",
            decl.name.name,
            signature_descriptor(&target_type),
            signature_descriptor(&return_type)
        );

        for arm in decl.arms {
            let next_arm = self.labels.fresh();
            self.emit_expr(arm.guard);
            self.push(format!("ifeq {next_arm}"));
            self.emit_expr(arm.value);
            self.push(return_instruction(&return_type));
            self.push_label(&next_arm);
        }
        match return_type {
            Type::Int | Type::Bool => {
                self.push("ldc 0");
                self.push("ireturn");
            }
            Type::Float => {
                self.push("ldc 0.0");
                self.push("freturn");
            }
            Type::NoType => self.push("return"),
            _ => {
                self.push("aconst_null");
                self.push("areturn");
            }
        }

        writer.method(&directive, &self.code);
        self.types.env_mut().pop();
    }

    /// Emit the main body into the class constructor.
    ///
    /// Slot 0 belongs to the receiver, which function-pointer construction
    /// loads with `aload_0`.
    fn emit_main(&mut self, program: &Program<'ast>, writer: &mut ModuleWriter) {
        self.slots.reset();
        self.code.clear();
        self.in_static_method = false;
        self.slots.slot_of("<this>");

        self.push("aload_0");
        self.push("invokespecial java/lang/Object/<init>()V");
        for stmt in program.main.body {
            self.emit_stmt(stmt);
        }
        self.push("return");

        writer.method(".method public <init>()V", &self.code);
    }

    // ==========================================================================
    // Instruction buffer
    // ==========================================================================

    pub(crate) fn push(&mut self, instr: impl Into<String>) {
        self.code.push(instr.into());
    }

    pub(crate) fn push_label(&mut self, label: &str) {
        self.code.push(format!("{label}:"));
    }
}

// ============================================================================
// Type-directed instruction selection
// ============================================================================

/// Method-signature descriptor for a type.
pub(crate) fn signature_descriptor(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "I",
        Type::Bool => "Z",
        Type::Float => "F",
        Type::String => "Ljava/lang/String;",
        Type::List(_) => "Ljava/util/ArrayList;",
        Type::Fptr(_) => "LFptr;",
        Type::NoType => "V",
    }
}

/// Runtime class used for `checkcast` and boxing of a type.
pub(crate) fn class_name(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "java/lang/Integer",
        Type::Bool => "java/lang/Boolean",
        Type::Float => "java/lang/Float",
        Type::String => "java/lang/String",
        Type::List(_) => "java/util/ArrayList",
        Type::Fptr(_) => "Fptr",
        Type::NoType => "java/lang/Object",
    }
}

/// Boxing call for scalar types stored into reference containers.
pub(crate) fn box_instruction(ty: &Type) -> Option<&'static str> {
    match ty {
        Type::Int => Some("invokestatic java/lang/Integer/valueOf(I)Ljava/lang/Integer;"),
        Type::Bool => Some("invokestatic java/lang/Boolean/valueOf(Z)Ljava/lang/Boolean;"),
        Type::Float => Some("invokestatic java/lang/Float/valueOf(F)Ljava/lang/Float;"),
        _ => None,
    }
}

/// Unboxing call for scalar values retrieved from reference containers.
pub(crate) fn unbox_instruction(ty: &Type) -> Option<&'static str> {
    match ty {
        Type::Int => Some("invokevirtual java/lang/Integer/intValue()I"),
        Type::Bool => Some("invokevirtual java/lang/Boolean/booleanValue()Z"),
        Type::Float => Some("invokevirtual java/lang/Float/floatValue()F"),
        _ => None,
    }
}

/// Load instruction for a local of the given type.
pub(crate) fn load_instruction(ty: &Type) -> &'static str {
    match ty {
        Type::Int | Type::Bool => "iload",
        Type::Float => "fload",
        _ => "aload",
    }
}

/// Store instruction for a local of the given type.
pub(crate) fn store_instruction(ty: &Type) -> &'static str {
    match ty {
        Type::Int | Type::Bool => "istore",
        Type::Float => "fstore",
        _ => "astore",
    }
}

/// Return instruction for a value of the given type.
pub(crate) fn return_instruction(ty: &Type) -> &'static str {
    match ty {
        Type::Int | Type::Bool => "ireturn",
        Type::Float => "freturn",
        Type::NoType => "return",
        _ => "areturn",
    }
}

/// Render a string constant for an `ldc` operand.
///
/// Quotes, backslashes, and control characters must appear escaped inside
/// the assembler's quoted literals.
pub(crate) fn escape_string_constant(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
