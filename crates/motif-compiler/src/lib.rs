//! Motif compiler backend.
//!
//! Two strictly sequential passes over a parsed, name-checked AST:
//!
//! - **Analysis**: [`TypeInference`] walks `main` and, call-site by call
//!   site, everything `main` reaches, deriving function and pattern
//!   signatures on demand and recording diagnostics.
//! - **Emission**: if analysis produced no diagnostics, [`CodeGenerator`]
//!   re-walks the same AST, reading the types and per-call-site signatures
//!   the analysis recorded (without mutating them), and produces one
//!   textual Jasmin module.
//!
//! Functions never reached from `main` are dead code: they keep no derived
//! types and are absent from the artifact.
//!
//! ## Modules
//!
//! - [`assemble`]: textual module assembly (class scaffolding, trampoline)
//! - [`emit`]: type-directed instruction emission
//! - [`env`]: variable scope stack
//! - [`error`]: the semantic diagnostic taxonomy
//! - [`infer`]: the call-site-driven type inference engine
//! - [`labels`]: label and local-slot allocation
//! - [`types`]: semantic value types

pub mod assemble;
pub mod emit;
pub mod env;
pub mod error;
pub mod infer;
pub mod labels;
pub mod types;

pub use assemble::ModuleWriter;
pub use emit::CodeGenerator;
pub use env::{ScopeError, TypeEnv};
pub use error::CompileError;
pub use infer::{CallSignature, FunctionEntry, PatternEntry, TypeInference};
pub use labels::{LabelAllocator, SlotAllocator};
pub use types::Type;

use motif_ast::Program;

/// Result of compiling one program.
pub struct CompilationResult {
    /// The emitted module text; present only when there are no diagnostics.
    pub artifact: Option<String>,
    /// Diagnostics recorded by the analysis pass, in detection order.
    pub diagnostics: Vec<CompileError>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no diagnostics, artifact present).
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The compiler entry point.
pub struct Compiler;

impl Compiler {
    /// Compile a program: run inference, gate on diagnostics, then emit.
    ///
    /// There is no partial-artifact mode; either the whole reachable
    /// program is emitted or nothing is.
    pub fn compile(program: &Program<'_>) -> CompilationResult {
        let mut types = TypeInference::new(program);
        types.check_program(program);

        if types.has_errors() {
            return CompilationResult {
                artifact: None,
                diagnostics: types.take_diagnostics(),
            };
        }

        let artifact = CodeGenerator::new(&mut types).generate(program);
        CompilationResult {
            artifact: Some(artifact),
            diagnostics: types.take_diagnostics(),
        }
    }
}
