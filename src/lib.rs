//! Motif, a compiler backend for a small pattern-oriented scripting
//! language targeting JVM bytecode via Jasmin textual assembly.
//!
//! This crate re-exports the two workspace members:
//!
//! - [`ast`] ([`motif_ast`]): arena-allocated AST node definitions (the
//!   contract with the parsing and name-resolution frontend)
//! - [`compiler`] ([`motif_compiler`]): call-site-driven type inference and
//!   the type-directed bytecode emitter
//!
//! # Example
//!
//! ```
//! use motif::ast::{MainDecl, Program, Span};
//! use motif::Compiler;
//!
//! let program = Program {
//!     functions: &[],
//!     patterns: &[],
//!     main: MainDecl { body: &[], span: Span::default() },
//!     span: Span::default(),
//! };
//! let result = Compiler::compile(&program);
//! assert!(result.is_success());
//! ```

pub use motif_ast as ast;
pub use motif_compiler as compiler;

pub use motif_ast::bumpalo;
pub use motif_compiler::{CompilationResult, CompileError, Compiler, Type};

/// Compile a program to Jasmin assembly text.
///
/// Convenience wrapper over [`Compiler::compile`].
pub fn compile(program: &ast::Program<'_>) -> CompilationResult {
    Compiler::compile(program)
}
