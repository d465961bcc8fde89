//! Abstract syntax tree for the Motif language.
//!
//! This crate is the contract between the frontend (parsing and name
//! resolution, which live elsewhere) and the compiler backend (type
//! inference and code generation). It provides:
//!
//! - Arena-allocated AST node definitions for all Motif constructs
//! - Operator enums with source-token rendering
//! - Source spans for diagnostics
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use motif_ast::{Expr, IntLit, Span};
//!
//! let arena = Bump::new();
//! let lit = arena.alloc(Expr::Int(IntLit { value: 42, span: Span::line(1) }));
//! assert_eq!(lit.span().line, 1);
//! ```

pub mod ast;
pub mod span;

pub use ast::*;
pub use span::Span;

// Re-export the arena so producers and consumers agree on the allocator.
pub use bumpalo;
