//! Diagnostics produced by the semantic phase.
//!
//! Every error carries the source location it was detected at; rendering
//! follows the `at <line>:<col>: <message>` convention. Inference never
//! aborts on an error: it records the diagnostic and continues with a
//! substitute type, so a single compilation can report many of these.

use motif_ast::Span;
use thiserror::Error;

/// A semantic error detected by type inference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A condition (if, loop guard, pattern guard, break/next guard) was not boolean.
    #[error("at {span}: condition is not a bool")]
    ConditionNotBool {
        /// Where the condition appears.
        span: Span,
    },

    /// A binary operator was applied to operands of different types.
    #[error("at {span}: operands of '{op}' do not have the same type")]
    NonSameOperands {
        /// The operator.
        op: String,
        /// Where the operation appears.
        span: Span,
    },

    /// An operator was applied to an operand kind it does not support.
    #[error("at {span}: unsupported operand type for '{op}'")]
    UnsupportedOperandType {
        /// The operator.
        op: String,
        /// Where the operation appears.
        span: Span,
    },

    /// Indexing was applied to a value that is neither a string nor a list.
    #[error("at {span}: value is not indexable")]
    NotIndexable {
        /// Where the access appears.
        span: Span,
    },

    /// An index expression was not an integer.
    #[error("at {span}: access index is not an int")]
    IndexNotInt {
        /// Where the access appears.
        span: Span,
    },

    /// Append was applied to a value that is neither a string nor a list.
    #[error("at {span}: value is not appendable")]
    NotAppendable {
        /// Where the append appears.
        span: Span,
    },

    /// Push was applied to a value that is neither a string nor a list.
    #[error("at {span}: value cannot be pushed onto")]
    NotPushable {
        /// Where the push appears.
        span: Span,
    },

    /// The pushed value's type does not match the receiver's element type.
    #[error("at {span}: pushed value type does not match the receiver")]
    PushArgumentTypeMismatch {
        /// Where the push appears.
        span: Span,
    },

    /// A list literal mixes elements of different types.
    #[error("at {span}: list elements do not all have the same type")]
    ListElementTypeMismatch {
        /// Where the literal appears.
        span: Span,
    },

    /// A function body returns values of more than one type.
    #[error("at {span}: function '{name}' has incompatible return types")]
    FunctionIncompatibleReturnTypes {
        /// The function name.
        name: String,
        /// Where the function is declared.
        span: Span,
    },

    /// A pattern's arms produce values of more than one type.
    #[error("at {span}: pattern '{name}' has incompatible return types")]
    PatternIncompatibleReturnTypes {
        /// The pattern name.
        name: String,
        /// Where the pattern is declared.
        span: Span,
    },

    /// Chomp was applied to a non-string value.
    #[error("at {span}: chomp argument is not a string")]
    ChompArgumentTypeMismatch {
        /// Where the chomp appears.
        span: Span,
    },

    /// Len was applied to a value that is neither a string nor a list.
    #[error("at {span}: len argument is not a string or list")]
    LenArgumentTypeMismatch {
        /// Where the len appears.
        span: Span,
    },

    /// A for-loop range identifier is not bound to a list.
    #[error("at {span}: value is not iterable")]
    NotIterable {
        /// Where the range appears.
        span: Span,
    },

    /// A call supplied fewer arguments than the non-default parameters, or
    /// more than the declared parameters.
    #[error("at {span}: wrong number of arguments for '{name}'")]
    ArgumentCountMismatch {
        /// The callee name (`lambda` for direct lambda calls).
        name: String,
        /// Where the call appears.
        span: Span,
    },

    /// A function or pattern body was re-entered while still being inferred.
    ///
    /// The upstream dependency analysis guarantees an acyclic call graph, so
    /// this only fires when the backend is driven without that guarantee; it
    /// exists to fail fast instead of overflowing the stack.
    #[error("at {span}: circular call involving '{name}'")]
    CircularDependency {
        /// The re-entered declaration.
        name: String,
        /// Where the re-entrant call appears.
        span: Span,
    },
}

impl CompileError {
    /// The source location this diagnostic points at.
    pub fn span(&self) -> Span {
        match self {
            Self::ConditionNotBool { span }
            | Self::NonSameOperands { span, .. }
            | Self::UnsupportedOperandType { span, .. }
            | Self::NotIndexable { span }
            | Self::IndexNotInt { span }
            | Self::NotAppendable { span }
            | Self::NotPushable { span }
            | Self::PushArgumentTypeMismatch { span }
            | Self::ListElementTypeMismatch { span }
            | Self::FunctionIncompatibleReturnTypes { span, .. }
            | Self::PatternIncompatibleReturnTypes { span, .. }
            | Self::ChompArgumentTypeMismatch { span }
            | Self::LenArgumentTypeMismatch { span }
            | Self::NotIterable { span }
            | Self::ArgumentCountMismatch { span, .. }
            | Self::CircularDependency { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_location() {
        let err = CompileError::NonSameOperands {
            op: "+".to_string(),
            span: Span::new(4, 9),
        };
        assert_eq!(err.to_string(), "at 4:9: operands of '+' do not have the same type");
    }

    #[test]
    fn span_accessor_matches_variant_span() {
        let err = CompileError::NotIterable { span: Span::line(7) };
        assert_eq!(err.span().line, 7);
    }
}
