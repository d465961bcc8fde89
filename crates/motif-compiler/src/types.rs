//! Semantic types for Motif values.

use std::fmt;

/// The type of a Motif value.
///
/// `NoType` is not a value type: it marks the absence of a value (a function
/// with no return), an unresolved element type (an empty list literal), or a
/// position where inference already reported an error. It propagates through
/// the rest of inference without producing follow-on diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Machine integer
    Int,
    /// Machine float
    Float,
    /// Boolean
    Bool,
    /// String
    String,
    /// Homogeneous list with the given element type
    List(Box<Type>),
    /// Function pointer carrying its target function's name
    Fptr(String),
    /// Absence of a value, unresolved, or error
    NoType,
}

impl Type {
    /// Shorthand for a list type.
    pub fn list(elem: Type) -> Self {
        Self::List(Box::new(elem))
    }

    /// Whether this is an arithmetic operand type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Structural compatibility with `NoType` acting as a wildcard.
    ///
    /// Two types are compatible when they are structurally equal or when
    /// either side is `NoType` (recursively for list element types). This is
    /// what keeps one recorded error from cascading: a `NoType` produced at
    /// an error site satisfies any later compatibility check.
    pub fn matches(&self, other: &Type) -> bool {
        match (self, other) {
            (Self::NoType, _) | (_, Self::NoType) => true,
            (Self::List(a), Self::List(b)) => a.matches(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::List(elem) => write!(f, "[{elem}]"),
            Self::Fptr(name) => write!(f, "fptr({name})"),
            Self::NoType => write!(f, "no-type"),
        }
    }
}
