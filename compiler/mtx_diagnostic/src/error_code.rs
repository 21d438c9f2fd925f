//! Error codes for semantic diagnostics.
//!
//! Format: `E2xxx` for errors, `W2xxx` for warnings. Every pass reports
//! through one of these codes so callers can match on the kind of problem
//! rather than on message text.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Reference to a name with no visible declaration
    UndefinedSymbol,
    /// Rebinding a name with a different type (warning)
    Redeclaration,
    /// `break`/`continue` outside any loop
    ControlFlowMisuse,
    /// Vector or matrix dimension could not be inferred (warning)
    ShapeUnknown,
    /// Declared dimensions conflict
    ShapeMismatch,
    /// Wrong type for a condition, range bound or argument
    TypeMismatch,
    /// No overload accepts the argument types
    UndefinedFunction,
    /// Indexed value whose type could not be inferred (warning)
    TypeUnknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UndefinedSymbol => "E2001",
            ErrorCode::Redeclaration => "W2002",
            ErrorCode::ControlFlowMisuse => "E2003",
            ErrorCode::ShapeUnknown => "W2004",
            ErrorCode::ShapeMismatch => "E2005",
            ErrorCode::TypeMismatch => "E2006",
            ErrorCode::UndefinedFunction => "E2007",
            ErrorCode::TypeUnknown => "W2008",
        }
    }

    /// Codes that are only ever reported as warnings.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ErrorCode::Redeclaration | ErrorCode::ShapeUnknown | ErrorCode::TypeUnknown
        )
    }

    /// Short human name, as used in the language documentation.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::UndefinedSymbol => "undefined symbol",
            ErrorCode::Redeclaration => "redeclaration",
            ErrorCode::ControlFlowMisuse => "control flow misuse",
            ErrorCode::ShapeUnknown => "shape unknown",
            ErrorCode::ShapeMismatch => "shape mismatch",
            ErrorCode::TypeMismatch => "type mismatch",
            ErrorCode::UndefinedFunction => "undefined function",
            ErrorCode::TypeUnknown => "type unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
