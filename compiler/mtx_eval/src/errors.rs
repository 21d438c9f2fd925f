//! Runtime errors.
//!
//! Every runtime error is fatal for the run: evaluation only starts on
//! programs the checker accepted, so reaching one of these means the static
//! passes let something through or an index was out of range.

use mtx_ir::Span;
use thiserror::Error;

use crate::Value;

pub type EvalResult = Result<Value, EvalError>;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("function `{name}` is not implemented")]
    UndefinedFunction { name: String },

    #[error("`{name}` is not callable")]
    NotCallable { name: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("shape mismatch: {left} and {right}")]
    ShapeMismatch { left: String, right: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("`{keyword}` outside of a loop")]
    ControlFlowOutsideLoop { keyword: &'static str },
}

/// A runtime error and where it happened.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost node that was being evaluated.
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    }
    .into()
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    }
    .into()
}

#[cold]
pub fn not_callable(name: &str) -> EvalError {
    EvalErrorKind::NotCallable {
        name: name.to_owned(),
    }
    .into()
}

#[cold]
pub fn type_mismatch(expected: impl Into<String>, got: &Value) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.type_name().to_owned(),
    }
    .into()
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalErrorKind::IndexOutOfBounds { index, len }.into()
}

#[cold]
pub fn shape_mismatch(left: impl Into<String>, right: impl Into<String>) -> EvalError {
    EvalErrorKind::ShapeMismatch {
        left: left.into(),
        right: right.into(),
    }
    .into()
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn invalid_assignment_target() -> EvalError {
    EvalErrorKind::InvalidAssignmentTarget.into()
}

#[cold]
pub fn control_flow_outside_loop(keyword: &'static str) -> EvalError {
    EvalErrorKind::ControlFlowOutsideLoop { keyword }.into()
}
