//! Core diagnostic types.
//!
//! Defines [`Diagnostic`], [`Severity`] and [`Phase`], the building blocks
//! both semantic passes use to report errors and warnings.

use mtx_ir::Span;
use std::fmt;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The component that produced a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Scoper,
    TypeChecker,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Scoper => write!(f, "scoper"),
            Phase::TypeChecker => write!(f, "type checker"),
        }
    }
}

/// A diagnostic with everything a front end needs to render it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Pass that reported it.
    pub phase: Phase,
    /// Main message.
    pub message: String,
    /// Where it went wrong.
    pub span: Span,
    /// Additional context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity, phase: Phase) -> Self {
        Diagnostic {
            code,
            severity,
            phase,
            message: String::new(),
            span: Span::DUMMY,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(phase: Phase, code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error, phase)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(phase: Phase, code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning, phase)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    /// `error[E2001] scoper:3: undefined variable `i``
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}:{}: {}",
            self.severity, self.code, self.phase, self.span, self.message
        )?;
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
