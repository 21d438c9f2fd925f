//! Diagnostic sink and the queue that collects a run's diagnostics.
//!
//! Both semantic passes are error tolerant: they report and keep walking,
//! so a single run surfaces everything it can. The queue keeps diagnostics
//! in report order and tracks counts; rendering is up to the caller.

use mtx_ir::Span;

use crate::{Diagnostic, ErrorCode, Phase};

/// Where passes send diagnostics.
///
/// `report` is the only required method; the helpers build the common
/// error/warning shapes.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn error(&mut self, phase: Phase, code: ErrorCode, message: impl Into<String>, span: Span)
    where
        Self: Sized,
    {
        self.report(
            Diagnostic::error(phase, code)
                .with_message(message)
                .with_span(span),
        );
    }

    fn warn(&mut self, phase: Phase, code: ErrorCode, message: impl Into<String>, span: Span)
    where
        Self: Sized,
    {
        self.report(
            Diagnostic::warning(phase, code)
                .with_message(message)
                .with_span(span),
        );
    }
}

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited). Errors past the
    /// limit are counted but dropped; warnings are never limited.
    pub error_limit: usize,
}

impl DiagnosticConfig {
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }

    pub fn with_error_limit(error_limit: usize) -> Self {
        DiagnosticConfig { error_limit }
    }
}

/// Collects diagnostics in report order.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of errors reported, including any dropped past the limit.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Whether any diagnostic with `code` was reported.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Take all collected diagnostics, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.warning_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            let limited = self.limit_reached();
            self.error_count += 1;
            if limited {
                return;
            }
        } else {
            self.warning_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
