//! Diagnostic system for the semantic passes.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Span (where it went wrong)
//! - Phase (which pass noticed)
//!
//! Passes report through [`DiagnosticSink`] and never stop at the first
//! problem; [`DiagnosticQueue`] collects a whole run.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Phase, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
