//! mtx Compiler - pipeline driver.
//!
//! ```text
//! Program (from the parser or AstBuilder)
//!     │
//!     ▼
//! Scoper ──► TypeTable + diagnostics
//!     │
//!     ▼
//! Type Checker ──► more diagnostics
//!     │
//!     ▼  (only if no errors)
//! Interpreter ──► printed output, return value
//! ```
//!
//! Both analysis passes always run to the end of the program; the
//! interpreter only runs on programs without errors. Warnings never block a
//! run.

use std::sync::Once;

use mtx_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use mtx_eval::{buffer_handler, EvalError, InterpreterBuilder, SharedPrintHandler, Value};
use mtx_ir::{print_program, AstBuilder, Program, StringInterner};
use mtx_types::{check_program, resolve_program, SymbolTable, TypeTable};
use thiserror::Error;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=mtx_types=debug`,
/// `RUST_LOG=mtx_eval=trace` and so on.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Result of the two analysis passes.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Inferred type of every expression.
    pub types: TypeTable,
    /// Everything both passes reported, in report order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// A completed run.
#[derive(Debug)]
pub struct RunOutput {
    /// Warnings from analysis; a run never starts with errors.
    pub diagnostics: Vec<Diagnostic>,
    /// What `PRINT` wrote, if the print handler captures.
    pub output: String,
    /// Value of a top-level `return`.
    pub value: Option<Value>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("program rejected with {} error(s)", error_count(.0))]
    Rejected(Vec<Diagnostic>),

    #[error("runtime error: {0}")]
    Runtime(#[from] EvalError),
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

/// Interner, diagnostic limits and print destination for a series of
/// programs.
///
/// Programs must be built with this session's interner, e.g. through
/// [`Session::builder`].
pub struct Session {
    interner: StringInterner,
    config: DiagnosticConfig,
    print_handler: SharedPrintHandler,
}

impl Session {
    /// Unlimited diagnostics, output captured in a buffer.
    pub fn new() -> Self {
        Session {
            interner: StringInterner::new(),
            config: DiagnosticConfig::unlimited(),
            print_handler: buffer_handler(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DiagnosticConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = handler;
        self
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn builder(&self) -> AstBuilder<'_> {
        AstBuilder::new(&self.interner)
    }

    pub fn analyze(&self, program: &Program) -> Analysis {
        analyze_with(program, &self.interner, &self.config)
    }

    /// Analyze, then interpret if there were no errors.
    ///
    /// Output printed before a runtime error stays in the print handler.
    pub fn run(&self, program: &Program) -> Result<RunOutput, RunError> {
        run_with(program, &self.interner, &self.config, &self.print_handler)
    }

    /// Indented tree dump of `program`.
    pub fn dump(&self, program: &Program) -> String {
        print_program(program, &self.interner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the Scoper and the Type Checker over `program`.
pub fn analyze(program: &Program, interner: &StringInterner) -> Analysis {
    analyze_with(program, interner, &DiagnosticConfig::unlimited())
}

/// Analyze and interpret `program`, capturing its output.
pub fn run(program: &Program, interner: &StringInterner) -> Result<RunOutput, RunError> {
    run_with(
        program,
        interner,
        &DiagnosticConfig::unlimited(),
        &buffer_handler(),
    )
}

#[tracing::instrument(level = "debug", skip_all)]
fn analyze_with(program: &Program, interner: &StringInterner, config: &DiagnosticConfig) -> Analysis {
    let mut queue = DiagnosticQueue::with_config(config.clone());
    let mut symbols = SymbolTable::with_builtins(interner);
    let types = resolve_program(program, interner, &mut symbols, &mut queue);
    check_program(program, interner, &types, &mut queue);
    tracing::debug!(
        errors = queue.error_count(),
        warnings = queue.warning_count(),
        "analysis finished"
    );
    Analysis {
        types,
        diagnostics: queue.into_diagnostics(),
    }
}

fn run_with(
    program: &Program,
    interner: &StringInterner,
    config: &DiagnosticConfig,
    print_handler: &SharedPrintHandler,
) -> Result<RunOutput, RunError> {
    let analysis = analyze_with(program, interner, config);
    if analysis.has_errors() {
        return Err(RunError::Rejected(analysis.diagnostics));
    }
    let mut interpreter = InterpreterBuilder::new(interner, program)
        .print_handler(print_handler.clone())
        .build();
    let value = interpreter.run()?;
    Ok(RunOutput {
        diagnostics: analysis.diagnostics,
        output: print_handler.take_output(),
        value,
    })
}
