//! `InterpreterBuilder` for configuring an [`Interpreter`].

use mtx_ir::{Program, StringInterner};

use super::Interpreter;
use crate::{stdout_handler, BuiltinTable, Environment, SharedPrintHandler};

/// Builder for an interpreter over one program.
///
/// Defaults: the standard builtins, `PRINT` to stdout, an empty global
/// frame.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    program: &'a Program,
    env: Option<Environment>,
    builtins: Option<BuiltinTable>,
    print_handler: Option<SharedPrintHandler>,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, program: &'a Program) -> Self {
        Self {
            interner,
            program,
            env: None,
            builtins: None,
            print_handler: None,
        }
    }

    /// Start from an existing environment, e.g. one holding inputs.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Replace the builtin table.
    #[must_use]
    pub fn builtins(mut self, builtins: BuiltinTable) -> Self {
        self.builtins = Some(builtins);
        self
    }

    /// Set where `PRINT` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            arena: &self.program.arena,
            body: &self.program.body,
            env: self.env.unwrap_or_default(),
            builtins: self.builtins.unwrap_or_else(BuiltinTable::standard),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
        }
    }
}
