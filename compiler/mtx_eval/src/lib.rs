//! mtx Eval - tree-walking interpreter for checked mtx programs.
//!
//! # Architecture
//!
//! - `Environment`: runtime frames, one per executed block or iteration
//! - `Interpreter`: executes statements to a `Signal`, evaluates expressions
//!   to a `Value`
//! - `BuiltinTable`: runtime implementations of every operator and builtin
//!   function, looked up by name at each call
//! - `PrintHandlerImpl`: destination of `PRINT` output
//!
//! The interpreter does not consult static types. Operand checks are
//! repeated at runtime so an unchecked program fails with an [`EvalError`].

pub mod builtins;
mod environment;
pub mod errors;
pub mod interpreter;
mod print_handler;
mod value;

pub use builtins::{BuiltinFn, BuiltinTable};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter, Signal};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use value::{ArithOp, Matrix, Scalar, Value, Vector};
