//! Static semantics for mtx: types, scopes and the two analysis passes.
//!
//! - [`Type`], [`FunctionType`] and [`ShapeFactory`] describe values and
//!   builtin signatures, including results whose shape depends on the call
//! - [`Outcome`] carries a best-effort value through warnings and failures
//! - [`SymbolTable`] holds the lexical scopes, global builtins first
//! - [`resolve_program`] (the Scoper) infers a [`TypeTable`]
//! - [`check_program`] (the Type Checker) validates it without writing
//!
//! Both passes report through a [`mtx_diagnostic::DiagnosticSink`] and keep
//! going after a problem.

pub mod builtins;
mod checker;
mod function;
mod outcome;
mod scoper;
mod symbols;
mod ty;
mod type_table;

pub use checker::{check_program, TypeChecker};
pub use function::{CallArgs, FunctionType, InferShape, Params, ResultType, ShapeFactory};
pub use outcome::{Outcome, OutcomeKind};
pub use scoper::{resolve_program, Scoper};
pub use symbols::{ScopeId, Symbol, SymbolTable};
pub use ty::Type;
pub use type_table::TypeTable;
