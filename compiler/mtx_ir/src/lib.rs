//! mtx IR - syntax tree types shared by every pass.
//!
//! This crate contains:
//! - Spans for source locations
//! - Names for interned identifiers
//! - AST nodes (`Expr`, `Stmt`) in a flat arena
//! - `AstBuilder`, the construction surface for parsers and tests
//! - `TreePrinter`, an indented debug dump
//!
//! # Design
//!
//! - **Intern names**: identifiers are `Name(u32)`
//! - **Flatten the tree**: no `Box<Expr>`, children are `ExprId`/`StmtId` indices
//! - **Immutable nodes**: pass results live in side tables keyed by node ID

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
pub mod printer;
mod span;

pub use arena::{AstBuilder, ExprArena};
pub use ast::{Expr, ExprKind, Literal, Program, Stmt, StmtKind};
pub use expr_id::{ExprId, StmtId};
pub use interner::{InternError, StringInterner, StringLookup};
pub use name::Name;
pub use printer::{print_program, TreePrinter};
pub use span::Span;
