//! AST node definitions.
//!
//! The tree is a closed set of node kinds. Expressions and statements live
//! in separate arena vectors and refer to children by [`ExprId`] / [`StmtId`].
//! Nodes are immutable once built; per-pass results (inferred types, scopes)
//! are kept in side tables keyed by node ID.

use std::fmt;

use crate::{ExprId, Name, Span, StmtId};

/// Literal values.
///
/// Floats are stored as `f64`; the tree is never hashed, so there is no
/// need for a bit-pattern representation.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Name),
}

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// `42`, `1.5`, `true`, `"text"`
    Literal(Literal),

    /// Reference to a named symbol: variable, builtin function or operator.
    Ident(Name),

    /// `matrix[row, col]`
    MatrixRef {
        matrix: ExprId,
        row: ExprId,
        col: ExprId,
    },

    /// `vector[element]`
    VectorRef { vector: ExprId, element: ExprId },

    /// Function or operator application.
    ///
    /// `callee` is always an [`ExprKind::Ident`] when produced by the
    /// builder; operators are applications of their symbol (`+`, `.*`, `'`).
    Apply { callee: ExprId, args: Vec<ExprId> },

    /// Half-open integer range `start:end`.
    Range { start: ExprId, end: ExprId },
}

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `if cond { then } else { else }`; both branches are block statements.
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },

    /// `while cond { body }`
    While { cond: ExprId, body: StmtId },

    /// `for var = range { body }`; `var` is an `Ident` expression.
    For {
        var: ExprId,
        range: ExprId,
        body: StmtId,
    },

    Break,

    Continue,

    /// `target = value`; the target is an `Ident`, `MatrixRef` or `VectorRef`.
    Assign { target: ExprId, value: ExprId },

    /// Expression evaluated for its effect, e.g. `PRINT(x)`.
    Expr(ExprId),

    Return(Option<ExprId>),

    /// `{ stmt* }`
    Block(Vec<StmtId>),
}

/// A parsed program: the arena and its top-level statements in order.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub arena: crate::ExprArena,
    pub body: Vec<StmtId>,
}

impl Program {
    pub fn new(arena: crate::ExprArena, body: Vec<StmtId>) -> Self {
        Program { arena, body }
    }
}
