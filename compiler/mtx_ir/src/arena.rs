//! Arena storage for AST nodes and the builder a parser drives.

use crate::ast::{Expr, ExprKind, Literal, Program, Stmt, StmtKind};
use crate::{ExprId, Span, StmtId, StringInterner};

/// Contiguous storage for every expression and statement of a program.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    ///
    /// # Panics
    /// Panics if the arena holds more than `u32::MAX - 1` expressions.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("expression arena overflow"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Allocate a statement, returning its ID.
    ///
    /// # Panics
    /// Panics if the arena holds more than `u32::MAX - 1` statements.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let index = u32::try_from(self.stmts.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("statement arena overflow"));
        self.stmts.push(stmt);
        StmtId::new(index)
    }

    /// # Panics
    /// Panics on an ID from another arena.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// # Panics
    /// Panics on an ID from another arena.
    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Number of allocated expressions; sizes per-expression side tables.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// The integer value of `id` if it is an integer literal.
    pub fn int_literal(&self, id: ExprId) -> Option<i64> {
        match self.expr(id).kind {
            ExprKind::Literal(Literal::Int(n)) => Some(n),
            _ => None,
        }
    }
}

/// Builds a [`Program`] node by node.
///
/// This is the surface the external parser targets; tests use it to write
/// programs directly. Every node gets the builder's current span, set
/// with [`AstBuilder::at`].
pub struct AstBuilder<'a> {
    arena: ExprArena,
    interner: &'a StringInterner,
    span: Span,
}

impl<'a> AstBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        AstBuilder {
            arena: ExprArena::new(),
            interner,
            span: Span::DUMMY,
        }
    }

    /// Set the source line for subsequently built nodes.
    pub fn at(&mut self, line: u32) -> &mut Self {
        self.span = Span::line(line);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.span;
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        let span = self.span;
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    // Expressions

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(value)))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Float(value)))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.expr(ExprKind::Literal(Literal::Str(name)))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Ident(name))
    }

    pub fn matrix_ref(&mut self, matrix: &str, row: ExprId, col: ExprId) -> ExprId {
        let matrix = self.ident(matrix);
        self.expr(ExprKind::MatrixRef { matrix, row, col })
    }

    pub fn vector_ref(&mut self, vector: &str, element: ExprId) -> ExprId {
        let vector = self.ident(vector);
        self.expr(ExprKind::VectorRef { vector, element })
    }

    /// Application of the function or operator named `callee`.
    pub fn apply(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.ident(callee);
        self.expr(ExprKind::Apply { callee, args })
    }

    /// Binary operator application, `lhs op rhs`.
    pub fn binary(&mut self, op: &str, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.apply(op, vec![lhs, rhs])
    }

    /// Unary operator application (`UMINUS`, `'`).
    pub fn unary(&mut self, op: &str, operand: ExprId) -> ExprId {
        self.apply(op, vec![operand])
    }

    /// `[a, b, c]` literal, which the language spells as `INIT(a, b, c)`.
    pub fn init(&mut self, elements: Vec<ExprId>) -> ExprId {
        self.apply("INIT", elements)
    }

    pub fn range(&mut self, start: ExprId, end: ExprId) -> ExprId {
        self.expr(ExprKind::Range { start, end })
    }

    // Statements

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Assign { target, value })
    }

    /// `name = value`
    pub fn assign_var(&mut self, name: &str, value: ExprId) -> StmtId {
        let target = self.ident(name);
        self.assign(target, value)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn if_(
        &mut self,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> StmtId {
        self.stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&mut self, cond: ExprId, body: StmtId) -> StmtId {
        self.stmt(StmtKind::While { cond, body })
    }

    pub fn for_(&mut self, var: &str, range: ExprId, body: StmtId) -> StmtId {
        let var = self.ident(var);
        self.stmt(StmtKind::For { var, range, body })
    }

    pub fn break_(&mut self) -> StmtId {
        self.stmt(StmtKind::Break)
    }

    pub fn continue_(&mut self) -> StmtId {
        self.stmt(StmtKind::Continue)
    }

    pub fn return_(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    /// Finish building, with `body` as the top-level statements.
    pub fn finish(self, body: Vec<StmtId>) -> Program {
        Program::new(self.arena, body)
    }
}
