//! Second semantic pass: validate the inferred types.
//!
//! Reads the [`TypeTable`] the Scoper produced and reports conditions,
//! loop variables, indices and call arguments of the wrong type. The table
//! is never written.

use mtx_diagnostic::{DiagnosticSink, ErrorCode, Phase};
use mtx_ir::{ExprArena, ExprId, ExprKind, Program, Span, StmtId, StmtKind, StringInterner};

use crate::{FunctionType, Type, TypeTable};

const PHASE: Phase = Phase::TypeChecker;

/// Check `program` against the types inferred for it.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_program<S: DiagnosticSink>(
    program: &Program,
    interner: &StringInterner,
    types: &TypeTable,
    sink: &mut S,
) {
    let mut checker = TypeChecker::new(&program.arena, interner, types, sink);
    for &stmt in &program.body {
        checker.stmt(stmt);
    }
}

pub struct TypeChecker<'a, S: DiagnosticSink> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    types: &'a TypeTable,
    sink: &'a mut S,
}

impl<'a, S: DiagnosticSink> TypeChecker<'a, S> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        types: &'a TypeTable,
        sink: &'a mut S,
    ) -> Self {
        TypeChecker {
            arena,
            interner,
            types,
            sink,
        }
    }

    fn mismatch(&mut self, message: String, span: Span) {
        self.sink.error(PHASE, ErrorCode::TypeMismatch, message, span);
    }

    /// Human-readable name of `id` for messages.
    fn describe(&self, id: ExprId) -> String {
        match self.arena.expr(id).kind {
            ExprKind::Ident(name) => format!("`{}`", self.interner.lookup(name)),
            _ => "expression".to_owned(),
        }
    }

    pub fn stmt(&mut self, id: StmtId) {
        let arena = self.arena;
        match &arena.stmt(id).kind {
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.condition(*cond);
                self.stmt(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.stmt(*else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.condition(*cond);
                self.stmt(*body);
            }
            StmtKind::For { var, range, body } => {
                self.expr(*range);
                let ty = self.types.get(*var);
                if *ty != Type::Int {
                    let message =
                        format!("loop variable {} must be int, found {ty}", self.describe(*var));
                    self.mismatch(message, arena.expr(*var).span);
                }
                self.stmt(*body);
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Assign { target, value } => {
                self.expr(*target);
                self.expr(*value);
            }
            StmtKind::Expr(expr) => self.expr(*expr),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(*value);
                }
            }
            StmtKind::Block(stmts) => {
                for &stmt in stmts {
                    self.stmt(stmt);
                }
            }
        }
    }

    fn condition(&mut self, cond: ExprId) {
        self.expr(cond);
        let ty = self.types.get(cond);
        if *ty != Type::Bool {
            let message = format!("condition must be bool, found {ty}");
            let span = self.arena.expr(cond).span;
            self.mismatch(message, span);
        }
    }

    pub fn expr(&mut self, id: ExprId) {
        let arena = self.arena;
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
            ExprKind::MatrixRef { matrix, row, col } => {
                self.indexed(*matrix, Type::is_matrix, "matrix");
                self.index(*row);
                self.index(*col);
            }
            ExprKind::VectorRef { vector, element } => {
                self.indexed(*vector, Type::is_vector, "vector");
                self.index(*element);
            }
            ExprKind::Apply { callee, args } => {
                for &arg in args {
                    self.expr(arg);
                }
                self.apply(*callee, args, expr.span);
            }
            ExprKind::Range { start, end } => {
                for bound in [*start, *end] {
                    self.expr(bound);
                    self.int_operand(bound, "range bound");
                }
            }
        }
    }

    fn indexed(&mut self, base: ExprId, expected: fn(&Type) -> bool, kind: &str) {
        let ty = self.types.get(base);
        let span = self.arena.expr(base).span;
        if ty.is_undefined() {
            let message = format!("type of {} could not be inferred", self.describe(base));
            self.sink.warn(PHASE, ErrorCode::TypeUnknown, message, span);
        } else if !expected(ty) {
            let message = format!("{} is not a {kind}, found {ty}", self.describe(base));
            self.mismatch(message, span);
        }
    }

    fn index(&mut self, index: ExprId) {
        self.expr(index);
        self.int_operand(index, "index");
    }

    /// `id` must be an int. An element reference may hold either scalar
    /// kind, so `numeric` only warns.
    fn int_operand(&mut self, id: ExprId, what: &str) {
        let ty = self.types.get(id);
        let span = self.arena.expr(id).span;
        match ty {
            Type::Int | Type::Undefined => {}
            Type::Numeric => {
                let message = format!("{what} may not be int, found {ty}");
                self.sink.warn(PHASE, ErrorCode::TypeUnknown, message, span);
            }
            _ => self.mismatch(format!("{what} must be int, found {ty}"), span),
        }
    }

    fn apply(&mut self, callee: ExprId, args: &[ExprId], span: Span) {
        let types = self.types;
        match types.get(callee) {
            Type::Function(function) => self.arguments(callee, function, args, span),
            Type::Undefined | Type::OverloadSet(_) => {
                let found: Vec<String> = args.iter().map(|&arg| types.get(arg).to_string()).collect();
                let message = format!(
                    "no overload of {} accepts ({})",
                    self.describe(callee),
                    found.join(", ")
                );
                self.sink.error(PHASE, ErrorCode::UndefinedFunction, message, span);
            }
            other => {
                let message =
                    format!("{} is not callable, found {other}", self.describe(callee));
                self.mismatch(message, span);
            }
        }
    }

    fn arguments(&mut self, callee: ExprId, function: &FunctionType, args: &[ExprId], span: Span) {
        if let Some(arity) = function.params.arity() {
            if arity != args.len() {
                let message = format!(
                    "{} expects {arity} argument(s), found {}",
                    self.describe(callee),
                    args.len()
                );
                self.mismatch(message, span);
                return;
            }
        }
        for (position, &arg) in args.iter().enumerate() {
            let actual = self.types.get(arg);
            let Some(expected) = function.params.expected(position) else {
                continue;
            };
            if !expected.accepts(actual) {
                let message = format!(
                    "argument {} of {} expects {expected}, found {actual}",
                    position + 1,
                    self.describe(callee)
                );
                let span = self.arena.expr(arg).span;
                self.mismatch(message, span);
            }
        }
    }
}

#[cfg(test)]
mod tests;
