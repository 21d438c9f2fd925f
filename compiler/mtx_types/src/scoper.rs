//! First semantic pass: scopes, name resolution and type inference.
//!
//! One depth-first walk over the program. Branch and loop bodies get their
//! own scope, created once per block statement. Every expression gets a
//! type in the [`TypeTable`]; applications pick the first accepting
//! overload and run shape factories. Problems are reported and the walk
//! continues with `Undefined` in place of the missing type.

use mtx_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, Phase};
use mtx_ir::{
    ExprArena, ExprId, ExprKind, Literal, Name, Program, Span, StmtId, StmtKind, StringInterner,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::{CallArgs, FunctionType, OutcomeKind, Symbol, SymbolTable, Type, TypeTable};

const PHASE: Phase = Phase::Scoper;

/// Run the Scoper over `program`, returning the inferred types.
///
/// `symbols` should be positioned at its global scope; it is left there.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_program<S: DiagnosticSink>(
    program: &Program,
    interner: &StringInterner,
    symbols: &mut SymbolTable,
    sink: &mut S,
) -> TypeTable {
    let mut scoper = Scoper::new(&program.arena, interner, symbols, sink);
    for &stmt in &program.body {
        scoper.stmt(stmt);
    }
    scoper.finish()
}

pub struct Scoper<'a, S: DiagnosticSink> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    symbols: &'a mut SymbolTable,
    types: TypeTable,
    sink: &'a mut S,
}

impl<'a, S: DiagnosticSink> Scoper<'a, S> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        symbols: &'a mut SymbolTable,
        sink: &'a mut S,
    ) -> Self {
        Scoper {
            arena,
            interner,
            symbols,
            types: TypeTable::for_arena(arena),
            sink,
        }
    }

    pub fn finish(self) -> TypeTable {
        self.types
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Visit `body` inside the scope of that block statement.
    fn scoped(&mut self, body: StmtId, in_loop: Option<bool>) {
        self.symbols.enter_block(body, in_loop);
        self.stmt(body);
        self.symbols.pop_scope();
    }

    pub fn stmt(&mut self, id: StmtId) {
        let arena = self.arena;
        let stmt = arena.stmt(id);
        match &stmt.kind {
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(*cond);
                self.scoped(*then_branch, None);
                if let Some(else_branch) = else_branch {
                    self.scoped(*else_branch, None);
                }
            }
            StmtKind::While { cond, body } => {
                self.expr(*cond);
                self.scoped(*body, Some(true));
            }
            StmtKind::For { var, range, body } => self.for_loop(*var, *range, *body),
            StmtKind::Break => self.loop_control("break", stmt.span),
            StmtKind::Continue => self.loop_control("continue", stmt.span),
            StmtKind::Assign { target, value } => self.assign(*target, *value, stmt.span),
            StmtKind::Expr(expr) => {
                self.expr(*expr);
            }
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

    fn for_loop(&mut self, var: ExprId, range: ExprId, body: StmtId) {
        let range_ty = self.expr(range);
        let var_ty = if range_ty == Type::Range {
            Type::Int
        } else {
            Type::Undefined
        };

        let var_expr = self.arena.expr(var);
        let shadowed = match var_expr.kind {
            ExprKind::Ident(name) => self.symbols.lookup(name).map(|symbol| symbol.ty.clone()),
            _ => None,
        };
        self.symbols.enter_block(body, Some(true));
        if let ExprKind::Ident(name) = var_expr.kind {
            let _ = self
                .symbols
                .declare(Symbol::new(name, var_ty.clone(), var_expr.span));
            if let Some(previous) = shadowed.filter(|previous| *previous != var_ty) {
                self.redeclared(name, &previous, &var_ty, var_expr.span);
            }
        }
        self.types.set(var, var_ty);
        self.stmt(body);
        self.symbols.pop_scope();
    }

    fn loop_control(&mut self, keyword: &str, span: Span) {
        if !self.symbols.in_loop() {
            self.sink.error(
                PHASE,
                ErrorCode::ControlFlowMisuse,
                format!("`{keyword}` outside of a loop"),
                span,
            );
        }
    }

    fn assign(&mut self, target: ExprId, value: ExprId, span: Span) {
        let ty = self.expr(value);
        let target_expr = self.arena.expr(target);
        match target_expr.kind {
            ExprKind::Ident(name) => {
                self.types.set(target, ty.clone());
                match self.symbols.rebind(name, ty.clone()) {
                    Some(previous) if previous != ty => self.redeclared(name, &previous, &ty, span),
                    Some(_) => {}
                    None => {
                        let _ = self.symbols.declare(Symbol::new(name, ty, target_expr.span));
                    }
                }
            }
            // Element stores keep the container's type.
            ExprKind::MatrixRef { .. } | ExprKind::VectorRef { .. } => {
                self.expr(target);
            }
            _ => {
                self.sink.error(
                    PHASE,
                    ErrorCode::TypeMismatch,
                    "invalid assignment target",
                    target_expr.span,
                );
            }
        }
    }

    fn redeclared(&mut self, name: Name, previous: &Type, ty: &Type, span: Span) {
        let diagnostic = Diagnostic::warning(PHASE, ErrorCode::Redeclaration)
            .with_message(format!("`{}` redeclared as {ty}", self.name(name)))
            .with_span(span)
            .with_note(format!("previous type was {previous}"));
        self.sink.report(diagnostic);
    }

    /// Infer the type of `id`, record it and return it.
    pub fn expr(&mut self, id: ExprId) -> Type {
        let arena = self.arena;
        let expr = arena.expr(id);
        let ty = match &expr.kind {
            ExprKind::Literal(lit) => match lit {
                Literal::Int(_) => Type::Int,
                Literal::Float(_) => Type::Float,
                Literal::Bool(_) => Type::Bool,
                Literal::Str(_) => Type::Str,
            },
            ExprKind::Ident(name) => match self.symbols.lookup(*name) {
                Some(symbol) => symbol.ty.clone(),
                None => {
                    let message = format!("undefined variable `{}`", self.name(*name));
                    self.sink
                        .error(PHASE, ErrorCode::UndefinedSymbol, message, expr.span);
                    Type::Undefined
                }
            },
            ExprKind::MatrixRef { matrix, row, col } => {
                let base = self.expr(*matrix);
                self.expr(*row);
                self.expr(*col);
                element_type(base.is_matrix())
            }
            ExprKind::VectorRef { vector, element } => {
                let base = self.expr(*vector);
                self.expr(*element);
                element_type(base.is_vector())
            }
            ExprKind::Apply { callee, args } => self.apply(*callee, args, expr.span),
            ExprKind::Range { start, end } => {
                self.range_bound(*start);
                self.range_bound(*end);
                Type::Range
            }
        };
        self.types.set(id, ty.clone());
        ty
    }

    /// A bound that is a bare variable must be an integer. Element values
    /// (`numeric`) are left for the checker.
    fn range_bound(&mut self, bound: ExprId) {
        let ty = self.expr(bound);
        let expr = self.arena.expr(bound);
        if let ExprKind::Ident(name) = expr.kind {
            if !matches!(ty, Type::Int | Type::Numeric | Type::Undefined) {
                let message = format!("range bound `{}` must be int, found {ty}", self.name(name));
                self.sink
                    .error(PHASE, ErrorCode::TypeMismatch, message, expr.span);
            }
        }
    }

    fn apply(&mut self, callee: ExprId, args: &[ExprId], span: Span) -> Type {
        let callee_ty = self.expr(callee);
        let arg_types: SmallVec<[Type; 4]> = args.iter().map(|&arg| self.expr(arg)).collect();

        let selected = match &callee_ty {
            Type::OverloadSet(overloads) => {
                let found = overloads.iter().position(|f| f.params.takes(&arg_types));
                debug!(callee = self.callee_name(callee), ?found, "overload selection");
                match found {
                    Some(index) => overloads[index].clone(),
                    None => {
                        self.types.set(callee, Type::Undefined);
                        return Type::Undefined;
                    }
                }
            }
            Type::Function(function) if function.params.takes(&arg_types) => (**function).clone(),
            // Non-matching or non-callable callees are left for the checker.
            _ => return Type::Undefined,
        };

        let resolved = self.resolve(&selected, args, span);
        let result = resolved.result_type();
        self.types.set(callee, Type::function(resolved));
        result
    }

    /// Fix a factory result for this call, reporting shape problems.
    fn resolve(&mut self, function: &FunctionType, args: &[ExprId], span: Span) -> FunctionType {
        if function.is_final() {
            return function.clone();
        }
        let outcome = function.resolve(&CallArgs::new(self.arena, &self.types, args));
        let (resolved, kind, messages) = outcome.into_parts();
        debug!(?kind, result = %resolved.result_type(), "shape factory");
        let code = match kind {
            OutcomeKind::Success => return resolved,
            OutcomeKind::Warning => ErrorCode::ShapeUnknown,
            OutcomeKind::Failure => ErrorCode::ShapeMismatch,
        };
        for message in messages {
            if code.is_warning() {
                self.sink.warn(PHASE, code, message, span);
            } else {
                self.sink.error(PHASE, code, message, span);
            }
        }
        resolved
    }

    fn callee_name(&self, callee: ExprId) -> &'static str {
        match self.arena.expr(callee).kind {
            ExprKind::Ident(name) => self.name(name),
            _ => "<callee>",
        }
    }
}

fn element_type(indexable: bool) -> Type {
    if indexable {
        Type::Numeric
    } else {
        Type::Undefined
    }
}
