//! Tree-walking interpreter.
//!
//! Statements execute to a [`Signal`] so `break`, `continue` and `return`
//! travel up the Rust call stack as values. Every block, branch and loop
//! iteration runs in its own frame; frames are pushed and popped by
//! [`ScopedInterpreter`] guards.

mod builder;
mod scope_guard;

use mtx_ir::{ExprArena, ExprId, ExprKind, Literal, Name, StmtId, StmtKind, StringInterner};
use smallvec::SmallVec;

use crate::errors::{
    control_flow_outside_loop, invalid_assignment_target, not_callable, type_mismatch,
    undefined_function, undefined_variable,
};
use crate::{BuiltinTable, Environment, EvalError, EvalResult, SharedPrintHandler, Value};

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Executes one program. Built with [`InterpreterBuilder`].
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    body: &'a [StmtId],
    pub(crate) env: Environment,
    builtins: BuiltinTable,
    print_handler: SharedPrintHandler,
}

impl<'a> Interpreter<'a> {
    /// Run the program's top-level statements in order.
    ///
    /// Returns the value of a top-level `return`, or `None` if the program
    /// ran to the end.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<Option<Value>, EvalError> {
        let arena = self.arena;
        for &stmt in self.body {
            let span = arena.stmt(stmt).span;
            match self.exec(stmt)? {
                Signal::Normal => {}
                Signal::Return(value) => return Ok(Some(value)),
                Signal::Break => return Err(control_flow_outside_loop("break").or_span(span)),
                Signal::Continue => {
                    return Err(control_flow_outside_loop("continue").or_span(span));
                }
            }
        }
        Ok(None)
    }

    /// Current value of a variable visible from the current frame.
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.interner.get(name).and_then(|name| self.env.get(name))
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Execute one statement.
    pub fn exec(&mut self, id: StmtId) -> Result<Signal, EvalError> {
        let stmt = self.arena.stmt(id);
        self.exec_inner(&stmt.kind).map_err(|err| err.or_span(stmt.span))
    }

    fn exec_inner(&mut self, kind: &'a StmtKind) -> Result<Signal, EvalError> {
        match kind {
            StmtKind::Block(stmts) => self.with_env_scope(|scoped| scoped.exec_seq(stmts)),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(*cond)?.expect_bool()? {
                    self.exec_scoped(*then_branch)
                } else if let Some(branch) = else_branch {
                    self.exec_scoped(*branch)
                } else {
                    Ok(Signal::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval(*cond)?.expect_bool()? {
                    match self.exec_scoped(*body)? {
                        Signal::Break => break,
                        Signal::Normal | Signal::Continue => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            StmtKind::For { var, range, body } => self.exec_for(*var, *range, *body),
            StmtKind::Break => Ok(Signal::Break),
            StmtKind::Continue => Ok(Signal::Continue),
            StmtKind::Assign { target, value } => {
                self.assign(*target, *value)?;
                Ok(Signal::Normal)
            }
            StmtKind::Expr(expr) => {
                self.eval(*expr)?;
                Ok(Signal::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(*expr)?,
                    None => Value::Unit,
                };
                Ok(Signal::Return(value))
            }
        }
    }

    /// Run statements in order until one does not finish normally.
    fn exec_seq(&mut self, stmts: &[StmtId]) -> Result<Signal, EvalError> {
        for &stmt in stmts {
            match self.exec(stmt)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    /// Execute `id` in a fresh frame. Blocks push their own.
    fn exec_scoped(&mut self, id: StmtId) -> Result<Signal, EvalError> {
        match self.arena.stmt(id).kind {
            StmtKind::Block(_) => self.exec(id),
            _ => self.with_env_scope(|scoped| scoped.exec(id)),
        }
    }

    /// `for var = start:end`: the variable is declared once in the current
    /// frame, each iteration gets its own frame below it.
    fn exec_for(&mut self, var: ExprId, range: ExprId, body: StmtId) -> Result<Signal, EvalError> {
        let name = self.ident_name(var).ok_or_else(invalid_assignment_target)?;
        let (start, end) = match self.eval(range)? {
            Value::Range { start, end } => (start, end),
            other => return Err(type_mismatch("range", &other)),
        };
        tracing::trace!(start, end, "for loop");
        self.env.create(name, None);
        for i in start..end {
            self.env.update(name, Value::Int(i));
            match self.exec_scoped(body)? {
                Signal::Break => break,
                Signal::Normal | Signal::Continue => {}
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn assign(&mut self, target: ExprId, value: ExprId) -> Result<(), EvalError> {
        match &self.arena.expr(target).kind {
            ExprKind::Ident(name) => {
                let value = self.eval(value)?;
                self.env.assign(*name, value);
                Ok(())
            }
            ExprKind::MatrixRef { matrix, row, col } => {
                let name = self
                    .ident_name(*matrix)
                    .ok_or_else(invalid_assignment_target)?;
                let row = self.eval(*row)?.expect_int()?;
                let col = self.eval(*col)?.expect_int()?;
                let scalar = self.eval(value)?.expect_scalar()?;
                self.store(name, |slot| match slot {
                    Value::Matrix(m) => m.set(row, col, scalar),
                    other => Err(type_mismatch("matrix", other)),
                })
            }
            ExprKind::VectorRef { vector, element } => {
                let name = self
                    .ident_name(*vector)
                    .ok_or_else(invalid_assignment_target)?;
                let index = self.eval(*element)?.expect_int()?;
                let scalar = self.eval(value)?.expect_scalar()?;
                self.store(name, |slot| match slot {
                    Value::Vector(v) => v.set(index, scalar),
                    other => Err(type_mismatch("vector", other)),
                })
            }
            _ => Err(invalid_assignment_target()),
        }
    }

    /// Modify the stored value of `name` in place.
    fn store(
        &mut self,
        name: Name,
        f: impl FnOnce(&mut Value) -> Result<(), EvalError>,
    ) -> Result<(), EvalError> {
        self.env
            .with_value_mut(name, f)
            .unwrap_or_else(|| Err(undefined_variable(self.interner.lookup(name))))
    }

    /// Evaluate one expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        let expr = self.arena.expr(id);
        self.eval_inner(&expr.kind)
            .map_err(|err| err.or_span(expr.span))
    }

    fn eval_inner(&mut self, kind: &'a ExprKind) -> EvalResult {
        match kind {
            ExprKind::Literal(literal) => Ok(self.literal(*literal)),
            ExprKind::Ident(name) => self
                .env
                .get(*name)
                .ok_or_else(|| undefined_variable(self.interner.lookup(*name))),
            ExprKind::MatrixRef { matrix, row, col } => {
                let base = self.eval(*matrix)?;
                let row = self.eval(*row)?.expect_int()?;
                let col = self.eval(*col)?.expect_int()?;
                match base {
                    Value::Matrix(m) => m.get(row, col).map(Value::from),
                    other => Err(type_mismatch("matrix", &other)),
                }
            }
            ExprKind::VectorRef { vector, element } => {
                let base = self.eval(*vector)?;
                let index = self.eval(*element)?.expect_int()?;
                match base {
                    Value::Vector(v) => v.get(index).map(Value::from),
                    other => Err(type_mismatch("vector", &other)),
                }
            }
            ExprKind::Apply { callee, args } => self.apply(*callee, args),
            ExprKind::Range { start, end } => Ok(Value::Range {
                start: self.eval(*start)?.expect_int()?,
                end: self.eval(*end)?.expect_int()?,
            }),
        }
    }

    fn literal(&self, literal: Literal) -> Value {
        match literal {
            Literal::Int(n) => Value::Int(n),
            Literal::Float(x) => Value::Float(x),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Str(name) => Value::Str(self.interner.lookup(name).to_owned()),
        }
    }

    /// Call the builtin named by `callee` with the evaluated arguments.
    fn apply(&mut self, callee: ExprId, args: &[ExprId]) -> EvalResult {
        let Some(callee) = self.ident_name(callee) else {
            return Err(not_callable("expression"));
        };
        let name = self.interner.lookup(callee);
        let Some(function) = self.builtins.get(name) else {
            if self.env.contains(callee) {
                return Err(not_callable(name));
            }
            return Err(undefined_function(name));
        };
        let values = args
            .iter()
            .map(|&arg| self.eval(arg))
            .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
        tracing::trace!(function = name, args = values.len(), "call builtin");
        function(&values, &self.print_handler)
    }

    fn ident_name(&self, id: ExprId) -> Option<Name> {
        match self.arena.expr(id).kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}
