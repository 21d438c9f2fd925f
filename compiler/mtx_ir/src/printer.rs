//! Indented debug dump of a program.
//!
//! One construct per line, children one level deeper, `"|  "` per level:
//!
//! ```text
//! FOR
//! |  i
//! |  RANGE
//! |  |  0
//! |  |  3
//! |  BODY
//! |  |  PRINT
//! |  |  |  ARGUMENTS
//! |  |  |  |  i
//! ```
//!
//! Read-only; no pass depends on it.

use crate::ast::{ExprKind, Literal, Program, StmtKind};
use crate::{ExprArena, ExprId, StmtId, StringLookup};

const INDENT: &str = "|  ";

/// Render every top-level statement of `program`.
pub fn print_program<L: StringLookup + ?Sized>(program: &Program, names: &L) -> String {
    let mut printer = TreePrinter::new(&program.arena, names);
    for &stmt in &program.body {
        printer.stmt(stmt, 0);
    }
    printer.finish()
}

pub struct TreePrinter<'a, L: StringLookup + ?Sized> {
    arena: &'a ExprArena,
    names: &'a L,
    out: String,
}

impl<'a, L: StringLookup + ?Sized> TreePrinter<'a, L> {
    pub fn new(arena: &'a ExprArena, names: &'a L) -> Self {
        TreePrinter {
            arena,
            names,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Statements of a branch or loop body. Blocks are flattened so the
    /// body reads as a list under its keyword.
    fn body(&mut self, id: StmtId, level: usize) {
        let arena = self.arena;
        if let StmtKind::Block(stmts) = &arena.stmt(id).kind {
            for &stmt in stmts {
                self.stmt(stmt, level);
            }
        } else {
            self.stmt(id, level);
        }
    }

    pub fn stmt(&mut self, id: StmtId, level: usize) {
        let arena = self.arena;
        match &arena.stmt(id).kind {
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(level, "IF");
                self.expr(*cond, level + 1);
                self.line(level, "THEN");
                self.body(*then_branch, level + 1);
                if let Some(else_branch) = else_branch {
                    self.line(level, "ELSE");
                    self.body(*else_branch, level + 1);
                }
            }
            StmtKind::While { cond, body } => {
                self.line(level, "WHILE");
                self.line(level + 1, "CONDITION");
                self.expr(*cond, level + 2);
                self.line(level + 1, "BODY");
                self.body(*body, level + 2);
            }
            StmtKind::For { var, range, body } => {
                self.line(level, "FOR");
                self.expr(*var, level + 1);
                self.line(level + 1, "RANGE");
                if let ExprKind::Range { start, end } = arena.expr(*range).kind {
                    self.expr(start, level + 2);
                    self.expr(end, level + 2);
                } else {
                    self.expr(*range, level + 2);
                }
                self.line(level + 1, "BODY");
                self.body(*body, level + 2);
            }
            StmtKind::Break => self.line(level, "BREAK"),
            StmtKind::Continue => self.line(level, "CONTINUE"),
            StmtKind::Assign { target, value } => {
                self.line(level, "=");
                self.expr(*target, level + 1);
                self.expr(*value, level + 1);
            }
            StmtKind::Expr(expr) => self.expr(*expr, level),
            StmtKind::Return(value) => {
                self.line(level, "RETURN");
                if let Some(value) = value {
                    self.expr(*value, level + 1);
                }
            }
            StmtKind::Block(stmts) => {
                self.line(level, "BLOCK");
                for &stmt in stmts {
                    self.stmt(stmt, level + 1);
                }
            }
        }
    }

    pub fn expr(&mut self, id: ExprId, level: usize) {
        let arena = self.arena;
        match &arena.expr(id).kind {
            ExprKind::Literal(lit) => {
                let text = match lit {
                    Literal::Int(n) => n.to_string(),
                    Literal::Float(x) => format!("{x:?}"),
                    Literal::Bool(b) => b.to_string(),
                    Literal::Str(s) => self.names.lookup(*s).to_owned(),
                };
                self.line(level, &text);
            }
            ExprKind::Ident(name) => {
                let text = self.names.lookup(*name).to_owned();
                self.line(level, &text);
            }
            ExprKind::MatrixRef { matrix, row, col } => {
                self.line(level, "MATRIXREF");
                self.line(level + 1, "ARGUMENTS");
                self.expr(*matrix, level + 2);
                self.expr(*row, level + 2);
                self.expr(*col, level + 2);
            }
            ExprKind::VectorRef { vector, element } => {
                self.line(level, "VECTORREF");
                self.line(level + 1, "ARGUMENTS");
                self.expr(*vector, level + 2);
                self.expr(*element, level + 2);
            }
            ExprKind::Apply { callee, args } => {
                let head = match arena.expr(*callee).kind {
                    ExprKind::Ident(name) => self.names.lookup(name).to_owned(),
                    _ => "APPLY".to_owned(),
                };
                self.line(level, &head);
                self.line(level + 1, "ARGUMENTS");
                for &arg in args {
                    self.expr(arg, level + 2);
                }
            }
            ExprKind::Range { start, end } => {
                self.line(level, "RANGE");
                self.expr(*start, level + 1);
                self.expr(*end, level + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests;
