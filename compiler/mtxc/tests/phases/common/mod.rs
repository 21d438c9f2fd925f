//! Shared helpers for phase tests.

use mtx_diagnostic::{Diagnostic, ErrorCode};
use mtx_ir::{AstBuilder, ExprId, Program, StmtId};
use mtxc::Session;

/// Build a program with the session's interner.
pub fn program(
    session: &Session,
    body: impl FnOnce(&mut AstBuilder<'_>) -> Vec<StmtId>,
) -> Program {
    let mut builder = session.builder();
    let stmts = body(&mut builder);
    builder.finish(stmts)
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

/// `PRINT(args...)` as a statement.
pub fn print(b: &mut AstBuilder<'_>, args: Vec<ExprId>) -> StmtId {
    let call = b.apply("PRINT", args);
    b.expr_stmt(call)
}

/// `start:end` with literal bounds.
pub fn range(b: &mut AstBuilder<'_>, start: i64, end: i64) -> ExprId {
    let (start, end) = (b.int(start), b.int(end));
    b.range(start, end)
}

/// `[[rows...]...]` of integer literals.
pub fn int_matrix(b: &mut AstBuilder<'_>, rows: &[&[i64]]) -> ExprId {
    let rows = rows
        .iter()
        .map(|row| {
            let elements = row.iter().map(|&n| b.int(n)).collect();
            b.init(elements)
        })
        .collect();
    b.init(rows)
}
