use mtx_diagnostic::{Diagnostic, ErrorCode, Phase};
use mtx_ir::{AstBuilder, Span, StmtId, StringInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::{resolve_program, Params, SymbolTable};

/// Scoper diagnostics, then checker diagnostics, plus the table.
fn analyze(
    body: impl FnOnce(&mut AstBuilder<'_>) -> Vec<StmtId>,
) -> (Vec<Diagnostic>, Vec<Diagnostic>, TypeTable) {
    let interner = StringInterner::new();
    let mut builder = AstBuilder::new(&interner);
    let stmts = body(&mut builder);
    let program = builder.finish(stmts);

    let mut symbols = SymbolTable::with_builtins(&interner);
    let mut scoped = Vec::new();
    let types = resolve_program(&program, &interner, &mut symbols, &mut scoped);
    let mut checked = Vec::new();
    check_program(&program, &interner, &types, &mut checked);
    (scoped, checked, types)
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn well_typed_program_is_clean() {
    let (scoped, checked, _) = analyze(|b| {
        let (start, end) = (b.int(0), b.int(3));
        let range = b.range(start, end);
        let i = b.ident("i");
        let two = b.int(2);
        let cond = b.binary("<", i, two);
        let i = b.ident("i");
        let print = b.apply("PRINT", vec![i]);
        let print = b.expr_stmt(print);
        let then = b.block(vec![print]);
        let branch = b.if_(cond, then, None);
        let body = b.block(vec![branch]);
        vec![b.for_("i", range, body)]
    });
    assert!(scoped.is_empty());
    assert!(checked.is_empty());
}

#[test]
fn condition_must_be_bool() {
    let (_, checked, _) = analyze(|b| {
        let cond = b.at(3).int(1);
        let body = b.block(Vec::new());
        vec![b.while_(cond, body)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(checked[0].phase, Phase::TypeChecker);
    assert_eq!(checked[0].span, Span::line(3));
}

#[test]
fn loop_over_non_range_is_rejected() {
    let (_, checked, _) = analyze(|b| {
        let five = b.int(5);
        let body = b.block(Vec::new());
        vec![b.for_("i", five, body)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert!(checked[0].message.contains("loop variable `i`"));
}

#[test]
fn no_accepting_overload_is_undefined_function() {
    let (scoped, checked, _) = analyze(|b| {
        let text = b.string("a");
        let flag = b.bool(true);
        let sum = b.binary("+", text, flag);
        vec![b.expr_stmt(sum)]
    });
    assert!(scoped.is_empty());
    assert_eq!(codes(&checked), vec![ErrorCode::UndefinedFunction]);
    assert_eq!(
        checked[0].message,
        "no overload of `+` accepts (string, bool)"
    );
}

#[test]
fn unknown_function_is_reported_by_both_passes() {
    let (scoped, checked, _) = analyze(|b| {
        let one = b.int(1);
        let call = b.apply("frobnicate", vec![one]);
        vec![b.expr_stmt(call)]
    });
    assert_eq!(codes(&scoped), vec![ErrorCode::UndefinedSymbol]);
    assert_eq!(codes(&checked), vec![ErrorCode::UndefinedFunction]);
}

#[test]
fn wrong_arity_on_single_signature() {
    let (_, checked, _) = analyze(|b| {
        let (one, two) = (b.int(1), b.int(2));
        let call = b.apply("eye", vec![one, two]);
        vec![b.expr_stmt(call)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(checked[0].message, "`eye` expects 1 argument(s), found 2");
}

#[test]
fn wrong_argument_type_on_single_signature() {
    let (_, checked, _) = analyze(|b| {
        let half = b.float(0.5);
        let call = b.apply("zeros", vec![half]);
        vec![b.expr_stmt(call)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(
        checked[0].message,
        "argument 1 of `zeros` expects int, found float"
    );
}

#[test]
fn calling_a_variable_is_rejected() {
    let (_, checked, _) = analyze(|b| {
        let one = b.int(1);
        let x = b.assign_var("x", one);
        let arg = b.int(2);
        let call = b.apply("x", vec![arg]);
        vec![x, b.expr_stmt(call)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(checked[0].message, "`x` is not callable, found int");
}

#[test]
fn indexing_unknown_base_warns() {
    let (scoped, checked, _) = analyze(|b| {
        let (row, col) = (b.int(0), b.int(0));
        let element = b.matrix_ref("missing", row, col);
        vec![b.expr_stmt(element)]
    });
    assert_eq!(codes(&scoped), vec![ErrorCode::UndefinedSymbol]);
    assert_eq!(codes(&checked), vec![ErrorCode::TypeUnknown]);
    assert!(checked[0].is_warning());
}

#[test]
fn indexing_wrong_container_is_mismatch() {
    let (_, checked, _) = analyze(|b| {
        let elems = vec![b.int(1), b.int(2)];
        let v = b.init(elems);
        let v = b.assign_var("v", v);
        let (row, col) = (b.int(0), b.int(1));
        let element = b.matrix_ref("v", row, col);
        vec![v, b.expr_stmt(element)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(checked[0].message, "`v` is not a matrix, found vector[2]");
}

#[test]
fn index_must_be_int() {
    let (_, checked, _) = analyze(|b| {
        let elems = vec![b.int(1), b.int(2)];
        let v = b.init(elems);
        let v = b.assign_var("v", v);
        let index = b.float(1.0);
        let element = b.vector_ref("v", index);
        vec![v, b.expr_stmt(element)]
    });
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
}

#[test]
fn checker_leaves_table_untouched() {
    let interner = StringInterner::new();
    let mut builder = AstBuilder::new(&interner);
    let cond = builder.int(1);
    let body = builder.block(Vec::new());
    let stmt = builder.while_(cond, body);
    let program = builder.finish(vec![stmt]);

    let mut symbols = SymbolTable::with_builtins(&interner);
    let mut sink = Vec::new();
    let types = resolve_program(&program, &interner, &mut symbols, &mut sink);
    let before = types.clone();
    check_program(&program, &interner, &types, &mut sink);
    assert_eq!(types, before);
}

#[test]
fn resolved_callee_is_rechecked() {
    let interner = StringInterner::new();
    let mut builder = AstBuilder::new(&interner);
    let arg = builder.bool(true);
    let call = builder.apply("f", vec![arg]);
    let stmt = builder.expr_stmt(call);
    let program = builder.finish(vec![stmt]);

    let ExprKind::Apply { callee, .. } = program.arena.expr(call).kind.clone() else {
        panic!("expected an application");
    };
    let mut types = TypeTable::for_arena(&program.arena);
    types.set(arg, Type::Bool);
    types.set(
        callee,
        Type::function(FunctionType::new(Params::Unary(Type::Int), Type::Int)),
    );

    let mut sink = Vec::new();
    check_program(&program, &interner, &types, &mut sink);
    assert_eq!(codes(&sink), vec![ErrorCode::TypeMismatch]);
}

#[test]
fn element_value_as_index_or_bound_warns() {
    // v = [1, 2]; x = -v[0]; n = v[1]; for i = 0:n { PRINT(v[n]) }
    let (scoped, checked, _) = analyze(|b| {
        let elems = vec![b.int(1), b.int(2)];
        let v = b.init(elems);
        let v = b.assign_var("v", v);
        let index = b.int(0);
        let element = b.vector_ref("v", index);
        let negated = b.apply("UMINUS", vec![element]);
        let x = b.assign_var("x", negated);
        let index = b.int(1);
        let element = b.vector_ref("v", index);
        let n = b.assign_var("n", element);
        let index = b.at(4).ident("n");
        let element = b.vector_ref("v", index);
        let print = b.apply("PRINT", vec![element]);
        let print = b.expr_stmt(print);
        let body = b.block(vec![print]);
        let (start, end) = (b.at(3).int(0), b.ident("n"));
        let range = b.range(start, end);
        vec![v, x, n, b.for_("i", range, body)]
    });
    assert!(scoped.is_empty());
    assert_eq!(
        codes(&checked),
        vec![ErrorCode::TypeUnknown, ErrorCode::TypeUnknown]
    );
    assert!(checked.iter().all(Diagnostic::is_warning));
    assert_eq!(checked[0].message, "range bound may not be int, found numeric");
    assert_eq!(checked[0].span, Span::line(3));
    assert_eq!(checked[1].message, "index may not be int, found numeric");
    assert_eq!(checked[1].span, Span::line(4));
}

#[test]
fn disagreeing_elementwise_operand_is_mismatch() {
    // zeros(2) * zeros(3)
    let (scoped, checked, _) = analyze(|b| {
        let two = b.at(1).int(2);
        let a = b.apply("zeros", vec![two]);
        let three = b.at(2).int(3);
        let c = b.apply("zeros", vec![three]);
        let product = b.binary("*", a, c);
        vec![b.expr_stmt(product)]
    });
    assert_eq!(
        codes(&scoped),
        vec![ErrorCode::ShapeMismatch, ErrorCode::ShapeMismatch]
    );
    assert_eq!(codes(&checked), vec![ErrorCode::TypeMismatch]);
    assert_eq!(checked[0].phase, Phase::TypeChecker);
    assert_eq!(
        checked[0].message,
        "argument 2 of `*` expects matrix[2x2], found matrix[3x3]"
    );
}

#[test]
fn partly_known_elementwise_operands_pass() {
    // n = 2; zeros(2) .+ zeros(n)
    let (scoped, checked, _) = analyze(|b| {
        let two = b.int(2);
        let n = b.assign_var("n", two);
        let two = b.int(2);
        let a = b.apply("zeros", vec![two]);
        let arg = b.ident("n");
        let c = b.apply("zeros", vec![arg]);
        let sum = b.binary(".+", a, c);
        vec![n, b.expr_stmt(sum)]
    });
    assert!(scoped.iter().all(Diagnostic::is_warning));
    assert!(checked.is_empty());
}
