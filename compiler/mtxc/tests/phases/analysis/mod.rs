//! Whole-program analysis: what the Scoper and Type Checker report together.

use mtx_diagnostic::{ErrorCode, Phase};
use mtx_ir::Span;
use mtx_types::Type;
use mtxc::{analyze, RunError, Session};
use pretty_assertions::assert_eq;

use crate::common::{codes, int_matrix, print, program, range};

#[test]
fn loop_variable_is_out_of_scope_after_loop() {
    let session = Session::new();
    let program = program(&session, |b| {
        b.at(1);
        let range = range(b, 0, 3);
        let i = b.ident("i");
        let inner = print(b, vec![i]);
        let body = b.block(vec![inner]);
        let for_ = b.for_("i", range, body);
        b.at(2);
        let i = b.ident("i");
        let after = print(b, vec![i]);
        vec![for_, after]
    });

    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::UndefinedSymbol]);
    let diag = &analysis.diagnostics[0];
    assert_eq!(diag.phase, Phase::Scoper);
    assert_eq!(diag.span, Span::line(2));
    assert_eq!(diag.message, "undefined variable `i`");

    assert!(matches!(session.run(&program), Err(RunError::Rejected(_))));
}

#[test]
fn rebinding_to_a_matrix_warns_but_runs() {
    let session = Session::new();
    let program = program(&session, |b| {
        let one = b.int(1);
        let x = b.assign_var("x", one);
        let three = b.int(3);
        let eye = b.apply("eye", vec![three]);
        let rebind = b.assign_var("x", eye);
        vec![x, rebind]
    });

    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::Redeclaration]);
    assert!(!analysis.has_errors());
    let diag = &analysis.diagnostics[0];
    assert_eq!(diag.message, "`x` redeclared as matrix[3x3]");
    assert_eq!(diag.notes, vec!["previous type was int".to_string()]);

    let output = session.run(&program).unwrap();
    assert_eq!(codes(&output.diagnostics), vec![ErrorCode::Redeclaration]);
}

#[test]
fn incompatible_matrix_product_is_rejected() {
    let session = Session::new();
    let program = program(&session, |b| {
        let (two, three) = (b.int(2), b.int(3));
        let a = b.apply("zeros", vec![two]);
        let c = b.apply("zeros", vec![three]);
        let product = b.binary("*", a, c);
        vec![b.assign_var("p", product)]
    });

    let analysis = session.analyze(&program);
    let reported: Vec<_> = analysis
        .diagnostics
        .iter()
        .map(|d| (d.phase, d.code))
        .collect();
    assert_eq!(
        reported,
        vec![
            (Phase::Scoper, ErrorCode::ShapeMismatch),
            (Phase::Scoper, ErrorCode::ShapeMismatch),
            (Phase::TypeChecker, ErrorCode::TypeMismatch),
        ]
    );

    match session.run(&program) {
        Err(RunError::Rejected(diagnostics)) => {
            assert_eq!(diagnostics.len(), analysis.diagnostics.len());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn matrix_literal_shape_is_inferred() {
    let session = Session::new();
    let mut literal = None;
    let program = program(&session, |b| {
        let m = int_matrix(b, &[&[1, 2, 3], &[4, 5, 6]]);
        literal = Some(m);
        let transposed = b.unary("'", m);
        let t = b.assign_var("t", transposed);
        vec![t]
    });

    let analysis = analyze(&program, session.interner());
    assert!(analysis.diagnostics.is_empty());
    assert_eq!(analysis.types.get(literal.unwrap()), &Type::matrix(2, 3));
}

#[test]
fn ragged_matrix_literal_is_rejected() {
    let session = Session::new();
    let program = program(&session, |b| {
        let m = int_matrix(b, &[&[1, 2], &[3]]);
        vec![b.assign_var("m", m)]
    });
    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::ShapeMismatch]);
}

#[test]
fn break_outside_loop_is_rejected() {
    let session = Session::new();
    let program = program(&session, |b| {
        b.at(4);
        vec![b.break_()]
    });
    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::ControlFlowMisuse]);
    assert_eq!(
        analysis.diagnostics[0].to_string(),
        "error[E2003] scoper:4: `break` outside of a loop"
    );
}

#[test]
fn non_literal_size_warns_and_runs() {
    let session = Session::new();
    let program = program(&session, |b| {
        let two = b.int(2);
        let n = b.assign_var("n", two);
        let arg = b.ident("n");
        let zeros = b.apply("zeros", vec![arg]);
        let m = b.assign_var("m", zeros);
        let var = b.ident("m");
        let out = print(b, vec![var]);
        vec![n, m, out]
    });

    let output = session.run(&program).unwrap();
    assert_eq!(codes(&output.diagnostics), vec![ErrorCode::ShapeUnknown]);
    assert_eq!(output.output, "[[0, 0], [0, 0]]\n");
}

#[test]
fn both_passes_report_in_one_run() {
    let session = Session::new();
    let program = program(&session, |b| {
        b.at(1);
        let undefined = b.ident("missing");
        let first = print(b, vec![undefined]);
        b.at(2);
        let one = b.int(1);
        let body = b.block(vec![]);
        let if_ = b.if_(one, body, None);
        vec![first, if_]
    });

    let analysis = session.analyze(&program);
    assert_eq!(
        codes(&analysis.diagnostics),
        vec![ErrorCode::UndefinedSymbol, ErrorCode::TypeMismatch]
    );
    assert_eq!(analysis.diagnostics[1].phase, Phase::TypeChecker);
    assert_eq!(
        analysis.diagnostics[1].message,
        "condition must be bool, found int"
    );
    assert_eq!(analysis.errors().count(), 2);
    assert_eq!(analysis.warnings().count(), 0);
}

#[test]
fn wrong_argument_types_are_rejected() {
    let session = Session::new();
    let program = program(&session, |b| {
        let (text, flag) = (b.string("a"), b.bool(true));
        let sum = b.binary("+", text, flag);
        vec![b.assign_var("s", sum)]
    });

    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::UndefinedFunction]);
    assert_eq!(
        analysis.diagnostics[0].message,
        "no overload of `+` accepts (string, bool)"
    );
}

#[test]
fn error_limit_keeps_the_first_errors() {
    let session = Session::new().with_config(mtx_diagnostic::DiagnosticConfig::with_error_limit(1));
    let program = program(&session, |b| {
        let (x, y) = (b.ident("x"), b.ident("y"));
        vec![print(b, vec![x]), print(b, vec![y])]
    });

    let analysis = session.analyze(&program);
    assert_eq!(codes(&analysis.diagnostics), vec![ErrorCode::UndefinedSymbol]);
    assert!(analysis.diagnostics[0].message.contains("`x`"));
}

#[test]
fn dump_renders_the_tree() {
    let session = Session::new();
    let program = program(&session, |b| {
        let one = b.int(1);
        vec![b.assign_var("x", one)]
    });
    let dump = session.dump(&program);
    assert!(dump.contains('='));
    assert!(dump.contains('x'));
}
