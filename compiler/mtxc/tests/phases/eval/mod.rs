//! Programs that pass analysis and run.

use mtx_eval::{silent_handler, EvalErrorKind, Value};
use mtx_ir::Span;
use mtxc::{run, RunError, Session};
use pretty_assertions::assert_eq;

use crate::common::{int_matrix, print, program, range};

#[test]
fn nested_loops_fill_a_matrix() {
    // m = zeros(3); for i = 0:3 { for j = 0:3 { m[i, j] = i * 3 + j } }; PRINT(m)
    let session = Session::new();
    let program = program(&session, |b| {
        let three = b.int(3);
        let zeros = b.apply("zeros", vec![three]);
        let m = b.assign_var("m", zeros);

        let (i, j) = (b.ident("i"), b.ident("j"));
        let target = b.matrix_ref("m", i, j);
        let (i, three) = (b.ident("i"), b.int(3));
        let scaled = b.binary("*", i, three);
        let j = b.ident("j");
        let value = b.binary("+", scaled, j);
        let set = b.assign(target, value);
        let inner_body = b.block(vec![set]);
        let inner_range = range(b, 0, 3);
        let inner = b.for_("j", inner_range, inner_body);
        let outer_body = b.block(vec![inner]);
        let outer_range = range(b, 0, 3);
        let outer = b.for_("i", outer_range, outer_body);

        let var = b.ident("m");
        let out = print(b, vec![var]);
        vec![m, outer, out]
    });

    let output = session.run(&program).unwrap();
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.output, "[[0, 1, 2], [3, 4, 5], [6, 7, 8]]\n");
    assert_eq!(output.value, None);
}

#[test]
fn while_loop_with_break_and_continue() {
    // i = 0; while i < 6 { i = i + 1; if i == 2 { continue }; if i == 5 { break }; PRINT(i) }
    let session = Session::new();
    let program = program(&session, |b| {
        let zero = b.int(0);
        let init = b.assign_var("i", zero);

        let (i, one) = (b.ident("i"), b.int(1));
        let next = b.binary("+", i, one);
        let step = b.assign_var("i", next);
        let (i, two) = (b.ident("i"), b.int(2));
        let is_two = b.binary("==", i, two);
        let cont = b.continue_();
        let cont = b.block(vec![cont]);
        let skip = b.if_(is_two, cont, None);
        let (i, five) = (b.ident("i"), b.int(5));
        let is_five = b.binary("==", i, five);
        let brk = b.break_();
        let brk = b.block(vec![brk]);
        let stop = b.if_(is_five, brk, None);
        let i = b.ident("i");
        let out = print(b, vec![i]);
        let body = b.block(vec![step, skip, stop, out]);

        let (i, six) = (b.ident("i"), b.int(6));
        let cond = b.binary("<", i, six);
        vec![init, b.while_(cond, body)]
    });

    let output = session.run(&program).unwrap();
    assert_eq!(output.output, "1\n3\n4\n");
}

#[test]
fn loop_variable_keeps_its_last_value() {
    // i = 10; for i = 0:3 {}; PRINT(i)
    let session = Session::new();
    let program = program(&session, |b| {
        let ten = b.int(10);
        let init = b.assign_var("i", ten);
        let range = range(b, 0, 3);
        let body = b.block(Vec::new());
        let for_ = b.for_("i", range, body);
        let i = b.ident("i");
        let out = print(b, vec![i]);
        vec![init, for_, out]
    });

    let output = session.run(&program).unwrap();
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.output, "2\n");
}

#[test]
fn element_values_drive_arithmetic_and_loops() {
    // v = [3, 4]; x = -v[0]; n = v[1]; s = 0; for i = 0:n { s = s + i }; PRINT(x, s)
    let session = Session::new();
    let program = program(&session, |b| {
        let elements = vec![b.int(3), b.int(4)];
        let v = b.init(elements);
        let v = b.assign_var("v", v);
        let index = b.int(0);
        let first = b.vector_ref("v", index);
        let negated = b.apply("UMINUS", vec![first]);
        let x = b.assign_var("x", negated);
        let index = b.int(1);
        let second = b.vector_ref("v", index);
        let n = b.assign_var("n", second);
        let zero = b.int(0);
        let s = b.assign_var("s", zero);

        let (sum, i) = (b.ident("s"), b.ident("i"));
        let next = b.binary("+", sum, i);
        let step = b.assign_var("s", next);
        let body = b.block(vec![step]);
        let (start, end) = (b.int(0), b.ident("n"));
        let range = b.range(start, end);
        let for_ = b.for_("i", range, body);

        let (x_var, s_var) = (b.ident("x"), b.ident("s"));
        let out = print(b, vec![x_var, s_var]);
        vec![v, x, n, s, for_, out]
    });

    let output = session.run(&program).unwrap();
    assert!(output.diagnostics.iter().all(|d| d.is_warning()));
    assert_eq!(output.output, "-3 6\n");
}

#[test]
fn elementwise_operators_and_transpose() {
    let session = Session::new();
    let program = program(&session, |b| {
        let a = int_matrix(b, &[&[1, 2], &[3, 4]]);
        let a = b.assign_var("a", a);
        let (x, y) = (b.ident("a"), b.ident("a"));
        let t = b.unary("'", y);
        let sum = b.binary(".+", x, t);
        let out = print(b, vec![sum]);
        let (x, half) = (b.ident("a"), b.float(0.5));
        let scaled = b.binary("*", x, half);
        let out_scaled = print(b, vec![scaled]);
        let x = b.ident("a");
        let negated = b.unary("UMINUS", x);
        let out_neg = print(b, vec![negated]);
        vec![a, out, out_scaled, out_neg]
    });

    let output = session.run(&program).unwrap();
    assert!(output.diagnostics.is_empty());
    assert_eq!(
        output.output,
        "[[2, 5], [5, 8]]\n[[0.5, 1.0], [1.5, 2.0]]\n[[-1, -2], [-3, -4]]\n"
    );
}

#[test]
fn mixed_arithmetic_and_strings() {
    let session = Session::new();
    let program = program(&session, |b| {
        let (seven, two) = (b.int(7), b.int(2));
        let quotient = b.binary("/", seven, two);
        let (one, half) = (b.int(1), b.float(0.5));
        let sum = b.binary("+", one, half);
        let (dash, three) = (b.string("-"), b.int(3));
        let line = b.binary("*", dash, three);
        let (a, c) = (b.int(2), b.int(3));
        let less = b.binary("<", a, c);
        vec![print(b, vec![quotient, sum, line, less])]
    });

    let output = session.run(&program).unwrap();
    assert_eq!(output.output, "3 1.5 --- true\n");
}

#[test]
fn top_level_return_yields_a_value() {
    let session = Session::new();
    let program = program(&session, |b| {
        let v = {
            let elements = vec![b.int(4), b.int(5), b.int(6)];
            b.init(elements)
        };
        let assign = b.assign_var("v", v);
        let index = b.int(1);
        let element = b.vector_ref("v", index);
        let ret = b.return_(Some(element));
        let unreachable = b.string("unreachable");
        let after = print(b, vec![unreachable]);
        vec![assign, ret, after]
    });

    let output = session.run(&program).unwrap();
    assert_eq!(output.value, Some(Value::Int(5)));
    assert_eq!(output.output, "");
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let session = Session::new();
    let program = program(&session, |b| {
        b.at(1);
        let hello = b.string("start");
        let first = print(b, vec![hello]);
        b.at(2);
        let (one, zero) = (b.int(1), b.int(0));
        let quotient = b.binary("/", one, zero);
        vec![first, b.assign_var("x", quotient)]
    });

    match session.run(&program) {
        Err(RunError::Runtime(err)) => {
            assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
            assert_eq!(err.span, Some(Span::line(2)));
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
    // Output printed before the error stays with the session's handler.
    assert_eq!(session.print_handler().output(), "start\n");
}

#[test]
fn out_of_bounds_element_is_a_runtime_error() {
    let session = Session::new();
    let program = program(&session, |b| {
        let two = b.int(2);
        let eye = b.apply("eye", vec![two]);
        let m = b.assign_var("m", eye);
        let (row, col) = (b.int(2), b.int(0));
        let element = b.matrix_ref("m", row, col);
        vec![m, print(b, vec![element])]
    });

    let err = session.run(&program).unwrap_err();
    assert_eq!(err.to_string(), "runtime error: index 2 out of bounds for length 2");
}

#[test]
fn free_run_captures_output() {
    let session = Session::new().with_print_handler(silent_handler());
    let program = program(&session, |b| {
        let hello = b.string("hello");
        vec![print(b, vec![hello])]
    });

    let output = run(&program, session.interner()).unwrap();
    assert_eq!(output.output, "hello\n");
    assert_eq!(session.run(&program).unwrap().output, "");
}
