use mtx_ir::{AstBuilder, ExprId, StringInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::{OutcomeKind, Params, TypeTable};

/// Call arguments with preset types.
struct Fixture {
    arena: mtx_ir::ExprArena,
    types: TypeTable,
    args: Vec<ExprId>,
}

impl Fixture {
    fn typed(types: &[Type]) -> Self {
        let interner = StringInterner::new();
        let mut builder = AstBuilder::new(&interner);
        let args: Vec<ExprId> = (0..types.len())
            .map(|i| builder.ident(&format!("a{i}")))
            .collect();
        let program = builder.finish(Vec::new());
        let mut table = TypeTable::for_arena(&program.arena);
        for (&arg, ty) in args.iter().zip(types) {
            table.set(arg, ty.clone());
        }
        Fixture {
            arena: program.arena,
            types: table,
            args,
        }
    }

    fn literal(value: i64) -> Self {
        let interner = StringInterner::new();
        let mut builder = AstBuilder::new(&interner);
        let arg = builder.int(value);
        let program = builder.finish(Vec::new());
        let mut types = TypeTable::for_arena(&program.arena);
        types.set(arg, Type::Int);
        Fixture {
            arena: program.arena,
            types,
            args: vec![arg],
        }
    }

    fn call(&self) -> CallArgs<'_> {
        CallArgs::new(&self.arena, &self.types, &self.args)
    }
}

fn vector(arity: Option<usize>) -> Type {
    Type::Vector { arity }
}

#[test]
fn square_matrix_from_literal() {
    let fixture = Fixture::literal(3);
    assert_eq!(
        square_from_literal(&fixture.call()),
        Outcome::success(Type::matrix(3, 3))
    );
}

#[test]
fn square_matrix_from_variable_is_unknown() {
    let fixture = Fixture::typed(&[Type::Int]);
    let outcome = square_from_literal(&fixture.call());
    assert_eq!(outcome.kind(), OutcomeKind::Warning);
    assert_eq!(outcome.value(), &Type::any_matrix());
}

#[test]
fn negative_size_fails() {
    let fixture = Fixture::literal(-1);
    assert!(square_from_literal(&fixture.call()).is_failure());
}

#[test]
fn transpose_swaps_dimensions() {
    let fixture = Fixture::typed(&[Type::Matrix {
        rows: Some(2),
        cols: None,
    }]);
    assert_eq!(
        transpose(&fixture.call()).into_value(),
        Type::Matrix {
            rows: None,
            cols: Some(2)
        }
    );
}

#[test]
fn elementwise_matrix_checks_each_dimension() {
    let same = Fixture::typed(&[Type::matrix(2, 3), Type::matrix(2, 3)]);
    assert_eq!(
        elementwise_matrix(&same.call()),
        Outcome::success(Type::matrix(2, 3))
    );

    let mismatch = Fixture::typed(&[Type::matrix(2, 2), Type::matrix(3, 3)]);
    let outcome = elementwise_matrix(&mismatch.call());
    assert!(outcome.is_failure());
    assert_eq!(outcome.messages().len(), 2);

    let partial = Fixture::typed(&[
        Type::Matrix {
            rows: Some(2),
            cols: None,
        },
        Type::matrix(2, 4),
    ]);
    let outcome = elementwise_matrix(&partial.call());
    assert!(outcome.is_warning());
    assert_eq!(
        outcome.value(),
        &Type::Matrix {
            rows: Some(2),
            cols: None
        }
    );
}

#[test]
fn elementwise_vector_arity() {
    let mismatch = Fixture::typed(&[Type::vector(2), Type::vector(3)]);
    let outcome = elementwise_vector(&mismatch.call());
    assert!(outcome.is_failure());
    assert_eq!(outcome.value(), &Type::any_vector());

    let unknown = Fixture::typed(&[Type::any_vector(), Type::any_vector()]);
    assert!(elementwise_vector(&unknown.call()).is_warning());
}

#[test]
fn init_matrix_from_known_equal_rows() {
    let fixture = Fixture::typed(&[Type::vector(3), Type::vector(3)]);
    assert_eq!(
        init_matrix(&fixture.call()),
        Outcome::success(Type::matrix(2, 3))
    );
}

#[test]
fn init_matrix_from_unknown_rows_warns() {
    let fixture = Fixture::typed(&[vector(None), vector(None)]);
    let outcome = init_matrix(&fixture.call());
    assert!(outcome.is_warning());
    assert_eq!(
        outcome.value(),
        &Type::Matrix {
            rows: Some(2),
            cols: None
        }
    );
}

#[test]
fn init_matrix_from_unequal_rows_fails() {
    let fixture = Fixture::typed(&[vector(Some(2)), vector(None), vector(Some(3))]);
    let outcome = init_matrix(&fixture.call());
    assert!(outcome.is_failure());
    assert_eq!(
        outcome.value(),
        &Type::Matrix {
            rows: Some(3),
            cols: None
        }
    );
}

#[test]
fn init_vector_counts_arguments() {
    let fixture = Fixture::typed(&[Type::Int, Type::Float, Type::Int]);
    assert_eq!(
        init_vector(&fixture.call()),
        Outcome::success(Type::vector(3))
    );
}

#[test]
fn every_operator_is_declared_once() {
    let table = signatures();
    let mut names: Vec<_> = table.iter().map(|(name, _)| *name).collect();
    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);
    for name in ["UMINUS", "'", "eye", "zeros", "ones", "+", "-", "*", "/", "INIT", "PRINT"] {
        assert!(names.contains(&name), "missing {name}");
    }
}

#[test]
fn integer_overload_comes_first() {
    let table = signatures();
    let Some((_, Type::OverloadSet(overloads))) = table.iter().find(|(name, _)| *name == "+")
    else {
        panic!("`+` is not an overload set");
    };
    let ints = [Type::Int, Type::Int];
    let first = overloads.iter().find(|f| f.params.takes(&ints));
    assert_eq!(first.map(FunctionType::result_type), Some(Type::Int));
}

#[test]
fn negation_accepts_element_references() {
    let table = signatures();
    let Some((_, Type::OverloadSet(overloads))) =
        table.iter().find(|(name, _)| *name == "UMINUS")
    else {
        panic!("`UMINUS` is not an overload set");
    };
    let selected = overloads.iter().find(|f| f.params.takes(&[Type::Numeric]));
    assert_eq!(selected.map(FunctionType::result_type), Some(Type::Numeric));
    let ints = overloads.iter().find(|f| f.params.takes(&[Type::Int]));
    assert_eq!(ints.map(FunctionType::result_type), Some(Type::Int));
}

#[test]
fn elementwise_resolution_narrows_parameters() {
    let fixture = Fixture::typed(&[Type::matrix(2, 2), Type::matrix(3, 3)]);
    let function = FunctionType::shaped(
        Params::Tuple(vec![Type::any_matrix(), Type::any_matrix()]),
        elementwise_matrix_factory(),
    );
    let resolved = function.resolve(&fixture.call());
    assert!(resolved.is_failure());
    assert_eq!(
        resolved.value().params,
        Params::Tuple(vec![Type::matrix(2, 2), Type::matrix(2, 2)])
    );

    let open = Type::Matrix {
        rows: Some(2),
        cols: None,
    };
    let partial = Fixture::typed(&[Type::matrix(2, 2), open.clone()]);
    let resolved = function.resolve(&partial.call());
    assert!(resolved.is_warning());
    assert!(resolved.value().params.takes(&[Type::matrix(2, 2), open]));
}
