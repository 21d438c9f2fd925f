//! Runtime implementations of the builtin operators and functions.
//!
//! Mirrors the static signature table: every name the type checker
//! accepts has an entry here. Operand checks are still performed so a
//! program that skipped analysis fails with an error rather than a panic.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::errors::{arity_mismatch, type_mismatch};
use crate::print_handler::PrintHandlerImpl;
use crate::value::{ArithOp, Matrix, Vector};
use crate::{EvalError, EvalResult, Value};

/// A builtin: evaluated arguments and the print destination in, value out.
pub type BuiltinFn = fn(&[Value], &PrintHandlerImpl) -> EvalResult;

/// Name to implementation.
#[derive(Clone, Default)]
pub struct BuiltinTable {
    functions: FxHashMap<&'static str, BuiltinFn>,
}

impl BuiltinTable {
    /// A table with no functions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every builtin of the language.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        let entries: [(&'static str, BuiltinFn); 21] = [
            ("+", add),
            ("-", sub),
            ("*", mul),
            ("/", div),
            (".+", add),
            (".-", sub),
            (".*", mul),
            ("./", div),
            ("==", eq),
            ("!=", ne),
            ("<", lt),
            ("<=", le),
            (">", gt),
            (">=", ge),
            ("UMINUS", negate),
            ("'", transpose),
            ("zeros", zeros),
            ("ones", ones),
            ("eye", eye),
            ("INIT", init),
            ("PRINT", print),
        ];
        for (name, function) in entries {
            table.register(name, function);
        }
        table
    }

    pub fn register(&mut self, name: &'static str, function: BuiltinFn) {
        self.functions.insert(name, function);
    }

    pub fn remove(&mut self, name: &str) -> Option<BuiltinFn> {
        self.functions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.functions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn exactly<'v, const N: usize>(
    name: &str,
    args: &'v [Value],
) -> Result<&'v [Value; N], EvalError> {
    args.try_into().map_err(|_| arity_mismatch(name, N, args.len()))
}

/// Arithmetic on any supported operand pair.
///
/// Same-shape containers combine elementwise, a container and a scalar
/// scale, `string * int` repeats, and scalars promote.
pub fn arith(op: ArithOp, lhs: &Value, rhs: &Value) -> EvalResult {
    match (lhs, rhs) {
        (Value::Matrix(a), Value::Matrix(b)) => a.elementwise(b, op).map(Value::Matrix),
        (Value::Vector(a), Value::Vector(b)) => a.elementwise(b, op).map(Value::Vector),
        (Value::Matrix(a), b) => a.scale(b.expect_scalar()?, op).map(Value::Matrix),
        (Value::Vector(a), b) => a.scale(b.expect_scalar()?, op).map(Value::Vector),
        (Value::Str(s), Value::Int(n)) if op == ArithOp::Mul => {
            let count = usize::try_from(*n).unwrap_or(0);
            Ok(Value::Str(s.repeat(count)))
        }
        (a, b) => op.apply(a.expect_scalar()?, b.expect_scalar()?).map(Value::from),
    }
}

fn add(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("+", args)?;
    arith(ArithOp::Add, a, b)
}

fn sub(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("-", args)?;
    arith(ArithOp::Sub, a, b)
}

fn mul(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("*", args)?;
    arith(ArithOp::Mul, a, b)
}

fn div(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("/", args)?;
    arith(ArithOp::Div, a, b)
}

fn ordering(a: &Value, b: &Value) -> Result<Option<Ordering>, EvalError> {
    Ok(a.expect_scalar()?.partial_cmp_numeric(b.expect_scalar()?))
}

/// Equality: numeric across int and float, structural otherwise.
fn equal(a: &Value, b: &Value) -> bool {
    match (a.as_scalar(), b.as_scalar()) {
        (Some(x), Some(y)) => x.partial_cmp_numeric(y) == Some(Ordering::Equal),
        _ => a == b,
    }
}

fn eq(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("==", args)?;
    Ok(Value::Bool(equal(a, b)))
}

fn ne(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("!=", args)?;
    Ok(Value::Bool(!equal(a, b)))
}

fn lt(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("<", args)?;
    Ok(Value::Bool(ordering(a, b)? == Some(Ordering::Less)))
}

fn le(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>("<=", args)?;
    Ok(Value::Bool(matches!(
        ordering(a, b)?,
        Some(Ordering::Less | Ordering::Equal)
    )))
}

fn gt(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>(">", args)?;
    Ok(Value::Bool(ordering(a, b)? == Some(Ordering::Greater)))
}

fn ge(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [a, b] = exactly::<2>(">=", args)?;
    Ok(Value::Bool(matches!(
        ordering(a, b)?,
        Some(Ordering::Greater | Ordering::Equal)
    )))
}

fn negate(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    let [value] = exactly::<1>("UMINUS", args)?;
    match value {
        Value::Vector(v) => Ok(Value::Vector(-v.clone())),
        Value::Matrix(m) => Ok(Value::Matrix(-m.clone())),
        other => Ok(Value::from(-other.expect_scalar()?)),
    }
}

fn transpose(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    match exactly::<1>("'", args)? {
        [Value::Matrix(m)] => Ok(Value::Matrix(m.transpose())),
        [other] => Err(type_mismatch("matrix", other)),
    }
}

fn size(name: &str, args: &[Value]) -> Result<usize, EvalError> {
    let [n] = exactly::<1>(name, args)?;
    usize::try_from(n.expect_int()?).map_err(|_| type_mismatch("non-negative int", n))
}

fn zeros(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    Ok(Value::Matrix(Matrix::zeros(size("zeros", args)?)))
}

fn ones(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    Ok(Value::Matrix(Matrix::ones(size("ones", args)?)))
}

fn eye(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    Ok(Value::Matrix(Matrix::eye(size("eye", args)?)))
}

/// `[a, b, c]`: scalars build a vector, vectors build a matrix row by row.
fn init(args: &[Value], _: &PrintHandlerImpl) -> EvalResult {
    if args.iter().all(|arg| arg.as_scalar().is_some()) {
        let elements = args.iter().filter_map(Value::as_scalar).collect();
        return Ok(Value::Vector(Vector::new(elements)));
    }
    let rows = args
        .iter()
        .map(|arg| match arg {
            Value::Vector(v) => Ok(v.clone()),
            other => Err(type_mismatch("vector", other)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Matrix::from_rows(rows).map(Value::Matrix)
}

/// Arguments separated by spaces, then a newline.
fn print(args: &[Value], out: &PrintHandlerImpl) -> EvalResult {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    out.println(&line);
    Ok(Value::Unit)
}
