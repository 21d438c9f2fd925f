//! Runtime values.
//!
//! Scalars promote from `Int` to `Float` when mixed. Vectors and matrices
//! hold scalars and support elementwise arithmetic between operands of the
//! same shape, plus scaling by a scalar. Values are owned: assignment
//! copies, so two variables never share a matrix.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::errors::{division_by_zero, index_out_of_bounds, shape_mismatch, type_mismatch};
use crate::EvalError;

/// Arithmetic operator shared by scalar, vector and matrix operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn apply(self, lhs: Scalar, rhs: Scalar) -> Result<Scalar, EvalError> {
        match self {
            ArithOp::Add => Ok(lhs + rhs),
            ArithOp::Sub => Ok(lhs - rhs),
            ArithOp::Mul => Ok(lhs * rhs),
            ArithOp::Div => lhs.checked_div(rhs),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(n) => n as f64,
            Scalar::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Scalar::Int(n) => n == 0,
            Scalar::Float(x) => x == 0.0,
        }
    }

    /// Division; integer operands truncate toward zero.
    pub fn checked_div(self, rhs: Scalar) -> Result<Scalar, EvalError> {
        if rhs.is_zero() {
            return Err(division_by_zero());
        }
        Ok(match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => Scalar::Int(a.wrapping_div(b)),
            (a, b) => Scalar::Float(a.as_f64() / b.as_f64()),
        })
    }

    /// Numeric comparison; mixed operands compare as floats.
    pub fn partial_cmp_numeric(self, rhs: Scalar) -> Option<std::cmp::Ordering> {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

macro_rules! promoting_op {
    ($trait:ident, $method:ident, $int:ident, $op:tt) => {
        impl $trait for Scalar {
            type Output = Scalar;

            fn $method(self, rhs: Scalar) -> Scalar {
                match (self, rhs) {
                    (Scalar::Int(a), Scalar::Int(b)) => Scalar::Int(a.$int(b)),
                    (a, b) => Scalar::Float(a.as_f64() $op b.as_f64()),
                }
            }
        }
    };
}

promoting_op!(Add, add, wrapping_add, +);
promoting_op!(Sub, sub, wrapping_sub, -);
promoting_op!(Mul, mul, wrapping_mul, *);

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        match self {
            Scalar::Int(n) => Scalar::Int(n.wrapping_neg()),
            Scalar::Float(x) => Scalar::Float(-x),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// Convert a runtime index, rejecting negatives and out-of-range values.
fn checked_index(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector(Vec<Scalar>);

impl Vector {
    pub fn new(elements: Vec<Scalar>) -> Self {
        Vector(elements)
    }

    pub fn filled(len: usize, value: Scalar) -> Self {
        Vector(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn elements(&self) -> &[Scalar] {
        &self.0
    }

    pub fn get(&self, index: i64) -> Result<Scalar, EvalError> {
        checked_index(index, self.len()).map(|i| self.0[i])
    }

    pub fn set(&mut self, index: i64, value: Scalar) -> Result<(), EvalError> {
        let i = checked_index(index, self.len())?;
        self.0[i] = value;
        Ok(())
    }

    /// Pair same-index elements of two vectors of equal length.
    pub fn elementwise(&self, other: &Vector, op: ArithOp) -> Result<Vector, EvalError> {
        if self.len() != other.len() {
            return Err(shape_mismatch(
                format!("vector[{}]", self.len()),
                format!("vector[{}]", other.len()),
            ));
        }
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| op.apply(a, b))
            .collect::<Result<_, _>>()
            .map(Vector)
    }

    /// Apply `op` between each element and `scalar`.
    pub fn scale(&self, scalar: Scalar, op: ArithOp) -> Result<Vector, EvalError> {
        self.0
            .iter()
            .map(|&a| op.apply(a, scalar))
            .collect::<Result<_, _>>()
            .map(Vector)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector(self.0.into_iter().map(Neg::neg).collect())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}

/// Rows of equal length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix(Vec<Vector>);

impl Matrix {
    /// Build from rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self, EvalError> {
        if let Some(first) = rows.first() {
            if let Some(bad) = rows.iter().find(|row| row.len() != first.len()) {
                return Err(shape_mismatch(
                    format!("row of length {}", first.len()),
                    format!("row of length {}", bad.len()),
                ));
            }
        }
        Ok(Matrix(rows))
    }

    pub fn filled(n: usize, value: Scalar) -> Self {
        Matrix(vec![Vector::filled(n, value); n])
    }

    pub fn zeros(n: usize) -> Self {
        Self::filled(n, Scalar::Int(0))
    }

    pub fn ones(n: usize) -> Self {
        Self::filled(n, Scalar::Int(1))
    }

    pub fn eye(n: usize) -> Self {
        let mut matrix = Self::zeros(n);
        for (i, row) in matrix.0.iter_mut().enumerate() {
            row.0[i] = Scalar::Int(1);
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn cols(&self) -> usize {
        self.0.first().map_or(0, Vector::len)
    }

    pub fn row_vectors(&self) -> &[Vector] {
        &self.0
    }

    fn shape(&self) -> String {
        format!("matrix[{}x{}]", self.rows(), self.cols())
    }

    pub fn get(&self, row: i64, col: i64) -> Result<Scalar, EvalError> {
        let r = checked_index(row, self.rows())?;
        self.0[r].get(col)
    }

    pub fn set(&mut self, row: i64, col: i64, value: Scalar) -> Result<(), EvalError> {
        let r = checked_index(row, self.rows())?;
        self.0[r].set(col, value)
    }

    #[must_use]
    pub fn transpose(&self) -> Matrix {
        let cols = (0..self.cols())
            .map(|c| Vector(self.0.iter().map(|row| row.0[c]).collect()))
            .collect();
        Matrix(cols)
    }

    pub fn elementwise(&self, other: &Matrix, op: ArithOp) -> Result<Matrix, EvalError> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(shape_mismatch(self.shape(), other.shape()));
        }
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.elementwise(b, op))
            .collect::<Result<_, _>>()
            .map(Matrix)
    }

    pub fn scale(&self, scalar: Scalar, op: ArithOp) -> Result<Matrix, EvalError> {
        self.0
            .iter()
            .map(|row| row.scale(scalar, op))
            .collect::<Result<_, _>>()
            .map(Matrix)
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        Matrix(self.0.into_iter().map(Neg::neg).collect())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{row}")?;
        }
        write!(f, "]")
    }
}

/// A runtime value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    #[default]
    Unit,
    Vector(Vector),
    Matrix(Matrix),
    /// Half-open `start:end`.
    Range { start: i64, end: i64 },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Unit => "unit",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
            Value::Range { .. } => "range",
        }
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match *self {
            Value::Int(n) => Some(Scalar::Int(n)),
            Value::Float(x) => Some(Scalar::Float(x)),
            _ => None,
        }
    }

    pub fn expect_scalar(&self) -> Result<Scalar, EvalError> {
        self.as_scalar().ok_or_else(|| type_mismatch("int or float", self))
    }

    pub fn expect_int(&self) -> Result<i64, EvalError> {
        match *self {
            Value::Int(n) => Ok(n),
            _ => Err(type_mismatch("int", self)),
        }
    }

    pub fn expect_bool(&self) -> Result<bool, EvalError> {
        match *self {
            Value::Bool(b) => Ok(b),
            _ => Err(type_mismatch("bool", self)),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Int(n) => Value::Int(n),
            Scalar::Float(x) => Value::Float(x),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Unit => write!(f, "()"),
            Value::Vector(v) => write!(f, "{v}"),
            Value::Matrix(m) => write!(f, "{m}"),
            Value::Range { start, end } => write!(f, "{start}:{end}"),
        }
    }
}
