//! Type representation.
//!
//! Types are plain values compared structurally. Vector and matrix
//! dimensions are `Option<usize>`: `None` means the dimension could not be
//! determined statically. `Undefined` marks a node whose type could not be
//! resolved; it is distinct from "not yet computed", which the passes never
//! observe because every table slot starts out `Undefined` and the Scoper
//! writes each node before anything reads it.

use std::fmt;

use crate::FunctionType;

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Unit,
    Vector {
        arity: Option<usize>,
    },
    Matrix {
        rows: Option<usize>,
        cols: Option<usize>,
    },
    /// Type of a `start:end` range expression.
    Range,
    Function(Box<FunctionType>),
    /// Ordered overloads of one name; earlier entries win.
    OverloadSet(Vec<FunctionType>),
    /// Pattern: `int` or `float`. Only appears in builtin signatures and on
    /// element references, whose scalar kind is not tracked.
    Numeric,
    /// Pattern: any type.
    Any,
    Undefined,
}

impl Type {
    pub fn vector(arity: usize) -> Self {
        Type::Vector { arity: Some(arity) }
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Type::Matrix {
            rows: Some(rows),
            cols: Some(cols),
        }
    }

    /// Vector of any arity; as a pattern, accepts every vector.
    pub fn any_vector() -> Self {
        Type::Vector { arity: None }
    }

    /// Matrix of any shape; as a pattern, accepts every matrix.
    pub fn any_matrix() -> Self {
        Type::Matrix {
            rows: None,
            cols: None,
        }
    }

    pub fn function(function: FunctionType) -> Self {
        Type::Function(Box::new(function))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Type::Undefined)
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Type::Matrix { .. })
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Type::Function(_) | Type::OverloadSet(_))
    }

    /// `self` with every dimension `other` leaves open left open too.
    #[must_use]
    pub fn open_where(&self, other: &Type) -> Type {
        match (self, other) {
            (Type::Vector { arity }, Type::Vector { arity: theirs }) => Type::Vector {
                arity: arity.filter(|_| theirs.is_some()),
            },
            (Type::Matrix { rows, cols }, Type::Matrix { rows: r, cols: c }) => Type::Matrix {
                rows: rows.filter(|_| r.is_some()),
                cols: cols.filter(|_| c.is_some()),
            },
            _ => self.clone(),
        }
    }

    /// Whether a value of type `actual` fits where `self` is expected.
    ///
    /// `self` is read as a pattern: `Any` accepts everything, `Numeric`
    /// accepts either scalar kind, and an absent dimension accepts any
    /// size. Everything else must be equal.
    pub fn accepts(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Type::Any, _) => true,
            (Type::Numeric, Type::Int | Type::Float | Type::Numeric) => true,
            (Type::Vector { arity: expected }, Type::Vector { arity }) => {
                dimension_fits(*expected, *arity)
            }
            (
                Type::Matrix {
                    rows: expected_rows,
                    cols: expected_cols,
                },
                Type::Matrix { rows, cols },
            ) => dimension_fits(*expected_rows, *rows) && dimension_fits(*expected_cols, *cols),
            (expected, actual) => expected == actual,
        }
    }
}

fn dimension_fits(expected: Option<usize>, actual: Option<usize>) -> bool {
    expected.is_none() || expected == actual
}

struct Dim(Option<usize>);

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "?"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "string"),
            Type::Unit => write!(f, "unit"),
            Type::Vector { arity } => write!(f, "vector[{}]", Dim(*arity)),
            Type::Matrix { rows, cols } => write!(f, "matrix[{}x{}]", Dim(*rows), Dim(*cols)),
            Type::Range => write!(f, "range"),
            Type::Function(function) => write!(f, "{function}"),
            Type::OverloadSet(overloads) => {
                for (i, overload) in overloads.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{overload}")?;
                }
                Ok(())
            }
            Type::Numeric => write!(f, "numeric"),
            Type::Any => write!(f, "any"),
            Type::Undefined => write!(f, "undefined"),
        }
    }
}
