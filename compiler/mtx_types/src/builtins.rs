//! Static signatures of the builtin operators and functions.
//!
//! Each name maps to a single [`FunctionType`] or to an ordered
//! [`Type::OverloadSet`]; overload order is significant, the first
//! accepting entry wins. Results whose shape depends on the arguments are
//! computed by the shape factories below.

use mtx_ir::StringInterner;

use crate::{CallArgs, FunctionType, Outcome, Params, ShapeFactory, Symbol, SymbolTable, Type};

/// Comparison operators; all share one signature.
pub const COMPARISONS: [&str; 6] = ["==", "!=", "<=", ">=", "<", ">"];

/// Elementwise operators.
pub const ELEMENTWISE: [&str; 4] = [".+", ".-", ".*", "./"];

/// The builtin signature table, in declaration order.
pub fn signatures() -> Vec<(&'static str, Type)> {
    let mut table = vec![
        ("UMINUS", uminus()),
        (
            "'",
            Type::function(FunctionType::shaped(
                Params::Unary(Type::any_matrix()),
                ShapeFactory::new("transpose", Type::any_matrix(), transpose),
            )),
        ),
        ("eye", square_matrix("eye")),
        ("zeros", square_matrix("zeros")),
        ("ones", square_matrix("ones")),
        ("+", additive()),
        ("-", additive()),
        ("*", multiplicative()),
        ("/", division()),
    ];
    for op in COMPARISONS {
        table.push((
            op,
            Type::function(FunctionType::new(
                pair(Type::Numeric, Type::Numeric),
                Type::Bool,
            )),
        ));
    }
    for op in ELEMENTWISE {
        table.push((op, elementwise()));
    }
    table.push(("INIT", init()));
    table.push((
        "PRINT",
        Type::function(FunctionType::new(Params::Variadic(Type::Any), Type::Unit)),
    ));
    table
}

/// Declare every builtin in the current (global) scope of `symbols`.
pub fn declare_builtins(symbols: &mut SymbolTable, interner: &StringInterner) {
    for (name, ty) in signatures() {
        let _ = symbols.declare(Symbol::builtin(interner.intern(name), ty));
    }
}

fn pair(a: Type, b: Type) -> Params {
    Params::Tuple(vec![a, b])
}

fn same_as_first_factory(hint: Type) -> ShapeFactory {
    ShapeFactory::new("same_as_first", hint, same_as_first)
}

fn elementwise_matrix_factory() -> ShapeFactory {
    ShapeFactory::uniform("elementwise_matrix", Type::any_matrix(), elementwise_matrix)
}

fn uminus() -> Type {
    Type::OverloadSet(vec![
        FunctionType::new(Params::Unary(Type::Int), Type::Int),
        FunctionType::new(Params::Unary(Type::Float), Type::Float),
        // Element references.
        FunctionType::new(Params::Unary(Type::Numeric), Type::Numeric),
        FunctionType::shaped(
            Params::Unary(Type::any_vector()),
            same_as_first_factory(Type::any_vector()),
        ),
        FunctionType::shaped(
            Params::Unary(Type::any_matrix()),
            same_as_first_factory(Type::any_matrix()),
        ),
    ])
}

fn square_matrix(name: &'static str) -> Type {
    Type::function(FunctionType::shaped(
        Params::Unary(Type::Int),
        ShapeFactory::new(name, Type::any_matrix(), square_from_literal),
    ))
}

fn additive() -> Type {
    Type::OverloadSet(vec![
        FunctionType::new(pair(Type::Int, Type::Int), Type::Int),
        FunctionType::new(pair(Type::Numeric, Type::Numeric), Type::Float),
    ])
}

fn scaled() -> [FunctionType; 2] {
    [
        FunctionType::shaped(
            pair(Type::any_matrix(), Type::Numeric),
            same_as_first_factory(Type::any_matrix()),
        ),
        FunctionType::shaped(
            pair(Type::any_vector(), Type::Numeric),
            same_as_first_factory(Type::any_vector()),
        ),
    ]
}

fn multiplicative() -> Type {
    let mut overloads = vec![
        FunctionType::new(pair(Type::Int, Type::Int), Type::Int),
        FunctionType::new(pair(Type::Numeric, Type::Numeric), Type::Float),
    ];
    overloads.extend(scaled());
    overloads.push(FunctionType::shaped(
        pair(Type::any_matrix(), Type::any_matrix()),
        elementwise_matrix_factory(),
    ));
    overloads.push(FunctionType::new(pair(Type::Str, Type::Int), Type::Str));
    Type::OverloadSet(overloads)
}

fn division() -> Type {
    let mut overloads = vec![
        FunctionType::new(pair(Type::Int, Type::Int), Type::Int),
        FunctionType::new(pair(Type::Numeric, Type::Numeric), Type::Float),
    ];
    overloads.extend(scaled());
    Type::OverloadSet(overloads)
}

fn elementwise() -> Type {
    Type::OverloadSet(vec![
        FunctionType::shaped(
            pair(Type::any_matrix(), Type::any_matrix()),
            elementwise_matrix_factory(),
        ),
        FunctionType::shaped(
            pair(Type::any_vector(), Type::any_vector()),
            ShapeFactory::uniform("elementwise_vector", Type::any_vector(), elementwise_vector),
        ),
    ])
}

fn init() -> Type {
    Type::OverloadSet(vec![
        FunctionType::shaped(
            Params::Variadic(Type::Numeric),
            ShapeFactory::new("init_vector", Type::any_vector(), init_vector),
        ),
        FunctionType::shaped(
            Params::Variadic(Type::any_vector()),
            ShapeFactory::new("init_matrix", Type::any_matrix(), init_matrix),
        ),
    ])
}

// Shape factories

/// Result has the type of the first argument.
pub fn same_as_first(args: &CallArgs<'_>) -> Outcome<Type> {
    Outcome::success(args.ty(0).clone())
}

/// Swap rows and columns.
pub fn transpose(args: &CallArgs<'_>) -> Outcome<Type> {
    match *args.ty(0) {
        Type::Matrix { rows, cols } => Outcome::success(Type::Matrix {
            rows: cols,
            cols: rows,
        }),
        _ => Outcome::failure(Type::any_matrix(), "transpose of a non-matrix"),
    }
}

/// `n x n` when the argument is the integer literal `n`.
pub fn square_from_literal(args: &CallArgs<'_>) -> Outcome<Type> {
    match args.int_literal(0) {
        Some(n) => match usize::try_from(n) {
            Ok(n) => Outcome::success(Type::matrix(n, n)),
            Err(_) => Outcome::failure(
                Type::any_matrix(),
                format!("matrix size must be non-negative, found {n}"),
            ),
        },
        None => Outcome::warning(
            Type::any_matrix(),
            "matrix size is not an integer literal; dimensions unknown",
        ),
    }
}

/// Agreement of one dimension across two operands.
enum Agreement {
    Equal(usize),
    Unknown,
    Conflict(usize, usize),
}

fn agree(a: Option<usize>, b: Option<usize>) -> Agreement {
    match (a, b) {
        (Some(a), Some(b)) if a == b => Agreement::Equal(a),
        (Some(a), Some(b)) => Agreement::Conflict(a, b),
        _ => Agreement::Unknown,
    }
}

/// Fold one dimension into `warnings`/`errors`, returning it if it agreed.
fn dimension(
    what: &str,
    a: Option<usize>,
    b: Option<usize>,
    warnings: &mut Vec<String>,
    errors: &mut Vec<String>,
) -> Option<usize> {
    match agree(a, b) {
        Agreement::Equal(n) => Some(n),
        Agreement::Unknown => {
            warnings.push(format!("{what} could not be determined"));
            None
        }
        Agreement::Conflict(a, b) => {
            errors.push(format!("{what} differ: {a} and {b}"));
            None
        }
    }
}

/// Two matrices of the same shape; rows and columns are checked separately.
pub fn elementwise_matrix(args: &CallArgs<'_>) -> Outcome<Type> {
    let (Type::Matrix { rows: r1, cols: c1 }, Type::Matrix { rows: r2, cols: c2 }) =
        (args.ty(0), args.ty(1))
    else {
        return Outcome::failure(Type::any_matrix(), "elementwise operands must be matrices");
    };
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let rows = dimension("row counts", *r1, *r2, &mut warnings, &mut errors);
    let cols = dimension("column counts", *c1, *c2, &mut warnings, &mut errors);
    Outcome::from_parts(Type::Matrix { rows, cols }, warnings, errors)
}

/// Two vectors of the same arity.
pub fn elementwise_vector(args: &CallArgs<'_>) -> Outcome<Type> {
    let (Type::Vector { arity: a }, Type::Vector { arity: b }) = (args.ty(0), args.ty(1)) else {
        return Outcome::failure(Type::any_vector(), "elementwise operands must be vectors");
    };
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let arity = dimension("vector arities", *a, *b, &mut warnings, &mut errors);
    Outcome::from_parts(Type::Vector { arity }, warnings, errors)
}

/// `[a, b, c]` of scalars: a vector of the argument count.
pub fn init_vector(args: &CallArgs<'_>) -> Outcome<Type> {
    Outcome::success(Type::vector(args.len()))
}

/// `[v1, v2]` of vectors: one row per argument, columns from the arities.
pub fn init_matrix(args: &CallArgs<'_>) -> Outcome<Type> {
    let rows = Some(args.len());
    let mut arities = Vec::with_capacity(args.len());
    for ty in args.types() {
        match ty {
            Type::Vector { arity } => arities.push(*arity),
            other => {
                return Outcome::failure(
                    Type::Matrix { rows, cols: None },
                    format!("matrix rows must be vectors, found {other}"),
                )
            }
        }
    }

    let known: Vec<usize> = arities.iter().flatten().copied().collect();
    if let Some((&first, rest)) = known.split_first() {
        if let Some(&other) = rest.iter().find(|&&n| n != first) {
            return Outcome::failure(
                Type::Matrix { rows, cols: None },
                format!("matrix rows have different lengths: {first} and {other}"),
            );
        }
    }
    if known.len() < arities.len() {
        return Outcome::warning(
            Type::Matrix { rows, cols: None },
            "row length could not be determined",
        );
    }
    Outcome::success(Type::Matrix {
        rows,
        cols: known.first().copied(),
    })
}

#[cfg(test)]
mod tests;
