//! Function types, parameter patterns and shape factories.

use std::fmt;

use mtx_ir::{ExprArena, ExprId};

use crate::{Outcome, Type, TypeTable};

/// Parameter pattern of a function type.
#[derive(Clone, Debug, PartialEq)]
pub enum Params {
    /// Exactly one argument.
    Unary(Type),
    /// Fixed arity, one pattern per position.
    Tuple(Vec<Type>),
    /// Any number of arguments, each matching the element pattern.
    Variadic(Type),
}

impl Params {
    /// Fixed arity, or `None` for variadic parameters.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Params::Unary(_) => Some(1),
            Params::Tuple(params) => Some(params.len()),
            Params::Variadic(_) => None,
        }
    }

    /// Pattern expected at argument position `index`.
    pub fn expected(&self, index: usize) -> Option<&Type> {
        match self {
            Params::Unary(param) => (index == 0).then_some(param),
            Params::Tuple(params) => params.get(index),
            Params::Variadic(element) => Some(element),
        }
    }

    /// Whether these parameters accept arguments of types `args`.
    pub fn takes(&self, args: &[Type]) -> bool {
        if self.arity().is_some_and(|n| n != args.len()) {
            return false;
        }
        args.iter()
            .enumerate()
            .all(|(i, arg)| self.expected(i).is_some_and(|param| param.accepts(arg)))
    }

    /// Replace every pattern that accepts `ty` with `ty` itself.
    pub fn narrowed_to(&self, ty: &Type) -> Params {
        let narrow = |param: &Type| {
            if param.accepts(ty) {
                ty.clone()
            } else {
                param.clone()
            }
        };
        match self {
            Params::Unary(param) => Params::Unary(narrow(param)),
            Params::Tuple(params) => Params::Tuple(params.iter().map(narrow).collect()),
            Params::Variadic(element) => Params::Variadic(narrow(element)),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::Unary(param) => write!(f, "{param}"),
            Params::Tuple(params) => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
            Params::Variadic(element) => write!(f, "({element}...)"),
        }
    }
}

/// Computes a result type from the call's argument expressions.
pub type InferShape = fn(&CallArgs<'_>) -> Outcome<Type>;

/// A result type that depends on the static structure of the arguments,
/// e.g. the literal size passed to `eye` or the arities of `INIT`'s vectors.
#[derive(Clone)]
pub struct ShapeFactory {
    pub name: &'static str,
    /// What the result looks like before resolution.
    pub hint: Type,
    pub infer: InferShape,
    /// Every operand must have the first operand's type; resolution narrows
    /// the parameters to it.
    pub uniform: bool,
}

impl ShapeFactory {
    pub fn new(name: &'static str, hint: Type, infer: InferShape) -> Self {
        ShapeFactory {
            name,
            hint,
            infer,
            uniform: false,
        }
    }

    pub fn uniform(name: &'static str, hint: Type, infer: InferShape) -> Self {
        ShapeFactory {
            uniform: true,
            ..ShapeFactory::new(name, hint, infer)
        }
    }
}

// Factories are identified by name; function pointers have no stable identity.
impl PartialEq for ShapeFactory {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.hint == other.hint && self.uniform == other.uniform
    }
}

impl fmt::Debug for ShapeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeFactory({} -> {})", self.name, self.hint)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResultType {
    Known(Type),
    Factory(ShapeFactory),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub params: Params,
    pub result: ResultType,
}

impl FunctionType {
    pub fn new(params: Params, result: Type) -> Self {
        FunctionType {
            params,
            result: ResultType::Known(result),
        }
    }

    pub fn shaped(params: Params, factory: ShapeFactory) -> Self {
        FunctionType {
            params,
            result: ResultType::Factory(factory),
        }
    }

    /// Whether the result type is fixed without looking at the call.
    pub fn is_final(&self) -> bool {
        matches!(self.result, ResultType::Known(_))
    }

    /// The result type; for an unresolved factory, its hint.
    pub fn result_type(&self) -> Type {
        match &self.result {
            ResultType::Known(ty) => ty.clone(),
            ResultType::Factory(factory) => factory.hint.clone(),
        }
    }

    /// Fix the result type for one call.
    ///
    /// Known results succeed unchanged. Factories run against `args`; the
    /// returned function type always has a `Known` result, even when the
    /// outcome is a warning or failure. Uniform factories also narrow the
    /// parameters to the first argument's shape, keeping only dimensions
    /// every argument knows.
    pub fn resolve(&self, args: &CallArgs<'_>) -> Outcome<FunctionType> {
        match &self.result {
            ResultType::Known(_) => Outcome::success(self.clone()),
            ResultType::Factory(factory) => {
                let params = if factory.uniform {
                    let shape = args
                        .types()
                        .fold(args.ty(0).clone(), |shape, ty| shape.open_where(ty));
                    self.params.narrowed_to(&shape)
                } else {
                    self.params.clone()
                };
                (factory.infer)(args).map(|ty| FunctionType::new(params, ty))
            }
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.params, self.result_type())
    }
}

static UNDEFINED: Type = Type::Undefined;

/// The argument expressions of one call, as seen by a shape factory.
#[derive(Copy, Clone)]
pub struct CallArgs<'a> {
    arena: &'a ExprArena,
    types: &'a TypeTable,
    args: &'a [ExprId],
}

impl<'a> CallArgs<'a> {
    pub fn new(arena: &'a ExprArena, types: &'a TypeTable, args: &'a [ExprId]) -> Self {
        CallArgs { arena, types, args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Inferred type of argument `index`; `Undefined` past the end.
    pub fn ty(&self, index: usize) -> &'a Type {
        match self.args.get(index) {
            Some(&arg) => self.types.get(arg),
            None => &UNDEFINED,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &'a Type> + 'a {
        let types = self.types;
        self.args.iter().map(move |&arg| types.get(arg))
    }

    /// Value of argument `index` when it is an integer literal.
    pub fn int_literal(&self, index: usize) -> Option<i64> {
        self.args
            .get(index)
            .and_then(|&arg| self.arena.int_literal(arg))
    }
}
