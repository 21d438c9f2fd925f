//! Inferred type per expression, kept outside the tree.

use mtx_ir::{ExprArena, ExprId};

use crate::Type;

static UNDEFINED: Type = Type::Undefined;

/// Side table from [`ExprId`] to inferred [`Type`].
///
/// Every slot starts as `Undefined`. The Scoper writes it; later passes
/// only read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new(len: usize) -> Self {
        TypeTable {
            types: vec![Type::Undefined; len],
        }
    }

    /// A table with one slot per expression in `arena`.
    pub fn for_arena(arena: &ExprArena) -> Self {
        Self::new(arena.expr_count())
    }

    /// Type of `id`; `Undefined` for IDs the table does not cover.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Type {
        self.types.get(id.index()).unwrap_or(&UNDEFINED)
    }

    pub fn set(&mut self, id: ExprId, ty: Type) {
        let index = id.index();
        if index >= self.types.len() {
            self.types.resize(index + 1, Type::Undefined);
        }
        self.types[index] = ty;
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_undefined() {
        let table = TypeTable::new(3);
        assert_eq!(table.len(), 3);
        assert!(table.get(ExprId::new(2)).is_undefined());
        assert!(table.get(ExprId::new(10)).is_undefined());
    }

    #[test]
    fn set_grows_when_needed() {
        let mut table = TypeTable::new(1);
        table.set(ExprId::new(4), Type::Int);
        assert_eq!(table.get(ExprId::new(4)), &Type::Int);
        assert_eq!(table.len(), 5);
    }
}
