//! Compile-time lexical scopes.
//!
//! Scopes live in an arena and link to their parent by [`ScopeId`]. Each
//! scope remembers the child it created for every block statement, so a
//! block visited twice gets the same scope back. The global scope holds the
//! builtins and is never in a loop.

use std::fmt;

use mtx_ir::{Name, Span, StmtId, StringInterner};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::builtins::declare_builtins;
use crate::Type;

/// A declared name.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: Name,
    pub ty: Type,
    /// Where it was first declared; dummy for builtins.
    pub span: Span,
}

impl Symbol {
    pub fn new(name: Name, ty: Type, span: Span) -> Self {
        Symbol { name, ty, span }
    }

    pub fn builtin(name: Name, ty: Type) -> Self {
        Symbol::new(name, ty, Span::DUMMY)
    }
}

/// Index of a scope in the [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        let index = u32::try_from(index)
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("scope arena overflow"));
        ScopeId(index)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: FxHashMap<Name, Symbol>,
    /// Fixed at creation.
    in_loop: bool,
    children: FxHashMap<StmtId, ScopeId>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, in_loop: bool) -> Self {
        Scope {
            parent,
            symbols: FxHashMap::default(),
            in_loop,
            children: FxHashMap::default(),
        }
    }
}

/// Chain of lexical scopes with a cursor on the current one.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table with an empty global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(None, false)],
            current: ScopeId::GLOBAL,
        }
    }

    /// A table whose global scope holds every builtin signature.
    pub fn with_builtins(interner: &StringInterner) -> Self {
        let mut table = Self::new();
        declare_builtins(&mut table, interner);
        table
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of scopes created so far, the global one included.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Whether `break`/`continue` are legal in the current scope.
    pub fn in_loop(&self) -> bool {
        self.scope(self.current).in_loop
    }

    /// Declare `symbol` in the current scope.
    ///
    /// Returns the previous type when the name was already declared here
    /// with a different type; the new type replaces it either way.
    pub fn declare(&mut self, symbol: Symbol) -> Option<Type> {
        let scope = self.current;
        let previous = self
            .scope_mut(scope)
            .symbols
            .insert(symbol.name, symbol.clone())?;
        (previous.ty != symbol.ty).then_some(previous.ty)
    }

    /// Change the type of the nearest visible `name`.
    ///
    /// Returns the type it had, or `None` when no scope declares it.
    pub fn rebind(&mut self, name: Name, ty: Type) -> Option<Type> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = self.scope_mut(id);
            if let Some(symbol) = scope.symbols.get_mut(&name) {
                return Some(std::mem::replace(&mut symbol.ty, ty));
            }
            cursor = scope.parent;
        }
        None
    }

    /// Resolve `name` through the scope chain.
    pub fn lookup(&self, name: Name) -> Option<&Symbol> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if let Some(symbol) = scope.symbols.get(&name) {
                return Some(symbol);
            }
            cursor = scope.parent;
        }
        None
    }

    /// The scope already created for `block` under the current scope.
    pub fn child_scope(&self, block: StmtId) -> Option<ScopeId> {
        self.scope(self.current).children.get(&block).copied()
    }

    /// Create the scope for `block` under the current scope.
    ///
    /// `in_loop` of `None` inherits the current scope's loop context. A
    /// second call for the same block returns the existing scope unchanged.
    pub fn create_child_scope(&mut self, block: StmtId, in_loop: Option<bool>) -> ScopeId {
        if let Some(existing) = self.child_scope(block) {
            return existing;
        }
        let parent = self.current;
        let in_loop = in_loop.unwrap_or_else(|| self.in_loop());
        let id = ScopeId::from_index(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent), in_loop));
        self.scope_mut(parent).children.insert(block, id);
        trace!(?id, ?parent, ?block, in_loop, "created scope");
        id
    }

    /// Make the scope of `block` current. Returns `false` if no scope was
    /// created for it.
    pub fn push_scope(&mut self, block: StmtId) -> bool {
        match self.child_scope(block) {
            Some(id) => {
                trace!(?id, "push scope");
                self.current = id;
                true
            }
            None => false,
        }
    }

    /// Return to the parent scope. The global scope has none.
    pub fn pop_scope(&mut self) -> Option<ScopeId> {
        let parent = self.scope(self.current).parent?;
        trace!(from = ?self.current, to = ?parent, "pop scope");
        self.current = parent;
        Some(parent)
    }

    /// Create (if needed) and enter the scope for `block`.
    pub fn enter_block(&mut self, block: StmtId, in_loop: Option<bool>) -> ScopeId {
        let id = self.create_child_scope(block, in_loop);
        self.current = id;
        trace!(?id, "push scope");
        id
    }
}
