//! Runtime variable frames.
//!
//! One frame per executed block, branch or loop iteration, linked to the
//! frame that was current when it was pushed. Frames are per execution;
//! the compile-time scopes in `mtx_types` are per syntactic block.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mtx_ir::Name;
use rustc_hash::FxHashMap;

use crate::Value;

/// Shared, single-threaded handle to a frame.
///
/// Children keep their parent alive through it; all frames are created
/// through [`LocalScope::new`].
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

/// A single frame of bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Declare `name` in this frame; a declaration without a value holds
    /// `Unit` until updated.
    #[inline]
    pub fn create(&mut self, name: Name, value: Option<Value>) {
        self.bindings.insert(name, value.unwrap_or_default());
    }

    /// Replace the value of the nearest frame declaring `name`.
    pub fn update(&mut self, name: Name, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => false,
        }
    }

    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.borrow().contains(name))
    }

    pub fn get(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().get(name)
    }

    /// Run `f` on the stored value of `name`, in place.
    pub fn with_value_mut<R>(&mut self, name: Name, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        if let Some(value) = self.bindings.get_mut(&name) {
            return Some(f(value));
        }
        self.parent.as_ref()?.borrow_mut().with_value_mut(name, f)
    }
}

/// The frame stack of one interpreter run.
pub struct Environment {
    /// Current frame last; never empty.
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Number of frames, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    fn current(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// Push a fresh frame whose parent is the current one.
    pub fn push_scope(&mut self) {
        let parent = self.current().clone();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Drop the current frame. The global frame stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn create(&mut self, name: Name, value: Option<Value>) {
        self.current().borrow_mut().create(name, value);
    }

    pub fn update(&mut self, name: Name, value: Value) -> bool {
        self.current().borrow_mut().update(name, value)
    }

    pub fn get(&self, name: Name) -> Option<Value> {
        self.current().borrow().get(name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.current().borrow().contains(name)
    }

    /// Update the nearest binding of `name`, or declare it in the current
    /// frame if there is none.
    pub fn assign(&mut self, name: Name, value: Value) {
        if self.contains(name) {
            self.update(name, value);
        } else {
            self.create(name, Some(value));
        }
    }

    pub fn with_value_mut<R>(&mut self, name: Name, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        self.current().borrow_mut().with_value_mut(name, f)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
