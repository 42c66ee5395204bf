use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// Failures of environment lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// The name is not bound in any searched scope.
    #[error("Undefined variable '{name}'")]
    Undefined {
        /// The name looked up.
        name: String,
    },
    /// A hop count walked past the outermost scope.
    #[error("No scope {hops} levels up while looking up '{name}'")]
    NoAncestor {
        /// The name looked up.
        name: String,
        /// The requested distance.
        hops: usize,
    },
}

#[derive(Debug, Default)]
struct Scope {
    values:    HashMap<String, Value>,
    enclosing: Option<Env>,
}

/// A lexical scope and, through `enclosing`, the whole chain above it.
///
/// Cloning an `Env` clones the handle, not the scope: closures and the
/// interpreter share scopes by reference. A scope's enclosing link is fixed
/// when it is created.
#[derive(Debug, Clone, Default)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// Creates a scope with no enclosing scope.
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// Creates a new scope enclosed by `self`.
    ///
    /// # Example
    /// ```
    /// use kestrel::interpreter::{environment::Env, value::core::Value};
    ///
    /// let globals = Env::global();
    /// globals.define("x", Value::Number(1.0));
    ///
    /// let local = globals.child();
    /// local.define("x", Value::Number(2.0));
    ///
    /// assert_eq!(local.get("x", false).unwrap(), Value::Number(2.0));
    /// assert_eq!(local.get_at(1, "x").unwrap(), Value::Number(1.0));
    /// ```
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope { values:    HashMap::new(),
                                          enclosing: Some(self.clone()), })))
    }

    /// The scope directly enclosing this one.
    #[must_use]
    pub fn enclosing(&self) -> Option<Self> {
        self.0.borrow().enclosing.clone()
    }

    /// Binds `name` in this scope, shadowing or replacing any earlier
    /// binding. Never fails.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().values.insert(name.into(), value);
    }

    /// Looks up `name` here and, if `search_enclosing`, in every enclosing
    /// scope.
    ///
    /// # Errors
    /// `EnvError::Undefined` if no searched scope binds the name.
    pub fn get(&self, name: &str, search_enclosing: bool) -> Result<Value, EnvError> {
        let mut env = self.clone();
        loop {
            let next = {
                let scope = env.0.borrow();
                if let Some(value) = scope.values.get(name) {
                    return Ok(value.clone());
                }
                scope.enclosing.clone()
            };
            match next {
                Some(enclosing) if search_enclosing => env = enclosing,
                _ => return Err(EnvError::Undefined { name: name.to_string() }),
            }
        }
    }

    /// Rebinds an existing `name` here and, if `search_enclosing`, in the
    /// nearest enclosing scope that binds it.
    ///
    /// # Errors
    /// `EnvError::Undefined` if the name was never defined in a searched
    /// scope.
    pub fn assign(&self, name: &str, value: Value, search_enclosing: bool) -> Result<(), EnvError> {
        let mut env = self.clone();
        loop {
            let next = {
                let mut scope = env.0.borrow_mut();
                if let Some(slot) = scope.values.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
                scope.enclosing.clone()
            };
            match next {
                Some(enclosing) if search_enclosing => env = enclosing,
                _ => return Err(EnvError::Undefined { name: name.to_string() }),
            }
        }
    }

    /// Reads `name` exactly `hops` scopes up, without further searching.
    ///
    /// # Errors
    /// - `EnvError::NoAncestor` if the chain is shorter than `hops`.
    /// - `EnvError::Undefined` if that scope does not bind the name.
    pub fn get_at(&self, hops: usize, name: &str) -> Result<Value, EnvError> {
        self.ancestor(hops, name)?.get(name, false)
    }

    /// Rebinds `name` exactly `hops` scopes up, without further searching.
    ///
    /// # Errors
    /// Same as [`Env::get_at`].
    pub fn assign_at(&self, hops: usize, name: &str, value: Value) -> Result<(), EnvError> {
        self.ancestor(hops, name)?.assign(name, value, false)
    }

    fn ancestor(&self, hops: usize, name: &str) -> Result<Self, EnvError> {
        let mut env = self.clone();
        for _ in 0..hops {
            env = env.enclosing()
                     .ok_or_else(|| EnvError::NoAncestor { name: name.to_string(),
                                                           hops })?;
        }
        Ok(env)
    }
}
