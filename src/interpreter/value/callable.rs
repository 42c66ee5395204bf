use std::{collections::HashMap, fmt, rc::Rc};

use crate::{
    ast::FunctionDecl,
    interpreter::{
        environment::Env,
        evaluator::core::{EvalResult, Interpreter},
        value::{
            class::{Class, Table},
            core::Value,
        },
    },
};

/// Specifies the allowed number of positional arguments.
///
/// - `Exact(n)` means exactly `n` arguments.
/// - `Range(min, max)` accepts anything from `min` to `max` inclusive.
/// - `AtLeast(n)` accepts `n` or more, for splat parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// Between the bounds, inclusive.
    Range(usize, usize),
    /// At least this many.
    AtLeast(usize),
}

impl Arity {
    /// Builds the tightest arity for the given bounds.
    #[must_use]
    pub const fn from_bounds(min: usize, max: Option<usize>) -> Self {
        match max {
            None => Self::AtLeast(min),
            Some(max) if max == min => Self::Exact(min),
            Some(max) => Self::Range(min, max),
        }
    }

    /// Fewest accepted arguments.
    #[must_use]
    pub const fn min(self) -> usize {
        match self {
            Self::Exact(n) | Self::Range(n, _) | Self::AtLeast(n) => n,
        }
    }

    /// Most accepted arguments, `None` if unbounded.
    #[must_use]
    pub const fn max(self) -> Option<usize> {
        match self {
            Self::Exact(n) | Self::Range(_, n) => Some(n),
            Self::AtLeast(_) => None,
        }
    }

    /// Returns `true` if `count` arguments are acceptable.
    ///
    /// # Example
    /// ```
    /// use kestrel::interpreter::value::callable::Arity;
    ///
    /// assert!(Arity::Range(1, 2).accepts(2));
    /// assert!(!Arity::Range(1, 2).accepts(3));
    /// assert!(Arity::AtLeast(1).accepts(10));
    /// ```
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self.max() {
            Some(max) => count >= self.min() && count <= max,
            None => count >= self.min(),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min}..{max}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A user-defined function or method.
pub struct Function {
    /// The declaration, shared with the AST.
    pub decl:     Rc<FunctionDecl>,
    /// The environment the function closes over. For a bound method this is
    /// a scope holding only `this`.
    pub closure:  Env,
    /// The class or module whose body defined the function; `super` lookups
    /// start above it. Closures created inside a method inherit it.
    pub owner:    Option<Rc<Class>>,
    /// The bound receiver, if any.
    pub receiver: Option<Value>,
}

impl Function {
    /// Creates an unbound function.
    #[must_use]
    pub const fn new(decl: Rc<FunctionDecl>, closure: Env, owner: Option<Rc<Class>>) -> Self {
        Self { decl,
               closure,
               owner,
               receiver: None }
    }

    /// Binds `this`: the result closes over a fresh scope, enclosed by the
    /// original closure, that defines `this`.
    #[must_use]
    pub fn bind(&self, this: Value) -> Rc<Self> {
        let closure = self.closure.child();
        closure.define("this", this.clone());
        Rc::new(Self { decl: Rc::clone(&self.decl),
                       closure,
                       owner: self.owner.clone(),
                       receiver: Some(this) })
    }

    /// Positional arity derived from the parameter list.
    #[must_use]
    pub fn arity(&self) -> Arity {
        Arity::from_bounds(self.decl.min_arity(), self.decl.max_arity())
    }
}

/// Default of a native keyword parameter, materialized at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeDefault {
    /// `nil`
    Nil,
    /// A boolean.
    Bool(bool),
    /// A string, allocated as a fresh String instance per call.
    Str(&'static str),
}

/// Arguments handed to a native function after expansion and validation.
#[derive(Debug, Default)]
pub struct NativeArgs {
    /// The receiver, `nil` for free functions.
    pub this:       Value,
    /// Positional arguments.
    pub positional: Vec<Value>,
    /// Keyword arguments, defaults already filled in.
    pub keywords:   HashMap<String, Value>,
    /// Line of the call site.
    pub line:       usize,
}

impl NativeArgs {
    /// The positional argument at `index`, or `nil` when absent.
    #[must_use]
    pub fn arg(&self, index: usize) -> Value {
        self.positional.get(index).cloned().unwrap_or_default()
    }

    /// The keyword argument `name`, or `nil` when absent.
    #[must_use]
    pub fn keyword(&self, name: &str) -> Value {
        self.keywords.get(name).cloned().unwrap_or_default()
    }
}

/// Type alias for native function handlers.
pub type NativeFn = fn(&mut Interpreter, &NativeArgs) -> EvalResult<Value>;

/// A function implemented by the host.
pub struct NativeFunction {
    /// The name reported in traces and by `Function.name`.
    pub name:     &'static str,
    /// Accepted positional argument counts.
    pub arity:    Arity,
    /// Keyword parameters and their defaults.
    pub keywords: &'static [(&'static str, NativeDefault)],
    /// The implementation.
    pub func:     NativeFn,
    /// The bound receiver, if any.
    pub receiver: Option<Value>,
}

impl NativeFunction {
    /// Returns a copy bound to `this`.
    #[must_use]
    pub fn bind(&self, this: Value) -> Rc<Self> {
        Rc::new(Self { name:     self.name,
                       arity:    self.arity,
                       keywords: self.keywords,
                       func:     self.func,
                       receiver: Some(this), })
    }
}

/// Anything that can be called.
///
/// All three variants share one contract, see [`Interpreter::call_callable`]:
/// positional arguments are checked against [`Callable::arity`] after splat
/// expansion, and keyword arguments against [`Callable::keyword_names`].
#[derive(Clone)]
pub enum Callable {
    /// A user-defined function or method.
    Function(Rc<Function>),
    /// A host function.
    Native(Rc<NativeFunction>),
    /// A class; calling it creates an instance.
    Class(Rc<Class>),
}

impl Callable {
    /// The name shown in stack traces.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Function(f) => f.decl.name.clone(),
            Self::Native(n) => n.name.to_string(),
            Self::Class(c) => c.name.clone(),
        }
    }

    /// Accepted positional argument counts. A class takes what its `init`
    /// takes.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Self::Function(f) => f.arity(),
            Self::Native(n) => n.arity,
            Self::Class(c) => c.find(Table::Methods, "init")
                               .map_or(Arity::Exact(0), |init| init.arity()),
        }
    }

    /// The receiver `this` is bound to, if any.
    #[must_use]
    pub fn receiver(&self) -> Option<Value> {
        match self {
            Self::Function(f) => f.receiver.clone(),
            Self::Native(n) => n.receiver.clone(),
            Self::Class(_) => None,
        }
    }

    /// Names accepted as keyword arguments.
    #[must_use]
    pub fn keyword_names(&self) -> Vec<String> {
        match self {
            Self::Function(f) => f.decl.keyword_names().map(str::to_string).collect(),
            Self::Native(n) => n.keywords.iter().map(|(k, _)| (*k).to_string()).collect(),
            Self::Class(c) => c.find(Table::Methods, "init")
                               .map_or_else(Vec::new, |init| init.keyword_names()),
        }
    }

    /// Returns a copy bound to `this`. Classes are returned unchanged.
    #[must_use]
    pub fn bind(&self, this: Value) -> Self {
        match self {
            Self::Function(f) => Self::Function(f.bind(this)),
            Self::Native(n) => Self::Native(n.bind(this)),
            Self::Class(c) => Self::Class(Rc::clone(c)),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<callable {}>", self.name())
    }
}
