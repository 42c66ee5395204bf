use std::{fmt, rc::Rc};

use crate::{
    ast::LiteralValue,
    interpreter::value::{
        callable::{Callable, Function, NativeFunction},
        class::Class,
        instance::{Instance, Internal},
    },
    util::num::format_number,
};

/// Represents a runtime value in the interpreter.
///
/// Scalars are stored inline. Everything else is a shared reference, so
/// copying a value never copies an object: two variables holding the same
/// array see each other's pushes.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// Every number is a double precision float.
    Number(f64),
    /// A user-defined function or method, possibly bound to a receiver.
    Function(Rc<Function>),
    /// A function implemented by the host.
    Native(Rc<NativeFunction>),
    /// A class, module or mixin. Classes are values too.
    Class(Rc<Class>),
    /// An instance of a class, including strings, arrays, maps and errors.
    Instance(Rc<Instance>),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        match callable {
            Callable::Function(f) => Self::Function(f),
            Callable::Native(n) => Self::Native(n),
            Callable::Class(c) => Self::Class(c),
        }
    }
}

impl Value {
    /// Returns the truthiness of `self`: only `nil` and `false` are falsy.
    ///
    /// # Example
    /// ```
    /// use kestrel::interpreter::value::core::Value;
    ///
    /// assert!(Value::Number(0.0).is_truthy());
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(!Value::Bool(false).is_truthy());
    /// ```
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Returns the callable behind `self`, if it can be called.
    #[must_use]
    pub fn as_callable(&self) -> Option<Callable> {
        match self {
            Self::Function(f) => Some(Callable::Function(Rc::clone(f))),
            Self::Native(n) => Some(Callable::Native(Rc::clone(n))),
            Self::Class(c) => Some(Callable::Class(Rc::clone(c))),
            _ => None,
        }
    }

    /// Returns the instance behind `self`.
    #[must_use]
    pub const fn as_instance(&self) -> Option<&Rc<Instance>> {
        if let Self::Instance(instance) = self {
            Some(instance)
        } else {
            None
        }
    }

    /// Returns the contents if `self` is a string instance.
    #[must_use]
    pub fn as_str(&self) -> Option<String> {
        match &*self.as_instance()?.internal.borrow() {
            Internal::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Returns the elements if `self` is an array instance.
    #[must_use]
    pub fn as_array(&self) -> Option<Vec<Self>> {
        match &*self.as_instance()?.internal.borrow() {
            Internal::Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Returns `true` for numbers.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Identity of a heap value, used to key maps by object.
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Function(f) => Some(Rc::as_ptr(f).cast::<()>() as usize),
            Self::Native(n) => Some(Rc::as_ptr(n).cast::<()>() as usize),
            Self::Class(c) => Some(Rc::as_ptr(c).cast::<()>() as usize),
            Self::Instance(i) => Some(Rc::as_ptr(i).cast::<()>() as usize),
            Self::Nil | Self::Bool(_) | Self::Number(_) => None,
        }
    }

    /// A short description used in error messages, e.g. `number` or
    /// `instance of Point`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Bool(_) => "boolean".to_string(),
            Self::Number(_) => "number".to_string(),
            Self::Function(_) | Self::Native(_) => "function".to_string(),
            Self::Class(c) => format!("class {}", c.name),
            Self::Instance(i) => format!("instance of {}", i.class.name),
        }
    }
}

/// Script equality.
///
/// `nil` only equals `nil`, numbers and booleans compare by value, string
/// instances compare by contents and everything else by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                match (&*a.internal.borrow(), &*b.internal.borrow()) {
                    (Internal::Str(x), Internal::Str(y)) => x == y,
                    _ => false,
                }
            },
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Host-side rendering for debugging and test failure messages. Scripts
/// stringify through `toString` instead, see the evaluator.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Function(func) => write!(f, "<fn {}>", func.decl.name),
            Self::Native(native) => write!(f, "<native fn {}>", native.name),
            Self::Class(class) => write!(f, "{}", class.name),
            Self::Instance(instance) => match &*instance.internal.borrow() {
                Internal::Str(s) => write!(f, "{s:?}"),
                Internal::Array(items) => f.debug_list().entries(items).finish(),
                _ => write!(f, "<{} instance>", instance.class.name),
            },
        }
    }
}

impl Value {
    /// Converts a non-string literal. String literals become instances and
    /// are handled by the evaluator.
    #[must_use]
    pub const fn from_scalar_literal(literal: &LiteralValue) -> Option<Self> {
        match literal {
            LiteralValue::Nil => Some(Self::Nil),
            LiteralValue::Bool(b) => Some(Self::Bool(*b)),
            LiteralValue::Number(n) => Some(Self::Number(*n)),
            LiteralValue::Str(_) => None,
        }
    }
}
