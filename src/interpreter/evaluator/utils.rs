use std::rc::Rc;

use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::Callable,
            class::{Class, ClassKind, Table},
            core::Value,
            instance::{Instance, Internal},
            map_key::MapTable,
        },
    },
    util::num::{f64_to_index_checked, format_number},
};

impl Interpreter {
    /// A fresh String instance.
    pub(crate) fn string_value(&self, text: impl Into<String>) -> Value {
        Value::Instance(Rc::new(Instance::new(Rc::clone(&self.core.string), Internal::Str(text.into()))))
    }

    /// A fresh Array instance.
    pub(crate) fn array_value(&self, items: Vec<Value>) -> Value {
        Value::Instance(Rc::new(Instance::new(Rc::clone(&self.core.array), Internal::Array(items))))
    }

    /// A fresh Map instance.
    pub(crate) fn map_value(&self, table: MapTable) -> Value {
        Value::Instance(Rc::new(Instance::new(Rc::clone(&self.core.map), Internal::Map(table))))
    }

    /// The class whose methods a value answers to.
    ///
    /// Instances answer to their class, numbers to `Number`, functions to
    /// `Function`, classes to `Class` and modules to `Module`. `nil` and the
    /// booleans only have `Object`.
    #[must_use]
    pub fn class_of(&self, value: &Value) -> Rc<Class> {
        let class = match value {
            Value::Nil | Value::Bool(_) => &self.core.object,
            Value::Number(_) => &self.core.number,
            Value::Function(_) | Value::Native(_) => &self.core.function,
            Value::Class(class) if class.kind == ClassKind::Module => &self.core.module,
            Value::Class(_) => &self.core.class,
            Value::Instance(instance) => &instance.class,
        };
        Rc::clone(class)
    }

    /// Converts a value to the text `print` shows.
    ///
    /// Instances other than strings are converted by calling their
    /// `toString` method; a result that is not a string falls back to
    /// `<Name instance>`.
    pub fn stringify(&mut self, value: &Value, line: usize) -> EvalResult<String> {
        match value {
            Value::Nil => Ok("nil".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(format_number(*n)),
            Value::Function(function) => Ok(format!("<fn {}>", function.decl.name)),
            Value::Native(native) => Ok(format!("<native fn {}>", native.name)),
            Value::Class(class) => Ok(class.name.clone()),
            Value::Instance(instance) => {
                if let Some(text) = value.as_str() {
                    return Ok(text);
                }
                let Some(method) = instance.class.find(Table::Methods, "toString") else {
                    return Ok(format!("<{} instance>", instance.class.name));
                };
                let result = self.call_callable(&method.bind(value.clone()), Vec::new(), Vec::new(), line)?;
                Ok(result.as_str()
                         .unwrap_or_else(|| format!("<{} instance>", instance.class.name)))
            },
        }
    }

    /// Like [`Interpreter::stringify`], but strings are shown quoted. Used
    /// for elements inside array and map renderings.
    pub(crate) fn inspect(&mut self, value: &Value, line: usize) -> EvalResult<String> {
        match value.as_str() {
            Some(text) => Ok(format!("{text:?}")),
            None => self.stringify(value, line),
        }
    }

    /// Requires a string argument.
    pub(crate) fn expect_str(&mut self, value: &Value, what: &str, line: usize) -> EvalResult<String> {
        value.as_str()
             .ok_or_else(|| self.raise(ErrorKind::TypeError,
                                       format!("{what} must be a string, got {}", value.describe()),
                                       line))
    }

    /// Requires a number argument.
    pub(crate) fn expect_number(&mut self, value: &Value, what: &str, line: usize) -> EvalResult<f64> {
        match value {
            Value::Number(n) => Ok(*n),
            other => Err(self.raise(ErrorKind::TypeError,
                                    format!("{what} must be a number, got {}", other.describe()),
                                    line)),
        }
    }

    /// Requires a non-negative integral number usable as an index.
    pub(crate) fn expect_index(&mut self, value: &Value, line: usize) -> EvalResult<usize> {
        let number = self.expect_number(value, "Index", line)?;
        f64_to_index_checked(number, ()).map_err(|()| {
                                            self.raise(ErrorKind::ArgumentError,
                                                       format!("Invalid index {}", format_number(number)),
                                                       line)
                                        })
    }

    /// Requires a callable argument.
    pub(crate) fn expect_callable(&mut self, value: &Value, what: &str, line: usize) -> EvalResult<Callable> {
        value.as_callable()
             .ok_or_else(|| self.raise(ErrorKind::TypeError,
                                       format!("{what} must be callable, got {}", value.describe()),
                                       line))
    }

    /// Requires a class or module argument.
    pub(crate) fn expect_class(&mut self, value: &Value, what: &str, line: usize) -> EvalResult<Rc<Class>> {
        match value {
            Value::Class(class) => Ok(Rc::clone(class)),
            other => Err(self.raise(ErrorKind::TypeError,
                                    format!("{what} must be a class or module, got {}", other.describe()),
                                    line)),
        }
    }

    /// Refuses to mutate a frozen instance.
    pub(crate) fn ensure_unfrozen(&mut self, instance: &Instance, line: usize) -> EvalResult<()> {
        if instance.is_frozen() {
            return Err(self.raise(ErrorKind::FrozenObjectError,
                                  format!("Can't modify frozen {}", instance.class.name),
                                  line));
        }
        Ok(())
    }
}
