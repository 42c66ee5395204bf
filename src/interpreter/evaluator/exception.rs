use std::rc::Rc;

use crate::{
    ast::{CatchClause, Stmt},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Unwind},
        value::{
            core::Value,
            instance::{Instance, Internal},
        },
    },
};

/// The built-in error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The root of the hierarchy.
    Error,
    /// Wrong number, name or shape of arguments.
    ArgumentError,
    /// An operation applied to a value of the wrong type.
    TypeError,
    /// An undefined variable.
    NameError,
    /// A bad value for an otherwise valid operation.
    LogicError,
    /// A write to a frozen object.
    FrozenObjectError,
    /// A call of a method the receiver does not have.
    NoSuchMethodError,
    /// A call of an undefined function.
    NoSuchFunctionError,
    /// A failed `assert`.
    AssertionError,
    /// A file or source string that could not be loaded.
    LoadError,
}

impl ErrorKind {
    /// Every kind, root first. Bootstrap creates the classes in this order.
    pub const ALL: [Self; 10] = [Self::Error,
                                 Self::ArgumentError,
                                 Self::TypeError,
                                 Self::NameError,
                                 Self::LogicError,
                                 Self::FrozenObjectError,
                                 Self::NoSuchMethodError,
                                 Self::NoSuchFunctionError,
                                 Self::AssertionError,
                                 Self::LoadError];

    /// The class name scripts see.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::ArgumentError => "ArgumentError",
            Self::TypeError => "TypeError",
            Self::NameError => "NameError",
            Self::LogicError => "LogicError",
            Self::FrozenObjectError => "FrozenObjectError",
            Self::NoSuchMethodError => "NoSuchMethodError",
            Self::NoSuchFunctionError => "NoSuchFunctionError",
            Self::AssertionError => "AssertionError",
            Self::LoadError => "LoadError",
        }
    }
}

impl Interpreter {
    /// Creates an instance of a built-in error class with `message` set.
    pub(crate) fn error_value(&self, kind: ErrorKind, message: impl Into<String>) -> Value {
        let error = Instance::new(Rc::clone(self.core.error(kind)), Internal::None);
        error.set_prop("message", self.string_value(message));
        Value::Instance(Rc::new(error))
    }

    /// Throws a built-in error from host code.
    ///
    /// # Returns
    /// The unwind to propagate, typically through `Err(...)`.
    pub(crate) fn raise(&mut self, kind: ErrorKind, message: impl Into<String>, line: usize) -> Unwind {
        let message = message.into();
        tracing::trace!(kind = kind.name(), %message, line, "native error raised");
        let error = self.error_value(kind, message);
        self.throw_value(error, line)
    }

    /// Throws `value`, recording a frame for the throw site.
    pub(crate) fn throw_value(&mut self, value: Value, line: usize) -> Unwind {
        self.push_frame("throw", line);
        Unwind::Throw(value)
    }

    /// Runs `try { body } catch ...`.
    ///
    /// A thrown value is handed to the first clause whose matcher equals it,
    /// or, for an instance and a class matcher, whose class the value is an
    /// instance of. The stack is cut back to its depth at the `try` before
    /// the handler runs. Unmatched values keep unwinding.
    pub(crate) fn execute_try(&mut self, body: &[Stmt], catches: &[CatchClause]) -> EvalResult<()> {
        let depth = self.stack.len();
        let call_depth = self.call_depth;
        let thrown = match self.execute_block(body, self.env.child()) {
            Err(Unwind::Throw(value)) => value,
            other => return other,
        };

        for clause in catches {
            let matcher = self.evaluate(&clause.matcher)?;
            if !Self::catches(&matcher, &thrown) {
                continue;
            }
            self.stack.truncate(depth);
            self.call_depth = call_depth;
            let scope = self.env.child();
            return match &clause.name {
                Some(name) => {
                    scope.define(name.clone(), thrown);
                    self.execute_block(&clause.body, scope.child())
                },
                None => self.execute_block(&clause.body, scope),
            };
        }
        Err(Unwind::Throw(thrown))
    }

    /// The `catch` matching rule.
    fn catches(matcher: &Value, thrown: &Value) -> bool {
        if matcher == thrown {
            return true;
        }
        match (matcher, thrown) {
            (Value::Class(class), Value::Instance(instance)) => instance.class.is_a(class),
            _ => false,
        }
    }
}
