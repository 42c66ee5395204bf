use crate::{
    ast::UnaryOperator,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a unary operation on a value.
    ///
    /// - `Negate` requires a number.
    /// - `Not` works on anything and negates its truthiness.
    ///
    /// # Errors
    /// `TypeError` when negating a non-number.
    pub(crate) fn eval_unary(&mut self, op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(self.raise(ErrorKind::TypeError,
                                        format!("Operand of '-' must be a number, got {}", other.describe()),
                                        line)),
            },
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}
