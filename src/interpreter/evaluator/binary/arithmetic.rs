use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `+`, `-`, `*` or `/`.
    ///
    /// Two numbers compute with IEEE semantics, so dividing by zero yields an
    /// infinity. When the left operand is not a number the operator calls
    /// its protocol method on it with the right operand, which is how
    /// `"1" + "1"` concatenates.
    ///
    /// # Errors
    /// `TypeError` when a number meets a non-number on the right, or the
    /// left operand has no protocol method.
    pub(crate) fn eval_arithmetic(&mut self,
                                  op: BinaryOperator,
                                  left: &Value,
                                  right: &Value,
                                  line: usize)
                                  -> EvalResult<Value> {
        if let Value::Number(a) = left {
            let Value::Number(b) = right else {
                return Err(self.raise(ErrorKind::TypeError,
                                      format!("Can't apply '{op}' to number and {}", right.describe()),
                                      line));
            };
            return Ok(Value::Number(Self::apply_arithmetic(op, *a, *b)));
        }

        let Some(method) = op.protocol_method() else {
            return Err(self.raise(ErrorKind::TypeError, format!("'{op}' is not arithmetic"), line));
        };
        if self.find_member(left, method).is_none() {
            return Err(self.raise(ErrorKind::TypeError,
                                  format!("Can't apply '{op}' to {}: no '{method}' method", left.describe()),
                                  line));
        }
        self.call_method(left, method, vec![right.clone()], line)
    }

    /// The number result of an arithmetic operator.
    #[must_use]
    pub const fn apply_arithmetic(op: BinaryOperator, a: f64, b: f64) -> f64 {
        match op {
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => a / b,
            _ => a + b,
        }
    }
}
