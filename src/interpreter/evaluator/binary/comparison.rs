use std::cmp::Ordering;

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

/// Maps an ordering onto the result of a relational operator. `None` (a NaN
/// operand) makes every comparison false.
#[must_use]
pub fn relational_result(op: BinaryOperator, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinaryOperator::Less => ordering.is_lt(),
        BinaryOperator::LessEqual => ordering.is_le(),
        BinaryOperator::Greater => ordering.is_gt(),
        BinaryOperator::GreaterEqual => ordering.is_ge(),
        _ => false,
    }
}

impl Interpreter {
    /// Evaluates a relational comparison `<`, `<=`, `>` or `>=`.
    ///
    /// Two numbers compare numerically and two strings lexicographically.
    ///
    /// # Errors
    /// `TypeError` for any other pair of operands.
    pub(crate) fn eval_comparison(&mut self,
                                  op: BinaryOperator,
                                  left: &Value,
                                  right: &Value,
                                  line: usize)
                                  -> EvalResult<Value> {
        if let (Value::Number(a), Value::Number(b)) = (left, right) {
            return Ok(Value::Bool(relational_result(op, a.partial_cmp(b))));
        }
        if let (Some(a), Some(b)) = (left.as_str(), right.as_str()) {
            return Ok(Value::Bool(relational_result(op, Some(a.cmp(&b)))));
        }
        Err(self.raise(ErrorKind::TypeError,
                       format!("Can't compare {} {op} {}", left.describe(), right.describe()),
                       line))
    }
}
