use crate::{
    ast::BinaryOperator,
    interpreter::{evaluator::core::Interpreter, value::core::Value},
};

impl Interpreter {
    /// Evaluates `==` or `!=`.
    ///
    /// Uses script equality: `nil` equals only `nil`, numbers and booleans
    /// compare by value, strings by contents and every other object by
    /// identity. Never fails.
    ///
    /// # Example
    /// ```
    /// use kestrel::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let result = Interpreter::eval_equality(BinaryOperator::NotEqual, &Value::Nil, &Value::Bool(false));
    /// assert_eq!(result, Value::Bool(true));
    /// ```
    #[must_use]
    pub fn eval_equality(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        let equal = left == right;
        Value::Bool(if op == BinaryOperator::NotEqual { !equal } else { equal })
    }
}
