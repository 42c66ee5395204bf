use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a binary operation between two values.
    ///
    /// Arithmetic operators go to `eval_arithmetic`, relational ones to
    /// `eval_comparison` and equality to `eval_equality`. Both operands are
    /// already evaluated, left first.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use kestrel::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let mut interpreter = Interpreter::default();
    /// let sum = interpreter.eval_binary(BinaryOperator::Add, &Value::Number(3.0), &Value::Number(4.0), 1)
    ///                      .unwrap();
    ///
    /// assert_eq!(sum, Value::Number(7.0));
    /// ```
    pub fn eval_binary(&mut self,
                       op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };

        match op {
            Add | Sub | Mul | Div => self.eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual => self.eval_comparison(op, left, right, line),
            Equal | NotEqual => Ok(Self::eval_equality(op, left, right)),
        }
    }
}
