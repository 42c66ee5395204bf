use std::rc::Rc;

use crate::{
    ast::{Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Unwind},
        value::{callable::Function, core::Value},
    },
};

impl Interpreter {
    /// Executes a single statement.
    ///
    /// Loops consume `Break` and `Continue`; everything else propagates
    /// through the `Err` side of the result.
    pub(crate) fn execute_statement(&mut self, statement: &Stmt) -> EvalResult<()> {
        match statement {
            Stmt::Expression { expr, .. } => self.evaluate(expr).map(drop),
            Stmt::Print { expr, line } => {
                let value = self.evaluate(expr)?;
                let text = self.stringify(&value, *line)?;
                self.write_line(&text);
                Ok(())
            },
            Stmt::Var { names, initializers, .. } => self.execute_var(names, initializers),
            Stmt::Block { statements, .. } => self.execute_block(statements, self.env.child()),
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(otherwise) = else_branch {
                    self.execute(otherwise)
                } else {
                    Ok(())
                }
            },
            Stmt::While { condition, body, .. } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body) {
                        Ok(()) | Err(Unwind::Continue) => {},
                        Err(Unwind::Break) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(())
            },
            Stmt::For { initializer,
                        condition,
                        increment,
                        body,
                        .. } => self.execute_for(initializer.as_deref(),
                                                 condition.as_ref(),
                                                 increment.as_ref(),
                                                 body),
            Stmt::Foreach { names,
                            iterable,
                            body,
                            line, } => self.execute_foreach(names, iterable, body, *line),
            Stmt::In { object, body, .. } => self.execute_in(object, body),
            Stmt::Try { body, catches, .. } => self.execute_try(body, catches),
            Stmt::Throw { value, line } => {
                let value = self.evaluate(value)?;
                Err(self.throw_value(value, *line))
            },
            Stmt::Break { .. } => Err(Unwind::Break),
            Stmt::Continue { .. } => Err(Unwind::Continue),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            },
            Stmt::Function(decl) => {
                let function = Function::new(Rc::clone(decl), self.env.clone(), self.current_owner.clone());
                self.env.define(decl.name.clone(), Value::Function(Rc::new(function)));
                Ok(())
            },
            Stmt::Class(decl) => self.declare_class(decl),
            Stmt::Module(decl) => self.declare_module(decl),
        }
    }

    /// `var a, b = ...;`
    ///
    /// With one initializer per name each name binds its own value. With a
    /// single initializer for several names, an array is destructured over
    /// the names, missing elements binding `nil`; any other value binds the
    /// first name and the rest get `nil`.
    fn execute_var(&mut self, names: &[String], initializers: &[Expr]) -> EvalResult<()> {
        let mut values = Vec::with_capacity(initializers.len());
        for initializer in initializers {
            values.push(self.evaluate(initializer)?);
        }

        if names.len() > 1 && values.len() == 1 {
            let value = values.remove(0);
            values = value.as_array().unwrap_or_else(|| vec![value]);
        }

        let mut values = values.into_iter();
        for name in names {
            self.env.define(name.clone(), values.next().unwrap_or_default());
        }
        Ok(())
    }

    /// Consumes the result of a function body.
    pub(crate) fn finish_body(result: EvalResult<()>, line: usize) -> EvalResult<Value> {
        match result {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Break) => Err(RuntimeError::StrayControlFlow { keyword: "break", line }.into()),
            Err(Unwind::Continue) => {
                Err(RuntimeError::StrayControlFlow { keyword: "continue", line }.into())
            },
            Err(other) => Err(other),
        }
    }
}
