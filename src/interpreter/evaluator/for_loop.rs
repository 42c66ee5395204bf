use crate::{
    ast::{Expr, Stmt},
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter, Unwind},
            exception::ErrorKind,
        },
        value::{core::Value, instance::Internal},
    },
};

/// What one loop iteration produced.
enum Flow {
    Next,
    Stop,
}

impl Interpreter {
    /// Evaluates a C-style `for` loop.
    ///
    /// The initializer runs once in a scope of its own, enclosing every
    /// iteration. A missing condition counts as `true`. `continue` still runs
    /// the increment.
    ///
    /// # Parameters
    /// - `initializer`: Optional `var` or expression statement.
    /// - `condition`: Checked before each iteration.
    /// - `increment`: Evaluated after each iteration.
    /// - `body`: The loop body.
    pub(crate) fn execute_for(&mut self,
                              initializer: Option<&Stmt>,
                              condition: Option<&Expr>,
                              increment: Option<&Expr>,
                              body: &Stmt)
                              -> EvalResult<()> {
        self.with_env(self.env.child(), |this| {
                if let Some(init) = initializer {
                    this.execute(init)?;
                }
                loop {
                    if let Some(condition) = condition
                       && !this.evaluate(condition)?.is_truthy()
                    {
                        break;
                    }
                    if let Flow::Stop = Self::iteration(this.execute(body))? {
                        break;
                    }
                    if let Some(increment) = increment {
                        this.evaluate(increment)?;
                    }
                }
                Ok(())
            })
    }

    /// Evaluates `foreach a, b in iterable { body }`.
    ///
    /// - Arrays yield their elements. With several names an element that is
    ///   an array is destructured over them.
    /// - Maps yield keys, or key and value with two names.
    /// - Strings yield one-character strings.
    ///
    /// The collection is snapshotted before the first iteration; each
    /// iteration gets a fresh scope for the loop variables.
    ///
    /// # Errors
    /// `TypeError` for any other value.
    pub(crate) fn execute_foreach(&mut self,
                                  names: &[String],
                                  iterable: &Expr,
                                  body: &Stmt,
                                  line: usize)
                                  -> EvalResult<()> {
        let collection = self.evaluate(iterable)?;
        let rows = self.foreach_rows(&collection, names.len(), line)?;

        for row in rows {
            let scope = self.env.child();
            let mut row = row.into_iter();
            for name in names {
                scope.define(name.clone(), row.next().unwrap_or_default());
            }
            if let Flow::Stop = Self::iteration(self.with_env(scope, |this| this.execute(body)))? {
                break;
            }
        }
        Ok(())
    }

    fn foreach_rows(&mut self, collection: &Value, width: usize, line: usize) -> EvalResult<Vec<Vec<Value>>> {
        let Some(instance) = collection.as_instance() else {
            return Err(self.raise(ErrorKind::TypeError,
                                  format!("Can't iterate over {}", collection.describe()),
                                  line));
        };
        let internal = instance.internal.borrow().clone();
        match internal {
            Internal::Array(items) => Ok(items.into_iter()
                                              .map(|item| match item.as_array() {
                                                  Some(parts) if width > 1 => parts,
                                                  _ => vec![item],
                                              })
                                              .collect()),
            Internal::Map(table) => Ok(table.entries()
                                            .into_iter()
                                            .map(|(key, value)| vec![key, value])
                                            .collect()),
            Internal::Str(text) => Ok(text.chars()
                                          .map(|c| vec![self.string_value(c.to_string())])
                                          .collect()),
            Internal::None => Err(self.raise(ErrorKind::TypeError,
                                             format!("Can't iterate over {}", collection.describe()),
                                             line)),
        }
    }

    /// Folds `Break` and `Continue` out of an iteration's result.
    fn iteration(result: EvalResult<()>) -> EvalResult<Flow> {
        match result {
            Ok(()) | Err(Unwind::Continue) => Ok(Flow::Next),
            Err(Unwind::Break) => Ok(Flow::Stop),
            Err(other) => Err(other),
        }
    }
}
