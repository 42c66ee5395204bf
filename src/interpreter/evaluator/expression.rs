use std::rc::Rc;

use crate::{
    ast::{Expr, ExprId, LiteralValue, LogicalOperator},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            callable::Function,
            core::Value,
            instance::{Instance, Internal},
            map_key::MapTable,
        },
    },
};

impl Interpreter {
    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the dispatch point for every expression variant. Operators,
    /// calls and member access are delegated to their own modules.
    pub(crate) fn evaluate_expression(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                LiteralValue::Str(text) => self.string_value(text.clone()),
                scalar => Value::from_scalar_literal(scalar).unwrap_or_default(),
            }),
            Expr::StaticStr { id, text, .. } => Ok(self.static_string(*id, text)),
            Expr::Grouping { expr, .. } => self.evaluate(expr),
            Expr::Variable { id, name, line } => self.lookup_variable(*id, name, *line),
            Expr::Assign { id,
                           name,
                           value,
                           line, } => {
                let value = self.evaluate(value)?;
                self.assign_variable(*id, name, value.clone(), *line)?;
                Ok(value)
            },
            Expr::Unary { op, expr, line } => {
                let value = self.evaluate(expr)?;
                self.eval_unary(*op, &value, *line)
            },
            Expr::Binary { left,
                           op,
                           right,
                           line, } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.eval_binary(*op, &left, &right, *line)
            },
            Expr::Logical { left, op, right, .. } => {
                let left = self.evaluate(left)?;
                match (op, left.is_truthy()) {
                    (LogicalOperator::Or, true) | (LogicalOperator::And, false) => Ok(left),
                    _ => self.evaluate(right),
                }
            },
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, *line),
            Expr::Get { object, name, line } => {
                let object = self.evaluate(object)?;
                self.get_property(&object, name, *line)
            },
            Expr::Set { object,
                        name,
                        value,
                        line, } => {
                let object = self.evaluate(object)?;
                let value = self.evaluate(value)?;
                self.set_property(&object, name, value.clone(), *line)?;
                Ok(value)
            },
            Expr::Index { object, index, line } => {
                let object = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                self.call_method(&object, "indexGet", vec![index], *line)
            },
            Expr::IndexSet { object,
                             index,
                             value,
                             line, } => {
                let object = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                let value = self.evaluate(value)?;
                self.call_method(&object, "indexSet", vec![index, value.clone()], *line)?;
                Ok(value)
            },
            Expr::This { id, line } => self.lookup_variable(*id, "this", *line),
            Expr::SuperGet { id, name, line } => self.eval_super_get(*id, name, *line),
            Expr::SuperSet { id,
                             name,
                             value,
                             line, } => {
                let value = self.evaluate(value)?;
                self.eval_super_set(*id, name, value.clone(), *line)?;
                Ok(value)
            },
            Expr::Array { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.evaluate(element)?);
                }
                Ok(self.array_value(items))
            },
            Expr::Map { entries, .. } => {
                let mut table = MapTable::default();
                for (key, value) in entries {
                    let key = self.evaluate(key)?;
                    let value = self.evaluate(value)?;
                    table.insert(key, value);
                }
                Ok(self.map_value(table))
            },
            Expr::Function { decl, .. } => {
                let function = Function::new(Rc::clone(decl), self.env.clone(), self.current_owner.clone());
                Ok(Value::Function(Rc::new(function)))
            },
        }
    }

    /// The frozen instance for an `s"..."` site, created on first use.
    fn static_string(&mut self, id: ExprId, text: &str) -> Value {
        if let Some(instance) = self.static_strings.get(&id) {
            return Value::Instance(Rc::clone(instance));
        }
        let instance = Rc::new(Instance::new(Rc::clone(&self.core.string),
                                             Internal::Str(text.to_string())));
        instance.freeze();
        self.static_strings.insert(id, Rc::clone(&instance));
        Value::Instance(instance)
    }
}
