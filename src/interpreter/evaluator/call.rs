use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{Argument, Expr, FunctionDecl, ParamKind},
    interpreter::{
        environment::{Env, EnvError},
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::{Callable, Function, NativeArgs, NativeDefault, NativeFunction},
            class::{Class, Table},
            core::Value,
            instance::{Instance, Internal},
            map_key::MapTable,
        },
    },
};

/// Keyword arguments after validation.
type Keywords = HashMap<String, Value>;

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the arguments left to right. A
    /// bare name that is not bound anywhere raises `NoSuchFunctionError`
    /// rather than `NameError`, and `receiver.name(...)` raises
    /// `NoSuchMethodError` when the receiver lacks the member.
    ///
    /// # Errors
    /// `TypeError` if the callee is not callable, plus everything
    /// [`Interpreter::call_callable`] reports.
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Argument], line: usize) -> EvalResult<Value> {
        let function = match callee {
            Expr::Variable { id, name, .. } => match self.find_variable(*id, name) {
                Ok(value) => value,
                Err(EnvError::Undefined { name }) => {
                    return Err(self.raise(ErrorKind::NoSuchFunctionError,
                                          format!("Undefined function '{name}'"),
                                          line));
                },
                Err(error) => return Err(self.env_error(error, line)),
            },
            Expr::Get { object, name, .. } => {
                let receiver = self.evaluate(object)?;
                self.method_for_call(&receiver, name, line)?
            },
            other => self.evaluate(other)?,
        };

        let (positional, keywords) = self.evaluate_arguments(arguments, line)?;
        self.call_value(&function, positional, keywords, line)
    }

    /// Evaluates call-site arguments, expanding splats.
    ///
    /// `*array` contributes its elements as positional arguments and `*map`
    /// contributes its entries as keyword arguments, which requires string
    /// keys.
    ///
    /// # Errors
    /// - `TypeError` for a splat of anything else, or a map with a
    ///   non-string key.
    /// - `ArgumentError` when a keyword is given twice.
    fn evaluate_arguments(&mut self,
                          arguments: &[Argument],
                          line: usize)
                          -> EvalResult<(Vec<Value>, Vec<(String, Value)>)> {
        let mut positional = Vec::with_capacity(arguments.len());
        let mut keywords: Vec<(String, Value)> = Vec::new();

        for argument in arguments {
            match argument {
                Argument::Positional(expr) => positional.push(self.evaluate(expr)?),
                Argument::Keyword { name, value } => {
                    let value = self.evaluate(value)?;
                    self.push_keyword(&mut keywords, name.clone(), value, line)?;
                },
                Argument::Splat(expr) => {
                    let value = self.evaluate(expr)?;
                    if let Some(items) = value.as_array() {
                        positional.extend(items);
                    } else if let Some(table) = map_table(&value) {
                        for (key, value) in table.entries() {
                            let Some(name) = key.as_str() else {
                                return Err(self.raise(ErrorKind::TypeError,
                                                      format!("Keyword splat needs string keys, got {}",
                                                              key.describe()),
                                                      line));
                            };
                            self.push_keyword(&mut keywords, name, value, line)?;
                        }
                    } else {
                        return Err(self.raise(ErrorKind::TypeError,
                                              format!("Can't splat {}", value.describe()),
                                              line));
                    }
                },
            }
        }
        Ok((positional, keywords))
    }

    fn push_keyword(&mut self,
                    keywords: &mut Vec<(String, Value)>,
                    name: String,
                    value: Value,
                    line: usize)
                    -> EvalResult<()> {
        if keywords.iter().any(|(existing, _)| *existing == name) {
            return Err(self.raise(ErrorKind::ArgumentError,
                                  format!("Duplicate keyword argument '{name}'"),
                                  line));
        }
        keywords.push((name, value));
        Ok(())
    }

    /// Calls a value.
    ///
    /// # Errors
    /// `TypeError` if `callee` is not a function or class.
    pub(crate) fn call_value(&mut self,
                             callee: &Value,
                             positional: Vec<Value>,
                             keywords: Vec<(String, Value)>,
                             line: usize)
                             -> EvalResult<Value> {
        let Some(callable) = callee.as_callable() else {
            return Err(self.raise(ErrorKind::TypeError, format!("Can't call {}", callee.describe()), line));
        };
        self.call_callable(&callable, positional, keywords, line)
    }

    /// Calls a callable with already evaluated arguments.
    ///
    /// Keywords are checked against [`Callable::keyword_names`] and the
    /// positional count against [`Callable::arity`], then a stack frame is
    /// pushed for the duration of the call.
    ///
    /// # Parameters
    /// - `callable`: The function, native or class to call.
    /// - `positional`: Positional arguments, splats already expanded.
    /// - `keywords`: Keyword arguments in source order.
    /// - `line`: The call site, recorded in the frame.
    ///
    /// # Returns
    /// The function's return value, or the new instance for a class.
    ///
    /// # Errors
    /// - `ArgumentError` for an unknown or repeated keyword, or a positional
    ///   count outside the arity.
    /// - `RuntimeError::StackOverflow` past the configured call depth.
    /// - Anything the body throws.
    pub fn call_callable(&mut self,
                         callable: &Callable,
                         positional: Vec<Value>,
                         keywords: Vec<(String, Value)>,
                         line: usize)
                         -> EvalResult<Value> {
        let name = callable.name();
        let accepted = callable.keyword_names();
        let mut named = Keywords::with_capacity(keywords.len());
        for (keyword, value) in keywords {
            if !accepted.contains(&keyword) {
                return Err(self.raise(ErrorKind::ArgumentError,
                                      format!("Unknown keyword argument '{keyword}' for '{name}'"),
                                      line));
            }
            if named.insert(keyword.clone(), value).is_some() {
                return Err(self.raise(ErrorKind::ArgumentError,
                                      format!("Duplicate keyword argument '{keyword}'"),
                                      line));
            }
        }

        let arity = callable.arity();
        if !arity.accepts(positional.len()) {
            return Err(self.raise(ErrorKind::ArgumentError,
                                  format!("'{name}' expected {arity} arguments but got {}", positional.len()),
                                  line));
        }

        let depth = self.enter_call(name.as_str(), line)?;
        tracing::trace!(callee = %name, args = positional.len(), line, "call");
        let result = match callable {
            Callable::Function(function) => self.call_function(function, positional, named, line),
            Callable::Native(native) => self.call_native(native, positional, named, line),
            Callable::Class(class) => self.instantiate(class, positional, named, line),
        };
        self.leave_call(depth, &result);
        result
    }

    /// Runs a user function: parameters bind in a scope nested in the
    /// closure, the body runs in a block scope nested in that.
    fn call_function(&mut self,
                     function: &Function,
                     positional: Vec<Value>,
                     keywords: Keywords,
                     line: usize)
                     -> EvalResult<Value> {
        let env = function.closure.child();
        let saved_owner = std::mem::replace(&mut self.current_owner, function.owner.clone());

        let result = self.with_env(env.clone(), |this| {
                             this.bind_parameters(&function.decl, &env, positional, keywords)
                         })
                         .and_then(|()| {
                             let body = self.execute_block(&function.decl.body, env.child());
                             Self::finish_body(body, line)
                         });

        self.current_owner = saved_owner;
        result
    }

    /// Binds declared parameters in `env`, which is also the current scope,
    /// so defaults see the parameters bound before them.
    fn bind_parameters(&mut self,
                       decl: &FunctionDecl,
                       env: &Env,
                       positional: Vec<Value>,
                       mut keywords: Keywords)
                       -> EvalResult<()> {
        let mut args = positional.into_iter();

        for param in &decl.params {
            let value = match &param.kind {
                ParamKind::Required => args.next().unwrap_or_default(),
                ParamKind::Optional(default) => match args.next() {
                    Some(value) => value,
                    None => self.evaluate(default)?,
                },
                // only keyword parameters may follow a splat
                ParamKind::Splat => {
                    let rest = args.by_ref().collect();
                    self.array_value(rest)
                },
                ParamKind::Keyword(default) => match keywords.remove(&param.name) {
                    Some(value) => value,
                    None => self.evaluate(default)?,
                },
            };
            env.define(param.name.clone(), value);
        }
        Ok(())
    }

    fn call_native(&mut self,
                   native: &NativeFunction,
                   positional: Vec<Value>,
                   keywords: Keywords,
                   line: usize)
                   -> EvalResult<Value> {
        let mut filled: Keywords = native.keywords
                                         .iter()
                                         .map(|&(name, default)| (name.to_string(), self.native_default(default)))
                                         .collect();
        filled.extend(keywords);

        let args = NativeArgs { this: native.receiver.clone().unwrap_or_default(),
                                positional,
                                keywords: filled,
                                line };
        (native.func)(self, &args)
    }

    fn native_default(&self, default: NativeDefault) -> Value {
        match default {
            NativeDefault::Nil => Value::Nil,
            NativeDefault::Bool(b) => Value::Bool(b),
            NativeDefault::Str(text) => self.string_value(text),
        }
    }

    /// Creates an instance of `class` and runs its `init` bound to it.
    ///
    /// Subclasses of `String`, `Array` and `Map` get the matching engine
    /// storage.
    ///
    /// # Errors
    /// `TypeError` for modules and classes that forbid instances.
    fn instantiate(&mut self,
                   class: &Rc<Class>,
                   positional: Vec<Value>,
                   keywords: Keywords,
                   line: usize)
                   -> EvalResult<Value> {
        if !class.is_instantiable() {
            return Err(self.raise(ErrorKind::TypeError, format!("Can't instantiate {}", class.name), line));
        }

        let internal = if class.is_a(&self.core.string) {
            Internal::Str(String::new())
        } else if class.is_a(&self.core.array) {
            Internal::Array(Vec::new())
        } else if class.is_a(&self.core.map) {
            Internal::Map(MapTable::default())
        } else {
            Internal::None
        };
        let instance = Value::Instance(Rc::new(Instance::new(Rc::clone(class), internal)));

        if let Some(init) = class.find(Table::Methods, "init") {
            self.call_callable(&init.bind(instance.clone()),
                               positional,
                               keywords.into_iter().collect(),
                               line)?;
        }
        Ok(instance)
    }
}

/// The entries behind a Map instance.
fn map_table(value: &Value) -> Option<MapTable> {
    match &*value.as_instance()?.internal.borrow() {
        Internal::Map(table) => Some(table.clone()),
        _ => None,
    }
}
