use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    rc::Rc,
};

use crate::{
    ast::{Expr, ExprId, IdGen, Stmt},
    config::Config,
    error::{Diagnostics, Error, RuntimeError},
    interpreter::{
        environment::{Env, EnvError},
        evaluator::{
            exception::ErrorKind,
            native::core::{CoreClasses, bootstrap},
            stack::Frame,
            trace::{Node, Tracer},
        },
        parser::parse,
        resolver::resolve,
        value::{class::Class, core::Value, instance::Instance},
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// The error side carries every non-local exit, not only failures.
pub type EvalResult<T> = Result<T, Unwind>;

/// A non-local exit travelling up the Rust call stack.
#[derive(Debug)]
pub enum Unwind {
    /// `return`, carrying the returned value to the enclosing call.
    Return(Value),
    /// `break`, consumed by the innermost loop.
    Break,
    /// `continue`, consumed by the innermost loop.
    Continue,
    /// A thrown script value, consumed by a matching `catch`.
    Throw(Value),
    /// A host-level error; nothing in the script can catch it.
    Fatal(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Self::Fatal(error)
    }
}

/// Where `print` writes.
#[derive(Debug)]
pub enum Output {
    /// The process's standard output.
    Stdout,
    /// An in-memory buffer, drained by [`Interpreter::take_output`].
    Buffer(String),
}

/// Stores the runtime state of one interpreter session.
///
/// Everything a script can observe lives here: globals, the class and module
/// registries, the call stack, the set of loaded files and the signal table.
/// Two interpreters share nothing.
pub struct Interpreter {
    /// The outermost scope.
    pub(crate) globals:         Env,
    /// The scope statements currently execute in.
    pub(crate) env:             Env,
    /// Hop counts computed by the resolver, for every source run so far.
    ///
    /// Entries are never removed: functions and classes from an earlier
    /// run stay callable for the whole session and still read their hop
    /// counts here. The table grows with the total size of the sources run.
    pub(crate) locals:          HashMap<ExprId, usize>,
    pub(crate) ids:             IdGen,
    /// The bootstrap classes.
    pub(crate) core:            CoreClasses,
    pub(crate) classes:         HashMap<String, Rc<Class>>,
    pub(crate) modules:         HashMap<String, Rc<Class>>,
    pub(crate) stack:           Vec<Frame>,
    pub(crate) call_depth:      usize,
    pub(crate) config:          Config,
    pub(crate) output:          Output,
    pub(crate) loaded:          HashSet<PathBuf>,
    pub(crate) signals:         HashMap<String, Value>,
    /// One frozen string per `s"..."` site, kept for the session like
    /// `locals`.
    pub(crate) static_strings:  HashMap<ExprId, Rc<Instance>>,
    pub(crate) tracer:          Option<Box<dyn Tracer>>,
    pub(crate) trace_positions: Vec<usize>,
    /// The class or module whose method is running; `super` starts above it.
    pub(crate) current_owner:   Option<Rc<Class>>,
    pub(crate) current_file:    Rc<str>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Interpreter {
    /// Creates an interpreter and runs the native bootstrap.
    ///
    /// # Example
    /// ```
    /// use kestrel::{config::Config, interpreter::evaluator::core::Interpreter};
    ///
    /// let mut interpreter = Interpreter::new(Config::default().capturing());
    /// interpreter.run("print 1 + 2;", "<doc>").unwrap();
    ///
    /// assert_eq!(interpreter.take_output(), "3\n");
    /// ```
    #[must_use]
    pub fn new(config: Config) -> Self {
        let globals = Env::global();
        let output = if config.capture_output { Output::Buffer(String::new()) } else { Output::Stdout };
        let mut interpreter = Self { env: globals.clone(),
                                     globals,
                                     locals: HashMap::new(),
                                     ids: IdGen::default(),
                                     core: CoreClasses::new(),
                                     classes: HashMap::new(),
                                     modules: HashMap::new(),
                                     stack: Vec::new(),
                                     call_depth: 0,
                                     config,
                                     output,
                                     loaded: HashSet::new(),
                                     signals: HashMap::new(),
                                     static_strings: HashMap::new(),
                                     tracer: None,
                                     trace_positions: Vec::new(),
                                     current_owner: None,
                                     current_file: Rc::from("<main>") };
        bootstrap(&mut interpreter);
        interpreter
    }

    /// The configuration the interpreter was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up a registered class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<Rc<Class>> {
        self.classes.get(name).cloned()
    }

    /// Looks up a registered module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<Rc<Class>> {
        self.modules.get(name).cloned()
    }

    /// Reads a global variable.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name, false).ok()
    }

    /// Drains captured `print` output. Returns an empty string when output
    /// goes to stdout.
    pub fn take_output(&mut self) -> String {
        match &mut self.output {
            Output::Buffer(buffer) => std::mem::take(buffer),
            Output::Stdout => String::new(),
        }
    }

    /// Writes one line of program output.
    pub(crate) fn write_line(&mut self, text: &str) {
        match &mut self.output {
            Output::Stdout => println!("{text}"),
            Output::Buffer(buffer) => {
                buffer.push_str(text);
                buffer.push('\n');
            },
        }
    }

    /// Lexes, parses, resolves and runs `source` in the global scope.
    ///
    /// # Parameters
    /// - `source`: The program text.
    /// - `file`: The name used in diagnostics and stack traces.
    ///
    /// # Returns
    /// The value of the last top-level expression statement, or `nil`.
    ///
    /// # Errors
    /// - `Error::Parse` / `Error::Resolve` if the front end reported anything;
    ///   nothing is executed then.
    /// - `Error::Uncaught` if a thrown value reached the top level.
    /// - `Error::Runtime` on a host-level failure.
    pub fn run(&mut self, source: &str, file: &str) -> Result<Value, Error> {
        let file: Rc<str> = Rc::from(file);
        let program = self.compile(source, &file)?;
        let saved_file = std::mem::replace(&mut self.current_file, file);
        let saved_env = std::mem::replace(&mut self.env, self.globals.clone());
        let result = self.run_program(&program, self.config.echo);
        self.env = saved_env;
        self.current_file = saved_file;
        result.map_err(|unwind| self.unwind_to_error(unwind))
    }

    /// Parses and resolves `source`, merging its hop counts into the
    /// session table.
    ///
    /// # Errors
    /// `Error::Parse` or `Error::Resolve` with every reported diagnostic.
    pub(crate) fn compile(&mut self, source: &str, file: &Rc<str>) -> Result<Vec<Stmt>, Error> {
        let mut diagnostics = Diagnostics::default();
        let program = parse(source, file, &mut self.ids, &mut diagnostics);
        if diagnostics.had_error() {
            return Err(Error::Parse { diagnostics: diagnostics.into_vec() });
        }
        let locals = resolve(&program, &self.classes, &mut diagnostics);
        if diagnostics.had_error() {
            return Err(Error::Resolve { diagnostics: diagnostics.into_vec() });
        }
        self.locals.extend(locals);
        Ok(program)
    }

    /// Executes top-level statements in the current scope.
    ///
    /// # Returns
    /// The value of the last expression statement. With `echo` set, each
    /// expression statement's value is also printed.
    pub(crate) fn run_program(&mut self, program: &[Stmt], echo: bool) -> EvalResult<Value> {
        let mut last = Value::Nil;
        for statement in program {
            if let Stmt::Expression { expr, line } = statement {
                let pos = self.trace_before(Node::Stmt(statement));
                let value = self.evaluate(expr);
                self.trace_after(Node::Stmt(statement), pos);
                last = value?;
                if echo {
                    let text = self.stringify(&last, *line)?;
                    self.write_line(&text);
                }
            } else {
                self.execute(statement)?;
            }
        }
        Ok(last)
    }

    /// Converts an unwind that escaped to the top level into an [`Error`],
    /// and resets the call stack.
    pub(crate) fn unwind_to_error(&mut self, unwind: Unwind) -> Error {
        let trace = self.render_stack();
        let error = match unwind {
            Unwind::Throw(value) => {
                let message = self.stringify(&value, 0)
                                  .unwrap_or_else(|_| value.describe());
                Error::Uncaught { message, trace }
            },
            Unwind::Fatal(source) => Error::Runtime { source, trace },
            Unwind::Return(_) => Error::Runtime { source: RuntimeError::StrayControlFlow { keyword: "return",
                                                                                           line:    0, },
                                                  trace },
            Unwind::Break => Error::Runtime { source: RuntimeError::StrayControlFlow { keyword: "break",
                                                                                       line:    0, },
                                              trace },
            Unwind::Continue => Error::Runtime { source: RuntimeError::StrayControlFlow { keyword: "continue",
                                                                                          line:    0, },
                                                 trace },
        };
        self.stack.clear();
        self.call_depth = 0;
        error
    }

    /// Executes one statement, notifying the tracer around it.
    pub fn execute(&mut self, statement: &Stmt) -> EvalResult<()> {
        let pos = self.trace_before(Node::Stmt(statement));
        let result = ensure_sufficient_stack(|| self.execute_statement(statement));
        self.trace_after(Node::Stmt(statement), pos);
        result
    }

    /// Evaluates one expression, notifying the tracer around it.
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        let pos = self.trace_before(Node::Expr(expr));
        let result = ensure_sufficient_stack(|| self.evaluate_expression(expr));
        self.trace_after(Node::Expr(expr), pos);
        result
    }

    /// Runs `body` with `env` as the current scope, restoring the previous
    /// scope on every exit path.
    pub(crate) fn with_env<T>(&mut self,
                              env: Env,
                              body: impl FnOnce(&mut Self) -> EvalResult<T>)
                              -> EvalResult<T> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = body(self);
        self.env = saved;
        result
    }

    /// Executes statements in `env`.
    pub(crate) fn execute_block(&mut self, statements: &[Stmt], env: Env) -> EvalResult<()> {
        self.with_env(env, |this| {
                for statement in statements {
                    this.execute(statement)?;
                }
                Ok(())
            })
    }

    /// Reads a variable at its resolved distance. A name the resolver left
    /// unresolved is a global.
    pub(crate) fn lookup_variable(&mut self, id: ExprId, name: &str, line: usize) -> EvalResult<Value> {
        self.find_variable(id, name)
            .map_err(|error| self.env_error(error, line))
    }

    /// Reads a variable without raising.
    pub(crate) fn find_variable(&self, id: ExprId, name: &str) -> Result<Value, EnvError> {
        match self.locals.get(&id) {
            Some(&hops) => self.env.get_at(hops, name),
            None => self.globals.get(name, false),
        }
    }

    /// Writes a variable, the same way [`Interpreter::lookup_variable`] reads.
    pub(crate) fn assign_variable(&mut self,
                                  id: ExprId,
                                  name: &str,
                                  value: Value,
                                  line: usize)
                                  -> EvalResult<()> {
        let assigned = match self.locals.get(&id) {
            Some(&hops) => self.env.assign_at(hops, name, value),
            None => self.globals.assign(name, value, false),
        };
        assigned.map_err(|error| self.env_error(error, line))
    }

    /// Maps an environment failure onto the script or host error it stands
    /// for.
    pub(crate) fn env_error(&mut self, error: EnvError, line: usize) -> Unwind {
        match error {
            EnvError::Undefined { name } => {
                self.raise(ErrorKind::NameError, format!("Undefined variable '{name}'"), line)
            },
            EnvError::NoAncestor { name, hops } => {
                Unwind::Fatal(RuntimeError::BrokenScopeChain { name, hops, line })
            },
        }
    }
}
