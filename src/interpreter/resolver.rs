use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{ExprId, Stmt},
    error::Diagnostics,
    interpreter::value::class::Class,
};

/// Resolver state, scope handling and error reporting.
pub mod core;

/// Resolution of statements, declarations and function bodies.
pub mod statement;

/// Resolution of expressions.
pub mod expression;

/// The static `super.name` check.
///
/// Tracks classes declared in the resolved source, walks superclass chains
/// through them and the interpreter's class registry, and collects the
/// classes a source reopens so their chains are treated as unknown.
pub mod superclass;

pub use self::core::Resolver;

/// Resolves a parsed program in one step.
///
/// Returns the hop count of every resolved local variable reference, keyed by
/// node id. References to globals are left out; the evaluator looks those up
/// dynamically. Problems are reported to `diagnostics`.
///
/// # Parameters
/// - `program`: The parsed statements.
/// - `registry`: Classes already known to the interpreter, consulted by the
///   `super.name` check.
/// - `diagnostics`: Sink for resolution errors.
///
/// # Example
/// ```
/// use std::{collections::HashMap, rc::Rc};
///
/// use kestrel::{
///     ast::IdGen,
///     error::Diagnostics,
///     interpreter::{parser::parse, resolver::resolve},
/// };
///
/// let mut ids = IdGen::default();
/// let mut diagnostics = Diagnostics::default();
/// let program = parse("{ var a = 1; { print a; } }", &Rc::from("<doc>"), &mut ids, &mut diagnostics);
/// let locals = resolve(&program, &HashMap::new(), &mut diagnostics);
///
/// assert_eq!(locals.values().copied().collect::<Vec<_>>(), vec![1]);
/// assert!(!diagnostics.had_error());
/// ```
pub fn resolve(program: &[Stmt],
               registry: &HashMap<String, Rc<Class>>,
               diagnostics: &mut Diagnostics)
               -> HashMap<ExprId, usize> {
    let mut resolver = Resolver::new(registry, diagnostics);
    resolver.resolve_program(program);
    resolver.into_locals()
}
