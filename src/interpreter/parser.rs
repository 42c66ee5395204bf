use std::rc::Rc;

use crate::{
    ast::{IdGen, Stmt},
    error::Diagnostics,
    interpreter::lexer::scan,
};

/// Core parser state and the declaration entry point.
///
/// Owns the token cursor, error reporting, synchronization and the
/// loop-depth stack used to validate `break` / `continue`.
pub mod core;

/// Statement parsing.
///
/// Implements every statement form: `print`, `var`, `if`, `while`, `for`,
/// `foreach`, `in`, `try`, `throw`, `return`, `break`, `continue` and
/// expression statements.
pub mod statement;

/// Function, class and module declarations.
///
/// Includes parameter lists with defaults, splats and keywords, and class
/// bodies with methods, static methods, getters and setters.
pub mod declaration;

/// Block parsing.
pub mod block;

/// Binary operator parsing.
///
/// Implements assignment (with compound-assignment desugaring), logical
/// `or` / `and`, equality, comparison and arithmetic levels.
pub mod binary;

/// Unary, call-chain and primary expressions.
pub mod unary;

/// Expansion of `${...}` inside double-quoted strings.
pub mod interpolation;

/// Utility functions for the parser.
///
/// Provides token-to-operator mapping and comma-separated list parsing.
pub mod utils;

pub use self::core::{ParseResult, Parser};

/// Scans and parses `source` in one step.
///
/// Problems are reported to `diagnostics`; check
/// [`Diagnostics::had_error`] before trusting the returned statements.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use kestrel::{ast::IdGen, error::Diagnostics, interpreter::parser::parse};
///
/// let mut ids = IdGen::default();
/// let mut diagnostics = Diagnostics::default();
/// let program = parse("var x = 1; print x;", &Rc::from("<doc>"), &mut ids, &mut diagnostics);
///
/// assert_eq!(program.len(), 2);
/// assert!(!diagnostics.had_error());
/// ```
pub fn parse(source: &str,
             file: &Rc<str>,
             ids: &mut IdGen,
             diagnostics: &mut Diagnostics)
             -> Vec<Stmt> {
    let tokens = scan(source, file, 1, diagnostics);
    Parser::new(tokens, ids, diagnostics).parse_program()
}
