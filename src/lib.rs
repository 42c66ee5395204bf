//! # kestrel
//!
//! kestrel is a tree-walking interpreter for a small, dynamically typed,
//! class-based scripting language written in Rust.
//! It scans, parses, resolves and evaluates scripts with support for classes,
//! modules and mixins, closures, keyword and splat arguments, exceptions, and
//! a native library of core classes.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{config::Config, error::Error, interpreter::evaluator::core::Interpreter};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches metadata (such as source locations) to AST nodes for error
///   reporting.
/// - Enables extensible and robust handling of parsed code.
pub mod ast;
/// Settings for an interpreter session.
///
/// Holds the load path, output capture, echo mode and the call depth bound,
/// with defaults and an environment-derived constructor.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines the errors that can be raised while scanning, parsing,
/// resolving or running code, the diagnostics sink the front end reports
/// into, and the top-level `Error` returned to embedders.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, resolver,
///   evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Carries the rendered stack trace of uncaught and fatal errors.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, error handling, and all supporting infrastructure to
/// provide a complete runtime for source code evaluation. It exposes the public
/// API for interpreting and executing expressions or programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the interpreter, parser, and evaluator.
///
/// # Responsibilities
/// - Safely convert between `usize` and `f64` without silent data loss.
/// - Format numbers the way scripts print them.
/// - Grow the host stack on demand during deep evaluation.
pub mod util;

/// Runs a script in a fresh interpreter and returns what it printed.
///
/// Output is captured instead of written to stdout. With `echo` set, the
/// value of every top-level expression statement is printed as well.
///
/// # Errors
/// Returns an error if the script fails to parse or resolve, throws a value
/// that is never caught, or hits a fatal runtime error.
///
/// # Examples
/// ```
/// use kestrel::get_result;
///
/// // An expression statement is echoed.
/// assert_eq!(get_result("1 + 1;", true).unwrap(), "2\n");
///
/// // Example with an intentional error (unknown variable).
/// let res = get_result("print y;", false);
/// assert!(res.is_err());
/// ```
pub fn get_result(source: &str, echo: bool) -> Result<String, Error> {
    let mut interpreter = Interpreter::new(Config::from_env().capturing().echoing(echo));
    interpreter.run(source, "<script>")?;
    Ok(interpreter.take_output())
}
