/// Core evaluation state and entry points.
///
/// Defines the `Interpreter`, the `Unwind` channel for non-local exits, and
/// the top-level `run` pipeline that lexes, parses, resolves and executes a
/// source string.
pub mod core;

/// Statement execution.
pub mod statement;

/// Expression evaluation.
///
/// The dispatch point for every expression variant; operators, calls and
/// member access live in their own modules.
pub mod expression;

/// Evaluation of `for` and `foreach` loops.
///
/// Manages the loop scopes and consumes `break` and `continue`.
pub mod for_loop;

/// Binary operator evaluation logic.
///
/// Handles arithmetic with its operator protocol, relational comparisons and
/// equality.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation and logical NOT.
pub mod unary;

/// Property reads and writes, method lookup and `super`.
pub mod access;

/// Calls: argument expansion, keyword and arity checks, parameter binding
/// and instantiation.
pub mod call;

/// Class and module declarations, and `in` blocks.
pub mod class;

/// Script errors: the built-in error kinds, `throw` and `try`/`catch`.
pub mod exception;

/// The script call stack behind error traces and the call depth bound.
pub mod stack;

/// Tracepoints around every statement and expression.
pub mod trace;

/// `load`, `requireScript`, `eval` and signal delivery.
pub mod loader;

/// Utility functions for evaluation.
///
/// Value constructors, the class of a value, stringification and argument
/// checks shared by the evaluator and the native library.
pub mod utils;

/// The native library installed into every interpreter.
pub mod native;
