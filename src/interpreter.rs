/// The evaluator module executes the resolved program.
///
/// The evaluator walks statements and expressions, manages scopes, dispatches
/// methods through class chains, and carries returns, loop control and
/// thrown values up the Rust call stack. It owns every piece of session
/// state.
///
/// # Responsibilities
/// - Evaluates AST nodes against an environment chain.
/// - Implements calls, classes, modules and exceptions.
/// - Installs and hosts the native library.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric and string literals, identifiers, and operators.
/// - Reports lexical errors into the diagnostics sink and keeps scanning.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// the statements and expressions of a program, recovering at statement
/// boundaries so that one run reports every syntax error.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting errors with location info.
/// - Expands string interpolation into concatenations.
pub mod parser;
/// The resolver computes, for every local variable use, how many scopes up
/// its binding lives.
///
/// Also rejects programs that are statically wrong: redeclarations in one
/// scope, reading a variable in its own initializer, `this` outside a class,
/// `super` outside a method and top-level `return`.
pub mod resolver;
/// Lexical scopes chained from the innermost outwards.
pub mod environment;
/// The value module defines the runtime data types.
///
/// Values are scalars or shared references to functions, classes and
/// instances. Classes carry the member tables that method dispatch walks.
pub mod value;
