/// The diagnostics sink shared by the lexer, parser and resolver.
///
/// Front-end phases never abort on the first problem. They report
/// `(line, location, message)` triples here and keep going, and callers
/// check [`Diagnostics::had_error`] before trusting what was produced.
pub mod diagnostics;
/// Lexing and parsing errors.
///
/// Defines the errors detected before evaluation: unrecognized characters,
/// unterminated strings, unexpected tokens, invalid assignment targets and
/// misplaced loop control.
pub mod parse_error;
/// Static resolution errors.
///
/// Raised by the resolver pass; any of these prevents execution.
pub mod resolve_error;
/// Host-level runtime errors.
///
/// These signal a broken interpreter invariant or exhausted resources and are
/// always fatal. Script-level failures are thrown values instead, see
/// `interpreter::evaluator::exception`.
pub mod runtime_error;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use parse_error::{LexError, ParseError};
pub use resolve_error::ResolveError;
pub use runtime_error::RuntimeError;

/// Everything that can stop a run of a script.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source did not lex or parse.
    #[error("{}", crate::error::diagnostics::render(.diagnostics))]
    Parse {
        /// Every problem reported while scanning and parsing.
        diagnostics: Vec<Diagnostic>,
    },
    /// The source parsed but failed static resolution.
    #[error("{}", crate::error::diagnostics::render(.diagnostics))]
    Resolve {
        /// Every problem reported by the resolver.
        diagnostics: Vec<Diagnostic>,
    },
    /// A thrown value reached the top of the program without being caught.
    #[error("Uncaught {message}\n{trace}")]
    Uncaught {
        /// The stringified thrown value.
        message: String,
        /// The rendered stack trace at the moment of the throw.
        trace:   String,
    },
    /// The interpreter hit a fatal host-level error.
    #[error("{source}\n{trace}")]
    Runtime {
        /// The underlying error.
        source: RuntimeError,
        /// The rendered stack trace.
        trace:  String,
    },
    /// A script file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// The path as given.
        path:   String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl Error {
    /// Short name of the error track, used by script-corpus annotations.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "ParseError",
            Self::Resolve { .. } => "ResolveError",
            Self::Uncaught { .. } => "Uncaught",
            Self::Runtime { .. } => "RuntimeError",
            Self::Io { .. } => "IoError",
        }
    }
}
