/// Errors produced while tokenizing.
///
/// `Default` is required by logos, which uses it for characters no token
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
pub enum LexError {
    /// No token matches the input at this point.
    #[default]
    #[error("Unexpected character")]
    UnexpectedCharacter,
    /// A string literal reaches the end of input without its closing quote.
    #[error("Unterminated string starting on line {line}")]
    UnterminatedString {
        /// The line the string starts on.
        line: usize,
    },
}

/// Represents all errors that can occur during parsing.
///
/// The `Display` form is the bare message; the line and location are
/// attached when the error is reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found a token other than the one the grammar requires.
    #[error("Expected {expected}")]
    Expected {
        /// Description of what the grammar wanted.
        expected: String,
        /// The token encountered, already quoted.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The left-hand side of an assignment is not assignable.
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget {
        /// The `=` token, already quoted.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// `break` or `continue` with no enclosing loop.
    #[error("Can't use '{keyword}' outside of a loop")]
    LoopControlOutsideLoop {
        /// `break` or `continue`.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `var` statement with more initializers than names.
    #[error("More initializers than variables in declaration")]
    TooManyInitializers {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A required parameter after a defaulted one.
    #[error("Required parameter '{name}' follows an optional one")]
    RequiredAfterOptional {
        /// The parameter name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// More than one `*rest` parameter.
    #[error("Only one splat parameter is allowed")]
    DuplicateSplat {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `${` inside a string without its closing `}`.
    #[error("Unterminated string interpolation")]
    UnterminatedInterpolation {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tokens left over after an interpolated expression.
    #[error("Unexpected tokens after interpolated expression")]
    TrailingTokens {
        /// The first leftover token, already quoted.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Expected { line, .. }
            | Self::InvalidAssignmentTarget { line, .. }
            | Self::LoopControlOutsideLoop { line, .. }
            | Self::TooManyInitializers { line }
            | Self::RequiredAfterOptional { line, .. }
            | Self::DuplicateSplat { line }
            | Self::UnterminatedInterpolation { line }
            | Self::TrailingTokens { line, .. } => *line,
        }
    }

    /// Location suffix for the diagnostic, e.g. ` at 'x'`.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Expected { found, .. }
            | Self::InvalidAssignmentTarget { found, .. }
            | Self::TrailingTokens { found, .. } => format!(" at {found}"),
            Self::LoopControlOutsideLoop { keyword, .. } => format!(" at '{keyword}'"),
            Self::RequiredAfterOptional { name, .. } => format!(" at '{name}'"),
            _ => String::new(),
        }
    }
}
