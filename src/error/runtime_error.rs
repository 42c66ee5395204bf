/// Represents host-level errors raised during evaluation.
///
/// A `RuntimeError` means the interpreter itself cannot continue: scripts
/// cannot catch these. Everything a script may recover from is raised as a
/// thrown Error instance instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The call stack grew past the configured limit.
    #[error("Error on line {line}: Stack overflow, call depth exceeded {depth}.")]
    StackOverflow {
        /// The configured maximum depth.
        depth: usize,
        /// The source line of the call that overflowed.
        line:  usize,
    },
    /// `break`, `continue` or `return` escaped the construct that should
    /// have consumed it.
    #[error("Error on line {line}: '{keyword}' escaped its enclosing construct.")]
    StrayControlFlow {
        /// The offending keyword.
        keyword: &'static str,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A resolver-computed scope distance pointed at a scope that does not
    /// exist.
    #[error("Error on line {line}: No scope {hops} levels up while looking up '{name}'.")]
    BrokenScopeChain {
        /// The variable being looked up.
        name: String,
        /// The distance that could not be walked.
        hops: usize,
        /// The source line where the error occurred.
        line: usize,
    },
}
