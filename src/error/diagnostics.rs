use std::fmt;

/// One reported front-end problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The source line where the problem was found.
    pub line:     usize,
    /// Where on the line, e.g. ` at 'foo'` or ` at end`. May be empty.
    pub location: String,
    /// What went wrong.
    pub message:  String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error on line {}{}: {}.", self.line, self.location, self.message)
    }
}

/// Collects diagnostics for one front-end run.
///
/// The "had error" flag belongs to the sink, not to the process, so
/// independent interpreter sessions do not observe each other's failures.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records a problem.
    pub fn report(&mut self, line: usize, location: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic { line,
                                      location: location.into(),
                                      message: message.into() };
        tracing::debug!(%diagnostic, "diagnostic reported");
        self.reported.push(diagnostic);
    }

    /// Returns `true` once anything has been reported.
    #[must_use]
    pub fn had_error(&self) -> bool {
        !self.reported.is_empty()
    }

    /// The diagnostics reported so far, in order.
    #[must_use]
    pub fn reported(&self) -> &[Diagnostic] {
        &self.reported
    }

    /// Consumes the sink and returns its diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.reported
    }
}

/// Renders diagnostics one per line.
#[must_use]
pub fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter()
               .map(ToString::to_string)
               .collect::<Vec<_>>()
               .join("\n")
}
