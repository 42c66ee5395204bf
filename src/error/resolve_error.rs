/// Problems found by the static resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Two declarations of one name in the same local scope.
    #[error("Already a variable named '{name}' in this scope")]
    AlreadyDeclared {
        /// The duplicated name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `var a = a;` in a local scope.
    #[error("Can't read local variable '{name}' in its own initializer")]
    OwnInitializer {
        /// The variable name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `this` outside any method or `in` body.
    #[error("Can't use 'this' outside of a class")]
    ThisOutsideClass {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `super` outside any method.
    #[error("Can't use 'super' outside of a method")]
    SuperOutsideMethod {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `return` in top-level code.
    #[error("Can't return from top-level code")]
    TopLevelReturn {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `super.name` where no ancestor defines `name`.
    #[error("No ancestor of '{class}' has a member named '{name}'")]
    UnknownSuperMember {
        /// The class whose method uses `super`.
        class: String,
        /// The missing member.
        name:  String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ResolveError {
    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::AlreadyDeclared { line, .. }
            | Self::OwnInitializer { line, .. }
            | Self::ThisOutsideClass { line }
            | Self::SuperOutsideMethod { line }
            | Self::TopLevelReturn { line }
            | Self::UnknownSuperMember { line, .. } => *line,
        }
    }

    /// Location suffix for the diagnostic.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::AlreadyDeclared { name, .. }
            | Self::OwnInitializer { name, .. }
            | Self::UnknownSuperMember { name, .. } => format!(" at '{name}'"),
            Self::ThisOutsideClass { .. } => " at 'this'".to_string(),
            Self::SuperOutsideMethod { .. } => " at 'super'".to_string(),
            Self::TopLevelReturn { .. } => " at 'return'".to_string(),
        }
    }
}
