use std::{env, path::PathBuf};

/// Default bound on nested calls before the interpreter gives up.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 255;

/// Environment variable holding extra load directories, separated like
/// `PATH`.
pub const LOAD_PATH_VAR: &str = "KESTREL_PATH";

/// Settings for one interpreter session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directories searched, in order, by `load` and `requireScript` for a
    /// relative path. The current directory is tried last.
    pub load_path:      Vec<PathBuf>,
    /// Collect `print` output in memory instead of writing it to stdout.
    pub capture_output: bool,
    /// Print the value of every top-level expression statement.
    pub echo:           bool,
    /// Maximum depth of nested calls.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { load_path:      Vec::new(),
               capture_output: false,
               echo:           false,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

impl Config {
    /// The default configuration, with `load_path` taken from
    /// `KESTREL_PATH` when it is set.
    #[must_use]
    pub fn from_env() -> Self {
        let load_path = env::var_os(LOAD_PATH_VAR).map(|paths| env::split_paths(&paths).collect())
                                                  .unwrap_or_default();
        Self { load_path,
               ..Self::default() }
    }

    /// Returns `self` with output captured in memory.
    ///
    /// # Example
    /// ```
    /// use kestrel::config::Config;
    ///
    /// let config = Config::default().capturing().echoing(true);
    /// assert!(config.capture_output);
    /// assert!(config.echo);
    /// ```
    #[must_use]
    pub const fn capturing(mut self) -> Self {
        self.capture_output = true;
        self
    }

    /// Returns `self` with echo mode set to `echo`.
    #[must_use]
    pub const fn echoing(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}
