use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    error::Error,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Reads and runs a script file, recording it as loaded.
    ///
    /// # Errors
    /// `Error::Io` if the file cannot be read, otherwise the same errors as
    /// [`Interpreter::run`].
    pub fn run_file(&mut self, path: &Path) -> Result<Value, Error> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io { path: path.display().to_string(),
                                                                        source })?;
        self.loaded.insert(canonical(path));
        self.run(&source, &path.display().to_string())
    }

    /// Finds the file `path` names.
    ///
    /// Absolute paths are taken as they are. Relative paths are tried
    /// against each directory of the load path in order, then against the
    /// current directory.
    fn resolve_path(&self, path: &str) -> Option<PathBuf> {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.config
            .load_path
            .iter()
            .map(|dir| dir.join(path))
            .chain(std::iter::once(path.to_path_buf()))
            .find(|candidate| candidate.is_file())
    }

    /// `load(path)`: runs the file every time it is called.
    ///
    /// # Errors
    /// `LoadError` if the file cannot be found, read or compiled.
    pub(crate) fn load(&mut self, path: &str, line: usize) -> EvalResult<Value> {
        let Some(resolved) = self.resolve_path(path) else {
            return Err(self.raise(ErrorKind::LoadError, format!("Can't find file '{path}'"), line));
        };
        let source = match fs::read_to_string(&resolved) {
            Ok(source) => source,
            Err(error) => {
                return Err(self.raise(ErrorKind::LoadError, format!("Can't read '{path}': {error}"), line));
            },
        };

        tracing::debug!(path = %resolved.display(), "loading file");
        self.loaded.insert(canonical(&resolved));
        self.run_source(&source, Rc::from(resolved.display().to_string()), line)?;
        Ok(Value::Bool(true))
    }

    /// `requireScript(path)`: like `load`, but a file that was already
    /// loaded is skipped.
    ///
    /// # Returns
    /// `true` if the file ran, `false` if it had been loaded before.
    pub(crate) fn require_script(&mut self, path: &str, line: usize) -> EvalResult<Value> {
        if let Some(resolved) = self.resolve_path(path)
           && self.loaded.contains(&canonical(&resolved))
        {
            tracing::debug!(path = %resolved.display(), "already loaded");
            return Ok(Value::Bool(false));
        }
        self.load(path, line)
    }

    /// `eval(source)`: runs source text at the top level.
    ///
    /// # Returns
    /// The value of the last expression statement.
    pub(crate) fn eval_source(&mut self, source: &str, line: usize) -> EvalResult<Value> {
        self.run_source(source, Rc::from("<eval>"), line)
    }

    /// Compiles and runs `source` in the global scope, with `file` as the
    /// current file. Compile errors become a `LoadError`.
    fn run_source(&mut self, source: &str, file: Rc<str>, line: usize) -> EvalResult<Value> {
        let program = match self.compile(source, &file) {
            Ok(program) => program,
            Err(error) => return Err(self.raise(ErrorKind::LoadError, error.to_string(), line)),
        };

        let saved_file = std::mem::replace(&mut self.current_file, file);
        let globals = self.globals.clone();
        let result = self.with_env(globals, |this| this.run_program(&program, false));
        self.current_file = saved_file;
        result
    }

    /// Invokes the handler registered for `name` with `trap`.
    ///
    /// # Returns
    /// `false` when no handler is registered.
    ///
    /// # Errors
    /// Whatever the handler lets escape, converted like [`Interpreter::run`].
    pub fn deliver_signal(&mut self, name: &str) -> Result<bool, Error> {
        let Some(handler) = self.signals.get(name).cloned() else {
            return Ok(false);
        };
        tracing::debug!(signal = name, "delivering signal");
        self.call_value(&handler, Vec::new(), Vec::new(), 0)
            .map_err(|unwind| self.unwind_to_error(unwind))?;
        Ok(true)
    }
}

/// The canonical form of a path, or the path itself when it cannot be
/// canonicalized.
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
