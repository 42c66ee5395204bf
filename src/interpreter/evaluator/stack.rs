use std::{fmt, rc::Rc};

use crate::{error::RuntimeError, interpreter::evaluator::core::{EvalResult, Interpreter}};

/// One entry of the script call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The called function, or `throw` for a throw site.
    pub name: String,
    /// The file of the call site.
    pub file: Rc<str>,
    /// The line of the call site.
    pub line: usize,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  at {} ({}:{})", self.name, self.file, self.line)
    }
}

impl Interpreter {
    /// Pushes a frame for a call or throw at `line` of the current file.
    pub(crate) fn push_frame(&mut self, name: impl Into<String>, line: usize) {
        self.stack.push(Frame { name: name.into(),
                                file: Rc::clone(&self.current_file),
                                line });
    }

    /// Enters a call, checking the depth bound.
    pub(crate) fn enter_call(&mut self, name: impl Into<String>, line: usize) -> EvalResult<usize> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow { depth: self.config.max_call_depth,
                                                     line }.into());
        }
        self.call_depth += 1;
        let depth = self.stack.len();
        self.push_frame(name, line);
        Ok(depth)
    }

    /// Leaves a call entered at stack `depth`. Frames are only discarded
    /// when the call completed normally, so an error's trace keeps the path
    /// it unwound through.
    pub(crate) fn leave_call<T>(&mut self, depth: usize, result: &EvalResult<T>) {
        self.call_depth = self.call_depth.saturating_sub(1);
        if result.is_ok() {
            self.stack.truncate(depth);
        }
    }

    /// The current call stack, innermost frame last.
    #[must_use]
    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Renders the stack innermost first, one frame per line.
    #[must_use]
    pub fn render_stack(&self) -> String {
        self.stack
            .iter()
            .rev()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
