use crate::{
    ast::{Expr, Stmt},
    interpreter::evaluator::core::Interpreter,
};

/// An AST node about to be, or just, evaluated.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A statement.
    Stmt(&'a Stmt),
    /// An expression.
    Expr(&'a Expr),
}

impl Node<'_> {
    /// The source line of the node.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Stmt(statement) => statement.line_number(),
            Self::Expr(expr) => expr.line_number(),
        }
    }
}

/// The position of a node in the evaluation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracePos {
    /// How many traced nodes enclose this one.
    pub depth: usize,
    /// The number of siblings evaluated before this one at the same depth.
    pub index: usize,
}

/// Hooks called around the evaluation of every node.
///
/// A tracer observes; it cannot change what is evaluated. It may block
/// inside a callback, e.g. to wait for a debugger command.
pub trait Tracer {
    /// Called before `node` is evaluated.
    fn before(&mut self, node: Node<'_>, pos: TracePos);
    /// Called after `node` was evaluated, whatever the outcome.
    fn after(&mut self, node: Node<'_>, pos: TracePos);
}

impl Interpreter {
    /// Installs `tracer`, replacing any previous one.
    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.trace_positions.clear();
        self.tracer = Some(tracer);
    }

    /// Removes and returns the installed tracer.
    pub fn take_tracer(&mut self) -> Option<Box<dyn Tracer>> {
        self.trace_positions.clear();
        self.tracer.take()
    }

    pub(crate) fn trace_before(&mut self, node: Node<'_>) -> Option<TracePos> {
        let tracer = self.tracer.as_mut()?;
        // `trace_positions[d]` counts the children already started at depth `d`.
        let depth = self.trace_positions.len().saturating_sub(1);
        self.trace_positions.resize(depth + 1, 0);
        let index = self.trace_positions[depth];
        self.trace_positions[depth] = index + 1;
        let pos = TracePos { depth, index };
        tracer.before(node, pos);
        self.trace_positions.push(0);
        Some(pos)
    }

    pub(crate) fn trace_after(&mut self, node: Node<'_>, pos: Option<TracePos>) {
        let Some(pos) = pos else {
            return;
        };
        self.trace_positions.truncate(pos.depth + 1);
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.after(node, pos);
        }
    }
}
