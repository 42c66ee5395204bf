use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    ast::{ExprId, FunctionKind, Stmt},
    error::{Diagnostics, ResolveError},
    interpreter::{
        resolver::superclass::{DeclaredClass, SuperRef, collect_reopened},
        value::class::Class,
    },
};

/// The kind of class-like body currently being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassType {
    /// Top-level code or a free function.
    None,
    /// A `class` body.
    Class,
    /// A `module` body.
    Module,
    /// An `in (...)` body.
    Reopen,
}

/// The class whose methods are being resolved.
#[derive(Debug, Clone)]
pub struct EnclosingClass {
    /// The declared name.
    pub name:       String,
    /// What its `<` clause names.
    pub superclass: SuperRef,
}

/// Computes lexical distances and reports static errors.
///
/// The scope stack mirrors the environments the evaluator creates at run
/// time one-to-one, so a hop count computed here is the number of
/// `enclosing` links to follow there. Each scope maps a name to whether its
/// initializer has finished.
pub struct Resolver<'a> {
    scopes:          Vec<HashMap<String, bool>>,
    locals:          HashMap<ExprId, usize>,
    diagnostics:     &'a mut Diagnostics,
    registry:        &'a HashMap<String, Rc<Class>>,
    pub(in crate::interpreter::resolver) function: Option<FunctionKind>,
    pub(in crate::interpreter::resolver) class: ClassType,
    pub(in crate::interpreter::resolver) enclosing: Option<EnclosingClass>,
    pub(in crate::interpreter::resolver) declared: HashMap<String, DeclaredClass>,
    pub(in crate::interpreter::resolver) reopened: HashSet<String>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with no open scopes.
    #[must_use]
    pub fn new(registry: &'a HashMap<String, Rc<Class>>, diagnostics: &'a mut Diagnostics) -> Self {
        Self { scopes: Vec::new(),
               locals: HashMap::new(),
               diagnostics,
               registry,
               function: None,
               class: ClassType::None,
               enclosing: None,
               declared: HashMap::new(),
               reopened: HashSet::new() }
    }

    /// Resolves every statement of a program.
    pub fn resolve_program(&mut self, program: &[Stmt]) {
        self.reopened = collect_reopened(program);
        for statement in program {
            self.resolve_stmt(statement);
        }
    }

    /// Consumes the resolver and returns the hop-count table.
    #[must_use]
    pub fn into_locals(self) -> HashMap<ExprId, usize> {
        self.locals
    }

    pub(in crate::interpreter::resolver) const fn registry(&self) -> &HashMap<String, Rc<Class>> {
        self.registry
    }

    pub(in crate::interpreter::resolver) fn report(&mut self, error: &ResolveError) {
        tracing::debug!(%error, line = error.line(), "resolution error");
        self.diagnostics.report(error.line(), error.location(), error.to_string());
    }

    pub(in crate::interpreter::resolver) fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(in crate::interpreter::resolver) fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Runs `body` inside a fresh scope.
    pub(in crate::interpreter::resolver) fn scoped(&mut self, body: impl FnOnce(&mut Self)) {
        self.begin_scope();
        body(self);
        self.end_scope();
    }

    /// Adds `name` to the innermost scope as not yet initialized.
    ///
    /// Globals are not tracked: top-level code may redeclare a name freely.
    pub(in crate::interpreter::resolver) fn declare(&mut self, name: &str, line: usize) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(name) {
            self.report(&ResolveError::AlreadyDeclared { name: name.to_string(),
                                                         line });
            return;
        }
        scope.insert(name.to_string(), false);
    }

    /// Marks `name` initialized in the innermost scope.
    pub(in crate::interpreter::resolver) fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    /// The initialization state of `name` in the innermost scope.
    pub(in crate::interpreter::resolver) fn innermost_state(&self, name: &str) -> Option<bool> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }

    /// Records the distance to the nearest scope declaring `name`. Names
    /// found in no scope are globals and stay unrecorded.
    pub(in crate::interpreter::resolver) fn resolve_local(&mut self, id: ExprId, name: &str) {
        if let Some(hops) = self.scopes.iter().rev().position(|scope| scope.contains_key(name)) {
            self.locals.insert(id, hops);
        }
    }
}
