use std::rc::Rc;

use crate::{
    ast::{ClassDecl, FunctionDecl, FunctionKind, ParamKind, Stmt},
    error::ResolveError,
    interpreter::resolver::{
        core::{ClassType, EnclosingClass, Resolver},
        superclass::{DeclaredClass, SuperRef},
    },
};

impl Resolver<'_> {
    /// Resolves a single statement.
    ///
    /// Scopes are opened exactly where the evaluator creates environments:
    /// blocks, `for` initializers, `foreach` variables, `catch` bindings and
    /// `in` bodies.
    pub fn resolve_stmt(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Expression { expr, .. } | Stmt::Print { expr, .. } => self.resolve_expr(expr),
            Stmt::Var { names,
                        initializers,
                        line, } => {
                for name in names {
                    self.declare(name, *line);
                }
                for initializer in initializers {
                    self.resolve_expr(initializer);
                }
                for name in names {
                    self.define(name);
                }
            },
            Stmt::Block { statements, .. } => self.resolve_block(statements),
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(otherwise) = else_branch {
                    self.resolve_stmt(otherwise);
                }
            },
            Stmt::While { condition, body, .. } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            },
            Stmt::For { initializer,
                        condition,
                        increment,
                        body,
                        .. } => self.scoped(|r| {
                                        if let Some(init) = initializer {
                                            r.resolve_stmt(init);
                                        }
                                        if let Some(condition) = condition {
                                            r.resolve_expr(condition);
                                        }
                                        if let Some(increment) = increment {
                                            r.resolve_expr(increment);
                                        }
                                        r.resolve_stmt(body);
                                    }),
            Stmt::Foreach { names,
                            iterable,
                            body,
                            line, } => {
                self.resolve_expr(iterable);
                self.scoped(|r| {
                        for name in names {
                            r.declare(name, *line);
                            r.define(name);
                        }
                        r.resolve_stmt(body);
                    });
            },
            Stmt::In { object, body, .. } => self.resolve_in(object, body),
            Stmt::Try { body, catches, .. } => {
                self.resolve_block(body);
                for clause in catches {
                    self.resolve_expr(&clause.matcher);
                    match &clause.name {
                        Some(name) => self.scoped(|r| {
                                              r.declare(name, clause.line);
                                              r.define(name);
                                              r.resolve_block(&clause.body);
                                          }),
                        None => self.resolve_block(&clause.body),
                    }
                }
            },
            Stmt::Throw { value, .. } => self.resolve_expr(value),
            Stmt::Return { value, line } => {
                if self.function.is_none() {
                    self.report(&ResolveError::TopLevelReturn { line: *line });
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            },
            Stmt::Break { .. } | Stmt::Continue { .. } => {},
            Stmt::Function(decl) => {
                self.declare(&decl.name, decl.line);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            },
            Stmt::Class(decl) => self.resolve_class(decl, ClassType::Class),
            Stmt::Module(decl) => self.resolve_class(decl, ClassType::Module),
        }
    }

    /// Resolves statements in a new block scope.
    pub(in crate::interpreter::resolver) fn resolve_block(&mut self, statements: &[Stmt]) {
        self.scoped(|r| {
                for statement in statements {
                    r.resolve_stmt(statement);
                }
            });
    }

    /// Resolves a function: a scope for the parameters, then a block scope
    /// for the body.
    ///
    /// A default value is resolved after the parameters before it are
    /// defined, so it may refer to them.
    pub(in crate::interpreter::resolver) fn resolve_function(&mut self,
                                                             decl: &FunctionDecl,
                                                             kind: FunctionKind) {
        let enclosing = self.function.replace(kind);
        self.scoped(|r| {
                for param in &decl.params {
                    if let ParamKind::Optional(default) | ParamKind::Keyword(default) = &param.kind {
                        r.resolve_expr(default);
                    }
                    r.declare(&param.name, decl.line);
                    r.define(&param.name);
                }
                r.resolve_block(&decl.body);
            });
        self.function = enclosing;
    }

    /// Resolves a method: like a function, inside a scope binding `this`.
    pub(in crate::interpreter::resolver) fn resolve_method(&mut self, decl: &FunctionDecl) {
        self.scoped(|r| {
                r.define("this");
                r.resolve_function(decl, decl.kind);
            });
    }

    fn resolve_class(&mut self, decl: &Rc<ClassDecl>, class_type: ClassType) {
        self.declare(&decl.name, decl.line);
        self.define(&decl.name);
        if let Some(superclass) = &decl.superclass {
            self.resolve_expr(superclass);
        }

        let superclass = SuperRef::of(decl.superclass.as_ref());
        self.declared.insert(decl.name.clone(),
                             DeclaredClass { superclass: superclass.clone(),
                                             members:    decl.member_names().map(str::to_string).collect(), });

        let saved_class = std::mem::replace(&mut self.class, class_type);
        let saved_enclosing = self.enclosing.replace(EnclosingClass { name: decl.name.clone(),
                                                                      superclass });
        for method in decl.methods
                          .iter()
                          .chain(&decl.getters)
                          .chain(&decl.setters)
                          .chain(&decl.statics)
        {
            self.resolve_method(method);
        }
        self.class = saved_class;
        self.enclosing = saved_enclosing;
    }

    /// Resolves `in (object) { body }`.
    ///
    /// The body shares one scope that binds `this`. Functions declared
    /// directly in it become methods of the target, so they get a `this`
    /// scope of their own like any method.
    fn resolve_in(&mut self, object: &crate::ast::Expr, body: &[Stmt]) {
        self.resolve_expr(object);
        let saved_class = std::mem::replace(&mut self.class, ClassType::Reopen);
        let saved_enclosing = self.enclosing.take();
        self.scoped(|r| {
                r.define("this");
                for statement in body {
                    if let Stmt::Function(decl) = statement {
                        r.declare(&decl.name, decl.line);
                        r.define(&decl.name);
                        r.scoped(|r| {
                                r.define("this");
                                r.resolve_function(decl, FunctionKind::Method);
                            });
                    } else {
                        r.resolve_stmt(statement);
                    }
                }
            });
        self.class = saved_class;
        self.enclosing = saved_enclosing;
    }
}
