use crate::{
    ast::{Argument, Expr, ExprId, FunctionKind},
    error::ResolveError,
    interpreter::resolver::core::{ClassType, Resolver},
};

impl Resolver<'_> {
    /// Resolves an expression and everything nested in it.
    pub fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } | Expr::StaticStr { .. } => {},
            Expr::Grouping { expr, .. } | Expr::Unary { expr, .. } => self.resolve_expr(expr),
            Expr::Variable { id, name, line } => {
                if self.innermost_state(name) == Some(false) {
                    self.report(&ResolveError::OwnInitializer { name: name.clone(),
                                                                line: *line });
                }
                self.resolve_local(*id, name);
            },
            Expr::Assign { id, name, value, .. } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            },
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    match argument {
                        Argument::Positional(value)
                        | Argument::Splat(value)
                        | Argument::Keyword { value, .. } => self.resolve_expr(value),
                    }
                }
            },
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            },
            Expr::Index { object, index, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
            },
            Expr::IndexSet { object,
                             index,
                             value,
                             .. } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
                self.resolve_expr(value);
            },
            Expr::This { id, line } => {
                if self.class == ClassType::None {
                    self.report(&ResolveError::ThisOutsideClass { line: *line });
                    return;
                }
                self.resolve_local(*id, "this");
            },
            Expr::SuperGet { id, name, line } => self.resolve_super(*id, name, *line),
            Expr::SuperSet { id,
                             name,
                             value,
                             line, } => {
                self.resolve_expr(value);
                self.resolve_super(*id, name, *line);
            },
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.resolve_expr(element);
                }
            },
            Expr::Map { entries, .. } => {
                for (key, value) in entries {
                    self.resolve_expr(key);
                    self.resolve_expr(value);
                }
            },
            Expr::Function { decl, .. } => self.resolve_function(decl, FunctionKind::Function),
        }
    }

    fn resolve_super(&mut self, id: ExprId, name: &str, line: usize) {
        if self.function.is_none() || self.class == ClassType::None {
            self.report(&ResolveError::SuperOutsideMethod { line });
            return;
        }
        if self.class == ClassType::Class
           && matches!(self.function,
                       Some(FunctionKind::Method
                            | FunctionKind::Initializer
                            | FunctionKind::Getter
                            | FunctionKind::Setter))
           && let Some(enclosing) = self.enclosing.clone()
           && self.super_member_defined(&enclosing, name) == Some(false)
        {
            self.report(&ResolveError::UnknownSuperMember { class: enclosing.name,
                                                            name: name.to_string(),
                                                            line });
        }
        self.resolve_local(id, "this");
    }
}
