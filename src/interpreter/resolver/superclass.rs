use std::collections::HashSet;

use crate::{
    ast::{Argument, Expr, ParamKind, Stmt},
    interpreter::{
        resolver::core::{EnclosingClass, Resolver},
        value::class::{ClassKind, Table},
    },
};

/// What a class declaration's `<` clause refers to, as far as the resolver
/// can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperRef {
    /// No `<` clause: the class derives from `Object`.
    Object,
    /// `< Name`
    Named(String),
    /// Any other expression; the chain cannot be known statically.
    Unknown,
}

impl SuperRef {
    /// Classifies a superclass expression.
    #[must_use]
    pub fn of(superclass: Option<&Expr>) -> Self {
        match superclass {
            None => Self::Object,
            Some(Expr::Variable { name, .. }) => Self::Named(name.clone()),
            Some(_) => Self::Unknown,
        }
    }
}

/// A class declared earlier in the resolved source.
#[derive(Debug, Clone)]
pub struct DeclaredClass {
    /// Its `<` clause.
    pub superclass: SuperRef,
    /// Method, getter and setter names.
    pub members:    HashSet<String>,
}

impl Resolver<'_> {
    /// Decides whether `super.name` can succeed in a method of `class`.
    ///
    /// # Returns
    /// - `Some(true)` if some ancestor defines `name`.
    /// - `Some(false)` if the whole chain is known and none does.
    /// - `None` if any part of the chain is unknown or reopened.
    pub(in crate::interpreter::resolver) fn super_member_defined(&self,
                                                                 class: &EnclosingClass,
                                                                 name: &str)
                                                                 -> Option<bool> {
        if self.reopened.contains(&class.name) {
            return None;
        }
        let mut current = class.superclass.clone();
        let mut visited = HashSet::new();
        loop {
            let class_name = match current {
                SuperRef::Unknown => return None,
                SuperRef::Object => "Object".to_string(),
                SuperRef::Named(class_name) => class_name,
            };
            if self.reopened.contains(&class_name) || !visited.insert(class_name.clone()) {
                return None;
            }
            match self.declared.get(&class_name) {
                Some(declared) if declared.members.contains(name) => return Some(true),
                Some(declared) => current = declared.superclass.clone(),
                None => return self.registered_member(&class_name, name),
            }
        }
    }

    /// Looks `name` up along the chain of a class in the interpreter's
    /// registry.
    fn registered_member(&self, class_name: &str, name: &str) -> Option<bool> {
        let class = self.registry().get(class_name)?;
        for ancestor in class.ancestors() {
            if ancestor.kind != ClassKind::Mixin && self.reopened.contains(&ancestor.name) {
                return None;
            }
            if [Table::Methods, Table::Getters, Table::Setters].into_iter()
                                                                .any(|t| ancestor.own(t, name).is_some())
            {
                return Some(true);
            }
        }
        Some(false)
    }
}

/// Collects the names of classes a program reopens, through `in (Name)` or
/// `Name.include(...)`, anywhere in its statements.
#[must_use]
pub fn collect_reopened(program: &[Stmt]) -> HashSet<String> {
    let mut names = HashSet::new();
    for statement in program {
        visit_stmt(statement, &mut names);
    }
    names
}

fn visit_stmt(statement: &Stmt, names: &mut HashSet<String>) {
    match statement {
        Stmt::Expression { expr, .. } | Stmt::Print { expr, .. } | Stmt::Throw { value: expr, .. } => {
            visit_expr(expr, names);
        },
        Stmt::Var { initializers, .. } => initializers.iter().for_each(|e| visit_expr(e, names)),
        Stmt::Block { statements, .. } => statements.iter().for_each(|s| visit_stmt(s, names)),
        Stmt::If { condition,
                   then_branch,
                   else_branch,
                   .. } => {
            visit_expr(condition, names);
            visit_stmt(then_branch, names);
            if let Some(otherwise) = else_branch {
                visit_stmt(otherwise, names);
            }
        },
        Stmt::While { condition, body, .. } => {
            visit_expr(condition, names);
            visit_stmt(body, names);
        },
        Stmt::For { initializer,
                    condition,
                    increment,
                    body,
                    .. } => {
            if let Some(init) = initializer {
                visit_stmt(init, names);
            }
            condition.iter().chain(increment).for_each(|e| visit_expr(e, names));
            visit_stmt(body, names);
        },
        Stmt::Foreach { iterable, body, .. } => {
            visit_expr(iterable, names);
            visit_stmt(body, names);
        },
        Stmt::In { object, body, .. } => {
            if let Expr::Variable { name, .. } = object {
                names.insert(name.clone());
            }
            visit_expr(object, names);
            body.iter().for_each(|s| visit_stmt(s, names));
        },
        Stmt::Try { body, catches, .. } => {
            body.iter().for_each(|s| visit_stmt(s, names));
            for clause in catches {
                visit_expr(&clause.matcher, names);
                clause.body.iter().for_each(|s| visit_stmt(s, names));
            }
        },
        Stmt::Return { value, .. } => value.iter().for_each(|e| visit_expr(e, names)),
        Stmt::Break { .. } | Stmt::Continue { .. } => {},
        Stmt::Function(decl) => visit_body(&decl.params, &decl.body, names),
        Stmt::Class(decl) | Stmt::Module(decl) => {
            if let Some(superclass) = &decl.superclass {
                visit_expr(superclass, names);
            }
            for method in decl.methods
                              .iter()
                              .chain(&decl.statics)
                              .chain(&decl.getters)
                              .chain(&decl.setters)
            {
                visit_body(&method.params, &method.body, names);
            }
        },
    }
}

fn visit_body(params: &[crate::ast::Param], body: &[Stmt], names: &mut HashSet<String>) {
    for param in params {
        if let ParamKind::Optional(default) | ParamKind::Keyword(default) = &param.kind {
            visit_expr(default, names);
        }
    }
    body.iter().for_each(|s| visit_stmt(s, names));
}

fn visit_expr(expr: &Expr, names: &mut HashSet<String>) {
    match expr {
        Expr::Literal { .. }
        | Expr::StaticStr { .. }
        | Expr::Variable { .. }
        | Expr::This { .. }
        | Expr::SuperGet { .. } => {},
        Expr::Grouping { expr, .. } | Expr::Unary { expr, .. } => visit_expr(expr, names),
        Expr::Assign { value, .. } | Expr::SuperSet { value, .. } => visit_expr(value, names),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            visit_expr(left, names);
            visit_expr(right, names);
        },
        Expr::Call { callee, arguments, .. } => {
            if let Expr::Get { object, name, .. } = callee.as_ref()
               && name == "include"
               && let Expr::Variable { name: target, .. } = object.as_ref()
            {
                names.insert(target.clone());
            }
            visit_expr(callee, names);
            for argument in arguments {
                match argument {
                    Argument::Positional(value)
                    | Argument::Splat(value)
                    | Argument::Keyword { value, .. } => visit_expr(value, names),
                }
            }
        },
        Expr::Get { object, .. } => visit_expr(object, names),
        Expr::Set { object, value, .. } => {
            visit_expr(object, names);
            visit_expr(value, names);
        },
        Expr::Index { object, index, .. } => {
            visit_expr(object, names);
            visit_expr(index, names);
        },
        Expr::IndexSet { object,
                         index,
                         value,
                         .. } => {
            visit_expr(object, names);
            visit_expr(index, names);
            visit_expr(value, names);
        },
        Expr::Array { elements, .. } => elements.iter().for_each(|e| visit_expr(e, names)),
        Expr::Map { entries, .. } => {
            for (key, value) in entries {
                visit_expr(key, names);
                visit_expr(value, names);
            }
        },
        Expr::Function { decl, .. } => visit_body(&decl.params, &decl.body, names),
    }
}
