use std::fmt::Write;

use crate::{
    ast::{Argument, ClassDecl, Expr, FunctionDecl, LiteralValue, Param, ParamKind, Stmt},
    util::num::format_number,
};

/// Renders an expression as an S-expression.
///
/// Operators come first, children follow separated by spaces. Literal
/// strings are quoted so they stay distinguishable from variables.
///
/// # Example
/// ```
/// use kestrel::ast::{BinaryOperator, Expr, LiteralValue, sexp};
///
/// let expr = Expr::Binary { left:  Box::new(Expr::Literal { value: LiteralValue::Number(1.0),
///                                                           line:  1, }),
///                           op:    BinaryOperator::Add,
///                           right: Box::new(Expr::Literal { value: LiteralValue::Number(2.0),
///                                                           line:  1, }),
///                           line:  1, };
///
/// assert_eq!(sexp::expr(&expr), "(+ 1 2)");
/// ```
#[must_use]
pub fn expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => literal(value),
        Expr::StaticStr { text, .. } => format!("(static {text:?})"),
        Expr::Grouping { expr: inner, .. } => parenthesize("group", [inner.as_ref()]),
        Expr::Variable { name, .. } => name.clone(),
        Expr::Assign { name, value, .. } => format!("(= {name} {})", self::expr(value)),
        Expr::Unary { op, expr: inner, .. } => parenthesize(&op.to_string(), [inner.as_ref()]),
        Expr::Binary { left, op, right, .. } => {
            parenthesize(&op.to_string(), [left.as_ref(), right.as_ref()])
        },
        Expr::Logical { left, op, right, .. } => {
            parenthesize(&op.to_string(), [left.as_ref(), right.as_ref()])
        },
        Expr::Call { callee, arguments, .. } => {
            let mut out = format!("(call {}", self::expr(callee));
            for argument in arguments {
                out.push(' ');
                out.push_str(&self::argument(argument));
            }
            out.push(')');
            out
        },
        Expr::Get { object, name, .. } => format!("(. {} {name})", self::expr(object)),
        Expr::Set { object, name, value, .. } => {
            format!("(.= {} {name} {})", self::expr(object), self::expr(value))
        },
        Expr::Index { object, index, .. } => parenthesize("[]", [object.as_ref(), index.as_ref()]),
        Expr::IndexSet { object, index, value, .. } => {
            parenthesize("[]=", [object.as_ref(), index.as_ref(), value.as_ref()])
        },
        Expr::This { .. } => "this".to_string(),
        Expr::SuperGet { name, .. } => format!("(super {name})"),
        Expr::SuperSet { name, value, .. } => format!("(super= {name} {})", self::expr(value)),
        Expr::Array { elements, .. } => parenthesize("array", elements),
        Expr::Map { entries, .. } => {
            let mut out = "(map".to_string();
            for (key, value) in entries {
                let _ = write!(out, " ({} {})", self::expr(key), self::expr(value));
            }
            out.push(')');
            out
        },
        Expr::Function { decl, .. } => function("fun", decl),
    }
}

/// Renders a statement as an S-expression.
///
/// # Example
/// ```
/// use kestrel::ast::{Expr, Statement, sexp};
///
/// let stmt = Statement::Print { expr: Expr::Variable { id:   1,
///                                                      name: "x".to_string(),
///                                                      line: 1, },
///                               line: 1, };
///
/// assert_eq!(sexp::stmt(&stmt), "(print x)");
/// ```
#[must_use]
pub fn stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expression { expr, .. } => format!("(; {})", self::expr(expr)),
        Stmt::Print { expr, .. } => format!("(print {})", self::expr(expr)),
        Stmt::Var { names, initializers, .. } => {
            let mut out = format!("(var ({})", names.join(" "));
            for initializer in initializers {
                out.push(' ');
                out.push_str(&self::expr(initializer));
            }
            out.push(')');
            out
        },
        Stmt::Block { statements, .. } => block("block", statements),
        Stmt::If { condition, then_branch, else_branch, .. } => {
            let mut out = format!("(if {} {}", self::expr(condition), self::stmt(then_branch));
            if let Some(otherwise) = else_branch {
                out.push(' ');
                out.push_str(&self::stmt(otherwise));
            }
            out.push(')');
            out
        },
        Stmt::While { condition, body, .. } => {
            format!("(while {} {})", self::expr(condition), self::stmt(body))
        },
        Stmt::For { initializer, condition, increment, body, .. } => {
            let optional = |e: Option<&Expr>| e.map_or_else(|| "_".to_string(), self::expr);
            format!("(for {} {} {} {})",
                    initializer.as_deref().map_or_else(|| "_".to_string(), self::stmt),
                    optional(condition.as_ref()),
                    optional(increment.as_ref()),
                    self::stmt(body))
        },
        Stmt::Foreach { names, iterable, body, .. } => {
            format!("(foreach ({}) {} {})", names.join(" "), self::expr(iterable), self::stmt(body))
        },
        Stmt::In { object, body, .. } => block(&format!("in {}", self::expr(object)), body),
        Stmt::Try { body, catches, .. } => {
            let mut out = block("try", body);
            out.pop();
            for clause in catches {
                let head = match &clause.name {
                    Some(name) => format!("catch {} {name}", self::expr(&clause.matcher)),
                    None => format!("catch {}", self::expr(&clause.matcher)),
                };
                out.push(' ');
                out.push_str(&block(&head, &clause.body));
            }
            out.push(')');
            out
        },
        Stmt::Throw { value, .. } => format!("(throw {})", self::expr(value)),
        Stmt::Break { .. } => "(break)".to_string(),
        Stmt::Continue { .. } => "(continue)".to_string(),
        Stmt::Return { value, .. } => match value {
            Some(value) => format!("(return {})", self::expr(value)),
            None => "(return)".to_string(),
        },
        Stmt::Function(decl) => function("fun", decl),
        Stmt::Class(decl) => class("class", decl),
        Stmt::Module(decl) => class("module", decl),
    }
}

fn literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Nil => "nil".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Number(n) => format_number(*n),
        LiteralValue::Str(s) => format!("{s:?}"),
    }
}

fn argument(argument: &Argument) -> String {
    match argument {
        Argument::Positional(value) => expr(value),
        Argument::Splat(value) => format!("*{}", expr(value)),
        Argument::Keyword { name, value } => format!("{name}: {}", expr(value)),
    }
}

fn param(param: &Param) -> String {
    match &param.kind {
        ParamKind::Required => param.name.clone(),
        ParamKind::Optional(default) => format!("{}={}", param.name, expr(default)),
        ParamKind::Splat => format!("*{}", param.name),
        ParamKind::Keyword(default) => format!("{}: {}", param.name, expr(default)),
    }
}

fn parenthesize<'a>(name: &str, children: impl IntoIterator<Item = &'a Expr>) -> String {
    let mut out = format!("({name}");
    for child in children {
        out.push(' ');
        out.push_str(&expr(child));
    }
    out.push(')');
    out
}

fn block(head: &str, statements: &[Stmt]) -> String {
    let mut out = format!("({head}");
    for statement in statements {
        out.push(' ');
        out.push_str(&stmt(statement));
    }
    out.push(')');
    out
}

fn function(head: &str, decl: &FunctionDecl) -> String {
    let params = decl.params.iter().map(param).collect::<Vec<_>>().join(" ");
    block(&format!("{head} {} ({params})", decl.name), &decl.body)
}

fn class(head: &str, decl: &ClassDecl) -> String {
    let mut out = format!("({head} {}", decl.name);
    if let Some(superclass) = &decl.superclass {
        let _ = write!(out, " < {}", expr(superclass));
    }
    for (kind, members) in [("method", &decl.methods),
                            ("static", &decl.statics),
                            ("getter", &decl.getters),
                            ("setter", &decl.setters)]
    {
        for member in members {
            out.push(' ');
            out.push_str(&function(kind, member));
        }
    }
    out.push(')');
    out
}
