use std::rc::Rc;

/// Renders AST nodes as S-expressions for tests and tooling.
pub mod sexp;

/// Identifies one variable-like expression node within an interpreter
/// session.
///
/// The resolver's hop-count table is keyed by this id instead of by name, so
/// two uses of the same name in differently nested scopes resolve
/// independently.
pub type ExprId = usize;

/// Hands out [`ExprId`]s. One generator lives as long as an interpreter, so
/// ids stay unique across every source string it parses.
#[derive(Debug, Default)]
pub struct IdGen {
    next: ExprId,
}

impl IdGen {
    /// Returns a fresh id.
    pub const fn fresh(&mut self) -> ExprId {
        self.next += 1;
        self.next
    }
}

/// Represents a literal value in the language.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `nil`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// A number literal; all numbers are 64-bit floats.
    Number(f64),
    /// A string literal with escapes processed and no interpolation left.
    Str(String),
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Nodes that read or write a variable (including `this`) carry an
/// [`ExprId`] so the resolver can annotate them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// A frozen `s"..."` string; every evaluation of one site yields the same
    /// instance.
    StaticStr {
        /// Node id, used to cache the instance.
        id:   ExprId,
        /// The string contents.
        text: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A parenthesized expression, also produced by string interpolation.
    Grouping {
        /// The inner expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Node id for the resolver.
        id:   ExprId,
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Assignment to a variable.
    Assign {
        /// Node id for the resolver.
        id:    ExprId,
        /// Name of the variable.
        name:  String,
        /// The assigned value.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation.
    Unary {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// An arithmetic, comparison or equality operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Short-circuiting `and` / `or`.
    Logical {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    LogicalOperator,
        /// Right operand, evaluated only when needed.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A call expression.
    Call {
        /// The expression producing the callee.
        callee:    Box<Self>,
        /// Arguments in source order.
        arguments: Vec<Argument>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Property read `object.name`.
    Get {
        /// The receiver.
        object: Box<Self>,
        /// Property name.
        name:   String,
        /// Line number in the source code.
        line:   usize,
    },
    /// Property write `object.name = value`.
    Set {
        /// The receiver.
        object: Box<Self>,
        /// Property name.
        name:   String,
        /// The assigned value.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Index read `object[index]`.
    Index {
        /// The indexed value.
        object: Box<Self>,
        /// The index.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Index write `object[index] = value`.
    IndexSet {
        /// The indexed value.
        object: Box<Self>,
        /// The index.
        index:  Box<Self>,
        /// The assigned value.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `this`
    This {
        /// Node id for the resolver.
        id:   ExprId,
        /// Line number in the source code.
        line: usize,
    },
    /// `super.name`
    SuperGet {
        /// Node id for the resolver; it resolves `this`.
        id:   ExprId,
        /// Member name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// `super.name = value`
    SuperSet {
        /// Node id for the resolver; it resolves `this`.
        id:    ExprId,
        /// Member name.
        name:  String,
        /// The assigned value.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Array literal expression.
    Array {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Map literal expression `{k: v, ...}`.
    Map {
        /// Key/value pairs in source order.
        entries: Vec<(Self, Self)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Anonymous function `fun (params) { body }`.
    Function {
        /// The function's declaration.
        decl: Rc<FunctionDecl>,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use kestrel::ast::Expr;
    ///
    /// let expr = Expr::Variable { id:   1,
    ///                             name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::StaticStr { line, .. }
            | Self::Grouping { line, .. }
            | Self::Variable { line, .. }
            | Self::Assign { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Logical { line, .. }
            | Self::Call { line, .. }
            | Self::Get { line, .. }
            | Self::Set { line, .. }
            | Self::Index { line, .. }
            | Self::IndexSet { line, .. }
            | Self::This { line, .. }
            | Self::SuperGet { line, .. }
            | Self::SuperSet { line, .. }
            | Self::Array { line, .. }
            | Self::Map { line, .. }
            | Self::Function { line, .. } => *line,
        }
    }
}

/// One argument at a call site.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// `expr`
    Positional(Expr),
    /// `*expr`: an array spliced as positional arguments or a map spliced as
    /// keyword arguments.
    Splat(Expr),
    /// `name: expr`
    Keyword {
        /// The keyword.
        name:  String,
        /// The value.
        value: Expr,
    },
}

/// How a declared parameter receives its value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// `name`: a required positional parameter.
    Required,
    /// `name = default`: positional, defaulted when not supplied.
    Optional(Expr),
    /// `*name`: collects surplus positional arguments into an array.
    Splat,
    /// `name: default`: only passed by keyword.
    Keyword(Expr),
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// How the parameter is filled.
    pub kind: ParamKind,
}

/// The role a function declaration plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// A free function, named or anonymous.
    Function,
    /// An instance method.
    Method,
    /// A method named `init`.
    Initializer,
    /// A `class name(...)` method, bound to the class itself.
    Static,
    /// A `name { ... }` getter.
    Getter,
    /// A `name=(value) { ... }` setter.
    Setter,
}

/// Represents a function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The name of the function; anonymous functions use `"<anonymous>"`.
    pub name:   String,
    /// Declared parameters in order.
    pub params: Vec<Param>,
    /// The body statements.
    pub body:   Vec<Stmt>,
    /// What kind of function this is.
    pub kind:   FunctionKind,
    /// Line number in the source code.
    pub line:   usize,
}

impl FunctionDecl {
    /// Number of required positional parameters.
    #[must_use]
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Required))
            .count()
    }

    /// Maximum number of positional arguments, or `None` with a splat.
    #[must_use]
    pub fn max_arity(&self) -> Option<usize> {
        if self.params.iter().any(|p| matches!(p.kind, ParamKind::Splat)) {
            return None;
        }
        Some(self.params
                 .iter()
                 .filter(|p| matches!(p.kind, ParamKind::Required | ParamKind::Optional(_)))
                 .count())
    }

    /// Names of keyword-only parameters.
    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Keyword(_)))
            .map(|p| p.name.as_str())
    }
}

/// A class or module declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// The declared name.
    pub name:       String,
    /// `< Super`, always `None` for modules.
    pub superclass: Option<Expr>,
    /// Instance methods, `init` included.
    pub methods:    Vec<Rc<FunctionDecl>>,
    /// `class`-prefixed methods.
    pub statics:    Vec<Rc<FunctionDecl>>,
    /// Getters.
    pub getters:    Vec<Rc<FunctionDecl>>,
    /// Setters.
    pub setters:    Vec<Rc<FunctionDecl>>,
    /// Line number in the source code.
    pub line:       usize,
}

impl ClassDecl {
    /// Every member name a `super.name` lookup could hit.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.methods
            .iter()
            .chain(&self.getters)
            .chain(&self.setters)
            .map(|m| m.name.as_str())
    }
}

/// A `catch (matcher name) { ... }` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Compared against the thrown value.
    pub matcher: Expr,
    /// The variable bound to the thrown value, if any.
    pub name:    Option<String>,
    /// The handler body.
    pub body:    Vec<Stmt>,
    /// Line number in the source code.
    pub line:    usize,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `print expr;`
    Print {
        /// The printed expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `var a, b = x, y;`
    Var {
        /// Declared names.
        names:        Vec<String>,
        /// Initializers; never more than names.
        initializers: Vec<Expr>,
        /// Line number in the source code.
        line:         usize,
    },
    /// `{ ... }`
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `if (cond) then else otherwise`
    If {
        /// The condition.
        condition:   Expr,
        /// Taken when the condition is truthy.
        then_branch: Box<Self>,
        /// Taken otherwise.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while (cond) body`
    While {
        /// The loop condition.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// C-style `for (init; cond; incr) body`.
    For {
        /// Runs once in the loop's own scope.
        initializer: Option<Box<Self>>,
        /// Checked before each iteration; absent means `true`.
        condition:   Option<Expr>,
        /// Runs after each iteration.
        increment:   Option<Expr>,
        /// The loop body.
        body:        Box<Self>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `foreach a, b in expr { ... }`
    Foreach {
        /// Loop variables.
        names:    Vec<String>,
        /// The iterated value.
        iterable: Expr,
        /// The loop body, always a block.
        body:     Box<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `in (expr) { ... }`
    In {
        /// The value bound as `this`.
        object: Expr,
        /// The body statements.
        body:   Vec<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `try { ... } catch (...) { ... }`
    Try {
        /// The protected statements.
        body:    Vec<Self>,
        /// Handlers tried in order.
        catches: Vec<CatchClause>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `throw expr;`
    Throw {
        /// The thrown value.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `break;`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue;`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `return expr?;`
    Return {
        /// The returned value, `nil` when absent.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A named function declaration.
    Function(Rc<FunctionDecl>),
    /// A class declaration.
    Class(Rc<ClassDecl>),
    /// A module declaration.
    Module(Rc<ClassDecl>),
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Expression { line, .. }
            | Self::Print { line, .. }
            | Self::Var { line, .. }
            | Self::Block { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Foreach { line, .. }
            | Self::In { line, .. }
            | Self::Try { line, .. }
            | Self::Throw { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Return { line, .. } => *line,
            Self::Function(decl) => decl.line,
            Self::Class(decl) | Self::Module(decl) => decl.line,
        }
    }
}

/// Short name; the parser and evaluator refer to statements constantly.
pub type Stmt = Statement;

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

impl BinaryOperator {
    /// The operator-protocol method consulted when the left operand is not a
    /// number, for the arithmetic operators.
    #[must_use]
    pub const fn protocol_method(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("opAdd"),
            Self::Sub => Some("opDiff"),
            Self::Mul => Some("opMul"),
            Self::Div => Some("opDiv"),
            _ => None,
        }
    }
}

/// Short-circuiting operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
