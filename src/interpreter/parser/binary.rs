use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, Parser},
            utils::{compound_assignment_operator, token_to_binary_operator},
        },
    },
};

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// lowest-precedence level, assignment, and recursively descends through
    /// the precedence hierarchy.
    ///
    /// Grammar: `expression := assignment`
    pub(in crate::interpreter::parser) fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// Parses assignment, right-associative.
    ///
    /// Compound forms desugar: `a += b` becomes `a = a + b`, and the same for
    /// properties, indexes and `super` properties. A left-hand side that is
    /// not assignable is reported but does not abort parsing.
    ///
    /// Grammar:
    /// ```text
    ///     assignment := ( call "." IDENT | call "[" expression "]" | IDENT | "super" "." IDENT )
    ///                   ( "=" | "+=" | "-=" | "*=" | "/=" ) assignment
    ///                 | logic_or
    /// ```
    fn assignment(&mut self) -> ParseResult<Expr> {
        let target = self.logical_or()?;

        let compound = compound_assignment_operator(&self.peek().kind);
        if compound.is_none() && !self.check(&TokenKind::Equals) {
            return Ok(target);
        }

        let operator = self.advance().clone();
        let value = self.assignment()?;
        let value = match compound {
            Some(op) => Expr::Binary { left: Box::new(target.clone()),
                                       op,
                                       right: Box::new(value),
                                       line: operator.line },
            None => value,
        };
        let value = Box::new(value);

        match target {
            Expr::Variable { name, line, .. } => Ok(Expr::Assign { id: self.fresh_id(),
                                                                   name,
                                                                   value,
                                                                   line }),
            Expr::Get { object, name, line } => Ok(Expr::Set { object,
                                                               name,
                                                               value,
                                                               line }),
            Expr::Index { object, index, line } => Ok(Expr::IndexSet { object,
                                                                       index,
                                                                       value,
                                                                       line }),
            Expr::SuperGet { name, line, .. } => Ok(Expr::SuperSet { id: self.fresh_id(),
                                                                     name,
                                                                     value,
                                                                     line }),
            other => {
                self.report(&ParseError::InvalidAssignmentTarget { found: operator.to_string(),
                                                                   line:  operator.line, });
                Ok(other)
            },
        }
    }

    /// Parses `or` chains.
    ///
    /// Grammar: `logic_or := logic_and ( "or" logic_and )*`
    pub(in crate::interpreter::parser) fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.logical_and()?;
        while self.check(&TokenKind::Or) {
            let line = self.advance().line;
            let right = self.logical_and()?;
            left = Expr::Logical { left: Box::new(left),
                                   op: LogicalOperator::Or,
                                   right: Box::new(right),
                                   line };
        }
        Ok(left)
    }

    /// Parses `and` chains.
    ///
    /// Grammar: `logic_and := equality ( "and" equality )*`
    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.equality()?;
        while self.check(&TokenKind::And) {
            let line = self.advance().line;
            let right = self.equality()?;
            left = Expr::Logical { left: Box::new(left),
                                   op: LogicalOperator::And,
                                   right: Box::new(right),
                                   line };
        }
        Ok(left)
    }

    /// Grammar: `equality := comparison ( ( "==" | "!=" ) comparison )*`
    fn equality(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[BinaryOperator::Equal, BinaryOperator::NotEqual],
                              Self::comparison)
    }

    /// Grammar: `comparison := additive ( ( "<" | "<=" | ">" | ">=" ) additive )*`
    fn comparison(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[BinaryOperator::Less,
                                BinaryOperator::LessEqual,
                                BinaryOperator::Greater,
                                BinaryOperator::GreaterEqual],
                              Self::additive)
    }

    /// Grammar: `additive := multiplicative ( ( "+" | "-" ) multiplicative )*`
    fn additive(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[BinaryOperator::Add, BinaryOperator::Sub],
                              Self::multiplicative)
    }

    /// Grammar: `multiplicative := unary ( ( "*" | "/" ) unary )*`
    fn multiplicative(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[BinaryOperator::Mul, BinaryOperator::Div], Self::unary)
    }

    /// Folds `operand ( op operand )*` into a left-associative tree for the
    /// given operators.
    fn left_associative(&mut self,
                        operators: &[BinaryOperator],
                        operand: fn(&mut Self) -> ParseResult<Expr>)
                        -> ParseResult<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = token_to_binary_operator(&self.peek().kind)
              && operators.contains(&op)
        {
            let line = self.advance().line;
            let right = operand(self)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }
}
