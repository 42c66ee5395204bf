use crate::{
    ast::{CatchClause, Expr, Stmt},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a single statement.
    ///
    /// The leading keyword selects the form; anything else is an expression
    /// statement. A `{` at statement position always opens a block, never a
    /// map literal.
    ///
    /// # Returns
    /// A parsed [`Stmt`] node.
    pub(in crate::interpreter::parser) fn statement(&mut self) -> ParseResult<Stmt> {
        let line = self.peek().line;
        match self.peek().kind {
            TokenKind::Print => {
                self.advance();
                let expr = self.expression()?;
                self.consume(&TokenKind::Semicolon, "';' after value")?;
                Ok(Stmt::Print { expr, line })
            },
            TokenKind::LBrace => {
                self.advance();
                Ok(Stmt::Block { statements: self.block()?,
                                 line })
            },
            TokenKind::If => {
                self.advance();
                self.if_statement(line)
            },
            TokenKind::While => {
                self.advance();
                self.while_statement(line)
            },
            TokenKind::For => {
                self.advance();
                self.for_statement(line)
            },
            TokenKind::Foreach => {
                self.advance();
                self.foreach_statement(line)
            },
            TokenKind::In => {
                self.advance();
                self.in_statement(line)
            },
            TokenKind::Try => {
                self.advance();
                self.try_statement(line)
            },
            TokenKind::Throw => {
                self.advance();
                let value = self.expression()?;
                self.consume(&TokenKind::Semicolon, "';' after thrown value")?;
                Ok(Stmt::Throw { value, line })
            },
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.consume(&TokenKind::Semicolon, "';' after return value")?;
                Ok(Stmt::Return { value, line })
            },
            TokenKind::Break => {
                self.advance();
                self.loop_control("break")?;
                Ok(Stmt::Break { line })
            },
            TokenKind::Continue => {
                self.advance();
                self.loop_control("continue")?;
                Ok(Stmt::Continue { line })
            },
            _ => self.expression_statement(),
        }
    }

    /// Parses `expr ;`.
    pub(in crate::interpreter::parser) fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.peek().line;
        let expr = self.expression()?;
        self.consume(&TokenKind::Semicolon, "';' after expression")?;
        Ok(Stmt::Expression { expr, line })
    }

    /// Parses a variable declaration after the `var` keyword.
    ///
    /// Grammar:
    /// ```text
    ///     varDecl := "var" IDENT ( "," IDENT )* ( "=" expression ( "," expression )* )? ";"
    /// ```
    ///
    /// More initializers than names is reported, and the surplus dropped, but
    /// does not abort the declaration.
    pub(in crate::interpreter::parser) fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let line = self.previous().line;
        let mut names = vec![self.consume_identifier("variable name")?];
        while self.matches(&TokenKind::Comma) {
            names.push(self.consume_identifier("variable name")?);
        }

        let mut initializers = Vec::new();
        if self.matches(&TokenKind::Equals) {
            initializers.push(self.expression()?);
            while self.matches(&TokenKind::Comma) {
                initializers.push(self.expression()?);
            }
        }
        if initializers.len() > names.len() {
            self.report(&ParseError::TooManyInitializers { line });
            initializers.truncate(names.len());
        }

        self.consume(&TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Stmt::Var { names,
                       initializers,
                       line })
    }

    /// Reports `break` / `continue` outside a loop and consumes the `;`.
    fn loop_control(&mut self, keyword: &str) -> ParseResult<()> {
        if !self.in_loop() {
            self.report(&ParseError::LoopControlOutsideLoop { keyword: keyword.to_string(),
                                                              line:    self.previous().line, });
        }
        self.consume(&TokenKind::Semicolon, &format!("';' after '{keyword}'"))?;
        Ok(())
    }

    /// Parses the body of a loop with the loop depth raised.
    fn loop_body(&mut self) -> ParseResult<Stmt> {
        self.enter_loop();
        let body = self.statement();
        self.exit_loop();
        body
    }

    /// Grammar: `ifStmt := "if" "(" expression ")" statement ( "else" statement )?`
    fn if_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        let condition = self.parenthesized("'if'", "condition")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If { condition,
                      then_branch,
                      else_branch,
                      line })
    }

    /// Grammar: `whileStmt := "while" "(" expression ")" statement`
    fn while_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        let condition = self.parenthesized("'while'", "condition")?;
        let body = Box::new(self.loop_body()?);
        Ok(Stmt::While { condition, body, line })
    }

    /// Parses a C-style `for` loop.
    ///
    /// Grammar:
    /// ```text
    ///     forStmt := "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement
    /// ```
    fn for_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LParen, "'(' after 'for'")?;

        let initializer = if self.matches(&TokenKind::Semicolon) {
            None
        } else if self.matches(&TokenKind::Var) {
            Some(Box::new(self.var_declaration()?))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::Semicolon, "';' after loop condition")?;

        let increment = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::RParen, "')' after for clauses")?;

        let body = Box::new(self.loop_body()?);
        Ok(Stmt::For { initializer,
                       condition,
                       increment,
                       body,
                       line })
    }

    /// Grammar: `foreachStmt := "foreach" IDENT ( "," IDENT )* "in" expression block`
    fn foreach_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        let mut names = vec![self.consume_identifier("loop variable name")?];
        while self.matches(&TokenKind::Comma) {
            names.push(self.consume_identifier("loop variable name")?);
        }
        self.consume(&TokenKind::In, "'in' after loop variables")?;
        let iterable = self.expression()?;

        let body_line = self.consume(&TokenKind::LBrace, "'{' before loop body")?;
        self.enter_loop();
        let statements = self.block();
        self.exit_loop();

        Ok(Stmt::Foreach { names,
                           iterable,
                           body: Box::new(Stmt::Block { statements: statements?,
                                                        line:       body_line, }),
                           line })
    }

    /// Grammar: `inStmt := "in" "(" expression ")" block`
    fn in_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        let object = self.parenthesized("'in'", "target")?;
        let body = self.braced_block("'in' body")?;
        Ok(Stmt::In { object, body, line })
    }

    /// Parses `try` and its handlers.
    ///
    /// Grammar:
    /// ```text
    ///     tryStmt := "try" block ( "catch" "(" expression IDENT? ")" block )+
    /// ```
    fn try_statement(&mut self, line: usize) -> ParseResult<Stmt> {
        let body = self.braced_block("try body")?;

        let mut catches = Vec::new();
        while self.check(&TokenKind::Catch) {
            let clause_line = self.advance().line;
            self.consume(&TokenKind::LParen, "'(' after 'catch'")?;
            let matcher = self.expression()?;
            let name = if matches!(self.peek().kind, TokenKind::Identifier(_)) {
                Some(self.consume_identifier("exception variable name")?)
            } else {
                None
            };
            self.consume(&TokenKind::RParen, "')' after catch clause")?;
            let body = self.braced_block("catch body")?;
            catches.push(CatchClause { matcher,
                                       name,
                                       body,
                                       line: clause_line });
        }
        if catches.is_empty() {
            return Err(self.error_at_current("'catch' after try block"));
        }

        Ok(Stmt::Try { body, catches, line })
    }

    /// Parses `( expression )`.
    fn parenthesized(&mut self, after: &str, what: &str) -> ParseResult<Expr> {
        self.consume(&TokenKind::LParen, &format!("'(' after {after}"))?;
        let expr = self.expression()?;
        self.consume(&TokenKind::RParen, &format!("')' after {what}"))?;
        Ok(expr)
    }
}
