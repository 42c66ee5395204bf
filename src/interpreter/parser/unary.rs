use std::rc::Rc;

use crate::{
    ast::{Argument, Expr, FunctionKind, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a unary expression.
    ///
    /// Supports prefix operators:
    /// - `-`  (numeric negation)
    /// - `!`  (logical not)
    ///
    /// Unary operators are right-associative, so an input like `!-x` is
    /// parsed as `!( -x )`.
    ///
    /// Grammar:
    /// ```text
    ///     unary := ( "-" | "!" ) unary | call
    /// ```
    pub(in crate::interpreter::parser) fn unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Bang => UnaryOperator::Not,
            _ => return self.call(),
        };
        let line = self.advance().line;
        let expr = self.unary()?;
        Ok(Expr::Unary { op,
                         expr: Box::new(expr),
                         line })
    }

    /// Parses a primary expression followed by any chain of calls, property
    /// accesses and indexes.
    ///
    /// Grammar:
    /// ```text
    ///     call := primary ( "(" arguments? ")" | "." IDENT | "[" expression "]" )*
    /// ```
    pub(in crate::interpreter::parser) fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            let line = self.peek().line;
            if self.matches(&TokenKind::LParen) {
                let arguments =
                    self.comma_separated(&TokenKind::RParen, "')' after arguments", Self::argument)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    arguments,
                                    line };
            } else if self.matches(&TokenKind::Dot) {
                let name = self.property_name()?;
                expr = Expr::Get { object: Box::new(expr),
                                   name,
                                   line };
            } else if self.matches(&TokenKind::LBracket) {
                let index = self.expression()?;
                self.consume(&TokenKind::RBracket, "']' after index")?;
                expr = Expr::Index { object: Box::new(expr),
                                     index: Box::new(index),
                                     line };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parses one call argument.
    ///
    /// Grammar: `argument := "*" expression | IDENT ":" expression | expression`
    fn argument(&mut self) -> ParseResult<Argument> {
        if self.matches(&TokenKind::Star) {
            return Ok(Argument::Splat(self.expression()?));
        }
        if let TokenKind::Identifier(name) = &self.peek().kind
           && *self.peek_next() == TokenKind::Colon
        {
            let name = name.clone();
            self.advance();
            self.advance();
            return Ok(Argument::Keyword { name,
                                          value: self.expression()? });
        }
        Ok(Argument::Positional(self.expression()?))
    }

    /// Parses a primary (atomic) expression.
    ///
    /// Grammar (simplified):
    /// ```text
    ///     primary := NUMBER | STRING | "true" | "false" | "nil" | "this"
    ///              | "super" "." IDENT | IDENT | "(" expression ")"
    ///              | "[" elements "]" | "{" entries "}" | "fun" params block
    /// ```
    ///
    /// # Errors
    /// Returns `Expected expression` for any other token.
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        let line = token.line;

        let literal = |value: LiteralValue| Expr::Literal { value, line };
        let expr = match token.kind {
            TokenKind::Number(n) => literal(LiteralValue::Number(n)),
            TokenKind::RawStr(s) => literal(LiteralValue::Str(s)),
            TokenKind::True => literal(LiteralValue::Bool(true)),
            TokenKind::False => literal(LiteralValue::Bool(false)),
            TokenKind::Nil => literal(LiteralValue::Nil),
            TokenKind::Str(raw) => {
                self.advance();
                return self.interpolated_string(&raw, line);
            },
            TokenKind::StaticStr(text) => Expr::StaticStr { id: self.fresh_id(),
                                                            text,
                                                            line },
            TokenKind::This => Expr::This { id: self.fresh_id(),
                                            line },
            TokenKind::Identifier(name) => Expr::Variable { id: self.fresh_id(),
                                                            name,
                                                            line },
            TokenKind::Super => {
                self.advance();
                self.consume(&TokenKind::Dot, "'.' after 'super'")?;
                let name = self.property_name()?;
                return Ok(Expr::SuperGet { id: self.fresh_id(),
                                           name,
                                           line });
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(&TokenKind::RParen, "')' after expression")?;
                return Ok(Expr::Grouping { expr: Box::new(inner),
                                           line });
            },
            TokenKind::LBracket => {
                self.advance();
                let elements =
                    self.comma_separated(&TokenKind::RBracket, "']' after array elements", Self::expression)?;
                return Ok(Expr::Array { elements, line });
            },
            TokenKind::LBrace => {
                self.advance();
                let entries =
                    self.comma_separated(&TokenKind::RBrace, "'}' after map entries", Self::map_entry)?;
                return Ok(Expr::Map { entries, line });
            },
            TokenKind::Fun => {
                self.advance();
                self.consume(&TokenKind::LParen, "'(' after 'fun'")?;
                let decl = self.function_body("<anonymous>".to_string(), FunctionKind::Function, line)?;
                return Ok(Expr::Function { decl: Rc::new(decl),
                                           line });
            },
            _ => return Err(self.error_at_current("expression")),
        };

        self.advance();
        Ok(expr)
    }

    /// Grammar: `entry := expression ":" expression`
    fn map_entry(&mut self) -> ParseResult<(Expr, Expr)> {
        let key = self.expression()?;
        self.consume(&TokenKind::Colon, "':' after map key")?;
        let value = self.expression()?;
        Ok((key, value))
    }
}
