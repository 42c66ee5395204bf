use std::rc::Rc;

use crate::{
    ast::{ExprId, IdGen, Stmt},
    error::{Diagnostics, ParseError},
    interpreter::lexer::{Token, TokenKind, scan},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A recursive-descent parser over a scanned token vector.
///
/// The parser never stops at the first error. Each failed declaration is
/// reported to the diagnostics sink and the parser skips ahead to the next
/// statement boundary, so one typo does not hide the rest of the file's
/// problems.
pub struct Parser<'a> {
    tokens:      Vec<Token>,
    current:     usize,
    ids:         &'a mut IdGen,
    diagnostics: &'a mut Diagnostics,
    /// Loop nesting per function body; the last entry belongs to the
    /// innermost function.
    loops:       Vec<usize>,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `tokens`.
    ///
    /// An [`TokenKind::Eof`] token is appended when the vector does not
    /// already end with one.
    ///
    /// # Parameters
    /// - `tokens`: Output of [`crate::interpreter::lexer::scan`].
    /// - `ids`: Id generator shared by every parse of one session.
    /// - `diagnostics`: Sink for parse errors.
    pub fn new(mut tokens: Vec<Token>,
               ids: &'a mut IdGen,
               diagnostics: &'a mut Diagnostics)
               -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            let file = tokens.last().map_or_else(|| Rc::from("<input>"), |t| Rc::clone(&t.file));
            tokens.push(Token { kind: TokenKind::Eof,
                                lexeme: String::new(),
                                line,
                                file });
        }
        Self { tokens,
               current: 0,
               ids,
               diagnostics,
               loops: vec![0] }
    }

    /// Parses declarations until the end of input.
    ///
    /// Grammar: `program := declaration* EOF`
    ///
    /// # Returns
    /// Every declaration that parsed successfully, in order.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        statements
    }

    /// Returns `true` once any lexical or parse error has been reported.
    #[must_use]
    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    /// Parses one declaration, recovering from errors.
    ///
    /// Grammar:
    /// ```text
    ///     declaration := classDecl | moduleDecl | funDecl | varDecl | statement
    /// ```
    ///
    /// # Returns
    /// `None` if the declaration failed to parse; the error has been reported
    /// and the cursor moved past the next statement boundary.
    pub(in crate::interpreter::parser) fn declaration(&mut self) -> Option<Stmt> {
        match self.try_declaration() {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.report(&error);
                self.synchronize();
                None
            },
        }
    }

    fn try_declaration(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::Class => {
                self.advance();
                self.class_declaration()
            },
            TokenKind::Module => {
                self.advance();
                self.module_declaration()
            },
            TokenKind::Fun if matches!(self.peek_next(), TokenKind::Identifier(_)) => {
                self.advance();
                self.function_declaration()
            },
            TokenKind::Var => {
                self.advance();
                self.var_declaration()
            },
            _ => self.statement(),
        }
    }

    /// Records an error without unwinding.
    ///
    /// Used for problems that leave the token stream in a well-formed state,
    /// such as an invalid assignment target.
    pub(in crate::interpreter::parser) fn report(&mut self, error: &ParseError) {
        self.diagnostics
            .report(error.line(), error.location(), error.to_string());
    }

    /// Discards tokens until a likely statement boundary: just after a `;`
    /// or just before a statement keyword.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    pub(in crate::interpreter::parser) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(in crate::interpreter::parser) fn peek_next(&self) -> &TokenKind {
        &self.tokens[(self.current + 1).min(self.tokens.len() - 1)].kind
    }

    pub(in crate::interpreter::parser) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(in crate::interpreter::parser) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Moves past the current token and returns it.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(in crate::interpreter::parser) fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    /// Consumes the current token if it is `kind`.
    pub(in crate::interpreter::parser) fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of `kind` or fails with `Expected {expected}`.
    ///
    /// # Returns
    /// The line of the consumed token.
    pub(in crate::interpreter::parser) fn consume(&mut self,
                                                  kind: &TokenKind,
                                                  expected: &str)
                                                  -> ParseResult<usize> {
        if self.check(kind) {
            Ok(self.advance().line)
        } else {
            Err(self.error_at_current(expected))
        }
    }

    /// Consumes an identifier and returns its name.
    pub(in crate::interpreter::parser) fn consume_identifier(&mut self,
                                                             expected: &str)
                                                             -> ParseResult<String> {
        if let TokenKind::Identifier(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_at_current(expected))
        }
    }

    /// Builds an `Expected` error pointing at the current token.
    pub(in crate::interpreter::parser) fn error_at_current(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::Expected { expected: expected.to_string(),
                               found:    token.to_string(),
                               line:     token.line, }
    }

    pub(in crate::interpreter::parser) fn fresh_id(&mut self) -> ExprId {
        self.ids.fresh()
    }

    /// Scans `source` and starts a nested parser over it, sharing ids and
    /// diagnostics with `self`.
    ///
    /// # Parameters
    /// - `source`: Code embedded in the current token, e.g. an interpolation.
    /// - `line`: The line `source` starts on.
    pub(in crate::interpreter::parser) fn nested(&mut self,
                                                 source: &str,
                                                 line: usize)
                                                 -> Parser<'_> {
        let file = Rc::clone(&self.peek().file);
        let tokens = scan(source, &file, line, self.diagnostics);
        Parser::new(tokens, &mut *self.ids, &mut *self.diagnostics)
    }

    pub(in crate::interpreter::parser) fn enter_function(&mut self) {
        self.loops.push(0);
    }

    pub(in crate::interpreter::parser) fn exit_function(&mut self) {
        self.loops.pop();
    }

    pub(in crate::interpreter::parser) fn enter_loop(&mut self) {
        if let Some(depth) = self.loops.last_mut() {
            *depth += 1;
        }
    }

    pub(in crate::interpreter::parser) fn exit_loop(&mut self) {
        if let Some(depth) = self.loops.last_mut() {
            *depth = depth.saturating_sub(1);
        }
    }

    pub(in crate::interpreter::parser) fn in_loop(&self) -> bool {
        self.loops.last().is_some_and(|depth| *depth > 0)
    }
}
