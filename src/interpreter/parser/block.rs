use crate::{
    ast::Stmt,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses the statements of a block; the opening `{` has already been
    /// consumed.
    ///
    /// Declarations that fail are reported and skipped, so a block keeps
    /// parsing after an error inside it.
    ///
    /// Grammar: `block := "{" declaration* "}"`
    ///
    /// # Returns
    /// The statements inside the braces.
    ///
    /// # Errors
    /// Returns a `ParseError` if the closing `}` is missing.
    pub(in crate::interpreter::parser) fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        self.consume(&TokenKind::RBrace, "'}' after block")?;
        Ok(statements)
    }

    /// Consumes `{`, then parses a block.
    pub(in crate::interpreter::parser) fn braced_block(&mut self,
                                                       before: &str)
                                                       -> ParseResult<Vec<Stmt>> {
        self.consume(&TokenKind::LBrace, &format!("'{{' before {before}"))?;
        self.block()
    }
}
