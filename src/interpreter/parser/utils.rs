use crate::{
    ast::BinaryOperator,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a comma-separated list of items until a closing token.
    ///
    /// This utility is shared by array literals, map literals, parameter
    /// lists and call arguments. An immediately encountered closing token
    /// produces an empty list.
    ///
    /// Grammar (simplified): `list := ( item ( "," item )* )? closing`
    ///
    /// # Parameters
    /// - `closing`: The token that terminates the list (e.g., `]` or `)`).
    /// - `what`: Used in the error message when the closing token is missing.
    /// - `parse_item`: Parses one element.
    ///
    /// # Returns
    /// A vector of parsed items.
    ///
    /// # Errors
    /// Returns a `ParseError` if an item fails to parse or the list is not
    /// closed.
    pub(in crate::interpreter::parser) fn comma_separated<T>(&mut self,
                                                             closing: &TokenKind,
                                                             what: &str,
                                                             mut parse_item: impl FnMut(&mut Self) -> ParseResult<T>)
                                                             -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        if !self.check(closing) {
            loop {
                items.push(parse_item(self)?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(closing, what)?;
        Ok(items)
    }

    /// Accepts an identifier, or the keyword `class`, as a property name.
    pub(in crate::interpreter::parser) fn property_name(&mut self) -> ParseResult<String> {
        if self.matches(&TokenKind::Class) {
            return Ok("class".to_string());
        }
        self.consume_identifier("property name after '.'")
    }
}

/// Maps a token to the binary operator it denotes, if any.
///
/// # Example
/// ```
/// use kestrel::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::utils::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&TokenKind::Plus), Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&TokenKind::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &TokenKind) -> Option<BinaryOperator> {
    match token {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        _ => None,
    }
}

/// Maps a compound-assignment token to the operator it applies.
#[must_use]
pub const fn compound_assignment_operator(token: &TokenKind) -> Option<BinaryOperator> {
    match token {
        TokenKind::PlusAssign => Some(BinaryOperator::Add),
        TokenKind::MinusAssign => Some(BinaryOperator::Sub),
        TokenKind::StarAssign => Some(BinaryOperator::Mul),
        TokenKind::SlashAssign => Some(BinaryOperator::Div),
        _ => None,
    }
}
