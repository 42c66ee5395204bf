use crate::{
    ast::{BinaryOperator, Expr, LiteralValue},
    error::ParseError,
    interpreter::{
        lexer::unescape,
        parser::core::{ParseResult, Parser},
    },
};

/// One piece of a double-quoted string.
#[derive(Debug, PartialEq, Eq)]
enum Piece<'s> {
    /// Raw text between interpolations, escapes still in place.
    Text(&'s str),
    /// The code inside `${...}` and how many lines into the string it
    /// starts.
    Code { source: &'s str, line_offset: usize },
}

impl Parser<'_> {
    /// Expands a double-quoted string literal.
    ///
    /// Without any `${...}` the result is a plain string literal. Otherwise
    /// each embedded expression is scanned and parsed on its own, and the
    /// pieces fold into a left-associative `+` chain that starts with the
    /// leading text (possibly empty), so the chain always begins with a
    /// string and concatenation stringifies everything after it.
    ///
    /// ```text
    ///     "a ${x} b"  =>  (group (+ (+ "a " x) " b"))
    /// ```
    ///
    /// # Parameters
    /// - `raw`: The text between the quotes, escapes unprocessed.
    /// - `line`: Line of the opening quote.
    ///
    /// # Errors
    /// - `UnterminatedInterpolation` if a `${` is never closed.
    /// - `TrailingTokens` if an embedded expression is followed by more input.
    /// - Any error from parsing an embedded expression.
    pub(in crate::interpreter::parser) fn interpolated_string(&mut self,
                                                              raw: &str,
                                                              line: usize)
                                                              -> ParseResult<Expr> {
        let pieces = split(raw).ok_or(ParseError::UnterminatedInterpolation { line })?;

        let string = |text: &str| Expr::Literal { value: LiteralValue::Str(unescape(text)),
                                                  line };
        let mut pieces = pieces.into_iter().peekable();
        let mut expr = match pieces.peek() {
            Some(Piece::Text(text)) => {
                let first = string(*text);
                pieces.next();
                first
            },
            _ => string(""),
        };
        if pieces.peek().is_none() {
            return Ok(expr);
        }

        for piece in pieces {
            let right = match piece {
                Piece::Text("") => continue,
                Piece::Text(text) => string(text),
                Piece::Code { source, line_offset } => self.embedded(source, line + line_offset)?,
            };
            expr = Expr::Binary { left: Box::new(expr),
                                  op: BinaryOperator::Add,
                                  right: Box::new(right),
                                  line };
        }
        Ok(Expr::Grouping { expr: Box::new(expr),
                            line })
    }

    /// Parses the code of one `${...}` as a single expression.
    fn embedded(&mut self, source: &str, line: usize) -> ParseResult<Expr> {
        let mut parser = self.nested(source, line);
        let expr = parser.expression()?;
        if !parser.is_at_end() {
            let token = parser.peek();
            return Err(ParseError::TrailingTokens { found: token.to_string(),
                                                    line:  token.line, });
        }
        Ok(expr)
    }
}

/// Splits raw string text into text and code pieces.
///
/// Backslash escapes are skipped over, so `\${` stays literal text. Inside
/// `${...}` braces nest and quoted strings are skipped, matching how the
/// lexer found the end of the literal.
///
/// # Returns
/// `None` if a `${` has no matching `}`.
fn split(raw: &str) -> Option<Vec<Piece<'_>>> {
    let bytes = raw.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                pieces.push(Piece::Text(&raw[start..i]));
                let open = i + 2;
                let close = matching_brace(bytes, open)?;
                pieces.push(Piece::Code { source:      &raw[open..close],
                                          line_offset: raw[..open].matches('\n').count(), });
                start = close + 1;
                i = start;
            },
            _ => i += 1,
        }
    }
    pieces.push(Piece::Text(&raw[start.min(raw.len())..]));
    Some(pieces)
}

/// Finds the `}` closing an interpolation whose code starts at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {},
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                },
                _ => {},
            },
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Piece, split};

    #[test]
    fn splits_text_and_code() {
        assert_eq!(split("a ${x} b"),
                   Some(vec![Piece::Text("a "),
                             Piece::Code { source:      "x",
                                           line_offset: 0, },
                             Piece::Text(" b")]));
    }

    #[test]
    fn escaped_dollar_is_text() {
        assert_eq!(split(r"cost \${x}"), Some(vec![Piece::Text(r"cost \${x}")]));
    }

    #[test]
    fn nested_braces_and_quotes() {
        assert_eq!(split(r#"${ {"k": "}"}["k"] }"#),
                   Some(vec![Piece::Text(""),
                             Piece::Code { source:      r#" {"k": "}"}["k"] "#,
                                           line_offset: 0, },
                             Piece::Text("")]));
    }

    #[test]
    fn unterminated_interpolation() {
        assert_eq!(split("${x"), None);
    }
}
