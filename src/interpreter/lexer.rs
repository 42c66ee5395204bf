use std::{fmt, rc::Rc};

use logos::{Lexer, Logos};

use crate::error::{Diagnostics, LexError};

/// Represents the kind of a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Literal kinds carry their payload; everything else is a unit variant.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    /// Numeric literal tokens, such as `3.14` or `42`. `__LINE__` also lexes
    /// into a number holding the current line.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    #[token("__LINE__", current_line)]
    Number(f64),
    /// Double-quoted string. The raw text is kept so that the parser can
    /// expand `${...}` interpolations.
    #[token("\"", |lex| scan_quoted(lex, '"', true))]
    Str(String),
    /// Single-quoted string, escapes already processed.
    #[token("'", |lex| scan_quoted(lex, '\'', false).map(|raw| unescape(&raw)))]
    RawStr(String),
    /// `s"..."` or `s'...'`: a frozen string, escapes already processed.
    #[token("s\"", |lex| scan_quoted(lex, '"', false).map(|raw| unescape(&raw)))]
    #[token("s'", |lex| scan_quoted(lex, '\'', false).map(|raw| unescape(&raw)))]
    StaticStr(String),
    /// Identifier tokens; variable, function, or class names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `and`
    #[token("and")]
    And,
    /// `break`
    #[token("break")]
    Break,
    /// `catch`
    #[token("catch")]
    Catch,
    /// `class`
    #[token("class")]
    Class,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `else`
    #[token("else")]
    Else,
    /// `false`
    #[token("false")]
    False,
    /// `for`
    #[token("for")]
    For,
    /// `foreach`
    #[token("foreach")]
    Foreach,
    /// `fun`
    #[token("fun")]
    Fun,
    /// `if`
    #[token("if")]
    If,
    /// `in`
    #[token("in")]
    In,
    /// `module`
    #[token("module")]
    Module,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `or`
    #[token("or")]
    Or,
    /// `print`
    #[token("print")]
    Print,
    /// `return`
    #[token("return")]
    Return,
    /// `super`
    #[token("super")]
    Super,
    /// `this`
    #[token("this")]
    This,
    /// `throw`
    #[token("throw")]
    Throw,
    /// `true`
    #[token("true")]
    True,
    /// `try`
    #[token("try")]
    Try,
    /// `var`
    #[token("var")]
    Var,
    /// `while`
    #[token("while")]
    While,
    /// `__END__` stops lexing; nothing after it is part of the program.
    #[token("__END__")]
    EndMarker,

    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `/* Block comments. */`
    #[token("/*", block_comment)]
    BlockComment,
    /// Newlines only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,

    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `>`
    #[token(">")]
    Greater,

    /// End of input. Never produced by logos itself; [`scan`] appends it.
    Eof,
}

impl TokenKind {
    /// Returns `true` for the keywords the parser synchronizes on after an
    /// error.
    #[must_use]
    pub const fn starts_statement(&self) -> bool {
        matches!(self,
                 Self::Class
                 | Self::Module
                 | Self::Fun
                 | Self::Var
                 | Self::For
                 | Self::Foreach
                 | Self::If
                 | Self::While
                 | Self::Print
                 | Self::Return
                 | Self::Try
                 | Self::Throw
                 | Self::Break
                 | Self::Continue)
    }
}

/// Additional information carried by the lexer during tokenization.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:    usize,
    /// Newlines consumed inside the current token that have not yet been
    /// added to `line`. Strings are stamped with the line they start on.
    pub pending: usize,
}

/// A token together with its source text and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is, including any literal payload.
    pub kind:   TokenKind,
    /// The exact source text of the token.
    pub lexeme: String,
    /// The line the token starts on.
    pub line:   usize,
    /// Name of the file (or pseudo-file) the token came from.
    pub file:   Rc<str>,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "end")
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}

/// Scans `source` into a token vector terminated by [`TokenKind::Eof`].
///
/// Lexing is resilient: unrecognized characters and unterminated strings are
/// reported to `diagnostics` and scanning resumes with the next token.
///
/// # Parameters
/// - `source`: The text to tokenize.
/// - `file`: File name stamped on every token.
/// - `first_line`: Line number of the first character of `source`.
/// - `diagnostics`: Sink for lexical errors.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use kestrel::{
///     error::Diagnostics,
///     interpreter::lexer::{TokenKind, scan},
/// };
///
/// let mut diagnostics = Diagnostics::default();
/// let tokens = scan("var x = 1;", &Rc::from("<doc>"), 1, &mut diagnostics);
///
/// assert_eq!(tokens[0].kind, TokenKind::Var);
/// assert_eq!(tokens[3].kind, TokenKind::Number(1.0));
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// assert!(!diagnostics.had_error());
/// ```
pub fn scan(source: &str,
            file: &Rc<str>,
            first_line: usize,
            diagnostics: &mut Diagnostics)
            -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer_with_extras(source,
                                                 LexerExtras { line:    first_line,
                                                               pending: 0, });

    while let Some(result) = lexer.next() {
        let line = lexer.extras.line;
        match result {
            Ok(TokenKind::EndMarker) => break,
            Ok(kind) => tokens.push(Token { kind,
                                            lexeme: lexer.slice().to_string(),
                                            line,
                                            file: Rc::clone(file) }),
            Err(LexError::UnexpectedCharacter) => {
                diagnostics.report(line,
                                   format!(" at '{}'", lexer.slice()),
                                   LexError::UnexpectedCharacter.to_string());
            },
            Err(error) => diagnostics.report(line, String::new(), error.to_string()),
        }
        lexer.extras.line += lexer.extras.pending;
        lexer.extras.pending = 0;
    }

    tokens.push(Token { kind:   TokenKind::Eof,
                        lexeme: String::new(),
                        line:   lexer.extras.line,
                        file:   Rc::clone(file), });
    tokens
}

/// Parses a numeric literal from the current token slice.
fn parse_number(lex: &Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Produces the value of `__LINE__`.
#[allow(clippy::cast_precision_loss)]
fn current_line(lex: &Lexer<TokenKind>) -> f64 {
    lex.extras.line as f64
}

/// Skips a block comment, counting the newlines it spans. An unterminated
/// comment swallows the rest of the input.
fn block_comment(lex: &mut Lexer<TokenKind>) -> logos::Skip {
    let rest = lex.remainder();
    let length = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.extras.line += rest[..length].matches('\n').count();
    lex.bump(length);
    logos::Skip
}

/// Scans the body of a quoted string after its opening quote and returns the
/// raw text between the quotes.
///
/// When `interpolating` is set, quotes nested inside `${...}` do not close
/// the string, so `"${m["k"]}"` is one token.
fn scan_quoted(lex: &mut Lexer<TokenKind>,
               quote: char,
               interpolating: bool)
               -> Result<String, LexError> {
    let rest = lex.remainder();
    let mut escaped = false;
    let mut depth = 0usize;
    let mut nested: Option<char> = None;
    let mut previous = '\0';
    let mut end = None;

    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            previous = '\0';
            continue;
        }
        if let Some(q) = nested {
            if c == '\\' {
                escaped = true;
            } else if c == q {
                nested = None;
            }
        } else if c == '\\' {
            escaped = true;
        } else if interpolating && c == '{' && (depth > 0 || previous == '$') {
            depth += 1;
        } else if depth > 0 && c == '}' {
            depth -= 1;
        } else if depth > 0 && (c == '"' || c == '\'') {
            nested = Some(c);
        } else if c == quote {
            end = Some(i);
            break;
        }
        previous = c;
    }

    match end {
        Some(end) => {
            let raw = &rest[..end];
            lex.extras.pending += raw.matches('\n').count();
            lex.bump(end + quote.len_utf8());
            Ok(raw.to_string())
        },
        None => {
            let line = lex.extras.line;
            lex.extras.pending += rest.matches('\n').count();
            lex.bump(rest.len());
            Err(LexError::UnterminatedString { line })
        },
    }
}

/// Processes backslash escapes.
///
/// Recognized escapes are `\n`, `\t`, `\r`, `\0`, `\\`, `\"`, `\'` and `\$`;
/// any other escaped character is kept as is.
///
/// # Example
/// ```
/// use kestrel::interpreter::lexer::unescape;
///
/// assert_eq!(unescape(r"a\tb\$"), "a\tb$");
/// ```
#[must_use]
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
