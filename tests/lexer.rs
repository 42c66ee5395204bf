use std::rc::Rc;

use indoc::indoc;
use kestrel::{
    error::Diagnostics,
    interpreter::lexer::{Token, TokenKind, scan},
};
use pretty_assertions::assert_eq;

fn tokens(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let tokens = scan(source, &Rc::from("<test>"), 1, &mut diagnostics);
    (tokens, diagnostics)
}

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, diagnostics) = tokens(source);
    assert!(!diagnostics.had_error(), "{:?}", diagnostics.reported());
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_identifiers_and_operators() {
    assert_eq!(kinds("class Foo < Bar { init() {} }"),
               vec![TokenKind::Class,
                    TokenKind::Identifier("Foo".into()),
                    TokenKind::Less,
                    TokenKind::Identifier("Bar".into()),
                    TokenKind::LBrace,
                    TokenKind::Identifier("init".into()),
                    TokenKind::LParen,
                    TokenKind::RParen,
                    TokenKind::LBrace,
                    TokenKind::RBrace,
                    TokenKind::RBrace,
                    TokenKind::Eof]);

    assert_eq!(kinds("a += 1 <= 2 != !b"),
               vec![TokenKind::Identifier("a".into()),
                    TokenKind::PlusAssign,
                    TokenKind::Number(1.0),
                    TokenKind::LessEqual,
                    TokenKind::Number(2.0),
                    TokenKind::BangEqual,
                    TokenKind::Bang,
                    TokenKind::Identifier("b".into()),
                    TokenKind::Eof]);
}

#[test]
fn keyword_prefixes_are_identifiers() {
    assert_eq!(kinds("classy format inside"),
               vec![TokenKind::Identifier("classy".into()),
                    TokenKind::Identifier("format".into()),
                    TokenKind::Identifier("inside".into()),
                    TokenKind::Eof]);
}

#[test]
fn string_flavours() {
    assert_eq!(kinds(r#""a ${b}" 'c\td' s"frozen""#),
               vec![TokenKind::Str("a ${b}".into()),
                    TokenKind::RawStr("c\td".into()),
                    TokenKind::StaticStr("frozen".into()),
                    TokenKind::Eof]);
}

#[test]
fn quotes_inside_interpolation_do_not_close_the_string() {
    assert_eq!(kinds(r#""v: ${m["k"]}""#),
               vec![TokenKind::Str(r#"v: ${m["k"]}"#.into()), TokenKind::Eof]);
}

#[test]
fn comments_are_skipped_and_lines_counted() {
    let source = indoc! {"
        // line comment
        var a; /* block
        comment */ print a;
    "};
    let (tokens, diagnostics) = tokens(source);
    assert!(!diagnostics.had_error());
    let lines: Vec<(TokenKind, usize)> = tokens.into_iter().map(|t| (t.kind, t.line)).collect();
    assert_eq!(lines,
               vec![(TokenKind::Var, 2),
                    (TokenKind::Identifier("a".into()), 2),
                    (TokenKind::Semicolon, 2),
                    (TokenKind::Print, 3),
                    (TokenKind::Identifier("a".into()), 3),
                    (TokenKind::Semicolon, 3),
                    (TokenKind::Eof, 4)]);
}

#[test]
fn line_marker_and_end_marker() {
    assert_eq!(kinds("\n\n__LINE__ __END__ this is ignored ~~~"),
               vec![TokenKind::Number(3.0), TokenKind::Eof]);
}

#[test]
fn strings_are_stamped_with_their_first_line() {
    let (tokens, _) = tokens("\"one\ntwo\" x");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].kind, TokenKind::Identifier("x".into()));
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn bad_characters_are_reported_and_scanning_continues() {
    let (tokens, diagnostics) = tokens("var # x;");
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds,
               vec![TokenKind::Var,
                    TokenKind::Identifier("x".into()),
                    TokenKind::Semicolon,
                    TokenKind::Eof]);
    assert_eq!(diagnostics.reported().len(), 1);
    assert_eq!(diagnostics.reported()[0].to_string(),
               "Error on line 1 at '#': Unexpected character.");
}

#[test]
fn unterminated_string_is_reported() {
    let (_, diagnostics) = tokens("print \"never closed;");
    assert_eq!(diagnostics.reported()[0].to_string(),
               "Error on line 1: Unterminated string starting on line 1.");
}

#[test]
fn tokens_display_for_diagnostics() {
    let (tokens, _) = tokens("foo");
    assert_eq!(tokens[0].to_string(), "'foo'");
    assert_eq!(tokens[1].to_string(), "end");
}
