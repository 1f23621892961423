use alloc::vec::Vec;

use super::*;
use crate::token::TokenKind::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    Scanner::new(src).map(|t| t.kind).collect()
}

#[test]
fn newline_after_identifier_becomes_semicolon() {
    let tokens: Vec<_> = Scanner::new("what\n").collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, Ident);
    assert_eq!(tokens[0].lit, "what");
    assert_eq!(tokens[1].kind, Semicolon);
    assert_eq!((tokens[1].offset, tokens[1].len), (4, 1));
    assert!(tokens[1].is_implicit_semi());
}

#[test]
fn end_of_input_semicolon_covers_no_bytes() {
    let tokens: Vec<_> = Scanner::new("x := 123").collect();
    let last = tokens.last().unwrap();
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        [Ident, Define, Int, Semicolon]
    );
    assert_eq!((last.offset, last.len, last.lit), (8, 0, "\n"));
}

#[test]
fn no_semicolon_after_open_brace() {
    assert_eq!(kinds("func F() {\n"), [Func, Ident, Lparen, Rparen, Lbrace]);
}

#[test]
fn explicit_semicolon_keeps_its_literal() {
    let tokens: Vec<_> = Scanner::new("a; b").collect();
    assert_eq!(tokens[1].kind, Semicolon);
    assert_eq!(tokens[1].lit, ";");
    assert!(!tokens[1].is_implicit_semi());
}

#[test]
fn leading_comment_is_skipped() {
    let tokens: Vec<_> = Scanner::new("// abc\nmeep").collect();
    assert_eq!(tokens[0].kind, Ident);
    assert_eq!(tokens[0].offset, 7);
    assert_eq!(tokens.len(), 2);
}

#[test]
fn line_comment_defers_semicolon_to_its_newline() {
    let tokens: Vec<_> = Scanner::new("x // note\ny").collect();
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        [Ident, Semicolon, Ident, Semicolon]
    );
    assert_eq!((tokens[1].offset, tokens[1].len), (9, 1));
}

#[test]
fn multiline_block_comment_acts_as_newline() {
    let src = "x /* a\nb */ y";
    let tokens: Vec<_> = Scanner::new(src).collect();
    assert_eq!(tokens[1].kind, Semicolon);
    assert_eq!(&src[tokens[1].offset..tokens[1].end()], "/* a\nb */");
    assert_eq!(tokens[2].lit, "y");
}

#[test]
fn single_line_block_comment_is_whitespace() {
    assert_eq!(kinds("a /* b */ + c"), [Ident, Add, Ident, Semicolon]);
}

#[test]
fn unterminated_raw_string_suppresses_final_semicolon() {
    let tokens: Vec<_> = Scanner::new("`abc").collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, String);
    assert_eq!(tokens[0].lit, "`abc");
}

#[test]
fn raw_string_spans_lines() {
    let tokens: Vec<_> = Scanner::new("x := `a\nb`").collect();
    assert_eq!(tokens[2].lit, "`a\nb`");
    assert_eq!(tokens[3].kind, Semicolon);
}

#[test]
fn unterminated_block_comment_suppresses_final_semicolon() {
    assert_eq!(kinds("x /* abc"), [Ident]);
    assert_eq!(kinds("x /* abc\ndef"), [Ident]);
}

#[test]
fn unknown_character_is_illegal() {
    let tokens: Vec<_> = Scanner::new("a @ b").collect();
    assert_eq!(tokens[1].kind, Illegal);
    assert_eq!(tokens[1].lit, "@");
    assert_eq!(tokens[1].offset, 2);
}

#[test]
fn operators() {
    assert_eq!(
        kinds("a <<= b &^ c <- d ... e++ f &^= g != h >= i || j && k := l"),
        [
            Ident, ShlAssign, Ident, AndNot, Ident, Arrow, Ident, Ellipsis, Ident, Inc, Ident,
            AndNotAssign, Ident, Neq, Ident, Geq, Ident, Lor, Ident, Land, Ident, Define, Ident,
            Semicolon
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("0x1F 1.5e3 .5 3i 0b101 1_000 0x1p-2 07"),
        [Int, Float, Float, Imag, Int, Int, Float, Int, Semicolon]
    );
}

#[test]
fn interpreted_string_with_escapes() {
    let tokens: Vec<_> = Scanner::new(r#""a\"b" 'x' '\n'"#).collect();
    assert_eq!(tokens[0].lit, r#""a\"b""#);
    assert_eq!(tokens[1].kind, Char);
    assert_eq!(tokens[2].lit, r"'\n'");
}

#[test]
fn unicode_identifiers() {
    let tokens: Vec<_> = Scanner::new("héllo := 日本").collect();
    assert_eq!(tokens[0].lit, "héllo");
    assert_eq!(tokens[2].lit, "日本");
}

#[rstest::rstest]
#[case::superscript("x²", "²")]
#[case::letter_number("Ⅻ", "Ⅻ")]
fn non_letter_characters_are_illegal(#[case] src: &str, #[case] illegal: &str) {
    let token = Scanner::new(src).find(|t| t.kind == Illegal).unwrap();
    assert_eq!(token.lit, illegal);
    assert_eq!(token.end(), src.len());
}

#[test]
fn ascii_digits_continue_identifiers() {
    let tokens: Vec<_> = Scanner::new("x1_2y").collect();
    assert_eq!((tokens[0].kind, tokens[0].lit), (Ident, "x1_2y"));
}

#[test]
fn keywords_request_semicolons_selectively() {
    assert_eq!(kinds("return\n"), [Return, Semicolon]);
    assert_eq!(kinds("import\n"), [Import]);
    assert_eq!(kinds("x++\n"), [Ident, Inc, Semicolon]);
}

#[test]
fn eof_is_sticky() {
    let mut scanner = Scanner::new("x");
    assert_eq!(scanner.next_token().kind, Ident);
    assert_eq!(scanner.next_token().kind, Semicolon);
    assert_eq!(scanner.next_token().kind, Eof);
    assert_eq!(scanner.next_token().kind, Eof);
}

#[quickcheck_macros::quickcheck]
fn spans_are_ordered_and_match_literals(src: alloc::string::String) -> bool {
    let mut end = 0;
    for token in Scanner::new(&src) {
        if token.offset < end || token.end() > src.len() {
            return false;
        }
        if !token.is_implicit_semi() && src[token.offset..token.end()] != *token.lit {
            return false;
        }
        end = token.end();
    }
    true
}
