//! Scanner: turns Go source text into `(offset, kind, literal)` tokens.
//!
//! What it does
//! - Classifies every token of the Go lexical grammar into a [`TokenKind`].
//! - Inserts semicolons the way the Go grammar prescribes: after an
//!   identifier, a basic literal, one of `break continue fallthrough return`,
//!   or one of `++ -- ) ] }`, the next newline (or end of input) becomes a
//!   [`TokenKind::Semicolon`] token whose literal is `"\n"`.
//! - Skips comments. A line comment leaves a pending semicolon to the
//!   newline ending it; a block comment spanning a newline becomes the
//!   semicolon token itself.
//!
//! Invariants
//! - `offset..offset + len` is the exact source span of a token. Semicolons
//!   inserted at end of input have `len == 0`; at a newline `len == 1`.
//! - An unknown character yields [`TokenKind::Illegal`], never [`TokenKind::Eof`].
//! - A raw string or block comment still open at end of input consumes the
//!   rest of the text and suppresses the end-of-input semicolon, since the
//!   statement cannot end inside an open literal.

use bstr::decode_utf8;

use crate::token::TokenKind;

#[cfg(test)]
mod tests;

/// One scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Byte offset of the token in the scanned text.
    pub offset: usize,
    pub kind: TokenKind,
    /// Source text of the token, or `"\n"` for an inserted semicolon.
    pub lit: &'src str,
    /// Number of source bytes covered by the token.
    pub len: usize,
}

impl Token<'_> {
    /// Byte offset one past the end of the token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether this is a semicolon the scanner inserted at a line end.
    #[must_use]
    pub fn is_implicit_semi(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.lit == "\n"
    }
}

/// Go tokenizer over a complete text.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    src: &'src str,
    offset: usize,
    insert_semi: bool,
    open_at_eof: bool,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            offset: 0,
            insert_semi: false,
            open_at_eof: false,
        }
    }

    /// Scans the next token. After the end of input is reached every call
    /// returns [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace();
            let start = self.offset;
            let Some(ch) = self.peek() else {
                return self.end_of_input(start);
            };

            if ch == '\n' {
                // only reachable while a semicolon is owed
                self.insert_semi = false;
                self.offset += 1;
                return Token {
                    offset: start,
                    kind: TokenKind::Semicolon,
                    lit: "\n",
                    len: 1,
                };
            }

            if ch == '/' {
                match self.byte_at(start + 1) {
                    Some(b'/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some(b'*') => {
                        let spans_line = self.skip_block_comment();
                        if self.insert_semi && spans_line && !self.open_at_eof {
                            self.insert_semi = false;
                            return Token {
                                offset: start,
                                kind: TokenKind::Semicolon,
                                lit: "\n",
                                len: self.offset - start,
                            };
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            let kind = self.scan_token(ch);
            if kind != TokenKind::Illegal {
                self.insert_semi = needs_semi(kind);
            }
            return Token {
                offset: start,
                kind,
                lit: &self.src[start..self.offset],
                len: self.offset - start,
            };
        }
    }

    fn end_of_input(&mut self, at: usize) -> Token<'src> {
        if self.insert_semi && !self.open_at_eof {
            self.insert_semi = false;
            return Token {
                offset: at,
                kind: TokenKind::Semicolon,
                lit: "\n",
                len: 0,
            };
        }
        Token {
            offset: at,
            kind: TokenKind::Eof,
            lit: "",
            len: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        decode_utf8(&self.src.as_bytes()[self.offset..]).0
    }

    fn byte(&self) -> Option<u8> {
        self.byte_at(self.offset)
    }

    fn byte_at(&self, at: usize) -> Option<u8> {
        self.src.as_bytes().get(at).copied()
    }

    fn skip_char(&mut self) {
        let (_, size) = decode_utf8(&self.src.as_bytes()[self.offset..]);
        self.offset += size;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.byte() {
            match b {
                b' ' | b'\t' | b'\r' => self.offset += 1,
                b'\n' if !self.insert_semi => self.offset += 1,
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let rest = &self.src[self.offset..];
        self.offset += rest.find('\n').unwrap_or(rest.len());
    }

    /// Skips a `/* */` comment and reports whether it contained a newline.
    fn skip_block_comment(&mut self) -> bool {
        self.offset += 2;
        let rest = &self.src[self.offset..];
        if let Some(end) = rest.find("*/") {
            self.offset += end + 2;
            rest[..end].contains('\n')
        } else {
            self.offset = self.src.len();
            self.open_at_eof = true;
            rest.contains('\n')
        }
    }

    fn scan_token(&mut self, ch: char) -> TokenKind {
        use TokenKind::*;

        if is_letter(ch) {
            return self.scan_identifier();
        }
        if ch.is_ascii_digit()
            || (ch == '.' && self.byte_at(self.offset + 1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.scan_number();
        }

        self.offset += ch.len_utf8();
        match ch {
            '"' => {
                self.scan_quoted(b'"');
                String
            }
            '`' => {
                self.scan_raw_string();
                String
            }
            '\'' => {
                self.scan_quoted(b'\'');
                Char
            }
            ':' => self.switch2(Colon, Define),
            '.' => {
                if self.byte() == Some(b'.') && self.byte_at(self.offset + 1) == Some(b'.') {
                    self.offset += 2;
                    Ellipsis
                } else {
                    Period
                }
            }
            ',' => Comma,
            ';' => Semicolon,
            '(' => Lparen,
            ')' => Rparen,
            '[' => Lbrack,
            ']' => Rbrack,
            '{' => Lbrace,
            '}' => Rbrace,
            '~' => Tilde,
            '+' => self.switch3(Add, AddAssign, b'+', Inc),
            '-' => self.switch3(Sub, SubAssign, b'-', Dec),
            '*' => self.switch2(Mul, MulAssign),
            '/' => self.switch2(Quo, QuoAssign),
            '%' => self.switch2(Rem, RemAssign),
            '^' => self.switch2(Xor, XorAssign),
            '<' => {
                if self.byte() == Some(b'-') {
                    self.offset += 1;
                    Arrow
                } else {
                    self.switch4(Lss, Leq, b'<', Shl, ShlAssign)
                }
            }
            '>' => self.switch4(Gtr, Geq, b'>', Shr, ShrAssign),
            '=' => self.switch2(Assign, Eql),
            '!' => self.switch2(Not, Neq),
            '&' => {
                if self.byte() == Some(b'^') {
                    self.offset += 1;
                    self.switch2(AndNot, AndNotAssign)
                } else {
                    self.switch3(And, AndAssign, b'&', Land)
                }
            }
            '|' => self.switch3(Or, OrAssign, b'|', Lor),
            _ => Illegal,
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.offset;
        while let Some(ch) = self.peek() {
            if !(is_letter(ch) || ch.is_ascii_digit()) {
                break;
            }
            self.offset += ch.len_utf8();
        }
        TokenKind::lookup(&self.src[start..self.offset])
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let mut hex = false;

        if self.byte() != Some(b'.') {
            if self.byte() == Some(b'0') {
                self.offset += 1;
                match self.byte().map(|b| b.to_ascii_lowercase()) {
                    Some(b'x') => {
                        self.offset += 1;
                        hex = true;
                    }
                    Some(b'o' | b'b') => self.offset += 1,
                    _ => {}
                }
            }
            self.skip_digits(hex);
        }

        if self.byte() == Some(b'.') {
            kind = TokenKind::Float;
            self.offset += 1;
            self.skip_digits(hex);
        }

        if let Some(e) = self.byte().map(|b| b.to_ascii_lowercase()) {
            if (e == b'e' && !hex) || (e == b'p' && hex) {
                kind = TokenKind::Float;
                self.offset += 1;
                if matches!(self.byte(), Some(b'+' | b'-')) {
                    self.offset += 1;
                }
                self.skip_digits(false);
            }
        }

        if self.byte() == Some(b'i') {
            kind = TokenKind::Imag;
            self.offset += 1;
        }
        kind
    }

    fn skip_digits(&mut self, hex: bool) {
        while let Some(b) = self.byte() {
            if b == b'_' || b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Interpreted strings and rune literals; both end at the closing quote
    /// or, unterminated, before the end of the line.
    fn scan_quoted(&mut self, quote: u8) {
        loop {
            match self.byte() {
                None | Some(b'\n') => return,
                Some(b) if b == quote => {
                    self.offset += 1;
                    return;
                }
                Some(b'\\') => {
                    self.offset += 1;
                    if matches!(self.byte(), None | Some(b'\n')) {
                        return;
                    }
                    self.skip_char();
                }
                Some(_) => self.skip_char(),
            }
        }
    }

    fn scan_raw_string(&mut self) {
        let rest = &self.src[self.offset..];
        if let Some(close) = rest.find('`') {
            self.offset += close + 1;
        } else {
            self.offset = self.src.len();
            self.open_at_eof = true;
        }
    }

    fn switch2(&mut self, plain: TokenKind, with_assign: TokenKind) -> TokenKind {
        if self.byte() == Some(b'=') {
            self.offset += 1;
            with_assign
        } else {
            plain
        }
    }

    fn switch3(
        &mut self,
        plain: TokenKind,
        with_assign: TokenKind,
        repeat: u8,
        doubled: TokenKind,
    ) -> TokenKind {
        if self.byte() == Some(b'=') {
            self.offset += 1;
            return with_assign;
        }
        if self.byte() == Some(repeat) {
            self.offset += 1;
            return doubled;
        }
        plain
    }

    fn switch4(
        &mut self,
        plain: TokenKind,
        with_assign: TokenKind,
        repeat: u8,
        doubled: TokenKind,
        doubled_assign: TokenKind,
    ) -> TokenKind {
        if self.byte() == Some(b'=') {
            self.offset += 1;
            return with_assign;
        }
        if self.byte() == Some(repeat) {
            self.offset += 1;
            return self.switch2(doubled, doubled_assign);
        }
        plain
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

// Letter-number characters such as `Ⅻ` are alphabetic but not letters.
// Only ASCII digits continue an identifier, so `x²` and `x٣` are rejected.
fn is_letter(ch: char) -> bool {
    ch == '_' || (ch.is_alphabetic() && !ch.is_numeric())
}

fn needs_semi(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Ident
            | Int
            | Float
            | Imag
            | Char
            | String
            | Break
            | Continue
            | Fallthrough
            | Return
            | Inc
            | Dec
            | Rparen
            | Rbrack
            | Rbrace
    )
}
