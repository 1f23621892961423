//! Token classification for Go source text.

use core::fmt;

/// The set of lexical token classes of the Go language.
///
/// [`TokenKind::Illegal`] doubles as the "unset" value reported by
/// [`Buffer::first_token`](crate::Buffer::first_token) before anything has
/// been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    #[default]
    Illegal,
    Eof,
    Comment,

    // Literals
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // Operators and delimiters
    Add,
    Sub,
    Mul,
    Quo,
    Rem,

    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,

    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,

    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,

    Land,
    Lor,
    Arrow,
    Inc,
    Dec,

    Eql,
    Lss,
    Gtr,
    Assign,
    Not,

    Neq,
    Leq,
    Geq,
    Define,
    Ellipsis,

    Lparen,
    Lbrack,
    Lbrace,
    Comma,
    Period,

    Rparen,
    Rbrack,
    Rbrace,
    Semicolon,
    Colon,
    Tilde,

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,

    Default,
    Defer,
    Else,
    Fallthrough,
    For,

    Func,
    Go,
    Goto,
    If,
    Import,

    Interface,
    Map,
    Package,
    Range,
    Return,

    Select,
    Struct,
    Switch,
    Type,
    Var,
}

/// Precedence of the lowest binary operator.
pub const LOWEST_PREC: u8 = 0;

const KEYWORDS: [(&str, TokenKind); 25] = [
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("chan", TokenKind::Chan),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("defer", TokenKind::Defer),
    ("else", TokenKind::Else),
    ("fallthrough", TokenKind::Fallthrough),
    ("for", TokenKind::For),
    ("func", TokenKind::Func),
    ("go", TokenKind::Go),
    ("goto", TokenKind::Goto),
    ("if", TokenKind::If),
    ("import", TokenKind::Import),
    ("interface", TokenKind::Interface),
    ("map", TokenKind::Map),
    ("package", TokenKind::Package),
    ("range", TokenKind::Range),
    ("return", TokenKind::Return),
    ("select", TokenKind::Select),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("type", TokenKind::Type),
    ("var", TokenKind::Var),
];

impl TokenKind {
    /// Maps an identifier to its keyword kind, or [`TokenKind::Ident`].
    #[must_use]
    pub fn lookup(ident: &str) -> TokenKind {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == ident)
            .map_or(TokenKind::Ident, |(_, kind)| *kind)
    }

    /// Binary operator precedence; [`LOWEST_PREC`] for anything else.
    #[must_use]
    pub fn precedence(self) -> u8 {
        use TokenKind::*;
        match self {
            Lor => 1,
            Land => 2,
            Eql | Neq | Lss | Leq | Gtr | Geq => 3,
            Add | Sub | Or | Xor => 4,
            Mul | Quo | Rem | Shl | Shr | And | AndNot => 5,
            _ => LOWEST_PREC,
        }
    }

    /// Identifiers and basic literals.
    #[must_use]
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(self, Ident | Int | Float | Imag | Char | String)
    }

    #[must_use]
    pub fn is_operator(self) -> bool {
        (self as u8) >= (TokenKind::Add as u8) && (self as u8) <= (TokenKind::Tilde as u8)
    }

    #[must_use]
    pub fn is_keyword(self) -> bool {
        (self as u8) >= (TokenKind::Break as u8)
    }

    /// Assignment operators accepted in an assignment statement.
    #[must_use]
    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | Define
                | AddAssign
                | SubAssign
                | MulAssign
                | QuoAssign
                | RemAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
                | AndNotAssign
        )
    }

    /// Go spelling of the token class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Comment => "COMMENT",
            Ident => "IDENT",
            Int => "INT",
            Float => "FLOAT",
            Imag => "IMAG",
            Char => "CHAR",
            String => "STRING",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Shl => "<<",
            Shr => ">>",
            AndNot => "&^",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            QuoAssign => "/=",
            RemAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            AndNotAssign => "&^=",
            Land => "&&",
            Lor => "||",
            Arrow => "<-",
            Inc => "++",
            Dec => "--",
            Eql => "==",
            Lss => "<",
            Gtr => ">",
            Assign => "=",
            Not => "!",
            Neq => "!=",
            Leq => "<=",
            Geq => ">=",
            Define => ":=",
            Ellipsis => "...",
            Lparen => "(",
            Lbrack => "[",
            Lbrace => "{",
            Comma => ",",
            Period => ".",
            Rparen => ")",
            Rbrack => "]",
            Rbrace => "}",
            Semicolon => ";",
            Colon => ":",
            Tilde => "~",
            Break => "break",
            Case => "case",
            Chan => "chan",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Defer => "defer",
            Else => "else",
            Fallthrough => "fallthrough",
            For => "for",
            Func => "func",
            Go => "go",
            Goto => "goto",
            If => "if",
            Import => "import",
            Interface => "interface",
            Map => "map",
            Package => "package",
            Range => "range",
            Return => "return",
            Select => "select",
            Struct => "struct",
            Switch => "switch",
            Type => "type",
            Var => "var",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
