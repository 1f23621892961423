use alloc::string::String;

use thiserror::Error;

use crate::syntax::SyntaxError;
use crate::token::TokenKind;

/// Errors reported by [`Buffer::append`](crate::Buffer::append) and
/// [`Buffer::reset`](crate::Buffer::reset).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BufferError {
    /// The pending text holds a token the scanner cannot classify. The
    /// buffer stays poisoned until it is reset.
    #[error("illegal token {literal:?} at offset {offset}")]
    IllegalToken { offset: usize, literal: String },

    /// A complete unit was found but more text follows it. Only the first
    /// unit is ready; the rest stays pending and is re-fed on reset.
    #[error("additional lines ignored: {consumed} bytes consumed, {remaining} bytes pending")]
    ExtraInput { consumed: usize, remaining: usize },

    /// Appending would grow the buffer past its configured limit.
    #[error("input too large: {len} bytes exceeds the limit of {limit}")]
    TooLarge { len: usize, limit: usize },
}

/// Errors reported by the top-level construct parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The declaration was well formed but empty, as in `type ()`.
    #[error("no {what} in {keyword} declaration")]
    Missing {
        keyword: TokenKind,
        what: &'static str,
    },
}
