//! Syntax-tree builder for Go source text.
//!
//! [`parse_file`] turns a complete source file into a [`File`]. The builder
//! covers the declarations and statements a REPL session produces; type
//! parameters are not supported. Parsing stops at the first error, which is
//! reported with a Go-style message and a 1-based line and column.

mod ast;
mod parser;

use alloc::string::String;

pub use ast::*;
use thiserror::Error;

use crate::ParseOptions;

/// A syntax error at a position in the parsed text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{filename}:{line}:{column}: {msg}")]
pub struct SyntaxError {
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub msg: String,
}

/// Parses a complete Go source file.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] encountered.
///
/// ```rust
/// use replbuf::{ParseOptions, syntax::{Decl, parse_file}};
///
/// let file = parse_file("package p\nfunc F() {}\n", &ParseOptions::default()).unwrap();
/// assert_eq!(file.package.name, "p");
/// assert!(matches!(&file.decls[0], Decl::Func(f) if f.name.name == "F"));
/// ```
pub fn parse_file(src: &str, options: &ParseOptions) -> Result<File, SyntaxError> {
    parser::Parser::new(src, &options.filename).parse_file()
}

/// 1-based line and byte column of `offset` in `src`.
pub(crate) fn position(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset.min(src.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}

#[cfg(test)]
mod tests;
