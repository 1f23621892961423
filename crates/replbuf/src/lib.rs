//! Incremental input completeness for a Go REPL.
//!
//! A [`Buffer`] collects the lines a user types and decides, purely from
//! the token stream, when they form one complete top-level unit: a
//! declaration, an import, or a statement. The [`toplevel`] adapter then
//! parses the ready unit into a [`syntax`] tree node.
//!
//! ```rust
//! use replbuf::{Buffer, Construct, TokenKind, parse_ready};
//!
//! let mut buf = Buffer::new();
//! buf.append("type T struct {\n").unwrap();
//! assert!(!buf.is_ready());
//! buf.append("\tX int\n}\n").unwrap();
//! assert_eq!(buf.first_token(), TokenKind::Type);
//!
//! let Construct::Type(spec) = parse_ready(&buf).unwrap() else {
//!     panic!("expected a type spec");
//! };
//! assert_eq!(spec.name.name, "T");
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod error;
mod options;
pub mod scanner;
pub mod syntax;
pub mod token;
pub mod toplevel;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use error::{BufferError, ParseError};
pub use options::{BufferOptions, ParseOptions};
pub use scanner::{Scanner, Token};
pub use syntax::SyntaxError;
pub use token::TokenKind;
pub use toplevel::{
    Construct, TopLevelParser, parse_func_decl, parse_imports, parse_ready, parse_stmt,
    parse_type_spec, parse_value_spec,
};
