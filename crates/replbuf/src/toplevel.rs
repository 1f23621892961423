//! Top-level construct adapter.
//!
//! Turns the ready unit of a [`Buffer`] into a syntax-tree node. Each entry
//! point wraps the unit in the smallest scaffold that makes it a complete
//! source file, parses that file, and pulls the node back out of the fixed
//! position the scaffold puts it in.
//!
//! The declaration entry points expect the caller to have dispatched on
//! [`Buffer::first_token`]; calling one with a unit of another kind is a
//! programming error and panics. [`TopLevelParser::parse_ready`] does the
//! dispatch itself.

use alloc::{format, string::String, vec::Vec};

use tracing::debug;

use crate::{
    Buffer, ParseError, ParseOptions,
    syntax::{self, Decl, File, FuncDecl, GenDecl, ImportSpec, Spec, Stmt, TypeSpec, ValueSpec},
    token::TokenKind,
};

/// A parsed ready unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    Imports(Vec<ImportSpec>),
    Func(FuncDecl),
    Type(TypeSpec),
    /// A `var` or `const` spec, per `keyword`.
    Value {
        keyword: TokenKind,
        spec: ValueSpec,
    },
    Stmt(Stmt),
}

/// Parses ready units with fixed [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct TopLevelParser {
    options: ParseOptions,
}

impl TopLevelParser {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses the unit as whatever its first token announces: a
    /// declaration for `import`, `func`, `type`, `var` and `const`, a
    /// statement otherwise.
    ///
    /// # Errors
    ///
    /// See the individual entry points.
    ///
    /// # Panics
    ///
    /// Panics if the buffer holds no ready unit.
    pub fn parse_ready(&self, buf: &Buffer) -> Result<Construct, ParseError> {
        let first = buf.first_token();
        debug!(%first, len = buf.as_str().len(), "parsing ready unit");
        match first {
            TokenKind::Import => self.parse_imports(buf).map(Construct::Imports),
            TokenKind::Func => self.parse_func_decl(buf).map(Construct::Func),
            TokenKind::Type => self.parse_type_spec(buf).map(Construct::Type),
            TokenKind::Var | TokenKind::Const => {
                let spec = self.parse_value_spec(buf)?;
                Ok(Construct::Value {
                    keyword: first,
                    spec,
                })
            }
            _ => self.parse_stmt(buf).map(Construct::Stmt),
        }
    }

    /// Parses an `import` declaration into its specs, in source order.
    ///
    /// # Errors
    ///
    /// [`ParseError::Syntax`] when the unit is not a valid declaration.
    ///
    /// # Panics
    ///
    /// Panics unless the unit starts with `import`.
    pub fn parse_imports(&self, buf: &Buffer) -> Result<Vec<ImportSpec>, ParseError> {
        let decl = self.parse_gen_decl(buf, &[TokenKind::Import])?;
        Ok(decl
            .specs
            .into_iter()
            .map(|spec| match spec {
                Spec::Import(import) => import,
                other => unreachable!("non-import spec in import declaration: {other:?}"),
            })
            .collect())
    }

    /// Parses a function or method declaration.
    ///
    /// # Errors
    ///
    /// [`ParseError::Syntax`] when the unit is not a valid declaration.
    ///
    /// # Panics
    ///
    /// Panics unless the unit starts with `func`.
    pub fn parse_func_decl(&self, buf: &Buffer) -> Result<FuncDecl, ParseError> {
        let file = self.parse_decl_unit(buf, &[TokenKind::Func])?;
        match single_decl(file) {
            Decl::Func(func) => Ok(func),
            other => unreachable!("expected a function declaration, got {other:?}"),
        }
    }

    /// Parses a `type` declaration and returns its first spec.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] when the unit is not a valid declaration.
    /// - [`ParseError::Missing`] for an empty group such as `type ()`.
    ///
    /// # Panics
    ///
    /// Panics unless the unit starts with `type`.
    pub fn parse_type_spec(&self, buf: &Buffer) -> Result<TypeSpec, ParseError> {
        let decl = self.parse_gen_decl(buf, &[TokenKind::Type])?;
        match first_spec(decl, "type spec")? {
            Spec::Type(spec) => Ok(spec),
            other => unreachable!("non-type spec in type declaration: {other:?}"),
        }
    }

    /// Parses a `var` or `const` declaration and returns its first spec.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] when the unit is not a valid declaration.
    /// - [`ParseError::Missing`] for an empty group such as `var ()`.
    ///
    /// # Panics
    ///
    /// Panics unless the unit starts with `var` or `const`.
    pub fn parse_value_spec(&self, buf: &Buffer) -> Result<ValueSpec, ParseError> {
        let decl = self.parse_gen_decl(buf, &[TokenKind::Var, TokenKind::Const])?;
        match first_spec(decl, "value spec")? {
            Spec::Value(spec) => Ok(spec),
            other => unreachable!("non-value spec in value declaration: {other:?}"),
        }
    }

    /// Parses the unit as the body of a function and returns its first
    /// statement. Works for any unit, whatever its first token.
    ///
    /// # Errors
    ///
    /// [`ParseError::Syntax`] when the unit is not a valid statement.
    ///
    /// # Panics
    ///
    /// Panics if the buffer holds no ready unit.
    pub fn parse_stmt(&self, buf: &Buffer) -> Result<Stmt, ParseError> {
        assert!(buf.is_ready(), "parse_stmt called without a ready unit");
        // The newline keeps a trailing line comment from swallowing the `}`.
        let src = format!(
            "package {}\nfunc f(){{{}\n}}",
            self.options.package,
            buf.as_str()
        );
        debug!(len = src.len(), "parsing statement");
        let file = syntax::parse_file(&src, &self.options)?;
        match single_decl(file) {
            Decl::Func(FuncDecl {
                body: Some(body), ..
            }) => match body.stmts.into_iter().next() {
                Some(stmt) => Ok(stmt),
                None => unreachable!("ready unit produced no statement"),
            },
            other => unreachable!("expected the statement scaffold, got {other:?}"),
        }
    }

    fn parse_gen_decl(&self, buf: &Buffer, keywords: &[TokenKind]) -> Result<GenDecl, ParseError> {
        let file = self.parse_decl_unit(buf, keywords)?;
        match single_decl(file) {
            Decl::Gen(decl) if keywords.contains(&decl.keyword) => Ok(decl),
            other => unreachable!("expected a {keywords:?} declaration, got {other:?}"),
        }
    }

    fn parse_decl_unit(&self, buf: &Buffer, keywords: &[TokenKind]) -> Result<File, ParseError> {
        let first = buf.first_token();
        assert!(
            buf.is_ready() && keywords.contains(&first),
            "expected a ready unit starting with one of {keywords:?}, found {first}"
        );
        let src = scaffold_decl(&self.options.package, buf.as_str());
        debug!(%first, len = src.len(), "parsing declaration");
        Ok(syntax::parse_file(&src, &self.options)?)
    }
}

fn scaffold_decl(package: &str, unit: &str) -> String {
    format!("package {package}\n{unit}")
}

/// The one declaration a scaffolded unit produces.
fn single_decl(file: File) -> Decl {
    let mut decls = file.decls.into_iter();
    match (decls.next(), decls.next()) {
        (Some(decl), None) => decl,
        (first, second) => {
            unreachable!("scaffold produced {first:?} followed by {second:?}")
        }
    }
}

fn first_spec(decl: GenDecl, what: &'static str) -> Result<Spec, ParseError> {
    let keyword = decl.keyword;
    decl.specs
        .into_iter()
        .next()
        .ok_or(ParseError::Missing { keyword, what })
}

/// [`TopLevelParser::parse_imports`] with default options.
///
/// ```rust
/// use replbuf::{Buffer, parse_imports};
///
/// let mut buf = Buffer::new();
/// buf.append("import woop \"abc\"\n").unwrap();
/// let specs = parse_imports(&buf).unwrap();
/// assert_eq!(specs[0].name.as_ref().unwrap().name, "woop");
/// assert_eq!(specs[0].path.value, "\"abc\"");
/// ```
///
/// # Errors
///
/// See [`TopLevelParser::parse_imports`].
pub fn parse_imports(buf: &Buffer) -> Result<Vec<ImportSpec>, ParseError> {
    TopLevelParser::default().parse_imports(buf)
}

/// [`TopLevelParser::parse_func_decl`] with default options.
///
/// # Errors
///
/// See [`TopLevelParser::parse_func_decl`].
pub fn parse_func_decl(buf: &Buffer) -> Result<FuncDecl, ParseError> {
    TopLevelParser::default().parse_func_decl(buf)
}

/// [`TopLevelParser::parse_type_spec`] with default options.
///
/// # Errors
///
/// See [`TopLevelParser::parse_type_spec`].
pub fn parse_type_spec(buf: &Buffer) -> Result<TypeSpec, ParseError> {
    TopLevelParser::default().parse_type_spec(buf)
}

/// [`TopLevelParser::parse_value_spec`] with default options.
///
/// # Errors
///
/// See [`TopLevelParser::parse_value_spec`].
pub fn parse_value_spec(buf: &Buffer) -> Result<ValueSpec, ParseError> {
    TopLevelParser::default().parse_value_spec(buf)
}

/// [`TopLevelParser::parse_stmt`] with default options.
///
/// ```rust
/// use replbuf::{Buffer, parse_stmt, syntax::Stmt};
///
/// let mut buf = Buffer::new();
/// buf.append("x := 123\n").unwrap();
/// assert!(matches!(parse_stmt(&buf).unwrap(), Stmt::Assign { .. }));
/// ```
///
/// # Errors
///
/// See [`TopLevelParser::parse_stmt`].
pub fn parse_stmt(buf: &Buffer) -> Result<Stmt, ParseError> {
    TopLevelParser::default().parse_stmt(buf)
}

/// [`TopLevelParser::parse_ready`] with default options.
///
/// # Errors
///
/// See [`TopLevelParser::parse_ready`].
pub fn parse_ready(buf: &Buffer) -> Result<Construct, ParseError> {
    TopLevelParser::default().parse_ready(buf)
}
