//! Syntax tree for the Go subset the REPL hands to its evaluator.

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::token::TokenKind;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub package: Ident,
    /// Every import spec of the file, in source order.
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations, import declarations included.
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A basic literal: `Int`, `Float`, `Imag`, `Char` or `String`, with its
/// source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: TokenKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// An `import`, `const`, `type` or `var` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub keyword: TokenKind,
    /// Whether the specs were written in a parenthesized group.
    pub grouped: bool,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local package name, including `.` and `_`.
    pub name: Option<Ident>,
    /// The quoted import path as written.
    pub path: BasicLit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
}

impl FieldList {
    /// Number of parameters, struct fields or methods, counting each name of
    /// a grouped field separately.
    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.iter().map(|f| f.names.len().max(1)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncType {
    pub params: FieldList,
    pub results: Option<FieldList>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    FuncLit {
        ty: FuncType,
        body: BlockStmt,
    },
    Paren(Box<Expr>),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `x.(T)`, or `x.(type)` in a type switch when `ty` is `None`.
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: bool,
    },
    /// Pointer type or dereference.
    Star(Box<Expr>),
    Unary {
        op: TokenKind,
        x: Box<Expr>,
    },
    Binary {
        op: TokenKind,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// `...T` in a parameter list, or `[...]` as an array length.
    Ellipsis(Option<Box<Expr>>),
    /// Slice type when `len` is `None`.
    ArrayType {
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    StructType(FieldList),
    FuncType(FuncType),
    InterfaceType(FieldList),
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        dir: ChanDir,
        value: Box<Expr>,
    },
}

impl Expr {
    pub(crate) fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// `None` for `default`.
    pub list: Option<Vec<Expr>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    /// Send or receive statement; `None` for `default`.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(GenDecl),
    /// `implicit` when the semicolon was a newline.
    Empty {
        implicit: bool,
    },
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Expr(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    IncDec {
        x: Expr,
        op: TokenKind,
    },
    /// Assignment or short variable declaration, per `op`.
    Assign {
        lhs: Vec<Expr>,
        op: TokenKind,
        rhs: Vec<Expr>,
    },
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    /// `break`, `continue`, `goto` or `fallthrough`.
    Branch {
        op: TokenKind,
        label: Option<Ident>,
    },
    Block(BlockStmt),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: BlockStmt,
        els: Option<Box<Stmt>>,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Box<Stmt>>,
        clauses: Vec<CaseClause>,
    },
    Select(Vec<CommClause>),
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: BlockStmt,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        /// `Define`, `Assign`, or `Illegal` when there are no iteration variables.
        op: TokenKind,
        x: Expr,
        body: BlockStmt,
    },
}

impl Stmt {
    pub(crate) fn boxed(self) -> Box<Stmt> {
        Box::new(self)
    }
}
