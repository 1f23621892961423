//! Recursive-descent parser over the [`Scanner`] token stream.

use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use core::mem;

use super::{SyntaxError, ast::*, position};
use crate::scanner::{Scanner, Token};
use crate::token::{LOWEST_PREC, TokenKind as T};

type PResult<V> = Result<V, SyntaxError>;

/// Which simple statements the caller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Basic,
    LabelOk,
    RangeOk,
}

/// One entry of a parameter list before names and types are grouped.
enum Param {
    Name(Ident),
    Named(Ident, Expr),
    Type(Expr),
}

pub(crate) struct Parser<'src> {
    src: &'src str,
    filename: &'src str,
    scanner: Scanner<'src>,
    tok: Token<'src>,
    /// Below zero inside control clauses, where `T {` opens a block rather
    /// than a composite literal.
    expr_lev: i32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str, filename: &'src str) -> Self {
        let mut scanner = Scanner::new(src);
        let tok = scanner.next_token();
        Self {
            src,
            filename,
            scanner,
            tok,
            expr_lev: 0,
        }
    }

    // ------------------------------------------------------------------
    // Token helpers

    fn next(&mut self) {
        self.tok = self.scanner.next_token();
    }

    fn kind(&self) -> T {
        self.tok.kind
    }

    fn at(&self, kind: T) -> bool {
        self.tok.kind == kind
    }

    fn got(&mut self, kind: T) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn error(&self, offset: usize, msg: impl Into<String>) -> SyntaxError {
        let (line, column) = position(self.src, offset);
        SyntaxError {
            filename: self.filename.to_string(),
            line,
            column,
            msg: msg.into(),
        }
    }

    fn error_expected(&self, what: &str) -> SyntaxError {
        let found = if self.tok.is_implicit_semi() {
            "newline".to_string()
        } else if self.tok.kind.is_literal() {
            self.tok.lit.to_string()
        } else {
            format!("'{}'", self.tok.kind)
        };
        self.error(self.tok.offset, format!("expected {what}, found {found}"))
    }

    fn expect(&mut self, kind: T) -> PResult<()> {
        if !self.at(kind) {
            return Err(self.error_expected(&format!("'{kind}'")));
        }
        self.next();
        Ok(())
    }

    /// Like [`Self::expect`], but names the usual mistake when a line ends
    /// inside a list.
    fn expect_closing(&mut self, kind: T, context: &str) -> PResult<()> {
        if self.tok.is_implicit_semi() {
            return Err(self.error(
                self.tok.offset,
                format!("missing ',' before newline in {context}"),
            ));
        }
        self.expect(kind)
    }

    /// A semicolon may be omitted before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.kind() {
            T::Rparen | T::Rbrace | T::Eof => Ok(()),
            T::Semicolon => {
                self.next();
                Ok(())
            }
            _ => Err(self.error_expected("';'")),
        }
    }

    fn parse_ident(&mut self) -> PResult<Ident> {
        if !self.at(T::Ident) {
            return Err(self.error_expected("'IDENT'"));
        }
        let ident = Ident::new(self.tok.lit);
        self.next();
        Ok(ident)
    }

    fn parse_ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut list = vec![self.parse_ident()?];
        while self.got(T::Comma) {
            list.push(self.parse_ident()?);
        }
        Ok(list)
    }

    fn basic_lit(&mut self) -> BasicLit {
        let lit = BasicLit {
            kind: self.tok.kind,
            value: self.tok.lit.to_string(),
        };
        self.next();
        lit
    }

    // ------------------------------------------------------------------
    // Declarations

    pub(crate) fn parse_file(mut self) -> PResult<File> {
        self.expect(T::Package)?;
        let package = self.parse_ident()?;
        self.expect_semi()?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();
        while self.at(T::Import) {
            let decl = self.parse_gen_decl(T::Import)?;
            imports.extend(decl.specs.iter().filter_map(|spec| match spec {
                Spec::Import(import) => Some(import.clone()),
                _ => None,
            }));
            decls.push(Decl::Gen(decl));
        }
        while !self.at(T::Eof) {
            decls.push(self.parse_decl()?);
        }

        Ok(File {
            package,
            imports,
            decls,
        })
    }

    fn parse_decl(&mut self) -> PResult<Decl> {
        match self.kind() {
            kind @ (T::Const | T::Type | T::Var) => Ok(Decl::Gen(self.parse_gen_decl(kind)?)),
            T::Func => Ok(Decl::Func(self.parse_func_decl()?)),
            T::Import => Err(self.error(
                self.tok.offset,
                "imports must appear before other declarations",
            )),
            _ => Err(self.error_expected("declaration")),
        }
    }

    fn parse_gen_decl(&mut self, keyword: T) -> PResult<GenDecl> {
        self.expect(keyword)?;
        let mut specs = Vec::new();
        let grouped = self.got(T::Lparen);
        if grouped {
            while !self.at(T::Rparen) && !self.at(T::Eof) {
                specs.push(self.parse_spec(keyword, specs.len())?);
            }
            self.expect(T::Rparen)?;
            self.expect_semi()?;
        } else {
            specs.push(self.parse_spec(keyword, 0)?);
        }
        Ok(GenDecl {
            keyword,
            grouped,
            specs,
        })
    }

    fn parse_spec(&mut self, keyword: T, index: usize) -> PResult<Spec> {
        match keyword {
            T::Import => self.parse_import_spec().map(Spec::Import),
            T::Type => self.parse_type_spec().map(Spec::Type),
            _ => self.parse_value_spec(keyword, index).map(Spec::Value),
        }
    }

    fn parse_import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.kind() {
            T::Period => {
                self.next();
                Some(Ident::new("."))
            }
            T::Ident => Some(self.parse_ident()?),
            _ => None,
        };
        if !self.at(T::String) {
            return Err(self.error_expected("import path"));
        }
        let path = self.basic_lit();
        self.expect_semi()?;
        Ok(ImportSpec { name, path })
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.parse_ident()?;
        let alias = self.got(T::Assign);
        let ty = self.parse_type()?;
        self.expect_semi()?;
        Ok(TypeSpec { name, alias, ty })
    }

    fn parse_value_spec(&mut self, keyword: T, index: usize) -> PResult<ValueSpec> {
        let offset = self.tok.offset;
        let names = self.parse_ident_list()?;
        let ty = if matches!(self.kind(), T::Assign | T::Semicolon | T::Rparen) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let values = if self.got(T::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        if values.is_empty() {
            if keyword == T::Var && ty.is_none() {
                return Err(self.error(offset, "missing variable type or initialization"));
            }
            if keyword == T::Const && (index == 0 || ty.is_some()) {
                return Err(self.error(offset, "missing init expr for const declaration"));
            }
        }
        self.expect_semi()?;
        Ok(ValueSpec { names, ty, values })
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        self.expect(T::Func)?;
        let recv = if self.at(T::Lparen) {
            Some(self.parse_parameters()?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let ty = self.parse_signature()?;
        let body = if self.at(T::Lbrace) {
            Some(self.parse_body()?)
        } else {
            None
        };
        self.expect_semi()?;
        Ok(FuncDecl {
            recv,
            name,
            ty,
            body,
        })
    }

    fn parse_signature(&mut self) -> PResult<FuncType> {
        let params = self.parse_parameters()?;
        let results = self.parse_results()?;
        Ok(FuncType { params, results })
    }

    fn parse_results(&mut self) -> PResult<Option<FieldList>> {
        if self.at(T::Lparen) {
            return self.parse_parameters().map(Some);
        }
        if self.starts_type() {
            let ty = self.parse_type()?;
            return Ok(Some(FieldList {
                fields: vec![Field {
                    names: Vec::new(),
                    ty,
                    tag: None,
                }],
            }));
        }
        Ok(None)
    }

    fn parse_parameters(&mut self) -> PResult<FieldList> {
        self.expect(T::Lparen)?;
        let mut params = Vec::new();
        while !self.at(T::Rparen) && !self.at(T::Eof) {
            params.push(self.parse_param()?);
            if !self.got(T::Comma) {
                break;
            }
        }
        let close = self.tok.offset;
        self.expect_closing(T::Rparen, "parameter list")?;
        self.group_params(params, close)
    }

    fn parse_param(&mut self) -> PResult<Param> {
        if !self.at(T::Ident) {
            return Ok(Param::Type(self.parse_param_type()?));
        }
        let name = self.parse_ident()?;
        match self.kind() {
            T::Comma | T::Rparen => Ok(Param::Name(name)),
            T::Period => {
                self.next();
                let sel = self.parse_ident()?;
                Ok(Param::Type(Expr::Selector {
                    x: Expr::Ident(name).boxed(),
                    sel,
                }))
            }
            _ => Ok(Param::Named(name, self.parse_param_type()?)),
        }
    }

    fn parse_param_type(&mut self) -> PResult<Expr> {
        if self.got(T::Ellipsis) {
            return Ok(Expr::Ellipsis(Some(self.parse_type()?.boxed())));
        }
        self.parse_type()
    }

    /// `(a, b int, c string)` groups leading bare names with the next type;
    /// a list without any named entry is a list of types.
    fn group_params(&self, params: Vec<Param>, offset: usize) -> PResult<FieldList> {
        let unnamed = |ty| Field {
            names: Vec::new(),
            ty,
            tag: None,
        };

        if !params.iter().any(|p| matches!(p, Param::Named(..))) {
            let fields = params
                .into_iter()
                .map(|p| match p {
                    Param::Name(name) => unnamed(Expr::Ident(name)),
                    Param::Named(_, ty) | Param::Type(ty) => unnamed(ty),
                })
                .collect();
            return Ok(FieldList { fields });
        }

        let mut fields = Vec::new();
        let mut names = Vec::new();
        for param in params {
            match param {
                Param::Name(name) => names.push(name),
                Param::Named(name, ty) => {
                    names.push(name);
                    fields.push(Field {
                        names: mem::take(&mut names),
                        ty,
                        tag: None,
                    });
                }
                Param::Type(_) => {
                    return Err(self.error(offset, "mixed named and unnamed parameters"));
                }
            }
        }
        if !names.is_empty() {
            return Err(self.error(offset, "mixed named and unnamed parameters"));
        }
        Ok(FieldList { fields })
    }

    // ------------------------------------------------------------------
    // Types

    fn starts_type(&self) -> bool {
        matches!(
            self.kind(),
            T::Ident
                | T::Lbrack
                | T::Struct
                | T::Mul
                | T::Func
                | T::Interface
                | T::Map
                | T::Chan
                | T::Arrow
                | T::Lparen
        )
    }

    fn parse_type(&mut self) -> PResult<Expr> {
        match self.kind() {
            T::Ident => self.parse_type_name(),
            T::Lbrack => self.parse_array_type(),
            T::Struct => self.parse_struct_type(),
            T::Mul => {
                self.next();
                Ok(Expr::Star(self.parse_type()?.boxed()))
            }
            T::Func => {
                self.next();
                Ok(Expr::FuncType(self.parse_signature()?))
            }
            T::Interface => self.parse_interface_type(),
            T::Map => self.parse_map_type(),
            T::Chan | T::Arrow => self.parse_chan_type(),
            T::Lparen => {
                self.next();
                let ty = self.parse_type()?;
                self.expect(T::Rparen)?;
                Ok(Expr::Paren(ty.boxed()))
            }
            _ => Err(self.error_expected("type")),
        }
    }

    fn parse_type_name(&mut self) -> PResult<Expr> {
        let name = self.parse_ident()?;
        if self.got(T::Period) {
            let sel = self.parse_ident()?;
            return Ok(Expr::Selector {
                x: Expr::Ident(name).boxed(),
                sel,
            });
        }
        Ok(Expr::Ident(name))
    }

    fn parse_array_type(&mut self) -> PResult<Expr> {
        self.expect(T::Lbrack)?;
        let len = if self.got(T::Rbrack) {
            None
        } else {
            let len = if self.got(T::Ellipsis) {
                Expr::Ellipsis(None)
            } else {
                self.expr_lev += 1;
                let len = self.parse_expr()?;
                self.expr_lev -= 1;
                len
            };
            self.expect(T::Rbrack)?;
            Some(len.boxed())
        };
        let elem = self.parse_type()?.boxed();
        Ok(Expr::ArrayType { len, elem })
    }

    fn parse_struct_type(&mut self) -> PResult<Expr> {
        self.expect(T::Struct)?;
        self.expect(T::Lbrace)?;
        let mut fields = Vec::new();
        while matches!(self.kind(), T::Ident | T::Mul | T::Lparen) {
            fields.push(self.parse_field_decl()?);
        }
        self.expect(T::Rbrace)?;
        Ok(Expr::StructType(FieldList { fields }))
    }

    fn parse_field_decl(&mut self) -> PResult<Field> {
        let (names, ty) = if self.at(T::Ident) {
            let name = self.parse_ident()?;
            match self.kind() {
                T::Period => {
                    self.next();
                    let sel = self.parse_ident()?;
                    let ty = Expr::Selector {
                        x: Expr::Ident(name).boxed(),
                        sel,
                    };
                    (Vec::new(), ty)
                }
                // embedded
                T::Semicolon | T::Rbrace | T::String => (Vec::new(), Expr::Ident(name)),
                _ => {
                    let mut names = vec![name];
                    while self.got(T::Comma) {
                        names.push(self.parse_ident()?);
                    }
                    (names, self.parse_type()?)
                }
            }
        } else if self.got(T::Mul) {
            (Vec::new(), Expr::Star(self.parse_type_name()?.boxed()))
        } else {
            (Vec::new(), self.parse_type()?)
        };

        let tag = if self.at(T::String) {
            Some(self.basic_lit())
        } else {
            None
        };
        self.expect_semi()?;
        Ok(Field { names, ty, tag })
    }

    fn parse_interface_type(&mut self) -> PResult<Expr> {
        self.expect(T::Interface)?;
        self.expect(T::Lbrace)?;
        let mut fields = Vec::new();
        while !self.at(T::Rbrace) && !self.at(T::Eof) {
            let field = if self.at(T::Ident) {
                let name = self.parse_ident()?;
                if self.at(T::Lparen) {
                    Field {
                        names: vec![name],
                        ty: Expr::FuncType(self.parse_signature()?),
                        tag: None,
                    }
                } else {
                    let ty = if self.got(T::Period) {
                        Expr::Selector {
                            x: Expr::Ident(name).boxed(),
                            sel: self.parse_ident()?,
                        }
                    } else {
                        Expr::Ident(name)
                    };
                    Field {
                        names: Vec::new(),
                        ty,
                        tag: None,
                    }
                }
            } else {
                Field {
                    names: Vec::new(),
                    ty: self.parse_type()?,
                    tag: None,
                }
            };
            fields.push(field);
            self.expect_semi()?;
        }
        self.expect(T::Rbrace)?;
        Ok(Expr::InterfaceType(FieldList { fields }))
    }

    fn parse_map_type(&mut self) -> PResult<Expr> {
        self.expect(T::Map)?;
        self.expect(T::Lbrack)?;
        let key = self.parse_type()?.boxed();
        self.expect(T::Rbrack)?;
        let value = self.parse_type()?.boxed();
        Ok(Expr::MapType { key, value })
    }

    fn parse_chan_type(&mut self) -> PResult<Expr> {
        let dir = if self.got(T::Chan) {
            if self.got(T::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        } else {
            self.expect(T::Arrow)?;
            self.expect(T::Chan)?;
            ChanDir::Recv
        };
        let value = self.parse_type()?.boxed();
        Ok(Expr::ChanType { dir, value })
    }

    // ------------------------------------------------------------------
    // Expressions

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary_expr(LOWEST_PREC + 1)
    }

    fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.got(T::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_binary_expr(&mut self, prec1: u8) -> PResult<Expr> {
        let mut x = self.parse_unary_expr()?;
        loop {
            let op = self.kind();
            let prec = op.precedence();
            if prec < prec1 {
                return Ok(x);
            }
            self.next();
            let y = self.parse_binary_expr(prec + 1)?;
            x = Expr::Binary {
                op,
                x: x.boxed(),
                y: y.boxed(),
            };
        }
    }

    fn parse_unary_expr(&mut self) -> PResult<Expr> {
        match self.kind() {
            op @ (T::Add | T::Sub | T::Not | T::Xor | T::And | T::Tilde) => {
                self.next();
                let x = self.parse_unary_expr()?.boxed();
                Ok(Expr::Unary { op, x })
            }
            T::Arrow => {
                self.next();
                if self.got(T::Chan) {
                    let value = self.parse_type()?.boxed();
                    return Ok(Expr::ChanType {
                        dir: ChanDir::Recv,
                        value,
                    });
                }
                let x = self.parse_unary_expr()?.boxed();
                Ok(Expr::Unary { op: T::Arrow, x })
            }
            T::Mul => {
                self.next();
                Ok(Expr::Star(self.parse_unary_expr()?.boxed()))
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        match self.kind() {
            T::Ident => Ok(Expr::Ident(self.parse_ident()?)),
            T::Int | T::Float | T::Imag | T::Char | T::String => {
                Ok(Expr::BasicLit(self.basic_lit()))
            }
            T::Lparen => {
                self.next();
                self.expr_lev += 1;
                let x = self.parse_expr()?;
                self.expr_lev -= 1;
                self.expect(T::Rparen)?;
                Ok(Expr::Paren(x.boxed()))
            }
            T::Func => {
                self.next();
                let ty = self.parse_signature()?;
                if !self.at(T::Lbrace) {
                    return Ok(Expr::FuncType(ty));
                }
                let body = self.parse_body()?;
                Ok(Expr::FuncLit { ty, body })
            }
            T::Lbrack | T::Struct | T::Map | T::Chan | T::Interface => self.parse_type(),
            _ => Err(self.error_expected("operand")),
        }
    }

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let mut x = self.parse_operand()?;
        loop {
            match self.kind() {
                T::Period => {
                    self.next();
                    match self.kind() {
                        T::Ident => {
                            let sel = self.parse_ident()?;
                            x = Expr::Selector { x: x.boxed(), sel };
                        }
                        T::Lparen => {
                            self.next();
                            let ty = if self.got(T::Type) {
                                None
                            } else {
                                Some(self.parse_type()?.boxed())
                            };
                            self.expect(T::Rparen)?;
                            x = Expr::TypeAssert { x: x.boxed(), ty };
                        }
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                T::Lbrack => x = self.parse_index_or_slice(x)?,
                T::Lparen => x = self.parse_call(x)?,
                T::Lbrace if is_literal_type(&x) && (self.expr_lev >= 0 || !is_type_name(&x)) => {
                    let elts = self.parse_literal_value()?;
                    x = Expr::CompositeLit {
                        ty: Some(x.boxed()),
                        elts,
                    };
                }
                _ => return Ok(x),
            }
        }
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        self.expect(T::Lbrack)?;
        self.expr_lev += 1;
        let mut index: [Option<Expr>; 3] = [None, None, None];
        let mut colons = 0;
        if !self.at(T::Colon) {
            index[0] = Some(self.parse_expr()?);
        }
        while self.at(T::Colon) && colons < 2 {
            colons += 1;
            self.next();
            if !self.at(T::Colon) && !self.at(T::Rbrack) {
                index[colons] = Some(self.parse_expr()?);
            }
        }
        self.expr_lev -= 1;
        self.expect(T::Rbrack)?;

        let [low, high, max] = index;
        if colons == 0 {
            return match low {
                Some(index) => Ok(Expr::Index {
                    x: x.boxed(),
                    index: index.boxed(),
                }),
                None => Err(self.error_expected("operand")),
            };
        }
        Ok(Expr::Slice {
            x: x.boxed(),
            low: low.map(Box::new),
            high: high.map(Box::new),
            max: max.map(Box::new),
        })
    }

    fn parse_call(&mut self, fun: Expr) -> PResult<Expr> {
        self.expect(T::Lparen)?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(T::Rparen) && !self.at(T::Eof) && !ellipsis {
            args.push(self.parse_expr()?);
            ellipsis = self.got(T::Ellipsis);
            if !self.got(T::Comma) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect_closing(T::Rparen, "argument list")?;
        Ok(Expr::Call {
            fun: fun.boxed(),
            args,
            ellipsis,
        })
    }

    fn parse_literal_value(&mut self) -> PResult<Vec<Expr>> {
        self.expect(T::Lbrace)?;
        self.expr_lev += 1;
        let mut elts = Vec::new();
        while !self.at(T::Rbrace) && !self.at(T::Eof) {
            elts.push(self.parse_element()?);
            if !self.got(T::Comma) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect_closing(T::Rbrace, "composite literal")?;
        Ok(elts)
    }

    fn parse_element(&mut self) -> PResult<Expr> {
        let x = self.parse_element_value()?;
        if self.got(T::Colon) {
            let value = self.parse_element_value()?;
            return Ok(Expr::KeyValue {
                key: x.boxed(),
                value: value.boxed(),
            });
        }
        Ok(x)
    }

    fn parse_element_value(&mut self) -> PResult<Expr> {
        if self.at(T::Lbrace) {
            let elts = self.parse_literal_value()?;
            return Ok(Expr::CompositeLit { ty: None, elts });
        }
        self.parse_expr()
    }

    // ------------------------------------------------------------------
    // Statements

    /// A function body; composite literals are allowed again inside it.
    fn parse_body(&mut self) -> PResult<BlockStmt> {
        let outer = mem::replace(&mut self.expr_lev, 0);
        let body = self.parse_block()?;
        self.expr_lev = outer;
        Ok(body)
    }

    fn parse_block(&mut self) -> PResult<BlockStmt> {
        self.expect(T::Lbrace)?;
        let stmts = self.parse_stmt_list()?;
        self.expect(T::Rbrace)?;
        Ok(BlockStmt { stmts })
    }

    fn parse_stmt_list(&mut self) -> PResult<Vec<Stmt>> {
        let mut list = Vec::new();
        while !matches!(self.kind(), T::Case | T::Default | T::Rbrace | T::Eof) {
            list.push(self.parse_stmt()?);
        }
        Ok(list)
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.kind() {
            kind @ (T::Const | T::Type | T::Var) => Ok(Stmt::Decl(self.parse_gen_decl(kind)?)),
            T::Ident
            | T::Int
            | T::Float
            | T::Imag
            | T::Char
            | T::String
            | T::Func
            | T::Lparen
            | T::Lbrack
            | T::Struct
            | T::Map
            | T::Chan
            | T::Interface
            | T::Add
            | T::Sub
            | T::Mul
            | T::And
            | T::Xor
            | T::Arrow
            | T::Not
            | T::Tilde => {
                let (stmt, _) = self.parse_simple_stmt(Mode::LabelOk)?;
                if !matches!(stmt, Stmt::Labeled { .. }) {
                    self.expect_semi()?;
                }
                Ok(stmt)
            }
            op @ (T::Go | T::Defer) => {
                self.next();
                let call = self.parse_call_expr(op)?;
                self.expect_semi()?;
                Ok(if op == T::Go {
                    Stmt::Go(call)
                } else {
                    Stmt::Defer(call)
                })
            }
            T::Return => {
                self.next();
                let results = if matches!(self.kind(), T::Semicolon | T::Rbrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect_semi()?;
                Ok(Stmt::Return(results))
            }
            op @ (T::Break | T::Continue | T::Goto | T::Fallthrough) => {
                self.next();
                let label = if op != T::Fallthrough && self.at(T::Ident) {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                self.expect_semi()?;
                Ok(Stmt::Branch { op, label })
            }
            T::Lbrace => {
                let block = self.parse_block()?;
                self.expect_semi()?;
                Ok(Stmt::Block(block))
            }
            T::If => self.parse_if_stmt(),
            T::Switch => self.parse_switch_stmt(),
            T::Select => self.parse_select_stmt(),
            T::For => self.parse_for_stmt(),
            T::Semicolon => {
                let implicit = self.tok.is_implicit_semi();
                self.next();
                Ok(Stmt::Empty { implicit })
            }
            T::Rbrace => Ok(Stmt::Empty { implicit: true }),
            _ => Err(self.error_expected("statement")),
        }
    }

    /// Parses a simple statement. The flag reports a range clause, which
    /// only [`Mode::RangeOk`] accepts.
    fn parse_simple_stmt(&mut self, mode: Mode) -> PResult<(Stmt, bool)> {
        if mode == Mode::RangeOk && self.got(T::Range) {
            let x = self.parse_expr()?;
            let range = Stmt::Range {
                key: None,
                value: None,
                op: T::Illegal,
                x,
                body: BlockStmt::default(),
            };
            return Ok((range, true));
        }

        let offset = self.tok.offset;
        let mut lhs = self.parse_expr_list()?;
        let op = self.kind();

        if op.is_assign_op() {
            self.next();
            if mode == Mode::RangeOk && matches!(op, T::Define | T::Assign) && self.got(T::Range) {
                let x = self.parse_expr()?;
                let mut vars = lhs.into_iter();
                let (key, value) = (vars.next(), vars.next());
                if vars.next().is_some() {
                    return Err(self.error(
                        offset,
                        "range clause permits at most two iteration variables",
                    ));
                }
                let range = Stmt::Range {
                    key,
                    value,
                    op,
                    x,
                    body: BlockStmt::default(),
                };
                return Ok((range, true));
            }
            let rhs = self.parse_expr_list()?;
            return Ok((Stmt::Assign { lhs, op, rhs }, false));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("1 expression"));
        }
        let Some(x) = lhs.pop() else {
            return Err(self.error_expected("expression"));
        };

        if op == T::Colon && mode == Mode::LabelOk {
            if let Expr::Ident(label) = &x {
                let label = label.clone();
                self.next();
                let stmt = self.parse_stmt()?.boxed();
                return Ok((Stmt::Labeled { label, stmt }, false));
            }
        }

        match op {
            T::Arrow => {
                self.next();
                let value = self.parse_expr()?;
                Ok((Stmt::Send { chan: x, value }, false))
            }
            T::Inc | T::Dec => {
                self.next();
                Ok((Stmt::IncDec { x, op }, false))
            }
            _ => Ok((Stmt::Expr(x), false)),
        }
    }

    fn parse_call_expr(&mut self, op: T) -> PResult<Expr> {
        let offset = self.tok.offset;
        let x = self.parse_expr()?;
        if matches!(x, Expr::Call { .. }) {
            Ok(x)
        } else {
            Err(self.error(offset, format!("expression in {op} must be function call")))
        }
    }

    /// Parses the `init; cond` header shared by `if` and `switch`. The
    /// composite-literal restriction applies throughout.
    fn parse_header(&mut self) -> PResult<(Option<Stmt>, Option<Stmt>)> {
        if self.at(T::Lbrace) {
            return Ok((None, None));
        }
        let outer = mem::replace(&mut self.expr_lev, -1);
        let mut init = None;
        let mut cond = None;
        if !self.at(T::Semicolon) {
            cond = Some(self.parse_simple_stmt(Mode::Basic)?.0);
        }
        if self.got(T::Semicolon) {
            init = cond.take();
            if !self.at(T::Lbrace) {
                cond = Some(self.parse_simple_stmt(Mode::Basic)?.0);
            }
        }
        self.expr_lev = outer;
        Ok((init, cond))
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        self.expect(T::If)?;
        let offset = self.tok.offset;
        let (init, cond) = self.parse_header()?;
        let cond = match cond {
            Some(Stmt::Expr(cond)) => cond,
            Some(_) => {
                return Err(self.error(offset, "cannot use assignment as condition"));
            }
            None => return Err(self.error(offset, "missing condition in if statement")),
        };
        let body = self.parse_block()?;

        let els = if self.got(T::Else) {
            match self.kind() {
                T::If => Some(self.parse_if_stmt()?.boxed()),
                T::Lbrace => {
                    let block = self.parse_block()?;
                    self.expect_semi()?;
                    Some(Stmt::Block(block).boxed())
                }
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            self.expect_semi()?;
            None
        };

        Ok(Stmt::If {
            init: init.map(Stmt::boxed),
            cond,
            body,
            els,
        })
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        self.expect(T::Switch)?;
        let (init, tag) = self.parse_header()?;
        self.expect(T::Lbrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), T::Case | T::Default) {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect(T::Rbrace)?;
        self.expect_semi()?;
        Ok(Stmt::Switch {
            init: init.map(Stmt::boxed),
            tag: tag.map(Stmt::boxed),
            clauses,
        })
    }

    fn parse_case_clause(&mut self) -> PResult<CaseClause> {
        let list = if self.got(T::Case) {
            Some(self.parse_expr_list()?)
        } else {
            self.expect(T::Default)?;
            None
        };
        self.expect(T::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(CaseClause { list, body })
    }

    fn parse_select_stmt(&mut self) -> PResult<Stmt> {
        self.expect(T::Select)?;
        self.expect(T::Lbrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), T::Case | T::Default) {
            clauses.push(self.parse_comm_clause()?);
        }
        self.expect(T::Rbrace)?;
        self.expect_semi()?;
        Ok(Stmt::Select(clauses))
    }

    fn parse_comm_clause(&mut self) -> PResult<CommClause> {
        let comm = if self.got(T::Case) {
            Some(self.parse_simple_stmt(Mode::Basic)?.0.boxed())
        } else {
            self.expect(T::Default)?;
            None
        };
        self.expect(T::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(CommClause { comm, body })
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        self.expect(T::For)?;
        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut range = None;
        let mut cond_offset = self.tok.offset;

        if !self.at(T::Lbrace) {
            let outer = mem::replace(&mut self.expr_lev, -1);
            if !self.at(T::Semicolon) {
                let (stmt, is_range) = self.parse_simple_stmt(Mode::RangeOk)?;
                if is_range {
                    range = Some(stmt);
                } else {
                    cond = Some(stmt);
                }
            }
            if range.is_none() && self.got(T::Semicolon) {
                init = cond.take();
                cond_offset = self.tok.offset;
                if !self.at(T::Semicolon) {
                    cond = Some(self.parse_simple_stmt(Mode::Basic)?.0);
                }
                self.expect(T::Semicolon)?;
                if !self.at(T::Lbrace) {
                    post = Some(self.parse_simple_stmt(Mode::Basic)?.0);
                }
            }
            self.expr_lev = outer;
        }

        let body = self.parse_block()?;
        self.expect_semi()?;

        if let Some(Stmt::Range {
            key, value, op, x, ..
        }) = range
        {
            return Ok(Stmt::Range {
                key,
                value,
                op,
                x,
                body,
            });
        }
        let cond = match cond {
            None => None,
            Some(Stmt::Expr(cond)) => Some(cond),
            Some(_) => return Err(self.error(cond_offset, "expected for loop condition")),
        };
        Ok(Stmt::For {
            init: init.map(Stmt::boxed),
            cond,
            post: post.map(Stmt::boxed),
            body,
        })
    }
}

/// Expressions that may precede a composite literal's `{`.
fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) | Expr::ArrayType { .. } | Expr::StructType(_) | Expr::MapType { .. } => {
            true
        }
        Expr::Selector { x, .. } => matches!(**x, Expr::Ident(_)),
        _ => false,
    }
}

fn is_type_name(x: &Expr) -> bool {
    matches!(x, Expr::Ident(_) | Expr::Selector { .. })
}
