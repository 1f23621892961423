use alloc::{string::ToString, vec::Vec};

use super::*;
use crate::token::TokenKind;

fn parse(src: &str) -> File {
    parse_file(src, &ParseOptions::default()).unwrap()
}

fn parse_err(src: &str) -> SyntaxError {
    parse_file(src, &ParseOptions::default()).unwrap_err()
}

/// Statements of the body of the first function in `body_src`.
fn body(body_src: &str) -> Vec<Stmt> {
    let src = alloc::format!("package p\nfunc f() {{\n{body_src}\n}}\n");
    match parse(&src).decls.into_iter().next() {
        Some(Decl::Func(FuncDecl {
            body: Some(block), ..
        })) => block.stmts,
        other => panic!("no function body: {other:?}"),
    }
}

fn ident(name: &str) -> Expr {
    Expr::Ident(Ident::new(name))
}

#[test]
fn position_is_one_based() {
    assert_eq!(position("ab\ncd", 0), (1, 1));
    assert_eq!(position("ab\ncd", 4), (2, 2));
    assert_eq!(position("ab\n", 3), (2, 1));
}

#[test]
fn package_and_imports() {
    let file = parse("package main\nimport (\n\t\"fmt\"\n\tio \"io\"\n\t. \"strings\"\n)\nimport _ \"os\"\n");
    assert_eq!(file.package.name, "main");
    let names: Vec<_> = file
        .imports
        .iter()
        .map(|i| (i.name.as_ref().map(|n| n.name.as_str()), i.path.value.as_str()))
        .collect();
    assert_eq!(
        names,
        [
            (None, "\"fmt\""),
            (Some("io"), "\"io\""),
            (Some("."), "\"strings\""),
            (Some("_"), "\"os\""),
        ]
    );
    assert_eq!(file.decls.len(), 2);
}

#[test]
fn parameters_group_names_with_types() {
    let file = parse("package p\nfunc F(a, b int, c ...string) (r1 int, r2 error) {}\n");
    let Decl::Func(func) = &file.decls[0] else {
        panic!("expected a function");
    };
    assert_eq!(func.ty.params.fields.len(), 2);
    assert_eq!(func.ty.params.num_fields(), 3);
    assert!(matches!(func.ty.params.fields[1].ty, Expr::Ellipsis(Some(_))));
    assert_eq!(func.ty.results.as_ref().map(FieldList::num_fields), Some(2));
}

#[test]
fn unnamed_parameters_are_types() {
    let file = parse("package p\nfunc F(int, pkg.T) func() bool\n");
    let Decl::Func(func) = &file.decls[0] else {
        panic!("expected a function");
    };
    assert!(func.body.is_none());
    assert_eq!(func.ty.params.num_fields(), 2);
    assert!(func.ty.params.fields.iter().all(|f| f.names.is_empty()));
    assert!(matches!(
        func.ty.results.as_ref().map(|r| &r.fields[0].ty),
        Some(Expr::FuncType(_))
    ));
}

#[test]
fn method_receiver() {
    let file = parse("package p\nfunc (t *T) String() string { return \"\" }\n");
    let Decl::Func(func) = &file.decls[0] else {
        panic!("expected a function");
    };
    let recv = func.recv.as_ref().unwrap();
    assert_eq!(recv.num_fields(), 1);
    assert_eq!(recv.fields[0].ty, Expr::Star(ident("T").boxed()));
}

#[test]
fn struct_and_interface_types() {
    let file = parse(
        "package p\ntype S struct {\n\tA, B int `json:\"a\"`\n\t*Embedded\n\tio.Reader\n}\ntype I interface {\n\tio.Writer\n\tM(x int) error\n}\n",
    );
    let types: Vec<_> = file
        .decls
        .iter()
        .filter_map(|d| match d {
            Decl::Gen(GenDecl { specs, .. }) => match &specs[0] {
                Spec::Type(spec) => Some(spec.ty.clone()),
                _ => None,
            },
            Decl::Func(_) => None,
        })
        .collect();

    let Expr::StructType(fields) = &types[0] else {
        panic!("expected a struct type");
    };
    assert_eq!(fields.num_fields(), 4);
    assert_eq!(fields.fields[0].tag.as_ref().unwrap().value, "`json:\"a\"`");

    let Expr::InterfaceType(methods) = &types[1] else {
        panic!("expected an interface type");
    };
    assert_eq!(methods.fields.len(), 2);
    assert_eq!(methods.fields[1].names[0].name, "M");
}

#[test]
fn composite_literal_is_not_a_block_in_conditions() {
    let stmts = body("if x == y {\n}\nv := T{1, 2}\nif (T{}) == v {\n}");
    assert!(matches!(&stmts[0], Stmt::If { cond: Expr::Binary { op: TokenKind::Eql, .. }, .. }));
    assert!(matches!(
        &stmts[1],
        Stmt::Assign { rhs, .. } if matches!(&rhs[0], Expr::CompositeLit { elts, .. } if elts.len() == 2)
    ));
    assert!(matches!(&stmts[2], Stmt::If { .. }));
}

#[test]
fn binary_precedence() {
    let stmts = body("a + b*c == d || e");
    let Stmt::Expr(Expr::Binary { op, x, .. }) = &stmts[0] else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, TokenKind::Lor);
    let Expr::Binary { op, x, .. } = &**x else {
        panic!("expected a comparison");
    };
    assert_eq!(*op, TokenKind::Eql);
    assert!(matches!(&**x, Expr::Binary { op: TokenKind::Add, y, .. } if matches!(**y, Expr::Binary { op: TokenKind::Mul, .. })));
}

#[test]
fn for_and_range_clauses() {
    let stmts = body("for i := 0; i < n; i++ {\n}\nfor k, v := range m {\n}\nfor range ch {\n}\nfor {\n}");
    assert!(matches!(&stmts[0], Stmt::For { init: Some(_), cond: Some(_), post: Some(_), .. }));
    assert!(matches!(
        &stmts[1],
        Stmt::Range { key: Some(_), value: Some(_), op: TokenKind::Define, .. }
    ));
    assert!(matches!(
        &stmts[2],
        Stmt::Range { key: None, value: None, op: TokenKind::Illegal, .. }
    ));
    assert!(matches!(&stmts[3], Stmt::For { init: None, cond: None, post: None, .. }));
}

#[test]
fn switch_select_and_labels() {
    let stmts = body(
        "switch v := x.(type) {\ncase int, string:\n\tfallthrough\ndefault:\n}\nselect {\ncase v := <-ch:\n\t_ = v\ncase out <- 1:\ndefault:\n}\nLoop:\n\tfor {\n\t\tbreak Loop\n\t}",
    );
    let Stmt::Switch { tag: Some(tag), clauses, .. } = &stmts[0] else {
        panic!("expected a switch");
    };
    assert!(matches!(&**tag, Stmt::Assign { rhs, .. } if matches!(rhs[0], Expr::TypeAssert { ty: None, .. })));
    assert_eq!(clauses.len(), 2);
    assert!(clauses[1].list.is_none());

    let Stmt::Select(comms) = &stmts[1] else {
        panic!("expected a select");
    };
    assert!(matches!(comms[1].comm.as_deref(), Some(Stmt::Send { .. })));
    assert!(comms[2].comm.is_none());

    assert!(matches!(&stmts[2], Stmt::Labeled { label, stmt } if label.name == "Loop" && matches!(**stmt, Stmt::For { .. })));
}

#[test]
fn slices_calls_and_literals() {
    let stmts = body("s = a[1:2:3]\nf(xs...)\nm := map[string][]int{\"a\": {1}}\ngo func() {}()\ndefer close(ch)");
    assert!(matches!(
        &stmts[0],
        Stmt::Assign { rhs, .. } if matches!(&rhs[0], Expr::Slice { low: Some(_), high: Some(_), max: Some(_), .. })
    ));
    assert!(matches!(&stmts[1], Stmt::Expr(Expr::Call { ellipsis: true, .. })));
    assert!(matches!(
        &stmts[2],
        Stmt::Assign { rhs, .. } if matches!(&rhs[0], Expr::CompositeLit { ty: Some(ty), .. } if matches!(**ty, Expr::MapType { .. }))
    ));
    assert!(matches!(&stmts[3], Stmt::Go(Expr::Call { fun, .. }) if matches!(**fun, Expr::FuncLit { .. })));
    assert!(matches!(&stmts[4], Stmt::Defer(_)));
}

#[test]
fn declarations_in_function_bodies() {
    let stmts = body("var x, y int\nconst (\n\tA = iota\n\tB\n)\ntype T = int");
    assert!(matches!(&stmts[0], Stmt::Decl(GenDecl { keyword: TokenKind::Var, .. })));
    assert!(matches!(&stmts[1], Stmt::Decl(GenDecl { grouped: true, specs, .. }) if specs.len() == 2));
    assert!(matches!(
        &stmts[2],
        Stmt::Decl(GenDecl { specs, .. }) if matches!(&specs[0], Spec::Type(TypeSpec { alias: true, .. }))
    ));
}

#[test]
fn channel_types() {
    let file = parse("package p\nvar a chan int\nvar b chan<- int\nvar c <-chan int\n");
    let dirs: Vec<_> = file
        .decls
        .iter()
        .filter_map(|d| match d {
            Decl::Gen(GenDecl { specs, .. }) => match &specs[0] {
                Spec::Value(ValueSpec {
                    ty: Some(Expr::ChanType { dir, .. }),
                    ..
                }) => Some(*dir),
                _ => None,
            },
            Decl::Func(_) => None,
        })
        .collect();
    assert_eq!(dirs, [ChanDir::Both, ChanDir::Send, ChanDir::Recv]);
}

#[test]
fn error_reports_newline() {
    let err = parse_err("package p\nfunc f() {\n\tx := \n}\n");
    assert_eq!((err.line, err.column), (4, 1));
    assert_eq!(err.msg, "expected operand, found '}'");
    assert_eq!(err.to_string(), "<input>:4:1: expected operand, found '}'");
}

#[test]
fn error_messages() {
    assert_eq!(
        parse_err("package p\nvar x\n").msg,
        "missing variable type or initialization"
    );
    assert_eq!(
        parse_err("package p\nconst c\n").msg,
        "missing init expr for const declaration"
    );
    let err = parse_err("package p\nfunc f() { go x }\n");
    assert_eq!((err.line, err.column), (2, 15));
    assert_eq!(err.msg, "expression in go must be function call");
    assert_eq!(
        parse_err("package p\nimport \"a\"\nfunc f() {}\nimport \"b\"\n").msg,
        "imports must appear before other declarations"
    );
    assert_eq!(
        parse_err("package p\nfunc f(a int, string) {}\n").msg,
        "mixed named and unnamed parameters"
    );
    assert_eq!(
        parse_err("package p\nfunc f() {\n\tg(a\n\t)\n}\n").msg,
        "missing ',' before newline in argument list"
    );
    assert_eq!(
        parse_err("package p\nfunc f() {\n\tx = 1 2\n}\n").msg,
        "expected ';', found 2"
    );
    assert_eq!(parse_err("func f() {}").msg, "expected 'package', found 'func'");
}

#[test]
fn filename_is_reported() {
    let err = parse_file("package p\n)", &ParseOptions::with_filename("repl.go")).unwrap_err();
    assert_eq!(err.filename, "repl.go");
    assert_eq!(err.to_string(), "repl.go:2:1: expected declaration, found ')'");
}

#[test]
fn nested_function_literal() {
    let stmts = body("x := func() {\n}");
    let Stmt::Assign { lhs, op, rhs } = &stmts[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(lhs, &[ident("x")]);
    assert_eq!(*op, TokenKind::Define);
    assert!(matches!(&rhs[0], Expr::FuncLit { body, .. } if body.stmts.is_empty()));
}
