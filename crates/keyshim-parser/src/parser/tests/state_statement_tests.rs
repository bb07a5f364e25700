use super::*;
use crate::ast::{Decl, Expr, FuncBody, Spec, Stmt};
use keyshim_scanner::SyntaxKind;

fn parse_body(body: &str) -> FuncBody {
    let source = format!("package p\n\nfunc F() {body}\n");
    let unit = parse_source_file("test.go", source).expect("source should parse");
    let Some(Decl::Func(func)) = unit.decls.into_iter().next() else {
        panic!("expected func decl");
    };
    func.body.expect("body")
}

fn parse_err(source: &str) -> ParseError {
    parse_source_file("test.go", source.to_string()).expect_err("source must not parse")
}

#[test]
fn body_keeps_text_and_statements() {
    let body = parse_body("{\n\tx := 1\n\tx++\n\treturn\n}");
    assert_eq!(body.text, "{\n\tx := 1\n\tx++\n\treturn\n}");
    assert_eq!(body.block.stmts.len(), 3);
    assert!(matches!(
        body.block.stmts[0],
        Stmt::Assign {
            op: SyntaxKind::ColonEqualsToken,
            ..
        }
    ));
    assert!(matches!(body.block.stmts[1], Stmt::IncDec { .. }));
    assert!(matches!(&body.block.stmts[2], Stmt::Return { results, .. } if results.is_empty()));
}

#[test]
fn if_else_chain_with_init() {
    let body = parse_body("{\n\tif v, ok := m[k]; ok {\n\t\treturn\n\t} else if v > 0 {\n\t} else {\n\t}\n}");
    let Stmt::If {
        init, otherwise, ..
    } = &body.block.stmts[0]
    else {
        panic!("expected if");
    };
    assert!(init.is_some());
    let Some(otherwise) = otherwise else {
        panic!("expected else branch");
    };
    let Stmt::If { otherwise, .. } = otherwise.as_ref() else {
        panic!("expected else if");
    };
    assert!(matches!(otherwise.as_deref(), Some(Stmt::Block(_))));
}

#[test]
fn for_loops_and_range_clauses() {
    let body = parse_body(
        "{\n\tfor i := 0; i < 3; i++ {\n\t}\n\tfor k, v := range m {\n\t\t_, _ = k, v\n\t}\n\tfor range ch {\n\t}\n\tfor {\n\t\tbreak\n\t}\n}",
    );
    assert!(matches!(
        &body.block.stmts[0],
        Stmt::For { init: Some(_), cond: Some(_), post: Some(_), .. }
    ));
    assert!(matches!(
        &body.block.stmts[1],
        Stmt::Range { key: Some(_), value: Some(_), define: true, .. }
    ));
    assert!(matches!(&body.block.stmts[2], Stmt::Range { key: None, .. }));
    assert!(matches!(&body.block.stmts[3], Stmt::For { cond: None, .. }));
}

#[test]
fn composite_literal_in_header_needs_parentheses() {
    let body = parse_body("{\n\tif p == (Point{}) {\n\t}\n\tfor _, p := range []Point{{1, 2}} {\n\t\t_ = p\n\t}\n}");
    assert_eq!(body.block.stmts.len(), 2);

    let err = parse_err("package p\n\nfunc F() {\n\tif p == Point{} {\n\t}\n}\n");
    assert_eq!(err.position.line, 3);
}

#[test]
fn switch_type_switch_and_select() {
    let body = parse_body(
        "{\n\tswitch x := f(); x {\n\tcase 1, 2:\n\t\tfallthrough\n\tdefault:\n\t}\n\tswitch v := i.(type) {\n\tcase nil, *T:\n\tcase map[int]int:\n\t\t_ = v\n\t}\n\tselect {\n\tcase v := <-ch:\n\t\t_ = v\n\tcase out <- 1:\n\tdefault:\n\t}\n}",
    );
    let Stmt::Switch { init, tag, clauses, .. } = &body.block.stmts[0] else {
        panic!("expected switch");
    };
    assert!(init.is_some() && tag.is_some());
    assert_eq!(clauses.len(), 2);
    assert!(clauses[1].exprs.is_empty());

    let Stmt::TypeSwitch { clauses, .. } = &body.block.stmts[1] else {
        panic!("expected type switch");
    };
    assert_eq!(clauses[0].types.len(), 2);
    assert!(clauses[1].types[0].is_map());

    let Stmt::Select { clauses, .. } = &body.block.stmts[2] else {
        panic!("expected select");
    };
    assert!(matches!(clauses[1].comm.as_deref(), Some(Stmt::Send { .. })));
    assert!(clauses[2].comm.is_none());
}

#[test]
fn labels_go_defer_and_local_declarations() {
    let body = parse_body(
        "{\n\ttype pair struct{ a, b int }\n\tvar m map[string]pair\nOuter:\n\tfor {\n\t\tcontinue Outer\n\t}\n\tgo func() {}()\n\tdefer close(ch)\n}",
    );
    assert!(matches!(body.block.stmts[0], Stmt::Decl(_)));
    assert!(matches!(body.block.stmts[1], Stmt::Decl(_)));
    let Stmt::Labeled { label, stmt, .. } = &body.block.stmts[2] else {
        panic!("expected labeled statement");
    };
    assert_eq!(label.name, "Outer");
    assert!(matches!(stmt.as_ref(), Stmt::For { .. }));
    assert!(matches!(body.block.stmts[3], Stmt::Go { .. }));
    assert!(matches!(body.block.stmts[4], Stmt::Defer { .. }));
}

#[test]
fn func_literal_body_syntax_error_fails() {
    let err = parse_err("package p\n\nvar f = func() { x := }\n");
    assert_eq!(err.message, "expected operand, found '}'");
}

#[test]
fn func_decl_body_syntax_error_fails() {
    let err = parse_err("package p\n\nfunc F() int {\n\treturn 1 +\n}\n");
    assert_eq!(err.position.line, 4);
}

#[test]
fn go_requires_a_call() {
    let err = parse_err("package p\n\nfunc F() {\n\tgo f\n}\n");
    assert_eq!(err.message, "expression in go must be function call");
}

#[test]
fn type_guard_outside_switch_fails() {
    let err = parse_err("package p\n\nfunc F() {\n\t_ = x.(type)\n}\n");
    assert_eq!(err.message, "use of .(type) outside type switch");

    let err = parse_err("package p\n\nfunc F() {\n\tswitch f(x.(type)) {\n\t}\n}\n");
    assert_eq!(err.message, "use of .(type) outside type switch");
}

#[test]
fn nested_func_literal_in_value_is_parsed() {
    let unit = parse_source_file(
        "test.go",
        "package p\n\nvar f = func() {\n\tg := func() map[int]int { return nil }\n\t_ = g\n}\n"
            .to_string(),
    )
    .expect("source should parse");
    let Some(Decl::Gen(decl)) = unit.decls.first() else {
        panic!("expected gen decl");
    };
    let Spec::Value(spec) = &decl.specs[0] else {
        panic!("expected value spec");
    };
    let Expr::FuncLit { body, .. } = &spec.values[0] else {
        panic!("expected func literal");
    };
    let Stmt::Assign { rhs, .. } = &body.block.stmts[0] else {
        panic!("expected assignment");
    };
    assert!(matches!(rhs[0], Expr::FuncLit { .. }));
}
