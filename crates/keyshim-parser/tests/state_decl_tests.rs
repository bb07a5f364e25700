//! Tests for source file and declaration parsing.
use keyshim_parser::{Decl, Expr, GenKind, Spec, parse_source_file};

fn parse(source: &str) -> keyshim_parser::SourceUnit {
    parse_source_file("test.go", source.to_string()).expect("source should parse")
}

#[test]
fn parse_package_clause() {
    let unit = parse("package shapes\n");
    assert_eq!(unit.package.name, "shapes");
    assert!(unit.decls.is_empty());
}

#[test]
fn parse_missing_package_clause_is_an_error() {
    let err = parse_source_file("test.go", "type T int\n".to_string())
        .expect_err("missing package must fail");
    assert_eq!(err.message, "expected 'package', found 'type'");
    assert_eq!(err.to_string(), "test.go:1:1: expected 'package', found 'type'");
}

#[test]
fn parse_declarations_keep_source_order() {
    let unit = parse(
        "package p\n\nimport \"fmt\"\n\nconst C = 1\n\nfunc F() {}\n\nvar V int\n\ntype T struct{}\n",
    );
    let kinds: Vec<&str> = unit
        .decls
        .iter()
        .map(|decl| match decl {
            Decl::Gen(gen_decl) => gen_decl.kind.keyword(),
            Decl::Func(_) => "func",
        })
        .collect();
    assert_eq!(kinds, vec!["import", "const", "func", "var", "type"]);
}

#[test]
fn parse_grouped_declarations() {
    let unit = parse("package p\n\nvar (\n\ta int\n\tb, c = 1, 2\n)\n\nimport ()\n");
    let Decl::Gen(vars) = &unit.decls[0] else {
        panic!("expected gen decl");
    };
    assert!(vars.grouped);
    assert_eq!(vars.specs.len(), 2);
    let Spec::Value(second) = &vars.specs[1] else {
        panic!("expected value spec");
    };
    assert_eq!(second.names.len(), 2);
    assert_eq!(second.values.len(), 2);

    let Decl::Gen(imports) = &unit.decls[1] else {
        panic!("expected gen decl");
    };
    assert_eq!(imports.kind, GenKind::Import);
    assert!(imports.specs.is_empty());
}

#[test]
fn parse_const_group_with_implicit_repetition() {
    let unit = parse("package p\n\nconst (\n\tA Kind = iota\n\tB\n\tC\n)\n");
    let Decl::Gen(decl) = &unit.decls[0] else {
        panic!("expected gen decl");
    };
    assert_eq!(decl.specs.len(), 3);
    let Spec::Value(b) = &decl.specs[1] else {
        panic!("expected value spec");
    };
    assert!(b.ty.is_none());
    assert!(b.values.is_empty());
}

#[test]
fn parse_var_without_type_or_value_is_an_error() {
    assert!(parse_source_file("test.go", "package p\nvar x\n".to_string()).is_err());
}

#[test]
fn parse_func_body_keeps_its_text() {
    let source = "package p\n\nfunc (r *Recv) Do[T any](x T) (int, error) {\n\tif x { return 1, nil }\n\treturn 0, nil\n}\n";
    let unit = parse(source);
    let Decl::Func(func) = &unit.decls[0] else {
        panic!("expected func decl");
    };
    assert_eq!(func.name.name, "Do");
    assert!(func.recv.is_some());
    assert_eq!(func.type_params.len(), 1);
    let body = func.body.as_ref().expect("body");
    assert!(body.text.starts_with('{'));
    assert!(body.text.ends_with('}'));
    assert!(body.text.contains("return 0, nil"));
}

#[test]
fn parse_unterminated_body_is_an_error() {
    let err = parse_source_file("test.go", "package p\nfunc F() {\n".to_string())
        .expect_err("unterminated body must fail");
    assert_eq!(err.message, "unexpected end of file in function body");
}

#[test]
fn parse_var_with_composite_literal_and_func_literal() {
    let unit = parse(
        "package p\n\nvar m = map[string]int{\n\t\"a\": 1,\n\t\"b\": 2,\n}\n\nvar f = func(x int) int { return x * 2 }\n",
    );
    let Decl::Gen(decl) = &unit.decls[0] else {
        panic!("expected gen decl");
    };
    let Spec::Value(spec) = &decl.specs[0] else {
        panic!("expected value spec");
    };
    match &spec.values[0] {
        Expr::Composite {
            ty: Some(ty),
            elements,
            multiline,
            ..
        } => {
            assert!(matches!(ty.as_ref(), Expr::Type(_)));
            assert_eq!(elements.len(), 2);
            assert!(elements.iter().all(|e| e.key.is_some()));
            assert!(*multiline);
        }
        other => panic!("expected composite literal, got {other:?}"),
    }

    let Decl::Gen(decl) = &unit.decls[1] else {
        panic!("expected gen decl");
    };
    let Spec::Value(spec) = &decl.specs[0] else {
        panic!("expected value spec");
    };
    match &spec.values[0] {
        Expr::FuncLit { body, .. } => assert_eq!(body.text, "{ return x * 2 }"),
        other => panic!("expected func literal, got {other:?}"),
    }
}

#[test]
fn parse_imports_with_names() {
    let unit = parse("package p\n\nimport (\n\tf \"fmt\"\n\t_ \"embed\"\n\t. \"strings\"\n)\n");
    let Decl::Gen(decl) = &unit.decls[0] else {
        panic!("expected gen decl");
    };
    let names: Vec<String> = decl
        .specs
        .iter()
        .map(|spec| match spec {
            Spec::Import(import) => import
                .name
                .as_ref()
                .map(|n| n.name.clone())
                .unwrap_or_default(),
            other => panic!("expected import, got {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["f", "_", "."]);
}

#[test]
fn parse_error_reports_line_and_column() {
    let err = parse_source_file("bad.go", "package p\n\ntype T map[string\n".to_string())
        .expect_err("must fail");
    assert_eq!(err.file, "bad.go");
    assert_eq!(err.position.line, 2);
    assert!(err.message.starts_with("expected ']'"), "{}", err.message);
}

#[test]
fn parse_skips_leading_byte_order_mark() {
    let unit = parse("\u{feff}package p\n\ntype T map[int]bool\n");
    assert_eq!(unit.package.name, "p");
    assert_eq!(unit.decls.len(), 1);

    let err = parse_source_file("bom.go", "\u{feff}package p\n\ntype T @\n".to_string())
        .expect_err("must fail");
    assert_eq!(err.position.line, 2);
    assert_eq!(err.position.column, 7);
}
