use super::*;
use crate::ast::{Decl, Expr, Spec, TypeExpr};
use keyshim_scanner::SyntaxKind;

fn parse_value(expr: &str) -> Expr {
    let source = format!("package p\n\nvar x = {expr}\n");
    let unit = parse_source_file("test.go", source).expect("source should parse");
    let Some(Decl::Gen(decl)) = unit.decls.into_iter().next() else {
        panic!("expected gen decl");
    };
    let Some(Spec::Value(spec)) = decl.specs.into_iter().next() else {
        panic!("expected value spec");
    };
    spec.values.into_iter().next().expect("one value")
}

#[test]
fn binary_precedence_groups_multiplication_first() {
    let Expr::Binary { op, right, .. } = parse_value("1 + 2*3") else {
        panic!("expected binary");
    };
    assert_eq!(op, SyntaxKind::PlusToken);
    assert!(matches!(*right, Expr::Binary { op: SyntaxKind::AsteriskToken, .. }));
}

#[test]
fn binary_operators_are_left_associative() {
    let Expr::Binary { left, .. } = parse_value("a - b - c") else {
        panic!("expected binary");
    };
    assert!(matches!(*left, Expr::Binary { op: SyntaxKind::MinusToken, .. }));
}

#[test]
fn unary_and_receive_operators() {
    assert!(matches!(parse_value("-x"), Expr::Unary { op: SyntaxKind::MinusToken, .. }));
    assert!(matches!(
        parse_value("<-ch"),
        Expr::Unary {
            op: SyntaxKind::LessThanMinusToken,
            ..
        }
    ));
    assert!(matches!(parse_value("&T{}"), Expr::Unary { op: SyntaxKind::AmpersandToken, .. }));
}

#[test]
fn call_with_type_argument_and_spread() {
    let Expr::Call { args, ellipsis, .. } = parse_value("append(make([]int, 0, 4), xs...)") else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
    assert!(ellipsis);
    let Expr::Call { args: make_args, .. } = &args[0] else {
        panic!("expected nested call");
    };
    assert!(matches!(&make_args[0], Expr::Type(ty) if matches!(**ty, TypeExpr::Slice { .. })));
}

#[test]
fn selector_index_slice_and_assertion() {
    assert!(matches!(parse_value("pkg.Value"), Expr::Selector { .. }));
    assert!(matches!(parse_value("xs[1]"), Expr::Index { .. }));
    assert!(matches!(
        parse_value("xs[1:]"),
        Expr::Slice { high: None, max: None, .. }
    ));
    assert!(matches!(parse_value("xs[:2:3]"), Expr::Slice { low: None, .. }));
    assert!(matches!(parse_value("v.(fmt.Stringer)"), Expr::TypeAssert { .. }));
}

#[test]
fn composite_literal_single_line_and_elided_types() {
    let Expr::Composite {
        elements,
        multiline,
        ..
    } = parse_value("[]Point{{1, 2}, {3, 4}}")
    else {
        panic!("expected composite");
    };
    assert!(!multiline);
    assert_eq!(elements.len(), 2);
    assert!(matches!(elements[0].value, Expr::Composite { ty: None, .. }));
}

#[test]
fn generic_instantiation_in_composite_literal() {
    let Expr::Composite { ty: Some(ty), .. } = parse_value("Pair[string, int]{}") else {
        panic!("expected composite");
    };
    let Expr::Index { indices, .. } = *ty else {
        panic!("expected index");
    };
    assert_eq!(indices.len(), 2);
}

#[test]
fn func_literal_body_keeps_text_and_statements() {
    let Expr::FuncLit { signature, body, .. } =
        parse_value("func(m map[string]int) bool { return len(m) > 0 }")
    else {
        panic!("expected func literal");
    };
    assert_eq!(signature.params.len(), 1);
    assert_eq!(body.text, "{ return len(m) > 0 }");
    assert_eq!(body.block.stmts.len(), 1);
}

#[test]
fn tilde_is_a_unary_operator() {
    assert!(matches!(parse_value("~x"), Expr::Unary { op: SyntaxKind::TildeToken, .. }));
}

#[test]
fn missing_operand_reports_found_token() {
    let err = parse_source_file("test.go", "package p\nvar x = )\n".to_string())
        .expect_err("must fail");
    assert_eq!(err.message, "expected operand, found ')'");
}
