use super::*;
use keyshim_emitter::render_decl;
use keyshim_parser::{Decl, parse_source_file};

fn first_decl(decl_source: &str) -> GenDecl {
    let unit = parse_source_file("input.go", format!("package p\n\n{decl_source}\n"))
        .expect("source should parse");
    match unit.decls.into_iter().next() {
        Some(Decl::Gen(decl)) => decl,
        other => panic!("expected gen decl, got {other:?}"),
    }
}

/// Normalize a declaration and render the result.
fn normalize(decl_source: &str) -> (String, Vec<KeyRewrite>) {
    let normalized = normalize_decl(&first_decl(decl_source));
    let text = render_decl(&normalized.decl).expect("declaration should render");
    (text, normalized.rewrites)
}

fn originals(rewrites: &[KeyRewrite]) -> Vec<&str> {
    rewrites.iter().map(|r| r.original.as_str()).collect()
}

#[test]
fn rewrites_plain_map_key() {
    let (text, rewrites) = normalize("type Set map[int]bool");
    assert_eq!(text, "type Set map[string]bool");
    assert_eq!(originals(&rewrites), vec!["int"]);
}

#[test]
fn rewrites_array_key_element() {
    let (text, _) = normalize("type ByHash map[[16]byte]string");
    assert_eq!(text, "type ByHash map[[16]string]string");
}

#[test]
fn rewrites_package_of_qualified_key() {
    let (text, rewrites) = normalize("type Index map[uuid.UUID]int");
    assert_eq!(text, "type Index map[string.UUID]int");
    assert!(!rewrites[0].at_key);
}

#[test]
fn rewrites_inside_struct_key() {
    let (text, _) = normalize("type Grid map[struct{ X, Y int }]Cell");
    assert_eq!(text, "type Grid map[struct{ X, Y string }]Cell");
}

#[test]
fn empty_struct_key_is_left_alone() {
    let (text, rewrites) = normalize("type Seen map[struct{}]bool");
    assert_eq!(text, "type Seen map[struct{}]bool");
    assert!(rewrites.is_empty());
}

#[test]
fn string_keys_are_not_recorded() {
    let (text, rewrites) = normalize("type Names map[string]int");
    assert_eq!(text, "type Names map[string]int");
    assert!(rewrites.is_empty());
}

#[test]
fn nested_value_maps_are_rewritten_independently() {
    let (text, rewrites) = normalize("type Graph map[int]map[Node]float64");
    assert_eq!(text, "type Graph map[string]map[string]float64");
    assert_eq!(originals(&rewrites), vec!["int", "Node"]);
}

#[test]
fn map_inside_a_key_is_left_to_the_key_rewrite() {
    let (text, rewrites) = normalize("type Odd map[[2]map[int]bool]int");
    assert_eq!(text, "type Odd map[[2]map[string]bool]int");
    assert_eq!(rewrites.len(), 1);
}

#[test]
fn rewrites_maps_in_struct_fields_and_signatures() {
    let (text, rewrites) = normalize(
        "type Store struct {\n\tByID map[int64]*Item\n\tOnEvict func(map[uint]bool) error\n}",
    );
    assert_eq!(
        text,
        "type Store struct {\n\tByID    map[string]*Item\n\tOnEvict func(map[string]bool) error\n}"
    );
    assert_eq!(originals(&rewrites), vec!["int64", "uint"]);
}

#[test]
fn rewrites_maps_in_values() {
    let (text, _) = normalize("var seen = map[int]bool{}");
    assert_eq!(text, "var seen = map[string]bool{}");

    let (text, _) = normalize("var f = func(m map[rune]int) {}");
    assert_eq!(text, "var f = func(m map[string]int) {}");

    let (text, _) = normalize("var n = make(map[Key][]int, 8)");
    assert_eq!(text, "var n = make(map[string][]int, 8)");
}

#[test]
fn rewrites_maps_inside_func_literal_bodies() {
    let (text, rewrites) = normalize("var f = func() { _ = map[int]int{} }");
    assert_eq!(text, "var f = func() { _ = map[string]int{} }");
    assert_eq!(originals(&rewrites), vec!["int"]);

    let (text, rewrites) = normalize(
        "var g = func(xs []int) {\n\tvar idx map[pkg.ID]bool\n\tfor _, x := range xs {\n\t\tm := make(map[int]map[rune]int)\n\t\t_, _ = idx, m[x]\n\t}\n}",
    );
    assert_eq!(
        text,
        "var g = func(xs []int) {\n\tvar idx map[string.ID]bool\n\tfor _, x := range xs {\n\t\tm := make(map[string]map[string]int)\n\t\t_, _ = idx, m[x]\n\t}\n}"
    );
    assert_eq!(originals(&rewrites), vec!["pkg", "int", "rune"]);
}

#[test]
fn nested_func_literal_bodies_are_rewritten_once() {
    let (text, rewrites) =
        normalize("var f = func() func() {\n\treturn func() { _ = map[int8]int{} }\n}");
    assert_eq!(
        text,
        "var f = func() func() {\n\treturn func() { _ = map[string]int{} }\n}"
    );
    assert_eq!(originals(&rewrites), vec!["int8"]);
}

#[test]
fn func_literal_body_tree_matches_text() {
    let normalized = normalize_decl(&first_decl("var f = func() { _ = map[int]int{} }"));
    let Spec::Value(spec) = &normalized.decl.specs[0] else {
        panic!("expected value spec");
    };
    let Expr::FuncLit { body, .. } = &spec.values[0] else {
        panic!("expected func literal");
    };
    let Stmt::Assign { rhs, .. } = &body.block.stmts[0] else {
        panic!("expected assignment");
    };
    let Expr::Composite { ty: Some(ty), .. } = &rhs[0] else {
        panic!("expected composite literal");
    };
    let Expr::Type(ty) = ty.as_ref() else {
        panic!("expected map type");
    };
    let TypeExpr::Map { key, .. } = ty.as_ref() else {
        panic!("expected map type");
    };
    assert!(matches!(key.as_ref(), TypeExpr::Name(ident) if ident.name == "string"));
}

#[test]
fn rewrites_maps_in_type_parameters_and_groups() {
    let (text, _) = normalize("type Lookup[V any] map[int]V");
    assert_eq!(text, "type Lookup[V any] map[string]V");

    let (text, rewrites) = normalize("var (\n\ta map[int]int\n\tb map[byte]int\n)");
    assert_eq!(text, "var (\n\ta map[string]int\n\tb map[string]int\n)");
    assert_eq!(originals(&rewrites), vec!["int", "byte"]);
}

#[test]
fn input_declaration_is_not_modified() {
    let decl = first_decl("type Set map[int]bool");
    let before = decl.clone();
    let normalized = normalize_decl(&decl);
    assert_eq!(decl, before);
    assert_ne!(normalized.decl, decl);
}

#[test]
fn normalizer_counts_maps() {
    let decl = first_decl("type T struct {\n\tA map[string]int\n\tB map[int]int\n}");
    let mut normalizer = MapKeyNormalizer::new();
    normalizer.normalize_decl(&decl);
    assert_eq!(normalizer.maps_seen(), 2);
    assert_eq!(normalizer.rewrites().len(), 1);
}
