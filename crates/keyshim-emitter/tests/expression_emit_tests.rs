//! Parse-then-render tests for value expressions.
use keyshim_emitter::render_decl;
use keyshim_parser::{Decl, parse_source_file};

fn render(decl_source: &str) -> String {
    let unit = parse_source_file("input.go", format!("package p\n\n{decl_source}\n"))
        .expect("source should parse");
    let Some(Decl::Gen(decl)) = unit.decls.first() else {
        panic!("expected a declaration");
    };
    render_decl(decl).expect("declaration should render")
}

/// Render `var v = <expr>` and return the expression part.
fn expr(source: &str) -> String {
    let text = render(&format!("var v = {source}"));
    text.strip_prefix("var v = ")
        .expect("rendered var prefix")
        .to_string()
}

#[test]
fn binary_spacing_follows_precedence() {
    assert_eq!(expr("x + y*z"), "x + y*z");
    assert_eq!(expr("x+y*z"), "x + y*z");
    assert_eq!(expr("a*b + c*d"), "a*b + c*d");
    assert_eq!(expr("x<<8 | y"), "x<<8 | y");
    assert_eq!(expr("a + b + c"), "a + b + c");
    assert_eq!(expr("1 << 10"), "1 << 10");
    assert_eq!(expr("!ok && x == y"), "!ok && x == y");
}

#[test]
fn parenthesized_operands() {
    assert_eq!(expr("(x + y) * z"), "(x + y) * z");
    assert_eq!(expr("((x))"), "(x)");
}

#[test]
fn nested_operands_drop_blanks() {
    assert_eq!(expr("f(a + b, c)"), "f(a+b, c)");
    assert_eq!(expr("f(a + b)"), "f(a + b)");
    assert_eq!(expr("xs[i + 1]"), "xs[i+1]");
}

#[test]
fn operators_that_would_merge_keep_blanks() {
    assert_eq!(expr("- -x"), "- -x");
    assert_eq!(expr("a - -b"), "a - -b");
    assert_eq!(expr("f(a - -b, c)"), "f(a - -b, c)");
    assert_eq!(expr("a / *p"), "a / *p");
    assert_eq!(expr("& &x"), "& &x");
}

#[test]
fn unary_and_receive() {
    assert_eq!(expr("-x"), "-x");
    assert_eq!(expr("&Config{}"), "&Config{}");
    assert_eq!(expr("<-ch"), "<-ch");
    assert_eq!(expr("*p"), "*p");
}

#[test]
fn slices_and_indices() {
    assert_eq!(expr("s[1:]"), "s[1:]");
    assert_eq!(expr("s[:n]"), "s[:n]");
    assert_eq!(expr("s[a+b : c]"), "s[a+b : c]");
    assert_eq!(expr("f(s[a+b : c], d)"), "f(s[a+b:c], d)");
    assert_eq!(expr("s[i:j:k]"), "s[i:j:k]");
    assert_eq!(expr("m[k]"), "m[k]");
}

#[test]
fn selectors_assertions_and_calls() {
    assert_eq!(expr("x.(fmt.Stringer)"), "x.(fmt.Stringer)");
    assert_eq!(expr("os.Getenv(\"HOME\")"), "os.Getenv(\"HOME\")");
    assert_eq!(expr("append(a, b...)"), "append(a, b...)");
    assert_eq!(expr("New[int, string]()"), "New[int, string]()");
    assert_eq!(expr("make(chan int, 4)"), "make(chan int, 4)");
    assert_eq!(expr("[]byte(s)"), "[]byte(s)");
}

#[test]
fn single_line_composite_literals() {
    assert_eq!(expr("[]int{1,2,3}"), "[]int{1, 2, 3}");
    assert_eq!(expr("map[string]int{\"a\":1}"), "map[string]int{\"a\": 1}");
    assert_eq!(expr("[][]int{{1, 2}, {3}}"), "[][]int{{1, 2}, {3}}");
    assert_eq!(expr("Point{}"), "Point{}");
    assert_eq!(expr("pkg.Pair[int, bool]{}"), "pkg.Pair[int, bool]{}");
}

#[test]
fn multiline_composite_aligns_values() {
    let source = "var m = map[string]int{\n\t\"a\": 1,\n\t\"bbb\": 2,\n}";
    let want = "var m = map[string]int{\n\t\"a\":   1,\n\t\"bbb\": 2,\n}";
    assert_eq!(render(source), want);
}

#[test]
fn multiline_composite_without_trailing_comma_gets_one() {
    let source = "var xs = []string{\n\t\"a\",\n\t\"b\"}";
    assert_eq!(render(source), "var xs = []string{\n\t\"a\",\n\t\"b\",\n}");
}

#[test]
fn outsized_key_starts_a_new_alignment_section() {
    let long_key = "\"a_key_that_is_much_longer_than_forty_bytes_in_size\"";
    let source = format!("var m = map[string]int{{\n\t\"x\": 1,\n\t\"yy\": 2,\n\t{long_key}: 3,\n}}");
    let want = format!("var m = map[string]int{{\n\t\"x\":  1,\n\t\"yy\": 2,\n\t{long_key}: 3,\n}}");
    assert_eq!(render(&source), want);
}

#[test]
fn multiline_value_is_not_aligned() {
    let source = "var cfg = Config{\n\
                  \tName: \"x\",\n\
                  \tOpts: Options{\n\
                  \t\tDebug: true,\n\
                  \t},\n\
                  }";
    assert_eq!(render(source), source);
}

#[test]
fn func_literal_body_is_verbatim() {
    assert_eq!(
        expr("func(x int) int { return x  *  2 }"),
        "func(x int) int { return x  *  2 }"
    );
    let source = "var handler = func(w int) {\n\tuse(w)\n}";
    assert_eq!(render(source), source);
}

#[test]
fn string_literals_are_kept_as_written() {
    assert_eq!(expr("`raw\ttext`"), "`raw\ttext`");
    assert_eq!(expr("\"tab\\tescape\""), "\"tab\\tescape\"");
    assert_eq!(expr("'x'"), "'x'");
    assert_eq!(expr("0x1F"), "0x1F");
}
