//! Parse-then-render tests for whole declarations.
use keyshim_emitter::{EmitError, render_decl, render_file};
use keyshim_parser::{Decl, GenDecl, parse_source_file};

fn gen_decls(source: &str) -> Vec<GenDecl> {
    parse_source_file("input.go", source.to_string())
        .expect("source should parse")
        .decls
        .into_iter()
        .filter_map(|decl| match decl {
            Decl::Gen(gen_decl) => Some(gen_decl),
            Decl::Func(_) => None,
        })
        .collect()
}

fn render(decl_source: &str) -> String {
    let decls = gen_decls(&format!("package p\n\n{decl_source}\n"));
    render_decl(&decls[0]).expect("declaration should render")
}

/// Rendering gofmt-formatted input gives it back unchanged.
fn assert_stable(decl_source: &str) {
    assert_eq!(render(decl_source), decl_source);
}

#[test]
fn gofmt_formatted_declarations_are_stable() {
    assert_stable("type ID int64");
    assert_stable("type Alias = map[string]int");
    assert_stable("var Default = New()");
    assert_stable("const Pi = 3.14159");
    assert_stable("var x, y int = 1, 2");
    assert_stable("type Matrix [4][4]float64");
    assert_stable("type Bytes [...]byte");
}

#[test]
fn generic_type_declarations() {
    assert_stable("type Set[K comparable] map[K]struct{}");
    assert_stable("type Pair[K comparable, V any] struct {\n\tKey   K\n\tValue V\n}");
    assert_stable("type Number interface {\n\t~int | ~int64 | float64\n}");
    assert_stable("type List[T any] []T");
    assert_stable("type Cache = Store[string, []byte]");
}

#[test]
fn lone_pointer_type_parameter_keeps_trailing_comma() {
    assert_eq!(render("type Ptr[P *C,] struct{}"), "type Ptr[P *C,] struct{}");
    assert_eq!(render("type Ptr[P *C] struct{}"), "type Ptr[P *C,] struct{}");
    assert_eq!(render("type Ptr[P *[]int] struct{}"), "type Ptr[P *[]int] struct{}");
}

#[test]
fn reformats_loose_spacing() {
    assert_eq!(render("type   T   map[ string ] [ ]int"), "type T map[string][]int");
    assert_eq!(
        render("var (\n    a int\n    b string\n)"),
        "var (\n\ta int\n\tb string\n)"
    );
}

#[test]
fn struct_with_embedded_and_tagged_fields() {
    let source = "type Row struct {\n\
                  \tio.Reader\n\
                  \t*Base\n\
                  \tName string `json:\"name\"`\n\
                  \tAge, Height int\n\
                  }";
    let want = "type Row struct {\n\
                \tio.Reader\n\
                \t*Base\n\
                \tName        string `json:\"name\"`\n\
                \tAge, Height int\n\
                }";
    assert_eq!(render(source), want);
}

#[test]
fn nested_struct_breaks_alignment_sections() {
    let source = "type Outer struct {\n\
                  \tA int\n\
                  \tInner struct {\n\
                  \t\tX, Y float64\n\
                  \t}\n\
                  \tLongName string\n\
                  }";
    let want = "type Outer struct {\n\
                \tA     int\n\
                \tInner struct {\n\
                \t\tX, Y float64\n\
                \t}\n\
                \tLongName string\n\
                }";
    assert_eq!(render(source), want);
}

#[test]
fn interface_methods_and_embeddings() {
    assert_stable(
        "type ReadCloser interface {\n\tRead(p []byte) (n int, err error)\n\tio.Closer\n\tReset()\n}",
    );
}

#[test]
fn blank_lines_inside_groups_are_not_kept() {
    assert_eq!(
        render("const (\n\tA = 1\n\n\tB = 2\n)"),
        "const (\n\tA = 1\n\tB = 2\n)"
    );
}

#[test]
fn typed_constants_align_with_untyped_ones() {
    let source = "const (\n\tKB int64 = 1 << 10\n\tMaxItems = 100\n)";
    let want = "const (\n\tKB       int64 = 1 << 10\n\tMaxItems       = 100\n)";
    assert_eq!(render(source), want);
}

#[test]
fn import_blocks_are_refused() {
    let decls = gen_decls("package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n");
    assert!(matches!(
        render_decl(&decls[0]),
        Err(EmitError::UnsupportedDecl { keyword: "import", .. })
    ));
}

#[test]
fn render_file_layout() {
    let decls = gen_decls(
        "package src\n\ntype A struct {\n\tX int\n}\n\nvar (\n\tb = 1\n)\n",
    );
    assert_eq!(
        render_file("shim", &decls).expect("file should render"),
        "package shim\n\ntype A struct {\n\tX int\n}\n\nvar (\n\tb = 1\n)\n"
    );
}
