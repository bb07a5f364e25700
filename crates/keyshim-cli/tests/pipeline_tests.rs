//! End-to-end runs of the keyshim pipeline in a scratch Go module.

use std::path::{Path, PathBuf};

use clap::Parser;
use keyshim::args::CliArgs;
use keyshim::config::{ResolvedOptions, find_config, resolve_options};
use keyshim::driver::{ErrorClass, run};
use keyshim::layout::Layout;
use tempfile::TempDir;

const MODELS: &str = r#"package models

import (
	"time"

	"github.com/google/uuid"
)

// User is a user.
type User struct {
	ID    uuid.UUID         `json:"id"`
	Tags  map[int]string    `json:"tags"`
	Seen  map[string]time.Time
	Index map[uuid.UUID]int `json:"index,omitempty"`
}

type ByHash map[[16]byte]string

var Lookup = map[int]string{
	1: "one",
	2: "two",
}

const Answer = 42

func (u *User) Name() string {
	return "user"
}
"#;

const MODELS_SHIM: &str = r#"package models

type User struct {
	ID    uuid.UUID         `json:"id"`
	Tags  map[string]string `json:"tags"`
	Seen  map[string]time.Time
	Index map[string.UUID]int `json:"index,omitempty"`
}

type ByHash map[[16]string]string

var Lookup = map[string]string{
	1: "one",
	2: "two",
}

const Answer = 42
"#;

fn module() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("go.mod"), "module example.com/app\n\ngo 1.22\n")
        .expect("write go.mod");
    dir
}

fn write(dir: &Path, rel: &str, text: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dir");
    }
    std::fs::write(path, text).expect("write file");
}

fn options_for(dir: &Path, flags: &[&str]) -> ResolvedOptions {
    let mut argv = vec!["keyshim"];
    argv.extend_from_slice(flags);
    argv.push("input.go");
    let args = CliArgs::try_parse_from(argv).expect("args");
    let config = find_config(dir, args.config.as_deref()).expect("config");
    resolve_options(config.as_ref(), &args)
}

#[test]
fn converts_single_map_type() {
    let dir = module();
    write(dir.path(), "p/t.go", "package p\n\ntype T map[int]bool\n");

    let output = run(Path::new("p/t.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    let written = std::fs::read_to_string(dir.path().join("types/p/t.go")).expect("shim");
    assert_eq!(written, "package p\n\ntype T map[string]bool\n");
    assert_eq!(output.text, written);
}

#[test]
fn converts_realistic_models_file() {
    let dir = module();
    write(dir.path(), "pkg/models/user.go", MODELS);

    let output =
        run(Path::new("pkg/models/user.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    assert_eq!(output.text, MODELS_SHIM);
    assert_eq!(output.declarations, 4);
    let originals: Vec<&str> = output.rewrites.iter().map(|r| r.original.as_str()).collect();
    assert_eq!(originals, vec!["int", "uuid", "byte", "int"]);
}

#[test]
fn syntax_error_writes_nothing() {
    let dir = module();
    write(dir.path(), "p/bad.go", "package p\n\ntype T struct {\n");

    let err = run(Path::new("p/bad.go"), &ResolvedOptions::default(), dir.path())
        .expect_err("syntax error");
    assert_eq!(err.class(), ErrorClass::Parse);
    assert!(!dir.path().join("types").exists());
}

#[test]
fn syntax_error_keeps_existing_output() {
    let dir = module();
    write(dir.path(), "p/t.go", "package p\n\ntype T map[int]bool\n");
    run(Path::new("p/t.go"), &ResolvedOptions::default(), dir.path()).expect("first run");

    write(dir.path(), "p/t.go", "package p\n\ntype T map[int\n");
    let err = run(Path::new("p/t.go"), &ResolvedOptions::default(), dir.path())
        .expect_err("syntax error");
    assert_eq!(err.class(), ErrorClass::Parse);
    let kept = std::fs::read_to_string(dir.path().join("types/p/t.go")).expect("shim");
    assert_eq!(kept, "package p\n\ntype T map[string]bool\n");
}

#[test]
fn running_twice_gives_identical_output() {
    let dir = module();
    write(dir.path(), "pkg/models/user.go", MODELS);
    let shim = dir.path().join("types/pkg/models/user.go");

    run(Path::new("pkg/models/user.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    let first = std::fs::read(&shim).expect("shim");
    run(Path::new("pkg/models/user.go"), &ResolvedOptions::default(), dir.path()).expect("rerun");
    let second = std::fs::read(&shim).expect("shim");
    assert_eq!(first, second);
    assert_eq!(first, MODELS_SHIM.as_bytes());
}

#[test]
fn longer_existing_output_is_truncated() {
    let dir = module();
    write(dir.path(), "p/t.go", "package p\n\ntype T map[int]bool\n");
    let stale = format!("package p\n\n{}", "type Old map[string]int\n".repeat(20));
    write(dir.path(), "types/p/t.go", &stale);

    run(Path::new("p/t.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    let written = std::fs::read_to_string(dir.path().join("types/p/t.go")).expect("shim");
    assert_eq!(written, "package p\n\ntype T map[string]bool\n");
}

#[test]
fn out_root_of_the_input_tree_is_refused() {
    let dir = module();
    let source = "package p\n\ntype T map[int]bool\n";
    write(dir.path(), "p/t.go", source);

    let mut empty_root = ResolvedOptions::default();
    empty_root.layout.out_root = PathBuf::new();
    for options in [options_for(dir.path(), &["--out-root", "."]), empty_root] {
        let err = run(Path::new("p/t.go"), &options, dir.path()).expect_err("same file");
        assert_eq!(err.class(), ErrorClass::Usage);
        let kept = std::fs::read_to_string(dir.path().join("p/t.go")).expect("input");
        assert_eq!(kept, source);
    }
}

#[test]
fn running_on_a_shim_changes_nothing() {
    let dir = module();
    write(dir.path(), "pkg/models/user.go", MODELS);
    let first =
        run(Path::new("pkg/models/user.go"), &ResolvedOptions::default(), dir.path()).expect("run");

    let second = run(Path::new("types/pkg/models/user.go"), &ResolvedOptions::default(), dir.path())
        .expect("second run");
    assert_eq!(second.text, first.text);
    assert!(second.rewrites.is_empty());
}

#[test]
fn output_path_depends_only_on_input_path() {
    let dir = module();
    write(dir.path(), "a/b/one.go", "package b\n\ntype A map[int]int\n");
    write(dir.path(), "a/b/two.go", "package b\n\nvar V = 1\n");

    let one = run(Path::new("a/b/one.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    let two = run(Path::new("a/b/two.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    assert_eq!(one.target.dir, two.target.dir);
    assert_eq!(one.path, PathBuf::from("types/a/b/one.go"));
    assert_eq!(two.path, PathBuf::from("types/a/b/two.go"));
}

#[test]
fn prints_cue_script_for_output_package() {
    let dir = module();
    write(dir.path(), "api/v1/types.go", "package v1\n\ntype M map[int]int\n");

    let output =
        run(Path::new("api/v1/types.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    assert_eq!(
        output.script.as_deref(),
        Some(
            "\n# Init cue.mod if not setup yet\n\
             if [[ ! -d cue.mod ]]; then\n    cue mod init example.com/app\nfi\n\
             # Generate cue type defs\n\
             cue get go example.com/app/types/api/v1\n"
        )
    );
}

#[test]
fn sibling_and_same_dir_layouts_rename_package() {
    let dir = module();
    write(dir.path(), "store/kv.go", "package store\n\ntype KV map[int64][]byte\n");

    let sibling = options_for(dir.path(), &["--layout", "sibling"]);
    let output = run(Path::new("store/kv.go"), &sibling, dir.path()).expect("sibling run");
    assert_eq!(output.path, PathBuf::from("store_shim/kv.go"));
    assert_eq!(output.text, "package store_shim\n\ntype KV map[string][]byte\n");

    let same_dir = options_for(dir.path(), &["--layout", "same-dir", "--suffix", "_cue"]);
    let output = run(Path::new("store/kv.go"), &same_dir, dir.path()).expect("same-dir run");
    assert_eq!(output.path, PathBuf::from("store/kv_cue.go"));
    assert!(output.text.starts_with("package store_cue\n"));
}

#[test]
fn config_file_applies_below_flags() {
    let dir = module();
    write(
        dir.path(),
        "keyshim.json",
        r#"{"outRoot": "gen", "emitScript": false, "layout": "sibling"}"#,
    );
    write(dir.path(), "p/t.go", "package p\n\ntype T map[int]bool\n");

    let options = options_for(dir.path(), &["--layout", "mirror"]);
    assert_eq!(options.layout.layout, Layout::Mirror);
    let output = run(Path::new("p/t.go"), &options, dir.path()).expect("run");
    assert_eq!(output.path, PathBuf::from("gen/p/t.go"));
    assert_eq!(output.script, None);
}

#[test]
fn parallel_run_matches_sequential() {
    let dir = module();
    write(dir.path(), "pkg/models/user.go", MODELS);

    let sequential =
        run(Path::new("pkg/models/user.go"), &ResolvedOptions::default(), dir.path()).expect("run");
    let parallel_options = ResolvedOptions {
        parallel: true,
        ..ResolvedOptions::default()
    };
    let parallel =
        run(Path::new("pkg/models/user.go"), &parallel_options, dir.path()).expect("parallel run");
    assert_eq!(parallel.text, sequential.text);
    assert_eq!(parallel.rewrites, sequential.rewrites);
}

#[test]
fn missing_go_mod_is_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "t.go", "package p\n\ntype T map[int]bool\n");

    let err = run(Path::new("t.go"), &ResolvedOptions::default(), dir.path())
        .expect_err("not a module root");
    assert_eq!(err.class(), ErrorClass::Usage);
    assert!(!dir.path().join("types").exists());
}

#[test]
fn non_go_input_is_refused() {
    let dir = module();
    write(dir.path(), "t.cue", "package p\n");

    let err = run(Path::new("t.cue"), &ResolvedOptions::default(), dir.path())
        .expect_err("not go");
    assert_eq!(err.class(), ErrorClass::Usage);
}
