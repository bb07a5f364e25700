use super::*;
use clap::Parser;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["keyshim"];
    argv.extend_from_slice(extra);
    argv.push("models.go");
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn parses_full_config() {
    let config = parse_config(
        r#"{
            "layout": "same-dir",
            "outRoot": "gen",
            "suffix": "_cue",
            "checkModuleRoot": false,
            "emitScript": false,
            "parallel": true
        }"#,
    )
    .expect("config should parse");

    assert_eq!(config.layout, Some(Layout::SameDir));
    assert_eq!(config.out_root, Some(PathBuf::from("gen")));
    assert_eq!(config.suffix.as_deref(), Some("_cue"));
    assert_eq!(config.check_module_root, Some(false));
    assert_eq!(config.emit_script, Some(false));
    assert_eq!(config.parallel, Some(true));
}

#[test]
fn empty_config_is_all_defaults() {
    let config = parse_config("{}").expect("empty config");
    assert_eq!(config, ShimConfig::default());
    assert_eq!(resolve_options(Some(&config), &args(&[])), ResolvedOptions::default());
}

#[test]
fn rejects_unknown_fields() {
    assert!(parse_config(r#"{"outDir": "x"}"#).is_err());
    assert!(parse_config(r#"{"layout": "flat"}"#).is_err());
}

#[test]
fn defaults_without_config_or_flags() {
    let resolved = resolve_options(None, &args(&[]));
    assert_eq!(resolved.layout.layout, Layout::Mirror);
    assert_eq!(resolved.layout.out_root, PathBuf::from("types"));
    assert_eq!(resolved.layout.suffix, "_shim");
    assert!(resolved.check_module_root);
    assert!(resolved.emit_script);
    assert!(!resolved.parallel);
}

#[test]
fn flags_override_config() {
    let config = ShimConfig {
        layout: Some(Layout::Sibling),
        out_root: Some(PathBuf::from("gen")),
        suffix: Some("_cfg".to_string()),
        check_module_root: Some(false),
        emit_script: Some(true),
        parallel: None,
    };
    let resolved = resolve_options(
        Some(&config),
        &args(&["--layout", "same-dir", "--suffix", "_flag", "--no-script", "--parallel"]),
    );

    assert_eq!(resolved.layout.layout, Layout::SameDir);
    assert_eq!(resolved.layout.out_root, PathBuf::from("gen"));
    assert_eq!(resolved.layout.suffix, "_flag");
    assert!(!resolved.check_module_root);
    assert!(!resolved.emit_script);
    assert!(resolved.parallel);
}

#[test]
fn finds_config_in_working_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(find_config(dir.path(), None).expect("no config"), None);

    std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"parallel": true}"#)
        .expect("write config");
    let config = find_config(dir.path(), None)
        .expect("config loads")
        .expect("config present");
    assert_eq!(config.parallel, Some(true));
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = find_config(dir.path(), Some(Path::new("missing.json"))).expect_err("missing");
    assert!(err.to_string().contains("config file not found"));

    std::fs::write(dir.path().join("custom.json"), r#"{"layout": "sibling"}"#)
        .expect("write config");
    let config = find_config(dir.path(), Some(Path::new("custom.json")))
        .expect("config loads")
        .expect("config present");
    assert_eq!(config.layout, Some(Layout::Sibling));
}

#[test]
fn invalid_config_names_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").expect("write config");
    let err = find_config(dir.path(), None).expect_err("invalid json");
    assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
}
