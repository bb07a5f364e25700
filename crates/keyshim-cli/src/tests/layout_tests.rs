use super::*;

fn options(layout: Layout) -> LayoutOptions {
    LayoutOptions {
        layout,
        ..LayoutOptions::default()
    }
}

#[test]
fn mirror_keeps_relative_directory_under_root() {
    let target = derive_target(Path::new("pkg/models/user.go"), &options(Layout::Mirror))
        .expect("mirror target");
    assert_eq!(target.dir, PathBuf::from("types/pkg/models"));
    assert_eq!(target.file_name, "user.go");
    assert_eq!(target.package, PackageName::Unchanged);
    assert_eq!(target.path(), PathBuf::from("types/pkg/models/user.go"));
}

#[test]
fn mirror_of_file_in_working_directory() {
    let target =
        derive_target(Path::new("./user.go"), &options(Layout::Mirror)).expect("mirror target");
    assert_eq!(target.path(), PathBuf::from("types/user.go"));
}

#[test]
fn mirror_uses_configured_root() {
    let opts = LayoutOptions {
        out_root: PathBuf::from("gen/cue"),
        ..LayoutOptions::default()
    };
    let target = derive_target(Path::new("api/v1/types.go"), &opts).expect("mirror target");
    assert_eq!(target.path(), PathBuf::from("gen/cue/api/v1/types.go"));
}

#[test]
fn mirror_rejects_parent_components() {
    let err = derive_target(Path::new("../other/user.go"), &options(Layout::Mirror))
        .expect_err("parent dir cannot be mirrored");
    assert!(matches!(err, LayoutError::ParentComponent(_)));
}

#[test]
fn mirror_into_the_input_tree_is_rejected() {
    for root in [".", "", "./pkg/.."] {
        let opts = LayoutOptions {
            out_root: PathBuf::from(root),
            ..LayoutOptions::default()
        };
        let err = derive_target(Path::new("pkg/models/user.go"), &opts)
            .expect_err("output must not replace the input");
        assert_eq!(
            err,
            LayoutError::OverwritesInput(PathBuf::from("pkg/models/user.go")),
            "out_root {root:?}"
        );
    }

    let opts = LayoutOptions {
        out_root: PathBuf::from("."),
        ..LayoutOptions::default()
    };
    let err = derive_target(Path::new("./user.go"), &opts).expect_err("same file");
    assert!(matches!(err, LayoutError::OverwritesInput(_)));
}

#[test]
fn mirror_under_a_subdirectory_of_the_input_is_allowed() {
    let opts = LayoutOptions {
        out_root: PathBuf::from("pkg"),
        ..LayoutOptions::default()
    };
    let target = derive_target(Path::new("pkg/user.go"), &opts).expect("nested root");
    assert_eq!(target.path(), PathBuf::from("pkg/pkg/user.go"));
}

#[test]
fn sibling_suffixes_the_input_directory() {
    let target = derive_target(Path::new("pkg/models/user.go"), &options(Layout::Sibling))
        .expect("sibling target");
    assert_eq!(target.path(), PathBuf::from("pkg/models_shim/user.go"));
    assert_eq!(target.package, PackageName::Suffixed("_shim".to_string()));
    assert_eq!(target.package.apply("models"), "models_shim");
}

#[test]
fn sibling_of_file_in_working_directory() {
    let target =
        derive_target(Path::new("user.go"), &options(Layout::Sibling)).expect("sibling target");
    assert_eq!(target.path(), PathBuf::from("shim/user.go"));
}

#[test]
fn same_dir_suffixes_the_file_name() {
    let target = derive_target(Path::new("./pkg/models/user.go"), &options(Layout::SameDir))
        .expect("same-dir target");
    assert_eq!(target.path(), PathBuf::from("pkg/models/user_shim.go"));
    assert_eq!(target.package.apply("models"), "models_shim");
}

#[test]
fn suffix_must_be_identifier_text() {
    let opts = LayoutOptions {
        layout: Layout::SameDir,
        suffix: "-shim".to_string(),
        ..LayoutOptions::default()
    };
    let err = derive_target(Path::new("user.go"), &opts).expect_err("invalid suffix");
    assert_eq!(err, LayoutError::InvalidSuffix("-shim".to_string()));
}

#[test]
fn derivation_is_deterministic() {
    let opts = options(Layout::Sibling);
    let first = derive_target(Path::new("a/b/c.go"), &opts).expect("target");
    let second = derive_target(Path::new("a/b/c.go"), &opts).expect("target");
    assert_eq!(first, second);
}

#[test]
fn layout_names() {
    assert_eq!(Layout::default(), Layout::Mirror);
    assert_eq!(Layout::SameDir.as_str(), "same-dir");
    assert_eq!(Layout::Sibling.as_str(), "sibling");
}

#[test]
fn import_path_joins_with_slashes() {
    assert_eq!(
        import_path("example.com/m", Path::new("types/pkg/models")),
        "example.com/m/types/pkg/models"
    );
    assert_eq!(import_path("example.com/m/", Path::new("./types")), "example.com/m/types");
    assert_eq!(import_path("example.com/m", Path::new("")), "example.com/m");
}
