//! Output path derivation.
//!
//! Where the shim goes, and what its package is called, depends only on the
//! input path and the configured [`Layout`]; file contents are never read.
//!
//! | layout     | `pkg/models/user.go` becomes       | package          |
//! |------------|------------------------------------|------------------|
//! | `mirror`   | `types/pkg/models/user.go`         | unchanged        |
//! | `sibling`  | `pkg/models_shim/user.go`          | `<name>_shim`    |
//! | `same-dir` | `pkg/models/user_shim.go`          | `<name>_shim`    |

use std::path::{Component, Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

pub const DEFAULT_OUT_ROOT: &str = "types";
pub const DEFAULT_SUFFIX: &str = "_shim";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Mirror the input directory under an output root.
    #[default]
    Mirror,
    /// Suffixed directory next to the input directory.
    Sibling,
    /// Suffixed file in the input directory.
    SameDir,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Mirror => "mirror",
            Layout::Sibling => "sibling",
            Layout::SameDir => "same-dir",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    pub layout: Layout,
    /// Output root of the `mirror` layout.
    pub out_root: PathBuf,
    /// Directory, file and package suffix of the other layouts.
    pub suffix: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            layout: Layout::default(),
            out_root: PathBuf::from(DEFAULT_OUT_ROOT),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// How the shim's package clause is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageName {
    /// Same package name as the input file.
    Unchanged,
    /// Input package name followed by a suffix.
    Suffixed(String),
}

impl PackageName {
    pub fn apply(&self, package: &str) -> String {
        match self {
            PackageName::Unchanged => package.to_string(),
            PackageName::Suffixed(suffix) => format!("{package}{suffix}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub file_name: String,
    pub package: PackageName,
}

impl OutputTarget {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("input path {} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error("input path {} is not valid UTF-8", .0.display())]
    NonUtf8(PathBuf),
    #[error("cannot mirror `..` in input path {}", .0.display())]
    ParentComponent(PathBuf),
    #[error("input directory of {} has no name to suffix", .0.display())]
    NoSiblingDir(PathBuf),
    #[error("suffix `{0}` must consist of letters, digits and underscores")]
    InvalidSuffix(String),
    #[error("output path for {} is the input file itself", .0.display())]
    OverwritesInput(PathBuf),
}

/// Compute where the shim for `input` is written.
pub fn derive_target(input: &Path, options: &LayoutOptions) -> Result<OutputTarget, LayoutError> {
    let file_name = input
        .file_name()
        .ok_or_else(|| LayoutError::NoFileName(input.to_path_buf()))?
        .to_str()
        .ok_or_else(|| LayoutError::NonUtf8(input.to_path_buf()))?
        .to_string();
    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    let target = match options.layout {
        Layout::Mirror => OutputTarget {
            dir: mirror_dir(input, parent, &options.out_root)?,
            file_name,
            package: PackageName::Unchanged,
        },
        Layout::Sibling => {
            let suffix = checked_suffix(&options.suffix)?;
            OutputTarget {
                dir: sibling_dir(input, parent, suffix)?,
                file_name,
                package: PackageName::Suffixed(suffix.to_string()),
            }
        }
        Layout::SameDir => {
            let suffix = checked_suffix(&options.suffix)?;
            let stem = file_name.strip_suffix(".go").unwrap_or(&file_name);
            OutputTarget {
                dir: strip_cur_dir(parent),
                file_name: format!("{stem}{suffix}.go"),
                package: PackageName::Suffixed(suffix.to_string()),
            }
        }
    };

    if lexical_path(&target.path()) == lexical_path(input) {
        return Err(LayoutError::OverwritesInput(input.to_path_buf()));
    }
    Ok(target)
}

/// `path` with `.` dropped and `..` applied to the preceding name.
fn lexical_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// `root` followed by the normal components of `parent`.
fn mirror_dir(input: &Path, parent: &Path, root: &Path) -> Result<PathBuf, LayoutError> {
    let mut dir = root.to_path_buf();
    for component in parent.components() {
        match component {
            Component::Normal(part) => dir.push(part),
            Component::ParentDir => return Err(LayoutError::ParentComponent(input.to_path_buf())),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Ok(dir)
}

fn sibling_dir(input: &Path, parent: &Path, suffix: &str) -> Result<PathBuf, LayoutError> {
    let parent = strip_cur_dir(parent);
    if parent.as_os_str().is_empty() {
        let name = suffix.trim_start_matches('_');
        if name.is_empty() {
            return Err(LayoutError::InvalidSuffix(suffix.to_string()));
        }
        return Ok(PathBuf::from(name));
    }
    match parent.components().next_back() {
        Some(Component::Normal(name)) => {
            let mut sibling = name.to_os_string();
            sibling.push(suffix);
            Ok(parent.with_file_name(sibling))
        }
        _ => Err(LayoutError::NoSiblingDir(input.to_path_buf())),
    }
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| *component != Component::CurDir)
        .collect()
}

/// The suffix ends up in a package name, so it must be identifier text.
fn checked_suffix(suffix: &str) -> Result<&str, LayoutError> {
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(LayoutError::InvalidSuffix(suffix.to_string()));
    }
    Ok(suffix)
}

/// Go import path of `dir` inside `module`, with `/` separators.
pub fn import_path(module: &str, dir: &Path) -> String {
    let mut path = module.trim_end_matches('/').to_string();
    for component in dir.components() {
        if let Component::Normal(part) = component {
            path.push('/');
            path.push_str(&part.to_string_lossy());
        }
    }
    path
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod layout_tests;
