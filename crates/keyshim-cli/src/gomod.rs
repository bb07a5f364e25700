//! `go.mod` handling: the module-root check and module path lookup.

use std::path::{Path, PathBuf};

pub const GO_MOD: &str = "go.mod";

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("must run at go module root: no go.mod in {}", .0.display())]
    NotModuleRoot(PathBuf),
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot resolve module name from {}", .0.display())]
    NoModulePath(PathBuf),
}

/// Path of the `go.mod` in `dir`, which must exist.
pub fn ensure_module_root(dir: &Path) -> Result<PathBuf, ModuleError> {
    let go_mod = dir.join(GO_MOD);
    if go_mod.is_file() {
        Ok(go_mod)
    } else {
        Err(ModuleError::NotModuleRoot(dir.to_path_buf()))
    }
}

/// Module path declared by the `go.mod` in `dir`.
pub fn resolve_module_name(dir: &Path) -> Result<String, ModuleError> {
    let go_mod = dir.join(GO_MOD);
    let text = std::fs::read_to_string(&go_mod).map_err(|source| ModuleError::Read {
        path: go_mod.clone(),
        source,
    })?;
    module_path(&text).ok_or(ModuleError::NoModulePath(go_mod))
}

/// The path of the first `module` directive, or `None` if there is none.
///
/// Accepts `module example.com/m`, `module "example.com/m"` and the
/// back-quoted form; `//` comments are ignored.
pub fn module_path(go_mod: &str) -> Option<String> {
    for line in go_mod.lines() {
        let line = match line.find("//") {
            Some(comment) => &line[..comment],
            None => line,
        };
        let Some(rest) = line.trim().strip_prefix("module") else {
            continue;
        };
        let path = rest.trim();
        // `module` must be followed by whitespace and a path.
        if path.len() == rest.len() || path.is_empty() {
            continue;
        }
        return unquote(path);
    }
    None
}

fn unquote(path: &str) -> Option<String> {
    let quoted = |quote: char| {
        path.strip_prefix(quote)
            .and_then(|inner| inner.strip_suffix(quote))
    };
    let inner = if path.starts_with('"') {
        let inner = quoted('"')?;
        if inner.contains(['"', '\\']) {
            return None;
        }
        inner
    } else if path.starts_with('`') {
        let inner = quoted('`')?;
        if inner.contains('`') {
            return None;
        }
        inner
    } else {
        path
    };
    (!inner.is_empty()).then(|| inner.to_string())
}

#[cfg(test)]
#[path = "tests/gomod_tests.rs"]
mod gomod_tests;
