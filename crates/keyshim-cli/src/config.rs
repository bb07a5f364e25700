//! `keyshim.json` configuration and option resolution.
//!
//! Options resolve as built-in defaults, then the config file, then
//! command-line flags.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::args::CliArgs;
use crate::layout::{Layout, LayoutOptions};

pub const CONFIG_FILE_NAME: &str = "keyshim.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShimConfig {
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub out_root: Option<PathBuf>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub check_module_root: Option<bool>,
    #[serde(default)]
    pub emit_script: Option<bool>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub layout: LayoutOptions,
    pub check_module_root: bool,
    pub emit_script: bool,
    pub parallel: bool,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ResolvedOptions {
            layout: LayoutOptions::default(),
            check_module_root: true,
            emit_script: true,
            parallel: false,
        }
    }
}

pub fn parse_config(source: &str) -> Result<ShimConfig> {
    let config = serde_json::from_str(source).context("failed to parse keyshim config JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<ShimConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config: {}", path.display()))
}

/// The config named on the command line, else `keyshim.json` in `cwd` if
/// there is one.
pub fn find_config(cwd: &Path, explicit: Option<&Path>) -> Result<Option<ShimConfig>> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
        return load_config(&path).map(Some);
    }
    let default_path = cwd.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        return load_config(&default_path).map(Some);
    }
    Ok(None)
}

pub fn resolve_options(config: Option<&ShimConfig>, args: &CliArgs) -> ResolvedOptions {
    let mut resolved = ResolvedOptions::default();

    if let Some(config) = config {
        if let Some(layout) = config.layout {
            resolved.layout.layout = layout;
        }
        if let Some(out_root) = &config.out_root {
            resolved.layout.out_root = out_root.clone();
        }
        if let Some(suffix) = &config.suffix {
            resolved.layout.suffix = suffix.clone();
        }
        if let Some(check) = config.check_module_root {
            resolved.check_module_root = check;
        }
        if let Some(emit) = config.emit_script {
            resolved.emit_script = emit;
        }
        if let Some(parallel) = config.parallel {
            resolved.parallel = parallel;
        }
    }

    if let Some(layout) = args.layout {
        resolved.layout.layout = layout;
    }
    if let Some(out_root) = &args.out_root {
        resolved.layout.out_root = out_root.clone();
    }
    if let Some(suffix) = &args.suffix {
        resolved.layout.suffix = suffix.clone();
    }
    if args.no_module_check {
        resolved.check_module_root = false;
    }
    if args.no_script {
        resolved.emit_script = false;
    }
    if args.parallel {
        resolved.parallel = true;
    }

    resolved
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
