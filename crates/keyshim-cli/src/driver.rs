//! Pipeline driver: read, parse, filter, normalize, render, write.
//!
//! The output file and its directory are only touched once the complete
//! shim text exists in memory, so a failing run leaves the file system as
//! it was.

use std::fmt;
use std::path::{Path, PathBuf};

use keyshim_common::LineMap;
use keyshim_emitter::{EmitError, assemble_file, render_decl};
use keyshim_lowering::{KeyRewrite, Normalized, filter_declarations, normalize_decl};
use keyshim_parser::{GenDecl, ParseError, parse_source_file};
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::config::ResolvedOptions;
use crate::gomod::{self, ModuleError};
use crate::layout::{LayoutError, OutputTarget, derive_target};
use crate::script::cue_get_script;

/// Pipeline states, in the order a successful run reaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Parsed,
    Filtered,
    Normalized,
    Serialized,
    Written,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Parsed => "parsed",
            Stage::Filtered => "filtered",
            Stage::Normalized => "normalized",
            Stage::Serialized => "serialized",
            Stage::Written => "written",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// The four fatal error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Usage,
    Parse,
    Resolution,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ShimErrorKind {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] EmitError),
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error("failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShimErrorKind {
    /// The step that failed, given the last state reached before it.
    pub fn step(&self, stage: Stage) -> &'static str {
        match self {
            ShimErrorKind::Usage(_) | ShimErrorKind::Layout(_) => "input check",
            ShimErrorKind::Module(_) => "module check",
            ShimErrorKind::Parse(_) => "parse",
            ShimErrorKind::Render(_) => "render",
            ShimErrorKind::Io { .. } if stage == Stage::Idle => "read",
            ShimErrorKind::Io { .. } => "write",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ShimErrorKind::Usage(_) | ShimErrorKind::Layout(_) => ErrorClass::Usage,
            ShimErrorKind::Module(ModuleError::NotModuleRoot(_)) => ErrorClass::Usage,
            ShimErrorKind::Module(ModuleError::Read { .. }) => ErrorClass::Io,
            ShimErrorKind::Module(ModuleError::NoModulePath(_)) => ErrorClass::Resolution,
            ShimErrorKind::Parse(_) | ShimErrorKind::Render(_) => ErrorClass::Parse,
            ShimErrorKind::Io { .. } => ErrorClass::Io,
        }
    }
}

/// A failed run: what went wrong and the last state reached.
///
/// Displays only the failed step; the cause is the error source, so
/// `{:#}` chains print each message once.
#[derive(Debug, thiserror::Error)]
#[error("{step} failed")]
pub struct ShimError {
    pub stage: Stage,
    pub step: &'static str,
    #[source]
    pub kind: ShimErrorKind,
}

impl ShimError {
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.kind {
            ShimErrorKind::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ShimOutput {
    pub target: OutputTarget,
    pub path: PathBuf,
    pub package: String,
    pub text: String,
    pub declarations: usize,
    pub rewrites: Vec<KeyRewrite>,
    pub script: Option<String>,
}

pub struct Pipeline<'a> {
    options: &'a ResolvedOptions,
    cwd: &'a Path,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(options: &'a ResolvedOptions, cwd: &'a Path) -> Self {
        Pipeline {
            options,
            cwd,
            stage: Stage::Idle,
        }
    }

    /// Last state reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "pipeline stage");
        self.stage = stage;
    }

    fn fail(&self, kind: impl Into<ShimErrorKind>) -> ShimError {
        let kind = kind.into();
        ShimError {
            stage: self.stage,
            step: kind.step(self.stage),
            kind,
        }
    }

    fn io_error(&self, action: &'static str, path: &Path, source: std::io::Error) -> ShimError {
        self.fail(ShimErrorKind::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }

    /// Convert `input` (relative to the working directory, or absolute).
    pub fn run(&mut self, input: &Path) -> Result<ShimOutput, ShimError> {
        // Everything that can fail without reading the input is checked
        // first, so usage errors never leave a partial result.
        if input.extension().and_then(|ext| ext.to_str()) != Some("go") {
            return Err(self.fail(ShimErrorKind::Usage(format!(
                "{} is not a Go source file",
                input.display()
            ))));
        }
        if self.options.check_module_root {
            gomod::ensure_module_root(self.cwd).map_err(|err| self.fail(err))?;
        }
        let module = if self.options.emit_script {
            Some(gomod::resolve_module_name(self.cwd).map_err(|err| self.fail(err))?)
        } else {
            None
        };
        let target = derive_target(input, &self.options.layout).map_err(|err| self.fail(err))?;

        let source_path = self.cwd.join(input);
        let out_path = self.cwd.join(target.path());
        if same_file(&source_path, &out_path) {
            return Err(self.fail(LayoutError::OverwritesInput(input.to_path_buf())));
        }
        let source = std::fs::read_to_string(&source_path)
            .map_err(|err| self.io_error("read", &source_path, err))?;
        let line_map = LineMap::build(&source);

        let file_name = input.to_string_lossy().into_owned();
        let unit = parse_source_file(&file_name, source).map_err(|err| self.fail(err))?;
        self.advance(Stage::Parsed);

        let decls = filter_declarations(&unit);
        debug!(
            total = unit.decls.len(),
            kept = decls.len(),
            "filtered declarations"
        );
        self.advance(Stage::Filtered);

        let normalized = self.normalize(&decls);
        let rewrites: Vec<KeyRewrite> = normalized
            .iter()
            .flat_map(|n| n.rewrites.iter().cloned())
            .collect();
        for rewrite in rewrites.iter().filter(|r| !r.at_key) {
            let position = line_map.offset_to_position(rewrite.span.start);
            warn!(
                "{}:{}: map key rewrite changed `{}` inside the key, not the key itself",
                file_name, position, rewrite.original
            );
        }
        debug!(rewrites = rewrites.len(), "normalized declarations");
        self.advance(Stage::Normalized);

        let rendered = self.render(&normalized).map_err(|err| self.fail(err))?;
        let package = target.package.apply(&unit.package.name);
        let text = assemble_file(&package, &rendered);
        debug!(bytes = text.len(), package = %package, "rendered shim");
        self.advance(Stage::Serialized);

        let out_dir = self.cwd.join(&target.dir);
        std::fs::create_dir_all(&out_dir)
            .map_err(|err| self.io_error("create directory", &out_dir, err))?;
        std::fs::write(&out_path, &text).map_err(|err| self.io_error("write", &out_path, err))?;
        info!(path = %target.path().display(), "wrote shim");
        self.advance(Stage::Written);

        let script = module.map(|module| cue_get_script(&module, &target.dir));
        self.advance(Stage::Done);

        Ok(ShimOutput {
            path: target.path(),
            target,
            package,
            text,
            declarations: decls.len(),
            rewrites,
            script,
        })
    }

    fn normalize(&self, decls: &[&GenDecl]) -> Vec<Normalized> {
        if self.options.parallel {
            decls.par_iter().map(|decl| normalize_decl(decl)).collect()
        } else {
            decls.iter().map(|decl| normalize_decl(decl)).collect()
        }
    }

    fn render(&self, normalized: &[Normalized]) -> Result<Vec<String>, EmitError> {
        let render_one = |n: &Normalized| -> Result<String, EmitError> {
            let text = render_decl(&n.decl)?;
            trace!(kind = n.decl.kind.keyword(), span = %n.decl.span, "rendered");
            Ok(text)
        };
        if self.options.parallel {
            normalized.par_iter().map(render_one).collect()
        } else {
            normalized.iter().map(render_one).collect()
        }
    }
}

/// Both paths exist and resolve to the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Run the whole pipeline for `input` in `cwd`.
pub fn run(input: &Path, options: &ResolvedOptions, cwd: &Path) -> Result<ShimOutput, ShimError> {
    Pipeline::new(options, cwd).run(input)
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
