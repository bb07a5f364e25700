//! Printer - writes declaration trees as gofmt-formatted Go source.
//!
//! The printer produces a stream of text and layout characters for a
//! [`TabWriter`]: indentation is written as hard tabs, alignable columns
//! are separated by vertical tabs, and form feeds end alignment sections.
//! Literal text (strings, struct tags, function bodies) is written escaped
//! so embedded tabs and newlines never act as layout characters.

mod declarations;
mod expressions;
mod helpers;
mod types;

use keyshim_common::Span;
use keyshim_parser::GenDecl;
use tracing::trace;

use crate::tab_writer::{TabConfig, TabWriter};

/// A declaration the printer refuses to render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("{keyword} declarations cannot be rendered into a shim (at {span})")]
    UnsupportedDecl { keyword: &'static str, span: Span },
    #[error("variadic type outside of a parameter list (at {span})")]
    MisplacedEllipsis { span: Span },
}

pub type EmitResult<T> = Result<T, EmitError>;

pub struct Printer {
    writer: TabWriter,
    indent: usize,
    /// Nothing has been written on the current output line yet.
    at_line_start: bool,
    /// Number of line breaks written so far.
    line: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::with_config(TabConfig::go_source())
    }

    pub fn with_config(config: TabConfig) -> Self {
        Printer {
            writer: TabWriter::new(config),
            indent: 0,
            at_line_start: true,
            line: 0,
        }
    }

    /// Print one `type`, `var` or `const` declaration.
    pub fn print_decl(&mut self, decl: &GenDecl) -> EmitResult<()> {
        self.print_gen_decl(decl)
    }

    /// Laid-out output, without a trailing newline.
    pub fn finish(self) -> String {
        self.writer.finish()
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a single declaration.
pub fn render_decl(decl: &GenDecl) -> EmitResult<String> {
    let mut printer = Printer::new();
    printer.print_decl(decl)?;
    let text = printer.finish();
    trace!(kind = decl.kind.keyword(), bytes = text.len(), "rendered declaration");
    Ok(text)
}

/// Join a package clause and rendered declarations into a source file.
///
/// Declarations are separated by one blank line and the file ends with a
/// single newline.
pub fn assemble_file(package: &str, rendered: &[String]) -> String {
    let mut out = format!("package {package}\n");
    for decl in rendered {
        out.push('\n');
        out.push_str(decl);
        out.push('\n');
    }
    out
}

/// Render a complete source file from a package name and declarations.
pub fn render_file(package: &str, decls: &[GenDecl]) -> EmitResult<String> {
    let rendered = decls
        .iter()
        .map(render_decl)
        .collect::<EmitResult<Vec<_>>>()?;
    Ok(assemble_file(package, &rendered))
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
