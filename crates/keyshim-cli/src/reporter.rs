use colored::Colorize;
use rustc_hash::FxHashMap;

use keyshim_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Renders diagnostics as `file:line:col - error: message` followed by the
/// offending source line with the span underlined.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    /// Make the text of `file` available for positions and snippets.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        let file = file.into();
        self.line_maps.remove(&file);
        self.sources.insert(file, text.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.position_for(&diagnostic.file, diagnostic.span.start) {
            Some((line, column)) => format!("{}:{}:{}", diagnostic.file, line + 1, column + 1),
            None if !diagnostic.file.is_empty() => diagnostic.file.clone(),
            None => "<unknown>".to_string(),
        };
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(diagnostic) {
            output.push_str(&snippet);
        }
        output
    }

    /// ```text
    ///     3   type T map[int
    ///                       ~
    /// ```
    fn format_snippet(&mut self, diagnostic: &Diagnostic) -> Option<String> {
        let (line, column) = self.position_for(&diagnostic.file, diagnostic.span.start)?;
        let source = self.sources.get(&diagnostic.file)?;
        let line_map = self.line_maps.get(&diagnostic.file)?;
        let line_text = line_map.line_text(line as usize, source);

        let start = column as usize;
        let end = start + (diagnostic.span.len() as usize).max(1);
        let mut shown = String::new();
        let mut underline = String::new();
        for (offset, ch) in line_text.char_indices() {
            let (text, mark) = if ch == '\t' {
                ("    ".to_string(), if offset < start { "    " } else { "~~~~" })
            } else {
                (ch.to_string(), if offset < start { " " } else { "~" })
            };
            shown.push_str(&text);
            if offset < end {
                underline.push_str(mark);
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {:>3}   {}\n        {}", line + 1, shown, underline))
    }

    /// 0-based line and byte column of `offset` in `file`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let source = self.sources.get(file)?;
        let line_map = self
            .line_maps
            .entry(file.to_string())
            .or_insert_with(|| LineMap::build(source));
        let position = line_map.offset_to_position(offset);
        Some((position.line, position.column))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
