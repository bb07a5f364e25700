use super::Printer;

impl Printer {
    // =========================================================================
    // Output Helpers (delegate to TabWriter)
    // =========================================================================

    /// Write plain text. Must not contain layout characters.
    pub(super) fn write(&mut self, text: &str) {
        self.write_indent();
        self.writer.write_str(text);
    }

    /// Write literal text that passes through layout untouched.
    pub(super) fn write_escaped(&mut self, text: &str) {
        self.write_indent();
        self.line += text.matches('\n').count();
        self.writer.write_escaped(text);
    }

    pub(super) fn write_blank(&mut self) {
        self.write(" ");
    }

    /// Column separator for aligned cells.
    pub(super) fn write_vtab(&mut self) {
        self.write_indent();
        self.writer.write_str("\u{0b}");
    }

    pub(super) fn write_newline(&mut self) {
        self.writer.write_str("\n");
        self.line += 1;
        self.at_line_start = true;
    }

    /// Line break that also closes the current alignment section.
    pub(super) fn write_formfeed(&mut self) {
        self.writer.write_str("\u{0c}");
        self.line += 1;
        self.at_line_start = true;
    }

    /// Line break between list entries; a new section starts after an
    /// entry that spanned several lines.
    pub(super) fn linebreak(&mut self, new_section: bool) {
        if new_section {
            self.write_formfeed();
        } else {
            self.write_newline();
        }
    }

    pub(super) fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub(super) fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Indentation is written lazily, right before the first text of a line.
    fn write_indent(&mut self) {
        if !self.at_line_start {
            return;
        }
        self.at_line_start = false;
        for _ in 0..self.indent {
            self.writer.write_str("\t");
        }
    }

    /// Write `items` separated by `", "`.
    pub(super) fn write_comma_separated<T>(
        &mut self,
        items: &[T],
        mut emit: impl FnMut(&mut Self, &T) -> super::EmitResult<()>,
    ) -> super::EmitResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            emit(self, item)?;
        }
        Ok(())
    }
}
