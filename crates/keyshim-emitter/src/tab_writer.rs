//! Elastic tabstop column aligner.
//!
//! Text is written as a stream of cells. A cell is terminated by a tab
//! character; the last cell of a line is terminated by the line break and
//! does not belong to any column. Consecutive lines with a cell in the same
//! column form a column block, and every cell of a block is padded to the
//! width of the widest one.
//!
//! Control characters in [`TabWriter::write_str`]:
//!
//! - `'\t'` terminates a hard cell (indentation); hard cells are never
//!   discarded
//! - `'\v'` terminates a soft cell; a column of empty soft cells is
//!   discarded when [`TabFlags::DISCARD_EMPTY_COLUMNS`] is set
//! - `'\n'` ends a line
//! - `'\x0c'` (form feed) ends a line and closes all column blocks
//!
//! Text written with [`TabWriter::write_escaped`] is taken verbatim and
//! counts as part of the current cell, whatever characters it contains.
//!
//! Trailing padding at the end of a line is not emitted.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TabFlags: u8 {
        /// Drop columns made only of empty soft cells.
        const DISCARD_EMPTY_COLUMNS = 1 << 0;
        /// Pad leading empty cells with tabs regardless of the pad char.
        const TAB_INDENT = 1 << 1;
        /// Right-align cell contents.
        const ALIGN_RIGHT = 1 << 2;
    }
}

pub const VTAB: char = '\u{0b}';
pub const FORMFEED: char = '\u{0c}';

#[derive(Debug, Clone, Copy)]
pub struct TabConfig {
    pub min_width: usize,
    pub tab_width: usize,
    pub padding: usize,
    pub pad_char: char,
    pub flags: TabFlags,
}

impl TabConfig {
    /// Settings used to lay out Go source: tab indentation, space
    /// alignment with one blank between columns.
    pub fn go_source() -> Self {
        TabConfig {
            min_width: 0,
            tab_width: 8,
            padding: 1,
            pad_char: ' ',
            flags: TabFlags::DISCARD_EMPTY_COLUMNS | TabFlags::TAB_INDENT,
        }
    }
}

impl Default for TabConfig {
    fn default() -> Self {
        Self::go_source()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    /// Cell size in bytes.
    size: usize,
    /// Cell width in chars.
    width: usize,
    /// Terminated by a hard tab.
    htab: bool,
}

pub struct TabWriter {
    config: TabConfig,
    out: String,
    /// Text of all cells buffered since the last flush.
    buf: String,
    /// Position in `buf` up to which the current cell's width is counted.
    pos: usize,
    cell: Cell,
    lines: Vec<Vec<Cell>>,
    widths: Vec<usize>,
    /// Padding held back until more text follows on the line.
    pending_pad: String,
}

impl TabWriter {
    pub fn new(config: TabConfig) -> Self {
        let mut writer = TabWriter {
            config,
            out: String::new(),
            buf: String::new(),
            pos: 0,
            cell: Cell::default(),
            lines: Vec::new(),
            widths: Vec::new(),
            pending_pad: String::new(),
        };
        writer.reset();
        writer
    }

    /// Write text, interpreting the cell and line control characters.
    pub fn write_str(&mut self, text: &str) {
        let mut start = 0;
        for (i, ch) in text.char_indices() {
            if !matches!(ch, '\t' | VTAB | '\n' | FORMFEED) {
                continue;
            }
            self.append(&text[start..i]);
            self.update_width();
            start = i + ch.len_utf8();
            let ncells = self.terminate_cell(ch == '\t');
            if ch == '\n' || ch == FORMFEED {
                self.lines.push(Vec::new());
                // A line with a single cell cannot affect the columns of
                // the lines after it, so everything buffered can go out.
                if ch == FORMFEED || ncells == 1 {
                    self.flush_buffered();
                }
            }
        }
        self.append(&text[start..]);
    }

    /// Write text that must pass through untouched.
    pub fn write_escaped(&mut self, text: &str) {
        self.append(text);
        self.update_width();
    }

    /// Format everything still buffered and return the output.
    pub fn finish(mut self) -> String {
        self.flush_buffered();
        self.out
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.pos = 0;
        self.cell = Cell::default();
        self.lines.clear();
        self.widths.clear();
        self.lines.push(Vec::new());
    }

    fn append(&mut self, text: &str) {
        self.buf.push_str(text);
        self.cell.size += text.len();
    }

    fn update_width(&mut self) {
        self.cell.width += self.buf[self.pos..].chars().count();
        self.pos = self.buf.len();
    }

    /// Close the current cell; returns the number of cells on the line.
    fn terminate_cell(&mut self, htab: bool) -> usize {
        self.cell.htab = htab;
        let cell = std::mem::take(&mut self.cell);
        match self.lines.last_mut() {
            Some(line) => {
                line.push(cell);
                line.len()
            }
            None => {
                self.lines.push(vec![cell]);
                1
            }
        }
    }

    fn flush_buffered(&mut self) {
        if self.cell.size > 0 {
            self.terminate_cell(false);
        }
        let line_count = self.lines.len();
        self.format(0, 0, line_count);
        self.reset();
    }

    /// Lay out lines `line0..line1` given the widths of the columns to the
    /// left, which are already on the `widths` stack.
    fn format(&mut self, pos0: usize, mut line0: usize, line1: usize) -> usize {
        let mut pos = pos0;
        let column = self.widths.len();
        let mut this = line0;
        while this < line1 {
            if column + 1 >= self.lines[this].len() {
                this += 1;
                continue;
            }
            // This line has a cell in `column`: print the lines before it,
            // then measure the block of lines sharing the column.
            pos = self.write_lines(pos, line0, this);
            line0 = this;

            let mut width = self.config.min_width;
            let mut discardable = true;
            while this < line1 {
                let line = &self.lines[this];
                if column + 1 >= line.len() {
                    break;
                }
                let cell = line[column];
                width = width.max(cell.width + self.config.padding);
                if cell.width > 0 || cell.htab {
                    discardable = false;
                }
                this += 1;
            }

            if discardable && self.config.flags.contains(TabFlags::DISCARD_EMPTY_COLUMNS) {
                width = 0;
            }

            self.widths.push(width);
            pos = self.format(pos, line0, this);
            self.widths.pop();
            line0 = this;
        }
        self.write_lines(pos, line0, line1)
    }

    fn write_lines(&mut self, pos0: usize, line0: usize, line1: usize) -> usize {
        let mut pos = pos0;
        for i in line0..line1 {
            let mut use_tabs = self.config.flags.contains(TabFlags::TAB_INDENT);
            for j in 0..self.lines[i].len() {
                let cell = self.lines[i][j];
                let column_width = self.widths.get(j).copied();
                if cell.size == 0 {
                    if let Some(cell_width) = column_width {
                        self.write_padding(cell.width, cell_width, use_tabs);
                    }
                    continue;
                }
                use_tabs = false;
                let text_end = pos + cell.size;
                if self.config.flags.contains(TabFlags::ALIGN_RIGHT) {
                    if let Some(cell_width) = column_width {
                        self.write_padding(cell.width, cell_width, false);
                    }
                    self.write_text(pos, text_end);
                } else {
                    self.write_text(pos, text_end);
                    if let Some(cell_width) = column_width {
                        self.write_padding(cell.width, cell_width, false);
                    }
                }
                pos = text_end;
            }

            if i + 1 == self.lines.len() {
                // Last buffered line: no line break yet, only the pending cell.
                let text_end = pos + self.cell.size;
                self.write_text(pos, text_end);
                pos = text_end;
            } else {
                self.pending_pad.clear();
                self.out.push('\n');
            }
        }
        pos
    }

    fn write_text(&mut self, start: usize, end: usize) {
        if start == end {
            return;
        }
        self.out.push_str(&self.pending_pad);
        self.pending_pad.clear();
        self.out.push_str(&self.buf[start..end]);
    }

    fn write_padding(&mut self, text_width: usize, cell_width: usize, use_tabs: bool) {
        if self.config.pad_char == '\t' || use_tabs {
            let tab_width = self.config.tab_width;
            if tab_width == 0 {
                return;
            }
            let cell_width = cell_width.div_ceil(tab_width) * tab_width;
            let n = cell_width.saturating_sub(text_width);
            for _ in 0..n.div_ceil(tab_width) {
                self.pending_pad.push('\t');
            }
            return;
        }
        for _ in 0..cell_width.saturating_sub(text_width) {
            self.pending_pad.push(self.config.pad_char);
        }
    }
}

#[cfg(test)]
#[path = "tests/tab_writer_tests.rs"]
mod tab_writer_tests;
