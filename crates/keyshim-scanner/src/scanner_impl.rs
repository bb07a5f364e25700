//! Scanner implementation - the lexical analyzer for Go source.
//!
//! The scanner is a pull-based state machine: each call to [`ScannerState::scan`]
//! produces the next token. Whitespace and comments are skipped, and a
//! semicolon token is synthesized at line ends and at end of file wherever the
//! Go grammar inserts one automatically.

use keyshim_common::Span;
use keyshim_common::diagnostics::{format_message, messages};

use crate::SyntaxKind;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A lexical error with the span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    pub span: Span,
    pub message: String,
}

/// Saved scanner position for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_end: usize,
    insert_semi: bool,
    auto_semicolon: bool,
    preceding_line_break: bool,
    diagnostic_count: usize,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_end: usize,
    /// Set after a token that would end a statement at a line break.
    insert_semi: bool,
    /// The current semicolon token was synthesized from a newline or EOF.
    auto_semicolon: bool,
    preceding_line_break: bool,
    diagnostics: Vec<ScanDiagnostic>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        // A byte order mark is only allowed as the first character.
        let pos = if text.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };
        ScannerState {
            text,
            pos,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_end: 0,
            insert_semi: false,
            auto_semicolon: false,
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    pub fn get_token_end(&self) -> u32 {
        self.token_end as u32
    }

    pub fn get_token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.token_end as u32)
    }

    /// Source text of the current token (empty for synthesized semicolons).
    pub fn get_token_text(&self) -> &str {
        self.text
            .get(self.token_start..self.token_end)
            .unwrap_or("")
    }

    pub fn is_auto_semicolon(&self) -> bool {
        self.auto_semicolon
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScanDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_end: self.token_end,
            insert_semi: self.insert_semi,
            auto_semicolon: self.auto_semicolon,
            preceding_line_break: self.preceding_line_break,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    pub fn restore(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_end = snapshot.token_end;
        self.insert_semi = snapshot.insert_semi;
        self.auto_semicolon = snapshot.auto_semicolon;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.diagnostics.truncate(snapshot.diagnostic_count);
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.auto_semicolon = false;
        self.preceding_line_break = false;

        loop {
            let Some(&byte) = self.text.as_bytes().get(self.pos) else {
                if self.insert_semi {
                    return self.auto_semicolon_at(self.pos, self.pos);
                }
                self.token_start = self.pos;
                self.token_end = self.pos;
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            match byte {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    if self.insert_semi {
                        let start = self.pos;
                        self.pos += 1;
                        return self.auto_semicolon_at(start, self.pos);
                    }
                    self.pos += 1;
                    self.preceding_line_break = true;
                }
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    // A line comment ends the line it is on.
                    if self.insert_semi {
                        return self.auto_semicolon_at(self.pos, self.pos);
                    }
                    self.skip_line_comment();
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    let start = self.pos;
                    let spans_lines = self.skip_block_comment();
                    if spans_lines && self.insert_semi {
                        return self.auto_semicolon_at(start, start);
                    }
                }
                _ => break,
            }
        }

        self.token_start = self.pos;
        let kind = self.scan_token();
        self.token_end = self.pos;
        self.insert_semi = kind.ends_statement();
        self.token = kind;
        kind
    }

    fn auto_semicolon_at(&mut self, start: usize, end: usize) -> SyntaxKind {
        self.insert_semi = false;
        self.auto_semicolon = true;
        self.token_start = start;
        self.token_end = end;
        self.token = SyntaxKind::SemicolonToken;
        self.token
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek_byte(0) == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&mut self, start: usize, message: String) {
        self.diagnostics.push(ScanDiagnostic {
            span: Span::new(start as u32, self.pos.max(start) as u32),
            message,
        });
    }

    fn skip_line_comment(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        match memchr::memchr(b'\n', rest) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.text.len(),
        }
    }

    /// Skip a `/* ... */` comment, returning whether it contained a newline.
    fn skip_block_comment(&mut self) -> bool {
        let start = self.pos;
        let body = &self.text.as_bytes()[self.pos + 2..];
        match memchr::memmem::find(body, b"*/") {
            Some(offset) => {
                let spans_lines = memchr::memchr(b'\n', &body[..offset]).is_some();
                self.pos += 2 + offset + 2;
                spans_lines
            }
            None => {
                let spans_lines = memchr::memchr(b'\n', body).is_some();
                self.pos = self.text.len();
                self.error(start, messages::UNTERMINATED_COMMENT.to_string());
                spans_lines
            }
        }
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return SyntaxKind::EndOfFileToken;
        };

        if is_identifier_start(ch) {
            return self.scan_identifier();
        }
        if ch.is_ascii_digit()
            || (ch == '.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.scan_number();
        }

        self.pos += ch.len_utf8();
        match ch {
            '"' => self.scan_string(start),
            '`' => self.scan_raw_string(start),
            '\'' => self.scan_rune(start),
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            ',' => SyntaxKind::CommaToken,
            ';' => SyntaxKind::SemicolonToken,
            '~' => SyntaxKind::TildeToken,
            '.' => {
                if self.peek_byte(0) == Some(b'.') && self.peek_byte(1) == Some(b'.') {
                    self.pos += 2;
                    SyntaxKind::DotDotDotToken
                } else {
                    SyntaxKind::DotToken
                }
            }
            ':' => {
                if self.eat(b'=') {
                    SyntaxKind::ColonEqualsToken
                } else {
                    SyntaxKind::ColonToken
                }
            }
            '+' => {
                if self.eat(b'+') {
                    SyntaxKind::PlusPlusToken
                } else if self.eat(b'=') {
                    SyntaxKind::PlusEqualsToken
                } else {
                    SyntaxKind::PlusToken
                }
            }
            '-' => {
                if self.eat(b'-') {
                    SyntaxKind::MinusMinusToken
                } else if self.eat(b'=') {
                    SyntaxKind::MinusEqualsToken
                } else {
                    SyntaxKind::MinusToken
                }
            }
            '*' => self.with_equals(SyntaxKind::AsteriskToken, SyntaxKind::AsteriskEqualsToken),
            '/' => self.with_equals(SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken),
            '%' => self.with_equals(SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken),
            '^' => self.with_equals(SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken),
            '=' => self.with_equals(SyntaxKind::EqualsToken, SyntaxKind::EqualsEqualsToken),
            '!' => self.with_equals(SyntaxKind::ExclamationToken, SyntaxKind::ExclamationEqualsToken),
            '<' => {
                if self.eat(b'-') {
                    SyntaxKind::LessThanMinusToken
                } else if self.eat(b'<') {
                    self.with_equals(
                        SyntaxKind::LessThanLessThanToken,
                        SyntaxKind::LessThanLessThanEqualsToken,
                    )
                } else {
                    self.with_equals(SyntaxKind::LessThanToken, SyntaxKind::LessThanEqualsToken)
                }
            }
            '>' => {
                if self.eat(b'>') {
                    self.with_equals(
                        SyntaxKind::GreaterThanGreaterThanToken,
                        SyntaxKind::GreaterThanGreaterThanEqualsToken,
                    )
                } else {
                    self.with_equals(
                        SyntaxKind::GreaterThanToken,
                        SyntaxKind::GreaterThanEqualsToken,
                    )
                }
            }
            '&' => {
                if self.eat(b'&') {
                    SyntaxKind::AmpersandAmpersandToken
                } else if self.eat(b'^') {
                    self.with_equals(
                        SyntaxKind::AmpersandCaretToken,
                        SyntaxKind::AmpersandCaretEqualsToken,
                    )
                } else {
                    self.with_equals(SyntaxKind::AmpersandToken, SyntaxKind::AmpersandEqualsToken)
                }
            }
            '|' => {
                if self.eat(b'|') {
                    SyntaxKind::BarBarToken
                } else {
                    self.with_equals(SyntaxKind::BarToken, SyntaxKind::BarEqualsToken)
                }
            }
            other => {
                let shown = format!("{other:?}");
                self.error(
                    start,
                    format_message(messages::INVALID_CHARACTER, &[shown.as_str()]),
                );
                SyntaxKind::Unknown
            }
        }
    }

    fn with_equals(&mut self, plain: SyntaxKind, assign: SyntaxKind) -> SyntaxKind {
        if self.eat(b'=') { assign } else { plain }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        crate::string_to_token(&self.text[start..self.pos])
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let mut kind = SyntaxKind::IntLiteral;
        let mut is_hex = false;

        if bytes[start] == b'0' && matches!(bytes.get(start + 1), Some(b'x' | b'X')) {
            is_hex = true;
            self.pos += 2;
        }

        while let Some(&byte) = bytes.get(self.pos) {
            match byte {
                b'0'..=b'9' | b'_' => self.pos += 1,
                b'a'..=b'f' | b'A'..=b'F' if is_hex => self.pos += 1,
                b'o' | b'O' | b'b' | b'B' if self.pos == start + 1 && bytes[start] == b'0' => {
                    self.pos += 1;
                }
                b'.' => {
                    kind = SyntaxKind::FloatLiteral;
                    self.pos += 1;
                }
                b'e' | b'E' if !is_hex => {
                    kind = SyntaxKind::FloatLiteral;
                    self.pos += 1;
                    if matches!(bytes.get(self.pos), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                b'p' | b'P' if is_hex => {
                    kind = SyntaxKind::FloatLiteral;
                    self.pos += 1;
                    if matches!(bytes.get(self.pos), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        if bytes.get(self.pos) == Some(&b'i') {
            self.pos += 1;
            kind = SyntaxKind::ImaginaryLiteral;
        }
        kind
    }

    /// Scan the remainder of a quoted literal after its opening quote.
    fn scan_quoted(&mut self, quote: u8) -> bool {
        loop {
            let Some(&byte) = self.text.as_bytes().get(self.pos) else {
                return false;
            };
            match byte {
                b'\n' => return false,
                b'\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                b if b == quote => {
                    self.pos += 1;
                    return true;
                }
                _ => {
                    let ch = self.peek_char().unwrap_or('\u{FFFD}');
                    self.pos += ch.len_utf8().max(1);
                }
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> SyntaxKind {
        if !self.scan_quoted(b'"') {
            self.error(start, messages::UNTERMINATED_STRING.to_string());
        }
        SyntaxKind::StringLiteral
    }

    fn scan_rune(&mut self, start: usize) -> SyntaxKind {
        if !self.scan_quoted(b'\'') {
            self.error(start, messages::UNTERMINATED_RUNE.to_string());
        }
        SyntaxKind::RuneLiteral
    }

    fn scan_raw_string(&mut self, start: usize) -> SyntaxKind {
        let rest = &self.text.as_bytes()[self.pos..];
        match memchr::memchr(b'`', rest) {
            Some(offset) => self.pos += offset + 1,
            None => {
                self.pos = self.text.len();
                self.error(start, messages::UNTERMINATED_RAW_STRING.to_string());
            }
        }
        SyntaxKind::RawStringLiteral
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

#[cfg(test)]
#[path = "tests/scanner_impl_tests.rs"]
mod scanner_impl_tests;
