//! Parser state - token cursor, error reporting and shared helpers.

use keyshim_common::Span;
use keyshim_common::diagnostics::{format_message, messages};
use keyshim_scanner::scanner_impl::ScannerSnapshot;
use keyshim_scanner::{ScannerState, SyntaxKind, token_to_string};

use super::{ParseError, ParseResult};
use crate::ast::Ident;

pub struct ParserState {
    pub(super) file_name: String,
    pub(super) scanner: ScannerState,
    /// End offset of the most recently consumed token.
    pub(super) last_end: u32,
    /// Below zero inside `if`/`for`/`switch` headers, where `T {` opens the
    /// block rather than a composite literal. Parentheses and brackets
    /// raise it again.
    pub(super) expr_lev: i32,
    /// Set while a switch header is parsed, the only place `x.(type)` may
    /// appear.
    pub(super) allow_type_guard: bool,
    /// Number of `x.(type)` guards parsed so far.
    pub(super) type_guards: u32,
}

/// Parser position saved for speculative lookahead.
#[derive(Clone, Copy)]
pub(super) struct ParserSnapshot {
    scanner: ScannerSnapshot,
    last_end: u32,
}

impl ParserState {
    pub fn new(file_name: String, source: String) -> Self {
        ParserState {
            file_name,
            scanner: ScannerState::new(source),
            last_end: 0,
            expr_lev: 0,
            allow_type_guard: false,
            type_guards: 0,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        self.scanner.text()
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(super) fn token(&self) -> SyntaxKind {
        self.scanner.get_token()
    }

    #[inline]
    pub(super) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.get_token() == kind
    }

    pub(super) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    pub(super) fn token_text(&self) -> &str {
        self.scanner.get_token_text()
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Advance to the next token, failing on lexical errors.
    pub(super) fn next_token(&mut self) -> ParseResult<SyntaxKind> {
        self.last_end = self.scanner.get_token_end();
        let kind = self.scanner.scan();
        if let Some(diagnostic) = self.scanner.diagnostics().first() {
            let (span, message) = (diagnostic.span, diagnostic.message.clone());
            return Err(self.error_at(span, message));
        }
        Ok(kind)
    }

    pub(super) fn parse_optional(&mut self, kind: SyntaxKind) -> ParseResult<bool> {
        if self.is_token(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token of the given kind, returning its span.
    pub(super) fn parse_expected(&mut self, kind: SyntaxKind) -> ParseResult<Span> {
        if self.is_token(kind) {
            let span = self.scanner.get_token_span();
            self.next_token()?;
            Ok(span)
        } else {
            let expected = token_to_string(kind)
                .map(|text| format!("'{text}'"))
                .unwrap_or_else(|| format!("{kind:?}"));
            Err(self.error_expected(&expected))
        }
    }

    /// A `;` is required unless the list is being closed right here.
    pub(super) fn parse_semicolon(&mut self) -> ParseResult<()> {
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token()?;
                Ok(())
            }
            SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::EndOfFileToken => Ok(()),
            _ => Err(self.error_expected("';'")),
        }
    }

    pub(super) fn parse_ident(&mut self) -> ParseResult<Ident> {
        if !self.is_token(SyntaxKind::Identifier) {
            return Err(self.error_expected("identifier"));
        }
        let ident = Ident::new(self.token_text(), self.scanner.get_token_span());
        self.next_token()?;
        Ok(ident)
    }

    pub(super) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.snapshot(),
            last_end: self.last_end,
        }
    }

    pub(super) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore(snapshot.scanner);
        self.last_end = snapshot.last_end;
    }

    /// Run `parse` one expression level deeper, as inside `(...)` or `[...]`.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.expr_lev += 1;
        let result = parse(self);
        self.expr_lev -= 1;
        result
    }

    /// Run `parse` over the header of an `if`, `for` or `switch`.
    pub(super) fn control_clause<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let outer = self.expr_lev;
        self.expr_lev = -1;
        let result = parse(self);
        self.expr_lev = outer;
        result
    }

    /// Skip a balanced `[...]`, `(...)` or `{...}` group starting at the
    /// current token. Leaves the cursor after the closing token.
    pub(super) fn skip_balanced(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.token() {
                SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token()?;
                        return Ok(());
                    }
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error_at(
                        self.scanner.get_token_span(),
                        messages::UNBALANCED_BODY.to_string(),
                    ));
                }
                _ => {}
            }
            self.next_token()?;
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(super) fn error_at(&self, span: Span, message: String) -> ParseError {
        ParseError::new(&self.file_name, self.scanner.text(), span, message)
    }

    /// Human-readable description of the current token.
    pub(super) fn describe_token(&self) -> String {
        match self.token() {
            SyntaxKind::SemicolonToken if self.scanner.is_auto_semicolon() => {
                "newline".to_string()
            }
            SyntaxKind::EndOfFileToken => "EOF".to_string(),
            SyntaxKind::Identifier => format!("identifier {}", self.token_text()),
            kind if kind.is_literal() => format!("literal {}", self.token_text()),
            kind => token_to_string(kind)
                .map(|text| format!("'{text}'"))
                .unwrap_or_else(|| format!("'{}'", self.token_text())),
        }
    }

    pub(super) fn error_expected(&self, expected: &str) -> ParseError {
        let found = self.describe_token();
        self.error_at(
            self.scanner.get_token_span(),
            format_message(messages::EXPECTED_FOUND, &[expected, found.as_str()]),
        )
    }

    pub(super) fn error_with_found(&self, template: &str) -> ParseError {
        let found = self.describe_token();
        self.error_at(
            self.scanner.get_token_span(),
            format_message(template, &[found.as_str()]),
        )
    }
}
