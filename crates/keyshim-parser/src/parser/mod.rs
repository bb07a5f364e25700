//! Recursive-descent parser for Go source files.
//!
//! The parser stops at the first syntax error: a file that does not parse
//! cannot be rewritten, so there is nothing to recover for.

mod state;
mod state_declarations;
mod state_expressions;
mod state_statements;
mod state_types;

pub use state::ParserState;

use keyshim_common::{Diagnostic, LineMap, Position, Span};

use crate::SourceUnit;

/// A syntax error in the input file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{position}: {message}")]
pub struct ParseError {
    pub file: String,
    pub span: Span,
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(file: &str, source: &str, span: Span, message: String) -> Self {
        let position = LineMap::build(source).offset_to_position(span.start);
        ParseError {
            file: file.to_string(),
            span,
            position,
            message,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.file.clone(), self.span, self.message.clone())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse one Go source file.
///
/// `file_name` is only used for error messages.
pub fn parse_source_file(file_name: &str, source: String) -> ParseResult<SourceUnit> {
    let mut parser = ParserState::new(file_name.to_string(), source);
    parser.parse_source_file()
}

#[cfg(test)]
#[path = "tests/state_expression_tests.rs"]
mod state_expression_tests;

#[cfg(test)]
#[path = "tests/state_statement_tests.rs"]
mod state_statement_tests;
