//! Diagnostics reported while scanning and parsing Go source.

use crate::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    pub span: Span,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            file: file.into(),
            span,
        }
    }

    pub fn warning(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            message_text: message.into(),
            file: file.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Message templates shared by the scanner and parser.
pub mod messages {
    pub const UNTERMINATED_STRING: &str = "string literal not terminated";
    pub const UNTERMINATED_RAW_STRING: &str = "raw string literal not terminated";
    pub const UNTERMINATED_RUNE: &str = "rune literal not terminated";
    pub const UNTERMINATED_COMMENT: &str = "comment not terminated";
    pub const INVALID_CHARACTER: &str = "invalid character {0}";
    pub const EXPECTED_FOUND: &str = "expected {0}, found {1}";
    pub const EXPECTED_TYPE: &str = "expected type, found {0}";
    pub const EXPECTED_OPERAND: &str = "expected operand, found {0}";
    pub const EXPECTED_DECLARATION: &str = "expected declaration, found {0}";
    pub const MISSING_PACKAGE_CLAUSE: &str = "expected 'package', found {0}";
    pub const UNBALANCED_BODY: &str = "unexpected end of file in function body";
    pub const EXPECTED_STATEMENT: &str = "expected statement, found {0}";
    pub const SIMPLE_STATEMENT_AS_VALUE: &str =
        "expected {0}, found simple statement (missing parentheses around composite literal?)";
    pub const TYPE_GUARD_OUTSIDE_SWITCH: &str = "use of .(type) outside type switch";
}
