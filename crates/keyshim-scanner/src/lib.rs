//! Go scanner/tokenizer for keyshim.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with automatic semicolon insertion

pub mod syntax_kind;
pub use syntax_kind::{SyntaxKind, string_to_token, text_to_keyword, token_to_string};

pub mod scanner_impl;
pub use scanner_impl::ScannerState;
