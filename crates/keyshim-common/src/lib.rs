//! Common types and utilities for keyshim.
//!
//! This crate provides foundational types used across all keyshim crates:
//! - Source spans (`Span`)
//! - Line/column positions (`LineMap`, `Position`)
//! - Diagnostics produced by the scanner and parser

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
