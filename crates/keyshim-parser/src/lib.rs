//! Go parser and AST types for keyshim.
//!
//! This crate provides:
//! - `ast` - the syntax tree of one Go source file (`SourceUnit`)
//! - `ParserState` - recursive-descent parser over the keyshim scanner
//!
//! The whole file is parsed, function bodies included, so any syntax error
//! stops the run. Bodies also keep their verbatim source text, which is what
//! gets printed for a function literal.

pub mod ast;
pub use ast::*;

pub mod parser;
pub use parser::{ParseError, ParserState, parse_source_file};
