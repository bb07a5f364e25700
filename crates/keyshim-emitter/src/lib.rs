//! Go source printer for keyshim.
//!
//! This crate turns declaration trees back into Go source laid out the way
//! gofmt lays it out:
//! - `tab_writer` - elastic tabstop column alignment
//! - `printer` - `Printer` and the `render_*` entry points

pub mod tab_writer;
pub use tab_writer::{TabConfig, TabFlags, TabWriter};

pub mod printer;
pub use printer::{EmitError, Printer, assemble_file, render_decl, render_file};
