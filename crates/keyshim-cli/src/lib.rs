//! Command-line driver for keyshim.
//!
//! Reads one Go source file, keeps its `type`, `var` and `const`
//! declarations, rewrites every map key to `string` and writes the result
//! where `cue get go` can pick it up.

pub mod args;
pub mod config;
pub mod driver;
pub mod gomod;
pub mod layout;
pub mod reporter;
pub mod script;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
