use clap::Parser;
use std::path::PathBuf;

use crate::layout::Layout;

/// CLI arguments for the keyshim binary.
#[derive(Parser, Debug)]
#[command(
    name = "keyshim",
    version,
    about = "Rewrite the map keys of Go declarations to string for `cue get go`"
)]
pub struct CliArgs {
    /// Go source file whose type, var and const declarations are converted.
    pub file: PathBuf,

    /// Where the shim is written.
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// Output root of the mirror layout.
    #[arg(long = "out-root")]
    pub out_root: Option<PathBuf>,

    /// Directory, file and package suffix of the sibling and same-dir layouts.
    #[arg(long)]
    pub suffix: Option<String>,

    /// Do not require go.mod in the current directory.
    #[arg(long = "no-module-check")]
    pub no_module_check: bool,

    /// Do not print the cue script after writing the shim.
    #[arg(long = "no-script")]
    pub no_script: bool,

    /// Normalize and render declarations on a thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Path to a keyshim.json config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
