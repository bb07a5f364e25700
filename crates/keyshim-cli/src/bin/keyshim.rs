#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use keyshim::args::CliArgs;
use keyshim::config::{find_config, resolve_options};
use keyshim::driver::{self, ErrorClass};
use keyshim::reporter::Reporter;

const EXIT_PARSE_ERROR: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless KEYSHIM_LOG or RUST_LOG is set.
    keyshim::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = find_config(&cwd, args.config.as_deref())?;
    let options = resolve_options(config.as_ref(), &args);
    tracing::debug!(?options, "resolved options");

    let output = match driver::run(&args.file, &options, &cwd) {
        Ok(output) => output,
        Err(err) if err.class() == ErrorClass::Parse => {
            let mut reporter = Reporter::new(std::io::stderr().is_terminal());
            if let Some(parse_error) = err.parse_error() {
                if let Ok(text) = std::fs::read_to_string(cwd.join(&args.file)) {
                    reporter.add_source(parse_error.file.clone(), text);
                }
                eprintln!("{}", reporter.render(&[parse_error.to_diagnostic()]));
            } else {
                eprintln!("error: {err}: {}", err.kind);
            }
            std::process::exit(EXIT_PARSE_ERROR);
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(script) = &output.script {
        print!("{script}");
    }
    Ok(())
}
