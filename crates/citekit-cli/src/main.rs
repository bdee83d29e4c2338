//! # citekit CLI
//!
//! Command-line interface for citation resolution.
//!
//! This binary provides human-friendly access to `citekit-core` functionality.
//! Run `citekit --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
