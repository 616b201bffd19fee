//! # docsearch CLI
//!
//! Command-line front-end for the document search session controller.
//!
//! This binary drives `docsearch-core` against a deployment reached through
//! `docsearch-http`. Run `docsearch --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
