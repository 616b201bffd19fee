//! Shared test utilities for docsearch-cli integration tests.

use assert_cmd::Command;

/// Nothing listens on the discard port locally, so connects are refused.
#[allow(dead_code)]
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Get a Command for the docsearch binary.
///
/// The command is isolated from the caller's environment: colors are off
/// and the config path points at a file that does not exist, so every run
/// starts from built-in defaults unless a test passes `--config`.
///
/// # Panics
///
/// Panics if the docsearch binary cannot be found.
#[allow(deprecated)]
pub fn docsearch_cmd() -> Command {
    let mut cmd = Command::cargo_bin("docsearch").expect("docsearch binary should exist");
    cmd.env("NO_COLOR", "1")
        .env("DOCSEARCH_COLOR", "never")
        .env("DOCSEARCH_CONFIG", "/nonexistent/docsearch/config.yaml")
        .env_remove("DOCSEARCH_ENDPOINT")
        .env_remove("DOCSEARCH_LANGUAGE")
        .env_remove("DOCSEARCH_VERBOSE")
        .env_remove("DOCSEARCH_QUIET")
        .env_remove("RUST_LOG");
    cmd
}
