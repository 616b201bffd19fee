//! Integration tests for `docsearch shell` driven through stdin.

mod common;

use predicates::prelude::*;

use common::{docsearch_cmd, UNREACHABLE};

#[test]
fn test_shell_citation_toggle() {
    docsearch_cmd()
        .args(["--endpoint", UNREACHABLE, "shell"])
        .write_stdin(":cite doc1.pdf\n:state\n:cite doc1.pdf\n:state\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Citation: doc1.pdf (document)"))
        .stdout(predicate::str::contains("Tab: citation"))
        .stdout(predicate::str::contains("Citation closed"))
        .stdout(predicate::str::contains("Citation: -"));
}

#[test]
fn test_shell_tabs_and_playback() {
    docsearch_cmd()
        .args(["--endpoint", UNREACHABLE, "shell"])
        .write_stdin(":tab citation\n:tab thought\n:play https://cdn.example/answer.mp3\n:state\n:stop\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tab: thought-process"))
        .stdout(predicate::str::contains("Playing: https://cdn.example/answer.mp3"))
        .stdout(predicate::str::contains("Playback stopped"));
}

#[test]
fn test_shell_failed_query_keeps_running() {
    docsearch_cmd()
        .args(["--endpoint", UNREACHABLE, "shell"])
        .write_stdin("invoice\n:state\n:select 1\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[err] Search failed"))
        .stderr(predicate::str::contains("No result #1"))
        .stdout(predicate::str::contains("Status: error"))
        .stdout(predicate::str::contains("Query: invoice"));
}

#[test]
fn test_shell_settings_and_errors() {
    docsearch_cmd()
        .args(["--endpoint", UNREACHABLE, "shell"])
        .write_stdin(":set temperature 0.7\n:set futureKnob 1\n:set retrievalMode vectors\n:bogus\n:lang fr\n:state\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] temperature updated"))
        .stdout(predicate::str::contains("Unknown setting 'futureKnob' ignored"))
        .stderr(predicate::str::contains("Setting `retrievalMode` cannot be enabled"))
        .stdout(predicate::str::contains("retrievalMode updated").not())
        .stderr(predicate::str::contains("Unknown command ':bogus'"))
        .stdout(predicate::str::contains("Language: fr"));
}

#[test]
fn test_shell_piped_stdin_skips_banner_and_spinner() {
    docsearch_cmd()
        .args(["--endpoint", UNREACHABLE, "shell"])
        .write_stdin("invoice\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type a query").not())
        .stdout(predicate::str::contains("Searching").not())
        .stderr(predicate::str::contains("Searching").not());
}
