//! CLI end-to-end tests driving the built `dharma` binary, grounded on
//! `faxc-drv`'s `tests/e2e/cli_tests.rs` pattern.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn dharma_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dharma"))
}

fn write_grammar(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_flag_describes_the_grammars_option() {
    Command::new(dharma_bin())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--grammars"));
}

#[test]
fn missing_grammars_flag_is_a_usage_error() {
    Command::new(dharma_bin()).assert().failure();
}

#[test]
fn one_shot_generation_prints_to_stdout() {
    let dir = TempDir::new().unwrap();
    let grammar = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := hello world\n");

    Command::new(dharma_bin())
        .arg("--grammars")
        .arg(&grammar)
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn storage_mode_writes_numbered_files() {
    let dir = TempDir::new().unwrap();
    let grammar = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := hello\n");
    let out_dir = dir.path().join("out");

    Command::new(dharma_bin())
        .arg("--grammars")
        .arg(&grammar)
        .arg("--seed")
        .arg("2")
        .arg("--count")
        .arg("3")
        .arg("--format")
        .arg("txt")
        .arg("--storage")
        .arg(&out_dir)
        .assert()
        .success();

    for i in 1..=3 {
        assert!(out_dir.join(format!("{i}.txt")).exists());
    }
}

#[test]
fn same_seed_is_deterministic_across_processes() {
    let dir = TempDir::new().unwrap();
    let grammar = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := %choice%(a, b, c)\n");

    let run = || {
        Command::new(dharma_bin())
            .arg("--grammars")
            .arg(&grammar)
            .arg("--seed")
            .arg("42")
            .arg("--count")
            .arg("5")
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_settings_constant_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let grammar = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := hello\n");
    let settings = dir.path().join("settings.toml");
    std::fs::write(&settings, "[constants]\nNOT_A_REAL_CONSTANT = 1\n").unwrap();

    Command::new(dharma_bin())
        .arg("--grammars")
        .arg(&grammar)
        .arg("--settings")
        .arg(&settings)
        .assert()
        .failure();
}
