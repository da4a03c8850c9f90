//! Integration tests for the lemmatch command line.
//!
//! Runs the built binary on a small corpus file and checks the printed
//! matches in each output mode.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

static FIXTURE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get or create the test fixture directory (singleton)
fn fixture_dir() -> PathBuf {
    FIXTURE_DIR.get_or_init(create_fixture_dir).clone()
}

fn create_fixture_dir() -> PathBuf {
    let dir = std::env::temp_dir()
        .join("lemmatch_test_fixtures")
        .join(format!("test_{}", std::process::id()));

    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create fixture dir");

    fs::write(
        dir.join("corpus.json"),
        r#"[
    {"id": "a", "symbols": [5, 6, 7, 8, 9]},
    {"id": "b", "symbols": [1, 5, 6, 7, 8], "offsets": [0, 2, 4, 6, 8], "lengths": [1, 1, 1, 1, 1]},
    {"id": "c", "symbols": [9, 9, 9]}
]
"#,
    )
    .unwrap();

    fs::write(dir.join("broken.json"), r#"[{"id": "x", "symbols": [1, 2], "offsets": [0]}]"#).unwrap();

    dir
}

/// Run lemmatch on a fixture file, returning (stdout, stderr, success)
fn run_lemmatch(args: &[&str], file: &str) -> (String, String, bool) {
    let path = fixture_dir().join(file);
    let output = Command::new(env!("CARGO_BIN_EXE_lemmatch"))
        .args(args)
        .arg(&path)
        .arg("--no-color")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run lemmatch");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_radix_plain_output() {
    let (out, err, ok) = run_lemmatch(&["radix", "-d", "3"], "corpus.json");
    assert!(ok, "radix failed: {}", err);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, ["a:0+3  b:1+3", "a:1+3  b:2+3"]);
}

#[test]
fn test_exact_reports_both_directions() {
    let (out, err, ok) = run_lemmatch(&["exact", "-l", "4"], "corpus.json");
    assert!(ok, "exact failed: {}", err);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, ["a:0+4  b:1+4", "b:1+4  a:0+4"]);
}

#[test]
fn test_slow_json_lines() {
    let (out, err, ok) = run_lemmatch(&["slow", "-d", "4", "--json"], "corpus.json");
    assert!(ok, "slow failed: {}", err);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\"text_a\":\"a\""));
    assert!(lines[0].contains("\"offset_b\":1"));
}

#[test]
fn test_count_per_pair() {
    let (out, _, ok) = run_lemmatch(&["radix", "-d", "3", "--count"], "corpus.json");
    assert!(ok);
    assert_eq!(out.trim_end(), "a  b:2");
}

#[test]
fn test_stencil_and_sharded_agree() {
    let args = ["--size", "3", "--width", "4"];
    let (stencil, _, ok1) = run_lemmatch(&[&["stencil"][..], &args[..]].concat(), "corpus.json");
    let (sharded, _, ok2) =
        run_lemmatch(&[&["sharded"][..], &args[..], &["--workers", "2"][..]].concat(), "corpus.json");

    assert!(ok1 && ok2);
    assert!(!stencil.is_empty());
    assert_eq!(stencil, sharded);
}

#[test]
fn test_verify_succeeds() {
    let (out, err, ok) = run_lemmatch(&["verify", "-l", "3"], "corpus.json");
    assert!(ok, "verify failed: {}\n{}", out, err);
    assert!(out.contains("exact  agrees: 2 matches"));
    assert!(out.contains("radix  agrees: 2 matches"));
}

#[test]
fn test_invalid_input_fails() {
    let (_, err, ok) = run_lemmatch(&["radix", "-d", "3"], "broken.json");
    assert!(!ok);
    assert!(err.contains("offsets and lengths"));

    let (_, _, ok) = run_lemmatch(&["radix", "-d", "0"], "corpus.json");
    assert!(!ok);

    // Two positions cannot span a window of one
    let (_, _, ok) = run_lemmatch(&["stencil", "--size", "2", "--width", "1"], "corpus.json");
    assert!(!ok);

    let (_, _, ok) = run_lemmatch(&["exact"], "missing.json");
    assert!(!ok);
}
