//! End-to-end tests for the `symnmf` binary.
//!
//! Each test writes a point file to the temp dir, runs the binary and checks
//! stdout and the exit code.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

const ERROR_LINE: &str = "An Error Has Occurred";

fn write_points(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("symnmf-cli-{}-{name}.txt", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn symnmf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_symnmf"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to spawn symnmf: {e}"))
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn cli_sym_prints_matrix() {
    let path = write_points("sym", "0,0\n0,1\n10,10\n10,11\n");
    let out = symnmf(&["sym", path.to_str().unwrap()]);
    assert!(out.status.success());
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "0.0000,0.6065,0.0000,0.0000");
    assert_eq!(lines[1], "0.6065,0.0000,0.0000,0.0000");
}

#[test]
fn cli_ddg_prints_diagonal() {
    let path = write_points("ddg", "0,0\n0,1\n10,10\n10,11\n");
    let out = symnmf(&["ddg", path.to_str().unwrap()]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert_eq!(text.lines().next(), Some("0.6065,0.0000,0.0000,0.0000"));
}

#[test]
fn cli_norm_two_pairs() {
    let path = write_points("norm", "0,0\n0,1\n10,10\n10,11\n");
    let out = symnmf(&["norm", path.to_str().unwrap()]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert_eq!(text.lines().next(), Some("0.0000,1.0000,0.0000,0.0000"));
}

#[test]
fn cli_symnmf_json() {
    let path = write_points("symnmf", "0,0\n0,1\n10,10\n10,11\n");
    let out = symnmf(&["symnmf", path.to_str().unwrap(), "-k", "2", "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let labels = json["assignments"].as_array().unwrap();
    assert_eq!(labels.len(), 4);
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
}

#[test]
fn cli_symnmf_without_k_fails() {
    let path = write_points("nok", "0,0\n0,1\n10,10\n10,11\n");
    let out = symnmf(&["symnmf", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}

#[test]
fn cli_invalid_goal_fails() {
    let path = write_points("goal", "0,0\n0,1\n");
    let out = symnmf(&["cluster", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}

#[test]
fn cli_missing_file_fails() {
    let out = symnmf(&["sym", "/definitely/not/here.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}

#[test]
fn cli_ragged_file_fails() {
    let path = write_points("ragged", "0,0\n0\n");
    let out = symnmf(&["sym", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_degenerate_norm_fails() {
    let path = write_points("degenerate", "0,0\n0,1\n5000,5000\n");
    let out = symnmf(&["norm", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}

#[test]
fn cli_missing_arguments_fails() {
    let out = symnmf(&["sym"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}

#[test]
fn cli_nan_point_fails() {
    let path = write_points("nan", "nan,0\n0,0\n0,1\n");
    let out = symnmf(&["norm", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out).trim(), ERROR_LINE);
}
