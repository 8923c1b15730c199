//! Checks on the installed command-line binary

use std::process::Command;

const BINARY: &str = env!("CARGO_BIN_EXE_ugs-extract");

#[test]
fn test_binary_is_named_ugs_extract() {
    let output = Command::new(BINARY).arg("--help").output().unwrap();

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("Usage: ugs-extract"), "unexpected help: {}", help);
}

#[test]
fn test_unknown_flag_exits_with_error() {
    let output = Command::new(BINARY).arg("--no-such-flag").output().unwrap();

    assert!(!output.status.success());
}
