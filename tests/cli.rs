//! Exit status and messages of the `pdf2png` binary.
//!
//! None of these runs reach a PDF engine: they stop at a missing folder, an
//! empty folder or an unreadable one, so they run everywhere.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Run the binary in `cwd` with a clean `PDF2PNG_*` environment.
fn pdf2png(cwd: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pdf2png"));
    for var in [
        "PDF2PNG_INPUT_DIR",
        "PDF2PNG_OUTPUT_DIR",
        "PDF2PNG_DPI",
        "PDF2PNG_BACKEND",
        "PDF2PNG_PASSWORD",
        "PDF2PNG_INSPECT_ONLY",
        "PDF2PNG_JSON",
        "PDF2PNG_NO_PROGRESS",
        "PDF2PNG_VERBOSE",
        "PDF2PNG_QUIET",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.current_dir(cwd)
        .arg("--no-progress")
        .args(args)
        .output()
        .expect("pdf2png binary should start")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

// ── Exit status ──────────────────────────────────────────────────────────────

#[test]
fn no_folders_exits_2_and_writes_nothing() {
    let cwd = tempfile::tempdir().unwrap();

    let out = pdf2png(cwd.path(), &[]);

    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("Usage:"), "stderr: {}", stderr(&out));
    assert!(is_empty_dir(cwd.path()));
}

#[test]
fn missing_output_folder_argument_exits_2() {
    let cwd = tempfile::tempdir().unwrap();
    fs::create_dir(cwd.path().join("in")).unwrap();

    let out = pdf2png(cwd.path(), &["in"]);

    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
}

#[test]
fn empty_input_folder_exits_0_with_notice() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("notes.txt"), "not a pdf").unwrap();

    let out = pdf2png(
        root.path(),
        &[input.to_str().unwrap(), output.to_str().unwrap()],
    );

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(
        stderr(&out).contains("No PDF files found"),
        "stderr: {}",
        stderr(&out)
    );
    assert!(!output.exists());
}

#[test]
fn empty_input_folder_json_reports_nothing_to_do() {
    let root = tempfile::tempdir().unwrap();
    let out = pdf2png(
        root.path(),
        &["--json", root.path().to_str().unwrap(), "out"],
    );

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(report["status"], "nothing_to_do");
}

#[test]
fn unreadable_input_folder_exits_1() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("does-not-exist");
    let output = root.path().join("out");

    let out = pdf2png(
        root.path(),
        &[missing.to_str().unwrap(), output.to_str().unwrap()],
    );

    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));
    assert!(
        stderr(&out).contains("Conversion failed"),
        "stderr: {}",
        stderr(&out)
    );
    assert!(!output.exists());
}

#[test]
fn out_of_range_dpi_is_rejected_by_the_parser() {
    let cwd = tempfile::tempdir().unwrap();
    let out = pdf2png(cwd.path(), &["--dpi", "1200", "in", "out"]);

    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
    assert!(is_empty_dir(cwd.path()));
}

// ── Help text ────────────────────────────────────────────────────────────────

#[test]
fn password_help_warns_about_process_list() {
    let cwd = tempfile::tempdir().unwrap();
    let out = pdf2png(cwd.path(), &["--help"]);

    assert_eq!(out.status.code(), Some(0));
    let help = String::from_utf8_lossy(&out.stdout);
    assert!(help.contains("`ps`"), "help: {help}");
}
