/*
 * cli_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests for the mtc binary.
 */

use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Write a template into a fresh temp directory and run mtc on it.
fn run_template(template: &str, args: &[&str]) -> (TempDir, Output) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let path = temp.path().join("input.template");
    fs::write(&path, template).expect("Failed to write template");

    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .args(args)
        .arg(&path)
        .output()
        .expect("Failed to execute mtc");
    (temp, output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_defines() {
    let (_temp, output) = run_template(
        "ABC {{v1}} || {{v2}} XYZ",
        &["-D", "v1=happy", "--define", "v2=days!"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "ABC happy || days! XYZ");
}

#[test]
fn test_define_paths_build_structure() {
    let (_temp, output) = run_template(
        "{{for x in list}}[{{x.key}}={{x.value}}]{{endfor}}",
        &["-D", "list[2]=c", "-D", "list[0]=a"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "[0=a][1=None][2=c]");
}

#[test]
fn test_invalid_define() {
    let (_temp, output) = run_template("x", &["-D", "novalue"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid define"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_define_key_too_long() {
    let define = format!("{}=v", "k".repeat(256));
    let (_temp, output) = run_template("x", &["-D", &define]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Define key too long"));
}

#[test]
fn test_data_files_then_defines() {
    let temp = TempDir::new().unwrap();
    let json = temp.path().join("data.json");
    let yaml = temp.path().join("more.yaml");
    fs::write(&json, r#"{"title": "From JSON", "who": "json"}"#).unwrap();
    fs::write(&yaml, "items:\n  - one\n  - two\n").unwrap();

    let (_t, output) = run_template(
        "{{title}} by {{who}}:{{for i in items}} {{i.value}}{{endfor}}",
        &[
            "-d",
            json.to_str().unwrap(),
            "--data",
            yaml.to_str().unwrap(),
            "-D",
            "who=define",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "From JSON by define: one two");
}

#[test]
fn test_non_utf8_template() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("latin1.template");
    fs::write(&path, b"caf\xe9 {{v}}\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .args(["-D", "v=x"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(output.stdout, b"caf\xe9 x\n");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_define_value() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("input.template");
    fs::write(&path, "[{{v}}]").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .arg("-D")
        .arg(OsStr::from_bytes(b"v=\xff\xfe"))
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(output.stdout, b"[\xff\xfe]");
}

#[test]
fn test_output_file() {
    let temp = TempDir::new().unwrap();
    let out_path = temp.path().join("out.txt");
    let (_t, output) = run_template(
        "hello {{name}}\n",
        &["-D", "name=world", "-o", out_path.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "hello world\n");
}

#[test]
fn test_template_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .args(["-D", "v=1", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn mtc");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"{{if v}}yes{{else}}no{{endif}}")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "yes");
}

#[test]
fn test_compile_error_report() {
    let (_temp, output) = run_template("ok\n{{if a}}x{{else}}y{{else}}z{{endif}}\n", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.contains("\"else\" inside \"else\" at line 2"), "{err}");
    assert!(err.contains("input.template:2:"), "{err}");
}

#[test]
fn test_render_error_keeps_earlier_output() {
    let (_temp, output) = run_template("before {{missing}} after", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "before ");
    assert!(
        stderr(&output).contains("Error in variable substitution: Name \"missing\" not found"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_missing_template() {
    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .arg("/nonexistent/file.template")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to read template"));
}

#[test]
fn test_usage_errors_and_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_mtc")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .args(["--bogus", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = Command::new(env!("CARGO_BIN_EXE_mtc"))
        .arg("--help")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("--define"));
}
