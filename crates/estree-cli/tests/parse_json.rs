//! Integration tests for `esparse` output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn esparse() -> Command {
    Command::new(env!("CARGO_BIN_EXE_esparse"))
}

fn write_source(dir: &Path, name: &str, source: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, source).expect("Failed to write source file");
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "esparse failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
fn test_script_file_prints_program() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "a.js", "var answer = 42;\n");

    let output = esparse().arg(&file).output().expect("Failed to run esparse");
    let json = stdout_json(&output);

    assert_eq!(json["type"], "Program");
    assert_eq!(json["sourceType"], "script");
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 17);
    let declaration = &json["body"][0];
    assert_eq!(declaration["type"], "VariableDeclaration");
    assert_eq!(declaration["kind"], "var");
    assert_eq!(declaration["declarations"][0]["id"]["name"], "answer");
    assert_eq!(declaration["declarations"][0]["init"]["value"], 42);
    assert!(json.get("loc").is_none());
}

#[test]
fn test_module_flag_enables_exports() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "m.js", "export const a = 1;");

    let output = esparse().arg(&file).output().expect("Failed to run esparse");
    assert!(!output.status.success(), "exports must fail as a script");

    let output = esparse().args(["--module", &file]).output().expect("Failed to run esparse");
    let json = stdout_json(&output);
    assert_eq!(json["sourceType"], "module");
    assert_eq!(json["body"][0]["type"], "ExportNamedDeclaration");
}

#[test]
fn test_syntax_error_is_reported_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "bad.js", "var a;\nvar a b;");

    let output = esparse().arg(&file).output().expect("Failed to run esparse");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no tree on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unexpected token"), "stderr: {stderr}");
    assert!(stderr.contains("[2:6]"), "stderr: {stderr}");
}

#[test]
fn test_loc_and_raw_flags() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "a.js", "x = 0x10;");

    let output = esparse()
        .args(["--loc", "--raw", "--compact", &file])
        .output()
        .expect("Failed to run esparse");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1, "compact output is one line");

    let json = stdout_json(&output);
    assert_eq!(json["loc"]["start"]["line"], 1);
    assert_eq!(json["loc"]["start"]["column"], 0);
    let right = &json["body"][0]["expression"]["right"];
    assert_eq!(right["value"], 16);
    assert_eq!(right["raw"], "0x10");
}

#[test]
fn test_config_file_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_source(dir.path(), "options.json", r#"{"loc": true}"#);
    let file = write_source(dir.path(), "m.js", "import a from 'a';");

    let output = esparse()
        .args(["--config", &config, &file])
        .output()
        .expect("Failed to run esparse");
    assert!(!output.status.success(), "config alone keeps the script goal");

    let output = esparse()
        .args(["--config", &config, "--module", &file])
        .output()
        .expect("Failed to run esparse");
    let json = stdout_json(&output);
    assert_eq!(json["body"][0]["type"], "ImportDeclaration");
    assert!(json["body"][0].get("loc").is_some(), "loc comes from the config file");
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_source(dir.path(), "options.json", r#"{"loc": "yes"}"#);
    let file = write_source(dir.path(), "a.js", "1");

    let output = esparse()
        .args(["--config", &config, &file])
        .output()
        .expect("Failed to run esparse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid config"), "stderr: {stderr}");
}

#[test]
fn test_tokens_flag_prints_token_stream() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(dir.path(), "a.js", "x = /a/g");

    let output = esparse().args(["--tokens", &file]).output().expect("Failed to run esparse");
    let json = stdout_json(&output);
    let tokens = json.as_array().expect("token stream is an array");

    let summary: Vec<(&str, &str)> = tokens
        .iter()
        .map(|token| (token["type"].as_str().unwrap(), token["value"].as_str().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Identifier", "x"),
            ("Punctuator", "="),
            ("RegularExpression", "/a/g"),
            ("EOF", ""),
        ]
    );
    assert_eq!(tokens[2]["start"], 4);
    assert_eq!(tokens[2]["end"], 8);
}

#[test]
fn test_reads_stdin() {
    let mut child = esparse()
        .arg("--compact")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn esparse");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"a?.b")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let json = stdout_json(&output);
    let expression = &json["body"][0]["expression"];
    assert_eq!(expression["type"], "ChainExpression");
    assert_eq!(expression["expression"]["optional"], true);
}
