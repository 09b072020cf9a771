#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

const PALETTE: [&str; 16] = [
    "#1d1f21", "#cc6666", "#b5bd68", "#f0c674", "#81a2be", "#b294bb", "#8abeb7", "#c5c8c6",
    "#969896", "#de935f", "#282a2e", "#373b41", "#b4b7b4", "#e0e0e0", "#a3685a", "#ffffff",
];

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/themetoken-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn themetoken(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_themetoken"))
        .env_remove("THEMETOKEN_BACKEND")
        .env_remove("THEMETOKEN_COMPRESS_CMD")
        .env_remove("THEMETOKEN_DECOMPRESS_CMD")
        .env_remove("THEMETOKEN_TIMEOUT")
        .env_remove("THEMETOKEN_LOG_LEVEL")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("themetoken should run")
}

fn zstd(args: &[&str]) -> Output {
    let mut all = vec!["--backend", "zstd"];
    all.extend_from_slice(args);
    themetoken(&all)
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn encode_then_decode_text() {
    let encoded = zstd(&["-e", "hello"]);
    assert!(encoded.status.success());
    let token = stdout_lines(&encoded).remove(0);
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    let decoded = zstd(&["-d", &token]);
    assert!(decoded.status.success());
    assert_eq!(stdout_lines(&decoded), vec!["hello"]);
}

#[test]
fn pasted_token_with_surrounding_whitespace_decodes() {
    let token = stdout_lines(&zstd(&["-e", "hello"])).remove(0);
    let pasted = format!("  {token}\n");

    let decoded = zstd(&["-d", &pasted]);
    assert_eq!(stdout_lines(&decoded), vec!["hello"]);

    let padded = zstd(&["-d", &format!("{token}=")]);
    assert!(padded.stdout.is_empty());
    assert!(String::from_utf8_lossy(&padded.stderr).contains("error: decode failed:"));
}

#[test]
fn json_document_roundtrips_compactly() {
    let encoded = zstd(&["--json", r#"{ "a": 1, "b": [2, 3] }"#]);
    let token = stdout_lines(&encoded).remove(0);

    let decoded = zstd(&["--decode", &token]);
    assert_eq!(stdout_lines(&decoded), vec![r#"{"a":1,"b":[2,3]}"#]);
}

#[test]
fn process_backend_uses_configured_filters() {
    let encoded = themetoken(&["--compress-cmd", "cat", "--decompress-cmd", "cat", "-e", "hi"]);
    assert!(encoded.status.success());
    let token = stdout_lines(&encoded).remove(0);

    let decoded = themetoken(&["--compress-cmd", "cat", "--decompress-cmd", "cat", "-d", &token]);
    assert_eq!(stdout_lines(&decoded), vec!["hi"]);
}

#[test]
fn requests_run_in_command_line_order() {
    let first = stdout_lines(&zstd(&["-e", "one"])).remove(0);

    let output = zstd(&["-e", "two", "-d", &first, "-e", "three"]);
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "one");

    let second = stdout_lines(&zstd(&["-d", &lines[0], "-d", &lines[2]]));
    assert_eq!(second, vec!["two", "three"]);
}

#[test]
fn failed_request_is_reported_and_processing_continues() {
    let good = stdout_lines(&zstd(&["-e", "still here"])).remove(0);

    let output = zstd(&["-d", "not!a!token", "-d", &good]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["still here"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: decode failed:"));
}

#[test]
fn missing_compressor_reports_spawn_failure() {
    let output = themetoken(&["--compress-cmd", "/nonexistent/themetoken-lzma -c", "-e", "x"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: encode failed:"));
    assert!(stderr.contains("failed to start"));
}

#[test]
fn no_requests_is_usage_error() {
    let output = themetoken(&[]);
    assert_eq!(output.status.code(), Some(64));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_flag_is_rejected() {
    let output = themetoken(&["--bogus"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn theme_file_produces_titled_theme() {
    let dir = unique_temp_dir("theme");
    let scheme = dir.join("tomorrow.txt");
    std::fs::write(&scheme, PALETTE.join("\n")).expect("scheme should be writable");
    let scheme_arg = scheme.display().to_string();

    let encoded = zstd(&["--theme", &scheme_arg]);
    assert!(encoded.status.success());
    let token = stdout_lines(&encoded).remove(0);

    let decoded = zstd(&["-d", &token]);
    let theme: serde_json::Value =
        serde_json::from_str(&stdout_lines(&decoded).remove(0)).expect("theme should be JSON");
    assert_eq!(theme["title"], "tomorrow");
    assert_eq!(theme["colors"]["toolbar_text"]["r"], 255);
    assert_eq!(
        theme["images"]["additional_backgrounds"],
        serde_json::json!([])
    );

    let retitled = zstd(&["--title", "night", "--theme", &scheme_arg]);
    let token = stdout_lines(&retitled).remove(0);
    let decoded = zstd(&["-d", &token]);
    assert!(stdout_lines(&decoded)[0].contains(r#""title":"night""#));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn json_format_describes_each_request() {
    let output = zstd(&["--format", "json", "-e", "hello"]);
    let line = stdout_lines(&output).remove(0);
    let parsed: serde_json::Value = serde_json::from_str(&line).expect("output should be JSON");
    assert_eq!(parsed["operation"], "encode");
    assert_eq!(parsed["backend"], "zstd");
    assert_eq!(parsed["input"], "hello");
    assert!(parsed["output"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn pretty_format_labels_results() {
    let output = zstd(&["--format", "pretty", "-e", "hello"]);
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "encoded value:");
    assert_eq!(lines.len(), 2);
}

#[test]
fn version_and_envinfo() {
    let version = themetoken(&["version"]);
    assert!(version.status.success());
    assert!(String::from_utf8_lossy(&version.stdout).starts_with("themetoken "));

    let envinfo = zstd(&["--format", "json", "envinfo"]);
    assert!(envinfo.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&envinfo.stdout).expect("envinfo should be JSON");
    assert_eq!(parsed["codec"]["backend"], "zstd");
}
