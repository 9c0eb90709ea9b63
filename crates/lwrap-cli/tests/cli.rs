//! End-to-end tests of the `wraps` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// `wraps` with a locale-free, width-free environment.
fn wraps() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wraps"));
    for key in ["COLUMNS", "LANG", "LC_ALL", "LC_CTYPE", "RUST_LOG"] {
        cmd.env_remove(key);
    }
    cmd.env("LWRAP_CJK_WIDTH", "0");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn wraps");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for wraps")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

fn lines(parts: &[&str]) -> String {
    parts.iter().map(|p| format!("{p}{EOL}")).collect()
}

#[test]
fn wraps_inline_text() {
    let output = wraps()
        .args(["-w", "10", "-t", "the quick brown fox"])
        .output()
        .expect("run wraps");
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("the quick{EOL}brown fox{EOL}"));
}

#[test]
fn each_text_wrapped_separately() {
    let output = wraps()
        .args(["-w", "20", "-t", "one", "-t", "two"])
        .output()
        .expect("run wraps");
    assert_eq!(stdout(&output), lines(&["one", "two"]));
}

#[test]
fn reads_stdin_by_default() {
    let mut cmd = wraps();
    cmd.args(["--width", "4"]);
    let output = run_with_stdin(cmd, "foo\nbar baz\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), lines(&["foo", "bar", "baz"]));
}

#[test]
fn reads_files_after_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "ab bc").expect("write input");

    let output = wraps()
        .args(["-w", "4", "-i", "2", "-t", "first"])
        .arg(&path)
        .output()
        .expect("run wraps");
    assert!(output.status.success());
    assert_eq!(stdout(&output), lines(&["  first", "  ab", "  bc"]));
}

#[test]
fn writes_out_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.txt");
    let output = wraps()
        .args(["-w", "80", "-t", "hello world", "-o"])
        .arg(&out)
        .output()
        .expect("run wraps");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&out).expect("read output"),
        format!("hello world{EOL}")
    );
}

#[test]
fn html_escaping() {
    let output = wraps()
        .args(["--html", "-t", "a < b & c"])
        .output()
        .expect("run wraps");
    assert_eq!(stdout(&output), lines(&["a &lt; b &amp; c"]));
}

#[test]
fn overflow_styles() {
    let clip = wraps()
        .args(["-w", "4", "--overflow", "clip", "-t", "abcde"])
        .output()
        .expect("run wraps");
    assert_eq!(stdout(&clip), lines(&["abc\u{2026}"]));

    let anywhere = wraps()
        .args(["-w", "4", "--overflow", "anywhere", "-t", "abcde"])
        .output()
        .expect("run wraps");
    assert_eq!(stdout(&anywhere), lines(&["abc-", "de"]));
}

#[test]
fn width_from_columns() {
    let output = wraps()
        .env("COLUMNS", "5")
        .args(["-t", "aa bb cc"])
        .output()
        .expect("run wraps");
    assert_eq!(stdout(&output), lines(&["aa bb", "cc"]));
}

#[test]
fn invalid_overflow_exits_64() {
    let output = wraps()
        .args(["--overflow", "wrap", "-t", "x"])
        .output()
        .expect("run wraps");
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid overflow style"));
}

#[test]
fn no_room_to_wrap_exits_64() {
    let output = wraps()
        .args(["-w", "2", "-i", "2", "-t", "x"])
        .output()
        .expect("run wraps");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn unknown_flag_exits_64() {
    let output = wraps().arg("--bogus").output().expect("run wraps");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn missing_file_exits_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = wraps()
        .arg(dir.path().join("missing.txt"))
        .output()
        .expect("run wraps");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.txt"));
}

#[test]
fn verbose_traces_to_stderr() {
    let output = wraps()
        .args(["-v", "-w", "5", "-t", "ab cd ef"])
        .output()
        .expect("run wraps");
    assert!(output.status.success());
    assert_eq!(stdout(&output), lines(&["ab cd", "ef"]));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fragment"));
    assert!(stderr.contains("Wrap"));
}
