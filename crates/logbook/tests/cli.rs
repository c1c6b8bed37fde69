//! Tests that drive the `logbook` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    fn database(&self) -> PathBuf {
        self.dir.path().join("my.db")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_logbook"));
        cmd.arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--database")
            .arg(self.database())
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("failed to run logbook")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn logbook");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for logbook")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

#[test]
fn add_with_flags_then_get() {
    let ws = Workspace::new();

    let added = ws.run(&["add", "--callsign", "KYYZZ", "--name", "Test User"]);
    assert!(added.status.success(), "stderr: {}", stderr(&added));
    assert!(stdout(&added).contains("saved"));
    assert!(exists(&ws.database()));

    let got = ws.run(&["get", "-c", "KYYZZ"]);
    assert!(got.status.success(), "stderr: {}", stderr(&got));
    let out = stdout(&got);
    assert!(out.contains("CALL SIGN"));
    assert!(out.contains("KYYZZ"));
    assert!(out.contains("Test User"));
    assert!(out.contains("| 1  |"));
}

#[test]
fn add_prompts_on_stdin() {
    let ws = Workspace::new();

    let added = ws.run_with_stdin(&["add"], "W1AW\nHiram Percy Maxim\n");
    assert!(added.status.success(), "stderr: {}", stderr(&added));
    let out = stdout(&added);
    assert!(out.contains("Call Sign: "));
    assert!(out.contains("Enter Name: "));
    assert!(out.contains("saved"));

    let got = ws.run(&["get", "--callsign", "W1AW"]);
    assert!(stdout(&got).contains("Hiram Percy Maxim"));
}

#[test]
fn add_rejects_empty_call_sign() {
    let ws = Workspace::new();

    let added = ws.run_with_stdin(&["add"], "\nNobody\n");
    assert!(!added.status.success());
    assert!(stderr(&added).contains("call sign"));
}

#[test]
fn second_add_gets_next_id() {
    let ws = Workspace::new();

    ws.run(&["add", "-c", "KYYZZ", "-n", "Test User"]);
    ws.run(&["add", "-c", "KYYZZ", "-n", "Test User"]);

    let out = stdout(&ws.run(&["get", "-c", "KYYZZ"]));
    assert!(out.contains("| 2  |"));
}

#[test]
fn get_missing_call_sign_fails() {
    let ws = Workspace::new();
    ws.run(&["add", "-c", "KYYZZ", "-n", "Test User"]);

    let got = ws.run(&["get", "-c", "NOPE"]);
    assert!(!got.status.success());
    assert!(stderr(&got).contains("not found"));
}

#[test]
fn list_empty_and_populated() {
    let ws = Workspace::new();

    let empty = ws.run(&["list"]);
    assert!(empty.status.success(), "stderr: {}", stderr(&empty));
    let lines: Vec<String> = stdout(&empty)
        .lines()
        .filter(|l| l.starts_with('|'))
        .map(str::to_string)
        .collect();
    assert_eq!(lines, vec!["| ID | CALL SIGN |", "|----|-----------|"]);

    ws.run(&["add", "-c", "W1AW", "-n", "Hiram"]);
    ws.run(&["add", "-c", "K1ABC", "-n", "Alice"]);

    let out = stdout(&ws.run(&["list"]));
    let k1 = out.find("K1ABC").expect("K1ABC listed");
    let w1 = out.find("W1AW").expect("W1AW listed");
    assert!(k1 < w1, "entries should be in key order:\n{out}");
    assert!(!out.contains("Alice"));
}

#[test]
fn config_show_json_reflects_defaults() {
    let ws = Workspace::new();

    let shown = ws.run(&["config", "show", "--json"]);
    assert!(shown.status.success(), "stderr: {}", stderr(&shown));
    let value: serde_json::Value = serde_json::from_str(&stdout(&shown)).unwrap();
    assert_eq!(value["storage"]["bucket"], "users");
    assert_eq!(value["storage"]["lock_timeout_ms"], 1000);
}
