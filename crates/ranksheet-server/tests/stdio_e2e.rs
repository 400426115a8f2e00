use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tempfile::TempDir;

fn spawn_server(dir: &TempDir, envs: &[(&str, &str)]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let db = dir.path().join("scores.db");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ranksheet-server"));
    cmd.arg("--db")
        .arg(&db)
        .env("RANKSHEET_COOLDOWN_SECS", "0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("failed to spawn server");
    let stdin = child.stdin.take().expect("failed to open stdin");
    let stdout = child.stdout.take().expect("failed to open stdout");
    (child, stdin, BufReader::new(stdout))
}

fn read_response(reader: &mut BufReader<ChildStdout>) -> Value {
    let mut line = String::new();
    reader.read_line(&mut line).expect("failed to read response");
    serde_json::from_str(&line).expect("response is not JSON")
}

#[test]
fn submit_then_rank_then_stats_flow() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut reader) = spawn_server(&dir, &[]);

    let submit = serde_json::json!({
        "op": "submit",
        "id": 1,
        "params": {
            "identity": { "name": "A. Kumar", "email": "a@example.com" },
            "category": "OBC",
            "shift": "2",
            "attempted": 65,
            "correct": 60,
            "wrong": 5
        }
    });
    writeln!(stdin, "{}", submit).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], true, "submit failed: {:?}", resp);
    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["raw_score"], 97.18);

    let rank = serde_json::json!({
        "op": "rank",
        "id": 2,
        "params": { "name": "A. Kumar", "email": "a@example.com" }
    });
    writeln!(stdin, "{}", rank).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], true, "rank failed: {:?}", resp);
    assert_eq!(resp["result"]["overall"]["rank"], 1);
    assert_eq!(resp["result"]["overall"]["population"], 1);
    assert_eq!(resp["result"]["persisted"], true);

    let stats = serde_json::json!({ "op": "stats", "id": 3 });
    writeln!(stdin, "{}", stats).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], true);
    assert_eq!(resp["result"]["rows"], 1);
    assert_eq!(resp["result"]["ranked_rows"], 1);

    drop(stdin);
    let status = child.wait().unwrap();
    assert!(status.success());
}

#[test]
fn malformed_lines_are_skipped_without_killing_the_loop() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut reader) = spawn_server(&dir, &[]);

    writeln!(stdin, "this is not json").unwrap();
    writeln!(stdin, "{}", serde_json::json!({ "op": "stats", "id": 7 })).unwrap();

    // The malformed line produces no response; the stats line does.
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], true);
    assert_eq!(resp["id"], 7);

    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn unknown_ops_and_lookup_failures_are_structured_errors() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut reader) = spawn_server(&dir, &[]);

    writeln!(stdin, "{}", serde_json::json!({ "op": "export", "id": 1 })).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "E_UNKNOWN_OP");

    let rank = serde_json::json!({
        "op": "rank",
        "id": 2,
        "params": { "name": "Nobody", "email": "nobody@example.com" }
    });
    writeln!(stdin, "{}", rank).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "E_LOOKUP");

    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn oversized_lines_are_rejected_before_parsing() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut reader) = spawn_server(&dir, &[("RANKSHEET_MAX_BYTES", "64")]);

    let huge = format!(
        "{}",
        serde_json::json!({ "op": "stats", "padding": "x".repeat(200) })
    );
    writeln!(stdin, "{}", huge).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "E_LIMIT_EXCEEDED");

    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn cooldown_applies_between_submit_and_rank() {
    let dir = TempDir::new().unwrap();
    // Override the test default of 0 with a real window.
    let (mut child, mut stdin, mut reader) = spawn_server(&dir, &[("RANKSHEET_COOLDOWN_SECS", "300")]);

    let submit = serde_json::json!({
        "op": "submit",
        "id": 1,
        "params": {
            "identity": { "name": "A. Kumar", "email": "a@example.com" },
            "category": "OBC",
            "shift": "2",
            "attempted": 65,
            "correct": 60,
            "wrong": 5
        }
    });
    writeln!(stdin, "{}", submit).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], true);

    let rank = serde_json::json!({
        "op": "rank",
        "id": 2,
        "params": { "name": "A. Kumar", "email": "a@example.com" }
    });
    writeln!(stdin, "{}", rank).unwrap();
    let resp = read_response(&mut reader);
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "E_COOLDOWN");

    drop(stdin);
    assert!(child.wait().unwrap().success());
}
