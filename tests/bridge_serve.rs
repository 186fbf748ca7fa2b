// Drives the compiled binary in --serve mode: JSON requests on stdin,
// JSON responses on stdout. HOME points at a temp dir so the run never
// touches real config or log files.

use assert_cmd::Command;
use serde_json::Value;

fn serve(bank: &str, requests: &[&str]) -> Vec<Value> {
    let home = tempfile::tempdir().unwrap();
    let bank_path = home.path().join("bank.json");
    std::fs::write(&bank_path, bank).unwrap();

    let mut stdin = requests.join("\n");
    stdin.push('\n');

    let output = Command::cargo_bin("typer")
        .unwrap()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .arg("--serve")
        .arg("--bank")
        .arg(&bank_path)
        .write_stdin(stdin)
        .output()
        .unwrap();
    assert!(output.status.success(), "typer --serve failed: {output:?}");

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn serve_full_single_text_run() {
    let responses = serve(
        r#"["cat"]"#,
        &[
            r#"{"op":"restart_progress"}"#,
            r#"{"op":"submit_input","typed":"c"}"#,
            r#"{"op":"submit_input","typed":"cat"}"#,
            r#"{"op":"summary"}"#,
            r#"{"op":"exit_app"}"#,
        ],
    );

    assert_eq!(responses.len(), 5);
    let start = &responses[0]["ok"];
    assert_eq!(start["target_text"], "cat");
    assert_eq!(start["typed_text"], "");
    assert_eq!(start["bank_progress"]["position"], 1);
    assert_eq!(start["bank_progress"]["total"], 1);
    assert_eq!(start["bank_progress"]["has_next"], false);

    assert_eq!(responses[1]["ok"]["metrics"]["started"], true);
    assert_eq!(responses[1]["ok"]["metrics"]["finished"], false);

    let done = &responses[2]["ok"]["metrics"];
    assert_eq!(done["finished"], true);
    assert_eq!(done["accuracy"], 100);
    assert_eq!(done["errors"], 0);

    assert_eq!(responses[3]["ok"]["results"][0]["index"], 1);
    assert_eq!(responses[4]["ok"], Value::Null);
}

#[test]
fn serve_error_tracking() {
    let responses = serve(
        r#"["cat"]"#,
        &[r#"{"op":"submit_input","typed":"cbt"}"#],
    );
    let metrics = &responses[0]["ok"]["metrics"];
    assert_eq!(metrics["errors"], 1);
    assert_eq!(metrics["accuracy"], 67);
}

#[test]
fn serve_reports_bad_requests() {
    let responses = serve(
        r#"["cat"]"#,
        &[
            "{",
            r#"{"op":"load_text_file","path":"/nowhere/at/all.txt"}"#,
            r#"{"op":"current"}"#,
        ],
    );
    assert_eq!(responses.len(), 3);
    assert!(responses[0]["error"].is_string());
    assert!(responses[1]["error"].as_str().unwrap().contains("/nowhere/at/all.txt"));
    assert_eq!(responses[2]["ok"]["target_text"], "cat");
}

#[test]
fn empty_bank_aborts_startup() {
    let home = tempfile::tempdir().unwrap();
    let bank_path = home.path().join("bank.json");
    std::fs::write(&bank_path, "[]").unwrap();

    let output = Command::cargo_bin("typer")
        .unwrap()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["--serve", "--bank"])
        .arg(&bank_path)
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("text bank is empty"));
}
