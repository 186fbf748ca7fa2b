//! Request/response bridge between a presentation layer and the engine.
//!
//! Each request names one engine operation; each reply carries the payload
//! that operation returned. [`serve`] runs the contract as JSON lines over
//! any reader/writer pair, which is how `typer --serve` talks to external
//! front ends.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::engine::{Payload, SessionEngine, Summary};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Current,
    RestartProgress,
    SubmitInput { typed: String },
    Tick,
    RepeatCurrent,
    NextText,
    Summary,
    Reset,
    LoadDemoText,
    SetText { text: String },
    LoadTextFile { path: PathBuf },
    ExitApp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Payload(Payload),
    Summary(Summary),
    /// Host should shut down; serialized as `null`
    Exit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Reply),
    Error(String),
}

pub fn dispatch<C: Clock>(
    engine: &mut SessionEngine<C>,
    command: Command,
) -> Result<Reply, EngineError> {
    let reply = match command {
        Command::Current => Reply::Payload(engine.current()),
        Command::RestartProgress => Reply::Payload(engine.restart_progress()),
        Command::SubmitInput { typed } => Reply::Payload(engine.submit_input(&typed)),
        Command::Tick => Reply::Payload(engine.tick()),
        Command::RepeatCurrent => Reply::Payload(engine.repeat_current()),
        Command::NextText => Reply::Payload(engine.next_text()),
        Command::Summary => Reply::Summary(engine.summary()),
        Command::Reset => Reply::Payload(engine.reset()),
        Command::LoadDemoText => Reply::Payload(engine.load_demo_text()),
        Command::SetText { text } => Reply::Payload(engine.set_text(&text)),
        Command::LoadTextFile { path } => Reply::Payload(engine.load_text_file(path)?),
        Command::ExitApp => Reply::Exit,
    };
    Ok(reply)
}

/// Handles one request line. Returns the response and whether the host should exit.
pub fn handle_line<C: Clock>(engine: &mut SessionEngine<C>, line: &str) -> (Response, bool) {
    let command = match serde_json::from_str::<Command>(line) {
        Ok(command) => command,
        Err(e) => {
            warn!(target: "bridge", error = %e, "malformed request");
            return (Response::Error(format!("malformed request: {e}")), false);
        }
    };
    debug!(target: "bridge", ?command, "request");

    match dispatch(engine, command) {
        Ok(Reply::Exit) => (Response::Ok(Reply::Exit), true),
        Ok(reply) => (Response::Ok(reply), false),
        Err(e) => {
            warn!(target: "bridge", error = %e, "operation failed");
            (Response::Error(e.to_string()), false)
        }
    }
}

/// Serves JSON-line requests until `exit_app` or end of input.
pub fn serve<C, R, W>(engine: &mut SessionEngine<C>, reader: R, mut writer: W) -> io::Result<()>
where
    C: Clock,
    R: BufRead,
    W: Write,
{
    info!(target: "bridge", "serving requests");
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (response, exit) = handle_line(engine, &line);
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        if exit {
            info!(target: "bridge", "exit requested");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::text_bank::TextBank;
    use assert_matches::assert_matches;
    use serde_json::{json, Value};

    fn engine(texts: &[&str]) -> SessionEngine<ManualClock> {
        let bank = TextBank::new(texts.iter().map(|t| t.to_string()).collect()).unwrap();
        SessionEngine::with_clock(bank, ManualClock::new())
    }

    fn run(engine: &mut SessionEngine<ManualClock>, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve(engine, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn command_wire_names() {
        let cmd: Command = serde_json::from_value(json!({"op": "submit_input", "typed": "ab"})).unwrap();
        assert_eq!(
            cmd,
            Command::SubmitInput {
                typed: "ab".into()
            }
        );
        let cmd: Command = serde_json::from_value(json!({"op": "restart_progress"})).unwrap();
        assert_eq!(cmd, Command::RestartProgress);
        let cmd: Command = serde_json::from_value(json!({"op": "exit_app"})).unwrap();
        assert_eq!(cmd, Command::ExitApp);
    }

    #[test]
    fn dispatch_summary_returns_summary() {
        let mut engine = engine(&["cat"]);
        engine.submit_input("cat");
        let reply = dispatch(&mut engine, Command::Summary).unwrap();
        assert_matches!(reply, Reply::Summary(s) if s.completed == 1);
    }

    #[test]
    fn dispatch_load_text_file_error() {
        let mut engine = engine(&["cat"]);
        let result = dispatch(
            &mut engine,
            Command::LoadTextFile {
                path: "/missing/file.txt".into(),
            },
        );
        assert_matches!(result, Err(EngineError::Load(_)));
    }

    #[test]
    fn serve_round_trip_session() {
        let mut engine = engine(&["cat"]);
        let responses = run(
            &mut engine,
            concat!(
                "{\"op\":\"restart_progress\"}\n",
                "{\"op\":\"submit_input\",\"typed\":\"c\"}\n",
                "\n",
                "{\"op\":\"submit_input\",\"typed\":\"cat\"}\n",
                "{\"op\":\"summary\"}\n",
            ),
        );

        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0]["ok"]["target_text"], "cat");
        assert_eq!(responses[0]["ok"]["bank_progress"]["position"], 1);
        assert_eq!(responses[1]["ok"]["metrics"]["started"], true);
        assert_eq!(responses[2]["ok"]["metrics"]["finished"], true);
        assert_eq!(responses[3]["ok"]["results"][0]["index"], 1);
        assert_eq!(responses[3]["ok"]["averages"]["accuracy"], 100.0);
    }

    #[test]
    fn serve_reports_malformed_and_continues() {
        let mut engine = engine(&["cat"]);
        let responses = run(&mut engine, "not json\n{\"op\":\"fly\"}\n{\"op\":\"current\"}\n");
        assert_eq!(responses.len(), 3);
        assert!(responses[0]["error"].as_str().unwrap().starts_with("malformed request"));
        assert!(responses[1].get("error").is_some());
        assert_eq!(responses[2]["ok"]["target_text"], "cat");
    }

    #[test]
    fn serve_stops_at_exit_app() {
        let mut engine = engine(&["cat"]);
        let responses = run(
            &mut engine,
            "{\"op\":\"exit_app\"}\n{\"op\":\"current\"}\n",
        );
        assert_eq!(responses, vec![json!({"ok": null})]);
    }
}
