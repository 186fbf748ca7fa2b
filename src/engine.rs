//! Typing session engine: one live attempt over a text bank, plus the
//! history of completed attempts.
//!
//! Every operation returns a [`Payload`] describing the whole observable
//! state, so a presentation layer never has to keep engine state of its own.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;
use crate::loader;
use crate::metrics;
use crate::text_bank::{BankProgress, TextBank};
use crate::typing_policy::{self, InputMode};

/// Observable lifecycle of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No text to type. Part of the wire vocabulary; a validated bank never produces it.
    NoText,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub elapsed_seconds: f64,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    /// True only in the payload of the call that started the timer
    pub started: bool,
    /// True only in the payload of the call that completed the attempt
    pub finished: bool,
    pub status: Status,
    pub target_length: usize,
    pub typed_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub target_text: String,
    pub typed_text: String,
    pub metrics: Metrics,
    pub bank_progress: BankProgress,
}

/// Recorded outcome of one completed attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// 1-based bank position of the completed text
    pub index: usize,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    /// Elapsed seconds
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Texts in the bank
    pub total: usize,
    /// Recorded results
    pub completed: usize,
    pub results: Vec<AttemptResult>,
    pub averages: Averages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Bank { index: usize },
    Custom,
}

#[derive(Debug, Clone, Copy, Default)]
struct Transition {
    started: bool,
    finished: bool,
}

#[derive(Debug, Clone)]
struct Attempt {
    origin: Origin,
    target_text: String,
    target: Vec<char>,
    typed: Vec<char>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    error_count: usize,
    last_input: Vec<char>,
    recorded: bool,
}

impl Attempt {
    fn new(target_text: String, origin: Origin) -> Self {
        let target = target_text.chars().collect();
        Self {
            origin,
            target_text,
            target,
            typed: Vec::new(),
            started_at: None,
            finished_at: None,
            error_count: 0,
            last_input: Vec::new(),
            recorded: false,
        }
    }

    fn from_bank(bank: &TextBank) -> Self {
        Self::new(
            bank.current_text().to_string(),
            Origin::Bank {
                index: bank.position(),
            },
        )
    }

    /// Fresh attempt over the same text
    fn restarted(&self) -> Self {
        Self::new(self.target_text.clone(), self.origin)
    }

    fn is_complete(&self) -> bool {
        self.finished_at.is_some() || self.target.is_empty()
    }

    fn status(&self) -> Status {
        if self.is_complete() {
            Status::Completed
        } else if self.started_at.is_some() {
            Status::Running
        } else {
            Status::Ready
        }
    }

    fn elapsed_seconds(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => {
                let end = self.finished_at.unwrap_or(now);
                end.saturating_duration_since(start).as_secs_f64()
            }
            None => 0.0,
        }
    }

    fn apply(&mut self, mode: InputMode, input: &str, now: Instant) -> Transition {
        if self.is_complete() {
            return Transition::default();
        }

        let input: Vec<char> = input
            .replace("\r\n", "\n")
            .chars()
            .take(self.target.len())
            .collect();

        let accepted = typing_policy::accept(
            mode,
            &input,
            &self.target,
            &self.last_input,
            self.error_count,
        );
        self.typed = accepted.typed;
        self.error_count = accepted.errors;
        self.last_input = input;

        let mut transition = Transition::default();
        if !self.typed.is_empty() && self.started_at.is_none() {
            self.started_at = Some(now);
            transition.started = true;
        }
        if self.typed.len() == self.target.len() {
            self.finished_at = Some(now);
            transition.finished = true;
        }
        transition
    }

    fn metrics(&self, now: Instant, transition: Transition) -> Metrics {
        let elapsed_seconds = self.elapsed_seconds(now);
        Metrics {
            elapsed_seconds,
            wpm: metrics::words_per_minute(self.typed.len(), elapsed_seconds),
            accuracy: metrics::accuracy(self.typed.len(), self.error_count),
            errors: self.error_count,
            started: transition.started,
            finished: transition.finished,
            status: self.status(),
            target_length: self.target.len(),
            typed_length: self.typed.len(),
        }
    }

    fn payload(&self, now: Instant, transition: Transition, progress: BankProgress) -> Payload {
        Payload {
            target_text: self.target_text.clone(),
            typed_text: self.typed.iter().collect(),
            metrics: self.metrics(now, transition),
            bank_progress: progress,
        }
    }

    /// The result of a finished bank attempt, handed out once.
    fn take_result(&mut self, now: Instant) -> Option<AttemptResult> {
        let Origin::Bank { index } = self.origin else {
            return None;
        };
        if self.recorded || !self.is_complete() {
            return None;
        }
        self.recorded = true;

        let m = self.metrics(now, Transition::default());
        Some(AttemptResult {
            index: index + 1,
            wpm: m.wpm,
            accuracy: m.accuracy,
            errors: m.errors,
            time: m.elapsed_seconds,
        })
    }
}

fn column_mean(results: &[AttemptResult], f: impl Fn(&AttemptResult) -> f64) -> f64 {
    let values: Vec<f64> = results.iter().map(f).collect();
    metrics::mean(&values).unwrap_or(0.0)
}

/// Single-session typing engine. The host owns exactly one and serializes calls.
#[derive(Debug)]
pub struct SessionEngine<C: Clock = SystemClock> {
    bank: TextBank,
    clock: C,
    mode: InputMode,
    attempt: Option<Attempt>,
    history: Vec<AttemptResult>,
}

impl SessionEngine<SystemClock> {
    pub fn new(bank: TextBank) -> Self {
        Self::with_clock(bank, SystemClock)
    }
}

impl<C: Clock> SessionEngine<C> {
    pub fn with_clock(bank: TextBank, clock: C) -> Self {
        Self {
            bank,
            clock,
            mode: InputMode::default(),
            attempt: None,
            history: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn bank(&self) -> &TextBank {
        &self.bank
    }

    pub fn history(&self) -> &[AttemptResult] {
        &self.history
    }

    /// Current state, creating the first attempt if needed. Never touches timers.
    pub fn current(&mut self) -> Payload {
        if let Some(attempt) = &self.attempt {
            let now = self.clock.now();
            return attempt.payload(now, Transition::default(), self.bank.progress());
        }
        self.begin(Attempt::from_bank(&self.bank))
    }

    /// New session: first text, empty history.
    pub fn restart_progress(&mut self) -> Payload {
        self.bank.reset();
        self.history.clear();
        info!(target: "engine", total = self.bank.len(), "session restarted");
        self.begin(Attempt::from_bank(&self.bank))
    }

    pub fn submit_input(&mut self, typed: &str) -> Payload {
        let now = self.clock.now();
        let mode = self.mode;
        let bank = &self.bank;
        let attempt = self
            .attempt
            .get_or_insert_with(|| Attempt::from_bank(bank));

        let transition = attempt.apply(mode, typed, now);
        if transition.started {
            debug!(target: "engine", "attempt started");
        }
        if transition.finished {
            if let Some(result) = attempt.take_result(now) {
                info!(
                    target: "engine",
                    index = result.index,
                    wpm = result.wpm,
                    accuracy = result.accuracy,
                    errors = result.errors,
                    "attempt completed"
                );
                self.history.push(result);
            }
        }
        attempt.payload(now, transition, self.bank.progress())
    }

    /// Live metrics with the current time as provisional end.
    pub fn tick(&mut self) -> Payload {
        self.current()
    }

    /// Drops the current attempt without recording it and starts over on the same text.
    pub fn repeat_current(&mut self) -> Payload {
        let attempt = match &self.attempt {
            Some(attempt) => attempt.restarted(),
            None => Attempt::from_bank(&self.bank),
        };
        debug!(target: "engine", "repeating current text");
        self.begin(attempt)
    }

    pub fn reset(&mut self) -> Payload {
        self.repeat_current()
    }

    /// Moves to the next bank text, or repeats the last one at the end of the bank.
    /// An unfinished attempt is discarded, not finalized.
    pub fn next_text(&mut self) -> Payload {
        if !self.bank.advance() {
            debug!(target: "engine", "no more texts, staying on the last one");
        }
        self.begin(Attempt::from_bank(&self.bank))
    }

    /// Back to the first bank text, keeping the results recorded so far.
    pub fn load_demo_text(&mut self) -> Payload {
        self.bank.reset();
        self.begin(Attempt::from_bank(&self.bank))
    }

    /// Practice an arbitrary text. Custom attempts are never recorded.
    pub fn set_text(&mut self, text: &str) -> Payload {
        let text = loader::normalize_text(text);
        debug!(target: "engine", chars = text.chars().count(), "custom text set");
        self.begin(Attempt::new(text, Origin::Custom))
    }

    /// Like [`Self::set_text`] with the contents of `path`. The current attempt
    /// survives a read failure.
    pub fn load_text_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Payload, EngineError> {
        let text = loader::read_custom_text(path.as_ref())?;
        Ok(self.set_text(&text))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.bank.len(),
            completed: self.history.len(),
            results: self.history.clone(),
            averages: Averages {
                wpm: column_mean(&self.history, |r| r.wpm as f64),
                accuracy: column_mean(&self.history, |r| r.accuracy as f64),
                errors: column_mean(&self.history, |r| r.errors as f64),
            },
        }
    }

    fn begin(&mut self, attempt: Attempt) -> Payload {
        // An empty target is complete the moment it exists.
        let transition = Transition {
            started: false,
            finished: attempt.is_complete(),
        };
        let payload = attempt.payload(self.clock.now(), transition, self.bank.progress());
        self.attempt = Some(attempt);
        payload
    }
}
