//! Terminal presentation state. The app keeps only what a front end needs:
//! its input buffer, the last payload it received and which screen is up.
//! All typing logic lives in the engine.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::engine::{Payload, SessionEngine, Status, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Typing,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    engine: SessionEngine<C>,
    view: Payload,
    summary: Option<Summary>,
    screen: Screen,
    input: String,
}

impl<C: Clock> App<C> {
    /// Picks up whatever attempt the engine already holds (a custom text, for one).
    pub fn new(mut engine: SessionEngine<C>) -> Self {
        let view = engine.current();
        Self {
            engine,
            input: view.typed_text.clone(),
            view,
            summary: None,
            screen: Screen::Typing,
        }
    }

    pub fn view(&self) -> &Payload {
        &self.view
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn engine(&self) -> &SessionEngine<C> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.view.metrics.status == Status::Running
    }

    pub fn on_tick(&mut self) {
        if self.screen == Screen::Typing && self.is_running() {
            self.view = self.engine.tick();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Char('r') if ctrl => {
                self.apply(|e| e.restart_progress());
                return AppAction::Continue;
            }
            _ => {}
        }

        match self.screen {
            Screen::Typing => self.on_typing_key(key, ctrl),
            Screen::Summary => self.on_summary_key(key),
        }
        AppAction::Continue
    }

    fn on_typing_key(&mut self, key: KeyEvent, ctrl: bool) {
        let completed = self.view.metrics.status == Status::Completed;
        match key.code {
            KeyCode::Left => self.apply(|e| e.repeat_current()),
            KeyCode::Right | KeyCode::Tab => self.apply(|e| e.next_text()),
            KeyCode::Enter if completed => self.continue_after_completion(),
            KeyCode::Enter => self.type_char('\n'),
            KeyCode::Backspace if !completed => {
                self.input.pop();
                self.submit();
            }
            KeyCode::Char(c) if !ctrl && !completed => self.type_char(c),
            _ => {}
        }
    }

    fn on_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.apply(|e| e.restart_progress()),
            KeyCode::Char('b') | KeyCode::Backspace => self.screen = Screen::Typing,
            _ => {}
        }
    }

    fn type_char(&mut self, c: char) {
        self.input.push(c);
        self.submit();
    }

    fn submit(&mut self) {
        let payload = self.engine.submit_input(&self.input);
        // The engine may clamp or gate the input; its view is authoritative.
        self.input = payload.typed_text.clone();
        let finished = payload.metrics.finished;
        let last = !payload.bank_progress.has_next;
        self.view = payload;

        if finished && last {
            debug!(target: "app", "last text finished, showing summary");
            self.show_summary();
        }
    }

    fn continue_after_completion(&mut self) {
        if self.view.bank_progress.has_next {
            self.apply(|e| e.next_text());
        } else {
            self.show_summary();
        }
    }

    fn show_summary(&mut self) {
        self.summary = Some(self.engine.summary());
        self.screen = Screen::Summary;
    }

    fn apply(&mut self, op: impl FnOnce(&mut SessionEngine<C>) -> Payload) {
        self.view = op(&mut self.engine);
        self.input = self.view.typed_text.clone();
        self.screen = Screen::Typing;
    }
}
