use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use typer::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    bridge,
    config::{Config, ConfigStore, FileConfigStore},
    loader,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TyperEvent},
    typing_policy::InputMode,
    SessionEngine, TextBank,
};

/// typing practice over an ordered text bank
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type your way through a bank of practice texts. Speed, accuracy and errors are measured live and summarized at the end of the bank."
)]
pub struct Cli {
    /// JSON file holding an array of practice texts
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// practice a single custom text instead of starting on the bank
    #[clap(short = 't', long)]
    text: Option<String>,

    /// stop on errors and require correction before proceeding
    #[clap(long)]
    strict: bool,

    /// live metrics refresh interval in milliseconds
    #[clap(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// serve engine operations as JSON lines on stdin/stdout instead of the TUI
    #[clap(long)]
    serve: bool,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Flags given on the command line win over the stored config.
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(bank) = &self.bank {
            cfg.bank_path = Some(bank.clone());
        }
        if self.strict {
            cfg.input_mode = InputMode::Strict;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_interval_ms = ms;
        }
        cfg
    }
}

fn init_logging() -> Option<WorkerGuard> {
    let dir = AppDirs::state_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(&dir, "typer.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

fn load_bank(cfg: &Config) -> Result<TextBank, Box<dyn Error>> {
    let bank = match &cfg.bank_path {
        Some(path) => loader::load_bank_file(path)?,
        None => loader::default_bank()?,
    };
    Ok(bank)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let store = FileConfigStore::new();
    let cfg = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&cfg)?;
        info!(target: "config", path = %store.path().display(), "config saved");
    }

    let bank = match load_bank(&cfg) {
        Ok(bank) => bank,
        Err(e) => {
            error!(target: "bank", error = %e, "cannot start without a text bank");
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };
    info!(
        target: "app",
        texts = bank.len(),
        mode = %cfg.input_mode,
        serve = cli.serve,
        "starting"
    );

    let mut engine = SessionEngine::new(bank).with_mode(cfg.input_mode);
    if let Some(text) = &cli.text {
        engine.set_text(text);
    }

    if cli.serve {
        bridge::serve(&mut engine, io::stdin().lock(), io::stdout().lock())?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (use --serve for piped input)")
            .exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(engine);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(cfg.tick_interval()),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            TyperEvent::Tick => {
                if !app.is_running() {
                    continue;
                }
                app.on_tick();
            }
            TyperEvent::Resize => {}
            TyperEvent::Key(key) => {
                if app.on_key(key) == AppAction::Quit {
                    info!(target: "app", "exit requested");
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
