// Library surface for the engine, its hosts and headless tests.
pub mod app;
pub mod app_dirs;
pub mod bridge;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod runtime;
pub mod text_bank;
pub mod typing_policy;
pub mod ui;

pub use engine::{Payload, SessionEngine, Summary};
pub use error::{BankError, EngineError, LoadError};
pub use text_bank::TextBank;
