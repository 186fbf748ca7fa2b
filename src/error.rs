//! Error types for bank construction, bank loading and engine operations.
//!
//! Only construction is fatal. Keystrokes are never errors: the engine
//! clamps and accepts whatever the presentation layer submits.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected text bank contents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("text bank is empty: at least one text is required")]
    Empty,

    #[error("text #{} in the bank is blank", .index + 1)]
    BlankText { index: usize },
}

/// Failure while reading a bank or a custom text from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid text bank JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("text bank must be a JSON array of strings")]
    NotAnArray,

    #[error("bundled text bank {0} is missing")]
    MissingBundled(&'static str),

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Errors surfaced by the few engine operations that touch the filesystem
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_message_is_one_based() {
        let err = BankError::BlankText { index: 2 };
        assert_eq!(err.to_string(), "text #3 in the bank is blank");
    }

    #[test]
    fn bank_error_converts_through_load_and_engine() {
        let err: EngineError = LoadError::from(BankError::Empty).into();
        assert_eq!(
            err.to_string(),
            "text bank is empty: at least one text is required"
        );
    }
}
