//! Loading text banks and custom texts.
//!
//! A bank file is a JSON array of strings. Entries are normalized, blank
//! ones dropped and the rest ordered from shortest to longest so a
//! session warms up before the long passages.

use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::text_bank::TextBank;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/data");

const BUNDLED_BANK: &str = "texts.json";

/// CRLF to LF, without leading or trailing newlines.
pub fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n").trim_matches('\n').to_string()
}

pub fn normalize_bank<I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .map(|t| normalize_text(&t))
        .filter(|t| !t.trim().is_empty())
        .sorted_by_key(|t| t.chars().count())
        .collect()
}

/// Parses a bank document, skipping entries that are not strings.
pub fn parse_bank(json: &str) -> Result<Vec<String>, LoadError> {
    let json = json.strip_prefix('\u{feff}').unwrap_or(json);
    let Value::Array(items) = serde_json::from_str::<Value>(json)? else {
        return Err(LoadError::NotAnArray);
    };

    let total = items.len();
    let texts: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect();
    if texts.len() < total {
        warn!(target: "bank", skipped = total - texts.len(), "non-string bank entries ignored");
    }
    Ok(normalize_bank(texts))
}

pub fn bank_from_json(json: &str) -> Result<TextBank, LoadError> {
    let bank = TextBank::new(parse_bank(json)?)?;
    debug!(target: "bank", texts = bank.len(), "text bank loaded");
    Ok(bank)
}

pub fn load_bank_file(path: &Path) -> Result<TextBank, LoadError> {
    let json = read_to_string(path)?;
    bank_from_json(&json)
}

/// The bank shipped inside the binary
pub fn default_bank() -> Result<TextBank, LoadError> {
    let json = DATA_DIR
        .get_file(BUNDLED_BANK)
        .and_then(|f| f.contents_utf8())
        .ok_or(LoadError::MissingBundled(BUNDLED_BANK))?;
    bank_from_json(json)
}

/// Reads a single practice text from disk.
pub fn read_custom_text(path: &Path) -> Result<String, LoadError> {
    Ok(normalize_text(&read_to_string(path)?))
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
