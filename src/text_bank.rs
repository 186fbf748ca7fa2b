use serde::{Deserialize, Serialize};

use crate::error::BankError;

/// Position report for the presentation layer. `position` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProgress {
    pub position: usize,
    pub total: usize,
    pub has_next: bool,
}

/// Ordered, read-only texts with a cursor that never leaves the bank
#[derive(Debug, Clone, PartialEq)]
pub struct TextBank {
    texts: Vec<String>,
    position: usize,
}

impl TextBank {
    pub fn new(texts: Vec<String>) -> Result<Self, BankError> {
        if texts.is_empty() {
            return Err(BankError::Empty);
        }
        if let Some(index) = texts.iter().position(|t| t.is_empty()) {
            return Err(BankError::BlankText { index });
        }
        Ok(Self { texts, position: 0 })
    }

    pub fn current_text(&self) -> &str {
        &self.texts[self.position]
    }

    /// Zero-based cursor
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn has_next(&self) -> bool {
        self.position < self.texts.len() - 1
    }

    /// Moves to the next text. Returns false, leaving the cursor alone, on the last one.
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn progress(&self) -> BankProgress {
        BankProgress {
            position: self.position + 1,
            total: self.texts.len(),
            has_next: self.has_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(texts: &[&str]) -> TextBank {
        TextBank::new(texts.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_bank() {
        assert_eq!(TextBank::new(vec![]), Err(BankError::Empty));
    }

    #[test]
    fn test_new_rejects_blank_entry() {
        let result = TextBank::new(vec!["one".into(), String::new(), "three".into()]);
        assert_eq!(result, Err(BankError::BlankText { index: 1 }));
    }

    #[test]
    fn test_current_text_starts_at_first() {
        let bank = bank(&["alpha", "beta"]);
        assert_eq!(bank.current_text(), "alpha");
        assert_eq!(bank.position(), 0);
    }

    #[test]
    fn test_advance_moves_until_last() {
        let mut bank = bank(&["a", "b", "c"]);
        assert!(bank.advance());
        assert_eq!(bank.current_text(), "b");
        assert!(bank.advance());
        assert_eq!(bank.current_text(), "c");
        assert!(!bank.advance());
        assert_eq!(bank.current_text(), "c");
    }

    #[test]
    fn test_advance_n_times_clamps_at_last_index() {
        let mut bank = bank(&["a", "b", "c", "d"]);
        for _ in 0..bank.len() {
            bank.advance();
        }
        assert_eq!(bank.position(), 3);
        assert!(!bank.has_next());
    }

    #[test]
    fn test_reset_returns_to_first() {
        let mut bank = bank(&["a", "b"]);
        bank.advance();
        bank.reset();
        assert_eq!(bank.position(), 0);
        assert!(bank.has_next());
    }

    #[test]
    fn test_progress_is_one_based() {
        let mut bank = bank(&["a", "b"]);
        assert_eq!(
            bank.progress(),
            BankProgress {
                position: 1,
                total: 2,
                has_next: true
            }
        );
        bank.advance();
        assert_eq!(
            bank.progress(),
            BankProgress {
                position: 2,
                total: 2,
                has_next: false
            }
        );
    }

    #[test]
    fn test_single_text_bank_has_no_next() {
        let bank = bank(&["cat"]);
        assert!(!bank.has_next());
        assert_eq!(bank.progress().total, 1);
    }
}
