//! Pure metric formulas shared by live updates, finalization and summaries.

/// Characters per word for WPM
pub const CHARS_PER_WORD: f64 = 5.0;

/// Positions where `typed` disagrees with `target`, plus any overflow past the target.
pub fn count_errors(typed: &[char], target: &[char]) -> usize {
    let mismatched = typed
        .iter()
        .zip(target.iter())
        .filter(|(t, e)| t != e)
        .count();
    mismatched + typed.len().saturating_sub(target.len())
}

/// Percentage of typed characters that were correct, 100 before any input.
pub fn accuracy(typed_len: usize, errors: usize) -> u32 {
    if typed_len == 0 {
        return 100;
    }
    let correct = typed_len.saturating_sub(errors) as f64;
    (100.0 * correct / typed_len as f64).round().clamp(0.0, 100.0) as u32
}

pub fn words_per_minute(char_count: usize, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let words = char_count as f64 / CHARS_PER_WORD;
    (words / (elapsed_secs / 60.0)).round().max(0.0) as u32
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}
