use serde::{Deserialize, Serialize};

use crate::metrics::count_errors;

/// How submitted input is turned into accepted text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputMode {
    /// Every character is accepted; errors are recounted from the current input.
    #[default]
    Free,
    /// Only the correct prefix is accepted; each new wrong keystroke is a sticky mistake.
    Strict,
}

/// Text accepted from one submission plus the resulting error count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub typed: Vec<char>,
    pub errors: usize,
}

fn accept_free(input: &[char], target: &[char]) -> Accepted {
    Accepted {
        typed: input.to_vec(),
        errors: count_errors(input, target),
    }
}

fn accept_strict(
    input: &[char],
    target: &[char],
    previous_input: &[char],
    mistakes: usize,
) -> Accepted {
    let correct_len = input
        .iter()
        .zip(target.iter())
        .take_while(|(t, e)| t == e)
        .count();

    // Every new input that runs onto a wrong character is charged. Resubmitting
    // the last input, or deleting back from it, never charges.
    let changed = input != previous_input;
    let deleting = input.len() < previous_input.len() && previous_input.starts_with(input);
    let hit_wrong_char = correct_len < input.len();
    let mistakes = if changed && !deleting && hit_wrong_char {
        mistakes + 1
    } else {
        mistakes
    };

    Accepted {
        typed: input[..correct_len].to_vec(),
        errors: mistakes,
    }
}

/// Applies `mode` to an input that is already clamped to the target length.
///
/// `previous_input` and `errors` describe the last submission; only
/// strict mode looks at them.
pub fn accept(
    mode: InputMode,
    input: &[char],
    target: &[char],
    previous_input: &[char],
    errors: usize,
) -> Accepted {
    match mode {
        InputMode::Free => accept_free(input, target),
        InputMode::Strict => accept_strict(input, target, previous_input, errors),
    }
}
