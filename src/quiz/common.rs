//! Shared answer types and helpers for question evaluation
//!
//! This module contains the submission type accepted by the round engine,
//! the verdict recorded for each question and the validation helpers used
//! by the `garde` derives across the crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Validation result type for custom validators
type ValidationResult = garde::Result;

/// Validates that a duration falls within specified bounds.
///
/// This is a custom validation function for use with the `garde` crate.
/// It checks if the duration is within the inclusive range defined by
/// `MIN_SECONDS` and `MAX_SECONDS`, sub-second parts included.
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the specified bounds.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> ValidationResult {
    if (Duration::from_secs(MIN_SECONDS)..=Duration::from_secs(MAX_SECONDS)).contains(val) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// A candidate answer submitted by the player
///
/// Choice questions expect an [`Answer::Index`], short answer questions an
/// [`Answer::Text`]. A mismatched kind is never coerced and always scores
/// as incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// Zero-based index of the chosen option
    Index(usize),
    /// Free text typed by the player
    Text(String),
}

impl From<usize> for Answer {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// How a single question was resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The submission matched the expected answer
    Correct,
    /// A submission was made but did not match
    Incorrect,
    /// Nothing was submitted, either because the timer expired or the
    /// player explicitly passed
    Unanswered,
}

impl Verdict {
    /// Whether the verdict awards the question's points
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Normalizes a short answer for comparison
///
/// Surrounding whitespace is dropped and the text is case-folded.
pub fn clean_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
