//! Question bank and round selection
//!
//! The bank holds every question the provider knows about and hands out
//! the ordered question list of a single round, ready to start a
//! [`RoundSession`](super::round::RoundSession).

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::question::Question;

/// All known questions, in provider order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a bank from already ingested questions
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Ingests a JSON array of provider records
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the text is not an array of valid
    /// question records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every question in provider order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the bank
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the bank holds no question
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The questions of one round, in provider order
    pub fn round(&self, round: u32) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|question| question.round() == round)
            .cloned()
            .collect_vec()
    }

    /// The questions of one round in a fresh random order
    ///
    /// Used between attempts; the order stays fixed once a session starts.
    pub fn shuffled_round(&self, round: u32, rng: &mut fastrand::Rng) -> Vec<Question> {
        let mut questions = self.round(round);
        rng.shuffle(&mut questions);
        questions
    }

    /// Distinct round numbers present in the bank, ascending
    pub fn rounds(&self) -> Vec<u32> {
        self.questions
            .iter()
            .map(Question::round)
            .sorted_unstable()
            .dedup()
            .collect_vec()
    }

    /// Sum of the points of every question in a round
    pub fn total_points(&self, round: u32) -> u64 {
        self.questions
            .iter()
            .filter(|question| question.round() == round)
            .map(Question::points)
            .sum()
    }
}
