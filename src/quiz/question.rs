//! Question model and provider record ingestion
//!
//! Questions arrive from the question provider as flat records with a
//! string `type` tag. This module turns them into [`Question`] values whose
//! [`QuestionKind`] carries exactly the fields each type needs. The legacy
//! `fill` tag is folded into multiple choice here and nowhere else.

use std::fmt::Display;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    super::constants::{answer_text, question::*},
    common::{Answer, Verdict, clean_answer},
};

/// The question type tags understood by the provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Pick one of several options (`fill` is accepted as an alias)
    #[serde(rename = "multiple", alias = "fill")]
    MultipleChoice,
    /// Pick one of two options
    #[serde(rename = "true_false", alias = "truefalse")]
    TrueFalse,
    /// Type a literal answer
    #[serde(rename = "short_answer", alias = "short")]
    ShortAnswer,
}

impl QuestionType {
    /// Returns the canonical tag of this type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple",
            Self::TrueFalse => "true_false",
            Self::ShortAnswer => "short_answer",
        }
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty label, display only
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Warm-up question
    #[default]
    Easy,
    /// Regular question
    Medium,
    /// Challenge question
    Hard,
}

/// The expected answer as stored by the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    /// Zero-based index into the options
    Index(usize),
    /// Any other number, only meaningful for short answers
    Number(serde_json::Number),
    /// Literal text for short answers
    Text(String),
}

fn is_option_index(options: &[String]) -> impl FnOnce(&usize, &()) -> garde::Result + '_ {
    move |index, _| {
        if *index < options.len() {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "index {index} is outside of {} options",
                options.len()
            )))
        }
    }
}

#[allow(clippy::ptr_arg)]
fn not_blank(value: &String, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("must not be blank"))
    } else {
        Ok(())
    }
}

/// Options and the index of the correct one
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Choices {
    /// Option labels in display order
    #[garde(
        length(min = MIN_OPTION_COUNT, max = MAX_OPTION_COUNT),
        inner(length(chars, min = 1, max = answer_text::MAX_LENGTH))
    )]
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    #[garde(custom(is_option_index(&self.options)))]
    pub correct: usize,
}

/// The literal expected for a short answer question
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Expected {
    /// Expected text, compared trimmed and case-folded
    #[garde(length(chars, max = answer_text::MAX_LENGTH), custom(not_blank))]
    pub answer: String,
}

/// Type-specific payload of a question
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub enum QuestionKind {
    /// Pick the option at the correct index
    MultipleChoice(#[garde(dive)] Choices),
    /// Pick between two (or more) statements
    TrueFalse(#[garde(dive)] Choices),
    /// Type the expected text
    ShortAnswer(#[garde(dive)] Expected),
}

impl QuestionKind {
    /// Creates a multiple choice payload
    pub fn multiple_choice<I, S>(options: I, correct: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultipleChoice(Choices {
            options: options.into_iter().map(Into::into).collect(),
            correct,
        })
    }

    /// Creates a true/false payload
    pub fn true_false<I, S>(options: I, correct: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TrueFalse(Choices {
            options: options.into_iter().map(Into::into).collect(),
            correct,
        })
    }

    /// Creates a short answer payload
    pub fn short_answer(answer: impl Into<String>) -> Self {
        Self::ShortAnswer(Expected {
            answer: answer.into(),
        })
    }

    /// Returns the provider tag of this payload
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
            Self::TrueFalse(_) => QuestionType::TrueFalse,
            Self::ShortAnswer(_) => QuestionType::ShortAnswer,
        }
    }

    /// Returns the option labels, empty for short answers
    pub fn options(&self) -> &[String] {
        match self {
            Self::MultipleChoice(choices) | Self::TrueFalse(choices) => &choices.options,
            Self::ShortAnswer(_) => &[],
        }
    }

    /// Returns the expected answer
    pub fn correct_answer(&self) -> CorrectAnswer {
        match self {
            Self::MultipleChoice(choices) | Self::TrueFalse(choices) => {
                CorrectAnswer::Index(choices.correct)
            }
            Self::ShortAnswer(expected) => CorrectAnswer::Text(expected.answer.clone()),
        }
    }

    /// Judges a submission against this payload
    ///
    /// Choice questions need the exact index; short answers compare trimmed,
    /// case-folded text. `None` is [`Verdict::Unanswered`] and a submission of
    /// the wrong kind is never coerced.
    pub fn evaluate(&self, answer: Option<&Answer>) -> Verdict {
        let Some(answer) = answer else {
            return Verdict::Unanswered;
        };

        let correct = match (self, answer) {
            (Self::MultipleChoice(choices) | Self::TrueFalse(choices), Answer::Index(index)) => {
                *index == choices.correct
            }
            (Self::ShortAnswer(expected), Answer::Text(text)) => {
                let cleaned = clean_answer(text);
                !cleaned.is_empty() && cleaned == clean_answer(&expected.answer)
            }
            _ => false,
        };

        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

/// Errors raised while ingesting a provider record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A choice question was stored with a text answer
    #[error("question {id}: a {question_type} question needs an option index as its answer")]
    ExpectedIndex {
        /// Identifier of the offending record
        id: String,
        /// Declared type of the record
        question_type: QuestionType,
    },
    /// A short answer question was stored with options
    #[error("question {id}: a short_answer question does not take options")]
    UnexpectedOptions {
        /// Identifier of the offending record
        id: String,
    },
}

/// A question exactly as the provider stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Opaque identifier
    pub id: String,
    /// Type tag
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Prompt shown to the player
    pub text: String,
    /// Option labels
    #[serde(default)]
    pub options: Vec<String>,
    /// Index or literal of the correct answer
    pub correct_answer: CorrectAnswer,
    /// Points awarded on a correct answer
    pub points: u64,
    /// Seconds allotted to answer
    pub time_limit: u64,
    /// Round the question belongs to
    #[serde(default)]
    pub round: u32,
    /// Difficulty label
    #[serde(default)]
    pub level: Level,
    /// Optional topic label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A single question of a round
///
/// Values are checked against the limits in [`crate::constants::question`]
/// through [`garde::Validate`] when a round session is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    #[garde(length(min = 1, max = MAX_ID_LENGTH))]
    id: String,
    #[garde(length(chars, min = MIN_TEXT_LENGTH, max = MAX_TEXT_LENGTH))]
    text: String,
    #[garde(dive)]
    kind: QuestionKind,
    #[garde(range(min = MIN_POINTS, max = MAX_POINTS))]
    points: u64,
    /// Seconds allotted to answer
    #[garde(range(min = MIN_TIME_LIMIT, max = MAX_TIME_LIMIT))]
    time_limit: u64,
    #[garde(skip)]
    round: u32,
    #[garde(skip)]
    level: Level,
    #[garde(skip)]
    category: Option<String>,
}

impl Question {
    /// Creates a question in round 0 with an `Easy` level
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionKind,
        points: u64,
        time_limit: u64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            points,
            time_limit,
            round: 0,
            level: Level::default(),
            category: None,
        }
    }

    /// Sets the round the question belongs to
    #[must_use]
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Sets the difficulty label
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the topic label
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Opaque identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Prompt shown to the player
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Type-specific payload
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Points awarded on a correct answer
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Seconds allotted to answer
    pub fn time_limit(&self) -> u64 {
        self.time_limit
    }

    /// Round the question belongs to
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Difficulty label
    pub fn level(&self) -> Level {
        self.level
    }

    /// Optional topic label
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Judges a submission, see [`QuestionKind::evaluate`]
    pub fn evaluate(&self, answer: Option<&Answer>) -> Verdict {
        self.kind.evaluate(answer)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = Error;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let kind = match (record.question_type, record.correct_answer) {
            (QuestionType::MultipleChoice, CorrectAnswer::Index(correct)) => {
                QuestionKind::MultipleChoice(Choices {
                    options: record.options,
                    correct,
                })
            }
            (QuestionType::TrueFalse, CorrectAnswer::Index(correct)) => {
                QuestionKind::TrueFalse(Choices {
                    options: record.options,
                    correct,
                })
            }
            (question_type @ (QuestionType::MultipleChoice | QuestionType::TrueFalse), _) => {
                return Err(Error::ExpectedIndex {
                    id: record.id,
                    question_type,
                });
            }
            (QuestionType::ShortAnswer, _) if !record.options.is_empty() => {
                return Err(Error::UnexpectedOptions { id: record.id });
            }
            // spreadsheets hand numeric literals back as numbers
            (QuestionType::ShortAnswer, CorrectAnswer::Index(number)) => {
                QuestionKind::short_answer(number.to_string())
            }
            (QuestionType::ShortAnswer, CorrectAnswer::Number(number)) => {
                QuestionKind::short_answer(number.to_string())
            }
            (QuestionType::ShortAnswer, CorrectAnswer::Text(answer)) => {
                QuestionKind::short_answer(answer)
            }
        };

        Ok(Self {
            id: record.id,
            text: record.text,
            kind,
            points: record.points,
            time_limit: record.time_limit,
            round: record.round,
            level: record.level,
            category: record.category,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let question_type = question.kind.question_type();
        let correct_answer = question.kind.correct_answer();
        let options = match question.kind {
            QuestionKind::MultipleChoice(choices) | QuestionKind::TrueFalse(choices) => {
                choices.options
            }
            QuestionKind::ShortAnswer(_) => Vec::new(),
        };

        Self {
            id: question.id,
            question_type,
            text: question.text,
            options,
            correct_answer,
            points: question.points,
            time_limit: question.time_limit,
            round: question.round,
            level: question.level,
            category: question.category,
        }
    }
}
