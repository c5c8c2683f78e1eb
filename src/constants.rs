//! Configuration constants for the MathMaster game system
//!
//! This module contains the limits and defaults used throughout the crate
//! to validate question data and pace a round.

/// Question configuration constants
pub mod question {
    /// Maximum length of a question identifier
    pub const MAX_ID_LENGTH: usize = 64;
    /// Minimum length of a question prompt in characters
    pub const MIN_TEXT_LENGTH: usize = 1;
    /// Maximum length of a question prompt in characters
    pub const MAX_TEXT_LENGTH: usize = 500;
    /// Minimum number of options for multiple choice and true/false questions
    pub const MIN_OPTION_COUNT: usize = 2;
    /// Maximum number of options for multiple choice and true/false questions
    pub const MAX_OPTION_COUNT: usize = 8;
    /// Minimum points awarded for a correct answer
    pub const MIN_POINTS: u64 = 1;
    /// Maximum points awarded for a correct answer
    pub const MAX_POINTS: u64 = 1000;
    /// Minimum time limit in seconds for answering a question
    pub const MIN_TIME_LIMIT: u64 = 1;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_TIME_LIMIT: u64 = 600;
}

/// Round pacing constants
pub mod round {
    use std::time::Duration;

    /// Maximum number of questions in a single round
    pub const MAX_QUESTION_COUNT: usize = 100;
    /// Default pause between locking a question and presenting the next one
    pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(1500);
    /// Minimum feedback delay in seconds
    pub const MIN_FEEDBACK_DELAY: u64 = 0;
    /// Maximum feedback delay in seconds
    pub const MAX_FEEDBACK_DELAY: u64 = 10;
}

/// Answer text configuration constants
pub mod answer_text {
    /// Maximum length of an option label or expected short answer in characters
    pub const MAX_LENGTH: usize = 200;
}

/// Leaderboard display constants
pub mod leaderboard {
    /// Number of players listed in the standings
    pub const STANDINGS_LIMIT: usize = 20;
    /// Number of players on the hall of fame podium
    pub const PODIUM_SIZE: usize = 3;
    /// Number of players shown in the hall of fame, podium included
    pub const HALL_OF_FAME_SIZE: usize = 10;
}
