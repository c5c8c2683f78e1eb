//! Result delivery for finished rounds
//!
//! This module defines the trait through which the round engine hands its
//! final result to whoever owns the session: a result screen, a leaderboard
//! update or a remote store. The engine never performs that work itself.

use serde::{Deserialize, Serialize};

/// The outcome of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    /// Sum of the points of every correctly answered question
    pub score: u64,
    /// Sum of the points of every question in the round
    pub total_possible: u64,
    /// Wall-clock seconds between session creation and finish, rounded
    pub elapsed_seconds: u64,
}

/// Trait for receiving the result of a finished round
///
/// The sink is consumed by the call, so a session can deliver its result
/// at most once. Any `FnOnce(RoundResult)` closure is a sink.
pub trait ResultSink {
    /// Receives the final result of the round
    ///
    /// # Arguments
    ///
    /// * `result` - Score, total possible score and elapsed time
    fn receive_result(self, result: RoundResult);
}

impl<F: FnOnce(RoundResult)> ResultSink for F {
    fn receive_result(self, result: RoundResult) {
        self(result);
    }
}
