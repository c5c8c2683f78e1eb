//! Player totals and rankings
//!
//! This module folds finished round results into each player's totals,
//! keeps a log of every recorded round and produces the ranked views shown
//! on the leaderboard and hall of fame. It performs no I/O; the host
//! persists [`PlayerRecord`]s and [`GameLog`]s wherever it likes.

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;
use web_time::SystemTime;

use super::{
    TruncatedVec,
    constants::leaderboard::{HALL_OF_FAME_SIZE, PODIUM_SIZE, STANDINGS_LIMIT},
    session::RoundResult,
};

/// A unique identifier for a game log entry
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct LogId(Uuid);

impl LogId {
    /// Creates a new random log ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Whether a player may still play
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// Listed and allowed to play
    #[default]
    Active,
    /// Hidden from rankings
    Locked,
}

/// A player's profile and running totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// Opaque identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// School class the player belongs to
    pub class_name: String,
    /// Points earned over every recorded round
    #[serde(default)]
    pub total_score: u64,
    /// Seconds spent over every recorded round
    #[serde(default)]
    pub total_time_spent: u64,
    /// Rounds finished at least once, in completion order
    #[serde(default)]
    pub completed_rounds: Vec<u32>,
    /// Account status
    #[serde(default)]
    pub status: PlayerStatus,
    /// Administrators manage the game and are never ranked
    #[serde(default)]
    pub is_admin: bool,
}

impl PlayerRecord {
    /// Creates an active player with no results
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_name: class_name.into(),
            total_score: 0,
            total_time_spent: 0,
            completed_rounds: Vec::new(),
            status: PlayerStatus::Active,
            is_admin: false,
        }
    }

    /// Whether the player finished the round at least once
    pub fn is_round_completed(&self, round: u32) -> bool {
        self.completed_rounds.contains(&round)
    }

    /// Whether the player may start the round
    ///
    /// The first round is always open; every later round opens once the
    /// round before it has been completed.
    pub fn is_round_unlocked(&self, round: u32) -> bool {
        round <= 1 || self.is_round_completed(round - 1)
    }

    fn add_result(&mut self, round: u32, result: &RoundResult) {
        self.total_score = self.total_score.saturating_add(result.score);
        self.total_time_spent = self.total_time_spent.saturating_add(result.elapsed_seconds);
        if !self.is_round_completed(round) {
            self.completed_rounds.push(round);
        }
    }
}

/// One recorded round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLog {
    /// Unique identifier of the entry
    pub id: LogId,
    /// Player who played the round
    pub player_id: String,
    /// Round that was played
    pub round_id: u32,
    /// Points earned
    pub score: u64,
    /// Seconds spent
    pub time_spent: u64,
    /// When the result was recorded
    pub played_at: SystemTime,
}

/// A player's place in the rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// Place in the ranking (1-indexed)
    pub position: usize,
    /// Player identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// School class
    pub class_name: String,
    /// Points over every recorded round
    pub total_score: u64,
    /// Seconds over every recorded round
    pub total_time_spent: u64,
    /// Number of distinct rounds completed
    pub completed_rounds: usize,
}

/// The hall of fame: a podium and the places right after it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HallOfFame {
    /// The best players, first place first
    pub podium: Vec<Standing>,
    /// The places following the podium
    pub runners_up: Vec<Standing>,
}

/// Errors that can occur while updating the roster
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No player with this identifier is known
    #[error("unknown player {0}")]
    UnknownPlayer(String),
    /// A player with this identifier already exists
    #[error("player {0} already exists")]
    DuplicatePlayer(String),
}

/// The player roster together with the log of recorded rounds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Every known player
    players: Vec<PlayerRecord>,
    /// Every recorded round, oldest first
    logs: Vec<GameLog>,
}

impl Leaderboard {
    /// Creates a leaderboard from an existing roster
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self {
            players,
            logs: Vec::new(),
        }
    }

    /// Every known player
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Every recorded round, oldest first
    pub fn logs(&self) -> &[GameLog] {
        &self.logs
    }

    /// Looks up a player
    pub fn player(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Adds a player to the roster
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePlayer`] if the identifier is taken.
    pub fn add_player(&mut self, player: PlayerRecord) -> Result<(), Error> {
        if self.player(&player.id).is_some() {
            return Err(Error::DuplicatePlayer(player.id));
        }
        self.players.push(player);
        Ok(())
    }

    /// Folds a finished round into a player's totals
    ///
    /// The score and elapsed time are added to the player's totals, the
    /// round is marked completed and a [`GameLog`] entry is appended.
    /// Rounds played by administrators are not recorded.
    ///
    /// # Arguments
    ///
    /// * `player_id` - The player who played the round
    /// * `round` - The round that was played
    /// * `result` - The result delivered by the round session
    ///
    /// # Returns
    ///
    /// The new log entry, or `None` for administrators
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPlayer`] if no player has this identifier.
    pub fn record_result(
        &mut self,
        player_id: &str,
        round: u32,
        result: &RoundResult,
    ) -> Result<Option<&GameLog>, Error> {
        let Some(player) = self.players.iter_mut().find(|player| player.id == player_id) else {
            return Err(Error::UnknownPlayer(player_id.to_owned()));
        };

        if player.is_admin {
            log::debug!("not recording round {round} for administrator {player_id}");
            return Ok(None);
        }

        player.add_result(round, result);

        log::info!(
            "recorded round {round} for {player_id}: {} points in {}s",
            result.score,
            result.elapsed_seconds
        );

        self.logs.push(GameLog {
            id: LogId::new(),
            player_id: player_id.to_owned(),
            round_id: round,
            score: result.score,
            time_spent: result.elapsed_seconds,
            played_at: SystemTime::now(),
        });

        Ok(self.logs.last())
    }

    /// Active players ranked by score, fastest first on ties
    fn ranked(&self) -> impl Iterator<Item = Standing> + '_ {
        self.players
            .iter()
            .filter(|player| player.status == PlayerStatus::Active && !player.is_admin)
            .sorted_by(|a, b| {
                b.total_score
                    .cmp(&a.total_score)
                    .then(a.total_time_spent.cmp(&b.total_time_spent))
            })
            .enumerate()
            .map(|(index, player)| Standing {
                position: index + 1,
                id: player.id.clone(),
                name: player.name.clone(),
                class_name: player.class_name.clone(),
                total_score: player.total_score,
                total_time_spent: player.total_time_spent,
                completed_rounds: player.completed_rounds.len(),
            })
    }

    /// The ranking shown on the leaderboard
    ///
    /// Only the top places are listed, while the exact number of ranked
    /// players is kept.
    pub fn standings(&self) -> TruncatedVec<Standing> {
        let count = self
            .players
            .iter()
            .filter(|player| player.status == PlayerStatus::Active && !player.is_admin)
            .count();

        TruncatedVec::new(self.ranked(), STANDINGS_LIMIT, count)
    }

    /// The ranking split into a podium and its runners-up
    pub fn hall_of_fame(&self) -> HallOfFame {
        let (podium, runners_up) = self
            .ranked()
            .take(HALL_OF_FAME_SIZE)
            .partition(|standing| standing.position <= PODIUM_SIZE);

        HallOfFame { podium, runners_up }
    }
}
