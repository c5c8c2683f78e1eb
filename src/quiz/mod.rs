//! Questions and the timed round engine
//!
//! This module contains the question model and its ingestion from provider
//! records, the answer evaluation rules, the bank that selects the
//! questions of a round, and the round engine that plays them.

pub mod bank;
pub mod common;
pub mod question;
pub mod round;
