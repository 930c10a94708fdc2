//! Errors raised while driving the game.

use std::time::Duration;
use thiserror::Error;

/// Failures of the prompt/response protocol with the game.
///
/// Everything else (spawning, I/O, script syntax) travels as plain
/// `anyhow` errors with context attached.
#[derive(Error, Debug)]
pub enum AutoplayError {
    /// None of the expected prompts showed up in time
    #[error("Timeout after {timeout:?} waiting for one of: {}", .patterns.join(" | "))]
    Timeout {
        patterns: Vec<String>,
        timeout: Duration,
    },

    /// The game closed its terminal before printing an expected prompt
    #[error("Game exited while waiting for one of: {}", .patterns.join(" | "))]
    Eof { patterns: Vec<String> },

    /// `play` was started without a rule that ends the game
    #[error("No finish rule registered; add one with `finish \"pattern\"` before `play`")]
    NoFinishRule,

    /// The game did not finish within the configured number of turns
    #[error("Game still running after {0} turns")]
    TurnLimit(u64),

    /// A reply rule was given nothing to answer with
    #[error("Rule '{0}' has no replies")]
    EmptyReplies(String),
}
