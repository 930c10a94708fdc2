//! [`Expect`] command — blocks until a pattern appears in the game output.
//!
//! Script syntax:
//! - `expect "initial money"` — uses the session's prompt timeout
//! - `expect "select number of player" 10s` — custom timeout
//!
//! Patterns are regular expressions.

use crate::command::{Context, PlayCommand};
use crate::parser::{parse_duration, take_quoted};
use crate::rules::compile;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

/// Blocks until `pattern` matches the game output, or until the timeout elapses.
///
/// The output buffer is consumed through the end of the match, so a following
/// `Expect` will not match the same occurrence again.
pub struct Expect {
    pub pattern: Regex,
    /// `None` falls back to [`Context::timeout`]
    pub timeout: Option<Duration>,
}

impl Expect {
    pub const NAME: &'static str = "expect";

    /// Create an `Expect` command from a regular expression.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            timeout: None,
        })
    }

    /// Create an `Expect` command with its own timeout.
    pub fn with_timeout(pattern: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            timeout: Some(timeout),
            ..Self::new(pattern)?
        })
    }
}

#[async_trait(?Send)]
impl PlayCommand for Expect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (pattern, remainder) = take_quoted(args)?;
        if remainder.is_empty() {
            Self::new(&pattern)
        } else {
            Self::with_timeout(&pattern, parse_duration(remainder)?)
        }
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let timeout = self.timeout.unwrap_or(ctx.timeout);
        debug!(pattern = self.pattern.as_str(), ?timeout, "expect");
        ctx.expect(&self.pattern, timeout)
            .await
            .with_context(|| format!("Expected '{}'", self.pattern.as_str()))?;
        Ok(())
    }
}
