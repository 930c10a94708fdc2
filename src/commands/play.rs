//! [`Play`] command — the answer loop.
//!
//! Script syntax: `play` or `play 200ms` (delay between turns, default 500ms)

use crate::command::{Context, PlayCommand};
use crate::error::AutoplayError;
use crate::parser::parse_duration;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, trace};

/// Waits for whichever registered prompt shows up next and answers it with a
/// random reply from its rule, pausing `pace` between turns. Returns once a
/// finish rule matches.
pub struct Play {
    pub pace: Duration,
}

impl Play {
    pub const NAME: &'static str = "play";

    pub fn new(pace: Duration) -> Self {
        Self { pace }
    }
}

impl Default for Play {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait(?Send)]
impl PlayCommand for Play {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        if args.trim().is_empty() {
            Ok(Self::default())
        } else {
            Ok(Self::new(parse_duration(args)?))
        }
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        if !ctx.rules.has_finish() {
            return Err(AutoplayError::NoFinishRule.into());
        }

        let patterns = ctx.rules.patterns();
        let mut turns: u64 = 0;
        info!(rules = patterns.len(), pace = ?self.pace, "playing");

        loop {
            let timeout = ctx.timeout;
            let m = ctx
                .expect_any(&patterns, timeout)
                .await
                .with_context(|| format!("No prompt recognised after {turns} turns"))?;

            trace!(before = %m.before, "output since last prompt");

            let rule = &ctx.rules.rules()[m.index];
            let Some(reply) = ctx.rules.choose(m.index, &mut ctx.rng) else {
                info!(turns, winner = %m.text, "game finished");
                return Ok(());
            };
            // Another prompt after the last allowed turn: give up unanswered.
            if ctx.max_turns.is_some_and(|max| turns >= max) {
                return Err(AutoplayError::TurnLimit(turns).into());
            }
            debug!(turn = turns + 1, prompt = %rule.name, reply, "answer");
            let reply = reply.to_string();
            ctx.send_line(&reply)?;

            turns += 1;
            sleep(self.pace).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayCommand;

    #[test]
    fn test_parse_default_pace() {
        assert_eq!(Play::parse("").unwrap().pace, Duration::from_millis(500));
    }

    #[test]
    fn test_parse_custom_pace() {
        assert_eq!(Play::parse("50ms").unwrap().pace, Duration::from_millis(50));
    }

    #[test]
    fn test_parse_invalid_pace() {
        assert!(Play::parse("fast").is_err());
    }
}
