//! [`Wait`] command — lets the game talk for a while.
//!
//! Script syntax: `wait 500ms` or `wait 1.5s`

use crate::command::{Context, PlayCommand};
use crate::parser::parse_duration;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Pauses before running the next command while streaming whatever the game
/// prints into the transcript. The output stays buffered for the next `expect`.
/// A game that exits mid-pause does not cut the pause short or fail it; the
/// following `expect` reports that.
pub struct Wait {
    pub duration: Duration,
}

impl Wait {
    pub const NAME: &'static str = "wait";
}

#[async_trait(?Send)]
impl PlayCommand for Wait {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        Ok(Self {
            duration: parse_duration(args)?,
        })
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.pump_until(Instant::now() + self.duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayCommand;

    #[test]
    fn test_parse_millis() {
        assert_eq!(
            Wait::parse("500ms").unwrap().duration,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(
            Wait::parse("0.5s").unwrap().duration,
            Duration::from_secs_f64(0.5)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Wait::parse("5minutes").is_err());
    }
}
