//! [`SendInput`] command — sends one line to the game.
//!
//! Script syntax: `send "start"`

use crate::command::{Context, PlayCommand};
use crate::parser::parse_quoted_string;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Sends `line` to the game followed by a newline.
pub struct SendInput {
    pub line: String,
}

impl SendInput {
    pub const NAME: &'static str = "send";

    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

#[async_trait(?Send)]
impl PlayCommand for SendInput {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        Ok(Self::new(parse_quoted_string(args)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        debug!(line = %self.line, "send");
        ctx.send_line(&self.line)
    }
}
