//! [`Show`] command — writes a note into the transcript.
//!
//! Script syntax: `show "-- setup done --"`

use crate::command::{Context, PlayCommand};
use crate::parser::parse_quoted_string;
use anyhow::Result;
use async_trait::async_trait;

/// Writes text to the output handler without sending anything to the game.
pub struct Show {
    pub data: Vec<u8>,
}

impl Show {
    pub const NAME: &'static str = "show";

    /// Create a `Show` command from a string. A newline is appended automatically.
    pub fn new(text: impl Into<String>) -> Self {
        let mut t = text.into();
        t.push('\n');
        Self {
            data: t.into_bytes(),
        }
    }
}

#[async_trait(?Send)]
impl PlayCommand for Show {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        Ok(Self::new(parse_quoted_string(args)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        // Flush what the game already printed so the note lands after it.
        ctx.drain_pending();
        ctx.emit(&self.data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayCommand;

    #[test]
    fn test_parse() {
        let cmd = Show::parse(r#""turn 1""#).unwrap();
        assert_eq!(cmd.data, b"turn 1\n");
    }

    #[test]
    fn test_parse_unclosed_quote() {
        assert!(Show::parse(r#""unclosed"#).is_err());
    }
}
