//! [`Finish`] command — registers the prompt that ends the `play` loop.
//!
//! Script syntax: `finish "Player .* has won"`

use crate::command::{Context, PlayCommand};
use crate::parser::parse_quoted_string;
use crate::rules::Rule;
use anyhow::Result;
use async_trait::async_trait;

pub struct Finish {
    pub rule: Rule,
}

impl Finish {
    pub const NAME: &'static str = "finish";

    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }
}

#[async_trait(?Send)]
impl PlayCommand for Finish {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let pattern = parse_quoted_string(args)?;
        Ok(Self::new(Rule::finish(pattern.clone(), &pattern)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.rules_mut().push(self.rule.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayCommand;
    use crate::rules::Action;

    #[test]
    fn test_parse() {
        let cmd = Finish::parse(r#""Player .* has won""#).unwrap();
        assert_eq!(cmd.rule.action, Action::Finish);
        assert!(cmd.rule.pattern.is_match("Player B has won!"));
    }
}
