//! [`AddRule`] command — teaches the `play` loop how to answer a prompt.
//!
//! Script syntax: `rule "pattern" "reply" ["reply" ...]`
//!
//! Each time `pattern` shows up during `play`, one of the replies is picked
//! at random and sent.

use crate::command::{Context, PlayCommand};
use crate::parser::parse_quoted_list;
use crate::rules::Rule;
use anyhow::{Result, anyhow};
use async_trait::async_trait;

pub struct AddRule {
    pub rule: Rule,
}

impl AddRule {
    pub const NAME: &'static str = "rule";

    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }
}

#[async_trait(?Send)]
impl PlayCommand for AddRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let mut items = parse_quoted_list(args)?.into_iter();
        let pattern = items
            .next()
            .ok_or_else(|| anyhow!("Expected a pattern after 'rule'"))?;
        Ok(Self::new(Rule::reply(pattern.clone(), &pattern, items)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.rules_mut().push(self.rule.clone());
        Ok(())
    }
}
