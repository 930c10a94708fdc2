//! The response table consulted by the `play` loop.

use crate::error::AutoplayError;
use anyhow::{Context as _, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

/// What to do when a rule's prompt shows up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send one of these lines, chosen at random
    Reply(Vec<String>),
    /// The game is over; leave the loop
    Finish,
}

/// A prompt pattern and the action it triggers.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Regex,
    pub action: Action,
}

impl Rule {
    pub fn reply<S: Into<String>>(
        name: impl Into<String>,
        pattern: &str,
        replies: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(AutoplayError::EmptyReplies(name).into());
        }
        Ok(Self {
            pattern: compile(pattern)?,
            name,
            action: Action::Reply(replies),
        })
    }

    pub fn finish(name: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            pattern: compile(pattern)?,
            action: Action::Finish,
        })
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Invalid pattern: {pattern}"))
}

/// Ordered set of rules. Earlier rules win ties in the output buffer.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    rules: Vec<Rule>,
}

impl ResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn has_finish(&self) -> bool {
        self.rules.iter().any(|r| r.action == Action::Finish)
    }

    /// Patterns in rule order, ready for matching.
    pub fn patterns(&self) -> Vec<Regex> {
        self.rules.iter().map(|r| r.pattern.clone()).collect()
    }

    /// The line to send for the rule at `index`, or `None` if it ends the game.
    pub fn choose<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Option<&str> {
        match &self.rules.get(index)?.action {
            Action::Reply(replies) => replies.choose(rng).map(String::as_str),
            Action::Finish => None,
        }
    }
}
