//! The built-in session for the Monopoly game.
//!
//! Setup answers the start menu, the initial money and the player count, then
//! picks a character for every player in turn. After that every player prompt
//! is answered with `roll`, every numbered menu with `1` or `2`, and every
//! yes/no question with `y` or `n` until somebody wins. The session ends once
//! the game is back at its start menu.

use crate::command::PlayCommand;
use crate::commands::{AddRule, Expect, Finish, Play, SendInput};
use crate::rules::Rule;
use anyhow::{Result, bail};
use std::time::Duration;

pub const START_PROMPT: &str = "enter 'start' to play> ";
pub const MONEY_PROMPT: &str = "initial money";
pub const PLAYERS_PROMPT: &str = "select number of player";
pub const PLAYER_PROMPT: &str = r"\w+> ";
pub const MENU_PROMPT: &str = r"input your choice\? ";
pub const BOOL_PROMPT: &str = r" \(y/n\) ";
pub const WON_PROMPT: &str = "Player .* has won";

/// Parameters of a built-in Monopoly session.
#[derive(Debug, Clone, PartialEq)]
pub struct MonopolyPlan {
    pub initial_money: u32,
    pub players: u8,
    pub pace: Duration,
}

impl Default for MonopolyPlan {
    fn default() -> Self {
        Self {
            initial_money: 4000,
            players: 4,
            pace: Duration::from_millis(500),
        }
    }
}

impl MonopolyPlan {
    pub const MAX_PLAYERS: u8 = 4;

    pub fn commands(&self) -> Result<Vec<Box<dyn PlayCommand>>> {
        if !(1..=Self::MAX_PLAYERS).contains(&self.players) {
            bail!(
                "Player count must be between 1 and {}, got {}",
                Self::MAX_PLAYERS,
                self.players
            );
        }

        // `enter 'start' to play> ` is itself a `\w+> ` prompt, so the start
        // menu is matched by literal text.
        let start = regex::escape(START_PROMPT);

        let mut commands: Vec<Box<dyn PlayCommand>> = vec![
            Box::new(Expect::new(&start)?),
            Box::new(SendInput::new("start")),
            Box::new(Expect::new(MONEY_PROMPT)?),
            Box::new(SendInput::new(self.initial_money.to_string())),
            Box::new(Expect::new(PLAYERS_PROMPT)?),
            Box::new(SendInput::new(self.players.to_string())),
        ];

        for idx in 1..=self.players {
            commands.push(Box::new(Expect::new(MENU_PROMPT)?));
            commands.push(Box::new(SendInput::new(idx.to_string())));
        }

        commands.push(Box::new(AddRule::new(Rule::reply(
            "player",
            PLAYER_PROMPT,
            ["roll"],
        )?)));
        commands.push(Box::new(AddRule::new(Rule::reply(
            "menu",
            MENU_PROMPT,
            ["1", "2"],
        )?)));
        commands.push(Box::new(AddRule::new(Rule::reply(
            "yes/no",
            BOOL_PROMPT,
            ["y", "n"],
        )?)));
        commands.push(Box::new(Finish::new(Rule::finish("won", WON_PROMPT)?)));
        commands.push(Box::new(Play::new(self.pace)));
        commands.push(Box::new(Expect::new(&start)?));

        Ok(commands)
    }
}
