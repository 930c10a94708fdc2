//! # Autoplay
//!
//! Play-tests an interactive terminal game by running it in a PTY, walking it
//! through its setup menus and then answering every prompt at random until
//! somebody wins.
//!
//! A session is a list of [`PlayCommand`]s. The built-in Monopoly session
//! comes from [`MonopolyPlan`]; any other game can be driven with a play
//! script.
//!
//! ## Quick start
//!
//! ```no_run
//! use autoplay::{Engine, MonopolyPlan, Options};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let commands = MonopolyPlan::default().commands()?;
//!     let mut engine = Engine::spawn("./monopoly", &[] as &[&str], Options::default())?;
//!     engine.execute(commands).await?;
//!     engine.shutdown()
//! }
//! ```
//!
//! ## Script syntax
//!
//! | Command | Description |
//! |---------|-------------|
//! | `expect "regex"` | Wait until `regex` matches the game output |
//! | `expect "regex" 5s` | Same, with its own timeout |
//! | `send "text"` | Send a line to the game |
//! | `wait 500ms` | Pause for a duration (`ms` or `s` units, floats allowed) |
//! | `show "text"` | Write a note into the transcript |
//! | `rule "regex" "a" "b"` | During `play`, answer `regex` with `a` or `b` |
//! | `finish "regex"` | During `play`, stop when `regex` matches |
//! | `play 500ms` | Answer prompts until a finish rule matches |
//! | `# comment` | Full-line or inline comment |
//!
//! The built-in Monopoly session written as a script:
//!
//! ```text
//! expect "enter 'start' to play> "
//! send "start"
//! expect "initial money"
//! send "4000"
//! expect "select number of player"
//! send "2"
//! expect "input your choice\? "
//! send "1"
//! expect "input your choice\? "
//! send "2"
//! rule "\w+> " "roll"
//! rule "input your choice\? " "1" "2"
//! rule " \(y/n\) " "y" "n"
//! finish "Player .* has won"
//! play 500ms
//! expect "enter 'start' to play> "
//! ```
//!
//! When several rules match, the one whose match starts earliest in the
//! output wins.

pub mod command;
pub mod commands;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod monopoly;
pub mod parser;
pub(crate) mod pty;
pub(crate) mod pty_reader;
pub mod rules;

pub use command::{Context, PlayCommand};
pub use commands::{AddRule, Expect, Finish, Play, SendInput, Show, Wait};
pub use engine::{Engine, Options, terminal_size};
pub use error::AutoplayError;
pub use monopoly::MonopolyPlan;
pub use parser::{parse_duration, parse_file, parse_str};
pub use rules::{Action, ResponseTable, Rule};
