//! The [`PlayCommand`] trait and the [`Context`] type commands receive when executed.

use crate::error::AutoplayError;
use crate::matcher::{Match, OutputBuffer};
use crate::pty::PtySession;
use crate::rules::ResponseTable;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, timeout_at};
use tracing::trace;

pub(crate) type OutputHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Execution context passed to [`PlayCommand::execute`].
///
/// Owns the game's PTY, the output received so far, the response table built
/// up by `rule`/`finish` commands, and the random source used for replies.
pub struct Context {
    pub(crate) pty: PtySession,
    pub(crate) output_rx: UnboundedReceiver<Vec<u8>>,
    pub(crate) output: OutputBuffer,
    pub(crate) output_handler: OutputHandler,
    pub(crate) rules: ResponseTable,
    pub(crate) rng: StdRng,
    /// How long a single prompt may take to appear
    pub timeout: Duration,
    /// Abort `play` after this many replies
    pub max_turns: Option<u64>,
    eof: bool,
}

impl Context {
    pub(crate) fn new(
        pty: PtySession,
        output_rx: UnboundedReceiver<Vec<u8>>,
        output_handler: OutputHandler,
        rng: StdRng,
        timeout: Duration,
        max_turns: Option<u64>,
    ) -> Self {
        Self {
            pty,
            output_rx,
            output: OutputBuffer::new(),
            output_handler,
            rules: ResponseTable::new(),
            rng,
            timeout,
            max_turns,
            eof: false,
        }
    }

    /// Send `line` plus a newline to the game.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        self.pty.send_line(line)
    }

    /// Pass bytes through the output handler (the transcript).
    pub fn emit(&self, data: &[u8]) {
        (self.output_handler)(data);
    }

    pub fn rules_mut(&mut self) -> &mut ResponseTable {
        &mut self.rules
    }

    /// Wait until one of `patterns` appears in the game output.
    ///
    /// The buffered output is checked first, then new output is read until a
    /// pattern matches, `timeout` elapses, or the game closes the terminal.
    /// The buffer is consumed through the end of the match.
    pub async fn expect_any(&mut self, patterns: &[Regex], timeout: Duration) -> Result<Match> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(m) = self.output.find_earliest(patterns) {
                trace!(index = m.index, text = %m.text, "matched");
                return Ok(m);
            }
            if self.eof {
                return Err(AutoplayError::Eof {
                    patterns: describe(patterns),
                }
                .into());
            }
            match timeout_at(deadline, self.output_rx.recv()).await {
                Ok(Some(data)) => {
                    self.emit(&data);
                    self.output.push(&data);
                }
                Ok(None) => self.eof = true,
                Err(_) => {
                    return Err(AutoplayError::Timeout {
                        patterns: describe(patterns),
                        timeout,
                    }
                    .into());
                }
            }
        }
    }

    /// Wait for a single pattern.
    pub async fn expect(&mut self, pattern: &Regex, timeout: Duration) -> Result<Match> {
        self.expect_any(std::slice::from_ref(pattern), timeout).await
    }

    /// Keep copying game output into the transcript and buffer until
    /// `deadline`. Returns early only if the game closed the terminal, after
    /// sleeping out the rest of the pause.
    pub async fn pump_until(&mut self, deadline: Instant) {
        while !self.eof {
            match timeout_at(deadline, self.output_rx.recv()).await {
                Ok(Some(data)) => {
                    self.emit(&data);
                    self.output.push(&data);
                }
                Ok(None) => self.eof = true,
                Err(_) => return,
            }
        }
        tokio::time::sleep_until(deadline).await;
    }

    /// Copy any output that has already arrived into the transcript and
    /// buffer without waiting.
    pub fn drain_pending(&mut self) {
        while let Ok(data) = self.output_rx.try_recv() {
            self.emit(&data);
            self.output.push(&data);
        }
    }
}

fn describe(patterns: &[Regex]) -> Vec<String> {
    patterns.iter().map(|p| format!("'{}'", p.as_str())).collect()
}

/// A single step of a play session.
///
/// Implement this trait to add a new command to the engine. Then:
///
/// 1. Define `pub const NAME: &'static str` on your struct, the script
///    keyword (e.g. `"send"`, `"expect"`) used by the parser.
/// 2. Re-export the struct from `src/commands/mod.rs`.
/// 3. Add one entry to the `REGISTRY` in [`crate::parser`]:
///    `(MyCmd::NAME, MyCmd::parse_boxed)`.
#[async_trait(?Send)]
pub trait PlayCommand: 'static {
    /// The command name, accessible at runtime through a trait object.
    fn name(&self) -> &'static str;

    /// Parse this command from the argument string (everything after the
    /// command keyword on the script line).
    fn parse(args: &str) -> Result<Self>
    where
        Self: Sized;

    /// Parse and box this command. Used as the function-pointer type stored in
    /// the command registry.
    fn parse_boxed(args: &str) -> Result<Box<dyn PlayCommand>>
    where
        Self: Sized,
    {
        Ok(Box::new(Self::parse(args)?))
    }

    /// Execute the command using the provided engine context.
    async fn execute(&self, ctx: &mut Context) -> Result<()>;
}
