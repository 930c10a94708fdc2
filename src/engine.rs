use crate::command::{Context, OutputHandler, PlayCommand};
use crate::pty::{Killer, PtySession};
use crate::pty_reader::spawn_reader;
use anyhow::{Context as _, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Session settings that are not part of the play script itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub rows: u16,
    pub cols: u16,
    /// Per-prompt timeout used when a command does not set its own
    pub timeout: Duration,
    /// Abort `play` after this many turns
    pub max_turns: Option<u64>,
    /// Seed for reply selection; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 80,
            timeout: Duration::from_secs(30),
            max_turns: None,
            seed: None,
        }
    }
}

impl Options {
    /// Pick the PTY size: explicit `rows`/`cols` first, then the size of the
    /// user's terminal, then the 24x80 default. Each dimension resolves on
    /// its own, so `--rows 40` alone keeps the detected width.
    pub fn with_size(
        mut self,
        rows: Option<u16>,
        cols: Option<u16>,
        detected: Option<(u16, u16)>,
    ) -> Self {
        let (detected_rows, detected_cols) = detected.unwrap_or((self.rows, self.cols));
        self.rows = rows.unwrap_or(detected_rows);
        self.cols = cols.unwrap_or(detected_cols);
        self
    }
}

/// Rows and columns of the terminal stdout is attached to, if any.
pub fn terminal_size() -> Option<(u16, u16)> {
    if !io::stdout().is_terminal() {
        return None;
    }
    match crossterm::terminal::size() {
        Ok((cols, rows)) if rows > 0 && cols > 0 => Some((rows, cols)),
        Ok(_) => None,
        Err(e) => {
            debug!("cannot read terminal size: {e}");
            None
        }
    }
}

/// Runs play commands against a game spawned in a PTY.
///
/// Output from the game is forwarded to a user-supplied handler as it
/// arrives. The default handler writes to stdout.
pub struct Engine {
    ctx: Context,
}

impl Engine {
    /// Spawn `command` and write its output to stdout.
    pub fn spawn<S: AsRef<str>>(command: &str, args: &[S], options: Options) -> Result<Self> {
        Self::spawn_with_handler(command, args, options, |data| {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(data);
            let _ = stdout.flush();
        })
    }

    /// Spawn `command` and pass every chunk of its output to `handler`.
    pub fn spawn_with_handler<S, F>(
        command: &str,
        args: &[S],
        options: Options,
        handler: F,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let args: Vec<String> = args.iter().map(|s| s.as_ref().to_string()).collect();
        let (pty, reader) = PtySession::spawn(command, &args, options.rows, options.cols)
            .context("Failed to spawn the game")?;
        let output_rx = spawn_reader(reader);

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let handler: OutputHandler = Arc::new(handler);

        Ok(Engine {
            ctx: Context::new(
                pty,
                output_rx,
                handler,
                rng,
                options.timeout,
                options.max_turns,
            ),
        })
    }

    /// Execute commands in order, stopping at the first failure.
    pub async fn execute(&mut self, commands: Vec<Box<dyn PlayCommand>>) -> Result<()> {
        info!(steps = commands.len(), "session started");
        for (step, cmd) in commands.iter().enumerate() {
            debug!(step = step + 1, command = cmd.name(), "run");
            cmd.execute(&mut self.ctx)
                .await
                .with_context(|| format!("Step {} ({}) failed", step + 1, cmd.name()))?;
        }
        self.ctx.drain_pending();
        info!("session finished");
        Ok(())
    }

    /// A handle that can kill the game while [`execute`](Self::execute) is running.
    pub fn killer(&self) -> Killer {
        self.ctx.pty.killer()
    }

    /// Resize the game's terminal.
    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.ctx.pty.resize(rows, cols)
    }

    /// Kill the game if it is still running.
    pub fn shutdown(&mut self) -> Result<()> {
        self.ctx.pty.kill()
    }
}
