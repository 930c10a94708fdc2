use anyhow::{Context, Result};
use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Handle that can kill the game from another task (e.g. a signal handler).
pub type Killer = Box<dyn ChildKiller + Send + Sync>;

/// The game running inside a PTY
pub struct PtySession {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
}

impl PtySession {
    /// Spawn `command` in a PTY of `rows` x `cols`, returning the session and
    /// the output reader separately so the reader can move to its own thread.
    pub fn spawn(
        command: &str,
        args: &[String],
        rows: u16,
        cols: u16,
    ) -> Result<(Self, Box<dyn Read + Send>)> {
        let pty_system = portable_pty::native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(command);
        cmd.args(args);
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn {command}"))?;
        // The slave end belongs to the child now; holding it would keep the
        // PTY open after the game exits and hide EOF from the reader.
        drop(pair.slave);

        debug!(command, pid = ?child.process_id(), rows, cols, "spawned game");

        let writer = pair
            .master
            .take_writer()
            .context("Failed to get PTY writer")?;

        let reader = pair
            .master
            .try_clone_reader()
            .context("Failed to get PTY reader")?;

        let session = PtySession {
            master: pair.master,
            child,
            writer,
        };

        Ok((session, reader))
    }

    /// Write raw bytes to the game's stdin
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write `line` followed by a newline
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.write(&bytes)
            .with_context(|| format!("Failed to send {line:?} to the game"))
    }

    /// A kill handle independent of this session's borrow
    pub fn killer(&self) -> Killer {
        self.child.clone_killer()
    }

    /// Check if the game is still running
    pub fn is_running(&mut self) -> bool {
        self.child.try_wait().ok().flatten().is_none()
    }

    /// Kill the game if it is still running and reap it
    pub fn kill(&mut self) -> Result<()> {
        if self.is_running() {
            self.child.kill().context("Failed to kill the game")?;
            let code = self.wait()?;
            debug!(code, "game killed");
        }
        Ok(())
    }

    /// Wait for the game to exit, returning its exit code
    fn wait(&mut self) -> Result<u32> {
        let status = self.child.wait().context("Failed to reap the game")?;
        Ok(status.exit_code())
    }

    /// Resize the PTY
    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to resize PTY")
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        if let Err(e) = self.kill() {
            warn!("{e:#}");
        }
    }
}
