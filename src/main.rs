use anyhow::{Context, Result, anyhow};
use autoplay::{Engine, MonopolyPlan, Options, parse_duration, parse_file, terminal_size};
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "autoplay",
    about = "Play-test an interactive terminal game by answering its prompts at random",
    version
)]
struct Args {
    /// Game to run in the PTY
    #[arg(short, long, env = "AUTOPLAY_COMMAND", default_value = "./monopoly")]
    command: String,

    /// Play script to run instead of the built-in Monopoly session
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Initial money sent during setup
    #[arg(long, default_value_t = 4000)]
    money: u32,

    /// Number of players
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
    players: u8,

    /// Delay between turns (e.g. 500ms, 1.5s)
    #[arg(long, default_value = "500ms", value_parser = parse_duration)]
    pace: Duration,

    /// How long to wait for each prompt
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    timeout: Duration,

    /// Give up after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// Seed for the reply picker, for reproducible games
    #[arg(long, env = "AUTOPLAY_SEED")]
    seed: Option<u64>,

    /// Terminal rows [default: your terminal's, else 24]
    #[arg(long)]
    rows: Option<u16>,

    /// Terminal columns [default: your terminal's, else 80]
    #[arg(long)]
    cols: Option<u16>,

    /// Also append the game output to this file
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Arguments to pass to the game
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let commands = match &args.script {
        Some(path) => parse_file(path)
            .with_context(|| format!("Failed to parse script file: {}", path.display()))?,
        None => MonopolyPlan {
            initial_money: args.money,
            players: args.players,
            pace: args.pace,
        }
        .commands()?,
    };

    let transcript = match &args.transcript {
        Some(path) => Some(open_transcript(path)?),
        None => None,
    };

    let options = Options {
        timeout: args.timeout,
        max_turns: args.max_turns,
        seed: args.seed,
        ..Default::default()
    }
    .with_size(args.rows, args.cols, terminal_size());
    let (rows, cols) = (options.rows, options.cols);

    let mut engine =
        Engine::spawn_with_handler(&args.command, args.args.as_slice(), options, move |data| {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(data);
            let _ = stdout.flush();
            if let Some(file) = &transcript {
                if let Ok(mut file) = file.lock() {
                    let _ = file.write_all(data);
                }
            }
        })
        .context("Failed to start the game")?;
    info!(
        command = %args.command,
        seed = ?args.seed,
        rows,
        cols,
        "game started"
    );

    let mut killer = engine.killer();
    let result = tokio::select! {
        result = engine.execute(commands) => result,
        signal = shutdown_signal() => {
            warn!("terminate");
            if let Err(e) = killer.kill() {
                warn!("Failed to kill the game: {e}");
            }
            Err(anyhow!("Interrupted by {}", signal?))
        }
    };

    engine.shutdown()?;
    result
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries the game transcript.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn open_transcript(path: &Path) -> Result<Arc<Mutex<File>>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open transcript: {}", path.display()))?;
    Ok(Arc::new(Mutex::new(file)))
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate()).context("Failed to listen for SIGTERM")?;
    tokio::select! {
        r = tokio::signal::ctrl_c() => r.map(|_| "SIGINT").context("Failed to listen for SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    Ok("Ctrl-C")
}
