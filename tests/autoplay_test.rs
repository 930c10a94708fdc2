use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// A stand-in for the Monopoly binary: same prompts, scripted turns.
const FAKE_MONOPOLY: &str = r#"
printf "enter 'start' to play> "
read cmd
[ "$cmd" = start ] || exit 3
printf "please set initial money: "
read money
echo "money $money"
printf "select number of player (1-4): "
read n
i=1
while [ $i -le $n ]; do
  printf "1. Q  2. A  3. S  4. J\ninput your choice? "
  read pick
  i=$((i + 1))
done
turn=0
while [ $turn -lt 5 ]; do
  printf "A> "
  read action
  [ "$action" = roll ] || exit 4
  printf "1. buy  2. pass\ninput your choice? "
  read choice
  echo "picked $choice"
  printf "upgrade house? (y/n) "
  read yn
  echo "answered $yn"
  turn=$((turn + 1))
done
echo "Player A has won"
printf "enter 'start' to play> "
read cmd
"#;

fn write_game(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("autoplay_{}_{}.sh", name, std::process::id()));
    fs::write(&path, body).expect("Failed to write fake game");
    path
}

fn run(args: &[&str], game: &PathBuf) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autoplay"))
        .args(["--pace", "10ms", "--command", "sh"])
        .args(args)
        .arg(game)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute autoplay")
}

#[test]
fn test_plays_until_win() {
    let game = write_game("win", FAKE_MONOPOLY);
    let output = run(&["--players", "2", "--money", "1500"], &game);

    assert!(
        output.status.success(),
        "autoplay failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("money 1500"), "stdout: {stdout}");
    assert!(stdout.contains("Player A has won"), "stdout: {stdout}");
    assert_eq!(stdout.matches("answered ").count(), 5, "stdout: {stdout}");

    let _ = fs::remove_file(game);
}

#[test]
fn test_same_seed_same_game() {
    let game = write_game("seed", FAKE_MONOPOLY);
    let answers = |output: &Output| -> Vec<String> {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|l| l.starts_with("answered ") || l.starts_with("picked "))
            .map(|l| l.trim().to_string())
            .collect()
    };

    let first = run(&["--seed", "42"], &game);
    let second = run(&["--seed", "42"], &game);
    assert!(first.status.success() && second.status.success());
    assert_eq!(answers(&first).len(), 10);
    assert_eq!(answers(&first), answers(&second));

    let _ = fs::remove_file(game);
}

#[test]
fn test_game_exits_early() {
    let game = write_game("early", "printf \"enter 'start' to play> \"\nread cmd\nexit 0\n");
    let output = run(&[], &game);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Game exited"), "stderr: {stderr}");

    let _ = fs::remove_file(game);
}

#[test]
fn test_prompt_timeout() {
    let game = write_game("silent", "printf \"enter 'start' to play> \"\nread cmd\nsleep 10\n");
    let output = run(&["--timeout", "500ms"], &game);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Timeout"), "stderr: {stderr}");

    let _ = fs::remove_file(game);
}

#[test]
fn test_turn_limit() {
    let game = write_game("limit", FAKE_MONOPOLY);
    let output = run(&["--max-turns", "4"], &game);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("after 4 turns"), "stderr: {stderr}");

    let _ = fs::remove_file(game);
}

#[test]
fn test_custom_script() {
    let game = write_game(
        "quiz",
        "printf 'ready? (y/n) '\nread a\nprintf 'sure? (y/n) '\nread b\necho \"Player $a$b has won\"\n",
    );
    let script = std::env::temp_dir().join(format!("autoplay_quiz_{}.play", std::process::id()));
    fs::write(
        &script,
        r#"
# answer every question, stop at the winner
rule " \(y/n\) " "y" "n"
finish "Player .* has won"   # ends the loop
play 10ms
show "-- done --"
"#,
    )
    .expect("Failed to write script");

    let output = run(&["--script", script.to_str().unwrap()], &game);
    assert!(
        output.status.success(),
        "autoplay failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-- done --"), "stdout: {stdout}");

    let _ = fs::remove_file(game);
    let _ = fs::remove_file(script);
}

#[test]
fn test_invalid_script() {
    let game = write_game("invalid", FAKE_MONOPOLY);
    let script = std::env::temp_dir().join(format!("autoplay_bad_{}.play", std::process::id()));
    fs::write(&script, "roll \"dice\"\n").expect("Failed to write script");

    let output = run(&["--script", script.to_str().unwrap()], &game);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown command"), "stderr: {stderr}");

    let _ = fs::remove_file(game);
    let _ = fs::remove_file(script);
}

fn write_script(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("autoplay_{}_{}.play", name, std::process::id()));
    fs::write(&path, body).expect("Failed to write script");
    path
}

#[test]
fn test_size_flags_reach_the_game() {
    let game = write_game("size", "echo \"size $(stty size)\"\nsleep 1\n");
    let script = write_script("size_flags", "expect \"size 40 100\" 5s\n");

    let output = run(
        &["--rows", "40", "--cols", "100", "--script", script.to_str().unwrap()],
        &game,
    );
    assert!(
        output.status.success(),
        "autoplay failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let _ = fs::remove_file(game);
    let _ = fs::remove_file(script);
}

#[test]
fn test_default_size_without_terminal() {
    // stdout is a pipe here, so there is no terminal size to copy.
    let game = write_game("nosize", "echo \"size $(stty size)\"\nsleep 1\n");
    let script = write_script("size_default", "expect \"size 24 80\" 5s\n");

    let output = run(&["--script", script.to_str().unwrap()], &game);
    assert!(
        output.status.success(),
        "autoplay failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let _ = fs::remove_file(game);
    let _ = fs::remove_file(script);
}

fn process_alive(pid: &str) -> bool {
    Command::new("sh")
        .args(["-c", &format!("kill -0 {pid} 2>/dev/null")])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[test]
fn test_sigterm_kills_game() {
    let pid_file =
        std::env::temp_dir().join(format!("autoplay_sigterm_{}.pid", std::process::id()));
    let _ = fs::remove_file(&pid_file);
    let game = write_game(
        "sigterm",
        &format!(
            "printf \"enter 'start' to play> \"\nread cmd\necho $$ > {}\nexec sleep 30\n",
            pid_file.display()
        ),
    );

    let child = Command::new(env!("CARGO_BIN_EXE_autoplay"))
        .args(["--command", "sh"])
        .arg(&game)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn autoplay");

    // The pid file shows up once the game got past the start menu.
    let deadline = Instant::now() + Duration::from_secs(10);
    let game_pid = loop {
        if let Ok(pid) = fs::read_to_string(&pid_file) {
            if !pid.trim().is_empty() {
                break pid.trim().to_string();
            }
        }
        assert!(Instant::now() < deadline, "game never reached setup");
        thread::sleep(Duration::from_millis(50));
    };

    let sent = Command::new("sh")
        .args(["-c", &format!("kill -TERM {}", child.id())])
        .status()
        .expect("Failed to send SIGTERM");
    assert!(sent.success());

    let output = child.wait_with_output().expect("Failed to wait for autoplay");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("terminate"), "stderr: {stderr}");
    assert!(stderr.contains("SIGTERM"), "stderr: {stderr}");
    assert!(!process_alive(&game_pid), "game {game_pid} still running");

    let _ = fs::remove_file(game);
    let _ = fs::remove_file(pid_file);
}
