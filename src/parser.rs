//! Parser for play scripts.
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`].

use crate::command::PlayCommand;
use crate::commands::{AddRule, Expect, Finish, Play, SendInput, Show, Wait};
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;
use std::time::Duration;

/// Parse a play script from a string slice and return the resulting commands.
///
/// Lines that are empty or start with `#` are ignored. Inline comments (` # …`)
/// are stripped while preserving `#` characters inside quoted strings.
///
/// # Errors
///
/// Returns an error if any line contains an unknown command, a malformed
/// argument, an invalid regular expression, or an unclosed quoted string.
///
/// # Example
///
/// ```
/// use autoplay::parse_str;
///
/// let commands = parse_str("expect \"initial money\"\nsend \"4000\"\n").unwrap();
/// assert_eq!(commands.len(), 2);
/// ```
pub fn parse_str(content: &str) -> Result<Vec<Box<dyn PlayCommand>>> {
    let mut commands = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(line);
        let cmd = parse_line(line)
            .with_context(|| format!("Failed to parse line {}: {}", line_num + 1, line))?;
        commands.push(cmd);
    }
    Ok(commands)
}

/// Parse a play script from a file and return the resulting commands.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Box<dyn PlayCommand>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    parse_str(&content)
}

type ParseFn = fn(&str) -> Result<Box<dyn PlayCommand>>;

static REGISTRY: &[(&str, ParseFn)] = &[
    (Expect::NAME, Expect::parse_boxed),
    (SendInput::NAME, SendInput::parse_boxed),
    (Wait::NAME, Wait::parse_boxed),
    (Show::NAME, Show::parse_boxed),
    (AddRule::NAME, AddRule::parse_boxed),
    (Finish::NAME, Finish::parse_boxed),
    (Play::NAME, Play::parse_boxed),
];

/// Dispatch a single non-empty, non-comment line to the matching command's parser.
fn parse_line(line: &str) -> Result<Box<dyn PlayCommand>> {
    let (name, args) = line.split_once(' ').unwrap_or((line, ""));
    REGISTRY
        .iter()
        .find(|(cmd_name, _)| *cmd_name == name)
        .map(|(_, parse)| parse(args))
        .unwrap_or_else(|| Err(anyhow!("Unknown command: {}", line)))
}

/// Strip inline comments from a line, preserving `#` inside quoted strings.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if ch == '#' && !in_quotes {
            return line[..i].trim();
        }
    }
    line
}

/// Parse a duration string: `1s`, `500ms`, `1.5s`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if let Some(ms_str) = s.strip_suffix("ms") {
        let ms: u64 = ms_str
            .trim()
            .parse()
            .context("Invalid milliseconds value")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(s_str) = s.strip_suffix('s') {
        let secs: f64 = s_str.trim().parse().context("Invalid seconds value")?;
        Duration::try_from_secs_f64(secs).context("Invalid seconds value")
    } else {
        Err(anyhow!("Duration must end with 's' or 'ms', got: {}", s))
    }
}

/// Split the leading double-quoted string off `s`.
///
/// Returns the unescaped string and the trimmed remainder. `\n`, `\t`, `\"`
/// and `\\` are unescaped; any other backslash sequence is kept as written so
/// regular expressions like `\w+> ` pass through untouched.
pub(crate) fn take_quoted(s: &str) -> Result<(String, &str)> {
    let s = s.trim_start();
    let body = s
        .strip_prefix('"')
        .ok_or_else(|| anyhow!("Expected string to start with '\"'"))?;

    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, body[i + 1..].trim())),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err(anyhow!("Expected string to end with '\"'"))
}

/// Parse an argument that must be exactly one double-quoted string.
pub(crate) fn parse_quoted_string(s: &str) -> Result<String> {
    let (text, rest) = take_quoted(s)?;
    if !rest.is_empty() {
        return Err(anyhow!("Unexpected text after string: {}", rest));
    }
    Ok(text)
}

/// Parse one or more double-quoted strings separated by whitespace.
pub(crate) fn parse_quoted_list(s: &str) -> Result<Vec<String>> {
    let mut items = Vec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let (item, remainder) = take_quoted(rest)?;
        items.push(item);
        rest = remainder;
    }
    if items.is_empty() {
        return Err(anyhow!("Expected at least one quoted string"));
    }
    Ok(items)
}
