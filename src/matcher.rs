//! Rolling output buffer and regular expression matching over it.

use regex::Regex;

const MAX_BUFFER: usize = 10_000;
const KEEP_BUFFER: usize = 5_000;

/// A successful match in the output buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Index of the pattern that matched
    pub index: usize,
    /// Output that preceded the match
    pub before: String,
    /// The matched text itself
    pub text: String,
}

/// Game output received but not yet consumed by a match.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk from the PTY (invalid UTF-8 is replaced).
    pub fn push(&mut self, data: &[u8]) {
        self.text.push_str(&String::from_utf8_lossy(data));

        if self.text.len() > MAX_BUFFER {
            let mut cut = self.text.len() - KEEP_BUFFER;
            while !self.text.is_char_boundary(cut) {
                cut += 1;
            }
            self.text.drain(..cut);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Find the pattern whose match starts earliest in the buffer and consume
    /// the buffer through the end of that match.
    ///
    /// When two patterns match at the same position the one listed first wins.
    pub fn find_earliest(&mut self, patterns: &[Regex]) -> Option<Match> {
        let (index, start, end) = patterns
            .iter()
            .enumerate()
            .filter_map(|(i, re)| re.find(&self.text).map(|m| (i, m.start(), m.end())))
            .min_by_key(|&(i, start, _)| (start, i))?;

        let text = self.text[start..end].to_string();
        let before = self.text[..start].to_string();
        self.text.drain(..end);

        Some(Match {
            index,
            before,
            text,
        })
    }
}
