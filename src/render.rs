//! Terminal rendering of highlighted text.
//!
//! Snippets carry `<mark>...</mark>` around matches. On a terminal those
//! become reverse video; when stdout is piped the tags are left in place so
//! the output stays machine-readable.

use anyhow::bail;

use transcript_search_core::snippet::{MARK_CLOSE, MARK_OPEN};

const ANSI_REVERSE: &str = "\x1b[7m";
const ANSI_RESET: &str = "\x1b[0m";

/// How `<mark>` tags are shown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkStyle {
    /// Reverse video.
    Ansi,
    /// Tags printed verbatim.
    Tags,
}

impl MarkStyle {
    /// Reverse video when stdout is a TTY, tags otherwise.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            MarkStyle::Ansi
        } else {
            MarkStyle::Tags
        }
    }

    /// Parse the `--marks` flag: `auto`, `ansi`, or `tags`.
    pub fn from_flag(flag: &str) -> anyhow::Result<Self> {
        match flag {
            "auto" => Ok(Self::default_for_tty()),
            "ansi" => Ok(MarkStyle::Ansi),
            "tags" => Ok(MarkStyle::Tags),
            other => bail!("Unknown marks style: {}. Use auto, ansi, or tags.", other),
        }
    }

    pub fn render(&self, text: &str) -> String {
        match self {
            MarkStyle::Tags => text.to_string(),
            MarkStyle::Ansi => text
                .replace(MARK_OPEN, ANSI_REVERSE)
                .replace(MARK_CLOSE, ANSI_RESET),
        }
    }
}

/// Format a number with comma thousands separators (e.g. 1234 → "1,234").
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
