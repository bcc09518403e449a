//! Character-level normalization.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn horizontal_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\S\n]+").unwrap())
}

fn wrapped_hyphen() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\n(\p{L})").unwrap())
}

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

fn key_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

/// Strip carriage returns, turn non-breaking spaces into spaces, collapse
/// horizontal whitespace and join words hyphenated across a line break.
///
/// Newlines are preserved.
pub fn normalize(raw: &str) -> String {
    let text: String = raw
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect();
    let text = horizontal_space().replace_all(&text, " ");
    join_wrapped_words(&text)
}

/// Drop `-\n` between two letters. The letter before the hyphen is checked
/// outside the match so chained breaks ("co-\no-\nperation") all join.
fn join_wrapped_words(text: &str) -> String {
    wrapped_hyphen()
        .replace_all(text, |caps: &Captures| {
            let before = caps.get(0).map_or(0, |m| m.start());
            let after_letter = text[..before]
                .chars()
                .next_back()
                .is_some_and(char::is_alphabetic);
            if after_letter {
                caps[1].to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Collapse runs of blank lines to a single blank line.
pub fn collapse_blank_runs(text: &str) -> String {
    blank_run().replace_all(text, "\n\n").into_owned()
}

/// Comparison key for a line: trimmed, inner whitespace collapsed, lowercased.
pub fn line_key(line: &str) -> String {
    key_space()
        .replace_all(line.trim(), " ")
        .to_lowercase()
}
