//! Size cap with distributed sampling.

/// Result of [`cap_length`].
#[derive(Debug, Clone, PartialEq)]
pub struct Capped {
    pub text: String,
    /// Whether the text was reduced
    pub sampled: bool,
}

/// Keep text under `max_chars` characters.
///
/// Oversized text is not truncated: `windows` equal slices of
/// `max_chars / windows` characters are taken at evenly spaced offsets from
/// the start to the very end of the text, and joined with a blank line.
pub fn cap_length(text: String, max_chars: usize, windows: usize) -> Capped {
    let len = text.chars().count();
    if len <= max_chars {
        return Capped {
            text,
            sampled: false,
        };
    }

    let k = windows.max(1);
    let window = max_chars / k;

    // Byte offset of every char boundary, plus the end.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    if len <= window || k == 1 {
        let end = bounds[max_chars.min(len)];
        return Capped {
            text: text[..end].to_string(),
            sampled: true,
        };
    }

    let max_start = len - window;
    let parts: Vec<&str> = window_starts(max_start, k)
        .map(|start| &text[bounds[start]..bounds[start + window]])
        .collect();

    log::warn!(
        "Cleaned text of {} chars exceeds {}: sampled {} windows of {} chars",
        len,
        max_chars,
        k,
        window
    );

    Capped {
        text: parts.join("\n\n"),
        sampled: true,
    }
}

/// Evenly spaced offsets from 0 to `max_start` inclusive.
fn window_starts(max_start: usize, k: usize) -> impl Iterator<Item = usize> {
    (0..k).map(move |i| if k <= 1 { 0 } else { i * max_start / (k - 1) })
}
