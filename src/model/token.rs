//! Positioned text tokens produced by a PDF text extractor.

use serde::{Deserialize, Serialize};

/// A piece of text with its position on the page.
///
/// Coordinates follow PDF user space: `y` grows upwards, so the top of the
/// page has the largest `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content (whitespace-collapsed, never empty)
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Font size in points (0 when unknown)
    pub font_size: f32,
}

impl Token {
    /// Create a token. Returns `None` when the text is blank.
    pub fn new(text: &str, x: f32, y: f32, font_size: f32) -> Option<Self> {
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            font_size: finite_or_zero(font_size),
        })
    }

    /// Create a token from a text-space transform `[a, b, c, d, e, f]`.
    ///
    /// `x = e`, `y = f` and the font size is approximated as
    /// `max(|a|, |d|)`. Missing entries degrade to zero.
    pub fn from_transform(text: &str, transform: &[f32]) -> Option<Self> {
        let at = |i: usize| transform.get(i).copied().map(finite_or_zero).unwrap_or(0.0);
        let font_size = at(0).abs().max(at(3).abs());
        Self::new(text, at(4), at(5), font_size)
    }

    /// Number of characters in the token text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
