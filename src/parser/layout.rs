//! Layout reconstruction: positioned tokens to ordered page text.
//!
//! Tokens are bucketed into lines by quantized baseline, lines are ordered
//! top to bottom, tokens inside a line left to right (or right to left for
//! RTL script), and a blank line marks each large vertical gap.

use std::collections::BTreeMap;

use crate::lang::PatternSet;
use crate::model::Token;

use super::options::LayoutOptions;

/// Marker separating pages in reconstructed text.
pub const PAGE_BREAK: &str = "<<<PAGE_BREAK>>>";

/// The separator appended after every reconstructed page.
pub const PAGE_SEPARATOR: &str = "\n<<<PAGE_BREAK>>>\n";

/// A text line: tokens sharing a quantized baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Quantized baseline (`round(y / tol) * tol`)
    pub y_key: f32,
    /// Tokens in reading order
    pub tokens: Vec<Token>,
    /// Whether the line reads right to left
    pub is_rtl: bool,
}

impl TextLine {
    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

/// Rebuilds page text from positioned tokens.
pub struct LayoutReconstructor<'a> {
    options: &'a LayoutOptions,
    patterns: &'a PatternSet,
}

impl<'a> LayoutReconstructor<'a> {
    /// Create a new reconstructor.
    pub fn new(options: &'a LayoutOptions, patterns: &'a PatternSet) -> Self {
        Self { options, patterns }
    }

    /// Reconstruct every page and join them with [`PAGE_SEPARATOR`].
    pub fn reconstruct_document(&self, pages: &[Vec<Token>]) -> String {
        pages
            .iter()
            .map(|tokens| self.reconstruct_page(tokens))
            .collect()
    }

    /// Reconstruct one page's text, terminated by [`PAGE_SEPARATOR`].
    pub fn reconstruct_page(&self, tokens: &[Token]) -> String {
        if tokens.is_empty() {
            return PAGE_SEPARATOR.to_string();
        }

        let fs_med = median_font_size(tokens);
        let lines = self.group_lines(tokens, fs_med);
        let gap_threshold = self.gap_threshold(fs_med);

        let mut out: Vec<String> = Vec::with_capacity(lines.len() + 4);
        let mut prev_y: Option<f32> = None;

        for line in &lines {
            let text = line.text();
            if text.is_empty() {
                continue;
            }
            if let Some(prev) = prev_y {
                if (prev - line.y_key).abs() > gap_threshold {
                    out.push(String::new());
                }
            }
            out.push(text);
            prev_y = Some(line.y_key);
        }

        log::debug!(
            "Reconstructed page: {} tokens, {} lines (median font {:.1})",
            tokens.len(),
            lines.len(),
            fs_med
        );

        let mut page = out.join("\n").trim().to_string();
        page.push_str(PAGE_SEPARATOR);
        page
    }

    /// Group tokens into lines ordered top to bottom.
    pub fn group_lines(&self, tokens: &[Token], fs_med: f32) -> Vec<TextLine> {
        let tolerance = self.y_tolerance(fs_med);

        let mut buckets: BTreeMap<i64, Vec<Token>> = BTreeMap::new();
        for token in tokens {
            let key = round_half_up(token.y / tolerance) as i64;
            buckets.entry(key).or_default().push(token.clone());
        }

        // Highest baseline first: PDF y grows upwards.
        buckets
            .into_iter()
            .rev()
            .map(|(key, mut line_tokens)| {
                let is_rtl = self.is_rtl(&line_tokens);
                line_tokens.sort_by(|a, b| {
                    let ord = a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal);
                    if is_rtl {
                        ord.reverse()
                    } else {
                        ord
                    }
                });
                TextLine {
                    y_key: key as f32 * tolerance,
                    tokens: line_tokens,
                    is_rtl,
                }
            })
            .collect()
    }

    /// Vertical tolerance used to quantize baselines.
    pub fn y_tolerance(&self, fs_med: f32) -> f32 {
        round_half_up(fs_med * self.options.y_tolerance_factor).max(self.options.min_y_tolerance)
    }

    /// Vertical distance above which a blank line is inserted.
    pub fn gap_threshold(&self, fs_med: f32) -> f32 {
        let scaled = fs_med * self.options.gap_factor;
        let scaled = if scaled > 0.0 {
            scaled
        } else {
            self.options.fallback_gap
        };
        scaled.max(self.options.min_gap)
    }

    fn is_rtl(&self, tokens: &[Token]) -> bool {
        let rtl_chars: usize = tokens
            .iter()
            .map(|t| self.patterns.count_rtl_chars(&t.text))
            .sum();
        let total: usize = tokens.iter().map(|t| t.char_len()).sum();
        let floor = ((total as f32 * self.options.rtl_ratio).floor() as usize)
            .max(self.options.rtl_min_chars);
        rtl_chars >= floor
    }
}

/// Median of the positive font sizes, 0 when there are none.
pub fn median_font_size(tokens: &[Token]) -> f32 {
    let sizes: Vec<f32> = tokens
        .iter()
        .map(|t| t.font_size)
        .filter(|s| *s > 0.0)
        .collect();
    median(sizes)
}

fn median(mut values: Vec<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Round halves towards positive infinity, so `-2.5` becomes `-2`.
fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, x: f32, y: f32) -> Token {
        Token::new(text, x, y, 10.0).unwrap()
    }

    fn reconstruct(tokens: &[Token]) -> String {
        let options = LayoutOptions::default();
        let patterns = PatternSet::default();
        LayoutReconstructor::new(&options, &patterns).reconstruct_page(tokens)
    }

    #[test]
    fn test_empty_page_is_separator_only() {
        assert_eq!(reconstruct(&[]), PAGE_SEPARATOR);
    }

    #[test]
    fn test_tokens_ordered_left_to_right() {
        let page = reconstruct(&[token("world", 150.0, 700.0), token("Hello", 50.0, 701.0)]);
        assert_eq!(page, format!("Hello world{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_lines_ordered_top_to_bottom() {
        let page = reconstruct(&[
            token("second", 50.0, 688.0),
            token("first", 50.0, 700.0),
        ]);
        assert_eq!(page, format!("first\nsecond{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_large_gap_inserts_blank_line() {
        let page = reconstruct(&[
            token("top", 50.0, 700.0),
            token("bottom", 50.0, 650.0),
        ]);
        assert_eq!(page, format!("top\n\nbottom{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_rtl_line_ordered_right_to_left() {
        let page = reconstruct(&[token("بالعالم", 200.0, 700.0), token("مرحبا", 300.0, 700.0)]);
        assert_eq!(page, format!("مرحبا بالعالم{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_short_arabic_fragment_stays_ltr() {
        // Below the 6-character floor: read left to right.
        let page = reconstruct(&[token("عن", 200.0, 700.0), token("Note", 100.0, 700.0)]);
        assert_eq!(page, format!("Note عن{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_tolerance_and_gap_defaults() {
        let options = LayoutOptions::default();
        let patterns = PatternSet::default();
        let layout = LayoutReconstructor::new(&options, &patterns);
        assert_eq!(layout.y_tolerance(10.0), 6.0);
        assert_eq!(layout.y_tolerance(0.0), 2.0);
        assert_eq!(layout.gap_threshold(10.0), 16.0);
        assert_eq!(layout.gap_threshold(0.0), 16.0);
        assert_eq!(layout.gap_threshold(5.0), 10.0);
    }

    #[test]
    fn test_zero_geometry_does_not_fail() {
        let tokens = vec![
            Token::from_transform("alpha", &[]).unwrap(),
            Token::from_transform("beta", &[]).unwrap(),
        ];
        assert_eq!(reconstruct(&tokens), format!("alpha beta{}", PAGE_SEPARATOR));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), 0.0);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(116.67), 117.0);
    }

    #[test]
    fn test_reconstruct_document_joins_pages() {
        let options = LayoutOptions::default();
        let patterns = PatternSet::default();
        let layout = LayoutReconstructor::new(&options, &patterns);
        let text = layout.reconstruct_document(&[vec![token("one", 0.0, 10.0)], vec![]]);
        assert_eq!(text, format!("one{}{}", PAGE_SEPARATOR, PAGE_SEPARATOR));
    }
}
