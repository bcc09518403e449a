//! Thresholds and switches for the cleanup stages.

use serde::{Deserialize, Serialize};

/// Options for the text cleanup pipeline.
///
/// Defaults reproduce the production heuristics; every field can be
/// overridden from a partial JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Re-split pages that arrived collapsed into one or two lines
    pub rehydrate: bool,
    /// Drop table-of-contents pages
    pub remove_toc_pages: bool,
    /// Drop lines that repeat at the top or bottom of many pages
    pub remove_headers_footers: bool,
    /// Drop standalone page-number lines
    pub remove_page_numbers: bool,
    /// Suppress runs of TOC-shaped lines inside body pages
    pub strip_toc_streaks: bool,
    /// Drop short lines that carry no words
    pub filter_noise: bool,
    /// Drop the third and later repetitions of a line
    pub dedupe: bool,

    // Rehydration
    /// A page with at most this many lines may be collapsed
    pub rehydrate_max_lines: usize,
    /// ...and at least this many characters
    pub rehydrate_min_len: usize,
    /// Pages with this many lines are already structured
    pub structured_min_lines: usize,

    /// Pages shorter than this are discarded
    pub min_page_len: usize,

    // TOC pages
    pub toc_min_lines: usize,
    pub toc_ratio_min_lines: usize,
    pub toc_dotted_min: usize,
    pub toc_numbered_ratio: f64,
    pub toc_short_ratio: f64,
    pub toc_short_len: usize,

    // Headers and footers
    /// Lines examined at each end of a page
    pub edge_lines: usize,
    pub header_key_min_len: usize,
    pub header_key_max_len: usize,
    /// Page count from which the large-document ratio applies
    pub large_doc_pages: usize,
    pub large_doc_ratio: f64,
    pub small_doc_ratio: f64,
    /// Floor of the repetition threshold
    pub min_repetitions: usize,

    // TOC streak
    pub streak_enter: usize,
    pub streak_exit_len: usize,

    // Noise filter
    pub short_line_len: usize,
    pub heavy_token_len: usize,
    pub heavy_token_min: usize,

    /// Occurrences of a line kept before later ones are dropped
    pub max_repeats: usize,

    // Size cap
    pub max_chars: usize,
    pub sample_windows: usize,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            rehydrate: true,
            remove_toc_pages: true,
            remove_headers_footers: true,
            remove_page_numbers: true,
            strip_toc_streaks: true,
            filter_noise: true,
            dedupe: true,
            rehydrate_max_lines: 2,
            rehydrate_min_len: 600,
            structured_min_lines: 6,
            min_page_len: 20,
            toc_min_lines: 10,
            toc_ratio_min_lines: 12,
            toc_dotted_min: 6,
            toc_numbered_ratio: 0.45,
            toc_short_ratio: 0.6,
            toc_short_len: 80,
            edge_lines: 3,
            header_key_min_len: 8,
            header_key_max_len: 100,
            large_doc_pages: 10,
            large_doc_ratio: 0.5,
            small_doc_ratio: 0.7,
            min_repetitions: 2,
            streak_enter: 6,
            streak_exit_len: 140,
            short_line_len: 18,
            heavy_token_len: 4,
            heavy_token_min: 2,
            max_repeats: 2,
            max_chars: 200_000,
            sample_windows: 5,
        }
    }
}

impl CleanupOptions {
    /// Create cleanup options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only normalize and recompose: every removal stage off.
    pub fn minimal() -> Self {
        Self {
            rehydrate: false,
            remove_toc_pages: false,
            remove_headers_footers: false,
            remove_page_numbers: false,
            strip_toc_streaks: false,
            filter_noise: false,
            dedupe: false,
            ..Self::default()
        }
    }

    /// Set the size cap.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the number of sampling windows used above the size cap.
    pub fn with_sample_windows(mut self, windows: usize) -> Self {
        self.sample_windows = windows;
        self
    }

    /// Set how many occurrences of a repeated line survive.
    pub fn with_max_repeats(mut self, max_repeats: usize) -> Self {
        self.max_repeats = max_repeats;
        self
    }

    /// Repetition count at which a header key is removed, for `pages` pages.
    pub fn header_threshold(&self, pages: usize) -> usize {
        let ratio = if pages >= self.large_doc_pages {
            self.large_doc_ratio
        } else {
            self.small_doc_ratio
        };
        ((pages as f64 * ratio).ceil() as usize).max(self.min_repetitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_threshold() {
        let options = CleanupOptions::default();
        assert_eq!(options.header_threshold(10), 5);
        assert_eq!(options.header_threshold(11), 6);
        assert_eq!(options.header_threshold(5), 4);
        assert_eq!(options.header_threshold(1), 2);
        assert_eq!(options.header_threshold(0), 2);
    }

    #[test]
    fn test_minimal_disables_removal() {
        let options = CleanupOptions::minimal();
        assert!(!options.remove_toc_pages);
        assert!(!options.dedupe);
        assert_eq!(options.max_chars, 200_000);
    }

    #[test]
    fn test_partial_json() {
        let options: CleanupOptions =
            serde_json::from_str(r#"{"max_chars": 1000, "dedupe": false}"#).unwrap();
        assert_eq!(options.max_chars, 1000);
        assert!(!options.dedupe);
        assert_eq!(options.sample_windows, 5);
    }
}
