//! Text cleanup: from reconstructed page text to clean, paged plain text.
//!
//! The stages run in a fixed order, each one a pure function over the
//! output of the previous one:
//!
//! 1. normalize whitespace and join hyphenated words
//! 2. split pages on the page-break sentinel
//! 3. rehydrate pages collapsed into one giant line
//! 4. drop degenerate pages
//! 5. drop table-of-contents pages
//! 6. drop running headers and footers
//! 7. drop isolated page numbers
//! 8. strip residual TOC streaks
//! 9. filter noise lines
//! 10. deduplicate repeated lines
//! 11. recompose
//! 12. cap the size with distributed sampling

mod filter;
mod headers;
mod normalize;
mod options;
mod pages;
mod sampling;
mod toc;

pub use filter::{dedupe, filter_noise, keep_line};
pub use headers::{is_isolated_page_number, strip_headers_and_page_numbers, HeaderFooterIndex};
pub use normalize::{collapse_blank_runs, line_key, normalize};
pub use options::CleanupOptions;
pub use pages::{non_blank_lines, prepare_pages, rehydrate_page, split_pages};
pub use sampling::{cap_length, Capped};
pub use toc::{drop_toc_pages, is_toc_line, is_toc_page, strip_toc_streaks, StreakState, TocStreak};

use serde::{Deserialize, Serialize};

use crate::lang::PatternSet;

/// Output of the cleanup stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedDocument {
    /// Surviving pages in document order, lines joined by `\n`
    pub pages: Vec<String>,
    /// Pages joined by a blank line, capped in size
    pub text: String,
    /// Whether `text` was reduced by sampling
    pub sampled: bool,
}

impl CleanedDocument {
    /// True when no page survived cleanup.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Runs the cleanup stages with one set of options and patterns.
pub struct CleanupPipeline<'a> {
    options: &'a CleanupOptions,
    patterns: &'a PatternSet,
}

impl<'a> CleanupPipeline<'a> {
    /// Create a new cleanup pipeline.
    pub fn new(options: &'a CleanupOptions, patterns: &'a PatternSet) -> Self {
        Self { options, patterns }
    }

    /// Clean raw page text (with or without page-break sentinels).
    pub fn clean(&self, raw: &str) -> CleanedDocument {
        if raw.is_empty() {
            return CleanedDocument::default();
        }

        let pages = self.clean_pages(raw);
        let joined = collapse_blank_runs(&pages.join("\n\n")).trim().to_string();
        let capped = cap_length(joined, self.options.max_chars, self.options.sample_windows);

        CleanedDocument {
            pages,
            text: capped.text,
            sampled: capped.sampled,
        }
    }

    /// Stages 1 to 10: the surviving pages, before recomposition and capping.
    pub fn clean_pages(&self, raw: &str) -> Vec<String> {
        let (options, patterns) = (self.options, self.patterns);

        let text = normalize(raw);
        let mut pages = prepare_pages(&text, patterns, options);
        if options.remove_toc_pages {
            pages = drop_toc_pages(pages, patterns, options);
        }

        let mut lines: Vec<Vec<String>> = pages
            .iter()
            .map(|p| non_blank_lines(p).into_iter().map(str::to_string).collect())
            .collect();

        lines = strip_headers_and_page_numbers(lines, patterns, options);
        if options.strip_toc_streaks {
            lines = strip_toc_streaks(lines, patterns, options);
        }
        if options.filter_noise {
            lines = filter_noise(lines, patterns, options);
        }
        if options.dedupe {
            lines = dedupe(lines, options.max_repeats);
        }

        let cleaned: Vec<String> = lines
            .into_iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.join("\n"))
            .collect();

        log::debug!(
            "Cleanup kept {} of {} prepared pages",
            cleaned.len(),
            pages.len()
        );
        cleaned
    }
}
