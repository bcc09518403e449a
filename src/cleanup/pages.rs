//! Page splitting, rehydration of collapsed pages and the degenerate-page
//! filter.

use std::sync::OnceLock;

use regex::Regex;

use crate::lang::{PatternSet, DIGIT};
use crate::parser::PAGE_BREAK;

use super::normalize::collapse_blank_runs;
use super::CleanupOptions;

fn numbered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(\s)({}{{1,3}})\s*([)\-–—])\s*", DIGIT)).unwrap())
}

fn dotted_leader() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\s+(\.{{3,}}\s*{}{{1,4}})", DIGIT)).unwrap())
}

fn number_before_title() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(\s)({}{{1,4}})(\s*\p{{L}})", DIGIT)).unwrap())
}

/// Split text on the page-break sentinel. Text without a sentinel is a
/// single page.
pub fn split_pages(text: &str) -> Vec<&str> {
    text.split(PAGE_BREAK).collect()
}

/// Trimmed, non-blank lines of a page.
pub fn non_blank_lines(page: &str) -> Vec<&str> {
    page.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Re-insert line breaks into a page the extractor collapsed into one or
/// two giant lines, so later line-based stages can see its structure.
pub fn rehydrate_page(page: &str, patterns: &PatternSet, options: &CleanupOptions) -> String {
    let trimmed = collapse_blank_runs(page).trim().to_string();
    if trimmed.is_empty() {
        return trimmed;
    }

    let line_count = non_blank_lines(&trimmed).len();
    if line_count >= options.structured_min_lines {
        return trimmed;
    }
    if line_count > options.rehydrate_max_lines
        || trimmed.chars().count() < options.rehydrate_min_len
    {
        return trimmed;
    }

    let s = patterns.structural_break.replace_all(&trimmed, "\n$1");
    let s = numbered_marker().replace_all(&s, "\n$2$3 ");
    let s = dotted_leader().replace_all(&s, "\n$1");
    let s = number_before_title().replace_all(&s, "\n$2$3");

    log::debug!(
        "Rehydrated collapsed page: {} -> {} lines",
        line_count,
        non_blank_lines(&s).len()
    );
    s.into_owned()
}

/// Rehydrate (when enabled), tidy and keep only pages long enough to carry
/// content.
pub fn prepare_pages(text: &str, patterns: &PatternSet, options: &CleanupOptions) -> Vec<String> {
    let raw_pages = split_pages(text);
    let total = raw_pages.len();

    let pages: Vec<String> = raw_pages
        .into_iter()
        .map(|p| {
            if options.rehydrate {
                rehydrate_page(p, patterns, options)
            } else {
                p.to_string()
            }
        })
        .map(|p| collapse_blank_runs(&p).trim().to_string())
        .filter(|p| p.chars().count() >= options.min_page_len)
        .collect();

    log::debug!(
        "Prepared {} of {} pages ({} degenerate)",
        pages.len(),
        total,
        total - pages.len()
    );
    pages
}
