//! Table-of-contents detection: whole TOC pages, and TOC-shaped runs of
//! lines that survive inside body pages.

use std::sync::OnceLock;

use regex::Regex;

use crate::lang::{PatternSet, DIGIT};

use super::pages::non_blank_lines;
use super::CleanupOptions;

fn dots() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{3,}").unwrap())
}

fn trailing_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"{}{{1,4}}\s*$", DIGIT)).unwrap())
}

fn dotted_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\.\.{{3,}}\s*{}{{1,4}}$", DIGIT)).unwrap())
}

fn titled_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^\p{{L}}.*\s+{}{{1,4}}$", DIGIT)).unwrap())
}

/// Whether a page is a table of contents.
///
/// Needs at least `toc_min_lines` lines, then any of: a TOC keyword,
/// `toc_dotted_min` dotted leaders, or (from `toc_ratio_min_lines` lines)
/// enough lines ending in a number that are also short.
pub fn is_toc_page(page: &str, patterns: &PatternSet, options: &CleanupOptions) -> bool {
    let lines = non_blank_lines(page);
    let n = lines.len();
    if n < options.toc_min_lines {
        return false;
    }

    if patterns.toc_keyword.is_match(page) {
        return true;
    }

    if dots().find_iter(page).count() >= options.toc_dotted_min {
        return true;
    }

    if n < options.toc_ratio_min_lines {
        return false;
    }
    let numbered = lines.iter().filter(|l| trailing_number().is_match(l)).count();
    let short = lines
        .iter()
        .filter(|l| l.chars().count() < options.toc_short_len)
        .count();

    numbered >= ratio_floor(n, options.toc_numbered_ratio)
        && short >= ratio_floor(n, options.toc_short_ratio)
}

fn ratio_floor(n: usize, ratio: f64) -> usize {
    (n as f64 * ratio).ceil() as usize
}

/// Whether a single line looks like a TOC entry.
pub fn is_toc_line(line: &str, patterns: &PatternSet, options: &CleanupOptions) -> bool {
    if line.is_empty() {
        return false;
    }
    dotted_entry().is_match(line)
        || patterns.toc_chapter_line.is_match(line)
        || (line.chars().count() < options.toc_short_len && titled_entry().is_match(line))
}

/// Remove TOC pages.
pub fn drop_toc_pages(
    pages: Vec<String>,
    patterns: &PatternSet,
    options: &CleanupOptions,
) -> Vec<String> {
    let before = pages.len();
    let kept: Vec<String> = pages
        .into_iter()
        .filter(|p| !is_toc_page(p, patterns, options))
        .collect();
    if kept.len() < before {
        log::debug!("Dropped {} table-of-contents pages", before - kept.len());
    }
    kept
}

/// State of the TOC streak scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakState {
    /// Lines are emitted; TOC-shaped lines build up the streak.
    Scanning,
    /// Lines are suppressed until a long non-TOC line shows up.
    Skipping,
}

/// Forward scanner that suppresses runs of TOC-shaped lines.
///
/// Transitions, evaluated once per line:
/// - the streak grows by one on a TOC line, otherwise shrinks by one
///   (never below zero);
/// - `Scanning -> Skipping` once the streak reaches `enter`;
/// - `Skipping -> Scanning` on a non-TOC line of at least `exit_len`
///   characters, which also resets the streak. That line is emitted.
///
/// A line is emitted when the state after its transition is `Scanning`.
#[derive(Debug, Clone)]
pub struct TocStreak {
    state: StreakState,
    streak: usize,
    enter: usize,
    exit_len: usize,
}

impl TocStreak {
    /// Create a scanner with explicit thresholds.
    pub fn new(enter: usize, exit_len: usize) -> Self {
        Self {
            state: StreakState::Scanning,
            streak: 0,
            enter,
            exit_len,
        }
    }

    /// Create a scanner from cleanup options.
    pub fn from_options(options: &CleanupOptions) -> Self {
        Self::new(options.streak_enter, options.streak_exit_len)
    }

    pub fn state(&self) -> StreakState {
        self.state
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    /// Feed one line; returns whether it should be kept.
    pub fn feed(&mut self, is_toc: bool, char_len: usize) -> bool {
        if is_toc {
            self.streak += 1;
        } else {
            self.streak = self.streak.saturating_sub(1);
        }

        if self.state == StreakState::Scanning && self.streak >= self.enter {
            log::debug!("TOC streak of {} lines: skipping", self.streak);
            self.state = StreakState::Skipping;
        }

        if self.state == StreakState::Skipping && !is_toc && char_len >= self.exit_len {
            log::debug!("TOC streak ended by a {}-char line", char_len);
            self.state = StreakState::Scanning;
            self.streak = 0;
        }

        self.state == StreakState::Scanning
    }
}

/// Drop TOC-shaped runs across the document. The streak carries over page
/// boundaries.
pub fn strip_toc_streaks(
    pages: Vec<Vec<String>>,
    patterns: &PatternSet,
    options: &CleanupOptions,
) -> Vec<Vec<String>> {
    let mut scanner = TocStreak::from_options(options);
    pages
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .filter(|l| scanner.feed(is_toc_line(l, patterns, options), l.chars().count()))
                .collect::<Vec<String>>()
        })
        .collect()
}
