//! Running headers, footers and page numbers.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::lang::{PatternSet, DIGIT};

use super::normalize::line_key;
use super::CleanupOptions;

fn bare_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^{}{{1,4}}$", DIGIT)).unwrap())
}

/// Document-wide frequency of the lines found at page edges.
#[derive(Debug, Clone)]
pub struct HeaderFooterIndex {
    freq: HashMap<String, usize>,
    threshold: usize,
}

impl HeaderFooterIndex {
    /// Count, once per page, every normalized key among the first and last
    /// `edge_lines` lines of each page.
    pub fn build(pages: &[Vec<String>], options: &CleanupOptions) -> Self {
        let mut freq: HashMap<String, usize> = HashMap::new();

        for lines in pages {
            let head = lines.iter().take(options.edge_lines);
            let tail = lines.iter().skip(lines.len().saturating_sub(options.edge_lines));

            let unique: HashSet<String> = head
                .chain(tail)
                .map(|l| line_key(l))
                .filter(|k| {
                    let len = k.chars().count();
                    len >= options.header_key_min_len && len <= options.header_key_max_len
                })
                .collect();

            for key in unique {
                *freq.entry(key).or_insert(0) += 1;
            }
        }

        let threshold = options.header_threshold(pages.len().max(1));
        Self { freq, threshold }
    }

    /// Repetitions needed before a key counts as a header or footer.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// How many pages carry `line` at an edge.
    pub fn frequency(&self, line: &str) -> usize {
        self.freq.get(&line_key(line)).copied().unwrap_or(0)
    }

    /// Whether `line` repeats often enough to be a running header or footer.
    pub fn is_repeating(&self, line: &str) -> bool {
        self.frequency(line) >= self.threshold
    }

    /// Number of keys at or over the threshold.
    pub fn repeating_keys(&self) -> usize {
        self.freq.values().filter(|&&c| c >= self.threshold).count()
    }
}

/// Whether a line is nothing but a page number ("12", "Page 12", "p.12",
/// "ص 12"). Blank lines count as well.
pub fn is_isolated_page_number(line: &str, patterns: &PatternSet) -> bool {
    let s = line.trim();
    s.is_empty() || bare_number().is_match(s) || patterns.page_label.is_match(s)
}

/// Remove running headers/footers and isolated page numbers.
///
/// A repeating line is removed wherever it occurs on a page, not only at the
/// edges it was counted from.
pub fn strip_headers_and_page_numbers(
    pages: Vec<Vec<String>>,
    patterns: &PatternSet,
    options: &CleanupOptions,
) -> Vec<Vec<String>> {
    let index = options
        .remove_headers_footers
        .then(|| HeaderFooterIndex::build(&pages, options));

    if let Some(index) = &index {
        log::debug!(
            "Header/footer threshold {} over {} pages: {} repeating keys",
            index.threshold(),
            pages.len(),
            index.repeating_keys()
        );
    }

    pages
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .filter(|l| {
                    if options.remove_page_numbers && is_isolated_page_number(l, patterns) {
                        return false;
                    }
                    !index.as_ref().is_some_and(|idx| idx.is_repeating(l))
                })
                .collect::<Vec<String>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_isolated_page_numbers() {
        let patterns = PatternSet::default();
        for line in ["12", "Page 12", "p.12", "ص 12", "١٢", "  7  ", ""] {
            assert!(is_isolated_page_number(line, &patterns), "{:?}", line);
        }
        for line in ["Chapter 12", "12345", "12 apples"] {
            assert!(!is_isolated_page_number(line, &patterns), "{:?}", line);
        }
    }

    #[test]
    fn test_header_removed_from_all_occurrences() {
        let patterns = PatternSet::default();
        let options = CleanupOptions::default();

        let mut pages = Vec::new();
        for i in 0..10 {
            let mut lines = Vec::new();
            if i < 6 {
                lines.push("Course Title".to_string());
            }
            lines.push(format!("Body paragraph number {} explaining the lesson.", i));
            lines.push(format!("More explanations on the topic, part {}.", i));
            pages.push(lines);
        }

        let index = HeaderFooterIndex::build(&pages, &options);
        assert_eq!(index.threshold(), 5);
        assert_eq!(index.frequency("course   TITLE"), 6);

        let out = strip_headers_and_page_numbers(pages, &patterns, &options);
        assert!(out.iter().flatten().all(|l| l != "Course Title"));
        assert_eq!(out.iter().flatten().count(), 20);
    }

    #[test]
    fn test_repeating_line_removed_mid_page() {
        let patterns = PatternSet::default();
        let options = CleanupOptions::default();
        let mut pages = Vec::new();
        for _ in 0..3 {
            pages.push(page(&["Economics 101", "one", "two", "three", "four", "five", "six", "seven"]));
        }
        pages.push(page(&["a", "b", "c", "Economics 101", "d", "e", "f", "g"]));

        let out = strip_headers_and_page_numbers(pages, &patterns, &options);
        assert!(out.iter().flatten().all(|l| l != "Economics 101"));
    }

    #[test]
    fn test_single_page_keeps_edges() {
        let patterns = PatternSet::default();
        let options = CleanupOptions::default();
        let pages = vec![page(&["A first line of text", "middle", "A last line of text"])];
        let out = strip_headers_and_page_numbers(pages.clone(), &patterns, &options);
        assert_eq!(out, pages);
    }

    #[test]
    fn test_key_length_bounds() {
        let options = CleanupOptions::default();
        let pages: Vec<Vec<String>> = (0..4).map(|_| page(&["Short", "x".repeat(120).as_str()])).collect();
        let index = HeaderFooterIndex::build(&pages, &options);
        assert_eq!(index.frequency("Short"), 0);
        assert_eq!(index.frequency(&"x".repeat(120)), 0);
    }

    #[test]
    fn test_switches() {
        let patterns = PatternSet::default();
        let options = CleanupOptions {
            remove_page_numbers: false,
            remove_headers_footers: false,
            ..CleanupOptions::default()
        };
        let pages = vec![page(&["12", "Running head"]), page(&["13", "Running head"])];
        let out = strip_headers_and_page_numbers(pages.clone(), &patterns, &options);
        assert_eq!(out, pages);
    }
}
