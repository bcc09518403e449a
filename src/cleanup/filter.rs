//! Line-level noise filter and controlled deduplication.

use std::collections::HashMap;

use crate::lang::PatternSet;

use super::normalize::line_key;
use super::CleanupOptions;

/// Whether a line carries enough content to keep.
///
/// Long lines always pass. A short line passes when it cites a legal article
/// or holds at least `heavy_token_min` words of `heavy_token_len` characters.
pub fn keep_line(line: &str, patterns: &PatternSet, options: &CleanupOptions) -> bool {
    if line.is_empty() {
        return false;
    }
    if line.chars().count() >= options.short_line_len {
        return true;
    }
    if patterns.article_reference.is_match(line) {
        return true;
    }
    line.split_whitespace()
        .filter(|t| t.chars().count() >= options.heavy_token_len)
        .count()
        >= options.heavy_token_min
}

/// Apply [`keep_line`] to every page.
pub fn filter_noise(
    pages: Vec<Vec<String>>,
    patterns: &PatternSet,
    options: &CleanupOptions,
) -> Vec<Vec<String>> {
    pages
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .filter(|l| keep_line(l, patterns, options))
                .collect::<Vec<String>>()
        })
        .collect()
}

/// Keep at most `max_repeats` occurrences of each line key, counted over the
/// whole document in reading order.
pub fn dedupe(pages: Vec<Vec<String>>, max_repeats: usize) -> Vec<Vec<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    let out: Vec<Vec<String>> = pages
        .into_iter()
        .map(|lines| {
            lines
                .into_iter()
                .filter(|l| {
                    let count = seen.entry(line_key(l)).or_insert(0);
                    *count += 1;
                    let keep = *count <= max_repeats;
                    if !keep {
                        dropped += 1;
                    }
                    keep
                })
                .collect::<Vec<String>>()
        })
        .collect();

    if dropped > 0 {
        log::debug!("Dedupe dropped {} repeated lines", dropped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_line() {
        let patterns = PatternSet::default();
        let options = CleanupOptions::default();
        assert!(keep_line("A long enough line of text", &patterns, &options));
        assert!(keep_line("Article 12", &patterns, &options));
        assert!(keep_line("art. 5", &patterns, &options));
        assert!(keep_line("المادة (3)", &patterns, &options));
        assert!(keep_line("Prix unitaire", &patterns, &options));
        assert!(!keep_line("Fig. 3", &patterns, &options));
        assert!(!keep_line("a b c d e f", &patterns, &options));
        assert!(!keep_line("", &patterns, &options));
    }

    #[test]
    fn test_dedupe_keeps_two() {
        let line = "Remember to review this section".to_string();
        let pages = vec![
            vec![line.clone(), line.clone(), "other".to_string()],
            vec![line.clone()],
            vec![line.clone(), line.to_uppercase()],
        ];
        let out = dedupe(pages, 2);
        assert_eq!(out[0], vec![line.clone(), line.clone(), "other".to_string()]);
        assert!(out[1].is_empty());
        assert!(out[2].is_empty());
    }

    #[test]
    fn test_dedupe_cap_configurable() {
        let pages = vec![vec!["x".to_string(); 4]];
        assert_eq!(dedupe(pages.clone(), 1)[0].len(), 1);
        assert_eq!(dedupe(pages, 3)[0].len(), 3);
    }
}
