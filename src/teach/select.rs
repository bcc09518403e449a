//! Ranked, deduplicated selection of teachable paragraphs.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Paragraph;

use super::TeachOptions;

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap())
}

fn spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Case, punctuation and whitespace-insensitive form of a text.
pub fn normalize_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let letters = non_word().replace_all(&lowered, " ");
    spaces().replace_all(&letters, " ").trim().to_string()
}

/// Duplicate key of a paragraph: the first `key_len` characters of its
/// normalized text.
pub fn selection_key(text: &str, key_len: usize) -> String {
    normalize_key(text).chars().take(key_len).collect()
}

/// Pick the best paragraphs.
///
/// Candidates are ranked by score (stable, so ties keep document order).
/// Selection stops at `max_selected` picks or at the first score below
/// `min_score`. A candidate is skipped when its key was already picked, or
/// when it is shorter than `short_candidate_len` and has no colon.
pub fn select(paragraphs: &[Paragraph], options: &TeachOptions) -> Vec<Paragraph> {
    let mut ranked: Vec<&Paragraph> = paragraphs.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let mut picked: Vec<Paragraph> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for p in ranked {
        if picked.len() >= options.max_selected || p.score < options.min_score {
            break;
        }

        let key = selection_key(&p.text, options.key_len);
        if seen.contains(&key) {
            continue;
        }

        if p.char_len() < options.short_candidate_len && !p.text.contains([':', '،']) {
            continue;
        }

        seen.insert(key);
        picked.push(p.clone());
    }

    picked
}

/// Join selected paragraphs, each under a `[id | Page n]` header line.
pub fn selected_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|p| format!("[{} | Page {}]\n{}", p.id, p.page, p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(page: u32, ordinal: u32, score: i32, text: &str) -> Paragraph {
        let mut p = Paragraph::new(page, ordinal, text);
        p.score = score;
        p
    }

    const LONG_A: &str = "Supply and demand determine the equilibrium price in a competitive market economy.";
    const LONG_B: &str = "Elasticity measures how strongly the quantity demanded responds to a change in price.";

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Hello,   WORLD!  "), "hello world");
        assert_eq!(normalize_key("L'économie : ١٢"), "l économie ١٢");
    }

    #[test]
    fn test_ranked_by_score() {
        let paragraphs = vec![para(1, 1, 2, LONG_A), para(1, 2, 5, LONG_B)];
        let picked = select(&paragraphs, &TeachOptions::default());
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].id, "p01-02");
    }

    #[test]
    fn test_duplicate_prefix_selected_once() {
        let base = "x".repeat(100);
        let a = format!("{} first ending", base);
        let b = format!("{}!! second ending", base.to_uppercase());
        let paragraphs = vec![para(1, 1, 4, &a), para(2, 1, 3, &b)];
        let picked = select(&paragraphs, &TeachOptions::default());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].page, 1);
    }

    #[test]
    fn test_stops_below_min_score() {
        let paragraphs = vec![para(1, 1, 1, LONG_A), para(1, 2, 0, LONG_B)];
        let picked = select(&paragraphs, &TeachOptions::default());
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_short_candidates_need_colon() {
        let paragraphs = vec![
            para(1, 1, 5, "A short heading-like paragraph of text"),
            para(1, 2, 5, "Définition : un marché"),
            para(1, 3, 5, "تعريف السوق، مكان التبادل"),
        ];
        let picked = select(&paragraphs, &TeachOptions::default());
        let ids: Vec<&str> = picked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p01-02", "p01-03"]);
    }

    #[test]
    fn test_cap() {
        let paragraphs: Vec<Paragraph> = (1..=10)
            .map(|i| para(1, i, 3, &format!("Variant {}: {}", i, LONG_A)))
            .collect();
        let options = TeachOptions::default().with_max_selected(4);
        assert_eq!(select(&paragraphs, &options).len(), 4);
    }

    #[test]
    fn test_selected_text() {
        let paragraphs = vec![para(3, 2, 4, "First."), para(5, 1, 4, "Second.")];
        assert_eq!(
            selected_text(&paragraphs),
            "[p03-02 | Page 3]\nFirst.\n\n[p05-01 | Page 5]\nSecond."
        );
        assert_eq!(selected_text(&[]), "");
    }
}
