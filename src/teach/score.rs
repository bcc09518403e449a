//! Paragraph scoring and the mojibake signal.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::lang::{PatternSet, DIGIT};
use crate::model::Flag;

use super::options::ScoreWeights;

fn dotted_toc_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\.\.{{3,}}\s*{}{{1,4}}\s*$", DIGIT)).unwrap())
}

fn trailing_page_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\s{}{{1,4}}\s*$", DIGIT)).unwrap())
}

fn list_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:-|•|\*|[0-9]{1,2}[).\-])\s+").unwrap())
}

/// Scores paragraphs on pedagogical signal and boilerplate penalties.
pub struct Scorer<'a> {
    patterns: &'a PatternSet,
    weights: &'a ScoreWeights,
}

impl<'a> Scorer<'a> {
    pub fn new(patterns: &'a PatternSet, weights: &'a ScoreWeights) -> Self {
        Self { patterns, weights }
    }

    /// Score a paragraph and report the penalty flags that fired.
    pub fn score(&self, text: &str) -> (i32, BTreeSet<Flag>) {
        let w = self.weights;
        let len = text.chars().count();
        let mut flags = BTreeSet::new();
        let mut score = 0;

        if len >= w.band_min_len && len <= w.band_max_len {
            score += w.band;
        } else if len < w.short_len {
            score += w.short;
        } else if len > w.long_len {
            score += w.long;
        }

        if self.looks_like_toc(text, len) {
            score += w.toc_like;
            flags.insert(Flag::TocLike);
        }
        if self.patterns.copyright.is_match(text) {
            score += w.copyright_like;
            flags.insert(Flag::CopyrightLike);
        }
        if self.patterns.preface.is_match(text) {
            score += w.preface_like;
            flags.insert(Flag::PrefaceLike);
        }
        if self.patterns.biblio.is_match(text) {
            score += w.biblio_like;
            flags.insert(Flag::BiblioLike);
        }

        if self.patterns.count_letters(text) < w.letter_floor {
            score += w.low_letters;
        }

        score += self.pedagogical_bonus(text, len);
        (score, flags)
    }

    fn looks_like_toc(&self, text: &str, len: usize) -> bool {
        dotted_toc_entry().is_match(text)
            || (len <= self.weights.toc_line_max_len && trailing_page_number().is_match(text))
    }

    /// Bonus from pedagogical keywords, reasoning connectors and explanatory
    /// structure.
    pub fn pedagogical_bonus(&self, text: &str, len: usize) -> i32 {
        let w = self.weights;
        let mut bonus = 0;

        // One bonus per script family, not per keyword.
        for (_, family) in &self.patterns.pedagogical {
            if family.is_match(text) {
                bonus += w.pedagogical;
            }
        }

        if self.patterns.logic.is_match(text) {
            bonus += w.logic;
        }
        if text.contains(':') && len > w.colon_min_len {
            bonus += w.colon;
        }
        if list_marker().is_match(text) {
            bonus += w.list;
        }
        if self.patterns.academic.is_match(text) && len > w.academic_min_len {
            bonus += w.academic;
        }
        bonus
    }
}

/// Share of characters that look like decoding damage: replacement
/// characters, box drawing, and the Latin-1 letters typical of mis-decoded
/// UTF-8.
pub fn mojibake_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut bad = 0usize;
    for c in text.chars() {
        total += 1;
        if is_mojibake_char(c) {
            bad += 1;
        }
    }
    bad as f64 / total.max(1) as f64
}

fn is_mojibake_char(c: char) -> bool {
    matches!(
        c,
        '\u{FFFD}'
            | 'Ï' | 'Ð' | 'Ñ' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ý' | 'Þ' | 'ß'
            | '│' | '┘' | '┐' | '┌' | '└' | '├' | '┤' | '┬' | '┴' | '┼'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> (i32, BTreeSet<Flag>) {
        let patterns = PatternSet::default();
        let weights = ScoreWeights::default();
        Scorer::new(&patterns, &weights).score(text)
    }

    const PLAIN: &str = "Markets bring together buyers and sellers who trade goods at prices they agree upon freely.";

    #[test]
    fn test_plain_paragraph() {
        assert!(PLAIN.chars().count() >= 90);
        let (s, flags) = score(PLAIN);
        assert_eq!(s, 2);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_pedagogical_keyword_scores_higher() {
        let with_keyword =
            "Definition bring together buyers and sellers who trade goods at prices they agree upon freely.";
        let (plain, _) = score(PLAIN);
        let (teaching, _) = score(with_keyword);
        assert!(teaching > plain);
        assert_eq!(teaching - plain, 3);
    }

    #[test]
    fn test_arabic_pedagogical_family() {
        let (s, _) = score("تعريف: السوق هو المكان الذي يلتقي فيه البائعون والمشترون لتبادل السلع والخدمات بالأسعار المختلفة");
        // band +2, Arabic family +3, colon (len > 80) +1
        assert_eq!(s, 6);
    }

    #[test]
    fn test_penalties_and_flags() {
        let (s, flags) = score("Copyright 2020 Harbor Press. All rights reserved. ISBN 978-3-16-148410-0");
        assert!(flags.contains(&Flag::CopyrightLike));
        assert!(s <= -6);

        let (_, flags) = score("Introduction to markets ........ 12");
        assert!(flags.contains(&Flag::TocLike));

        let (_, flags) = score("Acknowledgments go to my colleagues and students");
        assert!(flags.contains(&Flag::PrefaceLike));

        let (_, flags) = score("References and further reading for this course material");
        assert!(flags.contains(&Flag::BiblioLike));
    }

    #[test]
    fn test_low_letter_density() {
        let (s, _) = score("12 + 15 = 27 ; 3 x 4 = 12 ; 100 / 4 = 25 ; 7 - 2 = 5");
        // short (-2), toc shape (-6), few letters (-3), list marker (+1)
        assert_eq!(s, -10);
    }

    #[test]
    fn test_logic_and_structure_bonuses() {
        let text = "If the price rises then the quantity demanded falls; therefore the demand curve slopes down.";
        let (s, _) = score(text);
        assert_eq!(s, 2 + 2);
    }

    #[test]
    fn test_mojibake_ratio() {
        assert_eq!(mojibake_ratio(""), 0.0);
        assert_eq!(mojibake_ratio("clean text"), 0.0);
        assert_eq!(mojibake_ratio("ab\u{FFFD}│"), 0.5);
        assert_eq!(mojibake_ratio("ÃÐ"), 0.5);
    }
}
