//! Segmentation, scoring and selection thresholds.

use serde::{Deserialize, Serialize};

/// Options for the teachability stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeachOptions {
    /// Paragraphs shorter than this are discarded
    pub min_paragraph_len: usize,
    /// Headings are at most this long
    pub heading_max_len: usize,
    /// A next line shorter than this starts a new paragraph
    pub short_next_line: usize,

    /// Score rule weights
    pub weights: ScoreWeights,

    /// Drop leading front-matter pages
    pub cut_front_matter: bool,
    /// Pages inspected for front matter
    pub front_matter_max_pages: u32,
    /// A front-matter page has a mean score below this
    pub front_matter_mean: f64,
    /// ...and a share of TOC/copyright/preface paragraphs above this
    pub front_matter_ratio: f64,

    /// Maximum number of selected paragraphs
    pub max_selected: usize,
    /// Selection stops below this score
    pub min_score: i32,
    /// Characters of the normalized key compared for duplicates
    pub key_len: usize,
    /// Candidates shorter than this need a colon to be selected
    pub short_candidate_len: usize,
}

impl Default for TeachOptions {
    fn default() -> Self {
        Self {
            min_paragraph_len: 40,
            heading_max_len: 90,
            short_next_line: 40,
            weights: ScoreWeights::default(),
            cut_front_matter: true,
            front_matter_max_pages: 8,
            front_matter_mean: -1.0,
            front_matter_ratio: 0.35,
            max_selected: 120,
            min_score: 1,
            key_len: 90,
            short_candidate_len: 65,
        }
    }
}

impl TeachOptions {
    /// Create teach options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of selected paragraphs.
    pub fn with_max_selected(mut self, max: usize) -> Self {
        self.max_selected = max;
        self
    }

    /// Set the minimum score for selection.
    pub fn with_min_score(mut self, score: i32) -> Self {
        self.min_score = score;
        self
    }

    /// Enable or disable the front-matter cut.
    pub fn with_front_matter_cut(mut self, enabled: bool) -> Self {
        self.cut_front_matter = enabled;
        self
    }
}

/// Additive score rules. Penalties are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub band_min_len: usize,
    pub band_max_len: usize,
    pub band: i32,
    pub short_len: usize,
    pub short: i32,
    pub long_len: usize,
    pub long: i32,

    pub toc_like: i32,
    /// TOC shape by trailing number only applies up to this length
    pub toc_line_max_len: usize,
    pub copyright_like: i32,
    pub preface_like: i32,
    pub biblio_like: i32,

    /// Fewer letters than this is low content
    pub letter_floor: usize,
    pub low_letters: i32,

    /// Per script whose pedagogical keywords match
    pub pedagogical: i32,
    pub logic: i32,
    pub colon: i32,
    pub colon_min_len: usize,
    pub list: i32,
    pub academic: i32,
    pub academic_min_len: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            band_min_len: 90,
            band_max_len: 900,
            band: 2,
            short_len: 60,
            short: -2,
            long_len: 1500,
            long: -1,
            toc_like: -6,
            toc_line_max_len: 90,
            copyright_like: -6,
            preface_like: -4,
            biblio_like: -4,
            letter_floor: 20,
            low_letters: -3,
            pedagogical: 3,
            logic: 2,
            colon: 1,
            colon_min_len: 80,
            list: 1,
            academic: 1,
            academic_min_len: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TeachOptions::default();
        assert_eq!(options.max_selected, 120);
        assert_eq!(options.weights.toc_like, -6);
        assert_eq!(options.front_matter_max_pages, 8);
    }

    #[test]
    fn test_nested_partial_json() {
        let options: TeachOptions =
            serde_json::from_str(r#"{"max_selected": 10, "weights": {"pedagogical": 5}}"#).unwrap();
        assert_eq!(options.max_selected, 10);
        assert_eq!(options.weights.pedagogical, 5);
        assert_eq!(options.weights.logic, 2);
        assert_eq!(options.min_paragraph_len, 40);
    }
}
