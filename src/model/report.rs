//! Document-level analysis result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Paragraph;

/// Everything the pipeline produces for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// Cleaned plain text (pages separated by a blank line, size-capped)
    pub cleaned_text: String,

    /// Selected paragraphs, each preceded by a `[id | Page n]` header line
    pub selected_text: String,

    /// Paragraphs that survived the front-matter cut, in document order
    pub paragraphs: Vec<Paragraph>,

    /// Selected paragraphs, in selection order
    pub selected_paragraphs: Vec<Paragraph>,

    /// Last page discarded as front matter (0 when nothing was cut)
    pub cut_front_matter_until_page: u32,

    /// How often each flag fired across all paragraphs
    pub flags_count: BTreeMap<String, usize>,

    /// Share of characters that look like decoding damage
    pub mojibake_ratio: f64,

    /// Processing statistics
    pub stats: ProcessingStats,
}

impl DocumentReport {
    /// First `max_chars` characters of the cleaned text.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.cleaned_text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.cleaned_text[..idx],
            None => &self.cleaned_text,
        }
    }

    /// True when paragraphs exist but none qualified for selection.
    pub fn nothing_selected(&self) -> bool {
        self.stats.paragraphs_count > 0 && self.selected_paragraphs.is_empty()
    }
}

/// Statistics collected while processing a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Characters of reconstructed text before cleanup
    pub raw_length: usize,

    /// Characters of cleaned text
    pub cleaned_length: usize,

    /// Pages seen in the source
    pub source_pages: usize,

    /// Pages left after cleanup
    pub cleaned_pages: usize,

    /// Paragraphs found before the front-matter cut
    pub paragraphs_count: usize,

    /// Paragraphs selected
    pub selected_count: usize,

    /// Whether the cleaned text was reduced by distributed sampling
    pub sampled: bool,
}
