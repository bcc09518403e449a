//! Teachability: segment cleaned pages into paragraphs, score them, cut the
//! front matter and select the most useful ones.

mod front_matter;
mod options;
mod score;
mod segment;
mod select;

pub use front_matter::{detect_front_matter, FrontMatterScan, ScanState};
pub use options::{ScoreWeights, TeachOptions};
pub use score::{mojibake_ratio, Scorer};
pub use segment::Segmenter;
pub use select::{normalize_key, select, selected_text, selection_key};

use std::collections::BTreeMap;

use crate::lang::PatternSet;
use crate::model::Paragraph;

/// Output of the teachability stage.
#[derive(Debug, Clone, Default)]
pub struct Teachability {
    /// Paragraphs after the front-matter cut, in document order
    pub paragraphs: Vec<Paragraph>,
    /// Paragraphs found before the cut
    pub total_paragraphs: usize,
    /// Selected paragraphs, in selection order
    pub selected: Vec<Paragraph>,
    /// Selected paragraphs joined under their header lines
    pub selected_text: String,
    /// Last page cut as front matter, 0 for none
    pub cut_front_matter_until_page: u32,
    /// Flag name to number of paragraphs carrying it, before the cut
    pub flags_count: BTreeMap<String, usize>,
}

/// Runs segmentation, scoring, the front-matter cut and selection.
pub struct TeachabilityAnalyzer<'a> {
    patterns: &'a PatternSet,
    options: &'a TeachOptions,
}

impl<'a> TeachabilityAnalyzer<'a> {
    pub fn new(patterns: &'a PatternSet, options: &'a TeachOptions) -> Self {
        Self { patterns, options }
    }

    /// Segment and score every page. Page numbers are 1-based positions in
    /// `pages`.
    pub fn paragraphs(&self, pages: &[String]) -> Vec<Paragraph> {
        let segmenter = Segmenter::new(self.patterns, self.options);
        let scorer = Scorer::new(self.patterns, &self.options.weights);

        let mut paragraphs = Vec::new();
        for (idx, page) in pages.iter().enumerate() {
            let page_num = idx as u32 + 1;
            for (j, text) in segmenter.segment(page).into_iter().enumerate() {
                let mut p = Paragraph::new(page_num, j as u32 + 1, text);
                let (score, flags) = scorer.score(&p.text);
                p.score = score;
                p.flags = flags;
                paragraphs.push(p);
            }
        }
        paragraphs
    }

    /// Run the whole stage over cleaned pages.
    pub fn analyze(&self, pages: &[String]) -> Teachability {
        let all = self.paragraphs(pages);
        let flags_count = count_flags(&all);
        let total_paragraphs = all.len();

        let cut = if self.options.cut_front_matter {
            detect_front_matter(&all, pages.len() as u32, self.options)
        } else {
            0
        };
        if cut > 0 {
            log::debug!("Cut front matter through page {}", cut);
        }

        let paragraphs: Vec<Paragraph> = all.into_iter().filter(|p| p.page > cut).collect();
        let selected = select(&paragraphs, self.options);
        let text = selected_text(&selected);

        log::debug!(
            "Teachability: {} paragraphs, {} after cut, {} selected",
            total_paragraphs,
            paragraphs.len(),
            selected.len()
        );

        Teachability {
            paragraphs,
            total_paragraphs,
            selected,
            selected_text: text,
            cut_front_matter_until_page: cut,
            flags_count,
        }
    }
}

fn count_flags(paragraphs: &[Paragraph]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for flag in paragraphs.iter().flat_map(|p| p.flags.iter()) {
        *counts.entry(flag.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}
