//! Detection of leading front-matter pages.

use crate::model::Paragraph;

use super::TeachOptions;

/// State of the front-matter scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Still inside what may be front matter.
    Scanning,
    /// A body page (or the page limit) was reached; the cut is final.
    Done,
}

/// Forward scan over the first pages of a document.
///
/// Transitions, evaluated once per page in order:
/// - past `max_pages`: `Scanning -> Done`;
/// - a page with no paragraphs is skipped;
/// - a page whose mean score is below `mean_threshold` and whose share of
///   front-matter-flagged paragraphs is above `ratio_threshold` moves the cut
///   to that page;
/// - any other page: `Scanning -> Done`.
#[derive(Debug, Clone)]
pub struct FrontMatterScan {
    state: ScanState,
    cut_until: u32,
    max_pages: u32,
    mean_threshold: f64,
    ratio_threshold: f64,
}

impl FrontMatterScan {
    pub fn new(max_pages: u32, mean_threshold: f64, ratio_threshold: f64) -> Self {
        Self {
            state: ScanState::Scanning,
            cut_until: 0,
            max_pages,
            mean_threshold,
            ratio_threshold,
        }
    }

    pub fn from_options(options: &TeachOptions) -> Self {
        Self::new(
            options.front_matter_max_pages,
            options.front_matter_mean,
            options.front_matter_ratio,
        )
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Last page judged front matter, 0 for none.
    pub fn cut_until(&self) -> u32 {
        self.cut_until
    }

    /// Feed the paragraphs of one page.
    pub fn feed(&mut self, page: u32, paragraphs: &[&Paragraph]) -> ScanState {
        if self.state == ScanState::Done {
            return self.state;
        }
        if page > self.max_pages {
            self.state = ScanState::Done;
            return self.state;
        }
        if paragraphs.is_empty() {
            return self.state;
        }

        let n = paragraphs.len() as f64;
        let mean = paragraphs.iter().map(|p| p.score as f64).sum::<f64>() / n;
        let flagged = paragraphs.iter().filter(|p| p.is_front_matter_like()).count() as f64;

        if mean < self.mean_threshold && flagged / n > self.ratio_threshold {
            log::debug!(
                "Page {} is front matter (mean score {:.2}, flagged {:.0}%)",
                page,
                mean,
                flagged / n * 100.0
            );
            self.cut_until = page;
        } else {
            self.state = ScanState::Done;
        }
        self.state
    }
}

/// Last front-matter page among `page_count` pages, 0 for none.
pub fn detect_front_matter(paragraphs: &[Paragraph], page_count: u32, options: &TeachOptions) -> u32 {
    let mut scan = FrontMatterScan::from_options(options);
    for page in 1..=page_count.min(options.front_matter_max_pages) {
        let on_page: Vec<&Paragraph> = paragraphs.iter().filter(|p| p.page == page).collect();
        if scan.feed(page, &on_page) == ScanState::Done {
            break;
        }
    }
    scan.cut_until()
}
