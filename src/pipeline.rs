//! End-to-end pipeline: tokens to raw text, raw text to cleaned pages,
//! cleaned pages to a [`DocumentReport`].

use std::path::Path;

use rayon::prelude::*;

use crate::cleanup::{CleanedDocument, CleanupPipeline};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::lang::PatternSet;
use crate::model::{DocumentReport, ProcessingStats, Token};
use crate::parser::{extract_pages, LayoutReconstructor, LopdfSource, TokenSource, PAGE_BREAK};
use crate::teach::{mojibake_ratio, TeachabilityAnalyzer};

/// A configured pipeline. Patterns are compiled once in [`Pipeline::new`]
/// and shared by every document the pipeline processes.
///
/// # Example
///
/// ```no_run
/// use teachpdf::{Pipeline, PipelineConfig};
///
/// let pipeline = Pipeline::new(PipelineConfig::default())?;
/// let report = pipeline.analyze_file("course.pdf")?;
/// println!("{}", report.selected_text);
/// # Ok::<(), teachpdf::Error>(())
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    patterns: PatternSet,
}

impl Pipeline {
    /// Validate the configuration and compile the language patterns.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let patterns = PatternSet::new(&config.languages)?;
        Ok(Self { config, patterns })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Extract and reconstruct every page of a source into raw text with
    /// page-break sentinels.
    pub fn reconstruct<S: TokenSource + ?Sized>(&self, source: &S) -> Result<String> {
        let pages = extract_pages(source, &self.config.extract)?;
        Ok(self.reconstruct_pages(&pages))
    }

    /// Reconstruct already-extracted token pages.
    pub fn reconstruct_pages(&self, pages: &[Vec<Token>]) -> String {
        LayoutReconstructor::new(&self.config.layout, &self.patterns).reconstruct_document(pages)
    }

    /// Clean raw text. Fails with [`Error::Unreadable`] when there is no text
    /// or every page is discarded.
    pub fn clean(&self, raw: &str) -> Result<CleanedDocument> {
        if is_blank(raw) {
            return Err(Error::Unreadable);
        }
        let cleaned = CleanupPipeline::new(&self.config.cleanup, &self.patterns).clean(raw);
        if cleaned.is_empty() {
            log::warn!("Every page was discarded during cleanup");
            return Err(Error::Unreadable);
        }
        Ok(cleaned)
    }

    /// Clean raw text and run the teachability stage over it.
    pub fn analyze_text(&self, raw: &str) -> Result<DocumentReport> {
        self.build_report(raw, count_source_pages(raw))
    }

    /// Analyze any token source.
    pub fn analyze_source<S: TokenSource + ?Sized>(&self, source: &S) -> Result<DocumentReport> {
        let raw = self.reconstruct(source)?;
        self.build_report(&raw, source.page_count() as usize)
    }

    /// Analyze a PDF file.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentReport> {
        let path = path.as_ref();
        log::debug!("Analyzing {}", path.display());
        let source = LopdfSource::load_file(path)?;
        self.analyze_source(&source)
    }

    /// Analyze a PDF held in memory.
    pub fn analyze_bytes(&self, data: &[u8]) -> Result<DocumentReport> {
        let source = LopdfSource::load_bytes(data)?;
        self.analyze_source(&source)
    }

    /// Analyze independent files in parallel. Results keep input order.
    pub fn analyze_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<Result<DocumentReport>> {
        self.analyze_batch_with(paths, |_| {})
    }

    /// Like [`Pipeline::analyze_batch`], calling `on_done` with each input
    /// path as soon as that document is finished.
    pub fn analyze_batch_with<P, F>(&self, paths: &[P], on_done: F) -> Vec<Result<DocumentReport>>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&Path) + Sync,
    {
        paths
            .par_iter()
            .map(|path| {
                let result = self.analyze_file(path);
                if let Err(e) = &result {
                    log::warn!("{}: {}", path.as_ref().display(), e);
                }
                on_done(path.as_ref());
                result
            })
            .collect()
    }

    fn build_report(&self, raw: &str, source_pages: usize) -> Result<DocumentReport> {
        let cleaned = self.clean(raw)?;
        let teach = TeachabilityAnalyzer::new(&self.patterns, &self.config.teach).analyze(&cleaned.pages);

        let stats = ProcessingStats {
            raw_length: raw.chars().count(),
            cleaned_length: cleaned.text.chars().count(),
            source_pages,
            cleaned_pages: cleaned.page_count(),
            paragraphs_count: teach.total_paragraphs,
            selected_count: teach.selected.len(),
            sampled: cleaned.sampled,
        };
        log::debug!(
            "Report: {} of {} pages kept, {} of {} paragraphs selected",
            stats.cleaned_pages,
            stats.source_pages,
            stats.selected_count,
            stats.paragraphs_count
        );

        Ok(DocumentReport {
            mojibake_ratio: mojibake_ratio(&cleaned.text),
            cleaned_text: cleaned.text,
            selected_text: teach.selected_text,
            paragraphs: teach.paragraphs,
            selected_paragraphs: teach.selected,
            cut_front_matter_until_page: teach.cut_front_matter_until_page,
            flags_count: teach.flags_count,
            stats,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            patterns: PatternSet::default(),
        }
    }
}

fn is_blank(raw: &str) -> bool {
    raw.split(PAGE_BREAK).all(|piece| piece.trim().is_empty())
}

/// Pages in raw text: one per sentinel, plus trailing text after the last
/// one. Text without sentinels is a single page.
fn count_source_pages(raw: &str) -> usize {
    let pieces: Vec<&str> = raw.split(PAGE_BREAK).collect();
    let breaks = pieces.len() - 1;
    match pieces.last() {
        Some(tail) if !tail.trim().is_empty() => breaks + 1,
        _ => breaks.max(1),
    }
}
