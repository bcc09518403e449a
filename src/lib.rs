//! # teachpdf
//!
//! Turns course PDFs into clean, teachable text.
//!
//! The library reconstructs reading order from positioned text tokens,
//! strips the noise PDFs carry (tables of contents, running headers, page
//! numbers, repeated boilerplate), then segments the cleaned text into
//! paragraphs and ranks them by pedagogical value. French, English and
//! Arabic are supported out of the box.
//!
//! ## Quick Start
//!
//! ```no_run
//! use teachpdf::{analyze_file, render};
//!
//! fn main() -> teachpdf::Result<()> {
//!     let report = analyze_file("course.pdf")?;
//!
//!     println!("{}", render::summary(&report));
//!     println!("{}", report.selected_text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Extraction**: [`parser::LopdfSource`] (or any [`TokenSource`])
//!    yields positioned tokens per page
//! 2. **Layout**: [`parser::LayoutReconstructor`] groups tokens into lines
//!    and pages
//! 3. **Cleanup**: [`cleanup::CleanupPipeline`] removes structural noise
//! 4. **Teachability**: [`teach::TeachabilityAnalyzer`] segments, scores and
//!    selects paragraphs
//!
//! Every threshold is configurable through [`PipelineConfig`].

pub mod cleanup;
pub mod config;
pub mod error;
pub mod lang;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod teach;

// Re-export commonly used types
pub use cleanup::{CleanedDocument, CleanupOptions};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use lang::{Language, PatternSet};
pub use model::{DocumentReport, Flag, Paragraph, ProcessingStats, Token};
pub use parser::{ErrorMode, ExtractOptions, LayoutOptions, LopdfSource, TokenSource};
pub use pipeline::Pipeline;
pub use render::{JsonFormat, TextView};
pub use teach::TeachOptions;

use std::path::Path;

/// Analyze a PDF file with the default configuration.
///
/// # Example
///
/// ```no_run
/// use teachpdf::analyze_file;
///
/// let report = analyze_file("course.pdf").unwrap();
/// println!("Selected {} paragraphs", report.stats.selected_count);
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<DocumentReport> {
    Pipeline::default().analyze_file(path)
}

/// Analyze a PDF held in memory with the default configuration.
///
/// # Example
///
/// ```no_run
/// use teachpdf::analyze_bytes;
///
/// let data = std::fs::read("course.pdf").unwrap();
/// let report = analyze_bytes(&data).unwrap();
/// ```
pub fn analyze_bytes(data: &[u8]) -> Result<DocumentReport> {
    Pipeline::default().analyze_bytes(data)
}

/// Clean already-extracted text with the default configuration and return
/// the cleaned text.
///
/// Pages may be separated by [`parser::PAGE_BREAK`]; text without it is
/// treated as a single page.
pub fn clean_text(raw: &str) -> Result<String> {
    Ok(Pipeline::default().clean(raw)?.text)
}

/// Builder for a configured [`Pipeline`].
///
/// # Example
///
/// ```no_run
/// use teachpdf::{Language, Teachpdf};
///
/// let report = Teachpdf::new()
///     .with_languages(&[Language::French, Language::Arabic])
///     .with_max_selected(40)
///     .strict()
///     .analyze_file("cours.pdf")?;
/// # Ok::<(), teachpdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Teachpdf {
    config: PipelineConfig,
}

impl Teachpdf {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Treat empty or unreadable pages as empty (default).
    pub fn lenient(mut self) -> Self {
        self.config.extract = self.config.extract.lenient();
        self
    }

    /// Fail on the first page whose tokens cannot be extracted.
    pub fn strict(mut self) -> Self {
        self.config.extract = self.config.extract.strict();
        self
    }

    /// Restrict the enabled language tables.
    pub fn with_languages(mut self, languages: &[Language]) -> Self {
        self.config.languages = languages.to_vec();
        self
    }

    /// Set the cleaned-text size cap.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.config.cleanup = self.config.cleanup.with_max_chars(max_chars);
        self
    }

    /// Set the maximum number of selected paragraphs.
    pub fn with_max_selected(mut self, max: usize) -> Self {
        self.config.teach = self.config.teach.with_max_selected(max);
        self
    }

    /// Keep front-matter pages in the paragraph list.
    pub fn keep_front_matter(mut self) -> Self {
        self.config.teach = self.config.teach.with_front_matter_cut(false);
        self
    }

    /// Skip cleanup stages, keeping only normalization and the size cap.
    pub fn minimal_cleanup(mut self) -> Self {
        let max_chars = self.config.cleanup.max_chars;
        self.config.cleanup = CleanupOptions::minimal().with_max_chars(max_chars);
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.config)
    }

    /// Build and analyze a PDF file.
    pub fn analyze_file<P: AsRef<Path>>(self, path: P) -> Result<DocumentReport> {
        self.build()?.analyze_file(path)
    }

    /// Build and analyze a PDF from bytes.
    pub fn analyze_bytes(self, data: &[u8]) -> Result<DocumentReport> {
        self.build()?.analyze_bytes(data)
    }

    /// Build and analyze already-extracted text.
    pub fn analyze_text(self, raw: &str) -> Result<DocumentReport> {
        self.build()?.analyze_text(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_options() {
        let pipeline = Teachpdf::new()
            .strict()
            .with_languages(&[Language::English])
            .with_max_chars(1000)
            .with_max_selected(5)
            .keep_front_matter()
            .build()
            .unwrap();

        let config = pipeline.config();
        assert_eq!(config.extract.error_mode, ErrorMode::Strict);
        assert_eq!(config.languages, vec![Language::English]);
        assert_eq!(config.cleanup.max_chars, 1000);
        assert_eq!(config.teach.max_selected, 5);
        assert!(!config.teach.cut_front_matter);
    }

    #[test]
    fn test_minimal_cleanup_keeps_cap() {
        let pipeline = Teachpdf::new().with_max_chars(500).minimal_cleanup().build().unwrap();
        assert_eq!(pipeline.config().cleanup.max_chars, 500);
        assert!(!pipeline.config().cleanup.dedupe);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        assert!(matches!(
            Teachpdf::new().with_languages(&[]).build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_clean_text() {
        let text = clean_text("Economics is the study of how societies use scarce resources.").unwrap();
        assert_eq!(text, "Economics is the study of how societies use scarce resources.");
        assert!(matches!(clean_text("  "), Err(Error::Unreadable)));
    }

    #[test]
    fn test_analyze_bytes_rejects_non_pdf() {
        assert!(matches!(analyze_bytes(b"hello"), Err(Error::UnknownFormat)));
    }
}
