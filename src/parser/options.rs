//! Extraction and layout reconstruction options.

use serde::{Deserialize, Serialize};

/// Options for pulling tokens out of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Error handling mode for per-page extraction failures
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole document when a page cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Treat unreadable pages as empty and continue.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// Error handling mode during token extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Skip unreadable pages and continue
    #[default]
    Lenient,
}

/// Thresholds for turning positioned tokens into lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Vertical tolerance as a fraction of the median font size
    pub y_tolerance_factor: f32,

    /// Lower bound of the vertical tolerance, in points
    pub min_y_tolerance: f32,

    /// Paragraph gap as a multiple of the median font size
    pub gap_factor: f32,

    /// Lower bound of the paragraph gap, in points
    pub min_gap: f32,

    /// Gap used when no font size is known
    pub fallback_gap: f32,

    /// Minimum right-to-left characters before a line is read RTL
    pub rtl_min_chars: usize,

    /// Minimum share of right-to-left characters before a line is read RTL
    pub rtl_ratio: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            y_tolerance_factor: 0.6,
            min_y_tolerance: 2.0,
            gap_factor: 1.6,
            min_gap: 10.0,
            fallback_gap: 16.0,
            rtl_min_chars: 6,
            rtl_ratio: 0.25,
        }
    }
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical tolerance factor.
    pub fn with_y_tolerance_factor(mut self, factor: f32) -> Self {
        self.y_tolerance_factor = factor;
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_gap_factor(mut self, factor: f32) -> Self {
        self.gap_factor = factor;
        self
    }
}
