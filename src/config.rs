//! Pipeline configuration.
//!
//! Every threshold of every stage lives here, so a deployment can tune the
//! heuristics from a JSON file without touching the algorithms. Missing
//! fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cleanup::CleanupOptions;
use crate::error::{Error, Result};
use crate::lang::Language;
use crate::parser::{ExtractOptions, LayoutOptions};
use crate::teach::TeachOptions;

/// Configuration of the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Token extraction
    pub extract: ExtractOptions,
    /// Layout reconstruction
    pub layout: LayoutOptions,
    /// Text cleanup
    pub cleanup: CleanupOptions,
    /// Segmentation, scoring and selection
    pub teach: TeachOptions,
    /// Languages whose keyword tables are enabled
    pub languages: Vec<Language>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            layout: LayoutOptions::default(),
            cleanup: CleanupOptions::default(),
            teach: TeachOptions::default(),
            languages: Language::ALL.to_vec(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Render(e.to_string()))
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(Error::Config("at least one language is required".into()));
        }

        let layout = &self.layout;
        for (name, value) in [
            ("layout.y_tolerance_factor", layout.y_tolerance_factor),
            ("layout.gap_factor", layout.gap_factor),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(Error::Config(format!("{} must be positive", name)));
            }
        }
        check_ratio("layout.rtl_ratio", layout.rtl_ratio as f64)?;

        let cleanup = &self.cleanup;
        if cleanup.sample_windows == 0 {
            return Err(Error::Config("cleanup.sample_windows must be at least 1".into()));
        }
        if cleanup.max_chars < cleanup.sample_windows {
            return Err(Error::Config(
                "cleanup.max_chars must be at least cleanup.sample_windows".into(),
            ));
        }
        if cleanup.max_repeats == 0 {
            return Err(Error::Config("cleanup.max_repeats must be at least 1".into()));
        }
        if cleanup.header_key_min_len > cleanup.header_key_max_len {
            return Err(Error::Config(
                "cleanup.header_key_min_len exceeds header_key_max_len".into(),
            ));
        }
        check_ratio("cleanup.toc_numbered_ratio", cleanup.toc_numbered_ratio)?;
        check_ratio("cleanup.toc_short_ratio", cleanup.toc_short_ratio)?;
        check_ratio("cleanup.large_doc_ratio", cleanup.large_doc_ratio)?;
        check_ratio("cleanup.small_doc_ratio", cleanup.small_doc_ratio)?;

        let teach = &self.teach;
        check_ratio("teach.front_matter_ratio", teach.front_matter_ratio)?;
        if teach.key_len == 0 {
            return Err(Error::Config("teach.key_len must be at least 1".into()));
        }
        if teach.weights.band_min_len > teach.weights.band_max_len {
            return Err(Error::Config(
                "teach.weights.band_min_len exceeds band_max_len".into(),
            ));
        }

        Ok(())
    }

    /// Set the extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set the teachability options.
    pub fn with_teach(mut self, teach: TeachOptions) -> Self {
        self.teach = teach;
        self
    }

    /// Restrict the enabled languages.
    pub fn with_languages(mut self, languages: &[Language]) -> Self {
        self.languages = languages.to_vec();
        self
    }
}

fn check_ratio(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be within 0..=1, got {}", name, value)))
    }
}
