//! Error types for the teachpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for teachpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a PDF into teachable text.
///
/// Only document-level conditions are errors. Individual lines or tokens
/// that fail a heuristic are simply filtered, never reported.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting positioned text tokens from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The document yielded no usable text: either nothing was extracted
    /// or every page was discarded as degenerate during cleanup.
    #[error("Document is empty or unreadable")]
    Unreadable,

    /// Invalid pipeline configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A language table produced an invalid pattern.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Stable machine-readable code for callers that report errors upstream.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::UnknownFormat => "NOT_A_PDF",
            Error::PdfParse(_) => "PDF_PARSE_FAILED",
            Error::Encrypted => "PDF_ENCRYPTED",
            Error::PageOutOfRange(_, _) => "PAGE_OUT_OF_RANGE",
            Error::TextExtract(_) => "TEXT_EXTRACT_FAILED",
            Error::Unreadable => "PDF_EMPTY_OR_UNREADABLE",
            Error::Config(_) => "INVALID_CONFIG",
            Error::Pattern(_) => "INVALID_PATTERN",
            Error::Render(_) => "RENDER_FAILED",
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unreadable;
        assert_eq!(err.to_string(), "Document is empty or unreadable");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Unreadable.code(), "PDF_EMPTY_OR_UNREADABLE");
        assert_eq!(Error::UnknownFormat.code(), "NOT_A_PDF");
        assert_eq!(Error::Config("x".into()).code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_becomes_config_error() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
