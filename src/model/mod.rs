//! Data model shared by the pipeline stages.
//!
//! Tokens come in from the extractor, paragraphs and the report go out.
//! Lines and pages in between are plain strings owned by the stage that
//! produces them.

mod paragraph;
mod report;
mod token;

pub use paragraph::{paragraph_id, Flag, Paragraph};
pub use report::{DocumentReport, ProcessingStats};
pub use token::Token;
