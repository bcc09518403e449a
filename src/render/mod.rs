//! Rendering of document reports to output formats.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{summary, to_text, TextView};
