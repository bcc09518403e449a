//! Token extraction and layout reconstruction.

mod layout;
mod options;
mod source;

pub use layout::{median_font_size, LayoutReconstructor, TextLine, PAGE_BREAK, PAGE_SEPARATOR};
pub use options::{ErrorMode, ExtractOptions, LayoutOptions};
pub use source::{decode_text_simple, extract_pages, is_pdf_bytes, LopdfSource, TokenSource};
