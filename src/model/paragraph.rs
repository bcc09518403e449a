//! Scored paragraphs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A rule that fired while scoring a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// Shaped like a table-of-contents entry
    TocLike,
    /// Copyright, ISBN or publisher boilerplate
    CopyrightLike,
    /// Preface, acknowledgments, dedication
    PrefaceLike,
    /// Bibliography or index
    BiblioLike,
}

impl Flag {
    /// The flag's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::TocLike => "toc_like",
            Flag::CopyrightLike => "copyright_like",
            Flag::PrefaceLike => "preface_like",
            Flag::BiblioLike => "biblio_like",
        }
    }

    /// Whether the flag marks front matter (TOC, copyright, preface).
    pub fn is_front_matter(self) -> bool {
        matches!(self, Flag::TocLike | Flag::CopyrightLike | Flag::PrefaceLike)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paragraph of a cleaned page with its teachability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Stable id, `p<page>-<ordinal>` (e.g. `p03-02`)
    pub id: String,

    /// Page number (1-indexed, among cleaned pages)
    pub page: u32,

    /// Paragraph text, trimmed
    pub text: String,

    /// Teachability score
    pub score: i32,

    /// Rules that fired while scoring
    pub flags: BTreeSet<Flag>,
}

impl Paragraph {
    /// Create an unscored paragraph. `ordinal` is 1-based within the page.
    pub fn new(page: u32, ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            id: paragraph_id(page, ordinal),
            page,
            text: text.into().trim().to_string(),
            score: 0,
            flags: BTreeSet::new(),
        }
    }

    /// Check whether a flag fired.
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Whether any front-matter flag fired.
    pub fn is_front_matter_like(&self) -> bool {
        self.flags.iter().any(|f| f.is_front_matter())
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Format a paragraph id from its page and 1-based ordinal.
pub fn paragraph_id(page: u32, ordinal: u32) -> String {
    format!("p{:02}-{:02}", page, ordinal)
}
