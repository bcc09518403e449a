//! Per-language keyword tables and the patterns compiled from them.
//!
//! Every heuristic that depends on vocabulary (TOC keywords, running header
//! labels, pedagogical markers, ...) reads it from a [`LanguageTable`]. The
//! tables are plain data; [`PatternSet::new`] turns the enabled tables into
//! regular expressions once per pipeline.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Digit class accepted wherever a page or section number is expected:
/// ASCII digits and Arabic-Indic digits.
pub const DIGIT: &str = r"[0-9\x{0660}-\x{0669}]";

/// Logical connectors that are not tied to a language.
const LOGIC_SYMBOLS: &[&str] = &["⇒", "->"];

/// Supported document languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    Arabic,
}

impl Language {
    /// All languages with a table.
    pub const ALL: [Language; 3] = [Language::English, Language::French, Language::Arabic];

    /// The keyword table for this language.
    pub fn table(self) -> &'static LanguageTable {
        match self {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
            Language::Arabic => &ARABIC,
        }
    }
}

/// Writing system of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Arabic,
}

impl Script {
    /// Whether lines in this script read right-to-left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Script::Arabic)
    }

    /// Whether `c` is a letter counted towards this script's density.
    pub fn is_letter(self, c: char) -> bool {
        match self {
            Script::Latin => c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c),
            Script::Arabic => ('\u{0600}'..='\u{06FF}').contains(&c),
        }
    }

    /// Whether `c` belongs to the script's blocks for direction detection.
    pub fn is_script_char(self, c: char) -> bool {
        match self {
            Script::Latin => c.is_ascii_alphabetic() || ('\u{C0}'..='\u{24F}').contains(&c),
            Script::Arabic => matches!(c,
                '\u{0600}'..='\u{06FF}'
                | '\u{0750}'..='\u{077F}'
                | '\u{08A0}'..='\u{08FF}'
                | '\u{FB50}'..='\u{FDFF}'
                | '\u{FE70}'..='\u{FEFF}'),
        }
    }
}

/// Vocabulary for one language.
///
/// Fields named `*_patterns` hold regex fragments; every other list holds
/// literal keywords that are escaped before use.
#[derive(Debug)]
pub struct LanguageTable {
    pub script: Script,
    /// Words that mark a whole page as a table of contents.
    pub toc_keywords: &'static [&'static str],
    /// Structural headers a collapsed page is re-split before.
    pub structural_markers: &'static [&'static str],
    /// Chapter-like words that start a TOC entry.
    pub chapter_keywords: &'static [&'static str],
    /// Labels preceding a bare page number ("page 12").
    pub page_label_patterns: &'static [&'static str],
    /// Labels preceding a legal article number.
    pub article_patterns: &'static [&'static str],
    /// Words that make a short line a heading.
    pub heading_keywords: &'static [&'static str],
    pub copyright_markers: &'static [&'static str],
    pub preface_markers: &'static [&'static str],
    pub biblio_markers: &'static [&'static str],
    /// Definitions, examples, rules, theorems...
    pub pedagogical_keywords: &'static [&'static str],
    /// Reasoning connectors ("if ... then").
    pub logic_patterns: &'static [&'static str],
    /// Legal or academic section words.
    pub academic_markers: &'static [&'static str],
}

pub static ENGLISH: LanguageTable = LanguageTable {
    script: Script::Latin,
    toc_keywords: &["contents", "table of contents"],
    structural_markers: &["part", "chapter", "contents", "table of contents"],
    chapter_keywords: &["chapter", "section"],
    page_label_patterns: &[r"page", r"p\.?"],
    article_patterns: &[r"article", r"art\."],
    heading_keywords: &["section", "lesson"],
    copyright_markers: &["all rights reserved", "copyright", "isbn", "edition"],
    preface_markers: &["acknowledg"],
    biblio_markers: &["references", "index"],
    pedagogical_keywords: &["definition", "example", "method", "steps", "rule", "theorem"],
    logic_patterns: &[r"if\s+.*then", r"therefore"],
    academic_markers: &["article", "section"],
};

pub static FRENCH: LanguageTable = LanguageTable {
    script: Script::Latin,
    toc_keywords: &["sommaire", "table des matières", "table des matieres"],
    structural_markers: &["partie", "chapitre", "sommaire"],
    chapter_keywords: &["chapitre", "section"],
    page_label_patterns: &[r"page", r"p\.?"],
    article_patterns: &[r"article", r"art\."],
    heading_keywords: &["chapitre", "section", "partie", "cours"],
    copyright_markers: &["éditeur", "imprim"],
    preface_markers: &["avant-propos", "préface", "remerciements", "dedicace"],
    biblio_markers: &["bibliographie", "références"],
    pedagogical_keywords: &[
        "définition",
        "on appelle",
        "on note",
        "propriété",
        "théorème",
        "remarque",
        "exemple",
        "méthode",
        "étapes",
        "résumé",
    ],
    logic_patterns: &[r"si\s+.*alors", r"donc", r"ainsi", r"par conséquent"],
    academic_markers: &["article", "chapitre", "section"],
};

pub static ARABIC: LanguageTable = LanguageTable {
    script: Script::Arabic,
    toc_keywords: &["فهرس", "المحتويات", "جدول المحتويات", "قائمة المحتويات"],
    structural_markers: &["الجزء", "الفصل", "الباب", "المبحث", "المطلب", "تمهيد", "مقدمة"],
    chapter_keywords: &["الفصل", "الباب", "المبحث", "المطلب"],
    page_label_patterns: &[r"ص", r"صفحة"],
    article_patterns: &[r"المادة", r"مادة"],
    heading_keywords: &[
        "الفصل", "القسم", "الباب", "المبحث", "المطلب", "تمهيد", "مقدمة",
    ],
    copyright_markers: &["حقوق الطبع", "جميع الحقوق محفوظة", "دار النشر"],
    preface_markers: &["مقدمة", "تمهيد", "شكر", "إهداء"],
    biblio_markers: &["المراجع", "فهرس", "قائمة المراجع"],
    pedagogical_keywords: &[
        "تعريف", "يعرف", "ملاحظة", "مثال", "قاعدة", "نظرية", "خاصية", "استنتاج", "خطوات",
        "ملخص", "شرح", "تفسير",
    ],
    logic_patterns: &[r"إذا.+فإن"],
    academic_markers: &["المادة", "الفصل", "المبحث", "المطلب"],
};

/// Patterns compiled from the enabled language tables.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub(crate) scripts: Vec<Script>,
    /// Rehydration: break before structural markers.
    pub(crate) structural_break: Regex,
    pub(crate) toc_keyword: Regex,
    pub(crate) toc_chapter_line: Regex,
    pub(crate) page_label: Regex,
    pub(crate) article_reference: Regex,
    pub(crate) heading_keyword: Regex,
    pub(crate) copyright: Regex,
    pub(crate) preface: Regex,
    pub(crate) biblio: Regex,
    /// One keyword matcher per enabled script.
    pub(crate) pedagogical: Vec<(Script, Regex)>,
    pub(crate) logic: Regex,
    pub(crate) academic: Regex,
}

impl PatternSet {
    /// Compile the patterns for the given languages.
    pub fn new(languages: &[Language]) -> Result<Self> {
        if languages.is_empty() {
            return Err(Error::Config("at least one language is required".into()));
        }

        let tables: Vec<&LanguageTable> = dedup(languages).into_iter().map(|l| l.table()).collect();
        let words = |pick: fn(&LanguageTable) -> &'static [&'static str]| -> String {
            keyword_alternation(tables.iter().flat_map(|t| pick(t).iter().copied()))
        };
        let fragments = |pick: fn(&LanguageTable) -> &'static [&'static str]| -> String {
            tables
                .iter()
                .flat_map(|t| pick(t).iter().copied())
                .collect::<Vec<_>>()
                .join("|")
        };

        let mut scripts: Vec<Script> = Vec::new();
        for table in &tables {
            if !scripts.contains(&table.script) {
                scripts.push(table.script);
            }
        }

        let mut pedagogical = Vec::new();
        for script in &scripts {
            let alternation = keyword_alternation(
                tables
                    .iter()
                    .filter(|t| t.script == *script)
                    .flat_map(|t| t.pedagogical_keywords.iter().copied()),
            );
            pedagogical.push((*script, Regex::new(&format!("(?i)({})", alternation))?));
        }

        let mut logic = fragments(|t| t.logic_patterns);
        for symbol in LOGIC_SYMBOLS {
            logic.push('|');
            logic.push_str(&regex::escape(symbol));
        }

        Ok(Self {
            scripts,
            structural_break: Regex::new(&format!(
                r"(?i)\s+({})\b",
                words(|t| t.structural_markers)
            ))?,
            toc_keyword: Regex::new(&format!("(?i)({})", words(|t| t.toc_keywords)))?,
            toc_chapter_line: Regex::new(&format!(
                r"(?i)({})\s+.*\s+{}{{1,4}}$",
                words(|t| t.chapter_keywords),
                DIGIT
            ))?,
            page_label: Regex::new(&format!(
                r"(?i)^(?:{})\s*{}{{1,4}}$",
                fragments(|t| t.page_label_patterns),
                DIGIT
            ))?,
            article_reference: Regex::new(&format!(
                r"(?i)(?:{})\s*\(?\s*{}{{1,4}}",
                fragments(|t| t.article_patterns),
                DIGIT
            ))?,
            heading_keyword: Regex::new(&format!("(?i)({})", words(|t| t.heading_keywords)))?,
            copyright: Regex::new(&format!("(?i)({})", words(|t| t.copyright_markers)))?,
            preface: Regex::new(&format!("(?i)({})", words(|t| t.preface_markers)))?,
            biblio: Regex::new(&format!("(?i)({})", words(|t| t.biblio_markers)))?,
            pedagogical,
            logic: Regex::new(&format!("(?i)({})", logic))?,
            academic: Regex::new(&format!("(?i)({})", words(|t| t.academic_markers)))?,
        })
    }

    /// Enabled scripts, in first-seen order.
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Count characters belonging to an enabled right-to-left script.
    pub fn count_rtl_chars(&self, s: &str) -> usize {
        let rtl: Vec<Script> = self.scripts.iter().copied().filter(|s| s.is_rtl()).collect();
        if rtl.is_empty() {
            return 0;
        }
        s.chars()
            .filter(|c| rtl.iter().any(|script| script.is_script_char(*c)))
            .count()
    }

    /// Count letters of any enabled script.
    pub fn count_letters(&self, s: &str) -> usize {
        s.chars()
            .filter(|c| self.scripts.iter().any(|script| script.is_letter(*c)))
            .count()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        // The built-in tables are constant; compiling them cannot fail.
        Self::new(&Language::ALL).expect("built-in language tables compile")
    }
}

fn dedup(languages: &[Language]) -> Vec<Language> {
    let mut out = Vec::with_capacity(languages.len());
    for lang in languages {
        if !out.contains(lang) {
            out.push(*lang);
        }
    }
    out
}

/// Escape keywords and join them longest first, so a longer phrase wins over
/// its own prefix inside the alternation.
fn keyword_alternation<'a>(keywords: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in keywords {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}
