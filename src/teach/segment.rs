//! Paragraph segmentation of a cleaned page.

use std::sync::OnceLock;

use regex::Regex;

use crate::lang::{PatternSet, DIGIT};

use super::TeachOptions;

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?؟]$").unwrap())
}

fn terminal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?؟:]$").unwrap())
}

fn numbered_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^{}{{1,3}}\s*[).\-–—]", DIGIT)).unwrap())
}

fn list_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?:-|•|\*|[0-9]{{1,2}}[).\-]|[IVX]+\.|{}{{1,2}}[).\-])\s+",
            DIGIT
        ))
        .unwrap()
    })
}

/// Splits page text into paragraphs.
pub struct Segmenter<'a> {
    patterns: &'a PatternSet,
    options: &'a TeachOptions,
}

impl<'a> Segmenter<'a> {
    pub fn new(patterns: &'a PatternSet, options: &'a TeachOptions) -> Self {
        Self { patterns, options }
    }

    /// A short line without sentence punctuation that names a structural
    /// unit or starts with a section number.
    pub fn is_heading(&self, line: &str) -> bool {
        if line.chars().count() > self.options.heading_max_len {
            return false;
        }
        if sentence_end().is_match(line) {
            return false;
        }
        self.patterns.heading_keyword.is_match(line) || numbered_heading().is_match(line)
    }

    /// A bulleted or numbered list entry.
    pub fn is_list_item(&self, line: &str) -> bool {
        list_item().is_match(line)
    }

    fn starts_new_unit(&self, line: &str) -> bool {
        self.is_heading(line)
            || self.is_list_item(line)
            || line.chars().count() < self.options.short_next_line
    }

    /// Split one page into paragraphs, in reading order.
    ///
    /// Headings and list items stand alone. Other lines accumulate until a
    /// line ends a sentence and the next line looks like the start of a new
    /// unit. Paragraphs under `min_paragraph_len` characters are dropped.
    pub fn segment(&self, page: &str) -> Vec<String> {
        let lines: Vec<&str> = page
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut paragraphs: Vec<String> = Vec::new();
        let mut buf: Vec<&str> = Vec::new();

        for (i, &line) in lines.iter().enumerate() {
            if self.is_heading(line) || self.is_list_item(line) {
                flush(&mut buf, &mut paragraphs);
                paragraphs.push(line.to_string());
                continue;
            }

            buf.push(line);

            let next_is_new = lines
                .get(i + 1)
                .is_some_and(|next| self.starts_new_unit(next));
            if terminal().is_match(line) && next_is_new {
                flush(&mut buf, &mut paragraphs);
            }
        }
        flush(&mut buf, &mut paragraphs);

        paragraphs
            .into_iter()
            .filter(|p| p.chars().count() >= self.options.min_paragraph_len)
            .collect()
    }
}

fn flush(buf: &mut Vec<&str>, out: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    out.push(buf.join(" ").trim().to_string());
    buf.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(page: &str) -> Vec<String> {
        let patterns = PatternSet::default();
        let options = TeachOptions::default();
        Segmenter::new(&patterns, &options).segment(page)
    }

    #[test]
    fn test_headings() {
        let patterns = PatternSet::default();
        let options = TeachOptions::default();
        let seg = Segmenter::new(&patterns, &options);
        assert!(seg.is_heading("Chapitre 2 : la monnaie"));
        assert!(seg.is_heading("Lesson 4 Elasticity"));
        assert!(seg.is_heading("3. The market equilibrium"));
        assert!(seg.is_heading("الفصل الثاني"));
        assert!(!seg.is_heading("This section explains the market."));
        assert!(!seg.is_heading("A plain short line"));
    }

    #[test]
    fn test_list_items() {
        let patterns = PatternSet::default();
        let options = TeachOptions::default();
        let seg = Segmenter::new(&patterns, &options);
        assert!(seg.is_list_item("- first point"));
        assert!(seg.is_list_item("• second point"));
        assert!(seg.is_list_item("12) twelfth point"));
        assert!(seg.is_list_item("IV. fourth part"));
        assert!(seg.is_list_item("٣- نقطة"));
        assert!(!seg.is_list_item("-no space"));
        assert!(!seg.is_list_item("123) too many digits"));
    }

    #[test]
    fn test_lines_joined_until_sentence_end() {
        let page = "Opportunity cost is the value of the best\n\
                    alternative given up when making a choice.\n\
                    Short line.\n\
                    Another paragraph that continues the explanation of the idea.";
        let paragraphs = segment(page);
        assert_eq!(
            paragraphs,
            vec![
                "Opportunity cost is the value of the best alternative given up when making a choice.",
                "Short line. Another paragraph that continues the explanation of the idea.",
            ]
        );
    }

    #[test]
    fn test_heading_and_list_stand_alone() {
        let page = "Section 1 The basics of supply and demand curves\n\
                    Prices coordinate the decisions of many buyers and sellers\n\
                    - Buyers respond to lower prices by purchasing more units\n\
                    Sellers respond to higher prices by producing more output.";
        let paragraphs = segment(page);
        assert_eq!(paragraphs.len(), 4);
        assert_eq!(paragraphs[0], "Section 1 The basics of supply and demand curves");
        assert_eq!(
            paragraphs[2],
            "- Buyers respond to lower prices by purchasing more units"
        );
    }

    #[test]
    fn test_short_paragraphs_dropped() {
        assert!(segment("Too short.\nAlso short.").is_empty());
        assert!(segment("").is_empty());
    }
}
