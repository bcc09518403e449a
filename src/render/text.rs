//! Plain text rendering for document reports.

use std::fmt::Write;

use crate::model::DocumentReport;

/// Which text of a report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextView {
    /// The cleaned document text
    #[default]
    Cleaned,
    /// Selected paragraphs under their `[id | Page n]` headers
    Selected,
}

/// Render one view of a report as plain text.
pub fn to_text(report: &DocumentReport, view: TextView) -> String {
    let text = match view {
        TextView::Cleaned => &report.cleaned_text,
        TextView::Selected => &report.selected_text,
    };
    text.trim().to_string()
}

/// A short human-readable summary of a report.
pub fn summary(report: &DocumentReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out, "Pages:        {} kept of {}", stats.cleaned_pages, stats.source_pages);
    let _ = writeln!(
        out,
        "Characters:   {} cleaned of {}{}",
        stats.cleaned_length,
        stats.raw_length,
        if stats.sampled { " (sampled)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Paragraphs:   {} selected of {}",
        stats.selected_count, stats.paragraphs_count
    );
    if report.cut_front_matter_until_page > 0 {
        let _ = writeln!(out, "Front matter: pages 1-{}", report.cut_front_matter_until_page);
    }
    if !report.flags_count.is_empty() {
        let flags: Vec<String> = report
            .flags_count
            .iter()
            .map(|(flag, n)| format!("{}={}", flag, n))
            .collect();
        let _ = writeln!(out, "Flags:        {}", flags.join(", "));
    }
    let _ = writeln!(out, "Mojibake:     {:.2}%", report.mojibake_ratio * 100.0);

    out
}
