//! End-to-end tests driving the public API with synthetic token pages and
//! raw page text.

use teachpdf::parser::PAGE_SEPARATOR;
use teachpdf::{clean_text, Error, Language, Pipeline, Teachpdf, Token};

fn tok(text: &str, x: f32, y: f32) -> Token {
    Token::new(text, x, y, 12.0).unwrap()
}

/// Join pages the way the layout stage does: every page followed by the
/// separator.
fn raw_document(pages: &[String]) -> String {
    pages.iter().map(|p| format!("{}{}", p, PAGE_SEPARATOR)).collect()
}

fn course_page(i: usize) -> String {
    let mut lines = Vec::new();
    if i <= 6 {
        lines.push("Course Title".to_string());
    }
    lines.push(format!(
        "Markets in lesson {} show how buyers and sellers agree on a price.",
        i
    ));
    lines.push(format!(
        "Each trade in week {} moves goods toward those who value them most.",
        i
    ));
    lines.push(format!("Page {}", i));
    lines.join("\n")
}

#[test]
fn test_reading_order_from_tokens() {
    let pages = vec![vec![
        tok("second", 150.0, 700.0),
        tok("line", 72.0, 686.0),
        tok("First", 72.0, 700.0),
        tok("السوق", 100.0, 650.0),
        tok("مكان", 200.0, 650.0),
    ]];
    let raw = Pipeline::default().reconstruct_pages(&pages);

    assert!(raw.starts_with("First second\nline\n\nمكان السوق"));
    assert!(raw.ends_with(PAGE_SEPARATOR));
}

#[test]
fn test_running_headers_and_page_numbers_removed() {
    let pages: Vec<String> = (1..=10).map(course_page).collect();
    let report = Pipeline::default().analyze_text(&raw_document(&pages)).unwrap();

    assert!(!report.cleaned_text.contains("Course Title"));
    assert!(!report.cleaned_text.contains("Page 3"));
    assert!(report.cleaned_text.contains("Markets in lesson 7 show"));

    assert_eq!(report.stats.source_pages, 10);
    assert_eq!(report.stats.cleaned_pages, 10);
    assert_eq!(report.stats.paragraphs_count, 10);
    assert_eq!(report.paragraphs[6].id, "p07-01");
    assert_eq!(report.cut_front_matter_until_page, 0);
}

#[test]
fn test_front_matter_cut() {
    let front = |i: usize| {
        format!(
            "Copyright 202{} by the authors. All rights reserved worldwide.\n\
             Printed by the university press, run number {}, spring term.",
            i, i
        )
    };
    let body = |topic: &str| {
        format!(
            "Definition: {topic} is studied through careful observation of how markets allocate resources.\n\
             Example: when the price of {topic} rises, buyers reduce the quantity they purchase."
        )
    };
    let pages = vec![front(1), front(2), front(3), body("coffee"), body("tea")];
    let report = Pipeline::default().analyze_text(&raw_document(&pages)).unwrap();

    assert_eq!(report.cut_front_matter_until_page, 3);
    assert!(report.paragraphs.iter().all(|p| p.page > 3));
    assert_eq!(report.paragraphs.len(), 2);
    assert_eq!(report.stats.paragraphs_count, 5);
    assert_eq!(report.flags_count.get("copyright_like"), Some(&3));
    assert!(report.selected_text.contains("Definition: coffee"));
    assert!(!report.selected_text.contains("Copyright"));
}

#[test]
fn test_repeated_lines_capped() {
    let mut lines = Vec::new();
    for i in 1..=5 {
        lines.push("Reminder: bring your calculator to every class.".to_string());
        lines.push(format!("Topic {} covers a distinct part of the syllabus today.", i));
    }
    let text = clean_text(&lines.join("\n")).unwrap();

    assert_eq!(text.matches("Reminder").count(), 2);
    assert_eq!(text.matches("Topic").count(), 5);
}

#[test]
fn test_dehyphenation() {
    let text = clean_text("L'analyse de l'éco-\nnomie des marchés montre des équilibres stables.").unwrap();
    assert!(text.contains("économie"));

    let text = clean_text("The academic year 2020-\n2021 starts in September for every student.").unwrap();
    assert!(text.contains("2020-\n2021"));
}

#[test]
fn test_sampling_flagged_in_stats() {
    let pages: Vec<String> = (1..=10).map(course_page).collect();
    let report = Teachpdf::new()
        .with_max_chars(300)
        .analyze_text(&raw_document(&pages))
        .unwrap();

    assert!(report.stats.sampled);
    // Five windows of 60 characters joined by blank lines.
    assert_eq!(report.stats.cleaned_length, 5 * 60 + 4 * 2);
    // Paragraphs come from the full cleaned pages, not the capped text.
    assert_eq!(report.stats.paragraphs_count, 10);
}

#[test]
fn test_empty_token_pages_are_unreadable() {
    let pages: Vec<Vec<Token>> = vec![Vec::new(), Vec::new()];
    let err = Pipeline::default().analyze_source(&pages).unwrap_err();
    assert!(matches!(err, Error::Unreadable));
    assert_eq!(err.code(), "PDF_EMPTY_OR_UNREADABLE");
}

#[test]
fn test_nothing_selected_is_not_an_error() {
    let raw = "Printed by the university press, first edition, spring term.";
    let report = Pipeline::default().analyze_text(raw).unwrap();
    assert_eq!(report.stats.paragraphs_count, 1);
    assert!(report.nothing_selected());
    assert_eq!(report.selected_text, "");
}

#[test]
fn test_language_restriction() {
    let raw = "تعريف: السوق هو المكان الذي يلتقي فيه البائعون والمشترون لتبادل السلع والخدمات بالأسعار المختلفة";
    let all = Pipeline::default().analyze_text(raw).unwrap();
    let latin_only = Teachpdf::new()
        .with_languages(&[Language::English, Language::French])
        .analyze_text(raw)
        .unwrap();

    assert!(all.paragraphs[0].score > latin_only.paragraphs[0].score);
}

#[test]
fn test_not_a_pdf() {
    assert!(matches!(
        Pipeline::default().analyze_bytes(b"plain text"),
        Err(Error::UnknownFormat)
    ));
}
