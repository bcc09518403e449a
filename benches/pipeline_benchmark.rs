//! Benchmarks for the layout, cleanup and teachability stages.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic: token pages and sentinel-separated page text, so
//! no PDF fixture is needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use teachpdf::parser::PAGE_SEPARATOR;
use teachpdf::{Pipeline, Token};

/// Raw text of `page_count` pages with a running header, body lines, a TOC
/// page up front and a page number footer.
fn create_test_text(page_count: usize) -> String {
    let mut content = String::new();

    content.push_str("Table of contents\n");
    for i in 1..=12 {
        content.push_str(&format!("Chapter {} ........ {}\n", i, i * 10));
    }
    content.push_str(PAGE_SEPARATOR);

    for i in 0..page_count {
        content.push_str("Introduction to Economics\n");
        for j in 0..8 {
            content.push_str(&format!(
                "Definition {}.{}: a market is where buyers and sellers exchange goods at an agreed price.\n",
                i, j
            ));
        }
        content.push_str(&format!("Page {}", i + 1));
        content.push_str(PAGE_SEPARATOR);
    }
    content
}

/// Token pages of `lines` lines each.
fn create_test_tokens(page_count: usize, lines: usize) -> Vec<Vec<Token>> {
    (0..page_count)
        .map(|_| {
            (0..lines)
                .flat_map(|l| {
                    let y = 750.0 - l as f32 * 14.0;
                    ["Supply", "and", "demand", "set", "prices."]
                        .iter()
                        .enumerate()
                        .filter_map(move |(k, w)| Token::new(w, 72.0 + k as f32 * 50.0, y, 12.0))
                })
                .collect()
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let pipeline = Pipeline::default();
    let pages = create_test_tokens(20, 40);

    c.bench_function("reconstruct_20_pages", |b| {
        b.iter(|| pipeline.reconstruct_pages(black_box(&pages)));
    });
}

fn bench_analyze_text(c: &mut Criterion) {
    let pipeline = Pipeline::default();
    let mut group = c.benchmark_group("analyze_text");

    for page_count in [1, 10, 100].iter() {
        let text = create_test_text(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let _ = pipeline.analyze_text(black_box(&text));
            });
        });
    }

    group.finish();
}

fn bench_pipeline_creation(c: &mut Criterion) {
    c.bench_function("pipeline_creation", |b| {
        b.iter(|| teachpdf::Teachpdf::new().with_max_selected(50).build().unwrap());
    });
}

criterion_group!(
    benches,
    bench_layout,
    bench_analyze_text,
    bench_pipeline_creation,
);
criterion_main!(benches);
