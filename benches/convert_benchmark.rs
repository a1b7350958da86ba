//! Benchmarks for markdown ⇄ block conversion.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic notes; images are left as literal text so
//! no filesystem or upload work is measured.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic note with the given number of sections.
fn create_test_note(section_count: usize) -> String {
    let mut note = String::from("# Benchmark note\n\n");

    for i in 0..section_count {
        note.push_str(&format!("## Section {}\n\n", i + 1));
        note.push_str(
            "Some paragraph text with *emphasis* and a [link](https://example.com).\n\
             It continues over a second line.\n\n",
        );
        note.push_str("```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\n");
        note.push_str(&format!("![figure {}](img/figure-{}.png)\n\n", i, i));
    }

    note
}

/// Benchmark markdown parsing at various sizes.
fn bench_to_leaflet(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_leaflet");
    let converter = leafmark::MarkdownConverter::new();

    for section_count in [1, 10, 100].iter() {
        let note = create_test_note(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| converter.to_leaflet(black_box(&note)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark markdown rendering at various sizes.
fn bench_from_leaflet(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_leaflet");
    let converter = leafmark::MarkdownConverter::new();

    for section_count in [1, 10, 100].iter() {
        let blocks = converter
            .to_leaflet(&create_test_note(*section_count))
            .unwrap();

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| converter.from_leaflet(black_box(&blocks)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark JSON encoding of a document.
fn bench_json(c: &mut Criterion) {
    let converter = leafmark::MarkdownConverter::new();
    let page = converter.to_page(&create_test_note(10)).unwrap();
    let doc = leafmark::Document::new("did:plc:bench", "Benchmark").with_page(page);

    c.bench_function("to_json_compact", |b| {
        b.iter(|| leafmark::to_json(black_box(&doc), leafmark::JsonFormat::Compact).unwrap());
    });

    let json = leafmark::to_json(&doc, leafmark::JsonFormat::Compact).unwrap();
    c.bench_function("from_json", |b| {
        b.iter(|| leafmark::from_json(black_box(&json)).unwrap());
    });
}

criterion_group!(benches, bench_to_leaflet, bench_from_leaflet, bench_json);
criterion_main!(benches);
