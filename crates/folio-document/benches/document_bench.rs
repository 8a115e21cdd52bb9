// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the folio-document crate: merging documents and
// resolving page lists.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use folio_core::{PageIntent, resolve_pages};
use folio_document::{PdfWriter, merge_documents};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A text document long enough to span `pages` Letter pages.
fn text_pdf(pages: usize) -> Vec<u8> {
    let lines: Vec<String> = (0..pages * 33).map(|n| format!("line {n}")).collect();
    PdfWriter::letter()
        .create_from_text("Bench", &lines.join("\n"))
        .expect("fixture PDF")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Merge five 10-page documents.
fn bench_merge(c: &mut Criterion) {
    let docs: Vec<Vec<u8>> = (0..5).map(|_| text_pdf(10)).collect();
    let refs: Vec<&[u8]> = docs.iter().map(Vec::as_slice).collect();

    c.bench_function("merge (5 x 10 pages)", |b| {
        b.iter(|| black_box(merge_documents(black_box(&refs)).expect("merge")));
    });
}

/// Resolve a 500-token page list, a third of it out of range or malformed.
fn bench_resolve_pages(c: &mut Criterion) {
    let input: Vec<String> = (0..500)
        .map(|n| match n % 3 {
            0 => format!("{}", n % 400 + 1),
            1 => format!(" {} ", 1000 + n),
            _ => "x".to_string(),
        })
        .collect();
    let input = input.join(",");

    c.bench_function("resolve_pages (500 tokens)", |b| {
        b.iter(|| black_box(resolve_pages(black_box(&input), 400, PageIntent::Extract)));
    });
}

criterion_group!(benches, bench_merge, bench_resolve_pages);
criterion_main!(benches);
