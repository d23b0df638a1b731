//! Benchmarks for the DocBook → corpus → links pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use docwiki::{
    CorpusBuilder, CrossRefIndex, IndexEntry, Linker, MatchMode, PageId, parse_document,
};

const CHAPTERS: usize = 20;
const SECTIONS: usize = 25;

/// Synthetic compendium: every paragraph mentions a few other section titles.
fn sample_source() -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<book>\n");
    for c in 0..CHAPTERS {
        let _ = writeln!(xml, "<chapter><title>Baustein {c}</title>");
        let _ = writeln!(xml, "<para>Überblick über Baustein {c}.</para>");
        for s in 0..SECTIONS {
            let other = (s + 7) % SECTIONS;
            let _ = writeln!(
                xml,
                "<section><title>Anforderung {c}.{s}</title>\
                 <para>Siehe <emphasis>Anforderung {c}.{other}</emphasis> und \
                 Baustein {}.</para>\
                 <itemizedlist><listitem><para>Gefährdung {s}</para></listitem>\
                 <listitem><para>Maßnahme {s}</para></listitem></itemizedlist>\
                 <section><title>Umsetzung</title><para>Details.</para></section>\
                 </section>",
                (c + 1) % CHAPTERS
            );
        }
        xml.push_str("</chapter>\n");
    }
    xml.push_str("</book>\n");
    xml
}

fn sample_index() -> CrossRefIndex {
    let mut index = CrossRefIndex::new();
    for c in 0..CHAPTERS {
        index.push(IndexEntry::new(
            PageId::new(format!("baustein_{c}:start")),
            format!("Baustein {c}"),
        ));
        for s in 0..SECTIONS {
            index.push(IndexEntry::new(
                PageId::new(format!("baustein_{c}:anforderung_{c}.{s}")),
                format!("Anforderung {c}.{s}"),
            ));
        }
    }
    index
}

// ============================================================================
// Build Benchmarks
// ============================================================================

fn bench_parse_docbook(c: &mut Criterion) {
    let xml = sample_source();

    c.bench_function("parse_docbook", |b| {
        b.iter(|| parse_document(black_box(&xml)).unwrap());
    });
}

fn bench_build_pages(c: &mut Criterion) {
    let doc = parse_document(&sample_source()).unwrap();
    let builder = CorpusBuilder::new();

    c.bench_function("build_pages", |b| {
        b.iter(|| builder.build(black_box(&doc)));
    });
}

// ============================================================================
// Link Benchmarks
// ============================================================================

fn bench_compile_linker(c: &mut Criterion) {
    let index = sample_index();

    c.bench_function("compile_linker", |b| {
        b.iter(|| Linker::new(black_box(&index), MatchMode::WordBoundary).unwrap());
    });
}

fn bench_link_pages(c: &mut Criterion) {
    let doc = parse_document(&sample_source()).unwrap();
    let pages = CorpusBuilder::new().build(&doc).pages;
    let index = sample_index();

    for (name, mode) in [
        ("link_pages_word_boundary", MatchMode::WordBoundary),
        ("link_pages_substring", MatchMode::Substring),
    ] {
        let linker = Linker::new(&index, mode).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                for page in &pages {
                    black_box(linker.link_text(&page.body));
                }
            });
        });
    }
}

criterion_group!(
    benches,
    // Build
    bench_parse_docbook,
    bench_build_pages,
    // Link
    bench_compile_linker,
    bench_link_pages,
);
criterion_main!(benches);
