//! Benchmarks for docxtmpl template preparation.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic document parts where every placeholder is
//! split across several runs, the way word processors store them.

use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Creates a pretty-printed document part with the given number of paragraphs,
/// optionally wrapped in a section.
fn create_test_part(paragraph_count: usize, section: bool) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!("\n<w:document xmlns:w=\"{}\">\n  <w:body>\n", NS));

    if section {
        xml.push_str("    <w:p><w:r><w:t>{{#</w:t></w:r><w:r><w:t>ROWS}}</w:t></w:r></w:p>\n");
    }
    for i in 0..paragraph_count {
        // One placeholder split over three runs, plus plain text around it
        xml.push_str(&format!(
            "    <w:p>\n      <w:r><w:t xml:space=\"preserve\">Line {} for </w:t></w:r>\n      \
             <w:r><w:t>{{{{NA</w:t></w:r>\n      <w:r><w:rPr><w:b/></w:rPr><w:t>M</w:t></w:r>\n      \
             <w:r><w:t>E}}}}.</w:t></w:r>\n    </w:p>\n",
            i
        ));
    }
    if section {
        xml.push_str("    <w:p><w:r><w:t>{{/ROWS}}</w:t></w:r></w:p>\n");
    }

    xml.push_str("  </w:body>\n</w:document>\n");
    xml
}

/// Wraps a document part into an in-memory docx archive.
fn create_test_docx(part: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(b"<Types/>").unwrap();
    writer.start_file(docxtmpl::DOCUMENT_PART, options).unwrap();
    writer.write_all(part.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Benchmark the preparation pipeline at various sizes.
fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_markup");

    for paragraph_count in [10, 100, 1000].iter() {
        let part = create_test_part(*paragraph_count, true);

        group.bench_function(format!("{}_paragraphs", paragraph_count), |b| {
            b.iter(|| docxtmpl::prepare_xml(black_box(&part)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parse and serialize without preparation.
fn bench_xml_roundtrip(c: &mut Criterion) {
    let part = create_test_part(100, true);

    c.bench_function("xml_roundtrip", |b| {
        b.iter(|| {
            let doc = docxtmpl::xml::parse(black_box(&part)).unwrap();
            docxtmpl::xml::serialize(&doc)
        });
    });
}

/// Benchmark a full render, archive in and archive out.
fn bench_render_bytes(c: &mut Criterion) {
    let docx = create_test_docx(&create_test_part(100, false));
    let data = json!({ "NAME": "Alice" });
    let templater = docxtmpl::Templater::new();

    c.bench_function("render_bytes", |b| {
        b.iter(|| templater.render_bytes(black_box(&docx), &data).unwrap());
    });
}

criterion_group!(benches, bench_prepare, bench_xml_roundtrip, bench_render_bytes);
criterion_main!(benches);
