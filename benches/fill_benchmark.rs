//! Benchmarks for template filling.
//!
//! Run with: cargo bench
//!
//! Templates of growing size, one placeholder every other paragraph.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gendoc::{FillOptions, Record, Template};
use std::io::Cursor;

/// Creates a synthetic DOCX template with the given number of paragraphs.
fn create_template(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    )
    .unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
    );

    for i in 0..paragraph_count {
        let text = if i % 2 == 0 {
            format!("Paragraph {} about &lt;&lt;Nom&gt;&gt; in &lt;&lt;Ville&gt;&gt;.", i)
        } else {
            format!("Paragraph {} with fixed text for benchmarking purposes.", i)
        };
        content.push_str(&format!(
            r#"
    <w:p>
      <w:r>
        <w:t>{}</w:t>
      </w:r>
    </w:p>"#,
            text
        ));
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

fn record() -> Record {
    Record::new()
        .with("Nom", "Les Amis du Quartier")
        .with("Ville", "Lyon")
        .with("Code de la structure", "A123")
        .with("Date de la dernière visite", "05/06/2024")
}

/// Benchmark opening and parsing templates.
fn bench_template_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_open");

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_template(*para_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = Template::from_bytes(black_box(data.clone()));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark filling an opened template.
fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    let record = record();
    let options = FillOptions::default();

    for para_count in [10, 100, 500, 1000].iter() {
        let template = Template::from_bytes(create_template(*para_count)).unwrap();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &template,
            |b, template| {
                b.iter(|| {
                    let _ = gendoc::fill_with_options(black_box(template), &record, &options);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_template_open, bench_fill);
criterion_main!(benches);
