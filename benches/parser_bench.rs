use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use littlexml::parser::{load, BufferSource, ParseOptions, PushParser};
use littlexml::serial::{serialize, serialize_with_options, SerializeOptions};
use littlexml::Document;
use std::fmt::Write;

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

const FIELD_TYPES: [&str; 4] = ["string", "int", "float", "bool"];

/// Generates `structs` struct definitions, each with a handful of typed
/// fields, an empty `doc=""` attribute and a description leaf.
fn make_struct_defs(structs: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?><schema>");
    for s in 0..structs {
        let _ = write!(xml, "<struct name=\"Type{s}\" doc=\"\">");
        for f in 0..(s % 6) + 2 {
            let ty = FIELD_TYPES[f % FIELD_TYPES.len()];
            let _ = write!(xml, "<field name=\"f{f}\" type=\"{ty}\" />");
        }
        let _ = write!(xml, "<description>Definition of type {s}</description></struct>");
    }
    xml.push_str("</schema>");
    xml
}

/// The struct definitions as the serializer writes them: one element per
/// line, so every element also carries whitespace-only text.
fn make_pretty_struct_defs(structs: usize) -> String {
    serialize(&Document::parse_str(&make_struct_defs(structs)))
}

/// Generates settings whose values are split by comments. Only the first
/// text run of each value is kept.
fn make_settings_xml(entries: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.1\" encoding=\"ASCII\" ?>\n<settings>\n");
    for i in 0..entries {
        let _ = writeln!(
            xml,
            "<!-- entry {i} --><setting key=\"opt{i}\">primary {i}<!-- later -->shadowed {i}</setting>"
        );
    }
    xml.push_str("</settings>\n");
    xml
}

/// Generates a chain of `depth` nested `<nest>` elements ending in text.
fn make_nested_xml(depth: usize) -> String {
    let mut xml = "<nest>".repeat(depth);
    xml.push_str("bottom");
    xml.push_str(&"</nest>".repeat(depth));
    xml
}

/// Generates elements with `num_attrs` attributes each, every third one
/// left empty.
fn make_attr_heavy_xml(num_attrs: usize) -> String {
    let mut xml = String::from("<record-set>");
    for i in 0..10 {
        xml.push_str("<record");
        for j in 0..num_attrs {
            if j % 3 == 0 {
                let _ = write!(xml, " a{j}=\"\"");
            } else {
                let _ = write!(xml, " a{j}=\"{i}:{j}\"");
            }
        }
        xml.push_str(" />");
    }
    xml.push_str("</record-set>");
    xml
}

/// Generates a document padded with comments, which the parser skips.
fn make_comment_heavy_xml() -> String {
    let mut xml = String::from("<notes>");
    for i in 0..100 {
        let _ = write!(
            xml,
            "<!-- note {i}: <b>markup</b> in here is never parsed -->\
             <note n=\"{i}\">Text {i}</note>"
        );
    }
    xml.push_str("</notes>");
    xml
}

// ---------------------------------------------------------------------------
// Parsing benchmarks
// ---------------------------------------------------------------------------

fn bench_parse_struct_defs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_struct_defs");
    for structs in [10, 100, 1000] {
        let xml = make_struct_defs(structs);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(structs), &xml, |b, xml| {
            b.iter(|| Document::parse_str(black_box(xml)));
        });
    }
    group.finish();
}

fn bench_parse_pretty_printed(c: &mut Criterion) {
    let xml = make_pretty_struct_defs(200);
    let mut group = c.benchmark_group("parse_pretty_printed");
    for no_blanks in [false, true] {
        let options = ParseOptions::default().no_blanks(no_blanks);
        group.bench_with_input(
            BenchmarkId::new("no_blanks", no_blanks),
            &options,
            |b, options| {
                b.iter(|| load(BufferSource::new(black_box(xml.as_bytes())), options));
            },
        );
    }
    group.finish();
}

fn bench_parse_settings(c: &mut Criterion) {
    let xml = make_settings_xml(500);
    c.bench_function("parse_settings", |b| {
        b.iter(|| Document::parse_str(black_box(&xml)));
    });
}

fn bench_parse_deeply_nested(c: &mut Criterion) {
    let xml = make_nested_xml(200);
    c.bench_function("parse_deeply_nested", |b| {
        b.iter(|| Document::parse_str(black_box(&xml)));
    });
}

fn bench_parse_many_attributes(c: &mut Criterion) {
    let xml = make_attr_heavy_xml(60);
    c.bench_function("parse_many_attributes", |b| {
        b.iter(|| Document::parse_str(black_box(&xml)));
    });
}

fn bench_parse_comment_heavy(c: &mut Criterion) {
    let xml = make_comment_heavy_xml();
    c.bench_function("parse_comment_heavy", |b| {
        b.iter(|| Document::parse_str(black_box(&xml)));
    });
}

// ---------------------------------------------------------------------------
// Chunk size benchmark
// ---------------------------------------------------------------------------

fn bench_chunk_sizes(c: &mut Criterion) {
    let xml = make_struct_defs(1000);
    let mut group = c.benchmark_group("chunk_size");
    group.throughput(Throughput::Bytes(xml.len() as u64));
    for size in [1, 64, 4096, 65536] {
        let options = ParseOptions::default().chunk_size(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &options, |b, options| {
            b.iter(|| load(BufferSource::new(black_box(xml.as_bytes())), options));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Lookup benchmark
// ---------------------------------------------------------------------------

fn bench_field_lookup(c: &mut Criterion) {
    let doc = Document::parse_str(&make_struct_defs(1000));
    assert!(doc.success(), "failed to parse struct definitions");
    let Some(schema) = doc.root_element() else {
        return;
    };
    c.bench_function("field_lookup", |b| {
        b.iter(|| {
            doc.children_by_tag_name(schema, "struct")
                .filter_map(|s| doc.immediate_element_by_tag_name(s, "field"))
                .filter_map(|f| doc.attribute(f, "type"))
                .count()
        });
    });
}

// ---------------------------------------------------------------------------
// Serialization benchmarks
// ---------------------------------------------------------------------------

fn bench_serialize(c: &mut Criterion) {
    let doc = Document::parse_str(&make_struct_defs(1000));
    assert!(doc.success(), "failed to parse struct definitions");
    let mut group = c.benchmark_group("serialize");
    for indent in [0, 2, 8] {
        let options = SerializeOptions::default().indent(indent);
        group.bench_with_input(BenchmarkId::new("indent", indent), &options, |b, options| {
            b.iter(|| serialize_with_options(black_box(&doc), options));
        });
    }
    group.finish();
}

fn bench_serialize_deep(c: &mut Criterion) {
    let doc = Document::parse_str(&make_nested_xml(200));
    assert!(doc.success(), "failed to parse nested document");
    c.bench_function("serialize_deep", |b| {
        b.iter(|| serialize(black_box(&doc)));
    });
}

// ---------------------------------------------------------------------------
// Roundtrip benchmark: parse -> serialize -> parse
// ---------------------------------------------------------------------------

fn bench_roundtrip(c: &mut Criterion) {
    let xml = make_settings_xml(100);
    c.bench_function("roundtrip", |b| {
        b.iter(|| {
            let doc = Document::parse_str(black_box(&xml));
            let serialized = serialize(&doc);
            let doc2 = Document::parse_str(&serialized);
            black_box(doc2);
        });
    });
}

// ---------------------------------------------------------------------------
// Push parser benchmark
// ---------------------------------------------------------------------------

fn bench_push_parser(c: &mut Criterion) {
    let xml = make_struct_defs(100);
    // Split into ~64-byte chunks to simulate incremental feeding.
    let chunks: Vec<&[u8]> = xml.as_bytes().chunks(64).collect();
    c.bench_function("push_parser", |b| {
        b.iter(|| {
            let mut parser = PushParser::new();
            for chunk in &chunks {
                parser.push(black_box(chunk));
            }
            parser.finish()
        });
    });
}

// ---------------------------------------------------------------------------
// Criterion groups and main
// ---------------------------------------------------------------------------

criterion_group!(
    parsing,
    bench_parse_struct_defs,
    bench_parse_pretty_printed,
    bench_parse_settings,
    bench_parse_deeply_nested,
    bench_parse_many_attributes,
    bench_parse_comment_heavy,
);

criterion_group!(chunking, bench_chunk_sizes);

criterion_group!(lookup, bench_field_lookup);

criterion_group!(serialization, bench_serialize, bench_serialize_deep);

criterion_group!(roundtrip, bench_roundtrip);

criterion_group!(push, bench_push_parser);

criterion_main!(parsing, chunking, lookup, serialization, roundtrip, push);
