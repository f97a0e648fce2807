//! Benchmarks for markdown page rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use imprint_renderer::{RenderContext, RouteResolver, TransformPipeline};

struct NoRoutes;

impl RouteResolver for NoRoutes {
    fn route_for(&self, _source_path: &str) -> Option<String> {
        None
    }
}

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 50 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "This is paragraph {j} in section {i}. It contains **bold** and *italic* text.\n\n"
            ));
        }
    }
    md
}

fn render(pipeline: &mut TransformPipeline, markdown: &str) {
    let ctx = RenderContext {
        source_path: "bench.md",
        resolver: &NoRoutes,
    };
    let page = pipeline.render_page(markdown, &ctx);
    std::hint::black_box(page);
}

fn bench_render_simple(c: &mut Criterion) {
    let mut pipeline = TransformPipeline::with_defaults();

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| render(&mut pipeline, "# Hello\n\nSimple content."));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let mut pipeline = TransformPipeline::with_defaults();

    let mut group = c.benchmark_group("render_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(headings, paragraphs);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{headings}h_{paragraphs}p")),
            &markdown,
            |b, md| b.iter(|| render(&mut pipeline, md)),
        );
    }

    group.finish();
}

fn bench_render_extension_syntax(c: &mut Criterion) {
    let markdown = r"# Extension Features

*[CLI]: Command Line Interface
*[API]: Application Programming Interface

The CLI talks to the API[^proto]. Water is H~2~O and area grows as r^2^.

Term
: the definition of the term

[^proto]: Over HTTP.
";
    let mut pipeline = TransformPipeline::with_defaults();

    c.bench_function("render_extension_syntax", |b| {
        b.iter(|| render(&mut pipeline, markdown));
    });
}

fn bench_render_gfm_features(c: &mut Criterion) {
    let markdown = r"# GFM Features

| Column A | Column B | Column C |
|----------|----------|----------|
| Value 1  | Value 2  | Value 3  |
| Value 4  | Value 5  | Value 6  |

- [x] Completed task
- [ ] Pending task
- [ ] Another task

This has ~~strikethrough~~ and **bold** and *italic*.
";
    let mut pipeline = TransformPipeline::with_defaults();

    c.bench_function("render_gfm_features", |b| {
        b.iter(|| render(&mut pipeline, markdown));
    });
}

fn bench_render_large_document(c: &mut Criterion) {
    let markdown = generate_markdown(100, 5); // ~100KB document
    let mut pipeline = TransformPipeline::with_defaults();

    let mut group = c.benchmark_group("large_document");
    group.throughput(Throughput::Bytes(markdown.len() as u64));
    group.bench_function("render", |b| {
        b.iter(|| render(&mut pipeline, &markdown));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_render_extension_syntax,
    bench_render_gfm_features,
    bench_render_large_document,
);

criterion_main!(benches);
