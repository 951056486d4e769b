use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dom::{Document, to_html};
use sanitize::{SanitizerArgs, SanitizerPipeline};
use sanitize_test_support::parse_fragment;

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 5_000;

/// One post body block: a paragraph, one convertible and one removable player.
fn make_blocks(count: usize) -> String {
    let mut out = String::with_capacity(count * 256);
    for i in 0..count {
        out.push_str("<p>Episode notes</p>");
        out.push_str(&format!(
            r#"<audio class="wp-audio-shortcode" width="300px" loop="false"><source src="https://x.com/{i}.mp3" type="audio/mpeg"><a href="https://x.com/{i}.mp3">Download</a></audio>"#
        ));
        out.push_str(&format!(r#"<div><audio src="http://x.com/{i}.ogg"></audio></div>"#));
    }
    out
}

fn bench_sanitize(c: &mut Criterion, name: &str, blocks: usize) {
    let doc = parse_fragment(&make_blocks(blocks));
    let pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
    c.bench_function(name, |b| {
        b.iter_batched(
            || doc.clone(),
            |mut doc: Document| {
                let output = pipeline.run(black_box(&mut doc)).unwrap();
                black_box(output.modified);
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_sanitize_small(c: &mut Criterion) {
    bench_sanitize(c, "bench_sanitize_small", SMALL_BLOCKS);
}

fn bench_sanitize_large(c: &mut Criterion) {
    bench_sanitize(c, "bench_sanitize_large", LARGE_BLOCKS);
}

fn bench_sanitize_without_audio(c: &mut Criterion) {
    let input = "<p>Plain paragraph with <em>markup</em>.</p>".repeat(LARGE_BLOCKS);
    let doc = parse_fragment(&input);
    let pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
    c.bench_function("bench_sanitize_without_audio", |b| {
        b.iter_batched(
            || doc.clone(),
            |mut doc: Document| {
                let output = pipeline.run(black_box(&mut doc)).unwrap();
                black_box(output.modified);
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_sanitize_and_serialize(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let pipeline = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default());
    c.bench_function("bench_sanitize_and_serialize", |b| {
        b.iter(|| {
            let mut doc = parse_fragment(black_box(&input));
            pipeline.run(&mut doc).unwrap();
            black_box(to_html(&doc, doc.root()).len());
        });
    });
}

criterion_group!(
    benches,
    bench_sanitize_small,
    bench_sanitize_large,
    bench_sanitize_without_audio,
    bench_sanitize_and_serialize
);
criterion_main!(benches);
