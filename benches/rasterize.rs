//! Benchmark for the per-glyph rasterization path and the packer.
//!
//! Uses the synthetic font so it runs without any font files on disk.

use cellfont::{
    pack::pack, test_support::SyntheticFont, Classifier, Generator, GeneratorConfig, Rasterizer,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_rasterize(c: &mut Criterion) {
    let font = SyntheticFont::sample();
    let mut group = c.benchmark_group("rasterize");
    for cell in [12u32, 16, 24] {
        let r = Rasterizer::new(cell, GeneratorConfig::default_render_size(cell), Classifier::default())
            .expect("valid sizes");
        group.bench_function(format!("ideograph_{cell}px"), |b| {
            b.iter(|| r.rasterize(black_box(&font), black_box(0x53E3)))
        });
        group.bench_function(format!("period_{cell}px"), |b| {
            b.iter(|| r.rasterize(black_box(&font), black_box(0x3002)))
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let font = SyntheticFont::sample();
    let codepoints: Vec<u32> = font.chars().into_iter().map(u32::from).collect();
    let generator = Generator::new(GeneratorConfig::new(16))
        .expect("valid config")
        .with_standard_aliases(true);
    c.bench_function("generate_sample_16px", |b| {
        b.iter(|| generator.generate(black_box(&font), black_box(&codepoints)))
    });

    let r = generator.rasterizer();
    let glyphs: Vec<_> = codepoints
        .iter()
        .filter_map(|cp| r.rasterize(&font, *cp).map(|g| (*cp, g)))
        .collect();
    c.bench_function("pack_sample_16px", |b| {
        b.iter(|| pack(16, black_box(glyphs.clone())))
    });
}

criterion_group!(benches, bench_rasterize, bench_generate);
criterion_main!(benches);
