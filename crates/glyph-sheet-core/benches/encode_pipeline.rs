use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glyph_sheet_core::prelude::*;
use image::{Rgba, RgbaImage};

fn generate_frames(count: usize, size: u32) -> Vec<AnimationFrame> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            AnimationFrame::new(RgbaImage::from_fn(size, size, |_, _| {
                Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255])
            }))
        })
        .collect()
}

fn bench_encode_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frames");

    // (source frames, target grid): pad, pass-through, downsample
    let cases = [(10usize, 16u32), (36, 36), (240, 100)];

    for (sources, target) in cases {
        let frames = generate_frames(sources, 64);
        let spec = AnimationSpec::new(40, target, 2.0).expect("spec");
        group.throughput(Throughput::Elements(target as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("{sources}_to"), target),
            &frames,
            |b, frames| b.iter(|| black_box(encode_frames(frames, &spec).expect("encode"))),
        );
    }

    group.finish();
}

fn bench_encode_png(c: &mut Criterion) {
    let frames = generate_frames(16, 40);
    let spec = AnimationSpec::new(40, 16, 2.0).expect("spec");
    let sheet = encode_frames(&frames, &spec).expect("encode");
    c.bench_function("encode_png_16", |b| {
        b.iter(|| black_box(encode_png(&sheet).expect("png")))
    });
}

criterion_group!(benches, bench_encode_frames, bench_encode_png);
criterion_main!(benches);
