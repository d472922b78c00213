// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the toolhub-document crate: image resizing and
// CSV to JSON conversion on synthetic input.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use toolhub_document::{ConvertOptions, DataConverter, DataFormat, ImageFormatKind, ImageProcessor};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Downscale a 640x480 gradient to fit 160x160 and re-encode as PNG.
fn bench_image_resize(c: &mut Criterion) {
    let img = RgbImage::from_fn(640, 480, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let dynamic = DynamicImage::ImageRgb8(img);

    c.bench_function("image resize + png (640x480 -> 160)", |b| {
        b.iter(|| {
            let processor = ImageProcessor::from_dynamic(black_box(dynamic.clone()));
            let resized = processor.resize(160, 160).expect("resize");
            black_box(resized.encode(ImageFormatKind::Png, 90).expect("encode"));
        });
    });
}

/// Convert 1,000 CSV records to JSON with type inference.
fn bench_csv_to_json(c: &mut Criterion) {
    let mut csv = String::from("id,name,price,in_stock\n");
    for i in 0..1_000 {
        csv.push_str(&format!("{i},item-{i},{}.99,{}\n", i % 50, i % 2 == 0));
    }
    let options = ConvertOptions {
        infer_types: true,
        pretty: false,
        ..ConvertOptions::default()
    };

    c.bench_function("csv -> json (1000 rows)", |b| {
        b.iter(|| {
            let out = DataConverter::convert(
                black_box(csv.as_bytes()),
                DataFormat::Csv,
                DataFormat::Json,
                &options,
            )
            .expect("convert");
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_image_resize, bench_csv_to_json);
criterion_main!(benches);
