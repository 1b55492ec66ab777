//! Benchmarks for the Chroma transform stages and the depth query.
//!
//! Run with: cargo bench -p chroma-core

use chroma_core::config::TransformConfig;
use chroma_core::{ImageRecord, ImageTransformer, MetadataStore};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};

fn photo_like(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    }))
}

fn benchmark_resize(c: &mut Criterion) {
    let img = photo_like(1920, 1080);
    let transformer = ImageTransformer::new(TransformConfig::default());

    c.bench_function("resize_1080p_to_150x110", |b| {
        b.iter(|| {
            let _ = transformer.resize(black_box(&img), 150, 110);
        })
    });
}

fn benchmark_false_color(c: &mut Criterion) {
    let img = photo_like(150, 110);
    let transformer = ImageTransformer::new(TransformConfig::default());

    c.bench_function("false_color_150x110", |b| {
        b.iter(|| {
            let _ = transformer.apply_false_color(black_box(&img));
        })
    });
}

fn benchmark_depth_query(c: &mut Criterion) {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Skipping depth query benchmark: {e}");
            return;
        }
    };
    let store = MetadataStore::new(dir.path().join("image_metadata.csv"));
    for i in 0..10_000i64 {
        let record = ImageRecord {
            filename: format!("img{i}.jpg"),
            processed_path: format!("resized_images/img{i}_processed.jpg"),
            colormap_path: format!("resized_images/img{i}_colormap.jpg"),
            width: 150,
            height: 110,
            depth: i % 500,
        };
        if store.append(&record).is_err() {
            eprintln!("Skipping depth query benchmark: store not writable");
            return;
        }
    }

    c.bench_function("depth_query_10k_records", |b| {
        b.iter(|| {
            let _ = store.query_by_depth_range(black_box(100), black_box(120));
        })
    });
}

criterion_group!(
    benches,
    benchmark_resize,
    benchmark_false_color,
    benchmark_depth_query,
);
criterion_main!(benches);
