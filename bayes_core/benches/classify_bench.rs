//! Performance benchmarks for classification and evaluation
//!
//! Run with: cargo bench --bench classify_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shade_bayes_core::{generate_glyph_corpus, FeatureModel, SymbolTable, TestMode};

fn bench_classify_single_image(c: &mut Criterion) {
    let table = SymbolTable::binary();
    let corpus = generate_glyph_corpus(100, 0.1, 42, &table).unwrap();
    let model = FeatureModel::train(&corpus, 1.0).unwrap();
    let image = &corpus.group('0').unwrap()[0];

    c.bench_function("classify_single_image", |b| {
        b.iter(|| black_box(model.classify(&image.grid).unwrap()));
    });
}

fn bench_sequential_vs_concurrent(c: &mut Criterion) {
    let table = SymbolTable::binary();
    let mut group = c.benchmark_group("test_modes");

    for samples_per_class in [50, 200, 800].iter() {
        let corpus = generate_glyph_corpus(*samples_per_class, 0.1, 42, &table).unwrap();
        let model = FeatureModel::train(&corpus, 1.0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("sequential", samples_per_class),
            samples_per_class,
            |b, _| b.iter(|| black_box(model.test(&corpus, TestMode::Sequential).unwrap())),
        );
        group.bench_with_input(
            BenchmarkId::new("concurrent", samples_per_class),
            samples_per_class,
            |b, _| b.iter(|| black_box(model.test(&corpus, TestMode::Concurrent).unwrap())),
        );
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let table = SymbolTable::binary();
    let corpus = generate_glyph_corpus(400, 0.1, 42, &table).unwrap();

    c.bench_function("train_1600_images", |b| {
        b.iter(|| black_box(FeatureModel::train(&corpus, 1.0).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_classify_single_image,
    bench_sequential_vs_concurrent,
    bench_training
);
criterion_main!(benches);
