//! Benchmarks for neighborhood search and prediction
//!
//! Run with: cargo bench --package knn
//!
//! Uses the MovieLens 100k u1 split when present, synthetic ratings otherwise.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{RatingRecord, RatingStore};
use knn::Predictor;
use std::path::Path;
use std::sync::Arc;

fn load_test_data() -> Arc<RatingStore> {
    let data_dir = Path::new("../../data/ml-100k");
    if let Ok(store) = RatingStore::load(data_dir, Some("u1")) {
        return Arc::new(store);
    }

    // 500 users x 200 movies, deterministic pseudo-random ratings
    let records = (1..=500u32)
        .flat_map(|u| {
            (1..=200u32)
                .filter(move |m| (u * 7 + m * 13) % 5 == 0)
                .map(move |m| RatingRecord::new(u, m, ((u + m) % 5 + 1) as i32, 0))
        })
        .collect();
    Arc::new(RatingStore::new(records, None))
}

fn bench_cold_neighborhood(c: &mut Criterion) {
    let store = load_test_data();

    c.bench_function("cold_neighborhood", |b| {
        b.iter(|| {
            // Fresh predictor each time so nothing is cached
            let mut predictor = Predictor::new(Arc::clone(&store));
            black_box(predictor.neighborhood(black_box(1)).len())
        })
    });
}

fn bench_warm_predict(c: &mut Criterion) {
    let store = load_test_data();
    let mut predictor = Predictor::new(Arc::clone(&store));
    predictor.predict(1, 1);

    c.bench_function("warm_predict", |b| {
        b.iter(|| black_box(predictor.predict(black_box(1), black_box(1))))
    });
}

criterion_group!(benches, bench_cold_neighborhood, bench_warm_predict);
criterion_main!(benches);
