//! Criterion benchmarks for local forest training and batch prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use treesweep_forest::ForestConfig;

fn make_pixels(n_samples: usize, n_bands: usize, n_classes: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<i64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class as i64);
        let row = (0..n_bands)
            .map(|b| {
                let base = if b < 3 { class as f64 * 3.0 } else { 0.0 };
                base + rng.r#gen::<f64>() * 0.5
            })
            .collect();
        samples.push(row);
    }
    (samples, labels)
}

fn bench_train(c: &mut Criterion) {
    let (samples, labels) = make_pixels(1000, 8, 5, 42);
    for n_trees in [10, 100] {
        let config = ForestConfig::new(n_trees).unwrap().with_seed(42);
        c.bench_function(&format!("forest_train_1000x8_{n_trees}trees"), |b| {
            b.iter(|| config.fit(&samples, &labels).unwrap());
        });
    }
}

fn bench_predict(c: &mut Criterion) {
    let (samples, labels) = make_pixels(1000, 8, 5, 42);
    let (pixels, _) = make_pixels(10_000, 8, 5, 7);
    let forest = ForestConfig::new(100).unwrap().with_seed(42).fit(&samples, &labels).unwrap();
    c.bench_function("forest_predict_10000px_100trees", |b| {
        b.iter(|| forest.predict_batch(&pixels).unwrap());
    });
}

criterion_group!(benches, bench_train, bench_predict);
criterion_main!(benches);
