//! Criterion benchmarks for fossil-rf: Random Forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fossil_rf::RandomForestConfig;

/// One-hot encoded sales over `n_families` x `n_parts` categories.
fn make_sales(
    n_samples: usize,
    n_families: usize,
    n_parts: usize,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let family = rng.gen_range(0..n_families);
        let part = rng.gen_range(0..n_parts);
        let mut row = vec![0.0; n_families + n_parts];
        row[family] = 1.0;
        row[n_families + part] = 1.0;
        features.push(row);
        targets.push(1000.0 * (family + 1) as f64 + 250.0 * part as f64 + rng.r#gen::<f64>() * 100.0);
    }
    let names: Vec<String> = (0..n_families + n_parts).map(|f| format!("f{f}")).collect();
    (features, targets, names)
}

fn bench_rf_train(c: &mut Criterion) {
    let (features, targets, names) = make_sales(1000, 30, 12, 42);
    let cfg = RandomForestConfig::new(200).unwrap();

    c.bench_function("rf_train_1000x42_200trees", |b| {
        b.iter(|| cfg.fit(&features, &targets, &names).unwrap());
    });
}

fn bench_rf_predict_per_tree(c: &mut Criterion) {
    let (features, targets, names) = make_sales(1000, 30, 12, 42);
    let forest = RandomForestConfig::new(200)
        .unwrap()
        .fit(&features, &targets, &names)
        .unwrap()
        .into_forest();
    let sample = features[0].clone();

    c.bench_function("rf_predict_per_tree_200trees", |b| {
        b.iter(|| forest.predict_per_tree(&sample).unwrap());
    });
}

criterion_group!(benches, bench_rf_train, bench_rf_predict_per_tree);
criterion_main!(benches);
