//! Latency benchmarks for single-row inference
//!
//! Run with: cargo bench -p phishguard-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use phishguard_classifiers::{
    analyze, FeatureClassifier, FeatureVector, GradientBoostedClassifier, FEATURE_COUNT,
};

const FIXTURE: &str = include_str!("../tests/fixtures/phishing_model.json");

fn benchmark_inference(c: &mut Criterion) {
    let model = GradientBoostedClassifier::from_json_str(FIXTURE).expect("fixture model");

    let test_cases = vec![
        ("clean", FeatureVector::new(vec![0.0; FEATURE_COUNT]).unwrap()),
        (
            "suspicious",
            FeatureVector::from_named([("ip", 1.0), ("login_form", 1.0), ("phish_hints", 4.0)])
                .unwrap(),
        ),
    ];

    let mut group = c.benchmark_group("GradientBoosted_Inference");
    group.sample_size(100);

    for (name, features) in &test_cases {
        group.bench_with_input(BenchmarkId::new("classify", name), features, |b, features| {
            b.iter(|| model.classify(black_box(features)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("analyze", name), features, |b, features| {
            b.iter(|| analyze(&model, black_box(features)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_model_parse(c: &mut Criterion) {
    c.bench_function("parse_fixture_model", |b| {
        b.iter(|| GradientBoostedClassifier::from_json_str(black_box(FIXTURE)).unwrap());
    });
}

criterion_group!(benches, benchmark_inference, benchmark_model_parse);
criterion_main!(benches);
