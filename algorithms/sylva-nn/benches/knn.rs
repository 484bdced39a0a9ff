use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use sylva::benchmarks::config;
use sylva::prelude::*;
use sylva_nn::{KNearestNeighbours, LinearSearch};

fn knn_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(40);
    let n_features = 3;

    let mut group = c.benchmark_group("knn");
    config::set_default_benchmark_configs(&mut group);

    for &n in &[1_000, 5_000, 20_000] {
        let points = Array2::random_using((n, n_features), Uniform::new(-500., 500.), &mut rng);
        let targets = Array1::random_using(n, Uniform::new(0., 3.), &mut rng).mapv(f64::trunc);
        let queries = Array2::random_using((100, n_features), Uniform::new(-500., 500.), &mut rng);

        group.bench_with_input(BenchmarkId::new("k_nearest", n), &points, |b, points| {
            let search = LinearSearch::from_batch(points);
            b.iter(|| {
                for query in queries.rows() {
                    search.k_nearest(&query, 10);
                }
            })
        });

        let model = KNearestNeighbours::params()
            .k(10)
            .fit(&Dataset::new(points, targets))
            .unwrap();
        group.bench_with_input(BenchmarkId::new("predict", n), &queries, |b, queries| {
            b.iter(|| model.predict(queries))
        });
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = knn_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, knn_bench);

criterion_main!(benches);
