use criterion::{criterion_group, criterion_main, Criterion};

use cmr::matrix::Matrix;
use cmr::params::Params;
use cmr::stats::Statistics;

fn bench_tu_test_identity(c: &mut Criterion) {
    let n = 32;
    let mut entries = vec![0i8; n * n];
    for i in 0..n {
        entries[i * n + i] = 1;
    }
    let matrix: Matrix<i8> = Matrix::from_dense(n, n, &entries).unwrap();
    c.bench_function("tu_test identity_32", |b| {
        b.iter(|| {
            let mut stats = Statistics::default();
            cmr::tu_test(&matrix, Params::default(), &mut stats).unwrap()
        })
    });
}

criterion_group!(benches, bench_tu_test_identity);
criterion_main!(benches);
