use criterion::{black_box, Criterion, criterion_group, criterion_main};
use matrixcore::ops::{divide, multiply};
use matrixcore::{Matrix, StorageOrder};

fn banded(n: usize) -> Matrix {
    let mut m = Matrix::sparse(n, n, 3 * n).unwrap();
    for i in 0..n {
        m.set(i, i, 4.0).unwrap();
        if i + 1 < n {
            m.set(i, i + 1, -1.0).unwrap();
            m.set(i + 1, i, -1.0).unwrap();
        }
    }
    m
}

fn bench_products(c: &mut Criterion) {
    let n = 200;
    let sparse = banded(n);
    let dense = sparse.to_dense();
    let data: Vec<f64> = (0..n * n).map(|i| (i as f64).sin()).collect();
    let full = Matrix::dense_from_vec(n, n, data, StorageOrder::ColumnMajor).unwrap();

    c.bench_function("dense x dense", |ben| {
        ben.iter(|| multiply(black_box(&dense), black_box(&full)).unwrap())
    });

    c.bench_function("sparse x dense", |ben| {
        ben.iter(|| multiply(black_box(&sparse), black_box(&full)).unwrap())
    });

    c.bench_function("sparse x sparse", |ben| {
        ben.iter(|| multiply(black_box(&sparse), black_box(&sparse)).unwrap())
    });

    c.bench_function("right division", |ben| {
        ben.iter(|| divide(black_box(&full), black_box(&dense)).unwrap())
    });
}

criterion_group!(benches, bench_products);
criterion_main!(benches);
