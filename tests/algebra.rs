//! Tests for the algebraic operations on random dense and sparse operands.
//!
//! Identities are checked across every pair of storage schemes; products and
//! divisions are compared against direct Faer computations.

use approx::assert_abs_diff_eq;
use faer::Mat;
use matrixcore::ops::{self, divide, divide_with};
use matrixcore::{Matrix, MatrixError, Selector, SolveOptions, StorageOrder};
use rand::Rng;

/// Random dense matrix with roughly half of its entries zero.
fn random_matrix(nrows: usize, ncols: usize) -> Matrix {
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..nrows * ncols)
        .map(|_| if rng.gen_bool(0.5) { 0.0 } else { rng.r#gen::<f64>() - 0.5 })
        .collect();
    Matrix::dense_from_vec(nrows, ncols, data, StorageOrder::ColumnMajor).unwrap()
}

fn to_faer(m: &Matrix) -> Mat<f64> {
    let data = m.to_column_major_vec();
    let n = m.nrows();
    Mat::from_fn(m.nrows(), m.ncols(), |i, j| data[i + j * n])
}

fn assert_close(a: &Matrix, b: &Matrix, eps: f64) {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()));
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(x, y, epsilon = eps);
    }
}

fn both_schemes(m: &Matrix) -> [Matrix; 2] {
    [m.to_dense(), m.to_sparse()]
}

/// `M + 0 == M`, `M * 1 == M` and `M * I == M` on both schemes.
#[test]
fn additive_and_multiplicative_identities() {
    for _ in 0..5 {
        let m = random_matrix(4, 3);
        for x in both_schemes(&m) {
            assert_eq!((&x + &Matrix::from(0.0)).unwrap(), m);
            assert_eq!((&x * &Matrix::from(1.0)).unwrap(), m);
            for i in both_schemes(&Matrix::identity(3).unwrap()) {
                assert_eq!((&x * &i).unwrap(), m);
            }
            assert_eq!(&x + 0.0, m);
            assert_eq!(&x * 1.0, m);
        }
    }
}

/// Sums, differences and products agree across every scheme pair.
#[test]
fn scheme_pairs_agree_with_faer() {
    let a = random_matrix(5, 4);
    let b = random_matrix(5, 4);
    let c = random_matrix(4, 3);
    let sum = &to_faer(&a) + &to_faer(&b);
    let product = &to_faer(&a) * &to_faer(&c);
    for x in both_schemes(&a) {
        for y in both_schemes(&b) {
            let s = ops::add(&x, &y).unwrap();
            for i in 0..5 {
                for j in 0..4 {
                    assert_abs_diff_eq!(s.get(i, j).unwrap(), sum[(i, j)], epsilon = 1e-12);
                }
            }
            let d = ops::subtract(&x, &y).unwrap();
            assert_close(&ops::add(&d, &y).unwrap(), &a, 1e-12);
        }
        for z in both_schemes(&c) {
            let p = ops::multiply(&x, &z).unwrap();
            for i in 0..5 {
                for j in 0..3 {
                    assert_abs_diff_eq!(p.get(i, j).unwrap(), product[(i, j)], epsilon = 1e-12);
                }
            }
        }
    }
}

/// Views take part in algebra as copies of the window they alias.
#[test]
fn views_as_operands() {
    let mut m = random_matrix(4, 4);
    let snapshot = m.clone();
    let v = m.view([0, 1], Selector::All).unwrap();
    let expected = snapshot.select([0, 1], Selector::All).unwrap();
    assert_eq!(ops::multiply_scalar(&v, 2.0), ops::multiply_scalar(&expected, 2.0));
    assert_eq!(ops::add(&v, &expected).unwrap(), ops::multiply_scalar(&expected, 2.0));
    assert_eq!(ops::negate(&v), -&expected);
}

/// Elementwise products need identical shapes.
#[test]
fn elementwise_product() {
    let a = random_matrix(3, 3);
    let b = random_matrix(3, 3);
    let h = ops::elementwise_multiply(&a.to_sparse(), &b).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(h.get(i, j).unwrap(), a.get(i, j).unwrap() * b.get(i, j).unwrap());
        }
    }
    let err = ops::elementwise_multiply(&a, &random_matrix(3, 2)).unwrap_err();
    assert!(matches!(err, MatrixError::DimensionMismatch { parameter: "right", .. }));
}

/// `(X · B) / B` recovers `X` for a well-conditioned square `B`.
#[test]
fn square_division_round_trip() {
    let n = 6;
    let x = random_matrix(3, n);
    // Diagonally dominant, hence nonsingular.
    let b = ops::add(&random_matrix(n, n), &ops::multiply_scalar(&Matrix::identity(n).unwrap(), n as f64)).unwrap();
    let a = ops::multiply(&x, &b).unwrap();
    assert_close(&divide(&a, &b).unwrap(), &x, 1e-9);
    assert_close(&(&a / &b.to_sparse()).unwrap(), &x, 1e-9);
}

/// A consistent overdetermined system is solved exactly by least squares.
#[test]
fn least_squares_division() {
    let x = Matrix::dense_from_rows(&[[2.0, -1.0]]).unwrap();
    let b = Matrix::dense_from_rows(&[[1.0, 2.0, 0.0, 1.0], [0.0, 1.0, 1.0, -1.0]]).unwrap();
    let a = ops::multiply(&x, &b).unwrap();
    assert_close(&divide(&a, &b).unwrap(), &x, 1e-10);
}

/// Rank-deficient divisors fail instead of returning NaNs.
#[test]
fn rank_deficient_division_fails() {
    let a = random_matrix(2, 3);
    let b = Matrix::dense_from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]).unwrap();
    let err = divide(&a, &b).unwrap_err();
    assert_eq!(err, MatrixError::RankDeficient { parameter: "right", rank: 2, required: 3 });

    let nearly = Matrix::dense_from_rows(&[[1.0, 0.0], [0.0, 1e-9]]).unwrap();
    let a = Matrix::dense_from_rows(&[[1.0, 1.0]]).unwrap();
    assert!(divide(&a, &nearly).is_ok());
    let strict = SolveOptions { rank_tolerance: Some(1e-6) };
    assert!(matches!(divide_with(&a, &nearly, &strict), Err(MatrixError::RankDeficient { .. })));
}

/// Transposing twice is the identity; the column-major 2x3 scenario transposes as expected.
#[test]
fn transpose_scenarios() {
    let m = Matrix::dense_from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], StorageOrder::ColumnMajor).unwrap();
    let t = m.transpose();
    let expected = Matrix::dense_from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    assert_eq!(t, expected);
    for _ in 0..5 {
        let r = random_matrix(3, 5);
        for x in both_schemes(&r) {
            assert_eq!(x.transpose().transpose(), r);
        }
    }
}

/// `find` distinguishes "no match" from a match list.
#[test]
fn find_and_vec() {
    let m = Matrix::dense_from_rows(&[[0.0, 3.0, 0.0], [3.0, 0.0, 1.0]]).unwrap();
    assert_eq!(m.find(3.0).map(|c| c.to_vec()), Some(vec![1, 2]));
    assert_eq!(m.find(-1.0), None);
    assert_eq!(m.to_sparse().find_nonzero().map(|c| c.to_vec()), Some(vec![1, 2, 5]));
    let v = m.vec();
    assert_eq!((v.nrows(), v.ncols()), (6, 1));
    assert_eq!(v.get_linear(5).unwrap(), 1.0);
    assert_eq!(m.vec_select([9]).unwrap_err().parameter(), Some("linear_indexes"));
}
