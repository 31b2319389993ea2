//! Addition, subtraction, products and negation.
//!
//! Result schemes by operand pair:
//!
//! | left \ right | dense | sparse |
//! |---|---|---|
//! | dense  | dense | dense (sums, products), sparse (elementwise) |
//! | sparse | dense (sums, products), sparse (elementwise) | sparse |
//!
//! A 1×1 operand of `+`, `-` or `*` is treated as a scalar.

use crate::access::traits::{ElementAccess, MatShape};
use crate::error::{MatrixError, Result};
use crate::matrix::base::Matrix;
use crate::matrix::dense::DenseStorage;
use crate::matrix::names::AxisNames;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::Storage;
use crate::ops::{Operand, with_operand};
use faer::sparse::linalg::matmul::{dense_sparse_matmul, sparse_dense_matmul, sparse_sparse_matmul};
use faer::{Accum, Mat, Par};
use log::trace;

pub(crate) fn scalar_of(m: &Matrix) -> Option<f64> {
    if m.is_scalar() { Some(m.storage().get(0, 0)) } else { None }
}

fn check_same_shape(a: &Matrix, b: &Matrix) -> Result<()> {
    if (a.nrows, a.ncols) != (b.nrows, b.ncols) {
        return Err(MatrixError::mismatch(
            "right",
            format!("left is {}x{}, right is {}x{}", a.nrows, a.ncols, b.nrows, b.ncols),
        ));
    }
    Ok(())
}

/// `a + b`.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    combine(a, b, 1.0)
}

/// `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    combine(a, b, -1.0)
}

fn combine(a: &Matrix, b: &Matrix, sign: f64) -> Result<Matrix> {
    if let Some(s) = scalar_of(b) {
        return Ok(add_scalar(a, sign * s));
    }
    if let Some(s) = scalar_of(a) {
        return Ok(if sign > 0.0 { add_scalar(b, s) } else { scalar_subtract(s, b) });
    }
    check_same_shape(a, b)?;
    let storage = with_operand(a, |oa| {
        with_operand(b, |ob| {
            trace!("combine {} with {}", oa.kind(), ob.kind());
            match (oa, ob) {
                (Operand::Dense(x), Operand::Dense(y)) => {
                    let mut out = x.clone();
                    for (o, v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                        *o += sign * v;
                    }
                    Storage::Dense(out)
                }
                (Operand::Dense(x), Operand::Sparse(y)) => {
                    let mut out = x.clone();
                    for (i, j, v) in y.entries() {
                        out.set(i, j, out.get(i, j) + sign * v);
                    }
                    Storage::Dense(out)
                }
                (Operand::Sparse(x), Operand::Dense(y)) => {
                    let mut out = y.clone();
                    out.map_in_place(|v| sign * v);
                    for (i, j, v) in x.entries() {
                        out.set(i, j, out.get(i, j) + v);
                    }
                    Storage::Dense(out)
                }
                (Operand::Sparse(x), Operand::Sparse(y)) => {
                    let mut out = x.clone();
                    for (i, j, v) in y.entries() {
                        out.set(i, j, out.get(i, j) + sign * v);
                    }
                    Storage::Sparse(out)
                }
            }
        })
    });
    Ok(Matrix::from_storage(storage).with_names(a.names.clone()))
}

/// `m + s` for every element.
pub fn add_scalar(m: &Matrix, s: f64) -> Matrix {
    let storage = with_operand(m, |o| match o {
        Operand::Dense(d) => {
            let mut out = d.clone();
            out.map_in_place(|v| v + s);
            Storage::Dense(out)
        }
        Operand::Sparse(sp) if s == 0.0 => Storage::Sparse(sp.clone()),
        Operand::Sparse(sp) => {
            let mut out = sp.to_dense();
            out.map_in_place(|v| v + s);
            Storage::Dense(out)
        }
    });
    Matrix::from_storage(storage).with_names(m.names.clone())
}

/// `m - s` for every element.
pub fn subtract_scalar(m: &Matrix, s: f64) -> Matrix {
    add_scalar(m, -s)
}

/// `s - m` for every element.
pub fn scalar_subtract(s: f64, m: &Matrix) -> Matrix {
    add_scalar(&negate(m), s)
}

/// `m * s`; compressed-row input stays compressed.
pub fn multiply_scalar(m: &Matrix, s: f64) -> Matrix {
    let storage = with_operand(m, |o| match o {
        Operand::Dense(d) => {
            let mut out = d.clone();
            out.map_in_place(|v| v * s);
            Storage::Dense(out)
        }
        Operand::Sparse(sp) => Storage::Sparse(sp.map_nonzeros(|v| v * s)),
    });
    Matrix::from_storage(storage).with_names(m.names.clone())
}

/// `-m`, keeping the scheme.
pub fn negate(m: &Matrix) -> Matrix {
    let storage = with_operand(m, |o| match o {
        Operand::Dense(d) => {
            let mut out = d.clone();
            out.map_in_place(|v| -v);
            Storage::Dense(out)
        }
        Operand::Sparse(sp) => Storage::Sparse(sp.map_nonzeros(|v| -v)),
    });
    Matrix::from_storage(storage).with_names(m.names.clone())
}

/// Matrix product `a · b`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if let Some(s) = scalar_of(a) {
        return Ok(multiply_scalar(b, s));
    }
    if let Some(s) = scalar_of(b) {
        return Ok(multiply_scalar(a, s));
    }
    if a.ncols != b.nrows {
        return Err(MatrixError::mismatch(
            "right",
            format!("left has {} columns, right has {} rows", a.ncols, b.nrows),
        ));
    }
    let storage = with_operand(a, |oa| {
        with_operand(b, |ob| -> Result<Storage> {
            trace!("multiply {} by {}", oa.kind(), ob.kind());
            Ok(match (oa, ob) {
                (Operand::Dense(x), Operand::Dense(y)) => {
                    let (xa, ya) = (x.to_faer(), y.to_faer());
                    Storage::Dense(DenseStorage::from_faer(&(&xa * &ya)))
                }
                (Operand::Sparse(x), Operand::Dense(y)) => Storage::Dense(sparse_dense_product(x, y)),
                (Operand::Dense(x), Operand::Sparse(y)) => Storage::Dense(dense_sparse_product(x, y)),
                (Operand::Sparse(x), Operand::Sparse(y)) => Storage::Sparse(sparse_product(x, y)?),
            })
        })
    })?;
    let names = AxisNames { rows: a.names.rows.clone(), cols: b.names.cols.clone() };
    Ok(Matrix::from_storage(storage).with_names(names))
}

// Faer's sparse kernels take column-compressed operands. The transpose of a
// row-compressed matrix is its column-compressed form, so each product is
// computed transposed: (x·y)ᵀ = yᵀ·xᵀ.

fn sparse_dense_product(x: &SparseStorage, y: &DenseStorage) -> DenseStorage {
    let (xs, yf) = (x.to_faer(), y.to_faer());
    let mut out = Mat::<f64>::zeros(x.nrows(), y.ncols());
    dense_sparse_matmul(
        out.as_mut().transpose_mut(),
        Accum::Replace,
        yf.as_ref().transpose(),
        xs.transpose(),
        1.0,
        Par::Seq,
    );
    DenseStorage::from_faer(&out)
}

fn dense_sparse_product(x: &DenseStorage, y: &SparseStorage) -> DenseStorage {
    let (xf, ys) = (x.to_faer(), y.to_faer());
    let mut out = Mat::<f64>::zeros(x.nrows(), y.ncols());
    sparse_dense_matmul(
        out.as_mut().transpose_mut(),
        Accum::Replace,
        ys.transpose(),
        xf.as_ref().transpose(),
        1.0,
        Par::Seq,
    );
    DenseStorage::from_faer(&out)
}

/// Sparse product; entries that cancel to zero are dropped.
fn sparse_product(x: &SparseStorage, y: &SparseStorage) -> Result<SparseStorage> {
    let (xs, ys) = (x.to_faer(), y.to_faer());
    // Column `i` of the column-compressed result is row `i` of x·y.
    let product = sparse_sparse_matmul(ys.transpose(), xs.transpose(), 1.0, Par::Seq)
        .map_err(|e| MatrixError::Backend(format!("sparse product: {e:?}")))?;
    let symbolic = product.symbolic();
    Ok(SparseStorage::from_triplets(
        x.nrows(),
        y.ncols(),
        (0..x.nrows()).flat_map(|i| {
            symbolic
                .row_idx_of_col(i)
                .zip(product.val_of_col(i).iter().copied())
                .map(move |(j, v)| (i, j, v))
        }),
    ))
}

/// Hadamard product; shapes must match exactly.
pub fn elementwise_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_same_shape(a, b)?;
    let storage = with_operand(a, |oa| {
        with_operand(b, |ob| match (oa, ob) {
            (Operand::Dense(x), Operand::Dense(y)) => {
                let mut out = x.clone();
                for (o, v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                    *o *= v;
                }
                Storage::Dense(out)
            }
            (Operand::Sparse(x), other) => Storage::Sparse(masked_product(x, other)),
            (other, Operand::Sparse(y)) => Storage::Sparse(masked_product(y, other)),
        })
    });
    Ok(Matrix::from_storage(storage).with_names(a.names.clone()))
}

fn masked_product(mask: &SparseStorage, other: Operand<'_>) -> SparseStorage {
    let value = |i, j| match other {
        Operand::Dense(d) => d.get(i, j),
        Operand::Sparse(s) => s.get(i, j),
    };
    SparseStorage::from_triplets(
        mask.nrows(),
        mask.ncols(),
        mask.entries().map(|(i, j, v)| (i, j, v * value(i, j))),
    )
}
