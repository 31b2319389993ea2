//! Right division `A / B`: solve `X · B = A` for `X`.
//!
//! Square divisors go through a full-pivoting LU factorization from Faer.
//! Rectangular divisors go through a Householder QR of whichever of `B`,
//! `Bᵀ` is tall: with more columns than rows the residual `‖X·B − A‖` is
//! minimized, with more rows than columns the minimum-norm solution is
//! returned. A divisor whose numerical rank, counted from its singular
//! values, falls short of `min(rows, cols)` is rejected before any
//! factorization.

use crate::access::traits::MatShape;
use crate::config::options::SolveOptions;
use crate::error::{MatrixError, Result};
use crate::matrix::base::Matrix;
use crate::matrix::dense::DenseStorage;
use crate::matrix::names::AxisNames;
use crate::matrix::storage::Storage;
use crate::ops::arith::{multiply_scalar, scalar_of};
use faer::linalg::solvers::{FullPivLu, Qr, SolveCore, SolveLstsqCore};
use faer::linalg::triangular_solve::solve_lower_triangular_in_place;
use faer::{Conj, Mat, Par};
use log::debug;

/// `A / B` with the default rank tolerance.
pub fn divide(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    divide_with(a, b, &SolveOptions::default())
}

/// `A / s`, elementwise. A zero divisor has rank 0 and is rejected like a
/// 1×1 zero matrix.
pub fn divide_scalar(a: &Matrix, s: f64) -> Result<Matrix> {
    if s == 0.0 {
        return Err(MatrixError::RankDeficient { parameter: "right", rank: 0, required: 1 });
    }
    Ok(multiply_scalar(a, 1.0 / s))
}

/// `A / B` with explicit solve options.
///
/// The result is dense, takes its row names from `a` and its column names
/// from the row names of `b`.
pub fn divide_with(a: &Matrix, b: &Matrix, opts: &SolveOptions) -> Result<Matrix> {
    if let Some(s) = scalar_of(b) {
        return divide_scalar(a, s);
    }
    if a.ncols() != b.ncols() {
        return Err(MatrixError::mismatch(
            "right",
            format!("left has {} columns, right has {} columns", a.ncols(), b.ncols()),
        ));
    }

    let bd = b.storage().to_dense();
    let (k, n) = (bd.nrows(), bd.ncols());
    let required = k.min(n);
    let rank = numerical_rank(&bd, opts.rank_tolerance)?;
    if rank < required {
        debug!("rejecting {k}x{n} divisor of rank {rank}");
        return Err(MatrixError::RankDeficient { parameter: "right", rank, required });
    }

    let ad = a.storage().to_dense();
    let at = ad.transpose().to_faer();
    let xt = if k == n {
        debug!("right division by a square {n}x{n} divisor");
        lu_solve(&bd.transpose().to_faer(), at)
    } else if k < n {
        debug!("least-squares right division by a {k}x{n} divisor");
        least_squares(&bd.transpose().to_faer(), at)
    } else {
        debug!("minimum-norm right division by a {k}x{n} divisor");
        minimum_norm(&bd.to_faer(), at)
    };

    let x = DenseStorage::from_faer(&xt).transpose();
    let finite_inputs = ad.as_slice().iter().chain(bd.as_slice()).all(|v| v.is_finite());
    if finite_inputs && !x.as_slice().iter().all(|v| v.is_finite()) {
        return Err(MatrixError::RankDeficient { parameter: "right", rank, required });
    }

    let names = AxisNames { rows: a.names.rows.clone(), cols: b.names.rows.clone() };
    Ok(Matrix::from_storage(Storage::Dense(x)).with_names(names))
}

/// Solve `m · X = rhs` in place of `rhs`.
fn lu_solve(m: &Mat<f64>, mut rhs: Mat<f64>) -> Mat<f64> {
    let lu = FullPivLu::new(m.as_ref());
    lu.solve_in_place_with_conj(Conj::No, rhs.as_mut());
    rhs
}

/// Least-squares solution of `m · X = rhs` for a tall `m` of full column rank.
fn least_squares(m: &Mat<f64>, mut rhs: Mat<f64>) -> Mat<f64> {
    let qr = Qr::new(m.as_ref());
    qr.solve_lstsq_in_place_with_conj(Conj::No, rhs.as_mut());
    rhs.as_ref().subrows(0, m.ncols()).to_owned()
}

/// Minimum-norm solution of `mᵀ · X = rhs` for a tall `m` of full column rank.
///
/// With `m = Q·R`, `X = Q · R⁻ᵀ · rhs`.
fn minimum_norm(m: &Mat<f64>, mut rhs: Mat<f64>) -> Mat<f64> {
    let qr = Qr::new(m.as_ref());
    solve_lower_triangular_in_place(qr.thin_R().transpose(), rhs.as_mut(), Par::Seq);
    let q = qr.compute_thin_Q();
    &q * &rhs
}

/// Rank from the singular values of `m`.
///
/// A singular value counts when it exceeds `tolerance`; without one the
/// threshold is `max(rows, cols) · ε · σmax`.
pub fn numerical_rank(m: &DenseStorage, tolerance: Option<f64>) -> Result<usize> {
    let (nrows, ncols) = (m.nrows(), m.ncols());
    let sigma = m
        .to_faer()
        .as_ref()
        .singular_values()
        .map_err(|e| MatrixError::Backend(format!("singular values of {nrows}x{ncols}: {e:?}")))?;
    let largest = sigma.iter().copied().fold(0.0_f64, f64::max);
    let tol = tolerance.unwrap_or(nrows.max(ncols) as f64 * f64::EPSILON * largest);
    Ok(sigma.iter().filter(|&&s| s > tol).count())
}
