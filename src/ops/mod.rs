//! Algebraic operations dispatched by the storage schemes of the operands.
//!
//! Views take part as copies in their source's scheme, so every binary
//! operation only has to handle the dense/compressed-row pairs.

use crate::matrix::base::Matrix;
use crate::matrix::dense::DenseStorage;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::{Storage, StorageScheme};

pub mod arith;
pub mod operators;
pub mod solve;
pub mod transform;

pub use arith::{
    add, add_scalar, elementwise_multiply, multiply, multiply_scalar, negate, scalar_subtract, subtract,
    subtract_scalar,
};
pub use solve::{divide, divide_scalar, divide_with, numerical_rank};

/// Borrowed dense or compressed-row data of one operand.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Operand<'a> {
    Dense(&'a DenseStorage),
    Sparse(&'a SparseStorage),
}

impl Operand<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Operand::Dense(_) => "dense",
            Operand::Sparse(_) => "sparse",
        }
    }
}

/// Run `f` on the operand data of `m`.
pub(crate) fn with_operand<R>(m: &Matrix, f: impl FnOnce(Operand<'_>) -> R) -> R {
    let storage = m.storage();
    match &*storage {
        Storage::Dense(d) => f(Operand::Dense(d)),
        Storage::Sparse(s) => f(Operand::Sparse(s)),
        Storage::View(v) => match v.source_scheme() {
            StorageScheme::Dense => f(Operand::Dense(&v.to_dense())),
            StorageScheme::CompressedRow => f(Operand::Sparse(&v.to_sparse())),
        },
    }
}
