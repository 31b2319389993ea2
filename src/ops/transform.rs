//! Transpose, elementwise maps, flattening and search.

use crate::access::selector::{IndexCollection, Selector};
use crate::access::traits::{ElementAccess, MatShape};
use crate::error::Result;
use crate::matrix::base::Matrix;
use crate::matrix::dense::DenseStorage;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::Storage;
use crate::ops::{Operand, with_operand};
use log::trace;

impl Matrix {
    /// Transposed copy in the same scheme, row and column names swapped.
    pub fn transpose(&self) -> Matrix {
        let storage = with_operand(self, |o| match o {
            Operand::Dense(d) => Storage::Dense(d.transpose()),
            Operand::Sparse(s) => Storage::Sparse(s.transpose()),
        });
        Matrix::from_storage(storage).with_names(self.names.transposed())
    }

    /// Transpose this matrix in place.
    ///
    /// A view stops aliasing its source and becomes a transposed copy in the
    /// source's scheme. Views of this matrix are materialized first and keep
    /// the pre-transpose values.
    pub fn transpose_in_place(&mut self) {
        let transposed = with_operand(self, |o| match o {
            Operand::Dense(d) => Storage::Dense(d.transpose()),
            Operand::Sparse(s) => Storage::Sparse(s.transpose()),
        });
        trace!("transposing {}x{} in place", self.nrows, self.ncols);
        self.replace_storage(transposed);
        self.names = self.names.transposed();
    }

    /// New matrix with `f` applied to every element.
    ///
    /// Compressed-row input stays compressed when `f(0) == 0`, touching only
    /// the stored entries; otherwise the result is dense.
    pub fn apply(&self, f: impl Fn(f64) -> f64) -> Matrix {
        let storage = with_operand(self, |o| match o {
            Operand::Dense(d) => {
                let mut out = d.clone();
                out.map_in_place(&f);
                Storage::Dense(out)
            }
            Operand::Sparse(s) if f(0.0) == 0.0 => Storage::Sparse(s.map_nonzeros(&f)),
            Operand::Sparse(s) => {
                let mut out = s.to_dense();
                out.map_in_place(&f);
                Storage::Dense(out)
            }
        });
        Matrix::from_storage(storage).with_names(self.names.clone())
    }

    /// Apply `f` to every element in place.
    ///
    /// On a view the source elements are written, each aliased element once.
    /// Compressed-row storage becomes dense when `f(0) != 0`; its views are
    /// then materialized with the values they held before the map.
    pub fn apply_in_place(&mut self, f: impl Fn(f64) -> f64) {
        let densify = {
            let mut storage = self.storage_mut();
            match &mut *storage {
                Storage::Dense(d) => {
                    d.map_in_place(&f);
                    false
                }
                Storage::Sparse(s) if f(0.0) == 0.0 => {
                    s.map_nonzeros_in_place(&f);
                    false
                }
                Storage::Sparse(_) => true,
                Storage::View(v) => {
                    v.apply_in_place(&f);
                    false
                }
            }
        };
        if densify {
            let mut dense = self.storage().to_dense();
            dense.map_in_place(&f);
            self.replace_storage(Storage::Dense(dense));
        }
    }

    /// Column-major flattening into a `count × 1` column in the same scheme.
    pub fn vec(&self) -> Matrix {
        let storage = with_operand(self, |o| match o {
            Operand::Dense(d) => Storage::Dense(DenseStorage::from_raw(d.as_slice().len(), 1, d.as_slice().to_vec())),
            Operand::Sparse(s) => {
                let nrows = s.nrows();
                Storage::Sparse(SparseStorage::from_triplets(
                    self.count(),
                    1,
                    s.entries().map(|(i, j, v)| (i + j * nrows, 0, v)),
                ))
            }
        });
        Matrix::from_storage(storage)
    }

    /// The elements at the selected linear indices, in selector order, as a
    /// column in the same scheme.
    pub fn vec_select(&self, indices: impl Into<Selector>) -> Result<Matrix> {
        let picked = indices.into().resolve(self.count(), "linear_indexes")?;
        let n = picked.len();
        let storage = with_operand(self, |o| match o {
            Operand::Dense(d) => {
                Storage::Dense(DenseStorage::from_raw(n, 1, picked.iter().map(|&k| d.get_linear(k)).collect()))
            }
            Operand::Sparse(s) => Storage::Sparse(SparseStorage::from_triplets(
                n,
                1,
                picked.iter().enumerate().map(|(i, &k)| (i, 0, s.get_linear(k))),
            )),
        });
        Ok(Matrix::from_storage(storage))
    }

    /// Linear indices, ascending, of the elements equal to `value`.
    ///
    /// `None` when nothing matches.
    pub fn find(&self, value: f64) -> Option<IndexCollection> {
        self.find_where(|v| v == value)
    }

    /// Linear indices, ascending, of the nonzero elements.
    pub fn find_nonzero(&self) -> Option<IndexCollection> {
        let storage = self.storage();
        let nrows = self.nrows;
        let mut found: Vec<usize> = storage.nonzero_positions().map(|(i, j)| i + j * nrows).collect();
        found.sort_unstable();
        (!found.is_empty()).then(|| IndexCollection::new(found))
    }

    /// Linear indices, ascending, of the elements satisfying `pred`.
    pub fn find_where(&self, pred: impl Fn(f64) -> bool) -> Option<IndexCollection> {
        let found: IndexCollection = self
            .iter()
            .enumerate()
            .filter(|&(_, v)| pred(v))
            .map(|(k, _)| k)
            .collect();
        (!found.is_empty()).then_some(found)
    }
}
