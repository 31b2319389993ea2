//! The logical matrix type.
//!
//! `Matrix` owns exactly one storage backend and routes every public
//! operation to it. All arguments are validated here, before any mutation,
//! so the backends can assume in-range indices.

use crate::access::selector::Selector;
use crate::access::traits::{ElementAccess, MatShape};
use crate::error::{MatrixError, Result, check_index, check_positive};
use crate::matrix::dense::{DenseStorage, StorageOrder};
use crate::matrix::names::AxisNames;
use crate::matrix::readonly::ReadOnlyMatrix;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::{Storage, StorageCell, StorageScheme};
use crate::matrix::view::ViewStorage;
use log::debug;
use std::cell::{Ref, RefMut};
use std::rc::Rc;

/// A two-dimensional `f64` matrix with dense, compressed-row or view storage.
#[derive(Debug)]
pub struct Matrix {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) name: Option<String>,
    pub(crate) names: AxisNames,
    pub(crate) cell: Rc<StorageCell>,
}

impl Matrix {
    pub(crate) fn from_storage(storage: Storage) -> Self {
        Matrix {
            nrows: storage.nrows(),
            ncols: storage.ncols(),
            name: None,
            names: AxisNames::default(),
            cell: StorageCell::new(storage),
        }
    }

    pub(crate) fn with_names(mut self, names: AxisNames) -> Self {
        self.names = names;
        self
    }

    pub(crate) fn storage(&self) -> Ref<'_, Storage> {
        self.cell.borrow()
    }

    pub(crate) fn storage_mut(&self) -> RefMut<'_, Storage> {
        self.cell.borrow_mut()
    }

    /// Swap in new storage. Views aliasing this matrix are materialized from
    /// the old storage first, whatever the new shape.
    pub(crate) fn replace_storage(&mut self, storage: Storage) {
        let (nrows, ncols) = (storage.nrows(), storage.ncols());
        self.cell.release_dependents();
        *self.cell.borrow_mut() = storage;
        self.nrows = nrows;
        self.ncols = ncols;
    }

    // ---- construction ----

    /// `nrows × ncols` dense matrix of zeros.
    pub fn dense(nrows: usize, ncols: usize) -> Result<Self> {
        Self::dense_filled(nrows, ncols, 0.0)
    }

    pub fn dense_filled(nrows: usize, ncols: usize, value: f64) -> Result<Self> {
        check_positive(nrows, "rows")?;
        check_positive(ncols, "columns")?;
        Ok(Self::from_storage(Storage::Dense(DenseStorage::filled(nrows, ncols, value))))
    }

    /// Dense matrix adopting `data` as its buffer.
    ///
    /// Row-major input is reordered into the canonical column-major layout.
    pub fn dense_from_vec(nrows: usize, ncols: usize, data: Vec<f64>, order: StorageOrder) -> Result<Self> {
        check_positive(nrows, "rows")?;
        check_positive(ncols, "columns")?;
        if data.len() != nrows * ncols {
            return Err(MatrixError::mismatch(
                "data",
                format!("expected {} values for {nrows}x{ncols}, got {}", nrows * ncols, data.len()),
            ));
        }
        Ok(Self::from_storage(Storage::Dense(DenseStorage::from_ordered(nrows, ncols, data, order))))
    }

    /// Dense matrix copying `data`.
    pub fn dense_from_slice(nrows: usize, ncols: usize, data: &[f64], order: StorageOrder) -> Result<Self> {
        Self::dense_from_vec(nrows, ncols, data.to_vec(), order)
    }

    /// Dense matrix from a two-dimensional array, one inner slice per row.
    pub fn dense_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        check_positive(nrows, "rows")?;
        let ncols = rows[0].as_ref().len();
        check_positive(ncols, "columns")?;
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.as_ref().len() != ncols) {
            return Err(MatrixError::mismatch(
                "data",
                format!("row {i} has {} values, row 0 has {ncols}", r.as_ref().len()),
            ));
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::dense_from_vec(nrows, ncols, data, StorageOrder::RowMajor)
    }

    /// Empty compressed-row matrix; `capacity` is a nonzero-count hint.
    pub fn sparse(nrows: usize, ncols: usize, capacity: usize) -> Result<Self> {
        check_positive(nrows, "rows")?;
        check_positive(ncols, "columns")?;
        Ok(Self::from_storage(Storage::Sparse(SparseStorage::new(nrows, ncols, capacity))))
    }

    /// Compressed-row matrix from raw `(row_ptr, col_idx, values)` arrays.
    ///
    /// Zeros are dropped and a repeated position keeps its last value.
    pub fn sparse_from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: &[usize],
        col_idx: &[usize],
        values: &[f64],
    ) -> Result<Self> {
        check_positive(nrows, "rows")?;
        check_positive(ncols, "columns")?;
        if row_ptr.len() != nrows + 1 || row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(MatrixError::mismatch(
                "row_ptr",
                format!("expected {} non-decreasing offsets starting at 0", nrows + 1),
            ));
        }
        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz || values.len() != nnz {
            return Err(MatrixError::mismatch(
                "values",
                format!("row_ptr ends at {nnz}, got {} columns and {} values", col_idx.len(), values.len()),
            ));
        }
        if let Some(&bad) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(MatrixError::IndexOutOfRange { parameter: "col_idx", index: bad, bound: ncols });
        }
        let storage = SparseStorage::from_csr(nrows, ncols, row_ptr, col_idx, values);
        Ok(Self::from_storage(Storage::Sparse(storage)))
    }

    /// Square compressed-row matrix with `values` on the diagonal.
    ///
    /// `values` must be a row or column vector.
    pub fn diagonal(values: &Matrix) -> Result<Self> {
        if !values.is_vector() {
            return Err(MatrixError::mismatch(
                "values",
                format!("expected a vector, got {}x{}", values.nrows, values.ncols),
            ));
        }
        Self::diagonal_from_slice(&values.to_column_major_vec())
    }

    pub fn diagonal_from_slice(values: &[f64]) -> Result<Self> {
        let n = values.len();
        check_positive(n, "dimension")?;
        let storage = SparseStorage::from_triplets(n, n, values.iter().enumerate().map(|(i, &v)| (i, i, v)));
        Ok(Self::from_storage(Storage::Sparse(storage)))
    }

    /// `n × n` identity in compressed-row storage.
    pub fn identity(n: usize) -> Result<Self> {
        check_positive(n, "dimension")?;
        Self::diagonal_from_slice(&vec![1.0; n])
    }

    /// Explicitly dispose of this matrix.
    ///
    /// Views aliasing it are turned into independent dense copies.
    pub fn dispose(self) {
        debug!("disposing {}x{} matrix", self.nrows, self.ncols);
        drop(self);
    }

    // ---- shape and identity ----

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of logical elements, `nrows * ncols`.
    pub fn count(&self) -> usize {
        self.nrows * self.ncols
    }

    pub fn is_read_only(&self) -> bool {
        false
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn storage_scheme(&self) -> StorageScheme {
        self.storage().scheme()
    }

    /// True while this matrix aliases another matrix's storage.
    pub fn is_view(&self) -> bool {
        self.storage().is_view()
    }

    pub fn nonzero_count(&self) -> usize {
        self.storage().nonzero_count()
    }

    // ---- element access ----

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        check_index(row, self.nrows, "row_index")?;
        check_index(col, self.ncols, "column_index")?;
        Ok(self.storage().get(row, col))
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        check_index(row, self.nrows, "row_index")?;
        check_index(col, self.ncols, "column_index")?;
        self.storage_mut().set(row, col, value);
        Ok(())
    }

    /// Read by column-major linear index `row + col * nrows`.
    pub fn get_linear(&self, index: usize) -> Result<f64> {
        check_index(index, self.count(), "linear_index")?;
        Ok(self.storage().get_linear(index))
    }

    pub fn set_linear(&mut self, index: usize, value: f64) -> Result<()> {
        check_index(index, self.count(), "linear_index")?;
        self.storage_mut().set_linear(index, value);
        Ok(())
    }

    // ---- selection ----

    /// Copy of the rows and columns picked by the selectors.
    ///
    /// Names on selected indices follow them to their new positions. With
    /// both selectors `All` the result is a copy of the whole matrix.
    pub fn select(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Matrix> {
        let (rows, cols) = (rows.into(), cols.into());
        let whole = rows.is_all() && cols.is_all();
        let rows = rows.resolve(self.nrows, "row_indexes")?;
        let cols = cols.resolve(self.ncols, "column_indexes")?;
        let mut out = self.select_resolved(&rows, &cols);
        if whole {
            out.name = self.name.clone();
        }
        Ok(out)
    }

    pub(crate) fn select_resolved(&self, rows: &[usize], cols: &[usize]) -> Matrix {
        let storage = self.storage().select(rows, cols);
        Matrix::from_storage(storage).with_names(self.names.select(rows, cols))
    }

    /// Writable view aliasing the selected window of this matrix.
    ///
    /// Reads and writes go through to this matrix's storage until it is
    /// disposed, at which point the view becomes an independent dense copy.
    pub fn view(&mut self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Matrix> {
        let rows = rows.into().resolve(self.nrows, "row_indexes")?;
        let cols = cols.into().resolve(self.ncols, "column_indexes")?;
        let (source, row_map, col_map) = match &*self.storage() {
            Storage::View(v) => {
                let (r, c) = v.compose(&rows, &cols);
                (v.source(), r, c)
            }
            _ => (Rc::clone(&self.cell), rows.clone(), cols.clone()),
        };
        let cell = StorageCell::new(Storage::View(ViewStorage::new(&source, row_map, col_map)));
        source.register(&cell);
        debug!("created {}x{} view over a {}x{} source", rows.len(), cols.len(), self.nrows, self.ncols);
        Ok(Matrix {
            nrows: rows.len(),
            ncols: cols.len(),
            name: None,
            names: self.names.select(&rows, &cols),
            cell,
        })
    }

    /// `view` when `as_view` is set, `select` otherwise.
    pub fn select_with(&mut self, rows: impl Into<Selector>, cols: impl Into<Selector>, as_view: bool) -> Result<Matrix> {
        if as_view { self.view(rows, cols) } else { self.select(rows, cols) }
    }

    // ---- conversions ----

    /// All elements in column-major order.
    pub fn to_column_major_vec(&self) -> Vec<f64> {
        match &*self.storage() {
            Storage::Dense(d) => d.as_slice().to_vec(),
            other => other.to_dense().into_vec(),
        }
    }

    pub fn to_row_major_vec(&self) -> Vec<f64> {
        self.storage().to_dense().to_row_major()
    }

    /// Independent dense copy, names included.
    pub fn to_dense(&self) -> Matrix {
        let storage = Storage::Dense(self.storage().to_dense());
        self.copy_labels_onto(Matrix::from_storage(storage))
    }

    /// Independent compressed-row copy, names included.
    pub fn to_sparse(&self) -> Matrix {
        let storage = Storage::Sparse(self.storage().to_sparse());
        self.copy_labels_onto(Matrix::from_storage(storage))
    }

    /// Raw compressed-row arrays `(row_ptr, col_idx, values)` of the values.
    pub fn to_csr(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        match &*self.storage() {
            Storage::Sparse(s) => s.to_csr(),
            other => other.to_sparse().to_csr(),
        }
    }

    fn copy_labels_onto(&self, mut out: Matrix) -> Matrix {
        out.name = self.name.clone();
        out.names = self.names.clone();
        out
    }

    /// Non-owning read-only wrapper sharing this matrix's storage.
    pub fn as_read_only(&self) -> ReadOnlyMatrix<'_> {
        ReadOnlyMatrix::new(self)
    }

    /// Number of live views aliasing this matrix.
    pub fn view_count(&self) -> usize {
        self.cell.live_dependents()
    }
}

impl Clone for Matrix {
    /// Independent copy; a view clones into its source's scheme.
    fn clone(&self) -> Self {
        Matrix {
            nrows: self.nrows,
            ncols: self.ncols,
            name: self.name.clone(),
            names: self.names.clone(),
            cell: StorageCell::new(self.storage().to_owned_storage()),
        }
    }
}

impl PartialEq for Matrix {
    /// Equal shape, elements and row/column names. The matrix name and the
    /// storage scheme are not compared.
    fn eq(&self, other: &Matrix) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols || self.names != other.names {
            return false;
        }
        let (a, b) = (self.storage(), other.storage());
        (0..self.count()).all(|k| a.get_linear(k) == b.get_linear(k))
    }
}

impl From<f64> for Matrix {
    /// 1×1 dense matrix.
    fn from(value: f64) -> Self {
        Matrix::from_storage(Storage::Dense(DenseStorage::filled(1, 1, value)))
    }
}

impl TryFrom<&Matrix> for f64 {
    type Error = MatrixError;

    fn try_from(m: &Matrix) -> Result<f64> {
        if m.count() != 1 {
            return Err(MatrixError::mismatch(
                "value",
                format!("only a 1x1 matrix converts to a scalar, got {}x{}", m.nrows, m.ncols),
            ));
        }
        Ok(m.storage().get(0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_is_zero_filled() {
        let m = Matrix::dense(2, 3).unwrap();
        assert_eq!((m.nrows(), m.ncols(), m.count()), (2, 3, 6));
        assert!(m.to_column_major_vec().iter().all(|&v| v == 0.0));
        assert_eq!(m.storage_scheme(), StorageScheme::Dense);
    }

    #[test]
    fn non_positive_dimensions_name_parameter() {
        assert_eq!(Matrix::dense(0, 3).unwrap_err(), MatrixError::NonPositive { parameter: "rows" });
        assert_eq!(Matrix::sparse(3, 0, 5).unwrap_err(), MatrixError::NonPositive { parameter: "columns" });
        assert_eq!(Matrix::identity(0).unwrap_err(), MatrixError::NonPositive { parameter: "dimension" });
    }

    #[test]
    fn data_length_checked() {
        let err = Matrix::dense_from_vec(2, 2, vec![1.0; 3], StorageOrder::ColumnMajor).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { parameter: "data", .. }));
        let err = Matrix::dense_from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { parameter: "data", .. }));
    }

    #[test]
    fn linear_index_is_column_major() {
        let m = Matrix::dense_from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.get_linear(1).unwrap(), 4.0);
        assert_eq!(m.get_linear(2).unwrap(), 2.0);
        assert_eq!(m.get(1, 2).unwrap(), 6.0);
        assert!(matches!(
            m.get_linear(6),
            Err(MatrixError::IndexOutOfRange { parameter: "linear_index", index: 6, bound: 6 })
        ));
    }

    #[test]
    fn scalar_conversion_requires_one_by_one() {
        let m = Matrix::from(2.5);
        assert_eq!(f64::try_from(&m).unwrap(), 2.5);
        let err = f64::try_from(&Matrix::dense(1, 2).unwrap()).unwrap_err();
        assert_eq!(err.parameter(), Some("value"));
    }

    #[test]
    fn csr_arrays_are_checked() {
        let m = Matrix::sparse_from_csr(2, 3, &[0, 2, 3], &[2, 0, 1], &[5.0, 1.0, 2.0]).unwrap();
        assert_eq!(m.get(0, 2).unwrap(), 5.0);
        assert_eq!(m.to_csr(), (vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 5.0, 2.0]));
        assert_eq!(m.to_dense().to_csr(), m.to_csr());

        let bad_ptr = Matrix::sparse_from_csr(2, 3, &[0, 2], &[0, 1], &[1.0, 1.0]).unwrap_err();
        assert_eq!(bad_ptr.parameter(), Some("row_ptr"));
        let bad_col = Matrix::sparse_from_csr(1, 2, &[0, 1], &[2], &[1.0]).unwrap_err();
        assert_eq!(bad_col, MatrixError::IndexOutOfRange { parameter: "col_idx", index: 2, bound: 2 });
    }

    #[test]
    fn clone_of_view_is_independent() {
        let mut m = Matrix::dense_filled(2, 2, 1.0).unwrap();
        let v = m.view(Selector::All, 0).unwrap();
        let c = v.clone();
        m.set(0, 0, 9.0).unwrap();
        assert_eq!(v.get(0, 0).unwrap(), 9.0);
        assert_eq!(c.get(0, 0).unwrap(), 1.0);
        assert!(!c.is_view());
    }
}
