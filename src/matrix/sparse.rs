// Row-compressed sparse storage.
//
// Each nonempty row keeps its nonzero column indices sorted, with values
// alongside. Empty rows take no space, so the row count is only an index
// bound. Explicit zeros are never stored: writing 0.0 removes the entry.
// Bulk arithmetic converts to Faer's `SparseRowMat` (see `to_faer`).

use crate::access::traits::{ElementAccess, MatShape, SubmatrixExtract};
use crate::matrix::dense::DenseStorage;
use faer::sparse::{SparseRowMat, SymbolicSparseRowMat};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct SparseRow {
    cols: Vec<usize>,
    vals: Vec<f64>,
}

impl SparseRow {
    fn with_capacity(capacity: usize) -> Self {
        SparseRow { cols: Vec::with_capacity(capacity), vals: Vec::with_capacity(capacity) }
    }

    fn entries(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cols.iter().copied().zip(self.vals.iter().copied())
    }

    fn get(&self, j: usize) -> Option<f64> {
        self.cols.binary_search(&j).ok().map(|k| self.vals[k])
    }
}

#[derive(Debug, Clone)]
pub struct SparseStorage {
    nrows: usize,
    ncols: usize,
    row_capacity: usize,
    rows: BTreeMap<usize, SparseRow>,
}

impl SparseStorage {
    /// Empty store; `capacity` is a hint for the total number of nonzeros,
    /// spread evenly over the rows as they are first written.
    pub fn new(nrows: usize, ncols: usize, capacity: usize) -> Self {
        SparseStorage {
            nrows,
            ncols,
            row_capacity: capacity.div_ceil(nrows.max(1)),
            rows: BTreeMap::new(),
        }
    }

    /// Build from raw `row_ptr`, `col_idx` and `values` arrays.
    ///
    /// Column indices inside a row may come in any order; zeros are dropped
    /// and repeated positions keep the last value. The arrays must describe
    /// a valid `nrows x ncols` pattern; Faer panics otherwise.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: &[usize],
        col_idx: &[usize],
        values: &[f64],
    ) -> Self {
        let symbolic =
            SymbolicSparseRowMat::new_unsorted_checked(nrows, ncols, row_ptr.to_vec(), None, col_idx.to_vec());
        Self::from_faer(&SparseRowMat::new(symbolic, values.to_vec()))
    }

    /// Copy of a Faer CSR matrix; explicit zeros are dropped.
    pub fn from_faer(m: &SparseRowMat<usize, f64>) -> Self {
        let symbolic = m.symbolic();
        let mut out = Self::new(symbolic.nrows(), symbolic.ncols(), m.val().len());
        for i in 0..symbolic.nrows() {
            for (j, &v) in symbolic.col_idx_of_row(i).zip(m.val_of_row(i)) {
                out.set(i, j, v);
            }
        }
        out
    }

    /// Faer CSR copy with sorted rows and no explicit zeros.
    pub fn to_faer(&self) -> SparseRowMat<usize, f64> {
        let (row_ptr, col_idx, values) = self.to_csr();
        let symbolic = SymbolicSparseRowMat::new_checked(self.nrows, self.ncols, row_ptr, None, col_idx);
        SparseRowMat::new(symbolic, values)
    }

    /// Raw CSR arrays `(row_ptr, col_idx, values)`.
    pub fn to_csr(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        let mut row_ptr = Vec::with_capacity(self.nrows + 1);
        row_ptr.push(0);
        let mut col_idx = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());
        for (&i, row) in &self.rows {
            row_ptr.resize(i + 1, col_idx.len());
            col_idx.extend_from_slice(&row.cols);
            values.extend_from_slice(&row.vals);
            row_ptr.push(col_idx.len());
        }
        row_ptr.resize(self.nrows + 1, col_idx.len());
        (row_ptr, col_idx, values)
    }

    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut out = Self::new(nrows, ncols, 0);
        for (i, j, v) in triplets {
            out.set(i, j, v);
        }
        out
    }

    pub fn from_dense(dense: &DenseStorage) -> Self {
        let mut out = Self::new(dense.nrows(), dense.ncols(), 0);
        // Row-by-row scan: each row receives its columns in ascending order.
        for (i, j) in dense.nonzero_positions() {
            out.push(i, j, dense.get(i, j));
        }
        out
    }

    pub fn to_dense(&self) -> DenseStorage {
        let mut out = DenseStorage::zeros(self.nrows, self.ncols);
        for (i, j, v) in self.entries() {
            out.set(i, j, v);
        }
        out
    }

    /// Number of stored nonzeros.
    pub fn nnz(&self) -> usize {
        self.rows.values().map(|r| r.cols.len()).sum()
    }

    /// Nonzeros of row `i` as `(column, value)`, ascending by column.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows.get(&i).into_iter().flat_map(|r| r.entries())
    }

    /// All nonzeros as `(row, column, value)`, row by row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&i, row)| row.entries().map(move |(j, v)| (i, j, v)))
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.ncols, self.nrows, self.nnz());
        // Rows are visited in ascending order, so every target row stays sorted.
        for (i, j, v) in self.entries() {
            out.push(j, i, v);
        }
        out
    }

    /// Map every stored value; results equal to zero are dropped.
    pub fn map_nonzeros(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = Self::new(self.nrows, self.ncols, self.nnz());
        for (i, j, v) in self.entries() {
            let w = f(v);
            if w != 0.0 {
                out.push(i, j, w);
            }
        }
        out
    }

    pub fn map_nonzeros_in_place(&mut self, f: impl Fn(f64) -> f64) {
        *self = self.map_nonzeros(f);
    }

    /// Append a nonzero to row `i`; `j` must exceed every column already stored there.
    fn push(&mut self, i: usize, j: usize, value: f64) {
        let capacity = self.row_capacity;
        let row = self.rows.entry(i).or_insert_with(|| SparseRow::with_capacity(capacity));
        row.cols.push(j);
        row.vals.push(value);
    }
}

impl PartialEq for SparseStorage {
    fn eq(&self, other: &Self) -> bool {
        (self.nrows, self.ncols) == (other.nrows, other.ncols) && self.rows == other.rows
    }
}

impl MatShape for SparseStorage {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl ElementAccess for SparseStorage {
    fn get(&self, i: usize, j: usize) -> f64 {
        self.rows.get(&i).and_then(|row| row.get(j)).unwrap_or(0.0)
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        if value == 0.0 {
            let Some(row) = self.rows.get_mut(&i) else { return };
            if let Ok(k) = row.cols.binary_search(&j) {
                row.cols.remove(k);
                row.vals.remove(k);
            }
            if row.cols.is_empty() {
                self.rows.remove(&i);
            }
            return;
        }
        let capacity = self.row_capacity;
        let row = self.rows.entry(i).or_insert_with(|| SparseRow::with_capacity(capacity));
        match row.cols.binary_search(&j) {
            Ok(k) => row.vals[k] = value,
            Err(k) => {
                row.cols.insert(k, j);
                row.vals.insert(k, value);
            }
        }
    }

    fn nonzero_positions(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        Box::new(self.entries().map(|(i, j, _)| (i, j)))
    }
}

impl SubmatrixExtract for SparseStorage {
    fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut out = Self::new(rows.len(), cols.len(), 0);
        for (r, &i) in rows.iter().enumerate() {
            let Some(row) = self.rows.get(&i) else { continue };
            for (c, &j) in cols.iter().enumerate() {
                if let Some(v) = row.get(j) {
                    out.push(r, c, v);
                }
            }
        }
        out
    }
}
