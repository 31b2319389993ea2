//! Dense storage on top of a flat column-major buffer.
//!
//! `DenseStorage` keeps every element in a contiguous `Vec<f64>` in canonical
//! column-major order and converts to and from Faer matrices for algebra.

use crate::access::traits::{ElementAccess, MatShape, SubmatrixExtract};
use faer::Mat;

/// Order of a flat input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageOrder {
    RowMajor,
    #[default]
    ColumnMajor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DenseStorage {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl DenseStorage {
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, 0.0)
    }

    pub fn filled(nrows: usize, ncols: usize, value: f64) -> Self {
        DenseStorage { nrows, ncols, data: vec![value; nrows * ncols] }
    }

    /// Construct from raw column-major storage, adopting the buffer.
    ///
    /// The caller guarantees `data.len() == nrows * ncols`.
    pub fn from_raw(nrows: usize, ncols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), nrows * ncols);
        DenseStorage { nrows, ncols, data }
    }

    /// Construct from a buffer in either order.
    pub fn from_ordered(nrows: usize, ncols: usize, data: Vec<f64>, order: StorageOrder) -> Self {
        match order {
            StorageOrder::ColumnMajor => Self::from_raw(nrows, ncols, data),
            StorageOrder::RowMajor => {
                let mut out = Vec::with_capacity(data.len());
                for j in 0..ncols {
                    for i in 0..nrows {
                        out.push(data[i * ncols + j]);
                    }
                }
                Self::from_raw(nrows, ncols, out)
            }
        }
    }

    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        DenseStorage { nrows, ncols, data }
    }

    pub fn from_faer(m: &Mat<f64>) -> Self {
        Self::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)])
    }

    /// Owned Faer copy, for factorizations and products.
    pub fn to_faer(&self) -> Mat<f64> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.data[i + j * self.nrows])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Buffer in row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.data.len());
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                out.push(self.data[i + j * self.nrows]);
            }
        }
        out
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self.get(j, i))
    }

    /// Apply `f` to every element in place.
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        self.data.iter_mut().for_each(|v| *v = f(*v));
    }
}

impl MatShape for DenseStorage {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl ElementAccess for DenseStorage {
    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i + j * self.nrows]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i + j * self.nrows] = value;
    }

    fn get_linear(&self, k: usize) -> f64 {
        self.data[k]
    }

    fn set_linear(&mut self, k: usize, value: f64) {
        self.data[k] = value;
    }

    fn nonzero_positions(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        let (nrows, ncols) = (self.nrows, self.ncols);
        Box::new(
            (0..nrows)
                .flat_map(move |i| (0..ncols).map(move |j| (i, j)))
                .filter(move |&(i, j)| self.data[i + j * nrows] != 0.0),
        )
    }
}

impl SubmatrixExtract for DenseStorage {
    fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Self {
        Self::from_fn(rows.len(), cols.len(), |i, j| self.get(rows[i], cols[j]))
    }
}
