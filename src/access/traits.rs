//! Core storage traits for matrixcore.

/// Shape of a two-dimensional store.
pub trait MatShape {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Number of logical elements.
    fn count(&self) -> usize {
        self.nrows() * self.ncols()
    }
}

/// Element access shared by every storage backend.
///
/// Indices are assumed to be in range; bounds are checked once at the
/// `Matrix` boundary.
pub trait ElementAccess: MatShape {
    /// Read the element at `(i, j)`.
    fn get(&self, i: usize, j: usize) -> f64;

    /// Write the element at `(i, j)`.
    fn set(&mut self, i: usize, j: usize, value: f64);

    /// Read by column-major linear index `i + j * nrows`.
    fn get_linear(&self, k: usize) -> f64 {
        let n = self.nrows();
        self.get(k % n, k / n)
    }

    /// Write by column-major linear index.
    fn set_linear(&mut self, k: usize, value: f64) {
        let n = self.nrows();
        self.set(k % n, k / n, value)
    }

    /// Positions of stored nonzero entries, row by row.
    fn nonzero_positions(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_>;
}

/// Copy a rectangular selection into a new store of the same kind.
pub trait SubmatrixExtract {
    /// Rows and columns are taken in the order given; repeats are allowed.
    fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Self;
}
