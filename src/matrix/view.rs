//! Aliasing window into another matrix's storage.
//!
//! A view is a `(source, row map, column map)` triple. It never owns data:
//! every read and write goes through the maps into the source cell. The
//! source handle is weak; the source materializes the view before it is
//! dropped (see `StorageCell::release_dependents`), so a live view always
//! finds its source.

use crate::access::traits::{ElementAccess, MatShape};
use crate::matrix::dense::DenseStorage;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::{Storage, StorageCell, StorageScheme};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

#[derive(Debug)]
pub struct ViewStorage {
    source: Weak<StorageCell>,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl ViewStorage {
    pub(crate) fn new(source: &Rc<StorageCell>, rows: Vec<usize>, cols: Vec<usize>) -> Self {
        ViewStorage { source: Rc::downgrade(source), rows, cols }
    }

    /// The aliased cell.
    pub(crate) fn source(&self) -> Rc<StorageCell> {
        match self.source.upgrade() {
            Some(cell) => cell,
            None => unreachable!("view outlived its source without being materialized"),
        }
    }

    /// Maps a window of this view onto source coordinates.
    pub(crate) fn compose(&self, rows: &[usize], cols: &[usize]) -> (Vec<usize>, Vec<usize>) {
        (
            rows.iter().map(|&i| self.rows[i]).collect(),
            cols.iter().map(|&j| self.cols[j]).collect(),
        )
    }

    fn with_source<R>(&self, f: impl FnOnce(&Storage) -> R) -> R {
        let cell = self.source();
        let storage = cell.borrow();
        f(&storage)
    }

    fn with_source_mut<R>(&self, f: impl FnOnce(&mut Storage) -> R) -> R {
        let cell = self.source();
        let mut storage = cell.borrow_mut();
        f(&mut storage)
    }

    pub fn source_scheme(&self) -> StorageScheme {
        self.with_source(|s| s.scheme())
    }

    /// Dense copy of the window read from `source`.
    pub(crate) fn materialize_from(&self, source: &Storage) -> DenseStorage {
        DenseStorage::from_fn(self.rows.len(), self.cols.len(), |i, j| {
            source.get(self.rows[i], self.cols[j])
        })
    }

    pub fn to_dense(&self) -> DenseStorage {
        self.with_source(|s| self.materialize_from(s))
    }

    pub fn to_sparse(&self) -> SparseStorage {
        match self.with_source(|s| s.select(&self.rows, &self.cols)) {
            Storage::Sparse(sp) => sp,
            other => other.to_sparse(),
        }
    }

    /// Copy of a window of this view in the source's scheme.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Storage {
        let (rows, cols) = self.compose(rows, cols);
        self.with_source(|s| s.select(&rows, &cols))
    }

    /// Apply `f` once to every distinct source cell the view covers.
    ///
    /// Repeated indices alias the same source cell, which must not be mapped twice.
    pub fn apply_in_place(&self, f: impl Fn(f64) -> f64) {
        let cells: BTreeSet<(usize, usize)> = self
            .rows
            .iter()
            .flat_map(|&i| self.cols.iter().map(move |&j| (i, j)))
            .collect();
        self.with_source_mut(|s| {
            for (i, j) in cells {
                let v = s.get(i, j);
                s.set(i, j, f(v));
            }
        });
    }
}

impl MatShape for ViewStorage {
    fn nrows(&self) -> usize {
        self.rows.len()
    }
    fn ncols(&self) -> usize {
        self.cols.len()
    }
}

impl ElementAccess for ViewStorage {
    fn get(&self, i: usize, j: usize) -> f64 {
        self.with_source(|s| s.get(self.rows[i], self.cols[j]))
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        let (r, c) = (self.rows[i], self.cols[j]);
        self.with_source_mut(|s| s.set(r, c, value));
    }

    fn nonzero_positions(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        let positions: Vec<(usize, usize)> = self.with_source(|s| {
            (0..self.rows.len())
                .flat_map(|i| (0..self.cols.len()).map(move |j| (i, j)))
                .filter(|&(i, j)| s.get(self.rows[i], self.cols[j]) != 0.0)
                .collect()
        });
        Box::new(positions.into_iter())
    }
}
