//! The three storage backends behind one tagged variant.
//!
//! `Storage` is matched exhaustively wherever behaviour differs per backend.
//! Every matrix owns its storage through a [`StorageCell`], which also keeps
//! weak handles to the cells of views aliasing it. When a cell is dropped
//! (the owning matrix is disposed) each live dependent view is materialized
//! into an independent dense copy before the data goes away.

use crate::access::traits::{ElementAccess, MatShape, SubmatrixExtract};
use crate::matrix::dense::DenseStorage;
use crate::matrix::sparse::SparseStorage;
use crate::matrix::view::ViewStorage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Storage scheme tag, as written by the binary serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageScheme {
    Dense,
    CompressedRow,
}

#[derive(Debug)]
pub enum Storage {
    Dense(DenseStorage),
    Sparse(SparseStorage),
    View(ViewStorage),
}

impl Storage {
    /// Scheme of the data actually holding the values; views report their
    /// source's scheme.
    pub fn scheme(&self) -> StorageScheme {
        match self {
            Storage::Dense(_) => StorageScheme::Dense,
            Storage::Sparse(_) => StorageScheme::CompressedRow,
            Storage::View(v) => v.source_scheme(),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Storage::View(_))
    }

    /// Independent dense copy.
    pub fn to_dense(&self) -> DenseStorage {
        match self {
            Storage::Dense(d) => d.clone(),
            Storage::Sparse(s) => s.to_dense(),
            Storage::View(v) => v.to_dense(),
        }
    }

    /// Independent sparse copy.
    pub fn to_sparse(&self) -> SparseStorage {
        match self {
            Storage::Dense(d) => SparseStorage::from_dense(d),
            Storage::Sparse(s) => s.clone(),
            Storage::View(v) => v.to_sparse(),
        }
    }

    /// Independent copy in the same scheme; views copy into their source's scheme.
    pub fn to_owned_storage(&self) -> Storage {
        match self {
            Storage::Dense(d) => Storage::Dense(d.clone()),
            Storage::Sparse(s) => Storage::Sparse(s.clone()),
            Storage::View(v) => match v.source_scheme() {
                StorageScheme::Dense => Storage::Dense(v.to_dense()),
                StorageScheme::CompressedRow => Storage::Sparse(v.to_sparse()),
            },
        }
    }

    /// Copy of the selected window, in the scheme of the data.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Storage {
        match self {
            Storage::Dense(d) => Storage::Dense(d.submatrix(rows, cols)),
            Storage::Sparse(s) => Storage::Sparse(s.submatrix(rows, cols)),
            Storage::View(v) => v.select(rows, cols),
        }
    }

    /// Number of stored nonzeros (dense and view count nonzero values).
    pub fn nonzero_count(&self) -> usize {
        match self {
            Storage::Sparse(s) => s.nnz(),
            other => other.nonzero_positions().count(),
        }
    }
}

impl MatShape for Storage {
    fn nrows(&self) -> usize {
        match self {
            Storage::Dense(d) => d.nrows(),
            Storage::Sparse(s) => s.nrows(),
            Storage::View(v) => v.nrows(),
        }
    }
    fn ncols(&self) -> usize {
        match self {
            Storage::Dense(d) => d.ncols(),
            Storage::Sparse(s) => s.ncols(),
            Storage::View(v) => v.ncols(),
        }
    }
}

impl ElementAccess for Storage {
    fn get(&self, i: usize, j: usize) -> f64 {
        match self {
            Storage::Dense(d) => d.get(i, j),
            Storage::Sparse(s) => s.get(i, j),
            Storage::View(v) => v.get(i, j),
        }
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        match self {
            Storage::Dense(d) => d.set(i, j, value),
            Storage::Sparse(s) => s.set(i, j, value),
            Storage::View(v) => v.set(i, j, value),
        }
    }

    fn get_linear(&self, k: usize) -> f64 {
        match self {
            Storage::Dense(d) => d.get_linear(k),
            Storage::Sparse(s) => s.get_linear(k),
            Storage::View(v) => v.get_linear(k),
        }
    }

    fn set_linear(&mut self, k: usize, value: f64) {
        match self {
            Storage::Dense(d) => d.set_linear(k, value),
            Storage::Sparse(s) => s.set_linear(k, value),
            Storage::View(v) => v.set_linear(k, value),
        }
    }

    fn nonzero_positions(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        match self {
            Storage::Dense(d) => d.nonzero_positions(),
            Storage::Sparse(s) => s.nonzero_positions(),
            Storage::View(v) => v.nonzero_positions(),
        }
    }
}

/// Owning slot for one matrix's storage plus the views that alias it.
pub(crate) struct StorageCell {
    storage: RefCell<Storage>,
    dependents: RefCell<Vec<Weak<StorageCell>>>,
}

impl StorageCell {
    pub(crate) fn new(storage: Storage) -> Rc<Self> {
        Rc::new(StorageCell {
            storage: RefCell::new(storage),
            dependents: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Storage> {
        self.storage.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Storage> {
        self.storage.borrow_mut()
    }

    /// Record `view` as aliasing this cell.
    pub(crate) fn register(&self, view: &Rc<StorageCell>) {
        let mut deps = self.dependents.borrow_mut();
        deps.retain(is_live_view);
        deps.push(Rc::downgrade(view));
    }

    /// Dependents that still alias this cell. A view that was dropped, or
    /// whose storage was replaced by its own copy, no longer counts.
    pub(crate) fn live_dependents(&self) -> usize {
        self.dependents.borrow().iter().filter(|w| is_live_view(w)).count()
    }

    /// Turn every live dependent view into an independent dense copy.
    pub(crate) fn release_dependents(&self) {
        let deps = std::mem::take(&mut *self.dependents.borrow_mut());
        if deps.is_empty() {
            return;
        }
        let source = self.storage.borrow();
        let mut released = 0;
        for dep in deps.iter().filter_map(Weak::upgrade) {
            let mut slot = dep.storage.borrow_mut();
            let copy = match &*slot {
                Storage::View(v) => v.materialize_from(&source),
                _ => continue,
            };
            *slot = Storage::Dense(copy);
            released += 1;
        }
        if released > 0 {
            debug!("materialized {released} view(s) of a {}x{} source", source.nrows(), source.ncols());
        }
    }
}

fn is_live_view(dep: &Weak<StorageCell>) -> bool {
    dep.upgrade()
        .is_some_and(|cell| cell.storage.try_borrow().map_or(true, |s| s.is_view()))
}

impl Drop for StorageCell {
    fn drop(&mut self) {
        self.release_dependents();
    }
}

impl fmt::Debug for StorageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCell")
            .field("storage", &*self.storage.borrow())
            .field("dependents", &self.live_dependents())
            .finish()
    }
}
