//! Non-owning read-only wrapper.
//!
//! `ReadOnlyMatrix` derefs to the wrapped `Matrix`, so every non-mutating
//! operation is available unchanged. Mutators exist on the wrapper only to
//! fail with `MatrixError::NotSupported`; storage is never copied.

use crate::error::{MatrixError, Result};
use crate::matrix::base::Matrix;
use std::fmt;
use std::ops::Deref;

const READ_ONLY: &str = "matrix is read-only";

#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyMatrix<'a> {
    inner: &'a Matrix,
}

impl<'a> ReadOnlyMatrix<'a> {
    pub fn new(inner: &'a Matrix) -> Self {
        ReadOnlyMatrix { inner }
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn set(&mut self, _row: usize, _col: usize, _value: f64) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn set_linear(&mut self, _index: usize, _value: f64) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn set_name(&mut self, _name: Option<String>) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn set_row_name(&mut self, _row: usize, _name: impl Into<String>) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn set_column_name(&mut self, _col: usize, _name: impl Into<String>) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn remove_row_name(&mut self, _row: usize) -> Result<bool> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn remove_column_name(&mut self, _col: usize) -> Result<bool> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn clear_row_names(&mut self) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn clear_column_names(&mut self) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn transpose_in_place(&mut self) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn apply_in_place(&mut self, _f: impl Fn(f64) -> f64) -> Result<()> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    pub fn view(&mut self, _rows: impl Into<crate::Selector>, _cols: impl Into<crate::Selector>) -> Result<Matrix> {
        Err(MatrixError::NotSupported(READ_ONLY))
    }

    /// The wrapped matrix.
    pub fn inner(&self) -> &'a Matrix {
        self.inner
    }
}

impl Deref for ReadOnlyMatrix<'_> {
    type Target = Matrix;
    fn deref(&self) -> &Matrix {
        self.inner
    }
}

impl fmt::Display for ReadOnlyMatrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner, f)
    }
}
