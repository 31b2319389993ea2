//! Optional row and column labels.

use crate::access::selector::ALL_TOKEN;
use crate::error::{MatrixError, Result, check_index};
use crate::matrix::base::Matrix;
use std::collections::BTreeMap;

/// Sparse index → label maps for both axes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisNames {
    pub(crate) rows: BTreeMap<usize, String>,
    pub(crate) cols: BTreeMap<usize, String>,
}

impl AxisNames {
    /// Labels with the axes exchanged.
    pub fn transposed(&self) -> Self {
        AxisNames { rows: self.cols.clone(), cols: self.rows.clone() }
    }

    /// Labels for a selection: the name of source index `map[k]` lands on `k`.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        AxisNames { rows: renumber(&self.rows, rows), cols: renumber(&self.cols, cols) }
    }
}

pub(crate) fn renumber(names: &BTreeMap<usize, String>, map: &[usize]) -> BTreeMap<usize, String> {
    if names.is_empty() {
        return BTreeMap::new();
    }
    map.iter()
        .enumerate()
        .filter_map(|(k, src)| names.get(src).map(|n| (k, n.clone())))
        .collect()
}

/// Reject empty, whitespace-only and reserved names.
pub fn validate_name(name: &str, parameter: &'static str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MatrixError::InvalidName {
            parameter,
            reason: "name must not be empty or whitespace",
        });
    }
    if name == ALL_TOKEN {
        return Err(MatrixError::InvalidName {
            parameter,
            reason: "name is the reserved all-indexes token \":\"",
        });
    }
    Ok(())
}

/// Cut `name` to `width` characters, appending `marker` when cut.
pub fn truncate_name(name: &str, width: usize, marker: char) -> String {
    if name.chars().count() <= width {
        return name.to_owned();
    }
    let mut out: String = name.chars().take(width).collect();
    out.push(marker);
    out
}

impl Matrix {
    /// Label row `row`; `:` and blank names are rejected.
    pub fn set_row_name(&mut self, row: usize, name: impl Into<String>) -> Result<()> {
        check_index(row, self.nrows, "row_index")?;
        let name = name.into();
        validate_name(&name, "row_name")?;
        self.names.rows.insert(row, name);
        Ok(())
    }

    pub fn set_column_name(&mut self, col: usize, name: impl Into<String>) -> Result<()> {
        check_index(col, self.ncols, "column_index")?;
        let name = name.into();
        validate_name(&name, "column_name")?;
        self.names.cols.insert(col, name);
        Ok(())
    }

    /// Name of row `row`, or `None` when it has none or is out of range.
    pub fn try_get_row_name(&self, row: usize) -> Option<&str> {
        self.names.rows.get(&row).map(String::as_str)
    }

    pub fn try_get_column_name(&self, col: usize) -> Option<&str> {
        self.names.cols.get(&col).map(String::as_str)
    }

    /// Remove the name of one row; returns whether it had one.
    pub fn remove_row_name(&mut self, row: usize) -> Result<bool> {
        check_index(row, self.nrows, "row_index")?;
        Ok(self.names.rows.remove(&row).is_some())
    }

    pub fn remove_column_name(&mut self, col: usize) -> Result<bool> {
        check_index(col, self.ncols, "column_index")?;
        Ok(self.names.cols.remove(&col).is_some())
    }

    pub fn clear_row_names(&mut self) {
        self.names.rows.clear();
    }

    pub fn clear_column_names(&mut self) {
        self.names.cols.clear();
    }

    pub fn has_row_names(&self) -> bool {
        !self.names.rows.is_empty()
    }

    pub fn has_column_names(&self) -> bool {
        !self.names.cols.is_empty()
    }

    /// Named rows as `(index, name)`, ascending by index.
    pub fn row_names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.rows.iter().map(|(&i, n)| (i, n.as_str()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.cols.iter().map(|(&j, n)| (j, n.as_str()))
    }
}
