//! Element and row enumeration, plus observable row views.

use crate::access::selector::Selector;
use crate::access::traits::ElementAccess;
use crate::config::options::RenderOptions;
use crate::error::{MatrixError, Result, check_index};
use crate::matrix::base::Matrix;
use std::fmt;

/// Column-major iterator over every element.
pub struct Elements<'a> {
    matrix: &'a Matrix,
    next: usize,
}

impl Iterator for Elements<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.matrix.count() {
            return None;
        }
        let v = self.matrix.storage().get_linear(self.next);
        self.next += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.count() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Elements<'_> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    Exhausted,
}

/// Forward-only cursor over the elements in column-major order.
///
/// Reading `current` before the first `move_next` or after the last one
/// fails; `reset` returns to the start.
pub struct MatrixCursor<'a> {
    matrix: &'a Matrix,
    position: Position,
}

impl MatrixCursor<'_> {
    /// Advance; returns false once the elements are exhausted.
    pub fn move_next(&mut self) -> bool {
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::At(k) => k + 1,
            Position::Exhausted => return false,
        };
        if next < self.matrix.count() {
            self.position = Position::At(next);
            true
        } else {
            self.position = Position::Exhausted;
            false
        }
    }

    pub fn current(&self) -> Result<f64> {
        match self.position {
            Position::At(k) => Ok(self.matrix.storage().get_linear(k)),
            Position::BeforeFirst => Err(MatrixError::NoCurrentElement("before the first element")),
            Position::Exhausted => Err(MatrixError::NoCurrentElement("past the last element")),
        }
    }

    /// Linear index of the current element.
    pub fn index(&self) -> Option<usize> {
        match self.position {
            Position::At(k) => Some(k),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.position = Position::BeforeFirst;
    }
}

/// Each row as an independent 1×n copy.
pub struct Rows<'a> {
    matrix: &'a Matrix,
    next: usize,
    all_cols: Vec<usize>,
}

impl Iterator for Rows<'_> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        if self.next >= self.matrix.nrows() {
            return None;
        }
        let row = self.matrix.select_resolved(&[self.next], &self.all_cols);
        self.next += 1;
        Some(row)
    }
}

impl Matrix {
    pub fn iter(&self) -> Elements<'_> {
        Elements { matrix: self, next: 0 }
    }

    pub fn cursor(&self) -> MatrixCursor<'_> {
        MatrixCursor { matrix: self, position: Position::BeforeFirst }
    }

    pub fn rows(&self) -> Rows<'_> {
        Rows { matrix: self, next: 0, all_cols: (0..self.ncols()).collect() }
    }

    /// Observable view aliasing row `row`.
    pub fn row_view(&mut self, row: usize) -> Result<RowView> {
        check_index(row, self.nrows(), "row_index")?;
        let view = self.view(row, Selector::All)?;
        Ok(RowView { row, view, subscribers: Vec::new(), next_id: 0 })
    }
}

impl<'a> IntoIterator for &'a Matrix {
    type Item = f64;
    type IntoIter = Elements<'a>;
    fn into_iter(self) -> Elements<'a> {
        self.iter()
    }
}

/// Notification sent to row-view subscribers after a write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowChanged {
    pub row: usize,
    pub column: usize,
    pub old: f64,
    pub new: f64,
}

/// Handle returned by `RowView::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Callback = Box<dyn FnMut(&RowChanged)>;

/// One row of a matrix, aliased; writes go to the source and are announced
/// to subscribers. Subscriptions live as long as the row view.
pub struct RowView {
    row: usize,
    view: Matrix,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: usize,
}

impl RowView {
    /// Row index in the source matrix.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn len(&self) -> usize {
        self.view.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, col: usize) -> Result<f64> {
        self.view.get(0, col)
    }

    pub fn set(&mut self, col: usize, value: f64) -> Result<()> {
        let old = self.view.get(0, col)?;
        self.view.set(0, col, value)?;
        let change = RowChanged { row: self.row, column: col, old, new: value };
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&change);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&RowChanged) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Independent 1×n copy of the current values.
    pub fn to_matrix(&self) -> Matrix {
        self.view.clone()
    }
}

impl fmt::Display for RowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.view.render_row(0, &RenderOptions::default()))
    }
}

impl fmt::Debug for RowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowView")
            .field("row", &self.row)
            .field("values", &self.view.to_column_major_vec())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
