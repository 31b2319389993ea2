//! Row and column selectors.
//!
//! A [`Selector`] is resolved once, against the bound of the axis it selects
//! from, into a plain ordered list of indices. Explicit collections keep their
//! order and duplicates, so the same API expresses permutation, repetition
//! and masking.

use crate::error::{MatrixError, Result, check_index};
use std::fmt;
use std::ops::Deref;

/// Reserved token meaning "every index on this axis".
pub const ALL_TOKEN: &str = ":";

/// Ordered list of zero-based indices; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IndexCollection {
    indices: Vec<usize>,
}

impl IndexCollection {
    pub fn new(indices: Vec<usize>) -> Self {
        IndexCollection { indices }
    }

    /// `first..=last`, ascending or descending.
    pub fn range(first: usize, last: usize) -> Self {
        let indices = if first <= last {
            (first..=last).collect()
        } else {
            (last..=first).rev().collect()
        };
        IndexCollection { indices }
    }

    /// `first, first ± step, ...` up to and including `last` when reached.
    ///
    /// The direction follows the sign of `last - first`.
    pub fn sequence(first: usize, step: usize, last: usize) -> Result<Self> {
        if step == 0 {
            return Err(MatrixError::NonPositive { parameter: "step" });
        }
        let indices = if first <= last {
            (first..=last).step_by(step).collect()
        } else {
            let mut out = Vec::new();
            let mut k = first;
            loop {
                out.push(k);
                match k.checked_sub(step) {
                    Some(next) if next >= last => k = next,
                    _ => break,
                }
            }
            out
        };
        Ok(IndexCollection { indices })
    }

    /// Largest index in the collection.
    pub fn max(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Replace the index at `position`; the collection never changes length.
    pub fn set(&mut self, position: usize, index: usize) -> Result<()> {
        check_index(position, self.indices.len(), "position")?;
        self.indices[position] = index;
        Ok(())
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }
}

impl Deref for IndexCollection {
    type Target = [usize];
    fn deref(&self) -> &[usize] {
        &self.indices
    }
}

impl From<Vec<usize>> for IndexCollection {
    fn from(indices: Vec<usize>) -> Self {
        IndexCollection { indices }
    }
}

impl From<&[usize]> for IndexCollection {
    fn from(indices: &[usize]) -> Self {
        IndexCollection {
            indices: indices.to_vec(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for IndexCollection {
    fn from(indices: [usize; N]) -> Self {
        IndexCollection {
            indices: indices.to_vec(),
        }
    }
}

impl FromIterator<usize> for IndexCollection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        IndexCollection {
            indices: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for IndexCollection {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;
    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

impl<'a> IntoIterator for &'a IndexCollection {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;
    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

impl fmt::Display for IndexCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, i) in self.indices.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{i}")?;
        }
        write!(f, "]")
    }
}

/// Which indexes of one axis to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A single index.
    Index(usize),
    /// An explicit ordered collection.
    Indices(IndexCollection),
    /// Every index of the axis, ascending.
    All,
}

impl Selector {
    /// Resolve against an axis of length `bound`.
    ///
    /// Explicit collections are returned exactly as supplied, neither sorted
    /// nor deduplicated.
    pub fn resolve(&self, bound: usize, parameter: &'static str) -> Result<Vec<usize>> {
        match self {
            Selector::Index(i) => {
                check_index(*i, bound, parameter)?;
                Ok(vec![*i])
            }
            Selector::Indices(indices) => {
                if let Some(&bad) = indices.iter().find(|&&i| i >= bound) {
                    return Err(MatrixError::IndexOutOfRange {
                        parameter,
                        index: bad,
                        bound,
                    });
                }
                Ok(indices.to_vec())
            }
            Selector::All => Ok((0..bound).collect()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Index(i)
    }
}

impl From<IndexCollection> for Selector {
    fn from(indices: IndexCollection) -> Self {
        Selector::Indices(indices)
    }
}

impl From<Vec<usize>> for Selector {
    fn from(indices: Vec<usize>) -> Self {
        Selector::Indices(indices.into())
    }
}

impl From<&[usize]> for Selector {
    fn from(indices: &[usize]) -> Self {
        Selector::Indices(indices.into())
    }
}

impl<const N: usize> From<[usize; N]> for Selector {
    fn from(indices: [usize; N]) -> Self {
        Selector::Indices(indices.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "{i}"),
            Selector::Indices(indices) => write!(f, "{indices}"),
            Selector::All => f.write_str(ALL_TOKEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_collection_keeps_order_and_repeats() {
        let sel = Selector::from(vec![3, 1, 3, 0]);
        assert_eq!(sel.resolve(4, "row_indexes").unwrap(), vec![3, 1, 3, 0]);
    }

    #[test]
    fn all_resolves_ascending() {
        assert_eq!(Selector::All.resolve(3, "rows").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn out_of_range_names_parameter() {
        let err = Selector::from(vec![0, 5]).resolve(5, "column_indexes").unwrap_err();
        assert_eq!(
            err,
            MatrixError::IndexOutOfRange { parameter: "column_indexes", index: 5, bound: 5 }
        );
        let err = Selector::Index(2).resolve(2, "row_index").unwrap_err();
        assert_eq!(err.parameter(), Some("row_index"));
    }

    #[test]
    fn ranges_and_sequences() {
        assert_eq!(&*IndexCollection::range(2, 5), &[2, 3, 4, 5]);
        assert_eq!(&*IndexCollection::range(5, 2), &[5, 4, 3, 2]);
        assert_eq!(&*IndexCollection::sequence(0, 3, 9).unwrap(), &[0, 3, 6, 9]);
        assert_eq!(&*IndexCollection::sequence(9, 4, 0).unwrap(), &[9, 5, 1]);
        assert!(IndexCollection::sequence(0, 0, 3).is_err());
    }

    #[test]
    fn fixed_length_set() {
        let mut c = IndexCollection::from([1, 2]);
        c.set(1, 7).unwrap();
        assert_eq!(&*c, &[1, 7]);
        assert!(c.set(2, 0).is_err());
        assert_eq!(c.to_string(), "[1, 7]");
    }
}
