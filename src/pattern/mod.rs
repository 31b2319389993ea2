//! Structural predicates computed from nonzero positions.
//!
//! Everything here reads only `ElementAccess::nonzero_positions` (and, for
//! the symmetry tests, element values), so dense, compressed-row and view
//! storage are analyzed identically.

use crate::access::traits::{ElementAccess, MatShape};
use crate::matrix::base::Matrix;
use bitflags::bitflags;

/// Distance of the farthest nonzero below (`lower`) and above (`upper`) the
/// main diagonal. An all-zero matrix has bandwidth 0/0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bandwidth {
    pub lower: usize,
    pub upper: usize,
}

pub fn bandwidth<S: ElementAccess + ?Sized>(s: &S) -> Bandwidth {
    s.nonzero_positions().fold(Bandwidth::default(), |bw, (i, j)| Bandwidth {
        lower: bw.lower.max(i.saturating_sub(j)),
        upper: bw.upper.max(j.saturating_sub(i)),
    })
}

/// `M[i,j] == sign * M[j,i]` for every pair, compared exactly.
fn mirrored<S: ElementAccess + ?Sized>(s: &S, sign: f64) -> bool {
    if s.nrows() != s.ncols() {
        return false;
    }
    // A zero entry whose mirror is nonzero shows up when the mirror is visited.
    s.nonzero_positions().all(|(i, j)| s.get(i, j) == sign * s.get(j, i))
}

pub fn is_symmetric<S: ElementAccess + ?Sized>(s: &S) -> bool {
    mirrored(s, 1.0)
}

pub fn is_skew_symmetric<S: ElementAccess + ?Sized>(s: &S) -> bool {
    mirrored(s, -1.0)
}

bitflags! {
    /// Every structural property that holds for a matrix.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Structure: u32 {
        const SQUARE           = 1 << 0;
        const SCALAR           = 1 << 1;
        const VECTOR           = 1 << 2;
        const ROW_VECTOR       = 1 << 3;
        const COLUMN_VECTOR    = 1 << 4;
        const LOWER_TRIANGULAR = 1 << 5;
        const UPPER_TRIANGULAR = 1 << 6;
        const DIAGONAL         = Self::LOWER_TRIANGULAR.bits() | Self::UPPER_TRIANGULAR.bits();
        const TRIDIAGONAL      = 1 << 7;
        const LOWER_BIDIAGONAL = 1 << 8;
        const UPPER_BIDIAGONAL = 1 << 9;
        const LOWER_HESSENBERG = 1 << 10;
        const UPPER_HESSENBERG = 1 << 11;
        const SYMMETRIC        = 1 << 12;
        const SKEW_SYMMETRIC   = 1 << 13;
    }
}

impl Structure {
    /// Flags implied by the bandwidth alone.
    pub fn from_bandwidth(bw: Bandwidth) -> Self {
        let mut s = Structure::empty();
        s.set(Structure::LOWER_TRIANGULAR, bw.upper == 0);
        s.set(Structure::UPPER_TRIANGULAR, bw.lower == 0);
        s.set(Structure::TRIDIAGONAL, bw.lower <= 1 && bw.upper <= 1);
        s.set(Structure::LOWER_BIDIAGONAL, bw.lower <= 1 && bw.upper == 0);
        s.set(Structure::UPPER_BIDIAGONAL, bw.upper <= 1 && bw.lower == 0);
        s.set(Structure::LOWER_HESSENBERG, bw.upper <= 1);
        s.set(Structure::UPPER_HESSENBERG, bw.lower <= 1);
        s
    }

    /// Flags implied by the dimensions alone.
    pub fn from_shape(nrows: usize, ncols: usize) -> Self {
        let mut s = Structure::empty();
        s.set(Structure::SQUARE, nrows == ncols);
        s.set(Structure::SCALAR, nrows == 1 && ncols == 1);
        s.set(Structure::VECTOR, nrows == 1 || ncols == 1);
        s.set(Structure::ROW_VECTOR, nrows == 1);
        s.set(Structure::COLUMN_VECTOR, ncols == 1);
        s
    }
}

impl Matrix {
    pub fn bandwidth(&self) -> Bandwidth {
        bandwidth(&*self.storage())
    }

    pub fn lower_bandwidth(&self) -> usize {
        self.bandwidth().lower
    }

    pub fn upper_bandwidth(&self) -> usize {
        self.bandwidth().upper
    }

    /// All structural properties at once.
    pub fn structure(&self) -> Structure {
        let storage = self.storage();
        let mut s = Structure::from_shape(self.nrows(), self.ncols())
            | Structure::from_bandwidth(bandwidth(&*storage));
        s.set(Structure::SYMMETRIC, is_symmetric(&*storage));
        s.set(Structure::SKEW_SYMMETRIC, is_skew_symmetric(&*storage));
        s
    }

    pub fn is_lower_triangular(&self) -> bool {
        self.upper_bandwidth() == 0
    }

    pub fn is_upper_triangular(&self) -> bool {
        self.lower_bandwidth() == 0
    }

    pub fn is_diagonal(&self) -> bool {
        self.bandwidth() == Bandwidth::default()
    }

    pub fn is_tridiagonal(&self) -> bool {
        let bw = self.bandwidth();
        bw.lower <= 1 && bw.upper <= 1
    }

    pub fn is_lower_bidiagonal(&self) -> bool {
        let bw = self.bandwidth();
        bw.lower <= 1 && bw.upper == 0
    }

    pub fn is_upper_bidiagonal(&self) -> bool {
        let bw = self.bandwidth();
        bw.upper <= 1 && bw.lower == 0
    }

    pub fn is_lower_hessenberg(&self) -> bool {
        self.upper_bandwidth() <= 1
    }

    pub fn is_upper_hessenberg(&self) -> bool {
        self.lower_bandwidth() <= 1
    }

    pub fn is_symmetric(&self) -> bool {
        is_symmetric(&*self.storage())
    }

    pub fn is_skew_symmetric(&self) -> bool {
        is_skew_symmetric(&*self.storage())
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    pub fn is_scalar(&self) -> bool {
        self.nrows() == 1 && self.ncols() == 1
    }

    pub fn is_vector(&self) -> bool {
        self.nrows() == 1 || self.ncols() == 1
    }

    pub fn is_row_vector(&self) -> bool {
        self.nrows() == 1
    }

    pub fn is_column_vector(&self) -> bool {
        self.ncols() == 1
    }
}
