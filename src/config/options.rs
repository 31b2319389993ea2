//! Rendering and solve options.
//!
//! This module provides the `RenderOptions` struct, which controls the
//! fixed-width text grid produced by `Matrix::render`, and `SolveOptions`,
//! which controls the rank test performed before right division.

/// Fixed-width text rendering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Width in characters of every rendered cell, names included.
    pub field_width: usize,

    /// Names longer than this are cut to this many characters.
    pub name_width: usize,

    /// Appended to a name after truncation.
    pub truncation_marker: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            field_width: 17,
            name_width: 15,
            truncation_marker: '*',
        }
    }
}

/// Parameters for the solve-based division.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOptions {
    /// Singular values at or below this magnitude count as zero when
    /// computing the rank of the divisor. `None` uses
    /// `max(rows, cols) · ε · σmax`, with `σmax` the largest singular value.
    pub rank_tolerance: Option<f64>,
}
