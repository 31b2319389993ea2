//! Fixed-width text rendering.
//!
//! Every cell, names included, occupies `RenderOptions::field_width`
//! characters. A header line of column names is emitted only when some
//! column is named, and a leading name column only when some row is named.
//! The full rendering ends with a blank line; single-row renderings do not.

use crate::access::traits::ElementAccess;
use crate::config::options::RenderOptions;
use crate::matrix::base::Matrix;
use crate::matrix::names::truncate_name;
use std::fmt;

/// Shortest representation that fits the field, falling back to scientific.
fn format_value(v: f64, width: usize) -> String {
    let plain = format!("{v}");
    if plain.len() < width {
        return plain;
    }
    // Leave one column of separation; mantissa digits shrink with the field.
    let digits = width.saturating_sub(9).max(1);
    format!("{v:.digits$e}")
}

fn label(name: Option<&str>, opts: &RenderOptions) -> String {
    name.map(|n| truncate_name(n, opts.name_width, opts.truncation_marker))
        .unwrap_or_default()
}

impl Matrix {
    /// Full grid rendering, terminated by a blank line.
    pub fn render(&self, opts: &RenderOptions) -> String {
        let w = opts.field_width;
        let mut out = String::new();
        if self.has_column_names() {
            if self.has_row_names() {
                out.push_str(&" ".repeat(w));
            }
            for j in 0..self.ncols {
                out.push_str(&format!("{:>w$}", label(self.try_get_column_name(j), opts)));
            }
            out.push('\n');
        }
        for i in 0..self.nrows {
            out.push_str(&self.render_row(i, opts));
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// One row as a single line, without any trailing newline.
    ///
    /// `row` must be in range.
    pub fn render_row(&self, row: usize, opts: &RenderOptions) -> String {
        let w = opts.field_width;
        let mut line = String::with_capacity(w * (self.ncols + 1));
        if self.has_row_names() {
            line.push_str(&format!("{:<w$}", label(self.try_get_row_name(row), opts)));
        }
        let storage = self.storage();
        for j in 0..self.ncols {
            line.push_str(&format!("{:>w$}", format_value(storage.get(row, j), w)));
        }
        line
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_grid_is_fixed_width() {
        let m = Matrix::dense_from_rows(&[[1.0, -2.5], [0.0, 1e-300]]).unwrap();
        let text = m.to_string();
        let lines: Vec<&str> = text.split('\n').collect();
        // two rows, blank terminator, and the empty tail after the last '\n'
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].len(), 34);
        assert_eq!(lines[1].len(), 34);
        assert_eq!(lines[2], "");
        assert_eq!(&lines[0][..17], "                1");
        assert!(lines[1].ends_with("e-300"));
    }

    #[test]
    fn names_add_header_and_label_column() {
        let mut m = Matrix::dense(2, 2).unwrap();
        m.set_column_name(1, "weight").unwrap();
        m.set_row_name(0, "an_extremely_long_label").unwrap();
        let text = m.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("{}{:>17}{:>17}", " ".repeat(17), "", "weight"));
        assert!(lines[1].starts_with("an_extremely_lo* "));
        assert_eq!(lines[2].len(), 51);
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn row_rendering_has_no_terminator() {
        let m = Matrix::dense_filled(1, 2, 3.0).unwrap();
        let row = m.render_row(0, &RenderOptions::default());
        assert!(!row.ends_with('\n'));
        assert_eq!(row.len(), 34);
    }
}
