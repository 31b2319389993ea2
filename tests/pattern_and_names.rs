//! Tests for structural predicates, naming rules, rendering, read-only
//! wrappers and enumeration.

use matrixcore::{Bandwidth, Matrix, MatrixError, RenderOptions, Selector, Structure};
use rand::Rng;

/// The identity is diagonal, triangular both ways and symmetric for every size.
#[test]
fn identity_patterns() {
    for n in 1..8 {
        let i = Matrix::identity(n).unwrap();
        for m in [i.clone(), i.to_dense()] {
            assert!(m.is_diagonal());
            assert!(m.is_lower_triangular() && m.is_upper_triangular());
            assert!(m.is_symmetric());
            assert_eq!((m.lower_bandwidth(), m.upper_bandwidth()), (0, 0));
            assert!(m.structure().contains(Structure::DIAGONAL | Structure::SYMMETRIC | Structure::SQUARE));
        }
    }
}

/// An empty sparse matrix has bandwidth 0/0 and counts as diagonal.
#[test]
fn empty_sparse_is_diagonal() {
    let m = Matrix::sparse(3, 3, 0).unwrap();
    assert!(m.is_diagonal());
    assert_eq!(m.bandwidth(), Bandwidth { lower: 0, upper: 0 });
}

/// Bandwidths of random banded matrices match the band they were built in.
#[test]
fn random_band_structure() {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let n = rng.gen_range(3..9);
        let (lower, upper) = (rng.gen_range(0..n), rng.gen_range(0..n));
        let mut m = Matrix::sparse(n, n, 0).unwrap();
        for i in 0..n {
            m.set(i, i, 1.0).unwrap();
        }
        m.set(lower, 0, 2.0).unwrap();
        m.set(0, upper, 3.0).unwrap();
        assert_eq!(m.bandwidth(), Bandwidth { lower, upper });
        assert_eq!(m.is_tridiagonal(), lower <= 1 && upper <= 1);
        assert_eq!(m.is_upper_hessenberg(), lower <= 1);
        assert_eq!(m.to_dense().bandwidth(), m.bandwidth());
    }
}

/// Bidiagonal and skew-symmetric predicates.
#[test]
fn bidiagonal_and_skew() {
    let upper = Matrix::dense_from_rows(&[[1.0, 2.0, 0.0], [0.0, 3.0, 4.0], [0.0, 0.0, 5.0]]).unwrap();
    assert!(upper.is_upper_bidiagonal());
    assert!(!upper.is_lower_bidiagonal());
    assert!(upper.transpose().is_lower_bidiagonal());

    let skew = Matrix::dense_from_rows(&[[0.0, 1.0, -2.0], [-1.0, 0.0, 3.0], [2.0, -3.0, 0.0]]).unwrap();
    assert!(skew.is_skew_symmetric());
    assert!(!skew.is_symmetric());
    assert!(skew.to_sparse().structure().contains(Structure::SKEW_SYMMETRIC));
}

/// The reserved token and blank names are rejected with the parameter name.
#[test]
fn reserved_and_blank_names() {
    let mut m = Matrix::dense(2, 2).unwrap();
    assert!(matches!(
        m.set_row_name(0, ":"),
        Err(MatrixError::InvalidName { parameter: "row_name", .. })
    ));
    assert!(matches!(
        m.set_column_name(1, "   "),
        Err(MatrixError::InvalidName { parameter: "column_name", .. })
    ));
    assert_eq!(m.set_row_name(5, "x").unwrap_err().parameter(), Some("row_index"));
    assert!(!m.has_row_names());
}

/// Lookups never fail; removals report whether a name existed.
#[test]
fn name_lookup_and_removal() {
    let mut m = Matrix::dense(3, 2).unwrap();
    m.set_row_name(1, "mid").unwrap();
    m.set_column_name(0, "a").unwrap();
    assert_eq!(m.try_get_row_name(0), None);
    assert_eq!(m.try_get_row_name(99), None);
    assert!(m.remove_row_name(1).unwrap());
    assert!(!m.remove_row_name(1).unwrap());
    m.clear_column_names();
    assert!(!m.has_column_names());
}

/// Rendering uses 17-character fields and truncates long names.
#[test]
fn rendering_layout() {
    let mut m = Matrix::dense_from_rows(&[[1.5, 2.0]]).unwrap();
    let plain = m.to_string();
    assert_eq!(plain, format!("{:>17}{:>17}\n\n", "1.5", "2"));

    m.set_row_name(0, "sixteen_chars_xx").unwrap();
    let line = m.render_row(0, &RenderOptions::default());
    assert!(line.starts_with("sixteen_chars_x*"));
    assert_eq!(line.len(), 51);

    let narrow = RenderOptions { field_width: 8, name_width: 4, truncation_marker: '~' };
    assert!(m.render_row(0, &narrow).starts_with("sixt~   "));
}

/// The read-only wrapper shares storage and rejects every mutation.
#[test]
fn read_only_wrapper() {
    let mut m = Matrix::dense_filled(2, 2, 1.0).unwrap();
    {
        let mut ro = m.as_read_only();
        assert!(ro.is_read_only());
        assert_eq!(ro.get(1, 1).unwrap(), 1.0);
        assert_eq!(ro.set(0, 0, 2.0).unwrap_err(), MatrixError::NotSupported("matrix is read-only"));
        assert!(ro.set_row_name(0, "x").is_err());
        assert!(ro.view(Selector::All, 0).is_err());
        assert!(ro.transpose_in_place().is_err());
        assert_eq!(ro.transpose().nrows(), 2);
    }
    m.set(0, 0, 4.0).unwrap();
    assert_eq!(m.as_read_only().get(0, 0).unwrap(), 4.0);
    assert!(!m.is_read_only());
}

/// Enumeration walks column-major order; the cursor rejects reads out of position.
#[test]
fn enumeration() {
    let m = Matrix::dense_from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let collected: Vec<f64> = (&m).into_iter().collect();
    assert_eq!(collected, vec![1.0, 3.0, 2.0, 4.0]);

    let mut cursor = m.cursor();
    assert!(matches!(cursor.current(), Err(MatrixError::NoCurrentElement(_))));
    let mut seen = Vec::new();
    while cursor.move_next() {
        seen.push(cursor.current().unwrap());
    }
    assert_eq!(seen, collected);
    assert!(cursor.current().is_err());
    cursor.reset();
    assert!(cursor.move_next());
    assert_eq!(cursor.current().unwrap(), 1.0);

    let rows: Vec<Vec<f64>> = m.rows().map(|r| r.to_column_major_vec()).collect();
    assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}
