//! Binary persistence.
//!
//! Field order: rows, columns, scheme tag, name, row names, column names,
//! payload. Dense payloads are the column-major values; compressed-row
//! payloads are `(row, column, value)` triples in row order. Views are
//! written in their source's scheme.

use crate::access::traits::ElementAccess;
use crate::error::{MatrixError, Result, check_index, check_positive};
use crate::matrix::base::Matrix;
use crate::matrix::dense::DenseStorage;
use crate::matrix::names::{AxisNames, validate_name};
use crate::matrix::sparse::SparseStorage;
use crate::matrix::storage::{Storage, StorageScheme};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
enum Payload {
    Dense(Vec<f64>),
    Sparse(Vec<(i32, i32, f64)>),
}

#[derive(Serialize)]
struct MatrixRecord<'a> {
    rows: i32,
    cols: i32,
    scheme: StorageScheme,
    name: Option<&'a str>,
    row_names: Vec<(i32, &'a str)>,
    column_names: Vec<(i32, &'a str)>,
    payload: Payload,
}

#[derive(Deserialize)]
struct OwnedMatrixRecord {
    rows: i32,
    cols: i32,
    scheme: StorageScheme,
    name: Option<String>,
    row_names: Vec<(i32, String)>,
    column_names: Vec<(i32, String)>,
    payload: Payload,
}

fn to_i32(value: usize, parameter: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| MatrixError::Serialization(format!("{parameter} {value} exceeds i32")))
}

fn name_pairs<'a>(names: &'a BTreeMap<usize, String>, parameter: &'static str) -> Result<Vec<(i32, &'a str)>> {
    names.iter().map(|(&k, n)| Ok((to_i32(k, parameter)?, n.as_str()))).collect()
}

impl Matrix {
    fn record(&self) -> Result<MatrixRecord<'_>> {
        let storage = self.storage();
        let scheme = storage.scheme();
        let payload = match scheme {
            StorageScheme::Dense => Payload::Dense(storage.to_dense().into_vec()),
            StorageScheme::CompressedRow => {
                let sparse = match &*storage {
                    Storage::Sparse(s) => s.clone(),
                    other => other.to_sparse(),
                };
                let triples = sparse
                    .entries()
                    .map(|(i, j, v)| Ok((to_i32(i, "row_index")?, to_i32(j, "column_index")?, v)))
                    .collect::<Result<Vec<_>>>()?;
                Payload::Sparse(triples)
            }
        };
        Ok(MatrixRecord {
            rows: to_i32(self.nrows, "rows")?,
            cols: to_i32(self.ncols, "columns")?,
            scheme,
            name: self.name.as_deref(),
            row_names: name_pairs(&self.names.rows, "row_index")?,
            column_names: name_pairs(&self.names.cols, "column_index")?,
            payload,
        })
    }

    fn from_record(record: OwnedMatrixRecord) -> Result<Matrix> {
        let dim = |v: i32, parameter: &'static str| -> Result<usize> {
            let v = usize::try_from(v).map_err(|_| MatrixError::NonPositive { parameter })?;
            check_positive(v, parameter).map(|_| v)
        };
        let (nrows, ncols) = (dim(record.rows, "rows")?, dim(record.cols, "columns")?);
        let index = |v: i32, bound: usize, parameter: &'static str| -> Result<usize> {
            let i = usize::try_from(v)
                .map_err(|_| MatrixError::Serialization(format!("{parameter} {v} is negative (bound {bound})")))?;
            check_index(i, bound, parameter).map(|_| i)
        };

        let storage = match (record.scheme, record.payload) {
            (StorageScheme::Dense, Payload::Dense(values)) => {
                if values.len() != nrows * ncols {
                    return Err(MatrixError::mismatch(
                        "data",
                        format!("expected {} values for {nrows}x{ncols}, got {}", nrows * ncols, values.len()),
                    ));
                }
                Storage::Dense(DenseStorage::from_raw(nrows, ncols, values))
            }
            (StorageScheme::CompressedRow, Payload::Sparse(triples)) => {
                let mut sparse = SparseStorage::new(nrows, ncols, triples.len());
                for (i, j, v) in triples {
                    sparse.set(index(i, nrows, "row_index")?, index(j, ncols, "column_index")?, v);
                }
                Storage::Sparse(sparse)
            }
            (scheme, payload) => {
                return Err(MatrixError::Serialization(format!(
                    "{scheme:?} tag with a {} payload",
                    match payload {
                        Payload::Dense(_) => "dense",
                        Payload::Sparse(_) => "compressed-row",
                    }
                )));
            }
        };

        let mut names = AxisNames::default();
        for (k, n) in record.row_names {
            validate_name(&n, "row_name")?;
            names.rows.insert(index(k, nrows, "row_index")?, n);
        }
        for (k, n) in record.column_names {
            validate_name(&n, "column_name")?;
            names.cols.insert(index(k, ncols, "column_index")?, n);
        }

        let mut m = Matrix::from_storage(storage).with_names(names);
        m.name = record.name;
        Ok(m)
    }

    /// Encode with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(&self.record()?).map_err(|e| MatrixError::Serialization(e.to_string()))
    }

    /// Decode bytes written by [`Matrix::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Matrix> {
        if bytes.is_empty() {
            return Err(MatrixError::NullArgument { parameter: "bytes" });
        }
        let record: OwnedMatrixRecord =
            bincode::deserialize(bytes).map_err(|e| MatrixError::Serialization(e.to_string()))?;
        Matrix::from_record(record)
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record().map_err(serde::ser::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Matrix, D::Error> {
        let record = OwnedMatrixRecord::deserialize(deserializer)?;
        Matrix::from_record(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(mut m: Matrix) -> Matrix {
        m.set_name(Some("weights".into()));
        m.set_row_name(0, "first").unwrap();
        m.set_column_name(1, "second").unwrap();
        m
    }

    #[test]
    fn dense_and_sparse_round_trip() {
        let d = named(Matrix::dense_from_rows(&[[1.0, 0.0, 2.5], [0.0, -4.0, 0.0]]).unwrap());
        for m in [d.clone(), d.to_sparse(), Matrix::identity(4).unwrap()] {
            let back = Matrix::from_bytes(&m.to_bytes().unwrap()).unwrap();
            assert_eq!(back, m);
            assert_eq!(back.name(), m.name());
            assert_eq!(back.storage_scheme(), m.storage_scheme());
        }
    }

    #[test]
    fn view_is_written_in_source_scheme() {
        let mut s = Matrix::identity(3).unwrap();
        let v = s.view([2, 0], crate::Selector::All).unwrap();
        let back = Matrix::from_bytes(&v.to_bytes().unwrap()).unwrap();
        assert_eq!(back, v);
        assert!(!back.is_view());
        assert_eq!(back.storage_scheme(), StorageScheme::CompressedRow);
    }

    #[test]
    fn empty_and_corrupt_input() {
        assert_eq!(Matrix::from_bytes(&[]).unwrap_err(), MatrixError::NullArgument { parameter: "bytes" });
        let bytes = Matrix::from(1.0).to_bytes().unwrap();
        assert!(matches!(Matrix::from_bytes(&bytes[..bytes.len() - 1]), Err(MatrixError::Serialization(_))));
    }

    #[test]
    fn dimensions_are_validated() {
        let record = MatrixRecord {
            rows: 0,
            cols: 1,
            scheme: StorageScheme::Dense,
            name: None,
            row_names: Vec::new(),
            column_names: Vec::new(),
            payload: Payload::Dense(Vec::new()),
        };
        let bytes = bincode::serialize(&record).unwrap();
        assert_eq!(Matrix::from_bytes(&bytes).unwrap_err(), MatrixError::NonPositive { parameter: "rows" });

        let record = MatrixRecord {
            rows: 1,
            scheme: StorageScheme::CompressedRow,
            payload: Payload::Sparse(vec![(0, 3, 1.0)]),
            ..record
        };
        let bytes = bincode::serialize(&record).unwrap();
        assert!(matches!(
            Matrix::from_bytes(&bytes),
            Err(MatrixError::IndexOutOfRange { parameter: "column_index", .. })
        ));
    }

    fn sparse_record(rows: i32, triples: Vec<(i32, i32, f64)>) -> MatrixRecord<'static> {
        MatrixRecord {
            rows,
            cols: 2,
            scheme: StorageScheme::CompressedRow,
            name: None,
            row_names: Vec::new(),
            column_names: Vec::new(),
            payload: Payload::Sparse(triples),
        }
    }

    #[test]
    fn negative_indices_report_the_value() {
        let bytes = bincode::serialize(&sparse_record(3, vec![(-7, 0, 1.0)])).unwrap();
        match Matrix::from_bytes(&bytes) {
            Err(MatrixError::Serialization(msg)) => assert!(msg.contains("-7"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }

        let record = MatrixRecord { row_names: vec![(-2, "x")], ..sparse_record(3, Vec::new()) };
        let bytes = bincode::serialize(&record).unwrap();
        assert!(matches!(Matrix::from_bytes(&bytes), Err(MatrixError::Serialization(msg)) if msg.contains("-2")));
    }

    #[test]
    fn huge_empty_sparse_payload_decodes_cheaply() {
        let bytes = bincode::serialize(&sparse_record(i32::MAX, Vec::new())).unwrap();
        let m = Matrix::from_bytes(&bytes).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (i32::MAX as usize, 2));
        assert_eq!(m.nonzero_count(), 0);

        let bytes = bincode::serialize(&sparse_record(i32::MAX, vec![(i32::MAX - 1, 1, 4.0)])).unwrap();
        let m = Matrix::from_bytes(&bytes).unwrap();
        assert_eq!(m.get(i32::MAX as usize - 1, 1).unwrap(), 4.0);
        assert_eq!(m.to_bytes().unwrap(), bytes);
    }
}
