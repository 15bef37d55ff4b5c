//! Purchase-history matrix decoding.
//!
//! The recommendation model's input ships as a SciPy CSR matrix saved with
//! `save_npz`: a zip archive of NumPy arrays named `data`, `indices`,
//! `indptr` and `shape`. The constructor validates the structure so that a
//! corrupt artifact surfaces as an [`Error::Artifact`] instead of a panic
//! during densification.

use std::io::{Read, Seek};

use ndarray::{Array1, Array2};
use ndarray_npy::NpzReader;

use crate::{Error, Result};

/// CSR matrix as stored in the artifact.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    data: Array1<f64>,
    indices: Array1<i32>,
    indptr: Array1<i32>,
    rows: usize,
    cols: usize,
}

impl CsrMatrix {
    /// Read and validate a SciPy `save_npz` artifact.
    pub fn from_npz<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut npz = NpzReader::new(reader)
            .map_err(|e| Error::Artifact(format!("Not an npz archive: {}", e)))?;

        let data: Array1<f64> = npz
            .by_name("data.npy")
            .map_err(|e| Error::Artifact(format!("Failed to read data array: {}", e)))?;
        let indices: Array1<i32> = npz
            .by_name("indices.npy")
            .map_err(|e| Error::Artifact(format!("Failed to read indices array: {}", e)))?;
        let indptr: Array1<i32> = npz
            .by_name("indptr.npy")
            .map_err(|e| Error::Artifact(format!("Failed to read indptr array: {}", e)))?;
        let shape: Array1<i64> = npz
            .by_name("shape.npy")
            .map_err(|e| Error::Artifact(format!("Failed to read shape array: {}", e)))?;

        if shape.len() != 2 || shape[0] < 0 || shape[1] < 0 {
            return Err(Error::Artifact(format!(
                "Expected a 2-D shape, artifact declares {:?}",
                shape.to_vec()
            )));
        }
        let rows = shape[0] as usize;
        let cols = shape[1] as usize;

        let nnz = data.len();
        if indices.len() != nnz {
            return Err(Error::Artifact(format!(
                "data has {} entries but indices has {}",
                nnz,
                indices.len()
            )));
        }
        if indptr.len() != rows + 1 {
            return Err(Error::Artifact(format!(
                "indptr has {} entries for {} rows",
                indptr.len(),
                rows
            )));
        }

        let mut previous = 0i64;
        for &offset in indptr.iter() {
            let offset = offset as i64;
            if offset < previous || offset > nnz as i64 {
                return Err(Error::Artifact(
                    "indptr is not monotonically non-decreasing within bounds".to_string(),
                ));
            }
            previous = offset;
        }

        for &column in indices.iter() {
            if column < 0 || column as usize >= cols {
                return Err(Error::Artifact(format!(
                    "column index {} out of bounds for {} columns",
                    column, cols
                )));
            }
        }

        Ok(Self {
            data,
            indices,
            indptr,
            rows,
            cols,
        })
    }

    /// Densify into a row-major 2-D array.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for row in 0..self.rows {
            let start = self.indptr[row] as usize;
            let end = self.indptr[row + 1] as usize;
            for k in start..end {
                dense[[row, self.indices[k] as usize]] = self.data[k];
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::NpzWriter;
    use std::io::Cursor;

    fn npz_bytes(data: &[f64], indices: &[i32], indptr: &[i32], shape: &[i64]) -> Vec<u8> {
        let mut npz = NpzWriter::new(Cursor::new(Vec::new()));
        npz.add_array("data", &Array1::from(data.to_vec())).unwrap();
        npz.add_array("indices", &Array1::from(indices.to_vec()))
            .unwrap();
        npz.add_array("indptr", &Array1::from(indptr.to_vec()))
            .unwrap();
        npz.add_array("shape", &Array1::from(shape.to_vec()))
            .unwrap();
        npz.finish().unwrap().into_inner()
    }

    #[test]
    fn test_densify_known_matrix() {
        // [[1.0, 0.0, 2.0],
        //  [0.0, 0.0, 3.0]]
        let bytes = npz_bytes(&[1.0, 2.0, 3.0], &[0, 2, 2], &[0, 2, 3], &[2, 3]);
        let matrix = CsrMatrix::from_npz(Cursor::new(bytes)).unwrap();
        let dense = matrix.to_dense();

        assert_eq!(dense.dim(), (2, 3));
        assert_eq!(dense[[0, 0]], 1.0);
        assert_eq!(dense[[0, 1]], 0.0);
        assert_eq!(dense[[0, 2]], 2.0);
        assert_eq!(dense[[1, 2]], 3.0);
    }

    #[test]
    fn test_empty_rows_densify_to_zeros() {
        let bytes = npz_bytes(&[], &[], &[0, 0, 0], &[2, 2]);
        let matrix = CsrMatrix::from_npz(Cursor::new(bytes)).unwrap();
        assert_eq!(matrix.to_dense(), Array2::<f64>::zeros((2, 2)));
    }

    #[test]
    fn test_missing_member_is_artifact_error() {
        let mut npz = NpzWriter::new(Cursor::new(Vec::new()));
        npz.add_array("data", &Array1::from(vec![1.0f64])).unwrap();
        let bytes = npz.finish().unwrap().into_inner();

        let result = CsrMatrix::from_npz(Cursor::new(bytes));
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn test_column_out_of_bounds_is_artifact_error() {
        let bytes = npz_bytes(&[1.0], &[5], &[0, 1], &[1, 3]);
        let result = CsrMatrix::from_npz(Cursor::new(bytes));
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn test_inconsistent_indptr_is_artifact_error() {
        let bytes = npz_bytes(&[1.0], &[0], &[0, 1, 1], &[1, 1]);
        let result = CsrMatrix::from_npz(Cursor::new(bytes));
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn test_truncated_archive_is_artifact_error() {
        let result = CsrMatrix::from_npz(Cursor::new(b"PK\x03\x04garbage".to_vec()));
        assert!(matches!(result, Err(Error::Artifact(_))));
    }
}
