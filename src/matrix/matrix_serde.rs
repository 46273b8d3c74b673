use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;

/// Structural dump of a matrix: `{"rows": .., "cols": .., "data": [[..], ..]}`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MatrixData {
    pub rows: i64,
    pub cols: i64,
    pub data: Vec<Vec<f64>>,
}

/// Input accepted by [`Matrix::from_json`]: JSON text or an already decoded
/// structure.
#[derive(Debug, Clone)]
pub enum Encoded<'a> {
    Text(&'a str),
    Value(Value),
    Data(MatrixData),
}

impl<'a> From<&'a str> for Encoded<'a> {
    fn from(text: &'a str) -> Self {
        Encoded::Text(text)
    }
}

impl<'a> From<&'a String> for Encoded<'a> {
    fn from(text: &'a String) -> Self {
        Encoded::Text(text.as_str())
    }
}

impl From<Value> for Encoded<'_> {
    fn from(value: Value) -> Self {
        Encoded::Value(value)
    }
}

impl From<MatrixData> for Encoded<'_> {
    fn from(data: MatrixData) -> Self {
        Encoded::Data(data)
    }
}

impl From<Matrix> for MatrixData {
    fn from(matrix: Matrix) -> Self {
        MatrixData {
            rows: matrix.rows as i64,
            cols: matrix.cols as i64,
            data: matrix.to_list(),
        }
    }
}

impl TryFrom<MatrixData> for Matrix {
    type Error = MatrixError;

    fn try_from(data: MatrixData) -> Result<Matrix> {
        let (rows, cols) = Matrix::checked_dims(data.rows, data.cols)?;

        if data.data.len() != rows {
            log::debug!(
                "structural data declares {} rows but holds {}",
                rows,
                data.data.len()
            );
            return Err(MatrixError::MalformedData(format!(
                "expected {} rows, found {}",
                rows,
                data.data.len()
            )));
        }

        if let Some((r, line)) = data.data.iter().enumerate().find(|(_, l)| l.len() != cols) {
            log::debug!("structural data row {} has {} values", r, line.len());
            return Err(MatrixError::MalformedData(format!(
                "row {} has {} values, expected {}",
                r,
                line.len(),
                cols
            )));
        }

        Ok(Matrix {
            rows,
            cols,
            cells: data.data.into_iter().flatten().collect(),
        })
    }
}

impl Matrix {
    pub fn to_data(&self) -> MatrixData {
        self.copy().into()
    }

    /// Serializes to `{"rows":..,"cols":..,"data":[[..],..]}`.
    ///
    /// JSON has no encoding for `NaN` or `±inf`, so matrices holding them are
    /// rejected instead of being written as `null`.
    pub fn to_json(&self) -> Result<String> {
        if let Some(idx) = self.cells.iter().position(|v| !v.is_finite()) {
            let (r, c) = (idx / self.cols, idx % self.cols);
            log::debug!("to_json: non-finite cell at ({}, {})", r, c);
            return Err(MatrixError::MalformedData(format!(
                "cell ({}, {}) is {}, which JSON cannot represent",
                r, c, self.cells[idx]
            )));
        }
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a matrix from JSON text, a parsed [`Value`] or a [`MatrixData`].
    pub fn from_json<'a>(input: impl Into<Encoded<'a>>) -> Result<Matrix> {
        let data = match input.into() {
            Encoded::Text(text) => serde_json::from_str::<MatrixData>(text)?,
            Encoded::Value(value) => serde_json::from_value::<MatrixData>(value)?,
            Encoded::Data(data) => data,
        };
        Matrix::try_from(data)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
