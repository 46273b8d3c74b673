use itertools::{iproduct, Itertools};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{MatrixError, Result};
use crate::matrix::matrix_serde::MatrixData;

/// Dense row-major matrix of `f64` cells.
///
/// Row `i` lives in `cells[i * cols..(i + 1) * cols]`. Every instance owns its
/// buffer; use [`Matrix::copy`] (or `clone`) to get an independent duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MatrixData", try_from = "MatrixData")]
pub struct Matrix {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            cells: vec![f64::zero(); rows * cols],
        }
    }

    /// Checked constructor for dimensions coming from untrusted input.
    pub fn try_new(rows: i64, cols: i64) -> Result<Matrix> {
        let (r, c) = Matrix::checked_dims(rows, cols)?;
        Ok(Matrix::new(r, c))
    }

    /// Validates signed dimensions without allocating. The cell buffer must
    /// stay within `isize::MAX` bytes.
    pub(crate) fn checked_dims(rows: i64, cols: i64) -> Result<(usize, usize)> {
        let invalid = MatrixError::InvalidDimension { rows, cols };
        let (r, c) = match (usize::try_from(rows), usize::try_from(cols)) {
            (Ok(r), Ok(c)) => (r, c),
            _ => return Err(invalid),
        };
        let bytes = r
            .checked_mul(c)
            .and_then(|len| len.checked_mul(std::mem::size_of::<f64>()));
        match bytes {
            Some(bytes) if bytes <= isize::MAX as usize => Ok((r, c)),
            _ => Err(invalid),
        }
    }

    pub fn identity(n: usize) -> Matrix {
        Matrix {
            rows: n,
            cols: n,
            cells: iproduct!(0..n, 0..n)
                .map(|(i, j)| if i == j { f64::one() } else { f64::zero() })
                .collect(),
        }
    }

    /// Column vector (`values.len() x 1`).
    pub fn from_array(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            cells: values.to_vec(),
        }
    }

    pub fn from_list(lines: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);

        if let Some((i, line)) = lines.iter().find_position(|l| l.len() != cols) {
            return Err(MatrixError::MalformedData(format!(
                "row {} has {} values, expected {}",
                i,
                line.len(),
                cols
            )));
        }

        Ok(Matrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    pub fn copy(&self) -> Matrix {
        self.clone()
    }

    /// Flattens the cells in row-major order.
    pub fn to_array(&self) -> Vec<f64> {
        self.cells.clone()
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.at(row, col))
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Replaces every cell with `f(value, row, col)`, in place.
    ///
    /// `f` only sees the prior value of the cell it is computing, so the
    /// result does not depend on the visiting order.
    pub fn map<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        let cols = self.cols;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            *cell = f(*cell, idx / cols, idx % cols);
        }
        self
    }

    /// Same as [`Matrix::map`] but leaves `self` alone and returns a new matrix.
    pub fn mapped<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: iproduct!(0..self.rows, 0..self.cols)
                .map(|(i, j)| f(self.at(i, j), i, j))
                .collect(),
        }
    }

    pub fn print(&self) -> &Self {
        println!("{}", self);
        self
    }

    pub(crate) fn same_shape(&self, rhs: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != rhs.shape() {
            log::debug!(
                "{}: shape {:?} does not match {:?}",
                op,
                self.shape(),
                rhs.shape()
            );
            return Err(MatrixError::DimensionMismatch {
                op,
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &self.cells[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &mut self.cells[row * self.cols + col]
    }
}

// Tabular dump, one line per row:
// (index) | 0 | 1
//       0 | 1 | 2
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.cells.iter().map(|c| c.to_string()).collect();
        let width = cells
            .iter()
            .map(|c| c.len())
            .chain((0..self.cols).map(|c| c.to_string().len()))
            .max()
            .unwrap_or(0);
        let index_width = "(index)".len().max(self.rows.to_string().len());

        write!(f, "{:>w$}", "(index)", w = index_width)?;
        for col in 0..self.cols {
            write!(f, " | {:>w$}", col, w = width)?;
        }

        for row in 0..self.rows {
            writeln!(f)?;
            write!(f, "{:>w$}", row, w = index_width)?;
            let line = cells[row * self.cols..(row + 1) * self.cols]
                .iter()
                .map(|c| format!("{:>w$}", c, w = width))
                .join(" | ");
            if !line.is_empty() {
                write!(f, " | {}", line)?;
            }
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
