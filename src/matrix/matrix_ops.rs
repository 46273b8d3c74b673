use itertools::iproduct;
use rand::Rng;
use std::ops;

use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;

impl Matrix {
    /// Elementwise `self += rhs`.
    pub fn add(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.same_shape(rhs, "add")?;
        self.cells
            .iter_mut()
            .zip(rhs.cells.iter())
            .for_each(|(a, b)| *a += b);
        Ok(self)
    }

    pub fn add_scalar(&mut self, n: f64) -> &mut Self {
        self.map(|v, _, _| v + n)
    }

    /// Hadamard product, in place.
    pub fn multiply(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.same_shape(rhs, "multiply")?;
        self.cells
            .iter_mut()
            .zip(rhs.cells.iter())
            .for_each(|(a, b)| *a *= b);
        Ok(self)
    }

    pub fn multiply_scalar(&mut self, n: f64) -> &mut Self {
        self.map(|v, _, _| v * n)
    }

    /// True matrix product `a * b`. Each cell is the dot product of a row of
    /// `a` and a column of `b`, accumulated with increasing `k`.
    pub fn matmul(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            log::debug!(
                "matmul: columns of {:?} do not match rows of {:?}",
                a.shape(),
                b.shape()
            );
            return Err(MatrixError::DimensionMismatch {
                op: "matmul",
                lhs: a.shape(),
                rhs: b.shape(),
            });
        }

        Ok(Matrix {
            rows: a.rows,
            cols: b.cols,
            cells: iproduct!(0..a.rows, 0..b.cols)
                .map(|(i, j)| (0..a.cols).map(|k| a.at(i, k) * b.at(k, j)).sum::<f64>())
                .collect(),
        })
    }

    /// Elementwise `a - b` as a new matrix.
    pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.same_shape(b, "subtract")?;
        Ok(a.mapped(|v, i, j| v - b.at(i, j)))
    }

    pub fn transpose(m: &Matrix) -> Matrix {
        Matrix {
            rows: m.cols,
            cols: m.rows,
            cells: iproduct!(0..m.cols, 0..m.rows)
                .map(|(i, j)| m.at(j, i))
                .collect(),
        }
    }

    pub fn negate(m: &Matrix) -> Matrix {
        m.mapped(|v, _, _| -v)
    }

    /// Fills every cell with a uniform sample from `[-1, 1)`.
    pub fn randomize(&mut self) -> &mut Self {
        self.randomize_with(&mut rand::thread_rng())
    }

    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        self.map(|_, _, _| rng.gen_range(-1.0..1.0))
    }
}

impl ops::Add<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn add(self, rhs: &Matrix) -> Result<Matrix> {
        let mut out = self.copy();
        Matrix::add(&mut out, rhs)?;
        Ok(out)
    }
}

impl ops::Sub<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn sub(self, rhs: &Matrix) -> Result<Matrix> {
        Matrix::subtract(self, rhs)
    }
}

impl ops::Mul<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn mul(self, rhs: &Matrix) -> Result<Matrix> {
        Matrix::matmul(self, rhs)
    }
}

impl ops::Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        Matrix::negate(self)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
