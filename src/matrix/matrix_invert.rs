use num_traits::{One, Zero};

use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_config::InvertConfig;

impl Matrix {
    /// Converts `A` into `A^-1` in place via Gauss-Jordan elimination, using
    /// the default [`InvertConfig`].
    pub fn invert(&mut self) -> Result<&mut Self> {
        self.invert_with(&InvertConfig::default())
    }

    /// Gauss-Jordan inversion on the augmented matrix `[A | I]`.
    ///
    /// The reduction runs on a scratch buffer of width `2n`; `self` is only
    /// overwritten with the right half once every pivot has been found, so
    /// on error the matrix is left as it was.
    pub fn invert_with(&mut self, config: &InvertConfig) -> Result<&mut Self> {
        if !self.is_square() {
            log::debug!("invert: {}x{} is not square", self.rows, self.cols);
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let n = self.rows;
        if n == 0 {
            return Ok(self);
        }
        let width = 2 * n;
        let scale = self.cells.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));

        // Append identity
        // x, x, x, 1, 0, 0
        // x, x, x, 0, 1, 0
        // x, x, x, 0, 0, 1
        let mut aug = Vec::with_capacity(n * width);
        for a in 0..n {
            aug.extend_from_slice(self.row(a));
            aug.extend((0..n).map(|i| if i == a { f64::one() } else { f64::zero() }));
        }

        // Reduce to reduced row echelon form
        // 1, 0, 0, y, y, y
        // 0, 1, 0, y, y, y
        // 0, 0, 1, y, y, y
        let mut pivot_row = 0;
        let mut pivot_col = 0;
        while pivot_row < n && pivot_col < width {
            if pivot_col >= n {
                log::debug!("invert: left half exhausted at rank {}", pivot_row);
                return Err(MatrixError::SingularMatrix { rank: pivot_row });
            }

            if config.is_zero(aug[pivot_row * width + pivot_col], scale) {
                let candidate = (pivot_row + 1..n)
                    .find(|&i| !config.is_zero(aug[i * width + pivot_col], scale));

                match candidate {
                    Some(i) => {
                        log::trace!("invert: swap rows {} and {}", pivot_row, i);
                        for k in 0..width {
                            aug.swap(pivot_row * width + k, i * width + k);
                        }
                    }
                    None => {
                        log::trace!("invert: no pivot in column {}", pivot_col);
                        pivot_col += 1;
                        continue;
                    }
                }
            }

            let f = aug[pivot_row * width + pivot_col];
            for cell in &mut aug[pivot_row * width..(pivot_row + 1) * width] {
                *cell /= f;
            }

            for i in 0..n {
                if i == pivot_row {
                    continue;
                }
                let p = aug[i * width + pivot_col];
                for j in 0..width {
                    aug[i * width + j] -= aug[pivot_row * width + j] * p;
                }
            }

            pivot_row += 1;
            pivot_col += 1;
        }

        // Keep the right half
        self.cells = aug
            .chunks(width)
            .flat_map(|row| row[n..].iter().copied())
            .collect();
        Ok(self)
    }

    /// Returns `A^-1` as a new matrix, leaving `self` untouched.
    pub fn inverse(&self) -> Result<Matrix> {
        let mut out = self.copy();
        out.invert()?;
        Ok(out)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use itertools::iproduct;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn m(lines: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_list(lines).unwrap()
    }

    fn assert_near(actual: &Matrix, expected: &Matrix) {
        assert_eq!(actual.shape(), expected.shape());
        for (a, e) in actual.to_array().iter().zip(expected.to_array().iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invert_2x2() {
        init();
        let mut a = m(vec![vec![4.0, 7.0], vec![2.0, 6.0]]);
        a.invert().unwrap();
        assert_near(&a, &m(vec![vec![0.6, -0.7], vec![-0.2, 0.4]]));
    }

    #[test]
    fn test_invert_needs_row_swap() {
        init();
        let mut a = m(vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
        a.invert().unwrap();
        assert_near(&a, &m(vec![vec![-1.5, 0.5], vec![1.0, 0.0]]));

        let mut p = m(vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let original = p.copy();
        p.invert().unwrap();
        assert_near(&p, &Matrix::transpose(&original));
    }

    #[test]
    fn test_invert_tridiagonal() {
        init();
        let a = m(vec![
            vec![2.0, -1.0, 0.0],
            vec![-1.0, 2.0, -1.0],
            vec![0.0, -1.0, 2.0],
        ]);
        let inv = a.inverse().unwrap();
        let mut expected = m(vec![
            vec![3.0, 2.0, 1.0],
            vec![2.0, 4.0, 2.0],
            vec![1.0, 2.0, 3.0],
        ]);
        expected.multiply_scalar(0.25);
        assert_near(&inv, &expected);
        assert_near(&Matrix::matmul(&a, &inv).unwrap(), &Matrix::identity(3));
        assert_near(&Matrix::matmul(&inv, &a).unwrap(), &Matrix::identity(3));
    }

    #[test]
    fn test_invert_identity_and_empty() {
        let mut i = Matrix::identity(4);
        i.invert().unwrap();
        assert_eq!(i, Matrix::identity(4));

        let mut empty = Matrix::new(0, 0);
        empty.invert().unwrap();
        assert_eq!(empty.shape(), (0, 0));
    }

    #[test]
    fn test_invert_chaining() {
        let mut a = m(vec![vec![2.0, 0.0], vec![0.0, 4.0]]);
        a.invert().unwrap().multiply_scalar(4.0);
        assert_near(&a, &m(vec![vec![2.0, 0.0], vec![0.0, 1.0]]));
    }

    #[test]
    fn test_invert_not_square() {
        let mut a = Matrix::new(2, 3);
        assert!(matches!(
            a.invert(),
            Err(MatrixError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_invert_singular() {
        init();
        let mut zeros = Matrix::new(3, 3);
        assert!(matches!(
            zeros.invert(),
            Err(MatrixError::SingularMatrix { rank: 0 })
        ));
        assert_eq!(zeros, Matrix::new(3, 3));

        let mut a = m(vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
        assert!(matches!(
            a.invert(),
            Err(MatrixError::SingularMatrix { rank: 1 })
        ));
        assert_eq!(a.to_list(), vec![vec![1.0, 2.0], vec![2.0, 4.0]]);

        let b = m(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ]);
        assert!(matches!(
            b.inverse(),
            Err(MatrixError::SingularMatrix { rank: 2 })
        ));

        let mut single = Matrix::new(1, 1);
        assert!(single.invert().is_err());
    }

    #[test]
    fn test_invert_tolerance() {
        let tiny = m(vec![vec![1e-13, 0.0], vec![0.0, 1.0]]);

        let mut a = tiny.copy();
        assert!(matches!(
            a.invert(),
            Err(MatrixError::SingularMatrix { .. })
        ));

        let mut b = tiny.copy();
        b.invert_with(&InvertConfig::new().with_tolerance(1e-15))
            .unwrap();
        assert_relative_eq!(b.at(0, 0), 1e13, max_relative = 1e-12);
        assert_relative_eq!(b.at(1, 1), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_invert_small_scale_identity() {
        init();
        let mut a = Matrix::identity(3);
        a.multiply_scalar(1e-13);
        a.invert().unwrap();
        for (i, j) in iproduct!(0..3, 0..3) {
            let expected = if i == j { 1e13 } else { 0.0 };
            assert_relative_eq!(a.at(i, j), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_invert_large_scale_singular() {
        init();
        // third row is r1 / 3 + 0.7 * r2
        let r1 = [2.0, 1.0, 3.0];
        let r2 = [1.0, 4.0, 2.0];
        let r3: Vec<f64> = r1.iter().zip(&r2).map(|(a, b)| a / 3.0 + 0.7 * b).collect();
        let base = m(vec![r1.to_vec(), r2.to_vec(), r3]);

        for scale in [1.0, 1e6, 1e8] {
            let mut a = base.copy();
            a.multiply_scalar(scale);
            let before = a.copy();
            assert!(
                matches!(a.invert(), Err(MatrixError::SingularMatrix { rank: 2 })),
                "scale {} should be singular",
                scale
            );
            assert_eq!(a, before);
        }
    }

    #[test]
    fn test_invert_large_scale_regular() {
        let mut a = m(vec![vec![4.0, 7.0], vec![2.0, 6.0]]);
        a.multiply_scalar(1e8);
        a.invert().unwrap();
        let expected = [0.6e-8, -0.7e-8, -0.2e-8, 0.4e-8];
        for (got, want) in a.to_array().iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want, max_relative = 1e-9);
        }
    }
}
