#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod error;

pub mod matrix {
    pub mod matrix;
    pub mod matrix_config;
    pub mod matrix_invert;
    pub mod matrix_ops;
    #[cfg(feature = "python")]
    pub mod matrix_py;
    pub mod matrix_serde;
}

pub use error::{MatrixError, Result};
pub use matrix::matrix::Matrix;
pub use matrix::matrix_config::InvertConfig;
pub use matrix::matrix_serde::{Encoded, MatrixData};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn matrix_algebra(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<matrix::matrix_py::PyMatrix>()?;
    Ok(())
}
