use crate::error::MatrixError;
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_serde::MatrixData;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString, PyType};

#[derive(Debug, Clone)]
#[pyclass(name = "Matrix")]
pub struct PyMatrix {
    pub inner: Matrix,
}

/// Right-hand side of `add` / `multiply`: another matrix or a number.
#[derive(FromPyObject)]
enum Operand {
    Matrix(PyMatrix),
    Scalar(f64),
}

fn to_py_err(error: MatrixError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn field<'py>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Bound<'py, PyAny>> {
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("missing key '{}'", key)))
}

impl From<Matrix> for PyMatrix {
    fn from(inner: Matrix) -> Self {
        PyMatrix { inner }
    }
}

#[pymethods]
impl PyMatrix {
    #[new]
    pub fn new(rows: i64, cols: i64) -> PyResult<Self> {
        Matrix::try_new(rows, cols).map(Self::from).map_err(to_py_err)
    }

    #[classmethod]
    pub fn from_array(_cls: &Bound<PyType>, values: Vec<f64>) -> Self {
        Matrix::from_array(&values).into()
    }

    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<f64>>) -> PyResult<Self> {
        Matrix::from_list(lines).map(Self::from).map_err(to_py_err)
    }

    #[classmethod]
    pub fn identity(_cls: &Bound<PyType>, n: usize) -> Self {
        Matrix::identity(n).into()
    }

    /// Accepts the JSON text produced by `serialize` or a dict with the same keys.
    #[classmethod]
    pub fn deserialize(_cls: &Bound<PyType>, data: &Bound<PyAny>) -> PyResult<Self> {
        if let Ok(text) = data.downcast::<PyString>() {
            let text = text.to_str()?;
            return Matrix::from_json(text).map(Self::from).map_err(to_py_err);
        }

        let dict = data.downcast::<PyDict>()?;
        let structured = MatrixData {
            rows: field(dict, "rows")?.extract()?,
            cols: field(dict, "cols")?.extract()?,
            data: field(dict, "data")?.extract()?,
        };
        Matrix::from_json(structured)
            .map(Self::from)
            .map_err(to_py_err)
    }

    pub fn serialize(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    pub fn to_array(&self) -> Vec<f64> {
        self.inner.to_array()
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    pub fn copy(&self) -> Self {
        self.inner.copy().into()
    }

    fn add<'py>(mut slf: PyRefMut<'py, Self>, other: Operand) -> PyResult<PyRefMut<'py, Self>> {
        match other {
            Operand::Matrix(rhs) => {
                slf.inner.add(&rhs.inner).map_err(to_py_err)?;
            }
            Operand::Scalar(n) => {
                slf.inner.add_scalar(n);
            }
        }
        Ok(slf)
    }

    fn multiply<'py>(
        mut slf: PyRefMut<'py, Self>,
        other: Operand,
    ) -> PyResult<PyRefMut<'py, Self>> {
        match other {
            Operand::Matrix(rhs) => {
                slf.inner.multiply(&rhs.inner).map_err(to_py_err)?;
            }
            Operand::Scalar(n) => {
                slf.inner.multiply_scalar(n);
            }
        }
        Ok(slf)
    }

    fn randomize(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.randomize();
        slf
    }

    fn invert(mut slf: PyRefMut<'_, Self>) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.invert().map_err(to_py_err)?;
        Ok(slf)
    }

    #[staticmethod]
    pub fn matmul(a: &PyMatrix, b: &PyMatrix) -> PyResult<PyMatrix> {
        Matrix::matmul(&a.inner, &b.inner)
            .map(Self::from)
            .map_err(to_py_err)
    }

    #[staticmethod]
    pub fn subtract(a: &PyMatrix, b: &PyMatrix) -> PyResult<PyMatrix> {
        Matrix::subtract(&a.inner, &b.inner)
            .map(Self::from)
            .map_err(to_py_err)
    }

    #[staticmethod]
    pub fn transpose(m: &PyMatrix) -> PyMatrix {
        Matrix::transpose(&m.inner).into()
    }

    pub fn __add__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        (&self.inner + &rhs.inner).map(Self::from).map_err(to_py_err)
    }

    pub fn __sub__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        (&self.inner - &rhs.inner).map(Self::from).map_err(to_py_err)
    }

    pub fn __matmul__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        (&self.inner * &rhs.inner).map(Self::from).map_err(to_py_err)
    }

    pub fn __neg__(&self) -> PyMatrix {
        (-&self.inner).into()
    }

    pub fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
