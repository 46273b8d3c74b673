use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("invalid dimensions {rows}x{cols}")]
    InvalidDimension { rows: i64, cols: i64 },

    #[error("dimension mismatch in {op}: {}x{} vs {}x{}", .lhs.0, .lhs.1, .rhs.0, .rhs.1)]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    #[error("cannot invert a non-square {rows}x{cols} matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular (rank {rank})")]
    SingularMatrix { rank: usize },

    #[error("malformed matrix data: {0}")]
    MalformedData(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
