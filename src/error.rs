use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a resonance dataset.
///
/// Missing libration files, under-populated libration sets and resonances
/// without matching asteroids are *not* errors: the join skips them and
/// counts them in its report.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Unknown catalog family, unsupported task or inconsistent descriptor.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A semi-major axis that cannot feed the Kepler derivation.
    #[error("invalid semi-major axis {value} at row {row}")]
    DataQuality { row: usize, value: f64 },

    #[error("column {index} is out of range for a matrix with {width} columns")]
    ColumnOutOfRange { index: usize, width: usize },

    #[error("schema mismatch: expected {expected} columns, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("cache {} does not match the dataset schema: expected `{expected}`, found `{found}`", path.display())]
    CacheSchema {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("export failed: {0}")]
    Export(String),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        DatasetError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<arrow::error::ArrowError> for DatasetError {
    fn from(err: arrow::error::ArrowError) -> Self {
        DatasetError::Export(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for DatasetError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        DatasetError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
