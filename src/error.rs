use pyo3::exceptions::PyRuntimeError;
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WageError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Failed to load {file}: {source}")]
    FileLoad {
        file: String,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid {what} selection: '{value}' is not present in the loaded data")]
    InvalidSelection { what: &'static str, value: String },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    General(String),
}

impl From<WageError> for PyErr {
    fn from(err: WageError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}

impl From<PyErr> for WageError {
    fn from(err: PyErr) -> Self {
        WageError::General(err.to_string())
    }
}
