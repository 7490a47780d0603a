use thiserror::Error;

pub type LpResult<T> = Result<T, LpError>;

#[derive(Debug, Error)]
pub enum LpError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors raised while checking the header row of an execution statistics report.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
}

/// Errors related to cell parsing, symbol scoping and data frame operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to normalize column '{column}' at row {row}: '{value}' is not a number")]
    Normalization {
        column: String,
        value: String,
        row: usize,
    },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Unknown core symbol: '{0}'")]
    UnknownSymbol(String),

    #[error("Unknown performance metric: '{0}'")]
    UnknownMetric(String),

    #[error("Data frame error: {0}")]
    DataFrame(String),
}

/// Errors related to reading the uploaded report and writing exports.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("Error reading file: {0}")]
    FileRead(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Failed to write data: {0}")]
    WriteFailed(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to internal invariants.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Cannot select best and worst stream from an empty subset")]
    EmptySubset,
}
