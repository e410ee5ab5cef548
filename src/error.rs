use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrateError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required CSV header: {0}")]
    MissingHeader(String),

    /// The first row anchors the forward-fill, so it must carry every rank.
    /// `row` is the 1-based data row, header line excluded.
    #[error("No value to carry forward for column '{column}': row {row} is empty")]
    MissingAnchor { column: String, row: usize },

    #[error("Order '{0}' does not appear in the table")]
    UnknownOrder(String),

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

pub type Result<T> = std::result::Result<T, CrateError>;
