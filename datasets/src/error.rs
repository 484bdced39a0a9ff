use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Failures while reading a dataset
///
/// Rows are the line numbers of the file, starting at one and counting the header.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} has {columns} column(s), at least two are needed")]
    TooFewColumns { row: u64, columns: usize },
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: u64,
        expected: usize,
        actual: usize,
    },
    #[error("row {row}, column {column}: `{value}` is not a number")]
    ParseFloat {
        row: u64,
        column: usize,
        value: String,
    },
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
}
