//! I/O error types for thicket-io.

use std::path::PathBuf;

use thicket_tree::{FeatureType, TreeError};

/// Errors from file I/O, CSV parsing, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header has no columns beyond the label or id column.
    #[error("no feature columns in {path}")]
    NoFeatureColumns {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when the feature-type schema does not cover every feature column.
    #[error("{got} feature types given for {expected} feature columns in {path}")]
    SchemaMismatch {
        /// Path to the CSV file.
        path: PathBuf,
        /// Number of feature columns in the header.
        expected: usize,
        /// Number of feature types supplied.
        got: usize,
    },

    /// Returned when a label cell is not an integer.
    #[error("invalid label in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidLabel {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw label text.
        raw: String,
    },

    /// Returned when a feature cell cannot be read as a value of its column type.
    #[error("invalid {kind} value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    InvalidValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based feature column index.
        col_index: usize,
        /// The column type.
        kind: FeatureType,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when the same record id appears more than once.
    #[error("duplicate record id \"{id}\" in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateRecordId {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated id.
        id: String,
        /// Zero-based row index of the first occurrence.
        first_row: usize,
        /// Zero-based row index of the second occurrence.
        second_row: usize,
    },

    /// Returned when an entry of a feature-type schema is not recognised.
    #[error("invalid feature type at position {position}")]
    InvalidFeatureType {
        /// Zero-based position in the schema.
        position: usize,
        /// Underlying parse error.
        source: TreeError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
