use std::path::PathBuf;

use crate::sample::ClassLabel;

/// Errors from decision-tree induction, prediction, and persistence.
///
/// Induction itself is total; every variant here is raised at the public
/// boundary before or after the recursive search runs.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when min_samples_split is less than 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value provided.
        min_samples_split: usize,
    },

    /// Returned when a complexity weight is negative or not finite.
    #[error("complexity weight {name} must be finite and non-negative, got {value}")]
    InvalidComplexityWeight {
        /// Name of the offending weight.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the feature-type list does not cover every feature column.
    #[error("{got} feature types given for {expected} feature columns")]
    FeatureTypeCountMismatch {
        /// The number of feature columns in the samples.
        expected: usize,
        /// The number of feature types supplied.
        got: usize,
    },

    /// Returned when a numerical value is infinite.
    ///
    /// NaN is accepted and means "unspecified".
    #[error("infinite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a nominal or boolean column holds a value that is not a valid code.
    #[error("value {value} at sample {sample_index}, feature {feature_index} is not a valid {kind} code")]
    InvalidCode {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
        /// The rejected raw value.
        value: f64,
        /// The feature type the column was declared as.
        kind: crate::FeatureType,
    },

    /// Returned when parsing a feature type name fails.
    #[error("unknown feature type \"{name}\" (expected numerical, nominal, or boolean)")]
    UnknownFeatureType {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a label is looked up that the class index has never seen.
    #[error("class label {label} is not part of the class index")]
    UnknownClassLabel {
        /// The unknown label.
        label: ClassLabel,
    },

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },
}
