//! Domain types for thicket-io.

use thicket_tree::{FeatureType, Sample};

use crate::IoError;

/// An unlabeled record identifier.
///
/// Wraps the string from the first column of a record CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub(crate) fn new(id: String) -> Self {
        Self(id)
    }

    /// Return the record id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Labeled samples read by [`SampleReader`](crate::SampleReader).
#[derive(Debug)]
pub struct LabeledDataset {
    feature_names: Vec<String>,
    feature_types: Vec<FeatureType>,
    samples: Vec<Sample>,
}

impl LabeledDataset {
    pub(crate) fn new(
        feature_names: Vec<String>,
        feature_types: Vec<FeatureType>,
        samples: Vec<Sample>,
    ) -> Self {
        Self {
            feature_names,
            feature_types,
            samples,
        }
    }

    /// Return the feature column names from the header.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the type of each feature column.
    #[must_use]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    /// Return the samples in file order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Unlabeled records read by [`RecordReader`](crate::RecordReader).
///
/// `ids[i]` corresponds to `features[i]`.
#[derive(Debug)]
pub struct RecordDataset {
    ids: Vec<RecordId>,
    feature_names: Vec<String>,
    feature_types: Vec<FeatureType>,
    features: Vec<Vec<f64>>,
}

impl RecordDataset {
    pub(crate) fn new(
        ids: Vec<RecordId>,
        feature_names: Vec<String>,
        feature_types: Vec<FeatureType>,
        features: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            ids,
            feature_names,
            feature_types,
            features,
        }
    }

    /// Return the record ids in file order.
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Return the feature column names from the header.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the type of each feature column.
    #[must_use]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the number of records.
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.ids.len()
    }
}
