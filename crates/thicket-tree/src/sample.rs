//! Labeled feature vectors.

/// An integer class label in the caller's label domain.
///
/// Labels are arbitrary (negative, sparse, unordered); [`ClassIndex`](crate::ClassIndex)
/// maps them onto a dense index space.
pub type ClassLabel = i64;

/// One labeled training example.
///
/// Immutable once constructed. Feature values are encoded per
/// [`FeatureType`](crate::FeatureType); NaN marks an unspecified value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    label: ClassLabel,
    features: Vec<f64>,
}

impl Sample {
    /// Create a sample from a class label and its feature vector.
    #[must_use]
    pub fn new(label: ClassLabel, features: Vec<f64>) -> Self {
        Self { label, features }
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> ClassLabel {
        self.label
    }

    /// Return the feature vector.
    #[must_use]
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Return the raw value of one feature column.
    ///
    /// # Panics
    ///
    /// Panics if `attribute` is out of range.
    #[must_use]
    pub fn value(&self, attribute: usize) -> f64 {
        self.features[attribute]
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Return a copy of this sample carrying a different label.
    #[must_use]
    pub fn relabeled(&self, label: ClassLabel) -> Self {
        Self {
            label,
            features: self.features.clone(),
        }
    }
}
