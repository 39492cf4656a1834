//! The fitted decision tree: classification, hold-out scoring, structure queries.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::confusion::ConfusionMatrix;
use crate::error::TreeError;
use crate::feature::FeatureType;
use crate::node::TreeNode;
use crate::quality::Classifier;
use crate::sample::{ClassLabel, Sample};

/// A decision tree induced by [`InducerConfig::fit`](crate::InducerConfig::fit).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    pub(crate) root: TreeNode,
    pub(crate) feature_types: Vec<FeatureType>,
    pub(crate) class_labels: Vec<ClassLabel>,
    pub(crate) quality: f64,
    pub(crate) complexity: f64,
}

impl DecisionTree {
    pub(crate) fn new(
        root: TreeNode,
        feature_types: Vec<FeatureType>,
        class_labels: Vec<ClassLabel>,
        quality: f64,
        complexity: f64,
    ) -> Self {
        Self {
            root,
            feature_types,
            class_labels,
            quality,
            complexity,
        }
    }

    /// Classify a single feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when
    /// `features.len() != n_features`.
    pub fn classify(&self, features: &[f64]) -> Result<ClassLabel, TreeError> {
        if features.len() != self.n_features() {
            return Err(TreeError::PredictionFeatureMismatch {
                expected: self.n_features(),
                got: features.len(),
            });
        }
        Ok(self.root.classify(features))
    }

    /// Classify a batch of feature vectors in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] if any row has the wrong length.
    pub fn classify_batch(&self, features: &[Vec<f64>]) -> Result<Vec<ClassLabel>, TreeError> {
        features
            .into_par_iter()
            .map(|row| self.classify(row))
            .collect()
    }

    /// Score the tree on labeled samples.
    ///
    /// The matrix is indexed by the classes present in `samples`; predictions
    /// of any other class are counted in its unmatched column.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] if any sample has the
    /// wrong length.
    pub fn evaluate(&self, samples: &[Sample]) -> Result<ConfusionMatrix, TreeError> {
        if let Some(bad) = samples.iter().find(|s| s.n_features() != self.n_features()) {
            return Err(TreeError::PredictionFeatureMismatch {
                expected: self.n_features(),
                got: bad.n_features(),
            });
        }
        let mut matrix = ConfusionMatrix::from_samples(samples);
        matrix.fill(&self.root, samples);
        Ok(matrix)
    }

    /// Number of decision nodes testing each feature.
    #[must_use]
    pub fn attribute_usage(&self) -> Vec<usize> {
        let mut usage = vec![0usize; self.n_features()];
        self.root.walk(&mut |node| {
            if let TreeNode::Decision { attribute, .. } = node {
                usage[attribute.index()] += 1;
            }
        });
        usage
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Depth of the tree; a lone leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Return the feature types the tree was induced with.
    #[must_use]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    /// Return the number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_types.len()
    }

    /// Return the training class labels, most frequent first.
    #[must_use]
    pub fn class_labels(&self) -> &[ClassLabel] {
        &self.class_labels
    }

    /// Return the number of training classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.class_labels.len()
    }

    /// Quality of the root on the training samples (lower is better).
    #[must_use]
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Complexity of the whole tree.
    #[must_use]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }
}

impl Classifier for DecisionTree {
    fn classify(&self, features: &[f64]) -> ClassLabel {
        self.root.classify(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InducerConfig;
    use crate::quality::ErrorRate;

    fn make_separable() -> Vec<Sample> {
        vec![
            Sample::new(0, vec![1.0, 0.0]),
            Sample::new(0, vec![2.0, 0.0]),
            Sample::new(0, vec![3.0, 0.0]),
            Sample::new(1, vec![10.0, 0.0]),
            Sample::new(1, vec![11.0, 0.0]),
            Sample::new(1, vec![12.0, 0.0]),
        ]
    }

    fn numeric(n: usize) -> Vec<FeatureType> {
        vec![FeatureType::Numerical; n]
    }

    #[test]
    fn pure_dataset_is_single_leaf() {
        let data = vec![Sample::new(7, vec![1.0]), Sample::new(7, vec![2.0])];
        let tree = InducerConfig::new().fit(&data, &numeric(1)).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.classify(&[100.0]).unwrap(), 7);
        assert!(tree.complexity().abs() < f64::EPSILON);
    }

    #[test]
    fn separable_classifies_training_data() {
        let data = make_separable();
        let tree = InducerConfig::new().fit(&data, &numeric(2)).unwrap();
        for sample in &data {
            assert_eq!(tree.classify(sample.features()).unwrap(), sample.label());
        }
        assert_eq!(tree.attribute_usage(), vec![1, 0]);
        assert_eq!(tree.class_labels(), &[0, 1]);
    }

    #[test]
    fn overlapping_classes_need_two_levels() {
        // Neither attribute alone separates the three classes.
        let data = vec![
            Sample::new(0, vec![0.0, 0.0]),
            Sample::new(0, vec![0.0, 0.0]),
            Sample::new(0, vec![0.0, 0.0]),
            Sample::new(1, vec![0.0, 1.0]),
            Sample::new(1, vec![1.0, 0.0]),
            Sample::new(2, vec![1.0, 1.0]),
            Sample::new(2, vec![1.0, 1.0]),
        ];
        let types = vec![FeatureType::Boolean; 2];
        let tree = InducerConfig::new().fit(&data, &types).unwrap();
        assert_eq!(tree.depth(), 2);
        for sample in &data {
            assert_eq!(tree.classify(sample.features()).unwrap(), sample.label());
        }
        let cm = tree.evaluate(&data).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deterministic() {
        let data = make_separable();
        let a = InducerConfig::new().fit(&data, &numeric(2)).unwrap();
        let b = InducerConfig::new().fit(&data, &numeric(2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_measure() {
        let data = make_separable();
        let tree = InducerConfig::new()
            .fit_with(&ErrorRate, &data, &numeric(2))
            .unwrap();
        assert!(tree.quality().abs() < f64::EPSILON);
    }

    #[test]
    fn batch_matches_single() {
        let data = make_separable();
        let tree = InducerConfig::new().fit(&data, &numeric(2)).unwrap();
        let rows: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![6.0, 1.0], vec![7.0, 1.0], vec![1000.0, 0.0]];
        let batch = tree.classify_batch(&rows).unwrap();
        let single: Vec<ClassLabel> = rows.iter().map(|r| tree.classify(r).unwrap()).collect();
        assert_eq!(batch, single);
        assert_eq!(batch, vec![0, 0, 1, 1]);
    }

    #[test]
    fn prediction_feature_mismatch() {
        let tree = InducerConfig::new().fit(&make_separable(), &numeric(2)).unwrap();
        let err = tree.classify(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::PredictionFeatureMismatch { expected: 2, got: 1 }
        ));
        let err = tree.evaluate(&[Sample::new(0, vec![1.0])]).unwrap_err();
        assert!(matches!(err, TreeError::PredictionFeatureMismatch { .. }));
    }

    #[test]
    fn evaluate_counts_unseen_predictions() {
        let tree = InducerConfig::new().fit(&make_separable(), &numeric(2)).unwrap();
        // Only class 0 appears in the hold-out set; the class 1 prediction is unmatched.
        let holdout = vec![Sample::new(0, vec![1.0, 0.0]), Sample::new(0, vec![11.0, 0.0])];
        let cm = tree.evaluate(&holdout).unwrap();
        assert_eq!(cm.correct(), 1);
        assert_eq!(cm.unmatched(0), 1);
        assert!((cm.accuracy() - 0.5).abs() < f64::EPSILON);
    }
}
