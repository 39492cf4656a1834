//! Configuration builder for decision-tree induction.

use tracing::{debug, instrument};

use crate::class_index::ClassIndex;
use crate::complexity::ComplexityWeights;
use crate::error::TreeError;
use crate::feature::FeatureType;
use crate::inducer::{Inducer, Limits};
use crate::quality::{QualityKind, QualityMeasure};
use crate::sample::Sample;
use crate::tree::DecisionTree;

/// Configuration for greedy decision-tree induction.
///
/// Construct via [`InducerConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `quality`           | `Mcc`                 |
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `complexity`        | class 1.0, decision 1.0 |
#[derive(Debug, Clone)]
pub struct InducerConfig {
    pub(crate) quality: QualityKind,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) complexity: ComplexityWeights,
}

impl InducerConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quality: QualityKind::Mcc,
            max_depth: None,
            min_samples_split: 2,
            complexity: ComplexityWeights::default(),
        }
    }

    /// Set the built-in quality measure used by [`fit`](Self::fit).
    #[must_use]
    pub fn with_quality(mut self, quality: QualityKind) -> Self {
        self.quality = quality;
        self
    }

    /// Set the maximum tree depth.
    ///
    /// `None` lets the search recurse until no attribute can split. `Some(d)`
    /// turns every node at depth `d` into a majority leaf (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples a node needs before splits are tried.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the complexity unit weights.
    #[must_use]
    pub fn with_complexity(mut self, complexity: ComplexityWeights) -> Self {
        self.complexity = complexity;
        self
    }

    // --- Getters ---

    /// Return the built-in quality measure.
    #[must_use]
    pub fn quality(&self) -> QualityKind {
        self.quality
    }

    /// Return the maximum depth limit, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the complexity weights.
    #[must_use]
    pub fn complexity(&self) -> ComplexityWeights {
        self.complexity
    }

    /// Induce a tree with the configured built-in quality measure.
    ///
    /// # Errors
    ///
    /// See [`fit_with`](Self::fit_with).
    pub fn fit(
        &self,
        samples: &[Sample],
        feature_types: &[FeatureType],
    ) -> Result<DecisionTree, TreeError> {
        self.fit_with(&self.quality, samples, feature_types)
    }

    /// Induce a tree scored by a caller-supplied quality measure.
    ///
    /// # Errors
    ///
    /// | Variant                                  | When                                              |
    /// |------------------------------------------|---------------------------------------------------|
    /// | [`TreeError::EmptyDataset`]              | `samples` is empty                                |
    /// | [`TreeError::ZeroFeatures`]              | samples have zero feature columns                 |
    /// | [`TreeError::FeatureCountMismatch`]      | samples have inconsistent lengths                 |
    /// | [`TreeError::FeatureTypeCountMismatch`]  | `feature_types` does not match the column count   |
    /// | [`TreeError::NonFiniteValue`]            | a numerical value is infinite                     |
    /// | [`TreeError::InvalidCode`]               | a nominal/boolean value is not a valid code       |
    /// | [`TreeError::InvalidMaxDepth`]           | `max_depth` is `Some(0)`                          |
    /// | [`TreeError::InvalidMinSamplesSplit`]    | `min_samples_split` < 2                           |
    /// | [`TreeError::InvalidComplexityWeight`]   | a weight is negative or not finite                |
    #[instrument(skip_all, fields(n_samples = samples.len()))]
    pub fn fit_with<Q>(
        &self,
        measure: &Q,
        samples: &[Sample],
        feature_types: &[FeatureType],
    ) -> Result<DecisionTree, TreeError>
    where
        Q: QualityMeasure,
    {
        self.validate()?;
        let n_features = validate_samples(samples, feature_types)?;

        let refs: Vec<&Sample> = samples.iter().collect();
        let limits = Limits {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
        };

        let labels = ClassIndex::from_samples(samples).labels().to_vec();
        debug!(
            n_samples = samples.len(),
            n_features,
            n_classes = labels.len(),
            "inducing decision tree"
        );

        let induced =
            Inducer::new(feature_types, measure, self.complexity, limits).induce(&refs, None, 0);

        let tree = DecisionTree::new(
            induced.node,
            feature_types.to_vec(),
            labels,
            induced.quality,
            induced.complexity,
        );

        debug!(
            n_nodes = tree.n_nodes(),
            depth = tree.depth(),
            quality = tree.quality(),
            complexity = tree.complexity(),
            "decision tree induced"
        );

        Ok(tree)
    }

    fn validate(&self) -> Result<(), TreeError> {
        if self.max_depth == Some(0) {
            return Err(TreeError::InvalidMaxDepth { max_depth: 0 });
        }

        if self.min_samples_split < 2 {
            return Err(TreeError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }

        for (name, value) in [
            ("class_unit", self.complexity.class_unit()),
            ("decision_unit", self.complexity.decision_unit()),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TreeError::InvalidComplexityWeight { name, value });
            }
        }

        Ok(())
    }
}

impl Default for InducerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the sample matrix against the feature types; return the column count.
fn validate_samples(samples: &[Sample], feature_types: &[FeatureType]) -> Result<usize, TreeError> {
    let Some(first) = samples.first() else {
        return Err(TreeError::EmptyDataset);
    };

    let n_features = first.n_features();
    if n_features == 0 {
        return Err(TreeError::ZeroFeatures);
    }

    if feature_types.len() != n_features {
        return Err(TreeError::FeatureTypeCountMismatch {
            expected: n_features,
            got: feature_types.len(),
        });
    }

    for (sample_index, sample) in samples.iter().enumerate() {
        if sample.n_features() != n_features {
            return Err(TreeError::FeatureCountMismatch {
                expected: n_features,
                got: sample.n_features(),
                sample_index,
            });
        }
        for (feature_index, (&value, &kind)) in sample.features().iter().zip(feature_types).enumerate() {
            if kind.accepts(value) {
                continue;
            }
            if kind == FeatureType::Numerical {
                return Err(TreeError::NonFiniteValue {
                    sample_index,
                    feature_index,
                });
            }
            return Err(TreeError::InvalidCode {
                sample_index,
                feature_index,
                value,
                kind,
            });
        }
    }

    Ok(n_features)
}
