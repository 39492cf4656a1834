//! Recursive greedy induction.
//!
//! Each call builds a majority-class leaf as the baseline, then tries one
//! decision node per attribute and keeps the candidate with the best
//! quality, breaking quality ties on lower complexity. Attributes are tried
//! in index order and classes in [`ClassIndex`] order, so the result is fully
//! determined by the input.

use tracing::trace;

use crate::candidate::build_assignments;
use crate::class_index::ClassIndex;
use crate::complexity::{ComplexityWeights, complexity_nested};
use crate::feature::{FeatureIndex, FeatureType};
use crate::node::{Branch, TreeNode};
use crate::quality::QualityMeasure;
use crate::sample::Sample;

/// A subtree together with its score on the samples it was induced from.
#[derive(Debug, Clone)]
pub(crate) struct Induced {
    pub(crate) node: TreeNode,
    pub(crate) quality: f64,
    pub(crate) complexity: f64,
}

/// A decision node candidate before it is scored.
struct Candidate {
    node: TreeNode,
    complexity: f64,
}

/// Stop conditions applied on top of the search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
}

pub(crate) struct Inducer<'a, Q> {
    feature_types: &'a [FeatureType],
    measure: &'a Q,
    weights: ComplexityWeights,
    limits: Limits,
}

impl<'a, Q> Inducer<'a, Q>
where
    Q: QualityMeasure,
{
    pub(crate) fn new(
        feature_types: &'a [FeatureType],
        measure: &'a Q,
        weights: ComplexityWeights,
        limits: Limits,
    ) -> Self {
        Self {
            feature_types,
            measure,
            weights,
            limits,
        }
    }

    /// Induce the best subtree for `samples`.
    ///
    /// `skip` is the attribute that routed samples here; it is not re-split
    /// immediately. `depth` is the distance from the root.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub(crate) fn induce(&self, samples: &[&Sample], skip: Option<usize>, depth: usize) -> Induced {
        assert!(!samples.is_empty(), "induction needs at least one sample");

        let classes = ClassIndex::from_samples(samples.iter().copied());
        let Some(majority) = classes.majority_label() else {
            unreachable!("a non-empty sample set has a majority class");
        };

        let mut token = self.measure.create_token(samples);
        let baseline = TreeNode::leaf(majority);
        let baseline_quality = self.measure.evaluate(&baseline, &mut token, samples);

        if classes.n_classes() == 1 {
            return Induced {
                node: baseline,
                quality: baseline_quality,
                complexity: 0.0,
            };
        }

        let mut best = Induced {
            node: baseline,
            quality: baseline_quality,
            complexity: self.weights.class_unit(),
        };

        let too_deep = self.limits.max_depth.is_some_and(|max_d| depth >= max_d);
        if too_deep || samples.len() < self.limits.min_samples_split {
            return best;
        }

        for (attribute, &feature_type) in self.feature_types.iter().enumerate() {
            if skip == Some(attribute) {
                continue;
            }
            let Some(candidate) = self.try_attribute(samples, attribute, feature_type, &classes, depth)
            else {
                continue;
            };

            let quality = self.measure.evaluate(&candidate.node, &mut token, samples);
            trace!(
                depth,
                attribute,
                quality,
                complexity = candidate.complexity,
                best_quality = best.quality,
                best_complexity = best.complexity,
                "scored split candidate"
            );

            if quality < best.quality
                || (quality <= best.quality && candidate.complexity < best.complexity)
            {
                best = Induced {
                    node: candidate.node,
                    quality,
                    complexity: candidate.complexity,
                };
            }
        }

        best
    }

    /// Build the decision node splitting on `attribute`, if it yields two usable branches.
    ///
    /// Each trial partitions its own copy of the node's sample list; samples
    /// claimed by an earlier branch are moved out of the working copy, and a
    /// discarded branch leaves the copy as it was.
    fn try_attribute(
        &self,
        samples: &[&Sample],
        attribute: usize,
        feature_type: FeatureType,
        classes: &ClassIndex,
        depth: usize,
    ) -> Option<Candidate> {
        let assignments = build_assignments(samples, attribute, feature_type, classes)?;

        let mut working: Vec<&Sample> = samples.to_vec();
        let mut branches = Vec::with_capacity(assignments.len());
        let mut pairs = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let (matched, rest): (Vec<&Sample>, Vec<&Sample>) = working
                .into_iter()
                .partition(|s| assignment.matches(s.value(attribute)));
            working = rest;

            if matched.is_empty() {
                continue;
            }

            let child = self.induce(&matched, Some(attribute), depth + 1);
            pairs.push((
                child.complexity,
                self.weights.branch_overhead(assignment.complexity()),
            ));
            branches.push(Branch::new(assignment, child.node));
        }

        if branches.len() < 2 {
            trace!(depth, attribute, n_branches = branches.len(), "attribute discarded");
            return None;
        }

        // The last branch is the implicit catch-all and costs no test.
        if let Some(last) = pairs.last_mut() {
            last.1 = 0.0;
        }

        Some(Candidate {
            node: TreeNode::decision(FeatureIndex::new(attribute), branches),
            complexity: complexity_nested(&pairs),
        })
    }
}
