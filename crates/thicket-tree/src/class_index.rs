//! Dense renumbering of arbitrary class labels.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::error::TreeError;
use crate::sample::{ClassLabel, Sample};

/// Bijection between observed class labels and indices `0..K`.
///
/// Indices are ordered by descending occurrence count, ties broken by
/// ascending label, so index 0 is always the majority class. Candidate
/// construction walks classes in this order: majority classes claim
/// feature values first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIndex {
    labels: Vec<ClassLabel>,
    counts: Vec<usize>,
    positions: HashMap<ClassLabel, usize>,
}

impl ClassIndex {
    /// Build the index from the labels of `samples`.
    pub fn from_samples<'s, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'s Sample>,
    {
        Self::from_labels(samples.into_iter().map(Sample::label))
    }

    /// Build the index from a sequence of labels.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = ClassLabel>,
    {
        let mut tally: BTreeMap<ClassLabel, usize> = BTreeMap::new();
        for label in labels {
            *tally.entry(label).or_insert(0) += 1;
        }

        // BTreeMap yields ascending labels; a stable sort on count keeps that
        // order among equal counts.
        let mut ordered: Vec<(ClassLabel, usize)> = tally.into_iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));

        let positions = ordered
            .iter()
            .enumerate()
            .map(|(idx, &(label, _))| (label, idx))
            .collect();
        let (labels, counts) = ordered.into_iter().unzip();

        Self {
            labels,
            counts,
            positions,
        }
    }

    /// Return the number of distinct classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Return the total number of labels counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Return the label at a class index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_classes()`.
    #[must_use]
    pub fn label(&self, index: usize) -> ClassLabel {
        self.labels[index]
    }

    /// Return the class index of a label, if the label was observed.
    #[must_use]
    pub fn index_of(&self, label: ClassLabel) -> Option<usize> {
        self.positions.get(&label).copied()
    }

    /// Return the occurrence count of a class index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_classes()`.
    #[must_use]
    pub fn count(&self, index: usize) -> usize {
        self.counts[index]
    }

    /// Return all labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Return all counts in index order.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Return the index of the most frequent class.
    #[must_use]
    pub fn largest_class(&self) -> Option<usize> {
        (!self.labels.is_empty()).then_some(0)
    }

    /// Return the index of the least frequent class.
    #[must_use]
    pub fn smallest_class(&self) -> Option<usize> {
        self.labels.len().checked_sub(1)
    }

    /// Return the label of the most frequent class.
    #[must_use]
    pub fn majority_label(&self) -> Option<ClassLabel> {
        self.labels.first().copied()
    }

    /// Return `true` if every label already equals its own index.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.labels
            .iter()
            .enumerate()
            .all(|(idx, &label)| usize::try_from(label).is_ok_and(|l| l == idx))
    }

    /// Relabel one sample from label space into index space.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownClassLabel`] if the sample's label is not indexed.
    pub fn sample_to_index_space(&self, sample: &Sample) -> Result<Sample, TreeError> {
        let index = self
            .index_of(sample.label())
            .ok_or(TreeError::UnknownClassLabel {
                label: sample.label(),
            })?;
        Ok(sample.relabeled(index as ClassLabel))
    }

    /// Relabel a sample slice into index space.
    ///
    /// Borrows the input unchanged when no relabeling is needed.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownClassLabel`] if any label is not indexed.
    pub fn to_index_space<'a>(&self, samples: &'a [Sample]) -> Result<Cow<'a, [Sample]>, TreeError> {
        if self.is_identity() {
            if let Some(unknown) = samples.iter().find(|s| self.index_of(s.label()).is_none()) {
                return Err(TreeError::UnknownClassLabel {
                    label: unknown.label(),
                });
            }
            return Ok(Cow::Borrowed(samples));
        }
        samples
            .iter()
            .map(|s| self.sample_to_index_space(s))
            .collect::<Result<Vec<_>, _>>()
            .map(Cow::Owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(labels: &[ClassLabel]) -> Vec<Sample> {
        labels.iter().map(|&l| Sample::new(l, vec![0.0])).collect()
    }

    #[test]
    fn orders_by_descending_count() {
        let index = ClassIndex::from_labels([5, 9, 9, 9, 5, 2]);
        assert_eq!(index.labels(), &[9, 5, 2]);
        assert_eq!(index.counts(), &[3, 2, 1]);
        assert_eq!(index.largest_class(), Some(0));
        assert_eq!(index.smallest_class(), Some(2));
        assert_eq!(index.majority_label(), Some(9));
    }

    #[test]
    fn ties_broken_by_ascending_label() {
        let index = ClassIndex::from_labels([40, 10, 30, 10, 40, 30]);
        assert_eq!(index.labels(), &[10, 30, 40]);
        assert_eq!(index.index_of(30), Some(1));
        assert_eq!(index.index_of(7), None);
    }

    #[test]
    fn order_independent_of_input_order() {
        let a = ClassIndex::from_labels([1, 2, 2, 3]);
        let b = ClassIndex::from_labels([3, 2, 1, 2]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_index() {
        let index = ClassIndex::from_labels(std::iter::empty());
        assert_eq!(index.n_classes(), 0);
        assert_eq!(index.total(), 0);
        assert_eq!(index.largest_class(), None);
        assert_eq!(index.smallest_class(), None);
        assert_eq!(index.majority_label(), None);
    }

    #[test]
    fn identity_mapping_borrows() {
        let data = samples(&[0, 0, 1]);
        let index = ClassIndex::from_samples(&data);
        assert!(index.is_identity());
        let mapped = index.to_index_space(&data).unwrap();
        assert!(matches!(mapped, Cow::Borrowed(_)));
    }

    #[test]
    fn relabels_into_index_space() {
        let data = samples(&[-4, 17, 17]);
        let index = ClassIndex::from_samples(&data);
        let mapped = index.to_index_space(&data).unwrap();
        assert!(matches!(mapped, Cow::Owned(_)));
        let labels: Vec<ClassLabel> = mapped.iter().map(Sample::label).collect();
        assert_eq!(labels, vec![1, 0, 0]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let index = ClassIndex::from_labels([1, 2]);
        let err = index.sample_to_index_space(&Sample::new(3, vec![])).unwrap_err();
        assert!(matches!(err, TreeError::UnknownClassLabel { label: 3 }));
    }
}
