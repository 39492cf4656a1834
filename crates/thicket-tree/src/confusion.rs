//! Confusion matrix and per-class classification metrics.

use std::fmt;

use crate::class_index::ClassIndex;
use crate::quality::Classifier;
use crate::sample::{ClassLabel, Sample};

/// A confusion matrix over a [`ClassIndex`].
///
/// Entry `matrix[actual][predicted]` counts how many samples whose label has
/// class index `actual` were classified as the label with class index
/// `predicted`. Predictions of labels the index has never seen are tallied
/// per actual class in a separate column and always count as errors.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    classes: ClassIndex,
    matrix: Vec<Vec<usize>>,
    unmatched: Vec<usize>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    /// The class label.
    pub class: ClassLabel,
    /// Precision: TP / (TP + FP). 0.0 if no predictions for this class.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if no true samples for this class.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix over the given class index.
    #[must_use]
    pub fn new(classes: ClassIndex) -> Self {
        let k = classes.n_classes();
        Self {
            classes,
            matrix: vec![vec![0usize; k]; k],
            unmatched: vec![0usize; k],
        }
    }

    /// Create an all-zero matrix over the classes observed in `samples`.
    pub fn from_samples<'s, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'s Sample>,
    {
        Self::new(ClassIndex::from_samples(samples))
    }

    /// Reset the counts, then tally `classifier` over `samples`.
    ///
    /// Samples whose own label is not in the class index are skipped.
    pub fn fill<'s, C, I>(&mut self, classifier: &C, samples: I)
    where
        C: Classifier + ?Sized,
        I: IntoIterator<Item = &'s Sample>,
    {
        self.reset();
        for sample in samples {
            let Some(actual) = self.classes.index_of(sample.label()) else {
                continue;
            };
            let predicted = classifier.classify(sample.features());
            match self.classes.index_of(predicted) {
                Some(p) => self.matrix[actual][p] += 1,
                None => self.unmatched[actual] += 1,
            }
        }
    }

    /// Zero every count.
    pub fn reset(&mut self) {
        self.matrix.iter_mut().for_each(|row| row.fill(0));
        self.unmatched.fill(0);
    }

    /// Return the count at an `(actual, predicted)` class-index pair.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        self.matrix[actual][predicted]
    }

    /// Return the count at an `(actual, predicted)` label pair; 0 for unknown labels.
    #[must_use]
    pub fn count_by_label(&self, actual: ClassLabel, predicted: ClassLabel) -> usize {
        match (self.classes.index_of(actual), self.classes.index_of(predicted)) {
            (Some(a), Some(p)) => self.matrix[a][p],
            _ => 0,
        }
    }

    /// Return how many samples of class index `actual` got a label outside the index.
    ///
    /// # Panics
    ///
    /// Panics if `actual` is out of range.
    #[must_use]
    pub fn unmatched(&self, actual: usize) -> usize {
        self.unmatched[actual]
    }

    /// Total number of tallied samples.
    #[must_use]
    pub fn total(&self) -> usize {
        let in_index: usize = self.matrix.iter().flat_map(|row| row.iter()).sum();
        in_index + self.unmatched.iter().sum::<usize>()
    }

    /// Number of correctly classified samples.
    #[must_use]
    pub fn correct(&self) -> usize {
        (0..self.n_classes()).map(|i| self.matrix[i][i]).sum()
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct() as f64 / total as f64
        }
    }

    /// Multi-class Matthews correlation coefficient (Gorodkin's R_K).
    ///
    /// Lies in `[-1, 1]`. When the statistic is undefined (a zero
    /// denominator), returns 1.0 for an error-free tally and 0.0 otherwise.
    #[must_use]
    pub fn matthews_correlation(&self) -> f64 {
        let k = self.n_classes();
        let s = self.total() as f64;
        let c = self.correct() as f64;

        let actual: Vec<f64> = (0..k)
            .map(|i| (self.matrix[i].iter().sum::<usize>() + self.unmatched[i]) as f64)
            .collect();
        let mut predicted: Vec<f64> = (0..k)
            .map(|j| (0..k).map(|i| self.matrix[i][j]).sum::<usize>() as f64)
            .collect();
        // Out-of-index predictions behave as one extra class with no true samples.
        predicted.push(self.unmatched.iter().sum::<usize>() as f64);

        let cov_xy = c * s - actual.iter().zip(&predicted).map(|(t, p)| t * p).sum::<f64>();
        let cov_xx = s * s - actual.iter().map(|t| t * t).sum::<f64>();
        let cov_yy = s * s - predicted.iter().map(|p| p * p).sum::<f64>();

        let denom = (cov_xx * cov_yy).sqrt();
        if denom == 0.0 || !denom.is_finite() {
            return if s > 0.0 && c == s { 1.0 } else { 0.0 };
        }
        (cov_xy / denom).clamp(-1.0, 1.0)
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let k = self.n_classes();
        (0..k)
            .map(|c| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..k).filter(|&i| i != c).map(|i| self.matrix[i][c]).sum();
                let fn_: usize = (0..k)
                    .filter(|&j| j != c)
                    .map(|j| self.matrix[c][j])
                    .sum::<usize>()
                    + self.unmatched[c];
                let support = tp + fn_;
                let precision = if tp + fp == 0 {
                    0.0
                } else {
                    tp as f64 / (tp + fp) as f64
                };
                let recall = if support == 0 {
                    0.0
                } else {
                    tp as f64 / support as f64
                };
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: self.classes.label(c),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the class index the matrix is laid out over.
    #[must_use]
    pub fn class_index(&self) -> &ClassIndex {
        &self.classes
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.n_classes()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header row
        write!(f, "{:>10}", "")?;
        for &label in self.classes.labels() {
            write!(f, " pred_{label:>4}")?;
        }
        writeln!(f, " {:>9}", "other")?;

        // Data rows
        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "true_{:>5}", self.classes.label(i))?;
            for val in row {
                write!(f, " {val:>9}")?;
            }
            writeln!(f, " {:>9}", self.unmatched[i])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifies by looking the first feature up as a label.
    struct Echo;

    impl Classifier for Echo {
        fn classify(&self, features: &[f64]) -> ClassLabel {
            features[0] as ClassLabel
        }
    }

    fn tally(pairs: &[(ClassLabel, ClassLabel)]) -> ConfusionMatrix {
        let samples: Vec<Sample> = pairs
            .iter()
            .map(|&(actual, predicted)| Sample::new(actual, vec![predicted as f64]))
            .collect();
        let mut cm = ConfusionMatrix::from_samples(&samples);
        cm.fill(&Echo, &samples);
        cm
    }

    #[test]
    fn perfect_predictions() {
        let cm = tally(&[(0, 0), (0, 0), (1, 1), (1, 1), (2, 2), (2, 2)]);
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        assert!((cm.matthews_correlation() - 1.0).abs() < 1e-12);

        for m in cm.class_metrics() {
            assert!((m.precision - 1.0).abs() < f64::EPSILON);
            assert!((m.recall - 1.0).abs() < f64::EPSILON);
            assert!((m.f1 - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn known_confusion_matrix() {
        // True: [0,0,0, 1,1,1, 2,2,2]
        // Pred: [0,0,1, 1,1,2, 2,2,0]
        let cm = tally(&[
            (0, 0),
            (0, 0),
            (0, 1),
            (1, 1),
            (1, 1),
            (1, 2),
            (2, 2),
            (2, 2),
            (2, 0),
        ]);
        let metrics = cm.class_metrics();

        // Class 0: TP=2, FP=1 (from class 2), FN=1 (to class 1)
        assert!((metrics[0].precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics[0].recall - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(metrics[0].support, 3);

        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        // s=9, c=6, t=p=(3,3,3): cov_xy = 54-27 = 27, cov_xx = cov_yy = 81-27 = 54
        assert!((cm.matthews_correlation() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lookups_by_index_and_label() {
        let cm = tally(&[(7, 7), (7, 3), (3, 3)]);
        // 7 has two samples, so it is class index 0.
        assert_eq!(cm.class_index().labels(), &[7, 3]);
        assert_eq!(cm.count(0, 1), 1);
        assert_eq!(cm.count_by_label(7, 7), 1);
        assert_eq!(cm.count_by_label(3, 3), 1);
        assert_eq!(cm.count_by_label(9, 3), 0);
    }

    #[test]
    fn unknown_predictions_are_errors() {
        let cm = tally(&[(0, 0), (0, 5), (1, 1)]);
        assert_eq!(cm.unmatched(0), 1);
        assert_eq!(cm.total(), 3);
        assert!((cm.accuracy() - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(cm.class_metrics()[0].support, 2);
    }

    #[test]
    fn constant_prediction_has_zero_correlation() {
        let cm = tally(&[(0, 0), (0, 0), (1, 0)]);
        assert!(cm.matthews_correlation().abs() < 1e-12);
    }

    #[test]
    fn single_class_all_correct_is_perfect() {
        let cm = tally(&[(4, 4), (4, 4)]);
        assert!((cm.matthews_correlation() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fill_resets_previous_counts() {
        let samples = vec![Sample::new(0, vec![0.0]), Sample::new(1, vec![1.0])];
        let mut cm = ConfusionMatrix::from_samples(&samples);
        cm.fill(&Echo, &samples);
        cm.fill(&Echo, &samples);
        assert_eq!(cm.total(), 2);
    }

    #[test]
    fn display_formatting() {
        let cm = tally(&[(0, 0), (1, 1)]);
        let output = format!("{cm}");
        assert!(output.contains("pred_"));
        assert!(output.contains("true_"));
        assert!(output.contains("other"));
    }

    #[test]
    fn zero_support_class_metrics() {
        let cm = ConfusionMatrix::new(ClassIndex::from_labels([0, 1, 2]));
        let metrics = cm.class_metrics();
        assert_eq!(metrics[2].support, 0);
        assert!((metrics[2].recall - 0.0).abs() < f64::EPSILON);
        assert!((cm.accuracy() - 0.0).abs() < f64::EPSILON);
    }
}
