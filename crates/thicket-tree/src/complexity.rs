//! Complexity scores used to break quality ties between candidate nodes.

/// Unit weights for the complexity score.
///
/// # Defaults
///
/// | Weight          | Default |
/// |-----------------|---------|
/// | `class_unit`    | 1.0     |
/// | `decision_unit` | 1.0     |
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComplexityWeights {
    pub(crate) class_unit: f64,
    pub(crate) decision_unit: f64,
}

impl ComplexityWeights {
    /// Create weights with the default units.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_unit: 1.0,
            decision_unit: 1.0,
        }
    }

    /// Set the cost of a majority-class leaf.
    #[must_use]
    pub fn with_class_unit(mut self, class_unit: f64) -> Self {
        self.class_unit = class_unit;
        self
    }

    /// Set the cost of one explicit branch condition test.
    #[must_use]
    pub fn with_decision_unit(mut self, decision_unit: f64) -> Self {
        self.decision_unit = decision_unit;
        self
    }

    /// Return the cost of a majority-class leaf.
    #[must_use]
    pub fn class_unit(&self) -> f64 {
        self.class_unit
    }

    /// Return the cost of one explicit branch condition test.
    #[must_use]
    pub fn decision_unit(&self) -> f64 {
        self.decision_unit
    }

    /// Return the overhead of an explicit branch whose condition has `condition_size` tests.
    #[must_use]
    pub fn branch_overhead(&self, condition_size: usize) -> f64 {
        self.decision_unit * condition_size as f64
    }
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine `(child_complexity, branch_overhead)` pairs into a node complexity.
///
/// A plain sum, monotone non-decreasing in every input as long as the
/// inputs are non-negative.
#[must_use]
pub fn complexity_nested(pairs: &[(f64, f64)]) -> f64 {
    pairs.iter().map(|(child, overhead)| child + overhead).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unit() {
        let w = ComplexityWeights::default();
        assert!((w.class_unit() - 1.0).abs() < f64::EPSILON);
        assert!((w.decision_unit() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overhead_scales_with_condition_size() {
        let w = ComplexityWeights::new().with_decision_unit(0.5);
        assert!((w.branch_overhead(3) - 1.5).abs() < f64::EPSILON);
        assert!(w.branch_overhead(0).abs() < f64::EPSILON);
    }

    #[test]
    fn nested_is_a_sum() {
        let total = complexity_nested(&[(1.0, 2.0), (0.0, 0.0), (3.0, 0.0)]);
        assert!((total - 6.0).abs() < f64::EPSILON);
        assert!(complexity_nested(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn nested_is_monotone() {
        let base = complexity_nested(&[(1.0, 1.0), (2.0, 0.0)]);
        let bigger_child = complexity_nested(&[(1.5, 1.0), (2.0, 0.0)]);
        let bigger_overhead = complexity_nested(&[(1.0, 1.25), (2.0, 0.0)]);
        assert!(bigger_child >= base);
        assert!(bigger_overhead >= base);
    }
}
