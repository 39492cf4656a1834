//! Branch predicates over a single feature value.

use std::collections::BTreeSet;
use std::fmt;

use crate::feature::{FeatureType, is_code};

/// A half-open interval `[lower, upper)`.
///
/// `lower == upper` denotes an exact-value match.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// Create the interval `[lower, upper)`.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "interval bounds out of order: [{lower}, {upper})");
        Self { lower, upper }
    }

    /// Create an interval matching exactly `value`.
    #[must_use]
    pub fn exact(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// Return the inclusive lower bound.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Return the exclusive upper bound.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Return `true` for an exact-value interval.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }

    /// Return `true` if `value` lies in the interval. Unspecified never does.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if FeatureType::is_unspecified(value) {
            return false;
        }
        if self.is_exact() {
            value == self.lower
        } else {
            self.lower <= value && value < self.upper
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            write!(f, "= {}", self.lower)
        } else {
            write!(f, "[{}, {})", self.lower, self.upper)
        }
    }
}

/// Routes numerical values through a list of intervals.
///
/// A `None` entry matches only unspecified values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeAssignment {
    intervals: Vec<Option<Interval>>,
}

impl RangeAssignment {
    /// Create a range assignment from its interval entries.
    #[must_use]
    pub fn new(intervals: Vec<Option<Interval>>) -> Self {
        Self { intervals }
    }

    /// Return the interval entries.
    #[must_use]
    pub fn intervals(&self) -> &[Option<Interval>] {
        &self.intervals
    }

    /// Return `true` if any entry accepts `value`.
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        let unspecified = FeatureType::is_unspecified(value);
        self.intervals.iter().any(|entry| match entry {
            None => unspecified,
            Some(interval) => interval.contains(value),
        })
    }

    /// Number of interval tests.
    #[must_use]
    pub fn complexity(&self) -> usize {
        self.intervals.len()
    }
}

/// Routes nominal codes through a set membership test.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListAssignment {
    codes: BTreeSet<i64>,
    unspecified: bool,
}

impl ListAssignment {
    /// Create a list assignment. `unspecified` adds missing values to the set.
    #[must_use]
    pub fn new(codes: BTreeSet<i64>, unspecified: bool) -> Self {
        Self { codes, unspecified }
    }

    /// Return the accepted codes in ascending order.
    #[must_use]
    pub fn codes(&self) -> &BTreeSet<i64> {
        &self.codes
    }

    /// Return `true` if unspecified values are accepted.
    #[must_use]
    pub fn matches_unspecified(&self) -> bool {
        self.unspecified
    }

    /// Return `true` if `value` is one of the accepted codes.
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        if FeatureType::is_unspecified(value) {
            return self.unspecified;
        }
        is_code(value) && self.codes.contains(&(value as i64))
    }

    /// Number of membership tests.
    #[must_use]
    pub fn complexity(&self) -> usize {
        self.codes.len() + usize::from(self.unspecified)
    }
}

/// A branch condition on one feature column.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Assignment {
    /// Interval routing for numerical features.
    Range(RangeAssignment),
    /// Code-set routing for nominal and boolean features.
    List(ListAssignment),
}

impl Assignment {
    /// Return `true` if the condition accepts `value`.
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Assignment::Range(range) => range.matches(value),
            Assignment::List(list) => list.matches(value),
        }
    }

    /// Number of elementary tests the condition performs.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Assignment::Range(range) => range.complexity(),
            Assignment::List(list) => list.complexity(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Range(range) => {
                f.write_str("in ")?;
                for (i, entry) in range.intervals.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    match entry {
                        Some(interval) => write!(f, "{interval}")?,
                        None => f.write_str("?")?,
                    }
                }
                Ok(())
            }
            Assignment::List(list) => {
                f.write_str("in {")?;
                let mut first = true;
                for code in &list.codes {
                    if !first {
                        f.write_str(", ")?;
                    }
                    write!(f, "{code}")?;
                    first = false;
                }
                if list.matches_unspecified() {
                    if !first {
                        f.write_str(", ")?;
                    }
                    f.write_str("?")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Interval ---

    #[test]
    fn half_open_bounds() {
        let i = Interval::new(1.0, 2.0);
        assert!(i.contains(1.0));
        assert!(i.contains(1.999));
        assert!(!i.contains(2.0));
        assert!(!i.contains(0.5));
        assert!(!i.contains(f64::NAN));
    }

    #[test]
    fn exact_interval() {
        let i = Interval::exact(3.0);
        assert!(i.is_exact());
        assert!(i.contains(3.0));
        assert!(!i.contains(3.0001));
    }

    #[test]
    fn infinite_bounds() {
        let i = Interval::new(f64::NEG_INFINITY, 6.5);
        assert!(i.contains(-1e300));
        assert!(i.contains(6.0));
        assert!(!i.contains(7.0));
        assert_eq!(i.to_string(), "[-inf, 6.5)");
    }

    // --- RangeAssignment ---

    #[test]
    fn range_with_unspecified_entry() {
        let r = RangeAssignment::new(vec![Some(Interval::new(0.0, 1.0)), None]);
        assert!(r.matches(0.5));
        assert!(r.matches(f64::NAN));
        assert!(!r.matches(1.5));
        assert_eq!(r.complexity(), 2);
    }

    #[test]
    fn range_without_unspecified_entry_rejects_missing() {
        let r = RangeAssignment::new(vec![Some(Interval::new(f64::NEG_INFINITY, f64::INFINITY))]);
        assert!(!r.matches(f64::NAN));
        assert!(r.matches(12.0));
    }

    // --- ListAssignment ---

    #[test]
    fn list_membership() {
        let l = ListAssignment::new(BTreeSet::from([0, 1]), false);
        assert!(l.matches(0.0));
        assert!(l.matches(1.0));
        assert!(!l.matches(2.0));
        assert!(!l.matches(0.5));
        assert!(!l.matches(1e20));
        assert!(!l.matches_unspecified());
        assert!(!l.matches(f64::NAN));
        assert_eq!(l.complexity(), 2);
    }

    #[test]
    fn list_with_unspecified() {
        let l = ListAssignment::new(BTreeSet::from([4]), true);
        assert!(l.matches_unspecified());
        assert!(l.matches(f64::NAN));
        assert_eq!(l.complexity(), 2);
    }

    // --- Assignment ---

    #[test]
    fn display_forms() {
        let range = Assignment::Range(RangeAssignment::new(vec![
            Some(Interval::new(6.5, f64::INFINITY)),
            None,
        ]));
        assert_eq!(range.to_string(), "in [6.5, inf) or ?");

        let list = Assignment::List(ListAssignment::new(BTreeSet::from([2, 0]), true));
        assert_eq!(list.to_string(), "in {0, 2, ?}");
    }

    #[test]
    fn dispatch() {
        let list = Assignment::List(ListAssignment::new(BTreeSet::from([2]), false));
        assert!(list.matches(2.0));
        assert_eq!(list.complexity(), 1);
    }
}
