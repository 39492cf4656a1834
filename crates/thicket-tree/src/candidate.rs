//! Candidate assignment construction for one attribute.
//!
//! Values of the attribute are grouped by the class of the sample they were
//! observed on. Groups are visited in [`ClassIndex`] order, majority class
//! first, and each value belongs to the first group that observed it. Every
//! surviving group then becomes one assignment: a code set for categorical
//! columns, or a list of intervals for numerical ones.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use crate::assignment::{Assignment, Interval, ListAssignment, RangeAssignment};
use crate::class_index::ClassIndex;
use crate::feature::FeatureType;
use crate::sample::Sample;

/// A specified feature value with a total order.
///
/// `-0.0` is folded into `0.0` so both compare equal.
#[derive(Debug, Clone, Copy)]
struct OrderedValue(f64);

impl OrderedValue {
    fn new(value: f64) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }
}

impl PartialEq for OrderedValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedValue {}

impl PartialOrd for OrderedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Distinct values of one attribute observed on one class.
#[derive(Debug, Clone, Default)]
struct ValueGroup {
    values: BTreeSet<OrderedValue>,
    unspecified: bool,
}

impl ValueGroup {
    fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.unspecified
    }
}

/// Per-class value groups for one attribute, indexed by class index.
#[derive(Debug, Clone)]
pub(crate) struct ClassGroups {
    groups: Vec<ValueGroup>,
}

impl ClassGroups {
    /// Collect the distinct values of `attribute` per class.
    pub(crate) fn collect(samples: &[&Sample], attribute: usize, classes: &ClassIndex) -> Self {
        let mut groups = vec![ValueGroup::default(); classes.n_classes()];
        for sample in samples {
            let Some(class) = classes.index_of(sample.label()) else {
                continue;
            };
            let value = sample.value(attribute);
            if FeatureType::is_unspecified(value) {
                groups[class].unspecified = true;
            } else {
                groups[class].values.insert(OrderedValue::new(value));
            }
        }
        Self { groups }
    }

    /// Number of groups holding at least one value.
    pub(crate) fn n_non_empty(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_empty()).count()
    }

    /// Drop every value already claimed by an earlier group.
    pub(crate) fn compact(&mut self) {
        let mut claimed: BTreeSet<OrderedValue> = BTreeSet::new();
        let mut unspecified_claimed = false;
        for group in &mut self.groups {
            group.values.retain(|v| !claimed.contains(v));
            claimed.extend(group.values.iter().copied());
            if group.unspecified {
                if unspecified_claimed {
                    group.unspecified = false;
                }
                unspecified_claimed = true;
            }
        }
    }

    /// One code-set assignment per non-empty group, in class order.
    pub(crate) fn list_assignments(&self) -> Vec<Assignment> {
        self.groups
            .iter()
            .filter(|g| !g.is_empty())
            .map(|g| {
                let codes = g.values.iter().map(|v| v.0 as i64).collect();
                Assignment::List(ListAssignment::new(codes, g.unspecified))
            })
            .collect()
    }

    /// One interval-list assignment per non-empty group, in class order.
    ///
    /// `forbidden` holds every value owned by some other group. A group's own
    /// values are lifted out while it builds its intervals and put back
    /// afterwards, so no interval ever covers a value of another group.
    pub(crate) fn range_assignments(&self) -> Vec<Assignment> {
        let mut forbidden: BTreeSet<OrderedValue> = self
            .groups
            .iter()
            .flat_map(|g| g.values.iter().copied())
            .collect();

        let mut assignments = Vec::new();
        for group in self.groups.iter().filter(|g| !g.is_empty()) {
            for value in &group.values {
                forbidden.remove(value);
            }
            let intervals = group_intervals(group, &forbidden);
            forbidden.extend(group.values.iter().copied());
            assignments.push(Assignment::Range(RangeAssignment::new(intervals)));
        }
        assignments
    }
}

/// Build the interval entries of one group against the values it must avoid.
fn group_intervals(group: &ValueGroup, forbidden: &BTreeSet<OrderedValue>) -> Vec<Option<Interval>> {
    let values: Vec<OrderedValue> = group.values.iter().copied().collect();
    let mut intervals = Vec::new();

    let mut i = 0;
    while i < values.len() {
        let lower = values[i];
        let mut upper = values[i];
        i += 1;

        // Absorb own values while no foreign value sits in between.
        while i < values.len() && forbidden.range(upper..values[i]).next().is_none() {
            upper = values[i];
            i += 1;
        }

        let hi = forbidden
            .range((Excluded(upper), Unbounded))
            .next()
            .map_or(f64::INFINITY, |next| split_point(upper.0, next.0));
        let lo = forbidden
            .range(..lower)
            .next_back()
            .map_or(f64::NEG_INFINITY, |prev| split_point(prev.0, lower.0));

        intervals.push(Some(Interval::new(lo, hi)));
    }

    if group.unspecified {
        intervals.push(None);
    }
    intervals
}

/// The midpoint of `a < b`, nudged to `b` when rounding would not land in `(a, b]`.
fn split_point(a: f64, b: f64) -> f64 {
    let mid = a / 2.0 + b / 2.0;
    if mid > a && mid <= b { mid } else { b }
}

/// Build the candidate assignments of one attribute, or `None` if it cannot split.
///
/// An attribute cannot split when fewer than two classes observe any value,
/// or when first-claim compaction leaves fewer than two non-empty groups.
pub(crate) fn build_assignments(
    samples: &[&Sample],
    attribute: usize,
    feature_type: FeatureType,
    classes: &ClassIndex,
) -> Option<Vec<Assignment>> {
    let mut groups = ClassGroups::collect(samples, attribute, classes);
    if groups.n_non_empty() < 2 {
        return None;
    }
    groups.compact();
    if groups.n_non_empty() < 2 {
        return None;
    }
    let assignments = if feature_type.is_categorical() {
        groups.list_assignments()
    } else {
        groups.range_assignments()
    };
    Some(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(rows: &[(i64, f64)]) -> Vec<Sample> {
        rows.iter().map(|&(l, v)| Sample::new(l, vec![v])).collect()
    }

    fn build(data: &[Sample], feature_type: FeatureType) -> Option<Vec<Assignment>> {
        let refs: Vec<&Sample> = data.iter().collect();
        let classes = ClassIndex::from_samples(data);
        build_assignments(&refs, 0, feature_type, &classes)
    }

    fn intervals(a: &Assignment) -> Vec<Option<Interval>> {
        match a {
            Assignment::Range(r) => r.intervals().to_vec(),
            Assignment::List(_) => panic!("expected a range assignment"),
        }
    }

    fn codes(a: &Assignment) -> Vec<i64> {
        match a {
            Assignment::List(l) => l.codes().iter().copied().collect(),
            Assignment::Range(_) => panic!("expected a list assignment"),
        }
    }

    // --- grouping & compaction ---

    #[test]
    fn single_class_cannot_split() {
        let data = column(&[(1, 1.0), (1, 2.0)]);
        assert!(build(&data, FeatureType::Numerical).is_none());
    }

    #[test]
    fn fully_shadowed_group_cannot_split() {
        // Class 5 (majority) claims both values; class 9 is left empty.
        let data = column(&[(5, 1.0), (5, 2.0), (5, 1.0), (9, 2.0)]);
        assert!(build(&data, FeatureType::Nominal).is_none());
    }

    #[test]
    fn first_claim_wins() {
        let data = column(&[(0, 0.0), (0, 1.0), (0, 1.0), (1, 1.0), (1, 2.0)]);
        let lists = build(&data, FeatureType::Nominal).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(codes(&lists[0]), vec![0, 1]);
        assert_eq!(codes(&lists[1]), vec![2]);
    }

    #[test]
    fn negative_zero_is_zero() {
        let data = column(&[(0, 0.0), (0, 0.0), (1, -0.0), (1, 4.0)]);
        let lists = build(&data, FeatureType::Nominal).unwrap();
        assert_eq!(codes(&lists[1]), vec![4]);
    }

    #[test]
    fn unspecified_claimed_once() {
        let data = column(&[(0, f64::NAN), (0, 1.0), (0, 1.0), (1, f64::NAN), (1, 2.0)]);
        let lists = build(&data, FeatureType::Nominal).unwrap();
        assert!(lists[0].matches(f64::NAN));
        assert!(!lists[1].matches(f64::NAN));
    }

    // --- ranges ---

    #[test]
    fn two_separated_groups() {
        let data = column(&[(0, 1.0), (0, 2.0), (0, 3.0), (1, 10.0), (1, 11.0), (1, 12.0)]);
        let ranges = build(&data, FeatureType::Numerical).unwrap();
        assert_eq!(intervals(&ranges[0]), vec![Some(Interval::new(f64::NEG_INFINITY, 6.5))]);
        assert_eq!(intervals(&ranges[1]), vec![Some(Interval::new(6.5, f64::INFINITY))]);
    }

    #[test]
    fn interleaved_values_split_into_several_intervals() {
        // Majority class 0 owns {1, 3}; class 1 owns {2}.
        let data = column(&[(0, 1.0), (0, 3.0), (1, 2.0)]);
        let ranges = build(&data, FeatureType::Numerical).unwrap();
        assert_eq!(
            intervals(&ranges[0]),
            vec![
                Some(Interval::new(f64::NEG_INFINITY, 1.5)),
                Some(Interval::new(2.5, f64::INFINITY)),
            ]
        );
        assert_eq!(intervals(&ranges[1]), vec![Some(Interval::new(1.5, 2.5))]);
    }

    #[test]
    fn intervals_avoid_every_foreign_value() {
        let data = column(&[
            (0, 0.0),
            (0, 4.0),
            (0, 4.5),
            (0, 9.0),
            (1, 2.0),
            (1, 7.0),
            (2, 5.0),
        ]);
        let ranges = build(&data, FeatureType::Numerical).unwrap();
        let owners: [&[f64]; 3] = [&[0.0, 4.0, 4.5, 9.0], &[2.0, 7.0], &[5.0]];
        for (group, assignment) in ranges.iter().enumerate() {
            for (owner, values) in owners.iter().enumerate() {
                for &v in *values {
                    assert_eq!(
                        assignment.matches(v),
                        group == owner,
                        "group {group} vs value {v} of group {owner}"
                    );
                }
            }
        }
    }

    #[test]
    fn unspecified_becomes_null_entry() {
        let data = column(&[(0, 1.0), (0, f64::NAN), (1, 5.0)]);
        let ranges = build(&data, FeatureType::Numerical).unwrap();
        let entries = intervals(&ranges[0]);
        assert_eq!(entries.last(), Some(&None));
        assert!(ranges[0].matches(f64::NAN));
        assert!(!ranges[1].matches(f64::NAN));
    }

    #[test]
    fn adjacent_floats_keep_own_value() {
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        let data = column(&[(0, a), (0, a), (1, b)]);
        let ranges = build(&data, FeatureType::Numerical).unwrap();
        assert!(ranges[0].matches(a));
        assert!(!ranges[0].matches(b));
        assert!(ranges[1].matches(b));
    }

    #[test]
    fn split_point_bounds() {
        assert!((split_point(3.0, 10.0) - 6.5).abs() < f64::EPSILON);
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        assert_eq!(split_point(a, b), b);
    }
}
