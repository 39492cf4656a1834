//! Tree nodes and branch routing.

use crate::assignment::Assignment;
use crate::feature::FeatureIndex;
use crate::quality::Classifier;
use crate::sample::ClassLabel;

/// One branch of a decision node: a condition and the subtree it routes to.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Branch {
    assignment: Assignment,
    child: TreeNode,
}

impl Branch {
    pub(crate) fn new(assignment: Assignment, child: TreeNode) -> Self {
        Self { assignment, child }
    }

    /// Return the branch condition.
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Return the subtree reached through this branch.
    #[must_use]
    pub fn child(&self) -> &TreeNode {
        &self.child
    }
}

/// A node of an induced tree.
///
/// Trees are owned top-down: each decision node owns its branches, and no
/// subtree is shared.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TreeNode {
    /// A constant-class leaf.
    Leaf {
        /// The predicted label.
        label: ClassLabel,
    },
    /// A split on a single attribute.
    ///
    /// Branch conditions are tested in order. The last branch also catches
    /// every value no condition accepts, so classification never fails.
    Decision {
        /// Attribute whose value is tested.
        attribute: FeatureIndex,
        /// Ordered branches; never fewer than two.
        branches: Vec<Branch>,
    },
}

impl TreeNode {
    /// Create a leaf.
    #[must_use]
    pub fn leaf(label: ClassLabel) -> Self {
        TreeNode::Leaf { label }
    }

    /// Create a decision node.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two branches are given.
    #[must_use]
    pub fn decision(attribute: FeatureIndex, branches: Vec<Branch>) -> Self {
        assert!(
            branches.len() >= 2,
            "decision node needs at least two branches, got {}",
            branches.len()
        );
        TreeNode::Decision {
            attribute,
            branches,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Return the index of the branch `features` is routed through.
    ///
    /// `None` for leaves. Falls back to the last branch when no condition matches.
    #[must_use]
    pub fn route(&self, features: &[f64]) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Decision {
                attribute,
                branches,
            } => {
                let value = features[attribute.index()];
                let hit = branches
                    .iter()
                    .position(|b| b.assignment.matches(value))
                    .unwrap_or(branches.len() - 1);
                Some(hit)
            }
        }
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Decision { branches, .. } => {
                1 + branches.iter().map(|b| b.child.n_nodes()).sum::<usize>()
            }
        }
    }

    /// Number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Decision { branches, .. } => {
                branches.iter().map(|b| b.child.n_leaves()).sum()
            }
        }
    }

    /// Depth of this subtree; a lone leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Decision { branches, .. } => {
                1 + branches.iter().map(|b| b.child.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&TreeNode),
    {
        visit(self);
        if let TreeNode::Decision { branches, .. } = self {
            for branch in branches {
                branch.child.walk(visit);
            }
        }
    }
}

impl Classifier for TreeNode {
    /// Walk from this node to a leaf.
    fn classify(&self, features: &[f64]) -> ClassLabel {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Decision { branches, .. } => {
                    let Some(hit) = node.route(features) else {
                        unreachable!("decision nodes always route");
                    };
                    node = &branches[hit].child;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::assignment::{Interval, ListAssignment, RangeAssignment};

    fn range(lo: f64, hi: f64) -> Assignment {
        Assignment::Range(RangeAssignment::new(vec![Some(Interval::new(lo, hi))]))
    }

    fn list(codes: &[i64]) -> Assignment {
        Assignment::List(ListAssignment::new(codes.iter().copied().collect::<BTreeSet<_>>(), false))
    }

    fn make_split() -> TreeNode {
        TreeNode::decision(
            FeatureIndex::new(0),
            vec![
                Branch::new(range(f64::NEG_INFINITY, 6.5), TreeNode::leaf(10)),
                Branch::new(
                    range(6.5, f64::INFINITY),
                    TreeNode::decision(
                        FeatureIndex::new(1),
                        vec![
                            Branch::new(list(&[0]), TreeNode::leaf(20)),
                            Branch::new(list(&[1]), TreeNode::leaf(30)),
                        ],
                    ),
                ),
            ],
        )
    }

    #[test]
    fn leaf_classifies_constantly() {
        let leaf = TreeNode::leaf(-1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.classify(&[123.0]), -1);
        assert_eq!(leaf.route(&[0.0]), None);
    }

    #[test]
    fn routes_through_matching_branch() {
        let tree = make_split();
        assert_eq!(tree.classify(&[1.0, 0.0]), 10);
        assert_eq!(tree.classify(&[7.0, 0.0]), 20);
        assert_eq!(tree.classify(&[7.0, 1.0]), 30);
    }

    #[test]
    fn unmatched_values_use_last_branch() {
        let tree = make_split();
        // NaN matches no interval; code 9 matches no list.
        assert_eq!(tree.route(&[f64::NAN, 0.0]), Some(1));
        assert_eq!(tree.classify(&[f64::NAN, 9.0]), 30);
        assert_eq!(tree.classify(&[f64::INFINITY, 0.0]), 20);
    }

    #[test]
    fn structure_counts() {
        let tree = make_split();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(TreeNode::leaf(0).depth(), 0);
    }

    #[test]
    fn walk_visits_every_node() {
        let tree = make_split();
        let mut seen = 0;
        tree.walk(&mut |_| seen += 1);
        assert_eq!(seen, tree.n_nodes());
    }

    #[test]
    #[should_panic(expected = "at least two branches")]
    fn decision_requires_two_branches() {
        let _ = TreeNode::decision(
            FeatureIndex::new(0),
            vec![Branch::new(list(&[0]), TreeNode::leaf(1))],
        );
    }
}
