//! Greedy decision-tree induction driven by a pluggable quality measure.
//!
//! Every node tries one split per attribute, builds branch conditions from
//! the values each class was observed with, and keeps the candidate that
//! scores best on the node's samples; ties go to the simpler subtree. Numerical
//! attributes split on interval lists, nominal and boolean attributes on code
//! sets, and missing values are routed like any other value.
//!
//! Trees are classified in parallel via rayon, scored with a confusion
//! matrix, and persisted with bincode.

mod assignment;
mod candidate;
mod class_index;
mod complexity;
mod config;
mod confusion;
mod error;
mod feature;
mod inducer;
mod node;
mod quality;
mod sample;
mod serialize;
mod tree;

pub use assignment::{Assignment, Interval, ListAssignment, RangeAssignment};
pub use class_index::ClassIndex;
pub use complexity::{ComplexityWeights, complexity_nested};
pub use config::InducerConfig;
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::TreeError;
pub use feature::{FeatureIndex, FeatureType, FeatureValue, UNSPECIFIED};
pub use node::{Branch, TreeNode};
pub use quality::{Classifier, ErrorRate, MatthewsCorrelation, QualityKind, QualityMeasure};
pub use sample::{ClassLabel, Sample};
pub use tree::DecisionTree;
