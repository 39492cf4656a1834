//! The classifier and quality-measure contracts used by the inducer.
//!
//! The inducer treats a [`QualityMeasure`] as a black box: it creates one
//! token per node, then asks for a score of each candidate classifier
//! against that node's samples. Scores are finite, non-negative, and lower
//! is better.

use std::fmt;
use std::str::FromStr;

use crate::confusion::ConfusionMatrix;
use crate::sample::{ClassLabel, Sample};

/// Anything that maps a feature vector onto a class label.
pub trait Classifier {
    /// Return the predicted label for `features`.
    fn classify(&self, features: &[f64]) -> ClassLabel;
}

/// Scores a classifier over a set of samples.
pub trait QualityMeasure {
    /// Reusable scratch state built once per sample set.
    type Token;

    /// Build the token for `samples`.
    fn create_token(&self, samples: &[&Sample]) -> Self::Token;

    /// Score `classifier` on `samples`. Lower is better; never negative or NaN.
    fn evaluate<C>(&self, classifier: &C, token: &mut Self::Token, samples: &[&Sample]) -> f64
    where
        C: Classifier + ?Sized;
}

/// `(1 - MCC) / 2`, mapping Gorodkin's multi-class MCC onto `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatthewsCorrelation;

impl QualityMeasure for MatthewsCorrelation {
    type Token = ConfusionMatrix;

    fn create_token(&self, samples: &[&Sample]) -> ConfusionMatrix {
        ConfusionMatrix::from_samples(samples.iter().copied())
    }

    fn evaluate<C>(&self, classifier: &C, token: &mut ConfusionMatrix, samples: &[&Sample]) -> f64
    where
        C: Classifier + ?Sized,
    {
        token.fill(classifier, samples.iter().copied());
        (1.0 - token.matthews_correlation()) / 2.0
    }
}

/// Fraction of misclassified samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorRate;

impl QualityMeasure for ErrorRate {
    type Token = ConfusionMatrix;

    fn create_token(&self, samples: &[&Sample]) -> ConfusionMatrix {
        ConfusionMatrix::from_samples(samples.iter().copied())
    }

    fn evaluate<C>(&self, classifier: &C, token: &mut ConfusionMatrix, samples: &[&Sample]) -> f64
    where
        C: Classifier + ?Sized,
    {
        token.fill(classifier, samples.iter().copied());
        if token.total() == 0 {
            return 0.0;
        }
        1.0 - token.accuracy()
    }
}

/// Selects one of the built-in quality measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QualityKind {
    /// [`MatthewsCorrelation`].
    #[default]
    Mcc,
    /// [`ErrorRate`].
    ErrorRate,
}

impl QualityMeasure for QualityKind {
    type Token = ConfusionMatrix;

    fn create_token(&self, samples: &[&Sample]) -> ConfusionMatrix {
        ConfusionMatrix::from_samples(samples.iter().copied())
    }

    fn evaluate<C>(&self, classifier: &C, token: &mut ConfusionMatrix, samples: &[&Sample]) -> f64
    where
        C: Classifier + ?Sized,
    {
        match self {
            QualityKind::Mcc => MatthewsCorrelation.evaluate(classifier, token, samples),
            QualityKind::ErrorRate => ErrorRate.evaluate(classifier, token, samples),
        }
    }
}

impl fmt::Display for QualityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityKind::Mcc => f.write_str("mcc"),
            QualityKind::ErrorRate => f.write_str("error-rate"),
        }
    }
}

impl FromStr for QualityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcc" => Ok(QualityKind::Mcc),
            "error-rate" | "error" => Ok(QualityKind::ErrorRate),
            other => Err(format!("unknown quality measure: {other} (expected mcc or error-rate)")),
        }
    }
}
