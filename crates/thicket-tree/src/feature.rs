//! Feature column metadata and the value codec.

use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;

/// The sentinel stored for a missing value.
pub const UNSPECIFIED: f64 = f64::NAN;

/// Zero-based feature column index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the values of one feature column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FeatureType {
    /// Ordered real values; split by intervals.
    Numerical,
    /// Unordered integer codes; split by code sets.
    Nominal,
    /// `0.0` / `1.0`; split like a two-code nominal column.
    Boolean,
}

/// A decoded feature value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    /// Missing value.
    Unspecified,
    /// A numerical reading.
    Number(f64),
    /// A nominal code.
    Code(i64),
    /// A boolean flag.
    Flag(bool),
}

impl FeatureType {
    /// Return `true` if `value` is the unspecified sentinel.
    #[must_use]
    pub fn is_unspecified(value: f64) -> bool {
        value.is_nan()
    }

    /// Return `true` for columns split by code sets rather than intervals.
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, FeatureType::Nominal | FeatureType::Boolean)
    }

    /// Encode a value into the raw `f64` stored in a [`Sample`](crate::Sample).
    ///
    /// Values of a different kind than the column are converted the obvious
    /// way (a flag stored in a numerical column becomes `0.0`/`1.0`).
    #[must_use]
    pub fn encode(self, value: &FeatureValue) -> f64 {
        match *value {
            FeatureValue::Unspecified => UNSPECIFIED,
            FeatureValue::Number(v) => match self {
                FeatureType::Numerical => v,
                FeatureType::Nominal => v.trunc(),
                FeatureType::Boolean => f64::from(u8::from(v != 0.0)),
            },
            FeatureValue::Code(c) => c as f64,
            FeatureValue::Flag(b) => f64::from(u8::from(b)),
        }
    }

    /// Decode a raw stored value.
    #[must_use]
    pub fn decode(self, raw: f64) -> FeatureValue {
        if Self::is_unspecified(raw) {
            return FeatureValue::Unspecified;
        }
        match self {
            FeatureType::Numerical => FeatureValue::Number(raw),
            FeatureType::Nominal => FeatureValue::Code(raw as i64),
            FeatureType::Boolean => FeatureValue::Flag(raw != 0.0),
        }
    }

    /// Return `true` if `raw` is acceptable for a column of this type.
    ///
    /// Unspecified is always acceptable. Numerical values must be finite,
    /// nominal values integral and within `i64` range, boolean values `0.0`
    /// or `1.0`.
    #[must_use]
    pub fn accepts(self, raw: f64) -> bool {
        if Self::is_unspecified(raw) {
            return true;
        }
        match self {
            FeatureType::Numerical => raw.is_finite(),
            FeatureType::Nominal => is_code(raw),
            FeatureType::Boolean => raw == 0.0 || raw == 1.0,
        }
    }
}

/// Return `true` if `raw` converts to an `i64` code without saturating.
pub(crate) fn is_code(raw: f64) -> bool {
    const LIMIT: f64 = -(i64::MIN as f64);
    raw.fract() == 0.0 && (-LIMIT..LIMIT).contains(&raw)
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureType::Numerical => "numerical",
            FeatureType::Nominal => "nominal",
            FeatureType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

impl FromStr for FeatureType {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numerical" | "numeric" | "n" => Ok(FeatureType::Numerical),
            "nominal" | "categorical" | "c" => Ok(FeatureType::Nominal),
            "boolean" | "bool" | "b" => Ok(FeatureType::Boolean),
            _ => Err(TreeError::UnknownFeatureType {
                name: s.to_string(),
            }),
        }
    }
}
