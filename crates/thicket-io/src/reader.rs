//! CSV readers for labeled samples and unlabeled records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thicket_tree::{ClassLabel, FeatureType, FeatureValue, Sample, UNSPECIFIED};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{LabeledDataset, RecordDataset, RecordId};

/// Parse a comma-separated feature-type schema such as `"n,c,b"`.
///
/// Accepts the short forms `n`/`c`/`b` and the long names understood by
/// [`FeatureType`]'s `FromStr`.
///
/// # Errors
///
/// Returns [`IoError::InvalidFeatureType`] for the first unrecognised entry.
pub fn parse_feature_types(schema: &str) -> Result<Vec<FeatureType>, IoError> {
    schema
        .split(',')
        .enumerate()
        .map(|(position, name)| {
            name.parse::<FeatureType>()
                .map_err(|source| IoError::InvalidFeatureType { position, source })
        })
        .collect()
}

/// Reads labeled samples from a CSV file.
///
/// Expected CSV format:
/// - Header row required: `label,feature1,...,featureN`
/// - The label column holds integer class labels
/// - Feature cells are parsed according to the column's [`FeatureType`];
///   without an explicit schema every column is numerical
/// - Empty cells, `?`, `NA` and `NaN` are missing values
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoFeatureColumns`] | Only the label column |
/// | [`IoError::SchemaMismatch`] | Schema length differs from the feature column count |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidLabel`] | Label is not an integer |
/// | [`IoError::InvalidValue`] | Cell cannot be read as its column type |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct SampleReader {
    path: PathBuf,
    feature_types: Option<Vec<FeatureType>>,
}

impl SampleReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            feature_types: None,
        }
    }

    /// Set the type of each feature column.
    #[must_use]
    pub fn with_feature_types(mut self, feature_types: Vec<FeatureType>) -> Self {
        self.feature_types = Some(feature_types);
        self
    }

    /// Read and validate the CSV file, returning a [`LabeledDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<LabeledDataset, IoError> {
        let table = read_table(&self.path, self.feature_types.as_deref())?;

        let mut samples = Vec::with_capacity(table.rows.len());
        for (row_index, (raw_label, features)) in table.rows.into_iter().enumerate() {
            let label: ClassLabel =
                raw_label
                    .trim()
                    .parse()
                    .map_err(|_| IoError::InvalidLabel {
                        path: self.path.clone(),
                        row_index,
                        raw: raw_label.clone(),
                    })?;
            samples.push(Sample::new(label, features));
        }

        info!(
            n_samples = samples.len(),
            n_features = table.feature_names.len(),
            "labeled dataset loaded"
        );

        Ok(LabeledDataset::new(
            table.feature_names,
            table.feature_types,
            samples,
        ))
    }
}

/// Reads unlabeled records from a CSV file.
///
/// Same format as [`SampleReader`], except the first column is a record id
/// that must be unique within the file.
///
/// # Errors
///
/// As [`SampleReader`], with [`IoError::DuplicateRecordId`] in place of
/// [`IoError::InvalidLabel`].
pub struct RecordReader {
    path: PathBuf,
    feature_types: Option<Vec<FeatureType>>,
}

impl RecordReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            feature_types: None,
        }
    }

    /// Set the type of each feature column.
    #[must_use]
    pub fn with_feature_types(mut self, feature_types: Vec<FeatureType>) -> Self {
        self.feature_types = Some(feature_types);
        self
    }

    /// Read and validate the CSV file, returning a [`RecordDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<RecordDataset, IoError> {
        let table = read_table(&self.path, self.feature_types.as_deref())?;

        let mut ids = Vec::with_capacity(table.rows.len());
        let mut features = Vec::with_capacity(table.rows.len());
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, (id, row)) in table.rows.into_iter().enumerate() {
            if let Some(&first_row) = seen.get(&id) {
                return Err(IoError::DuplicateRecordId {
                    path: self.path.clone(),
                    id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(id.clone(), row_index);
            ids.push(RecordId::new(id));
            features.push(row);
        }

        info!(
            n_records = ids.len(),
            n_features = table.feature_names.len(),
            "record dataset loaded"
        );

        Ok(RecordDataset::new(
            ids,
            table.feature_names,
            table.feature_types,
            features,
        ))
    }
}

/// A parsed CSV: the key column kept as text, feature cells decoded.
struct Table {
    feature_names: Vec<String>,
    feature_types: Vec<FeatureType>,
    rows: Vec<(String, Vec<f64>)>,
}

fn read_table(path: &Path, feature_types: Option<&[FeatureType]>) -> Result<Table, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    // flexible(true) allows rows with varying column counts so that our own
    // InconsistentRowLength check fires instead of a low-level CsvParse error.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let header = rdr.headers().map_err(|e| IoError::CsvParse {
        path: path.to_path_buf(),
        offset: e.position().map_or(0, |p| p.byte()),
        source: e,
    })?;
    let expected_cols = header.len();
    debug!(expected_cols, "read CSV header");

    if expected_cols < 2 {
        return Err(IoError::NoFeatureColumns {
            path: path.to_path_buf(),
        });
    }

    let feature_names: Vec<String> = header.iter().skip(1).map(String::from).collect();
    let feature_types = match feature_types {
        Some(types) if types.len() != feature_names.len() => {
            return Err(IoError::SchemaMismatch {
                path: path.to_path_buf(),
                expected: feature_names.len(),
                got: types.len(),
            });
        }
        Some(types) => types.to_vec(),
        None => vec![FeatureType::Numerical; feature_names.len()],
    };

    let mut rows = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| IoError::CsvParse {
            path: path.to_path_buf(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;

        if record.len() != expected_cols {
            return Err(IoError::InconsistentRowLength {
                path: path.to_path_buf(),
                row_index,
                expected: expected_cols,
                got: record.len(),
            });
        }

        let key = record.get(0).unwrap_or("").to_string();
        let mut values = Vec::with_capacity(feature_types.len());
        for (col_index, (raw, &kind)) in record.iter().skip(1).zip(&feature_types).enumerate() {
            let value = parse_cell(raw, kind).ok_or_else(|| IoError::InvalidValue {
                path: path.to_path_buf(),
                row_index,
                col_index,
                kind,
                raw: raw.to_string(),
            })?;
            values.push(value);
        }
        rows.push((key, values));
    }

    if rows.is_empty() {
        return Err(IoError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    Ok(Table {
        feature_names,
        feature_types,
        rows,
    })
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty()
        || raw == "?"
        || raw.eq_ignore_ascii_case("na")
        || raw.eq_ignore_ascii_case("nan")
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Decode one cell into the raw value stored in a [`Sample`].
fn parse_cell(raw: &str, kind: FeatureType) -> Option<f64> {
    let raw = raw.trim();
    if is_missing(raw) {
        return Some(UNSPECIFIED);
    }
    let value = match kind {
        FeatureType::Numerical => {
            FeatureValue::Number(raw.parse::<f64>().ok().filter(|v| v.is_finite())?)
        }
        FeatureType::Nominal => FeatureValue::Code(raw.parse::<i64>().ok()?),
        FeatureType::Boolean => FeatureValue::Flag(parse_flag(raw)?),
    };
    Some(kind.encode(&value))
}
