//! JSON result writer for training, evaluation, and prediction outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thicket_tree::{ClassLabel, ConfusionMatrix, DecisionTree, TreeNode};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, RecordId};

/// Writes induction results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_train.json`,
/// `{experiment}_evaluate.json` and `{experiment}_predictions.json`; the
/// model binary goes to [`model_path`](Self::model_path).
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a training summary to `{experiment}_train.json`.
    ///
    /// `training_accuracy` is the tree's accuracy on the samples it was induced from.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_training(
        &self,
        tree: &DecisionTree,
        feature_names: &[String],
        n_samples: usize,
        training_accuracy: f64,
    ) -> Result<PathBuf, IoError> {
        let path = self.file_path("train");

        let usage = tree.attribute_usage();
        let features: Vec<FeatureEntry> = feature_names
            .iter()
            .zip(tree.feature_types())
            .zip(&usage)
            .map(|((name, kind), &splits)| FeatureEntry {
                name: name.as_str(),
                kind: kind.to_string(),
                splits,
            })
            .collect();

        let root_branches = match tree.root() {
            TreeNode::Leaf { .. } => Vec::new(),
            TreeNode::Decision {
                attribute,
                branches,
            } => {
                let name = feature_names
                    .get(attribute.index())
                    .map_or_else(|| format!("f{attribute}"), Clone::clone);
                branches
                    .iter()
                    .map(|b| format!("{name} {}", b.assignment()))
                    .collect()
            }
        };

        let artifact = TrainArtifact {
            experiment: self.experiment.as_str(),
            n_samples,
            n_features: tree.n_features(),
            classes: tree.class_labels(),
            n_nodes: tree.n_nodes(),
            n_leaves: tree.n_leaves(),
            depth: tree.depth(),
            quality: tree.quality(),
            complexity: tree.complexity(),
            training_accuracy,
            features,
            root_branches,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "training summary written");
        Ok(path)
    }

    /// Write hold-out scores to `{experiment}_evaluate.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_evaluation(&self, matrix: &ConfusionMatrix) -> Result<PathBuf, IoError> {
        let path = self.file_path("evaluate");

        let labels = matrix.class_index().labels();
        let class_metrics: Vec<ClassEntry> = matrix
            .class_metrics()
            .into_iter()
            .map(|m| ClassEntry {
                class: m.class,
                precision: m.precision,
                recall: m.recall,
                f1: m.f1,
                support: m.support,
            })
            .collect();
        let unmatched: Vec<usize> = (0..matrix.n_classes()).map(|i| matrix.unmatched(i)).collect();

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            n_samples: matrix.total(),
            accuracy: matrix.accuracy(),
            matthews_correlation: matrix.matthews_correlation(),
            classes: labels,
            confusion_matrix: matrix.as_rows(),
            unmatched,
            class_metrics,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "evaluation result written");
        Ok(path)
    }

    /// Write predictions to `{experiment}_predictions.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_predictions(
        &self,
        ids: &[RecordId],
        labels: &[ClassLabel],
    ) -> Result<PathBuf, IoError> {
        let path = self.file_path("predictions");

        let predictions: BTreeMap<&str, ClassLabel> = ids
            .iter()
            .zip(labels)
            .map(|(id, &label)| (id.as_str(), label))
            .collect();

        let artifact = PredictArtifact {
            experiment: self.experiment.as_str(),
            n_records: predictions.len(),
            predictions,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "predictions written");
        Ok(path)
    }

    /// Return the path where the model binary should be saved.
    ///
    /// Does not write anything; just computes `{output_dir}/{experiment}_model.bin`.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_model.bin", self.experiment.as_str()))
    }

    fn file_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).expect("serialization cannot fail");
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct TrainArtifact<'a> {
    experiment: &'a str,
    n_samples: usize,
    n_features: usize,
    classes: &'a [ClassLabel],
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    quality: f64,
    complexity: f64,
    training_accuracy: f64,
    features: Vec<FeatureEntry<'a>>,
    root_branches: Vec<String>,
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: String,
    splits: usize,
}

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    n_samples: usize,
    accuracy: f64,
    matthews_correlation: f64,
    classes: &'a [ClassLabel],
    confusion_matrix: &'a [Vec<usize>],
    unmatched: Vec<usize>,
    class_metrics: Vec<ClassEntry>,
}

#[derive(Serialize)]
struct ClassEntry {
    class: ClassLabel,
    precision: f64,
    recall: f64,
    f1: f64,
    support: usize,
}

#[derive(Serialize)]
struct PredictArtifact<'a> {
    experiment: &'a str,
    n_records: usize,
    predictions: BTreeMap<&'a str, ClassLabel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use thicket_tree::{FeatureType, InducerConfig, Sample};

    fn trained() -> (DecisionTree, Vec<Sample>) {
        let samples = vec![
            Sample::new(1, vec![1.0, 0.0]),
            Sample::new(1, vec![2.0, 0.0]),
            Sample::new(1, vec![3.0, 1.0]),
            Sample::new(2, vec![10.0, 1.0]),
            Sample::new(2, vec![11.0, 0.0]),
            Sample::new(2, vec![12.0, 1.0]),
        ];
        let tree = InducerConfig::new()
            .fit(&samples, &[FeatureType::Numerical, FeatureType::Boolean])
            .unwrap();
        (tree, samples)
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn write_training_json_structure() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("fruit".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();
        let (tree, samples) = trained();
        let names = vec!["size".to_string(), "ripe".to_string()];

        let path = writer.write_training(&tree, &names, samples.len(), 1.0).unwrap();
        assert_eq!(path, dir.path().join("fruit_train.json"));

        let content = read_json(&path);
        assert_eq!(content["experiment"], "fruit");
        assert_eq!(content["n_samples"], 6);
        assert_eq!(content["n_nodes"], 3);
        assert_eq!(content["depth"], 1);
        assert_eq!(content["classes"], serde_json::json!([1, 2]));
        assert_eq!(content["features"][0]["name"], "size");
        assert_eq!(content["features"][0]["type"], "numerical");
        assert_eq!(content["features"][0]["splits"], 1);
        assert_eq!(content["root_branches"][0], "size in [-inf, 6.5)");
    }

    #[test]
    fn write_evaluation_json_structure() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("eval_run".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();
        let (tree, samples) = trained();
        let matrix = tree.evaluate(&samples).unwrap();

        let path = writer.write_evaluation(&matrix).unwrap();
        let content = read_json(&path);
        assert_eq!(content["n_samples"], 6);
        assert!((content["accuracy"].as_f64().unwrap() - 1.0).abs() < f64::EPSILON);
        assert_eq!(content["confusion_matrix"], serde_json::json!([[3, 0], [0, 3]]));
        assert_eq!(content["unmatched"], serde_json::json!([0, 0]));
        assert_eq!(content["class_metrics"].as_array().unwrap().len(), 2);
        assert_eq!(content["class_metrics"][1]["class"], 2);
    }

    #[test]
    fn write_predictions_map() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("pred".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();
        let ids = vec![RecordId::new("b".into()), RecordId::new("a".into())];

        let path = writer.write_predictions(&ids, &[2, 1]).unwrap();
        assert_eq!(path, dir.path().join("pred_predictions.json"));
        let content = read_json(&path);
        assert_eq!(content["n_records"], 2);
        assert_eq!(content["predictions"]["a"], 1);
        assert_eq!(content["predictions"]["b"], 2);
    }

    #[test]
    fn model_path_format() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("m1".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();
        assert_eq!(writer.model_path(), dir.path().join("m1_model.bin"));
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let experiment = ExperimentName::new("x".into()).unwrap();
        let _writer = ResultWriter::new(&nested, experiment).unwrap();
        assert!(nested.is_dir());
    }
}
