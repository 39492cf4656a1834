use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use thicket_io::{ExperimentName, RecordReader, ResultWriter, SampleReader, parse_feature_types};
use thicket_tree::{ComplexityWeights, DecisionTree, InducerConfig, QualityKind};

#[derive(Parser)]
#[command(name = "thicket")]
#[command(about = "Greedy decision-tree induction over mixed-type tabular data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel classification (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Induction parameters.
#[derive(Args, Debug, Clone)]
struct InductionArgs {
    /// Quality measure minimised at every node: "mcc" or "error-rate"
    #[arg(long, default_value = "mcc")]
    quality: QualityKind,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum number of samples a node needs before splits are tried
    #[arg(long, default_value_t = 2)]
    min_samples_split: usize,

    /// Complexity cost of a majority-class leaf
    #[arg(long, default_value_t = 1.0)]
    class_unit: f64,

    /// Complexity cost of one explicit branch test
    #[arg(long, default_value_t = 1.0)]
    decision_unit: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Induce a decision tree from a labeled CSV
    Train {
        /// Path to the labeled CSV (`label,feature1,...`)
        #[arg(long)]
        data: PathBuf,

        /// Feature types, e.g. "n,c,b" (numerical, nominal, boolean); all numerical when omitted
        #[arg(long)]
        types: Option<String>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        induction: InductionArgs,
    },

    /// Score a saved model on a labeled CSV
    Evaluate {
        /// Path to a model produced by `train`
        #[arg(long)]
        model: PathBuf,

        /// Path to the labeled CSV
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Classify unlabeled records with a saved model
    Predict {
        /// Path to a model produced by `train`
        #[arg(long)]
        model: PathBuf,

        /// Path to the record CSV (`id,feature1,...`)
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- Stdout summaries ---

#[derive(Serialize)]
struct TrainOutput {
    experiment: String,
    n_samples: usize,
    n_features: usize,
    n_classes: usize,
    n_nodes: usize,
    depth: usize,
    quality: f64,
    complexity: f64,
    training_accuracy: f64,
    model_path: PathBuf,
}

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    n_samples: usize,
    accuracy: f64,
    matthews_correlation: f64,
}

#[derive(Serialize)]
struct PredictOutput {
    experiment: String,
    n_records: usize,
    model_n_features: usize,
    model_n_classes: usize,
}

impl InductionArgs {
    fn config(&self) -> InducerConfig {
        InducerConfig::new()
            .with_quality(self.quality)
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_complexity(
                ComplexityWeights::new()
                    .with_class_unit(self.class_unit)
                    .with_decision_unit(self.decision_unit),
            )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train {
            data,
            types,
            experiment,
            output_dir,
            induction,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            // 1. Read labeled samples
            let mut reader = SampleReader::new(&data);
            if let Some(schema) = types.as_deref() {
                reader = reader.with_feature_types(parse_feature_types(schema)?);
            }
            let dataset = reader.read().context("failed to read training CSV")?;

            // 2. Induce
            let tree = induction
                .config()
                .fit(dataset.samples(), dataset.feature_types())
                .context("induction failed")?;
            let training_accuracy = tree.evaluate(dataset.samples())?.accuracy();
            info!(
                n_nodes = tree.n_nodes(),
                depth = tree.depth(),
                training_accuracy,
                "tree induced"
            );

            // 3. Save model and summary
            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let model_path = writer.model_path();
            tree.save(&model_path).context("failed to save model")?;
            writer.write_training(
                &tree,
                dataset.feature_names(),
                dataset.n_samples(),
                training_accuracy,
            )?;

            let output = TrainOutput {
                experiment,
                n_samples: dataset.n_samples(),
                n_features: tree.n_features(),
                n_classes: tree.n_classes(),
                n_nodes: tree.n_nodes(),
                depth: tree.depth(),
                quality: tree.quality(),
                complexity: tree.complexity(),
                training_accuracy,
                model_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Evaluate {
            model,
            data,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let tree = DecisionTree::load(&model).context("failed to load model")?;
            let dataset = SampleReader::new(&data)
                .with_feature_types(tree.feature_types().to_vec())
                .read()
                .context("failed to read evaluation CSV")?;

            let matrix = tree.evaluate(dataset.samples())?;
            info!("\n{matrix}");

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            writer.write_evaluation(&matrix)?;

            let output = EvaluateOutput {
                experiment,
                n_samples: matrix.total(),
                accuracy: matrix.accuracy(),
                matthews_correlation: matrix.matthews_correlation(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            model,
            data,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let tree = DecisionTree::load(&model).context("failed to load model")?;
            info!(
                n_features = tree.n_features(),
                n_classes = tree.n_classes(),
                "model loaded"
            );

            let records = RecordReader::new(&data)
                .with_feature_types(tree.feature_types().to_vec())
                .read()
                .context("failed to read record CSV")?;

            let labels = tree
                .classify_batch(records.features())
                .context("prediction failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            writer.write_predictions(records.ids(), &labels)?;

            let output = PredictOutput {
                experiment,
                n_records: records.n_records(),
                model_n_features: tree.n_features(),
                model_n_classes: tree.n_classes(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
