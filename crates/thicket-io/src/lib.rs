//! CSV readers and JSON result writers for the thicket pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, LabeledDataset, RecordDataset, RecordId};
pub use error::IoError;
pub use reader::{RecordReader, SampleReader, parse_feature_types};
pub use writer::ResultWriter;
