//! JSON line-delimited run logging.
//!
//! The classification core itself never prints or logs; these appenders are
//! invoked by binaries around training and evaluation runs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::data::corpus::ImageCorpus;
use crate::learner::evaluate::ConfusionMatrix;
use crate::learner::model::FeatureModel;

fn log_dir() -> io::Result<()> {
    fs::create_dir_all("logs")
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct TrainingLogEntry {
    pub corpus_size: usize,
    pub label_count: usize,
    pub image_height: usize,
    pub image_width: usize,
    pub smoothing: f32,
    pub timestamp_ms: u128,
}

pub fn log_training_run(model: &FeatureModel, corpus: &ImageCorpus) -> io::Result<()> {
    log_dir()?;
    let (image_height, image_width) = model.dimensions();
    let entry = TrainingLogEntry {
        corpus_size: corpus.len(),
        label_count: model.labels().len(),
        image_height,
        image_width,
        smoothing: model.smoothing(),
        timestamp_ms: timestamp_ms(),
    };
    append_json_line("logs/training.jsonl", &entry)
}

#[derive(Debug, Serialize)]
pub struct EvaluationLogEntry {
    pub mode: String,
    pub total: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub elapsed_ms: u128,
    pub timestamp_ms: u128,
}

pub fn log_evaluation(mode: &str, matrix: &ConfusionMatrix, elapsed_ms: u128) -> io::Result<()> {
    log_dir()?;
    let entry = EvaluationLogEntry {
        mode: mode.to_string(),
        total: matrix.total(),
        correct: matrix.trace(),
        accuracy: matrix.accuracy(),
        elapsed_ms,
        timestamp_ms: timestamp_ms(),
    };
    append_json_line("logs/evaluation.jsonl", &entry)
}
