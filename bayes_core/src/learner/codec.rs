//! Model document serialization.
//!
//! A model persists as an ordered JSON array of per-class records; array
//! order is the model's label-index order, so the index table round-trips
//! without being stored explicitly. Shading grids are keyed by the decimal
//! string of their shading code. All likelihood values are already
//! log10-scaled.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{BayesError, BayesResult};
use crate::learner::model::{Classification, FeatureModel, DEFAULT_SMOOTHING};

/// One class in the model document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassRecord {
    /// Single-character class label.
    pub label: String,
    /// Class log-prior, log10-scaled.
    pub class_likelihood: f32,
    /// Shading code (decimal string) → H×W grid of log10 likelihoods.
    pub shading_likelihoods: BTreeMap<String, Vec<Vec<f32>>>,
}

/// Flatten a model into its document form, in label-index order.
pub fn model_to_document(model: &FeatureModel) -> Vec<ClassRecord> {
    model
        .labels()
        .iter()
        .map(|&label| {
            let classification = model
                .classification(label)
                .expect("model invariant: every label has a classification");

            let shading_likelihoods = classification
                .shading_log_likelihoods
                .iter()
                .enumerate()
                .map(|(code, grid)| {
                    let rows = grid.outer_iter().map(|row| row.to_vec()).collect();
                    (code.to_string(), rows)
                })
                .collect();

            ClassRecord {
                label: label.to_string(),
                class_likelihood: classification.class_log_prior,
                shading_likelihoods,
            }
        })
        .collect()
}

/// Rebuild a model from its document form. The label→index table follows
/// document (array) order; an empty document yields an untrained model.
pub fn model_from_document(records: &[ClassRecord]) -> BayesResult<FeatureModel> {
    let mut labels = Vec::with_capacity(records.len());
    let mut classifications = HashMap::new();
    let mut dimensions: Option<(usize, usize)> = None;
    let mut shading_count: Option<usize> = None;

    for record in records {
        let label = record_label(record)?;
        if classifications.contains_key(&label) {
            return Err(BayesError::format(format!(
                "duplicate label '{}' in model document",
                label
            )));
        }

        let count = match shading_count {
            Some(count) => count,
            None => {
                let count = record.shading_likelihoods.len();
                shading_count = Some(count);
                count
            }
        };

        let mut grids: Vec<Option<Array2<f32>>> = vec![None; count];
        for (key, rows) in &record.shading_likelihoods {
            let code: usize = key.parse().map_err(|_| {
                BayesError::unknown_symbol(key.clone(), "model document shading code")
            })?;
            if code >= count {
                return Err(BayesError::unknown_symbol(
                    key.clone(),
                    "model document shading code",
                ));
            }
            grids[code] = Some(likelihood_grid(rows, &mut dimensions)?);
        }

        let shading_log_likelihoods: Vec<Array2<f32>> = grids
            .into_iter()
            .enumerate()
            .map(|(code, grid)| {
                grid.ok_or_else(|| {
                    BayesError::format(format!(
                        "model document record '{}' is missing shading code {}",
                        label, code
                    ))
                })
            })
            .collect::<BayesResult<_>>()?;

        labels.push(label);
        classifications.insert(
            label,
            Classification {
                class_log_prior: record.class_likelihood,
                shading_log_likelihoods,
            },
        );
    }

    let (height, width) = dimensions.unwrap_or((0, 0));
    Ok(FeatureModel::from_parts(
        labels,
        classifications,
        height,
        width,
        shading_count.unwrap_or(0),
        DEFAULT_SMOOTHING,
    ))
}

/// Serialize a model as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(model: &FeatureModel, mut writer: W) -> BayesResult<()> {
    let document = model_to_document(model);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|err| BayesError::format(format!("model serialization failed: {}", err)))?;
    writer
        .write_all(b"\n")
        .map_err(|err| BayesError::format(format!("model serialization failed: {}", err)))
}

/// Deserialize a model from JSON produced by [`write_json`].
pub fn read_json<R: Read>(reader: R) -> BayesResult<FeatureModel> {
    let records: Vec<ClassRecord> = serde_json::from_reader(reader)
        .map_err(|err| BayesError::format(format!("model document is malformed: {}", err)))?;
    model_from_document(&records)
}

fn record_label(record: &ClassRecord) -> BayesResult<char> {
    let mut chars = record.label.chars();
    match (chars.next(), chars.next()) {
        (Some(label), None) => Ok(label),
        _ => Err(BayesError::format(format!(
            "label '{}' is not a single character",
            record.label
        ))),
    }
}

fn likelihood_grid(
    rows: &[Vec<f32>],
    dimensions: &mut Option<(usize, usize)>,
) -> BayesResult<Array2<f32>> {
    let height = rows.len();
    let width = rows.first().map(|row| row.len()).unwrap_or(0);

    match *dimensions {
        None => {
            if height == 0 || width == 0 {
                return Err(BayesError::dimension_mismatch(1, 0, "likelihood grid"));
            }
            *dimensions = Some((height, width));
        }
        Some((expected_height, expected_width)) => {
            if height != expected_height {
                return Err(BayesError::dimension_mismatch(
                    expected_height,
                    height,
                    "likelihood grid height",
                ));
            }
            if width != expected_width {
                return Err(BayesError::dimension_mismatch(
                    expected_width,
                    width,
                    "likelihood grid width",
                ));
            }
        }
    }

    let mut flat = Vec::with_capacity(height * width);
    for row in rows {
        if row.len() != width {
            return Err(BayesError::dimension_mismatch(
                width,
                row.len(),
                "likelihood grid width",
            ));
        }
        flat.extend_from_slice(row);
    }

    Ok(Array2::from_shape_vec((height, width), flat)
        .expect("row lengths were checked above"))
}
