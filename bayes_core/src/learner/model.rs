//! Naive Bayes feature model: training and MAP classification.
//!
//! All probability estimates live in log10 space. Additive smoothing keeps
//! every estimate strictly positive, so a single unseen pixel/shading
//! combination cannot veto a class, and log-space sums cannot underflow over
//! large grids.

use std::collections::HashMap;

use ndarray::Array2;

use crate::data::corpus::ImageCorpus;
use crate::data::image::PixelGrid;
use crate::error::{BayesError, BayesResult};

/// Smoothing constant used when a document-loaded model does not carry one.
pub const DEFAULT_SMOOTHING: f32 = 1.0;

/// Trained parameters for a single class: the class log-prior plus one H×W
/// log-likelihood grid per shading code.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_log_prior: f32,
    pub shading_log_likelihoods: Vec<Array2<f32>>,
}

/// A trained Naive Bayes model over fixed-size shaded-pixel images.
///
/// Built once by [`FeatureModel::train`] or restored by the codec, then
/// immutable: the label→index table assigned at construction is part of the
/// model's identity and orders every confusion matrix produced from it.
#[derive(Debug, Clone)]
pub struct FeatureModel {
    classifications: HashMap<char, Classification>,
    labels: Vec<char>,
    label_indices: HashMap<char, usize>,
    height: usize,
    width: usize,
    shading_count: usize,
    smoothing: f32,
}

impl FeatureModel {
    /// Estimate a model from a corpus with additive smoothing `alpha`.
    ///
    /// Priors: `log10((n_l + α) / (N + K·α))` for each of the K labels.
    /// Likelihoods: `log10((count + α) / (n_l + |S|·α))` per pixel and
    /// shading. The label→index table is assigned here, in the corpus's
    /// first-seen label order. Training is all-or-nothing: any failure leaves
    /// no model behind.
    pub fn train(corpus: &ImageCorpus, alpha: f32) -> BayesResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(BayesError::invalid_parameter(
                "alpha",
                alpha.to_string(),
                "a finite value > 0",
            ));
        }
        if corpus.is_empty() {
            return Err(BayesError::format("corpus contains no images"));
        }

        let (height, width) = corpus.dimensions();
        let shading_count = corpus.shading_count();
        let total = corpus.len() as f32;
        let class_count = corpus.labels().len() as f32;

        let mut classifications = HashMap::new();
        let mut labels = Vec::with_capacity(corpus.labels().len());
        let mut label_indices = HashMap::new();

        for &label in corpus.labels() {
            let group = corpus
                .group(label)
                .filter(|images| !images.is_empty())
                .ok_or_else(|| {
                    BayesError::format(format!("label '{}' has an empty image group", label))
                })?;
            let group_size = group.len() as f32;

            let class_log_prior =
                ((group_size + alpha) / (total + class_count * alpha)).log10();

            let mut counts = vec![Array2::<u32>::zeros((height, width)); shading_count];
            for image in group {
                for ((row, column), shading) in image.grid.indexed_iter() {
                    let code = shading.code();
                    if code >= shading_count {
                        return Err(BayesError::unknown_symbol(
                            code.to_string(),
                            format!("image pixel ({}, {})", row, column),
                        ));
                    }
                    counts[code][[row, column]] += 1;
                }
            }

            let denominator = group_size + shading_count as f32 * alpha;
            let shading_log_likelihoods = counts
                .into_iter()
                .map(|grid| grid.mapv(|count| ((count as f32 + alpha) / denominator).log10()))
                .collect();

            label_indices.insert(label, labels.len());
            labels.push(label);
            classifications.insert(
                label,
                Classification {
                    class_log_prior,
                    shading_log_likelihoods,
                },
            );
        }

        Ok(Self {
            classifications,
            labels,
            label_indices,
            height,
            width,
            shading_count,
            smoothing: alpha,
        })
    }

    /// Rebuild a model from already-estimated parameters (codec path).
    pub(crate) fn from_parts(
        labels: Vec<char>,
        classifications: HashMap<char, Classification>,
        height: usize,
        width: usize,
        shading_count: usize,
        smoothing: f32,
    ) -> Self {
        let label_indices = labels
            .iter()
            .enumerate()
            .map(|(index, &label)| (label, index))
            .collect();

        Self {
            classifications,
            labels,
            label_indices,
            height,
            width,
            shading_count,
            smoothing,
        }
    }

    /// Labels in stable index order (training first-seen / document order).
    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    /// Matrix row/column index for a label, if the model knows it.
    pub fn label_index(&self, label: char) -> Option<usize> {
        self.label_indices.get(&label).copied()
    }

    /// `(height, width)` the model was trained for.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn shading_count(&self) -> usize {
        self.shading_count
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Whether the model holds at least one trained class.
    pub fn is_trained(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Trained parameters for one class.
    pub fn classification(&self, label: char) -> Option<&Classification> {
        self.classifications.get(&label)
    }

    /// Log-likelihood score of `grid` under class `label`:
    /// the class log-prior plus the per-pixel log-likelihood of every
    /// observed shading.
    pub fn score(&self, label: char, grid: &PixelGrid) -> BayesResult<f32> {
        if !self.is_trained() {
            return Err(BayesError::untrained_model("score"));
        }
        self.check_dimensions(grid)?;

        let classification = self
            .classifications
            .get(&label)
            .ok_or_else(|| BayesError::unknown_label(label))?;

        let mut score = classification.class_log_prior;
        for ((row, column), shading) in grid.indexed_iter() {
            let likelihoods = classification
                .shading_log_likelihoods
                .get(shading.code())
                .ok_or_else(|| {
                    BayesError::unknown_symbol(
                        shading.code().to_string(),
                        format!("image pixel ({}, {})", row, column),
                    )
                })?;
            score += likelihoods[[row, column]];
        }

        Ok(score)
    }

    /// MAP classification: the label with the highest score. Ties resolve to
    /// the first label in the model's stable index order; later labels with
    /// an equal score never replace it.
    pub fn classify(&self, grid: &PixelGrid) -> BayesResult<char> {
        if !self.is_trained() {
            return Err(BayesError::untrained_model("classify"));
        }

        let mut best: Option<(char, f32)> = None;
        for &label in &self.labels {
            let score = self.score(label, grid)?;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }

        best.map(|(label, _)| label)
            .ok_or_else(|| BayesError::untrained_model("classify"))
    }

    fn check_dimensions(&self, grid: &PixelGrid) -> BayesResult<()> {
        if grid.height() != self.height {
            return Err(BayesError::dimension_mismatch(
                self.height,
                grid.height(),
                "image height",
            ));
        }
        if grid.width() != self.width {
            return Err(BayesError::dimension_mismatch(
                self.width,
                grid.width(),
                "image width",
            ));
        }
        Ok(())
    }
}
