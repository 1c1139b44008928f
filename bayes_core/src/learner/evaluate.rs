//! Confusion-matrix evaluation, sequential or over a rayon worker pool.
//!
//! Concurrent runs partition each label group into batches; every batch
//! worker classifies against the shared read-only model into its own partial
//! matrix, and the coordinator sums the partials after a join-all barrier.
//! Integer summation over a label table fixed before dispatch makes the
//! result bit-identical to the sequential mode regardless of scheduling.

use ndarray::Array2;
use rayon::prelude::*;

use crate::data::corpus::ImageCorpus;
use crate::data::image::LabeledImage;
use crate::error::{BayesError, BayesResult};
use crate::learner::model::FeatureModel;

/// Number of batches each label group is split into for concurrent testing.
pub const TASKS_PER_GROUP: usize = 4;

/// Evaluation scheduling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Sequential,
    Concurrent,
}

/// An N×N count matrix: row = true label index, column = predicted label
/// index, in the model's stable label order. Allocated fresh per test run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Array2<u64>,
    labels: Vec<char>,
}

impl ConfusionMatrix {
    fn zeros(labels: Vec<char>) -> Self {
        let n = labels.len();
        Self {
            counts: Array2::zeros((n, n)),
            labels,
        }
    }

    /// The raw count grid.
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Labels in the index order used by rows and columns.
    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    pub fn count(&self, true_index: usize, predicted_index: usize) -> u64 {
        self.counts[[true_index, predicted_index]]
    }

    /// Sum of the diagonal: correctly classified images.
    pub fn trace(&self) -> u64 {
        self.counts.diag().sum()
    }

    /// Sum of all entries: total classified images.
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// trace / total. Undefined on an all-zero matrix (0/0 → NaN); callers
    /// guard the empty case.
    pub fn accuracy(&self) -> f64 {
        self.trace() as f64 / self.total() as f64
    }
}

impl FeatureModel {
    /// Classify every image in `corpus` and tally outcomes into a confusion
    /// matrix sized by the model's label table.
    ///
    /// A corpus label the model does not know fails with an unknown-label
    /// error before any classification is dispatched. Any worker failure in
    /// concurrent mode aborts the whole call; there is no partial result.
    pub fn test(&self, corpus: &ImageCorpus, mode: TestMode) -> BayesResult<ConfusionMatrix> {
        self.check_testable(corpus)?;

        match mode {
            TestMode::Sequential => self.test_sequential(corpus),
            TestMode::Concurrent => self.test_concurrent(corpus, TASKS_PER_GROUP),
        }
    }

    /// Concurrent evaluation with an explicit fan-out (batches per label
    /// group) instead of [`TASKS_PER_GROUP`]; the configuration layer feeds
    /// its `evaluation.tasks_per_group` value through here.
    pub fn test_with_fanout(
        &self,
        corpus: &ImageCorpus,
        tasks_per_group: usize,
    ) -> BayesResult<ConfusionMatrix> {
        if tasks_per_group == 0 {
            return Err(BayesError::invalid_parameter(
                "tasks_per_group",
                "0",
                "a value ≥ 1",
            ));
        }
        self.check_testable(corpus)?;
        self.test_concurrent(corpus, tasks_per_group)
    }

    fn check_testable(&self, corpus: &ImageCorpus) -> BayesResult<()> {
        if !self.is_trained() {
            return Err(BayesError::untrained_model("test"));
        }

        // The label table is fixed before any worker starts.
        for &label in corpus.labels() {
            if self.label_index(label).is_none() {
                return Err(BayesError::unknown_label(label));
            }
        }

        Ok(())
    }

    fn test_sequential(&self, corpus: &ImageCorpus) -> BayesResult<ConfusionMatrix> {
        let mut matrix = ConfusionMatrix::zeros(self.labels().to_vec());

        for image in corpus.iter() {
            let (true_index, predicted_index) = self.classify_indexed(image)?;
            matrix.counts[[true_index, predicted_index]] += 1;
        }

        Ok(matrix)
    }

    fn test_concurrent(
        &self,
        corpus: &ImageCorpus,
        tasks_per_group: usize,
    ) -> BayesResult<ConfusionMatrix> {
        let n = self.labels().len();

        let mut batches: Vec<&[LabeledImage]> = Vec::new();
        for &label in corpus.labels() {
            let group = corpus
                .group(label)
                .ok_or_else(|| BayesError::unknown_label(label))?;
            if group.is_empty() {
                continue;
            }
            let batch_size = (group.len() + tasks_per_group - 1) / tasks_per_group;
            batches.extend(group.chunks(batch_size));
        }

        // One owned partial matrix per worker; collect() is the join-all
        // barrier and surfaces the first worker error, aborting the run.
        let partials: Vec<Array2<u64>> = batches
            .into_par_iter()
            .map(|batch| -> BayesResult<Array2<u64>> {
                let mut partial = Array2::<u64>::zeros((n, n));
                for image in batch {
                    let (true_index, predicted_index) = self.classify_indexed(image)?;
                    partial[[true_index, predicted_index]] += 1;
                }
                Ok(partial)
            })
            .collect::<BayesResult<Vec<_>>>()?;

        let mut matrix = ConfusionMatrix::zeros(self.labels().to_vec());
        for partial in partials {
            matrix.counts += &partial;
        }

        Ok(matrix)
    }

    fn classify_indexed(&self, image: &LabeledImage) -> BayesResult<(usize, usize)> {
        let true_index = self
            .label_index(image.label)
            .ok_or_else(|| BayesError::unknown_label(image.label))?;
        let predicted = self.classify(&image.grid)?;
        let predicted_index = self
            .label_index(predicted)
            .ok_or_else(|| BayesError::unknown_label(predicted))?;
        Ok((true_index, predicted_index))
    }
}
