//! Naive Bayes learner: parameter estimation, MAP classification, and
//! confusion-matrix evaluation.
//!
//! - Laplace-smoothed training over class-grouped image corpora
//! - log-space scoring with a deterministic first-label-wins tie-break
//! - sequential or rayon-parallel testing with order-independent aggregation
//! - JSON model documents that round-trip the label-index table

pub mod codec;
pub mod evaluate;
pub mod model;

pub use codec::{model_from_document, model_to_document, read_json, write_json, ClassRecord};
pub use evaluate::{ConfusionMatrix, TestMode, TASKS_PER_GROUP};
pub use model::{Classification, FeatureModel, DEFAULT_SMOOTHING};
