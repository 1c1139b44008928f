//! # Shade Bayes Core
//!
//! A Naive Bayes classification engine for fixed-size, discretely-shaded
//! pixel images: corpus ingestion with shape validation, Laplace-smoothed
//! parameter estimation in log10 space, MAP classification, and a concurrent
//! confusion-matrix evaluator with deterministic aggregation.
//!
//! ## Quick Start
//!
//! ```rust
//! use shade_bayes_core::{FeatureModel, ImageCorpus, SymbolTable, TestMode};
//!
//! let stream = "0\n###\n# #\n###\n1\n # \n # \n # \n";
//! let corpus = ImageCorpus::parse(stream.as_bytes(), &SymbolTable::binary())?;
//!
//! let model = FeatureModel::train(&corpus, 1.0)?;
//! let matrix = model.test(&corpus, TestMode::Concurrent)?;
//!
//! assert_eq!(matrix.trace(), 2);
//! assert_eq!(matrix.accuracy(), 1.0);
//! # Ok::<(), shade_bayes_core::BayesError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`config`] - Engine configuration via TOML
//! - [`data`] - Shading alphabet, corpus parsing, synthetic glyph generation
//! - [`learner`] - Training, classification, evaluation, model codec
//! - [`logging`] - JSON line-delimited run logging

pub mod config;
pub mod data;
pub mod error;
pub mod learner;
pub mod logging;

pub use config::{ConfigError, EngineConfig};
pub use data::corpus::ImageCorpus;
pub use data::image::{LabeledImage, PixelGrid, Shading, SymbolTable};
pub use data::synthetic::generate_glyph_corpus;
pub use error::{BayesError, BayesResult};
pub use learner::codec::{model_from_document, model_to_document, read_json, write_json, ClassRecord};
pub use learner::evaluate::{ConfusionMatrix, TestMode, TASKS_PER_GROUP};
pub use learner::model::{Classification, FeatureModel, DEFAULT_SMOOTHING};
