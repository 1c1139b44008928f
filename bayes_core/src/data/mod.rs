//! Corpus ingestion: shading alphabet, labeled images, and stream parsing.

pub mod corpus;
pub mod image;
pub mod synthetic;

pub use corpus::ImageCorpus;
pub use image::{LabeledImage, PixelGrid, Shading, SymbolTable};
pub use synthetic::generate_glyph_corpus;
