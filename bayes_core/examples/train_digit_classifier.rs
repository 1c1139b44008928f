//! Trains a digit classifier on a synthetic glyph corpus and evaluates it
//! sequentially and concurrently.
//!
//! Run with: cargo run --example train_digit_classifier

use std::time::Instant;

use shade_bayes_core::{
    generate_glyph_corpus, logging, read_json, write_json, EngineConfig, FeatureModel, TestMode,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔢 Shade Bayes - Digit Classification");
    println!("=====================================\n");

    let config = EngineConfig::default();
    let samples_per_class = 200;
    let noise_level = 0.12;

    println!("Configuration:");
    println!("  Samples per class: {}", samples_per_class);
    println!("  Noise level: {}", noise_level);
    println!("  Smoothing: {}", config.smoothing);
    println!();

    println!("📊 Generating corpora...");
    let train_corpus = generate_glyph_corpus(samples_per_class, noise_level, 42, &config.symbols)?;
    let test_corpus = generate_glyph_corpus(50, noise_level, 1337, &config.symbols)?;
    println!("  Training images: {}", train_corpus.len());
    println!("  Test images: {}", test_corpus.len());
    println!();

    println!("🧮 Training model...");
    let model = FeatureModel::train(&train_corpus, config.smoothing)?;
    logging::log_training_run(&model, &train_corpus)?;
    println!("  Labels: {:?}", model.labels());
    println!();

    println!("🧪 Evaluating...");
    let start = Instant::now();
    let sequential = model.test(&test_corpus, TestMode::Sequential)?;
    let sequential_ms = start.elapsed().as_millis();
    logging::log_evaluation("sequential", &sequential, sequential_ms)?;

    let start = Instant::now();
    let concurrent = model.test_with_fanout(&test_corpus, config.tasks_per_group)?;
    let concurrent_ms = start.elapsed().as_millis();
    logging::log_evaluation("concurrent", &concurrent, concurrent_ms)?;

    assert_eq!(sequential, concurrent);

    println!("  Sequential: {} ms, concurrent: {} ms", sequential_ms, concurrent_ms);
    println!("\nConfusion matrix (rows = true, columns = predicted):");
    print!("     ");
    for label in sequential.labels() {
        print!("{:>6}", label);
    }
    println!();
    for (row, label) in sequential.labels().iter().enumerate() {
        print!("  {:>3}", label);
        for column in 0..sequential.labels().len() {
            print!("{:>6}", sequential.count(row, column));
        }
        println!();
    }
    println!("\nAccuracy: {:.4}", sequential.accuracy());

    // Round-trip through the document form to show persistence works.
    let mut buffer = Vec::new();
    write_json(&model, &mut buffer)?;
    let restored = read_json(buffer.as_slice())?;
    let reloaded = restored.test(&test_corpus, TestMode::Concurrent)?;
    assert_eq!(reloaded, sequential);
    println!("Model document round-trip: {} bytes, decisions unchanged.", buffer.len());

    Ok(())
}
