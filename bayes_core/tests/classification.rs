//! End-to-end fixtures: corpus parsing, smoothed estimation, document-loaded
//! classification, round-tripping, and sequential/concurrent agreement.

use std::collections::BTreeMap;

use shade_bayes_core::{
    generate_glyph_corpus, model_from_document, read_json, write_json, BayesError, ClassRecord,
    FeatureModel, ImageCorpus, PixelGrid, Shading, SymbolTable, TestMode,
};

/// Nine 4×4 images: five labeled '0', four labeled '1'. Trailing spaces are
/// significant; every pixel row is exactly four characters wide.
const TRAINING_STREAM: &str = concat!(
    "0\n### \n# # \n### \n    \n",
    "0\n    \n### \n# # \n### \n",
    "0\n    \n ###\n # #\n ###\n",
    "0\n### \n# # \n# # \n### \n",
    "0\n ###\n # #\n # #\n ###\n",
    "1\n  # \n  # \n  # \n  # \n",
    "1\n #  \n #  \n #  \n #  \n",
    "1\n##  \n #  \n #  \n    \n",
    "1\n##  \n #  \n #  \n### \n",
);

fn training_corpus() -> ImageCorpus {
    ImageCorpus::parse(TRAINING_STREAM.as_bytes(), &SymbolTable::binary()).unwrap()
}

fn grid(rows: &[&[u8]]) -> PixelGrid {
    PixelGrid::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|&code| Shading(code)).collect())
            .collect(),
    )
    .unwrap()
}

#[test]
fn corpus_fixture_parses_into_expected_groups() {
    let corpus = training_corpus();

    assert_eq!(corpus.len(), 9);
    assert_eq!(corpus.labels(), ['0', '1']);
    assert_eq!(corpus.dimensions(), (4, 4));
    assert_eq!(corpus.group('0').unwrap().len(), 5);
    assert_eq!(corpus.group('1').unwrap().len(), 4);

    let first_one = &corpus.group('1').unwrap()[0];
    assert_eq!(
        first_one.grid,
        grid(&[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]])
    );
}

#[test]
fn smoothed_class_priors_match_hand_computation() {
    let model = FeatureModel::train(&training_corpus(), 1.0).unwrap();

    let prior_zero = 10.0f32.powf(model.classification('0').unwrap().class_log_prior);
    let prior_one = 10.0f32.powf(model.classification('1').unwrap().class_log_prior);

    assert!((prior_zero - 6.0 / 11.0).abs() < 1e-4);
    assert!((prior_one - 5.0 / 11.0).abs() < 1e-4);
}

#[test]
fn smoothed_feature_likelihoods_match_hand_computation() {
    let model = FeatureModel::train(&training_corpus(), 1.0).unwrap();

    // White pixel counts per position over the five '0' images and the four
    // '1' images; smoothing adds one to each count, |S| = 2 to each group.
    let zero_white_counts: [[f32; 4]; 4] = [
        [3.0, 2.0, 2.0, 4.0],
        [2.0, 2.0, 1.0, 3.0],
        [2.0, 2.0, 2.0, 3.0],
        [3.0, 1.0, 1.0, 3.0],
    ];
    let one_white_counts: [[f32; 4]; 4] = [
        [2.0, 1.0, 3.0, 4.0],
        [4.0, 1.0, 3.0, 4.0],
        [4.0, 1.0, 3.0, 4.0],
        [3.0, 2.0, 2.0, 4.0],
    ];

    let zero = &model.classification('0').unwrap().shading_log_likelihoods;
    let one = &model.classification('1').unwrap().shading_log_likelihoods;

    for row in 0..4 {
        for column in 0..4 {
            let white = zero_white_counts[row][column];
            let expected_white = (white + 1.0) / 7.0;
            let expected_black = (5.0 - white + 1.0) / 7.0;
            assert!((10.0f32.powf(zero[0][[row, column]]) - expected_white).abs() < 1e-4);
            assert!((10.0f32.powf(zero[1][[row, column]]) - expected_black).abs() < 1e-4);

            let white = one_white_counts[row][column];
            let expected_white = (white + 1.0) / 6.0;
            let expected_black = (4.0 - white + 1.0) / 6.0;
            assert!((10.0f32.powf(one[0][[row, column]]) - expected_white).abs() < 1e-4);
            assert!((10.0f32.powf(one[1][[row, column]]) - expected_black).abs() < 1e-4);
        }
    }
}

fn class_record(
    label: &str,
    class_likelihood: f32,
    white: [[f32; 2]; 2],
    black: [[f32; 2]; 2],
) -> ClassRecord {
    let mut shading_likelihoods = BTreeMap::new();
    shading_likelihoods.insert("0".to_string(), white.iter().map(|r| r.to_vec()).collect());
    shading_likelihoods.insert("1".to_string(), black.iter().map(|r| r.to_vec()).collect());
    ClassRecord {
        label: label.to_string(),
        class_likelihood,
        shading_likelihoods,
    }
}

/// Fixed 2×2, two-class document used by the score fixtures below.
fn two_by_two_document() -> Vec<ClassRecord> {
    vec![
        class_record(
            "0",
            -0.30103,
            [[-0.15, -0.90], [-0.80, -0.10]],
            [[-0.55, -0.05], [-0.09, -0.70]],
        ),
        class_record(
            "1",
            -0.30103,
            [[-0.60, -0.05], [-0.08, -0.75]],
            [[-0.12, -0.85], [-0.95, -0.11]],
        ),
    ]
}

#[test]
fn document_loaded_model_reproduces_known_scores() {
    let model = model_from_document(&two_by_two_document()).unwrap();
    assert_eq!(model.labels(), ['0', '1']);

    let diagonal = grid(&[&[1, 0], &[0, 1]]);
    assert!((model.score('0', &diagonal).unwrap() - (-3.25103)).abs() < 1e-4);
    assert!((model.score('1', &diagonal).unwrap() - (-0.66103)).abs() < 1e-4);
    assert_eq!(model.classify(&diagonal).unwrap(), '1');

    let anti_diagonal = grid(&[&[0, 1], &[1, 0]]);
    assert!((model.score('0', &anti_diagonal).unwrap() - (-0.69103)).abs() < 1e-4);
    assert!((model.score('1', &anti_diagonal).unwrap() - (-3.46103)).abs() < 1e-4);
    assert_eq!(model.classify(&anti_diagonal).unwrap(), '0');
}

#[test]
fn equal_scores_resolve_to_first_label_in_index_order() {
    let mut records = two_by_two_document();
    // Identical parameters under both labels force exact score ties.
    records[1].class_likelihood = records[0].class_likelihood;
    records[1].shading_likelihoods = records[0].shading_likelihoods.clone();

    let model = model_from_document(&records).unwrap();
    let probe = grid(&[&[1, 0], &[0, 1]]);
    assert_eq!(model.classify(&probe).unwrap(), '0');

    records.swap(0, 1);
    let swapped = model_from_document(&records).unwrap();
    assert_eq!(swapped.labels(), ['1', '0']);
    assert_eq!(swapped.classify(&probe).unwrap(), '1');
}

#[test]
fn serialization_round_trip_preserves_decisions() {
    let corpus = training_corpus();
    let model = FeatureModel::train(&corpus, 1.0).unwrap();

    let mut buffer = Vec::new();
    write_json(&model, &mut buffer).unwrap();
    let restored = read_json(buffer.as_slice()).unwrap();

    assert_eq!(restored.labels(), model.labels());
    for image in corpus.iter() {
        assert_eq!(
            restored.classify(&image.grid).unwrap(),
            model.classify(&image.grid).unwrap()
        );
        for &label in model.labels() {
            assert_eq!(
                restored.score(label, &image.grid).unwrap(),
                model.score(label, &image.grid).unwrap()
            );
        }
    }
}

#[test]
fn sequential_and_concurrent_matrices_are_identical() {
    let corpus = generate_glyph_corpus(30, 0.15, 99, &SymbolTable::binary()).unwrap();
    let model = FeatureModel::train(&corpus, 1.0).unwrap();

    let sequential = model.test(&corpus, TestMode::Sequential).unwrap();
    let concurrent = model.test(&corpus, TestMode::Concurrent).unwrap();

    assert_eq!(sequential, concurrent);
    assert_eq!(sequential.total(), corpus.len() as u64);
    assert!(sequential.trace() <= sequential.total());
    let accuracy = sequential.accuracy();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn evaluating_mismatched_dimensions_fails_in_both_modes() {
    let model = FeatureModel::train(&training_corpus(), 1.0).unwrap();
    let five_by_five = ImageCorpus::parse(
        "0\n###  \n# #  \n###  \n     \n     \n1\n ##  \n  #  \n  #  \n  #  \n ### \n".as_bytes(),
        &SymbolTable::binary(),
    )
    .unwrap();

    for mode in [TestMode::Sequential, TestMode::Concurrent] {
        let err = model.test(&five_by_five, mode).unwrap_err();
        assert!(matches!(err, BayesError::DimensionMismatch { .. }));
    }
}
