//! Integration tests for the evaluation flow.
//!
//! These tests build a small store from raw tab-separated lines, run the
//! k-NN predictor over its test split and check the summary statistics.

use data_loader::RatingStore;
use evaluation::{EvaluationError, run_evaluation};
use knn::Predictor;
use std::sync::Arc;

const TRAINING: [&str; 9] = [
    "1\t10\t4\t881250949",
    "1\t11\t3\t881250950",
    "2\t10\t4\t881250951",
    "2\t11\t3\t881250952",
    "2\t20\t5\t881250953",
    "3\t10\t1\t881250954",
    "3\t20\t1\t881250955",
    "3\t30\t2\t881250956",
    "4\t30\t4\t881250957",
];

// Predictions: (1,20) -> neighbor 2 gave 5; (3,11) -> 3's neighborhood is
// itself, fallback to the movie 11 average 3.0; (1,99) -> unseen movie 3.0
const TEST: [&str; 3] = [
    "1\t20\t4\t881260000",
    "3\t11\t2\t881260001",
    "1\t99\t3\t881260002",
];

fn predictor() -> Predictor {
    let store = RatingStore::from_lines(TRAINING, Some(TEST)).unwrap();
    Predictor::new(Arc::new(store))
}

#[test]
fn test_full_evaluation() {
    let mut predictor = predictor();
    let result = run_evaluation(&mut predictor, None).unwrap();

    let predicted: Vec<f64> = result.predictions().iter().map(|p| p.prediction).collect();
    assert_eq!(predicted, vec![5.0, 3.0, 3.0]);

    // errors: +1, +1, 0
    assert!((result.mean().unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert!((result.rms().unwrap() - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert!((result.stddev().unwrap() - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
}

#[test]
fn test_limit_takes_prefix() {
    let mut predictor = predictor();
    let result = run_evaluation(&mut predictor, Some(2)).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.predictions()[1].user_id, 3);

    // Larger than the split: clamped
    let result = run_evaluation(&mut predictor, Some(100)).unwrap();
    assert_eq!(result.len(), 3);
}

#[test]
fn test_single_record_has_no_stddev() {
    let mut predictor = predictor();
    let result = run_evaluation(&mut predictor, Some(1)).unwrap();
    assert_eq!(result.rms().unwrap(), 1.0);
    assert!(matches!(
        result.stddev(),
        Err(EvaluationError::InsufficientSamples { required: 2, found: 1, .. })
    ));
}

#[test]
fn test_missing_test_split() {
    let store = RatingStore::from_lines(TRAINING, None::<Vec<&str>>).unwrap();
    let mut predictor = Predictor::new(Arc::new(store));
    let err = run_evaluation(&mut predictor, Some(5)).unwrap_err();
    assert_eq!(err, EvaluationError::NoTestData);
}

#[test]
fn test_exponent_change_between_runs() {
    let mut predictor = predictor();
    let linear = run_evaluation(&mut predictor, None).unwrap();

    predictor.set_distance_exponent(2.0);
    let squared = run_evaluation(&mut predictor, None).unwrap();

    // Exact agreement scores 0 under any exponent, so the neighborhoods and
    // predictions here do not move
    assert_eq!(linear.to_rows(), squared.to_rows());
    assert_eq!(predictor.distance_exponent(), 2.0);
}

#[test]
fn test_result_serializes() {
    let mut predictor = predictor();
    let result = run_evaluation(&mut predictor, Some(2)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["predictions"][0]["movie_id"], 20);
    assert_eq!(json["predictions"][0]["prediction"], 5.0);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 2);
}
