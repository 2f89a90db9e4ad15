//! Prediction error statistics over a batch of test ratings.
//!
//! The error of one prediction is `prediction - rating` (signed). From the
//! errors of N predictions:
//! - mean: `sum(err) / N`
//! - stddev: `sqrt(sum((err - mean)^2) / (N - 1))`, the sample deviation
//! - rms: `sqrt(sum(err^2) / N)`

use crate::error::{EvaluationError, Result};
use data_loader::{MovieId, RatingRecord, Score, UserId};
use knn::Predictor;
use serde::Serialize;
use tracing::{info, instrument};

/// One evaluated test rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Actual rating from the test split
    pub rating: Score,
    pub prediction: f64,
}

impl Prediction {
    /// Signed error, positive when the prediction is too high
    pub fn error(&self) -> f64 {
        self.prediction - f64::from(self.rating)
    }
}

/// Predictions in test-record order plus their summary statistics
///
/// The statistics are computed once in [`EvaluationResult::new`] and the
/// prediction list can't be modified afterwards, so repeated calls always
/// agree.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    predictions: Vec<Prediction>,
    mean: Option<f64>,
    stddev: Option<f64>,
    rms: Option<f64>,
}

impl EvaluationResult {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        let n = predictions.len();
        let errors: Vec<f64> = predictions.iter().map(Prediction::error).collect();

        let mean = (n >= 1).then(|| errors.iter().sum::<f64>() / n as f64);
        let rms = (n >= 1).then(|| (errors.iter().map(|e| e * e).sum::<f64>() / n as f64).sqrt());
        let stddev = match mean {
            Some(mean) if n >= 2 => {
                let squares: f64 = errors.iter().map(|e| (e - mean).powi(2)).sum();
                Some((squares / (n - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            predictions,
            mean,
            stddev,
            rms,
        }
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Mean signed error; needs at least one prediction
    pub fn mean(&self) -> Result<f64> {
        self.mean.ok_or_else(|| self.insufficient("mean", 1))
    }

    /// Sample standard deviation of the error (divisor N - 1); needs two predictions
    pub fn stddev(&self) -> Result<f64> {
        self.stddev.ok_or_else(|| self.insufficient("stddev", 2))
    }

    /// Root-mean-square error; needs at least one prediction
    pub fn rms(&self) -> Result<f64> {
        self.rms.ok_or_else(|| self.insufficient("rms", 1))
    }

    /// `[user, movie, rating, prediction]` rows in test order
    pub fn to_rows(&self) -> Vec<[f64; 4]> {
        self.predictions
            .iter()
            .map(|p| {
                [
                    f64::from(p.user_id),
                    f64::from(p.movie_id),
                    f64::from(p.rating),
                    p.prediction,
                ]
            })
            .collect()
    }

    fn insufficient(&self, statistic: &'static str, required: usize) -> EvaluationError {
        EvaluationError::InsufficientSamples {
            statistic,
            required,
            found: self.predictions.len(),
        }
    }
}

/// Runs a prediction function over test records
pub struct Evaluator;

impl Evaluator {
    /// Predict every record in order and collect the results
    pub fn evaluate<F>(records: &[RatingRecord], mut predict: F) -> EvaluationResult
    where
        F: FnMut(UserId, MovieId) -> f64,
    {
        let predictions = records
            .iter()
            .map(|record| Prediction {
                user_id: record.user_id,
                movie_id: record.movie_id,
                rating: record.rating,
                prediction: predict(record.user_id, record.movie_id),
            })
            .collect();

        EvaluationResult::new(predictions)
    }
}

/// Evaluate the first `limit` test records of the predictor's store (all if `None`)
///
/// A `limit` larger than the test split is clamped to its size.
#[instrument(skip(predictor))]
pub fn run_evaluation(predictor: &mut Predictor, limit: Option<usize>) -> Result<EvaluationResult> {
    let store = std::sync::Arc::clone(predictor.store());
    let test = store.test_records().ok_or(EvaluationError::NoTestData)?;
    let count = limit.map_or(test.len(), |k| k.min(test.len()));

    info!(
        "Evaluating {} of {} test ratings (exponent {})",
        count,
        test.len(),
        predictor.distance_exponent()
    );

    let result = Evaluator::evaluate(&test[..count], |u, m| predictor.predict(u, m));

    if let (Ok(mean), Ok(rms)) = (result.mean(), result.rms()) {
        info!("Evaluation finished: mean error {:.4}, rms {:.4}", mean, rms);
    }
    Ok(result)
}
