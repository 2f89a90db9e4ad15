//! # Evaluation Crate
//!
//! Measures how far k-NN predictions land from held-out ratings.
//!
//! ## Example Usage
//! ```ignore
//! use evaluation::run_evaluation;
//!
//! let mut predictor = Predictor::new(store);
//! let result = run_evaluation(&mut predictor, Some(20))?;
//!
//! println!("mean = {}", result.mean()?);
//! println!("stddev = {}", result.stddev()?);
//! println!("rms = {}", result.rms()?);
//! ```

pub mod error;
pub mod evaluator;

// Re-export main types
pub use error::{EvaluationError, Result};
pub use evaluator::{EvaluationResult, Evaluator, Prediction, run_evaluation};
