//! # KNN Crate
//!
//! Neighborhood-based collaborative filtering over a [`data_loader::RatingStore`].
//!
//! ## Components
//!
//! ### SimilarityEngine
//! Distance between two users over the movies both rated:
//! - `|r1 - r2| ^ p` per shared movie, averaged and negated
//! - 0 for perfect agreement, `NO_SHARED_ITEMS` (1.0) when nothing is shared
//!
//! ### NeighborhoodSelector
//! All users tied for the best similarity to a target user.
//!
//! ### Predictor
//! Mean neighbor rating for a movie, falling back to the movie's average.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RatingStore;
//! use knn::Predictor;
//! use std::sync::Arc;
//!
//! let store = Arc::new(RatingStore::load(Path::new("data/ml-100k"), Some("u1"))?);
//! let mut predictor = Predictor::new(store);
//!
//! let estimate = predictor.predict(1, 6);
//! predictor.set_distance_exponent(2.0);
//! let squared = predictor.predict(1, 6);
//! ```
//!
//! ## Caching
//!
//! Every cache is an owned map on the component that fills it and is only
//! ever read-checked then written. Nothing here is shared between threads.

// Public modules
pub mod similarity;
pub mod neighborhood;
pub mod predictor;

// Re-export commonly used types
pub use similarity::{DEFAULT_DISTANCE_EXPONENT, NO_SHARED_ITEMS, SimilarityEngine};
pub use neighborhood::NeighborhoodSelector;
pub use predictor::{DEFAULT_AVERAGE_RATING, Predictor, round2};

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{RatingRecord, RatingStore};
    use std::sync::Arc;

    #[test]
    fn test_predictor_creation() {
        let store = RatingStore::new(vec![RatingRecord::new(1, 1, 5, 1000000)], None);
        let predictor = Predictor::new(Arc::new(store));
        assert_eq!(predictor.distance_exponent(), DEFAULT_DISTANCE_EXPONENT);
    }

    #[test]
    fn test_user_without_ratings_similarity_is_sentinel() {
        let store = Arc::new(RatingStore::new(
            vec![RatingRecord::new(1, 1, 5, 0), RatingRecord::new(2, 1, 3, 0)],
            None,
        ));
        let mut predictor = Predictor::new(store);
        for other in [1, 2, 3] {
            assert_eq!(predictor.similarity(50, other), NO_SHARED_ITEMS);
        }
        for user in [1, 2] {
            assert!(!predictor.neighborhood(user).contains(&50));
        }
    }
}
