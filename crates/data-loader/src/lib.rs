//! # Data Loader Crate
//!
//! This crate reads MovieLens 100k rating files and indexes them into an
//! immutable [`RatingStore`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (UserId, MovieId, RatingRecord, RatingStore)
//! - **parser**: Parse tab-separated rating lines, resolve split file names
//! - **index**: Build the by-user and by-movie indices
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RatingStore;
//! use std::path::Path;
//!
//! // Training from u1.base, test split from u1.test
//! let store = RatingStore::load(Path::new("data/ml-100k"), Some("u1"))?;
//!
//! let rating = store.rating(1, 1);
//! let movies = store.movies(1);
//! println!("User 1 rated {} movies, gave movie 1 a {}", movies.len(), rating);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{DataSplit, parse_ratings, parse_ratings_from_reader};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    Score,
    Timestamp,
    // Core types
    RatingRecord,
    RatingStore,
    // Sentinels
    NO_RATING,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = RatingStore::new(Vec::new(), None);
        let (users, movies, ratings) = store.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
        assert_eq!(store.all_user_ids().count(), 0);
    }

    #[test]
    fn test_empty_queries() {
        let store = RatingStore::default();

        // Querying non-existent data should return the sentinel or empty lists
        assert_eq!(store.rating(999, 999), NO_RATING);
        assert!(store.movies(999).is_empty());
        assert!(store.viewers(999).is_empty());
        assert!(store.test_records().is_none());
    }
}
