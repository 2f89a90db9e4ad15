//! Core domain types for the MovieLens 100k rating data.
//!
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Small `Copy` structs with public fields
//! - BTreeMap for deterministic, sorted iteration
//! - Borrowing: query methods hand out references, not copies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Integer rating value as it appears in the data files (1-5 in MovieLens)
pub type Score = i32;

/// Unix timestamp of a rating
pub type Timestamp = i64;

/// Returned by `RatingStore::rating` when the user never rated the movie.
///
/// This is not a real score. MovieLens ratings start at 1, so a `0` can only
/// mean "absent".
pub const NO_RATING: Score = 0;

// =============================================================================
// Rating Record
// =============================================================================

/// One line of a ratings file: `user_id \t movie_id \t rating \t timestamp`
///
/// The timestamp is carried through unchanged. Nothing in the prediction
/// code looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: Score,
    pub timestamp: Timestamp,
}

impl RatingRecord {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: Score, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp,
        }
    }
}

// =============================================================================
// RatingStore - the immutable training matrix
// =============================================================================

/// Training ratings indexed by user and by movie, plus the optional test split.
///
/// Both indices are built from the same record sequence and never change after
/// construction. A later record for an already-seen `(user, movie)` pair
/// replaces the earlier one in both indices (last write wins).
///
/// Rust concepts demonstrated:
/// - BTreeMap keeps user ids sorted, which gives `all_user_ids` a stable order
/// - Fields are `pub(crate)`: only `index.rs` may build the maps
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    /// user -> (movie -> rating)
    pub(crate) by_user: BTreeMap<UserId, BTreeMap<MovieId, Score>>,
    /// movie -> (user -> rating), the transpose of `by_user`
    pub(crate) by_movie: BTreeMap<MovieId, BTreeMap<UserId, Score>>,
    /// Held-out records in file order, `None` when no split was supplied
    pub(crate) test: Option<Vec<RatingRecord>>,
    /// Training records that were replaced by a later duplicate
    pub(crate) overwritten: usize,
}

impl RatingStore {
    /// Rating user `u` gave movie `m` in training, or [`NO_RATING`]
    pub fn rating(&self, u: UserId, m: MovieId) -> Score {
        self.by_user
            .get(&u)
            .and_then(|movies| movies.get(&m))
            .copied()
            .unwrap_or(NO_RATING)
    }

    /// Movies user `u` rated in training (ascending). Empty for unknown users.
    pub fn movies(&self, u: UserId) -> Vec<MovieId> {
        self.by_user
            .get(&u)
            .map(|movies| movies.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Users who rated movie `m` in training (ascending). Empty for unknown movies.
    pub fn viewers(&self, m: MovieId) -> Vec<UserId> {
        self.by_movie
            .get(&m)
            .map(|users| users.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Same as [`RatingStore::movies`]
    pub fn items_rated_by(&self, u: UserId) -> Vec<MovieId> {
        self.movies(u)
    }

    /// Same as [`RatingStore::viewers`]
    pub fn users_who_rated(&self, m: MovieId) -> Vec<UserId> {
        self.viewers(m)
    }

    /// All ratings of user `u`, keyed by movie
    ///
    /// Returns `None` for a user with no training ratings.
    pub fn user_ratings(&self, u: UserId) -> Option<&BTreeMap<MovieId, Score>> {
        self.by_user.get(&u)
    }

    /// All ratings of movie `m`, keyed by user
    pub fn movie_ratings(&self, m: MovieId) -> Option<&BTreeMap<UserId, Score>> {
        self.by_movie.get(&m)
    }

    /// Every user with at least one training rating, in ascending order
    pub fn all_user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.by_user.keys().copied()
    }

    /// The test split, if one was supplied at construction
    pub fn test_records(&self) -> Option<&[RatingRecord]> {
        self.test.as_deref()
    }

    /// Number of training records discarded because a later record had the same key
    pub fn overwritten_records(&self) -> usize {
        self.overwritten
    }

    /// (users, movies, distinct training ratings) for logging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.by_user.values().map(|m| m.len()).sum();
        (self.by_user.len(), self.by_movie.len(), total_ratings)
    }
}
