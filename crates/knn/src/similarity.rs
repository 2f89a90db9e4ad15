//! User-user similarity from shared ratings.
//!
//! For two users, take the movies both have rated. Each shared movie adds
//! `|r1 - r2| ^ p` to a distance sum `S`, and the similarity is `-S / n`.
//! 0 is the best real score and more negative means less similar.
//! Users with nothing in common get [`NO_SHARED_ITEMS`] instead.

use data_loader::{RatingStore, Score, UserId};
use std::collections::HashMap;
use tracing::debug;

/// Similarity reported for two users without a single shared movie.
///
/// It is larger than every real similarity (those are all `<= 0`), so the
/// neighborhood scan must skip it explicitly instead of treating it as a winner.
pub const NO_SHARED_ITEMS: f64 = 1.0;

/// Distance exponent used until the caller picks another one
pub const DEFAULT_DISTANCE_EXPONENT: f64 = 1.0;

/// True if `similarity` is the "no shared movies" sentinel
pub fn is_no_shared_items(similarity: f64) -> bool {
    similarity == NO_SHARED_ITEMS
}

/// Computes and memoizes user-user similarities
///
/// The cache key is the user pair sorted ascending, so `(a, b)` and `(b, a)`
/// share one entry. Cached values are only valid for the exponent they were
/// computed with; `set_distance_exponent` drops them.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    distance_exponent: f64,
    cache: HashMap<(UserId, UserId), f64>,
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::with_distance_exponent(DEFAULT_DISTANCE_EXPONENT)
    }

    pub fn with_distance_exponent(distance_exponent: f64) -> Self {
        Self {
            distance_exponent,
            cache: HashMap::new(),
        }
    }

    pub fn distance_exponent(&self) -> f64 {
        self.distance_exponent
    }

    /// Change the exponent; every later similarity uses the new value
    pub fn set_distance_exponent(&mut self, distance_exponent: f64) {
        if distance_exponent != self.distance_exponent {
            debug!(
                "Distance exponent {} -> {}, dropping {} cached similarities",
                self.distance_exponent,
                distance_exponent,
                self.cache.len()
            );
            self.cache.clear();
        }
        self.distance_exponent = distance_exponent;
    }

    /// `|x - y| ^ p` for the current exponent
    pub fn distance(&self, x: Score, y: Score) -> f64 {
        f64::from((x - y).abs()).powf(self.distance_exponent)
    }

    /// Similarity of `u1` and `u2`, computed once per unordered pair
    pub fn similarity(&mut self, store: &RatingStore, u1: UserId, u2: UserId) -> f64 {
        let key = canonical_pair(u1, u2);
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let value = self.compute(store, key.0, key.1);
        self.cache.insert(key, value);
        value
    }

    /// Number of memoized pairs
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }

    fn compute(&self, store: &RatingStore, u1: UserId, u2: UserId) -> f64 {
        let (Some(first), Some(second)) = (store.user_ratings(u1), store.user_ratings(u2)) else {
            return NO_SHARED_ITEMS;
        };

        // Walk the smaller map, probe the larger one
        let (small, large) = if first.len() <= second.len() {
            (first, second)
        } else {
            (second, first)
        };

        let mut shared = 0usize;
        let mut sum = 0.0;
        for (movie_id, &score) in small {
            if let Some(&other) = large.get(movie_id) {
                shared += 1;
                sum += self.distance(score, other);
            }
        }

        if shared == 0 {
            NO_SHARED_ITEMS
        } else if sum == 0.0 {
            0.0
        } else {
            -sum / shared as f64
        }
    }
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RatingRecord;

    fn store(records: &[(UserId, u32, Score)]) -> RatingStore {
        RatingStore::new(
            records
                .iter()
                .map(|&(u, m, r)| RatingRecord::new(u, m, r, 0))
                .collect(),
            None,
        )
    }

    #[test]
    fn test_identical_ratings_score_zero() {
        let store = store(&[(1, 1, 4), (1, 2, 2), (2, 1, 4), (2, 2, 2)]);
        let mut engine = SimilarityEngine::new();
        assert_eq!(engine.similarity(&store, 1, 2), 0.0);
    }

    #[test]
    fn test_single_shared_item() {
        let store = store(&[(1, 1, 5), (2, 1, 1)]);
        let mut engine = SimilarityEngine::new();
        assert_eq!(engine.similarity(&store, 1, 2), -4.0);
    }

    #[test]
    fn test_only_shared_items_count() {
        // Shared: movie 1 (|5-3| = 2) and movie 2 (|1-2| = 1); movies 3, 4 ignored
        let store = store(&[(1, 1, 5), (1, 2, 1), (1, 3, 5), (2, 1, 3), (2, 2, 2), (2, 4, 1)]);
        let mut engine = SimilarityEngine::new();
        assert_eq!(engine.similarity(&store, 1, 2), -1.5);
    }

    #[test]
    fn test_exponent_applies_per_item() {
        let store = store(&[(1, 1, 5), (1, 2, 1), (2, 1, 3), (2, 2, 2)]);
        let mut engine = SimilarityEngine::with_distance_exponent(2.0);
        // (2^2 + 1^2) / 2
        assert_eq!(engine.similarity(&store, 1, 2), -2.5);
    }

    #[test]
    fn test_no_shared_items_is_sentinel() {
        let store = store(&[(1, 1, 5), (2, 2, 5)]);
        let mut engine = SimilarityEngine::new();
        assert_eq!(engine.similarity(&store, 1, 2), NO_SHARED_ITEMS);
        // Unknown users have no ratings at all
        assert!(is_no_shared_items(engine.similarity(&store, 1, 42)));
        assert!(is_no_shared_items(engine.similarity(&store, 42, 43)));
    }

    #[test]
    fn test_symmetric_and_cached_once() {
        let store = store(&[(1, 1, 5), (1, 2, 3), (2, 1, 2), (2, 2, 3)]);
        let mut engine = SimilarityEngine::new();

        let forward = engine.similarity(&store, 1, 2);
        let backward = engine.similarity(&store, 2, 1);
        assert_eq!(forward.to_bits(), backward.to_bits());
        assert_eq!(engine.cached_pairs(), 1);
    }

    #[test]
    fn test_exponent_change_recomputes() {
        let store = store(&[(1, 1, 5), (2, 1, 2)]);
        let mut engine = SimilarityEngine::new();
        assert_eq!(engine.similarity(&store, 1, 2), -3.0);

        engine.set_distance_exponent(2.0);
        assert_eq!(engine.cached_pairs(), 0);
        assert_eq!(engine.similarity(&store, 1, 2), -9.0);
    }

    #[test]
    fn test_distance() {
        let engine = SimilarityEngine::with_distance_exponent(0.5);
        assert_eq!(engine.distance(5, 1), 2.0);
        assert_eq!(engine.distance(1, 5), 2.0);
        assert_eq!(engine.distance(3, 3), 0.0);
    }
}
