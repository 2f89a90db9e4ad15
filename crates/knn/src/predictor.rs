//! Rating prediction from the nearest-neighbor set.
//!
//! `predict(u, m)` averages the ratings that u's neighbors gave m. When none
//! of them rated it, the movie's mean training rating is used instead, and
//! when nobody rated the movie at all the answer is [`DEFAULT_AVERAGE_RATING`].

use crate::neighborhood::NeighborhoodSelector;
use crate::similarity::SimilarityEngine;
use data_loader::{MovieId, RatingStore, Score, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Average reported for a movie with no training ratings. Not derived from data.
pub const DEFAULT_AVERAGE_RATING: f64 = 3.0;

/// k-NN rating predictor over a shared, read-only `RatingStore`
///
/// All three caches (similarities, neighborhoods, movie averages) live here
/// and are filled on first use, which is why the query methods take `&mut self`.
///
/// ## Usage
/// ```ignore
/// let mut predictor = Predictor::new(store).with_distance_exponent(2.0);
/// let estimate = predictor.predict(1, 1193);
/// ```
#[derive(Debug, Clone)]
pub struct Predictor {
    store: Arc<RatingStore>,
    selector: NeighborhoodSelector,
    averages: HashMap<MovieId, f64>,
}

impl Predictor {
    pub fn new(store: Arc<RatingStore>) -> Self {
        Self {
            store,
            selector: NeighborhoodSelector::new(SimilarityEngine::new()),
            averages: HashMap::new(),
        }
    }

    /// Configure the distance exponent (default: 1.0)
    pub fn with_distance_exponent(mut self, distance_exponent: f64) -> Self {
        self.set_distance_exponent(distance_exponent);
        self
    }

    pub fn distance_exponent(&self) -> f64 {
        self.selector.distance_exponent()
    }

    /// Change the distance exponent mid-session. Similarities and
    /// neighborhoods are recomputed on next use; movie averages are kept.
    pub fn set_distance_exponent(&mut self, distance_exponent: f64) {
        self.selector.set_distance_exponent(distance_exponent);
    }

    pub fn store(&self) -> &Arc<RatingStore> {
        &self.store
    }

    /// Training rating, 0 when absent
    pub fn rating(&self, u: UserId, m: MovieId) -> Score {
        self.store.rating(u, m)
    }

    /// Movies `u` rated in training
    pub fn movies(&self, u: UserId) -> Vec<MovieId> {
        self.store.movies(u)
    }

    /// Users who rated `m` in training
    pub fn viewers(&self, m: MovieId) -> Vec<UserId> {
        self.store.viewers(m)
    }

    pub fn similarity(&mut self, u1: UserId, u2: UserId) -> f64 {
        self.selector.similarity(&self.store, u1, u2)
    }

    pub fn neighborhood(&mut self, u: UserId) -> &BTreeSet<UserId> {
        self.selector.neighborhood(&self.store, u)
    }

    /// Neighborhood members with their similarity to `u`
    pub fn neighbors_with_similarity(&mut self, u: UserId) -> Vec<(UserId, f64)> {
        self.selector
            .neighbors_with_similarity(&self.store, u)
            .into_iter()
            .collect()
    }

    /// Estimated rating of movie `m` by user `u`, rounded to 2 decimals
    ///
    /// Unknown users and movies are fine: they end up on the average fallback.
    #[instrument(skip(self))]
    pub fn predict(&mut self, u: UserId, m: MovieId) -> f64 {
        let store = Arc::clone(&self.store);
        // Only neighbors sharing at least one movie with `u` take part
        let neighbors = self.selector.neighbors_with_similarity(&store, u);

        // Neighbors who never rated `m` are left out, not counted as 0
        let ratings: Vec<Score> = neighbors
            .keys()
            .filter_map(|&uid| store.user_ratings(uid)?.get(&m).copied())
            .collect();

        if ratings.is_empty() {
            debug!("No neighbor of user {} rated movie {}, using average", u, m);
            return round2(self.average_rating(m));
        }

        let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        round2(total as f64 / ratings.len() as f64)
    }

    /// Mean training rating of movie `m`, memoized
    ///
    /// [`DEFAULT_AVERAGE_RATING`] when the movie has no training ratings.
    pub fn average_rating(&mut self, m: MovieId) -> f64 {
        if let Some(&cached) = self.averages.get(&m) {
            return cached;
        }

        let average = match self.store.movie_ratings(m) {
            Some(ratings) if !ratings.is_empty() => {
                let total: i64 = ratings.values().map(|&r| i64::from(r)).sum();
                total as f64 / ratings.len() as f64
            }
            _ => DEFAULT_AVERAGE_RATING,
        };

        self.averages.insert(m, average);
        average
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
