//! Nearest-neighbor selection.
//!
//! The neighborhood of a user is every user tied for the highest similarity
//! to them. Users that share no movies with the target never qualify.
//!
//! ## Algorithm
//! 1. Pick a seed: the first known user other than the target
//! 2. Start the running best at the seed's similarity (unless it is the sentinel)
//! 3. Scan all users in ascending id order, skipping the seed:
//!    - sentinel similarity: skip
//!    - below best: skip
//!    - equal to best: join the set
//!    - above best: clear the set, raise best, start over with this user
//!
//! The target itself is part of the scan. When the target has ratings its
//! self-similarity is 0, the best attainable, so its neighborhood is itself
//! plus every user who agrees with it on all shared movies.
//!
//! If nobody shares a movie with the target, the set is just the seed as a
//! placeholder. `neighbors_with_similarity` leaves it out, and prediction
//! goes through that method.

use crate::similarity::{SimilarityEngine, is_no_shared_items};
use data_loader::{RatingStore, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Seed used when the store has no user besides the target
const FALLBACK_SEED: UserId = 1;
const FALLBACK_SEED_ALT: UserId = 2;

/// Finds and memoizes each user's most-similar neighborhood
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodSelector {
    engine: SimilarityEngine,
    cache: HashMap<UserId, BTreeSet<UserId>>,
}

impl NeighborhoodSelector {
    pub fn new(engine: SimilarityEngine) -> Self {
        Self {
            engine,
            cache: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    pub fn distance_exponent(&self) -> f64 {
        self.engine.distance_exponent()
    }

    /// Change the exponent; cached neighborhoods were built from the old
    /// similarities, so they go too
    pub fn set_distance_exponent(&mut self, distance_exponent: f64) {
        if distance_exponent != self.engine.distance_exponent() {
            self.cache.clear();
        }
        self.engine.set_distance_exponent(distance_exponent);
    }

    /// Similarity between two users (memoized in the engine)
    pub fn similarity(&mut self, store: &RatingStore, u1: UserId, u2: UserId) -> f64 {
        self.engine.similarity(store, u1, u2)
    }

    /// Users tied for maximal similarity to `user`; never empty
    #[instrument(skip(self, store))]
    pub fn neighborhood(&mut self, store: &RatingStore, user: UserId) -> &BTreeSet<UserId> {
        if !self.cache.contains_key(&user) {
            let neighbors = self.scan(store, user);
            debug!("User {} has {} nearest neighbors", user, neighbors.len());
            self.cache.insert(user, neighbors);
        }
        &self.cache[&user]
    }

    /// The neighborhood members that share movies with `user`, with their similarity
    ///
    /// A seed left in place because nobody shares a movie with `user` is
    /// dropped here, so the map is empty for users unknown to training.
    pub fn neighbors_with_similarity(
        &mut self,
        store: &RatingStore,
        user: UserId,
    ) -> BTreeMap<UserId, f64> {
        let neighbors: Vec<UserId> = self.neighborhood(store, user).iter().copied().collect();
        neighbors
            .into_iter()
            .map(|uid| (uid, self.engine.similarity(store, user, uid)))
            .filter(|&(_, similarity)| !is_no_shared_items(similarity))
            .collect()
    }

    /// Number of memoized neighborhoods
    pub fn cached_users(&self) -> usize {
        self.cache.len()
    }

    fn scan(&mut self, store: &RatingStore, user: UserId) -> BTreeSet<UserId> {
        let seed = seed_for(store, user);
        let seed_similarity = self.engine.similarity(store, user, seed);

        // A sentinel seed only holds the place until a real candidate shows up
        let mut best = (!is_no_shared_items(seed_similarity)).then_some(seed_similarity);
        let mut neighbors = BTreeSet::from([seed]);

        for candidate in store.all_user_ids() {
            if candidate == seed {
                continue;
            }
            let similarity = self.engine.similarity(store, user, candidate);
            if is_no_shared_items(similarity) {
                continue;
            }

            match best {
                Some(current) if similarity < current => {}
                Some(current) if similarity == current => {
                    neighbors.insert(candidate);
                }
                _ => {
                    // Strictly better (or first real score): earlier ties are dropped
                    neighbors.clear();
                    neighbors.insert(candidate);
                    best = Some(similarity);
                }
            }
        }

        neighbors
    }
}

/// First known user other than `user`, so the seed is never compared to itself
fn seed_for(store: &RatingStore, user: UserId) -> UserId {
    store
        .all_user_ids()
        .find(|&uid| uid != user)
        .unwrap_or(if user == FALLBACK_SEED {
            FALLBACK_SEED_ALT
        } else {
            FALLBACK_SEED
        })
}
