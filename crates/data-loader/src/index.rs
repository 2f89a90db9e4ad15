//! RatingStore building and indexing logic.
//!
//! This module builds a `RatingStore` from parsed records:
//! - Index training ratings by user and by movie
//! - Keep the test split untouched, in file order
//! - Load the two files of a data split in parallel
//!
//! Rust concepts you'll learn:
//! - Entry API for nested maps
//! - Using Rayon `join` for two independent jobs
//! - Propagating errors out of parallel work with `?`

use crate::error::Result;
use crate::parser::{self, DataSplit};
use crate::types::*;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

impl RatingStore {
    /// Build a store from already-parsed training and (optional) test records
    ///
    /// Duplicate `(user, movie)` pairs in `training` keep the LAST record read.
    /// This mirrors the raw data and is counted in `overwritten_records`,
    /// not repaired.
    pub fn new(training: Vec<RatingRecord>, test: Option<Vec<RatingRecord>>) -> Self {
        let mut store = RatingStore {
            test,
            ..RatingStore::default()
        };

        for record in &training {
            store.insert_training(record);
        }

        if store.overwritten > 0 {
            warn!(
                "{} duplicate (user, movie) training records were overwritten by later ones",
                store.overwritten
            );
        }

        let (users, movies, ratings) = store.counts();
        debug!(
            "Indexed {} users, {} movies, {} ratings ({} test records)",
            users,
            movies,
            ratings,
            store.test.as_ref().map_or(0, |t| t.len())
        );
        store
    }

    /// Parse raw tab-separated lines and build a store
    ///
    /// Any malformed line aborts construction.
    pub fn from_lines<'a, I, J>(training: I, test: Option<J>) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
        J: IntoIterator<Item = &'a str>,
    {
        let training = parser::parse_ratings_from_lines(training, "training")?;
        let test = test
            .map(|lines| parser::parse_ratings_from_lines(lines, "test"))
            .transpose()?;
        Ok(Self::new(training, test))
    }

    /// Load a data directory, optionally naming a split such as `"u1"`
    ///
    /// Steps:
    /// 1. Resolve file names (`u.data`, or `<split>.base` + `<split>.test`)
    /// 2. Parse training and test files IN PARALLEL using Rayon
    /// 3. Build the indices
    #[instrument(skip(data_dir), fields(dir = %data_dir.display()))]
    pub fn load(data_dir: &Path, split: Option<&str>) -> Result<Self> {
        let files = DataSplit::locate(data_dir, split);
        info!("Loading ratings from {:?}", files.training);

        let (training, test) = rayon::join(
            || parser::parse_ratings(&files.training),
            || files.test.as_deref().map(parser::parse_ratings).transpose(),
        );

        let training = training?;
        let test = test?;

        info!(
            "Loaded {} training ratings, {} test ratings",
            training.len(),
            test.as_ref().map_or(0, |t| t.len())
        );

        Ok(Self::new(training, test))
    }

    fn insert_training(&mut self, record: &RatingRecord) {
        let previous = self
            .by_user
            .entry(record.user_id)
            .or_default()
            .insert(record.movie_id, record.rating);

        self.by_movie
            .entry(record.movie_id)
            .or_default()
            .insert(record.user_id, record.rating);

        if previous.is_some() {
            self.overwritten += 1;
        }
    }
}
