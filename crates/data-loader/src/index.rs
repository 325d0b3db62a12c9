//! DataIndex building logic.
//!
//! Builds both stores from the two input files. Loading happens exactly
//! once per process; there is no reload.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

impl DataIndex {
    /// Load the catalog and the ratings table.
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse both files in parallel (each through its strategy chain)
    /// 2. Insert movies (first occurrence of an id wins)
    /// 3. Insert ratings
    /// 4. Report orphan ratings
    ///
    /// Any error here is fatal: the caller must not start serving.
    pub fn load_from_files(movies_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            "Loading catalog from {:?} and ratings from {:?}",
            movies_path, ratings_path
        );

        // Rayon's `join` runs the two parsers in parallel
        let (movies, ratings) = rayon::join(
            || parser::parse_movies(movies_path),
            || parser::parse_ratings(ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        let mut index = DataIndex::new();
        let mut duplicates = 0usize;
        for movie in movies {
            if !index.insert_movie(movie) {
                duplicates += 1;
            }
        }
        for rating in ratings {
            index.insert_rating(rating);
        }

        let (movie_count, rating_count) = index.counts();
        info!(
            "Loaded {} movies ({} duplicates dropped) and {} ratings for {} movies",
            movie_count,
            duplicates,
            rating_count,
            index.rated_movie_count()
        );

        let orphans = index.orphan_rating_count();
        if orphans > 0 {
            warn!("{} ratings reference movies missing from the catalog", orphans);
        }

        Ok(index)
    }
}
