//! Popularity ranking, used when nothing is selected.
//!
//! ## Algorithm
//! 1. Keep movies with at least `min_rating_count` ratings
//! 2. Drop statistics for movies missing from the catalog
//! 3. Rank by mean rating, highest first (ties by ascending id)
//! 4. Return the top `limit`

use crate::traits::RankingPolicy;
use crate::types::{MovieStats, ScoredMovie, Selection, sort_and_truncate};
use data_loader::{DataIndex, MovieId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranks well-rated movies by their mean rating
#[derive(Clone)]
pub struct PopularityPolicy {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,

    /// Minimum number of ratings for a movie to be ranked
    min_rating_count: u32,
}

impl PopularityPolicy {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            min_rating_count: 10,
        }
    }

    /// Configure the minimum rating count (default: 10)
    pub fn with_min_rating_count(mut self, count: u32) -> Self {
        self.min_rating_count = count;
        self
    }
}

impl RankingPolicy for PopularityPolicy {
    fn name(&self) -> &str {
        "popularity"
    }

    #[instrument(skip(self, stats, _selection), fields(rated_movies = stats.len()))]
    fn rank(
        &self,
        stats: &HashMap<MovieId, MovieStats>,
        _selection: &Selection,
        limit: usize,
    ) -> Vec<ScoredMovie> {
        let candidates: Vec<ScoredMovie> = stats
            .values()
            .filter(|s| s.rating_count >= self.min_rating_count)
            .filter(|s| self.data_index.contains_movie(s.movie_id))
            .map(|s| ScoredMovie::new(s.movie_id, s.avg_rating, Some(s.avg_rating)))
            .collect();

        debug!(
            "{} movies have at least {} ratings",
            candidates.len(),
            self.min_rating_count
        );
        sort_and_truncate(candidates, limit)
    }
}
