//! Core trait for ranking policies.

use crate::types::{MovieStats, ScoredMovie, Selection};
use data_loader::MovieId;
use std::collections::HashMap;

/// A way of turning rating statistics and a selection into a ranked list.
///
/// ## Design Note
/// - `Send + Sync` so a single Recommender can serve concurrent requests
/// - Implementations never fail: an empty result is a valid answer
/// - Returned movies are sorted best first and at most `limit` long
pub trait RankingPolicy: Send + Sync {
    /// Returns the name of this policy (for logging/debugging)
    fn name(&self) -> &str;

    /// Rank movies for the given selection.
    ///
    /// # Arguments
    /// * `stats` - Per-movie statistics from the aggregator
    /// * `selection` - Movies the caller picked (may be ignored)
    /// * `limit` - Maximum number of movies to return
    fn rank(
        &self,
        stats: &HashMap<MovieId, MovieStats>,
        selection: &Selection,
        limit: usize,
    ) -> Vec<ScoredMovie>;
}
