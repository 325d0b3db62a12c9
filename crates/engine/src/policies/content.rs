//! Content-based ranking, used when the caller selected movies.
//!
//! ## Algorithm
//! 1. Resolve the selection against the catalog (unknown ids are ignored)
//! 2. Count, per genre, how many selected movies carry it
//! 3. For every catalog movie outside the selection:
//!    - genre score  = sum of counts of its genres * `genre_weight`
//!    - rating score = mean rating * `rating_weight`, only with at least
//!      `min_rating_count` ratings (otherwise 0, and no mean is reported)
//! 4. Keep movies whose total is positive, rank highest first
//!    (ties by ascending id), return the top `limit`

use crate::traits::RankingPolicy;
use crate::types::{MovieStats, ScoredMovie, Selection, sort_and_truncate};
use data_loader::{DataIndex, MovieId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Scores unselected movies by genre overlap plus a rating bonus
#[derive(Clone)]
pub struct ContentPolicy {
    data_index: Arc<DataIndex>,
    genre_weight: f64,
    rating_weight: f64,
    min_rating_count: u32,
}

impl ContentPolicy {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            genre_weight: 2.0,
            rating_weight: 0.8,
            min_rating_count: 5,
        }
    }

    /// Configure the weight applied to genre overlap (default: 2.0)
    pub fn with_genre_weight(mut self, weight: f64) -> Self {
        self.genre_weight = weight;
        self
    }

    /// Configure the weight applied to the mean rating (default: 0.8)
    pub fn with_rating_weight(mut self, weight: f64) -> Self {
        self.rating_weight = weight;
        self
    }

    /// Configure the ratings needed for the rating bonus (default: 5)
    pub fn with_min_rating_count(mut self, count: u32) -> Self {
        self.min_rating_count = count;
        self
    }

    /// Number of selected catalog movies carrying each genre.
    ///
    /// A genre counts once per movie even if a token repeats.
    fn genre_counter(&self, selection: &Selection) -> HashMap<&str, u32> {
        let mut counter: HashMap<&str, u32> = HashMap::new();
        for movie in selection.iter().filter_map(|id| self.data_index.get_movie(id)) {
            let distinct: HashSet<&str> = movie.genre_tokens().into_iter().collect();
            for genre in distinct {
                *counter.entry(genre).or_insert(0) += 1;
            }
        }
        counter
    }
}

impl RankingPolicy for ContentPolicy {
    fn name(&self) -> &str {
        "content"
    }

    #[instrument(skip(self, stats, selection), fields(selected = selection.len()))]
    fn rank(
        &self,
        stats: &HashMap<MovieId, MovieStats>,
        selection: &Selection,
        limit: usize,
    ) -> Vec<ScoredMovie> {
        let counter = self.genre_counter(selection);
        debug!("Genre counter: {:?}", counter);

        let candidates: Vec<ScoredMovie> = self
            .data_index
            .movies()
            .iter()
            .filter(|movie| !selection.contains(movie.id))
            .filter_map(|movie| {
                let overlap: u32 = movie
                    .genre_tokens()
                    .iter()
                    .map(|genre| counter.get(genre).copied().unwrap_or(0))
                    .sum();
                let genre_score = f64::from(overlap) * self.genre_weight;

                let avg_rating = stats
                    .get(&movie.id)
                    .filter(|s| s.rating_count >= self.min_rating_count)
                    .map(|s| s.avg_rating);
                let rating_score = avg_rating.map_or(0.0, |avg| avg * self.rating_weight);

                let total = genre_score + rating_score;
                (total > 0.0).then(|| ScoredMovie::new(movie.id, total, avg_rating))
            })
            .collect();

        debug!("{} movies scored above zero", candidates.len());
        let ranked = sort_and_truncate(candidates, limit);
        for scored in &ranked {
            debug!(movie_id = scored.movie_id, score = scored.score, "ranked");
        }
        ranked
    }
}
