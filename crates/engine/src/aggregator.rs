//! Per-movie rating statistics.
//!
//! Statistics are recomputed from the ratings table on every request;
//! the table is an immutable snapshot so there is nothing to invalidate.

use crate::types::MovieStats;
use data_loader::{MovieId, Rating};
use rayon::prelude::*;
use std::collections::HashMap;

/// Group ratings by movie and compute (mean, count) for each group.
///
/// ## Algorithm
/// Each rayon worker folds its share of the table into a local
/// `movie_id -> (sum, count)` map; the partial maps are then merged.
/// Sums are accumulated in f64 and no rounding happens here.
///
/// An empty table yields an empty map.
pub fn aggregate(ratings: &[Rating]) -> HashMap<MovieId, MovieStats> {
    let totals = ratings
        .par_iter()
        .fold(
            HashMap::new,
            |mut local: HashMap<MovieId, (f64, u32)>, rating| {
                let entry = local.entry(rating.movie_id).or_insert((0.0, 0));
                entry.0 += rating.rating;
                entry.1 += 1;
                local
            },
        )
        .reduce(HashMap::new, |mut acc, local| {
            for (movie_id, (sum, count)) in local {
                let entry = acc.entry(movie_id).or_insert((0.0, 0));
                entry.0 += sum;
                entry.1 += count;
            }
            acc
        });

    totals
        .into_iter()
        .map(|(movie_id, (sum, count))| {
            (
                movie_id,
                MovieStats {
                    movie_id,
                    avg_rating: sum / f64::from(count),
                    rating_count: count,
                },
            )
        })
        .collect()
}
