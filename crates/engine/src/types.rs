//! Types shared by the aggregator, the ranking policies and callers.

use data_loader::{Movie, MovieId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-movie rating statistics, derived from the ratings table on demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovieStats {
    pub movie_id: MovieId,
    /// Arithmetic mean, unrounded
    pub avg_rating: f64,
    pub rating_count: u32,
}

/// The set of movies a caller picked.
///
/// Duplicates collapse; ids unknown to the catalog are kept here and
/// simply match nothing. Requested ids that are not valid movie ids at
/// all (negative, zero, too large) are only counted as unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<MovieId>,
    unresolved: usize,
}

impl Selection {
    pub fn new(ids: impl IntoIterator<Item = MovieId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            unresolved: 0,
        }
    }

    /// Record `count` requested ids that could not be turned into movie ids
    pub fn with_unresolved(mut self, count: usize) -> Self {
        self.unresolved = count;
        self
    }

    /// True when the caller asked for anything, even if none of it resolved.
    ///
    /// Decides between popularity and content ranking.
    pub fn is_requested(&self) -> bool {
        !self.ids.is_empty() || self.unresolved > 0
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<MovieId> for Selection {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A movie with its internal ranking score.
///
/// Scores never leave the engine; see [`RankedEntry`] for the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f64,
    /// Mean rating when the policy considers it reportable
    pub avg_rating: Option<f64>,
}

impl ScoredMovie {
    pub fn new(movie_id: MovieId, score: f64, avg_rating: Option<f64>) -> Self {
        Self {
            movie_id,
            score,
            avg_rating,
        }
    }
}

/// One line of a recommendation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: MovieId,
    pub title: String,
    /// Pipe-joined genres or `"Unknown"`
    pub genres: String,
    /// Rounded to 2 decimals; `None` when no qualifying rating existed
    #[serde(rename = "avgRating")]
    pub avg_rating: Option<f64>,
}

impl RankedEntry {
    pub fn new(movie: &Movie, avg_rating: Option<f64>) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genres: movie.genre_label(),
            avg_rating: avg_rating.map(round2),
        }
    }
}

/// One line of the catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: MovieId,
    pub title: String,
    pub genres: String,
}

impl From<&Movie> for CatalogEntry {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genres: movie.genre_label(),
        }
    }
}

/// A title search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub entry: CatalogEntry,
    /// Whole title equals the query, ignoring case
    pub exact: bool,
    pub avg_rating: Option<f64>,
    pub rating_count: u32,
}

/// Round to 2 decimal places (output formatting only)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sort by score descending, ties by ascending movie id, then keep `limit`.
///
/// `sort_by` is stable and the tie-break makes the order total, so the
/// result does not depend on iteration order of the inputs.
pub fn sort_and_truncate(mut scored: Vec<ScoredMovie>, limit: usize) -> Vec<ScoredMovie> {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    scored.truncate(limit);
    scored
}
