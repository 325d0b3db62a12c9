//! Core domain types for the movie catalog and the ratings table.
//!
//! This module defines the typed records produced by ingestion and the
//! in-memory store that holds them for the lifetime of the process.
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Immutable records validated at the ingestion boundary
//! - A Vec + HashMap layout that keeps source order and O(1) lookups

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Identifier of the user who submitted a rating
pub type UserId = u32;

/// Unique identifier for a movie (always > 0)
pub type MovieId = u32;

/// Genre label reported for movies that carry no genre tokens
pub const UNKNOWN_GENRE: &str = "Unknown";

// =============================================================================
// Movie-related Types
// =============================================================================

/// A movie in the catalog.
///
/// `genres` keeps the order the tokens appeared in the source file.
/// An empty list means the movie's genre is reported as [`UNKNOWN_GENRE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
}

impl Movie {
    /// Pipe-joined genre list, or `"Unknown"` when the movie has none.
    ///
    /// Example: `["Action", "Drama"]` -> `"Action|Drama"`
    pub fn genre_label(&self) -> String {
        if self.genres.is_empty() {
            UNKNOWN_GENRE.to_string()
        } else {
            self.genres.join("|")
        }
    }

    /// Genre tokens as they take part in genre matching.
    ///
    /// A movie without genres contributes the single token `"Unknown"`,
    /// exactly what splitting [`Movie::genre_label`] on `|` would give.
    pub fn genre_tokens(&self) -> Vec<&str> {
        if self.genres.is_empty() {
            vec![UNKNOWN_GENRE]
        } else {
            self.genres.iter().map(String::as_str).collect()
        }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single user's score for one movie.
///
/// No uniqueness is enforced on `(user_id, movie_id)`: duplicates are kept
/// as independent observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

// =============================================================================
// DataIndex - The Core In-Memory Database
// =============================================================================

/// Catalog Store and Ratings Store, built once at startup.
///
/// Movies are kept in source order (the catalog listing order) with a
/// side index for lookups by id. Ratings are kept as a flat table; the
/// per-movie statistics are derived from it on demand by the engine.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) movies: Vec<Movie>,
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    pub(crate) ratings: Vec<Rating>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Returns true if the catalog knows this movie
    pub fn contains_movie(&self, id: MovieId) -> bool {
        self.movie_positions.contains_key(&id)
    }

    /// All movies in catalog (source) order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The full ratings table
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Insert a movie into the catalog.
    ///
    /// The first occurrence of an id wins; later duplicates are dropped.
    /// Returns `false` when the movie was a duplicate.
    pub fn insert_movie(&mut self, movie: Movie) -> bool {
        if self.movie_positions.contains_key(&movie.id) {
            warn!(movie_id = movie.id, "Duplicate movie id in catalog, keeping first");
            return false;
        }
        self.movie_positions.insert(movie.id, self.movies.len());
        self.movies.push(movie);
        true
    }

    /// Append a rating to the ratings table
    pub fn insert_rating(&mut self, rating: Rating) {
        self.ratings.push(rating);
    }

    /// Number of ratings whose movie is not in the catalog.
    ///
    /// Orphans are tolerated; they never surface because output is
    /// always catalog-driven.
    pub fn orphan_rating_count(&self) -> usize {
        self.ratings
            .iter()
            .filter(|r| !self.movie_positions.contains_key(&r.movie_id))
            .count()
    }

    /// Number of distinct movies that received at least one rating
    pub fn rated_movie_count(&self) -> usize {
        self.ratings
            .iter()
            .map(|r| r.movie_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Get counts (movies, ratings) for logging and health reporting
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.ratings.len())
    }
}
