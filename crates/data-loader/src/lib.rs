//! # Data Loader Crate
//!
//! This crate loads the movie catalog and the ratings table from delimited
//! text files into an in-memory [`DataIndex`].
//!
//! ## Main Components
//!
//! - **types**: Typed records (Movie, Rating) and the DataIndex store
//! - **strategy**: Ordered parsing strategies with first-success semantics
//! - **catalog** / **ratings**: The concrete strategies for each file
//! - **parser**: Entry points and shared text helpers
//! - **index**: Builds the DataIndex from both files
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(
//!     Path::new("data/movies_100k.csv"),
//!     Path::new("data/ratings_100k.csv"),
//! )?;
//!
//! let movie = index.get_movie(1).unwrap();
//! println!("{} [{}]", movie.title, movie.genre_label());
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod index;
pub mod parser;
pub mod ratings;
pub mod strategy;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use strategy::{ParseStrategy, StrategyChain};
pub use types::{DataIndex, Movie, MovieId, Rating, UNKNOWN_GENRE, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        assert_eq!(index.counts(), (0, 0));
        assert_eq!(index.rated_movie_count(), 0);
    }

    #[test]
    fn test_insert_movie_keeps_source_order() {
        let mut index = DataIndex::new();
        index.insert_movie(movie(30, "C", &["Drama"]));
        index.insert_movie(movie(10, "A", &[]));
        index.insert_movie(movie(20, "B", &["Action", "War"]));

        let ids: Vec<_> = index.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(index.get_movie(20).unwrap().genre_label(), "Action|War");
    }

    #[test]
    fn test_duplicate_movie_first_wins() {
        let mut index = DataIndex::new();
        assert!(index.insert_movie(movie(1, "Original", &[])));
        assert!(!index.insert_movie(movie(1, "Impostor", &[])));

        assert_eq!(index.counts(), (1, 0));
        assert_eq!(index.get_movie(1).unwrap().title, "Original");
    }

    #[test]
    fn test_insert_rating_allows_duplicates() {
        let mut index = DataIndex::new();
        let rating = Rating {
            user_id: 1,
            movie_id: 1193,
            rating: 5.0,
        };
        index.insert_rating(rating);
        index.insert_rating(rating);

        assert_eq!(index.ratings().len(), 2);
        assert_eq!(index.rated_movie_count(), 1);
        assert_eq!(index.orphan_rating_count(), 2);
    }

    #[test]
    fn test_genre_tokens_for_unknown() {
        let m = movie(1, "Nothing", &[]);
        assert_eq!(m.genre_tokens(), vec![UNKNOWN_GENRE]);

        let m = movie(2, "Something", &["Comedy", "Drama"]);
        assert_eq!(m.genre_tokens(), vec!["Comedy", "Drama"]);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();
        assert!(index.get_movie(999).is_none());
        assert!(!index.contains_movie(999));
        assert!(index.movies().is_empty());
    }
}
