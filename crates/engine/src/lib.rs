//! # Engine Crate
//!
//! Recommendation scoring over an immutable [`DataIndex`](data_loader::DataIndex).
//!
//! ## Components
//!
//! ### Aggregator
//! Derives per-movie `(mean rating, rating count)` from the ratings table.
//! Recomputed per request; the table never changes after load.
//!
//! ### Popularity policy
//! Used when no movie is selected: the best mean ratings among movies
//! with at least 10 ratings.
//!
//! ### Content policy
//! Used when movies are selected: genre overlap with the selection
//! (weight 2.0) plus the mean rating (weight 0.8) for movies with at
//! least 5 ratings.
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::Recommender;
//! use std::sync::Arc;
//!
//! let recommender = Recommender::new(Arc::new(data_index));
//!
//! let top = recommender.recommend(&[]);        // popularity
//! let similar = recommender.recommend(&[1, 50]); // content-based
//! ```

pub mod aggregator;
pub mod policies;
pub mod recommender;
pub mod traits;
pub mod types;

// Re-export main types
pub use aggregator::aggregate;
pub use policies::{ContentPolicy, PopularityPolicy};
pub use recommender::{DEFAULT_LIMIT, Recommender};
pub use traits::RankingPolicy;
pub use types::{CatalogEntry, MovieStats, RankedEntry, ScoredMovie, SearchHit, Selection};
