//! Ranking policy implementations.
//!
//! The recommender picks exactly one of these per request depending on
//! whether the selection is empty.

pub mod content;
pub mod popularity;

// Re-export for convenience
pub use content::ContentPolicy;
pub use popularity::PopularityPolicy;
