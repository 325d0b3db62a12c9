//! # Recommender
//!
//! Entry point used by the API layer. Coordinates one request:
//! 1. Aggregate rating statistics
//! 2. Pick the policy (popularity when nothing is selected, content otherwise)
//! 3. Rank and truncate
//! 4. Join with the catalog and strip internal scores

use std::sync::Arc;
use std::time::Instant;

use data_loader::{DataIndex, MovieId};
use tracing::{debug, info};

use crate::aggregator::aggregate;
use crate::policies::{ContentPolicy, PopularityPolicy};
use crate::traits::RankingPolicy;
use crate::types::{CatalogEntry, RankedEntry, SearchHit, Selection, round2};

/// Default number of entries in a recommendation
pub const DEFAULT_LIMIT: usize = 5;

/// Read-only recommendation service over one loaded DataIndex.
///
/// Cheap to clone and safe to share across threads: nothing in it is
/// mutated after construction.
#[derive(Clone)]
pub struct Recommender {
    data_index: Arc<DataIndex>,
    popularity: PopularityPolicy,
    content: ContentPolicy,
    limit: usize,
}

impl Recommender {
    /// Create a recommender with the default policies and limit
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            popularity: PopularityPolicy::new(data_index.clone()),
            content: ContentPolicy::new(data_index.clone()),
            data_index,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Replace the popularity policy
    pub fn with_popularity(mut self, policy: PopularityPolicy) -> Self {
        self.popularity = policy;
        self
    }

    /// Replace the content policy
    pub fn with_content(mut self, policy: ContentPolicy) -> Self {
        self.content = policy;
        self
    }

    /// Configure how many entries a recommendation holds (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    /// The whole catalog in source order
    pub fn list_catalog(&self) -> Vec<CatalogEntry> {
        self.data_index.movies().iter().map(CatalogEntry::from).collect()
    }

    /// Case-insensitive title search.
    ///
    /// Exact title matches come first, then higher mean ratings, then
    /// ascending id. Unrated movies sort last within their group.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.to_lowercase();
        let stats = aggregate(self.data_index.ratings());

        let mut hits: Vec<SearchHit> = self
            .data_index
            .movies()
            .iter()
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if !title.contains(&needle) {
                    return None;
                }
                let movie_stats = stats.get(&movie.id);
                Some(SearchHit {
                    entry: CatalogEntry::from(movie),
                    exact: title == needle,
                    avg_rating: movie_stats.map(|s| round2(s.avg_rating)),
                    rating_count: movie_stats.map_or(0, |s| s.rating_count),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.exact
                .cmp(&a.exact)
                .then_with(|| {
                    let a_avg = a.avg_rating.unwrap_or(f64::NEG_INFINITY);
                    let b_avg = b.avg_rating.unwrap_or(f64::NEG_INFINITY);
                    b_avg.total_cmp(&a_avg)
                })
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        debug!("Title search {:?} matched {} movies", query, hits.len());
        hits
    }

    /// Recommend movies for a selection.
    ///
    /// # Arguments
    /// * `selection` - Movie ids the caller picked; may be empty, may
    ///   contain duplicates or ids unknown to the catalog
    ///
    /// # Returns
    /// At most `limit` entries, best first. Never fails; an empty list is
    /// a normal answer.
    pub fn recommend(&self, selection: &[MovieId]) -> Vec<RankedEntry> {
        self.recommend_selection(&Selection::new(selection.iter().copied()))
    }

    /// Recommend movies for an already built [`Selection`].
    ///
    /// Popularity ranking applies only when nothing was requested; a
    /// selection made only of unresolved ids is ranked by content.
    pub fn recommend_selection(&self, selection: &Selection) -> Vec<RankedEntry> {
        let start_time = Instant::now();
        let stats = aggregate(self.data_index.ratings());

        let policy: &dyn RankingPolicy = if !selection.is_requested() {
            &self.popularity
        } else {
            &self.content
        };
        let ranked = policy.rank(&stats, selection, self.limit);

        let entries: Vec<RankedEntry> = ranked
            .into_iter()
            .filter_map(|scored| {
                let movie = self.data_index.get_movie(scored.movie_id)?;
                Some(RankedEntry::new(movie, scored.avg_rating))
            })
            .collect();

        info!(
            "{} policy returned {} entries for {} selected movies in {:.2?}",
            policy.name(),
            entries.len(),
            selection.len(),
            start_time.elapsed()
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, Rating};

    fn build_test_data_index() -> Arc<DataIndex> {
        let mut index = DataIndex::new();
        index.insert_movie(Movie {
            id: 1,
            title: "The Matrix (1999)".to_string(),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
        });
        index.insert_movie(Movie {
            id: 2,
            title: "Toy Story (1995)".to_string(),
            genres: vec!["Animation".to_string(), "Comedy".to_string()],
        });
        index.insert_movie(Movie {
            id: 3,
            title: "Alien (1979)".to_string(),
            genres: vec!["Horror".to_string(), "Sci-Fi".to_string()],
        });
        for user_id in 0..12 {
            index.insert_rating(Rating {
                user_id,
                movie_id: 1,
                rating: 4.0,
            });
            index.insert_rating(Rating {
                user_id,
                movie_id: 2,
                rating: if user_id % 3 == 0 { 5.0 } else { 4.0 },
            });
        }
        Arc::new(index)
    }

    #[test]
    fn test_list_catalog() {
        let recommender = Recommender::new(build_test_data_index());
        let catalog = recommender.list_catalog();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].id, 1);
        assert_eq!(catalog[0].genres, "Action|Sci-Fi");
    }

    #[test]
    fn test_empty_selection_uses_popularity() {
        let recommender = Recommender::new(build_test_data_index());
        let entries = recommender.recommend(&[]);

        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        // (4 * 5.0 + 8 * 4.0) / 12 = 4.333...
        assert_eq!(entries[0].avg_rating, Some(4.33));
    }

    #[test]
    fn test_selection_uses_content() {
        let recommender = Recommender::new(build_test_data_index());
        let entries = recommender.recommend(&[1]);

        // 3: Sci-Fi overlap = 2.0; 2: rating bonus 4.33 * 0.8 = 3.47
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(entries[1].avg_rating, None);
    }

    #[test]
    fn test_search_orders_exact_then_rating() {
        let mut index = DataIndex::new();
        for (id, title) in [(1, "Alien (1979)"), (2, "Aliens (1986)"), (3, "alien"), (4, "Heat")] {
            index.insert_movie(Movie {
                id,
                title: title.to_string(),
                genres: vec![],
            });
        }
        index.insert_rating(Rating {
            user_id: 1,
            movie_id: 2,
            rating: 5.0,
        });
        index.insert_rating(Rating {
            user_id: 1,
            movie_id: 1,
            rating: 3.0,
        });
        let recommender = Recommender::new(Arc::new(index));

        let hits = recommender.search("ALIEN");

        let ids: Vec<_> = hits.iter().map(|h| h.entry.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(hits[0].exact);
        assert_eq!(hits[0].rating_count, 0);
        assert_eq!(hits[1].avg_rating, Some(5.0));
    }

    #[test]
    fn test_unresolved_selection_uses_content() {
        let data_index = build_test_data_index();
        // No movie reaches 100 ratings, so popularity ranking is empty
        let recommender = Recommender::new(data_index.clone())
            .with_popularity(PopularityPolicy::new(data_index).with_min_rating_count(100));

        assert!(recommender.recommend(&[]).is_empty());

        let selection = Selection::default().with_unresolved(2);
        let ids: Vec<_> = recommender
            .recommend_selection(&selection)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_limit_is_configurable() {
        let recommender = Recommender::new(build_test_data_index()).with_limit(1);
        assert_eq!(recommender.recommend(&[]).len(), 1);
    }
}
