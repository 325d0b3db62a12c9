use std::sync::Arc;

use engine::Recommender;

use crate::error::{ApiError, ApiResult};

/// Shared application state.
///
/// Holds the recommender once the catalog and ratings are loaded. The
/// data is immutable from then on, so handlers share it without locking.
#[derive(Clone, Default)]
pub struct AppState {
    recommender: Option<Arc<Recommender>>,
}

impl AppState {
    /// State backed by loaded data
    pub fn ready(recommender: Recommender) -> Self {
        Self {
            recommender: Some(Arc::new(recommender)),
        }
    }

    /// State for a process whose data is not loaded (yet)
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.recommender.is_some()
    }

    pub fn recommender(&self) -> ApiResult<Arc<Recommender>> {
        self.recommender.clone().ok_or(ApiError::NotReady)
    }

    /// `(movies, ratings)` currently held, zeros when not loaded
    pub fn counts(&self) -> (usize, usize) {
        self.recommender
            .as_ref()
            .map_or((0, 0), |r| r.data_index().counts())
    }
}
