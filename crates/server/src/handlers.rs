use axum::{Json, body::Bytes, extract::State};
use data_loader::MovieId;
use engine::{CatalogEntry, RankedEntry, Selection};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{debug, error};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Absent and `null` both mean "nothing selected"
    #[serde(default)]
    pub selected_movies: Option<Vec<Number>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub movies_loaded: bool,
    pub ratings_loaded: bool,
    pub movies_count: usize,
    pub ratings_count: usize,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (movies_count, ratings_count) = state.counts();
    Json(HealthResponse {
        status: "ok".to_string(),
        movies_loaded: state.is_ready(),
        ratings_loaded: state.is_ready(),
        movies_count,
        ratings_count,
    })
}

/// List the whole catalog in source order
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<CatalogEntry>>> {
    let recommender = state.recommender()?;
    Ok(Json(recommender.list_catalog()))
}

/// Recommend movies for `{"selected_movies": [...]}`.
///
/// The body is parsed by hand so that an empty body, JSON `null` and
/// malformed JSON all map to the same 400 response.
pub async fn recommend(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Vec<RankedEntry>>> {
    let recommender = state.recommender()?;

    let selection = parse_selection(&body)?;
    debug!("Recommendation requested for {:?}", selection);

    let entries = tokio::task::spawn_blocking(move || recommender.recommend_selection(&selection))
        .await
        .map_err(|e| {
            error!("Recommendation task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(entries))
}

fn parse_selection(body: &[u8]) -> ApiResult<Selection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::InvalidPayload("request body is empty".to_string()));
    }

    let request: Option<RecommendRequest> = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    let request = request
        .ok_or_else(|| ApiError::InvalidPayload("expected a JSON object".to_string()))?;

    let mut ids = Vec::new();
    let mut unresolved = 0usize;
    for number in request.selected_movies.unwrap_or_default() {
        match to_movie_id(&number)? {
            Some(id) => ids.push(id),
            None => unresolved += 1,
        }
    }
    Ok(Selection::new(ids).with_unresolved(unresolved))
}

/// Any JSON integer is accepted; those outside `1..=u32::MAX` can never
/// name a catalog movie and resolve to `None`.
fn to_movie_id(number: &Number) -> ApiResult<Option<MovieId>> {
    if let Some(value) = number.as_i64() {
        return Ok(MovieId::try_from(value).ok().filter(|&id| id > 0));
    }
    if number.is_u64() {
        return Ok(None);
    }
    // Integer literals beyond 64 bits arrive as floats
    if let Some(value) = number.as_f64() {
        if value.fract() == 0.0 && value.abs() >= i64::MAX as f64 {
            return Ok(None);
        }
    }
    Err(ApiError::InvalidPayload(format!(
        "movie ids must be integers, got {}",
        number
    )))
}
