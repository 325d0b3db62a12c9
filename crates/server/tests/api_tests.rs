use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use data_loader::{DataIndex, Movie, Rating};
use engine::Recommender;
use server::{AppState, create_router};

fn create_test_index() -> DataIndex {
    let mut index = DataIndex::new();
    let movies = [
        (1, "Toy Story (1995)", vec!["Animation", "Children's", "Comedy"]),
        (2, "GoldenEye (1995)", vec!["Action", "Adventure", "Thriller"]),
        (3, "Four Rooms (1995)", vec!["Thriller"]),
        (4, "Mystery Film (1996)", vec![]),
        (5, "Heat (1995)", vec!["Crime"]),
    ];
    for (id, title, genres) in movies {
        index.insert_movie(Movie {
            id,
            title: title.to_string(),
            genres: genres.into_iter().map(String::from).collect(),
        });
    }
    for user_id in 1..=12 {
        index.insert_rating(Rating {
            user_id,
            movie_id: 1,
            rating: 4.0,
        });
        index.insert_rating(Rating {
            user_id,
            movie_id: 2,
            rating: if user_id <= 6 { 3.0 } else { 4.0 },
        });
    }
    // Enough ratings for the content bonus, too few for popularity
    for user_id in 1..=6 {
        index.insert_rating(Rating {
            user_id,
            movie_id: 5,
            rating: 5.0,
        });
    }
    index
}

fn create_test_app() -> Router {
    let recommender = Recommender::new(Arc::new(create_test_index()));
    create_router(AppState::ready(recommender))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_recommend(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(create_test_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["movies_loaded"], true);
    assert_eq!(body["ratings_loaded"], true);
    assert_eq!(body["movies_count"], 5);
    assert_eq!(body["ratings_count"], 30);
}

#[tokio::test]
async fn test_list_movies() {
    let (status, body) = send(create_test_app(), get("/api/movies")).await;

    assert_eq!(status, StatusCode::OK);
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 5);
    assert_eq!(
        movies[0],
        json!({"id": 1, "title": "Toy Story (1995)", "genres": "Animation|Children's|Comedy"})
    );
    assert_eq!(movies[3]["genres"], "Unknown");
}

#[tokio::test]
async fn test_recommend_popularity() {
    let (status, body) = send(
        create_test_app(),
        post_recommend(json!({"selected_movies": []}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "title": "Toy Story (1995)", "genres": "Animation|Children's|Comedy", "avgRating": 4.0},
            {"id": 2, "title": "GoldenEye (1995)", "genres": "Action|Adventure|Thriller", "avgRating": 3.5},
        ])
    );
}

#[tokio::test]
async fn test_recommend_absent_or_null_selection_is_popularity() {
    for payload in ["{}", r#"{"selected_movies": null}"#] {
        let (status, body) = send(create_test_app(), post_recommend(payload)).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2)]);
    }
}

#[tokio::test]
async fn test_recommend_content() {
    let (status, body) = send(
        create_test_app(),
        post_recommend(json!({"selected_movies": [3, 3, 999]}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    // 2: Thriller overlap 2.0 + 3.5 * 0.8; 5: 5.0 * 0.8; 1: 4.0 * 0.8; 4 scores nothing
    let ids: Vec<_> = entries.iter().map(|e| e["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2), json!(5), json!(1)]);
    assert_eq!(entries[0]["avgRating"], 3.5);
    assert!(entries.iter().all(|e| e["id"] != 3));
}

#[tokio::test]
async fn test_recommend_out_of_range_ids_use_content_mode() {
    let (_, popularity) = send(
        create_test_app(),
        post_recommend(r#"{"selected_movies": []}"#),
    )
    .await;

    for payload in [
        r#"{"selected_movies": [-1]}"#,
        r#"{"selected_movies": [5000000000]}"#,
        r#"{"selected_movies": [0, -7]}"#,
    ] {
        let (status, body) = send(create_test_app(), post_recommend(payload)).await;

        assert_eq!(status, StatusCode::OK, "payload {:?}", payload);
        // Rating bonus only: 5 qualifies with 6 ratings, unlike popularity
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
        assert_eq!(ids, vec![json!(5), json!(1), json!(2)]);
        assert_eq!(body[0]["avgRating"], 5.0);
        assert_ne!(body, popularity);
    }
}

#[tokio::test]
async fn test_recommend_rejects_bad_payloads() {
    for payload in [
        "",
        "null",
        "{not json",
        r#"{"selected_movies": "1"}"#,
        r#"{"selected_movies": [2.5]}"#,
    ] {
        let (status, body) = send(create_test_app(), post_recommend(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_not_ready_returns_service_unavailable() {
    let app = create_router(AppState::pending());

    let (status, body) = send(app.clone(), get("/api/movies")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, _) = send(app.clone(), post_recommend(r#"{"selected_movies": []}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies_loaded"], false);
    assert_eq!(body["movies_count"], 0);
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/recommend")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = send(create_test_app(), get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
