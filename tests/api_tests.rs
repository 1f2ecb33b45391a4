use std::collections::HashMap;
use std::io::Write;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use movie_recommender::{
    config::Config,
    models::{Movie, MovieId, Rating, RecommendationResponse, StoreSummary, TitleSummary},
    routes::{create_router, AppState},
    store::{CatalogStore, LatentFactors, RatingStore, StoreSnapshot},
};

const SEEDS: [&str; 3] = ["Alien (1979)", "Aliens (1986)", "Predator (1987)"];

fn create_test_snapshot() -> StoreSnapshot {
    let movies = vec![
        Movie::new(1, "Alien (1979)", &["Horror", "Sci-Fi"]),
        Movie::new(2, "Aliens (1986)", &["Action", "Horror", "Sci-Fi"]),
        Movie::new(3, "Predator (1987)", &["Action", "Sci-Fi"]),
        Movie::new(4, "Thing, The (1982)", &["Horror", "Sci-Fi"]),
        Movie::new(5, "Grease (1978)", &["Musical", "Romance"]),
        Movie::new(6, "Terminator, The (1984)", &["Action", "Sci-Fi", "Thriller"]),
        Movie::new(7, "Heat (1995)", &["Crime", "Thriller"]),
        Movie::new(8, "Toy Story (1995)", &["Animation", "Children"]),
        Movie::new(9, "Event Horizon (1997)", &["Horror", "Sci-Fi"]),
        Movie::new(10, "RoboCop (1987)", &["Action", "Crime", "Sci-Fi", "Thriller"]),
        Movie::new(11, "Casablanca (1942)", &["Drama", "Romance"]),
        Movie::new(12, "Cosmos", &[]),
        Movie::new(13, "Obscure Short (2011)", &["Documentary"]),
    ];
    let catalog = CatalogStore::new(movies).unwrap();

    let mut embeddings: HashMap<MovieId, Vec<f32>> = HashMap::new();
    for (id, v) in [
        (1, [1.0, 0.0]),
        (2, [0.9, 0.1]),
        (3, [0.8, 0.2]),
        (4, [0.7, 0.3]),
        (5, [-0.5, 0.5]),
        (6, [0.95, 0.1]),
        (7, [0.2, 0.8]),
        (8, [0.0, 1.0]),
        (9, [0.6, 0.2]),
        (10, [0.85, 0.3]),
        (11, [-0.2, 0.9]),
    ] {
        embeddings.insert(MovieId(id), v.to_vec());
    }
    let factors = LatentFactors::from_embeddings(embeddings).unwrap();
    let ratings = RatingStore::new(vec![Rating::new(1, 12, 4.0)]);

    StoreSnapshot::from_parts(catalog, ratings, factors)
}

fn create_test_server() -> TestServer {
    let state = AppState::new(Config::default(), create_test_snapshot());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c3c1e-6a4b-4d49-9a53-2f6f0bde3a11";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_list_titles_window() {
    let server = create_test_server();
    let response = server.get("/api/v1/titles?offset=3&limit=2").await;
    response.assert_status_ok();

    let titles: Vec<String> = response.json();
    assert_eq!(titles, vec!["Thing, The (1982)", "Grease (1978)"]);
}

#[tokio::test]
async fn test_search_titles() {
    let server = create_test_server();
    let response = server.get("/api/v1/titles/search?q=alien").await;
    response.assert_status_ok();

    let results: Vec<TitleSummary> = response.json();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, MovieId(1));
    assert_eq!(results[1].release_year, Some(1986));
}

#[tokio::test]
async fn test_content_based_recommendations() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "content_based",
            "movies": SEEDS,
            "top_n": 3
        }))
        .await;
    response.assert_status_ok();

    let body: RecommendationResponse = response.json();
    assert_eq!(
        body.recommendations,
        vec!["Thing, The (1982)", "Event Horizon (1997)", "Terminator, The (1984)"]
    );
}

#[tokio::test]
async fn test_collaborative_based_recommendations() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "Collaborative Based Filtering",
            "movies": SEEDS,
            "top_n": 2
        }))
        .await;
    response.assert_status_ok();

    let body: RecommendationResponse = response.json();
    assert_eq!(
        body.recommendations,
        vec!["Terminator, The (1984)", "Event Horizon (1997)"]
    );
}

#[tokio::test]
async fn test_default_top_n_is_ten() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "collaborative_based",
            "movies": SEEDS
        }))
        .await;
    response.assert_status_ok();

    let body: RecommendationResponse = response.json();
    assert_eq!(body.recommendations.len(), 10);
    // Movies without embeddings come last, by id
    assert_eq!(
        &body.recommendations[8..],
        &["Cosmos".to_string(), "Obscure Short (2011)".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "content_based",
            "movies": ["Alien (1979)", "Alien: Resurrection", "Predator (1987)"]
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Alien: Resurrection"));
}

#[tokio::test]
async fn test_all_cold_seeds_is_unprocessable() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "collaborative_based",
            "movies": ["Cosmos", "Obscure Short (2011)", "Cosmos"]
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cold_seeds_still_work_for_content_based() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "content_based",
            "movies": ["Cosmos", "Obscure Short (2011)", "Heat (1995)"],
            "top_n": 1
        }))
        .await;

    response.assert_status_ok();
    let body: RecommendationResponse = response.json();
    assert_eq!(body.recommendations, vec!["RoboCop (1987)"]);
}

#[tokio::test]
async fn test_wrong_seed_count_is_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "content_based",
            "movies": ["Alien (1979)", "Aliens (1986)"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_algorithm_is_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "popularity",
            "movies": SEEDS
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_movies_field_is_json_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "algorithm": "content_based" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_malformed_body_is_json_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .text("{\"algorithm\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_zero_top_n_is_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "algorithm": "content_based",
            "movies": SEEDS,
            "top_n": 0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Writes a 4-movie catalog and 4 ratings, returning their paths
fn write_reload_fixtures(dir: &tempfile::TempDir) -> (String, String) {
    let movies_path = write_fixture(
        dir,
        "movies.csv",
        "movieId,title,genres\n\
         1,Toy Story (1995),Adventure|Animation|Children\n\
         2,Jumanji (1995),Adventure|Children|Fantasy\n\
         3,Heat (1995),Action|Crime|Thriller\n\
         4,GoldenEye (1995),Action|Adventure|Thriller\n",
    );
    let ratings_path = write_fixture(
        dir,
        "ratings.csv",
        "userId,movieId,rating,timestamp\n\
         1,1,4.0,964982703\n\
         1,2,4.0,964981247\n\
         2,1,5.0,964982224\n\
         2,3,3.0,964983815\n",
    );
    (movies_path, ratings_path)
}

#[tokio::test]
async fn test_reload_swaps_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (movies_path, ratings_path) = write_reload_fixtures(&dir);
    let factors_path = write_fixture(&dir, "factors.csv", "1,0.1,0.2\n2,0.3,0.4\n9,0.5,0.6\n");

    let config = Config {
        movies_path,
        ratings_path,
        factors_path: Some(factors_path),
        ..Config::default()
    };
    let state = AppState::new(config, create_test_snapshot());
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/api/v1/admin/reload").await;
    response.assert_status_ok();
    let summary: StoreSummary = response.json();
    assert_eq!(summary.movies, 4);
    assert_eq!(summary.ratings, 4);
    assert_eq!(summary.embeddings, 2);
    assert_eq!(summary.factor_dimensions, 2);

    let titles: Vec<String> = server.get("/api/v1/titles").await.json();
    assert_eq!(titles.len(), 4);
    assert_eq!(titles[0], "Toy Story (1995)");
}

#[tokio::test]
async fn test_reload_without_factors_keeps_current_embeddings() {
    let dir = tempfile::tempdir().unwrap();
    let (movies_path, ratings_path) = write_reload_fixtures(&dir);

    // Loose thresholds so that training, if it ran, would produce 32-d embeddings
    let config = Config {
        movies_path,
        ratings_path,
        factors_path: None,
        min_support: 1,
        ..Config::default()
    };
    let state = AppState::new(config, create_test_snapshot());
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/api/v1/admin/reload").await;
    response.assert_status_ok();
    let summary: StoreSummary = response.json();
    assert_eq!(summary.movies, 4);
    // Movies 1-4 keep their 2-d embeddings from the previous snapshot
    assert_eq!(summary.embeddings, 4);
    assert_eq!(summary.factor_dimensions, 2);
}

#[tokio::test]
async fn test_failed_reload_keeps_current_snapshot() {
    let config = Config {
        movies_path: "/nonexistent/movies.csv".to_string(),
        ..Config::default()
    };
    let state = AppState::new(config, create_test_snapshot());
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/api/v1/admin/reload").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let titles: Vec<String> = server.get("/api/v1/titles").await.json();
    assert_eq!(titles.len(), 13);
}
