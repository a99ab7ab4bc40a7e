/// Integration tests for the aggregation pipeline with a mocked
/// place-search upstream. Covers dedup, both policies, per-category
/// failure isolation and distance enrichment.
use rust_places_api::aggregation::{AggregationPolicy, PlaceSearchService};
use rust_places_api::config::Config;
use rust_places_api::place_types::{RECOMMEND_DEFAULT_TYPES, SEARCH_DEFAULT_TYPES};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test config pointing at a mock server
fn create_test_config(places_base_url: String) -> Config {
    Config {
        port: 8080,
        google_places_api_key: "test_key".to_string(),
        openai_api_key: "test_openai_key".to_string(),
        google_places_base_url: places_base_url,
        openai_api_url: "https://api.openai.com/v1/chat/completions".to_string(),
    }
}

/// One raw provider result. `rating`/`ratings_total`/`status` map to the
/// optional wire fields; `None` leaves them out entirely.
fn place_json(
    id: &str,
    name: &str,
    rating: Option<f64>,
    ratings_total: Option<u32>,
    status: Option<&str>,
    lat: f64,
    lng: f64,
) -> serde_json::Value {
    let mut place = json!({
        "place_id": id,
        "name": name,
        "vicinity": format!("{} street", name),
        "geometry": { "location": { "lat": lat, "lng": lng } },
        "types": ["point_of_interest"],
    });
    if let Some(r) = rating {
        place["rating"] = json!(r);
    }
    if let Some(total) = ratings_total {
        place["user_ratings_total"] = json!(total);
    }
    if let Some(s) = status {
        place["business_status"] = json!(s);
    }
    place
}

fn ok_body(results: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "status": "OK", "results": results })
}

async fn mock_category(server: &MockServer, place_type: &str, results: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("type", place_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(results)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_dedup_keeps_first_occurrence_across_categories() {
    let mock_server = MockServer::start().await;

    // The same place_id shows up under restaurant and cafe with
    // different attributes; the restaurant version is seen first.
    mock_category(
        &mock_server,
        "restaurant",
        vec![place_json(
            "shared",
            "As Restaurant",
            Some(4.0),
            Some(100),
            Some("OPERATIONAL"),
            37.50,
            127.00,
        )],
    )
    .await;
    mock_category(
        &mock_server,
        "cafe",
        vec![
            place_json(
                "shared",
                "As Cafe",
                Some(2.0),
                Some(10),
                Some("OPERATIONAL"),
                37.50,
                127.00,
            ),
            place_json(
                "other",
                "Another Cafe",
                Some(3.0),
                Some(20),
                Some("OPERATIONAL"),
                37.51,
                127.01,
            ),
        ],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string(), "카페".to_string()];
    let places = service
        .aggregate(
            37.50,
            127.00,
            1000,
            &labels,
            RECOMMEND_DEFAULT_TYPES,
            &AggregationPolicy::CANDIDATES,
        )
        .await;

    assert_eq!(places.len(), 2);
    let shared = places.iter().find(|p| p.place_id == "shared").unwrap();
    // First-seen attributes survive the merge
    assert_eq!(shared.name, "As Restaurant");
    assert_eq!(shared.rating, Some(4.0));
}

#[tokio::test]
async fn test_curated_policy_filters_unestablished_places() {
    let mock_server = MockServer::start().await;

    mock_category(
        &mock_server,
        "restaurant",
        vec![
            place_json("a", "A", Some(4.5), Some(200), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("b", "B", Some(4.8), Some(300), Some("CLOSED_TEMPORARILY"), 37.5, 127.0),
            place_json("c", "C", Some(4.9), Some(10), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("d", "D", Some(4.0), Some(51), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("e", "E", Some(3.9), Some(500), None, 37.5, 127.0),
        ],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &labels,
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    // b is not operational, c has too few ratings, e has no status
    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);
}

#[tokio::test]
async fn test_curated_policy_keeps_top_three_by_rating() {
    let mock_server = MockServer::start().await;

    mock_category(
        &mock_server,
        "restaurant",
        vec![
            place_json("a", "A", Some(4.0), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("b", "B", Some(4.9), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("c", "C", Some(3.5), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("d", "D", Some(4.7), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("e", "E", Some(4.2), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
        ],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &labels,
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "e"]);
}

#[tokio::test]
async fn test_curated_policy_preserves_merge_order_across_categories() {
    let mock_server = MockServer::start().await;

    // The cafe category carries a higher-rated place than any
    // restaurant; curated output must still list restaurants first.
    mock_category(
        &mock_server,
        "restaurant",
        vec![
            place_json("r1", "R1", Some(4.0), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
            place_json("r2", "R2", Some(3.5), Some(100), Some("OPERATIONAL"), 37.5, 127.0),
        ],
    )
    .await;
    mock_category(
        &mock_server,
        "cafe",
        vec![place_json(
            "c1",
            "C1",
            Some(5.0),
            Some(100),
            Some("OPERATIONAL"),
            37.5,
            127.0,
        )],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string(), "카페".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &labels,
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "c1"]);
}

#[tokio::test]
async fn test_candidates_policy_sorts_globally_with_missing_ratings_last() {
    let mock_server = MockServer::start().await;

    mock_category(
        &mock_server,
        "restaurant",
        vec![
            place_json("mid", "Mid", Some(3.1), Some(10), None, 37.5, 127.0),
            place_json("unrated", "Unrated", None, None, None, 37.5, 127.0),
        ],
    )
    .await;
    mock_category(
        &mock_server,
        "cafe",
        vec![place_json("top", "Top", Some(4.9), Some(10), None, 37.5, 127.0)],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string(), "카페".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &labels,
            RECOMMEND_DEFAULT_TYPES,
            &AggregationPolicy::CANDIDATES,
        )
        .await;

    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["top", "mid", "unrated"]);
}

#[tokio::test]
async fn test_one_failing_category_does_not_abort_aggregation() {
    let mock_server = MockServer::start().await;

    mock_category(
        &mock_server,
        "restaurant",
        vec![place_json("r1", "R1", Some(4.0), Some(60), Some("OPERATIONAL"), 37.5, 127.0)],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("type", "book_store"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;
    mock_category(
        &mock_server,
        "cafe",
        vec![place_json("c1", "C1", Some(4.5), Some(80), Some("OPERATIONAL"), 37.5, 127.0)],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string(), "서점".to_string(), "카페".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &labels,
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "c1"]);
}

#[tokio::test]
async fn test_empty_labels_fan_out_to_default_categories() {
    let mock_server = MockServer::start().await;

    // Each default category must be queried exactly once
    for place_type in ["restaurant", "cafe", "department_store"] {
        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .and(query_param("type", place_type))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(vec![])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let places = service
        .aggregate(
            37.5,
            127.0,
            500,
            &[],
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    assert!(places.is_empty());
}

#[tokio::test]
async fn test_every_aggregated_place_is_distance_enriched() {
    let mock_server = MockServer::start().await;

    mock_category(
        &mock_server,
        "restaurant",
        vec![
            // Exactly at the user's location
            place_json("here", "Here", Some(4.0), Some(60), Some("OPERATIONAL"), 37.5, 127.0),
            // Roughly a kilometer north
            place_json("near", "Near", Some(4.1), Some(70), Some("OPERATIONAL"), 37.509, 127.0),
        ],
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let service = PlaceSearchService::new(&config);

    let labels = vec!["식당".to_string()];
    let places = service
        .aggregate(
            37.5,
            127.0,
            2000,
            &labels,
            SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    assert_eq!(places.len(), 2);
    for place in &places {
        assert!(place.distance_from_user.is_some());
        assert!(place.estimated_time.is_some());
    }

    let here = places.iter().find(|p| p.place_id == "here").unwrap();
    assert_eq!(here.distance_from_user, Some(0.0));
    assert_eq!(here.estimated_time, Some(0));

    let near = places.iter().find(|p| p.place_id == "near").unwrap();
    let distance = near.distance_from_user.unwrap();
    assert!(distance > 900.0 && distance < 1100.0, "distance: {}", distance);
    assert!(near.estimated_time.unwrap() > 0);
}
