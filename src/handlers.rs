use crate::aggregation::{AggregationPolicy, PlaceSearchService};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CourseRequest, LocationRequest};
use crate::place_types;
use crate::recommendation::RecommendationService;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Services are constructed per request from the config; no state
/// outlives a single request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-places-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /places/search
///
/// Runs the curated aggregation (established places only, top 3 per
/// category) and returns the enriched list.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - User location, radius, party descriptor and category labels.
///
/// # Returns
///
/// * `Result<Json<Value>, AppError>` - The response envelope with the place list.
pub async fn search_places(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<Value>, AppError> {
    tracing::info!(
        "POST /places/search - radius {}m, labels: {:?}",
        request.radius,
        request.place
    );

    let search = PlaceSearchService::new(&state.config);
    let places = search
        .aggregate(
            request.latitude,
            request.longitude,
            request.radius,
            &request.place,
            place_types::SEARCH_DEFAULT_TYPES,
            &AggregationPolicy::CURATED,
        )
        .await;

    let total_places = places.len();
    Ok(Json(json!({
        "success": true,
        "data": {
            "places": places,
            "totalPlaces": total_places,
            "searchRadius": request.radius,
            "userLocation": {
                "latitude": request.latitude,
                "longitude": request.longitude,
            },
            "userPreferences": {
                "members": request.members,
                "placeTypes": request.place,
            },
        }
    })))
}

/// POST /ai/recommend-places
///
/// Aggregates the full candidate pool around the user, forwards it to
/// the reasoning service and returns the annotated recommendations.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - User location, radius, party descriptor and category labels.
///
/// # Returns
///
/// * `Result<Json<Value>, AppError>` - The response envelope with the recommendations.
pub async fn recommend_places(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<Value>, AppError> {
    tracing::info!(
        "POST /ai/recommend-places - radius {}m, members: '{}', labels: {:?}",
        request.radius,
        request.members,
        request.place
    );

    let search = PlaceSearchService::new(&state.config);
    let places = search
        .aggregate(
            request.latitude,
            request.longitude,
            request.radius,
            &request.place,
            place_types::RECOMMEND_DEFAULT_TYPES,
            &AggregationPolicy::CANDIDATES,
        )
        .await;

    let recommender = RecommendationService::new(&state.config);
    let recommendations = recommender
        .recommend_from_places(
            &places,
            &request.members,
            &request.place,
            request.latitude,
            request.longitude,
            request.radius,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "recommendations": recommendations,
            "userLocation": {
                "latitude": request.latitude,
                "longitude": request.longitude,
            },
            "userPreferences": {
                "members": request.members,
                "placeTypes": request.place,
            },
            "searchRadius": request.radius,
        }
    })))
}

/// POST /ai/recommend-course
///
/// Names and summarizes a course built from the given place names. The
/// forwarder hands back raw JSON text; parsing it is this handler's job.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The ordered place names making up the course.
///
/// # Returns
///
/// * `Result<Json<Value>, AppError>` - The response envelope with course name and summary.
pub async fn recommend_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CourseRequest>,
) -> Result<Json<Value>, AppError> {
    tracing::info!(
        "POST /ai/recommend-course - {} places",
        request.places_name.len()
    );

    let recommender = RecommendationService::new(&state.config);
    let raw = recommender.recommend_course(&request.places_name).await?;

    let course: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::Model(format!("Course reply was not valid JSON: {}", e)))?;

    Ok(Json(json!({
        "success": true,
        "data": course,
    })))
}
