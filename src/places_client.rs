use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Coordinate, Geometry, OpeningHours, Photo, PlaceRecord};
use reqwest::Client;
use serde::Deserialize;

/// Result-language preference sent with every provider request.
const RESULT_LANGUAGE: &str = "ko";

/// Field selection for detail lookups.
const DETAILS_FIELDS: &str = "reviews,formatted_phone_number,website,opening_hours";

/// How many review texts a review lookup returns at most.
const MAX_REVIEWS: usize = 5;

// ============ Provider wire types ============

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: RawGeometry,
    #[serde(default)]
    types: Vec<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    price_level: Option<u8>,
    opening_hours: Option<RawOpeningHours>,
    business_status: Option<String>,
    photos: Option<Vec<RawPhoto>>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: Coordinate,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

/// Extended place fields from a detail lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceReview {
    #[serde(default)]
    pub text: String,
    pub rating: Option<f64>,
    pub author_name: Option<String>,
}

// ============ Client ============

/// Client for the external place-search provider.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.google_places_base_url.clone(),
            api_key: config.google_places_api_key.clone(),
        }
    }

    /// Searches for places of one category around a location.
    ///
    /// One outbound request per invocation, no retry. A non-OK provider
    /// status is an error carrying the provider's status string.
    pub async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceRecord>, AppError> {
        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(
            &format!("{}/nearbysearch/json", self.base_url),
            &[
                ("location", format!("{},{}", latitude, longitude).as_str()),
                ("radius", radius.to_string().as_str()),
                ("type", place_type),
                ("key", self.api_key.as_str()),
                ("language", RESULT_LANGUAGE),
            ],
        )
        .map_err(|e| AppError::Provider(format!("Failed to build URL: {}", e)))?;

        tracing::info!(
            "Searching nearby '{}' places within {}m of {},{}",
            place_type,
            radius,
            latitude,
            longitude
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Place search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "Place search returned status {}: {}",
                status, error_text
            )));
        }

        let body: NearbySearchResponse = response.json().await.map_err(|e| {
            AppError::Provider(format!("Failed to parse place search response: {}", e))
        })?;

        if body.status != "OK" {
            let detail = body.error_message.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Place search API error: {} {}",
                body.status, detail
            )));
        }

        let places: Vec<PlaceRecord> = body.results.into_iter().map(normalize_place).collect();
        tracing::info!("Found {} '{}' places", places.len(), place_type);
        Ok(places)
    }

    /// Fetches extended fields (reviews, phone, website, hours) for one place.
    ///
    /// Any failure returns `None` so a single place's detail lookup can
    /// never abort a batch.
    pub async fn place_details(&self, place_id: &str) -> Option<PlaceDetails> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/details/json", self.base_url),
            &[
                ("place_id", place_id),
                ("key", self.api_key.as_str()),
                ("language", RESULT_LANGUAGE),
                ("fields", DETAILS_FIELDS),
            ],
        )
        .ok()?;

        tracing::debug!("Fetching place details for {}", place_id);

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Place details request failed for {}: {}", place_id, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Place details returned status {} for {}",
                response.status(),
                place_id
            );
            return None;
        }

        let body: DetailsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to parse place details for {}: {}", place_id, e);
                return None;
            }
        };

        if body.status != "OK" {
            tracing::warn!(
                "Place details API error for {}: {}",
                place_id,
                body.status
            );
            return None;
        }

        body.result
    }

    /// Returns up to [`MAX_REVIEWS`] review texts for a place; empty on
    /// any lookup failure.
    pub async fn place_reviews(&self, place_id: &str) -> Vec<String> {
        match self.place_details(place_id).await {
            Some(details) => details
                .reviews
                .into_iter()
                .map(|review| review.text)
                .take(MAX_REVIEWS)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Normalizes one raw provider result into the internal place shape.
/// Absent optional fields stay absent; they are never defaulted to
/// zero or false.
fn normalize_place(raw: RawPlace) -> PlaceRecord {
    PlaceRecord {
        place_id: raw.place_id,
        name: raw.name,
        formatted_address: raw
            .vicinity
            .or(raw.formatted_address)
            .unwrap_or_default(),
        geometry: Geometry {
            location: raw.geometry.location,
        },
        types: raw.types,
        rating: raw.rating,
        user_ratings_total: raw.user_ratings_total,
        price_level: raw.price_level,
        opening_hours: raw.opening_hours.map(|hours| OpeningHours {
            open_now: hours.open_now,
        }),
        business_status: raw.business_status,
        photos: raw
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(|photo| Photo {
                photo_reference: photo.photo_reference,
                width: photo.width,
                height: photo.height,
            })
            .collect(),
        distance_from_user: None,
        estimated_time: None,
    }
}
