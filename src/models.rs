use serde::{Deserialize, Serialize};

// ============ Domain Models ============

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Wrapper matching the place provider's `geometry` object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinate,
}

/// Opening-hours snapshot as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
}

/// Photo reference attached to a place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
    pub width: u32,
    pub height: u32,
}

/// A normalized place from the search provider.
///
/// `place_id` is the identity: two records with the same id are the same
/// real-world place regardless of which category query produced them.
/// `distance_from_user` and `estimated_time` are absent until the record
/// has gone through distance enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place_id: String,
    pub name: String,
    /// Human-readable address; the provider's `vicinity` when present,
    /// otherwise `formatted_address`. May be empty.
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Meters from the requesting user, rounded. Set by enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_user: Option<f64>,
    /// Estimated walking time in minutes. Set by enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

// ============ Request DTOs ============

/// Body of the location-driven endpoints (`/places/search`,
/// `/ai/recommend-places`).
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRequest {
    pub longitude: f64,
    pub latitude: f64,
    /// Search radius in meters.
    pub radius: u32,
    /// Free-form party descriptor, forwarded to the model as context only.
    #[serde(default)]
    pub members: String,
    /// Requested category labels; empty means the endpoint's default set.
    #[serde(default)]
    pub place: Vec<String>,
}

/// Body of `/ai/recommend-course`.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRequest {
    pub places_name: Vec<String>,
}
