use crate::config::Config;
use crate::errors::AppError;
use crate::geo;
use crate::models::{Coordinate, PlaceRecord};
use crate::place_types;
use crate::places_client::GooglePlacesClient;

/// Minimum review count for a place to count as established.
const MIN_RATING_COUNT: u32 = 50;

/// Provider status marking a place as currently operating.
const OPERATIONAL: &str = "OPERATIONAL";

fn is_established(place: &PlaceRecord) -> bool {
    place.business_status.as_deref() == Some(OPERATIONAL)
        && place.user_ratings_total.unwrap_or(0) >= MIN_RATING_COUNT
}

/// Per-call-site knobs of the aggregation pipeline. Both endpoints run
/// the same pipeline; only these three decisions differ.
#[derive(Clone, Copy)]
pub struct AggregationPolicy {
    /// Applied within each category's results before anything else.
    pub filter: Option<fn(&PlaceRecord) -> bool>,
    /// When set, each category is sorted rating-descending and truncated
    /// to this many records.
    pub per_category_limit: Option<usize>,
    /// When set, the merged and deduplicated set is re-sorted globally by
    /// rating. Otherwise the final order is merge order (category order,
    /// then per-category rating order).
    pub sort_merged_by_rating: bool,
}

impl AggregationPolicy {
    /// Curated picks for the category search endpoint: established
    /// places only, top 3 per category, merge order preserved.
    pub const CURATED: Self = Self {
        filter: Some(is_established),
        per_category_limit: Some(3),
        sort_merged_by_rating: false,
    };

    /// Full candidate pool for the recommendation flow: no filtering or
    /// truncation, globally sorted by rating.
    pub const CANDIDATES: Self = Self {
        filter: None,
        per_category_limit: None,
        sort_merged_by_rating: true,
    };
}

/// Orchestrates per-category searches into one merged, deduplicated and
/// distance-enriched place list.
pub struct PlaceSearchService {
    places: GooglePlacesClient,
}

impl PlaceSearchService {
    pub fn new(config: &Config) -> Self {
        Self {
            places: GooglePlacesClient::new(config),
        }
    }

    /// Runs the aggregation pipeline for one request.
    ///
    /// Fetches every resolved category independently; a failed category
    /// contributes an empty set instead of aborting the whole
    /// aggregation. Distance enrichment runs last, on the filtered and
    /// deduplicated set.
    pub async fn aggregate(
        &self,
        latitude: f64,
        longitude: f64,
        radius: u32,
        labels: &[String],
        default_types: &[&str],
        policy: &AggregationPolicy,
    ) -> Vec<PlaceRecord> {
        let types = place_types::resolve_all(labels, default_types);

        // One Result per category; failures downgrade to empty sets
        // after logging.
        let mut per_category: Vec<Result<Vec<PlaceRecord>, AppError>> =
            Vec::with_capacity(types.len());
        for place_type in &types {
            per_category.push(
                self.places
                    .search_nearby(latitude, longitude, radius, place_type)
                    .await,
            );
        }

        let mut merged = Vec::new();
        for (place_type, result) in types.iter().zip(per_category) {
            let mut batch = match result {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(
                        "Search for '{}' failed, continuing without it: {}",
                        place_type,
                        e
                    );
                    Vec::new()
                }
            };

            if let Some(filter) = policy.filter {
                batch.retain(filter);
            }
            if let Some(limit) = policy.per_category_limit {
                sort_by_rating_desc(&mut batch);
                batch.truncate(limit);
            }
            merged.extend(batch);
        }

        let mut unique = dedup_by_place_id(merged);
        if policy.sort_merged_by_rating {
            sort_by_rating_desc(&mut unique);
        }

        enrich_with_distance(
            &mut unique,
            Coordinate {
                lat: latitude,
                lng: longitude,
            },
        );

        tracing::info!("Aggregated {} unique places", unique.len());
        unique
    }
}

/// Sorts rating-descending; a missing rating sorts as 0.
pub fn sort_by_rating_desc(places: &mut [PlaceRecord]) {
    places.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .total_cmp(&a.rating.unwrap_or(0.0))
    });
}

/// Drops later duplicates of the same `place_id`, keeping the first
/// occurrence in merge order together with its attributes.
pub fn dedup_by_place_id(places: Vec<PlaceRecord>) -> Vec<PlaceRecord> {
    let mut seen = std::collections::HashSet::new();
    places
        .into_iter()
        .filter(|place| seen.insert(place.place_id.clone()))
        .collect()
}

/// Annotates every record with distance and walking time from `origin`.
pub fn enrich_with_distance(places: &mut [PlaceRecord], origin: Coordinate) {
    for place in places {
        let distance = geo::distance_meters(origin, place.geometry.location);
        place.distance_from_user = Some(distance.round());
        place.estimated_time = Some(geo::walking_minutes(distance));
    }
}
