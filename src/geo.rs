use crate::models::Coordinate;

/// Mean Earth radius in meters (spherical approximation).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Average walking speed in meters per second.
const WALKING_SPEED_M_PER_S: f64 = 1.4;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Symmetric, and zero for identical points. NaN coordinates propagate.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Estimated walking time in whole minutes for a distance in meters.
pub fn walking_minutes(meters: f64) -> u32 {
    (meters / WALKING_SPEED_M_PER_S / 60.0).round() as u32
}
