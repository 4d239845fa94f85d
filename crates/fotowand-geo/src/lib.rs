//! Geographic helpers for the event geofence.
//!
//! Pure math (great-circle distance, coordinate validation, distance
//! formatting) plus EXIF GPS extraction. No I/O.

pub mod gps;

pub use gps::{extract_gps, GpsExtraction};

/// Mean Earth radius in meters, as used by the Haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Threshold at which formatted distances switch from meters to kilometers.
const KILOMETER_THRESHOLD: f64 = 1000.0;

/// Great-circle distance in meters between two WGS84 coordinates.
///
/// Symmetric and zero for coincident points.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
}

/// True iff the pair is a plausible WGS84 coordinate.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Human-readable distance: `"0 m"`, `"742 m"`, `"7.4 km"`.
///
/// `None` and non-positive values both render as `"0 m"` — callers that
/// care about "not computed" vs zero must branch before formatting.
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m >= KILOMETER_THRESHOLD => format!("{:.1} km", m / 1000.0),
        Some(m) if m > 0.0 => format!("{} m", m.round() as i64),
        _ => "0 m".to_string(),
    }
}
