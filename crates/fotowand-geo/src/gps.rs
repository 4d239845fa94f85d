//! EXIF GPS extraction.
//!
//! Reads the orientation-independent GPS tags (latitude/longitude plus
//! their N/S/E/W refs), converts degrees/minutes/seconds rationals to
//! decimal degrees and re-validates the result. Corrupt EXIF must come
//! out as [`GpsExtraction::Malformed`], never as a bogus coordinate.

use exif::{In, Reader, Tag, Value};
use std::io::Cursor;

use crate::validate_coordinates;

/// Outcome of trying to read GPS coordinates from image bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpsExtraction {
    Found { latitude: f64, longitude: f64 },
    /// No EXIF at all, or the GPS tags are absent
    NotFound,
    /// GPS tags exist but do not parse into a valid coordinate
    Malformed,
}

impl GpsExtraction {
    /// Collapse `Malformed` into "no GPS" — the pipeline treats
    /// unparseable GPS the same as absent GPS.
    pub fn coordinates(self) -> Option<(f64, f64)> {
        match self {
            GpsExtraction::Found {
                latitude,
                longitude,
            } => Some((latitude, longitude)),
            _ => None,
        }
    }
}

/// Extract GPS coordinates from the EXIF block of `data`.
pub fn extract_gps(data: &[u8]) -> GpsExtraction {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        // Unreadable EXIF counts as absent, not as corruption
        Err(_) => return GpsExtraction::NotFound,
    };

    let lat_field = exif.get_field(Tag::GPSLatitude, In::PRIMARY);
    let lat_ref = exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY);
    let lon_field = exif.get_field(Tag::GPSLongitude, In::PRIMARY);
    let lon_ref = exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY);

    let (lat_field, lat_ref, lon_field, lon_ref) = match (lat_field, lat_ref, lon_field, lon_ref) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return GpsExtraction::NotFound,
    };

    let latitude = match dms_to_decimal(&lat_field.value, cardinal(&lat_ref.value)) {
        Some(v) => v,
        None => return GpsExtraction::Malformed,
    };
    let longitude = match dms_to_decimal(&lon_field.value, cardinal(&lon_ref.value)) {
        Some(v) => v,
        None => return GpsExtraction::Malformed,
    };

    if !validate_coordinates(latitude, longitude) {
        tracing::debug!(latitude, longitude, "EXIF GPS outside valid range");
        return GpsExtraction::Malformed;
    }

    GpsExtraction::Found {
        latitude,
        longitude,
    }
}

/// First character of the Ref tag (`N`/`S`/`E`/`W`), uppercased.
fn cardinal(value: &Value) -> Option<u8> {
    match value {
        Value::Ascii(components) => components
            .first()
            .and_then(|c| c.first())
            .map(|b| b.to_ascii_uppercase()),
        _ => None,
    }
}

/// Convert a degrees/minutes/seconds rational triple to decimal degrees,
/// negated for southern/western hemispheres.
fn dms_to_decimal(value: &Value, cardinal: Option<u8>) -> Option<f64> {
    let rationals = match value {
        Value::Rational(v) if v.len() >= 3 => v,
        _ => return None,
    };

    // A zero denominator in the degrees component is unrecoverable;
    // minutes/seconds default to zero as some writers omit them
    if rationals[0].denom == 0 {
        return None;
    }
    let degrees = rationals[0].to_f64();
    let minutes = if rationals[1].denom == 0 {
        0.0
    } else {
        rationals[1].to_f64()
    };
    let seconds = if rationals[2].denom == 0 {
        0.0
    } else {
        rationals[2].to_f64()
    };

    let mut decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    match cardinal {
        Some(b'S') | Some(b'W') => decimal = -decimal,
        Some(b'N') | Some(b'E') => {}
        _ => return None,
    }

    Some(decimal)
}
