#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geohash decoding and great-circle distance estimation.
//!
//! Dashboards annotate each nearby report with how far away it is. Both
//! endpoints arrive as geohashes, so the distance is computed between cell
//! *centers* — an inherent precision loss the design accepts. Estimation
//! fails closed: anything undecodable yields [`DistanceResult::Unknown`]
//! instead of an error.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, for the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors from geohash encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The geohash string was empty.
    #[error("empty geohash")]
    EmptyHash,

    /// The geohash library rejected the input.
    #[error("geohash error: {0}")]
    Geohash(#[from] geohash::GeohashError),
}

/// Decodes a geohash to the `(latitude, longitude)` of its cell center.
///
/// # Errors
///
/// Returns an error if the hash is empty or contains invalid characters.
pub fn decode(hash: &str) -> Result<(f64, f64), GeoError> {
    if hash.is_empty() {
        return Err(GeoError::EmptyHash);
    }
    let (coord, _, _) = geohash::decode(hash)?;
    Ok((coord.y, coord.x))
}

/// Encodes a latitude/longitude pair to a geohash of the given length.
///
/// # Errors
///
/// Returns an error if the coordinates are out of range.
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<String, GeoError> {
    let hash = geohash::encode(
        geohash::Coord {
            x: longitude,
            y: latitude,
        },
        precision,
    )?;
    Ok(hash)
}

/// Great-circle distance between two points in kilometers (haversine).
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// A distance estimate between two geohash-encoded points.
///
/// The `Display` output is contractual: meters (`"850m"`) under one
/// kilometer, one-decimal kilometers (`"3.2km"`) otherwise, `"Unknown"` when
/// either endpoint failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistanceResult {
    /// A computed great-circle distance.
    Known {
        /// Distance in kilometers.
        km: f64,
    },
    /// One of the endpoints was empty or undecodable.
    Unknown,
}

impl DistanceResult {
    /// The distance in kilometers, if known.
    #[must_use]
    pub const fn km(&self) -> Option<f64> {
        match self {
            Self::Known { km } => Some(*km),
            Self::Unknown => None,
        }
    }

    /// Whether a distance could be computed.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }
}

impl std::fmt::Display for DistanceResult {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known { km } if *km < 1.0 => {
                write!(f, "{}m", (km * 1000.0).round() as i64)
            }
            Self::Known { km } => write!(f, "{km:.1}km"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Estimates the distance between two geohash-encoded points.
///
/// Both hashes decode to their cell centers before the haversine
/// computation, so the result is symmetric in its arguments. Decode
/// failures degrade to [`DistanceResult::Unknown`] rather than erroring.
#[must_use]
pub fn estimate_distance(anchor_geohash: &str, target_geohash: &str) -> DistanceResult {
    let (lat1, lng1) = match decode(anchor_geohash) {
        Ok(point) => point,
        Err(err) => {
            log::debug!("cannot decode anchor geohash {anchor_geohash:?}: {err}");
            return DistanceResult::Unknown;
        }
    };
    let (lat2, lng2) = match decode(target_geohash) {
        Ok(point) => point,
        Err(err) => {
            log::debug!("cannot decode target geohash {target_geohash:?}: {err}");
            return DistanceResult::Unknown;
        }
    };

    DistanceResult::Known {
        km: haversine_km(lat1, lng1, lat2, lng2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_geohash() {
        // Classic geohash reference point.
        let (lat, lng) = decode("u4pruydqqvj").unwrap();
        assert!((lat - 57.64911).abs() < 0.001, "lat {lat}");
        assert!((lng - 10.40744).abs() < 0.001, "lng {lng}");
    }

    #[test]
    fn encode_decode_truncation() {
        let full = encode(57.64911, 10.40744, 9).unwrap();
        let coarse = encode(57.64911, 10.40744, 4).unwrap();
        assert!(full.starts_with(&coarse));
        assert_eq!(coarse, "u4pr");
    }

    #[test]
    fn empty_hash_fails_decode() {
        assert!(matches!(decode(""), Err(GeoError::EmptyHash)));
    }

    #[test]
    fn invalid_characters_fail_decode() {
        assert!(decode("a!!b").is_err());
    }

    #[test]
    fn haversine_one_degree_longitude_at_equator() {
        let km = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }

    #[test]
    fn distance_with_self_is_zero_meters() {
        let result = estimate_distance("u4pruydqqvj", "u4pruydqqvj");
        assert_eq!(result.to_string(), "0m");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = "u4pruydqqvj";
        let b = "tdr1y7u2gcx";
        assert_eq!(estimate_distance(a, b), estimate_distance(b, a));
    }

    #[test]
    fn degree_of_longitude_formats_as_km() {
        let a = encode(0.0, 0.0, 9).unwrap();
        let b = encode(0.0, 1.0, 9).unwrap();

        let result = estimate_distance(&a, &b);
        let km = result.km().unwrap();
        assert!(km > 110.0 && km < 113.0, "got {km}");
        assert_eq!(result.to_string(), "111.2km");
    }

    #[test]
    fn empty_or_invalid_inputs_fail_closed() {
        assert_eq!(estimate_distance("", "u4pr"), DistanceResult::Unknown);
        assert_eq!(estimate_distance("u4pr", ""), DistanceResult::Unknown);
        assert_eq!(estimate_distance("!!", "u4pr"), DistanceResult::Unknown);
        assert_eq!(estimate_distance("", "").to_string(), "Unknown");
    }

    #[test]
    fn formatting_thresholds_are_exact() {
        assert_eq!(DistanceResult::Known { km: 0.0 }.to_string(), "0m");
        assert_eq!(DistanceResult::Known { km: 0.3487 }.to_string(), "349m");
        assert_eq!(DistanceResult::Known { km: 0.9994 }.to_string(), "999m");
        assert_eq!(DistanceResult::Known { km: 1.0 }.to_string(), "1.0km");
        assert_eq!(DistanceResult::Known { km: 2.349 }.to_string(), "2.3km");
        assert_eq!(DistanceResult::Known { km: 111.195 }.to_string(), "111.2km");
    }
}
