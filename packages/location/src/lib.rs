#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The viewer's anchor location.
//!
//! Relevance filtering is anchored to where the viewer currently is. The
//! device geolocation capability is an external collaborator; this crate
//! models its output ([`AnchorLocation`], with the derived 4-character
//! geohash prefix used for cell matching) and its failure modes
//! ([`GeolocationError`], classified so the UI can show a specific
//! remediation message instead of a raw platform error).

use chrono::{DateTime, Duration, Utc};
use relief_map_geo::GeoError;
use serde::{Deserialize, Serialize};

/// Geohash precision of the anchor prefix. Four characters is the
/// configured proximity cell size for this system.
pub const ANCHOR_PRECISION: usize = 4;

/// Maximum age of a cached position fix before it must be re-acquired.
pub const MAX_FIX_AGE_SECONDS: i64 = 300;

/// A classified geolocation failure.
///
/// The four kinds mirror the device geolocation API and each carries the
/// remediation message shown to the viewer. The classification is part of
/// the contract with the UI; callers branch on [`kind`](Self::kind).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum GeolocationError {
    /// The viewer denied the location permission prompt.
    #[error("Location access denied. Please enable location permissions in your browser settings.")]
    PermissionDenied,

    /// The device could not determine a position.
    #[error("Location information is unavailable. Please check your GPS or network connection.")]
    PositionUnavailable,

    /// The position request did not complete in time.
    #[error("Location request timed out. Please try again.")]
    Timeout,

    /// Any other platform error, with its original message.
    #[error("Location error: {message}")]
    Unknown {
        /// Message reported by the platform.
        message: String,
    },
}

impl GeolocationError {
    /// Stable kind identifier for this failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::PositionUnavailable => "position-unavailable",
            Self::Timeout => "timeout",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// The viewer's current position and its derived proximity cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorLocation {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Geohash prefix at [`ANCHOR_PRECISION`], the cell used for matching.
    pub geohash_prefix: String,
    /// When this fix was acquired.
    pub captured_at: DateTime<Utc>,
}

impl AnchorLocation {
    /// Builds an anchor from a position fix, deriving the geohash prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates are outside the valid
    /// latitude/longitude range.
    pub fn new(
        latitude: f64,
        longitude: f64,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, GeoError> {
        let geohash_prefix = relief_map_geo::encode(latitude, longitude, ANCHOR_PRECISION)?;
        Ok(Self {
            latitude,
            longitude,
            geohash_prefix,
            captured_at,
        })
    }

    /// Whether this fix is too old to trust and should be re-acquired.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.captured_at > Duration::seconds(MAX_FIX_AGE_SECONDS)
    }
}
