#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The "nearby recent" report feed.
//!
//! A viewer's dashboard shows the reports that are geographically near their
//! anchor (coarse geohash-prefix match) and fresh (submitted within the last
//! week). This is a pure relevance filter over one snapshot: a linear scan,
//! no index, no mutation of the source. Archival hiding is a presentation
//! concern applied downstream, not here.

pub mod contacts;

use relief_map_geo::{DistanceResult, estimate_distance};
use relief_map_incident_models::{IncidentKey, IncidentRecord};
use relief_map_snapshot::{RawSnapshot, sanitize_payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Freshness window for the feed: reports older than one week are dropped.
pub const ONE_WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

/// A report that passed the relevance filter, with its key decomposed and
/// its payload sanitized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedIncident {
    /// Parsed composite key.
    pub key: IncidentKey,
    /// Payload with internal keys stripped.
    pub payload: Value,
}

impl FeedIncident {
    /// Typed view of the payload.
    #[must_use]
    pub fn record(&self) -> IncidentRecord {
        IncidentRecord::from_payload(&self.key.unique_id, &self.payload)
    }

    /// Distance from an anchor geohash to this report's location.
    #[must_use]
    pub fn distance_from(&self, anchor_geohash: &str) -> DistanceResult {
        estimate_distance(anchor_geohash, &self.key.geohash)
    }
}

/// Filters a snapshot down to the reports relevant to one viewer.
///
/// A report is included when its key's geohash starts with `anchor_prefix`
/// (case-sensitive; an empty prefix matches everything) and its embedded
/// timestamp is at most one week before `now_epoch_seconds`, inclusive.
/// Keys that don't decompose — no underscore, or a non-finite timestamp —
/// are dropped silently. Output preserves snapshot iteration order; callers
/// that want distance ordering use [`sort_by_distance`].
#[must_use]
pub fn filter_nearby_recent(
    snapshot: &RawSnapshot,
    anchor_prefix: &str,
    now_epoch_seconds: i64,
) -> Vec<FeedIncident> {
    let cutoff = now_epoch_seconds - ONE_WEEK_SECONDS;
    let mut results = Vec::new();

    for (unique_id, payload) in snapshot {
        let Some(key) = IncidentKey::parse(unique_id) else {
            log::debug!("skipping malformed snapshot key {unique_id:?}");
            continue;
        };

        if !key.geohash.starts_with(anchor_prefix) {
            continue;
        }
        if key.submitted_at < cutoff {
            continue;
        }

        results.push(FeedIncident {
            key,
            payload: sanitize_payload(payload),
        });
    }

    results
}

/// Pairs each feed entry with its distance from the anchor.
#[must_use]
pub fn annotate_distances<'a>(
    incidents: &'a [FeedIncident],
    anchor_geohash: &str,
) -> Vec<(&'a FeedIncident, DistanceResult)> {
    incidents
        .iter()
        .map(|incident| (incident, incident.distance_from(anchor_geohash)))
        .collect()
}

/// Sorts feed entries by distance from the anchor, nearest first.
///
/// Entries whose distance is unknown sort last; the sort is stable, so ties
/// and unknowns keep their snapshot order.
#[must_use]
pub fn sort_by_distance(mut incidents: Vec<FeedIncident>, anchor_geohash: &str) -> Vec<FeedIncident> {
    incidents.sort_by(|a, b| {
        let da = a
            .distance_from(anchor_geohash)
            .km()
            .unwrap_or(f64::INFINITY);
        let db = b
            .distance_from(anchor_geohash)
            .km()
            .unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
    incidents
}
