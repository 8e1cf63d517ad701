#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident taxonomy types and the canonical report format.
//!
//! Every disaster report in the snapshot is identified by a composite key
//! (`"<geohash>_<unixSeconds>"`) and carries a loosely-typed payload. This
//! crate defines the shared taxonomy enums, the one-time key decomposition
//! ([`IncidentKey`]), and the tolerant payload-to-record extraction used by
//! the feed and triage crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of emergency being reported.
///
/// Report forms submit these as lowercase strings; anything unrecognized
/// folds to [`Self::Other`] rather than failing the record.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmergencyType {
    /// Flooding or flash-flood conditions
    Flood,
    /// Seismic event
    Earthquake,
    /// Structural or wildland fire
    Fire,
    /// Landslide or mudslide
    Landslide,
    /// Severe storm (wind, hail, cyclone)
    Storm,
    /// Anything that doesn't fit the above
    #[default]
    Other,
}

/// Severity of an incident, independent of its workflow status.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UrgencyLevel {
    /// No immediate danger
    #[default]
    Low,
    /// Needs attention but not life-threatening
    Medium,
    /// Serious situation, response needed soon
    High,
    /// Life-threatening, respond immediately
    Critical,
}

impl UrgencyLevel {
    /// Whether this urgency escalates an ambiguously-statused incident into
    /// the active bucket.
    #[must_use]
    pub const fn is_escalated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// Workflow bucket an incident's free-form status string resolves to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusBucket {
    /// Response underway
    Active,
    /// Awaiting review or dispatch
    Pending,
    /// Resolved and hidden from live views
    Archived,
}

impl StatusBucket {
    /// Resolves a free-form status string to its bucket.
    ///
    /// Matching is case-insensitive and exact on the trimmed string. Returns
    /// `None` for unrecognized values so the caller can apply its own
    /// fallback (triage escalates by urgency).
    #[must_use]
    pub fn from_status(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "active" | "ongoing" | "in progress" => Some(Self::Active),
            "pending" | "review" | "submitted" => Some(Self::Pending),
            "resolved" | "completed" | "closed" | "archive" | "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A snapshot composite key decomposed into its two fields.
///
/// Upstream identifies reports as `"<geohash>_<unixSeconds>"`. The key is
/// parsed exactly once, at the snapshot boundary; downstream code works with
/// the explicit fields and never re-splits the string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentKey {
    /// The full composite identifier, kept for display and lookups.
    pub unique_id: String,
    /// Geohash of the report location (variable precision).
    pub geohash: String,
    /// Submission time, Unix seconds.
    pub submitted_at: i64,
}

impl IncidentKey {
    /// Parses a composite key on its first underscore.
    ///
    /// Returns `None` when the key has no underscore or the timestamp part
    /// is not a finite number. Malformed keys are the caller's cue to drop
    /// the entry silently, never to error.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse(raw: &str) -> Option<Self> {
        let (geohash, timestamp) = raw.split_once('_')?;
        let seconds = timestamp.parse::<f64>().ok().filter(|s| s.is_finite())?;

        Some(Self {
            unique_id: raw.to_string(),
            geohash: geohash.to_string(),
            submitted_at: seconds as i64,
        })
    }

    /// Submission time as a UTC datetime, if representable.
    #[must_use]
    pub fn submitted_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.submitted_at, 0)
    }
}

/// A disaster report extracted from its raw snapshot payload.
///
/// Extraction is total: missing or mistyped fields fall back to defaults and
/// unrecognized enum strings fold to their fallback variants, so a sequence
/// of records always covers the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
    /// Composite identifier this record was keyed under.
    pub unique_id: String,
    /// Kind of emergency.
    pub emergency_type: EmergencyType,
    /// Reporter-assessed severity.
    pub urgency_level: UrgencyLevel,
    /// Free-form workflow status; resolved to a bucket by triage.
    pub status: String,
    /// Geohash of the report location.
    pub geohash: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// People affected. May be a literal count, a range like `"2-5"`,
    /// or `"unknown"`.
    pub people_count: String,
    /// When the reporter submitted the form, Unix seconds.
    pub submitted_time: i64,
    /// When the backend created the record, Unix seconds.
    pub created_at: i64,
    /// Free-text description of the situation.
    pub situation: String,
}

impl Default for IncidentRecord {
    fn default() -> Self {
        Self {
            unique_id: String::new(),
            emergency_type: EmergencyType::default(),
            urgency_level: UrgencyLevel::default(),
            status: String::new(),
            geohash: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            people_count: "unknown".to_string(),
            submitted_time: 0,
            created_at: 0,
            situation: String::new(),
        }
    }
}

impl IncidentRecord {
    /// Extracts a typed record from a raw snapshot payload.
    ///
    /// Never fails: non-object payloads yield a default record carrying only
    /// the id, and individual fields degrade independently.
    #[must_use]
    pub fn from_payload(unique_id: &str, payload: &Value) -> Self {
        let Some(fields) = payload.as_object() else {
            log::debug!("payload for {unique_id} is not an object, using defaults");
            return Self {
                unique_id: unique_id.to_string(),
                ..Self::default()
            };
        };

        let str_field = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let num_field = |key: &str| fields.get(key).and_then(Value::as_f64).unwrap_or_default();
        #[allow(clippy::cast_possible_truncation)]
        let int_field = |key: &str| {
            fields.get(key).map_or(0, |v| {
                v.as_i64()
                    .unwrap_or_else(|| v.as_f64().unwrap_or_default() as i64)
            })
        };

        // People counts arrive as strings ("3", "2-5", "unknown") but some
        // older clients submitted bare numbers.
        let people_count = fields.get("people_count").map_or_else(
            || "unknown".to_string(),
            |v| match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => "unknown".to_string(),
            },
        );

        Self {
            unique_id: unique_id.to_string(),
            emergency_type: str_field("emergency_type").parse().unwrap_or_default(),
            urgency_level: str_field("urgency_level").parse().unwrap_or_default(),
            status: str_field("status"),
            geohash: str_field("geohash"),
            latitude: num_field("latitude"),
            longitude: num_field("longitude"),
            people_count,
            submitted_time: int_field("submitted_time"),
            created_at: int_field("created_at"),
            situation: str_field("situation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_valid_composite_key() {
        let key = IncidentKey::parse("tdr1_1700000000").unwrap();
        assert_eq!(key.unique_id, "tdr1_1700000000");
        assert_eq!(key.geohash, "tdr1");
        assert_eq!(key.submitted_at, 1_700_000_000);
    }

    #[test]
    fn splits_on_first_underscore_only() {
        // Everything after the first underscore must be the timestamp, so a
        // second underscore makes the key malformed.
        assert!(IncidentKey::parse("abc_def_1700000000").is_none());
    }

    #[test]
    fn rejects_key_without_underscore() {
        assert!(IncidentKey::parse("onlyonepart").is_none());
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        assert!(IncidentKey::parse("tdr1_notatime").is_none());
        assert!(IncidentKey::parse("tdr1_").is_none());
    }

    #[test]
    fn rejects_non_finite_timestamp() {
        // Rust happily parses "inf" and "NaN" as f64, so finiteness is an
        // explicit check.
        assert!(IncidentKey::parse("tdr1_inf").is_none());
        assert!(IncidentKey::parse("tdr1_NaN").is_none());
    }

    #[test]
    fn accepts_fractional_timestamp() {
        let key = IncidentKey::parse("tdr1_1700000000.5").unwrap();
        assert_eq!(key.submitted_at, 1_700_000_000);
    }

    #[test]
    fn submitted_at_converts_to_utc() {
        let key = IncidentKey::parse("tdr1_1700000000").unwrap();
        let utc = key.submitted_at_utc().unwrap();
        assert_eq!(utc.timestamp(), 1_700_000_000);
    }

    #[test]
    fn status_keyword_table() {
        assert_eq!(StatusBucket::from_status("active"), Some(StatusBucket::Active));
        assert_eq!(StatusBucket::from_status("ongoing"), Some(StatusBucket::Active));
        assert_eq!(
            StatusBucket::from_status("in progress"),
            Some(StatusBucket::Active)
        );
        assert_eq!(
            StatusBucket::from_status("pending"),
            Some(StatusBucket::Pending)
        );
        assert_eq!(
            StatusBucket::from_status("review"),
            Some(StatusBucket::Pending)
        );
        assert_eq!(
            StatusBucket::from_status("resolved"),
            Some(StatusBucket::Archived)
        );
        assert_eq!(
            StatusBucket::from_status("completed"),
            Some(StatusBucket::Archived)
        );
        assert_eq!(
            StatusBucket::from_status("closed"),
            Some(StatusBucket::Archived)
        );
        assert_eq!(
            StatusBucket::from_status("archive"),
            Some(StatusBucket::Archived)
        );
        assert_eq!(
            StatusBucket::from_status("archived"),
            Some(StatusBucket::Archived)
        );
    }

    #[test]
    fn status_match_is_case_insensitive_and_trimmed() {
        assert_eq!(
            StatusBucket::from_status("Submitted"),
            Some(StatusBucket::Pending)
        );
        assert_eq!(
            StatusBucket::from_status("  RESOLVED  "),
            Some(StatusBucket::Archived)
        );
    }

    #[test]
    fn unrecognized_status_is_none() {
        assert_eq!(StatusBucket::from_status("weird-value"), None);
        assert_eq!(StatusBucket::from_status(""), None);
    }

    #[test]
    fn urgency_escalation() {
        assert!(UrgencyLevel::Critical.is_escalated());
        assert!(UrgencyLevel::High.is_escalated());
        assert!(!UrgencyLevel::Medium.is_escalated());
        assert!(!UrgencyLevel::Low.is_escalated());
    }

    #[test]
    fn urgency_ordering() {
        assert!(UrgencyLevel::Critical > UrgencyLevel::High);
        assert!(UrgencyLevel::High > UrgencyLevel::Medium);
        assert!(UrgencyLevel::Medium > UrgencyLevel::Low);
    }

    #[test]
    fn extracts_record_from_payload() {
        let payload = json!({
            "emergency_type": "flood",
            "urgency_level": "critical",
            "status": "pending",
            "geohash": "tdr1y7u2",
            "latitude": 6.9271,
            "longitude": 79.8612,
            "people_count": "2-5",
            "submitted_time": 1_700_000_000,
            "created_at": 1_700_000_010,
            "situation": "Water rising fast on Main St",
        });

        let record = IncidentRecord::from_payload("tdr1y7u2_1700000000", &payload);
        assert_eq!(record.unique_id, "tdr1y7u2_1700000000");
        assert_eq!(record.emergency_type, EmergencyType::Flood);
        assert_eq!(record.urgency_level, UrgencyLevel::Critical);
        assert_eq!(record.status, "pending");
        assert_eq!(record.people_count, "2-5");
        assert_eq!(record.submitted_time, 1_700_000_000);
    }

    #[test]
    fn unknown_enum_strings_fold_to_fallbacks() {
        let payload = json!({
            "emergency_type": "volcano",
            "urgency_level": "apocalyptic",
        });

        let record = IncidentRecord::from_payload("k_1", &payload);
        assert_eq!(record.emergency_type, EmergencyType::Other);
        assert_eq!(record.urgency_level, UrgencyLevel::Low);
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("FIRE".parse::<EmergencyType>(), Ok(EmergencyType::Fire));
        assert_eq!("High".parse::<UrgencyLevel>(), Ok(UrgencyLevel::High));
    }

    #[test]
    fn numeric_people_count_stringified() {
        let payload = json!({ "people_count": 12 });
        let record = IncidentRecord::from_payload("k_1", &payload);
        assert_eq!(record.people_count, "12");
    }

    #[test]
    fn non_object_payload_yields_defaults() {
        let record = IncidentRecord::from_payload("k_1", &json!("not an object"));
        assert_eq!(record.unique_id, "k_1");
        assert_eq!(record.emergency_type, EmergencyType::Other);
        assert_eq!(record.people_count, "unknown");
    }

    #[test]
    fn mistyped_fields_degrade_independently() {
        let payload = json!({
            "emergency_type": "fire",
            "latitude": "not-a-number",
            "submitted_time": "soon",
        });

        let record = IncidentRecord::from_payload("k_1", &payload);
        assert_eq!(record.emergency_type, EmergencyType::Fire);
        assert!((record.latitude - 0.0).abs() < f64::EPSILON);
        assert_eq!(record.submitted_time, 0);
    }
}
