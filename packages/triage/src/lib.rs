#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard triage: partitioning reports into active, pending, and
//! archived buckets.
//!
//! The status string on a report is free-form, so classification goes
//! through the [`StatusBucket`] keyword table first. When the status is
//! unrecognized, the report's urgency decides: high/critical escalates to
//! active, everything else waits in pending. The partition is total — every
//! input record lands in exactly one bucket, in input order.

use relief_map_incident_models::{IncidentRecord, StatusBucket};
use serde::Serialize;

/// The three dashboard buckets, partitioning the input.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TriageBuckets {
    /// Response underway (or unrecognized status with escalated urgency).
    pub active: Vec<IncidentRecord>,
    /// Awaiting review or dispatch.
    pub pending: Vec<IncidentRecord>,
    /// Resolved, completed, or otherwise closed.
    pub archived: Vec<IncidentRecord>,
}

/// Bucket sizes for dashboard tab badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriageCounts {
    pub active: usize,
    pub pending: usize,
    pub archived: usize,
}

impl TriageBuckets {
    /// Per-bucket counts.
    #[must_use]
    pub fn counts(&self) -> TriageCounts {
        TriageCounts {
            active: self.active.len(),
            pending: self.pending.len(),
            archived: self.archived.len(),
        }
    }

    /// Total number of records across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active.len() + self.pending.len() + self.archived.len()
    }
}

/// Resolves the bucket for one record.
///
/// The status keyword table wins when it recognizes the status; otherwise
/// urgency decides. Kept separate from [`classify`] so the fallback rule is
/// testable in isolation.
#[must_use]
pub fn bucket_for(record: &IncidentRecord) -> StatusBucket {
    match StatusBucket::from_status(&record.status) {
        Some(bucket) => bucket,
        None if record.urgency_level.is_escalated() => StatusBucket::Active,
        None => StatusBucket::Pending,
    }
}

/// Partitions records into the three dashboard buckets.
///
/// Total and exhaustive: no record is ever dropped, and each appears in
/// exactly one bucket. Input order is preserved within buckets.
pub fn classify(records: impl IntoIterator<Item = IncidentRecord>) -> TriageBuckets {
    let mut buckets = TriageBuckets::default();

    for record in records {
        match bucket_for(&record) {
            StatusBucket::Active => buckets.active.push(record),
            StatusBucket::Pending => buckets.pending.push(record),
            StatusBucket::Archived => buckets.archived.push(record),
        }
    }

    buckets
}
