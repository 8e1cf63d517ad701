#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The upstream report-snapshot boundary.
//!
//! Reports live in an external realtime store as one JSON mapping from
//! composite key to payload. This crate defines the fetch seam
//! ([`SnapshotSource`]), the sanitization that strips backend-internal
//! enrichment fields before a payload leaves the core, and the
//! degrade-to-empty policy: an unavailable snapshot is "no data", never a
//! crash.

use async_trait::async_trait;
use serde_json::Value;

/// A snapshot of the report store: composite key -> raw payload.
///
/// `serde_json`'s `preserve_order` feature keeps this in insertion order,
/// which is the iteration order downstream filters are contracted to
/// preserve.
pub type RawSnapshot = serde_json::Map<String, Value>;

/// Backend-internal enrichment fields, stripped before any payload is shown
/// to non-government viewers.
pub const INTERNAL_KEYS: &[&str] = &["gdac_disasters", "cnn_analysis", "weather_data"];

/// Errors from fetching the upstream snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The store could not be reached or had no snapshot.
    #[error("snapshot unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The snapshot body was not valid JSON.
    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a snapshot dump.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can produce a full snapshot of the report store.
///
/// The real implementation wraps the external realtime database; tests and
/// the CLI use [`MemorySnapshotSource`] and a file-backed source.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the body doesn't
    /// parse. Callers that want the degrade-to-empty behavior should go
    /// through [`fetch_or_empty`].
    async fn fetch(&self) -> Result<RawSnapshot, SnapshotError>;
}

/// An in-memory snapshot, for tests and fixtures.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotSource {
    snapshot: RawSnapshot,
}

impl MemorySnapshotSource {
    #[must_use]
    pub const fn new(snapshot: RawSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotSource for MemorySnapshotSource {
    async fn fetch(&self) -> Result<RawSnapshot, SnapshotError> {
        Ok(self.snapshot.clone())
    }
}

/// Fetches a snapshot, degrading any failure to an empty mapping.
///
/// A missing or unreachable snapshot is not an error condition for the
/// viewer-facing flows; they simply render "no data".
pub async fn fetch_or_empty(source: &dyn SnapshotSource) -> RawSnapshot {
    match source.fetch().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("snapshot fetch failed, treating as empty: {err}");
            RawSnapshot::new()
        }
    }
}

/// Returns a copy of a payload with the internal keys removed.
///
/// The copy is shallow and the source value is never mutated. Non-object
/// payloads pass through unchanged; there is nothing to strip from them.
#[must_use]
pub fn sanitize_payload(payload: &Value) -> Value {
    let Some(fields) = payload.as_object() else {
        return payload.clone();
    };

    let mut cleaned = fields.clone();
    for key in INTERNAL_KEYS {
        cleaned.remove(*key);
    }
    Value::Object(cleaned)
}

/// Sanitizes every record in the snapshot, preserving iteration order.
///
/// This is the unfiltered listing used by views that show all reports
/// regardless of location or age.
#[must_use]
pub fn sanitize_all(snapshot: &RawSnapshot) -> Vec<(String, Value)> {
    snapshot
        .iter()
        .map(|(unique_id, payload)| (unique_id.clone(), sanitize_payload(payload)))
        .collect()
}
