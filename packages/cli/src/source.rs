//! File-backed snapshot source for offline inspection.
//!
//! Reads a JSON dump of the report store (one object mapping composite keys
//! to payloads), the same shape the realtime database exports.

use std::path::PathBuf;

use async_trait::async_trait;
use relief_map_snapshot::{RawSnapshot, SnapshotError, SnapshotSource};

pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self) -> Result<RawSnapshot, SnapshotError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        value
            .as_object()
            .cloned()
            .ok_or_else(|| SnapshotError::Unavailable {
                message: format!("{} is not a JSON object", self.path.display()),
            })
    }
}
