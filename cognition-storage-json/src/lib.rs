#![allow(clippy::missing_errors_doc)]

//! # Cognition Storage — JSON
//!
//! Single-document JSON backend for the reasoning-path library.
//!
//! The whole library lives in one file:
//!
//! ```json
//! {
//!   "metadata": { "version": "...", "created_at": ..., "updated_at": ..., "total_paths": ... },
//!   "paths": { "<path_id>": { ... } }
//! }
//! ```
//!
//! Every write rewrites the document atomically (temp file + rename) so a
//! crash never leaves a half-written library behind. A missing or empty file
//! loads as an empty library; malformed entries are skipped with a warning.
//!
//! ## Example
//!
//! ```no_run
//! use cognition_storage_json::JsonStore;
//! use cognition_core::library::PathLibrary;
//! use std::sync::Arc;
//!
//! # async fn example() -> cognition_core::Result<()> {
//! let store = JsonStore::new("data/reasoning_paths.json");
//! let library = PathLibrary::load(Arc::new(store)).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use cognition_core::library::PathStore;
use cognition_core::types::EnhancedPath;
use cognition_core::{Error, Result};

/// Document-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentMetadata {
    version: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    total_paths: usize,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: "1.0.0".to_string(),
            created_at: now,
            updated_at: now,
            total_paths: 0,
        }
    }
}

/// On-disk document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    metadata: DocumentMetadata,
    /// Path records keyed by path id. Kept as raw values so one malformed
    /// entry cannot poison the rest of the library.
    #[serde(default)]
    paths: BTreeMap<String, serde_json::Value>,
}

/// JSON-file path store with atomic single-document rewrites.
pub struct JsonStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles against the document.
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Create a store over the given file path. The file is created on the
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => {
                debug!(path = %self.path.display(), "library file is empty, starting fresh");
                Ok(Document::default())
            }
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(Error::Serialization),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no library file yet, starting fresh");
                Ok(Document::default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Atomically replace the document: write a sibling temp file, then
    /// rename over the target.
    async fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PathStore for JsonStore {
    async fn persist(&self, path: &EnhancedPath) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document
            .paths
            .insert(path.path_id.clone(), serde_json::to_value(path)?);
        document.metadata.updated_at = Utc::now();
        document.metadata.total_paths = document.paths.len();

        self.write_document(&document).await?;
        debug!(path_id = %path.path_id, "persisted path to json library");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<EnhancedPath>> {
        let document = self.read_document().await?;

        let mut paths = Vec::with_capacity(document.paths.len());
        for (path_id, value) in document.paths {
            match serde_json::from_value::<EnhancedPath>(value) {
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!(%path_id, error = %e, "skipping malformed path record");
                }
            }
        }

        info!(loaded = paths.len(), path = %self.path.display(), "loaded json library");
        Ok(paths)
    }

    async fn backup(&self, dest: &Path) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::copy(&self.path, dest).await {
            Ok(_) => {
                info!(dest = %dest.display(), "json library backed up");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Nothing written yet: back up an empty document
                let empty = serde_json::to_vec_pretty(&Document::default())?;
                tokio::fs::write(dest, empty).await?;
                Ok(())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cognition_core::library::PathLibrary;
    use cognition_core::types::{PathMetadata, PathStatus};
    use std::sync::Arc;

    fn sample_path(id: &str) -> EnhancedPath {
        EnhancedPath {
            path_id: id.to_string(),
            path_type: "analytical".to_string(),
            description: "decompose the problem".to_string(),
            prompt_template: "solve {task}".to_string(),
            strategy_id: "s1".to_string(),
            instance_id: format!("{id}_0"),
            metadata: PathMetadata::default(),
            is_learned: false,
            learning_source: String::new(),
            effectiveness_score: 0.5,
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("paths.json"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");
        std::fs::write(&file, b"").unwrap();

        let store = JsonStore::new(file);
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");

        let store = JsonStore::new(&file);
        let path = sample_path("p1");
        store.persist(&path).await.unwrap();

        let reloaded = JsonStore::new(&file).load_all().await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0], path);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");

        let store = JsonStore::new(&file);
        store.persist(&sample_path("good")).await.unwrap();

        // Corrupt one entry by hand
        let mut document: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
        document["paths"]["broken"] = serde_json::json!({"not": "a path"});
        std::fs::write(&file, serde_json::to_vec(&document).unwrap()).unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].path_id, "good");
    }

    #[tokio::test]
    async fn test_document_metadata_tracks_path_count() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");

        let store = JsonStore::new(&file);
        store.persist(&sample_path("p1")).await.unwrap();
        store.persist(&sample_path("p2")).await.unwrap();

        let document: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
        assert_eq!(document["metadata"]["total_paths"], 2);
        assert!(document["paths"].get("p1").is_some());
        assert!(document["paths"].get("p2").is_some());
    }

    #[tokio::test]
    async fn test_backup_copies_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");
        let backup = dir.path().join("paths.backup.json");

        let store = JsonStore::new(&file);
        store.persist(&sample_path("p1")).await.unwrap();
        store.backup(&backup).await.unwrap();

        let restored = JsonStore::new(&backup).load_all().await.unwrap();
        assert_eq!(restored.len(), 1);
    }

    /// Scenario: add a path, update performance three times, reload.
    #[tokio::test]
    async fn test_library_round_trip_with_performance_updates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");

        {
            let library = PathLibrary::load(Arc::new(JsonStore::new(&file))).await.unwrap();
            library.add(sample_path("p1")).await.unwrap();
            for _ in 0..3 {
                library
                    .update_performance("p1", true, 2.0, Some(0.8))
                    .await
                    .unwrap();
            }
        }

        // Fresh library over the same file sees the persisted statistics
        let library = PathLibrary::load(Arc::new(JsonStore::new(&file))).await.unwrap();
        let path = library.get("p1").await.unwrap();
        assert_eq!(path.metadata.usage_count, 3);
        assert!((path.metadata.success_rate - 1.0).abs() < 1e-9);
        assert!((path.metadata.average_rating - 0.8).abs() < 1e-9);
        assert!((path.metadata.total_execution_time - 6.0).abs() < 1e-9);
        assert!((path.effectiveness_score - 0.5 * 1.05f64.powi(3)).abs() < 1e-9);
        assert_eq!(path.metadata.status, PathStatus::Active);
    }
}
