#![allow(clippy::missing_errors_doc)]

//! # Cognition Storage — Turso
//!
//! Turso/libSQL backend for the reasoning-path library: one table keyed by
//! `path_id` with the path metadata serialized as a JSON document in a single
//! column, plus indexes on `strategy_id`, `path_type` and `created_at`.
//!
//! ## Example
//!
//! ```no_run
//! use cognition_storage_turso::TursoStore;
//! use cognition_core::library::PathLibrary;
//! use std::sync::Arc;
//!
//! # async fn example() -> cognition_core::Result<()> {
//! let store = TursoStore::open_local("data/reasoning_paths.db").await?;
//! store.initialize_schema().await?;
//! let library = PathLibrary::load(Arc::new(store)).await?;
//! # Ok(())
//! # }
//! ```

mod schema;

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{params, Builder, Connection, Database};
use tracing::{debug, info, warn};

use cognition_core::library::PathStore;
use cognition_core::types::{EnhancedPath, PathMetadata};
use cognition_core::{Error, Result};

/// libSQL-backed reasoning-path store.
pub struct TursoStore {
    db: Database,
}

impl TursoStore {
    /// Open a local database file, creating it if absent.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new_local(path.as_ref())
            .build()
            .await
            .map_err(|e| Error::Storage(format!("failed to open local database: {e}")))?;
        Ok(Self { db })
    }

    /// Connect to a remote Turso database.
    pub async fn open_remote(url: &str, token: &str) -> Result<Self> {
        let db = Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(|e| Error::Storage(format!("failed to open remote database: {e}")))?;
        Ok(Self { db })
    }

    /// Create the table and its indexes. Idempotent.
    pub async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        for statement in [
            schema::CREATE_REASONING_PATHS_TABLE,
            schema::CREATE_STRATEGY_ID_INDEX,
            schema::CREATE_PATH_TYPE_INDEX,
            schema::CREATE_CREATED_AT_INDEX,
        ] {
            conn.execute(statement, ())
                .await
                .map_err(|e| Error::Storage(format!("schema creation failed: {e}")))?;
        }

        info!("reasoning_paths schema initialized");
        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| Error::Storage(format!("failed to get connection: {e}")))
    }

    fn row_to_path(row: &libsql::Row) -> Result<EnhancedPath> {
        let path_id: String = row
            .get(0)
            .map_err(|e| Error::Storage(format!("failed to read path_id: {e}")))?;
        let path_type: String = row
            .get(1)
            .map_err(|e| Error::Storage(format!("failed to read path_type: {e}")))?;
        let description: Option<String> = row
            .get(2)
            .map_err(|e| Error::Storage(format!("failed to read description: {e}")))?;
        let prompt_template: String = row
            .get(3)
            .map_err(|e| Error::Storage(format!("failed to read prompt_template: {e}")))?;
        let strategy_id: Option<String> = row
            .get(4)
            .map_err(|e| Error::Storage(format!("failed to read strategy_id: {e}")))?;
        let instance_id: Option<String> = row
            .get(5)
            .map_err(|e| Error::Storage(format!("failed to read instance_id: {e}")))?;
        let metadata_doc: String = row
            .get(6)
            .map_err(|e| Error::Storage(format!("failed to read metadata_doc: {e}")))?;
        let is_learned: i64 = row
            .get(7)
            .map_err(|e| Error::Storage(format!("failed to read is_learned: {e}")))?;
        let learning_source: Option<String> = row
            .get(8)
            .map_err(|e| Error::Storage(format!("failed to read learning_source: {e}")))?;
        let effectiveness_score: f64 = row
            .get(9)
            .map_err(|e| Error::Storage(format!("failed to read effectiveness_score: {e}")))?;

        let metadata: PathMetadata =
            serde_json::from_str(&metadata_doc).map_err(Error::Serialization)?;

        Ok(EnhancedPath {
            path_id,
            path_type,
            description: description.unwrap_or_default(),
            prompt_template,
            strategy_id: strategy_id.unwrap_or_default(),
            instance_id: instance_id.unwrap_or_default(),
            metadata,
            is_learned: is_learned != 0,
            learning_source: learning_source.unwrap_or_default(),
            effectiveness_score,
        })
    }
}

#[async_trait]
impl PathStore for TursoStore {
    /// Upsert one path record.
    async fn persist(&self, path: &EnhancedPath) -> Result<()> {
        let conn = self.connect()?;
        let metadata_doc = serde_json::to_string(&path.metadata)?;

        let sql = r#"
            INSERT OR REPLACE INTO reasoning_paths (
                path_id, path_type, description, prompt_template,
                strategy_id, instance_id, metadata_doc, is_learned,
                learning_source, effectiveness_score, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        conn.execute(
            sql,
            params![
                path.path_id.clone(),
                path.path_type.clone(),
                path.description.clone(),
                path.prompt_template.clone(),
                path.strategy_id.clone(),
                path.instance_id.clone(),
                metadata_doc,
                i64::from(path.is_learned),
                path.learning_source.clone(),
                path.effectiveness_score,
                path.metadata.created_at.timestamp(),
                Utc::now().timestamp(),
            ],
        )
        .await
        .map_err(|e| Error::Storage(format!("failed to persist path: {e}")))?;

        debug!(path_id = %path.path_id, "persisted path to turso store");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<EnhancedPath>> {
        let conn = self.connect()?;

        let sql = r#"
            SELECT path_id, path_type, description, prompt_template,
                   strategy_id, instance_id, metadata_doc, is_learned,
                   learning_source, effectiveness_score
            FROM reasoning_paths
            ORDER BY created_at DESC
        "#;

        let mut rows = conn
            .query(sql, ())
            .await
            .map_err(|e| Error::Storage(format!("failed to query paths: {e}")))?;

        let mut paths = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Error::Storage(format!("failed to fetch path row: {e}")))?
        {
            match Self::row_to_path(&row) {
                Ok(path) => paths.push(path),
                Err(e) => warn!(error = %e, "skipping malformed path row"),
            }
        }

        info!(loaded = paths.len(), "loaded paths from turso store");
        Ok(paths)
    }

    /// Back up via `VACUUM INTO`, producing a consistent database copy.
    async fn backup(&self, dest: &Path) -> Result<()> {
        let conn = self.connect()?;
        let dest = dest.to_string_lossy().replace('\'', "''");

        conn.execute(&format!("VACUUM INTO '{dest}'"), ())
            .await
            .map_err(|e| Error::Storage(format!("backup failed: {e}")))?;

        info!(dest = %dest, "turso store backed up");
        Ok(())
    }
}
