//! Storage abstraction for the path library.
//!
//! The library keeps a full in-memory cache and writes through to one of the
//! pluggable backends: in-memory (tests), a JSON document, or an embedded
//! relational store. The file and relational backends live in their own
//! crates and implement [`PathStore`].

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::EnhancedPath;

/// Unified storage backend trait for reasoning paths.
///
/// All operations are async to accommodate both file and database backends.
#[async_trait]
pub trait PathStore: Send + Sync {
    /// Insert or replace one path record.
    async fn persist(&self, path: &EnhancedPath) -> Result<()>;

    /// Load every stored path.
    ///
    /// Implementations skip malformed records with a warning rather than
    /// failing the whole load; a missing store yields an empty list.
    async fn load_all(&self) -> Result<Vec<EnhancedPath>>;

    /// Copy the underlying store to `dest`.
    async fn backup(&self, dest: &Path) -> Result<()>;
}

/// Backend that keeps nothing outside the library's cache.
///
/// Used in tests and for purely ephemeral libraries.
#[derive(Debug, Default)]
pub struct MemoryStore;

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PathStore for MemoryStore {
    async fn persist(&self, _path: &EnhancedPath) -> Result<()> {
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<EnhancedPath>> {
        Ok(Vec::new())
    }

    async fn backup(&self, _dest: &Path) -> Result<()> {
        Ok(())
    }
}
