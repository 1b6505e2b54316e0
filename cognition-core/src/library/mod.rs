//! # Dynamic Path Library
//!
//! Persistent, growable mapping `path_id → EnhancedPath` with performance
//! tracking and recommendation scoring.
//!
//! The library holds a full in-memory cache guarded by one lock and writes
//! through to a pluggable [`PathStore`] backend while the lock is held, so
//! on-disk state never trails the cache. Read paths take the lock briefly to
//! snapshot.
//!
//! ## Example
//!
//! ```no_run
//! use cognition_core::library::{MemoryStore, PathLibrary};
//! use std::sync::Arc;
//!
//! # async fn example() -> cognition_core::Result<()> {
//! let library = PathLibrary::load(Arc::new(MemoryStore::new())).await?;
//! let recommended = library.recommend(None, 5, 0.3).await;
//! # Ok(())
//! # }
//! ```

mod learning;
mod recommend;
mod store;

#[cfg(test)]
mod tests;

pub use store::{MemoryStore, PathStore};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::types::{
    EnhancedPath, ExplorationResult, PathCategory, PathMetadata, PathStatus, ReasoningPath,
    RecommendContext,
};

/// Counters describing the library's contents and cache behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total_paths: usize,
    pub active_paths: usize,
    pub learned_paths: usize,
    pub total_usages: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Persistent, learnable store of reasoning paths.
pub struct PathLibrary {
    store: Arc<dyn PathStore>,
    cache: RwLock<HashMap<String, EnhancedPath>>,
    stats: parking_lot::Mutex<LibraryStats>,
}

impl PathLibrary {
    /// Create an empty library over the given backend without loading.
    #[must_use]
    pub fn new(store: Arc<dyn PathStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
            stats: parking_lot::Mutex::new(LibraryStats::default()),
        }
    }

    /// Create a library and populate the cache from the backend.
    ///
    /// Malformed stored records were already skipped by the backend; an empty
    /// or missing store yields an empty library.
    pub async fn load(store: Arc<dyn PathStore>) -> Result<Self> {
        let library = Self::new(store);
        let paths = library.store.load_all().await?;
        let loaded = paths.len();

        {
            let mut cache = library.cache.write().await;
            for path in paths {
                cache.insert(path.path_id.clone(), path);
            }
        }
        library.recount_stats().await;

        info!(loaded, "path library loaded");
        Ok(library)
    }

    /// Add a new path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] when the id is already present; the
    /// library is left unchanged.
    #[instrument(skip(self, path), fields(path_id = %path.path_id))]
    pub async fn add(&self, path: EnhancedPath) -> Result<()> {
        let mut cache = self.cache.write().await;
        if cache.contains_key(&path.path_id) {
            warn!(path_id = %path.path_id, "path already present, skipping add");
            return Err(Error::DuplicateId(path.path_id));
        }

        self.store.persist(&path).await?;

        {
            let mut stats = self.stats.lock();
            stats.total_paths += 1;
            if path.metadata.status == PathStatus::Active {
                stats.active_paths += 1;
            }
            if path.is_learned {
                stats.learned_paths += 1;
            }
        }

        debug!(path_id = %path.path_id, path_type = %path.path_type, "added reasoning path");
        cache.insert(path.path_id.clone(), path);
        Ok(())
    }

    /// Add a plain generator path with default metadata.
    pub async fn add_reasoning_path(&self, path: ReasoningPath) -> Result<()> {
        self.add(EnhancedPath::from_reasoning_path(path)).await
    }

    /// Fetch one path by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] when the id is unknown.
    pub async fn get(&self, path_id: &str) -> Result<EnhancedPath> {
        let cache = self.cache.read().await;
        match cache.get(path_id) {
            Some(path) => {
                self.stats.lock().cache_hits += 1;
                Ok(path.clone())
            }
            None => {
                self.stats.lock().cache_misses += 1;
                Err(Error::PathNotFound(path_id.to_string()))
            }
        }
    }

    /// Snapshot of all paths matching the filters.
    ///
    /// Retired paths are excluded unless `include_retired` is set.
    pub async fn query(
        &self,
        status: Option<PathStatus>,
        category: Option<PathCategory>,
        include_retired: bool,
    ) -> HashMap<String, EnhancedPath> {
        let cache = self.cache.read().await;
        cache
            .iter()
            .filter(|(_, path)| {
                if !include_retired && path.metadata.status == PathStatus::Retired {
                    return false;
                }
                if let Some(status) = status {
                    if path.metadata.status != status {
                        return false;
                    }
                }
                if let Some(category) = category {
                    if path.metadata.category != category {
                        return false;
                    }
                }
                true
            })
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect()
    }

    /// All paths belonging to one strategy. Linear scan of the cache.
    pub async fn by_strategy(&self, strategy_id: &str) -> Vec<EnhancedPath> {
        let cache = self.cache.read().await;
        cache
            .values()
            .filter(|path| path.strategy_id == strategy_id)
            .cloned()
            .collect()
    }

    /// Fold one usage outcome into a path's statistics and persist.
    ///
    /// Success multiplies the effectiveness score by 1.05 (capped at 1.0),
    /// failure by 0.95 (floored at 0.1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub async fn update_performance(
        &self,
        path_id: &str,
        success: bool,
        execution_time_secs: f64,
        rating: Option<f64>,
    ) -> Result<()> {
        let mut cache = self.cache.write().await;
        let path = cache
            .get_mut(path_id)
            .ok_or_else(|| Error::PathNotFound(path_id.to_string()))?;

        path.record_usage(success, execution_time_secs, rating);
        path.effectiveness_score = if success {
            (path.effectiveness_score * 1.05).min(1.0)
        } else {
            (path.effectiveness_score * 0.95).max(0.1)
        };

        let snapshot = path.clone();
        self.store.persist(&snapshot).await?;

        self.stats.lock().total_usages += 1;

        debug!(
            path_id,
            success_rate = snapshot.metadata.success_rate,
            effectiveness = snapshot.effectiveness_score,
            "updated path performance"
        );
        Ok(())
    }

    /// Recommend up to `max` active paths with effectiveness at or above
    /// `min_effectiveness`, best first.
    pub async fn recommend(
        &self,
        context: Option<&RecommendContext>,
        max: usize,
        min_effectiveness: f64,
    ) -> Vec<EnhancedPath> {
        let scored: Vec<(f64, EnhancedPath)> = {
            let cache = self.cache.read().await;
            cache
                .values()
                .filter(|path| {
                    path.metadata.status == PathStatus::Active
                        && path.effectiveness_score >= min_effectiveness
                })
                .map(|path| (recommend::recommendation_score(path, context), path.clone()))
                .collect()
        };

        let mut ranked = recommend::rank(scored);
        ranked.truncate(max);

        debug!(recommended = ranked.len(), "path recommendation complete");
        ranked
    }

    /// Learn new experimental paths from an exploration's thinking seeds.
    ///
    /// Seeds with empty content and seeds whose derived id already exists are
    /// skipped silently. Returns the ids of the newly added paths.
    #[instrument(skip(self, result), fields(exploration_id = %result.exploration_id))]
    pub async fn learn_from_exploration(
        &self,
        result: &ExplorationResult,
        source: &str,
    ) -> Vec<String> {
        let mut new_ids = Vec::new();

        for seed in &result.generated_seeds {
            let Some(path) = learning::path_from_seed(seed, source) else {
                continue;
            };
            match self.add(path.clone()).await {
                Ok(()) => new_ids.push(path.path_id),
                Err(Error::DuplicateId(_)) => {
                    debug!(path_id = %path.path_id, "seed already learned, skipping");
                }
                Err(e) => {
                    warn!(path_id = %path.path_id, error = %e, "failed to persist learned path");
                }
            }
        }

        info!(learned = new_ids.len(), source, "learned paths from exploration");
        new_ids
    }

    /// Back the underlying store up to `dest`.
    pub async fn backup(&self, dest: &Path) -> Result<()> {
        self.store.backup(dest).await
    }

    /// Migrate a static template set into the library.
    ///
    /// Idempotent on `path_id`: templates already present are skipped.
    /// Returns the number of migrated paths.
    pub async fn migrate_from_templates(
        &self,
        templates: &HashMap<String, ReasoningPath>,
    ) -> usize {
        let mut migrated = 0;

        info!(templates = templates.len(), "migrating static templates");
        for (template_id, template) in templates {
            let exists = {
                let cache = self.cache.read().await;
                cache.contains_key(&template.path_id)
            };
            if exists {
                continue;
            }

            let now = chrono::Utc::now();
            let path = EnhancedPath {
                path_id: template.path_id.clone(),
                path_type: template.path_type.clone(),
                description: template.description.clone(),
                prompt_template: template.prompt_template.clone(),
                strategy_id: if template.strategy_id.is_empty() {
                    template_id.clone()
                } else {
                    template.strategy_id.clone()
                },
                instance_id: if template.instance_id.is_empty() {
                    template.path_id.clone()
                } else {
                    template.instance_id.clone()
                },
                metadata: PathMetadata {
                    created_at: now,
                    updated_at: now,
                    author: "legacy_migration".to_string(),
                    category: infer_category(&template.path_type),
                    status: PathStatus::Active,
                    tags: vec!["legacy".to_string(), "migrated".to_string()],
                    keywords: extract_keywords(&template.description),
                    ..PathMetadata::default()
                },
                is_learned: false,
                learning_source: "static_template".to_string(),
                effectiveness_score: 0.6,
            };

            match self.add(path).await {
                Ok(()) => migrated += 1,
                Err(e) => warn!(%template_id, error = %e, "template migration failed"),
            }
        }

        info!(migrated, "template migration complete");
        migrated
    }

    /// Current library statistics.
    pub async fn stats(&self) -> LibraryStats {
        self.recount_stats().await;
        self.stats.lock().clone()
    }

    /// Number of stored paths.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Whether the library is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    async fn recount_stats(&self) {
        let cache = self.cache.read().await;
        let mut stats = self.stats.lock();
        stats.total_paths = cache.len();
        stats.active_paths = cache
            .values()
            .filter(|p| p.metadata.status == PathStatus::Active)
            .count();
        stats.learned_paths = cache.values().filter(|p| p.is_learned).count();
        stats.total_usages = cache.values().map(|p| p.metadata.usage_count).sum();
    }
}

/// Infer a category from a free-form path type label.
fn infer_category(path_type: &str) -> PathCategory {
    let lower = path_type.to_lowercase();
    if lower.contains("creativ") || lower.contains("innovat") {
        PathCategory::Creative
    } else if lower.contains("critic") || lower.contains("skeptic") {
        PathCategory::Critical
    } else if lower.contains("practic") || lower.contains("pragmat") {
        PathCategory::Practical
    } else if lower.contains("collaborat") {
        PathCategory::Collaborative
    } else if lower.contains("adapt") || lower.contains("flexib") {
        PathCategory::Adaptive
    } else if lower.contains("systematic") {
        PathCategory::Systematic
    } else {
        PathCategory::Analytical
    }
}

/// Pull up to five coarse keywords out of a description.
fn extract_keywords(description: &str) -> Vec<String> {
    description
        .split_whitespace()
        .filter(|word| word.len() > 3)
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .take(5)
        .collect()
}
