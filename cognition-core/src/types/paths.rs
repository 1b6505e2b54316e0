//! Reasoning-path records and their performance metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ComplexityLevel, PathCategory, PathStatus};

/// A reasoning-path template as produced by the host path generator.
///
/// The library wraps these into [`EnhancedPath`] records before storing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPath {
    pub path_id: String,
    pub path_type: String,
    pub description: String,
    /// Template with `{task}` and `{thinking_seed}` slots
    pub prompt_template: String,
    #[serde(default)]
    pub strategy_id: String,
    #[serde(default)]
    pub instance_id: String,
    /// Generator confidence, used to filter weak creative paths
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

/// Performance and classification metadata tracked per stored path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
    pub author: String,
    pub category: PathCategory,
    pub status: PathStatus,

    // Usage statistics
    pub usage_count: u64,
    /// Total successes / total uses, always in [0, 1]
    pub success_rate: f64,
    /// Rolling mean of provided ratings
    pub average_rating: f64,
    /// Accumulated execution time in seconds
    pub total_execution_time: f64,

    // Classification
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub complexity_level: ComplexityLevel,
}

impl Default for PathMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            version: "1.0.0".to_string(),
            author: "system".to_string(),
            category: PathCategory::Analytical,
            status: PathStatus::Active,
            usage_count: 0,
            success_rate: 0.0,
            average_rating: 0.0,
            total_execution_time: 0.0,
            tags: Vec::new(),
            keywords: Vec::new(),
            complexity_level: ComplexityLevel::Medium,
        }
    }
}

/// A reasoning path as stored in the library, with full metadata and a
/// learnable effectiveness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedPath {
    pub path_id: String,
    pub path_type: String,
    pub description: String,
    pub prompt_template: String,
    #[serde(default)]
    pub strategy_id: String,
    #[serde(default)]
    pub instance_id: String,
    pub metadata: PathMetadata,
    /// Whether the path was learned (from exploration) rather than authored
    #[serde(default)]
    pub is_learned: bool,
    #[serde(default)]
    pub learning_source: String,
    /// Running effectiveness metric in [0.1, 1.0], updated multiplicatively
    pub effectiveness_score: f64,
}

impl EnhancedPath {
    /// Wrap a generator path into a stored record with default metadata.
    #[must_use]
    pub fn from_reasoning_path(path: ReasoningPath) -> Self {
        Self {
            path_id: path.path_id,
            path_type: path.path_type,
            description: path.description,
            prompt_template: path.prompt_template,
            strategy_id: path.strategy_id,
            instance_id: path.instance_id,
            metadata: PathMetadata {
                author: "path_generator".to_string(),
                ..PathMetadata::default()
            },
            is_learned: false,
            learning_source: String::new(),
            effectiveness_score: 0.5,
        }
    }

    /// Strip back down to the plain generator representation.
    #[must_use]
    pub fn to_reasoning_path(&self) -> ReasoningPath {
        ReasoningPath {
            path_id: self.path_id.clone(),
            path_type: self.path_type.clone(),
            description: self.description.clone(),
            prompt_template: self.prompt_template.clone(),
            strategy_id: self.strategy_id.clone(),
            instance_id: self.instance_id.clone(),
            confidence: self.effectiveness_score,
        }
    }

    /// Fold one usage outcome into the rolling statistics.
    ///
    /// `success_rate` stays an exact successes/uses ratio; `average_rating`
    /// only moves when a rating is provided. Does not touch
    /// `effectiveness_score` — the library applies the multiplicative update
    /// separately.
    pub fn record_usage(&mut self, success: bool, execution_time_secs: f64, rating: Option<f64>) {
        let prior_uses = self.metadata.usage_count as f64;
        self.metadata.usage_count += 1;

        let total_successes =
            self.metadata.success_rate * prior_uses + if success { 1.0 } else { 0.0 };
        self.metadata.success_rate = total_successes / self.metadata.usage_count as f64;

        self.metadata.total_execution_time += execution_time_secs;

        if let Some(rating) = rating {
            if self.metadata.usage_count == 1 {
                self.metadata.average_rating = rating;
            } else {
                let total_rating = self.metadata.average_rating * prior_uses + rating;
                self.metadata.average_rating = total_rating / self.metadata.usage_count as f64;
            }
        }

        self.metadata.updated_at = Utc::now();
    }
}

/// Optional task context used to boost contextually matching paths during
/// recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendContext {
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub complexity: Option<ComplexityLevel>,
    #[serde(default)]
    pub tags: Vec<String>,
}
