// ============================================================================
// Configuration
// ============================================================================

use std::time::Duration;

use super::enums::{ExplorationStrategy, RetrospectionStrategy, StorageBackendKind};
use crate::error::{Error, Result};

/// Idle detection knobs.
#[derive(Debug, Clone)]
pub struct IdleDetectionConfig {
    /// How long the agent must be quiet before cognitive-idle mode starts
    pub min_idle_duration: Duration,
    /// Upper bound on one continuous idle period
    pub max_idle_duration: Duration,
    /// Grace period after a task completes before idleness may count
    pub task_completion_buffer: Duration,
    /// Supervisor tick interval
    pub check_interval: Duration,
}

impl Default for IdleDetectionConfig {
    fn default() -> Self {
        Self {
            min_idle_duration: Duration::from_secs(10),
            max_idle_duration: Duration::from_secs(300),
            task_completion_buffer: Duration::from_secs(5),
            check_interval: Duration::from_secs(2),
        }
    }
}

/// Cognitive job cadence and worker-pool sizing.
#[derive(Debug, Clone)]
pub struct CognitiveTaskConfig {
    pub retrospection_interval: Duration,
    pub ideation_interval: Duration,
    pub exploration_interval: Duration,
    /// Number of worker tasks
    pub max_concurrent_tasks: usize,
    /// Active jobs older than this are evicted from tracking
    pub task_timeout: Duration,
}

impl Default for CognitiveTaskConfig {
    fn default() -> Self {
        Self {
            retrospection_interval: Duration::from_secs(60),
            ideation_interval: Duration::from_secs(120),
            exploration_interval: Duration::from_secs(180),
            max_concurrent_tasks: 2,
            task_timeout: Duration::from_secs(180),
        }
    }
}

/// Balancing knobs for the two exploration tracks.
#[derive(Debug, Clone)]
pub struct DualTrackConfig {
    pub user_directed_priority: u8,
    pub autonomous_priority: u8,
    /// In-flight cap for user-directed exploration jobs
    pub max_concurrent_user_tasks: usize,
    /// In-flight cap for autonomous exploration jobs
    pub max_concurrent_autonomous: usize,
}

impl Default for DualTrackConfig {
    fn default() -> Self {
        Self {
            user_directed_priority: 10,
            autonomous_priority: 3,
            max_concurrent_user_tasks: 3,
            max_concurrent_autonomous: 1,
        }
    }
}

/// Scheduler-side exploration knobs.
#[derive(Debug, Clone)]
pub struct ExplorationScheduleConfig {
    pub max_exploration_depth: u32,
    pub enable_web_search: bool,
    /// Minimum quality for knowledge worth keeping
    pub knowledge_threshold: f64,
    pub exploration_timeout: Duration,
    /// User-directed runs get a tighter budget
    pub user_directed_timeout: Duration,
    pub dual_track: DualTrackConfig,
}

impl Default for ExplorationScheduleConfig {
    fn default() -> Self {
        Self {
            max_exploration_depth: 3,
            enable_web_search: true,
            knowledge_threshold: 0.7,
            exploration_timeout: Duration::from_secs(120),
            user_directed_timeout: Duration::from_secs(60),
            dual_track: DualTrackConfig::default(),
        }
    }
}

/// Top-level scheduler configuration.
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    pub idle_detection: IdleDetectionConfig,
    pub cognitive_tasks: CognitiveTaskConfig,
    pub knowledge_exploration: ExplorationScheduleConfig,
}

impl SchedulerConfig {
    /// Reject out-of-range numeric options at entry.
    pub fn validate(&self) -> Result<()> {
        if self.cognitive_tasks.max_concurrent_tasks == 0 {
            return Err(Error::Configuration(
                "max_concurrent_tasks must be at least 1".to_string(),
            ));
        }
        if self.idle_detection.check_interval.is_zero() {
            return Err(Error::Configuration(
                "check_interval must be positive".to_string(),
            ));
        }
        let dual = &self.knowledge_exploration.dual_track;
        for (name, priority) in [
            ("user_directed_priority", dual.user_directed_priority),
            ("autonomous_priority", dual.autonomous_priority),
        ] {
            if !(1..=10).contains(&priority) {
                return Err(Error::Configuration(format!(
                    "{name} must be in 1..=10, got {priority}"
                )));
            }
        }
        Ok(())
    }
}

/// Task selection knobs for the retrospection engine.
#[derive(Debug, Clone)]
pub struct TaskSelectionConfig {
    pub default_strategy: RetrospectionStrategy,
    /// Candidates must be older than this
    pub min_task_age: Duration,
    /// Candidates must be younger than this
    pub max_task_age: Duration,
    /// Priority-score weighting for failed turns
    pub failure_priority_boost: f64,
    pub max_tasks_per_session: usize,
}

impl Default for TaskSelectionConfig {
    fn default() -> Self {
        Self {
            default_strategy: RetrospectionStrategy::RandomSampling,
            min_task_age: Duration::from_secs(60),
            max_task_age: Duration::from_secs(24 * 3600),
            failure_priority_boost: 2.0,
            max_tasks_per_session: 5,
        }
    }
}

/// Ideation stage knobs.
#[derive(Debug, Clone)]
pub struct IdeationConfig {
    pub enable_llm_dimensions: bool,
    pub enable_aha_moment: bool,
    pub max_new_dimensions: usize,
    pub max_creative_paths: usize,
    pub creative_prompt_temperature: f64,
    /// Creative paths below this confidence are dropped
    pub min_path_confidence: f64,
}

impl Default for IdeationConfig {
    fn default() -> Self {
        Self {
            enable_llm_dimensions: true,
            enable_aha_moment: true,
            max_new_dimensions: 3,
            max_creative_paths: 4,
            creative_prompt_temperature: 0.8,
            min_path_confidence: 0.3,
        }
    }
}

/// Assimilation stage knobs.
#[derive(Debug, Clone)]
pub struct AssimilationConfig {
    pub enable_mab_injection: bool,
    pub initial_exploration_reward: f64,
    /// Multiplier applied to the reward of creative-bypass paths
    pub aha_reward_bonus: f64,
}

impl Default for AssimilationConfig {
    fn default() -> Self {
        Self {
            enable_mab_injection: true,
            initial_exploration_reward: 0.1,
            aha_reward_bonus: 1.2,
        }
    }
}

/// Retrospection engine configuration.
#[derive(Debug, Clone, Default)]
pub struct RetrospectionConfig {
    pub task_selection: TaskSelectionConfig,
    pub ideation: IdeationConfig,
    pub assimilation: AssimilationConfig,
}

impl RetrospectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ideation.min_path_confidence < 0.0 || self.ideation.min_path_confidence > 1.0 {
            return Err(Error::Configuration(
                "min_path_confidence must be in [0, 1]".to_string(),
            ));
        }
        if self.assimilation.initial_exploration_reward < 0.0 {
            return Err(Error::Configuration(
                "initial_exploration_reward must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Quality filter thresholds for evaluated knowledge.
#[derive(Debug, Clone)]
pub struct QualityControlConfig {
    pub min_confidence_threshold: f64,
    pub min_relevance_threshold: f64,
}

impl Default for QualityControlConfig {
    fn default() -> Self {
        Self {
            min_confidence_threshold: 0.4,
            min_relevance_threshold: 0.3,
        }
    }
}

/// Knowledge explorer configuration.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub default_strategy: ExplorationStrategy,
    /// Gate on the web-search information source
    pub enable_web_search: bool,
    /// Targets explored per pipeline run
    pub max_parallel_explorations: usize,
    pub max_results_per_source: usize,
    pub max_seeds_per_exploration: usize,
    pub quality: QualityControlConfig,
    /// Semantic analysis results below this confidence are ignored
    pub semantic_confidence_threshold: f64,
    pub knowledge_cache_cap: usize,
    pub seed_cache_cap: usize,
    pub history_cap: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_strategy: ExplorationStrategy::DomainExpansion,
            enable_web_search: true,
            max_parallel_explorations: 3,
            max_results_per_source: 10,
            max_seeds_per_exploration: 5,
            quality: QualityControlConfig::default(),
            semantic_confidence_threshold: 0.7,
            knowledge_cache_cap: 500,
            seed_cache_cap: 300,
            history_cap: 100,
        }
    }
}

impl ExplorerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_explorations == 0 {
            return Err(Error::Configuration(
                "max_parallel_explorations must be at least 1".to_string(),
            ));
        }
        if self.max_seeds_per_exploration == 0 {
            return Err(Error::Configuration(
                "max_seeds_per_exploration must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path library configuration.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub storage_backend: StorageBackendKind,
    /// Storage location for the file and relational backends
    pub storage_path: Option<std::path::PathBuf>,
    pub cache_size: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackendKind::Memory,
            storage_path: None,
            cache_size: 1000,
        }
    }
}
