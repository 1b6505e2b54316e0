//! Retrospection data model: selected tasks, ideation output, tool
//! post-mortem findings, and the combined result record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::enums::{CreativityLevel, RetrospectionStrategy, RewardSource, TaskPhase};
use super::paths::ReasoningPath;
use super::structs::ConversationTurn;

/// A historical turn selected for review, with selection provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrospectionTask {
    pub task_id: String,
    pub original_turn: ConversationTurn,
    pub selection_reason: String,
    pub strategy: RetrospectionStrategy,
    /// 0..=1
    pub complexity_score: f64,
    pub priority_score: f64,
    pub created_at: DateTime<Utc>,
}

/// An alternative solution angle proposed by the dimension creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub dimension_id: String,
    pub description: String,
    pub creativity_level: CreativityLevel,
    /// Free-form type label used when seeding a strategy arm
    #[serde(default)]
    pub dimension_type: String,
}

/// What kind of ideation output an assimilated strategy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssimilationOrigin {
    LlmDimension,
    CreativePath,
}

/// Record of one reward update pushed into the MAB store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MabUpdate {
    pub strategy_id: String,
    pub origin: AssimilationOrigin,
    pub reward: f64,
    pub source: RewardSource,
}

/// Turn-level characteristics extracted during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCharacteristics {
    pub complexity: f64,
    pub success: bool,
    /// Number of tool calls in the reviewed turn
    pub tool_usage: usize,
    pub mab_decisions: usize,
}

/// Execution context of the reviewed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub phase: TaskPhase,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Structured insights extracted from the reviewed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub task_characteristics: TaskCharacteristics,
    pub execution_context: ExecutionContext,
}

/// Parameter usage observed for one tool across a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterPattern {
    /// Union of parameter keys seen across calls, sorted
    pub param_keys: Vec<String>,
    /// Argument count of each call, in call order
    pub arg_counts: Vec<usize>,
}

/// Tool usage patterns of the reviewed turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolUsagePatterns {
    pub call_sequence: Vec<String>,
    pub sequence_length: usize,
    pub unique_tools: Vec<String>,
    /// unique tools / total calls
    pub tool_diversity: f64,
    pub tool_frequency: HashMap<String, usize>,
    pub most_used_tool: Option<(String, usize)>,
    /// Adjacent (predecessor, successor) pairs in call order
    pub tool_combinations: Vec<(String, String)>,
    pub parameter_patterns: HashMap<String, ParameterPattern>,
}

/// Error category inferred from a failure message by substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorCategory {
    Timeout,
    Permission,
    Parameter,
    Network,
    Other,
}

impl ToolErrorCategory {
    /// Categorize a raw error message.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") {
            ToolErrorCategory::Timeout
        } else if lower.contains("permission") {
            ToolErrorCategory::Permission
        } else if lower.contains("parameter") {
            ToolErrorCategory::Parameter
        } else if lower.contains("network") {
            ToolErrorCategory::Network
        } else {
            ToolErrorCategory::Other
        }
    }
}

/// Failure breakdown of the reviewed turn's tool calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolFailureAnalysis {
    pub failed_tools: Vec<String>,
    pub failure_rate_by_tool: HashMap<String, f64>,
    pub error_categories: HashMap<ToolErrorCategory, usize>,
    /// Observed failure sequences, e.g. consecutive failures
    pub failure_patterns: Vec<String>,
    /// First-call and last-call failures are flagged here
    pub critical_failures: Vec<String>,
}

/// Whether a tool post-mortem ran and over how many calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolReviewStatus {
    Completed,
    NoToolsUsed,
}

/// Complete tool post-mortem for one reviewed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReview {
    pub status: ToolReviewStatus,
    pub tools_analyzed: usize,
    pub usage_patterns: ToolUsagePatterns,
    pub success_factors: Vec<String>,
    pub failure_analysis: ToolFailureAnalysis,
    pub selection_insights: Vec<String>,
    pub optimization_suggestions: Vec<String>,
}

impl ToolReview {
    /// The review emitted for a turn without tool calls.
    #[must_use]
    pub fn no_tools() -> Self {
        Self {
            status: ToolReviewStatus::NoToolsUsed,
            tools_analyzed: 0,
            usage_patterns: ToolUsagePatterns::default(),
            success_factors: Vec::new(),
            failure_analysis: ToolFailureAnalysis::default(),
            selection_insights: vec!["turn used no tools".to_string()],
            optimization_suggestions: Vec::new(),
        }
    }
}

/// Terminal status of a retrospection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetrospectionStatus {
    Completed,
    NoSuitableTasks,
    Error { message: String },
}

/// Combined output of one Select → Ideate → Assimilate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrospectionResult {
    pub retrospection_id: String,
    pub status: RetrospectionStatus,
    /// None when no suitable task was found or the run errored
    pub task: Option<RetrospectionTask>,

    // Ideation output
    pub dimensions: Vec<Dimension>,
    pub creative_paths: Vec<ReasoningPath>,

    // Analysis output
    pub insights: Option<Insights>,
    pub success_patterns: Vec<String>,
    pub failure_causes: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub tool_review: Option<ToolReview>,

    // Assimilation output
    pub assimilated_strategies: Vec<String>,
    pub mab_updates: Vec<MabUpdate>,

    pub execution_time: Duration,
    pub timestamp: DateTime<Utc>,
}

impl RetrospectionResult {
    /// Empty result for a run that found nothing to review.
    #[must_use]
    pub fn no_suitable_tasks(retrospection_id: String, execution_time: Duration) -> Self {
        Self::terminal(
            retrospection_id,
            RetrospectionStatus::NoSuitableTasks,
            execution_time,
        )
    }

    /// Degraded result carrying the failure message.
    #[must_use]
    pub fn error(retrospection_id: String, message: String, execution_time: Duration) -> Self {
        Self::terminal(
            retrospection_id,
            RetrospectionStatus::Error { message },
            execution_time,
        )
    }

    fn terminal(
        retrospection_id: String,
        status: RetrospectionStatus,
        execution_time: Duration,
    ) -> Self {
        Self {
            retrospection_id,
            status,
            task: None,
            dimensions: Vec::new(),
            creative_paths: Vec::new(),
            insights: None,
            success_patterns: Vec::new(),
            failure_causes: Vec::new(),
            improvement_suggestions: Vec::new(),
            tool_review: None,
            assimilated_strategies: Vec::new(),
            mab_updates: Vec::new(),
            execution_time,
            timestamp: Utc::now(),
        }
    }
}
