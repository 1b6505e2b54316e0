use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::enums::{
    CreativityLevel, ExplorationMode, ExplorationStrategy, JobKind, KnowledgeQuality, SourceType,
    TargetKind, TaskPhase, TriggerReason,
};

// ============================================================================
// Conversation history (consumed, read-only)
// ============================================================================

/// A single tool invocation recorded inside a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the invoked tool
    pub tool_name: String,
    /// Parameters passed to the tool, keyed by parameter name
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    /// Whether the call succeeded
    pub success: bool,
}

impl ToolCall {
    /// Convenience constructor for a parameterless call.
    #[must_use]
    pub fn new(tool_name: impl Into<String>, success: bool) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters: serde_json::Map::new(),
            success,
        }
    }
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One completed interaction of the host agent.
///
/// Owned by the state store; the core reads turns but never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub turn_id: String,
    pub user_input: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub phase: TaskPhase,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Identifiers of MAB decisions taken during the turn
    #[serde(default)]
    pub mab_decisions: Vec<String>,
    /// Wall-clock execution time, when the host recorded one
    #[serde(default)]
    pub execution_time: Option<Duration>,
}

// ============================================================================
// Cognitive jobs
// ============================================================================

/// Context payload of a cognitive job, one variant per job kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobContext {
    Retrospection {
        trigger: TriggerReason,
    },
    Ideation {
        trigger: TriggerReason,
    },
    Synthesis {
        /// How many recent cognitive results the synthesis should consider
        recent_results: usize,
    },
    Exploration {
        mode: ExplorationMode,
        trigger: TriggerReason,
        #[serde(default)]
        user_query: Option<String>,
        /// Free-form context supplied by the caller of a user-directed run
        #[serde(default)]
        user_context: Option<serde_json::Value>,
        /// Candidate strategies, in preference order
        #[serde(default)]
        strategies: Vec<ExplorationStrategy>,
    },
}

/// A unit of background work owned by the scheduler.
///
/// Created by the scheduler, consumed exactly once by one worker, then
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveJob {
    pub job_id: String,
    pub kind: JobKind,
    /// 1..=10, 10 highest
    pub priority: u8,
    pub context: JobContext,
    pub created_at: DateTime<Utc>,
    pub estimated_duration: Duration,
}

impl CognitiveJob {
    /// Create a job with a fresh time-derived id.
    #[must_use]
    pub fn new(kind: JobKind, priority: u8, context: JobContext, estimated: Duration) -> Self {
        Self {
            job_id: crate::util::timed_id(&kind.to_string()),
            kind,
            priority,
            context,
            created_at: Utc::now(),
            estimated_duration: estimated,
        }
    }

    /// Exploration mode of this job, if it is an exploration.
    #[must_use]
    pub fn exploration_mode(&self) -> Option<ExplorationMode> {
        match &self.context {
            JobContext::Exploration { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

// ============================================================================
// Exploration data model
// ============================================================================

/// A direction the explorer should investigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationTarget {
    pub target_id: String,
    pub kind: TargetKind,
    pub description: String,
    pub keywords: Vec<String>,
    /// 0..=1, 1 highest
    pub priority: f64,
    /// Exploration depth level
    pub depth: u32,
    pub mode: ExplorationMode,
    /// The originating user query, for user-directed targets
    #[serde(default)]
    pub user_query: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A raw piece of collected information, before evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFinding {
    pub content: String,
    pub title: String,
    pub url: String,
    pub source_type: SourceType,
    /// The search query that produced this finding
    pub query: String,
    /// The target this finding was collected for
    pub target_id: String,
    pub collected_at: DateTime<Utc>,
}

/// An evaluated, immutable piece of discovered knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Content-hash derived id
    pub knowledge_id: String,
    pub content: String,
    pub source: String,
    pub source_type: SourceType,
    pub quality: KnowledgeQuality,
    /// 0..=1
    pub confidence: f64,
    /// 0..=1
    pub relevance: f64,
    /// 0..=1
    pub novelty: f64,
    pub tags: Vec<String>,
    /// Ids of concepts and targets this item relates to
    pub related_concepts: Vec<String>,
    pub discovered_at: DateTime<Utc>,
}

impl KnowledgeItem {
    /// Weighted overall score used for quality bucketing and reporting.
    #[must_use]
    pub fn overall_score(&self) -> f64 {
        0.4 * self.confidence + 0.4 * self.relevance + 0.2 * self.novelty
    }

    /// Unweighted mean of the three scores, used for seed ranking.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        (self.confidence + self.relevance + self.novelty) / 3.0
    }
}

/// What produced a thinking seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOrigin {
    SingleKnowledgeItem,
    KnowledgeFusion,
}

/// Provenance attached to a generated thinking seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub strategy: ExplorationStrategy,
    pub origin: SeedOrigin,
    /// Targets whose findings contributed to this seed
    pub related_targets: Vec<String>,
    #[serde(default)]
    pub source_quality: Option<KnowledgeQuality>,
}

/// A short textual prompt derived from discovered knowledge, used to
/// nucleate new reasoning paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingSeed {
    pub seed_id: String,
    pub content: String,
    /// Ids of the knowledge items this seed was distilled from (never empty)
    pub source_knowledge: Vec<String>,
    pub creativity_level: CreativityLevel,
    /// 0..=1
    pub confidence: f64,
    pub suggested_paths: Vec<String>,
    pub cross_domain_connections: Vec<String>,
    pub potential_applications: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub context: GenerationContext,
}

/// A keyword trend surfaced from a batch of knowledge items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub trend_id: String,
    pub keyword: String,
    pub confidence: f64,
    /// Knowledge item ids whose content mentions the keyword
    pub supporting_knowledge: Vec<String>,
    pub identified_at: DateTime<Utc>,
}

/// A cross-domain connection discovered from a fusion seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossDomainInsight {
    pub insight_id: String,
    pub description: String,
    pub supporting_seeds: Vec<String>,
    pub confidence: f64,
    pub discovered_at: DateTime<Utc>,
}

/// Complete output of one exploration pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationResult {
    pub exploration_id: String,
    pub strategy: ExplorationStrategy,
    pub targets: Vec<ExplorationTarget>,
    pub discovered_knowledge: Vec<KnowledgeItem>,
    pub generated_seeds: Vec<ThinkingSeed>,
    pub identified_trends: Vec<Trend>,
    pub cross_domain_insights: Vec<CrossDomainInsight>,
    pub execution_time: Duration,
    /// Fraction of targets that produced at least one knowledge item or seed
    pub success_rate: f64,
    /// Mean overall score across surviving knowledge items
    pub quality_score: f64,
    pub timestamp: DateTime<Utc>,
    /// Set when the pipeline degraded instead of completing
    #[serde(default)]
    pub error: Option<String>,
}
