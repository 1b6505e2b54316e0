//! Traits for the collaborators the host agent provides.
//!
//! The core never implements these itself (outside of tests); the surrounding
//! agent supplies a state store, an LLM dimension creator, a path generator,
//! a MAB strategy store, and optionally a web-search client and a semantic
//! analyzer. Absent optional collaborators degrade behavior gracefully
//! instead of failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::types::{
    ConversationTurn, CreativityLevel, Dimension, GenerationMode, GoalStatus, ReasoningPath,
    RewardSource, TaskPhase,
};

// ============================================================================
// State store
// ============================================================================

/// Snapshot of the host agent's current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub current_phase: TaskPhase,
    pub goal_status: GoalStatus,
    pub total_turns: usize,
}

/// Change events emitted by the state store.
///
/// Delivery is lossy by design: the scheduler re-checks state on every tick,
/// so a dropped event only delays a transition by one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    TurnCompleted { success: bool },
    GoalProgress,
}

/// Read-only view of the host agent's state and history.
///
/// The core is a pure subscriber: it observes, it never mutates.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current phase and goal status.
    async fn current_state(&self) -> AgentState;

    /// Full conversation history, oldest first.
    async fn conversation_history(&self) -> Vec<ConversationTurn>;

    /// Subscribe to state-change events.
    fn subscribe(&self) -> broadcast::Receiver<StateEvent>;
}

// ============================================================================
// LLM dimension creator
// ============================================================================

/// Ideation mode passed to the dimension creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeationMode {
    Standard,
    /// Re-think an already-answered historical task from scratch
    RetrospectiveAnalysis,
}

/// Request for new solution dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRequest {
    /// Task description or retrospective prompt to ideate over
    pub task_description: String,
    pub num_dimensions: usize,
    pub creativity_level: CreativityLevel,
    pub mode: IdeationMode,
    /// Sampling temperature the creator should use
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// The original question, when re-thinking a historical turn
    #[serde(default)]
    pub original_task: Option<String>,
    /// The original answer, when re-thinking a historical turn
    #[serde(default)]
    pub original_response: Option<String>,
}

fn default_temperature() -> f64 {
    0.8
}

/// LLM-driven creator of alternative solution angles.
#[async_trait]
pub trait DimensionCreator: Send + Sync {
    async fn create_dimensions(&self, request: DimensionRequest) -> Result<Vec<Dimension>>;
}

// ============================================================================
// Path generator
// ============================================================================

/// Generator of reasoning paths from a thinking seed.
#[async_trait]
pub trait PathGenerator: Send + Sync {
    /// Generate up to `max_paths` paths for `task`, nucleated by
    /// `thinking_seed`. `GenerationMode::CreativeBypass` forces
    /// non-traditional paths.
    async fn generate_paths(
        &self,
        thinking_seed: &str,
        task: &str,
        max_paths: usize,
        mode: GenerationMode,
    ) -> Result<Vec<ReasoningPath>>;
}

// ============================================================================
// MAB strategy store
// ============================================================================

/// Multi-armed-bandit store accepting new strategy arms and reward updates.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Create the arm if absent. Returns `true` when a new arm was created.
    async fn ensure_arm(&self, strategy_id: &str, path_type: &str) -> Result<bool>;

    /// Apply one reward update, tagged with its source so the store can
    /// weight sources differently.
    async fn update_performance(
        &self,
        strategy_id: &str,
        success: bool,
        reward: f64,
        source: RewardSource,
    ) -> Result<()>;
}

// ============================================================================
// Web search (optional)
// ============================================================================

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub source: String,
}

/// External search client.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

// ============================================================================
// Semantic analyzer (optional)
// ============================================================================

/// Analysis task kinds the analyzer can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTask {
    IntentDetection,
    DomainClassification,
    KeywordExtraction,
}

/// User intent classes recognized for strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    SolutionSeeking,
    ComparisonAnalysis,
    TrendMonitoring,
    LearningRequest,
    ProblemDiagnosis,
    InformationSeeking,
}

/// Domain classes recognized for query templating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDomain {
    Technology,
    Business,
    Academic,
    Health,
    Education,
    General,
}

/// A classification with its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classified<T> {
    pub value: T,
    /// 0..=1
    pub confidence: f64,
}

/// Combined result of a semantic analysis batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    #[serde(default)]
    pub intent: Option<Classified<QueryIntent>>,
    #[serde(default)]
    pub domain: Option<Classified<QueryDomain>>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Batch semantic analyzer for query understanding.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, tasks: &[AnalysisTask]) -> Result<SemanticAnalysis>;
}
