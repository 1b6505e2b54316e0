use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Operating mode of the cognitive scheduler.
///
/// The scheduler starts task-driven and flips into cognitive-idle when the
/// host agent goes quiet; the deeper modes annotate what the background
/// workers are currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveMode {
    /// Normal operation: the host agent is working on an external task.
    TaskDriven,
    /// The agent is idle and shallow background thinking is allowed.
    CognitiveIdle,
    /// A retrospection job is replaying a historical turn in depth.
    DeepReflection,
    /// An ideation job is generating creative solution angles.
    CreativeIdeation,
    /// An exploration job is querying external information sources.
    KnowledgeExploration,
}

impl std::fmt::Display for CognitiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CognitiveMode::TaskDriven => write!(f, "task_driven"),
            CognitiveMode::CognitiveIdle => write!(f, "cognitive_idle"),
            CognitiveMode::DeepReflection => write!(f, "deep_reflection"),
            CognitiveMode::CreativeIdeation => write!(f, "creative_ideation"),
            CognitiveMode::KnowledgeExploration => write!(f, "knowledge_exploration"),
        }
    }
}

/// Kind of background work a cognitive job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Replay a historical turn and extract strategies
    Retrospection,
    /// Generate new creative solution angles
    Ideation,
    /// Consolidate recent cognitive results into meta-insights
    Synthesis,
    /// Gather and evaluate external knowledge
    Exploration,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Retrospection => write!(f, "retrospection"),
            JobKind::Ideation => write!(f, "ideation"),
            JobKind::Synthesis => write!(f, "synthesis"),
            JobKind::Exploration => write!(f, "exploration"),
        }
    }
}

/// Why a cognitive job was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// The idle detector noticed a quiet period
    IdleDetection,
    /// Periodic ideation interval elapsed
    PeriodicIdeation,
    /// Periodic autonomous exploration interval elapsed
    ProactiveExploration,
    /// Enough cognitive results accumulated for synthesis
    KnowledgeAccumulation,
    /// An external caller asked for a user-directed exploration
    UserInstruction,
    /// A failure analysis was requested explicitly
    FailureAnalysis,
    /// A performance review was requested explicitly
    PerformanceReview,
}

/// Whether an exploration serves a user instruction or the agent's own
/// curiosity. The two tracks get different priorities and worker capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationMode {
    UserDirected,
    Autonomous,
}

/// Exploration strategies (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationStrategy {
    /// Broaden knowledge around already-known domains
    DomainExpansion,
    /// Track recent developments and trajectories
    TrendMonitoring,
    /// Find blind spots in the current knowledge base
    GapAnalysis,
    /// Transfer ideas between unrelated fields
    CrossDomainLearning,
    /// Maximize search diversity hoping for lucky finds
    SerendipityDiscovery,
    /// Pull authoritative, expert-grade material
    ExpertKnowledge,
    /// Compare alternatives and competitive positioning
    CompetitiveIntelligence,
}

impl std::fmt::Display for ExplorationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplorationStrategy::DomainExpansion => write!(f, "domain_expansion"),
            ExplorationStrategy::TrendMonitoring => write!(f, "trend_monitoring"),
            ExplorationStrategy::GapAnalysis => write!(f, "gap_analysis"),
            ExplorationStrategy::CrossDomainLearning => write!(f, "cross_domain_learning"),
            ExplorationStrategy::SerendipityDiscovery => write!(f, "serendipity_discovery"),
            ExplorationStrategy::ExpertKnowledge => write!(f, "expert_knowledge"),
            ExplorationStrategy::CompetitiveIntelligence => {
                write!(f, "competitive_intelligence")
            }
        }
    }
}

impl std::str::FromStr for ExplorationStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "domain_expansion" => Ok(ExplorationStrategy::DomainExpansion),
            "trend_monitoring" => Ok(ExplorationStrategy::TrendMonitoring),
            "gap_analysis" => Ok(ExplorationStrategy::GapAnalysis),
            "cross_domain_learning" => Ok(ExplorationStrategy::CrossDomainLearning),
            "serendipity_discovery" => Ok(ExplorationStrategy::SerendipityDiscovery),
            "expert_knowledge" => Ok(ExplorationStrategy::ExpertKnowledge),
            "competitive_intelligence" => Ok(ExplorationStrategy::CompetitiveIntelligence),
            _ => Err(format!("Unknown ExplorationStrategy: {s}")),
        }
    }
}

/// Strategies for picking which historical turn to retrospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrospectionStrategy {
    /// Uniform random pick from the candidate pool
    RandomSampling,
    /// Prefer turns that failed; fall back to random
    FailureFocused,
    /// Pick the most complex turn
    ComplexityBased,
    /// Placeholder for a future rating signal; behaves like failure-focused
    LowSatisfaction,
    /// Prefer turns with a failing tool call; fall back to random
    ToolFailure,
    /// Pick the most recent turn
    RecentTasks,
}

impl std::fmt::Display for RetrospectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrospectionStrategy::RandomSampling => write!(f, "random_sampling"),
            RetrospectionStrategy::FailureFocused => write!(f, "failure_focused"),
            RetrospectionStrategy::ComplexityBased => write!(f, "complexity_based"),
            RetrospectionStrategy::LowSatisfaction => write!(f, "low_satisfaction"),
            RetrospectionStrategy::ToolFailure => write!(f, "tool_failure"),
            RetrospectionStrategy::RecentTasks => write!(f, "recent_tasks"),
        }
    }
}

impl std::str::FromStr for RetrospectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "random_sampling" => Ok(RetrospectionStrategy::RandomSampling),
            "failure_focused" => Ok(RetrospectionStrategy::FailureFocused),
            "complexity_based" => Ok(RetrospectionStrategy::ComplexityBased),
            "low_satisfaction" => Ok(RetrospectionStrategy::LowSatisfaction),
            "tool_failure" => Ok(RetrospectionStrategy::ToolFailure),
            "recent_tasks" => Ok(RetrospectionStrategy::RecentTasks),
            _ => Err(format!("Unknown RetrospectionStrategy: {s}")),
        }
    }
}

/// Closed category set for reasoning paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCategory {
    Analytical,
    Creative,
    Critical,
    Practical,
    Collaborative,
    Adaptive,
    Systematic,
    Intuitive,
    Strategic,
    Experimental,
}

impl std::fmt::Display for PathCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PathCategory::Analytical => "analytical",
            PathCategory::Creative => "creative",
            PathCategory::Critical => "critical",
            PathCategory::Practical => "practical",
            PathCategory::Collaborative => "collaborative",
            PathCategory::Adaptive => "adaptive",
            PathCategory::Systematic => "systematic",
            PathCategory::Intuitive => "intuitive",
            PathCategory::Strategic => "strategic",
            PathCategory::Experimental => "experimental",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a reasoning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    /// In normal rotation
    Active,
    /// Newly learned, not yet proven
    Experimental,
    /// Kept for history but discouraged
    Deprecated,
    /// Never returned by recommendation unless explicitly requested
    Retired,
}

/// Quality band for a discovered knowledge item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeQuality {
    Unreliable,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl KnowledgeQuality {
    /// Bucket an overall score (weighted mix of confidence, relevance and
    /// novelty) into a quality band.
    #[must_use]
    pub fn from_overall_score(score: f64) -> Self {
        if score >= 0.8 {
            KnowledgeQuality::Excellent
        } else if score >= 0.6 {
            KnowledgeQuality::Good
        } else if score >= 0.4 {
            KnowledgeQuality::Fair
        } else if score >= 0.2 {
            KnowledgeQuality::Poor
        } else {
            KnowledgeQuality::Unreliable
        }
    }
}

/// How creative a thinking seed or dimension is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativityLevel {
    Low,
    Medium,
    High,
}

/// Complexity band used for context matching against paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

/// Where a piece of raw information came from.
///
/// Drives the fixed credibility component of knowledge evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    WebSearch,
    ApiCall,
    Database,
    AcademicPaper,
    ExpertSystem,
    Unknown,
}

impl SourceType {
    /// Fixed credibility of the source, used as the confidence component.
    #[must_use]
    pub fn credibility(self) -> f64 {
        match self {
            SourceType::AcademicPaper => 0.9,
            SourceType::ExpertSystem => 0.8,
            SourceType::Database => 0.7,
            SourceType::WebSearch | SourceType::ApiCall => 0.6,
            SourceType::Unknown => 0.3,
        }
    }
}

/// Phase of the host agent's task lifecycle, as reported by the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    Initialization,
    Planning,
    Execution,
    Verification,
    Completion,
}

impl std::fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskPhase::Initialization => "initialization",
            TaskPhase::Planning => "planning",
            TaskPhase::Execution => "execution",
            TaskPhase::Verification => "verification",
            TaskPhase::Completion => "completion",
        };
        write!(f, "{s}")
    }
}

/// Status of the host agent's current goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    InProgress,
    Achieved,
    Failed,
}

/// Path generation mode for the host path generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Conventional path generation
    Normal,
    /// Deliberately non-traditional ("aha-moment") generation
    CreativeBypass,
}

/// Source tag attached to every MAB reward update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardSource {
    UserFeedback,
    Retrospection,
    ToolVerification,
    Exploration,
    Other(String),
}

impl std::fmt::Display for RewardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardSource::UserFeedback => write!(f, "user_feedback"),
            RewardSource::Retrospection => write!(f, "retrospection"),
            RewardSource::ToolVerification => write!(f, "tool_verification"),
            RewardSource::Exploration => write!(f, "exploration"),
            RewardSource::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// Role an exploration target plays inside a pipeline run.
///
/// User-directed explorations split the query into focus, context and
/// verification sub-targets; autonomous runs use the discovery kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    PrimaryFocus,
    ContextualExpansion,
    VerificationFocused,
    KnowledgeGapFilling,
    SerendipitousDiscovery,
    TrendMonitoring,
    General,
}

/// Storage backend selector for the path library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    /// In-memory only, used in tests
    Memory,
    /// Single JSON document, rewritten atomically
    Json,
    /// Embedded relational store (libSQL)
    Relational,
}
