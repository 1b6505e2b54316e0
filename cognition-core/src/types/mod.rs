//! Common types used across the cognitive scheduler core.

mod config;
mod enums;
mod paths;
mod retro;
mod structs;


pub use config::{
    AssimilationConfig, CognitiveTaskConfig, DualTrackConfig, ExplorationScheduleConfig,
    ExplorerConfig, IdeationConfig, IdleDetectionConfig, LibraryConfig, QualityControlConfig,
    RetrospectionConfig, SchedulerConfig, TaskSelectionConfig,
};
pub use enums::{
    CognitiveMode, ComplexityLevel, CreativityLevel, ExplorationMode, ExplorationStrategy,
    GenerationMode, GoalStatus, JobKind, KnowledgeQuality, PathCategory, PathStatus,
    RetrospectionStrategy, RewardSource, SourceType, StorageBackendKind, TargetKind, TaskPhase,
    TriggerReason,
};
pub use paths::{EnhancedPath, PathMetadata, ReasoningPath, RecommendContext};
pub use retro::{
    AssimilationOrigin, Dimension, ExecutionContext, Insights, MabUpdate, ParameterPattern,
    RetrospectionResult, RetrospectionStatus, RetrospectionTask, TaskCharacteristics,
    ToolErrorCategory, ToolFailureAnalysis, ToolReview, ToolReviewStatus, ToolUsagePatterns,
};
pub use structs::{
    CognitiveJob, ConversationTurn, CrossDomainInsight, ExplorationResult, ExplorationTarget,
    GenerationContext, JobContext, KnowledgeItem, RawFinding, SeedOrigin, ThinkingSeed, ToolCall,
    ToolResult, Trend,
};
