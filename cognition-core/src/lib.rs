#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

//! # Cognition Core
//!
//! Background "inner monologue" loop for task-driven AI agents.
//!
//! Between externally-driven tasks the scheduler detects idleness and runs
//! cognitive jobs: retrospection over past conversation turns, creative
//! ideation, external knowledge exploration, and knowledge synthesis. Results
//! feed a multi-armed-bandit strategy store and a persistent library of
//! reasoning-path templates, closing the learning loop.
//!
//! ## Core Concepts
//!
//! - **Cognitive jobs**: units of background work queued by priority
//! - **Retrospection**: Select → Ideate → Assimilate over one historical turn
//! - **Knowledge exploration**: Collect → Evaluate → Seed → Trend → Cross-domain
//! - **Thinking seeds**: short prompts distilled from discovered knowledge
//! - **Reasoning paths**: prompt templates with tracked performance
//!
//! ## Module Organization
//!
//! ### Primary APIs
//! - [`scheduler`]: idle detection, dual-track job queue, worker pool
//! - [`retrospection`]: three-stage retrospection pipeline with tool post-mortem
//! - [`explorer`]: five-stage knowledge exploration pipeline
//! - [`library`]: persistent, learnable reasoning-path store
//!
//! ### Support Modules
//! - [`types`]: common data structures and configuration
//! - [`host`]: traits for the collaborators the host agent provides
//! - [`telemetry`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use cognition_core::scheduler::CognitiveScheduler;
//! use cognition_core::types::SchedulerConfig;
//! use cognition_core::host::StateStore;
//! use std::sync::Arc;
//!
//! # async fn example(state: Arc<dyn StateStore>) -> cognition_core::Result<()> {
//! let scheduler = CognitiveScheduler::new(state, SchedulerConfig::default())?;
//! scheduler.start();
//!
//! // The agent keeps handling tasks; cognitive jobs run in the gaps.
//! scheduler.schedule_user_directed_exploration("latest AI trends", None);
//!
//! scheduler.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Learning Cycle
//!
//! 1. A task completes and the agent goes quiet
//! 2. The idle detector flips the scheduler into cognitive-idle mode
//! 3. Workers pull retrospection / ideation / exploration jobs
//! 4. New dimensions and creative paths become strategy arms in the MAB store
//! 5. Thinking seeds become experimental paths in the path library
//! 6. Path performance updates refine future recommendations
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T>`]; worker and supervisor loops never
//! propagate errors outward — degraded results carry an explicit status.

pub mod error;
pub mod explorer;
pub mod host;
pub mod library;
pub mod retrospection;
pub mod scheduler;
pub mod telemetry;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use error::{Error, Result};
pub use explorer::KnowledgeExplorer;
pub use host::{
    AgentState, AnalysisTask, DimensionCreator, DimensionRequest, PathGenerator, SearchClient,
    SearchHit, SemanticAnalysis, SemanticAnalyzer, StateEvent, StateStore, StrategyStore,
};
pub use library::{MemoryStore, PathLibrary, PathStore};
pub use retrospection::RetrospectionEngine;
pub use scheduler::CognitiveScheduler;
pub use types::{
    CognitiveJob, CognitiveMode, ConversationTurn, CreativityLevel, EnhancedPath,
    ExplorationResult, ExplorationStrategy, ExplorationTarget, ExplorerConfig, JobKind,
    KnowledgeItem, KnowledgeQuality, PathCategory, PathMetadata, PathStatus, ReasoningPath,
    RetrospectionConfig, RetrospectionResult, RetrospectionStrategy, SchedulerConfig,
    ThinkingSeed,
};
