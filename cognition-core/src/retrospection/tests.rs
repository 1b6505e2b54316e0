use super::*;
use crate::host::{AgentState, StateEvent, StateStore};
use crate::types::{
    ConversationTurn, GoalStatus, IdeationConfig, TaskPhase, TaskSelectionConfig, ToolCall,
};
use async_trait::async_trait;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::broadcast;

/// State store backed by a fixed turn list.
struct FixedState {
    turns: Vec<ConversationTurn>,
    sender: broadcast::Sender<StateEvent>,
}

impl FixedState {
    fn new(turns: Vec<ConversationTurn>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { turns, sender }
    }
}

#[async_trait]
impl StateStore for FixedState {
    async fn current_state(&self) -> AgentState {
        AgentState {
            current_phase: TaskPhase::Completion,
            goal_status: GoalStatus::Achieved,
            total_turns: self.turns.len(),
        }
    }

    async fn conversation_history(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.sender.subscribe()
    }
}

/// Dimension creator returning a fixed number of dimensions.
struct FixedDimensions {
    count: usize,
}

#[async_trait]
impl DimensionCreator for FixedDimensions {
    async fn create_dimensions(&self, request: DimensionRequest) -> crate::Result<Vec<Dimension>> {
        assert_eq!(request.mode, IdeationMode::RetrospectiveAnalysis);
        assert_eq!(request.creativity_level, CreativityLevel::High);
        Ok((0..self.count)
            .map(|i| Dimension {
                dimension_id: format!("dim_{i}"),
                description: format!("alternative angle {i}"),
                creativity_level: CreativityLevel::High,
                dimension_type: "inversion".to_string(),
            })
            .collect())
    }
}

/// Path generator returning paths with configurable confidences.
struct FixedPaths {
    confidences: Vec<f64>,
}

#[async_trait]
impl PathGenerator for FixedPaths {
    async fn generate_paths(
        &self,
        thinking_seed: &str,
        _task: &str,
        max_paths: usize,
        mode: GenerationMode,
    ) -> crate::Result<Vec<ReasoningPath>> {
        assert_eq!(mode, GenerationMode::CreativeBypass);
        assert!(thinking_seed.starts_with("find breakthrough, non-traditional solutions for:"));
        Ok(self
            .confidences
            .iter()
            .take(max_paths)
            .enumerate()
            .map(|(i, &confidence)| ReasoningPath {
                path_id: format!("aha_{i}"),
                path_type: "creative".to_string(),
                description: "bypass".to_string(),
                prompt_template: "{task} {thinking_seed}".to_string(),
                strategy_id: String::new(),
                instance_id: String::new(),
                confidence,
            })
            .collect())
    }
}

/// Strategy store that records every call.
#[derive(Default)]
struct RecordingStore {
    arms: SyncMutex<Vec<(String, String)>>,
    updates: SyncMutex<Vec<(String, f64, RewardSource)>>,
}

#[async_trait]
impl StrategyStore for RecordingStore {
    async fn ensure_arm(&self, strategy_id: &str, path_type: &str) -> crate::Result<bool> {
        self.arms
            .lock()
            .push((strategy_id.to_string(), path_type.to_string()));
        Ok(true)
    }

    async fn update_performance(
        &self,
        strategy_id: &str,
        success: bool,
        reward: f64,
        source: RewardSource,
    ) -> crate::Result<()> {
        assert!(success);
        self.updates
            .lock()
            .push((strategy_id.to_string(), reward, source));
        Ok(())
    }
}

fn reviewable_turn(id: &str, success: bool, tool_calls: Vec<ToolCall>) -> ConversationTurn {
    ConversationTurn {
        turn_id: id.to_string(),
        user_input: "implement a robust retry mechanism".to_string(),
        response: "used a fixed sleep loop".to_string(),
        timestamp: Utc::now() - chrono::Duration::seconds(600),
        success,
        phase: TaskPhase::Completion,
        tool_calls,
        tool_results: vec![],
        error_message: None,
        mab_decisions: vec![],
        execution_time: None,
    }
}

fn engine_with_all(
    dimensions: usize,
    confidences: Vec<f64>,
    store: Arc<RecordingStore>,
) -> RetrospectionEngine {
    let engine = RetrospectionEngine::new(RetrospectionConfig {
        ideation: IdeationConfig {
            max_new_dimensions: dimensions,
            max_creative_paths: confidences.len(),
            ..IdeationConfig::default()
        },
        ..RetrospectionConfig::default()
    })
    .unwrap()
    .with_dimension_creator(Arc::new(FixedDimensions { count: dimensions }));

    engine.set_dependencies(Some(Arc::new(FixedPaths { confidences })), Some(store));
    engine
}

#[tokio::test]
async fn test_empty_history_yields_no_suitable_tasks() {
    let engine = RetrospectionEngine::new(RetrospectionConfig::default()).unwrap();
    let state = FixedState::new(vec![]);

    let result = engine.perform_retrospection(&state, None, None).await;
    assert_eq!(result.status, RetrospectionStatus::NoSuitableTasks);
    assert!(result.task.is_none());
    assert!(result.dimensions.is_empty());
}

#[tokio::test]
async fn test_missing_collaborators_degrade_gracefully() {
    // No dimension creator, generator or store: selection and analysis still run
    let engine = RetrospectionEngine::new(RetrospectionConfig::default()).unwrap();
    let state = FixedState::new(vec![reviewable_turn(
        "t1",
        true,
        vec![ToolCall::new("grep", true)],
    )]);

    let result = engine.perform_retrospection(&state, None, None).await;
    assert_eq!(result.status, RetrospectionStatus::Completed);
    assert!(result.task.is_some());
    assert!(result.dimensions.is_empty());
    assert!(result.creative_paths.is_empty());
    assert!(result.assimilated_strategies.is_empty());
    assert!(result.tool_review.is_some());
    assert!(result.insights.is_some());
}

#[tokio::test]
async fn test_assimilation_rewards_and_sources() {
    // Two dimensions at reward 0.1 and one creative path at 0.12, all tagged
    // with the retrospection source.
    let store = Arc::new(RecordingStore::default());
    let engine = engine_with_all(2, vec![0.9], Arc::clone(&store));
    let state = FixedState::new(vec![reviewable_turn(
        "t1",
        false,
        vec![ToolCall::new("fetch", false), ToolCall::new("parse", false)],
    )]);

    let result = engine
        .perform_retrospection(&state, Some(RetrospectionStrategy::FailureFocused), None)
        .await;

    assert_eq!(result.status, RetrospectionStatus::Completed);
    assert_eq!(result.assimilated_strategies.len(), 3);
    assert_eq!(result.mab_updates.len(), 3);

    let updates = store.updates.lock();
    assert_eq!(updates.len(), 3);
    for (strategy_id, reward, source) in updates.iter() {
        assert_eq!(*source, RewardSource::Retrospection);
        if strategy_id.starts_with("retro_llm_") {
            assert!((reward - 0.1).abs() < 1e-9);
        } else {
            assert!((reward - 0.12).abs() < 1e-9);
        }
    }

    let dimension_updates = updates
        .iter()
        .filter(|(id, _, _)| id.starts_with("retro_llm_"))
        .count();
    assert_eq!(dimension_updates, 2);
}

#[tokio::test]
async fn test_low_confidence_creative_paths_are_filtered() {
    let store = Arc::new(RecordingStore::default());
    let engine = engine_with_all(0, vec![0.9, 0.2, 0.5], Arc::clone(&store));
    let state = FixedState::new(vec![reviewable_turn("t1", true, vec![])]);

    let result = engine.perform_retrospection(&state, None, None).await;
    assert_eq!(result.creative_paths.len(), 2);
    assert!(result
        .creative_paths
        .iter()
        .all(|path| path.confidence >= 0.3));
}

#[tokio::test]
async fn test_insights_tool_usage_matches_turn() {
    let engine = RetrospectionEngine::new(RetrospectionConfig::default()).unwrap();
    let calls = vec![
        ToolCall::new("read_file", true),
        ToolCall::new("grep", true),
        ToolCall::new("write", true),
    ];
    let state = FixedState::new(vec![reviewable_turn("t1", true, calls)]);

    let result = engine.perform_retrospection(&state, None, None).await;
    let insights = result.insights.unwrap();
    assert_eq!(insights.task_characteristics.tool_usage, 3);
}

#[tokio::test]
async fn test_target_task_id_selection() {
    let engine = RetrospectionEngine::new(RetrospectionConfig::default()).unwrap();
    let state = FixedState::new(vec![
        reviewable_turn("t1", true, vec![]),
        reviewable_turn("t2", false, vec![]),
    ]);

    let result = engine.perform_retrospection(&state, None, Some("t2")).await;
    assert_eq!(result.task.unwrap().task_id, "t2");

    let missing = engine
        .perform_retrospection(&state, None, Some("t999"))
        .await;
    assert!(matches!(
        missing.status,
        RetrospectionStatus::Error { .. }
    ));
}

#[tokio::test]
async fn test_too_recent_turns_are_not_selected() {
    let engine = RetrospectionEngine::new(RetrospectionConfig::default()).unwrap();
    let mut fresh = reviewable_turn("fresh", true, vec![]);
    fresh.timestamp = Utc::now();
    let state = FixedState::new(vec![fresh]);

    let result = engine.perform_retrospection(&state, None, None).await;
    assert_eq!(result.status, RetrospectionStatus::NoSuitableTasks);
}

#[tokio::test]
async fn test_stats_accumulate_across_runs() {
    let engine = RetrospectionEngine::new(RetrospectionConfig {
        task_selection: TaskSelectionConfig::default(),
        ..RetrospectionConfig::default()
    })
    .unwrap();
    let state = FixedState::new(vec![reviewable_turn("t1", true, vec![])]);

    engine.perform_retrospection(&state, None, None).await;
    engine.perform_retrospection(&state, None, None).await;

    let stats = engine.stats();
    assert_eq!(stats.total_retrospections, 2);
    assert_eq!(stats.total_tasks_analyzed, 2);
    assert!((stats.success_rate - 1.0).abs() < 1e-9);
    assert_eq!(engine.history_len(), 2);

    engine.clear_history();
    assert_eq!(engine.history_len(), 0);
}
