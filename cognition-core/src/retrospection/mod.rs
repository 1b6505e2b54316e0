//! # Retrospection Engine
//!
//! Replays one historical conversation turn through the three-stage pipeline
//! **Select → Ideate → Assimilate**, plus a tool post-mortem.
//!
//! Select picks the turn most worth reviewing; Ideate asks the LLM dimension
//! creator for fresh solution angles and forces the path generator into
//! creative-bypass mode; Assimilate injects the new strategies into the MAB
//! store with small exploration rewards, closing the learning loop.
//!
//! The path generator and strategy store may be absent at construction and
//! injected later; without them the Ideate and Assimilate stages simply emit
//! nothing while selection and analysis still run. Errors never escape a
//! retrospection run — degraded results carry an explicit status.

mod insights;
mod select;
mod tool_review;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::host::{DimensionCreator, DimensionRequest, IdeationMode, PathGenerator, StateStore, StrategyStore};
use crate::types::{
    AssimilationOrigin, CreativityLevel, Dimension, GenerationMode, MabUpdate, ReasoningPath,
    RetrospectionConfig, RetrospectionResult, RetrospectionStatus, RetrospectionStrategy,
    RetrospectionTask, RewardSource,
};
use crate::util::{timed_id, truncate_chars};

/// Soft cap on retained retrospection results.
const HISTORY_CAP: usize = 100;

/// Aggregate engine statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrospectionStats {
    pub total_retrospections: u64,
    pub total_tasks_analyzed: u64,
    pub total_strategies_assimilated: u64,
    pub average_execution_time: Duration,
    /// Fraction of runs that selected a task and produced insights
    pub success_rate: f64,
}

/// Select → Ideate → Assimilate over historical conversation turns.
pub struct RetrospectionEngine {
    config: RetrospectionConfig,
    dimension_creator: RwLock<Option<Arc<dyn DimensionCreator>>>,
    path_generator: RwLock<Option<Arc<dyn PathGenerator>>>,
    strategy_store: RwLock<Option<Arc<dyn StrategyStore>>>,
    history: Mutex<Vec<RetrospectionResult>>,
    stats: Mutex<RetrospectionStats>,
}

impl RetrospectionEngine {
    /// Create an engine with no collaborators attached.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] for out-of-range options.
    pub fn new(config: RetrospectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dimension_creator: RwLock::new(None),
            path_generator: RwLock::new(None),
            strategy_store: RwLock::new(None),
            history: Mutex::new(Vec::new()),
            stats: Mutex::new(RetrospectionStats::default()),
        })
    }

    /// Attach the LLM dimension creator.
    #[must_use]
    pub fn with_dimension_creator(self, creator: Arc<dyn DimensionCreator>) -> Self {
        *self.dimension_creator.write() = Some(creator);
        self
    }

    /// Inject or replace the path generator and MAB store after construction.
    ///
    /// The upper layers often construct the engine before these collaborators
    /// exist; the full pipeline activates once they arrive.
    pub fn set_dependencies(
        &self,
        path_generator: Option<Arc<dyn PathGenerator>>,
        strategy_store: Option<Arc<dyn StrategyStore>>,
    ) {
        if let Some(generator) = path_generator {
            *self.path_generator.write() = Some(generator);
            info!("retrospection engine: path generator attached");
        }
        if let Some(store) = strategy_store {
            *self.strategy_store.write() = Some(store);
            info!("retrospection engine: strategy store attached");
        }
    }

    /// Run one full retrospection.
    ///
    /// `strategy` falls back to the configured default; `target_task_id`
    /// bypasses selection and reviews that exact turn. The returned result's
    /// status discriminates success, `NoSuitableTasks` and `Error` — this
    /// method itself never fails.
    #[instrument(skip(self, state))]
    pub async fn perform_retrospection(
        &self,
        state: &dyn StateStore,
        strategy: Option<RetrospectionStrategy>,
        target_task_id: Option<&str>,
    ) -> RetrospectionResult {
        let started = Instant::now();
        let retrospection_id = timed_id("retro");
        let strategy = strategy.unwrap_or(self.config.task_selection.default_strategy);

        info!(%retrospection_id, %strategy, "starting retrospection");

        // ---------------- Stage 1: Select ----------------
        let history = state.conversation_history().await;
        let selected = if let Some(task_id) = target_task_id {
            match history.iter().find(|turn| turn.turn_id == task_id) {
                Some(turn) => Some((turn.clone(), "explicitly requested task".to_string())),
                None => {
                    warn!(task_id, "requested turn does not exist");
                    let result = RetrospectionResult::error(
                        retrospection_id,
                        format!("unknown target task id: {task_id}"),
                        started.elapsed(),
                    );
                    self.record(&result);
                    return result;
                }
            }
        } else {
            let now = Utc::now();
            let candidates =
                select::filter_candidates(&history, &self.config.task_selection, now);
            select::select(&candidates, strategy).map(|(turn, reason)| (turn.clone(), reason))
        };

        let Some((turn, selection_reason)) = selected else {
            debug!("no suitable turns to review");
            let result =
                RetrospectionResult::no_suitable_tasks(retrospection_id, started.elapsed());
            self.record(&result);
            return result;
        };

        let now = Utc::now();
        let task = RetrospectionTask {
            task_id: turn.turn_id.clone(),
            complexity_score: select::complexity(&turn),
            priority_score: select::priority_score(
                &turn,
                strategy,
                &self.config.task_selection,
                now,
            ),
            original_turn: turn,
            selection_reason,
            strategy,
            created_at: now,
        };
        info!(task_id = %task.task_id, reason = %task.selection_reason, "selected turn for review");

        // ---------------- Stage 2: Ideate ----------------
        let dimensions = self.ideate_dimensions(&task).await;
        let creative_paths = self.ideate_creative_paths(&task).await;
        debug!(
            dimensions = dimensions.len(),
            creative_paths = creative_paths.len(),
            "ideation complete"
        );

        // ---------------- Stage 3: Assimilate ----------------
        let (assimilated_strategies, mab_updates) =
            self.assimilate(&dimensions, &creative_paths).await;

        // ---------------- Analysis ----------------
        let tool_review = tool_review::review(&task.original_turn, task.complexity_score);
        let insights = insights::extract(&task);
        let success_patterns = insights::success_patterns(&task);
        let failure_causes = insights::failure_causes(&task);
        let improvement_suggestions =
            insights::improvement_suggestions(&task, &dimensions, &creative_paths);

        let result = RetrospectionResult {
            retrospection_id,
            status: RetrospectionStatus::Completed,
            task: Some(task),
            dimensions,
            creative_paths,
            insights: Some(insights),
            success_patterns,
            failure_causes,
            improvement_suggestions,
            tool_review: Some(tool_review),
            assimilated_strategies,
            mab_updates,
            execution_time: started.elapsed(),
            timestamp: Utc::now(),
        };

        self.record(&result);
        info!(
            retrospection_id = %result.retrospection_id,
            assimilated = result.assimilated_strategies.len(),
            "retrospection complete"
        );
        result
    }

    /// Snapshot of aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> RetrospectionStats {
        self.stats.lock().clone()
    }

    /// Number of retained retrospection results.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Drop all retained history.
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    // ------------------------------------------------------------------
    // Ideation
    // ------------------------------------------------------------------

    /// Ask the dimension creator to re-think the selected turn from scratch.
    async fn ideate_dimensions(&self, task: &RetrospectionTask) -> Vec<Dimension> {
        if !self.config.ideation.enable_llm_dimensions {
            return Vec::new();
        }
        let Some(creator) = self.dimension_creator.read().clone() else {
            debug!("dimension creator not attached, skipping dimension ideation");
            return Vec::new();
        };

        let request = DimensionRequest {
            task_description: retrospective_prompt(task),
            num_dimensions: self.config.ideation.max_new_dimensions,
            creativity_level: CreativityLevel::High,
            mode: IdeationMode::RetrospectiveAnalysis,
            temperature: self.config.ideation.creative_prompt_temperature,
            original_task: Some(task.original_turn.user_input.clone()),
            original_response: Some(task.original_turn.response.clone()),
        };

        match creator.create_dimensions(request).await {
            Ok(mut dimensions) => {
                dimensions.truncate(self.config.ideation.max_new_dimensions);
                dimensions
            }
            Err(e) => {
                warn!(error = %e, "dimension creation failed, continuing without dimensions");
                Vec::new()
            }
        }
    }

    /// Force the path generator into creative-bypass mode over the turn.
    async fn ideate_creative_paths(&self, task: &RetrospectionTask) -> Vec<ReasoningPath> {
        if !self.config.ideation.enable_aha_moment {
            return Vec::new();
        }
        let Some(generator) = self.path_generator.read().clone() else {
            debug!("path generator not attached, skipping creative bypass");
            return Vec::new();
        };

        let creative_seed = format!(
            "find breakthrough, non-traditional solutions for: {}",
            task.original_turn.user_input
        );

        match generator
            .generate_paths(
                &creative_seed,
                &task.original_turn.user_input,
                self.config.ideation.max_creative_paths,
                GenerationMode::CreativeBypass,
            )
            .await
        {
            Ok(paths) => {
                let min_confidence = self.config.ideation.min_path_confidence;
                let mut filtered: Vec<ReasoningPath> = paths
                    .into_iter()
                    .filter(|path| path.confidence >= min_confidence)
                    .collect();
                filtered.truncate(self.config.ideation.max_creative_paths);
                filtered
            }
            Err(e) => {
                warn!(error = %e, "creative bypass generation failed, continuing without paths");
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Assimilation
    // ------------------------------------------------------------------

    /// Inject the ideation output into the MAB store as new strategy arms
    /// with small exploration rewards.
    async fn assimilate(
        &self,
        dimensions: &[Dimension],
        creative_paths: &[ReasoningPath],
    ) -> (Vec<String>, Vec<MabUpdate>) {
        if !self.config.assimilation.enable_mab_injection {
            return (Vec::new(), Vec::new());
        }
        let Some(store) = self.strategy_store.read().clone() else {
            debug!("strategy store not attached, skipping assimilation");
            return (Vec::new(), Vec::new());
        };

        let reward = self.config.assimilation.initial_exploration_reward;
        let mut assimilated = Vec::new();
        let mut updates = Vec::new();

        for dimension in dimensions {
            let strategy_id = format!("retro_llm_{}", dimension.dimension_id);
            let path_type = if dimension.dimension_type.is_empty() {
                "creative_retrospection"
            } else {
                dimension.dimension_type.as_str()
            };

            if let Err(e) = store.ensure_arm(&strategy_id, path_type).await {
                warn!(%strategy_id, error = %e, "failed to create strategy arm");
                continue;
            }
            if let Err(e) = store
                .update_performance(&strategy_id, true, reward, RewardSource::Retrospection)
                .await
            {
                warn!(%strategy_id, error = %e, "failed to apply dimension reward");
                continue;
            }

            updates.push(MabUpdate {
                strategy_id: strategy_id.clone(),
                origin: AssimilationOrigin::LlmDimension,
                reward,
                source: RewardSource::Retrospection,
            });
            assimilated.push(strategy_id);
        }

        // Creative-bypass paths earn the Aha-Moment bonus
        let aha_reward = reward * self.config.assimilation.aha_reward_bonus;
        for path in creative_paths {
            let strategy_id = if path.path_id.is_empty() {
                timed_id("retro_aha")
            } else {
                path.path_id.clone()
            };

            if let Err(e) = store.ensure_arm(&strategy_id, &path.path_type).await {
                warn!(%strategy_id, error = %e, "failed to create strategy arm");
                continue;
            }
            if let Err(e) = store
                .update_performance(&strategy_id, true, aha_reward, RewardSource::Retrospection)
                .await
            {
                warn!(%strategy_id, error = %e, "failed to apply creative path reward");
                continue;
            }

            updates.push(MabUpdate {
                strategy_id: strategy_id.clone(),
                origin: AssimilationOrigin::CreativePath,
                reward: aha_reward,
                source: RewardSource::Retrospection,
            });
            assimilated.push(strategy_id);
        }

        info!(assimilated = assimilated.len(), "knowledge assimilation complete");
        (assimilated, updates)
    }

    // ------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------

    fn record(&self, result: &RetrospectionResult) {
        {
            let mut history = self.history.lock();
            history.push(result.clone());
            if history.len() > HISTORY_CAP {
                let drain_to = history.len() - HISTORY_CAP / 2;
                history.drain(..drain_to);
            }
        }

        let mut stats = self.stats.lock();
        stats.total_retrospections += 1;
        if result.task.is_some() {
            stats.total_tasks_analyzed += 1;
        }
        stats.total_strategies_assimilated += result.assimilated_strategies.len() as u64;

        let n = stats.total_retrospections as f64;
        let prior = stats.average_execution_time.as_secs_f64() * (n - 1.0);
        stats.average_execution_time =
            Duration::from_secs_f64((prior + result.execution_time.as_secs_f64()) / n);

        let succeeded = f64::from(result.task.is_some() && result.insights.is_some());
        stats.success_rate = (stats.success_rate * (n - 1.0) + succeeded) / n;
    }
}

/// The prompt that asks the LLM to re-think an already-answered task.
fn retrospective_prompt(task: &RetrospectionTask) -> String {
    format!(
        "Retrospective task analysis:

Historical task: '{}'

Solution at the time: '{}'

Re-examine this problem with fresh eyes:
1. Unconstrained by the original decisions, outline 2-3 completely different approaches
2. Come at the problem from other dimensions and angles
3. Explore innovative options that were not considered at the time
4. Aim for diversity and creativity in the solutions

Propose entirely new solution dimensions for this historical task.",
        task.original_turn.user_input,
        truncate_chars(&task.original_turn.response, 500),
    )
}
