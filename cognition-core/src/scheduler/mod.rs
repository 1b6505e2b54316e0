//! # Cognitive Scheduler
//!
//! Long-lived background service giving the host agent an "inner monologue":
//! one supervisor task watches for idleness, a small worker pool executes
//! cognitive jobs pulled from a priority queue.
//!
//! The supervisor ticks every `check_interval`, re-reading agent state so
//! lost change events cost at most one tick. Entering cognitive-idle mode
//! schedules a retrospection job; sustained idleness adds periodic ideation,
//! autonomous exploration and (every five completed jobs) synthesis.
//! User-directed explorations preempt everything at priority 10, with worker
//! capacity bounded independently per track.
//!
//! ## Example
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
//! scheduler.stop().await;
//! # Ok(())
//! # }
//! ```

mod queue;


pub use queue::JobQueue;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::explorer::KnowledgeExplorer;
use crate::host::{StateEvent, StateStore, StrategyStore};
use crate::library::PathLibrary;
use crate::retrospection::RetrospectionEngine;
use crate::types::{
    CognitiveJob, CognitiveMode, ExplorationMode, ExplorationResult, ExplorationStrategy,
    GoalStatus, JobContext, JobKind, RetrospectionResult, RetrospectionStrategy, RewardSource,
    SchedulerConfig, TaskPhase, TriggerReason,
};

/// Reward given to strategy arms seeded from freshly learned paths.
const LEARNED_PATH_REWARD: f64 = 0.1;
/// Bounded wait for one dequeue attempt.
const DEQUEUE_WAIT: Duration = Duration::from_secs(5);
/// Bounded wait when joining supervisor and worker tasks.
const JOIN_WAIT: Duration = Duration::from_secs(5);
/// Soft cap on retained job records.
const HISTORY_CAP: usize = 100;
/// A synthesis job is scheduled every this many completed jobs.
const SYNTHESIS_EVERY: u64 = 5;

/// Aggregate scheduler statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerStats {
    pub total_idle_periods: u64,
    pub total_idle_time: Duration,
    pub jobs_completed: u64,
    pub retrospection_sessions: u64,
    pub ideation_sessions: u64,
    pub synthesis_sessions: u64,
    pub exploration_sessions: u64,
    pub user_directed_explorations: u64,
    pub jobs_timed_out: u64,
}

/// Snapshot returned by [`CognitiveScheduler::get_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub mode: CognitiveMode,
    pub is_idle: bool,
    pub active_jobs: usize,
    pub queued_jobs: usize,
    pub stats: SchedulerStats,
}

/// Structured placeholder emitted by the ideation handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeationOutcome {
    pub creative_dimensions: Vec<String>,
    pub novel_approaches: Vec<String>,
    pub concept_seeds: Vec<String>,
}

/// Structured placeholder emitted by the synthesis handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOutcome {
    pub core_patterns: Vec<String>,
    pub meta_insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// What one completed cognitive job produced.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Retrospection(RetrospectionResult),
    Exploration(ExplorationResult),
    Ideation(IdeationOutcome),
    Synthesis(SynthesisOutcome),
    /// The handler for this kind had no collaborator to run with
    Skipped { reason: String },
}

/// History record of one completed job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub job_id: String,
    pub kind: JobKind,
    pub outcome: JobOutcome,
    pub execution_time: Duration,
    pub worker: usize,
    pub timestamp: chrono::DateTime<Utc>,
}

struct ActiveJob {
    job: CognitiveJob,
    started: Instant,
}

/// Mutable supervisor state, guarded by one lock.
struct ModeState {
    mode: CognitiveMode,
    is_idle: bool,
    last_activity: Instant,
    last_completion: Option<Instant>,
    idle_entered_at: Option<Instant>,
    last_exploration: Instant,
    last_synthesis_at: u64,
}

struct Shared {
    config: SchedulerConfig,
    state: Arc<dyn StateStore>,
    retrospection: Option<Arc<RetrospectionEngine>>,
    explorer: Option<Arc<KnowledgeExplorer>>,
    library: Option<Arc<PathLibrary>>,
    strategy_store: Option<Arc<dyn StrategyStore>>,

    queue: JobQueue,
    mode: Mutex<ModeState>,
    active: Mutex<HashMap<String, ActiveJob>>,
    history: Mutex<Vec<JobRecord>>,
    stats: Mutex<SchedulerStats>,
    running: AtomicBool,
}

/// Idle detection, dual-track job queueing and worker-pool execution.
pub struct CognitiveScheduler {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CognitiveScheduler {
    /// Create a scheduler over the host state store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] for out-of-range options.
    pub fn new(state: Arc<dyn StateStore>, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let now = Instant::now();
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                state,
                retrospection: None,
                explorer: None,
                library: None,
                strategy_store: None,
                queue: JobQueue::new(),
                mode: Mutex::new(ModeState {
                    mode: CognitiveMode::TaskDriven,
                    is_idle: false,
                    last_activity: now,
                    last_completion: None,
                    idle_entered_at: None,
                    last_exploration: now,
                    last_synthesis_at: 0,
                }),
                active: Mutex::new(HashMap::new()),
                history: Mutex::new(Vec::new()),
                stats: Mutex::new(SchedulerStats::default()),
                running: AtomicBool::new(false),
            }),
            handles: Mutex::new(Vec::new()),
        })
    }

    /// Attach the retrospection engine. Only effective before `start`.
    #[must_use]
    pub fn with_retrospection_engine(mut self, engine: Arc<RetrospectionEngine>) -> Self {
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            shared.retrospection = Some(engine);
        }
        self
    }

    /// Attach the knowledge explorer. Only effective before `start`.
    #[must_use]
    pub fn with_explorer(mut self, explorer: Arc<KnowledgeExplorer>) -> Self {
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            shared.explorer = Some(explorer);
        }
        self
    }

    /// Attach the path library receiving learned paths. Only effective
    /// before `start`.
    #[must_use]
    pub fn with_path_library(mut self, library: Arc<PathLibrary>) -> Self {
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            shared.library = Some(library);
        }
        self
    }

    /// Attach the MAB strategy store. Only effective before `start`.
    #[must_use]
    pub fn with_strategy_store(mut self, store: Arc<dyn StrategyStore>) -> Self {
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            shared.strategy_store = Some(store);
        }
        self
    }

    /// Start the supervisor and worker tasks. Idempotent.
    pub fn start(&self) {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            warn!("cognitive scheduler already running");
            return;
        }

        {
            let mut mode = self.shared.mode.lock();
            let now = Instant::now();
            mode.last_activity = now;
            mode.last_exploration = now;
        }

        let mut handles = self.handles.lock();
        handles.push(tokio::spawn(supervisor_loop(Arc::clone(&self.shared))));

        let workers = self.shared.config.cognitive_tasks.max_concurrent_tasks;
        for worker_id in 0..workers {
            handles.push(tokio::spawn(worker_loop(Arc::clone(&self.shared), worker_id)));
        }

        info!(workers, "cognitive scheduler started");
    }

    /// Stop the scheduler: signal shutdown, join tasks with a bounded wait
    /// and discard the remaining queue.
    pub async fn stop(&self) {
        if !self.shared.running.swap(false, Ordering::SeqCst) {
            warn!("cognitive scheduler not running");
            return;
        }

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if tokio::time::timeout(JOIN_WAIT, handle).await.is_err() {
                warn!("scheduler task did not stop within the join wait");
            }
        }

        self.shared.queue.clear();
        info!("cognitive scheduler stopped");
    }

    /// Enqueue a priority-10 user-directed exploration at the queue head.
    pub fn schedule_user_directed_exploration(
        &self,
        user_query: &str,
        user_context: Option<serde_json::Value>,
    ) {
        let strategies = user_directed_strategies(user_query);
        info!(
            query = crate::util::truncate_chars(user_query, 50),
            ?strategies,
            "scheduling user-directed exploration"
        );

        let dual = &self.shared.config.knowledge_exploration.dual_track;
        let job = CognitiveJob::new(
            JobKind::Exploration,
            dual.user_directed_priority,
            JobContext::Exploration {
                mode: ExplorationMode::UserDirected,
                trigger: TriggerReason::UserInstruction,
                user_query: Some(user_query.to_string()),
                user_context,
                strategies,
            },
            self.shared.config.knowledge_exploration.user_directed_timeout,
        );

        self.shared.queue.enqueue_front(job);
        self.shared.stats.lock().user_directed_explorations += 1;
    }

    /// Snapshot of the scheduler's state and counters.
    #[must_use]
    pub fn get_status(&self) -> SchedulerStatus {
        let mode = self.shared.mode.lock();
        SchedulerStatus {
            is_running: self.shared.running.load(Ordering::SeqCst),
            mode: mode.mode,
            is_idle: mode.is_idle,
            active_jobs: self.shared.active.lock().len(),
            queued_jobs: self.shared.queue.len(),
            stats: self.shared.stats.lock().clone(),
        }
    }

    /// Completed-job records, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<JobRecord> {
        self.shared.history.lock().clone()
    }
}

// ======================================================================
// Supervisor
// ======================================================================

async fn supervisor_loop(shared: Arc<Shared>) {
    debug!("supervisor started");
    let mut events = shared.state.subscribe();

    while shared.running.load(Ordering::SeqCst) {
        drain_events(&shared, &mut events);
        tick(&shared).await;
        cleanup_expired(&shared);
        tokio::time::sleep(shared.config.idle_detection.check_interval).await;
    }

    debug!("supervisor stopped");
}

/// Apply buffered state events. Losing events is fine: the tick re-reads
/// state anyway.
fn drain_events(
    shared: &Shared,
    events: &mut tokio::sync::broadcast::Receiver<StateEvent>,
) {
    loop {
        match events.try_recv() {
            Ok(StateEvent::TurnCompleted { success: true } | StateEvent::GoalProgress) => {
                shared.mode.lock().last_activity = Instant::now();
            }
            Ok(StateEvent::TurnCompleted { success: false }) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "state event stream lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn tick(shared: &Shared) {
    let agent = shared.state.current_state().await;
    let task_completed = agent.current_phase == TaskPhase::Completion
        || matches!(agent.goal_status, GoalStatus::Achieved | GoalStatus::Failed);

    let now = Instant::now();
    let mut retrospection_due = false;
    let mut ideation_due = false;
    let mut exploration_due = false;
    let mut synthesis_due = false;

    {
        let mut mode = shared.mode.lock();

        if task_completed {
            if mode.last_completion.is_none() {
                mode.last_completion = Some(now);
            }
        } else {
            mode.last_completion = None;
            mode.last_activity = now;
        }

        let idle_duration = mode
            .last_completion
            .map(|since| now.duration_since(since))
            .unwrap_or_default();

        let was_idle = mode.is_idle;
        mode.is_idle =
            task_completed && idle_duration >= shared.config.idle_detection.min_idle_duration;

        if mode.is_idle && !was_idle {
            mode.mode = CognitiveMode::CognitiveIdle;
            mode.idle_entered_at = Some(now);
            shared.stats.lock().total_idle_periods += 1;
            info!(idle_secs = idle_duration.as_secs_f64(), "entering cognitive idle mode");
            retrospection_due = true;
        } else if !mode.is_idle && was_idle {
            mode.mode = CognitiveMode::TaskDriven;
            if let Some(entered) = mode.idle_entered_at.take() {
                shared.stats.lock().total_idle_time += now.duration_since(entered);
            }
            info!("leaving cognitive idle mode");
        }

        if mode.is_idle {
            let intervals = &shared.config.cognitive_tasks;
            if now.duration_since(mode.last_activity) >= intervals.ideation_interval {
                ideation_due = true;
            }
            if now.duration_since(mode.last_exploration) >= intervals.exploration_interval {
                exploration_due = true;
                mode.last_exploration = now;
            }

            let completed = shared.stats.lock().jobs_completed;
            if completed > 0
                && completed % SYNTHESIS_EVERY == 0
                && completed != mode.last_synthesis_at
            {
                synthesis_due = true;
                mode.last_synthesis_at = completed;
            }
        }
    }

    if retrospection_due {
        schedule_job(
            shared,
            JobKind::Retrospection,
            7,
            JobContext::Retrospection {
                trigger: TriggerReason::IdleDetection,
            },
            Duration::from_secs(45),
        );
    }
    if ideation_due && !kind_pending(shared, JobKind::Ideation) {
        schedule_job(
            shared,
            JobKind::Ideation,
            5,
            JobContext::Ideation {
                trigger: TriggerReason::PeriodicIdeation,
            },
            Duration::from_secs(60),
        );
    }
    if exploration_due && !kind_pending(shared, JobKind::Exploration) {
        let priority = shared
            .config
            .knowledge_exploration
            .dual_track
            .autonomous_priority;
        schedule_job(
            shared,
            JobKind::Exploration,
            priority,
            JobContext::Exploration {
                mode: ExplorationMode::Autonomous,
                trigger: TriggerReason::ProactiveExploration,
                user_query: None,
                user_context: None,
                strategies: Vec::new(),
            },
            shared.config.knowledge_exploration.exploration_timeout,
        );
    }
    if synthesis_due && !kind_pending(shared, JobKind::Synthesis) {
        schedule_job(
            shared,
            JobKind::Synthesis,
            6,
            JobContext::Synthesis { recent_results: 10 },
            Duration::from_secs(90),
        );
    }
}

fn schedule_job(
    shared: &Shared,
    kind: JobKind,
    priority: u8,
    context: JobContext,
    estimated: Duration,
) {
    let job = CognitiveJob::new(kind, priority, context, estimated);
    debug!(job_id = %job.job_id, %kind, priority, "scheduling cognitive job");
    shared.queue.enqueue(job);
}

/// Whether a job of this kind is already queued or running.
fn kind_pending(shared: &Shared, kind: JobKind) -> bool {
    shared.queue.contains_kind(kind)
        || shared
            .active
            .lock()
            .values()
            .any(|active| active.job.kind == kind)
}

/// Evict active jobs that outlived the task timeout. The worker keeps
/// running, but its eventual result is dropped.
fn cleanup_expired(shared: &Shared) {
    let timeout = shared.config.cognitive_tasks.task_timeout;
    let mut active = shared.active.lock();
    let expired: Vec<String> = active
        .iter()
        .filter(|(_, entry)| entry.started.elapsed() > timeout)
        .map(|(id, _)| id.clone())
        .collect();

    for job_id in expired {
        active.remove(&job_id);
        shared.stats.lock().jobs_timed_out += 1;
        warn!(%job_id, "cognitive job timed out and was evicted");
    }
}

// ======================================================================
// Workers
// ======================================================================

async fn worker_loop(shared: Arc<Shared>, worker_id: usize) {
    debug!(worker_id, "worker started");

    while shared.running.load(Ordering::SeqCst) {
        let job = shared
            .queue
            .dequeue_timeout(
                DEQUEUE_WAIT,
                |job| track_has_capacity(&shared, job),
                || !shared.running.load(Ordering::SeqCst),
            )
            .await;

        let Some(job) = job else { continue };
        execute_job(&shared, job, worker_id).await;
    }

    debug!(worker_id, "worker stopped");
}

/// Exploration jobs respect per-track in-flight caps; other kinds always fit.
fn track_has_capacity(shared: &Shared, job: &CognitiveJob) -> bool {
    let Some(mode) = job.exploration_mode() else {
        return true;
    };

    let dual = &shared.config.knowledge_exploration.dual_track;
    let cap = match mode {
        ExplorationMode::UserDirected => dual.max_concurrent_user_tasks,
        ExplorationMode::Autonomous => dual.max_concurrent_autonomous,
    };

    let in_flight = shared
        .active
        .lock()
        .values()
        .filter(|active| active.job.exploration_mode() == Some(mode))
        .count();
    in_flight < cap
}

async fn execute_job(shared: &Shared, job: CognitiveJob, worker_id: usize) {
    let started = Instant::now();
    let job_id = job.job_id.clone();
    let kind = job.kind;
    debug!(worker_id, %job_id, %kind, "executing cognitive job");

    shared.active.lock().insert(
        job_id.clone(),
        ActiveJob {
            job: job.clone(),
            started,
        },
    );
    set_execution_mode(shared, kind);

    let outcome = match kind {
        JobKind::Retrospection => run_retrospection(shared, &job).await,
        JobKind::Exploration => run_exploration(shared, &job).await,
        JobKind::Ideation => run_ideation(shared),
        JobKind::Synthesis => run_synthesis(shared),
    };

    restore_mode(shared);

    // A supervisor timeout eviction means this result is no longer wanted
    if shared.active.lock().remove(&job_id).is_none() {
        warn!(%job_id, "job finished after timeout eviction, dropping result");
        return;
    }

    let execution_time = started.elapsed();
    {
        let mut history = shared.history.lock();
        history.push(JobRecord {
            job_id: job_id.clone(),
            kind,
            outcome,
            execution_time,
            worker: worker_id,
            timestamp: Utc::now(),
        });
        if history.len() > HISTORY_CAP {
            let drain_to = history.len() - HISTORY_CAP / 2;
            history.drain(..drain_to);
        }
    }
    shared.stats.lock().jobs_completed += 1;

    info!(
        worker_id,
        %job_id,
        %kind,
        secs = execution_time.as_secs_f64(),
        "cognitive job complete"
    );
}

fn set_execution_mode(shared: &Shared, kind: JobKind) {
    let mut mode = shared.mode.lock();
    mode.mode = match kind {
        JobKind::Retrospection => CognitiveMode::DeepReflection,
        JobKind::Ideation | JobKind::Synthesis => CognitiveMode::CreativeIdeation,
        JobKind::Exploration => CognitiveMode::KnowledgeExploration,
    };
}

fn restore_mode(shared: &Shared) {
    let mut mode = shared.mode.lock();
    mode.mode = if mode.is_idle {
        CognitiveMode::CognitiveIdle
    } else {
        CognitiveMode::TaskDriven
    };
}

async fn run_retrospection(shared: &Shared, job: &CognitiveJob) -> JobOutcome {
    shared.stats.lock().retrospection_sessions += 1;

    let Some(engine) = &shared.retrospection else {
        return JobOutcome::Skipped {
            reason: "no retrospection engine attached".to_string(),
        };
    };

    let strategy = match &job.context {
        JobContext::Retrospection { trigger } => retrospection_strategy_for(*trigger),
        _ => RetrospectionStrategy::RandomSampling,
    };

    let result = engine
        .perform_retrospection(shared.state.as_ref(), Some(strategy), None)
        .await;
    JobOutcome::Retrospection(result)
}

async fn run_exploration(shared: &Shared, job: &CognitiveJob) -> JobOutcome {
    shared.stats.lock().exploration_sessions += 1;

    let Some(explorer) = &shared.explorer else {
        return JobOutcome::Skipped {
            reason: "no knowledge explorer attached".to_string(),
        };
    };

    let targets = explorer.targets_from_context(&job.context);
    let strategy = match &job.context {
        JobContext::Exploration { strategies, .. } => strategies.first().copied(),
        _ => None,
    };

    let result = explorer.explore(targets, strategy).await;
    integrate_exploration(shared, &result).await;
    JobOutcome::Exploration(result)
}

/// Feed exploration output back into the learning loop: seeds become
/// experimental library paths, and each learned path seeds a strategy arm.
async fn integrate_exploration(shared: &Shared, result: &ExplorationResult) {
    let Some(library) = &shared.library else {
        return;
    };

    let learned = library
        .learn_from_exploration(result, "knowledge_explorer")
        .await;
    if learned.is_empty() {
        return;
    }

    if let Some(store) = &shared.strategy_store {
        for path_id in &learned {
            if let Err(e) = store.ensure_arm(path_id, "learned_exploration").await {
                error!(%path_id, error = %e, "failed to seed strategy arm for learned path");
                continue;
            }
            if let Err(e) = store
                .update_performance(path_id, true, LEARNED_PATH_REWARD, RewardSource::Exploration)
                .await
            {
                error!(%path_id, error = %e, "failed to reward learned path arm");
            }
        }
    }

    debug!(learned = learned.len(), "exploration results folded into the learning loop");
}

fn run_ideation(shared: &Shared) -> JobOutcome {
    shared.stats.lock().ideation_sessions += 1;

    // Structured placeholder until a proactive ideation module exists
    JobOutcome::Ideation(IdeationOutcome {
        creative_dimensions: vec![
            "innovation dimensions from historical patterns".to_string(),
            "cross-domain thinking transfer directions".to_string(),
            "breakthrough problem reframing angles".to_string(),
        ],
        novel_approaches: vec!["pending llm-driven dimension creation in proactive mode".to_string()],
        concept_seeds: vec![
            "concept seed: pattern inversion".to_string(),
            "concept seed: constraint relaxation".to_string(),
        ],
    })
}

fn run_synthesis(shared: &Shared) -> JobOutcome {
    shared.stats.lock().synthesis_sessions += 1;

    let history = shared.history.lock();
    let recent = history.iter().rev().take(10);
    let mut kind_counts: HashMap<JobKind, usize> = HashMap::new();
    for record in recent {
        *kind_counts.entry(record.kind).or_insert(0) += 1;
    }

    let core_patterns = kind_counts
        .iter()
        .map(|(kind, count)| format!("{count} recent {kind} results"))
        .collect();

    JobOutcome::Synthesis(SynthesisOutcome {
        core_patterns,
        meta_insights: vec![
            "recurring insight themes across recent cognitive sessions".to_string(),
        ],
        recommendations: vec!["actionable recommendations from consolidated analysis".to_string()],
    })
}

/// Map a scheduling trigger to the best-fitting selection strategy.
fn retrospection_strategy_for(trigger: TriggerReason) -> RetrospectionStrategy {
    match trigger {
        TriggerReason::FailureAnalysis => RetrospectionStrategy::FailureFocused,
        TriggerReason::PerformanceReview => RetrospectionStrategy::ComplexityBased,
        TriggerReason::PeriodicIdeation => RetrospectionStrategy::RecentTasks,
        _ => RetrospectionStrategy::RandomSampling,
    }
}

/// Keyword heuristic choosing candidate strategies for a user query.
fn user_directed_strategies(query: &str) -> Vec<ExplorationStrategy> {
    let lower = query.to_lowercase();
    let mut strategies = Vec::new();

    let mut push = |strategy: ExplorationStrategy| {
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    };

    if ["latest", "trend", "development", "news"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        push(ExplorationStrategy::TrendMonitoring);
        push(ExplorationStrategy::DomainExpansion);
    }
    if ["how", "method", "solve", "solution"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        push(ExplorationStrategy::ExpertKnowledge);
        push(ExplorationStrategy::GapAnalysis);
    }
    if ["compare", "versus", "vs"].iter().any(|kw| lower.contains(kw)) {
        push(ExplorationStrategy::CompetitiveIntelligence);
        push(ExplorationStrategy::CrossDomainLearning);
    }
    if ["innovative", "creative", "novel"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        push(ExplorationStrategy::SerendipityDiscovery);
        push(ExplorationStrategy::CrossDomainLearning);
    }

    if strategies.is_empty() {
        strategies = vec![
            ExplorationStrategy::DomainExpansion,
            ExplorationStrategy::ExpertKnowledge,
        ];
    }

    strategies.truncate(3);
    strategies
}
