//! # Knowledge Explorer
//!
//! Targeted external information gathering through a five-stage pipeline:
//! **Collect → Evaluate → Seed → Trend → Cross-domain**.
//!
//! The explorer pulls raw findings from pluggable information sources (web
//! search by default), scores them for credibility, relevance and novelty,
//! distills the survivors into thinking seeds, and surfaces keyword trends
//! and cross-domain insights. Per-strategy performance feeds back into
//! strategy selection for future autonomous runs.
//!
//! ## Example
//!
//! ```no_run
//! use cognition_core::explorer::KnowledgeExplorer;
//! use cognition_core::types::ExplorerConfig;
//!
//! # async fn example() -> cognition_core::Result<()> {
//! let explorer = KnowledgeExplorer::new(ExplorerConfig::default())?;
//! let targets = vec![];
//! let result = explorer.explore(targets, None).await;
//! println!("discovered {} items", result.discovered_knowledge.len());
//! # Ok(())
//! # }
//! ```

mod evaluate;
mod queries;
mod seeds;
pub mod targets;
mod trends;


use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::host::{AnalysisTask, QueryDomain, QueryIntent, SearchClient, SemanticAnalysis, SemanticAnalyzer};
use crate::types::{
    ExplorationMode, ExplorationResult, ExplorationStrategy, ExplorationTarget, ExplorerConfig,
    KnowledgeItem, RawFinding, SourceType, ThinkingSeed,
};
use crate::util::timed_id;

/// Rolling performance record for one exploration strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyPerformance {
    pub success_rate: f64,
    pub avg_quality: f64,
    pub total_seeds: u64,
}

/// Aggregate explorer statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerStats {
    pub total_explorations: u64,
    pub successful_explorations: u64,
    pub total_knowledge_discovered: u64,
    pub total_seeds_generated: u64,
    pub average_quality_score: f64,
    pub average_execution_time: Duration,
}

/// Five-stage knowledge exploration pipeline with pluggable sources.
pub struct KnowledgeExplorer {
    config: ExplorerConfig,
    /// Information sources, queried in order. Each finding is tagged with the
    /// source type it came from, which drives its credibility.
    sources: Vec<(SourceType, Arc<dyn SearchClient>)>,
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,

    knowledge_cache: Mutex<Vec<KnowledgeItem>>,
    seed_cache: Mutex<Vec<ThinkingSeed>>,
    history: Mutex<Vec<ExplorationResult>>,
    strategy_performance: Mutex<HashMap<ExplorationStrategy, StrategyPerformance>>,
    stats: Mutex<ExplorerStats>,
}

impl KnowledgeExplorer {
    /// Create an explorer with no information sources attached.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] for out-of-range options.
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sources: Vec::new(),
            analyzer: None,
            knowledge_cache: Mutex::new(Vec::new()),
            seed_cache: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            strategy_performance: Mutex::new(HashMap::new()),
            stats: Mutex::new(ExplorerStats::default()),
        })
    }

    /// Attach the default web-search source.
    #[must_use]
    pub fn with_search_client(mut self, client: Arc<dyn SearchClient>) -> Self {
        self.sources.push((SourceType::WebSearch, client));
        self
    }

    /// Attach an additional information source (API, database, …).
    #[must_use]
    pub fn with_source(mut self, source_type: SourceType, client: Arc<dyn SearchClient>) -> Self {
        self.sources.push((source_type, client));
        self
    }

    /// Attach a semantic analyzer for query understanding.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Run the full exploration pipeline over the given targets.
    ///
    /// Never fails outright: source errors degrade to fewer findings, and a
    /// run that produced nothing reports zero success rate.
    #[instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn explore(
        &self,
        targets: Vec<ExplorationTarget>,
        strategy: Option<ExplorationStrategy>,
    ) -> ExplorationResult {
        let started = Instant::now();
        let exploration_id = timed_id("exploration");
        let strategy = self.select_strategy(&targets, strategy).await;

        info!(%exploration_id, %strategy, "starting knowledge exploration");

        // Stage 1: collect raw findings from every attached source
        let raw = self.collect(&targets, strategy).await;
        debug!(raw = raw.len(), "collection stage complete");

        // Stage 2: evaluate and filter. Novelty compares against the cache
        // as it stood before this run.
        let recent: Vec<KnowledgeItem> = {
            let cache = self.knowledge_cache.lock();
            let start = cache.len().saturating_sub(10);
            cache[start..].to_vec()
        };
        // Identical content collected through several queries or targets
        // collapses into one item carrying the union of its target links.
        let mut discovered: Vec<KnowledgeItem> = Vec::new();
        let mut by_content: HashMap<String, usize> = HashMap::new();
        for finding in &raw {
            let Some(item) = evaluate::evaluate(finding, &recent) else {
                continue;
            };
            if !evaluate::passes_filter(&item, &self.config.quality) {
                continue;
            }
            match by_content.get(&crate::util::hash8(&item.content)) {
                Some(&index) => {
                    let existing = &mut discovered[index];
                    for concept in item.related_concepts {
                        if !existing.related_concepts.contains(&concept) {
                            existing.related_concepts.push(concept);
                        }
                    }
                }
                None => {
                    by_content.insert(crate::util::hash8(&item.content), discovered.len());
                    discovered.push(item);
                }
            }
        }
        debug!(discovered = discovered.len(), "evaluation stage complete");

        // Stage 3: distill thinking seeds
        let generated_seeds = seeds::generate(
            &discovered,
            strategy,
            self.config.max_seeds_per_exploration,
        );

        // Stage 4: keyword trends
        let identified_trends = trends::identify_trends(&discovered);

        // Stage 5: cross-domain insights
        let cross_domain_insights = trends::discover_cross_domain_insights(&generated_seeds);

        let success_rate = exploration_success_rate(&targets, &discovered, &generated_seeds);
        let quality_score = if discovered.is_empty() {
            0.0
        } else {
            discovered.iter().map(KnowledgeItem::overall_score).sum::<f64>()
                / discovered.len() as f64
        };

        let result = ExplorationResult {
            exploration_id,
            strategy,
            targets,
            discovered_knowledge: discovered,
            generated_seeds,
            identified_trends,
            cross_domain_insights,
            execution_time: started.elapsed(),
            success_rate,
            quality_score,
            timestamp: Utc::now(),
            error: None,
        };

        self.record(&result);

        info!(
            exploration_id = %result.exploration_id,
            knowledge = result.discovered_knowledge.len(),
            seeds = result.generated_seeds.len(),
            trends = result.identified_trends.len(),
            quality = result.quality_score,
            "knowledge exploration complete"
        );

        result
    }

    /// Build exploration targets from a scheduler job context.
    #[must_use]
    pub fn targets_from_context(&self, context: &crate::types::JobContext) -> Vec<ExplorationTarget> {
        targets::from_job_context(context)
    }

    /// Snapshot of aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> ExplorerStats {
        self.stats.lock().clone()
    }

    /// Snapshot of the per-strategy scoreboard.
    #[must_use]
    pub fn strategy_performance(&self) -> HashMap<ExplorationStrategy, StrategyPerformance> {
        self.strategy_performance.lock().clone()
    }

    /// Current cache sizes (knowledge, seeds, history).
    #[must_use]
    pub fn cache_sizes(&self) -> (usize, usize, usize) {
        (
            self.knowledge_cache.lock().len(),
            self.seed_cache.lock().len(),
            self.history.lock().len(),
        )
    }

    // ------------------------------------------------------------------
    // Strategy selection
    // ------------------------------------------------------------------

    async fn select_strategy(
        &self,
        targets: &[ExplorationTarget],
        explicit: Option<ExplorationStrategy>,
    ) -> ExplorationStrategy {
        if let Some(strategy) = explicit {
            return strategy;
        }

        let user_query = targets
            .iter()
            .find(|t| t.mode == ExplorationMode::UserDirected)
            .and_then(|t| t.user_query.clone());

        if let Some(query) = user_query {
            return self.select_user_directed_strategy(&query).await;
        }

        self.select_by_scoreboard()
    }

    /// Semantic intent analysis first, keyword heuristics second, expert
    /// knowledge as the user-directed default.
    async fn select_user_directed_strategy(&self, query: &str) -> ExplorationStrategy {
        if let Some(analyzer) = &self.analyzer {
            let tasks = [
                AnalysisTask::IntentDetection,
                AnalysisTask::DomainClassification,
            ];
            match analyzer.analyze(query, &tasks).await {
                Ok(analysis) => {
                    if let Some(strategy) = self.strategy_from_semantics(&analysis) {
                        debug!(%strategy, "strategy chosen by semantic analysis");
                        return strategy;
                    }
                }
                Err(e) => warn!(error = %e, "semantic analysis failed, using heuristics"),
            }
        }

        // Heuristic fallback: long queries want expertise, short ones breadth
        let word_count = query.split_whitespace().count();
        if word_count < 5 {
            ExplorationStrategy::DomainExpansion
        } else {
            ExplorationStrategy::ExpertKnowledge
        }
    }

    fn strategy_from_semantics(&self, analysis: &SemanticAnalysis) -> Option<ExplorationStrategy> {
        let threshold = self.config.semantic_confidence_threshold;

        if let Some(intent) = analysis.intent.filter(|c| c.confidence >= threshold) {
            let strategy = match intent.value {
                QueryIntent::SolutionSeeking => ExplorationStrategy::ExpertKnowledge,
                QueryIntent::ComparisonAnalysis => ExplorationStrategy::CompetitiveIntelligence,
                QueryIntent::TrendMonitoring => ExplorationStrategy::TrendMonitoring,
                QueryIntent::LearningRequest | QueryIntent::InformationSeeking => {
                    ExplorationStrategy::DomainExpansion
                }
                QueryIntent::ProblemDiagnosis => ExplorationStrategy::GapAnalysis,
            };
            return Some(strategy);
        }

        if let Some(domain) = analysis.domain.filter(|c| c.confidence >= threshold) {
            let strategy = match domain.value {
                QueryDomain::Technology | QueryDomain::Health => {
                    ExplorationStrategy::ExpertKnowledge
                }
                QueryDomain::Business => ExplorationStrategy::CompetitiveIntelligence,
                QueryDomain::Academic | QueryDomain::Education => {
                    ExplorationStrategy::DomainExpansion
                }
                QueryDomain::General => return None,
            };
            return Some(strategy);
        }

        None
    }

    /// Pick the historically best strategy: 0.6·success_rate + 0.4·quality.
    fn select_by_scoreboard(&self) -> ExplorationStrategy {
        let scoreboard = self.strategy_performance.lock();
        scoreboard
            .iter()
            .map(|(strategy, perf)| {
                (*strategy, 0.6 * perf.success_rate + 0.4 * perf.avg_quality)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .filter(|(_, score)| *score > 0.0)
            .map_or(self.config.default_strategy, |(strategy, _)| strategy)
    }

    // ------------------------------------------------------------------
    // Stage 1: collection
    // ------------------------------------------------------------------

    async fn collect(
        &self,
        targets: &[ExplorationTarget],
        strategy: ExplorationStrategy,
    ) -> Vec<RawFinding> {
        let mut findings = Vec::new();

        for target in targets.iter().take(self.config.max_parallel_explorations) {
            let semantics = self.analyze_target_query(target).await;
            let queries = queries::build(
                target,
                strategy,
                semantics.as_ref(),
                self.config.semantic_confidence_threshold,
            );

            for query in &queries {
                for (source_type, client) in &self.sources {
                    if *source_type == SourceType::WebSearch && !self.config.enable_web_search {
                        continue;
                    }
                    match client.search(query, self.config.max_results_per_source).await {
                        Ok(hits) => {
                            let collected_at = Utc::now();
                            findings.extend(hits.into_iter().map(|hit| RawFinding {
                                content: hit.snippet,
                                title: hit.title,
                                url: hit.link,
                                source_type: *source_type,
                                query: query.clone(),
                                target_id: target.target_id.clone(),
                                collected_at,
                            }));
                        }
                        Err(e) => {
                            warn!(%query, error = %e, "information source failed, continuing");
                        }
                    }
                }
            }
        }

        findings
    }

    async fn analyze_target_query(&self, target: &ExplorationTarget) -> Option<SemanticAnalysis> {
        if target.mode != ExplorationMode::UserDirected {
            return None;
        }
        let query = target.user_query.as_ref()?;
        let analyzer = self.analyzer.as_ref()?;

        let tasks = [
            AnalysisTask::IntentDetection,
            AnalysisTask::DomainClassification,
            AnalysisTask::KeywordExtraction,
        ];
        match analyzer.analyze(query, &tasks).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!(error = %e, "query analysis failed, falling back to keyword templates");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Caches and statistics
    // ------------------------------------------------------------------

    fn record(&self, result: &ExplorationResult) {
        {
            let mut cache = self.knowledge_cache.lock();
            cache.extend(result.discovered_knowledge.iter().cloned());
            evict_oldest_half(&mut cache, self.config.knowledge_cache_cap, |item| {
                item.discovered_at
            });
        }
        {
            let mut cache = self.seed_cache.lock();
            cache.extend(result.generated_seeds.iter().cloned());
            evict_oldest_half(&mut cache, self.config.seed_cache_cap, |seed| {
                seed.generated_at
            });
        }
        {
            let mut history = self.history.lock();
            history.push(result.clone());
            evict_oldest_half(&mut history, self.config.history_cap, |r| r.timestamp);
        }

        {
            let mut scoreboard = self.strategy_performance.lock();
            let perf = scoreboard.entry(result.strategy).or_default();
            perf.success_rate = (perf.success_rate + result.success_rate) / 2.0;
            perf.avg_quality = (perf.avg_quality + result.quality_score) / 2.0;
            perf.total_seeds += result.generated_seeds.len() as u64;
        }

        let mut stats = self.stats.lock();
        stats.total_explorations += 1;
        if result.success_rate > 0.5 {
            stats.successful_explorations += 1;
        }
        stats.total_knowledge_discovered += result.discovered_knowledge.len() as u64;
        stats.total_seeds_generated += result.generated_seeds.len() as u64;

        let n = stats.total_explorations as f64;
        stats.average_quality_score =
            (stats.average_quality_score * (n - 1.0) + result.quality_score) / n;
        let prior = stats.average_execution_time.as_secs_f64() * (n - 1.0);
        stats.average_execution_time =
            Duration::from_secs_f64((prior + result.execution_time.as_secs_f64()) / n);
    }
}

/// A target counts as productive when any knowledge item or seed traces back
/// to it.
fn exploration_success_rate(
    targets: &[ExplorationTarget],
    knowledge: &[KnowledgeItem],
    seeds: &[ThinkingSeed],
) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }

    let productive = targets
        .iter()
        .filter(|target| {
            knowledge
                .iter()
                .any(|item| item.related_concepts.contains(&target.target_id))
                || seeds
                    .iter()
                    .any(|seed| seed.context.related_targets.contains(&target.target_id))
        })
        .count();

    productive as f64 / targets.len() as f64
}

/// Drop the oldest half once a soft cap is exceeded.
fn evict_oldest_half<T>(
    entries: &mut Vec<T>,
    cap: usize,
    timestamp: impl Fn(&T) -> chrono::DateTime<Utc>,
) {
    if entries.len() <= cap {
        return;
    }
    entries.sort_by_key(|entry| timestamp(entry));
    let keep_from = entries.len() - cap / 2;
    entries.drain(..keep_from);
}
