//! Exploration-target construction from scheduler job context.

use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;

use crate::types::{ExplorationMode, ExplorationTarget, JobContext, TargetKind};
use crate::util::timed_id;

/// Stop words dropped during query keyword extraction.
const STOP_WORDS: &[&str] = &[
    "the", "is", "in", "and", "or", "but", "how", "what", "where", "when", "why", "are", "for",
    "with", "about", "that", "this", "can", "could", "should",
];

#[allow(clippy::unwrap_used)]
fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w+\b").unwrap())
}

/// Extract up to `max` content keywords from a user query.
#[must_use]
pub fn query_keywords(query: &str, max: usize) -> Vec<String> {
    word_pattern()
        .find_iter(&query.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .take(max)
        .collect()
}

/// Build the exploration targets for one scheduled job.
///
/// User-directed jobs split the query into a primary-focus target plus
/// contextual and verification targets when the query calls for them;
/// autonomous jobs get broad gap-filling, serendipity and trend targets.
#[must_use]
pub fn from_job_context(context: &JobContext) -> Vec<ExplorationTarget> {
    match context {
        JobContext::Exploration {
            mode: ExplorationMode::UserDirected,
            user_query: Some(query),
            ..
        } => user_directed_targets(query),
        JobContext::Exploration {
            mode: ExplorationMode::Autonomous,
            ..
        } => autonomous_targets(),
        _ => Vec::new(),
    }
}

fn user_directed_targets(query: &str) -> Vec<ExplorationTarget> {
    let now = Utc::now();
    let keywords = query_keywords(query, 12);
    let lower = query.to_lowercase();

    let mut targets = vec![ExplorationTarget {
        target_id: timed_id("user_primary"),
        kind: TargetKind::PrimaryFocus,
        description: format!("deep exploration of the user query: {query}"),
        keywords: keywords.clone(),
        priority: 0.9,
        depth: 2,
        mode: ExplorationMode::UserDirected,
        user_query: Some(query.to_string()),
        created_at: now,
    }];

    // Solution- and trend-flavored queries benefit from surrounding context
    let wants_context = ["how", "method", "implement", "latest", "trend"]
        .iter()
        .any(|marker| lower.contains(marker));
    if wants_context {
        targets.push(ExplorationTarget {
            target_id: timed_id("user_context"),
            kind: TargetKind::ContextualExpansion,
            description: format!("contextual expansion around: {query}"),
            keywords: keywords.iter().take(6).cloned().collect(),
            priority: 0.6,
            depth: 1,
            mode: ExplorationMode::UserDirected,
            user_query: Some(query.to_string()),
            created_at: now,
        });
    }

    // Comparison and feasibility questions need verification material
    let wants_verification = ["compare", "versus", "vs", "feasib", "possible", "risk"]
        .iter()
        .any(|marker| lower.contains(marker));
    if wants_verification {
        targets.push(ExplorationTarget {
            target_id: timed_id("user_verify"),
            kind: TargetKind::VerificationFocused,
            description: format!("feasibility and risk verification for: {query}"),
            keywords: keywords.iter().take(6).cloned().collect(),
            priority: 0.6,
            depth: 1,
            mode: ExplorationMode::UserDirected,
            user_query: Some(query.to_string()),
            created_at: now,
        });
    }

    targets
}

fn autonomous_targets() -> Vec<ExplorationTarget> {
    let now = Utc::now();
    vec![
        ExplorationTarget {
            target_id: timed_id("autonomous_gap"),
            kind: TargetKind::KnowledgeGapFilling,
            description: "fill blind spots in the current knowledge base".to_string(),
            keywords: vec![
                "missing concepts".to_string(),
                "unexplored areas".to_string(),
                "knowledge boundaries".to_string(),
            ],
            priority: 0.7,
            depth: 1,
            mode: ExplorationMode::Autonomous,
            user_query: None,
            created_at: now,
        },
        ExplorationTarget {
            target_id: timed_id("autonomous_serendipity"),
            kind: TargetKind::SerendipitousDiscovery,
            description: "maximize search diversity hoping for lucky finds".to_string(),
            keywords: vec![
                "interdisciplinary".to_string(),
                "cross-field applications".to_string(),
                "analogies".to_string(),
            ],
            priority: 0.6,
            depth: 1,
            mode: ExplorationMode::Autonomous,
            user_query: None,
            created_at: now,
        },
        ExplorationTarget {
            target_id: timed_id("autonomous_trend"),
            kind: TargetKind::TrendMonitoring,
            description: "track recent developments in relevant fields".to_string(),
            keywords: vec![
                "latest developments".to_string(),
                "technology trends".to_string(),
                "innovative applications".to_string(),
                "future directions".to_string(),
            ],
            priority: 0.8,
            depth: 1,
            mode: ExplorationMode::Autonomous,
            user_query: None,
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExplorationStrategy, TriggerReason};

    #[test]
    fn test_query_keywords_filter_stop_words() {
        let keywords = query_keywords("how is the rust borrow checker implemented", 8);
        assert!(keywords.contains(&"rust".to_string()));
        assert!(keywords.contains(&"borrow".to_string()));
        assert!(!keywords.contains(&"how".to_string()));
        assert!(!keywords.contains(&"the".to_string()));
    }

    #[test]
    fn test_user_directed_always_has_primary_focus() {
        let context = JobContext::Exploration {
            mode: ExplorationMode::UserDirected,
            trigger: TriggerReason::UserInstruction,
            user_query: Some("quantum error correction".to_string()),
            user_context: None,
            strategies: vec![ExplorationStrategy::ExpertKnowledge],
        };

        let targets = from_job_context(&context);
        assert_eq!(targets[0].kind, TargetKind::PrimaryFocus);
        assert_eq!(
            targets[0].user_query.as_deref(),
            Some("quantum error correction")
        );
        assert!(targets.iter().all(|t| t.mode == ExplorationMode::UserDirected));
    }

    #[test]
    fn test_solution_query_adds_contextual_target() {
        let context = JobContext::Exploration {
            mode: ExplorationMode::UserDirected,
            trigger: TriggerReason::UserInstruction,
            user_query: Some("how to shard a postgres database".to_string()),
            user_context: None,
            strategies: vec![],
        };

        let targets = from_job_context(&context);
        assert!(targets
            .iter()
            .any(|t| t.kind == TargetKind::ContextualExpansion));
    }

    #[test]
    fn test_comparison_query_adds_verification_target() {
        let context = JobContext::Exploration {
            mode: ExplorationMode::UserDirected,
            trigger: TriggerReason::UserInstruction,
            user_query: Some("kafka versus rabbitmq for event streaming".to_string()),
            user_context: None,
            strategies: vec![],
        };

        let targets = from_job_context(&context);
        assert!(targets
            .iter()
            .any(|t| t.kind == TargetKind::VerificationFocused));
    }

    #[test]
    fn test_autonomous_targets_cover_discovery_kinds() {
        let context = JobContext::Exploration {
            mode: ExplorationMode::Autonomous,
            trigger: TriggerReason::ProactiveExploration,
            user_query: None,
            user_context: None,
            strategies: vec![],
        };

        let targets = from_job_context(&context);
        let kinds: Vec<TargetKind> = targets.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TargetKind::KnowledgeGapFilling));
        assert!(kinds.contains(&TargetKind::SerendipitousDiscovery));
        assert!(kinds.contains(&TargetKind::TrendMonitoring));
    }

    #[test]
    fn test_non_exploration_context_yields_no_targets() {
        let context = JobContext::Ideation {
            trigger: TriggerReason::PeriodicIdeation,
        };
        assert!(from_job_context(&context).is_empty());
    }
}
