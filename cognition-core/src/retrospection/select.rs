//! Stage 1 — Select: pick the historical turn most worth reviewing.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;

use crate::types::{ConversationTurn, RetrospectionStrategy, TaskSelectionConfig};

/// Minimum user-input length for a turn to be worth reviewing.
const MIN_INPUT_CHARS: usize = 10;

/// Filter the conversation history down to reviewable candidates.
///
/// A candidate is old enough that the dust has settled, young enough to still
/// matter, and carries a non-trivial user input.
#[must_use]
pub fn filter_candidates<'a>(
    history: &'a [ConversationTurn],
    config: &TaskSelectionConfig,
    now: DateTime<Utc>,
) -> Vec<&'a ConversationTurn> {
    history
        .iter()
        .filter(|turn| {
            let age = now.signed_duration_since(turn.timestamp);
            let Ok(age) = age.to_std() else {
                // Timestamp in the future: skip
                return false;
            };
            age >= config.min_task_age
                && age <= config.max_task_age
                && turn.user_input.trim().chars().count() >= MIN_INPUT_CHARS
        })
        .collect()
}

/// Pick one candidate according to the strategy.
///
/// Returns the chosen turn and a human-readable selection reason, or `None`
/// when the candidate pool is empty.
#[must_use]
pub fn select<'a>(
    candidates: &[&'a ConversationTurn],
    strategy: RetrospectionStrategy,
) -> Option<(&'a ConversationTurn, String)> {
    if candidates.is_empty() {
        return None;
    }
    let mut rng = rand::rng();

    match strategy {
        RetrospectionStrategy::RandomSampling => candidates
            .choose(&mut rng)
            .map(|turn| (*turn, "random sampling".to_string())),

        // Low-satisfaction has no rating signal yet and mirrors
        // failure-focused until one exists.
        RetrospectionStrategy::FailureFocused | RetrospectionStrategy::LowSatisfaction => {
            let failed: Vec<&ConversationTurn> = candidates
                .iter()
                .copied()
                .filter(|turn| !turn.success)
                .collect();
            if let Some(turn) = failed.choose(&mut rng) {
                Some((*turn, "failure focused: learn from the failed turn".to_string()))
            } else {
                candidates
                    .choose(&mut rng)
                    .map(|turn| (*turn, "no failed turns, fell back to random".to_string()))
            }
        }

        RetrospectionStrategy::ComplexityBased => candidates
            .iter()
            .copied()
            .max_by(|a, b| {
                complexity(a)
                    .partial_cmp(&complexity(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|turn| {
                (
                    turn,
                    format!("highest complexity: {:.2}", complexity(turn)),
                )
            }),

        RetrospectionStrategy::RecentTasks => candidates
            .iter()
            .copied()
            .max_by_key(|turn| turn.timestamp)
            .map(|turn| (turn, "most recent turn".to_string())),

        RetrospectionStrategy::ToolFailure => {
            let tool_failed: Vec<&ConversationTurn> = candidates
                .iter()
                .copied()
                .filter(|turn| turn.tool_calls.iter().any(|call| !call.success))
                .collect();
            if let Some(turn) = tool_failed.choose(&mut rng) {
                Some((*turn, "tool failure: analyze the failing tool calls".to_string()))
            } else {
                candidates
                    .choose(&mut rng)
                    .map(|turn| (*turn, "no tool failures, fell back to random".to_string()))
            }
        }
    }
}

/// Task complexity score in [0, 1].
///
/// Input length contributes up to 0.3, tool calls up to 0.4, MAB decisions up
/// to 0.2 and execution time up to 0.1.
#[must_use]
pub fn complexity(turn: &ConversationTurn) -> f64 {
    let mut score = (turn.user_input.chars().count() as f64 / 500.0).min(0.3);
    score += (turn.tool_calls.len() as f64 * 0.2).min(0.4);
    score += (turn.mab_decisions.len() as f64 * 0.1).min(0.2);
    if let Some(execution_time) = turn.execution_time {
        score += (execution_time.as_secs_f64() / 60.0).min(0.1);
    }
    score.min(1.0)
}

/// Priority score of a selected turn under the active strategy.
#[must_use]
pub fn priority_score(
    turn: &ConversationTurn,
    strategy: RetrospectionStrategy,
    config: &TaskSelectionConfig,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 0.5;

    if matches!(
        strategy,
        RetrospectionStrategy::FailureFocused | RetrospectionStrategy::LowSatisfaction
    ) && !turn.success
    {
        score += config.failure_priority_boost;
    }

    if strategy == RetrospectionStrategy::ComplexityBased {
        score += complexity(turn);
    }

    if strategy == RetrospectionStrategy::RecentTasks {
        let age_hours = now
            .signed_duration_since(turn.timestamp)
            .num_seconds()
            .max(0) as f64
            / 3600.0;
        score += (1.0 - age_hours / 24.0).max(0.0);
    }

    score.min(3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskPhase, ToolCall};
    use std::time::Duration;

    fn turn(id: &str, age_secs: i64, input: &str, success: bool) -> ConversationTurn {
        ConversationTurn {
            turn_id: id.to_string(),
            user_input: input.to_string(),
            response: "answer".to_string(),
            timestamp: Utc::now() - chrono::Duration::seconds(age_secs),
            success,
            phase: TaskPhase::Completion,
            tool_calls: vec![],
            tool_results: vec![],
            error_message: None,
            mab_decisions: vec![],
            execution_time: None,
        }
    }

    #[test]
    fn test_candidate_window_excludes_fresh_and_stale_turns() {
        let config = TaskSelectionConfig::default();
        let history = vec![
            turn("too_fresh", 10, "a question long enough", true),
            turn("in_window", 300, "a question long enough", true),
            turn("too_old", 25 * 3600, "a question long enough", true),
            turn("too_short", 300, "short", true),
        ];

        let candidates = filter_candidates(&history, &config, Utc::now());
        let ids: Vec<&str> = candidates.iter().map(|t| t.turn_id.as_str()).collect();
        assert_eq!(ids, vec!["in_window"]);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        assert!(select(&[], RetrospectionStrategy::RandomSampling).is_none());
    }

    #[test]
    fn test_failure_focused_prefers_failed_turns() {
        let ok = turn("ok", 300, "a question long enough", true);
        let failed = turn("failed", 300, "a question long enough", false);
        let candidates = vec![&ok, &failed];

        for _ in 0..10 {
            let (selected, _) = select(&candidates, RetrospectionStrategy::FailureFocused).unwrap();
            assert_eq!(selected.turn_id, "failed");
        }
    }

    #[test]
    fn test_failure_focused_falls_back_to_random() {
        let ok = turn("ok", 300, "a question long enough", true);
        let candidates = vec![&ok];

        let (selected, reason) =
            select(&candidates, RetrospectionStrategy::FailureFocused).unwrap();
        assert_eq!(selected.turn_id, "ok");
        assert!(reason.contains("random"));
    }

    #[test]
    fn test_recent_tasks_picks_latest() {
        let old = turn("old", 5000, "a question long enough", true);
        let recent = turn("recent", 300, "a question long enough", true);
        let candidates = vec![&old, &recent];

        let (selected, _) = select(&candidates, RetrospectionStrategy::RecentTasks).unwrap();
        assert_eq!(selected.turn_id, "recent");
    }

    #[test]
    fn test_tool_failure_prefers_turns_with_failing_calls() {
        let mut with_failure = turn("tool_failed", 300, "a question long enough", true);
        with_failure.tool_calls = vec![
            ToolCall::new("read_file", true),
            ToolCall::new("write_file", false),
        ];
        let clean = turn("clean", 300, "a question long enough", true);
        let candidates = vec![&clean, &with_failure];

        for _ in 0..10 {
            let (selected, _) = select(&candidates, RetrospectionStrategy::ToolFailure).unwrap();
            assert_eq!(selected.turn_id, "tool_failed");
        }
    }

    #[test]
    fn test_complexity_components_and_cap() {
        let mut simple = turn("simple", 300, "a question long enough", true);
        assert!(complexity(&simple) < 0.1);

        simple.user_input = "x".repeat(1000);
        simple.tool_calls = (0..10).map(|_| ToolCall::new("grep", true)).collect();
        simple.mab_decisions = (0..10).map(|i| format!("d{i}")).collect();
        simple.execution_time = Some(Duration::from_secs(600));

        // 0.3 + 0.4 + 0.2 + 0.1, capped at 1.0
        assert!((complexity(&simple) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_priority_score_failure_boost() {
        let config = TaskSelectionConfig::default();
        let failed = turn("failed", 300, "a question long enough", false);

        let boosted = priority_score(
            &failed,
            RetrospectionStrategy::FailureFocused,
            &config,
            Utc::now(),
        );
        assert!((boosted - 2.5).abs() < 1e-9);

        let plain = priority_score(
            &failed,
            RetrospectionStrategy::RandomSampling,
            &config,
            Utc::now(),
        );
        assert!((plain - 0.5).abs() < 1e-9);
    }
}
