//! Insight, pattern and suggestion extraction from the reviewed turn.

use crate::types::{
    Dimension, ExecutionContext, Insights, ReasoningPath, RetrospectionTask, TaskCharacteristics,
};

/// Structured insights for the reviewed turn.
#[must_use]
pub fn extract(task: &RetrospectionTask) -> Insights {
    Insights {
        task_characteristics: TaskCharacteristics {
            complexity: task.complexity_score,
            success: task.original_turn.success,
            tool_usage: task.original_turn.tool_calls.len(),
            mab_decisions: task.original_turn.mab_decisions.len(),
        },
        execution_context: ExecutionContext {
            phase: task.original_turn.phase,
            error_message: task.original_turn.error_message.clone(),
        },
    }
}

/// What went right, as short reusable statements.
#[must_use]
pub fn success_patterns(task: &RetrospectionTask) -> Vec<String> {
    let mut patterns = Vec::new();
    if !task.original_turn.success {
        return patterns;
    }

    if !task.original_turn.tool_calls.is_empty() {
        patterns.push("successful tool call combination".to_string());
    }
    if task.complexity_score > 0.7 {
        patterns.push("handled a high-complexity task successfully".to_string());
    }
    if task.original_turn.mab_decisions.len() > 2 {
        patterns.push("multi-step MAB decision chain succeeded".to_string());
    }

    patterns
}

/// Why the turn failed, when it did.
#[must_use]
pub fn failure_causes(task: &RetrospectionTask) -> Vec<String> {
    let mut causes = Vec::new();
    if task.original_turn.success {
        return causes;
    }

    if let Some(message) = &task.original_turn.error_message {
        causes.push(format!("system error: {message}"));
    }
    if task.original_turn.tool_calls.is_empty() {
        causes.push("missing necessary tool calls".to_string());
    }

    let failed_tools: Vec<&str> = task
        .original_turn
        .tool_calls
        .iter()
        .filter(|call| !call.success)
        .map(|call| call.tool_name.as_str())
        .collect();
    if !failed_tools.is_empty() {
        causes.push(format!("tool call failures: {}", failed_tools.join(", ")));
    }

    causes
}

/// Forward-looking suggestions joining the ideation output with turn traits.
#[must_use]
pub fn improvement_suggestions(
    task: &RetrospectionTask,
    dimensions: &[Dimension],
    creative_paths: &[ReasoningPath],
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !dimensions.is_empty() {
        suggestions.push(format!(
            "consider {} newly generated solution dimensions",
            dimensions.len()
        ));
    }
    if !creative_paths.is_empty() {
        suggestions.push(format!(
            "try {} creative bypass paths",
            creative_paths.len()
        ));
    }
    if task.complexity_score > 0.8 {
        suggestions.push("decompose high-complexity tasks before executing".to_string());
    }
    if !task.original_turn.success && task.original_turn.tool_calls.is_empty() {
        suggestions.push("add tool calls for richer supporting information".to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ConversationTurn, CreativityLevel, RetrospectionStrategy, TaskPhase, ToolCall,
    };
    use chrono::Utc;

    fn task(success: bool, tool_calls: Vec<ToolCall>, complexity: f64) -> RetrospectionTask {
        RetrospectionTask {
            task_id: "t1".to_string(),
            original_turn: ConversationTurn {
                turn_id: "t1".to_string(),
                user_input: "a question long enough".to_string(),
                response: "answer".to_string(),
                timestamp: Utc::now(),
                success,
                phase: TaskPhase::Completion,
                tool_calls,
                tool_results: vec![],
                error_message: (!success).then(|| "it broke".to_string()),
                mab_decisions: vec!["d1".to_string(), "d2".to_string(), "d3".to_string()],
                execution_time: None,
            },
            selection_reason: "test".to_string(),
            strategy: RetrospectionStrategy::RandomSampling,
            complexity_score: complexity,
            priority_score: 0.5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insights_mirror_turn_counts() {
        let task = task(true, vec![ToolCall::new("grep", true)], 0.4);
        let insights = extract(&task);
        assert_eq!(insights.task_characteristics.tool_usage, 1);
        assert_eq!(insights.task_characteristics.mab_decisions, 3);
        assert!(insights.task_characteristics.success);
        assert_eq!(insights.execution_context.phase, TaskPhase::Completion);
    }

    #[test]
    fn test_success_patterns_only_for_successful_turns() {
        let ok = task(true, vec![ToolCall::new("grep", true)], 0.8);
        let patterns = success_patterns(&ok);
        assert!(patterns.iter().any(|p| p.contains("tool call combination")));
        assert!(patterns.iter().any(|p| p.contains("high-complexity")));
        assert!(patterns.iter().any(|p| p.contains("MAB decision")));

        let failed = task(false, vec![], 0.8);
        assert!(success_patterns(&failed).is_empty());
    }

    #[test]
    fn test_failure_causes_cover_error_and_tools() {
        let failed = task(
            false,
            vec![ToolCall::new("fetch", false), ToolCall::new("parse", true)],
            0.4,
        );
        let causes = failure_causes(&failed);
        assert!(causes.iter().any(|c| c.contains("system error: it broke")));
        assert!(causes.iter().any(|c| c.contains("tool call failures: fetch")));

        let no_tools = task(false, vec![], 0.4);
        assert!(failure_causes(&no_tools)
            .iter()
            .any(|c| c.contains("missing necessary tool calls")));
    }

    #[test]
    fn test_suggestions_join_ideation_output() {
        let reviewed = task(false, vec![], 0.9);
        let dimensions = vec![Dimension {
            dimension_id: "d1".to_string(),
            description: "invert the problem".to_string(),
            creativity_level: CreativityLevel::High,
            dimension_type: "inversion".to_string(),
        }];
        let suggestions = improvement_suggestions(&reviewed, &dimensions, &[]);

        assert!(suggestions.iter().any(|s| s.contains("1 newly generated")));
        assert!(suggestions.iter().any(|s| s.contains("decompose")));
        assert!(suggestions.iter().any(|s| s.contains("add tool calls")));
    }
}
