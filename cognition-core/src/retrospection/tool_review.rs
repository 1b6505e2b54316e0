//! Tool post-mortem: fine-grained analysis of the reviewed turn's tool calls.

use std::collections::HashMap;

use crate::types::{
    ConversationTurn, ParameterPattern, ToolCall, ToolErrorCategory, ToolFailureAnalysis,
    ToolReview, ToolReviewStatus, ToolUsagePatterns,
};

/// Run the full tool post-mortem over one turn.
///
/// Always runs when the turn has at least one tool call; turns without tool
/// calls get a `NoToolsUsed` review.
#[must_use]
pub fn review(turn: &ConversationTurn, complexity: f64) -> ToolReview {
    if turn.tool_calls.is_empty() {
        return ToolReview::no_tools();
    }

    let usage_patterns = usage_patterns(&turn.tool_calls);
    let success_factors = success_factors(turn);
    let failure_analysis = failure_analysis(turn);
    let selection_insights = selection_insights(turn, complexity, &usage_patterns);
    let optimization_suggestions = optimization_suggestions(
        &usage_patterns,
        &success_factors,
        &failure_analysis,
        &selection_insights,
    );

    ToolReview {
        status: ToolReviewStatus::Completed,
        tools_analyzed: turn.tool_calls.len(),
        usage_patterns,
        success_factors,
        failure_analysis,
        selection_insights,
        optimization_suggestions,
    }
}

/// Whether call `index` succeeded, preferring the recorded result over the
/// call's own flag.
fn call_succeeded(turn: &ConversationTurn, index: usize) -> bool {
    turn.tool_results
        .get(index)
        .map_or(turn.tool_calls[index].success, |result| result.success)
}

fn usage_patterns(calls: &[ToolCall]) -> ToolUsagePatterns {
    let call_sequence: Vec<String> = calls.iter().map(|c| c.tool_name.clone()).collect();

    let mut unique_tools: Vec<String> = Vec::new();
    let mut tool_frequency: HashMap<String, usize> = HashMap::new();
    for name in &call_sequence {
        *tool_frequency.entry(name.clone()).or_insert(0) += 1;
        if !unique_tools.contains(name) {
            unique_tools.push(name.clone());
        }
    }

    let most_used_tool = tool_frequency
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, count)| (name.clone(), *count));

    let tool_combinations = call_sequence
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();

    let mut parameter_patterns: HashMap<String, ParameterPattern> = HashMap::new();
    for call in calls {
        let pattern = parameter_patterns.entry(call.tool_name.clone()).or_default();
        for key in call.parameters.keys() {
            if !pattern.param_keys.contains(key) {
                pattern.param_keys.push(key.clone());
            }
        }
        pattern.arg_counts.push(call.parameters.len());
    }
    for pattern in parameter_patterns.values_mut() {
        pattern.param_keys.sort();
    }

    ToolUsagePatterns {
        sequence_length: call_sequence.len(),
        tool_diversity: if call_sequence.is_empty() {
            0.0
        } else {
            unique_tools.len() as f64 / call_sequence.len() as f64
        },
        call_sequence,
        unique_tools,
        tool_frequency,
        most_used_tool,
        tool_combinations,
        parameter_patterns,
    }
}

fn success_factors(turn: &ConversationTurn) -> Vec<String> {
    let mut factors = Vec::new();
    let calls = &turn.tool_calls;

    let successful: Vec<usize> = (0..calls.len())
        .filter(|&i| call_succeeded(turn, i))
        .collect();

    let success_rate = successful.len() as f64 / calls.len() as f64;
    if success_rate > 0.8 {
        factors.push("overall tool call success rate is high".to_string());
    }

    // Per-tool success rates among tools that succeeded at least once
    let mut per_tool: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, call) in calls.iter().enumerate() {
        let entry = per_tool.entry(call.tool_name.as_str()).or_insert((0, 0));
        entry.1 += 1;
        if call_succeeded(turn, i) {
            entry.0 += 1;
        }
    }
    let mut tools: Vec<(&str, (usize, usize))> = per_tool.into_iter().collect();
    tools.sort_by_key(|(name, _)| *name);
    for (tool, (ok, total)) in tools {
        if ok == 0 {
            continue;
        }
        let rate = ok as f64 / total as f64;
        if (rate - 1.0).abs() < f64::EPSILON {
            factors.push(format!("{tool} calls succeeded 100%"));
        } else if rate > 0.8 {
            factors.push(format!("{tool} call success rate is high ({:.0}%)", rate * 100.0));
        }
    }

    // Parameter keys shared by the first few successful calls
    let mut common: Option<std::collections::BTreeSet<String>> = None;
    for &i in successful.iter().take(3) {
        let keys: std::collections::BTreeSet<String> =
            calls[i].parameters.keys().cloned().collect();
        common = Some(match common {
            None => keys,
            Some(prior) => prior.intersection(&keys).cloned().collect(),
        });
    }
    if let Some(common) = common {
        if !common.is_empty() {
            factors.push(format!(
                "successful calls share parameters: {}",
                common.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    factors
}

fn failure_analysis(turn: &ConversationTurn) -> ToolFailureAnalysis {
    let calls = &turn.tool_calls;
    let mut analysis = ToolFailureAnalysis::default();

    let failed_positions: Vec<usize> = (0..calls.len())
        .filter(|&i| !call_succeeded(turn, i))
        .collect();

    if failed_positions.is_empty() {
        return analysis;
    }

    analysis.failed_tools = failed_positions
        .iter()
        .map(|&i| calls[i].tool_name.clone())
        .collect();

    for call in calls {
        let total = calls.iter().filter(|c| c.tool_name == call.tool_name).count();
        let failed = analysis
            .failed_tools
            .iter()
            .filter(|name| **name == call.tool_name)
            .count();
        analysis
            .failure_rate_by_tool
            .insert(call.tool_name.clone(), failed as f64 / total as f64);
    }

    for &i in &failed_positions {
        let message = turn
            .tool_results
            .get(i)
            .and_then(|result| result.error_message.as_deref())
            .unwrap_or("");
        let category = ToolErrorCategory::from_message(message);
        *analysis.error_categories.entry(category).or_insert(0) += 1;
    }

    let consecutive = failed_positions
        .windows(2)
        .any(|pair| pair[0] + 1 == pair[1]);
    if consecutive {
        analysis
            .failure_patterns
            .push("consecutive tool call failures".to_string());
    }

    if failed_positions.contains(&0) {
        analysis
            .critical_failures
            .push("first tool call failed, likely derailed the task".to_string());
    }
    if failed_positions.contains(&(calls.len() - 1)) {
        analysis
            .critical_failures
            .push("last call failed, task may be incomplete".to_string());
    }

    analysis
}

fn selection_insights(
    turn: &ConversationTurn,
    complexity: f64,
    patterns: &ToolUsagePatterns,
) -> Vec<String> {
    let mut insights = Vec::new();
    let tool_count = turn.tool_calls.len();

    if complexity > 0.7 && tool_count < 2 {
        insights.push(
            "high-complexity task used few tools, possible tool under-use".to_string(),
        );
    } else if complexity < 0.3 && tool_count > 5 {
        insights.push(
            "low-complexity task used many tools, possible tool over-use".to_string(),
        );
    }

    if patterns.tool_diversity < 0.3 {
        insights.push("low tool diversity, over-reliance on specific tools".to_string());
    } else if patterns.tool_diversity > 0.8 {
        insights.push("high tool diversity, strategy space well-explored".to_string());
    }

    // Reads happening before writes is the ordering we want to see
    let sequence = &patterns.call_sequence;
    let read_pos = sequence.iter().position(|name| name.contains("read"));
    let write_pos = sequence
        .iter()
        .rposition(|name| name.contains("write") || name.contains("edit"));
    if let (Some(read), Some(write)) = (read_pos, write_pos) {
        if read < write {
            insights.push("followed read-before-write tool ordering".to_string());
        }
    }

    let search_tools = sequence
        .iter()
        .filter(|name| name.contains("search") || name.contains("grep"))
        .count();
    if search_tools > 3 {
        insights.push("heavy use of search tools reflects thorough information gathering".to_string());
    }

    insights
}

fn optimization_suggestions(
    patterns: &ToolUsagePatterns,
    success_factors: &[String],
    failures: &ToolFailureAnalysis,
    insights: &[String],
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if patterns.tool_diversity < 0.3 {
        suggestions.push(
            "increase tool diversity instead of relying on a single tool".to_string(),
        );
    }

    if let Some((tool, count)) = &patterns.most_used_tool {
        if *count > 3 {
            suggestions.push(format!(
                "consider reducing reliance on {tool} and exploring alternatives"
            ));
        }
    }

    let high_failure: Vec<&str> = failures
        .failure_rate_by_tool
        .iter()
        .filter(|(_, rate)| **rate > 0.5)
        .map(|(tool, _)| tool.as_str())
        .collect();
    if !high_failure.is_empty() {
        let mut sorted = high_failure;
        sorted.sort_unstable();
        suggestions.push(format!(
            "prioritize fixing high-failure tools: {}",
            sorted.join(", ")
        ));
    }

    if failures
        .error_categories
        .get(&ToolErrorCategory::Parameter)
        .copied()
        .unwrap_or(0)
        > 0
    {
        suggestions.push("strengthen tool parameter validation".to_string());
    }
    if failures
        .error_categories
        .get(&ToolErrorCategory::Timeout)
        .copied()
        .unwrap_or(0)
        > 0
    {
        suggestions.push("add retries for timeout-prone tools".to_string());
    }

    if success_factors.iter().any(|factor| factor.contains("100%")) {
        suggestions
            .push("keep and generalize the usage pattern of fully successful tools".to_string());
    }

    for insight in insights {
        if insight.contains("under-use") {
            suggestions
                .push("increase tool usage to gather richer supporting information".to_string());
        } else if insight.contains("over-use") {
            suggestions.push("streamline tool calls to improve efficiency".to_string());
        }
    }

    suggestions
}
