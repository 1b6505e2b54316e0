//! Recommendation scoring for stored paths.

use crate::types::{EnhancedPath, RecommendContext};

/// Compute the recommendation score for one candidate path.
///
/// Weighted mix of effectiveness, success rate, usage experience and rating,
/// multiplied by a context-match boost when a task context is given.
#[must_use]
pub fn recommendation_score(path: &EnhancedPath, context: Option<&RecommendContext>) -> f64 {
    let usage_factor = (path.metadata.usage_count as f64 / 100.0).min(1.0);

    let mut score = 0.40 * path.effectiveness_score
        + 0.30 * path.metadata.success_rate
        + 0.15 * usage_factor
        + 0.15 * path.metadata.average_rating;

    if let Some(ctx) = context {
        score *= 1.0 + context_match(path, ctx);
    }

    score
}

/// How well a path matches the task context, in additive boost terms.
#[must_use]
pub fn context_match(path: &EnhancedPath, context: &RecommendContext) -> f64 {
    let mut boost = 0.0;

    if let Some(task_type) = &context.task_type {
        let task_type = task_type.to_lowercase();
        if path
            .metadata
            .keywords
            .iter()
            .any(|kw| kw.to_lowercase() == task_type)
        {
            boost += 0.2;
        }
    }

    if let Some(complexity) = context.complexity {
        if complexity == path.metadata.complexity_level {
            boost += 0.1;
        }
    }

    if !context.tags.is_empty() {
        let common = context
            .tags
            .iter()
            .filter(|tag| path.metadata.tags.contains(tag))
            .count();
        if common > 0 {
            boost += common as f64 / context.tags.len() as f64 * 0.3;
        }
    }

    boost
}

/// Rank candidates by score descending; ties break on higher effectiveness,
/// then lower path id.
pub fn rank(mut scored: Vec<(f64, EnhancedPath)>) -> Vec<EnhancedPath> {
    scored.sort_by(|(score_a, path_a), (score_b, path_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                path_b
                    .effectiveness_score
                    .partial_cmp(&path_a.effectiveness_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| path_a.path_id.cmp(&path_b.path_id))
    });
    scored.into_iter().map(|(_, path)| path).collect()
}
