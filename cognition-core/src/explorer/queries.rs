//! Search-query construction for exploration targets.
//!
//! Two tracks: user-directed targets get deeper, more varied queries (up to
//! eight), autonomous targets get fewer, broader discovery queries (up to
//! four). When a confident semantic analysis of the user query is available
//! its intent and domain drive template selection; otherwise fixed
//! per-strategy template families apply.

use crate::host::{QueryDomain, QueryIntent, SemanticAnalysis};
use crate::types::{ExplorationMode, ExplorationStrategy, ExplorationTarget, TargetKind};

/// Query budget for a user-directed target.
const MAX_USER_DIRECTED_QUERIES: usize = 8;
/// Query budget for an autonomous target.
const MAX_AUTONOMOUS_QUERIES: usize = 4;

/// Build the search queries for one target.
///
/// `semantics` is the analysis of the originating user query, when one was
/// available and confident enough to act on.
#[must_use]
pub fn build(
    target: &ExplorationTarget,
    strategy: ExplorationStrategy,
    semantics: Option<&SemanticAnalysis>,
    confidence_threshold: f64,
) -> Vec<String> {
    let mut queries = match target.mode {
        ExplorationMode::UserDirected => {
            let semantic = semantics
                .and_then(|s| semantic_queries(target, strategy, s, confidence_threshold));
            semantic.unwrap_or_else(|| user_directed_queries(target, strategy))
        }
        ExplorationMode::Autonomous => autonomous_queries(target, strategy),
    };

    dedup_in_order(&mut queries);
    let budget = match target.mode {
        ExplorationMode::UserDirected => MAX_USER_DIRECTED_QUERIES,
        ExplorationMode::Autonomous => MAX_AUTONOMOUS_QUERIES,
    };
    queries.truncate(budget);
    queries
}

/// Queries derived from a confident semantic analysis.
///
/// Returns `None` when neither intent nor domain cleared the confidence
/// threshold, so the caller falls back to the keyword templates.
fn semantic_queries(
    target: &ExplorationTarget,
    strategy: ExplorationStrategy,
    semantics: &SemanticAnalysis,
    threshold: f64,
) -> Option<Vec<String>> {
    let intent = semantics
        .intent
        .filter(|c| c.confidence >= threshold)
        .map(|c| c.value);
    let domain = semantics
        .domain
        .filter(|c| c.confidence >= threshold)
        .map(|c| c.value);

    if intent.is_none() && domain.is_none() {
        return None;
    }

    let keywords: Vec<&str> = if semantics.keywords.is_empty() {
        target.keywords.iter().map(String::as_str).take(3).collect()
    } else {
        semantics.keywords.iter().map(String::as_str).take(5).collect()
    };

    let mut queries = Vec::new();
    if let Some(query) = &target.user_query {
        queries.push(query.clone());
    }

    if let Some(intent) = intent {
        for keyword in keywords.iter().take(3) {
            for template in intent_templates(intent).iter().take(2) {
                queries.push(template.replace("{}", keyword));
            }
        }
    }

    if let Some(domain) = domain {
        for keyword in keywords.iter().take(3) {
            for template in domain_templates(domain).iter().take(2) {
                queries.push(template.replace("{}", keyword));
            }
        }
    }

    for keyword in keywords.iter().take(2) {
        for template in strategy_templates(strategy) {
            queries.push(template.replace("{}", keyword));
        }
    }

    Some(queries)
}

/// Keyword-template queries for a user-directed target, grouped by the role
/// the target plays.
fn user_directed_queries(
    target: &ExplorationTarget,
    strategy: ExplorationStrategy,
) -> Vec<String> {
    let keywords: Vec<&str> = target.keywords.iter().map(String::as_str).take(4).collect();
    let mut queries = Vec::new();

    match target.kind {
        TargetKind::PrimaryFocus => {
            if let Some(query) = &target.user_query {
                queries.push(query.clone());
            }
            for keyword in keywords.iter().take(2) {
                for template in strategy_templates(strategy) {
                    queries.push(template.replace("{}", keyword));
                }
            }
        }
        TargetKind::ContextualExpansion => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} background knowledge"));
                queries.push(format!("{keyword} application scenarios"));
                queries.push(format!("{keyword} prerequisites"));
                queries.push(format!("{keyword} related technology stack"));
            }
        }
        TargetKind::VerificationFocused => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} feasibility assessment"));
                queries.push(format!("{keyword} risk analysis"));
                queries.push(format!("{keyword} implementation challenges"));
                queries.push(format!("{keyword} success and failure cases"));
            }
        }
        _ => {
            for keyword in keywords.iter().take(3) {
                queries.push(format!("{keyword} detailed explanation"));
                queries.push(format!("{keyword} in-depth analysis"));
                queries.push(format!("{keyword} complete guide"));
            }
        }
    }

    queries
}

/// Broad discovery queries for an autonomous target.
fn autonomous_queries(target: &ExplorationTarget, _strategy: ExplorationStrategy) -> Vec<String> {
    let keywords: Vec<&str> = target.keywords.iter().map(String::as_str).take(3).collect();
    let mut queries = Vec::new();

    match target.kind {
        TargetKind::KnowledgeGapFilling => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} fundamental concepts"));
                queries.push(format!("{keyword} related fields"));
                queries.push(format!("{keyword} application examples"));
            }
        }
        TargetKind::SerendipitousDiscovery => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} unexpected applications"));
                queries.push(format!("{keyword} innovation breakthroughs"));
                queries.push(format!("{keyword} interdisciplinary fusion"));
                queries.push(format!("{keyword} future possibilities"));
            }
        }
        TargetKind::TrendMonitoring => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} latest developments"));
                queries.push(format!("{keyword} emerging directions"));
                queries.push(format!("{keyword} development trends"));
            }
        }
        _ => {
            for keyword in keywords.iter().take(2) {
                queries.push(format!("{keyword} overview"));
                queries.push(format!("{keyword} key ideas"));
            }
        }
    }

    queries
}

/// Fixed template family per exploration strategy.
fn strategy_templates(strategy: ExplorationStrategy) -> &'static [&'static str] {
    match strategy {
        ExplorationStrategy::ExpertKnowledge => &[
            "{} expert deep analysis",
            "{} authoritative guide",
            "{} professional methodology",
            "{} industry best practices",
        ],
        ExplorationStrategy::TrendMonitoring => &[
            "{} 2024 latest trend",
            "{} future direction forecast",
            "{} technology roadmap",
            "{} innovation progress",
        ],
        ExplorationStrategy::CompetitiveIntelligence => &[
            "{} competitive analysis",
            "{} market landscape comparison",
            "{} strengths and weaknesses",
            "{} competitive strategy",
        ],
        ExplorationStrategy::CrossDomainLearning => &[
            "{} cross-domain applications",
            "{} innovative fusion",
            "{} interdisciplinary cases",
        ],
        ExplorationStrategy::DomainExpansion => &[
            "{} application domains",
            "{} related technologies",
            "{} extended applications",
        ],
        ExplorationStrategy::GapAnalysis => &[
            "{} technical bottlenecks",
            "{} open challenges",
            "{} solutions",
        ],
        ExplorationStrategy::SerendipityDiscovery => &[
            "{} surprising findings",
            "{} unconventional approaches",
            "{} creative possibilities",
        ],
    }
}

/// Template family per detected user intent.
fn intent_templates(intent: QueryIntent) -> &'static [&'static str] {
    match intent {
        QueryIntent::SolutionSeeking => &[
            "{} solution",
            "{} best practice",
            "{} implementation approach",
            "{} detailed tutorial",
        ],
        QueryIntent::ComparisonAnalysis => &[
            "{} comparison",
            "{} pros and cons",
            "{} selection guide",
            "{} performance comparison",
        ],
        QueryIntent::TrendMonitoring => &[
            "{} latest trends",
            "{} 2024 developments",
            "{} future directions",
        ],
        QueryIntent::LearningRequest => &[
            "{} fundamentals",
            "{} learning guide",
            "{} core concepts",
        ],
        QueryIntent::ProblemDiagnosis => &[
            "{} common problems",
            "{} troubleshooting",
            "{} diagnostic methods",
        ],
        QueryIntent::InformationSeeking => &["{} detailed information"],
    }
}

/// Template family per detected domain.
fn domain_templates(domain: QueryDomain) -> &'static [&'static str] {
    match domain {
        QueryDomain::Technology => &[
            "{} technical principles",
            "{} architecture design",
            "{} performance optimization",
        ],
        QueryDomain::Business => &[
            "{} business model",
            "{} market analysis",
            "{} case studies",
        ],
        QueryDomain::Academic => &[
            "{} state of research",
            "{} theoretical foundations",
            "{} research methods",
        ],
        QueryDomain::Health => &[
            "{} health impact",
            "{} clinical research",
            "{} professional advice",
        ],
        QueryDomain::Education => &[
            "{} learning resources",
            "{} teaching methods",
            "{} skill development",
        ],
        QueryDomain::General => &["{} professional analysis"],
    }
}

/// Remove duplicates while keeping first-seen order.
fn dedup_in_order(queries: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    queries.retain(|q| !q.trim().is_empty() && seen.insert(q.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Classified;
    use chrono::Utc;

    fn target(mode: ExplorationMode, kind: TargetKind, user_query: Option<&str>) -> ExplorationTarget {
        ExplorationTarget {
            target_id: "t1".to_string(),
            kind,
            description: "test target".to_string(),
            keywords: vec!["rust".to_string(), "async".to_string()],
            priority: 0.8,
            depth: 1,
            mode,
            user_query: user_query.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_directed_budget_is_eight() {
        let target = target(
            ExplorationMode::UserDirected,
            TargetKind::PrimaryFocus,
            Some("how to use rust async"),
        );
        let queries = build(&target, ExplorationStrategy::ExpertKnowledge, None, 0.7);
        assert!(!queries.is_empty());
        assert!(queries.len() <= 8);
        // The user query itself always leads
        assert_eq!(queries[0], "how to use rust async");
    }

    #[test]
    fn test_autonomous_budget_is_four() {
        let target = target(
            ExplorationMode::Autonomous,
            TargetKind::SerendipitousDiscovery,
            None,
        );
        let queries = build(&target, ExplorationStrategy::SerendipityDiscovery, None, 0.7);
        assert!(!queries.is_empty());
        assert!(queries.len() <= 4);
    }

    #[test]
    fn test_expert_strategy_uses_expert_templates() {
        let target = target(ExplorationMode::UserDirected, TargetKind::PrimaryFocus, None);
        let queries = build(&target, ExplorationStrategy::ExpertKnowledge, None, 0.7);
        assert!(queries.iter().any(|q| q.contains("expert deep analysis")));
        assert!(queries.iter().any(|q| q.contains("authoritative guide")));
    }

    #[test]
    fn test_confident_semantics_drive_templates() {
        let target = target(
            ExplorationMode::UserDirected,
            TargetKind::PrimaryFocus,
            Some("how to fix flaky integration tests"),
        );
        let semantics = SemanticAnalysis {
            intent: Some(Classified {
                value: QueryIntent::SolutionSeeking,
                confidence: 0.9,
            }),
            domain: None,
            keywords: vec!["flaky".to_string(), "tests".to_string()],
        };

        let queries = build(&target, ExplorationStrategy::ExpertKnowledge, Some(&semantics), 0.7);
        assert!(queries.iter().any(|q| q.contains("solution")));
        assert!(queries.iter().any(|q| q.contains("best practice")));
    }

    #[test]
    fn test_low_confidence_semantics_fall_back() {
        let target = target(
            ExplorationMode::UserDirected,
            TargetKind::PrimaryFocus,
            Some("anything"),
        );
        let semantics = SemanticAnalysis {
            intent: Some(Classified {
                value: QueryIntent::SolutionSeeking,
                confidence: 0.4,
            }),
            domain: None,
            keywords: vec![],
        };

        let queries = build(&target, ExplorationStrategy::ExpertKnowledge, Some(&semantics), 0.7);
        // Falls back to the strategy templates instead of intent templates
        assert!(queries.iter().any(|q| q.contains("expert deep analysis")));
        assert!(!queries.iter().any(|q| q.ends_with(" solution")));
    }

    #[test]
    fn test_queries_are_deduplicated() {
        let target = target(ExplorationMode::Autonomous, TargetKind::TrendMonitoring, None);
        let queries = build(&target, ExplorationStrategy::TrendMonitoring, None, 0.7);
        let unique: std::collections::HashSet<&String> = queries.iter().collect();
        assert_eq!(unique.len(), queries.len());
    }
}
