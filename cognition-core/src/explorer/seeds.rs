//! Thinking-seed generation (pipeline stage 3).

use chrono::Utc;

use crate::types::{
    CreativityLevel, ExplorationStrategy, GenerationContext, KnowledgeItem, SeedOrigin,
    ThinkingSeed,
};
use crate::util::truncate_chars;

/// Generate thinking seeds from the surviving knowledge items.
///
/// Items are ranked by their mean score; the top `max_seeds` each yield one
/// seed. When at least two items survive, one extra fusion seed combines the
/// top three — it competes for the same budget, so the list is truncated to
/// `max_seeds` at the end.
#[must_use]
pub fn generate(
    knowledge: &[KnowledgeItem],
    strategy: ExplorationStrategy,
    max_seeds: usize,
) -> Vec<ThinkingSeed> {
    let mut ranked: Vec<&KnowledgeItem> = knowledge.iter().collect();
    ranked.sort_by(|a, b| {
        b.mean_score()
            .partial_cmp(&a.mean_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seeds: Vec<ThinkingSeed> = ranked
        .iter()
        .take(max_seeds)
        .map(|item| seed_from_item(item, strategy))
        .collect();

    if ranked.len() >= 2 {
        seeds.push(fusion_seed(&ranked[..ranked.len().min(3)], strategy));
    }

    seeds.truncate(max_seeds);
    seeds
}

/// One seed distilled from a single knowledge item.
fn seed_from_item(item: &KnowledgeItem, strategy: ExplorationStrategy) -> ThinkingSeed {
    let (prefix, creativity) = match strategy {
        ExplorationStrategy::TrendMonitoring => ("Trend watch", CreativityLevel::Medium),
        ExplorationStrategy::CrossDomainLearning => {
            ("Cross-domain insight", CreativityLevel::High)
        }
        ExplorationStrategy::GapAnalysis => ("Gap finding", CreativityLevel::Medium),
        ExplorationStrategy::ExpertKnowledge => ("Expert insight", CreativityLevel::High),
        _ => ("Exploration finding", CreativityLevel::Medium),
    };

    let now = Utc::now();
    ThinkingSeed {
        seed_id: format!("seed_{}_{}", item.knowledge_id, now.timestamp()),
        content: format!("{prefix}: {}", truncate_chars(&item.content, 100)),
        source_knowledge: vec![item.knowledge_id.clone()],
        creativity_level: creativity,
        confidence: (item.confidence * 1.1).min(1.0),
        suggested_paths: suggested_paths(strategy),
        cross_domain_connections: Vec::new(),
        potential_applications: potential_applications(item),
        generated_at: now,
        context: GenerationContext {
            strategy,
            origin: SeedOrigin::SingleKnowledgeItem,
            related_targets: item.related_concepts.clone(),
            source_quality: Some(item.quality),
        },
    }
}

/// One high-creativity seed fusing the top knowledge items.
fn fusion_seed(items: &[&KnowledgeItem], strategy: ExplorationStrategy) -> ThinkingSeed {
    let joined = items
        .iter()
        .map(|item| truncate_chars(&item.content, 50))
        .collect::<Vec<_>>()
        .join(" / ");

    let mean_confidence =
        items.iter().map(|item| item.confidence).sum::<f64>() / items.len() as f64;

    let related_targets: Vec<String> = {
        let mut seen = std::collections::HashSet::new();
        items
            .iter()
            .flat_map(|item| item.related_concepts.iter().cloned())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    };

    let now = Utc::now();
    ThinkingSeed {
        seed_id: format!("fusion_seed_{}", now.timestamp()),
        content: format!("Fused insight: {joined} — combined innovation angle"),
        source_knowledge: items.iter().map(|item| item.knowledge_id.clone()).collect(),
        creativity_level: CreativityLevel::High,
        confidence: mean_confidence,
        suggested_paths: suggested_paths(strategy),
        cross_domain_connections: cross_domain_connections(items),
        potential_applications: vec![
            "cross-domain solution design".to_string(),
            "combined decision optimization".to_string(),
            "multi-angle problem analysis".to_string(),
        ],
        generated_at: now,
        context: GenerationContext {
            strategy,
            origin: SeedOrigin::KnowledgeFusion,
            related_targets,
            source_quality: None,
        },
    }
}

/// Reasoning-path suggestions by strategy.
fn suggested_paths(strategy: ExplorationStrategy) -> Vec<String> {
    let mut paths = vec![
        "analytical_reasoning".to_string(),
        "creative_synthesis".to_string(),
    ];
    let specific: &[&str] = match strategy {
        ExplorationStrategy::TrendMonitoring => &["trend_analysis_path", "predictive_reasoning"],
        ExplorationStrategy::CrossDomainLearning => {
            &["analogical_reasoning", "cross_domain_transfer"]
        }
        ExplorationStrategy::GapAnalysis => &["problem_solving_path", "systematic_analysis"],
        ExplorationStrategy::DomainExpansion => &["exploratory_reasoning", "domain_bridging"],
        ExplorationStrategy::ExpertKnowledge => {
            &["expert_reasoning_path", "professional_methodology"]
        }
        _ => &[],
    };
    paths.extend(specific.iter().map(|s| (*s).to_string()));
    paths
}

/// Suggested application areas for a single-item seed.
fn potential_applications(item: &KnowledgeItem) -> Vec<String> {
    let mut applications = vec![
        "problem solving strategy".to_string(),
        "creative reasoning path".to_string(),
        "decision optimization".to_string(),
    ];
    for tag in item.tags.iter().take(2) {
        applications.push(format!("{tag} applications"));
    }
    applications
}

/// Cross-domain pairings derived from the fused items' tags.
fn cross_domain_connections(items: &[&KnowledgeItem]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for item in items {
        for tag in item.tags.iter().take(2) {
            if !domains.contains(tag) {
                domains.push(tag.clone());
            }
        }
    }

    let mut connections = Vec::new();
    for i in 0..domains.len() {
        for j in (i + 1)..domains.len() {
            connections.push(format!("fusing {} with {}", domains[i], domains[j]));
            if connections.len() >= 3 {
                return connections;
            }
        }
    }
    connections
}
