//! Trend detection and cross-domain insight discovery (stages 4 and 5).

use chrono::Utc;
use std::collections::HashMap;

use crate::types::{CrossDomainInsight, KnowledgeItem, ThinkingSeed, Trend};

/// Words at or below this length are too generic to be trend keywords.
const MIN_KEYWORD_LEN: usize = 4;
/// At most this many trends per exploration.
const MAX_TRENDS: usize = 3;

/// Identify keyword trends across the surviving knowledge items.
///
/// A word becomes a trend when it is longer than three characters and occurs
/// more than once across the batch; the top three by frequency are kept.
#[must_use]
pub fn identify_trends(knowledge: &[KnowledgeItem]) -> Vec<Trend> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for item in knowledge {
        for word in item.content.to_lowercase().split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.chars().count() >= MIN_KEYWORD_LEN {
                *frequency.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut recurring: Vec<(String, usize)> = frequency
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();
    recurring.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let now = Utc::now();
    recurring
        .into_iter()
        .take(MAX_TRENDS)
        .map(|(keyword, _)| Trend {
            trend_id: format!("trend_{keyword}_{}", now.timestamp()),
            supporting_knowledge: knowledge
                .iter()
                .filter(|item| item.content.to_lowercase().contains(&keyword))
                .map(|item| item.knowledge_id.clone())
                .collect(),
            keyword,
            confidence: 0.6,
            identified_at: now,
        })
        .collect()
}

/// Surface one insight per seed that carries cross-domain connections.
#[must_use]
pub fn discover_cross_domain_insights(seeds: &[ThinkingSeed]) -> Vec<CrossDomainInsight> {
    let now = Utc::now();
    seeds
        .iter()
        .filter(|seed| !seed.cross_domain_connections.is_empty())
        .map(|seed| CrossDomainInsight {
            insight_id: format!("cross_domain_{}", seed.seed_id),
            description: format!(
                "innovation opportunity from {}",
                seed.cross_domain_connections[0]
            ),
            supporting_seeds: vec![seed.seed_id.clone()],
            confidence: seed.confidence,
            discovered_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CreativityLevel, ExplorationStrategy, GenerationContext, KnowledgeQuality, SeedOrigin,
        SourceType,
    };

    fn item(id: &str, content: &str) -> KnowledgeItem {
        KnowledgeItem {
            knowledge_id: id.to_string(),
            content: content.to_string(),
            source: String::new(),
            source_type: SourceType::WebSearch,
            quality: KnowledgeQuality::Fair,
            confidence: 0.6,
            relevance: 0.5,
            novelty: 0.6,
            tags: vec![],
            related_concepts: vec![],
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_recurring_words_become_trends() {
        let knowledge = vec![
            item("k1", "wasm runtimes are maturing fast"),
            item("k2", "wasm adoption keeps growing"),
            item("k3", "unrelated note about gardening"),
        ];

        let trends = identify_trends(&knowledge);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].keyword, "wasm");
        assert_eq!(trends[0].confidence, 0.6);
        assert_eq!(
            trends[0].supporting_knowledge,
            vec!["k1".to_string(), "k2".to_string()]
        );
    }

    #[test]
    fn test_short_and_unique_words_are_ignored() {
        let knowledge = vec![item("k1", "the api is the api"), item("k2", "one off words")];
        // "api" has length 3 and everything else occurs once
        assert!(identify_trends(&knowledge).is_empty());
    }

    #[test]
    fn test_at_most_three_trends() {
        let content_a = "alpha beta gamma delta".to_string();
        let knowledge = vec![
            item("k1", &content_a),
            item("k2", &content_a),
            item("k3", &content_a),
        ];
        assert_eq!(identify_trends(&knowledge).len(), 3);
    }

    fn seed(id: &str, connections: Vec<String>) -> ThinkingSeed {
        ThinkingSeed {
            seed_id: id.to_string(),
            content: "seed".to_string(),
            source_knowledge: vec!["k1".to_string()],
            creativity_level: CreativityLevel::High,
            confidence: 0.7,
            suggested_paths: vec![],
            cross_domain_connections: connections,
            potential_applications: vec![],
            generated_at: Utc::now(),
            context: GenerationContext {
                strategy: ExplorationStrategy::CrossDomainLearning,
                origin: SeedOrigin::KnowledgeFusion,
                related_targets: vec![],
                source_quality: None,
            },
        }
    }

    #[test]
    fn test_insights_only_from_connected_seeds() {
        let seeds = vec![
            seed("s1", vec!["fusing biology with software".to_string()]),
            seed("s2", vec![]),
        ];

        let insights = discover_cross_domain_insights(&seeds);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].supporting_seeds, vec!["s1".to_string()]);
        // Confidence is copied from the seed
        assert_eq!(insights[0].confidence, 0.7);
    }
}
