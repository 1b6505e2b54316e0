use super::*;
use crate::types::{
    CreativityLevel, ExplorationStrategy, GenerationContext, KnowledgeQuality, SeedOrigin,
    ThinkingSeed,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

fn library() -> PathLibrary {
    PathLibrary::new(Arc::new(MemoryStore::new()))
}

fn path(id: &str) -> EnhancedPath {
    EnhancedPath {
        path_id: id.to_string(),
        path_type: "analytical".to_string(),
        description: "decompose the problem".to_string(),
        prompt_template: "solve {task}".to_string(),
        strategy_id: "s1".to_string(),
        instance_id: format!("{id}_0"),
        metadata: PathMetadata::default(),
        is_learned: false,
        learning_source: String::new(),
        effectiveness_score: 0.5,
    }
}

fn exploration_result(seeds: Vec<ThinkingSeed>) -> ExplorationResult {
    ExplorationResult {
        exploration_id: "exploration_test".to_string(),
        strategy: ExplorationStrategy::DomainExpansion,
        targets: vec![],
        discovered_knowledge: vec![],
        generated_seeds: seeds,
        identified_trends: vec![],
        cross_domain_insights: vec![],
        execution_time: Duration::from_secs(1),
        success_rate: 1.0,
        quality_score: 0.6,
        timestamp: Utc::now(),
        error: None,
    }
}

fn seed(content: &str) -> ThinkingSeed {
    ThinkingSeed {
        seed_id: format!("seed_{content}"),
        content: content.to_string(),
        source_knowledge: vec!["k1".to_string()],
        creativity_level: CreativityLevel::Medium,
        confidence: 0.6,
        suggested_paths: vec![],
        cross_domain_connections: vec![],
        potential_applications: vec![],
        generated_at: Utc::now(),
        context: GenerationContext {
            strategy: ExplorationStrategy::DomainExpansion,
            origin: SeedOrigin::SingleKnowledgeItem,
            related_targets: vec![],
            source_quality: Some(KnowledgeQuality::Good),
        },
    }
}

#[tokio::test]
async fn test_add_and_get() {
    let library = library();
    library.add(path("p1")).await.unwrap();

    let fetched = library.get("p1").await.unwrap();
    assert_eq!(fetched.path_id, "p1");

    assert!(matches!(
        library.get("missing").await,
        Err(Error::PathNotFound(_))
    ));

    let stats = library.stats().await;
    assert_eq!(stats.total_paths, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
}

#[tokio::test]
async fn test_add_is_idempotent_via_duplicate_error() {
    let library = library();
    library.add(path("p1")).await.unwrap();

    let before = library.get("p1").await.unwrap();
    assert!(matches!(
        library.add(path("p1")).await,
        Err(Error::DuplicateId(_))
    ));
    let after = library.get("p1").await.unwrap();

    assert_eq!(before, after);
    assert_eq!(library.len().await, 1);
}

#[tokio::test]
async fn test_update_performance_applies_multiplicative_effectiveness() {
    let library = library();
    library.add(path("p1")).await.unwrap();

    for _ in 0..3 {
        library
            .update_performance("p1", true, 2.0, Some(0.8))
            .await
            .unwrap();
    }

    let updated = library.get("p1").await.unwrap();
    assert_eq!(updated.metadata.usage_count, 3);
    assert!((updated.metadata.success_rate - 1.0).abs() < 1e-9);
    assert!((updated.metadata.average_rating - 0.8).abs() < 1e-9);
    assert!((updated.metadata.total_execution_time - 6.0).abs() < 1e-9);
    assert!((updated.effectiveness_score - 0.5 * 1.05f64.powi(3)).abs() < 1e-9);
}

#[tokio::test]
async fn test_effectiveness_bounds_hold_under_repeated_updates() {
    let library = library();
    library.add(path("p1")).await.unwrap();

    for _ in 0..200 {
        library
            .update_performance("p1", true, 0.1, None)
            .await
            .unwrap();
    }
    let ceiling = library.get("p1").await.unwrap();
    assert!((ceiling.effectiveness_score - 1.0).abs() < 1e-9);

    for _ in 0..200 {
        library
            .update_performance("p1", false, 0.1, None)
            .await
            .unwrap();
    }
    let floor = library.get("p1").await.unwrap();
    assert!((floor.effectiveness_score - 0.1).abs() < 1e-9);
    assert!(floor.metadata.success_rate >= 0.0 && floor.metadata.success_rate <= 1.0);
}

#[tokio::test]
async fn test_update_performance_unknown_path_fails() {
    let library = library();
    assert!(matches!(
        library.update_performance("nope", true, 1.0, None).await,
        Err(Error::PathNotFound(_))
    ));
}

#[tokio::test]
async fn test_query_excludes_retired_by_default() {
    let library = library();
    library.add(path("active")).await.unwrap();

    let mut retired = path("retired");
    retired.metadata.status = PathStatus::Retired;
    library.add(retired).await.unwrap();

    let visible = library.query(None, None, false).await;
    assert!(visible.contains_key("active"));
    assert!(!visible.contains_key("retired"));

    let all = library.query(None, None, true).await;
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_recommend_filters_status_and_effectiveness() {
    let library = library();

    let mut strong = path("strong");
    strong.effectiveness_score = 0.9;
    library.add(strong).await.unwrap();

    let mut weak = path("weak");
    weak.effectiveness_score = 0.2;
    library.add(weak).await.unwrap();

    let mut experimental = path("experimental");
    experimental.effectiveness_score = 0.9;
    experimental.metadata.status = PathStatus::Experimental;
    library.add(experimental).await.unwrap();

    let recommended = library.recommend(None, 5, 0.3).await;
    let ids: Vec<&str> = recommended.iter().map(|p| p.path_id.as_str()).collect();
    assert_eq!(ids, vec!["strong"]);
}

#[tokio::test]
async fn test_recommend_min_effectiveness_one_requires_exact_one() {
    let library = library();

    let mut near = path("near");
    near.effectiveness_score = 0.999;
    library.add(near).await.unwrap();

    assert!(library.recommend(None, 5, 1.0).await.is_empty());

    let mut perfect = path("perfect");
    perfect.effectiveness_score = 1.0;
    library.add(perfect).await.unwrap();

    let recommended = library.recommend(None, 5, 1.0).await;
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].path_id, "perfect");
}

#[tokio::test]
async fn test_by_strategy() {
    let library = library();
    library.add(path("p1")).await.unwrap();

    let mut other = path("p2");
    other.strategy_id = "s2".to_string();
    library.add(other).await.unwrap();

    let found = library.by_strategy("s1").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path_id, "p1");

    assert!(library.by_strategy("unknown").await.is_empty());
}

#[tokio::test]
async fn test_learn_from_exploration_skips_duplicates_and_empty() {
    let library = library();

    let result = exploration_result(vec![seed("insight alpha"), seed(""), seed("insight beta")]);
    let first = library
        .learn_from_exploration(&result, "knowledge_explorer")
        .await;
    assert_eq!(first.len(), 2);

    // Learning the same result again adds nothing
    let second = library
        .learn_from_exploration(&result, "knowledge_explorer")
        .await;
    assert!(second.is_empty());
    assert_eq!(library.len().await, 2);

    let learned = library.get(&first[0]).await.unwrap();
    assert!(learned.is_learned);
    assert_eq!(learned.learning_source, "knowledge_explorer");
    assert_eq!(learned.metadata.status, PathStatus::Experimental);
}

#[tokio::test]
async fn test_migrate_from_templates_is_idempotent() {
    let library = library();

    let mut templates = std::collections::HashMap::new();
    for i in 0..3 {
        let id = format!("template_{i}");
        templates.insert(
            id.clone(),
            ReasoningPath {
                path_id: id.clone(),
                path_type: "systematic analysis".to_string(),
                description: "work through the problem methodically".to_string(),
                prompt_template: "approach {task} systematically".to_string(),
                strategy_id: String::new(),
                instance_id: String::new(),
                confidence: 0.5,
            },
        );
    }

    assert_eq!(library.migrate_from_templates(&templates).await, 3);
    assert_eq!(library.migrate_from_templates(&templates).await, 0);
    assert_eq!(library.len().await, 3);

    let migrated = library.get("template_0").await.unwrap();
    assert_eq!(migrated.learning_source, "static_template");
    assert_eq!(migrated.strategy_id, "template_0");
    assert!((migrated.effectiveness_score - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn test_load_from_empty_store_yields_empty_library() {
    let library = PathLibrary::load(Arc::new(MemoryStore::new())).await.unwrap();
    assert!(library.is_empty().await);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// After any sequence of outcomes, success_rate is the exact ratio
        /// and effectiveness stays inside [0.1, 1.0].
        #[test]
        fn prop_performance_invariants(outcomes in proptest::collection::vec(any::<bool>(), 1..60)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(async {
                let library = library();
                library.add(path("p1")).await.unwrap();

                for &success in &outcomes {
                    library.update_performance("p1", success, 0.5, None).await.unwrap();
                }

                let updated = library.get("p1").await.unwrap();
                let successes = outcomes.iter().filter(|s| **s).count() as f64;
                let expected_rate = successes / outcomes.len() as f64;

                prop_assert!((updated.metadata.success_rate - expected_rate).abs() < 1e-9);
                prop_assert!(updated.effectiveness_score >= 0.1 - 1e-12);
                prop_assert!(updated.effectiveness_score <= 1.0 + 1e-12);
                Ok(())
            })?;
        }
    }
}
