//! Creation of new library paths from exploration thinking seeds.

use chrono::Utc;

use crate::types::{
    CreativityLevel, EnhancedPath, PathCategory, PathMetadata, PathStatus, ThinkingSeed,
};
use crate::util::{hash8, truncate_chars};

/// Fixed prompt template used for every learned path. Keeps the `{task}` and
/// `{thinking_seed}` slots the downstream planner substitutes into.
const LEARNED_PROMPT_TEMPLATE: &str = "Apply a learned reasoning pattern to the task: {task}

Learned thinking path:
{seed_content}

Application steps:
1. Pattern recognition: identify the key structures in the task
2. Knowledge application: apply the learned way of thinking
3. Creative fusion: combine with existing knowledge
4. Validation: check the solution for soundness and feasibility

Thinking seed: {thinking_seed}
Use the learned pattern above to produce a solution.";

/// Build a learnable path record from one thinking seed.
///
/// Returns `None` for seeds with empty content. The path id is derived from
/// the seed content, so re-learning the same seed is naturally idempotent.
#[must_use]
pub fn path_from_seed(seed: &ThinkingSeed, source: &str) -> Option<EnhancedPath> {
    let content = seed.content.trim();
    if content.is_empty() {
        return None;
    }

    let path_id = format!("learned_{}", hash8(content));

    let (path_type, category) = if seed.creativity_level == CreativityLevel::High {
        ("learned_innovative", PathCategory::Creative)
    } else if !seed.cross_domain_connections.is_empty() {
        ("learned_cross_domain", PathCategory::Adaptive)
    } else {
        ("learned_analytical", PathCategory::Analytical)
    };

    let complexity = match seed.creativity_level {
        CreativityLevel::Low => crate::types::ComplexityLevel::Low,
        CreativityLevel::Medium => crate::types::ComplexityLevel::Medium,
        CreativityLevel::High => crate::types::ComplexityLevel::High,
    };

    let now = Utc::now();
    let metadata = PathMetadata {
        created_at: now,
        updated_at: now,
        author: source.to_string(),
        category,
        // New learned paths start out unproven
        status: PathStatus::Experimental,
        tags: vec!["learned".to_string(), "adaptive".to_string()],
        keywords: seed.potential_applications.clone(),
        complexity_level: complexity,
        ..PathMetadata::default()
    };

    Some(EnhancedPath {
        path_id: path_id.clone(),
        path_type: path_type.to_string(),
        description: format!(
            "Learned from {source}: {}",
            truncate_chars(content, 100)
        ),
        prompt_template: LEARNED_PROMPT_TEMPLATE.replace("{seed_content}", content),
        strategy_id: format!("learned_{:?}", seed.creativity_level).to_lowercase(),
        instance_id: format!("{path_id}_{}", now.timestamp()),
        metadata,
        is_learned: true,
        learning_source: source.to_string(),
        effectiveness_score: 0.5,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExplorationStrategy, GenerationContext, SeedOrigin};

    fn seed(content: &str, creativity: CreativityLevel, cross_domain: Vec<String>) -> ThinkingSeed {
        ThinkingSeed {
            seed_id: "seed_1".to_string(),
            content: content.to_string(),
            source_knowledge: vec!["k1".to_string()],
            creativity_level: creativity,
            confidence: 0.7,
            suggested_paths: vec![],
            cross_domain_connections: cross_domain,
            potential_applications: vec!["planning".to_string()],
            generated_at: Utc::now(),
            context: GenerationContext {
                strategy: ExplorationStrategy::DomainExpansion,
                origin: SeedOrigin::SingleKnowledgeItem,
                related_targets: vec![],
                source_quality: None,
            },
        }
    }

    #[test]
    fn test_empty_seed_yields_no_path() {
        let seed = seed("   ", CreativityLevel::Medium, vec![]);
        assert!(path_from_seed(&seed, "knowledge_explorer").is_none());
    }

    #[test]
    fn test_high_creativity_becomes_creative_path() {
        let seed = seed("novel angle", CreativityLevel::High, vec![]);
        let path = path_from_seed(&seed, "knowledge_explorer").unwrap();
        assert_eq!(path.metadata.category, PathCategory::Creative);
        assert_eq!(path.path_type, "learned_innovative");
        assert_eq!(path.metadata.status, PathStatus::Experimental);
        assert!((path.effectiveness_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cross_domain_becomes_adaptive_path() {
        let seed = seed(
            "transfer idea",
            CreativityLevel::Medium,
            vec!["biology and software".to_string()],
        );
        let path = path_from_seed(&seed, "knowledge_explorer").unwrap();
        assert_eq!(path.metadata.category, PathCategory::Adaptive);
        assert_eq!(path.path_type, "learned_cross_domain");
    }

    #[test]
    fn test_default_becomes_analytical_path() {
        let seed = seed("plain finding", CreativityLevel::Medium, vec![]);
        let path = path_from_seed(&seed, "knowledge_explorer").unwrap();
        assert_eq!(path.metadata.category, PathCategory::Analytical);
        assert!(path.is_learned);
        assert_eq!(path.learning_source, "knowledge_explorer");
    }

    #[test]
    fn test_template_keeps_substitution_slots() {
        let seed = seed("pattern", CreativityLevel::Medium, vec![]);
        let path = path_from_seed(&seed, "x").unwrap();
        assert!(path.prompt_template.contains("{task}"));
        assert!(path.prompt_template.contains("{thinking_seed}"));
        assert!(path.prompt_template.contains("pattern"));
    }

    #[test]
    fn test_same_content_derives_same_id() {
        let a = path_from_seed(&seed("identical", CreativityLevel::Low, vec![]), "x").unwrap();
        let b = path_from_seed(&seed("identical", CreativityLevel::High, vec![]), "y").unwrap();
        assert_eq!(a.path_id, b.path_id);
    }
}
