//! Knowledge extraction and quality evaluation (pipeline stage 2).

use chrono::Utc;

use crate::types::{KnowledgeItem, KnowledgeQuality, QualityControlConfig, RawFinding};
use crate::util::{hash8, jaccard_similarity};

/// Findings shorter than this carry no usable knowledge.
const MIN_CONTENT_CHARS: usize = 10;
/// How many recent cache entries the novelty check compares against.
const NOVELTY_WINDOW: usize = 10;
/// Similarity above this marks a finding as a near-duplicate.
const NOVELTY_SIMILARITY_CUTOFF: f64 = 0.8;

/// Turn one raw finding into an evaluated knowledge item.
///
/// Returns `None` for findings below the minimum content length. `recent`
/// is the tail of the knowledge cache used for the novelty check.
#[must_use]
pub fn evaluate(finding: &RawFinding, recent: &[KnowledgeItem]) -> Option<KnowledgeItem> {
    let content = finding.content.trim();
    if content.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }

    let confidence = finding.source_type.credibility();
    let relevance = relevance_band(&finding.content);
    let novelty = novelty_score(&finding.content, recent);

    let overall = 0.4 * confidence + 0.4 * relevance + 0.2 * novelty;
    let quality = KnowledgeQuality::from_overall_score(overall);

    let now = Utc::now();
    Some(KnowledgeItem {
        knowledge_id: format!(
            "knowledge_{}_{}",
            hash8(&finding.content),
            now.timestamp()
        ),
        content: finding.content.clone(),
        source: if finding.url.is_empty() {
            finding.query.clone()
        } else {
            finding.url.clone()
        },
        source_type: finding.source_type,
        quality,
        confidence,
        relevance,
        novelty,
        tags: extract_tags(&finding.content),
        related_concepts: vec![finding.target_id.clone()],
        discovered_at: now,
    })
}

/// Whether an evaluated item clears the quality filter.
#[must_use]
pub fn passes_filter(item: &KnowledgeItem, thresholds: &QualityControlConfig) -> bool {
    item.quality != KnowledgeQuality::Unreliable
        && item.confidence >= thresholds.min_confidence_threshold
        && item.relevance >= thresholds.min_relevance_threshold
}

/// Relevance banded by content length.
fn relevance_band(content: &str) -> f64 {
    let length = content.chars().count();
    if length < 50 {
        0.3
    } else if length < 200 {
        0.5
    } else if length < 500 {
        0.7
    } else {
        0.8
    }
}

/// Low novelty when any recent cached item is a near-duplicate.
fn novelty_score(content: &str, recent: &[KnowledgeItem]) -> f64 {
    let window_start = recent.len().saturating_sub(NOVELTY_WINDOW);
    let duplicate = recent[window_start..]
        .iter()
        .any(|item| jaccard_similarity(content, &item.content) > NOVELTY_SIMILARITY_CUTOFF);

    if duplicate { 0.2 } else { 0.6 }
}

/// Coarse tags: the first few distinct longer words of the content.
fn extract_tags(content: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    content
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| word.chars().count() > 4 && seen.insert(word.clone()))
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;

    fn finding(content: &str, source_type: SourceType) -> RawFinding {
        RawFinding {
            content: content.to_string(),
            title: "title".to_string(),
            url: "https://example.com".to_string(),
            source_type,
            query: "query".to_string(),
            target_id: "t1".to_string(),
            collected_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_content_is_discarded() {
        assert!(evaluate(&finding("short", SourceType::WebSearch), &[]).is_none());
        assert!(evaluate(&finding("   tiny   ", SourceType::WebSearch), &[]).is_none());
    }

    #[test]
    fn test_relevance_bands() {
        let short = "a".repeat(40);
        let medium = "a".repeat(150);
        let long = "a".repeat(400);
        let very_long = "a".repeat(600);

        assert_eq!(
            evaluate(&finding(&short, SourceType::WebSearch), &[]).unwrap().relevance,
            0.3
        );
        assert_eq!(
            evaluate(&finding(&medium, SourceType::WebSearch), &[]).unwrap().relevance,
            0.5
        );
        assert_eq!(
            evaluate(&finding(&long, SourceType::WebSearch), &[]).unwrap().relevance,
            0.7
        );
        assert_eq!(
            evaluate(&finding(&very_long, SourceType::WebSearch), &[]).unwrap().relevance,
            0.8
        );
    }

    #[test]
    fn test_confidence_follows_source_credibility() {
        let item = evaluate(
            &finding("an academically sourced finding", SourceType::AcademicPaper),
            &[],
        )
        .unwrap();
        assert_eq!(item.confidence, 0.9);
        assert_eq!(item.source_type, SourceType::AcademicPaper);
    }

    #[test]
    fn test_near_duplicate_lowers_novelty() {
        let first = evaluate(
            &finding("rust async runtimes compared in detail", SourceType::WebSearch),
            &[],
        )
        .unwrap();
        assert_eq!(first.novelty, 0.6);

        let near_duplicate = evaluate(
            &finding("rust async runtimes compared in detail", SourceType::WebSearch),
            &[first],
        )
        .unwrap();
        assert_eq!(near_duplicate.novelty, 0.2);
    }

    #[test]
    fn test_filter_thresholds() {
        let thresholds = QualityControlConfig::default();

        let good = evaluate(
            &finding(&"substantial content ".repeat(20), SourceType::WebSearch),
            &[],
        )
        .unwrap();
        assert!(passes_filter(&good, &thresholds));

        let untrusted = evaluate(
            &finding(&"substantial content ".repeat(20), SourceType::Unknown),
            &[],
        )
        .unwrap();
        // Unknown source credibility 0.3 is below the 0.4 confidence floor
        assert!(!passes_filter(&untrusted, &thresholds));
    }

    #[test]
    fn test_related_concepts_carry_target_id() {
        let item = evaluate(
            &finding("long enough content here", SourceType::WebSearch),
            &[],
        )
        .unwrap();
        assert!(item.related_concepts.contains(&"t1".to_string()));
    }
}
