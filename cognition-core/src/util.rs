//! Small shared helpers for id derivation and text handling.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Derive a short stable hex digest from content.
///
/// Used for content-addressed ids (`learned_<hash8>`, `knowledge_<hash8>_…`).
/// Stable for the same content within a process, which is all the duplicate
/// detection contracts require.
#[must_use]
pub fn hash8(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

/// Generate a unique time-derived id with the given prefix.
///
/// Combines epoch milliseconds with a process-wide monotonic counter so ids
/// minted in the same millisecond stay unique.
#[must_use]
pub fn timed_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{millis}_{seq}")
}

/// Truncate a string to at most `max` characters on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Word-set Jaccard similarity between two texts, lowercased.
///
/// Returns 0.0 when either side has no words.
#[must_use]
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let words_a: std::collections::HashSet<String> =
        a.to_lowercase().split_whitespace().map(String::from).collect();
    let words_b: std::collections::HashSet<String> =
        b.to_lowercase().split_whitespace().map(String::from).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash8_is_stable_and_short() {
        let a = hash8("some thinking seed content");
        let b = hash8("some thinking seed content");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert_ne!(a, hash8("different content"));
    }

    #[test]
    fn test_timed_ids_are_unique() {
        let ids: Vec<String> = (0..100).map(|_| timed_id("job")).collect();
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids[0].starts_with("job_"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("short", 100), "short");
        // Multi-byte chars must not be split
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_jaccard_similarity_bounds() {
        assert_eq!(jaccard_similarity("a b c", "a b c"), 1.0);
        assert_eq!(jaccard_similarity("a b", "c d"), 0.0);
        assert_eq!(jaccard_similarity("", "a b"), 0.0);

        let partial = jaccard_similarity("a b c d", "a b x y");
        assert!(partial > 0.0 && partial < 1.0);
    }
}
