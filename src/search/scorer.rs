//! Relevance scoring for free-text search
//!
//! Each searchable field contributes the score of the best tier it reaches;
//! contributions add up across fields without a cap.

/// Field equals the query
pub const EXACT_MATCH: u32 = 100;

/// Field starts with the query
pub const PREFIX_MATCH: u32 = 50;

/// Field contains the query
pub const SUBSTRING_MATCH: u32 = 25;

/// A whitespace-delimited word of the field contains the query
pub const WORD_MATCH: u32 = 10;

/// Score one field value against an already lowercased, trimmed query
fn field_score(query: &str, value: &str) -> u32 {
    let value = value.to_lowercase();

    if value == query {
        EXACT_MATCH
    } else if value.starts_with(query) {
        PREFIX_MATCH
    } else if value.contains(query) {
        SUBSTRING_MATCH
    } else if value.split_whitespace().any(|word| word.contains(query)) {
        WORD_MATCH
    } else {
        0
    }
}

/// Additive relevance of a record's searchable fields for `query`.
///
/// Matching is case-insensitive. Missing fields contribute nothing and a
/// blank query scores zero.
pub fn relevance_score(query: &str, fields: &[Option<&str>]) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    fields
        .iter()
        .flatten()
        .map(|value| field_score(&query, value))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        assert_eq!(relevance_score("acme", &[Some("Acme")]), EXACT_MATCH);
        assert_eq!(relevance_score("acme", &[Some("Acme Corp")]), PREFIX_MATCH);
        assert_eq!(relevance_score("acme", &[Some("The Acme Co")]), SUBSTRING_MATCH);
        assert_eq!(relevance_score("acme corp", &[Some("Big Acme")]), 0);
        assert_eq!(relevance_score("acme", &[Some("Globex")]), 0);
    }

    #[test]
    fn test_scores_add_across_fields() {
        let fields = [Some("The Acme Co"), None, Some("sales@theacme.io")];
        assert_eq!(relevance_score("acme", &fields), 2 * SUBSTRING_MATCH);
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        assert_eq!(relevance_score("  ACME ", &[Some("acme")]), EXACT_MATCH);
    }

    #[test]
    fn test_blank_query_scores_zero() {
        assert_eq!(relevance_score("   ", &[Some("Acme")]), 0);
        assert_eq!(relevance_score("acme", &[]), 0);
    }

    #[test]
    fn test_query_containing_a_field_word_scores_nothing() {
        assert_eq!(relevance_score("acme", &[Some("Acme"), Some("me")]), EXACT_MATCH);
        assert_eq!(relevance_score("acme co", &[Some("a b")]), 0);
    }
}
