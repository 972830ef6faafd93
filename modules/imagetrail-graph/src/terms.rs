use std::collections::BTreeSet;

use vision_client::WebDetection;

/// Entities scored below this confidence are ignored when building the
/// query-term set.
pub const ENTITY_SCORE_THRESHOLD: f32 = 0.5;

/// Common English filler plus URL noise (scheme, TLD, markup fragments) that
/// would otherwise count as semantic overlap between any two URLs.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "are", "was", "were", "will", "has",
    "have", "had", "not", "but", "all", "any", "you", "your", "our", "its", "about", "into",
    "over", "after", "more", "than", "when", "where", "who", "how", "why", "what", "can", "out",
    "new", "one", "two", "http", "https", "www", "com", "org", "net", "html", "php", "amp",
    "index",
];

/// Split arbitrary text into lowercase alphanumeric tokens of length >= 3,
/// stop-words removed. Backs the query-term extractor, the candidate scorer,
/// and path-inference token overlap.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() >= 3)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Derive the set of tokens describing what the image depicts, from the
/// service's best-guess labels and high-confidence entity descriptions.
///
/// An empty set is valid: it simply yields zero overlap bonus everywhere.
pub fn query_terms(detection: &WebDetection) -> BTreeSet<String> {
    let mut terms = BTreeSet::new();

    for label in &detection.best_guess_labels {
        if let Some(text) = &label.label {
            terms.extend(tokenize(text));
        }
    }

    for entity in &detection.web_entities {
        if entity.score.unwrap_or(0.0) < ENTITY_SCORE_THRESHOLD {
            continue;
        }
        if let Some(description) = &entity.description {
            terms.extend(tokenize(description));
        }
    }

    terms
}
