use std::collections::BTreeSet;

use url::Url;

use crate::terms::tokenize;
use crate::types::MatchTier;

// Tier base scores. Page-level matches are editorial context; bare image
// URLs carry progressively weaker evidence.
const BASE_PAGE: i64 = 150;
const BASE_FULL: i64 = 120;
const BASE_PARTIAL: i64 = 95;
const BASE_SIMILAR: i64 = 70;
const BASE_UNKNOWN: i64 = 40;

/// Per extra embedded full/partial match on a page, each counter capped.
const FULL_SUBMATCH_BONUS: i64 = 6;
const PARTIAL_SUBMATCH_BONUS: i64 = 3;
const SUBMATCH_CAP: usize = 5;

/// Per query-term overlapping token, capped.
const OVERLAP_BONUS: i64 = 9;
const OVERLAP_CAP: usize = 6;
const NO_OVERLAP_PENALTY: i64 = 12;

const TITLE_BONUS: i64 = 5;

/// Penalty for URL shapes that are thumbnails/CDN assets rather than
/// editorial content.
const LOW_SIGNAL_PENALTY: i64 = 25;

const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".ico", ".avif",
];

const LOW_SIGNAL_HINTS: &[&str] = &[
    "thumb", "icon", "favicon", "avatar", "sprite", "logo", "/api/", "widget",
];

/// Compute a match's evidence score. Pure function of the match fields and
/// the query-term set; source affinity is applied separately afterwards.
pub fn evidence_score(
    tier: MatchTier,
    url: &str,
    title: Option<&str>,
    full_match_count: usize,
    partial_match_count: usize,
    query_terms: &BTreeSet<String>,
) -> i64 {
    let mut score = match tier {
        MatchTier::Page => BASE_PAGE,
        MatchTier::Full => BASE_FULL,
        MatchTier::Partial => BASE_PARTIAL,
        MatchTier::Similar => BASE_SIMILAR,
        MatchTier::Unknown => BASE_UNKNOWN,
    };

    if tier == MatchTier::Page {
        score += FULL_SUBMATCH_BONUS * full_match_count.min(SUBMATCH_CAP) as i64;
        score += PARTIAL_SUBMATCH_BONUS * partial_match_count.min(SUBMATCH_CAP) as i64;
    }

    let mut tokens = tokenize(url);
    if let Some(title) = title {
        tokens.extend(tokenize(title));
    }
    let overlap = tokens.intersection(query_terms).count();
    if overlap == 0 {
        score -= NO_OVERLAP_PENALTY;
    } else {
        score += OVERLAP_BONUS * overlap.min(OVERLAP_CAP) as i64;
    }

    if title.is_some() {
        score += TITLE_BONUS;
    }

    if is_low_signal_url(url) {
        score -= LOW_SIGNAL_PENALTY;
    }

    score
}

/// URL shapes typical of raw assets: image-file paths, thumbnails, icons,
/// API endpoints.
pub fn is_low_signal_url(url: &str) -> bool {
    let lower = url.to_lowercase();

    let path = Url::parse(&lower)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| lower.clone());
    if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return true;
    }

    LOW_SIGNAL_HINTS.iter().any(|hint| lower.contains(hint))
}
