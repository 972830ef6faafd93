use crate::canonical::root_domain;
use crate::types::{Candidate, MatchTier};

/// Score adjustment once a source is known: candidates on the source's root
/// domain are corroborating, everything else drifts down slightly.
const SAME_DOMAIN_BONUS: i64 = 16;
const OTHER_DOMAIN_PENALTY: i64 = 8;

/// Pick the most plausible origin from the deduplicated candidate pool.
///
/// Page-tier candidates compete on evidence score (ties: first in response
/// order). With no page-tier candidate, fall back to the first-seen full,
/// then partial, then similar match, unscored. Returns the winning index.
pub fn select_source(candidates: &[Candidate]) -> Option<usize> {
    let mut best_page: Option<usize> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        if candidate.tier != MatchTier::Page {
            continue;
        }
        match best_page {
            Some(current) if candidates[current].evidence_score >= candidate.evidence_score => {}
            _ => best_page = Some(idx),
        }
    }
    if best_page.is_some() {
        return best_page;
    }

    for tier in [MatchTier::Full, MatchTier::Partial, MatchTier::Similar] {
        if let Some(idx) = candidates.iter().position(|c| c.tier == tier) {
            return Some(idx);
        }
    }
    None
}

/// Fold the source's root domain into every remaining candidate's score.
/// The adjusted value becomes the candidate's final `evidence_score`.
pub fn apply_source_affinity(candidates: &mut [Candidate], source_url: Option<&str>) {
    let source_root = match source_url.and_then(root_domain) {
        Some(root) => root,
        None => return,
    };

    for candidate in candidates.iter_mut() {
        if root_domain(&candidate.canonical_url).as_deref() == Some(source_root.as_str()) {
            candidate.evidence_score += SAME_DOMAIN_BONUS;
        } else {
            candidate.evidence_score -= OTHER_DOMAIN_PENALTY;
        }
    }
}
