use std::collections::HashMap;

use crate::canonical::root_domain;
use crate::types::{Candidate, GraphOptions};

/// Surviving candidates plus what each pipeline step discarded.
#[derive(Debug)]
pub struct FilterOutcome {
    pub kept: Vec<Candidate>,
    pub strict_filtered_out: usize,
    pub domain_capped_out: usize,
}

impl FilterOutcome {
    pub fn filtered_out(&self) -> usize {
        self.strict_filtered_out + self.domain_capped_out
    }
}

/// Order candidates by adjusted evidence score, breaking ties by full-match
/// count, partial-match count, then title presence, all descending. Stable:
/// remaining ties keep first-seen order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        (
            b.evidence_score,
            b.full_match_count,
            b.partial_match_count,
            b.title.is_some(),
        )
            .cmp(&(
                a.evidence_score,
                a.full_match_count,
                a.partial_match_count,
                a.title.is_some(),
            ))
    });
}

/// Apply the evidence threshold, the per-domain cap, and the node budget,
/// in that order, over candidates already in ranked order.
pub fn apply(ranked: Vec<Candidate>, opts: &GraphOptions) -> FilterOutcome {
    let before_strict = ranked.len();
    let survivors: Vec<Candidate> = if opts.strict_filter {
        ranked
            .into_iter()
            .filter(|c| c.evidence_score >= opts.min_evidence_score)
            .collect()
    } else {
        ranked
    };
    let strict_filtered_out = before_strict - survivors.len();

    let mut per_domain: HashMap<String, usize> = HashMap::new();
    let mut kept = Vec::with_capacity(survivors.len());
    let mut domain_capped_out = 0;
    for candidate in survivors {
        let key = root_domain(&candidate.canonical_url)
            .unwrap_or_else(|| candidate.canonical_url.clone());
        let count = per_domain.entry(key).or_insert(0);
        if *count >= opts.max_per_domain {
            domain_capped_out += 1;
            continue;
        }
        *count += 1;
        kept.push(candidate);
    }

    kept.truncate(opts.max_nodes);

    FilterOutcome {
        kept,
        strict_filtered_out,
        domain_capped_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchTier;

    fn candidate(url: &str, score: i64) -> Candidate {
        Candidate {
            canonical_url: url.to_string(),
            tier: MatchTier::Full,
            title: None,
            full_match_count: 0,
            partial_match_count: 0,
            evidence_score: score,
        }
    }

    fn opts() -> GraphOptions {
        GraphOptions {
            max_nodes: 8,
            strict_filter: true,
            min_evidence_score: 100,
            max_per_domain: 2,
        }
    }

    #[test]
    fn ranking_orders_by_score_then_counts_then_title() {
        let mut candidates = vec![
            candidate("https://a.com/1", 100),
            candidate("https://b.com/2", 120),
            Candidate {
                title: Some("t".to_string()),
                ..candidate("https://c.com/3", 100)
            },
            Candidate {
                full_match_count: 2,
                ..candidate("https://d.com/4", 100)
            },
        ];
        rank(&mut candidates);

        let urls: Vec<&str> = candidates.iter().map(|c| c.canonical_url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://b.com/2", "https://d.com/4", "https://c.com/3", "https://a.com/1"]
        );
    }

    #[test]
    fn strict_filter_drops_below_threshold() {
        let ranked = vec![candidate("https://a.com/1", 130), candidate("https://b.com/2", 99)];
        let outcome = apply(ranked, &opts());

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.strict_filtered_out, 1);
        assert_eq!(outcome.filtered_out(), 1);
    }

    #[test]
    fn strict_filter_disabled_keeps_weak_candidates() {
        let ranked = vec![candidate("https://a.com/1", 5)];
        let outcome = apply(
            ranked,
            &GraphOptions {
                strict_filter: false,
                ..opts()
            },
        );
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.strict_filtered_out, 0);
    }

    #[test]
    fn domain_cap_keeps_highest_ranked_per_root_domain() {
        let ranked = vec![
            candidate("https://a.site.com/1", 150),
            candidate("https://b.site.com/2", 140),
            candidate("https://c.site.com/3", 130),
            candidate("https://other.net/4", 120),
        ];
        let outcome = apply(ranked, &opts());

        let urls: Vec<&str> = outcome.kept.iter().map(|c| c.canonical_url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.site.com/1", "https://b.site.com/2", "https://other.net/4"]
        );
        assert_eq!(outcome.domain_capped_out, 1);
    }

    #[test]
    fn truncation_respects_node_budget_without_counting_as_filtered() {
        let ranked: Vec<Candidate> = (0..12i64)
            .map(|i| candidate(&format!("https://host{i}.com/p"), 200 - i))
            .collect();
        let outcome = apply(
            ranked,
            &GraphOptions {
                max_nodes: 5,
                ..opts()
            },
        );

        assert_eq!(outcome.kept.len(), 5);
        assert_eq!(outcome.strict_filtered_out, 0);
        assert_eq!(outcome.domain_capped_out, 0);
    }
}
