use std::collections::{BTreeSet, HashSet};

use vision_client::WebDetection;

use crate::canonical::canonicalize;
use crate::filter;
use crate::paths::infer_edges;
use crate::platform::{label_from_url, platform_from_url, DEFAULT_PLATFORM, UNKNOWN_SOURCE};
use crate::score::evidence_score;
use crate::select::{apply_source_affinity, select_source};
use crate::terms::query_terms;
use crate::types::{
    Candidate, GraphOptions, MatchTier, Node, ProvenanceGraph, RawMatch, SourceNode, Summary,
};

/// Flatten a web-detection response into raw matches in response order:
/// pages first, then full, partial, and similar image matches.
pub fn extract_raw_matches(detection: &WebDetection) -> Vec<RawMatch> {
    let mut matches = Vec::new();

    for page in &detection.pages_with_matching_images {
        let Some(url) = page.url.clone() else { continue };
        matches.push(RawMatch {
            url,
            tier: MatchTier::Page,
            title: page.page_title.clone().filter(|t| !t.trim().is_empty()),
            full_match_count: page.full_matching_images.len(),
            partial_match_count: page.partial_matching_images.len(),
        });
    }

    let image_tiers = [
        (&detection.full_matching_images, MatchTier::Full),
        (&detection.partial_matching_images, MatchTier::Partial),
        (&detection.visually_similar_images, MatchTier::Similar),
    ];
    for (images, tier) in image_tiers {
        for image in images.iter() {
            let Some(url) = image.url.clone() else { continue };
            matches.push(RawMatch {
                url,
                tier,
                title: None,
                full_match_count: 0,
                partial_match_count: 0,
            });
        }
    }

    matches
}

/// Canonicalize, deduplicate (first canonical occurrence wins), and score.
fn build_candidates(matches: &[RawMatch], terms: &BTreeSet<String>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for raw in matches {
        let Some(canonical_url) = canonicalize(&raw.url) else { continue };
        if !seen.insert(canonical_url.clone()) {
            continue;
        }
        let score = evidence_score(
            raw.tier,
            &canonical_url,
            raw.title.as_deref(),
            raw.full_match_count,
            raw.partial_match_count,
            terms,
        );
        candidates.push(Candidate {
            canonical_url,
            tier: raw.tier,
            title: raw.title.clone(),
            full_match_count: raw.full_match_count,
            partial_match_count: raw.partial_match_count,
            evidence_score: score,
        });
    }

    candidates
}

/// Build the provenance graph for one web-detection snapshot.
///
/// Deterministic: identical input and options produce identical node order,
/// edges, and summary. Zero surviving matches is a valid, successful result.
pub fn build_graph(detection: &WebDetection, opts: &GraphOptions) -> ProvenanceGraph {
    let opts = opts.clone().clamped();

    let terms = query_terms(detection);
    let raw_matches = extract_raw_matches(detection);
    let mut candidates = build_candidates(&raw_matches, &terms);

    let source_url = select_source(&candidates).map(|idx| candidates.remove(idx).canonical_url);
    let candidate_count = candidates.len();

    let source = match &source_url {
        Some(url) => SourceNode {
            id: "src".to_string(),
            label: label_from_url(url),
            platform: platform_from_url(url).to_string(),
            url: Some(url.clone()),
        },
        None => SourceNode {
            id: "src".to_string(),
            label: UNKNOWN_SOURCE.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            url: None,
        },
    };

    apply_source_affinity(&mut candidates, source_url.as_deref());
    filter::rank(&mut candidates);
    let outcome = filter::apply(candidates, &opts);

    let nodes: Vec<Node> = outcome
        .kept
        .iter()
        .enumerate()
        .map(|(idx, c)| Node {
            id: format!("n{}", idx + 1),
            label: label_from_url(&c.canonical_url),
            platform: platform_from_url(&c.canonical_url).to_string(),
            url: c.canonical_url.clone(),
            match_type: c.tier,
            evidence_score: c.evidence_score,
            full_match_count: c.full_match_count,
            partial_match_count: c.partial_match_count,
        })
        .collect();

    let edges = infer_edges(&nodes);

    let platforms: BTreeSet<String> = nodes.iter().map(|n| n.platform.clone()).collect();

    tracing::debug!(
        candidates = candidate_count,
        kept = nodes.len(),
        strict_dropped = outcome.strict_filtered_out,
        domain_capped = outcome.domain_capped_out,
        source_found = source.url.is_some(),
        "Provenance graph assembled"
    );

    let summary = Summary {
        total_matches: nodes.len(),
        platforms: platforms.into_iter().collect(),
        mode: "live".to_string(),
        source_url_found: source.url.is_some(),
        query_terms: terms.into_iter().collect(),
        strict_filter: opts.strict_filter,
        min_evidence_score: opts.min_evidence_score,
        filtered_out_count: outcome.filtered_out(),
        strict_filtered_out_count: outcome.strict_filtered_out,
        domain_capped_out_count: outcome.domain_capped_out,
        max_per_domain: opts.max_per_domain,
        candidate_count,
        edge_mode: "greedy_affinity".to_string(),
    };

    ProvenanceGraph {
        source,
        nodes,
        edges,
        summary,
    }
}
