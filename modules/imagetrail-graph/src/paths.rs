use std::collections::BTreeSet;

use crate::canonical::root_domain;
use crate::terms::tokenize;
use crate::types::{Edge, Node};

// Affinity constants are a frozen behavioral contract: changing them changes
// observable tree shapes.
const SAME_DOMAIN_AFFINITY: i64 = 26;
const SAME_PLATFORM_AFFINITY: i64 = 8;
const SHARED_TOKEN_AFFINITY: i64 = 5;
const SHARED_TOKEN_CAP: usize = 8;

/// Evidence-gap bonus: nodes of comparable strength plausibly sit close in
/// the propagation chain.
const TIGHT_GAP: i64 = 12;
const TIGHT_GAP_AFFINITY: i64 = 8;
const LOOSE_GAP: i64 = 24;
const LOOSE_GAP_AFFINITY: i64 = 4;

/// Below this, a node attaches to the source rather than a sibling.
const ATTACH_THRESHOLD: i64 = 20;

struct NodeTraits {
    root: Option<String>,
    platform: String,
    score: i64,
    tokens: BTreeSet<String>,
}

impl NodeTraits {
    fn of(node: &Node) -> Self {
        let mut tokens = tokenize(&node.label);
        tokens.extend(tokenize(&node.url));
        Self {
            root: root_domain(&node.url),
            platform: node.platform.clone(),
            score: node.evidence_score,
            tokens,
        }
    }
}

/// Infer a propagation tree over the surviving nodes, rooted at `"src"`.
///
/// Greedy single pass in evidence-score-descending order: each node attaches
/// to the already-placed node with the highest affinity, or to the source
/// when no placed node reaches the threshold. Non-backtracking by design —
/// there is no ground-truth ordering to optimize against.
pub fn infer_edges(nodes: &[Node]) -> Vec<Edge> {
    let traits: Vec<NodeTraits> = nodes.iter().map(NodeTraits::of).collect();

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[b].evidence_score.cmp(&nodes[a].evidence_score));

    let mut placed: Vec<usize> = Vec::with_capacity(nodes.len());
    let mut edges = Vec::with_capacity(nodes.len());

    for &current in &order {
        let mut best: Option<(usize, i64)> = None;
        for &parent in &placed {
            let score = affinity(&traits[parent], &traits[current]);
            // Strict comparison: earliest-placed node wins ties.
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((parent, score));
            }
        }

        let (from, winning_affinity) = match best {
            Some((parent, score)) if score >= ATTACH_THRESHOLD => {
                (nodes[parent].id.clone(), score)
            }
            Some((_, score)) => ("src".to_string(), score),
            None => ("src".to_string(), 0),
        };

        edges.push(Edge {
            from,
            to: nodes[current].id.clone(),
            inferred: true,
            affinity: winning_affinity,
        });
        placed.push(current);
    }

    edges
}

fn affinity(parent: &NodeTraits, current: &NodeTraits) -> i64 {
    let mut score = 0;

    if parent.root.is_some() && parent.root == current.root {
        score += SAME_DOMAIN_AFFINITY;
    }
    if parent.platform == current.platform {
        score += SAME_PLATFORM_AFFINITY;
    }

    let shared = parent.tokens.intersection(&current.tokens).count();
    score += SHARED_TOKEN_AFFINITY * shared.min(SHARED_TOKEN_CAP) as i64;

    let gap = (parent.score - current.score).max(0);
    if gap <= TIGHT_GAP {
        score += TIGHT_GAP_AFFINITY;
    } else if gap <= LOOSE_GAP {
        score += LOOSE_GAP_AFFINITY;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchTier;

    fn node(id: &str, url: &str, platform: &str, score: i64) -> Node {
        Node {
            id: id.to_string(),
            label: crate::platform::label_from_url(url),
            platform: platform.to_string(),
            url: url.to_string(),
            match_type: MatchTier::Full,
            evidence_score: score,
            full_match_count: 0,
            partial_match_count: 0,
        }
    }

    fn inbound<'a>(edges: &'a [Edge], to: &str) -> &'a Edge {
        edges.iter().find(|e| e.to == to).expect("missing inbound edge")
    }

    #[test]
    fn empty_node_list_yields_no_edges() {
        assert!(infer_edges(&[]).is_empty());
    }

    #[test]
    fn first_node_attaches_to_source_with_zero_affinity() {
        let nodes = vec![node("n1", "https://example.com/a", "news", 150)];
        let edges = infer_edges(&nodes);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "src");
        assert_eq!(edges[0].to, "n1");
        assert!(edges[0].inferred);
        assert_eq!(edges[0].affinity, 0);
    }

    #[test]
    fn same_domain_sibling_attaches_to_it() {
        let nodes = vec![
            node("n1", "https://example.com/story", "news", 150),
            node("n2", "https://example.com/repost", "news", 145),
            node("n3", "https://elsewhere.net/unrelated-page", "imgur", 60),
        ];
        let edges = infer_edges(&nodes);

        // n2 shares domain (+26), platform (+8), tokens (example) and a tight
        // gap — comfortably above the threshold.
        assert_eq!(inbound(&edges, "n2").from, "n1");
        assert!(inbound(&edges, "n2").affinity >= 26 + 8 + 8);

        // n3 shares nothing and a wide gap: falls back to the source, with
        // the sub-threshold best affinity recorded.
        let e3 = inbound(&edges, "n3");
        assert_eq!(e3.from, "src");
        assert!(e3.affinity < 20);
    }

    #[test]
    fn every_node_has_exactly_one_inbound_edge_and_src_has_none() {
        let nodes = vec![
            node("n1", "https://a.com/x", "news", 160),
            node("n2", "https://a.com/y", "news", 150),
            node("n3", "https://reddit.com/r/pics", "reddit", 140),
            node("n4", "https://b.net/z", "news", 90),
        ];
        let edges = infer_edges(&nodes);

        assert_eq!(edges.len(), nodes.len());
        for n in &nodes {
            assert_eq!(edges.iter().filter(|e| e.to == n.id).count(), 1);
        }
        assert!(edges.iter().all(|e| e.to != "src"));
    }

    #[test]
    fn tree_has_no_cycles_and_reaches_src() {
        let nodes: Vec<Node> = (1..=6)
            .map(|i| {
                node(
                    &format!("n{i}"),
                    &format!("https://host{}.com/p/{i}", i % 3),
                    "news",
                    200 - i as i64 * 10,
                )
            })
            .collect();
        let edges = infer_edges(&nodes);

        for n in &nodes {
            let mut current = n.id.clone();
            let mut hops = 0;
            while current != "src" {
                current = inbound(&edges, &current).from.clone();
                hops += 1;
                assert!(hops <= nodes.len(), "cycle detected starting at {}", n.id);
            }
        }
    }

    #[test]
    fn processing_order_is_score_descending_regardless_of_input_order() {
        let nodes = vec![
            node("n1", "https://weak.com/a", "news", 50),
            node("n2", "https://strong.com/b", "news", 200),
        ];
        let edges = infer_edges(&nodes);

        // The strongest node is placed first, so it anchors to src.
        assert_eq!(edges[0].to, "n2");
        assert_eq!(edges[0].from, "src");
    }
}
