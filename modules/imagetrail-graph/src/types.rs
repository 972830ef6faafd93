use serde::Serialize;

/// Category of evidence returned by the web-detection service. The dominant
/// scoring factor: a page that embeds the image outranks a bare image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Page,
    Full,
    Partial,
    Similar,
    Unknown,
}

/// One entry lifted from the web-detection response, in response order
/// (pages, then full, partial, similar). Immutable once extracted.
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub url: String,
    pub tier: MatchTier,
    pub title: Option<String>,
    /// Page-tier only: number of full image matches embedded on the page.
    pub full_match_count: usize,
    /// Page-tier only: number of partial image matches embedded on the page.
    pub partial_match_count: usize,
}

/// A deduplicated match with its canonical URL and computed evidence score.
/// At most one candidate exists per canonical URL (first occurrence wins).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub canonical_url: String,
    pub tier: MatchTier,
    pub title: Option<String>,
    pub full_match_count: usize,
    pub partial_match_count: usize,
    pub evidence_score: i64,
}

/// A graph-visible match in the final output.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub platform: String,
    pub url: String,
    pub match_type: MatchTier,
    pub evidence_score: i64,
    pub full_match_count: usize,
    pub partial_match_count: usize,
}

/// The singleton inferred origin, id `"src"`.
#[derive(Debug, Clone, Serialize)]
pub struct SourceNode {
    pub id: String,
    pub label: String,
    pub platform: String,
    pub url: Option<String>,
}

/// A directed propagation edge. Always inferred; carries the affinity that
/// won the parent attachment.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub inferred: bool,
    pub affinity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_matches: usize,
    pub platforms: Vec<String>,
    pub mode: String,
    pub source_url_found: bool,
    pub query_terms: Vec<String>,
    pub strict_filter: bool,
    pub min_evidence_score: i64,
    pub filtered_out_count: usize,
    pub strict_filtered_out_count: usize,
    pub domain_capped_out_count: usize,
    pub max_per_domain: usize,
    pub candidate_count: usize,
    pub edge_mode: String,
}

/// The per-request response aggregate. Constructed fresh per request, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceGraph {
    pub source: SourceNode,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub summary: Summary,
}

/// Knobs for graph construction. Out-of-range values are clamped, not
/// rejected.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub max_nodes: usize,
    pub strict_filter: bool,
    pub min_evidence_score: i64,
    pub max_per_domain: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            max_nodes: 8,
            strict_filter: true,
            min_evidence_score: 130,
            max_per_domain: 2,
        }
    }
}

impl GraphOptions {
    pub fn clamped(mut self) -> Self {
        self.max_nodes = self.max_nodes.clamp(1, 20);
        self.min_evidence_score = self.min_evidence_score.clamp(0, 400);
        self.max_per_domain = self.max_per_domain.clamp(1, 6);
        self
    }
}
