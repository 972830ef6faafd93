pub mod canonical;
pub mod filter;
pub mod paths;
pub mod pipeline;
pub mod platform;
pub mod score;
pub mod select;
pub mod terms;
pub mod types;

pub use canonical::{canonicalize, root_domain};
pub use pipeline::build_graph;
pub use types::{Edge, GraphOptions, MatchTier, Node, ProvenanceGraph, SourceNode, Summary};
