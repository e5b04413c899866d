//! Lexical similarity between works
//!
//! Token-set Jaccard overlap on raw title+abstract text, and the radial
//! similarity graph built from it.

mod graph;
mod lexical;

pub use graph::{
    build_graph, truncate_label, EdgeKind, GraphEdge, GraphNode, NodeKind, SimilarityGraph,
    SEED_NODE_ID,
};
pub use lexical::{jaccard, jaccard_sets, tokenize};
