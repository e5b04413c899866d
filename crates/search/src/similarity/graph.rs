//! Similarity graph construction
//!
//! Nodes are the seed plus every ranked candidate (`seed`, `c0..cN-1` by rank).
//! Each candidate hangs off the seed; candidates whose title+abstract overlap
//! reaches the threshold are also linked to each other.

use super::lexical::{jaccard_sets, tokenize};
use paperscope_common::config::GraphConfig;
use paperscope_common::models::Work;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node id of the seed work
pub const SEED_NODE_ID: &str = "seed";

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Seed,
    Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Seed to candidate, unconditional
    Seed,
    /// Candidate to candidate, above the overlap threshold
    Similarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,

    /// Jaccard overlap for similarity edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl SimilarityGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn seed_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Seed).count()
    }

    pub fn similarity_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Similarity).count()
    }

    /// Whether an edge joins the two nodes, in either direction
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges
            .iter()
            .any(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
    }
}

/// Node id of the candidate at `rank`
pub fn candidate_node_id(rank: usize) -> String {
    format!("c{}", rank)
}

/// Title shortened to `max_chars` characters, with `...` appended when cut
pub fn truncate_label(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &title[..byte_idx], ELLIPSIS),
        None => title.to_string(),
    }
}

/// Build the graph for a seed and its ranked candidates
pub fn build_graph(seed: &Work, candidates: &[Work], config: &GraphConfig) -> SimilarityGraph {
    let mut nodes = Vec::with_capacity(candidates.len() + 1);
    let mut edges = Vec::with_capacity(candidates.len());

    nodes.push(GraphNode {
        id: SEED_NODE_ID.to_string(),
        label: truncate_label(&seed.title, config.label_max_chars),
        kind: NodeKind::Seed,
    });

    for (rank, candidate) in candidates.iter().enumerate() {
        nodes.push(GraphNode {
            id: candidate_node_id(rank),
            label: truncate_label(&candidate.title, config.label_max_chars),
            kind: NodeKind::Candidate,
        });
        edges.push(GraphEdge {
            source: SEED_NODE_ID.to_string(),
            target: candidate_node_id(rank),
            kind: EdgeKind::Seed,
            overlap: None,
        });
    }

    // Tokenize once per candidate; the pair loop is O(n²) over at most the cap
    let token_sets: Vec<HashSet<String>> = candidates
        .iter()
        .map(|c| tokenize(&c.similarity_text()))
        .collect();

    for i in 0..token_sets.len() {
        for j in (i + 1)..token_sets.len() {
            let overlap = jaccard_sets(&token_sets[i], &token_sets[j]);
            if overlap >= config.overlap_threshold {
                edges.push(GraphEdge {
                    source: candidate_node_id(i),
                    target: candidate_node_id(j),
                    kind: EdgeKind::Similarity,
                    overlap: Some(overlap),
                });
            }
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        threshold = config.overlap_threshold,
        "Similarity graph built"
    );

    SimilarityGraph { nodes, edges }
}
