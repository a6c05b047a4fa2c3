//! Dominance over the execution graph.
//!
//! Vertex `a` dominates vertex `b` iff every route from the origin to `b`
//! passes through `a`. The index is derived entirely from the graph and is
//! rebuilt from scratch after every ingested trace; there is no incremental
//! maintenance.
//!
//! Vertices unreachable from the origin (traces that started elsewhere) are
//! dominated by nothing and dominate nothing.

use petgraph::algo::dominators::{self, Dominators};
use petgraph::graph::{DiGraph, NodeIndex};

use log::debug;

use crate::graph::ExecutionGraph;
use crate::vertex::VertexId;

#[derive(Debug, Clone)]
pub struct DominanceIndex {
    root: VertexId,
    dominators: Dominators<NodeIndex>,
}

fn node(id: VertexId) -> NodeIndex {
    NodeIndex::new(id.index())
}

fn vertex(node: NodeIndex) -> VertexId {
    VertexId::new(node.index() as u32)
}

impl DominanceIndex {
    /// Compute dominators for `graph`, rooted at its origin.
    ///
    /// Returns `None` if the graph has no origin yet.
    pub fn build(graph: &ExecutionGraph) -> Option<Self> {
        let root = graph.origin()?;

        // Node `i` of the mirror is vertex `i` of the graph.
        let mut mirror: DiGraph<(), ()> = DiGraph::with_capacity(graph.len(), graph.edge_count());
        for _ in graph.vertices() {
            mirror.add_node(());
        }
        for v in graph.vertices() {
            for &s in v.successors() {
                mirror.add_edge(node(v.id()), node(s), ());
            }
        }

        debug!(
            "dominance: rebuilding over {} vertices, {} edges",
            mirror.node_count(),
            mirror.edge_count()
        );
        let dominators = dominators::simple_fast(&mirror, node(root));

        Some(Self { root, dominators })
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    /// Does `a` dominate `b`? Reflexive for vertices reachable from the root.
    pub fn dominates(&self, a: VertexId, b: VertexId) -> bool {
        match self.dominators.dominators(node(b)) {
            Some(mut chain) => chain.any(|d| d == node(a)),
            None => false,
        }
    }

    /// The closest strict dominator of `id`; `None` for the root and unreachable vertices.
    pub fn immediate_dominator(&self, id: VertexId) -> Option<VertexId> {
        self.dominators.immediate_dominator(node(id)).map(vertex)
    }

    /// All dominators of `id`, from `id` itself up to the root.
    pub fn dominators(&self, id: VertexId) -> Vec<VertexId> {
        match self.dominators.dominators(node(id)) {
            Some(chain) => chain.map(vertex).collect(),
            None => Vec::new(),
        }
    }
}
