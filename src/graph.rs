//! The execution-merge graph.
//!
//! [`ExecutionGraph`] folds a stream of [`Trace`]s into one graph. Every
//! distinct [`Clause`] value owns exactly one vertex, so traces that share a
//! prefix share its vertices, and traces that diverge and later reach an
//! identical clause rejoin at the same vertex.
//!
//! The graph is the single owner of all vertices; vertices refer to each other
//! only through [`VertexId`] handles.
//!
//! # Example
//!
//! ```
//! use cgs_graph::clause::{Clause, CmpOp, Payload, Term};
//! use cgs_graph::graph::ExecutionGraph;
//! use cgs_graph::trace::Trace;
//!
//! let cond = |outcome| {
//!     let gt = Term::cmp(CmpOp::Gt, Term::var("a"), Term::var("b"));
//!     Clause::branch(1, Payload::equality(gt, Term::bool(outcome)))
//! };
//! let input = Clause::effect(0, Payload::opaque("a, b = input()"));
//!
//! let mut graph = ExecutionGraph::new();
//! graph.ingest(&Trace::new(vec![input.clone(), cond(true)]));
//! assert!(!graph.is_clause_exhausted(&cond(true)));
//!
//! graph.ingest(&Trace::new(vec![input, cond(false)]));
//! assert!(graph.is_clause_exhausted(&cond(true)));
//! assert_eq!(graph.depth(), 1);
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Index;
use std::sync::Arc;

use log::{debug, trace};

use crate::clause::Clause;
use crate::config::GraphConfig;
use crate::dominance::DominanceIndex;
use crate::trace::{BranchPath, Trace};
use crate::vertex::{Vertex, VertexId};

#[derive(Debug, Clone)]
pub struct ExecutionGraph {
    config: GraphConfig,
    vertices: Vec<Vertex>,
    index: HashMap<Clause, VertexId>,
    origin: Option<VertexId>,
    /// Vertices that opened some trace.
    entries: BTreeSet<VertexId>,
    pub(crate) exhausted: HashSet<VertexId>,
    depth: usize,
    dominance: Option<DominanceIndex>,
}

impl ExecutionGraph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            vertices: Vec::with_capacity(config.capacity),
            index: HashMap::with_capacity(config.capacity),
            origin: None,
            entries: BTreeSet::new(),
            exhausted: HashSet::new(),
            depth: 0,
            dominance: None,
        }
    }
}

impl Default for ExecutionGraph {
    fn default() -> Self {
        ExecutionGraph::new()
    }
}

impl ExecutionGraph {
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    /// The vertex created from the first clause of the first ingested trace.
    pub fn origin(&self) -> Option<VertexId> {
        self.origin
    }

    /// Maximum number of Path-kind clauses in any single ingested trace.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.successors().len()).sum()
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// All vertices, in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// All branch vertices, in creation order.
    pub fn branches(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_branch())
    }

    /// Vertices that opened some ingested trace.
    pub fn entries(&self) -> &BTreeSet<VertexId> {
        &self.entries
    }

    pub fn find(&self, clause: &Clause) -> Option<VertexId> {
        self.index.get(clause).copied()
    }

    /// The vertex of an ingested clause.
    ///
    /// # Panics
    ///
    /// Panics if `clause` never appeared in an ingested trace.
    pub fn vertex(&self, clause: &Clause) -> VertexId {
        match self.find(clause) {
            Some(id) => id,
            None => panic!("Clause `{}` was never ingested", clause),
        }
    }

    /// The branch vertex of an ingested Path-kind clause.
    ///
    /// # Panics
    ///
    /// Panics if `clause` never appeared in an ingested trace, or is not a Path-kind clause.
    pub fn branch_vertex(&self, clause: &Clause) -> VertexId {
        assert!(clause.is_path(), "Clause `{}` is not a Path clause", clause);
        self.vertex(clause)
    }

    pub fn dominance(&self) -> Option<&DominanceIndex> {
        self.dominance.as_ref()
    }

    /// Does every route from the origin to `b` pass through `a`?
    ///
    /// Always `false` before the first non-empty trace is ingested.
    pub fn dominates(&self, a: VertexId, b: VertexId) -> bool {
        self.dominance.as_ref().is_some_and(|d| d.dominates(a, b))
    }

    pub fn immediate_dominator(&self, id: VertexId) -> Option<VertexId> {
        self.dominance.as_ref().and_then(|d| d.immediate_dominator(id))
    }

    /// Fold one trace into the graph.
    ///
    /// Empty traces are ignored. Every non-empty trace triggers a full rebuild
    /// of the dominance index, even when it adds nothing new; the rebuild is
    /// linear-ish in the size of the whole graph.
    pub fn ingest(&mut self, trace: &Trace) {
        debug!("ingest(trace = {} clauses)", trace.len());

        if trace.is_empty() {
            trace!("ingest: empty trace, nothing to do");
            return;
        }

        let path: Arc<[Clause]> = trace.path_clauses().cloned().collect();
        let mut path_len = 0;
        let mut prev: Option<VertexId> = None;
        let mut touched = Vec::new();

        for clause in trace {
            let current = self.fetch_or_create(clause);

            match prev {
                Some(prev) => self.link(prev, current),
                None => {
                    self.entries.insert(current);
                }
            }

            if clause.is_path() {
                path_len += 1;
                let prefix = BranchPath::prefix(Arc::clone(&path), path_len);
                if let Some(state) = self.vertices[current.index()].branch_state_mut() {
                    if state.record(prefix, trace.clone()) {
                        trace!("ingest: new path of length {} at {}", path_len, current);
                    }
                }
                touched.push(current);
            }

            prev = Some(current);
        }

        let mut seen = HashSet::new();
        for id in touched {
            if seen.insert(id) {
                self.update_exhausted(id);
            }
        }

        let depth = trace.depth();
        if depth > self.depth {
            debug!("ingest: depth {} -> {}", self.depth, depth);
            self.depth = depth;
        }

        self.dominance = DominanceIndex::build(self);
        debug!("ingest: {}", self.stats());
    }

    fn fetch_or_create(&mut self, clause: &Clause) -> VertexId {
        if let Some(&id) = self.index.get(clause) {
            return id;
        }

        assert!(self.vertices.len() < u32::MAX as usize, "Graph is full");
        let id = VertexId::new(self.vertices.len() as u32);
        trace!("new vertex {} for `{}`", id, clause);
        self.vertices.push(Vertex::new(id, clause.clone()));
        self.index.insert(clause.clone(), id);

        if self.origin.is_none() {
            debug!("origin = {}", id);
            self.origin = Some(id);
        }

        id
    }

    fn link(&mut self, from: VertexId, to: VertexId) {
        if self.vertices[from.index()].add_successor(to) {
            trace!("new edge {} -> {}", from, to);
        }
        self.vertices[to.index()].add_predecessor(from);
    }
}

impl Index<VertexId> for ExecutionGraph {
    type Output = Vertex;

    fn index(&self, id: VertexId) -> &Self::Output {
        match self.vertices.get(id.index()) {
            Some(vertex) => vertex,
            None => panic!("Vertex {} does not exist", id),
        }
    }
}
