//! Debug utilities for inspecting the execution graph.
//!
//! These are primarily useful in logs, tests and during development.

use std::fmt::Write;

use crate::clause::Clause;
use crate::exhaust::required_outcomes;
use crate::graph::ExecutionGraph;
use crate::vertex::VertexId;

/// Size summary of an execution graph.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GraphStats {
    pub vertices: usize,
    pub branches: usize,
    pub edges: usize,
    pub exhausted: usize,
    pub depth: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} vertices ({} branches, {} exhausted), {} edges, depth {}",
            self.vertices, self.branches, self.exhausted, self.edges, self.depth
        )
    }
}

/// Detailed information about a single vertex.
#[derive(Debug, Clone)]
pub struct VertexInfo {
    pub id: VertexId,
    pub clause: Clause,
    pub is_branch: bool,
    pub is_origin: bool,
    pub exhausted: bool,
    /// Distinct outcomes observed so far (branches only)
    pub outcomes: Option<usize>,
    /// Outcomes needed to close the decision (branches only, `None` if it never closes)
    pub required: Option<usize>,
    /// Branch depth, if reachable from the origin (branches only)
    pub branch_depth: Option<usize>,
    pub immediate_dominator: Option<VertexId>,
    pub predecessors: Vec<VertexId>,
    pub successors: Vec<VertexId>,
    /// Number of recorded branch paths (branches only)
    pub paths: usize,
}

impl std::fmt::Display for VertexInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{} `{}`", self.id, if self.is_origin { " (origin)" } else { "" }, self.clause)?;
        if self.is_branch {
            write!(
                f,
                " outcomes={}/{}",
                self.outcomes.unwrap_or(0),
                self.required.map_or("inf".to_string(), |r| r.to_string())
            )?;
            if self.exhausted {
                write!(f, " exhausted")?;
            }
            if let Some(depth) = self.branch_depth {
                write!(f, " depth={}", depth)?;
            }
            write!(f, " paths={}", self.paths)?;
        }
        if let Some(idom) = self.immediate_dominator {
            write!(f, " idom={}", idom)?;
        }
        write!(f, " preds={:?} succs={:?}", self.predecessors, self.successors)
    }
}

impl ExecutionGraph {
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            vertices: self.len(),
            branches: self.branches().count(),
            edges: self.edge_count(),
            exhausted: self.exhausted.len(),
            depth: self.depth(),
        }
    }

    /// Get detailed information about a single vertex.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn vertex_info(&self, id: VertexId) -> VertexInfo {
        let vertex = &self[id];
        let is_branch = vertex.is_branch();
        VertexInfo {
            id,
            clause: vertex.clause().clone(),
            is_branch,
            is_origin: self.origin() == Some(id),
            exhausted: self.is_exhausted(id),
            outcomes: is_branch.then(|| self.outcome_count(id)),
            required: if is_branch {
                required_outcomes(vertex.clause())
            } else {
                None
            },
            branch_depth: if is_branch {
                self.branch_depths().get(&id).copied()
            } else {
                None
            },
            immediate_dominator: self.immediate_dominator(id),
            predecessors: vertex.predecessors().iter().copied().collect(),
            successors: vertex.successors().iter().copied().collect(),
            paths: vertex.branch_state().map_or(0, |s| s.len()),
        }
    }

    /// Multi-line dump of every vertex.
    pub fn dump(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "ExecutionGraph: {}", self.stats())?;
        for vertex in self.vertices() {
            writeln!(out, "  {}", self.vertex_info(vertex.id()))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Payload, Term};
    use crate::trace::Trace;

    fn sample() -> ExecutionGraph {
        let mut graph = ExecutionGraph::new();
        let input = Clause::effect(0, Payload::opaque("x = input()"));
        let cond = |b| Clause::branch(1, Payload::equality(Term::var("x"), Term::bool(b)));
        graph.ingest(&Trace::new(vec![input.clone(), cond(true)]));
        graph.ingest(&Trace::new(vec![input, cond(false)]));
        graph
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            GraphStats {
                vertices: 3,
                branches: 2,
                edges: 2,
                exhausted: 2,
                depth: 1,
            }
        );
        assert_eq!(stats.to_string(), "3 vertices (2 branches, 2 exhausted), 2 edges, depth 1");
    }

    #[test]
    fn test_vertex_info() {
        let graph = sample();
        let origin = graph.vertex_info(VertexId::new(0));
        assert!(origin.is_origin);
        assert!(!origin.is_branch);
        assert_eq!(origin.outcomes, None);
        assert_eq!(origin.successors.len(), 2);

        let branch = graph.vertex_info(VertexId::new(1));
        assert!(branch.exhausted);
        assert_eq!(branch.outcomes, Some(2));
        assert_eq!(branch.required, Some(2));
        assert_eq!(branch.branch_depth, Some(1));
        assert_eq!(branch.immediate_dominator, Some(VertexId::new(0)));
        assert_eq!(branch.paths, 1);
        assert!(branch.to_string().contains("outcomes=2/2 exhausted depth=1"));
    }

    #[test]
    fn test_dump() {
        let dump = sample().dump().unwrap();
        assert_eq!(dump.lines().count(), 4);
        assert!(dump.contains("(origin)"));
    }
}
