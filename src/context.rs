//! Solver query contexts.
//!
//! A [`Context`] is what the outer search hands to the solver when it wants to
//! flip a target branch: a bounded list of ancestor branch vertices whose
//! conditions may affect whether the target is reachable, together with the
//! trace and branch path that reached the target.
//!
//! Ancestors that dominate the target are dropped: their conditions hold on
//! every route to the target, so they cannot change satisfiability.

use std::collections::HashSet;

use crate::clause::Clause;
use crate::graph::ExecutionGraph;
use crate::trace::{BranchPath, Trace};
use crate::vertex::VertexId;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Context {
    target: VertexId,
    ancestors: Vec<VertexId>,
    trace: Trace,
    path: BranchPath,
}

impl Context {
    /// The branch vertex this context was built for.
    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Non-dominating ancestor branch vertices, most recent first.
    pub fn ancestors(&self) -> &[VertexId] {
        &self.ancestors
    }

    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// The full trace that reached the target along [`path`][Self::path].
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn path(&self) -> &BranchPath {
        &self.path
    }

    /// Clauses of the ancestors, most recent first.
    pub fn conditions<'g>(&self, graph: &'g ExecutionGraph) -> Vec<&'g Clause> {
        self.ancestors.iter().map(|&id| graph[id].clause()).collect()
    }
}

impl ExecutionGraph {
    /// One context per path recorded on `target`, each with at most `k` ancestors.
    ///
    /// Empty if `target` is not a branch vertex of this graph.
    pub fn contexts(&self, target: VertexId, k: usize) -> Vec<Context> {
        let Some(state) = self.get(target).and_then(|v| v.branch_state()) else {
            return Vec::new();
        };

        state
            .paths()
            .map(|(path, trace)| Context {
                target,
                ancestors: self.pruned_ancestors(target, path, k),
                trace: trace.clone(),
                path: path.clone(),
            })
            .collect()
    }

    /// [`contexts`][Self::contexts] with `k` taken from the graph configuration.
    pub fn default_contexts(&self, target: VertexId) -> Vec<Context> {
        self.contexts(target, self.config().context_limit)
    }

    fn pruned_ancestors(&self, target: VertexId, path: &BranchPath, k: usize) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        path.clauses()
            .iter()
            .rev()
            .map(|clause| self.vertex(clause))
            .filter(|&v| v != target && !self.dominates(v, target))
            .filter(|&v| seen.insert(v))
            .take(k)
            .collect()
    }
}
