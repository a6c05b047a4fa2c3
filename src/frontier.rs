//! Ranking branch vertices by how many decisions it takes to reach them.
//!
//! The *branch depth* of a branch vertex is the minimum number of branch
//! vertices on any route from the origin to it, counting the vertex itself
//! (and the origin, if it is a branch). The search prefers shallow open
//! branches: they are cheap to reach and their contexts are small.
//!
//! Entering an effect vertex is free and entering a branch vertex costs one,
//! so the traversal is a 0-1 BFS: free steps go to the front of the queue,
//! costly ones to the back, and the first settled distance is the minimum.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::ExecutionGraph;
use crate::vertex::VertexId;

impl ExecutionGraph {
    /// Branch depth of every branch vertex reachable from the origin.
    pub fn branch_depths(&self) -> BTreeMap<VertexId, usize> {
        let Some(origin) = self.origin() else {
            return BTreeMap::new();
        };

        let cost = |id: VertexId| self[id].is_branch() as usize;

        let mut dist = vec![usize::MAX; self.len()];
        let mut queue = VecDeque::new();
        dist[origin.index()] = cost(origin);
        queue.push_back(origin);

        while let Some(v) = queue.pop_front() {
            let d = dist[v.index()];
            for &s in self[v].successors() {
                let w = cost(s);
                if d + w < dist[s.index()] {
                    dist[s.index()] = d + w;
                    if w == 0 {
                        queue.push_front(s);
                    } else {
                        queue.push_back(s);
                    }
                }
            }
        }

        self.branches()
            .filter(|b| dist[b.id().index()] != usize::MAX)
            .map(|b| (b.id(), dist[b.id().index()]))
            .collect()
    }

    /// Branch vertices whose branch depth is exactly `depth`.
    pub fn branches_at(&self, depth: usize) -> BTreeSet<VertexId> {
        self.branch_depths()
            .into_iter()
            .filter(|&(_, d)| d == depth)
            .map(|(id, _)| id)
            .collect()
    }

    /// Branch vertices at `depth` that are not exhausted yet.
    pub fn open_branches_at(&self, depth: usize) -> BTreeSet<VertexId> {
        self.branches_at(depth)
            .into_iter()
            .filter(|&id| !self.is_exhausted(id))
            .collect()
    }
}
