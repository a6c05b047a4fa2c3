use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

use crate::clause::Clause;
use crate::trace::{BranchPath, Trace};

/// Lightweight handle to a vertex owned by an [`ExecutionGraph`][crate::graph::ExecutionGraph].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VertexId(u32);

impl VertexId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the internal representation of the handle.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the storage index of the vertex.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for VertexId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Paths recorded on a branch vertex, each with the trace that produced it.
///
/// Recording order is kept so that context building is deterministic.
#[derive(Debug, Clone, Default)]
pub struct BranchState {
    paths: Vec<(BranchPath, Trace)>,
    index: HashMap<BranchPath, usize>,
}

impl BranchState {
    /// Record `path -> trace`. Returns `true` if the path was not seen before.
    ///
    /// A path seen before is rebound to the newer trace.
    pub(crate) fn record(&mut self, path: BranchPath, trace: Trace) -> bool {
        match self.index.get(&path) {
            Some(&i) => {
                self.paths[i].1 = trace;
                false
            }
            None => {
                self.index.insert(path.clone(), self.paths.len());
                self.paths.push((path, trace));
                true
            }
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = (&BranchPath, &Trace)> {
        self.paths.iter().map(|(path, trace)| (path, trace))
    }

    pub fn trace(&self, path: &BranchPath) -> Option<&Trace> {
        self.index.get(path).map(|&i| &self.paths[i].1)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum VertexKind {
    /// Wraps a non-Path clause.
    Effect,
    /// Wraps a Path clause.
    Branch(BranchState),
}

#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    clause: Clause,
    predecessors: BTreeSet<VertexId>,
    successors: BTreeSet<VertexId>,
    kind: VertexKind,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, clause: Clause) -> Self {
        let kind = if clause.is_path() {
            VertexKind::Branch(BranchState::default())
        } else {
            VertexKind::Effect
        };
        Self {
            id,
            clause,
            predecessors: BTreeSet::new(),
            successors: BTreeSet::new(),
            kind,
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    pub fn kind(&self) -> &VertexKind {
        &self.kind
    }

    pub fn predecessors(&self) -> &BTreeSet<VertexId> {
        &self.predecessors
    }

    pub fn successors(&self) -> &BTreeSet<VertexId> {
        &self.successors
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, VertexKind::Branch(_))
    }

    pub fn branch_state(&self) -> Option<&BranchState> {
        match &self.kind {
            VertexKind::Branch(state) => Some(state),
            VertexKind::Effect => None,
        }
    }

    pub(crate) fn branch_state_mut(&mut self) -> Option<&mut BranchState> {
        match &mut self.kind {
            VertexKind::Branch(state) => Some(state),
            VertexKind::Effect => None,
        }
    }

    pub(crate) fn add_predecessor(&mut self, id: VertexId) -> bool {
        self.predecessors.insert(id)
    }

    pub(crate) fn add_successor(&mut self, id: VertexId) -> bool {
        self.successors.insert(id)
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.clause.predicate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Payload, Term};

    fn branch(outcome: bool) -> Clause {
        Clause::branch(1, Payload::equality(Term::var("c"), Term::bool(outcome)))
    }

    #[test]
    fn test_vertex_kind_follows_clause() {
        let b = Vertex::new(VertexId::new(0), branch(true));
        assert!(b.is_branch());
        assert!(b.branch_state().is_some());

        let e = Vertex::new(VertexId::new(1), Clause::effect(2, Payload::opaque("x = 1")));
        assert!(!e.is_branch());
        assert!(e.branch_state().is_none());
    }

    #[test]
    fn test_edges_are_sets() {
        let mut v = Vertex::new(VertexId::new(0), branch(true));
        assert!(v.add_successor(VertexId::new(3)));
        assert!(!v.add_successor(VertexId::new(3)));
        assert!(v.add_predecessor(VertexId::new(2)));
        assert_eq!(v.successors().len(), 1);
        assert_eq!(v.predecessors().len(), 1);
    }

    #[test]
    fn test_record_rebinds_existing_path() {
        let path = Trace::new(vec![branch(true)]).branch_path();
        let t1 = Trace::new(vec![branch(true)]);
        let t2 = Trace::new(vec![Clause::effect(0, Payload::opaque("y = 2")), branch(true)]);

        let mut state = BranchState::default();
        assert!(state.record(path.clone(), t1));
        assert!(!state.record(path.clone(), t2.clone()));
        assert_eq!(state.len(), 1);
        assert_eq!(state.trace(&path), Some(&t2));
    }

    #[test]
    fn test_display() {
        assert_eq!(VertexId::new(4).to_string(), "v4");
        let v = Vertex::new(VertexId::new(0), branch(false));
        assert_eq!(v.to_string(), "[P] c == false");
    }
}
