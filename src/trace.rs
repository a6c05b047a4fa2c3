//! Traces and branch paths.
//!
//! A [`Trace`] is the immutable clause sequence of one concrete run. Traces
//! are cheap to clone (the clauses live behind an [`Arc`]) because every
//! branch vertex keeps the traces that reached it.
//!
//! A [`BranchPath`] is the sequence of Path-kind clauses of a trace, from its
//! start up to one particular branch occurrence. All paths cut from one trace
//! share a single allocation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::clause::Clause;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Trace(Arc<[Clause]>);

impl Default for Trace {
    fn default() -> Self {
        Trace::new(Vec::new())
    }
}

impl Trace {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Trace(Arc::from(clauses))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.0.iter()
    }

    /// Path-kind clauses, in trace order.
    pub fn path_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.0.iter().filter(|c| c.is_path())
    }

    /// Number of Path-kind clauses.
    pub fn depth(&self) -> usize {
        self.path_clauses().count()
    }

    /// The full branch path of this trace.
    pub fn branch_path(&self) -> BranchPath {
        BranchPath::from_clauses(self.path_clauses().cloned().collect())
    }
}

impl From<Vec<Clause>> for Trace {
    fn from(clauses: Vec<Clause>) -> Self {
        Trace::new(clauses)
    }
}

impl FromIterator<Clause> for Trace {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Trace(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, clause) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, "]")
    }
}

/// Prefix of a trace's Path-kind clauses, ending at one branch occurrence.
///
/// Equality and hashing look only at the visible prefix, not at the shared
/// buffer behind it.
#[derive(Debug, Clone)]
pub struct BranchPath {
    clauses: Arc<[Clause]>,
    len: usize,
}

impl BranchPath {
    /// Path covering all of `clauses`.
    pub fn from_clauses(clauses: Arc<[Clause]>) -> Self {
        let len = clauses.len();
        Self { clauses, len }
    }

    /// The first `len` clauses of `clauses`.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the number of clauses.
    pub fn prefix(clauses: Arc<[Clause]>, len: usize) -> Self {
        assert!(
            len <= clauses.len(),
            "Prefix length {} exceeds path length {}",
            len,
            clauses.len()
        );
        Self { clauses, len }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The branch occurrence this path ends at.
    pub fn last(&self) -> Option<&Clause> {
        self.clauses().last()
    }
}

impl PartialEq for BranchPath {
    fn eq(&self, other: &Self) -> bool {
        self.clauses() == other.clauses()
    }
}

impl Eq for BranchPath {}

impl Hash for BranchPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.clauses().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Payload, Term};

    fn branch(loc: u32, outcome: bool) -> Clause {
        Clause::branch(loc, Payload::equality(Term::var("c"), Term::bool(outcome)))
    }

    fn effect(loc: u32) -> Clause {
        Clause::effect(loc, Payload::opaque("x = 1"))
    }

    #[test]
    fn test_depth() {
        let trace = Trace::new(vec![effect(0), branch(1, true), effect(2), branch(3, false)]);
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.depth(), 2);
        assert_eq!(Trace::default().depth(), 0);
        assert!(Trace::default().is_empty());
    }

    #[test]
    fn test_branch_path() {
        let trace: Trace = vec![effect(0), branch(1, true), effect(2), branch(3, false)].into();
        let path = trace.branch_path();
        assert_eq!(path.clauses(), &[branch(1, true), branch(3, false)]);
        assert_eq!(path.last(), Some(&branch(3, false)));
    }

    #[test]
    fn test_prefix_equality_ignores_buffer() {
        let long: Arc<[Clause]> = Arc::from(vec![branch(1, true), branch(2, true)]);
        let short: Arc<[Clause]> = Arc::from(vec![branch(1, true)]);

        let a = BranchPath::prefix(long, 1);
        let b = BranchPath::from_clauses(short);
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    #[should_panic(expected = "exceeds path length")]
    fn test_prefix_too_long() {
        let clauses: Arc<[Clause]> = Arc::from(vec![branch(1, true)]);
        BranchPath::prefix(clauses, 2);
    }

    #[test]
    fn test_collect() {
        let trace: Trace = (0..3).map(effect).collect();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.iter().count(), 3);
        assert_eq!((&trace).into_iter().next(), Some(&effect(0)));
    }
}
