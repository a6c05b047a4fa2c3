//! Exhaustiveness tracking for branch vertices.
//!
//! A branch vertex is *exhausted* once every statically possible outcome of
//! its decision has been observed. Outcomes are counted over the vertex's
//! sibling set: the successors of its predecessors, or, for a vertex that
//! opened some trace, the branch vertices at the same location that opened
//! some trace. A decision closes when the count is exactly the number of
//! outcomes it needs; a sibling set that outgrew it belongs to a merge point,
//! not to a single decision.
//!
//! | decision                                   | outcomes needed |
//! |--------------------------------------------|-----------------|
//! | comparison against a runtime type          | never           |
//! | two-way branch                             | 2               |
//! | switch with `N` explicit targets           | `N + 1`         |
//! | table switch over `R` keys                 | `R + 1`         |
//! | other equality / inequality                | 2               |
//! | anything else                              | never           |
//!
//! Exhaustion is monotonic: nothing ever leaves the exhausted set.

use std::collections::BTreeSet;

use log::debug;

use crate::clause::Clause;
use crate::graph::ExecutionGraph;
use crate::vertex::VertexId;

/// Number of distinct outcomes that close the decision recorded by `clause`,
/// or `None` if no number of observations can close it.
pub fn required_outcomes(clause: &Clause) -> Option<usize> {
    let payload = clause.predicate().payload();
    if payload.is_type_check() {
        return None;
    }
    match clause.instruction().outcomes() {
        Some(n) => Some(n),
        None if payload.is_comparison() => Some(2),
        None => None,
    }
}

impl ExecutionGraph {
    pub fn is_exhausted(&self, id: VertexId) -> bool {
        self.exhausted.contains(&id)
    }

    /// # Panics
    ///
    /// Panics if `clause` was never ingested or is not a Path clause.
    pub fn is_clause_exhausted(&self, clause: &Clause) -> bool {
        self.is_exhausted(self.branch_vertex(clause))
    }

    /// Force the branch vertex of `clause` into the exhausted set, e.g. after
    /// the solver proved its remaining outcomes infeasible.
    ///
    /// # Panics
    ///
    /// Panics if `clause` was never ingested or is not a Path clause.
    pub fn mark_exhausted(&mut self, clause: &Clause) {
        debug!("mark_exhausted(clause = {})", clause);
        let id = self.branch_vertex(clause);
        if self.exhausted.insert(id) {
            debug!("{} exhausted (manual)", id);
        }
    }

    /// Exhausted vertices, sorted.
    pub fn exhausted(&self) -> BTreeSet<VertexId> {
        self.exhausted.iter().copied().collect()
    }

    /// Successors of the predecessors of `id`.
    ///
    /// If `id` has no predecessors, the branch vertices at its location that
    /// opened some trace.
    pub fn siblings(&self, id: VertexId) -> BTreeSet<VertexId> {
        let vertex = &self[id];
        if vertex.predecessors().is_empty() {
            let location = vertex.clause().location();
            return self
                .entries()
                .iter()
                .copied()
                .filter(|&e| self[e].is_branch() && self[e].clause().location() == location)
                .collect();
        }
        vertex
            .predecessors()
            .iter()
            .flat_map(|&p| self[p].successors().iter().copied())
            .collect()
    }

    /// Number of distinct outcomes observed for the decision at `id`.
    pub fn outcome_count(&self, id: VertexId) -> usize {
        self.siblings(id).len()
    }

    fn is_exhaustive(&self, id: VertexId) -> bool {
        let vertex = &self[id];
        if !vertex.is_branch() {
            return false;
        }
        match required_outcomes(vertex.clause()) {
            Some(required) => self.outcome_count(id) == required,
            None => false,
        }
    }

    /// Re-evaluate `id` and its sibling branch vertices, whose outcome counts
    /// may have grown together with it.
    pub(crate) fn update_exhausted(&mut self, id: VertexId) {
        let candidates: Vec<VertexId> = std::iter::once(id)
            .chain(self.siblings(id).into_iter().filter(|&s| s != id))
            .filter(|&v| self[v].is_branch() && !self.is_exhausted(v))
            .collect();

        for v in candidates {
            if self.is_exhaustive(v) {
                debug!("{} exhausted ({} outcomes)", v, self.outcome_count(v));
                self.exhausted.insert(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::clause::{CmpOp, Instruction, Payload, Predicate, Term};
    use crate::trace::Trace;

    fn cond(loc: u32, outcome: bool) -> Clause {
        let gt = Term::cmp(CmpOp::Gt, Term::var("a"), Term::var("b"));
        Clause::branch(loc, Payload::equality(gt, Term::bool(outcome)))
    }

    fn input() -> Clause {
        Clause::effect(0, Payload::opaque("x = input()"))
    }

    fn case(branches: usize, key: i64) -> Clause {
        Clause::new(
            10.into(),
            Instruction::Switch { branches },
            Predicate::path(Payload::equality(Term::var("x"), Term::int(key))),
        )
    }

    fn type_check(ty: &str, outcome: bool) -> Clause {
        let check = Term::instance_of(Term::var("o"), ty);
        Clause::new(
            20.into(),
            Instruction::Other,
            Predicate::path(Payload::equality(check, Term::bool(outcome))),
        )
    }

    #[test]
    fn test_required_outcomes() {
        assert_eq!(required_outcomes(&cond(1, true)), Some(2));
        assert_eq!(required_outcomes(&case(3, 1)), Some(4));
        assert_eq!(required_outcomes(&type_check("String", true)), None);
        assert_eq!(required_outcomes(&input()), None);

        let table = Clause::new(
            11.into(),
            Instruction::TableSwitch { min: 0, max: 2 },
            Predicate::path(Payload::equality(Term::var("x"), Term::int(0))),
        );
        assert_eq!(required_outcomes(&table), Some(4));

        let ne = Clause::new(
            12.into(),
            Instruction::Other,
            Predicate::path(Payload::inequality(Term::var("p"), Term::var("q"))),
        );
        assert_eq!(required_outcomes(&ne), Some(2));
    }

    #[test]
    fn test_binary_branch_closure() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), cond(1, true)]));
        assert!(!graph.is_clause_exhausted(&cond(1, true)));

        graph.ingest(&Trace::new(vec![input(), cond(1, false)]));
        assert!(graph.is_clause_exhausted(&cond(1, true)));
        assert!(graph.is_clause_exhausted(&cond(1, false)));
    }

    #[test]
    fn test_binary_branch_closure_at_trace_start() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![cond(1, true)]));
        assert!(!graph.is_clause_exhausted(&cond(1, true)));

        graph.ingest(&Trace::new(vec![cond(1, false)]));
        assert!(graph.is_clause_exhausted(&cond(1, true)));
        assert!(graph.is_clause_exhausted(&cond(1, false)));
    }

    #[test]
    fn test_switch_needs_default() {
        let mut graph = ExecutionGraph::new();
        for key in [1, 2] {
            graph.ingest(&Trace::new(vec![input(), case(3, key)]));
        }
        assert!(!graph.is_clause_exhausted(&case(3, 1)));
        assert_eq!(graph.outcome_count(graph.vertex(&case(3, 1))), 2);

        graph.ingest(&Trace::new(vec![input(), case(3, 3)]));
        assert!(!graph.is_clause_exhausted(&case(3, 3)));

        // Default target.
        graph.ingest(&Trace::new(vec![input(), case(3, 99)]));
        for key in [1, 2, 3, 99] {
            assert!(graph.is_clause_exhausted(&case(3, key)));
        }
    }

    #[test]
    fn test_type_check_never_exhausted() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), type_check("String", true)]));
        graph.ingest(&Trace::new(vec![input(), type_check("String", false)]));
        assert!(!graph.is_clause_exhausted(&type_check("String", true)));
        assert!(!graph.is_clause_exhausted(&type_check("String", false)));
    }

    #[test]
    fn test_mark_exhausted() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), type_check("Integer", true)]));
        assert!(!graph.is_clause_exhausted(&type_check("Integer", true)));

        graph.mark_exhausted(&type_check("Integer", true));
        assert!(graph.is_clause_exhausted(&type_check("Integer", true)));

        // Still exhausted after further growth.
        graph.ingest(&Trace::new(vec![input(), type_check("Integer", false)]));
        assert!(graph.is_clause_exhausted(&type_check("Integer", true)));
    }

    #[test]
    #[should_panic(expected = "was never ingested")]
    fn test_mark_unknown_clause_panics() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input()]));
        graph.mark_exhausted(&cond(1, true));
    }

    #[test]
    fn test_monotonic() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), cond(1, true)]));
        graph.ingest(&Trace::new(vec![input(), cond(1, false)]));
        let closed = graph.exhausted();
        assert_eq!(closed.len(), 2);

        graph.ingest(&Trace::new(vec![input(), cond(1, true), cond(2, true)]));
        graph.ingest(&Trace::new(vec![input(), Clause::effect(3, Payload::opaque("y = 0"))]));
        assert!(closed.is_subset(&graph.exhausted()));
    }

    fn table_case(key: i64) -> Clause {
        Clause::new(
            11.into(),
            Instruction::TableSwitch { min: 0, max: 2 },
            Predicate::path(Payload::equality(Term::var("x"), Term::int(key))),
        )
    }

    fn p_vs_q(equal: bool) -> Clause {
        let payload = if equal {
            Payload::equality(Term::var("p"), Term::var("q"))
        } else {
            Payload::inequality(Term::var("p"), Term::var("q"))
        };
        Clause::new(12.into(), Instruction::Other, Predicate::path(payload))
    }

    #[test]
    fn test_table_switch_needs_range_and_default() {
        let mut graph = ExecutionGraph::new();
        for key in [0, 1, 2] {
            graph.ingest(&Trace::new(vec![input(), table_case(key)]));
        }
        assert_eq!(graph.outcome_count(graph.vertex(&table_case(0))), 3);
        for key in [0, 1, 2] {
            assert!(!graph.is_clause_exhausted(&table_case(key)));
        }

        // Default target.
        graph.ingest(&Trace::new(vec![input(), table_case(-1)]));
        for key in [0, 1, 2, -1] {
            assert!(graph.is_clause_exhausted(&table_case(key)));
        }
    }

    #[test]
    fn test_other_inequality_closes_at_two() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), p_vs_q(false)]));
        assert!(!graph.is_clause_exhausted(&p_vs_q(false)));

        graph.ingest(&Trace::new(vec![input(), p_vs_q(true)]));
        assert!(graph.is_clause_exhausted(&p_vs_q(false)));
        assert!(graph.is_clause_exhausted(&p_vs_q(true)));
    }

    #[test]
    fn test_unrelated_successors_do_not_close() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), Clause::effect(10, Payload::opaque("y = 0"))]));
        graph.ingest(&Trace::new(vec![input(), Clause::effect(11, Payload::opaque("y = 1"))]));
        graph.ingest(&Trace::new(vec![input(), cond(1, true)]));

        let id = graph.vertex(&cond(1, true));
        assert_eq!(graph.outcome_count(id), 3);
        assert!(!graph.is_exhausted(id));
    }

    #[test]
    fn test_third_sibling_keeps_decision_open() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), cond(1, true)]));
        graph.ingest(&Trace::new(vec![input(), Clause::effect(7, Payload::opaque("y = 0"))]));
        graph.ingest(&Trace::new(vec![input(), cond(1, false)]));

        assert_eq!(graph.outcome_count(graph.vertex(&cond(1, false))), 3);
        assert!(graph.exhausted().is_empty());
    }

    #[test]
    fn test_unrelated_entry_is_not_an_outcome() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), Clause::effect(5, Payload::opaque("y = 1"))]));
        graph.ingest(&Trace::new(vec![cond(1, true)]));

        let id = graph.vertex(&cond(1, true));
        assert_eq!(graph.siblings(id), BTreeSet::from([id]));
        assert!(!graph.is_exhausted(id));

        graph.ingest(&Trace::new(vec![cond(1, false)]));
        assert!(graph.is_clause_exhausted(&cond(1, true)));
        assert!(graph.is_clause_exhausted(&cond(1, false)));
    }

    #[test]
    fn test_effect_vertex_is_never_exhausted() {
        let mut graph = ExecutionGraph::new();
        graph.ingest(&Trace::new(vec![input(), cond(1, true)]));
        graph.ingest(&Trace::new(vec![input(), cond(1, false)]));
        assert!(!graph.is_exhausted(graph.vertex(&input())));
    }
}
