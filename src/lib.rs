//! # cgs-graph: the shared map behind context-guided concolic search
//!
//! Concolic search runs a program concretely, records the symbolic clauses
//! along the executed path, and asks a solver for inputs that flip one of the
//! recorded branches. **`cgs-graph`** is the structure that remembers *all*
//! runs so far, so that the search can pick productive unexplored branches and
//! keep every solver query small.
//!
//! ## Key Ideas
//!
//! - **Merge by value**: every distinct [`Clause`][crate::clause::Clause] owns
//!   exactly one vertex. Traces that share a prefix share its vertices; traces
//!   that diverge and later reach an identical clause rejoin there.
//! - **Exhaustiveness**: a branch vertex is closed once every statically
//!   possible outcome of its decision has been observed. Closed stays closed.
//! - **Dominance pruning**: an ancestor that dominates a branch holds on every
//!   route to it, so its condition never goes into a query for that branch.
//! - **Shallow first**: branch vertices are ranked by the fewest decisions
//!   needed to reach them from the origin.
//!
//! ## Basic Usage
//!
//! ```rust
//! use cgs_graph::clause::{Clause, CmpOp, Payload, Term};
//! use cgs_graph::graph::ExecutionGraph;
//! use cgs_graph::trace::Trace;
//!
//! let a_gt_b = |outcome| {
//!     let gt = Term::cmp(CmpOp::Gt, Term::var("a"), Term::var("b"));
//!     Clause::branch(1, Payload::equality(gt, Term::bool(outcome)))
//! };
//!
//! // 1. Feed the traces of two concrete runs
//! let mut graph = ExecutionGraph::new();
//! graph.ingest(&Trace::new(vec![a_gt_b(true)]));
//! graph.ingest(&Trace::new(vec![a_gt_b(false)]));
//!
//! // 2. Both outcomes of `a > b` are known now
//! assert_eq!(graph.depth(), 1);
//! assert!(graph.is_clause_exhausted(&a_gt_b(true)));
//!
//! // 3. Pick open branches, shallowest first, and build solver contexts
//! for depth in 1..=graph.depth() {
//!     for target in graph.open_branches_at(depth) {
//!         for context in graph.contexts(target, 4) {
//!             assert!(context.len() <= 4);
//!         }
//!     }
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`graph`]**: the [`ExecutionGraph`][crate::graph::ExecutionGraph] and trace ingestion.
//! - **[`exhaust`]**: exhaustiveness tracking.
//! - **[`dominance`]**: the dominance index rebuilt after every ingest.
//! - **[`frontier`]**: branch-depth ranking.
//! - **[`context`]**: pruned solver query contexts.
//! - **[`dot`]**: Graphviz export for debugging.
//!
//! ## Concurrency
//!
//! [`ingest`][crate::graph::ExecutionGraph::ingest] takes `&mut self` and every
//! query takes `&self`, so the borrow checker enforces one writer and no
//! readers during a write. To share a graph between threads, wrap it in a
//! [`std::sync::RwLock`].

pub mod clause;
pub mod config;
pub mod context;
pub mod debug;
pub mod dominance;
pub mod dot;
pub mod exhaust;
pub mod frontier;
pub mod graph;
pub mod trace;
pub mod vertex;
