//! Execution graph to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Effect vertices** are rendered as boxes
//! - **Branch vertices** are rendered as ellipses; exhausted ones are filled
//! - **Origin** is placed at the top (source rank) with a double border
//! - **Edges** into a branch vertex are labeled with its branch depth, if it is
//!   reachable from the origin
//!
//! # Examples
//!
//! ```
//! use cgs_graph::clause::{Clause, Payload, Term};
//! use cgs_graph::graph::ExecutionGraph;
//! use cgs_graph::trace::Trace;
//!
//! let mut graph = ExecutionGraph::new();
//! graph.ingest(&Trace::new(vec![
//!     Clause::effect(0, Payload::opaque("x = input()")),
//!     Clause::branch(1, Payload::equality(Term::var("x"), Term::int(0))),
//! ]));
//!
//! let dot = graph.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::fmt::Write as _;

use crate::graph::ExecutionGraph;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for effect vertices (default: "box")
    pub effect_shape: &'static str,
    /// Shape for branch vertices (default: "ellipse")
    pub branch_shape: &'static str,
    /// Fill color for exhausted branch vertices (default: "lightgray")
    pub exhausted_color: &'static str,
    /// Whether to label edges into branch vertices with their branch depth (default: true)
    pub show_depths: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            effect_shape: "box",
            branch_shape: "ellipse",
            exhausted_color: "lightgray",
            show_depths: true,
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl ExecutionGraph {
    /// Converts the whole graph to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the whole graph to DOT format with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cgs_graph::dot::DotConfig;
    /// use cgs_graph::graph::ExecutionGraph;
    ///
    /// let graph = ExecutionGraph::new();
    /// let config = DotConfig {
    ///     show_depths: false,
    ///     ..DotConfig::default()
    /// };
    /// let dot = graph.to_dot_with_config(&config).unwrap();
    /// assert_eq!(dot, "digraph {\n}\n");
    /// ```
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;

        if self.is_empty() {
            writeln!(dot, "}}")?;
            return Ok(dot);
        }

        let depths = if config.show_depths {
            self.branch_depths()
        } else {
            Default::default()
        };

        for vertex in self.vertices() {
            let id = vertex.id().get();
            let label = escape(&vertex.to_string());
            if vertex.is_branch() {
                if self.is_exhausted(vertex.id()) {
                    writeln!(
                        dot,
                        "{} [shape={}, style=filled, fillcolor={}, label=\"{}\"];",
                        id, config.branch_shape, config.exhausted_color, label
                    )?;
                } else {
                    writeln!(dot, "{} [shape={}, label=\"{}\"];", id, config.branch_shape, label)?;
                }
            } else {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", id, config.effect_shape, label)?;
            }
        }

        if let Some(origin) = self.origin() {
            writeln!(dot, "{{ rank=source; {} [peripheries=2]; }}", origin.get())?;
        }

        for vertex in self.vertices() {
            for &child in vertex.successors() {
                match depths.get(&child) {
                    Some(depth) => writeln!(dot, "{} -> {} [label=\"{}\"];", vertex.id().get(), child.get(), depth)?,
                    None => writeln!(dot, "{} -> {};", vertex.id().get(), child.get())?,
                }
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
