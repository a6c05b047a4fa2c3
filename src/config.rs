/// Configuration for an [`ExecutionGraph`][crate::graph::ExecutionGraph].
///
/// # Examples
///
/// ```
/// use cgs_graph::config::GraphConfig;
/// use cgs_graph::graph::ExecutionGraph;
///
/// let config = GraphConfig::default().with_capacity(4096).with_context_limit(3);
/// let graph = ExecutionGraph::with_config(config);
/// assert_eq!(graph.config().context_limit, 3);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GraphConfig {
    /// Number of vertices to reserve storage for up front (default: 1024).
    pub capacity: usize,
    /// Maximum number of ancestors per context used by
    /// [`default_contexts`][crate::graph::ExecutionGraph::default_contexts] (default: 8).
    pub context_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            context_limit: 8,
        }
    }
}

impl GraphConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_context_limit(mut self, context_limit: usize) -> Self {
        self.context_limit = context_limit;
        self
    }
}
