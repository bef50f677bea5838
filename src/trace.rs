//! Per-call diagnostics for the projection loop.
//!
//! Scoring is pure and keeps no global state. Callers that want to see *why*
//! a document scored the way it did pass an observer into
//! [`crate::CoherenceScorer::score_with_observer`]; each projected edge is
//! reported once, in the order the loop visits sentence pairs.

use serde::{Deserialize, Serialize};

/// One edge of the one-mode projection and the weight it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeContribution {
    /// Earlier sentence
    pub from: usize,
    /// Later sentence
    pub to: usize,
    /// `to - from`
    pub distance: usize,
    /// Entities linking the two sentences, sorted
    pub shared: Vec<String>,
    /// Weight added to the sum of edge weights
    pub weight: f64,
}

/// Receives every edge the projection loop adds.
pub trait ProjectionObserver {
    /// Called once per linked sentence pair.
    fn on_edge(&mut self, edge: &EdgeContribution);
}

impl<F: FnMut(&EdgeContribution)> ProjectionObserver for F {
    fn on_edge(&mut self, edge: &EdgeContribution) {
        self(edge)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProjectionObserver for NoopObserver {
    fn on_edge(&mut self, _edge: &EdgeContribution) {}
}

/// Observer that records every edge.
///
/// ```rust
/// use anno_coherence::{
///     BipartiteGraph, CoherenceScorer, EntityOccurrenceIndex, ProjectionKind, ProjectionTrace,
///     Role,
/// };
///
/// let index = EntityOccurrenceIndex::from_occurrences([
///     ("Berlin", vec![(0, Role::Object), (1, Role::Subject)]),
/// ])?;
/// let graph = BipartiteGraph::from_index(&index);
///
/// let mut trace = ProjectionTrace::new();
/// CoherenceScorer::new(ProjectionKind::Syntactic).score_with_observer(&graph, &mut trace)?;
///
/// assert_eq!(trace.len(), 1);
/// assert_eq!(trace.edges()[0].weight, 6.0);
/// # Ok::<(), anno_coherence::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTrace {
    edges: Vec<EdgeContribution>,
}

impl ProjectionTrace {
    /// Create an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded edges, in visiting order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeContribution] {
        &self.edges
    }

    /// Number of recorded edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of the recorded weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Consume the trace, returning the edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<EdgeContribution> {
        self.edges
    }
}

impl ProjectionObserver for ProjectionTrace {
    fn on_edge(&mut self, edge: &EdgeContribution) {
        self.edges.push(edge.clone());
    }
}
