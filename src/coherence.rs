//! Local coherence: average out-degree of the projected sentence graph.
//!
//! ```text
//! local_coherence = sum_of_edge_weights / N
//! ```
//!
//! `N` is the number of sentence *nodes*, i.e. sentences with at least one
//! tracked entity. Higher is more coherent. A document without sentence
//! nodes has no defined coherence and is reported as
//! [`Error::EmptyDocument`] rather than 0 or NaN.

use crate::config::CoherenceConfig;
use crate::error::{Error, Result};
use crate::graph::BipartiteGraph;
use crate::projection::ProjectionKind;
use crate::trace::{NoopObserver, ProjectionObserver};
use serde::{Deserialize, Serialize};

/// Scores a bipartite entity graph with one projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoherenceScorer {
    kind: ProjectionKind,
}

/// Everything the scorer computed for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceReport {
    /// Projection used
    pub projection: ProjectionKind,
    /// Number of sentence nodes (`N`)
    pub sentence_nodes: usize,
    /// Number of entity nodes
    pub entities: usize,
    /// Sum of projected edge weights
    pub sum_of_edge_weights: f64,
    /// `sum_of_edge_weights / sentence_nodes`
    pub local_coherence: f64,
}

impl CoherenceScorer {
    /// Create a scorer for the given projection.
    #[must_use]
    pub const fn new(kind: ProjectionKind) -> Self {
        Self { kind }
    }

    /// Create a scorer from a configuration.
    #[must_use]
    pub fn from_config(config: &CoherenceConfig) -> Self {
        Self::new(config.projection)
    }

    /// Projection this scorer uses.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Local coherence of the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] if the graph has no sentence nodes.
    pub fn score(&self, graph: &BipartiteGraph) -> Result<f64> {
        self.score_with_observer(graph, &mut NoopObserver)
    }

    /// Local coherence of the graph, reporting each projected edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] if the graph has no sentence nodes.
    pub fn score_with_observer(
        &self,
        graph: &BipartiteGraph,
        observer: &mut dyn ProjectionObserver,
    ) -> Result<f64> {
        Ok(self.report_with_observer(graph, observer)?.local_coherence)
    }

    /// Full scoring breakdown for the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] if the graph has no sentence nodes.
    pub fn report(&self, graph: &BipartiteGraph) -> Result<CoherenceReport> {
        self.report_with_observer(graph, &mut NoopObserver)
    }

    fn report_with_observer(
        &self,
        graph: &BipartiteGraph,
        observer: &mut dyn ProjectionObserver,
    ) -> Result<CoherenceReport> {
        let sentence_nodes = graph.sentence_count();
        if sentence_nodes == 0 {
            return Err(Error::empty_document(
                "no sentence mentions a tracked entity",
            ));
        }

        let sum_of_edge_weights = self
            .kind
            .projection()
            .sum_of_edge_weights_observed(graph, observer);
        let local_coherence = sum_of_edge_weights / sentence_nodes as f64;
        log::debug!(
            "{} projection: sum={:.4} over {} sentence nodes, coherence={:.4}",
            self.kind,
            sum_of_edge_weights,
            sentence_nodes,
            local_coherence
        );

        Ok(CoherenceReport {
            projection: self.kind,
            sentence_nodes,
            entities: graph.entity_count(),
            sum_of_edge_weights,
            local_coherence,
        })
    }
}
