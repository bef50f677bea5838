//! One-mode projections of the bipartite entity graph onto its sentences.
//!
//! Two sentences are linked when they share at least one entity. Edges point
//! forward (earlier → later sentence), and each variant assigns the edge a
//! different weight:
//!
//! | Variant | Edge weight |
//! |---------|-------------|
//! | [`Unweighted`] | `1` |
//! | [`Weighted`] | `shared / distance` |
//! | [`Syntactic`] | `Σ w(role_i) · w(role_j) / distance` with S=3, O=2, X=1 |
//!
//! `distance` is the difference of the original sentence indices, so gaps
//! left by sentences without entities still count.
//!
//! The pair loop is O(N² · E) over sentence nodes, which is fine for
//! document-length input.

use crate::error::{Error, Result};
use crate::graph::{BipartiteGraph, SentenceNode};
use crate::trace::{EdgeContribution, NoopObserver, ProjectionObserver};
use petgraph::graph::{Graph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Projection kind
// =============================================================================

/// Which projection to score with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Every linked pair counts 1
    #[default]
    Unweighted,
    /// Shared entity count, discounted by distance
    Weighted,
    /// Role-weighted shared entities, discounted by distance
    Syntactic,
}

impl ProjectionKind {
    /// All kinds, in code order.
    pub const ALL: [ProjectionKind; 3] = [
        ProjectionKind::Unweighted,
        ProjectionKind::Weighted,
        ProjectionKind::Syntactic,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProjectionKind::Unweighted => "unweighted",
            ProjectionKind::Weighted => "weighted",
            ProjectionKind::Syntactic => "syntactic",
        }
    }

    /// Integer code (0 = unweighted, 1 = weighted, 2 = syntactic).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            ProjectionKind::Unweighted => 0,
            ProjectionKind::Weighted => 1,
            ProjectionKind::Syntactic => 2,
        }
    }

    /// Kind for an integer code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for codes other than 0, 1, 2.
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| Error::parse(format!("unknown projection code {}", code)))
    }

    /// The projection implementing this kind.
    #[must_use]
    pub fn projection(&self) -> &'static dyn Projection {
        match self {
            ProjectionKind::Unweighted => &Unweighted,
            ProjectionKind::Weighted => &Weighted,
            ProjectionKind::Syntactic => &Syntactic,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "unweighted" => Ok(ProjectionKind::Unweighted),
            "weighted" => Ok(ProjectionKind::Weighted),
            "syntactic" => Ok(ProjectionKind::Syntactic),
            _ => Err(Error::parse(format!("unknown projection '{}'", s))),
        }
    }
}

// =============================================================================
// Projection trait
// =============================================================================

/// Edge weighting of a one-mode projection.
///
/// Implementors only define [`Projection::edge_weight`]; the pair loop is
/// shared.
pub trait Projection: Send + Sync {
    /// Which kind this is.
    fn kind(&self) -> ProjectionKind;

    /// Weight of the forward edge `from → to`.
    ///
    /// `shared` is non-empty and sorted; `distance` is at least 1.
    fn edge_weight(
        &self,
        from: &SentenceNode,
        to: &SentenceNode,
        shared: &[&str],
        distance: usize,
    ) -> f64;

    /// Sum of all projected edge weights.
    fn sum_of_edge_weights(&self, graph: &BipartiteGraph) -> f64 {
        self.sum_of_edge_weights_observed(graph, &mut NoopObserver)
    }

    /// Sum of all projected edge weights, reporting each edge to `observer`.
    fn sum_of_edge_weights_observed(
        &self,
        graph: &BipartiteGraph,
        observer: &mut dyn ProjectionObserver,
    ) -> f64 {
        let mut total = 0.0;
        for_each_link(graph, |from, to, shared, distance| {
            let weight = self.edge_weight(from, to, &shared, distance);
            total += weight;
            observer.on_edge(&EdgeContribution {
                from: from.id(),
                to: to.id(),
                distance,
                shared: shared.iter().map(|e| e.to_string()).collect(),
                weight,
            });
        });
        total
    }

    /// Materialize the projection as a weighted directed graph.
    fn project(&self, graph: &BipartiteGraph) -> ProjectedGraph {
        let mut projected = ProjectedGraph::with_sentences(self.kind(), graph);
        for_each_link(graph, |from, to, shared, distance| {
            let weight = self.edge_weight(from, to, &shared, distance);
            projected.add_edge(from.id(), to.id(), weight);
        });
        projected
    }
}

/// Visit every sentence pair `(i, j)` with `i < j` that shares an entity.
fn for_each_link<F>(graph: &BipartiteGraph, mut visit: F)
where
    F: FnMut(&SentenceNode, &SentenceNode, Vec<&str>, usize),
{
    let nodes: Vec<&SentenceNode> = graph.sentence_nodes().collect();
    for (position, from) in nodes.iter().enumerate() {
        for to in &nodes[position + 1..] {
            let shared = from.shared_entities(to);
            if shared.is_empty() {
                continue;
            }
            visit(from, to, shared, to.id() - from.id());
        }
    }
}

/// Every linked pair contributes 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unweighted;

impl Projection for Unweighted {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Unweighted
    }

    fn edge_weight(&self, _: &SentenceNode, _: &SentenceNode, _: &[&str], _: usize) -> f64 {
        1.0
    }
}

/// Number of shared entities divided by sentence distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weighted;

impl Projection for Weighted {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Weighted
    }

    fn edge_weight(
        &self,
        _: &SentenceNode,
        _: &SentenceNode,
        shared: &[&str],
        distance: usize,
    ) -> f64 {
        shared.len() as f64 / distance as f64
    }
}

/// Products of syntactic role weights over shared entities, divided by
/// sentence distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Syntactic;

impl Projection for Syntactic {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Syntactic
    }

    fn edge_weight(
        &self,
        from: &SentenceNode,
        to: &SentenceNode,
        shared: &[&str],
        distance: usize,
    ) -> f64 {
        let product: u32 = shared
            .iter()
            .map(|entity| {
                let w_from = from.role_of(entity).map_or(0, |r| r.syntactic_weight());
                let w_to = to.role_of(entity).map_or(0, |r| r.syntactic_weight());
                w_from * w_to
            })
            .sum();
        f64::from(product) / distance as f64
    }
}

// =============================================================================
// Materialized projection
// =============================================================================

/// The sentence-side projection as a `petgraph` graph.
///
/// Node weights are sentence ids, edge weights are projection weights. Edges
/// only point forward in the document.
#[derive(Debug, Clone)]
pub struct ProjectedGraph {
    kind: ProjectionKind,
    graph: Graph<usize, f64>,
    nodes: BTreeMap<usize, NodeIndex>,
}

impl ProjectedGraph {
    fn with_sentences(kind: ProjectionKind, source: &BipartiteGraph) -> Self {
        let mut graph: Graph<usize, f64> = Graph::with_capacity(source.sentence_count(), 0);
        let nodes = source
            .sentence_nodes()
            .map(|node| (node.id(), graph.add_node(node.id())))
            .collect();
        Self { kind, graph, nodes }
    }

    fn add_edge(&mut self, from: usize, to: usize, weight: f64) {
        if let (Some(&a), Some(&b)) = (self.nodes.get(&from), self.nodes.get(&to)) {
            self.graph.add_edge(a, b, weight);
        }
    }

    /// Projection this graph was built with.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Number of sentence nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of projected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Weight of the edge `from → to`, if the sentences are linked.
    #[must_use]
    pub fn edge_weight(&self, from: usize, to: usize) -> Option<f64> {
        let a = *self.nodes.get(&from)?;
        let b = *self.nodes.get(&to)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Weighted out-degree of a sentence, `None` if it has no node.
    #[must_use]
    pub fn out_degree(&self, sentence: usize) -> Option<f64> {
        let node = *self.nodes.get(&sentence)?;
        Some(self.graph.edges(node).map(|edge| *edge.weight()).sum())
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.graph.raw_edges().iter().map(|edge| edge.weight).sum()
    }

    /// Average out-degree over sentence nodes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] if there are no sentence nodes.
    pub fn average_out_degree(&self) -> Result<f64> {
        if self.nodes.is_empty() {
            return Err(Error::empty_document("projected graph has no sentence nodes"));
        }
        Ok(self.total_weight() / self.nodes.len() as f64)
    }

    /// Underlying `petgraph` graph.
    #[must_use]
    pub fn as_petgraph(&self) -> &Graph<usize, f64> {
        &self.graph
    }
}
