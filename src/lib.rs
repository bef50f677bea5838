//! # anno-coherence
//!
//! Entity-based local coherence for Rust.
//!
//! - **Entity grid** (Barzilay & Lapata, 2008): sentence × entity matrix of
//!   grammatical roles, role transitions, and a generative grid model
//! - **Entity graph** (Guinaudeau & Strube, 2013): bipartite sentence/entity
//!   graph, one-mode projections, and local coherence as average out-degree
//! - **Evaluation**: sentence-ordering discrimination against shuffled
//!   documents
//!
//! Tokenization, parsing, and coreference happen upstream. The input is an
//! [`EntityOccurrenceIndex`]: for each entity, the sentences it occurs in and
//! its grammatical role there.
//!
//! ## Quick Start
//!
//! ```rust
//! use anno_coherence::{score_document, EntityOccurrenceIndex, ProjectionKind, Role};
//!
//! // "Berlin is a city. Berlin is the capital of the city. The city is big."
//! let index = EntityOccurrenceIndex::from_occurrences([
//!     ("Berlin", vec![(0, Role::Object), (1, Role::Subject)]),
//!     ("city", vec![(1, Role::Other), (2, Role::Subject)]),
//! ])?;
//!
//! let coherence = score_document(&index, 3, ProjectionKind::Unweighted)?;
//! assert!((coherence - 2.0 / 3.0).abs() < 1e-9);
//! # Ok::<(), anno_coherence::Error>(())
//! ```
//!
//! ## Projections
//!
//! | Projection | Edge weight | Code |
//! |------------|-------------|------|
//! | `Unweighted` | 1 | 0 |
//! | `Weighted` | shared entities / distance | 1 |
//! | `Syntactic` | Σ role weight products / distance | 2 |
//!
//! ## Transitions
//!
//! ```rust
//! use anno_coherence::{extract_transitions, EntityGrid};
//!
//! let grid = EntityGrid::from_rows(&["S", "O", "-", "S"])?;
//! let transitions = extract_transitions(&grid, 2)?;
//! assert_eq!(transitions.total_transitions, 3);
//! assert!(!transitions.degenerate);
//! # Ok::<(), anno_coherence::Error>(())
//! ```
//!
//! ## Design
//!
//! - **Pure**: every operation is a function of its inputs; nothing global
//! - **Explicit failure**: malformed indices, empty documents, and
//!   degenerate windows are typed errors, never NaN
//! - **Pluggable languages**: compound splitting and role merging go through
//!   [`lang::LanguageStrategy`]

#![warn(missing_docs)]

mod coherence;
mod config;
mod error;
pub mod eval;
mod graph;
mod grid;
mod index;
pub mod lang;
mod model;
pub mod projection;
mod role;
mod trace;
mod transition;

use std::collections::HashMap;

pub use coherence::{CoherenceReport, CoherenceScorer};
pub use config::CoherenceConfig;
pub use error::{Error, Result};
pub use graph::{BipartiteGraph, SentenceNode};
pub use grid::EntityGrid;
pub use index::{EntityOccurrenceIndex, EntityOccurrenceIndexBuilder, Occurrence};
pub use model::GridModel;
pub use projection::{ProjectedGraph, Projection, ProjectionKind};
pub use role::Role;
pub use trace::{EdgeContribution, NoopObserver, ProjectionObserver, ProjectionTrace};
pub use transition::{
    EntityTransitionExtractor, Transition, TransitionTable, MAX_FEATURE_WINDOW,
};

/// Local coherence of one document.
///
/// Validates the index against `number_of_sentences`, builds the bipartite
/// graph, and scores it with the requested projection.
///
/// # Errors
///
/// - [`Error::MalformedIndex`] if an occurrence lies outside the document.
/// - [`Error::EmptyDocument`] if no sentence mentions an entity.
pub fn score_document(
    index: &EntityOccurrenceIndex,
    number_of_sentences: usize,
    kind: ProjectionKind,
) -> Result<f64> {
    index.validate(number_of_sentences)?;
    let graph = BipartiteGraph::from_index(index);
    CoherenceScorer::new(kind).score(&graph)
}

/// Transition counts and probabilities of one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Transitions {
    /// Count per observed transition
    pub counts: HashMap<Transition, usize>,
    /// `count / total_transitions` per observed transition; empty when
    /// degenerate
    pub probabilities: HashMap<Transition, f64>,
    /// Number of windows counted
    pub total_transitions: usize,
    /// The window is longer than the document, so nothing was counted
    pub degenerate: bool,
}

/// Count role transitions of length `window_length` over every column.
///
/// A window longer than the grid is not an error here: the result is empty
/// and flagged `degenerate`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `window_length` is zero.
pub fn extract_transitions(grid: &EntityGrid, window_length: usize) -> Result<Transitions> {
    let table = EntityTransitionExtractor::new(window_length)?.extract(grid);
    let degenerate = table.is_degenerate();
    let probabilities = if degenerate {
        HashMap::new()
    } else {
        table.probabilities()?
    };
    Ok(Transitions {
        total_transitions: table.total_transitions(),
        counts: table.counts().clone(),
        probabilities,
        degenerate,
    })
}

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use anno_coherence::prelude::*;
    //!
    //! let index = EntityOccurrenceIndex::builder().build();
    //! assert!(score_document(&index, 1, ProjectionKind::Weighted).is_err());
    //! ```
    pub use crate::error::{Error, Result};
    pub use crate::{
        extract_transitions, score_document, BipartiteGraph, CoherenceConfig, CoherenceScorer,
        EntityGrid, EntityOccurrenceIndex, EntityTransitionExtractor, Projection, ProjectionKind,
        Role, Transition,
    };
}
