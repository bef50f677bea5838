//! Original-vs-permuted discrimination.

use super::sampling::is_identity;
use crate::coherence::CoherenceScorer;
use crate::error::{Error, Result};
use crate::graph::BipartiteGraph;
use crate::index::EntityOccurrenceIndex;
use crate::projection::ProjectionKind;
use serde::{Deserialize, Serialize};

/// Scores closer than this count as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

/// Outcome of comparing an original document against its permutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminationReport {
    /// Original scored strictly higher
    pub wins: usize,
    /// Scores equal
    pub ties: usize,
    /// Permutation scored strictly higher
    pub losses: usize,
    /// Identity permutations that were not compared
    pub skipped: usize,
}

impl DiscriminationReport {
    /// Number of permutations actually compared.
    #[must_use]
    pub fn compared(&self) -> usize {
        self.wins + self.ties + self.losses
    }

    /// Fraction of comparisons the original won; ties count as failures.
    ///
    /// `None` if nothing was compared.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let compared = self.compared();
        (compared > 0).then(|| self.wins as f64 / compared as f64)
    }

    /// Add another document's outcome (for corpus-level accuracy).
    pub fn merge(&mut self, other: &DiscriminationReport) {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.skipped += other.skipped;
    }
}

/// Compare a document's coherence against each permutation of its sentences.
///
/// Every entry of `permutations` must be a permutation of
/// `0..number_of_sentences`; identity orders are skipped.
///
/// # Errors
///
/// - [`Error::MalformedIndex`] if the index does not fit `number_of_sentences`.
/// - [`Error::EmptyDocument`] if no sentence mentions an entity.
/// - [`Error::InvalidInput`] for an order of the wrong length or one that is
///   not a permutation.
pub fn discrimination(
    index: &EntityOccurrenceIndex,
    number_of_sentences: usize,
    kind: ProjectionKind,
    permutations: &[Vec<usize>],
) -> Result<DiscriminationReport> {
    index.validate(number_of_sentences)?;
    let scorer = CoherenceScorer::new(kind);
    let original = scorer.score(&BipartiteGraph::from_index(index))?;

    let mut report = DiscriminationReport::default();
    for order in permutations {
        if order.len() != number_of_sentences {
            return Err(Error::invalid_input(format!(
                "order has {} positions, document has {} sentences",
                order.len(),
                number_of_sentences
            )));
        }
        if is_identity(order) {
            report.skipped += 1;
            continue;
        }
        let permuted = index.permute_sentences(order)?;
        let score = scorer.score(&BipartiteGraph::from_index(&permuted))?;
        if (original - score).abs() <= TIE_TOLERANCE {
            report.ties += 1;
        } else if original > score {
            report.wins += 1;
        } else {
            report.losses += 1;
        }
    }

    log::debug!(
        "{} discrimination: {} wins, {} ties, {} losses",
        kind,
        report.wins,
        report.ties,
        report.losses
    );
    Ok(report)
}
