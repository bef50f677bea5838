//! Entity transitions (Barzilay & Lapata, 2008).
//!
//! A transition is the sequence of roles one entity takes over `L`
//! consecutive sentences, read straight down a grid column:
//!
//! ```text
//!         atom
//! s0       S     ┐ [S, O]
//! s1       O     ┤ ┐ [O, -]
//! s2       -     ┘ ┤ ┐ [-, S]
//! s3       S       ┘ ┘
//! ```
//!
//! Windows never wrap and `Empty` is a valid position. A grid with fewer
//! sentences than the window length has no windows at all; the resulting
//! table is flagged as degenerate instead of failing, and only asking it for
//! probabilities is an error.

use crate::config::CoherenceConfig;
use crate::error::{Error, Result};
use crate::grid::EntityGrid;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Longest window [`TransitionTable::feature_vector`] will materialise
/// (`4^8 = 65536` features).
pub const MAX_FEATURE_WINDOW: usize = 8;

/// An ordered sequence of roles, used as a transition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition(Vec<Role>);

impl Transition {
    /// Wrap a role sequence.
    #[must_use]
    pub fn new(roles: Vec<Role>) -> Self {
        Self(roles)
    }

    /// The roles, in sentence order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.0
    }

    /// Window length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every role sequence of length `window_length`, in canonical order.
    ///
    /// The order is lexicographic by role rank (`-` < `X` < `O` < `S`), so
    /// `all(2)` starts `[-, -], [-, X], [-, O], [-, S], [X, -], ...`.
    ///
    /// The result has `4^window_length` entries.
    #[must_use]
    pub fn all(window_length: usize) -> Vec<Transition> {
        let mut sequences: Vec<Vec<Role>> = vec![Vec::with_capacity(window_length)];
        for _ in 0..window_length {
            sequences = sequences
                .into_iter()
                .flat_map(|prefix| {
                    Role::ALL.into_iter().map(move |role| {
                        let mut next = prefix.clone();
                        next.push(role);
                        next
                    })
                })
                .collect();
        }
        sequences.into_iter().map(Transition).collect()
    }
}

impl From<Vec<Role>> for Transition {
    fn from(roles: Vec<Role>) -> Self {
        Self(roles)
    }
}

impl From<&[Role]> for Transition {
    fn from(roles: &[Role]) -> Self {
        Self(roles.to_vec())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, role) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", role)?;
        }
        f.write_str("]")
    }
}

impl FromStr for Transition {
    type Err = Error;

    /// Parses `"SO"`, `"S O"`, or the display form `"[S, O]"`.
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '[' | ']' | ','))
            .map(Role::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Transition)
    }
}

/// Counts role transitions over the columns of an entity grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTransitionExtractor {
    window_length: usize,
    salience: Option<usize>,
}

impl EntityTransitionExtractor {
    /// Create an extractor for windows of `window_length` sentences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `window_length` is zero.
    pub fn new(window_length: usize) -> Result<Self> {
        if window_length == 0 {
            return Err(Error::invalid_input("window_length must be at least 1"));
        }
        Ok(Self {
            window_length,
            salience: None,
        })
    }

    /// Create an extractor from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `window_length` is zero.
    pub fn from_config(config: &CoherenceConfig) -> Result<Self> {
        let extractor = Self::new(config.window_length)?;
        Ok(match config.salience {
            Some(min_occurrences) => extractor.with_salience(min_occurrences),
            None => extractor,
        })
    }

    /// Only count columns of entities with at least `min_occurrences`
    /// non-empty cells.
    #[must_use]
    pub fn with_salience(mut self, min_occurrences: usize) -> Self {
        self.salience = Some(min_occurrences);
        self
    }

    /// Window length.
    #[must_use]
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Salience threshold, if any.
    #[must_use]
    pub fn salience(&self) -> Option<usize> {
        self.salience
    }

    /// Count every window of every (salient) column.
    #[must_use]
    pub fn extract(&self, grid: &EntityGrid) -> TransitionTable {
        let mut counts: HashMap<Transition, usize> = HashMap::new();
        let mut total = 0;
        for column in 0..grid.number_of_entities() {
            if let Some(min_occurrences) = self.salience {
                if grid.occurrence_count(column) < min_occurrences {
                    continue;
                }
            }
            let roles: Vec<Role> = grid.column(column).collect();
            for window in roles.windows(self.window_length) {
                *counts.entry(Transition::from(window)).or_insert(0) += 1;
                total += 1;
            }
        }

        let table = TransitionTable {
            window_length: self.window_length,
            number_of_sentences: grid.number_of_sentences(),
            counts,
            total,
        };
        if table.is_degenerate() {
            log::debug!(
                "no transition windows: length {} over {} sentences",
                self.window_length,
                grid.number_of_sentences()
            );
        }
        table
    }
}

/// Transition counts of one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    window_length: usize,
    number_of_sentences: usize,
    counts: HashMap<Transition, usize>,
    total: usize,
}

impl TransitionTable {
    /// Window length the table was extracted with.
    #[must_use]
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Number of sentences of the source grid.
    #[must_use]
    pub fn number_of_sentences(&self) -> usize {
        self.number_of_sentences
    }

    /// Count per observed transition.
    #[must_use]
    pub fn counts(&self) -> &HashMap<Transition, usize> {
        &self.counts
    }

    /// Count of one transition (0 if unseen).
    #[must_use]
    pub fn count(&self, transition: &Transition) -> usize {
        self.counts.get(transition).copied().unwrap_or(0)
    }

    /// Number of windows counted.
    #[must_use]
    pub fn total_transitions(&self) -> usize {
        self.total
    }

    /// Whether the window is longer than the document.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.number_of_sentences < self.window_length
    }

    /// Observed transitions, most frequent first (ties in canonical order).
    #[must_use]
    pub fn sorted_counts(&self) -> Vec<(&Transition, usize)> {
        let mut sorted: Vec<(&Transition, usize)> =
            self.counts.iter().map(|(t, &c)| (t, c)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// Relative frequency of every observed transition.
    ///
    /// The values sum to 1 whenever at least one window was counted. A table
    /// that fits windows but counted none (no entity columns, or salience
    /// filtered every column out) yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTransitionWindow`] if no window fits in
    /// the grid.
    pub fn probabilities(&self) -> Result<HashMap<Transition, f64>> {
        self.ensure_windows()?;
        let total = self.total as f64;
        Ok(self
            .counts
            .iter()
            .map(|(transition, &count)| (transition.clone(), count as f64 / total))
            .collect())
    }

    /// Relative frequency of one transition (0 if unseen).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTransitionWindow`] if no window fits in
    /// the grid.
    pub fn probability(&self, transition: &Transition) -> Result<f64> {
        self.ensure_windows()?;
        if self.total == 0 {
            return Ok(0.0);
        }
        Ok(self.count(transition) as f64 / self.total as f64)
    }

    /// Probabilities of all `4^L` transitions in [`Transition::all`] order,
    /// zero for unseen ones. All zeros when no window was counted.
    ///
    /// # Errors
    ///
    /// - [`Error::DegenerateTransitionWindow`] if no window fits in the grid.
    /// - [`Error::InvalidInput`] if the window is longer than
    ///   [`MAX_FEATURE_WINDOW`].
    pub fn feature_vector(&self) -> Result<Vec<f64>> {
        if self.window_length > MAX_FEATURE_WINDOW {
            return Err(Error::invalid_input(format!(
                "feature vector for window length {} exceeds the limit of {}",
                self.window_length, MAX_FEATURE_WINDOW
            )));
        }
        let probabilities = self.probabilities()?;
        Ok(Transition::all(self.window_length)
            .iter()
            .map(|t| probabilities.get(t).copied().unwrap_or(0.0))
            .collect())
    }

    fn ensure_windows(&self) -> Result<()> {
        if self.is_degenerate() {
            log::warn!(
                "transition probabilities requested for {} sentences with window length {}",
                self.number_of_sentences,
                self.window_length
            );
            return Err(Error::degenerate_window(
                self.window_length,
                self.number_of_sentences,
            ));
        }
        Ok(())
    }
}
