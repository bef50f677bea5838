//! Generative entity-grid model.
//!
//! Treats each grid column as a first-order Markov chain over roles. Training
//! pools bigram counts `B[a, b]` (role `a` followed by role `b` in the next
//! sentence) and history counts `U[a]` (role `a` in any sentence that has a
//! successor) over every column of every training grid. Scoring uses additive
//! smoothing:
//!
//! ```text
//! P(b | a) = (B[a, b] + α) / (U[a] + 4α)
//! ```
//!
//! Because `U[a] = Σ_b B[a, b]`, the smoothed conditionals for each history
//! sum to one.

use crate::config::CoherenceConfig;
use crate::error::{Error, Result};
use crate::grid::EntityGrid;
use crate::role::Role;

/// Role bigram model trained on entity grids.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    unigrams: [usize; Role::COUNT],
    bigrams: [[usize; Role::COUNT]; Role::COUNT],
    smoothing: f64,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            unigrams: [0; Role::COUNT],
            bigrams: [[0; Role::COUNT]; Role::COUNT],
            smoothing: 1.0,
        }
    }
}

impl GridModel {
    /// Train on a collection of grids with add-one smoothing.
    ///
    /// ```rust
    /// use anno_coherence::{EntityGrid, GridModel, Role};
    ///
    /// let training = EntityGrid::from_rows(&["S -", "S O", "O S"])?;
    /// let model = GridModel::train([&training]);
    ///
    /// let coherent = EntityGrid::from_rows(&["S", "S", "S"])?;
    /// let scattered = EntityGrid::from_rows(&["-", "X", "-"])?;
    /// assert!(model.log_likelihood(&coherent)? > model.log_likelihood(&scattered)?);
    /// # Ok::<(), anno_coherence::Error>(())
    /// ```
    #[must_use]
    pub fn train<'a>(grids: impl IntoIterator<Item = &'a EntityGrid>) -> Self {
        let mut model = Self::default();
        let mut columns = 0usize;
        for grid in grids {
            for column in 0..grid.number_of_entities() {
                let roles: Vec<Role> = grid.column(column).collect();
                for pair in roles.windows(2) {
                    model.unigrams[pair[0].index()] += 1;
                    model.bigrams[pair[0].index()][pair[1].index()] += 1;
                }
                columns += 1;
            }
        }
        log::debug!(
            "trained grid model on {} columns, {} transitions",
            columns,
            model.unigrams.iter().sum::<usize>()
        );
        model
    }

    /// Train and apply the smoothing constant from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the configured smoothing is not
    /// positive.
    pub fn train_with_config<'a>(
        grids: impl IntoIterator<Item = &'a EntityGrid>,
        config: &CoherenceConfig,
    ) -> Result<Self> {
        Self::train(grids).with_smoothing(config.smoothing)
    }

    /// Replace the additive smoothing constant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `smoothing` is positive and
    /// finite.
    pub fn with_smoothing(mut self, smoothing: f64) -> Result<Self> {
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(Error::invalid_input(format!(
                "smoothing must be positive, got {}",
                smoothing
            )));
        }
        self.smoothing = smoothing;
        Ok(self)
    }

    /// Additive smoothing constant.
    #[must_use]
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// How often `role` was followed by another sentence in training.
    #[must_use]
    pub fn history_count(&self, role: Role) -> usize {
        self.unigrams[role.index()]
    }

    /// How often `from` was followed by `to` in training.
    #[must_use]
    pub fn bigram_count(&self, from: Role, to: Role) -> usize {
        self.bigrams[from.index()][to.index()]
    }

    /// Smoothed `P(to | from)`.
    #[must_use]
    pub fn transition_probability(&self, from: Role, to: Role) -> f64 {
        let numerator = self.bigram_count(from, to) as f64 + self.smoothing;
        let denominator =
            self.history_count(from) as f64 + Role::COUNT as f64 * self.smoothing;
        numerator / denominator
    }

    /// Average per-transition log-likelihood of a grid.
    ///
    /// Each column's log-probability is divided by its number of transitions,
    /// then the column scores are averaged, so documents of different length
    /// and entity count stay comparable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] for a grid without columns or with a
    /// single sentence.
    pub fn log_likelihood(&self, grid: &EntityGrid) -> Result<f64> {
        let width = grid.number_of_entities();
        let transitions = grid.number_of_sentences().saturating_sub(1);
        if width == 0 || transitions == 0 {
            return Err(Error::empty_document(format!(
                "grid of {} sentences x {} entities has no role transitions",
                grid.number_of_sentences(),
                width
            )));
        }

        let mut total = 0.0;
        for column in 0..width {
            let roles: Vec<Role> = grid.column(column).collect();
            let column_ll: f64 = roles
                .windows(2)
                .map(|pair| self.transition_probability(pair[0], pair[1]).ln())
                .sum();
            total += column_ll / transitions as f64;
        }
        Ok(total / width as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training() -> EntityGrid {
        EntityGrid::from_rows(&["S - X", "S O -", "O S -", "S S -"]).unwrap()
    }

    #[test]
    fn test_counts() {
        let model = GridModel::train([&training()]);
        // Three columns of four sentences: nine transitions.
        let total: usize = Role::ALL.iter().map(|&r| model.history_count(r)).sum();
        assert_eq!(total, 9);
        assert_eq!(model.bigram_count(Role::Subject, Role::Subject), 2);
        assert_eq!(model.bigram_count(Role::Subject, Role::Object), 1);
        assert_eq!(model.bigram_count(Role::Other, Role::Empty), 1);
    }

    #[test]
    fn test_conditionals_sum_to_one() {
        let model = GridModel::train([&training()]).with_smoothing(0.5).unwrap();
        for from in Role::ALL {
            let sum: f64 = Role::ALL
                .iter()
                .map(|&to| model.transition_probability(from, to))
                .sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_untrained_model_is_uniform() {
        let model = GridModel::train(std::iter::empty());
        assert!((model.transition_probability(Role::Subject, Role::Empty) - 0.25).abs() < 1e-9);
        let grid = EntityGrid::from_rows(&["S", "O"]).unwrap();
        assert!((model.log_likelihood(&grid).unwrap() - 0.25f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_prefers_trained_patterns() {
        let model = GridModel::train([&training()]);
        let continuous = EntityGrid::from_rows(&["S", "S", "S"]).unwrap();
        let broken = EntityGrid::from_rows(&["X", "-", "X"]).unwrap();
        let broken_score = model.log_likelihood(&broken).unwrap();
        assert!(model.log_likelihood(&continuous).unwrap() > broken_score);
    }

    #[test]
    fn test_log_likelihood_is_per_transition() {
        let model = GridModel::train([&EntityGrid::from_rows(&["S", "S"]).unwrap()]);
        // (1 + 1) / (1 + 4)
        let expected = 0.4f64.ln();
        for rows in [&["S", "S", "S"][..], &["S S", "S S", "S S", "S S"][..]] {
            let grid = EntityGrid::from_rows(rows).unwrap();
            let score = model.log_likelihood(&grid).unwrap();
            assert!((score - expected).abs() < 1e-9, "{:?}: {}", rows, score);
        }
    }

    #[test]
    fn test_log_likelihood_rejects_untransitioned_grids() {
        let model = GridModel::default();
        let single = EntityGrid::from_rows(&["S O"]).unwrap();
        assert!(matches!(model.log_likelihood(&single), Err(Error::EmptyDocument(_))));
        let no_columns = EntityGrid::from_rows(&["", ""]).unwrap();
        assert!(matches!(model.log_likelihood(&no_columns), Err(Error::EmptyDocument(_))));
    }

    #[test]
    fn test_smoothing_must_be_positive() {
        assert!(GridModel::default().with_smoothing(0.0).is_err());
        assert!(GridModel::default().with_smoothing(-1.0).is_err());
        let config = CoherenceConfig::new().with_smoothing(2.0);
        let model = GridModel::train_with_config([&training()], &config).unwrap();
        assert_eq!(model.smoothing(), 2.0);
    }
}
