//! Scoring configuration.

use crate::error::{Error, Result};
use crate::projection::ProjectionKind;
use serde::{Deserialize, Serialize};

/// Configuration shared by the scorer, the transition extractor, and the
/// grid model.
///
/// Deserializes from partial JSON; missing fields take their defaults.
///
/// ```rust
/// use anno_coherence::{CoherenceConfig, ProjectionKind};
///
/// let config: CoherenceConfig = serde_json::from_str(r#"{"projection": "weighted"}"#).unwrap();
/// assert_eq!(config.projection, ProjectionKind::Weighted);
/// assert_eq!(config.window_length, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    /// Projection used for local coherence
    pub projection: ProjectionKind,
    /// Transition window length (default: 2)
    pub window_length: usize,
    /// Minimum non-empty cells for an entity column to count in transition
    /// extraction; `None` keeps every column
    pub salience: Option<usize>,
    /// Additive smoothing for the generative grid model (default: 1.0)
    pub smoothing: f64,
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Unweighted,
            window_length: 2,
            salience: None,
            smoothing: 1.0,
        }
    }
}

impl CoherenceConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection.
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionKind) -> Self {
        self.projection = projection;
        self
    }

    /// Set the transition window length.
    #[must_use]
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Only extract transitions for entities with at least `min_occurrences`
    /// non-empty cells.
    #[must_use]
    pub fn with_salience(mut self, min_occurrences: usize) -> Self {
        self.salience = Some(min_occurrences);
        self
    }

    /// Set the additive smoothing constant.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Check the configuration for values no component accepts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero window length or a
    /// smoothing constant that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.window_length == 0 {
            return Err(Error::invalid_input("window_length must be at least 1"));
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(Error::invalid_input(format!(
                "smoothing must be positive, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}
