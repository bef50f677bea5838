//! Language-specific entity handling.
//!
//! Languages differ in how a surface token maps onto tracked entities. German
//! compounds are the canonical case: *Bundesregierung* mentions both the
//! federation and the government, and a grid that keeps the compound whole
//! records fewer repeated mentions than its English translation would. Rather
//! than subclassing per language, the occurrence index builder takes a
//! [`LanguageStrategy`] that decides how entities are normalized and how two
//! roles for the same entity in the same sentence are merged.
//!
//! The splitter itself (dictionary, model, ...) lives upstream; it plugs in
//! through [`CompoundSplitter`].
//!
//! ```rust
//! use anno_coherence::lang::{CompoundSplittingStrategy, LanguageStrategy};
//!
//! let strategy = CompoundSplittingStrategy::new("german", |word: &str| {
//!     (word == "Bundesregierung").then(|| vec!["Bund".to_string(), "Regierung".to_string()])
//! });
//!
//! assert_eq!(strategy.normalize_entity("Bundesregierung"), vec!["Bund", "Regierung"]);
//! assert_eq!(strategy.normalize_entity("Haus"), vec!["Haus"]);
//! ```

use crate::role::Role;

/// Capability interface for language-dependent occurrence tracking.
pub trait LanguageStrategy: Send + Sync {
    /// Merge an existing role with a newly observed one for the same
    /// entity in the same sentence.
    fn merge_role(&self, existing: Role, incoming: Role) -> Role {
        existing.merge(incoming)
    }

    /// Expand one surface form into the entities it should be tracked as.
    ///
    /// Returning an empty vector drops the mention.
    fn normalize_entity(&self, surface: &str) -> Vec<String>;

    /// Strategy identifier (for logging).
    fn name(&self) -> &str;
}

/// Identity normalization with rank-based role merging.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl LanguageStrategy for DefaultStrategy {
    fn normalize_entity(&self, surface: &str) -> Vec<String> {
        vec![surface.to_string()]
    }

    fn name(&self) -> &str {
        "default"
    }
}

/// Splits a compound word into its parts.
///
/// `None` (or an empty list) means "not a compound"; the surface form is then
/// tracked as-is.
pub trait CompoundSplitter: Send + Sync {
    /// Split `word`, if it is a compound.
    fn split(&self, word: &str) -> Option<Vec<String>>;
}

impl<F> CompoundSplitter for F
where
    F: Fn(&str) -> Option<Vec<String>> + Send + Sync,
{
    fn split(&self, word: &str) -> Option<Vec<String>> {
        self(word)
    }
}

/// Strategy that tracks every part of a compound as its own entity.
///
/// Each part inherits the sentence and role of the compound mention.
#[derive(Debug, Clone)]
pub struct CompoundSplittingStrategy<S> {
    name: String,
    splitter: S,
}

impl<S: CompoundSplitter> CompoundSplittingStrategy<S> {
    /// Create a strategy around an external splitter.
    pub fn new(name: impl Into<String>, splitter: S) -> Self {
        Self {
            name: name.into(),
            splitter,
        }
    }
}

impl<S: CompoundSplitter> LanguageStrategy for CompoundSplittingStrategy<S> {
    fn normalize_entity(&self, surface: &str) -> Vec<String> {
        match self.splitter.split(surface) {
            Some(parts) if !parts.is_empty() => {
                log::debug!("{}: split '{}' into {:?}", self.name, surface, parts);
                parts
            }
            _ => vec![surface.to_string()],
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
