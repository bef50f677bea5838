//! Entity occurrence index: the input contract of the coherence engine.
//!
//! An external annotator (tagger, dependency parser, coreference resolver)
//! reduces a document to, for each entity, the sentences it occurs in and the
//! grammatical role it plays there:
//!
//! ```text
//! "Berlin" -> [(0, O), (1, S)]
//! "city"   -> [(1, X), (2, S)]
//! ```
//!
//! Repeated mentions of one entity in one sentence collapse into a single
//! occurrence carrying the merged role (see [`Role::merge`]). Once built, the
//! index is immutable; grids and graphs are derived from it per request.
//!
//! The JSON form is a plain object from entity to occurrence list, so an
//! annotator in any language can produce it:
//!
//! ```rust
//! use anno_coherence::{EntityOccurrenceIndex, Role};
//!
//! let json = r#"{"Berlin": [{"sentence": 0, "role": "Object"},
//!                           {"sentence": 0, "role": "Subject"}]}"#;
//! let index: EntityOccurrenceIndex = serde_json::from_str(json).unwrap();
//!
//! let occurrences = index.occurrences("Berlin").unwrap();
//! assert_eq!(occurrences.len(), 1);
//! assert_eq!(occurrences[0].role, Role::Subject);
//! ```

use crate::error::{Error, Result};
use crate::lang::{DefaultStrategy, LanguageStrategy};
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// One entity mention, reduced to its sentence and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// 0-based sentence index
    pub sentence: usize,
    /// Grammatical role in that sentence (never `Empty`)
    pub role: Role,
}

impl Occurrence {
    /// Create a new occurrence.
    #[must_use]
    pub const fn new(sentence: usize, role: Role) -> Self {
        Self { sentence, role }
    }
}

impl From<(usize, Role)> for Occurrence {
    fn from((sentence, role): (usize, Role)) -> Self {
        Self::new(sentence, role)
    }
}

/// Mapping from entity identifier to its per-sentence occurrences.
///
/// Invariants, established at construction:
/// - every entity has at least one occurrence;
/// - an entity has at most one occurrence per sentence;
/// - occurrences are sorted by sentence index;
/// - no occurrence has role [`Role::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, Vec<Occurrence>>",
    into = "HashMap<String, Vec<Occurrence>>"
)]
pub struct EntityOccurrenceIndex {
    entries: HashMap<String, Vec<Occurrence>>,
}

impl EntityOccurrenceIndex {
    /// Start building an index with the default language strategy.
    #[must_use]
    pub fn builder() -> EntityOccurrenceIndexBuilder {
        EntityOccurrenceIndexBuilder::new()
    }

    /// Build an index from already-normalized entity occurrence lists.
    ///
    /// Duplicate (entity, sentence) pairs are merged by role rank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an occurrence carries
    /// [`Role::Empty`].
    pub fn from_occurrences<K, I, O>(entries: impl IntoIterator<Item = (K, I)>) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = O>,
        O: Into<Occurrence>,
    {
        let mut builder = EntityOccurrenceIndexBuilder::new();
        for (entity, occurrences) in entries {
            for occurrence in occurrences {
                let occurrence = occurrence.into();
                builder.track_normalized(entity.as_ref(), occurrence.sentence, occurrence.role)?;
            }
        }
        Ok(builder.build())
    }

    /// Number of distinct entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index tracks no entity at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the entity is tracked.
    #[must_use]
    pub fn contains_entity(&self, entity: &str) -> bool {
        self.entries.contains_key(entity)
    }

    /// Occurrences of one entity, sorted by sentence.
    #[must_use]
    pub fn occurrences(&self, entity: &str) -> Option<&[Occurrence]> {
        self.entries.get(entity).map(Vec::as_slice)
    }

    /// Role of `entity` in `sentence`, or [`Role::Empty`].
    #[must_use]
    pub fn role(&self, entity: &str, sentence: usize) -> Role {
        self.occurrences(entity)
            .and_then(|occs| {
                occs.binary_search_by_key(&sentence, |o| o.sentence)
                    .ok()
                    .map(|i| occs[i].role)
            })
            .unwrap_or(Role::Empty)
    }

    /// Iterate over entity identifiers (unspecified order).
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entity identifiers in sorted order.
    #[must_use]
    pub fn sorted_entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.entities().collect();
        entities.sort_unstable();
        entities
    }

    /// Iterate over `(entity, occurrences)` pairs (unspecified order).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Occurrence])> {
        self.entries
            .iter()
            .map(|(entity, occs)| (entity.as_str(), occs.as_slice()))
    }

    /// Total number of (entity, sentence) occurrences.
    #[must_use]
    pub fn total_occurrences(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Highest sentence index referenced, if any.
    #[must_use]
    pub fn max_sentence(&self) -> Option<usize> {
        self.entries
            .values()
            .filter_map(|occs| occs.last())
            .map(|o| o.sentence)
            .max()
    }

    /// Sentence indices that contain at least one tracked entity.
    #[must_use]
    pub fn sentences(&self) -> BTreeSet<usize> {
        self.entries
            .values()
            .flatten()
            .map(|o| o.sentence)
            .collect()
    }

    /// Check every occurrence against a declared sentence count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIndex`] for the first (in entity order)
    /// occurrence whose sentence index is `>= number_of_sentences`.
    pub fn validate(&self, number_of_sentences: usize) -> Result<()> {
        for entity in self.sorted_entities() {
            if let Some(last) = self.entries[entity].last() {
                if last.sentence >= number_of_sentences {
                    return Err(Error::malformed_index(
                        entity,
                        last.sentence,
                        number_of_sentences,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parse the annotator JSON form: an object from entity to a list of
    /// `{"sentence": usize, "role": "Subject" | "Object" | "Other"}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON or an `Empty` role.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(format!("occurrence index: {}", e)))
    }

    /// Serialize to the annotator JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::parse(format!("occurrence index: {}", e)))
    }

    /// Reorder the document's sentences.
    ///
    /// `order[k]` is the original sentence that ends up at position `k`, so
    /// `order = [2, 0, 1]` moves the last sentence to the front. This is how
    /// permuted documents are produced for the sentence-ordering
    /// discrimination task.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `order` is not a permutation of `0..order.len()`.
    /// - [`Error::MalformedIndex`] if an occurrence lies outside `0..order.len()`.
    pub fn permute_sentences(&self, order: &[usize]) -> Result<Self> {
        let n = order.len();
        let mut position = vec![usize::MAX; n];
        for (k, &original) in order.iter().enumerate() {
            if original >= n || position[original] != usize::MAX {
                return Err(Error::invalid_input(format!(
                    "sentence order {:?} is not a permutation of 0..{}",
                    order, n
                )));
            }
            position[original] = k;
        }
        self.validate(n)?;

        let entries = self
            .entries
            .iter()
            .map(|(entity, occs)| {
                let mut moved: Vec<Occurrence> = occs
                    .iter()
                    .map(|o| Occurrence::new(position[o.sentence], o.role))
                    .collect();
                moved.sort_by_key(|o| o.sentence);
                (entity.clone(), moved)
            })
            .collect();
        Ok(Self { entries })
    }
}

impl TryFrom<HashMap<String, Vec<Occurrence>>> for EntityOccurrenceIndex {
    type Error = Error;

    fn try_from(entries: HashMap<String, Vec<Occurrence>>) -> Result<Self> {
        Self::from_occurrences(entries)
    }
}

impl From<EntityOccurrenceIndex> for HashMap<String, Vec<Occurrence>> {
    fn from(index: EntityOccurrenceIndex) -> Self {
        index.entries
    }
}

/// Incremental index construction with a pluggable [`LanguageStrategy`].
///
/// ```rust
/// use anno_coherence::{EntityOccurrenceIndex, Role};
///
/// let mut builder = EntityOccurrenceIndex::builder();
/// builder.track("Berlin", 0, Role::Object)?;
/// builder.track("Berlin", 1, Role::Subject)?;
/// builder.track("city", 1, Role::Other)?;
/// builder.track("city", 2, Role::Subject)?;
/// let index = builder.build();
///
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.max_sentence(), Some(2));
/// # Ok::<(), anno_coherence::Error>(())
/// ```
pub struct EntityOccurrenceIndexBuilder {
    strategy: Box<dyn LanguageStrategy>,
    entries: HashMap<String, BTreeMap<usize, Role>>,
}

impl EntityOccurrenceIndexBuilder {
    /// Create a builder with [`DefaultStrategy`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategy: Box::new(DefaultStrategy),
            entries: HashMap::new(),
        }
    }

    /// Use a language-specific strategy for normalization and merging.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl LanguageStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Record one mention of `surface` in `sentence` with `role`.
    ///
    /// The surface form passes through the strategy's normalization, which
    /// may expand it into several entities; each is tracked with the same
    /// sentence and role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for [`Role::Empty`]: absence is
    /// represented by not tracking the entity.
    pub fn track(&mut self, surface: &str, sentence: usize, role: Role) -> Result<()> {
        for entity in self.strategy.normalize_entity(surface) {
            self.track_normalized(&entity, sentence, role)?;
        }
        Ok(())
    }

    fn track_normalized(&mut self, entity: &str, sentence: usize, role: Role) -> Result<()> {
        if role.is_empty() {
            return Err(Error::invalid_input(format!(
                "entity '{}' tracked with an empty role in sentence {}",
                entity, sentence
            )));
        }
        let sentences = self.entries.entry(entity.to_string()).or_default();
        match sentences.get_mut(&sentence) {
            Some(existing) => *existing = self.strategy.merge_role(*existing, role),
            None => {
                sentences.insert(sentence, role);
            }
        }
        Ok(())
    }

    /// Number of entities tracked so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been tracked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the index.
    #[must_use]
    pub fn build(self) -> EntityOccurrenceIndex {
        log::debug!(
            "built occurrence index with {} entities (strategy: {})",
            self.entries.len(),
            self.strategy.name()
        );
        let entries = self
            .entries
            .into_iter()
            .filter(|(_, sentences)| !sentences.is_empty())
            .map(|(entity, sentences)| {
                let occs = sentences
                    .into_iter()
                    .map(|(sentence, role)| Occurrence::new(sentence, role))
                    .collect();
                (entity, occs)
            })
            .collect();
        EntityOccurrenceIndex { entries }
    }
}

impl Default for EntityOccurrenceIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityOccurrenceIndexBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityOccurrenceIndexBuilder")
            .field("strategy", &self.strategy.name())
            .field("entities", &self.entries.len())
            .finish()
    }
}
