//! Bipartite entity graph (Guinaudeau & Strube, 2013).
//!
//! The entity grid can be read as a bipartite graph: one node per sentence,
//! one node per entity, and an edge labelled with the grammatical role
//! wherever an entity occurs in a sentence.
//!
//! ```text
//!   sentences            entities
//!     s0 ──────O────────  Berlin
//!     s1 ──────S──────┘
//!     s1 ──────X────────  city
//!     s2 ──────S──────┘
//! ```
//!
//! Projections onto the sentence side (see [`crate::projection`]) connect
//! sentences that share entities; coherence is read off that projection.
//!
//! # Sparse sentence nodes
//!
//! Only sentences with at least one tracked entity get a node. A sentence
//! without nouns simply does not exist in the graph, so the `N` used to
//! average out-degree counts *non-empty* sentences, not the document's
//! sentence count. Distances between nodes still use the original sentence
//! indices.

use crate::index::EntityOccurrenceIndex;
use crate::role::Role;
use std::collections::{BTreeMap, HashSet};

/// A sentence and the entities it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceNode {
    id: usize,
    roles: BTreeMap<String, Role>,
}

impl SentenceNode {
    fn new(id: usize) -> Self {
        Self {
            id,
            roles: BTreeMap::new(),
        }
    }

    fn add_entity(&mut self, entity: &str, role: Role) {
        match self.roles.get_mut(entity) {
            Some(existing) => *existing = existing.merge(role),
            None => {
                self.roles.insert(entity.to_string(), role);
            }
        }
    }

    /// Sentence index in the document.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Entities occurring in this sentence, sorted.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Number of entities in this sentence.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.roles.len()
    }

    /// Whether the entity occurs in this sentence.
    #[must_use]
    pub fn has_entity_node(&self, entity: &str) -> bool {
        self.roles.contains_key(entity)
    }

    /// Role of the entity in this sentence.
    #[must_use]
    pub fn role_of(&self, entity: &str) -> Option<Role> {
        self.roles.get(entity).copied()
    }

    /// Whether the sentence links to `entity` with exactly `role`.
    #[must_use]
    pub fn has_edge(&self, entity: &str, role: Role) -> bool {
        self.role_of(entity) == Some(role)
    }

    /// Entity → role edges of this sentence.
    #[must_use]
    pub fn edges(&self) -> &BTreeMap<String, Role> {
        &self.roles
    }

    /// Entities this sentence shares with `other`, sorted.
    #[must_use]
    pub fn shared_entities<'a>(&'a self, other: &SentenceNode) -> Vec<&'a str> {
        self.roles
            .keys()
            .filter(|entity| other.roles.contains_key(entity.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Sentence nodes, entity nodes, and the role-labelled edges between them.
///
/// Immutable once built. Every entity in [`BipartiteGraph::entities`] occurs
/// in at least one sentence node and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BipartiteGraph {
    sentences: BTreeMap<usize, SentenceNode>,
    entities: HashSet<String>,
}

impl BipartiteGraph {
    /// Build the graph from an occurrence index.
    ///
    /// ```rust
    /// use anno_coherence::{BipartiteGraph, EntityOccurrenceIndex, Role};
    ///
    /// let index = EntityOccurrenceIndex::from_occurrences([
    ///     ("Berlin", vec![(0, Role::Object), (1, Role::Subject)]),
    ///     ("city", vec![(1, Role::Other), (2, Role::Subject)]),
    /// ])?;
    /// let graph = BipartiteGraph::from_index(&index);
    ///
    /// assert_eq!(graph.sentence_count(), 3);
    /// assert!(graph.contains_entity_node("Berlin"));
    /// assert!(graph.sentence_node(1).unwrap().has_edge("Berlin", Role::Subject));
    /// # Ok::<(), anno_coherence::Error>(())
    /// ```
    #[must_use]
    pub fn from_index(index: &EntityOccurrenceIndex) -> Self {
        let mut graph = Self::default();
        for (entity, occurrences) in index.iter() {
            graph.entities.insert(entity.to_string());
            for occurrence in occurrences {
                graph
                    .sentences
                    .entry(occurrence.sentence)
                    .or_insert_with(|| SentenceNode::new(occurrence.sentence))
                    .add_entity(entity, occurrence.role);
            }
        }
        log::debug!(
            "built bipartite graph: {} sentence nodes, {} entity nodes",
            graph.sentences.len(),
            graph.entities.len()
        );
        graph
    }

    /// The sentence node with this id, if the sentence mentions any entity.
    #[must_use]
    pub fn sentence_node(&self, id: usize) -> Option<&SentenceNode> {
        self.sentences.get(&id)
    }

    /// Whether the entity occurs anywhere in the document.
    #[must_use]
    pub fn contains_entity_node(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    /// All distinct entities of the document.
    #[must_use]
    pub fn entities(&self) -> &HashSet<String> {
        &self.entities
    }

    /// Sentence nodes in ascending id order.
    pub fn sentence_nodes(&self) -> impl Iterator<Item = &SentenceNode> {
        self.sentences.values()
    }

    /// Number of sentence nodes (non-empty sentences only).
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Number of entity nodes.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of sentence–entity edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.sentences.values().map(SentenceNode::entity_count).sum()
    }

    /// Whether the graph has no sentence nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
