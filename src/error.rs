//! Error types for anno-coherence.

use thiserror::Error;

/// Result type for anno-coherence operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for anno-coherence operations.
///
/// Every error is local to one document's scoring pipeline: nothing here
/// poisons shared state, so a caller iterating over a corpus can log the
/// error and move on to the next document.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An occurrence references a sentence outside the declared bounds.
    #[error(
        "Malformed index: entity '{entity}' occurs in sentence {sentence}, \
         but the document declares {number_of_sentences} sentences"
    )]
    MalformedIndex {
        /// Entity whose occurrence is out of bounds
        entity: String,
        /// Offending sentence index
        sentence: usize,
        /// Declared number of sentences
        number_of_sentences: usize,
    },

    /// Coherence is undefined for a document without tracked entities.
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// No transition windows fit in the grid, so there is nothing to normalize.
    #[error(
        "Degenerate transition window: length {window_length} exceeds \
         {number_of_sentences} sentences"
    )]
    DegenerateTransitionWindow {
        /// Requested window length
        window_length: usize,
        /// Number of sentences in the grid
        number_of_sentences: usize,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a malformed index error.
    #[must_use]
    pub fn malformed_index(
        entity: impl Into<String>,
        sentence: usize,
        number_of_sentences: usize,
    ) -> Self {
        Self::MalformedIndex {
            entity: entity.into(),
            sentence,
            number_of_sentences,
        }
    }

    /// Create an empty document error.
    #[must_use]
    pub fn empty_document(msg: impl Into<String>) -> Self {
        Self::EmptyDocument(msg.into())
    }

    /// Create a degenerate transition window error.
    #[must_use]
    pub fn degenerate_window(window_length: usize, number_of_sentences: usize) -> Self {
        Self::DegenerateTransitionWindow {
            window_length,
            number_of_sentences,
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
