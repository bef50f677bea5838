//! Sentence-ordering evaluation.
//!
//! The standard intrinsic test for a coherence model: a document in its
//! original order should score higher than the same document with its
//! sentences shuffled.
//!
//! ```rust
//! use anno_coherence::eval::{discrimination, permutations};
//! use anno_coherence::{EntityOccurrenceIndex, ProjectionKind, Role};
//!
//! let index = EntityOccurrenceIndex::from_occurrences([
//!     ("atom", vec![(0, Role::Subject), (1, Role::Subject)]),
//!     ("nucleus", vec![(2, Role::Subject), (3, Role::Object)]),
//! ])?;
//!
//! let shuffles = permutations(4, 10, 42);
//! let report = discrimination(&index, 4, ProjectionKind::Weighted, &shuffles)?;
//! assert_eq!(report.compared(), shuffles.len());
//! # Ok::<(), anno_coherence::Error>(())
//! ```

mod discrimination;
mod sampling;

pub use discrimination::{discrimination, DiscriminationReport};
pub use sampling::{permutations, shuffled_order};
