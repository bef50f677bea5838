//! Grammatical roles and their ranking.
//!
//! An entity mention is reduced to one of three grammatical functions, or
//! [`Role::Empty`] when the entity is absent from a sentence:
//!
//! | Role | Grid char | Syntactic weight |
//! |------|-----------|------------------|
//! | `Subject` | `S` | 3 |
//! | `Object` | `O` | 2 |
//! | `Other` | `X` | 1 |
//! | `Empty` | `-` | 0 |
//!
//! The derived ordering *is* the role ranking: `Subject > Object > Other > Empty`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammatical role of an entity in a sentence.
///
/// Variant order matters: `Ord` is derived, so comparisons follow the ranking
/// used to merge two observations of one entity in one sentence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Role {
    /// Entity does not occur in the sentence
    #[default]
    Empty,
    /// Any other grammatical function (modifier, prepositional complement, ...)
    Other,
    /// Direct, indirect, or prepositional object
    Object,
    /// Nominal or clausal subject, active or passive
    Subject,
}

impl Role {
    /// All roles in rank order, lowest first.
    pub const ALL: [Role; 4] = [Role::Empty, Role::Other, Role::Object, Role::Subject];

    /// Number of distinct roles.
    pub const COUNT: usize = 4;

    /// Merge two observations of the same entity in the same sentence.
    ///
    /// The higher-ranked role wins.
    ///
    /// ```rust
    /// use anno_coherence::Role;
    ///
    /// assert_eq!(Role::Object.merge(Role::Other), Role::Object);
    /// assert_eq!(Role::Other.merge(Role::Subject), Role::Subject);
    /// ```
    #[must_use]
    pub fn merge(self, other: Role) -> Role {
        self.max(other)
    }

    /// Weight used by the syntactic projection.
    #[must_use]
    pub const fn syntactic_weight(&self) -> u32 {
        match self {
            Role::Subject => 3,
            Role::Object => 2,
            Role::Other => 1,
            Role::Empty => 0,
        }
    }

    /// Dense index in `0..Role::COUNT`, following the rank order.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Role::Empty => 0,
            Role::Other => 1,
            Role::Object => 2,
            Role::Subject => 3,
        }
    }

    /// Single-character grid notation.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Role::Subject => 'S',
            Role::Object => 'O',
            Role::Other => 'X',
            Role::Empty => '-',
        }
    }

    /// Whether the entity is absent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Role::Empty)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Role {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'S' | 's' => Ok(Role::Subject),
            'O' | 'o' => Ok(Role::Object),
            'X' | 'x' => Ok(Role::Other),
            '-' => Ok(Role::Empty),
            other => Err(Error::parse(format!("unknown role character '{}'", other))),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Role::try_from(c),
            _ => match trimmed.to_ascii_lowercase().as_str() {
                "subject" => Ok(Role::Subject),
                "object" => Ok(Role::Object),
                "other" => Ok(Role::Other),
                "empty" => Ok(Role::Empty),
                _ => Err(Error::parse(format!("unknown role '{}'", s))),
            },
        }
    }
}
