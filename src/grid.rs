//! Entity grid: the sentence × entity matrix of grammatical roles.
//!
//! Rows are sentences, columns are entities, cells are roles:
//!
//! ```text
//!        Berlin  city
//! s0       O      -
//! s1       S      X
//! s2       -      S
//! ```
//!
//! Column positions are assigned in sorted entity order, which keeps
//! rendering reproducible; callers should still look columns up by entity
//! identifier rather than rely on positions.

use crate::error::{Error, Result};
use crate::index::EntityOccurrenceIndex;
use crate::role::Role;
use std::collections::HashMap;
use std::fmt;

/// Dense sentence × entity role matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityGrid {
    number_of_sentences: usize,
    entities: Vec<String>,
    columns: HashMap<String, usize>,
    /// Row-major: `cells[sentence * entities.len() + column]`
    cells: Vec<Role>,
}

impl EntityGrid {
    /// Build a grid from an occurrence index.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `number_of_sentences` is zero.
    /// - [`Error::MalformedIndex`] if any occurrence references a sentence
    ///   `>= number_of_sentences`. The grid is never silently truncated.
    pub fn build(index: &EntityOccurrenceIndex, number_of_sentences: usize) -> Result<Self> {
        if number_of_sentences == 0 {
            return Err(Error::invalid_input(
                "an entity grid needs at least one sentence",
            ));
        }
        index.validate(number_of_sentences)?;

        let entities: Vec<String> = index
            .sorted_entities()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = entities.len();
        let mut cells = vec![Role::Empty; number_of_sentences * width];
        for (column, entity) in entities.iter().enumerate() {
            for occurrence in index.occurrences(entity).unwrap_or_default() {
                cells[occurrence.sentence * width + column] = occurrence.role;
            }
        }

        log::debug!(
            "built entity grid: {} sentences x {} entities",
            number_of_sentences,
            width
        );
        Ok(Self::from_parts(number_of_sentences, entities, cells))
    }

    /// Build a grid directly from per-entity role sequences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if there are no sentences, if the
    /// sequences differ in length, or if an entity is listed twice.
    pub fn from_columns<K: Into<String>>(columns: Vec<(K, Vec<Role>)>) -> Result<Self> {
        let number_of_sentences = columns.first().map(|(_, roles)| roles.len()).unwrap_or(0);
        if number_of_sentences == 0 {
            return Err(Error::invalid_input(
                "an entity grid needs at least one sentence",
            ));
        }

        let width = columns.len();
        let mut entities = Vec::with_capacity(width);
        let mut cells = vec![Role::Empty; number_of_sentences * width];
        for (column, (entity, roles)) in columns.into_iter().enumerate() {
            let entity = entity.into();
            if roles.len() != number_of_sentences {
                return Err(Error::invalid_input(format!(
                    "column '{}' has {} sentences, expected {}",
                    entity,
                    roles.len(),
                    number_of_sentences
                )));
            }
            if entities.contains(&entity) {
                return Err(Error::invalid_input(format!(
                    "entity '{}' appears in two columns",
                    entity
                )));
            }
            for (sentence, role) in roles.into_iter().enumerate() {
                cells[sentence * width + column] = role;
            }
            entities.push(entity);
        }
        Ok(Self::from_parts(number_of_sentences, entities, cells))
    }

    /// Parse a grid from its textual rows, one row per sentence.
    ///
    /// Whitespace is ignored, so `"S - O"` and `"S-O"` are the same row.
    /// Columns get synthetic identifiers `e0`, `e1`, ...
    ///
    /// ```rust
    /// use anno_coherence::{EntityGrid, Role};
    ///
    /// let grid = EntityGrid::from_rows(&["S - O", "- S -", "S O X"])?;
    /// assert_eq!(grid.number_of_sentences(), 3);
    /// assert_eq!(grid.role(2, "e2"), Some(Role::Other));
    /// # Ok::<(), anno_coherence::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unknown role characters or ragged rows,
    /// and [`Error::InvalidInput`] when there are no rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::invalid_input(
                "an entity grid needs at least one sentence",
            ));
        }

        let mut parsed: Vec<Vec<Role>> = Vec::with_capacity(rows.len());
        for (sentence, row) in rows.iter().enumerate() {
            let roles = row
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(Role::try_from)
                .collect::<Result<Vec<_>>>()?;
            if let Some(first) = parsed.first() {
                if first.len() != roles.len() {
                    return Err(Error::parse(format!(
                        "row {} has {} cells, expected {}",
                        sentence,
                        roles.len(),
                        first.len()
                    )));
                }
            }
            parsed.push(roles);
        }

        let width = parsed[0].len();
        let entities = (0..width).map(|c| format!("e{}", c)).collect();
        let cells = parsed.into_iter().flatten().collect();
        Ok(Self::from_parts(rows.len(), entities, cells))
    }

    fn from_parts(number_of_sentences: usize, entities: Vec<String>, cells: Vec<Role>) -> Self {
        let columns = entities
            .iter()
            .enumerate()
            .map(|(column, entity)| (entity.clone(), column))
            .collect();
        Self {
            number_of_sentences,
            entities,
            columns,
            cells,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn number_of_sentences(&self) -> usize {
        self.number_of_sentences
    }

    /// Number of columns.
    #[must_use]
    pub fn number_of_entities(&self) -> usize {
        self.entities.len()
    }

    /// Entity identifiers, in column order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Column position of an entity.
    #[must_use]
    pub fn column_of(&self, entity: &str) -> Option<usize> {
        self.columns.get(entity).copied()
    }

    /// Role of `entity` in `sentence`.
    ///
    /// `None` if the entity is not tracked or the sentence is out of range.
    #[must_use]
    pub fn role(&self, sentence: usize, entity: &str) -> Option<Role> {
        let column = self.column_of(entity)?;
        self.get(sentence, column)
    }

    /// Cell at (`sentence`, `column`).
    #[must_use]
    pub fn get(&self, sentence: usize, column: usize) -> Option<Role> {
        if sentence >= self.number_of_sentences || column >= self.entities.len() {
            return None;
        }
        Some(self.cells[sentence * self.entities.len() + column])
    }

    /// One sentence's roles, in column order.
    #[must_use]
    pub fn row(&self, sentence: usize) -> Option<&[Role]> {
        if sentence >= self.number_of_sentences {
            return None;
        }
        let width = self.entities.len();
        Some(&self.cells[sentence * width..(sentence + 1) * width])
    }

    /// One entity's roles down the document.
    ///
    /// Yields nothing if `column` is out of range.
    pub fn column(&self, column: usize) -> impl Iterator<Item = Role> + '_ {
        let width = self.entities.len();
        let rows = if column < width {
            self.number_of_sentences
        } else {
            0
        };
        (0..rows).map(move |sentence| self.cells[sentence * width + column])
    }

    /// Number of sentences in which the entity at `column` occurs.
    #[must_use]
    pub fn occurrence_count(&self, column: usize) -> usize {
        self.column(column).filter(|role| !role.is_empty()).count()
    }
}

impl fmt::Display for EntityGrid {
    /// One line per sentence, roles separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sentence in 0..self.number_of_sentences {
            let row = self.row(sentence).unwrap_or_default();
            let line: Vec<String> = row.iter().map(Role::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin_city() -> EntityOccurrenceIndex {
        EntityOccurrenceIndex::from_occurrences([
            ("Berlin", vec![(0, Role::Object), (1, Role::Subject)]),
            ("city", vec![(1, Role::Other), (2, Role::Subject)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_fills_roles() {
        let grid = EntityGrid::build(&berlin_city(), 3).unwrap();
        assert_eq!(grid.number_of_sentences(), 3);
        assert_eq!(grid.number_of_entities(), 2);
        assert_eq!(grid.role(0, "Berlin"), Some(Role::Object));
        assert_eq!(grid.role(1, "Berlin"), Some(Role::Subject));
        assert_eq!(grid.role(2, "Berlin"), Some(Role::Empty));
        assert_eq!(grid.role(1, "city"), Some(Role::Other));
        assert_eq!(grid.role(2, "city"), Some(Role::Subject));
        assert_eq!(grid.role(0, "Paris"), None);
        assert_eq!(grid.role(3, "city"), None);
    }

    #[test]
    fn test_trailing_sentences_stay_empty() {
        let grid = EntityGrid::build(&berlin_city(), 5).unwrap();
        assert_eq!(grid.row(4), Some(&[Role::Empty, Role::Empty][..]));
    }

    #[test]
    fn test_build_rejects_out_of_bounds() {
        let err = EntityGrid::build(&berlin_city(), 2).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { sentence: 2, .. }));
        assert!(EntityGrid::build(&berlin_city(), 0).is_err());
    }

    #[test]
    fn test_from_rows_and_display() {
        let grid = EntityGrid::from_rows(&["S-O", "-S-", "SOX"]).unwrap();
        assert_eq!(grid.to_string(), "S - O\n- S -\nS O X\n");
        assert_eq!(
            grid.column(0).collect::<Vec<_>>(),
            vec![Role::Subject, Role::Empty, Role::Subject]
        );
        assert_eq!(grid.occurrence_count(1), 2);
        assert_eq!(grid.column(9).count(), 0);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        assert!(matches!(
            EntityGrid::from_rows(&["S O", "S"]),
            Err(Error::Parse(_))
        ));
        assert!(matches!(EntityGrid::from_rows(&["S Q"]), Err(Error::Parse(_))));
    }

    #[test]
    fn test_from_columns() {
        let grid = EntityGrid::from_columns(vec![
            ("atom", vec![Role::Subject, Role::Object]),
            ("nucleus", vec![Role::Empty, Role::Other]),
        ])
        .unwrap();
        assert_eq!(grid.row(1), Some(&[Role::Object, Role::Other][..]));
        assert_eq!(grid.column_of("nucleus"), Some(1));

        let ragged = EntityGrid::from_columns(vec![
            ("atom", vec![Role::Subject, Role::Object]),
            ("nucleus", vec![Role::Other]),
        ]);
        assert!(ragged.is_err());
        let duplicate = EntityGrid::from_columns(vec![
            ("atom", vec![Role::Subject]),
            ("atom", vec![Role::Other]),
        ]);
        assert!(duplicate.is_err());
    }
}
