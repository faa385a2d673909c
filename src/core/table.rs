use serde::{Deserialize, Serialize};

use crate::core::error::MatchError;

/// A caller-supplied table of string columns (e.g. external feature identifiers).
///
/// Column names are referenced explicitly by the operations that consume the
/// table; nothing is inferred from position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FeatureTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a single-column table
    pub fn from_column<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new([column.into()]);
        for value in values {
            table.rows.push(vec![value.into()]);
        }
        table
    }

    /// Append a row. Short rows are padded with empty strings and long rows
    /// are truncated to the number of columns.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = values.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a named column
    ///
    /// # Errors
    ///
    /// Returns `MatchError::MissingColumn` if the table has no such column.
    pub fn column_index(&self, name: &str) -> Result<usize, MatchError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| MatchError::MissingColumn {
                column: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Iterate over the values of a named column, in row order
    ///
    /// # Errors
    ///
    /// Returns `MatchError::MissingColumn` if the table has no such column.
    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &str>, MatchError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
