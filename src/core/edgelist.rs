use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::MatchError;
use crate::core::table::FeatureTable;

/// Default column holding upstream identifiers
pub const UPSTREAM_COLUMN: &str = "identifier_upstream";

/// Default column holding downstream identifiers
pub const DOWNSTREAM_COLUMN: &str = "identifier_downstream";

/// A candidate interaction between two externally identified entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub identifier_upstream: String,
    pub identifier_downstream: String,

    /// Any additional columns of the input row, carried through expansion
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(upstream: impl Into<String>, downstream: impl Into<String>) -> Self {
        Self {
            identifier_upstream: upstream.into(),
            identifier_downstream: downstream.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An ordered list of candidate interactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    #[must_use]
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Build an edge list from (upstream, downstream) identifier pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(up, down)| Edge::new(up, down))
                .collect(),
        )
    }

    /// Build an edge list from a table using the default
    /// `identifier_upstream` / `identifier_downstream` columns
    ///
    /// # Errors
    ///
    /// Returns `MatchError::MissingColumn` if either column is absent.
    pub fn from_table(table: &FeatureTable) -> Result<Self, MatchError> {
        Self::from_table_with_columns(table, UPSTREAM_COLUMN, DOWNSTREAM_COLUMN)
    }

    /// Build an edge list from a table with explicit endpoint columns.
    /// All other columns become edge attributes.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::MissingColumn` if either column is absent.
    pub fn from_table_with_columns(
        table: &FeatureTable,
        upstream_column: &str,
        downstream_column: &str,
    ) -> Result<Self, MatchError> {
        let up_idx = table.column_index(upstream_column)?;
        let down_idx = table.column_index(downstream_column)?;

        let edges = table
            .rows()
            .iter()
            .map(|row| {
                let attributes = table
                    .columns()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != up_idx && *i != down_idx)
                    .map(|(i, name)| (name.clone(), row[i].clone()))
                    .collect();
                Edge {
                    identifier_upstream: row[up_idx].clone(),
                    identifier_downstream: row[down_idx].clone(),
                    attributes,
                }
            })
            .collect();

        Ok(Self { edges })
    }

    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_table_carries_attributes() {
        let mut table = FeatureTable::new([UPSTREAM_COLUMN, "score", DOWNSTREAM_COLUMN]);
        table.push_row(["17925", "0.8", "32966"]);
        table.push_row(["57634", "0.1", "32966"]);

        let edgelist = EdgeList::from_table(&table).unwrap();
        assert_eq!(edgelist.len(), 2);
        assert_eq!(edgelist.edges()[0].identifier_upstream, "17925");
        assert_eq!(edgelist.edges()[0].identifier_downstream, "32966");
        assert_eq!(edgelist.edges()[1].attributes["score"], "0.1");
        assert_eq!(edgelist.edges()[1].attributes.len(), 1);
    }

    #[test]
    fn test_from_table_missing_column() {
        let table = FeatureTable::new(["source", "target"]);
        assert!(matches!(
            EdgeList::from_table(&table),
            Err(MatchError::MissingColumn { .. })
        ));

        let edgelist = EdgeList::from_table_with_columns(&table, "source", "target").unwrap();
        assert!(edgelist.is_empty());
    }

    #[test]
    fn test_from_pairs() {
        let edgelist = EdgeList::from_pairs([("a", "b"), ("c", "d")]);
        assert_eq!(edgelist.len(), 2);
        assert_eq!(edgelist.edges()[1], Edge::new("c", "d"));
    }
}
