use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::types::{Qualifier, SpeciesId};

/// One identifier cross-reference of a species, e.g. `chebi:17925` for glucose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesIdentifier {
    /// Internal id of the annotated entity. Compartment records carry the
    /// `c_id` here.
    pub s_id: SpeciesId,

    /// Entity display name
    pub s_name: String,

    /// Ontology (identifier namespace), lowercase
    pub ontology: String,

    /// Identifier within the ontology
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Relation qualifier. Not interpreted by matching; filter with
    /// [`SpeciesIdentifiers::with_qualifiers`].
    pub bqb: Qualifier,
}

/// The species-identifier relation of a pathway model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesIdentifiers {
    records: Vec<SpeciesIdentifier>,
}

impl SpeciesIdentifiers {
    #[must_use]
    pub fn new(records: Vec<SpeciesIdentifier>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[SpeciesIdentifier] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesIdentifier> {
        self.records.iter()
    }

    /// Distinct ontologies present in the table
    #[must_use]
    pub fn ontologies(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.ontology.as_str()).collect()
    }

    /// Keep only records carrying one of the given qualifiers
    /// (e.g. `BQB_IS` for exact equivalence)
    #[must_use]
    pub fn with_qualifiers(&self, qualifiers: &[Qualifier]) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| qualifiers.contains(&r.bqb))
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SpeciesIdentifier> for SpeciesIdentifiers {
    fn from_iter<I: IntoIterator<Item = SpeciesIdentifier>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(s_id: &str, ontology: &str, identifier: &str, bqb: Qualifier) -> SpeciesIdentifier {
        SpeciesIdentifier {
            s_id: SpeciesId::new(s_id),
            s_name: s_id.to_lowercase(),
            ontology: ontology.to_string(),
            identifier: identifier.to_string(),
            url: None,
            bqb,
        }
    }

    #[test]
    fn test_with_qualifiers() {
        let table: SpeciesIdentifiers = vec![
            record("S1", "chebi", "17925", Qualifier::Is),
            record("S1", "chebi", "4167", Qualifier::HasPart),
            record("S2", "uniprot", "P19367", Qualifier::Is),
        ]
        .into_iter()
        .collect();

        let exact = table.with_qualifiers(&[Qualifier::Is]);
        assert_eq!(exact.len(), 2);
        assert!(exact.iter().all(|r| r.bqb == Qualifier::Is));
    }

    #[test]
    fn test_ontologies() {
        let table = SpeciesIdentifiers::new(vec![
            record("S1", "chebi", "17925", Qualifier::Is),
            record("S2", "uniprot", "P19367", Qualifier::Is),
            record("S3", "chebi", "15361", Qualifier::Is),
        ]);
        let ontologies: Vec<&str> = table.ontologies().into_iter().collect();
        assert_eq!(ontologies, vec!["chebi", "uniprot"]);
    }
}
