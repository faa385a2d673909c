use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::core::edgelist::EdgeList;
use crate::core::error::MatchError;
use crate::core::identifiers::{SpeciesIdentifier, SpeciesIdentifiers};
use crate::core::table::FeatureTable;
use crate::core::types::{CompartmentalizedSpeciesId, OntologySet, Qualifier, SpeciesId};
use crate::model::store::PathwayModel;
use crate::utils::validation::is_missing_identifier;

/// Column name used when resolving the distinct identifiers of an edge list
const IDENTIFIER_COLUMN: &str = "identifier";

/// Options shared by all resolution and filtering operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Treat "nothing matched at all" as an error instead of an empty result
    pub strict: bool,
}

impl MatchOptions {
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// One (feature row, species record) pair sharing an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatch {
    /// Row index in the input feature table
    pub row: usize,
    pub identifier: String,
    pub s_id: SpeciesId,
    pub s_name: String,
    pub ontology: String,
    pub bqb: Qualifier,
}

/// An input edge with both endpoints resolved to species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEdge {
    /// Position of the source edge in the input edge list
    pub edge_index: usize,
    pub identifier_upstream: String,
    pub identifier_downstream: String,
    pub s_id_upstream: SpeciesId,
    pub s_id_downstream: SpeciesId,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// A species-level edge expanded to one pair of compartmentalized instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentalizedEdge {
    #[serde(flatten)]
    pub edge: SpeciesEdge,
    pub sc_id_upstream: CompartmentalizedSpeciesId,
    pub sc_id_downstream: CompartmentalizedSpeciesId,
}

/// Identifier -> records index over the requested ontologies
struct IdentifierIndex<'a> {
    by_identifier: HashMap<&'a str, Vec<&'a SpeciesIdentifier>>,
}

impl<'a> IdentifierIndex<'a> {
    fn build(
        species_identifiers: &'a SpeciesIdentifiers,
        ontologies: &OntologySet,
    ) -> Result<Self, MatchError> {
        validate_ontologies(species_identifiers, ontologies)?;

        let mut by_identifier: HashMap<&'a str, Vec<&'a SpeciesIdentifier>> = HashMap::new();
        for record in species_identifiers
            .iter()
            .filter(|r| ontologies.contains(&r.ontology))
        {
            by_identifier
                .entry(record.identifier.as_str())
                .or_default()
                .push(record);
        }
        Ok(Self { by_identifier })
    }

    fn lookup(&self, identifier: &str) -> &[&'a SpeciesIdentifier] {
        if is_missing_identifier(identifier) {
            return &[];
        }
        self.by_identifier
            .get(identifier.trim())
            .map_or(&[], Vec::as_slice)
    }
}

fn validate_ontologies(
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
) -> Result<(), MatchError> {
    if ontologies.is_empty() {
        return Err(MatchError::EmptyOntologySet);
    }

    let available = species_identifiers.ontologies();
    for ontology in ontologies.iter() {
        if !available.contains(ontology) {
            return Err(MatchError::UnknownOntology {
                ontology: ontology.to_string(),
                available: available.iter().copied().collect::<Vec<_>>().join(", "),
            });
        }
    }
    Ok(())
}

fn check_strict(
    options: &MatchOptions,
    matched: usize,
    rows: usize,
    ontologies: &OntologySet,
) -> Result<(), MatchError> {
    if options.strict && matched == 0 && rows > 0 {
        return Err(MatchError::NoMatches {
            ontologies: ontologies.to_string(),
            rows,
        });
    }
    Ok(())
}

/// Match external features to species through a shared identifier.
///
/// Emits one row per (feature row, matching record) within the requested
/// ontologies, in feature-row order. Missing identifiers (`-1` or empty)
/// never match and unmatched rows are dropped.
///
/// # Errors
///
/// Returns `MatchError::EmptyOntologySet`, `MatchError::UnknownOntology`, or
/// `MatchError::MissingColumn` for invalid arguments.
pub fn resolve_features(
    features: &FeatureTable,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
    id_column: &str,
) -> Result<Vec<FeatureMatch>, MatchError> {
    resolve_features_with(
        features,
        species_identifiers,
        ontologies,
        id_column,
        &MatchOptions::default(),
    )
}

/// [`resolve_features`] with explicit options
///
/// # Errors
///
/// As [`resolve_features`], plus `MatchError::NoMatches` in strict mode.
pub fn resolve_features_with(
    features: &FeatureTable,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
    id_column: &str,
    options: &MatchOptions,
) -> Result<Vec<FeatureMatch>, MatchError> {
    let index = IdentifierIndex::build(species_identifiers, ontologies)?;
    let identifiers = features.column_values(id_column)?;

    let mut matches = Vec::new();
    let mut unmatched_rows = 0usize;
    for (row, identifier) in identifiers.enumerate() {
        let records = index.lookup(identifier);
        if records.is_empty() {
            unmatched_rows += 1;
            continue;
        }
        matches.extend(records.iter().map(|record| FeatureMatch {
            row,
            identifier: record.identifier.clone(),
            s_id: record.s_id.clone(),
            s_name: record.s_name.clone(),
            ontology: record.ontology.clone(),
            bqb: record.bqb.clone(),
        }));
    }

    debug!(
        rows = features.len(),
        unmatched_rows,
        matches = matches.len(),
        ontologies = %ontologies,
        "Resolved features"
    );

    check_strict(options, matches.len(), features.len(), ontologies)?;
    Ok(matches)
}

/// Resolve both endpoints of every edge to species.
///
/// Distinct identifiers are resolved once, then joined back to each edge.
/// An edge whose endpoints match `m` and `n` species yields `m * n` rows;
/// an edge with an unmatched endpoint yields none.
///
/// # Errors
///
/// Returns `MatchError::EmptyOntologySet` or `MatchError::UnknownOntology`
/// for invalid ontologies.
pub fn resolve_edgelist(
    edgelist: &EdgeList,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
) -> Result<Vec<SpeciesEdge>, MatchError> {
    resolve_edgelist_with(
        edgelist,
        species_identifiers,
        ontologies,
        &MatchOptions::default(),
    )
}

/// [`resolve_edgelist`] with explicit options
///
/// # Errors
///
/// As [`resolve_edgelist`], plus `MatchError::NoMatches` in strict mode.
pub fn resolve_edgelist_with(
    edgelist: &EdgeList,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
    options: &MatchOptions,
) -> Result<Vec<SpeciesEdge>, MatchError> {
    let mut seen = HashSet::new();
    let distinct: Vec<&str> = edgelist
        .iter()
        .flat_map(|e| [e.identifier_upstream.as_str(), e.identifier_downstream.as_str()])
        .filter(|id| seen.insert(*id))
        .collect();

    let features = FeatureTable::from_column(IDENTIFIER_COLUMN, distinct);
    let matches = resolve_features(
        &features,
        species_identifiers,
        ontologies,
        IDENTIFIER_COLUMN,
    )?;

    let mut species_by_identifier: HashMap<&str, Vec<&SpeciesId>> = HashMap::new();
    for m in &matches {
        species_by_identifier
            .entry(m.identifier.as_str())
            .or_default()
            .push(&m.s_id);
    }

    let mut expanded = Vec::new();
    for (edge_index, edge) in edgelist.iter().enumerate() {
        let (Some(upstream), Some(downstream)) = (
            species_by_identifier.get(edge.identifier_upstream.trim()),
            species_by_identifier.get(edge.identifier_downstream.trim()),
        ) else {
            continue;
        };

        for s_up in upstream {
            for s_down in downstream {
                expanded.push(SpeciesEdge {
                    edge_index,
                    identifier_upstream: edge.identifier_upstream.clone(),
                    identifier_downstream: edge.identifier_downstream.clone(),
                    s_id_upstream: (*s_up).clone(),
                    s_id_downstream: (*s_down).clone(),
                    attributes: edge.attributes.clone(),
                });
            }
        }
    }

    debug!(
        edges = edgelist.len(),
        identifiers = features.len(),
        expanded = expanded.len(),
        "Resolved edge list to species"
    );

    check_strict(options, expanded.len(), edgelist.len(), ontologies)?;
    Ok(expanded)
}

/// Resolve an edge list to compartmentalized species pairs.
///
/// Each species-level edge fans out to every (upstream instance, downstream
/// instance) pair of the model. Species without compartmentalized instances
/// drop out.
///
/// # Errors
///
/// As [`resolve_edgelist`].
pub fn resolve_edgelist_to_compartments(
    edgelist: &EdgeList,
    model: &PathwayModel,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
) -> Result<Vec<CompartmentalizedEdge>, MatchError> {
    resolve_edgelist_to_compartments_with(
        edgelist,
        model,
        species_identifiers,
        ontologies,
        &MatchOptions::default(),
    )
}

/// [`resolve_edgelist_to_compartments`] with explicit options
///
/// # Errors
///
/// As [`resolve_edgelist`], plus `MatchError::NoMatches` in strict mode.
pub fn resolve_edgelist_to_compartments_with(
    edgelist: &EdgeList,
    model: &PathwayModel,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
    options: &MatchOptions,
) -> Result<Vec<CompartmentalizedEdge>, MatchError> {
    let species_edges = resolve_edgelist_with(edgelist, species_identifiers, ontologies, options)?;

    let mut expanded = Vec::new();
    for edge in species_edges {
        let upstream = model.compartmentalized_ids(&edge.s_id_upstream);
        let downstream = model.compartmentalized_ids(&edge.s_id_downstream);
        for sc_up in upstream {
            for sc_down in downstream {
                expanded.push(CompartmentalizedEdge {
                    edge: edge.clone(),
                    sc_id_upstream: sc_up.clone(),
                    sc_id_downstream: sc_down.clone(),
                });
            }
        }
    }

    debug!(
        edges = edgelist.len(),
        expanded = expanded.len(),
        "Expanded edge list to compartmentalized species"
    );

    check_strict(options, expanded.len(), edgelist.len(), ontologies)?;
    Ok(expanded)
}
