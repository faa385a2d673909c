//! Core data types for pathway identifier matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`SpeciesIdentifier`](identifiers::SpeciesIdentifier): an ontology-scoped
//!   cross-reference of an internal species
//! - [`FeatureTable`](table::FeatureTable): caller-supplied rows of external identifiers
//! - [`EdgeList`](edgelist::EdgeList): candidate interactions between external identifiers
//! - [`SpeciesId`](types::SpeciesId), [`CompartmentalizedSpeciesId`](types::CompartmentalizedSpeciesId),
//!   [`ReactionId`](types::ReactionId): internal identities
//! - [`MatchError`](error::MatchError): configuration and cache errors
//!
//! ## Identifier Scoping
//!
//! Identifiers are only unique within an ontology: `15361` means pyruvate in
//! ChEBI and nothing in UniProt. All matching is therefore restricted to an
//! explicit [`OntologySet`](types::OntologySet).
//!
//! | Ontology | Example | Entity |
//! |----------|---------|--------|
//! | chebi    | 17925   | D-glucose |
//! | uniprot  | P19367  | hexokinase 1 |
//! | ensembl_gene | ENSG00000156515 | HK1 gene |

pub mod edgelist;
pub mod error;
pub mod identifiers;
pub mod table;
pub mod types;
