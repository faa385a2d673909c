//! # pathway-matcher
//!
//! A library for checking candidate molecular interactions against a curated
//! pathway model.
//!
//! Interaction lists from screens or literature mining name their molecules
//! with external identifiers (ChEBI, UniProt, Ensembl). `pathway-matcher`
//! resolves those identifiers to the model's species, expands each edge to
//! every compartmentalized instance of its endpoints, and classifies the
//! resulting pairs against the model's reaction network.
//!
//! ## Features
//!
//! - **Identifier resolution**: Hash join of external identifiers onto model
//!   species within chosen ontologies, with one-to-many fan-out preserved
//! - **Direct interactions**: Pairs that take part in the same reaction, with
//!   the connecting reaction and stoichiometries
//! - **Indirect interactions**: Pairs linked by a bounded multi-step path,
//!   with hop count and cumulative hub-penalized weight
//! - **Reusable distances**: All-pairs shortest paths computed once, checked
//!   against the graph signature, and saved to disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use pathway_matcher::{EdgeList, EntityType, InteractionGraph, OntologySet, PathwayModel};
//! use pathway_matcher::matching::filter::{filter_direct, filter_indirect};
//!
//! let model = PathwayModel::load_embedded().unwrap();
//! let identifiers = model.get_identifiers(EntityType::Species);
//! let graph = InteractionGraph::from_model(&model).unwrap();
//!
//! let edges = EdgeList::from_pairs([("57634", "32966"), ("17925", "15361")]);
//! let chebi = OntologySet::new(["chebi"]);
//!
//! let direct = filter_direct(&edges, &model, &identifiers, &chebi).unwrap();
//! let indirect =
//!     filter_indirect(&edges, &model, &identifiers, &graph, &chebi, None, 10).unwrap();
//!
//! for i in &indirect {
//!     println!(
//!         "{} -> {}: {} steps, weight {:.2}",
//!         i.edge.sc_id_upstream, i.edge.sc_id_downstream, i.path_length, i.weight
//!     );
//! }
//! println!("{} direct, {} indirect", direct.len(), indirect.len());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifier types, tables, edge lists and errors
//! - [`model`]: Pathway model storage and indexing
//! - [`network`]: Interaction graph and shortest-path distances
//! - [`matching`]: Identifier resolution and mechanistic filtering
//! - [`parsing`]: TSV/CSV table parsing
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod model;
pub mod network;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::edgelist::{Edge, EdgeList};
pub use crate::core::error::MatchError;
pub use crate::core::identifiers::{SpeciesIdentifier, SpeciesIdentifiers};
pub use crate::core::table::FeatureTable;
pub use crate::core::types::*;
pub use crate::matching::filter::{DirectInteraction, IndirectInteraction, IndirectQuery};
pub use crate::matching::resolver::MatchOptions;
pub use crate::model::store::PathwayModel;
pub use crate::network::distances::{DistanceCache, PrecomputeConfig};
pub use crate::network::graph::{GraphConfig, InteractionGraph, WeightScheme};
