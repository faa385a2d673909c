//! Identifier resolution and mechanistic filtering.
//!
//! This module provides the matching pipeline:
//!
//! - [`resolver`]: Joins external identifiers onto model species and expands
//!   edges to compartmentalized species pairs
//! - [`filter`]: Splits expanded pairs into direct interactions (one shared
//!   reaction) and indirect interactions (a bounded multi-step path)
//!
//! ## Resolution
//!
//! Identifiers are matched by exact string equality inside the requested
//! ontologies. One identifier can map to several species and every mapping is
//! kept, so an edge whose endpoints map to `m` and `n` species expands to
//! `m * n` rows before compartment expansion. The value `-1` marks a missing
//! identifier and never matches.
//!
//! ## Filtering
//!
//! A pair is direct when a single graph edge connects it in either direction.
//! Every other pair is a candidate for the indirect filter, which keeps it when
//! some path from upstream to downstream needs at most `max_path_length`
//! steps, and reports the minimum path weight alongside. The two outputs never
//! share a pair.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pathway_matcher::matching::filter::IndirectQuery;
//! use pathway_matcher::network::distances::precompute_distances;
//! use pathway_matcher::{EdgeList, EntityType, InteractionGraph, OntologySet, PathwayModel, WeightScheme};
//!
//! let model = PathwayModel::load_embedded().unwrap();
//! let identifiers = model.get_identifiers(EntityType::Species);
//! let graph = InteractionGraph::from_model(&model).unwrap();
//! let cache = precompute_distances(&graph, &[WeightScheme::Weights]).unwrap();
//!
//! let edges = EdgeList::from_pairs([("17925", "32966")]);
//! let indirect = IndirectQuery::new(&graph)
//!     .with_distances(&cache)
//!     .max_path_length(5)
//!     .run(&edges, &model, &identifiers, &OntologySet::new(["chebi"]))
//!     .unwrap();
//! ```

pub mod filter;
pub mod resolver;
