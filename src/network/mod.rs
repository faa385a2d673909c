//! Interaction graph and shortest-path distances.
//!
//! The graph turns a pathway model's reactions into weighted, directed edges
//! between compartmentalized species. Distances over it can be computed once
//! for all pairs and reused across filter calls, or on demand per call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pathway_matcher::network::distances::precompute_distances;
//! use pathway_matcher::network::graph::{InteractionGraph, WeightScheme};
//! use pathway_matcher::PathwayModel;
//!
//! let model = PathwayModel::load_embedded().unwrap();
//! let graph = InteractionGraph::from_model(&model).unwrap();
//! let cache = precompute_distances(&graph, &[WeightScheme::Weights]).unwrap();
//! println!("{} reachable pairs", cache.len());
//! ```

pub mod distances;
pub mod graph;
