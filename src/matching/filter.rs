use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::core::edgelist::EdgeList;
use crate::core::error::MatchError;
use crate::core::identifiers::SpeciesIdentifiers;
use crate::core::types::{CompartmentalizedSpeciesId, OntologySet, ReactionId};
use crate::matching::resolver::{
    resolve_edgelist_to_compartments_with, CompartmentalizedEdge, MatchOptions,
};
use crate::model::store::PathwayModel;
use crate::network::distances::{single_source_distances, DistanceCache, DistanceEntry};
use crate::network::graph::{EdgeDirection, InteractionGraph, WeightScheme};

/// Default hop bound for indirect interactions
pub const DEFAULT_MAX_PATH_LENGTH: usize = 10;

/// An input edge whose compartmentalized endpoints share a reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectInteraction {
    #[serde(flatten)]
    pub edge: CompartmentalizedEdge,

    /// Reaction of the connecting graph edge
    pub r_id: ReactionId,

    /// Whether the connecting edge runs upstream -> downstream or the reverse
    pub direction: EdgeDirection,

    pub stoichiometry_upstream: Option<f64>,
    pub stoichiometry_downstream: Option<f64>,
}

/// An input edge whose endpoints are connected only through a longer path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectInteraction {
    #[serde(flatten)]
    pub edge: CompartmentalizedEdge,

    /// Fewest hops on any path from upstream to downstream
    pub path_length: usize,

    /// Minimum cumulative weight, possibly over a longer path
    pub weight: f64,
}

/// Keep input edges that map to directly interacting species.
///
/// Builds the interaction graph with default settings; use
/// [`filter_direct_with`] to reuse a prebuilt graph.
///
/// # Errors
///
/// Returns `MatchError` for invalid ontologies or a model that cannot be
/// turned into a graph.
pub fn filter_direct(
    edgelist: &EdgeList,
    model: &PathwayModel,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
) -> Result<Vec<DirectInteraction>, MatchError> {
    let graph = InteractionGraph::from_model(model)?;
    filter_direct_with(
        edgelist,
        model,
        species_identifiers,
        ontologies,
        &graph,
        &MatchOptions::default(),
    )
}

/// Keep expanded edges whose endpoints are adjacent in `graph`, in either
/// direction.
///
/// When several graph edges connect a pair, the one with the lowest `weights`
/// value is reported, then the lowest reaction id, then forward before
/// backward.
///
/// # Errors
///
/// Returns `MatchError` for invalid ontologies, or `MatchError::NoMatches` in
/// strict mode when nothing resolves.
pub fn filter_direct_with(
    edgelist: &EdgeList,
    model: &PathwayModel,
    species_identifiers: &SpeciesIdentifiers,
    ontologies: &OntologySet,
    graph: &InteractionGraph,
    options: &MatchOptions,
) -> Result<Vec<DirectInteraction>, MatchError> {
    let expanded = resolve_edgelist_to_compartments_with(
        edgelist,
        model,
        species_identifiers,
        ontologies,
        options,
    )?;
    let candidates = expanded.len();

    let mut direct = Vec::new();
    for edge in expanded {
        let connecting = graph.direct_edges(&edge.sc_id_upstream, &edge.sc_id_downstream);
        let Some(best) = connecting.into_iter().min_by(|a, b| {
            a.edge
                .weights
                .total_cmp(&b.edge.weights)
                .then_with(|| a.edge.r_id.cmp(&b.edge.r_id))
                .then(a.direction.cmp(&b.direction))
        }) else {
            continue;
        };

        let reaction = model.get_reaction(&best.edge.r_id);
        let stoichiometry = |sc_id: &CompartmentalizedSpeciesId| {
            reaction
                .and_then(|r| r.participant(sc_id))
                .map(|p| p.stoichiometry)
        };

        direct.push(DirectInteraction {
            r_id: best.edge.r_id.clone(),
            direction: best.direction,
            stoichiometry_upstream: stoichiometry(&edge.sc_id_upstream),
            stoichiometry_downstream: stoichiometry(&edge.sc_id_downstream),
            edge,
        });
    }

    info!(
        candidates,
        direct = direct.len(),
        "Filtered to direct interactions"
    );
    Ok(direct)
}

/// Keep input edges that map to species connected by a path of at most
/// `max_path_length` hops but not by a single edge.
///
/// Distances come from `precomputed_distances` when supplied, and otherwise
/// are computed per call. Both give identical results.
///
/// # Errors
///
/// Returns `MatchError::InvalidPathLength` if `max_path_length` is zero,
/// `MatchError::CacheMismatch` if the cache was built for another graph or
/// cannot cover the bound, and resolver errors for invalid ontologies.
pub fn filter_indirect(
    edgelist: &EdgeList,
    model: &PathwayModel,
    species_identifiers: &SpeciesIdentifiers,
    graph: &InteractionGraph,
    ontologies: &OntologySet,
    precomputed_distances: Option<&DistanceCache>,
    max_path_length: usize,
) -> Result<Vec<IndirectInteraction>, MatchError> {
    let mut query = IndirectQuery::new(graph).max_path_length(max_path_length);
    if let Some(cache) = precomputed_distances {
        query = query.with_distances(cache);
    }
    query.run(edgelist, model, species_identifiers, ontologies)
}

/// Builder for indirect-interaction filtering
#[derive(Debug, Clone)]
pub struct IndirectQuery<'a> {
    graph: &'a InteractionGraph,
    precomputed: Option<&'a DistanceCache>,
    max_path_length: usize,
    scheme: WeightScheme,
    options: MatchOptions,
}

impl<'a> IndirectQuery<'a> {
    #[must_use]
    pub fn new(graph: &'a InteractionGraph) -> Self {
        Self {
            graph,
            precomputed: None,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            scheme: WeightScheme::default(),
            options: MatchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_distances(mut self, cache: &'a DistanceCache) -> Self {
        self.precomputed = Some(cache);
        self
    }

    #[must_use]
    pub fn max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    #[must_use]
    pub fn weight_scheme(mut self, scheme: WeightScheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the query over an edge list
    ///
    /// # Errors
    ///
    /// See [`filter_indirect`].
    pub fn run(
        &self,
        edgelist: &EdgeList,
        model: &PathwayModel,
        species_identifiers: &SpeciesIdentifiers,
        ontologies: &OntologySet,
    ) -> Result<Vec<IndirectInteraction>, MatchError> {
        if self.max_path_length == 0 {
            return Err(MatchError::InvalidPathLength(self.max_path_length));
        }
        if let Some(cache) = self.precomputed {
            cache.validate_for(self.graph, self.scheme, self.max_path_length)?;
        }

        let expanded = resolve_edgelist_to_compartments_with(
            edgelist,
            model,
            species_identifiers,
            ontologies,
            &self.options,
        )?;
        let candidates = expanded.len();

        let mut on_demand: HashMap<NodeIndex, HashMap<NodeIndex, DistanceEntry>> =
            HashMap::new();
        let mut indirect = Vec::new();
        let mut skipped_direct = 0usize;

        for edge in expanded {
            if self
                .graph
                .are_adjacent(&edge.sc_id_upstream, &edge.sc_id_downstream)
            {
                skipped_direct += 1;
                continue;
            }

            let distance = match self.precomputed {
                Some(cache) => cache
                    .get(&edge.sc_id_upstream, &edge.sc_id_downstream, self.scheme)
                    .map(|e| (e.hops, e.weight)),
                None => self.lookup_on_demand(&mut on_demand, &edge),
            };

            let Some((hops, weight)) = distance else {
                continue;
            };
            if hops <= self.max_path_length {
                indirect.push(IndirectInteraction {
                    edge,
                    path_length: hops,
                    weight,
                });
            }
        }

        debug!(
            sources = on_demand.len(),
            precomputed = self.precomputed.is_some(),
            "Resolved path distances"
        );
        info!(
            candidates,
            skipped_direct,
            indirect = indirect.len(),
            max_path_length = self.max_path_length,
            scheme = %self.scheme,
            "Filtered to indirect interactions"
        );
        Ok(indirect)
    }

    fn lookup_on_demand(
        &self,
        memo: &mut HashMap<NodeIndex, HashMap<NodeIndex, DistanceEntry>>,
        edge: &CompartmentalizedEdge,
    ) -> Option<(usize, f64)> {
        let source = self.graph.node_index(&edge.sc_id_upstream)?;
        let target = self.graph.node_index(&edge.sc_id_downstream)?;

        let reachable = memo
            .entry(source)
            .or_insert_with(|| single_source_distances(self.graph, source, self.scheme, false));
        reachable.get(&target).map(|e| (e.hops, e.weight))
    }
}
