use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::error::MatchError;
use crate::core::types::{CompartmentalizedSpeciesId, ReactionId, SpeciesId};
use crate::model::entities::{ParticipantRole, Reaction};
use crate::model::store::PathwayModel;
use crate::utils::validation::compute_signature;

/// Named edge weight carried by every interaction edge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Cost of entering the target node: `1 + ln(k)` where `k` is the number of
    /// reactions the target takes part in. Paths through hubs such as ATP cost more.
    #[default]
    Weights,
    /// Same penalty applied to the source node
    UpstreamWeights,
}

impl WeightScheme {
    pub const ALL: [Self; 2] = [Self::Weights, Self::UpstreamWeights];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Weights => "weights",
            Self::UpstreamWeights => "upstream_weights",
        }
    }

    /// Parse a scheme from its column name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weights" => Some(Self::Weights),
            "upstream_weights" => Some(Self::UpstreamWeights),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How edge weights are derived from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingStrategy {
    /// Penalize edges touching species that take part in many reactions
    #[default]
    Topology,
    /// Every edge costs 1 under every scheme
    Unweighted,
}

/// Configuration for graph construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Keep edge direction (substrate -> product). When false every edge is
    /// mirrored.
    pub directed: bool,

    /// Add edges from catalysts, inhibitors and other modifiers to products
    pub include_modifiers: bool,

    pub weighting: WeightingStrategy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            directed: true,
            include_modifiers: true,
            weighting: WeightingStrategy::Topology,
        }
    }
}

/// A graph node: one compartmentalized species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesNode {
    pub sc_id: CompartmentalizedSpeciesId,
    pub s_id: SpeciesId,
    pub name: String,
}

/// Which reaction relationship produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Substrate to product
    Conversion,
    /// Product to substrate of a reversible reaction
    ReverseConversion,
    /// Modifier to product
    Regulation,
    /// Mirror of another edge in an undirected graph
    Mirror,
}

/// A reaction-derived connection between two compartmentalized species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    pub r_id: ReactionId,
    pub kind: EdgeKind,
    pub weights: f64,
    pub upstream_weights: f64,
}

impl InteractionEdge {
    #[must_use]
    pub fn weight(&self, scheme: WeightScheme) -> f64 {
        match scheme {
            WeightScheme::Weights => self.weights,
            WeightScheme::UpstreamWeights => self.upstream_weights,
        }
    }
}

/// Direction of a stored edge relative to a queried (upstream, downstream) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    /// Stored as upstream -> downstream
    Forward,
    /// Stored as downstream -> upstream
    Backward,
}

impl std::fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => f.pad("forward"),
            Self::Backward => f.pad("backward"),
        }
    }
}

/// An edge directly connecting a queried pair
#[derive(Debug, Clone, PartialEq)]
pub struct DirectEdge<'a> {
    pub edge: &'a InteractionEdge,
    pub direction: EdgeDirection,
}

/// The weighted interaction graph of a pathway model.
///
/// Immutable once built. Its [`signature`](Self::signature) identifies the
/// exact node set, edge set and weights, and is what distance caches are
/// checked against.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    graph: Graph<SpeciesNode, InteractionEdge>,
    node_lookup: HashMap<CompartmentalizedSpeciesId, NodeIndex>,
    config: GraphConfig,
    signature: String,
}

impl InteractionGraph {
    /// Build with the default configuration
    ///
    /// # Errors
    ///
    /// See [`build_graph`].
    pub fn from_model(model: &PathwayModel) -> Result<Self, MatchError> {
        build_graph(model, &GraphConfig::default())
    }

    /// The underlying petgraph graph
    #[must_use]
    pub fn inner(&self) -> &Graph<SpeciesNode, InteractionEdge> {
        &self.graph
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    #[must_use]
    pub fn node_index(&self, sc_id: &CompartmentalizedSpeciesId) -> Option<NodeIndex> {
        self.node_lookup.get(sc_id).copied()
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &SpeciesNode {
        &self.graph[index]
    }

    #[must_use]
    pub fn contains(&self, sc_id: &CompartmentalizedSpeciesId) -> bool {
        self.node_lookup.contains_key(sc_id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges connecting `upstream` and `downstream` in either stored
    /// direction, forward edges first
    #[must_use]
    pub fn direct_edges(
        &self,
        upstream: &CompartmentalizedSpeciesId,
        downstream: &CompartmentalizedSpeciesId,
    ) -> Vec<DirectEdge<'_>> {
        let (Some(a), Some(b)) = (self.node_index(upstream), self.node_index(downstream)) else {
            return Vec::new();
        };

        let forward = self.graph.edges_connecting(a, b).map(|e| DirectEdge {
            edge: e.weight(),
            direction: EdgeDirection::Forward,
        });
        let backward = self.graph.edges_connecting(b, a).map(|e| DirectEdge {
            edge: e.weight(),
            direction: EdgeDirection::Backward,
        });

        forward.chain(backward).collect()
    }

    /// Whether a single edge connects the pair in either direction
    #[must_use]
    pub fn are_adjacent(
        &self,
        upstream: &CompartmentalizedSpeciesId,
        downstream: &CompartmentalizedSpeciesId,
    ) -> bool {
        match (self.node_index(upstream), self.node_index(downstream)) {
            (Some(a), Some(b)) => {
                self.graph.find_edge(a, b).is_some() || self.graph.find_edge(b, a).is_some()
            }
            _ => false,
        }
    }

    fn edge_signature_line(&self, edge: EdgeIndex) -> Option<String> {
        let (from, to) = self.graph.edge_endpoints(edge)?;
        let weight = &self.graph[edge];
        Some(format!(
            "e\t{}\t{}\t{}\t{:016x}\t{:016x}",
            self.graph[from].sc_id,
            self.graph[to].sc_id,
            weight.r_id,
            weight.weights.to_bits(),
            weight.upstream_weights.to_bits()
        ))
    }

    fn compute_signature(&self) -> String {
        let header = format!(
            "g\t{}\t{}\t{:?}",
            self.config.directed, self.config.include_modifiers, self.config.weighting
        );
        let nodes = self
            .graph
            .node_indices()
            .map(|n| format!("n\t{}", self.graph[n].sc_id));
        let edges = self
            .graph
            .edge_indices()
            .filter_map(|e| self.edge_signature_line(e));

        compute_signature(std::iter::once(header).chain(nodes).chain(edges))
    }
}

/// Build the interaction graph of a pathway model.
///
/// Nodes are compartmentalized species in sorted `sc_id` order. Reactions are
/// visited in sorted `r_id` order and contribute:
///
/// - substrate -> product edges,
/// - product -> substrate edges when reversible,
/// - modifier -> product edges when `include_modifiers` is set.
///
/// Self-loops are skipped and repeated (source, target, reaction) triples are
/// kept once. With `directed = false` every edge is mirrored.
///
/// # Errors
///
/// Returns `MatchError::InsufficientModel` if the model has no species or no
/// reactions, or if a reaction references a compartmentalized species missing
/// from the model.
pub fn build_graph(
    model: &PathwayModel,
    config: &GraphConfig,
) -> Result<InteractionGraph, MatchError> {
    if model.compartmentalized_species().is_empty() {
        return Err(MatchError::InsufficientModel(
            "model has no species".to_string(),
        ));
    }
    if model.reactions().is_empty() {
        return Err(MatchError::InsufficientModel(
            "model has no reactions".to_string(),
        ));
    }

    let mut graph = Graph::new();
    let mut node_lookup = HashMap::new();

    let mut species: Vec<_> = model.compartmentalized_species().iter().collect();
    species.sort_by(|a, b| a.sc_id.cmp(&b.sc_id));
    for sc in species {
        let idx = graph.add_node(SpeciesNode {
            sc_id: sc.sc_id.clone(),
            s_id: sc.s_id.clone(),
            name: sc.name.clone(),
        });
        node_lookup.insert(sc.sc_id.clone(), idx);
    }

    let mut reactions: Vec<&Reaction> = model.reactions().iter().collect();
    reactions.sort_by(|a, b| a.r_id.cmp(&b.r_id));

    let mut seen: HashSet<(NodeIndex, NodeIndex, &ReactionId)> = HashSet::new();
    for reaction in reactions {
        for (from, to, kind) in reaction_edges(reaction, config) {
            let from_idx = lookup(&node_lookup, from)?;
            let to_idx = lookup(&node_lookup, to)?;

            let mut pending = vec![(from, to, from_idx, to_idx, kind)];
            if !config.directed {
                pending.push((to, from, to_idx, from_idx, EdgeKind::Mirror));
            }

            for (source, target, source_idx, target_idx, kind) in pending {
                if source_idx == target_idx || !seen.insert((source_idx, target_idx, &reaction.r_id)) {
                    continue;
                }
                let (weights, upstream_weights) = edge_weights(model, config, source, target);
                graph.add_edge(
                    source_idx,
                    target_idx,
                    InteractionEdge {
                        r_id: reaction.r_id.clone(),
                        kind,
                        weights,
                        upstream_weights,
                    },
                );
            }
        }
    }

    let mut interaction_graph = InteractionGraph {
        graph,
        node_lookup,
        config: config.clone(),
        signature: String::new(),
    };
    interaction_graph.signature = interaction_graph.compute_signature();

    debug!(
        nodes = interaction_graph.node_count(),
        edges = interaction_graph.edge_count(),
        directed = config.directed,
        "Built interaction graph"
    );

    Ok(interaction_graph)
}

fn lookup(
    node_lookup: &HashMap<CompartmentalizedSpeciesId, NodeIndex>,
    sc_id: &CompartmentalizedSpeciesId,
) -> Result<NodeIndex, MatchError> {
    node_lookup
        .get(sc_id)
        .copied()
        .ok_or_else(|| {
            MatchError::InsufficientModel(format!(
                "reaction references unknown compartmentalized species '{sc_id}'"
            ))
        })
}

fn reaction_edges<'a>(
    reaction: &'a Reaction,
    config: &GraphConfig,
) -> Vec<(
    &'a CompartmentalizedSpeciesId,
    &'a CompartmentalizedSpeciesId,
    EdgeKind,
)> {
    let substrates: Vec<_> = reaction.with_role(ParticipantRole::Reactant).collect();
    let products: Vec<_> = reaction.with_role(ParticipantRole::Product).collect();

    let mut edges = Vec::new();
    for s in &substrates {
        for p in &products {
            edges.push((&s.sc_id, &p.sc_id, EdgeKind::Conversion));
        }
    }
    if reaction.reversible {
        for p in &products {
            for s in &substrates {
                edges.push((&p.sc_id, &s.sc_id, EdgeKind::ReverseConversion));
            }
        }
    }
    if config.include_modifiers {
        for m in reaction.modifiers() {
            for p in &products {
                edges.push((&m.sc_id, &p.sc_id, EdgeKind::Regulation));
            }
        }
    }
    edges
}

fn edge_weights(
    model: &PathwayModel,
    config: &GraphConfig,
    source: &CompartmentalizedSpeciesId,
    target: &CompartmentalizedSpeciesId,
) -> (f64, f64) {
    match config.weighting {
        WeightingStrategy::Unweighted => (1.0, 1.0),
        WeightingStrategy::Topology => (
            hub_penalty(model.participation_count(target)),
            hub_penalty(model.participation_count(source)),
        ),
    }
}

#[allow(clippy::cast_precision_loss)] // Reaction counts are small
fn hub_penalty(reaction_count: usize) -> f64 {
    1.0 + (reaction_count.max(1) as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entities::{CompartmentalizedSpecies, ReactionSpecies, Species};

    fn sc(id: &str) -> CompartmentalizedSpeciesId {
        CompartmentalizedSpeciesId::new(id)
    }

    fn embedded_graph() -> InteractionGraph {
        let model = PathwayModel::load_embedded().unwrap();
        InteractionGraph::from_model(&model).unwrap()
    }

    /// A -> B (R1, irreversible), B <-> C (R2, reversible, catalyzed by E)
    fn small_model() -> PathwayModel {
        let mut model = PathwayModel::new();
        for name in ["A", "B", "C", "E"] {
            model
                .add_species(Species {
                    s_id: SpeciesId::new(format!("S_{name}")),
                    name: name.to_string(),
                    identifiers: Vec::new(),
                })
                .unwrap();
            model
                .add_compartmentalized_species(CompartmentalizedSpecies {
                    sc_id: sc(&format!("SC_{name}")),
                    s_id: SpeciesId::new(format!("S_{name}")),
                    c_id: "C_cytosol".into(),
                    name: name.to_string(),
                })
                .unwrap();
        }
        model
            .add_reaction(
                Reaction::new("R1", "a to b")
                    .with_participant(ReactionSpecies::new("SC_A", -1.0, ParticipantRole::Reactant))
                    .with_participant(ReactionSpecies::new("SC_B", 1.0, ParticipantRole::Product)),
            )
            .unwrap();
        model
            .add_reaction(
                Reaction::new("R2", "b to c")
                    .reversible(true)
                    .with_participant(ReactionSpecies::new("SC_B", -1.0, ParticipantRole::Reactant))
                    .with_participant(ReactionSpecies::new("SC_C", 1.0, ParticipantRole::Product))
                    .with_participant(ReactionSpecies::new("SC_E", 0.0, ParticipantRole::Catalyst)),
            )
            .unwrap();
        model
    }

    #[test]
    fn test_small_model_edges() {
        let graph = InteractionGraph::from_model(&small_model()).unwrap();
        assert_eq!(graph.node_count(), 4);
        // A->B, B->C, C->B, E->C
        assert_eq!(graph.edge_count(), 4);

        assert!(graph.are_adjacent(&sc("SC_A"), &sc("SC_B")));
        assert!(graph.are_adjacent(&sc("SC_B"), &sc("SC_A")));
        assert!(!graph.are_adjacent(&sc("SC_A"), &sc("SC_C")));

        let edges = graph.direct_edges(&sc("SC_B"), &sc("SC_C"));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].direction, EdgeDirection::Forward);
        assert_eq!(edges[0].edge.kind, EdgeKind::Conversion);
        assert_eq!(edges[1].direction, EdgeDirection::Backward);
        assert_eq!(edges[1].edge.kind, EdgeKind::ReverseConversion);
    }

    #[test]
    fn test_without_modifiers() {
        let config = GraphConfig {
            include_modifiers: false,
            ..GraphConfig::default()
        };
        let graph = build_graph(&small_model(), &config).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.are_adjacent(&sc("SC_E"), &sc("SC_C")));
    }

    #[test]
    fn test_undirected_mirrors_edges() {
        let config = GraphConfig {
            directed: false,
            ..GraphConfig::default()
        };
        let graph = build_graph(&small_model(), &config).unwrap();
        // A<->B, B<->C (reverse already present), E<->C
        assert_eq!(graph.edge_count(), 6);
        let a = graph.node_index(&sc("SC_A")).unwrap();
        let b = graph.node_index(&sc("SC_B")).unwrap();
        assert!(graph.inner().find_edge(b, a).is_some());
    }

    #[test]
    fn test_topology_weights() {
        let graph = embedded_graph();
        let edges = graph.direct_edges(&sc("SC_GLC_c"), &sc("SC_ATP_c"));
        assert!(edges.is_empty());

        // ATP takes part in four reactions, F6P in two
        let hk_to_adp = graph.direct_edges(&sc("SC_GLC_c"), &sc("SC_ADP_c"));
        assert_eq!(hk_to_adp.len(), 1);
        let edge = hk_to_adp[0].edge;
        assert_eq!(edge.r_id, ReactionId::new("R_HK"));
        assert!((edge.weights - (1.0 + 4f64.ln())).abs() < 1e-12);
        assert!((edge.upstream_weights - (1.0 + 2f64.ln())).abs() < 1e-12);
        assert!((edge.weight(WeightScheme::UpstreamWeights) - edge.upstream_weights).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unweighted() {
        let model = PathwayModel::load_embedded().unwrap();
        let config = GraphConfig {
            weighting: WeightingStrategy::Unweighted,
            ..GraphConfig::default()
        };
        let graph = build_graph(&model, &config).unwrap();
        assert!(graph
            .inner()
            .edge_weights()
            .all(|e| e.weights == 1.0 && e.upstream_weights == 1.0));
    }

    #[test]
    fn test_deterministic_signature() {
        let a = embedded_graph();
        let b = embedded_graph();
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature().len(), 32);

        let model = PathwayModel::load_embedded().unwrap();
        let undirected = build_graph(
            &model,
            &GraphConfig {
                directed: false,
                ..GraphConfig::default()
            },
        )
        .unwrap();
        assert_ne!(a.signature(), undirected.signature());
    }

    #[test]
    fn test_node_order_sorted() {
        let graph = embedded_graph();
        let ids: Vec<_> = graph
            .inner()
            .node_indices()
            .map(|n| graph.node(n).sc_id.clone())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_empty_model_rejected() {
        let model = PathwayModel::new();
        assert!(matches!(
            InteractionGraph::from_model(&model),
            Err(MatchError::InsufficientModel(_))
        ));
    }

    #[test]
    fn test_model_without_reactions_rejected() {
        let mut model = small_model();
        // Rebuild with species only
        let mut species_only = PathwayModel::new();
        for s in model.species() {
            species_only.add_species(s.clone()).unwrap();
        }
        for sc in model.compartmentalized_species() {
            species_only.add_compartmentalized_species(sc.clone()).unwrap();
        }
        model = species_only;

        let err = InteractionGraph::from_model(&model).unwrap_err();
        assert_eq!(
            err,
            MatchError::InsufficientModel("model has no reactions".to_string())
        );
    }

    #[test]
    fn test_weight_scheme_parse() {
        assert_eq!(WeightScheme::parse("weights"), Some(WeightScheme::Weights));
        assert_eq!(
            WeightScheme::parse("Upstream_Weights"),
            Some(WeightScheme::UpstreamWeights)
        );
        assert_eq!(WeightScheme::parse("unknown"), None);
        assert_eq!(WeightScheme::UpstreamWeights.to_string(), "upstream_weights");
    }
}
