use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::error::MatchError;
use crate::core::types::CompartmentalizedSpeciesId;
use crate::network::graph::{InteractionGraph, WeightScheme};

#[derive(Error, Debug)]
pub enum CacheIoError {
    #[error("Failed to access distance cache: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode distance cache: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Shortest-path summary for one (source, target, scheme) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    /// Fewest edges on any path from source to target
    pub hops: usize,

    /// Minimum cumulative weight over all paths from source to target
    pub weight: f64,

    /// Nodes of one minimum-weight path, source and target included. It can
    /// be longer than `hops` when the lightest path is not the shortest.
    #[serde(default)]
    pub path: Option<Vec<CompartmentalizedSpeciesId>>,
}

/// Flat relation view of one cache entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRow {
    pub source: CompartmentalizedSpeciesId,
    pub target: CompartmentalizedSpeciesId,
    pub scheme: WeightScheme,
    pub hops: usize,
    pub weight: f64,
}

/// Shortest paths from one source to every reachable node (source excluded).
///
/// Hop count and weight are independent minima: `hops` comes from a
/// unit-cost search and `weight` from a search over the scheme's edge
/// weights. This is the single routine behind both precomputed caches and
/// on-demand lookups, so the two always agree.
#[must_use]
pub fn single_source_distances(
    graph: &InteractionGraph,
    source: NodeIndex,
    scheme: WeightScheme,
    store_paths: bool,
) -> HashMap<NodeIndex, DistanceEntry> {
    let hops = dijkstra(graph.inner(), source, None, |_| 1usize);
    let weights = dijkstra(graph.inner(), source, None, |e| e.weight().weight(scheme));

    weights
        .iter()
        .filter(|(node, _)| **node != source)
        .filter_map(|(&node, &weight)| {
            let hop_count = *hops.get(&node)?;
            let path = if store_paths {
                Some(witness_path(graph, &weights, source, node, scheme))
            } else {
                None
            };
            Some((
                node,
                DistanceEntry {
                    hops: hop_count,
                    weight,
                    path,
                },
            ))
        })
        .collect()
}

/// Walk back from `target` choosing, at each step, the lowest-index
/// predecessor whose cost plus the connecting edge equals the current cost.
fn witness_path(
    graph: &InteractionGraph,
    costs: &HashMap<NodeIndex, f64>,
    source: NodeIndex,
    target: NodeIndex,
    scheme: WeightScheme,
) -> Vec<CompartmentalizedSpeciesId> {
    let mut reversed = vec![target];
    let mut current = target;

    // Edge weights are positive, so every step strictly lowers the cost
    while current != source && reversed.len() <= graph.node_count() {
        let Some(&current_cost) = costs.get(&current) else {
            break;
        };
        let predecessor = graph
            .inner()
            .edges_directed(current, Direction::Incoming)
            .filter(|e| {
                costs
                    .get(&e.source())
                    .is_some_and(|&c| c + e.weight().weight(scheme) == current_cost)
            })
            .map(|e| e.source())
            .min();

        match predecessor {
            Some(prev) => {
                reversed.push(prev);
                current = prev;
            }
            None => break,
        }
    }

    reversed
        .into_iter()
        .rev()
        .map(|n| graph.node(n).sc_id.clone())
        .collect()
}

/// Options for building a [`DistanceCache`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecomputeConfig {
    /// Weight schemes to compute distances under
    pub weight_schemes: Vec<WeightScheme>,

    /// Drop entries whose path needs more hops than this
    pub max_steps: Option<usize>,

    /// Keep a witness path per entry
    pub store_paths: bool,
}

impl Default for PrecomputeConfig {
    fn default() -> Self {
        Self {
            weight_schemes: vec![WeightScheme::Weights],
            max_steps: None,
            store_paths: false,
        }
    }
}

/// Entries of one source, keyed by target and then scheme
type TargetEntries =
    BTreeMap<CompartmentalizedSpeciesId, BTreeMap<WeightScheme, DistanceEntry>>;

/// All-pairs shortest-path table of an [`InteractionGraph`].
///
/// Immutable once built and only valid for the graph whose signature it
/// carries. Filters check this before trusting any entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceCache {
    graph_signature: String,
    weight_schemes: Vec<WeightScheme>,
    max_steps: Option<usize>,
    created_at: String,
    entries: BTreeMap<CompartmentalizedSpeciesId, TargetEntries>,
    entry_count: usize,
}

/// Precompute distances under the given weight schemes
///
/// # Errors
///
/// Returns `MatchError::NoWeightSchemes` if `weight_vars` is empty.
pub fn precompute_distances(
    graph: &InteractionGraph,
    weight_vars: &[WeightScheme],
) -> Result<DistanceCache, MatchError> {
    precompute_distances_with(
        graph,
        &PrecomputeConfig {
            weight_schemes: weight_vars.to_vec(),
            ..PrecomputeConfig::default()
        },
    )
}

/// Precompute distances with full control over pruning and witness paths
///
/// # Errors
///
/// Returns `MatchError::NoWeightSchemes` if no weight scheme is configured.
pub fn precompute_distances_with(
    graph: &InteractionGraph,
    config: &PrecomputeConfig,
) -> Result<DistanceCache, MatchError> {
    let schemes: Vec<WeightScheme> = config
        .weight_schemes
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if schemes.is_empty() {
        return Err(MatchError::NoWeightSchemes);
    }

    let mut entries: BTreeMap<CompartmentalizedSpeciesId, TargetEntries> = BTreeMap::new();
    let mut entry_count = 0usize;
    for source in graph.inner().node_indices() {
        let source_id = &graph.node(source).sc_id;
        let targets = entries.entry(source_id.clone()).or_default();
        for &scheme in &schemes {
            let reachable = single_source_distances(graph, source, scheme, config.store_paths);
            for (target, entry) in reachable {
                if config.max_steps.is_some_and(|max| entry.hops > max) {
                    continue;
                }
                targets
                    .entry(graph.node(target).sc_id.clone())
                    .or_default()
                    .insert(scheme, entry);
                entry_count += 1;
            }
        }
        if targets.is_empty() {
            entries.remove(source_id);
        }
        debug!(source = %source_id, "Computed single-source distances");
    }

    info!(
        entries = entry_count,
        nodes = graph.node_count(),
        schemes = schemes.len(),
        "Precomputed distances"
    );

    Ok(DistanceCache {
        graph_signature: graph.signature().to_string(),
        weight_schemes: schemes,
        max_steps: config.max_steps,
        created_at: chrono::Utc::now().to_rfc3339(),
        entries,
        entry_count,
    })
}

impl DistanceCache {
    /// Look up the entry for an ordered pair under one scheme
    #[must_use]
    pub fn get(
        &self,
        source: &CompartmentalizedSpeciesId,
        target: &CompartmentalizedSpeciesId,
        scheme: WeightScheme,
    ) -> Option<&DistanceEntry> {
        self.entries.get(source)?.get(target)?.get(&scheme)
    }

    /// All entries as flat rows, sorted by (source, target, scheme)
    pub fn entries(&self) -> impl Iterator<Item = DistanceRow> + '_ {
        self.entries.iter().flat_map(|(source, targets)| {
            targets.iter().flat_map(move |(target, schemes)| {
                schemes.iter().map(move |(scheme, entry)| DistanceRow {
                    source: source.clone(),
                    target: target.clone(),
                    scheme: *scheme,
                    hops: entry.hops,
                    weight: entry.weight,
                })
            })
        })
    }

    /// Signature of the graph this cache was computed from
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.graph_signature
    }

    #[must_use]
    pub fn weight_schemes(&self) -> &[WeightScheme] {
        &self.weight_schemes
    }

    #[must_use]
    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entry_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Check that this cache can answer queries on `graph` under `scheme`
    /// for paths of up to `max_path_length` hops
    ///
    /// # Errors
    ///
    /// Returns `MatchError::CacheMismatch` if the graph signature differs, the
    /// scheme was not precomputed, or entries were pruned below the bound.
    pub fn validate_for(
        &self,
        graph: &InteractionGraph,
        scheme: WeightScheme,
        max_path_length: usize,
    ) -> Result<(), MatchError> {
        if self.graph_signature != graph.signature() {
            return Err(MatchError::CacheMismatch(format!(
                "cache was built for graph {}, current graph is {}",
                self.graph_signature,
                graph.signature()
            )));
        }
        if !self.weight_schemes.contains(&scheme) {
            return Err(MatchError::CacheMismatch(format!(
                "weight scheme '{scheme}' was not precomputed"
            )));
        }
        if let Some(max_steps) = self.max_steps {
            if max_steps < max_path_length {
                return Err(MatchError::CacheMismatch(format!(
                    "cache holds paths of at most {max_steps} steps, {max_path_length} requested"
                )));
            }
        }
        Ok(())
    }

    /// Write the cache to a bincode file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save(&self, path: &Path) -> Result<(), CacheIoError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a cache previously written with [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, CacheIoError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}
