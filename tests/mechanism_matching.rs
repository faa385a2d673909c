//! End-to-end matching tests
//!
//! These tests drive the public API the way a caller would: parse an edge
//! list, resolve it against the embedded glycolysis model, and classify the
//! resulting pairs as direct or indirect interactions.

use std::collections::BTreeMap;

use pathway_matcher::matching::filter::{filter_direct, filter_direct_with, filter_indirect};
use pathway_matcher::matching::resolver::{
    resolve_edgelist, resolve_edgelist_to_compartments, resolve_features,
};
use pathway_matcher::network::distances::{precompute_distances, precompute_distances_with};
use pathway_matcher::network::graph::build_graph;
use pathway_matcher::parsing::tsv::parse_table_text;
use pathway_matcher::{
    DistanceCache, EdgeList, EntityType, FeatureTable, GraphConfig, IndirectQuery,
    InteractionGraph, MatchError, MatchOptions, OntologySet, PathwayModel, PrecomputeConfig,
    Qualifier, SpeciesId, SpeciesIdentifier, SpeciesIdentifiers, WeightScheme,
};

const GLYCOLYSIS_EDGES: &str = "identifier_upstream\tidentifier_downstream\tsource
17925\t32966\tscreen_a
57634\t32966\tscreen_a
32966\t57642\tscreen_b
17925\t15361\tscreen_b
";

fn chebi() -> OntologySet {
    OntologySet::new(["chebi"])
}

fn glycolysis_edges() -> EdgeList {
    let table = parse_table_text(GLYCOLYSIS_EDGES, '\t').unwrap();
    EdgeList::from_table(&table).unwrap()
}

fn species_record(s_id: &str, identifier: &str) -> SpeciesIdentifier {
    SpeciesIdentifier {
        s_id: SpeciesId::new(s_id),
        s_name: s_id.to_string(),
        ontology: "chebi".to_string(),
        identifier: identifier.to_string(),
        url: None,
        bqb: Qualifier::Is,
    }
}

/// Identifiers shared by several species fan out to every one of them
#[test]
fn test_feature_fanout_counts() {
    let identifiers: SpeciesIdentifiers = vec![
        species_record("S_oxygen", "15379"),
        species_record("S_oxygen_ligand", "15379"),
        species_record("S_alanine", "17627"),
        species_record("S_alanine_zwitterion", "17627"),
        species_record("S_alanine_residue", "17627"),
        species_record("S_zinc", "29105"),
        species_record("S_zinc_ion", "29105"),
    ]
    .into_iter()
    .collect();
    let features = FeatureTable::from_column("chebis", ["17627", "15379", "29105", "-1"]);

    let matches = resolve_features(&features, &identifiers, &chebi(), "chebis").unwrap();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for m in &matches {
        *counts.entry(m.identifier.clone()).or_default() += 1;
    }
    let identifiers_found: Vec<&str> = counts.keys().map(String::as_str).collect();
    let per_identifier: Vec<usize> = counts.values().copied().collect();

    assert_eq!(identifiers_found, vec!["15379", "17627", "29105"]);
    assert_eq!(per_identifier, vec![2, 3, 2]);
}

/// Edge columns beyond the endpoints ride along through expansion
#[test]
fn test_expansion_keeps_attributes() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let edges = glycolysis_edges();

    let species = resolve_edgelist(&edges, &identifiers, &chebi()).unwrap();
    assert_eq!(species.len(), 4);

    let expanded =
        resolve_edgelist_to_compartments(&edges, &model, &identifiers, &chebi()).unwrap();
    assert_eq!(expanded.len(), 8);
    let screen_b = expanded
        .iter()
        .filter(|e| e.edge.attributes.get("source").map(String::as_str) == Some("screen_b"))
        .count();
    assert_eq!(screen_b, 5);
}

/// Two of the four glycolysis edges are single reactions
#[test]
fn test_direct_glycolysis() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);

    let direct = filter_direct(&glycolysis_edges(), &model, &identifiers, &chebi()).unwrap();

    assert_eq!(direct.len(), 2);
    let reactions: Vec<&str> = direct.iter().map(|d| d.r_id.as_str()).collect();
    assert_eq!(reactions, vec!["R_PFK", "R_ALDO"]);
}

/// Six compartment pairs are connected through longer paths, with identical
/// weights whether or not distances were precomputed
#[test]
fn test_indirect_glycolysis_with_and_without_cache() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let graph = InteractionGraph::from_model(&model).unwrap();
    let edges = glycolysis_edges();

    let on_demand =
        filter_indirect(&edges, &model, &identifiers, &graph, &chebi(), None, 10).unwrap();
    assert_eq!(on_demand.len(), 6);

    let cache = precompute_distances(&graph, &[WeightScheme::Weights]).unwrap();
    let cached =
        filter_indirect(&edges, &model, &identifiers, &graph, &chebi(), Some(&cache), 10)
            .unwrap();

    let weights = |rows: &[pathway_matcher::IndirectInteraction]| -> Vec<f64> {
        rows.iter().map(|r| r.weight).collect()
    };
    assert_eq!(weights(&on_demand), weights(&cached));
    assert_eq!(on_demand, cached);
}

/// A saved cache answers exactly like the one it was saved from
#[test]
fn test_cache_roundtrip_through_file() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let graph = InteractionGraph::from_model(&model).unwrap();
    let cache = precompute_distances_with(
        &graph,
        &PrecomputeConfig {
            weight_schemes: WeightScheme::ALL.to_vec(),
            max_steps: Some(6),
            store_paths: true,
        },
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glycolysis.distances");
    cache.save(&path).unwrap();
    let loaded = DistanceCache::load(&path).unwrap();

    let query = |c: &DistanceCache| {
        IndirectQuery::new(&graph)
            .with_distances(c)
            .max_path_length(6)
            .weight_scheme(WeightScheme::UpstreamWeights)
            .run(&glycolysis_edges(), &model, &identifiers, &chebi())
            .unwrap()
    };
    assert_eq!(query(&cache), query(&loaded));
}

/// A cache built for one graph is refused for another
#[test]
fn test_cache_rejected_for_other_graph() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let directed = InteractionGraph::from_model(&model).unwrap();
    let undirected = build_graph(
        &model,
        &GraphConfig {
            directed: false,
            ..GraphConfig::default()
        },
    )
    .unwrap();

    let cache = precompute_distances(&directed, &[WeightScheme::Weights]).unwrap();
    let err = filter_indirect(
        &glycolysis_edges(),
        &model,
        &identifiers,
        &undirected,
        &chebi(),
        Some(&cache),
        10,
    )
    .unwrap_err();

    assert!(matches!(err, MatchError::CacheMismatch(_)));
    assert!(!err.is_configuration());
}

/// Raising the bound never removes an indirect interaction
#[test]
fn test_indirect_bound_monotonic() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let graph = InteractionGraph::from_model(&model).unwrap();
    let edges = glycolysis_edges();

    let mut previous = 0;
    for bound in 1..=10 {
        let rows =
            filter_indirect(&edges, &model, &identifiers, &graph, &chebi(), None, bound).unwrap();
        assert!(rows.len() >= previous);
        assert!(rows.iter().all(|r| r.path_length <= bound));
        previous = rows.len();
    }
    assert_eq!(previous, 6);
}

/// Mirroring edges makes pairs reachable against reaction direction
#[test]
fn test_undirected_graph_changes_partition() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);
    let undirected = build_graph(
        &model,
        &GraphConfig {
            directed: false,
            ..GraphConfig::default()
        },
    )
    .unwrap();

    // Mitochondrial pyruvate cannot reach glucose along reaction direction
    let edges = EdgeList::from_pairs([("15361", "17925")]);
    let directed = InteractionGraph::from_model(&model).unwrap();
    let forward_only =
        filter_indirect(&edges, &model, &identifiers, &directed, &chebi(), None, 10).unwrap();
    let mirrored =
        filter_indirect(&edges, &model, &identifiers, &undirected, &chebi(), None, 10).unwrap();

    assert!(forward_only.is_empty());
    assert_eq!(mirrored.len(), 4);

    let direct = filter_direct_with(
        &edges,
        &model,
        &identifiers,
        &chebi(),
        &undirected,
        &MatchOptions::default(),
    )
    .unwrap();
    assert!(direct.is_empty());
}

/// Strict mode reports input that matches nothing in the chosen ontology
#[test]
fn test_strict_mode_on_wrong_ontology() {
    let model = PathwayModel::load_embedded().unwrap();
    let identifiers = model.get_identifiers(EntityType::Species);

    // ChEBI identifiers looked up among UniProt accessions
    let uniprot = OntologySet::new(["uniprot"]);
    let lenient = filter_indirect(
        &glycolysis_edges(),
        &model,
        &identifiers,
        &InteractionGraph::from_model(&model).unwrap(),
        &uniprot,
        None,
        10,
    )
    .unwrap();
    assert!(lenient.is_empty());

    let graph = InteractionGraph::from_model(&model).unwrap();
    let strict = IndirectQuery::new(&graph)
        .options(MatchOptions::strict())
        .run(&glycolysis_edges(), &model, &identifiers, &uniprot)
        .unwrap_err();
    assert!(matches!(strict, MatchError::NoMatches { rows: 4, .. }));
}

/// A model exported to disk loads back into an equivalent graph
#[test]
fn test_exported_model_builds_same_graph() {
    let model = PathwayModel::load_embedded().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, model.to_json().unwrap()).unwrap();

    let reloaded = PathwayModel::load_from_file(&path).unwrap();
    let original_graph = InteractionGraph::from_model(&model).unwrap();
    let reloaded_graph = InteractionGraph::from_model(&reloaded).unwrap();

    assert_eq!(original_graph.signature(), reloaded_graph.signature());
}
