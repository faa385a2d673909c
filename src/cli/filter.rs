use std::path::PathBuf;

use clap::Args;

use crate::cli::{
    format_number, read_table, GraphArgs, MatchingArgs, ModelSource, OutputFormat, SchemeArg,
};
use crate::core::edgelist::{EdgeList, DOWNSTREAM_COLUMN, UPSTREAM_COLUMN};
use crate::core::identifiers::SpeciesIdentifiers;
use crate::core::types::EntityType;
use crate::matching::filter::{
    filter_direct_with, DirectInteraction, IndirectInteraction, IndirectQuery,
    DEFAULT_MAX_PATH_LENGTH,
};
use crate::matching::resolver::{resolve_edgelist_to_compartments_with, CompartmentalizedEdge};
use crate::model::store::PathwayModel;
use crate::network::distances::DistanceCache;
use crate::network::graph::build_graph;

/// Edge list input shared by the filtering commands
#[derive(Args, Debug, Clone)]
pub struct EdgeListArgs {
    /// Edge list (TSV, or CSV by extension). Use '-' for TSV on stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Column holding upstream identifiers
    #[arg(long, default_value = UPSTREAM_COLUMN)]
    pub upstream_column: String,

    /// Column holding downstream identifiers
    #[arg(long, default_value = DOWNSTREAM_COLUMN)]
    pub downstream_column: String,
}

impl EdgeListArgs {
    fn load(&self, verbose: bool) -> anyhow::Result<EdgeList> {
        let table = read_table(&self.input)?;
        let edgelist = EdgeList::from_table_with_columns(
            &table,
            &self.upstream_column,
            &self.downstream_column,
        )?;
        if verbose {
            eprintln!("Read {} edges from {}", edgelist.len(), self.input.display());
        }
        Ok(edgelist)
    }
}

#[derive(Args)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub edges: EdgeListArgs,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub source: ModelSource,
}

#[derive(Args)]
pub struct DirectArgs {
    #[command(flatten)]
    pub edges: EdgeListArgs,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub source: ModelSource,
}

#[derive(Args)]
pub struct IndirectArgs {
    #[command(flatten)]
    pub edges: EdgeListArgs,

    /// Maximum number of steps on a connecting path
    #[arg(long, default_value_t = DEFAULT_MAX_PATH_LENGTH)]
    pub max_path_length: usize,

    /// Edge weight to minimize
    #[arg(long, value_enum, default_value = "weights")]
    pub weight_scheme: SchemeArg,

    /// Distance cache written by `precompute` for the same model and graph options
    #[arg(long)]
    pub distances: Option<PathBuf>,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub source: ModelSource,
}

fn species_identifiers(model: &PathwayModel, matching: &MatchingArgs) -> SpeciesIdentifiers {
    let identifiers = model.get_identifiers(EntityType::Species);
    match matching.qualifiers() {
        Some(qualifiers) => identifiers.with_qualifiers(&qualifiers),
        None => identifiers,
    }
}

/// Execute expand subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded or matching arguments are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_expand(args: ExpandArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = args.source.load(verbose)?;
    let edgelist = args.edges.load(verbose)?;
    let identifiers = species_identifiers(&model, &args.matching);

    let expanded = resolve_edgelist_to_compartments_with(
        &edgelist,
        &model,
        &identifiers,
        &args.matching.ontology_set(),
        &args.matching.options(),
    )?;

    if expanded.is_empty() {
        eprintln!("No edges could be resolved.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => {
            print_edge_header("");
            for edge in &expanded {
                println!("{}", edge_text(edge));
            }
            println!("\n{} species pairs from {} edges", expanded.len(), edgelist.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&expanded)?),
        OutputFormat::Tsv => {
            println!("{}", EDGE_TSV_HEADER);
            for edge in &expanded {
                println!("{}", edge_tsv(edge));
            }
        }
    }

    Ok(())
}

/// Execute direct subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, the graph cannot be built, or
/// matching arguments are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_direct(args: DirectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = args.source.load(verbose)?;
    let edgelist = args.edges.load(verbose)?;
    let identifiers = species_identifiers(&model, &args.matching);
    let graph = build_graph(&model, &args.graph.config())?;

    let direct = filter_direct_with(
        &edgelist,
        &model,
        &identifiers,
        &args.matching.ontology_set(),
        &graph,
        &args.matching.options(),
    )?;

    if direct.is_empty() {
        eprintln!("No direct interactions found.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_direct_text(&direct),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&direct)?),
        OutputFormat::Tsv => print_direct_tsv(&direct),
    }

    Ok(())
}

/// Execute indirect subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, the distance cache does not
/// match the graph, or arguments are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_indirect(args: IndirectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = args.source.load(verbose)?;
    let edgelist = args.edges.load(verbose)?;
    let identifiers = species_identifiers(&model, &args.matching);
    let graph = build_graph(&model, &args.graph.config())?;

    let cache = match &args.distances {
        Some(path) => {
            let cache = DistanceCache::load(path)?;
            if verbose {
                eprintln!(
                    "Loaded {} precomputed distances from {}",
                    cache.len(),
                    path.display()
                );
            }
            Some(cache)
        }
        None => None,
    };

    let mut query = IndirectQuery::new(&graph)
        .max_path_length(args.max_path_length)
        .weight_scheme(args.weight_scheme.into())
        .options(args.matching.options());
    if let Some(cache) = &cache {
        query = query.with_distances(cache);
    }

    let indirect = query.run(
        &edgelist,
        &model,
        &identifiers,
        &args.matching.ontology_set(),
    )?;

    if indirect.is_empty() {
        eprintln!("No indirect interactions found.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_indirect_text(&indirect),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&indirect)?),
        OutputFormat::Tsv => print_indirect_tsv(&indirect),
    }

    Ok(())
}

const EDGE_TSV_HEADER: &str = "edge\tidentifier_upstream\tidentifier_downstream\ts_id_upstream\ts_id_downstream\tsc_id_upstream\tsc_id_downstream\tattributes";

fn print_edge_header(extra: &str) {
    println!(
        "{:>5}  {:<12} {:<12} {:<14} {:<14}{extra}",
        "Edge", "Upstream", "Downstream", "SC upstream", "SC downstream"
    );
    println!("{}", "-".repeat(60 + extra.len()));
}

fn edge_text(edge: &CompartmentalizedEdge) -> String {
    format!(
        "{:>5}  {:<12} {:<12} {:<14} {:<14}",
        edge.edge.edge_index + 1,
        edge.edge.identifier_upstream,
        edge.edge.identifier_downstream,
        edge.sc_id_upstream,
        edge.sc_id_downstream
    )
}

fn edge_tsv(edge: &CompartmentalizedEdge) -> String {
    let attributes: Vec<String> = edge
        .edge
        .attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        edge.edge.edge_index,
        edge.edge.identifier_upstream,
        edge.edge.identifier_downstream,
        edge.edge.s_id_upstream,
        edge.edge.s_id_downstream,
        edge.sc_id_upstream,
        edge.sc_id_downstream,
        attributes.join(";")
    )
}

fn stoichiometry_text(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}"))
}

fn print_direct_text(direct: &[DirectInteraction]) {
    print_edge_header("  Reaction     Direction  Stoichiometry");
    for d in direct {
        println!(
            "{}  {:<12} {:<10} {} -> {}",
            edge_text(&d.edge),
            d.r_id,
            d.direction,
            stoichiometry_text(d.stoichiometry_upstream),
            stoichiometry_text(d.stoichiometry_downstream)
        );
    }
    println!("\n{} direct interactions", direct.len());
}

fn print_direct_tsv(direct: &[DirectInteraction]) {
    println!("{EDGE_TSV_HEADER}\tr_id\tdirection\tstoichiometry_upstream\tstoichiometry_downstream");
    for d in direct {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            edge_tsv(&d.edge),
            d.r_id,
            d.direction,
            d.stoichiometry_upstream.map(|v| v.to_string()).unwrap_or_default(),
            d.stoichiometry_downstream.map(|v| v.to_string()).unwrap_or_default()
        );
    }
}

fn print_indirect_text(indirect: &[IndirectInteraction]) {
    print_edge_header("  Steps    Weight");
    for i in indirect {
        println!(
            "{}  {:>5} {:>9}",
            edge_text(&i.edge),
            i.path_length,
            format_number(i.weight)
        );
    }
    println!("\n{} indirect interactions", indirect.len());
}

fn print_indirect_tsv(indirect: &[IndirectInteraction]) {
    println!("{EDGE_TSV_HEADER}\tpath_length\tweight");
    for i in indirect {
        println!(
            "{}\t{}\t{}",
            edge_tsv(&i.edge),
            i.path_length,
            format_number(i.weight)
        );
    }
}
