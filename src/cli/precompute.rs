use std::path::PathBuf;

use clap::Args;

use crate::cli::{format_number, GraphArgs, ModelSource, OutputFormat, SchemeArg};
use crate::network::distances::{precompute_distances_with, PrecomputeConfig};
use crate::network::graph::{build_graph, WeightScheme};

#[derive(Args)]
pub struct PrecomputeArgs {
    /// Output file for the distance cache
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Weight schemes to compute (can be given multiple times)
    #[arg(long = "weight-scheme", value_enum, default_values = ["weights"], num_args = 1..)]
    pub weight_schemes: Vec<SchemeArg>,

    /// Drop pairs whose shortest path needs more steps than this
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Store a witness path for every pair
    #[arg(long)]
    pub store_paths: bool,

    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub source: ModelSource,
}

/// Execute precompute subcommand
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or turned into a graph, or
/// the cache cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PrecomputeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = args.source.load(verbose)?;
    let graph = build_graph(&model, &args.graph.config())?;

    if verbose {
        eprintln!(
            "Built graph with {} nodes and {} edges (signature {})",
            graph.node_count(),
            graph.edge_count(),
            graph.signature()
        );
    }

    let config = PrecomputeConfig {
        weight_schemes: args
            .weight_schemes
            .iter()
            .map(|&s| WeightScheme::from(s))
            .collect(),
        max_steps: args.max_steps,
        store_paths: args.store_paths,
    };
    let cache = precompute_distances_with(&graph, &config)?;
    cache.save(&args.output)?;

    match format {
        OutputFormat::Text => {
            println!(
                "Precomputed {} distances over {} nodes to {}",
                cache.len(),
                graph.node_count(),
                args.output.display()
            );
            let schemes: Vec<&str> = cache.weight_schemes().iter().map(|s| s.name()).collect();
            println!("Weight schemes: {}", schemes.join(", "));
            if let Some(max_steps) = cache.max_steps() {
                println!("Max steps: {max_steps}");
            }
            println!("Graph signature: {}", cache.signature());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "output": args.output.display().to_string(),
                "entries": cache.len(),
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "weight_schemes": cache.weight_schemes(),
                "max_steps": cache.max_steps(),
                "graph_signature": cache.signature(),
                "created_at": cache.created_at(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("source\ttarget\tscheme\thops\tweight");
            for row in cache.entries() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.source,
                    row.target,
                    row.scheme,
                    row.hops,
                    format_number(row.weight)
                );
            }
        }
    }

    Ok(())
}
