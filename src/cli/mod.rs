//! Command-line interface for pathway-matcher.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Match a column of external identifiers to model species
//! - **expand**: Resolve an edge list to compartmentalized species pairs
//! - **direct**: Keep edges whose species share a reaction
//! - **indirect**: Keep edges whose species are connected by a short path
//! - **precompute**: Build and save an all-pairs distance cache
//! - **model**: Show or export the pathway model
//!
//! ## Usage
//!
//! ```text
//! # Which species do these ChEBI ids map to?
//! pathway-matcher resolve features.tsv --column chebis --ontologies chebi
//!
//! # Direct mechanistic interactions, JSON output
//! pathway-matcher direct edges.tsv --ontologies chebi --format json
//!
//! # Indirect interactions using a saved distance cache
//! pathway-matcher precompute --output distances.bin
//! pathway-matcher indirect edges.tsv --distances distances.bin --max-path-length 5
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::table::FeatureTable;
use crate::core::types::{OntologySet, Qualifier};
use crate::matching::resolver::MatchOptions;
use crate::model::store::PathwayModel;
use crate::network::graph::{GraphConfig, WeightScheme, WeightingStrategy};
use crate::parsing::tsv::{parse_table_file, parse_table_text};

pub mod filter;
pub mod model;
pub mod precompute;
pub mod resolve;

#[derive(Parser)]
#[command(name = "pathway-matcher")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match molecular interaction edge lists against a curated pathway model")]
#[command(
    long_about = "pathway-matcher maps externally identified molecules (ChEBI, UniProt, ...) onto the species of a pathway model and classifies candidate interactions.\n\nIt reports:\n- Which model species each identifier resolves to\n- Edges whose species take part in the same reaction (direct)\n- Edges whose species are linked by a short weighted path (indirect)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a column of identifiers to model species
    Resolve(resolve::ResolveArgs),

    /// Expand an edge list to compartmentalized species pairs
    Expand(filter::ExpandArgs),

    /// Keep edges whose species interact through a single reaction
    Direct(filter::DirectArgs),

    /// Keep edges whose species are connected by a multi-step path
    Indirect(filter::IndirectArgs),

    /// Precompute shortest-path distances and save them to a file
    Precompute(precompute::PrecomputeArgs),

    /// Inspect the pathway model
    Model(model::ModelArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Where to load the pathway model from
#[derive(clap::Args, Debug, Clone)]
pub struct ModelSource {
    /// Path to a pathway model JSON file (defaults to the embedded glycolysis model)
    #[arg(long)]
    pub model: Option<PathBuf>,
}

impl ModelSource {
    /// Load the selected model
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be read or is invalid.
    pub fn load(&self, verbose: bool) -> anyhow::Result<PathwayModel> {
        let model = if let Some(path) = &self.model {
            PathwayModel::load_from_file(path)?
        } else {
            PathwayModel::load_embedded()?
        };

        if verbose {
            eprintln!(
                "Loaded model {} with {} species and {} reactions",
                model.id.as_deref().unwrap_or("(unnamed)"),
                model.species().len(),
                model.reactions().len()
            );
        }
        Ok(model)
    }
}

/// Identifier matching options
#[derive(clap::Args, Debug, Clone)]
pub struct MatchingArgs {
    /// Comma-separated ontologies to match within (e.g. "chebi,uniprot")
    #[arg(short, long, default_value = "chebi")]
    pub ontologies: String,

    /// Only use identifiers that assert identity (BQB_IS)
    #[arg(long)]
    pub exact_only: bool,

    /// Fail if no identifier matches at all
    #[arg(long)]
    pub strict: bool,
}

impl MatchingArgs {
    #[must_use]
    pub fn ontology_set(&self) -> OntologySet {
        OntologySet::parse_list(&self.ontologies)
    }

    #[must_use]
    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            strict: self.strict,
        }
    }

    /// Qualifiers to keep, or `None` for all
    #[must_use]
    pub fn qualifiers(&self) -> Option<Vec<Qualifier>> {
        self.exact_only.then(|| vec![Qualifier::Is])
    }
}

/// Interaction graph construction options
#[derive(clap::Args, Debug, Clone)]
pub struct GraphArgs {
    /// Ignore edge direction
    #[arg(long)]
    pub undirected: bool,

    /// Do not connect catalysts and other modifiers to products
    #[arg(long)]
    pub no_modifiers: bool,

    /// Give every edge weight 1
    #[arg(long)]
    pub unweighted: bool,
}

impl GraphArgs {
    #[must_use]
    pub fn config(&self) -> GraphConfig {
        GraphConfig {
            directed: !self.undirected,
            include_modifiers: !self.no_modifiers,
            weighting: if self.unweighted {
                WeightingStrategy::Unweighted
            } else {
                WeightingStrategy::Topology
            },
        }
    }
}

/// Weight scheme names accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemeArg {
    Weights,
    UpstreamWeights,
}

impl From<SchemeArg> for WeightScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Weights => WeightScheme::Weights,
            SchemeArg::UpstreamWeights => WeightScheme::UpstreamWeights,
        }
    }
}

/// Read a delimited table from a file, or tab-separated text from stdin for `-`
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn read_table(path: &Path) -> anyhow::Result<FeatureTable> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(parse_table_text(&buffer, '\t')?);
    }
    Ok(parse_table_file(path)?)
}

/// Render a float for text and TSV output
pub(crate) fn format_number(value: f64) -> String {
    format!("{value:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_indirect() {
        let cli = Cli::try_parse_from([
            "pathway-matcher",
            "indirect",
            "edges.tsv",
            "--max-path-length",
            "5",
            "--weight-scheme",
            "upstream-weights",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        match cli.command {
            Commands::Indirect(args) => {
                assert_eq!(args.max_path_length, 5);
                assert_eq!(args.weight_scheme, SchemeArg::UpstreamWeights);
            }
            _ => panic!("expected indirect command"),
        }
    }

    #[test]
    fn test_graph_args_config() {
        let args = GraphArgs {
            undirected: true,
            no_modifiers: false,
            unweighted: true,
        };
        let config = args.config();
        assert!(!config.directed);
        assert!(config.include_modifiers);
        assert_eq!(config.weighting, WeightingStrategy::Unweighted);
    }

    #[test]
    fn test_matching_args() {
        let args = MatchingArgs {
            ontologies: "ChEBI, uniprot".to_string(),
            exact_only: true,
            strict: false,
        };
        assert_eq!(args.ontology_set().len(), 2);
        assert_eq!(args.qualifiers(), Some(vec![Qualifier::Is]));
        assert!(!args.options().strict);
    }
}
