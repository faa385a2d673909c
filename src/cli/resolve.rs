use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_table, MatchingArgs, ModelSource, OutputFormat};
use crate::core::types::EntityType;
use crate::matching::resolver::{resolve_features_with, FeatureMatch};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum EntityArg {
    #[default]
    Species,
    Compartments,
}

impl From<EntityArg> for EntityType {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Species => EntityType::Species,
            EntityArg::Compartments => EntityType::Compartment,
        }
    }
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Feature table (TSV, or CSV by extension). Use '-' for TSV on stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Column holding the identifiers to resolve
    #[arg(short, long, default_value = "identifier")]
    pub column: String,

    /// Entity type whose identifiers are matched
    #[arg(long, value_enum, default_value = "species")]
    pub entity: EntityArg,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub source: ModelSource,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded or matching arguments are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = args.source.load(verbose)?;
    let features = read_table(&args.input)?;

    let mut identifiers = model.get_identifiers(args.entity.into());
    if let Some(qualifiers) = args.matching.qualifiers() {
        identifiers = identifiers.with_qualifiers(&qualifiers);
    }

    if verbose {
        eprintln!(
            "Read {} feature rows; {} identifier records available",
            features.len(),
            identifiers.len()
        );
    }

    let matches = resolve_features_with(
        &features,
        &identifiers,
        &args.matching.ontology_set(),
        &args.column,
        &args.matching.options(),
    )?;

    if matches.is_empty() {
        eprintln!("No identifiers matched.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_results(&matches),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
        OutputFormat::Tsv => print_tsv_results(&matches),
    }

    Ok(())
}

fn print_text_results(matches: &[FeatureMatch]) {
    println!(
        "{:>5}  {:<14} {:<10} {:<16} {:<30} Qualifier",
        "Row", "Identifier", "Ontology", "Entity", "Name"
    );
    println!("{}", "-".repeat(90));
    for m in matches {
        println!(
            "{:>5}  {:<14} {:<10} {:<16} {:<30} {}",
            m.row + 1,
            m.identifier,
            m.ontology,
            m.s_id,
            m.s_name,
            m.bqb
        );
    }

    let rows: std::collections::BTreeSet<usize> = matches.iter().map(|m| m.row).collect();
    println!("\n{} matches for {} input rows", matches.len(), rows.len());
}

fn print_tsv_results(matches: &[FeatureMatch]) {
    println!("row\tidentifier\tontology\ts_id\ts_name\tbqb");
    for m in matches {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            m.row, m.identifier, m.ontology, m.s_id, m.s_name, m.bqb
        );
    }
}
