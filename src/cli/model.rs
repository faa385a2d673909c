use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::{ModelSource, OutputFormat};
use crate::model::entities::Reaction;
use crate::model::store::PathwayModel;

#[derive(Args)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub command: ModelCommands,
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Summarize the model and list its reactions
    Show {
        #[command(flatten)]
        source: ModelSource,
    },

    /// Export the model to a JSON file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        #[command(flatten)]
        source: ModelSource,
    },
}

/// Execute model subcommand
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or written.
pub fn run(args: ModelArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        ModelCommands::Show { source } => run_show(&source.load(verbose)?, format),
        ModelCommands::Export { output, source } => run_export(&output, &source.load(verbose)?),
    }
}

fn participants_text(reaction: &Reaction) -> String {
    reaction
        .participants
        .iter()
        .map(|p| format!("{}:{}", p.role, p.sc_id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_show(model: &PathwayModel, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Model: {}\n", model.name.as_deref().unwrap_or("(unnamed)"));
            println!("ID:           {}", model.id.as_deref().unwrap_or("-"));
            println!("Compartments: {}", model.compartments().len());
            println!("Species:      {}", model.species().len());
            println!("Located:      {}", model.compartmentalized_species().len());
            println!("Reactions:    {}", model.reactions().len());

            println!("\nReactions:");
            println!("{:<10} {:<40} Reversible", "ID", "Name");
            println!("{}", "-".repeat(62));
            for reaction in model.reactions() {
                println!(
                    "{:<10} {:<40} {}",
                    reaction.r_id,
                    reaction.name,
                    if reaction.reversible { "yes" } else { "no" }
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": model.id,
                "name": model.name,
                "compartments": model.compartments().len(),
                "species": model.species().len(),
                "compartmentalized_species": model.compartmentalized_species().len(),
                "reactions": model.reactions(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("r_id\tname\treversible\tparticipants");
            for reaction in model.reactions() {
                println!(
                    "{}\t{}\t{}\t{}",
                    reaction.r_id,
                    reaction.name,
                    reaction.reversible,
                    participants_text(reaction)
                );
            }
        }
    }

    Ok(())
}

fn run_export(output: &std::path::Path, model: &PathwayModel) -> anyhow::Result<()> {
    let json = model.to_json()?;
    std::fs::write(output, json)?;

    println!(
        "Exported {} species and {} reactions to {}",
        model.species().len(),
        model.reactions().len(),
        output.display()
    );

    Ok(())
}
