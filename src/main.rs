use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathway_matcher::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("pathway_matcher=debug,info")
    } else {
        EnvFilter::new("pathway_matcher=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Expand(args) => {
            cli::filter::run_expand(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Direct(args) => {
            cli::filter::run_direct(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Indirect(args) => {
            cli::filter::run_indirect(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Precompute(args) => {
            cli::precompute::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Model(args) => {
            cli::model::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
