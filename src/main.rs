use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("parthought=debug")
    } else {
        EnvFilter::new("parthought=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::History(args) => cli::history::execute(args).await,
        Commands::Share(args) => cli::share::execute(args),
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
