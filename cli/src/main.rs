use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cluster;
mod commands;
mod config;

/// CLI tool to score cluster nodes for a pending pod with the scheduler's score plugins.
#[derive(Parser, Debug)]
#[command(name = "r8s-score", version, about, long_about = None)]
struct R8sScore {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every node of a cluster file for a pending pod
    Score(commands::score::ScoreArgs),
    /// Show nodes or pods of a cluster file
    Get(commands::get::GetArgs),
    /// List registered score plugins
    Plugins,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = R8sScore::parse();
    let config = config::Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Score(args) => commands::score::handle(&config, &args).await,
        Commands::Get(args) => commands::get::handle(&args).await,
        Commands::Plugins => commands::plugins::handle(&config).await,
    }
}
