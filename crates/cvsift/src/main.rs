mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            files,
            out,
            name_from,
            no_location,
            no_experience,
            labels,
        } => {
            cli::run_process(
                &files,
                out.as_deref(),
                name_from,
                no_location,
                no_experience,
                &labels,
            )
            .await
        }
        Commands::Labels { labels } => cli::run_labels(&labels),
    }
}
