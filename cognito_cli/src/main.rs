use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod output;

use cli::{Cli, Commands};
use commands::*;
use config::Resolved;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = match cli.verbose {
        0 => "cognito_cli=info,cognito_core=info",
        1 => "cognito_cli=debug,cognito_core=debug",
        _ => "cognito_cli=trace,cognito_core=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli).await {
        if !e.already_reported() {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let resolved = Resolved::from_cli(cli)?;
    tracing::debug!(?resolved.backend, revision = %resolved.revision, "resolved configuration");

    match &cli.command {
        Commands::Show { reveal } => show::run(cli, &resolved, *reveal).await,
        Commands::Save(args) => save::run(cli, &resolved, args).await,
        Commands::Mappers => mappers::run(cli, &resolved).await,
        Commands::Schema => schema::run(cli, &resolved).await,
    }
}
