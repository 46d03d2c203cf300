use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use awsinv::{cli, ebs, error::Result, hosts, tagging};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = cli::Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}. Exiting...", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    match &cli.command {
        cli::Command::Hosts(args) => hosts::run(args).await,
        cli::Command::Ebs(args) => ebs::run(args).await,
        cli::Command::Tag(args) => tagging::run(args).await,
    }
}
