//! automerge CLI

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Merge pull requests once approvals, CI and an inactivity timeout allow it
#[derive(Parser, Debug)]
#[command(name = "automerge", version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/automerge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository owner, overriding the config
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate every tracked pull request and merge the ready ones
    Update,
    /// Search the watched targets for open pull requests
    Find {
        /// Add every hit to the tracking list
        #[arg(long)]
        track: bool,
    },
    /// Start tracking pull request URLs
    Track {
        /// Pull request URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Stop tracking pull request URLs
    Untrack {
        /// Pull request URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show tracked pull requests
    List,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "automerge=debug" } else { "automerge=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = cli::GlobalOptions {
        config: cli.config,
        owner: cli.owner,
    };

    match cli.command {
        Command::Update => cli::run_update(&options).await?,
        Command::Find { track } => cli::run_find(&options, track).await?,
        Command::Track { urls } => cli::run_track(&options, &urls)?,
        Command::Untrack { urls } => cli::run_untrack(&options, &urls)?,
        Command::List => cli::run_list(&options)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
