use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod core;
mod daemon;
mod providers;

use crate::core::settings::Settings;

#[derive(Parser)]
#[command(name = "graph-poll")]
#[command(author, version, about = "Poll a Graph API resource with usage-aware backoff")]
struct Cli {
    /// Default to debug-level logging when RUST_LOG is unset
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the resource at a fixed interval
    Run {
        /// Stop after this many fetch cycles (default: run forever)
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Run a single fetch cycle and print the result
    Fetch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run { cycles } => {
            init_logging(cli.debug);
            let settings = Settings::load()?;
            daemon::run(&settings, cycles).await
        }
        Commands::Fetch { json } => {
            init_logging(cli.debug);
            cli::fetch::run(json).await
        }
        Commands::Config { json } => {
            init_logging(cli.debug);
            cli::config::run(json)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// The single place a command failure is logged.
fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    report(dispatch(cli).await)
}
