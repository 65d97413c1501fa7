use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ost_cli::commands::{batch, evaluate, timeline};
use ost_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Evaluate { log, json, spans }) => {
            evaluate::run(&mut stdout, log, *json, *spans)?;
        }
        Some(Commands::Timeline { log }) => {
            timeline::run(&mut stdout, log)?;
        }
        Some(Commands::Batch {
            runs_dir,
            output,
            log_name,
            json,
        }) => {
            let config = Config::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            let log_name = log_name.as_deref().unwrap_or(&config.log_file_name);
            batch::run(&mut stdout, runs_dir, log_name, output.as_deref(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
