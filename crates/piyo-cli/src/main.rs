use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use piyo_cli::commands::{check, export, import, status};
use piyo_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    match command {
        Commands::Import(args) => {
            import::run(&mut writer, args, &config)?;
        }
        Commands::Check(args) => {
            check::run(&mut writer, args, &config)?;
        }
        Commands::Status => status::run(&mut writer, &config)?,
        Commands::Export(args) => {
            export::run(&mut writer, args, &config)?;
        }
    }

    Ok(())
}
