//! rangehammer - consolidate IPv4 ban ranges into minimal CIDR blocks.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rangehammer::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // Logs go to stderr so stdout stays clean for range output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Consolidate {
            inputs,
            output,
            json,
        } => rangehammer::commands::consolidate::run(&inputs, output.as_deref(), json),
        Commands::Validate { inputs } => rangehammer::commands::validate::run(&inputs),
        Commands::Update { dry_run, sources } => {
            rangehammer::commands::update::run(&cli.config, dry_run, &sources)
        }
        Commands::Init { force } => rangehammer::commands::init::run(&cli.config, force),
        Commands::Version => {
            println!("rangehammer {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
