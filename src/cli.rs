//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "rangehammer")]
#[command(author, version, about = "Consolidate IPv4 ban ranges into minimal CIDR blocks")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Consolidate range lists into the minimal set of CIDR blocks
    Consolidate {
        /// Range list files, one CIDR per line ("-" reads stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print ranges and run statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that range lists parse, without consolidating
    Validate {
        /// Range list files ("-" reads stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Rebuild the configured output from every enabled source
    Update {
        /// Consolidate and report, but don't write the output file
        #[arg(long)]
        dry_run: bool,

        /// Restrict the run to these sources (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
