//! CLI parse: clap types for memrepo. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// memrepo - in-memory content repository fixtures
#[derive(Parser)]
#[command(name = "memrepo")]
#[command(about = "Load content repository fixtures into memory and inspect them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root, searched for memrepo.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every item beneath a path as a table
    Show {
        /// Fixture file (.toml or .json)
        fixture: PathBuf,
        /// Subtree to show
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Export a subtree as a JSON document
    Export {
        /// Fixture file (.toml or .json)
        fixture: PathBuf,
        /// Subtree to export
        #[arg(long, default_value = "/")]
        path: String,
        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: ExportFormat,
    },
    /// Build a fixture and verify the resulting store
    Check {
        /// Fixture file (.toml or .json)
        fixture: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Pretty,
    Compact,
}
