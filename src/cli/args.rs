// src/cli/args.rs
use crate::generate::ProviderKind;
use crate::model::DocstringStyle;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docwright", version, about = "Writes and improves Python docstrings with an LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add missing docstrings and improve weak ones
    Fix(FixArgs),
    /// List functions missing docstrings or needing better ones
    Check {
        /// Files or directories to scan
        #[arg(required = true)]
        targets: Vec<PathBuf>,
        /// Configuration file (default: ./docwright.toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Emit a JSON report
        #[arg(long)]
        json: bool,
    },
    /// Write a default docwright.toml
    Init {
        /// Where to write it
        #[arg(default_value = "docwright.toml")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FixArgs {
    /// Files or directories to process
    #[arg(required = true)]
    pub targets: Vec<PathBuf>,
    /// Configuration file (default: ./docwright.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
    #[arg(long, value_enum)]
    pub style: Option<DocstringStyle>,
    /// Show changes without writing files
    #[arg(long)]
    pub dry_run: bool,
    /// Only print errors and the summary
    #[arg(long, short)]
    pub quiet: bool,
    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
    /// Emit a JSON report
    #[arg(long)]
    pub json: bool,
}
