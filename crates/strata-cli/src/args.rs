//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and the
//! logging verbosity; the subcommand picks between rendering one matrix and
//! running the configured batch.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Strata network tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one correlation matrix
    Render(RenderArgs),
    /// Render every combination of the `[batch]` configuration section
    Batch(BatchArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Path to the `;`-delimited correlation matrix
    #[arg(help = "Path to the input matrix")]
    pub input: String,

    /// Layers to include, as numbers or codes (e.g. "1,3" or "NT,CD")
    #[arg(short, long, default_value = "1,2,3")]
    pub layers: String,

    /// Correlation threshold, overrides `threshold.value`
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Centrality table sizing the interactive document's nodes
    #[arg(long)]
    pub centrality: Option<String>,

    /// Directory receiving the scene, legend and interactive documents
    #[arg(short, long, default_value = "out")]
    pub output_dir: String,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Output directory, overrides `batch.output_dir`
    #[arg(short, long)]
    pub output_dir: Option<String>,
}
