//! Command line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "trellis")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Boot a feature tree from configuration and inspect it")]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML); built-in defaults when omitted
    #[arg(short, long, env = "TRELLIS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `logging.level`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the activated tree
    Tree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the URL of a feature, e.g. `apps/shop/views/home`
    Url { path: String },
    /// List the feature types known to the catalog
    Types {},
}
