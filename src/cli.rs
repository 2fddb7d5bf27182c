//! CLI definitions for the comment expander.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Comment expander CLI.
#[derive(Parser)]
#[command(name = "comment-expander")]
#[command(about = "Expand every collapsed comment thread in a browser tab")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.comment-expander/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chrome remote debugging endpoint, overrides the config file
    #[arg(short, long, global = true, env = "EXPANDER_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scroll and expand until the page stops changing (Ctrl+C stops)
    Expand(TargetArgs),

    /// Run a single expand pass without scrolling
    Quick(TargetArgs),

    /// List open tabs, marking the ones the URL filter matches
    Pages,
}

#[derive(Args)]
pub(crate) struct TargetArgs {
    /// Tab id or URL fragment (default: first tab matching the URL filter)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
