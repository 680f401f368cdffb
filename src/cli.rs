// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands, global flags and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Container and network provisioning for Docker and Podman on a single host")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: berth.yml discovered in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results and warnings
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new berth.yml configuration file
    Init {
        /// Overwrite an existing berth.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Ensure the managed bridge network exists
    Network,

    /// Replace the log collector container with a fresh one
    Collector,

    /// Ensure the network and collector, then replace every configured container
    Up,

    /// Show whether containers are absent, stopped or running
    Status {
        /// Container names (default: every configured container)
        names: Vec<String>,
    },
}
