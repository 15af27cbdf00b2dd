//! CLI argument parsing for branch-ops.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// branch-ops: confirmed, repeatable workflows for long-lived git branches.
///
/// Every workflow asks for confirmation first, processes branches in the
/// order given, and leaves the working copy on the trunk branch.
#[derive(Parser, Debug)]
#[command(name = "branch-ops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Trace every git command on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for branch-ops.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Delete branches locally and on the remote.
    Purge(TargetArgs),

    /// Rebase branches onto trunk and force-push the ones that apply cleanly.
    ///
    /// Conflicting branches are aborted and skipped. Local copies are removed
    /// afterwards.
    Rebase(TargetArgs),

    /// Merge branches into a dated release branch created from trunk.
    ///
    /// Stops and removes the release branch at the first conflict.
    Aggregate(TargetArgs),

    /// Print the effective configuration as YAML.
    Config(ConfigArgs),
}

/// Repository, branch list and settings shared by every workflow.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Path of the git working copy.
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Branch names, comma separated, or a file with one name per line.
    #[arg(short, long = "branches", required = true, num_args = 1..)]
    pub branches: Vec<String>,

    /// Config file (default: <repo>/.branch-ops.yaml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Trunk branch, overriding the config file.
    #[arg(long)]
    pub trunk: Option<String>,

    /// Remote name, overriding the config file.
    #[arg(long)]
    pub remote: Option<String>,

    /// Answer yes to the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `config` command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path of the git working copy.
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Config file (default: <repo>/.branch-ops.yaml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
