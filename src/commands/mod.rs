//! Command implementations for branch-ops.
//!
//! This module provides the dispatcher that routes CLI commands to the
//! orchestrator. Each workflow command resolves the repository, loads the
//! config, applies command-line overrides and runs one operation.

use crate::cli::{Command, ConfigArgs, TargetArgs};
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::{
    BranchOutcome, Collaborators, Operation, Orchestrator, OrchestratorOptions, WorkflowRun,
};
use crate::report::Reporter;
use crate::repository::{RepositoryFactory, SystemRepositoryFactory};
use std::path::Path;
use tracing::{debug, info};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Purge(args) => cmd_workflow(Operation::Purge, args),
        Command::Rebase(args) => cmd_workflow(Operation::Rebase, args),
        Command::Aggregate(args) => cmd_workflow(Operation::Aggregate, args),
        Command::Config(args) => cmd_config(args),
    }
}

fn cmd_workflow(operation: Operation, args: TargetArgs) -> Result<()> {
    let mut orchestrator = prepare(&args, Reporter::stdout())?;
    let run = execute(&mut orchestrator, operation)?;

    if !run.confirmed {
        Reporter::stdout().line("Nothing was changed.");
    }
    Ok(())
}

/// Resolve config and build an orchestrator for `args`.
fn prepare(args: &TargetArgs, out: Reporter) -> Result<Orchestrator> {
    let config = load_config(&args.repo, args.config.as_deref())?
        .with_overrides(args.trunk.as_deref(), args.remote.as_deref())?;

    let orchestrator = Orchestrator::new(
        &args.repo,
        &args.branches,
        Collaborators::system(&config.remote, args.yes),
        OrchestratorOptions::from_config(&config),
        out,
    )?;
    debug!(
        repo = %orchestrator.repository(),
        trunk = orchestrator.trunk(),
        timestamp = orchestrator.timestamp(),
        branches = orchestrator.branches().len(),
        "orchestrator ready"
    );
    Ok(orchestrator)
}

fn execute(orchestrator: &mut Orchestrator, operation: Operation) -> Result<WorkflowRun> {
    let run = match operation {
        Operation::Purge => orchestrator.purge(),
        Operation::Rebase => orchestrator.rebase(),
        Operation::Aggregate => orchestrator.aggregate()?,
    };
    info!(
        operation = %run.operation,
        confirmed = run.confirmed,
        processed = run.outcomes.len(),
        conflicted = run.with_outcome(BranchOutcome::Conflicted).len(),
        "run finished"
    );
    Ok(run)
}

fn load_config(repo: &Path, explicit: Option<&Path>) -> Result<Config> {
    let repository = SystemRepositoryFactory.open(repo)?;
    Config::resolve(explicit, repository.path())
}

fn cmd_config(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args.repo, args.config.as_deref())?;
    let yaml = config.to_yaml()?;
    print!("{}", yaml);
    Ok(())
}
