//! Git command runner for branch-ops.
//!
//! Provides a safe wrapper around git commands with captured stdout/stderr
//! and structured error handling, plus the [`GitRunner`] seam the orchestrator
//! drives. All git invocations go through this module.

use crate::error::{BranchOpsError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Result of a successful git command execution.
#[derive(Debug, Clone, Default)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    /// Create a new GitOutput from raw output bytes.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(BranchOpsError::GitError)` - On spawn failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    debug!(cwd = %cwd.display(), command = %args.join(" "), "running git");

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            BranchOpsError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(BranchOpsError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// Returns `BranchOpsError::UserError` when `cwd` is not inside a working copy,
/// so "wrong path" is reported as a user mistake rather than a git failure.
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            BranchOpsError::UserError(format!(
                "failed to execute git in '{}': {} (is git installed and does the path exist?)",
                cwd.display(),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() && !git_output.is_empty() {
        Ok(PathBuf::from(&git_output.stdout))
    } else {
        Err(BranchOpsError::UserError(format!(
            "'{}' is not inside a git repository",
            cwd.display()
        )))
    }
}

/// A single git invocation the orchestrator can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// `git checkout <name>`
    SwitchBranch(String),
    /// `git pull [<remote> [<branch>]]`
    Pull {
        remote: Option<String>,
        branch: Option<String>,
    },
    /// `git rebase <onto>`
    Rebase { onto: String },
    /// `git rebase --abort`, which clears the lock state.
    AbortRebase,
    /// `git push -f <remote> <branch>`
    ForcePush { remote: String, branch: String },
    /// `git branch <name> [<from>]`, or `git checkout -b <name> <from> --no-track`
    /// when `no_track` is set.
    CreateBranch {
        name: String,
        from: Option<String>,
        no_track: bool,
    },
    /// `git merge <name>`
    Merge(String),
    /// `git branch -d|-D <name>`
    DeleteLocalBranch { name: String, force: bool },
    /// `git push <remote> :<name>`
    DeleteRemoteBranch { remote: String, name: String },
    /// `git rev-parse --verify --quiet <reference>`
    VerifyRef(String),
}

impl GitCommand {
    /// Render the command as git arguments (without the leading `git`).
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            GitCommand::SwitchBranch(name) => {
                args.extend(["checkout".to_string(), name.clone()]);
            }
            GitCommand::Pull { remote, branch } => {
                args.push("pull".to_string());
                args.extend(remote.iter().cloned());
                args.extend(branch.iter().cloned());
            }
            GitCommand::Rebase { onto } => {
                args.extend(["rebase".to_string(), onto.clone()]);
            }
            GitCommand::AbortRebase => {
                args.extend(["rebase".to_string(), "--abort".to_string()]);
            }
            GitCommand::ForcePush { remote, branch } => {
                args.extend([
                    "push".to_string(),
                    "-f".to_string(),
                    remote.clone(),
                    branch.clone(),
                ]);
            }
            GitCommand::CreateBranch {
                name,
                from,
                no_track: true,
            } => {
                args.extend(["checkout".to_string(), "-b".to_string(), name.clone()]);
                args.extend(from.iter().cloned());
                args.push("--no-track".to_string());
            }
            GitCommand::CreateBranch {
                name,
                from,
                no_track: false,
            } => {
                args.extend(["branch".to_string(), name.clone()]);
                args.extend(from.iter().cloned());
            }
            GitCommand::Merge(name) => {
                args.extend(["merge".to_string(), "--no-edit".to_string(), name.clone()]);
            }
            GitCommand::DeleteLocalBranch { name, force } => {
                let flag = if *force { "-D" } else { "-d" };
                args.extend(["branch".to_string(), flag.to_string(), name.clone()]);
            }
            GitCommand::DeleteRemoteBranch { remote, name } => {
                args.extend(["push".to_string(), remote.clone(), format!(":{}", name)]);
            }
            GitCommand::VerifyRef(reference) => {
                args.extend([
                    "rev-parse".to_string(),
                    "--verify".to_string(),
                    "--quiet".to_string(),
                    reference.clone(),
                ]);
            }
        }
        args
    }
}

/// Executes git commands against a working copy.
///
/// The orchestrator treats every command as fire-and-forget: it logs the
/// returned `Result` and moves on. The lock query is the only answer it acts on.
pub trait GitRunner {
    /// Run one command synchronously in `repo`.
    fn run(&self, repo: &Path, command: &GitCommand) -> Result<GitOutput>;

    /// Whether `repo` is stuck in an unresolved rebase.
    fn is_locked(&self, repo: &Path) -> bool;
}

/// [`GitRunner`] backed by the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, repo: &Path, command: &GitCommand) -> Result<GitOutput> {
        let args = command.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_git(repo, &args)
    }

    fn is_locked(&self, repo: &Path) -> bool {
        ["rebase-merge", "rebase-apply"]
            .into_iter()
            .any(|marker| match run_git(repo, &["rev-parse", "--git-path", marker]) {
                Ok(output) => {
                    let path = PathBuf::from(&output.stdout);
                    let path = if path.is_absolute() {
                        path
                    } else {
                        repo.join(path)
                    };
                    path.exists()
                }
                Err(_) => false,
            })
    }
}
