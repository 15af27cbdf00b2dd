//! Branch list construction.
//!
//! Turns raw command-line values into an ordered, duplicate-free [`BranchSet`]:
//!
//! - a value naming an existing file is read as one branch per line
//!   (blank lines and `#` comments skipped); relative paths resolve against
//!   the repository's working copy
//! - any other value is split on commas
//! - names must satisfy git's ref-name rules
//! - the trunk branch is never part of a set
//! - names unknown both locally and on the remote are rejected
//!
//! Rejected names are kept alongside the set so the caller can report them.

use crate::error::{BranchOpsError, Result};
use crate::git::{GitCommand, GitRunner, SystemGit};
use crate::repository::Repository;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Characters allowed anywhere in a branch name.
static BRANCH_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s~^:?*\[\\\x00-\x1F\x7F]+$").expect("branch name pattern is valid")
});

/// A branch identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch(String);

impl Branch {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether `<remote>/<name>` resolves in `repo`.
    pub fn exists_on_remote(&self, repo: &Repository, git: &dyn GitRunner, remote: &str) -> bool {
        git.run(
            repo.path(),
            &GitCommand::VerifyRef(format!("refs/remotes/{}/{}", remote, self.0)),
        )
        .is_ok()
    }

    /// Whether the branch exists as a local head in `repo`.
    pub fn exists_locally(&self, repo: &Repository, git: &dyn GitRunner) -> bool {
        git.run(
            repo.path(),
            &GitCommand::VerifyRef(format!("refs/heads/{}", self.0)),
        )
        .is_ok()
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a raw name did not make it into a [`BranchSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Not a legal git branch name.
    InvalidName(&'static str),
    /// The trunk branch is never processed.
    Trunk,
    /// Neither a local branch nor a remote-tracking ref exists.
    NotFound,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidName(why) => write!(f, "invalid branch name ({})", why),
            RejectReason::Trunk => f.write_str("trunk branch is never processed"),
            RejectReason::NotFound => f.write_str("branch not found locally or on the remote"),
        }
    }
}

/// A raw name that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBranch {
    pub name: String,
    pub reason: RejectReason,
}

/// Ordered, duplicate-free collection of branches to operate on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSet {
    branches: Vec<Branch>,
    rejected: Vec<RejectedBranch>,
}

impl BranchSet {
    /// Build a set from names, keeping the first occurrence of each.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.push(Branch(name.into()));
        }
        set
    }

    fn push(&mut self, branch: Branch) {
        if !self.branches.contains(&branch) {
            self.branches.push(branch);
        }
    }

    fn reject(&mut self, name: impl Into<String>, reason: RejectReason) {
        self.rejected.push(RejectedBranch {
            name: name.into(),
            reason,
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
        self.branches.iter()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.branches.iter().map(|b| b.0.clone()).collect()
    }

    /// Raw names that were dropped while building the set.
    pub fn rejected(&self) -> &[RejectedBranch] {
        &self.rejected
    }
}

impl<'a> IntoIterator for &'a BranchSet {
    type Item = &'a Branch;
    type IntoIter = std::slice::Iter<'a, Branch>;

    fn into_iter(self) -> Self::IntoIter {
        self.branches.iter()
    }
}

/// Builds the [`BranchSet`] an orchestrator works on.
pub trait BranchSetFactory {
    /// Build the set for `repo` from raw command-line values, excluding `trunk`.
    fn build(&self, repo: &Repository, raw: &[String], trunk: &str) -> Result<BranchSet>;
}

/// Factory that validates names and checks existence with git.
#[derive(Debug, Clone)]
pub struct SystemBranchSetFactory<G: GitRunner = SystemGit> {
    git: G,
    remote: String,
}

impl SystemBranchSetFactory<SystemGit> {
    pub fn new(remote: impl Into<String>) -> Self {
        Self::with_runner(SystemGit, remote)
    }
}

impl<G: GitRunner> SystemBranchSetFactory<G> {
    pub fn with_runner(git: G, remote: impl Into<String>) -> Self {
        Self {
            git,
            remote: remote.into(),
        }
    }
}

impl<G: GitRunner> BranchSetFactory for SystemBranchSetFactory<G> {
    fn build(&self, repo: &Repository, raw: &[String], trunk: &str) -> Result<BranchSet> {
        let mut set = BranchSet::default();

        for name in expand_raw_branches(repo.path(), raw)? {
            if let Some(why) = invalid_name_reason(&name) {
                set.reject(name, RejectReason::InvalidName(why));
                continue;
            }
            if name == trunk {
                set.reject(name, RejectReason::Trunk);
                continue;
            }

            let branch = Branch(name);
            if set.branches.contains(&branch) {
                continue;
            }
            if !branch.exists_locally(repo, &self.git)
                && !branch.exists_on_remote(repo, &self.git, &self.remote)
            {
                debug!(branch = %branch, remote = %self.remote, "branch not found");
                set.reject(branch.0, RejectReason::NotFound);
                continue;
            }
            set.push(branch);
        }

        Ok(set)
    }
}

/// Expand raw values into trimmed, non-empty names in input order.
///
/// Values naming an existing file are read line by line; everything else is
/// split on commas. Relative file names resolve against `base`.
pub fn expand_raw_branches(base: &Path, raw: &[String]) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for value in raw {
        let path = base.join(value.trim());
        if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                BranchOpsError::UserError(format!(
                    "failed to read branch list '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            names.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_string),
            );
        } else {
            names.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }
    }

    Ok(names)
}

/// Check `name` against git's branch-name rules.
///
/// Returns the violated rule, or `None` when the name is acceptable.
pub fn invalid_name_reason(name: &str) -> Option<&'static str> {
    if !BRANCH_CHARS.is_match(name) {
        return Some("contains whitespace, control characters or one of ~^:?*[\\");
    }
    if name == "@" {
        return Some("'@' alone is reserved");
    }
    if name.starts_with('-') {
        return Some("starts with '-'");
    }
    if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
        return Some("empty path component");
    }
    if name.contains("..") {
        return Some("contains '..'");
    }
    if name.contains("@{") {
        return Some("contains '@{'");
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return Some("ends with '.' or '.lock'");
    }
    if name
        .split('/')
        .any(|component| component.starts_with('.') || component.ends_with(".lock"))
    {
        return Some("path component starts with '.' or ends with '.lock'");
    }
    None
}
