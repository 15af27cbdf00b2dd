//! Repository location resolution.
//!
//! A [`Repository`] is the validated toplevel of a git working copy. It is
//! resolved once per orchestrator and never changes afterwards.

use crate::error::{BranchOpsError, Result};
use crate::git::{GitRunner, get_repo_root};
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated git working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Wrap an already-validated toplevel path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of the working copy toplevel.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether the working copy has an unresolved rebase in progress.
    pub fn is_locked(&self, git: &dyn GitRunner) -> bool {
        git.is_locked(&self.root)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

/// Resolves a user-supplied location into a [`Repository`].
pub trait RepositoryFactory {
    fn open(&self, location: &Path) -> Result<Repository>;
}

/// Resolves locations with `git rev-parse --show-toplevel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRepositoryFactory;

impl RepositoryFactory for SystemRepositoryFactory {
    fn open(&self, location: &Path) -> Result<Repository> {
        if !location.is_dir() {
            return Err(BranchOpsError::UserError(format!(
                "repository path '{}' does not exist or is not a directory",
                location.display()
            )));
        }

        let root = get_repo_root(location)?;
        Ok(Repository::new(root))
    }
}
