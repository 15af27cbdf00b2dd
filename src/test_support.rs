use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A working copy on `master` with one commit and no remote.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    init_working_copy(temp_dir.path());
    temp_dir
}

/// A working copy plus a bare `origin` it has pushed `master` to.
///
/// The working copy lives in `work/`, the bare remote in `origin.git/`.
pub(crate) struct RepoWithRemote {
    pub(crate) root: TempDir,
}

impl RepoWithRemote {
    pub(crate) fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub(crate) fn origin(&self) -> PathBuf {
        self.root.path().join("origin.git")
    }

    /// Create `branch` off master with one commit writing `file`, push it, and
    /// return to master.
    pub(crate) fn push_branch(&self, branch: &str, file: &str, contents: &str) {
        let work = self.work();
        git(&work, &["checkout", "-b", branch, "master"]);
        std::fs::write(work.join(file), contents).unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", &format!("Work on {}", branch)]);
        git(&work, &["push", "origin", branch]);
        git(&work, &["checkout", "master"]);
    }

    /// Commit `file` on master and push it.
    pub(crate) fn advance_master(&self, file: &str, contents: &str) {
        let work = self.work();
        git(&work, &["checkout", "master"]);
        std::fs::write(work.join(file), contents).unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", &format!("Trunk edits {}", file)]);
        git(&work, &["push", "origin", "master"]);
    }
}

pub(crate) fn create_test_repo_with_remote() -> RepoWithRemote {
    let root = TempDir::new().unwrap();
    let repo = RepoWithRemote { root };

    let origin = repo.origin();
    std::fs::create_dir_all(&origin).unwrap();
    git(&origin, &["init", "--bare"]);
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/master"]);

    let work = repo.work();
    std::fs::create_dir_all(&work).unwrap();
    init_working_copy(&work);
    git(&work, &["remote", "add", "origin", &origin.to_string_lossy()]);
    git(&work, &["push", "-u", "origin", "master"]);

    repo
}

fn init_working_copy(path: &Path) {
    git(path, &["init"]);
    // Deterministic trunk name regardless of init.defaultBranch.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/master"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "pull.rebase", "false"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}

/// Whether `branch` exists as a local head in `repo_dir`.
pub(crate) fn local_branch_exists(repo_dir: &Path, branch: &str) -> bool {
    Command::new("git")
        .current_dir(repo_dir)
        .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Name of the branch currently checked out in `repo_dir`.
pub(crate) fn current_branch(repo_dir: &Path) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
