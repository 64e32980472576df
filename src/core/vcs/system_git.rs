//! System git backend
//!
//! Every operation is one `git` subprocess with an isolated environment. A
//! non-zero exit is reported as `GitError::CommandFailed` with git's stderr.

use super::Vcs;
use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Self {
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  /// Run git with `args`, failing on a non-zero exit
  fn run(&self, args: &[String]) -> ReleaseResult<Output> {
    let command = format!("git {}", args.join(" "));
    debug!("running '{}'", command);

    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute {}", command))?;

    if !output.status.success() {
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(output)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the work tree
  /// - Clears environment variables
  /// - Whitelists PATH, HOME, and the SSH agent socket (needed to push)
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    // Isolated environment (don't trust ambient GIT_* overrides)
    cmd.env_clear();
    for var in ["PATH", "HOME", "SSH_AUTH_SOCK"] {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

impl Vcs for SystemGit {
  fn commit(&self, paths: &[PathBuf], message: &str) -> ReleaseResult<()> {
    let mut args = vec!["commit".to_string(), "-m".to_string(), message.to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| path_to_git_format(p)));
    self.run(&args)?;
    Ok(())
  }

  fn tag_annotated(&self, name: &str, message: &str) -> ReleaseResult<()> {
    self.run(&[
      "tag".to_string(),
      "-a".to_string(),
      name.to_string(),
      "-m".to_string(),
      message.to_string(),
    ])?;
    Ok(())
  }

  fn list_tags(&self) -> ReleaseResult<Vec<String>> {
    let output = self.run(&["tag".to_string(), "-l".to_string()])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect(),
    )
  }

  fn push(&self) -> ReleaseResult<()> {
    self.run(&["push".to_string()])?;
    Ok(())
  }

  fn push_tags(&self) -> ReleaseResult<()> {
    self.run(&["push".to_string(), "--tags".to_string()])?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git").current_dir(dir).args(args).output().unwrap();
    assert!(status.status.success(), "git {:?} failed", args);
  }

  fn repo() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    fs::write(dir.path().join("CHANGES.md"), "## proj 1.0.0\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "init"]);
    dir
  }

  #[test]
  fn test_open_outside_repo_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(SystemGit::open(dir.path()).is_err());
  }

  #[test]
  fn test_commit_and_tag() {
    let dir = repo();
    let git = SystemGit::open(dir.path()).unwrap();

    fs::write(dir.path().join("CHANGES.md"), "## proj 1.0.1\n").unwrap();
    git.commit(&[PathBuf::from("CHANGES.md")], "prepare for 1.0.1 release").unwrap();
    git.tag_annotated("1.0.1", "version 1.0.1").unwrap();

    assert_eq!(git.list_tags().unwrap(), vec!["1.0.1".to_string()]);
  }

  #[test]
  fn test_failed_command_reports_stderr() {
    let dir = repo();
    let git = SystemGit::open(dir.path()).unwrap();
    git.tag_annotated("1.0.0", "version 1.0.0").unwrap();

    let err = git.tag_annotated("1.0.0", "version 1.0.0").unwrap_err();
    match err {
      ReleaseError::Git(GitError::CommandFailed { command, stderr }) => {
        assert!(command.starts_with("git tag -a 1.0.0"));
        assert!(stderr.contains("already exists"));
      }
      other => panic!("unexpected error: {}", other),
    }
  }
}
