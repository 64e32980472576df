//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A project checkout with a bare `origin` it can push to
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  pub origin: PathBuf,
}

impl TestProject {
  /// Create a project from `files`, committed and pushed to origin
  pub fn new(files: &[(&str, &str)]) -> Result<Self> {
    let root = TempDir::new()?;
    let base = root.path().canonicalize()?;
    let path = base.join("proj");
    let origin = base.join("origin.git");
    std::fs::create_dir_all(&path)?;

    git(&base, &["init", "--bare", "--initial-branch=main", "origin.git"])?;

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["remote", "add", "origin", &origin.to_string_lossy()])?;

    for (name, content) in files {
      let file = path.join(name);
      if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::write(file, content)?;
    }

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;
    git(&path, &["push", "-u", "origin", "main"])?;

    Ok(Self { _root: root, path, origin })
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Get git log subjects, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Tags in the local repo
  pub fn tags(&self) -> Result<Vec<String>> {
    list_tags(&self.path)
  }

  /// Tags that made it to origin
  pub fn origin_tags(&self) -> Result<Vec<String>> {
    list_tags(&self.origin)
  }

  /// `git status --porcelain` output
  pub fn status(&self) -> Result<String> {
    let output = git(&self.path, &["status", "--porcelain"])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Commit at the tip of origin's main
  pub fn origin_head(&self) -> Result<String> {
    let output = git(&self.origin, &["rev-parse", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Commit at the local HEAD
  pub fn head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

fn list_tags(repo: &Path) -> Result<Vec<String>> {
  let output = git(repo, &["tag", "-l"])?;
  Ok(
    String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(String::from)
      .collect(),
  )
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the cutarelease binary, feeding `stdin` to its prompts.
///
/// Returns the output whatever the exit status.
pub fn run_cutarelease(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_cutarelease");

  let mut child = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run cutarelease")?;

  if let Some(mut input) = child.stdin.take() {
    input.write_all(stdin.as_bytes())?;
  }

  child.wait_with_output().context("Failed to wait for cutarelease")
}

/// Like `run_cutarelease`, failing unless it exits successfully
pub fn run_cutarelease_ok(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let output = run_cutarelease(cwd, args, stdin)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cutarelease command failed: cutarelease {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
