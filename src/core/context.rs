//! Release context - built once, passed through every stage
//!
//! Carries what the run needs to know about how it is being run: where the
//! project lives, whether this is a dry run, how chatty to be, and how to ask
//! the operator a question. There is no ambient global state.
//!
//! Every side effect goes through `perform` (or `write_file`, which uses it),
//! so dry-run is one boolean gate and never a separate code path.

use crate::core::error::{ReleaseResult, ResultExt};
use crate::ui::diff::unified_diff;
use crate::ui::{Answer, Prompt};
use crate::utils::display_relative;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output verbosity, from `-q` / `-v` / `-vv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
  Quiet,
  Normal,
  Verbose,
  Trace,
}

impl Verbosity {
  pub fn from_flags(verbose: u8, quiet: bool) -> Self {
    match (quiet, verbose) {
      (true, _) => Verbosity::Quiet,
      (false, 0) => Verbosity::Normal,
      (false, 1) => Verbosity::Verbose,
      (false, _) => Verbosity::Trace,
    }
  }

  /// Maximum tracing level for this verbosity
  pub fn level(self) -> tracing::Level {
    match self {
      Verbosity::Quiet => tracing::Level::WARN,
      Verbosity::Normal => tracing::Level::INFO,
      Verbosity::Verbose => tracing::Level::DEBUG,
      Verbosity::Trace => tracing::Level::TRACE,
    }
  }
}

/// Per-run context shared by all release stages
pub struct ReleaseContext<'a> {
  /// Project root (absolute path)
  pub root: PathBuf,

  /// Evaluate everything, change nothing
  pub dry_run: bool,

  pub verbosity: Verbosity,

  prompt: &'a mut dyn Prompt,
}

impl<'a> ReleaseContext<'a> {
  pub fn new(root: PathBuf, dry_run: bool, verbosity: Verbosity, prompt: &'a mut dyn Prompt) -> Self {
    Self {
      root,
      dry_run,
      verbosity,
      prompt,
    }
  }

  /// Ask the operator a yes/no question
  pub fn confirm(&mut self, question: &str, default: Option<Answer>) -> ReleaseResult<Answer> {
    let answer = self.prompt.confirm(question, default)?;
    debug!("answered {} to: {}", answer, question.lines().last().unwrap_or(question));
    Ok(answer)
  }

  /// Run a side effect unless this is a dry run
  pub fn perform<F>(&self, action: &str, op: F) -> ReleaseResult<()>
  where
    F: FnOnce() -> ReleaseResult<()>,
  {
    if self.dry_run {
      info!("[dry-run] would {}", action);
      return Ok(());
    }
    debug!("{}", action);
    op()
  }

  /// Write `new` to `path` (gated); previews the change in dry-run or when verbose
  pub fn write_file(&self, path: &Path, old: &str, new: &str) -> ReleaseResult<()> {
    let label = self.display(path);
    if self.verbosity >= Verbosity::Verbose || (self.dry_run && self.verbosity != Verbosity::Quiet) {
      let diff = unified_diff(&label, old, new);
      if !diff.is_empty() {
        println!("{}", diff);
      }
    }

    self.perform(&format!("write {}", label), || {
      fs::write(path, new).with_context(|| format!("Failed to write {}", path.display()))
    })
  }

  /// Path relative to the project root, for messages
  pub fn display(&self, path: &Path) -> String {
    display_relative(&self.root, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::VecDeque;

  struct Scripted(VecDeque<Answer>);

  impl Prompt for Scripted {
    fn confirm(&mut self, _question: &str, default: Option<Answer>) -> ReleaseResult<Answer> {
      Ok(self.0.pop_front().or(default).unwrap_or(Answer::No))
    }
  }

  #[test]
  fn test_verbosity_from_flags() {
    assert_eq!(Verbosity::from_flags(0, true), Verbosity::Quiet);
    assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
    assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
    assert_eq!(Verbosity::from_flags(3, false), Verbosity::Trace);
    assert_eq!(Verbosity::Quiet.level(), tracing::Level::WARN);
  }

  #[test]
  fn test_dry_run_gates_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("VERSION");
    fs::write(&path, "1.0.1\n").unwrap();

    let mut prompt = Scripted(VecDeque::new());
    let ctx = ReleaseContext::new(dir.path().to_path_buf(), true, Verbosity::Normal, &mut prompt);
    ctx.write_file(&path, "1.0.1\n", "1.0.2\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1.0.1\n");

    let mut ran = false;
    ctx
      .perform("push tags", || {
        ran = true;
        Ok(())
      })
      .unwrap();
    assert!(!ran);
  }

  #[test]
  fn test_real_run_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("VERSION");
    fs::write(&path, "1.0.1\n").unwrap();

    let mut prompt = Scripted(VecDeque::from([Answer::Yes]));
    let mut ctx = ReleaseContext::new(dir.path().to_path_buf(), false, Verbosity::Normal, &mut prompt);
    assert_eq!(ctx.confirm("Go?", Some(Answer::No)).unwrap(), Answer::Yes);
    ctx.write_file(&path, "1.0.1\n", "1.0.2\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1.0.2\n");
    assert_eq!(ctx.display(&path), "VERSION");
  }
}
