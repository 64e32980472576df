//! Version-control collaborator
//!
//! The release run only needs a handful of git operations, each of which
//! either succeeds or fails as a whole. `Vcs` is the seam; `SystemGit` is the
//! implementation that shells out to the `git` binary.

pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;
use std::path::PathBuf;

/// Git operations used by a release run
pub trait Vcs {
  /// Commit the given paths (and only those) with `message`
  fn commit(&self, paths: &[PathBuf], message: &str) -> ReleaseResult<()>;

  /// Create an annotated tag
  fn tag_annotated(&self, name: &str, message: &str) -> ReleaseResult<()>;

  /// Names of all existing tags
  fn list_tags(&self) -> ReleaseResult<Vec<String>>;

  /// Push the current branch to its upstream
  fn push(&self) -> ReleaseResult<()>;

  /// Push all tags
  fn push_tags(&self) -> ReleaseResult<()>;
}
